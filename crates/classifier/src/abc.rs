use analytics::{ProductAggregate, percent_of, saturating_sum};
use configuration::AbcCutoffs;
use core_types::AbcClass;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A product's position on the cumulative revenue curve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AbcEntry {
    pub description: String,
    pub total_revenue: Decimal,
    pub cumulative_percent: Decimal,
    pub class: AbcClass,
}

/// Number of products per class.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AbcSummary {
    pub class_a: usize,
    pub class_b: usize,
    pub class_c: usize,
}

impl AbcSummary {
    pub fn from_entries(entries: &[AbcEntry]) -> Self {
        entries.iter().fold(Self::default(), |mut acc, e| {
            match e.class {
                AbcClass::A => acc.class_a += 1,
                AbcClass::B => acc.class_b += 1,
                AbcClass::C => acc.class_c += 1,
            }
            acc
        })
    }
}

fn class_for(cumulative: Decimal, cutoffs: &AbcCutoffs) -> AbcClass {
    if cumulative <= cutoffs.class_a_max_pct {
        AbcClass::A
    } else if cumulative <= cutoffs.class_b_max_pct {
        AbcClass::B
    } else {
        AbcClass::C
    }
}

/// Classifies products by their cumulative share of total revenue.
///
/// Products are sorted by revenue, highest first (stable). Cutoff boundaries
/// are inclusive. When total revenue is not positive every product is placed
/// in class C with a cumulative percent of zero.
pub fn classify_abc(products: &[ProductAggregate], cutoffs: &AbcCutoffs) -> Vec<AbcEntry> {
    let mut sorted: Vec<&ProductAggregate> = products.iter().collect();
    sorted.sort_by(|a, b| b.total_revenue.cmp(&a.total_revenue));

    let total = saturating_sum(sorted.iter().map(|p| p.total_revenue));
    if total <= Decimal::ZERO {
        tracing::debug!(
            %total,
            products = sorted.len(),
            "Non-positive revenue; every product falls in class C."
        );
        return sorted
            .into_iter()
            .map(|p| AbcEntry {
                description: p.description.clone(),
                total_revenue: p.total_revenue,
                cumulative_percent: Decimal::ZERO,
                class: AbcClass::C,
            })
            .collect();
    }

    let mut running = Decimal::ZERO;
    sorted
        .into_iter()
        .map(|p| {
            running = running.saturating_add(p.total_revenue);
            let cumulative_percent = percent_of(running, total);
            AbcEntry {
                description: p.description.clone(),
                total_revenue: p.total_revenue,
                cumulative_percent,
                class: class_for(cumulative_percent, cutoffs),
            }
        })
        .collect()
}
