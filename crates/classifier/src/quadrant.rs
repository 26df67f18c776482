use analytics::ProductAggregate;
use core_types::QuadrantCategory;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuadrantEntry {
    pub description: String,
    pub total_revenue: Decimal,
    pub total_profit: Decimal,
    pub total_quantity: Decimal,
    pub margin_percent: Decimal,
    /// Absolute quantity, with zero replaced by one so every point stays visible.
    pub bubble_size: Decimal,
    pub category: QuadrantCategory,
}

/// The revenue/margin matrix with the medians it was split on.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuadrantAnalysis {
    pub median_revenue: Decimal,
    pub median_margin_percent: Decimal,
    pub entries: Vec<QuadrantEntry>,
}

impl QuadrantAnalysis {
    pub fn in_category(
        &self,
        category: QuadrantCategory,
    ) -> impl Iterator<Item = &QuadrantEntry> {
        self.entries.iter().filter(move |e| e.category == category)
    }
}

/// Median of the values; the mean of the two middle values for an even count.
fn median(mut values: Vec<Decimal>) -> Decimal {
    if values.is_empty() {
        return Decimal::ZERO;
    }
    values.sort();
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        let (low, high) = (values[mid - 1], values[mid]);
        match low.checked_add(high) {
            Some(sum) => sum / Decimal::TWO,
            None => (low / Decimal::TWO).saturating_add(high / Decimal::TWO),
        }
    } else {
        values[mid]
    }
}

/// Places each product with non-zero revenue in a quadrant relative to the
/// dataset medians. Values equal to a median count as high.
pub fn classify_quadrants(products: &[ProductAggregate]) -> QuadrantAnalysis {
    let survivors: Vec<&ProductAggregate> = products
        .iter()
        .filter(|p| !p.total_revenue.is_zero())
        .collect();
    if survivors.len() < products.len() {
        tracing::debug!(
            excluded = products.len() - survivors.len(),
            "Products without revenue left out of the quadrant matrix."
        );
    }

    let median_revenue = median(survivors.iter().map(|p| p.total_revenue).collect());
    let median_margin_percent = median(survivors.iter().map(|p| p.margin_percent).collect());

    let entries = survivors
        .into_iter()
        .map(|p| {
            let quantity = p.total_quantity.abs();
            QuadrantEntry {
                description: p.description.clone(),
                total_revenue: p.total_revenue,
                total_profit: p.total_profit,
                total_quantity: p.total_quantity,
                margin_percent: p.margin_percent,
                bubble_size: if quantity.is_zero() { Decimal::ONE } else { quantity },
                category: QuadrantCategory::from_position(
                    p.total_revenue >= median_revenue,
                    p.margin_percent >= median_margin_percent,
                ),
            }
        })
        .collect();

    QuadrantAnalysis {
        median_revenue,
        median_margin_percent,
        entries,
    }
}
