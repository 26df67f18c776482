//! Portfolio-level risk indicators.

use crate::metrics::{line_loss, percent_of, saturating_sum, total_revenue, unit_margin};
use crate::ranking::top_n;
use core_types::{LineMetric, SalesLine, SortOrder};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioRisk {
    pub distinct_products: usize,
    /// Distinct products with at least one line below managerial cost.
    pub loss_products: usize,
    /// `lossProducts / distinctProducts × 100`; zero without products.
    pub risk_percent: Decimal,
}

pub fn portfolio_risk(lines: &[SalesLine]) -> PortfolioRisk {
    let all: HashSet<&str> = lines.iter().map(|l| l.description.as_str()).collect();
    let losing: HashSet<&str> = lines
        .iter()
        .filter(|l| unit_margin(l) < Decimal::ZERO)
        .map(|l| l.description.as_str())
        .collect();

    let risk_percent = if all.is_empty() {
        Decimal::ZERO
    } else {
        percent_of(Decimal::from(losing.len()), Decimal::from(all.len()))
    };

    PortfolioRisk {
        distinct_products: all.len(),
        loss_products: losing.len(),
        risk_percent,
    }
}

/// Sum of the negative line losses. Zero when nothing was sold below cost.
pub fn negative_impact(lines: &[SalesLine]) -> Decimal {
    saturating_sum(lines.iter().map(line_loss).filter(|loss| *loss < Decimal::ZERO))
}

/// Share of total revenue held by the `top` highest-revenue products, × 100.
/// Zero when total revenue is not positive.
pub fn revenue_concentration(lines: &[SalesLine], top: usize) -> Decimal {
    let total = total_revenue(lines);
    if total <= Decimal::ZERO {
        tracing::debug!(%total, "Non-positive revenue; concentration falls back to 0.");
        return Decimal::ZERO;
    }
    let leaders = saturating_sum(
        top_n(lines, LineMetric::Revenue, top, SortOrder::Descending)
            .iter()
            .map(|r| r.value),
    );
    percent_of(leaders, total)
}

/// One line plotted as managerial cost against gross unit value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostValuePoint {
    pub description: String,
    pub section: Option<String>,
    pub group: Option<String>,
    pub unit_gross_value: Decimal,
    pub managerial_cost: Decimal,
    pub profit: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostValueScatter {
    pub points: Vec<CostValuePoint>,
    /// Largest value on either axis; the cost = price diagonal runs from 0 to here.
    pub reference_max: Decimal,
}

/// Lines with both a positive unit value and a positive cost.
pub fn cost_value_points(lines: &[SalesLine]) -> CostValueScatter {
    let points: Vec<CostValuePoint> = lines
        .iter()
        .filter(|l| l.unit_gross_value > Decimal::ZERO && l.managerial_cost > Decimal::ZERO)
        .map(|l| CostValuePoint {
            description: l.description.clone(),
            section: l.section.clone(),
            group: l.group.clone(),
            unit_gross_value: l.unit_gross_value,
            managerial_cost: l.managerial_cost,
            profit: l.profit,
        })
        .collect();

    let reference_max = points
        .iter()
        .map(|p| p.unit_gross_value.max(p.managerial_cost))
        .max()
        .unwrap_or(Decimal::ZERO);

    CostValueScatter { points, reference_max }
}
