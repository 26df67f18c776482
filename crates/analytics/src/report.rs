use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The executive header of a sales dataset.
///
/// This struct is the output of the `SalesMetricsEngine` and the input of the
/// insight rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesSummary {
    // I. Totals
    pub line_count: usize,
    pub total_revenue: Decimal,
    pub total_profit: Decimal,
    pub total_quantity: Decimal,
    pub profitability_pct: Decimal, // zero when revenue is not positive

    // II. Portfolio risk
    pub distinct_products: usize,
    pub loss_products: usize,
    pub portfolio_risk_pct: Decimal,
    pub negative_impact: Decimal, // sum of negative line losses, <= 0

    // III. Concentration
    pub concentration_top_n: usize,
    pub top_concentration_pct: Decimal,
}

impl SalesSummary {
    /// A zeroed summary, as produced for an empty dataset.
    pub fn new(concentration_top_n: usize) -> Self {
        Self {
            line_count: 0,
            total_revenue: Decimal::ZERO,
            total_profit: Decimal::ZERO,
            total_quantity: Decimal::ZERO,
            profitability_pct: Decimal::ZERO,
            distinct_products: 0,
            loss_products: 0,
            portfolio_risk_pct: Decimal::ZERO,
            negative_impact: Decimal::ZERO,
            concentration_top_n,
            top_concentration_pct: Decimal::ZERO,
        }
    }
}
