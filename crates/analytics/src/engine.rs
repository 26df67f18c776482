use crate::metrics::{profitability_percent, total_profit, total_quantity, total_revenue};
use crate::portfolio::{negative_impact, portfolio_risk, revenue_concentration};
use crate::report::SalesSummary;
use core_types::SalesLine;

/// A stateless calculator for the executive summary of a sales dataset.
#[derive(Debug, Clone)]
pub struct SalesMetricsEngine {
    concentration_top_n: usize,
}

impl Default for SalesMetricsEngine {
    fn default() -> Self {
        Self::new(5)
    }
}

impl SalesMetricsEngine {
    /// `concentration_top_n` is how many leading products the concentration
    /// figure covers.
    pub fn new(concentration_top_n: usize) -> Self {
        Self { concentration_top_n }
    }

    /// The main entry point for calculating the summary.
    ///
    /// # Arguments
    ///
    /// * `lines` - The (already filtered) sales lines.
    ///
    /// # Returns
    ///
    /// A `SalesSummary`. An empty slice yields a zeroed summary.
    pub fn summarize(&self, lines: &[SalesLine]) -> SalesSummary {
        let mut summary = SalesSummary::new(self.concentration_top_n);

        if lines.is_empty() {
            tracing::debug!("No sales lines; returning a zeroed summary.");
            return summary;
        }

        self.calculate_totals(lines, &mut summary);
        self.calculate_risk(lines, &mut summary);
        summary.top_concentration_pct = revenue_concentration(lines, self.concentration_top_n);

        tracing::debug!(
            lines = summary.line_count,
            products = summary.distinct_products,
            "Sales summary calculated."
        );
        summary
    }

    fn calculate_totals(&self, lines: &[SalesLine], summary: &mut SalesSummary) {
        summary.line_count = lines.len();
        summary.total_revenue = total_revenue(lines);
        summary.total_profit = total_profit(lines);
        summary.total_quantity = total_quantity(lines);
        summary.profitability_pct =
            profitability_percent(summary.total_revenue, summary.total_profit);
    }

    fn calculate_risk(&self, lines: &[SalesLine], summary: &mut SalesSummary) {
        let risk = portfolio_risk(lines);
        summary.distinct_products = risk.distinct_products;
        summary.loss_products = risk.loss_products;
        summary.portfolio_risk_pct = risk.risk_percent;
        summary.negative_impact = negative_impact(lines);
    }
}
