//! # Salesight Analytics
//!
//! This crate computes the metrics of a retail sales export: per-line formulas,
//! sums, rollups by product and by dimension, rankings, portfolio risk and
//! cashier movement counts.
//!
//! ## Architectural Principles
//!
//! - **Layer 1 Logic:** This is a pure logic crate. It has no knowledge of files,
//!   configuration or output. It depends only on `core-types` (Layer 0).
//! - **Total functions:** Every operation accepts any input, including an empty
//!   slice. Percentages over a zero denominator fall back to zero and are logged
//!   at `debug` level instead of failing.
//!
//! ## Public API
//!
//! - `metrics`: the shared per-line formulas and sums.
//! - `SalesMetricsEngine`: a stateless calculator producing a `SalesSummary`.
//! - `SalesFilter`: the description/section/group/loss selection.

pub mod aggregate;
pub mod engine;
pub mod filter;
pub mod metrics;
pub mod movements;
pub mod portfolio;
pub mod ranking;
pub mod report;

pub use aggregate::{
    DimensionAggregate, MetricTotal, ProductAggregate, aggregate_by, aggregate_products,
    dimension_value,
};
pub use engine::SalesMetricsEngine;
pub use filter::SalesFilter;
pub use metrics::{
    is_loss_line, line_loss, loss_lines, margin_percent, markup, metric_value, percent_of,
    profitability_percent, saturating_sum, total_profit, total_quantity, total_revenue,
    unit_margin,
};
pub use movements::{CountEntry, MovementStats, movement_stats};
pub use portfolio::{
    CostValuePoint, CostValueScatter, PortfolioRisk, cost_value_points, negative_impact,
    portfolio_risk, revenue_concentration,
};
pub use ranking::{RankedValue, rank_by, top_n};
pub use report::SalesSummary;
