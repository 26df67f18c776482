//! Rollups of sales lines per product and per categorical dimension.

use crate::metrics::{line_loss, margin_percent, metric_value, saturating_sum, unit_margin};
use core_types::{Dimension, LineMetric, SalesLine};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Groups lines by a key, keeping groups in first-encountered order.
/// Lines for which `key` returns `None` are skipped.
pub(crate) fn group_in_order<'a, F>(
    lines: &'a [SalesLine],
    key: F,
) -> Vec<(&'a str, Vec<&'a SalesLine>)>
where
    F: Fn(&'a SalesLine) -> Option<&'a str>,
{
    let mut positions: HashMap<&'a str, usize> = HashMap::new();
    let mut groups: Vec<(&'a str, Vec<&'a SalesLine>)> = Vec::new();

    for line in lines {
        let Some(k) = key(line) else { continue };
        match positions.get(k) {
            Some(&index) => groups[index].1.push(line),
            None => {
                positions.insert(k, groups.len());
                groups.push((k, vec![line]));
            }
        }
    }
    groups
}

/// Totals for one distinct product `description`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductAggregate {
    pub description: String,
    pub line_count: usize,
    pub total_revenue: Decimal,
    pub total_profit: Decimal,
    pub total_quantity: Decimal,
    /// Mean of the per-line unit margins.
    pub average_unit_margin: Decimal,
    /// Sum of per-line `unitMargin × quantity`.
    pub total_line_loss: Decimal,
    /// `totalProfit / totalRevenue × 100`; zero when revenue is zero.
    pub margin_percent: Decimal,
    /// At least one line was sold below managerial cost.
    pub has_loss_line: bool,
}

/// One aggregate per distinct product, in first-encountered order.
pub fn aggregate_products(lines: &[SalesLine]) -> Vec<ProductAggregate> {
    group_in_order(lines, |l| Some(l.description.as_str()))
        .into_iter()
        .map(|(description, group)| {
            let total_revenue = saturating_sum(group.iter().map(|l| l.net_total_value));
            let total_profit = saturating_sum(group.iter().map(|l| l.profit));
            let margin_sum = saturating_sum(group.iter().map(|l| unit_margin(l)));
            ProductAggregate {
                description: description.to_string(),
                line_count: group.len(),
                total_revenue,
                total_profit,
                total_quantity: saturating_sum(group.iter().map(|l| l.quantity)),
                average_unit_margin: margin_sum / Decimal::from(group.len()),
                total_line_loss: saturating_sum(group.iter().map(|l| line_loss(l))),
                margin_percent: margin_percent(total_revenue, total_profit),
                has_loss_line: group.iter().any(|l| unit_margin(l) < Decimal::ZERO),
            }
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricTotal {
    pub metric: LineMetric,
    pub total: Decimal,
}

/// Totals for one value of a categorical dimension.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DimensionAggregate {
    pub dimension: Dimension,
    pub key: String,
    pub line_count: usize,
    /// The requested metrics, in request order.
    pub totals: Vec<MetricTotal>,
    /// Ratio of the summed profit to the summed revenue, computed after grouping.
    pub margin_percent: Decimal,
}

impl DimensionAggregate {
    pub fn total(&self, metric: LineMetric) -> Option<Decimal> {
        self.totals.iter().find(|t| t.metric == metric).map(|t| t.total)
    }
}

/// The value of `dimension` on a line, if the export carried it.
pub fn dimension_value(line: &SalesLine, dimension: Dimension) -> Option<&str> {
    let value = match dimension {
        Dimension::Section => line.section.as_deref(),
        Dimension::Group => line.group.as_deref(),
        Dimension::PaymentMethod => line.payment_method.as_deref(),
        Dimension::OperatorName => line.operator_name.as_deref(),
    };
    value.filter(|v| !v.is_empty())
}

/// Rolls lines up by a dimension, summing the requested metrics.
///
/// Lines without a value for the dimension are left out. Groups keep their
/// first-encountered order.
pub fn aggregate_by(
    lines: &[SalesLine],
    dimension: Dimension,
    metrics: &[LineMetric],
) -> Vec<DimensionAggregate> {
    group_in_order(lines, |l| dimension_value(l, dimension))
        .into_iter()
        .map(|(key, group)| {
            let revenue = saturating_sum(group.iter().map(|l| l.net_total_value));
            let profit = saturating_sum(group.iter().map(|l| l.profit));
            let totals = metrics
                .iter()
                .map(|&metric| MetricTotal {
                    metric,
                    total: saturating_sum(group.iter().map(|l| metric_value(l, metric))),
                })
                .collect();
            DimensionAggregate {
                dimension,
                key: key.to_string(),
                line_count: group.len(),
                totals,
                margin_percent: margin_percent(revenue, profit),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn sample() -> Vec<SalesLine> {
        vec![
            SalesLine::new("Cafe", dec!(2), dec!(10), dec!(8), dec!(20), dec!(4))
                .with_section("Mercearia")
                .with_payment_method("PIX"),
            SalesLine::new("Sabao", dec!(1), dec!(5), dec!(6), dec!(5), dec!(-1))
                .with_section("Limpeza"),
            SalesLine::new("Cafe", dec!(1), dec!(12), dec!(8), dec!(12), dec!(4))
                .with_section("Mercearia")
                .with_payment_method("DINHEIRO"),
            SalesLine::new("Leite", dec!(4), dec!(4), dec!(3), dec!(16), dec!(4)),
        ]
    }

    #[test]
    fn products_are_aggregated_in_first_seen_order() {
        let products = aggregate_products(&sample());
        let names: Vec<&str> = products.iter().map(|p| p.description.as_str()).collect();
        assert_eq!(names, vec!["Cafe", "Sabao", "Leite"]);

        let cafe = &products[0];
        assert_eq!(cafe.line_count, 2);
        assert_eq!(cafe.total_revenue, dec!(32));
        assert_eq!(cafe.total_profit, dec!(8));
        assert_eq!(cafe.total_quantity, dec!(3));
        assert_eq!(cafe.average_unit_margin, dec!(3));
        assert_eq!(cafe.total_line_loss, dec!(8));
        assert_eq!(cafe.margin_percent, dec!(25));
        assert!(!cafe.has_loss_line);

        let sabao = &products[1];
        assert!(sabao.has_loss_line);
        assert_eq!(sabao.total_line_loss, dec!(-1));
    }

    #[test]
    fn zero_revenue_product_has_zero_margin() {
        let lines = vec![
            SalesLine::new("Troca", dec!(1), dec!(10), dec!(8), dec!(10), dec!(2)),
            SalesLine::new("Troca", dec!(-1), dec!(10), dec!(8), dec!(-10), dec!(-2)),
        ];
        let products = aggregate_products(&lines);
        assert_eq!(products[0].total_revenue, Decimal::ZERO);
        assert_eq!(products[0].margin_percent, Decimal::ZERO);
    }

    #[test]
    fn ratios_are_computed_from_sums() {
        let lines = vec![
            SalesLine::new("A", dec!(1), dec!(100), dec!(50), dec!(100), dec!(50)).with_group("G"),
            SalesLine::new("B", dec!(1), dec!(900), dec!(890), dec!(900), dec!(10)).with_group("G"),
        ];
        let metrics = [LineMetric::Revenue, LineMetric::Profit];
        let groups = aggregate_by(&lines, Dimension::Group, &metrics);

        assert_eq!(groups.len(), 1);
        // 60 / 1000, not the mean of 50% and 1.11%.
        assert_eq!(groups[0].margin_percent, dec!(6));
        assert_eq!(groups[0].total(LineMetric::Revenue), Some(dec!(1000)));
        assert_eq!(groups[0].total(LineMetric::Quantity), None);
    }

    #[test]
    fn lines_without_the_dimension_are_excluded() {
        let groups = aggregate_by(&sample(), Dimension::PaymentMethod, &[LineMetric::Revenue]);
        let keys: Vec<&str> = groups.iter().map(|g| g.key.as_str()).collect();
        assert_eq!(keys, vec!["PIX", "DINHEIRO"]);

        let sections = aggregate_by(&sample(), Dimension::Section, &[LineMetric::Quantity]);
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].key, "Mercearia");
        assert_eq!(sections[0].line_count, 2);
        assert_eq!(sections[0].total(LineMetric::Quantity), Some(dec!(3)));
    }

    #[test]
    fn empty_input_yields_no_groups() {
        assert!(aggregate_products(&[]).is_empty());
        assert!(aggregate_by(&[], Dimension::Section, &[LineMetric::Revenue]).is_empty());
    }
}
