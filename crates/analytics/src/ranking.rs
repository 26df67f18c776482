use crate::aggregate::group_in_order;
use crate::metrics::{metric_value, saturating_sum};
use core_types::{Aggregation, LineMetric, SalesLine, SortOrder};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One product and its ranked value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedValue {
    pub description: String,
    pub value: Decimal,
}

/// Groups by product, sums `key`, sorts and keeps the first `n`.
///
/// The sort is stable: products with equal values keep the order in which they
/// first appear in `lines`.
pub fn top_n(
    lines: &[SalesLine],
    key: LineMetric,
    n: usize,
    order: SortOrder,
) -> Vec<RankedValue> {
    rank_by(lines, key, Aggregation::Sum, n, order)
}

/// Like [`top_n`], but the per-product value may be a mean instead of a sum.
pub fn rank_by(
    lines: &[SalesLine],
    key: LineMetric,
    aggregation: Aggregation,
    n: usize,
    order: SortOrder,
) -> Vec<RankedValue> {
    let mut ranked: Vec<RankedValue> = group_in_order(lines, |l| Some(l.description.as_str()))
        .into_iter()
        .map(|(description, group)| {
            let sum = saturating_sum(group.iter().map(|l| metric_value(l, key)));
            let value = match aggregation {
                Aggregation::Sum => sum,
                Aggregation::Mean => sum / Decimal::from(group.len()),
            };
            RankedValue {
                description: description.to_string(),
                value,
            }
        })
        .collect();

    match order {
        SortOrder::Descending => ranked.sort_by(|a, b| b.value.cmp(&a.value)),
        SortOrder::Ascending => ranked.sort_by(|a, b| a.value.cmp(&b.value)),
    }
    ranked.truncate(n);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn sale(desc: &str, revenue: Decimal) -> SalesLine {
        SalesLine::new(desc, dec!(1), revenue, dec!(1), revenue, revenue - dec!(1))
    }

    #[test]
    fn ranks_by_summed_revenue() {
        let lines = vec![
            sale("A", dec!(10)),
            sale("B", dec!(50)),
            sale("A", dec!(45)),
            sale("C", dec!(5)),
        ];

        let top = top_n(&lines, LineMetric::Revenue, 2, SortOrder::Descending);
        assert_eq!(
            top,
            vec![
                RankedValue { description: "A".into(), value: dec!(55) },
                RankedValue { description: "B".into(), value: dec!(50) },
            ]
        );

        let bottom = top_n(&lines, LineMetric::Revenue, 1, SortOrder::Ascending);
        assert_eq!(bottom[0].description, "C");
    }

    #[test]
    fn ties_keep_first_encountered_order() {
        let lines = vec![
            sale("Z", dec!(7)),
            sale("M", dec!(7)),
            sale("A", dec!(7)),
            sale("Q", dec!(9)),
        ];

        let desc = top_n(&lines, LineMetric::Revenue, 10, SortOrder::Descending);
        let names: Vec<&str> = desc.iter().map(|r| r.description.as_str()).collect();
        assert_eq!(names, vec!["Q", "Z", "M", "A"]);

        let asc = top_n(&lines, LineMetric::Revenue, 10, SortOrder::Ascending);
        let names: Vec<&str> = asc.iter().map(|r| r.description.as_str()).collect();
        assert_eq!(names, vec!["Z", "M", "A", "Q"]);
    }

    #[test]
    fn ranking_sorted_input_is_idempotent_and_deterministic() {
        let lines = vec![
            sale("A", dec!(3)),
            sale("B", dec!(9)),
            sale("C", dec!(3)),
            sale("D", dec!(1)),
        ];
        let first = top_n(&lines, LineMetric::Revenue, 10, SortOrder::Descending);

        let resorted: Vec<SalesLine> =
            first.iter().map(|r| sale(&r.description, r.value)).collect();
        let second = top_n(&resorted, LineMetric::Revenue, 10, SortOrder::Descending);

        assert_eq!(first, second);
        assert_eq!(first, top_n(&lines, LineMetric::Revenue, 10, SortOrder::Descending));
    }

    #[test]
    fn mean_aggregation_averages_per_product() {
        let lines = vec![
            SalesLine::new("X", dec!(1), dec!(8), dec!(10), dec!(8), dec!(-2)),
            SalesLine::new("X", dec!(1), dec!(6), dec!(10), dec!(6), dec!(-4)),
            SalesLine::new("Y", dec!(1), dec!(9), dec!(10), dec!(9), dec!(-1)),
        ];

        let worst = rank_by(
            &lines,
            LineMetric::UnitMargin,
            Aggregation::Mean,
            10,
            SortOrder::Ascending,
        );
        assert_eq!(worst[0], RankedValue { description: "X".into(), value: dec!(-3) });
        assert_eq!(worst[1], RankedValue { description: "Y".into(), value: dec!(-1) });
    }

    #[test]
    fn zero_n_and_empty_input_return_nothing() {
        assert!(top_n(&[], LineMetric::Profit, 10, SortOrder::Descending).is_empty());
        let single = [sale("A", dec!(1))];
        assert!(top_n(&single, LineMetric::Profit, 0, SortOrder::Descending).is_empty());
    }
}
