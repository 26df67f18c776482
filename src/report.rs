//! Assembles every analysis of one dataset into a single serializable report.

use analytics::{
    CostValueScatter, DimensionAggregate, RankedValue, SalesFilter, SalesMetricsEngine,
    SalesSummary, aggregate_by, aggregate_products, cost_value_points, loss_lines, rank_by, top_n,
};
use chrono::{DateTime, Utc};
use classifier::{
    AbcEntry, AbcSummary, LineStatusEntry, QuadrantAnalysis, classify_abc, classify_quadrants,
    line_statuses,
};
use configuration::Config;
use core_types::{Aggregation, Dimension, LineMetric, SalesLine, SortOrder};
use insights::{Insight, InsightGenerator};
use serde::Serialize;

/// Metrics summed for every dimension breakdown.
pub const BREAKDOWN_METRICS: [LineMetric; 4] = [
    LineMetric::Revenue,
    LineMetric::Profit,
    LineMetric::Quantity,
    LineMetric::LineLoss,
];

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Rankings {
    pub top_revenue: Vec<RankedValue>,
    pub bottom_revenue: Vec<RankedValue>,
    pub top_profit: Vec<RankedValue>,
    pub bottom_profit: Vec<RankedValue>,
    /// Mean unit margin of loss lines, most negative first.
    pub largest_unit_losses: Vec<RankedValue>,
}

impl Rankings {
    /// `lines` is the fully filtered set, including the loss-only toggle.
    pub fn build(lines: &[SalesLine], n: usize) -> Self {
        Self {
            top_revenue: top_n(lines, LineMetric::Revenue, n, SortOrder::Descending),
            bottom_revenue: top_n(lines, LineMetric::Revenue, n, SortOrder::Ascending),
            top_profit: top_n(lines, LineMetric::Profit, n, SortOrder::Descending),
            bottom_profit: top_n(lines, LineMetric::Profit, n, SortOrder::Ascending),
            largest_unit_losses: rank_by(
                &loss_lines(lines),
                LineMetric::UnitMargin,
                Aggregation::Mean,
                n,
                SortOrder::Ascending,
            ),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    pub generated_at: DateTime<Utc>,
    pub filter: SalesFilter,
    pub summary: SalesSummary,
    pub rankings: Rankings,
    pub sections: Vec<DimensionAggregate>,
    pub groups: Vec<DimensionAggregate>,
    pub abc: Vec<AbcEntry>,
    pub abc_summary: AbcSummary,
    pub quadrants: QuadrantAnalysis,
    pub cost_value: CostValueScatter,
    pub losses: Vec<LineStatusEntry>,
    pub insights: Vec<Insight>,
}

/// Runs every analysis over `lines`.
///
/// The description/section/group selection applies to everything. The summary,
/// classifications and insights describe the whole selection; the loss-only
/// toggle then narrows the detail views (rankings, section and group
/// breakdowns, cost/value points and the loss table).
pub fn build_report(lines: &[SalesLine], filter: &SalesFilter, config: &Config) -> AnalysisReport {
    let selected = filter.select(lines);
    let detail = filter.apply(lines);
    tracing::info!(
        total = lines.len(),
        selected = selected.len(),
        detail = detail.len(),
        "Building analysis report."
    );

    let summary =
        SalesMetricsEngine::new(config.insights.concentration_top_n).summarize(&selected);
    let products = aggregate_products(&selected);
    let abc = classify_abc(&products, &config.abc);
    let abc_summary = AbcSummary::from_entries(&abc);
    let insights = InsightGenerator::new(config.insights.clone()).evaluate_summary(&summary);

    AnalysisReport {
        generated_at: Utc::now(),
        filter: filter.clone(),
        rankings: Rankings::build(&detail, config.report.top_n),
        sections: aggregate_by(&detail, Dimension::Section, &BREAKDOWN_METRICS),
        groups: aggregate_by(&detail, Dimension::Group, &BREAKDOWN_METRICS),
        abc,
        abc_summary,
        quadrants: classify_quadrants(&products),
        cost_value: cost_value_points(&detail),
        losses: line_statuses(&loss_lines(&detail)),
        insights,
        summary,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::{AbcClass, QuadrantCategory};
    use insights::InsightRule;
    use rust_decimal_macros::dec;

    fn lines() -> Vec<SalesLine> {
        vec![
            SalesLine::new("A", dec!(1), dec!(100), dec!(80), dec!(100), dec!(20))
                .with_section("S1"),
            SalesLine::new("B", dec!(1), dec!(300), dec!(270), dec!(300), dec!(30))
                .with_section("S1"),
            SalesLine::new("C", dec!(2), dec!(8), dec!(10), dec!(16), dec!(-4))
                .with_section("S2")
                .with_group("G"),
        ]
    }

    #[test]
    fn report_covers_every_analysis() {
        let report = build_report(&lines(), &SalesFilter::default(), &Config::default());

        assert_eq!(report.summary.line_count, 3);
        assert_eq!(report.summary.total_revenue, dec!(416));
        assert_eq!(report.rankings.top_revenue[0].description, "B");
        assert_eq!(report.rankings.largest_unit_losses[0].value, dec!(-2));
        assert_eq!(report.sections.len(), 2);
        assert_eq!(report.groups.len(), 1);
        assert_eq!(report.abc.len(), 3);
        assert_eq!(report.abc[0].class, AbcClass::A);
        assert_eq!(report.quadrants.entries.len(), 3);
        assert_eq!(report.losses.len(), 1);
        assert!(
            report
                .insights
                .iter()
                .any(|i| i.rule == InsightRule::ValueDestruction)
        );
    }

    #[test]
    fn loss_only_narrows_detail_views_but_not_summary() {
        let filter = SalesFilter {
            loss_only: true,
            ..Default::default()
        };
        let report = build_report(&lines(), &filter, &Config::default());

        assert_eq!(report.summary.line_count, 3);
        assert_eq!(report.abc.len(), 3);
        assert_eq!(report.rankings.top_revenue.len(), 1);
        assert_eq!(report.rankings.top_revenue[0].description, "C");

        let sections: Vec<&str> = report.sections.iter().map(|s| s.key.as_str()).collect();
        assert_eq!(sections, vec!["S2"]);
        assert_eq!(report.groups.len(), 1);
        assert_eq!(report.cost_value.points.len(), 1);
        assert_eq!(report.cost_value.points[0].description, "C");
        assert_eq!(report.losses.len(), 1);
    }

    #[test]
    fn section_selection_applies_everywhere() {
        let filter = SalesFilter {
            sections: vec!["S1".into()],
            ..Default::default()
        };
        let report = build_report(&lines(), &filter, &Config::default());

        assert_eq!(report.summary.total_revenue, dec!(400));
        assert!(report.losses.is_empty());
        assert!(report.quadrants.in_category(QuadrantCategory::Star).count() <= 1);
        assert_eq!(report.abc[0].cumulative_percent, dec!(75));
    }

    #[test]
    fn empty_dataset_yields_empty_sections() {
        let report = build_report(&[], &SalesFilter::default(), &Config::default());
        assert!(report.abc.is_empty());
        assert!(report.rankings.top_profit.is_empty());

        let rules: Vec<InsightRule> = report.insights.iter().map(|i| i.rule).collect();
        assert_eq!(rules, vec![InsightRule::MarginHealth]);
    }
}
