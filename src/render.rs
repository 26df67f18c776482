//! Terminal tables and JSON output for the command-line front end.

use crate::report::AnalysisReport;
use analytics::{
    CostValueScatter, CountEntry, DimensionAggregate, MovementStats, RankedValue, SalesSummary,
};
use classifier::{AbcEntry, AbcSummary, LineStatusEntry, QuadrantAnalysis};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, CellAlignment, ContentArrangement, Table};
use core_types::LineMetric;
use insights::{Insight, InsightRule};
use rust_decimal::Decimal;
use serde::Serialize;

/// Pretty-printed JSON on stdout.
pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn money(value: Decimal) -> String {
    value.round_dp(2).to_string()
}

pub fn percent(value: Decimal) -> String {
    format!("{}%", value.round_dp(2).normalize())
}

fn new_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);
    table
}

fn number(value: String) -> Cell {
    Cell::new(value).set_alignment(CellAlignment::Right)
}

pub fn summary_table(summary: &SalesSummary) -> Table {
    let mut table = new_table(vec!["Indicator", "Value"]);
    let rows = [
        ("Sales lines", summary.line_count.to_string()),
        ("Total revenue", money(summary.total_revenue)),
        ("Total profit", money(summary.total_profit)),
        ("Total quantity", summary.total_quantity.normalize().to_string()),
        ("Profitability", percent(summary.profitability_pct)),
        ("Distinct products", summary.distinct_products.to_string()),
        ("Products sold at a loss", summary.loss_products.to_string()),
        ("Portfolio risk", percent(summary.portfolio_risk_pct)),
        ("Negative impact", money(summary.negative_impact)),
        (
            "Top-product concentration",
            format!(
                "{} (top {})",
                percent(summary.top_concentration_pct),
                summary.concentration_top_n
            ),
        ),
    ];
    for (label, value) in rows {
        table.add_row(vec![Cell::new(label), number(value)]);
    }
    table
}

pub fn ranking_table(value_header: &str, ranked: &[RankedValue]) -> Table {
    let mut table = new_table(vec!["#", "Product", value_header]);
    for (i, r) in ranked.iter().enumerate() {
        table.add_row(vec![
            Cell::new(i + 1),
            Cell::new(&r.description),
            number(money(r.value)),
        ]);
    }
    table
}

pub fn breakdown_table(rows: &[DimensionAggregate], metrics: &[LineMetric]) -> Table {
    let dimension = rows
        .first()
        .map(|r| r.dimension.to_string())
        .unwrap_or_else(|| "Key".to_string());
    let metric_names: Vec<String> = metrics.iter().map(|m| m.to_string()).collect();

    let mut header: Vec<&str> = vec![dimension.as_str(), "Lines"];
    header.extend(metric_names.iter().map(String::as_str));
    header.push("Margin");

    let mut table = new_table(header);
    for row in rows {
        let mut cells = vec![Cell::new(&row.key), number(row.line_count.to_string())];
        for metric in metrics {
            cells.push(number(row.total(*metric).map(money).unwrap_or_default()));
        }
        cells.push(number(percent(row.margin_percent)));
        table.add_row(cells);
    }
    table
}

pub fn abc_table(entries: &[AbcEntry], preview: usize) -> Table {
    let mut table = new_table(vec!["Product", "Revenue", "Cumulative", "Class"]);
    for entry in entries.iter().take(preview) {
        table.add_row(vec![
            Cell::new(&entry.description),
            number(money(entry.total_revenue)),
            number(percent(entry.cumulative_percent)),
            Cell::new(entry.class).set_alignment(CellAlignment::Center),
        ]);
    }
    table
}

pub fn abc_summary_table(summary: &AbcSummary) -> Table {
    let mut table = new_table(vec!["Class A", "Class B", "Class C"]);
    table.add_row(vec![summary.class_a, summary.class_b, summary.class_c]);
    table
}

pub fn quadrant_table(analysis: &QuadrantAnalysis) -> Table {
    let mut table = new_table(vec!["Product", "Revenue", "Profit", "Margin", "Category"]);
    for entry in &analysis.entries {
        table.add_row(vec![
            Cell::new(&entry.description),
            number(money(entry.total_revenue)),
            number(money(entry.total_profit)),
            number(percent(entry.margin_percent)),
            Cell::new(entry.category),
        ]);
    }
    table
}

pub fn loss_table(entries: &[LineStatusEntry]) -> Table {
    let mut table = new_table(vec![
        "Product",
        "Section",
        "Group",
        "Unit value",
        "Cost",
        "Unit margin",
        "Status",
    ]);
    for entry in entries {
        table.add_row(vec![
            Cell::new(&entry.description),
            Cell::new(entry.section.as_deref().unwrap_or("-")),
            Cell::new(entry.group.as_deref().unwrap_or("-")),
            number(money(entry.unit_gross_value)),
            number(money(entry.managerial_cost)),
            number(money(entry.unit_margin)),
            Cell::new(entry.status),
        ]);
    }
    table
}

/// One point per sale line; the reference line is `cost = unit value` from zero
/// to `reference_max`.
pub fn cost_value_table(scatter: &CostValueScatter) -> Table {
    let mut table = new_table(vec!["Product", "Section", "Unit value", "Cost", "Profit"]);
    for point in &scatter.points {
        table.add_row(vec![
            Cell::new(&point.description),
            Cell::new(point.section.as_deref().unwrap_or("-")),
            number(money(point.unit_gross_value)),
            number(money(point.managerial_cost)),
            number(money(point.profit)),
        ]);
    }
    table
}

/// Money figures for value destruction, percentages for the other rules.
fn insight_value(rule: InsightRule, value: Decimal) -> String {
    match rule {
        InsightRule::ValueDestruction => money(value),
        InsightRule::RevenueConcentration
        | InsightRule::PortfolioRisk
        | InsightRule::MarginHealth => percent(value),
    }
}

pub fn insights_table(insights: &[Insight]) -> Table {
    let mut table = new_table(vec!["Severity", "Rule", "Observed", "Threshold", "Message"]);
    for insight in insights {
        table.add_row(vec![
            Cell::new(insight.severity),
            Cell::new(insight.rule),
            number(insight_value(insight.rule, insight.observed)),
            number(insight_value(insight.rule, insight.threshold)),
            Cell::new(&insight.message),
        ]);
    }
    table
}

pub fn count_table(key_header: &str, counts: &[CountEntry]) -> Table {
    let mut table = new_table(vec![key_header, "Movements"]);
    for entry in counts {
        table.add_row(vec![Cell::new(&entry.key), number(entry.count.to_string())]);
    }
    table
}

pub fn print_movements(stats: &MovementStats) {
    println!("Total movements: {}\n", stats.total_movements);
    println!("By operator\n{}\n", count_table("Operator", &stats.by_operator));
    println!(
        "By payment method\n{}\n",
        count_table("Payment method", &stats.by_payment_method)
    );
    if !stats.by_cash_register.is_empty() {
        println!(
            "By cash register\n{}\n",
            count_table("Cash register", &stats.by_cash_register)
        );
    }
    println!(
        "{} by operator\n{}",
        stats.highlighted_payment_method,
        count_table("Operator", &stats.highlighted_by_operator)
    );
}

pub fn print_insights(insights: &[Insight]) {
    if insights.is_empty() {
        println!("No insights raised.");
    } else {
        println!("{}", insights_table(insights));
    }
}

pub fn print_report(report: &AnalysisReport, abc_preview: usize) {
    let breakdown = crate::report::BREAKDOWN_METRICS;

    println!("Summary\n{}\n", summary_table(&report.summary));
    println!("Top revenue\n{}\n", ranking_table("Revenue", &report.rankings.top_revenue));
    println!(
        "Bottom revenue\n{}\n",
        ranking_table("Revenue", &report.rankings.bottom_revenue)
    );
    println!("Top profit\n{}\n", ranking_table("Profit", &report.rankings.top_profit));
    println!("Bottom profit\n{}\n", ranking_table("Profit", &report.rankings.bottom_profit));
    println!(
        "Largest unit losses\n{}\n",
        ranking_table("Mean unit margin", &report.rankings.largest_unit_losses)
    );
    println!("By section\n{}\n", breakdown_table(&report.sections, &breakdown));
    println!("By group\n{}\n", breakdown_table(&report.groups, &breakdown));
    println!(
        "ABC curve\n{}\n{}\n",
        abc_table(&report.abc, abc_preview),
        abc_summary_table(&report.abc_summary)
    );
    println!(
        "Strategic matrix (median revenue {}, median margin {})\n{}\n",
        money(report.quadrants.median_revenue),
        percent(report.quadrants.median_margin_percent),
        quadrant_table(&report.quadrants)
    );
    println!(
        "Cost versus unit value (reference line up to {})\n{}\n",
        money(report.cost_value.reference_max),
        cost_value_table(&report.cost_value)
    );
    println!("Lines sold below cost\n{}\n", loss_table(&report.losses));
    print_insights(&report.insights);
}
