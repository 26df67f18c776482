use analytics::unit_margin;
use core_types::{LineStatus, SalesLine};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// `Loss` when the line was sold below managerial cost.
pub fn line_status(line: &SalesLine) -> LineStatus {
    if unit_margin(line) < Decimal::ZERO {
        LineStatus::Loss
    } else {
        LineStatus::Healthy
    }
}

/// A line labelled for the loss table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineStatusEntry {
    pub description: String,
    pub section: Option<String>,
    pub group: Option<String>,
    pub unit_gross_value: Decimal,
    pub managerial_cost: Decimal,
    pub unit_margin: Decimal,
    pub status: LineStatus,
}

pub fn line_statuses(lines: &[SalesLine]) -> Vec<LineStatusEntry> {
    lines
        .iter()
        .map(|l| LineStatusEntry {
            description: l.description.clone(),
            section: l.section.clone(),
            group: l.group.clone(),
            unit_gross_value: l.unit_gross_value,
            managerial_cost: l.managerial_cost,
            unit_margin: unit_margin(l),
            status: line_status(l),
        })
        .collect()
}
