use crate::metrics::is_loss_line;
use core_types::SalesLine;
use serde::{Deserialize, Serialize};

/// The multi-select filters a dashboard offers over a dataset.
///
/// An empty list places no restriction on that column; non-empty lists combine
/// with AND. A line whose section or group is absent never matches a non-empty
/// list for that column.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesFilter {
    pub descriptions: Vec<String>,
    pub sections: Vec<String>,
    pub groups: Vec<String>,
    /// Keep only lines sold below managerial cost.
    pub loss_only: bool,
}

fn selected(choices: &[String], value: Option<&str>) -> bool {
    choices.is_empty() || value.is_some_and(|v| choices.iter().any(|c| c == v))
}

impl SalesFilter {
    pub fn is_empty(&self) -> bool {
        self.descriptions.is_empty()
            && self.sections.is_empty()
            && self.groups.is_empty()
            && !self.loss_only
    }

    /// Whether a line passes the description/section/group selection.
    pub fn matches_selection(&self, line: &SalesLine) -> bool {
        selected(&self.descriptions, Some(line.description.as_str()))
            && selected(&self.sections, line.section.as_deref())
            && selected(&self.groups, line.group.as_deref())
    }

    pub fn matches(&self, line: &SalesLine) -> bool {
        self.matches_selection(line) && (!self.loss_only || is_loss_line(line))
    }

    /// Applies the multi-select filters only, ignoring `loss_only`.
    pub fn select(&self, lines: &[SalesLine]) -> Vec<SalesLine> {
        lines.iter().filter(|l| self.matches_selection(l)).cloned().collect()
    }

    /// Applies every filter, including `loss_only`.
    pub fn apply(&self, lines: &[SalesLine]) -> Vec<SalesLine> {
        lines.iter().filter(|l| self.matches(l)).cloned().collect()
    }
}
