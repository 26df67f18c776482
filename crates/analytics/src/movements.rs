//! Counts over cashier payment movements.

use core_types::PaymentMovement;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CountEntry {
    pub key: String,
    pub count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovementStats {
    pub total_movements: usize,
    pub by_operator: Vec<CountEntry>,
    /// Excludes the change label (cash handed back to the customer).
    pub by_payment_method: Vec<CountEntry>,
    pub by_cash_register: Vec<CountEntry>,
    pub highlighted_payment_method: String,
    /// Operator counts restricted to `highlighted_payment_method`.
    pub highlighted_by_operator: Vec<CountEntry>,
}

/// Counts keys, most frequent first. Ties keep first-encountered order.
fn count_desc<'a>(keys: impl Iterator<Item = &'a str>) -> Vec<CountEntry> {
    let mut positions: HashMap<&str, usize> = HashMap::new();
    let mut counts: Vec<CountEntry> = Vec::new();
    for key in keys {
        match positions.get(key) {
            Some(&i) => counts[i].count += 1,
            None => {
                positions.insert(key, counts.len());
                counts.push(CountEntry {
                    key: key.to_string(),
                    count: 1,
                });
            }
        }
    }
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts
}

/// Builds the movement counts.
///
/// `change_label` and `highlighted` are compared case-insensitively after
/// trimming, since register exports are not consistent about casing.
pub fn movement_stats(
    movements: &[PaymentMovement],
    change_label: &str,
    highlighted: &str,
) -> MovementStats {
    let same = |a: &str, b: &str| a.trim().eq_ignore_ascii_case(b.trim());

    let stats = MovementStats {
        total_movements: movements.len(),
        by_operator: count_desc(movements.iter().map(|m| m.operator_name.as_str())),
        by_payment_method: count_desc(
            movements
                .iter()
                .map(|m| m.payment_method.as_str())
                .filter(|p| !same(p, change_label)),
        ),
        by_cash_register: count_desc(
            movements
                .iter()
                .filter_map(|m| m.cash_register_id.as_deref()),
        ),
        highlighted_payment_method: highlighted.to_string(),
        highlighted_by_operator: count_desc(
            movements
                .iter()
                .filter(|m| same(&m.payment_method, highlighted))
                .map(|m| m.operator_name.as_str()),
        ),
    };
    tracing::debug!(
        total = stats.total_movements,
        operators = stats.by_operator.len(),
        methods = stats.by_payment_method.len(),
        "Movement statistics computed."
    );
    stats
}
