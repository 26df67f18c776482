//! Per-line formulas and plain sums. Every other module derives from these.
//!
//! Arithmetic saturates at `Decimal::MAX`/`Decimal::MIN` instead of panicking;
//! a saturated result is logged at `warn` level.

use core_types::{LineMetric, SalesLine};
use rust_decimal::Decimal;

/// Sums decimals, saturating on overflow.
pub fn saturating_sum(values: impl IntoIterator<Item = Decimal>) -> Decimal {
    let mut overflowed = false;
    let total = values
        .into_iter()
        .fold(Decimal::ZERO, |acc, value| match acc.checked_add(value) {
            Some(sum) => sum,
            None => {
                overflowed = true;
                acc.saturating_add(value)
            }
        });
    if overflowed {
        tracing::warn!(%total, "Decimal overflow while summing; total saturated.");
    }
    total
}

/// `part / whole × 100`, saturating on overflow. `whole` must be non-zero.
pub fn percent_of(part: Decimal, whole: Decimal) -> Decimal {
    part.checked_div(whole)
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .unwrap_or_else(|| {
            let saturated = if part.is_sign_negative() == whole.is_sign_negative() {
                Decimal::MAX
            } else {
                Decimal::MIN
            };
            tracing::warn!(%part, %whole, "Decimal overflow in percentage; result saturated.");
            saturated
        })
}

/// Sum of `netTotalValue`. Zero for an empty slice.
pub fn total_revenue(lines: &[SalesLine]) -> Decimal {
    saturating_sum(lines.iter().map(|l| l.net_total_value))
}

pub fn total_profit(lines: &[SalesLine]) -> Decimal {
    saturating_sum(lines.iter().map(|l| l.profit))
}

pub fn total_quantity(lines: &[SalesLine]) -> Decimal {
    saturating_sum(lines.iter().map(|l| l.quantity))
}

/// `profit / revenue × 100`, or zero when revenue is not positive.
pub fn profitability_percent(revenue: Decimal, profit: Decimal) -> Decimal {
    if revenue > Decimal::ZERO {
        percent_of(profit, revenue)
    } else {
        tracing::debug!(%revenue, %profit, "Non-positive revenue; profitability falls back to 0.");
        Decimal::ZERO
    }
}

/// `profit / revenue × 100` for any non-zero revenue (negative revenue from
/// returns still yields a ratio); zero when revenue is exactly zero.
pub fn margin_percent(revenue: Decimal, profit: Decimal) -> Decimal {
    if revenue.is_zero() {
        Decimal::ZERO
    } else {
        percent_of(profit, revenue)
    }
}

pub fn unit_margin(line: &SalesLine) -> Decimal {
    line.unit_gross_value.saturating_sub(line.managerial_cost)
}

/// Unit margin times quantity. Negative values are value destroyed by the line.
pub fn line_loss(line: &SalesLine) -> Decimal {
    unit_margin(line).saturating_mul(line.quantity)
}

/// Gross unit price over managerial unit cost; `None` when the cost is zero.
pub fn markup(line: &SalesLine) -> Option<Decimal> {
    if line.managerial_cost.is_zero() {
        None
    } else {
        line.unit_gross_value.checked_div(line.managerial_cost)
    }
}

/// Sold below managerial cost. Equal price and cost is not a loss.
pub fn is_loss_line(line: &SalesLine) -> bool {
    line.unit_gross_value < line.managerial_cost
}

/// Lines sold below managerial cost, in input order.
pub fn loss_lines(lines: &[SalesLine]) -> Vec<SalesLine> {
    lines.iter().filter(|l| is_loss_line(l)).cloned().collect()
}

/// Reads a metric from a single line.
pub fn metric_value(line: &SalesLine, metric: LineMetric) -> Decimal {
    match metric {
        LineMetric::Revenue => line.net_total_value,
        LineMetric::Profit => line.profit,
        LineMetric::Quantity => line.quantity,
        LineMetric::UnitMargin => unit_margin(line),
        LineMetric::LineLoss => line_loss(line),
    }
}
