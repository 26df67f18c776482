use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The canonical columns a normalized sales or movement export can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CanonicalField {
    Description,
    Section,
    Group,
    Quantity,
    UnitGrossValue,
    ManagerialCost,
    NetTotalValue,
    Profit,
    PaymentMethod,
    OperatorName,
    CashRegisterId,
    MovementDate,
    ProductCode,
    InvoiceCost,
}

impl CanonicalField {
    pub const ALL: [CanonicalField; 14] = [
        CanonicalField::Description,
        CanonicalField::Section,
        CanonicalField::Group,
        CanonicalField::Quantity,
        CanonicalField::UnitGrossValue,
        CanonicalField::ManagerialCost,
        CanonicalField::NetTotalValue,
        CanonicalField::Profit,
        CanonicalField::PaymentMethod,
        CanonicalField::OperatorName,
        CanonicalField::CashRegisterId,
        CanonicalField::MovementDate,
        CanonicalField::ProductCode,
        CanonicalField::InvoiceCost,
    ];

    /// Fields a sales export must provide after column renaming.
    pub const REQUIRED_FOR_SALES: [CanonicalField; 6] = [
        CanonicalField::Description,
        CanonicalField::Quantity,
        CanonicalField::UnitGrossValue,
        CanonicalField::ManagerialCost,
        CanonicalField::NetTotalValue,
        CanonicalField::Profit,
    ];

    /// Fields a cash-register movement export must provide.
    pub const REQUIRED_FOR_MOVEMENTS: [CanonicalField; 2] =
        [CanonicalField::PaymentMethod, CanonicalField::OperatorName];

    /// The camelCase name used on the wire and accepted as a column header.
    pub fn as_str(&self) -> &'static str {
        match self {
            CanonicalField::Description => "description",
            CanonicalField::Section => "section",
            CanonicalField::Group => "group",
            CanonicalField::Quantity => "quantity",
            CanonicalField::UnitGrossValue => "unitGrossValue",
            CanonicalField::ManagerialCost => "managerialCost",
            CanonicalField::NetTotalValue => "netTotalValue",
            CanonicalField::Profit => "profit",
            CanonicalField::PaymentMethod => "paymentMethod",
            CanonicalField::OperatorName => "operatorName",
            CanonicalField::CashRegisterId => "cashRegisterId",
            CanonicalField::MovementDate => "movementDate",
            CanonicalField::ProductCode => "productCode",
            CanonicalField::InvoiceCost => "invoiceCost",
        }
    }
}

impl fmt::Display for CanonicalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Revenue tier on the ABC curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AbcClass {
    A,
    B,
    C,
}

impl fmt::Display for AbcClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            AbcClass::A => "A",
            AbcClass::B => "B",
            AbcClass::C => "C",
        };
        f.write_str(label)
    }
}

/// Position of a product in the revenue/margin portfolio matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QuadrantCategory {
    Star,
    CashCow,
    Opportunity,
    Problem,
}

impl QuadrantCategory {
    /// Maps the two "at or above median" checks onto a category.
    pub fn from_position(high_revenue: bool, high_margin: bool) -> Self {
        match (high_revenue, high_margin) {
            (true, true) => QuadrantCategory::Star,
            (true, false) => QuadrantCategory::CashCow,
            (false, true) => QuadrantCategory::Opportunity,
            (false, false) => QuadrantCategory::Problem,
        }
    }
}

impl fmt::Display for QuadrantCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            QuadrantCategory::Star => "Star",
            QuadrantCategory::CashCow => "Cash Cow",
            QuadrantCategory::Opportunity => "Opportunity",
            QuadrantCategory::Problem => "Problem",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LineStatus {
    Loss,
    Healthy,
}

impl fmt::Display for LineStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LineStatus::Loss => f.write_str("Loss"),
            LineStatus::Healthy => f.write_str("Healthy"),
        }
    }
}

/// Severity attached to a generated insight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Severity {
    Warning,
    Critical,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => f.write_str("warning"),
            Severity::Critical => f.write_str("critical"),
        }
    }
}

/// A categorical column sales lines can be rolled up by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Dimension {
    Section,
    Group,
    PaymentMethod,
    OperatorName,
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Dimension::Section => "section",
            Dimension::Group => "group",
            Dimension::PaymentMethod => "payment-method",
            Dimension::OperatorName => "operator",
        };
        f.write_str(label)
    }
}

impl FromStr for Dimension {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "section" => Ok(Dimension::Section),
            "group" => Ok(Dimension::Group),
            "payment-method" | "paymentmethod" | "payment" => Ok(Dimension::PaymentMethod),
            "operator" | "operator-name" | "operatorname" => Ok(Dimension::OperatorName),
            other => Err(CoreError::InvalidInput(
                "dimension".to_string(),
                format!("'{other}' (expected section, group, payment-method or operator)"),
            )),
        }
    }
}

/// A per-line numeric quantity that can be summed or averaged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LineMetric {
    /// Net total value of the line.
    Revenue,
    Profit,
    Quantity,
    UnitMargin,
    LineLoss,
}

impl fmt::Display for LineMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            LineMetric::Revenue => "revenue",
            LineMetric::Profit => "profit",
            LineMetric::Quantity => "quantity",
            LineMetric::UnitMargin => "unit-margin",
            LineMetric::LineLoss => "line-loss",
        };
        f.write_str(label)
    }
}

impl FromStr for LineMetric {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "revenue" => Ok(LineMetric::Revenue),
            "profit" => Ok(LineMetric::Profit),
            "quantity" => Ok(LineMetric::Quantity),
            "unit-margin" | "margin" => Ok(LineMetric::UnitMargin),
            "line-loss" | "loss" => Ok(LineMetric::LineLoss),
            other => Err(CoreError::InvalidInput(
                "metric".to_string(),
                format!("'{other}' (expected revenue, profit, quantity, unit-margin or line-loss)"),
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortOrder {
    Ascending,
    Descending,
}

/// How grouped values are combined before ranking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Aggregation {
    Sum,
    Mean,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quadrant_positions_cover_all_combinations() {
        assert_eq!(QuadrantCategory::from_position(true, true), QuadrantCategory::Star);
        assert_eq!(QuadrantCategory::from_position(true, false), QuadrantCategory::CashCow);
        assert_eq!(QuadrantCategory::from_position(false, true), QuadrantCategory::Opportunity);
        assert_eq!(QuadrantCategory::from_position(false, false), QuadrantCategory::Problem);
    }

    #[test]
    fn dimension_parses_cli_spellings() {
        assert_eq!("section".parse::<Dimension>().unwrap(), Dimension::Section);
        assert_eq!("Payment_Method".parse::<Dimension>().unwrap(), Dimension::PaymentMethod);
        assert_eq!("operator".parse::<Dimension>().unwrap(), Dimension::OperatorName);
        assert!("store".parse::<Dimension>().is_err());
    }

    #[test]
    fn metric_parses_aliases() {
        assert_eq!("line_loss".parse::<LineMetric>().unwrap(), LineMetric::LineLoss);
        assert_eq!("margin".parse::<LineMetric>().unwrap(), LineMetric::UnitMargin);
        assert!("markup".parse::<LineMetric>().is_err());
    }

    #[test]
    fn canonical_field_serializes_as_camel_case() {
        let json = serde_json::to_string(&CanonicalField::NetTotalValue).unwrap();
        assert_eq!(json, "\"netTotalValue\"");
        for field in CanonicalField::ALL {
            let encoded = serde_json::to_string(&field).unwrap();
            assert_eq!(encoded.trim_matches('"'), field.as_str());
        }
    }
}
