use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One normalized row of a sales export.
///
/// Monetary values and quantities are fixed-point decimals. `quantity` may be
/// negative for returns. Everything after `profit` is optional and stays `None`
/// when the source export does not carry the column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesLine {
    pub description: String,
    pub section: Option<String>,
    pub group: Option<String>,
    pub quantity: Decimal,
    pub unit_gross_value: Decimal,
    pub managerial_cost: Decimal,
    pub net_total_value: Decimal,
    pub profit: Decimal,
    pub payment_method: Option<String>,
    pub operator_name: Option<String>,
    pub cash_register_id: Option<String>,
    pub movement_date: Option<NaiveDate>,
    pub product_code: Option<String>,
    /// Fiscal (invoice) unit cost, distinct from the managerial cost.
    pub invoice_cost: Option<Decimal>,
}

impl SalesLine {
    /// Creates a line with only the required fields set.
    pub fn new(
        description: impl Into<String>,
        quantity: Decimal,
        unit_gross_value: Decimal,
        managerial_cost: Decimal,
        net_total_value: Decimal,
        profit: Decimal,
    ) -> Self {
        Self {
            description: description.into(),
            section: None,
            group: None,
            quantity,
            unit_gross_value,
            managerial_cost,
            net_total_value,
            profit,
            payment_method: None,
            operator_name: None,
            cash_register_id: None,
            movement_date: None,
            product_code: None,
            invoice_cost: None,
        }
    }

    pub fn with_section(mut self, section: impl Into<String>) -> Self {
        self.section = Some(section.into());
        self
    }

    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    pub fn with_payment_method(mut self, payment_method: impl Into<String>) -> Self {
        self.payment_method = Some(payment_method.into());
        self
    }

    pub fn with_operator(mut self, operator_name: impl Into<String>) -> Self {
        self.operator_name = Some(operator_name.into());
        self
    }
}

/// One row of a cash-register movement export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentMovement {
    pub payment_method: String,
    pub operator_name: String,
    pub cash_register_id: Option<String>,
    pub movement_date: Option<NaiveDate>,
}
