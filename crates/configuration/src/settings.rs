use crate::error::ConfigError;
use core_types::CanonicalField;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;
use std::path::PathBuf;

/// The root configuration structure for the engine and its command-line front end.
///
/// Every section falls back to its `Default` when omitted, so an empty (or absent)
/// `salesight.toml` yields the stock point-of-sale export layout and thresholds.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub columns: ColumnsConfig,
    pub abc: AbcCutoffs,
    pub insights: InsightThresholds,
    pub report: ReportConfig,
    pub logging: LoggingConfig,
}

impl Config {
    /// Checks the cross-field rules serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.columns.validate()?;
        self.abc.validate()?;
        self.insights.validate()?;
        self.report.validate()
    }
}

/// Maps one source header onto a canonical field.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ColumnAlias {
    /// Header as it appears in the export. Matched case-insensitively.
    pub source: String,
    pub field: CanonicalField,
}

impl ColumnAlias {
    pub fn new(source: impl Into<String>, field: CanonicalField) -> Self {
        Self {
            source: source.into(),
            field,
        }
    }
}

/// Column handling for the normalizer.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ColumnsConfig {
    /// Rename table. Supplying it in a file replaces the built-in table entirely.
    pub aliases: Vec<ColumnAlias>,
    /// Headers removed before renaming. Absent headers are ignored.
    pub drop: Vec<String>,
    /// Treat blank required numeric cells as zero instead of reporting them.
    pub blank_numeric_as_zero: bool,
    /// Single-byte CSV field delimiter.
    pub csv_delimiter: String,
}

impl ColumnsConfig {
    /// The CSV delimiter as the byte the reader expects.
    pub fn delimiter_byte(&self) -> u8 {
        self.csv_delimiter.as_bytes().first().copied().unwrap_or(b',')
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.csv_delimiter.len() != 1 || !self.csv_delimiter.is_ascii() {
            return Err(ConfigError::ValidationError(format!(
                "columns.csv_delimiter must be a single ASCII character, got '{}'",
                self.csv_delimiter
            )));
        }
        if let Some(alias) = self.aliases.iter().find(|a| a.source.trim().is_empty()) {
            return Err(ConfigError::ValidationError(format!(
                "columns.aliases contains an empty source header for field '{}'",
                alias.field
            )));
        }
        Ok(())
    }
}

impl Default for ColumnsConfig {
    fn default() -> Self {
        use CanonicalField::*;
        let aliases = [
            // Managerial sales export.
            ("DESCRICAO", Description),
            ("QTDPRODUTO", Quantity),
            ("LUCRO", Profit),
            ("CUSTOGERENCIAL", ManagerialCost),
            ("CUSTONOTAFISCAL", InvoiceCost),
            ("VALTOTLIQUIDO", NetTotalValue),
            ("VALUNITBRUTO", UnitGrossValue),
            ("DESCRSECAO", Section),
            ("IDPRODUTO", ProductCode),
            ("DESCRGRUPO", Group),
            // Cash-register movement export.
            ("idempresa", CashRegisterId),
            ("descrrecebimento", PaymentMethod),
            ("dtmovimento", MovementDate),
            ("nomeusuario", OperatorName),
        ]
        .into_iter()
        .map(|(source, field)| ColumnAlias::new(source, field))
        .collect();

        let drop = [
            "IDSUBPRODUTO",
            "REFERENCIA",
            "IDSECAO",
            "IDSUBGRUPO",
            "idcaixa",
            "idusuario",
            "tipomovimento",
            "idabertura",
            "idrecebimento",
            "vallancamento",
            "valreforcocx",
            "tiporeforco",
        ]
        .into_iter()
        .map(String::from)
        .collect();

        Self {
            aliases,
            drop,
            blank_numeric_as_zero: false,
            csv_delimiter: ",".to_string(),
        }
    }
}

/// Upper bounds (inclusive) of the cumulative revenue share for classes A and B.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AbcCutoffs {
    pub class_a_max_pct: Decimal,
    pub class_b_max_pct: Decimal,
}

impl AbcCutoffs {
    fn validate(&self) -> Result<(), ConfigError> {
        let ordered = self.class_a_max_pct > Decimal::ZERO
            && self.class_a_max_pct <= self.class_b_max_pct
            && self.class_b_max_pct <= Decimal::ONE_HUNDRED;
        if !ordered {
            return Err(ConfigError::ValidationError(format!(
                "abc cutoffs must satisfy 0 < A ({}) <= B ({}) <= 100",
                self.class_a_max_pct, self.class_b_max_pct
            )));
        }
        Ok(())
    }
}

impl Default for AbcCutoffs {
    fn default() -> Self {
        Self {
            class_a_max_pct: dec!(80),
            class_b_max_pct: dec!(95),
        }
    }
}

/// Thresholds for the automatic insight rules.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct InsightThresholds {
    /// How many top-revenue products make up the concentration index.
    pub concentration_top_n: usize,
    /// Warn when the top products hold more than this share of revenue.
    pub max_concentration_pct: Decimal,
    /// Warn when more than this share of distinct products sells below cost.
    pub max_portfolio_risk_pct: Decimal,
    /// Warn when the overall margin drops below this percentage.
    pub min_margin_pct: Decimal,
    /// Flag value destruction when the summed negative line losses fall below this.
    pub value_destruction_floor: Decimal,
}

impl InsightThresholds {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.concentration_top_n == 0 {
            return Err(ConfigError::ValidationError(
                "insights.concentration_top_n must be greater than 0".to_string(),
            ));
        }
        let percentages = [
            ("max_concentration_pct", self.max_concentration_pct),
            ("max_portfolio_risk_pct", self.max_portfolio_risk_pct),
            ("min_margin_pct", self.min_margin_pct),
        ];
        for (name, value) in percentages {
            if value < Decimal::ZERO {
                return Err(ConfigError::ValidationError(format!(
                    "insights.{name} must not be negative, got {value}"
                )));
            }
        }
        Ok(())
    }
}

impl Default for InsightThresholds {
    fn default() -> Self {
        Self {
            concentration_top_n: 5,
            max_concentration_pct: dec!(50),
            max_portfolio_risk_pct: dec!(20),
            min_margin_pct: dec!(15),
            value_destruction_floor: Decimal::ZERO,
        }
    }
}

/// How results are printed by the command-line front end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

/// Sizes and labels used when assembling a report.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Rows in every top/bottom ranking.
    pub top_n: usize,
    /// Rows of the ABC curve shown in table output.
    pub abc_preview: usize,
    /// Payment method that represents change given back; excluded from payment counts.
    pub change_payment_label: String,
    /// Payment method broken down per operator in movement statistics.
    pub highlighted_payment_method: String,
    pub format: OutputFormat,
}

impl ReportConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.top_n == 0 {
            return Err(ConfigError::ValidationError(
                "report.top_n must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            top_n: 10,
            abc_preview: 30,
            change_payment_label: "TROCO".to_string(),
            highlighted_payment_method: "PIX TEF".to_string(),
            format: OutputFormat::Table,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive; `RUST_LOG` takes precedence.
    pub level: String,
    /// When set, logs are also written to a daily rolling file in this directory.
    pub directory: Option<PathBuf>,
    pub file_prefix: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            directory: None,
            file_prefix: "salesight.log".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_pass_validation() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn default_aliases_cover_every_required_sales_field() {
        let columns = ColumnsConfig::default();
        for field in CanonicalField::REQUIRED_FOR_SALES {
            assert!(
                columns.aliases.iter().any(|a| a.field == field),
                "no alias for {field}"
            );
        }
    }

    #[test]
    fn inverted_abc_cutoffs_are_rejected() {
        let mut config = Config::default();
        config.abc.class_a_max_pct = dec!(96);
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn multi_byte_delimiter_is_rejected() {
        let mut config = Config::default();
        config.columns.csv_delimiter = ";;".to_string();
        assert!(config.validate().is_err());
        config.columns.csv_delimiter = ";".to_string();
        assert!(config.validate().is_ok());
        assert_eq!(config.columns.delimiter_byte(), b';');
    }

    #[test]
    fn zero_top_n_is_rejected() {
        let mut config = Config::default();
        config.report.top_n = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.insights.concentration_top_n = 0;
        assert!(config.validate().is_err());
    }
}
