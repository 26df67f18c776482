use crate::error::{CellIssue, DataQualityError, Result, SchemaError};
use crate::parse::{parse_date, parse_decimal};
use crate::table::{RawCell, RawTable};
use chrono::NaiveDate;
use configuration::ColumnsConfig;
use core_types::{CanonicalField, PaymentMovement, SalesLine};
use rust_decimal::Decimal;
use std::collections::{HashMap, HashSet};

/// Where each canonical field lives in a particular raw table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnMap {
    indices: HashMap<CanonicalField, usize>,
}

impl ColumnMap {
    pub fn get(&self, field: CanonicalField) -> Option<usize> {
        self.indices.get(&field).copied()
    }

    pub fn contains(&self, field: CanonicalField) -> bool {
        self.indices.contains_key(&field)
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Fails with every required field that is not mapped.
    pub fn require(&self, required: &[CanonicalField]) -> std::result::Result<(), SchemaError> {
        let missing: Vec<CanonicalField> = required
            .iter()
            .copied()
            .filter(|f| !self.contains(*f))
            .collect();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(SchemaError::MissingFields(missing))
        }
    }
}

/// Maps raw export columns onto the canonical schema and types every cell.
///
/// Header lookups are case-insensitive. Columns on the drop list are removed
/// first, then the rename table is applied; anything left unmapped is ignored.
/// Canonical field names are always accepted as their own alias.
#[derive(Debug, Clone)]
pub struct Normalizer {
    aliases: HashMap<String, CanonicalField>,
    drop: HashSet<String>,
    blank_numeric_as_zero: bool,
}

fn header_key(header: &str) -> String {
    header.trim().to_lowercase()
}

impl Normalizer {
    pub fn new(config: &ColumnsConfig) -> Self {
        let mut aliases = HashMap::new();
        for alias in &config.aliases {
            aliases.entry(header_key(&alias.source)).or_insert(alias.field);
        }
        for field in CanonicalField::ALL {
            aliases.entry(header_key(field.as_str())).or_insert(field);
        }

        Self {
            aliases,
            drop: config.drop.iter().map(|c| header_key(c)).collect(),
            blank_numeric_as_zero: config.blank_numeric_as_zero,
        }
    }

    /// Resolves the header row into a column map.
    pub fn resolve_columns(
        &self,
        headers: &[String],
    ) -> std::result::Result<ColumnMap, SchemaError> {
        let mut map = ColumnMap::default();
        let mut ignored = Vec::new();

        for (index, header) in headers.iter().enumerate() {
            let key = header_key(header);
            if self.drop.contains(&key) {
                continue;
            }
            let Some(&field) = self.aliases.get(&key) else {
                ignored.push(header.as_str());
                continue;
            };
            if let Some(&first) = map.indices.get(&field) {
                return Err(SchemaError::AmbiguousColumn {
                    field,
                    first: headers[first].clone(),
                    second: header.clone(),
                });
            }
            map.indices.insert(field, index);
        }

        if !ignored.is_empty() {
            tracing::debug!(columns = ?ignored, "Ignoring unmapped columns.");
        }
        Ok(map)
    }

    /// Converts a raw sales export into canonical lines, preserving row order.
    ///
    /// Rows whose cells are all blank are skipped. Any malformed cell fails the
    /// whole call with a `DataQualityError` listing every offending cell.
    pub fn normalize_sales(&self, table: &RawTable) -> Result<Vec<SalesLine>> {
        use CanonicalField::*;

        let columns = self.resolve_columns(&table.headers)?;
        columns.require(&CanonicalField::REQUIRED_FOR_SALES)?;

        let mut issues = Vec::new();
        let mut lines = Vec::with_capacity(table.len());

        for row in 0..table.len() {
            if is_blank_row(table, row) {
                continue;
            }
            let mut cells = RowCells {
                table,
                row,
                columns: &columns,
                issues: &mut issues,
                blank_numeric_as_zero: self.blank_numeric_as_zero,
            };
            lines.push(SalesLine {
                description: cells.required_text(Description),
                section: cells.optional_text(Section),
                group: cells.optional_text(Group),
                quantity: cells.required_decimal(Quantity),
                unit_gross_value: cells.required_decimal(UnitGrossValue),
                managerial_cost: cells.required_decimal(ManagerialCost),
                net_total_value: cells.required_decimal(NetTotalValue),
                profit: cells.required_decimal(Profit),
                payment_method: cells.optional_text(PaymentMethod),
                operator_name: cells.optional_text(OperatorName),
                cash_register_id: cells.optional_text(CashRegisterId),
                movement_date: cells.optional_date(MovementDate),
                product_code: cells.optional_text(ProductCode),
                invoice_cost: cells.optional_decimal(InvoiceCost),
            });
        }

        if !issues.is_empty() {
            tracing::warn!(invalid_cells = issues.len(), "Sales export failed validation.");
            return Err(DataQualityError { issues }.into());
        }

        tracing::info!(rows = lines.len(), columns = columns.len(), "Normalized sales lines.");
        Ok(lines)
    }

    /// Converts a raw cash-register movement export, preserving row order.
    pub fn normalize_movements(&self, table: &RawTable) -> Result<Vec<PaymentMovement>> {
        use CanonicalField::*;

        let columns = self.resolve_columns(&table.headers)?;
        columns.require(&CanonicalField::REQUIRED_FOR_MOVEMENTS)?;

        let mut issues = Vec::new();
        let mut movements = Vec::with_capacity(table.len());

        for row in 0..table.len() {
            if is_blank_row(table, row) {
                continue;
            }
            let mut cells = RowCells {
                table,
                row,
                columns: &columns,
                issues: &mut issues,
                blank_numeric_as_zero: self.blank_numeric_as_zero,
            };
            movements.push(PaymentMovement {
                payment_method: cells.required_text(PaymentMethod),
                operator_name: cells.required_text(OperatorName),
                cash_register_id: cells.optional_text(CashRegisterId),
                movement_date: cells.optional_date(MovementDate),
            });
        }

        if !issues.is_empty() {
            tracing::warn!(invalid_cells = issues.len(), "Movement export failed validation.");
            return Err(DataQualityError { issues }.into());
        }

        tracing::info!(rows = movements.len(), "Normalized payment movements.");
        Ok(movements)
    }
}

fn is_blank_row(table: &RawTable, row: usize) -> bool {
    table.rows[row].iter().all(RawCell::is_empty)
}

/// Typed access to one row. Failures are pushed to `issues` and a placeholder
/// is returned; callers discard the rows whenever `issues` is non-empty.
struct RowCells<'a> {
    table: &'a RawTable,
    row: usize,
    columns: &'a ColumnMap,
    issues: &'a mut Vec<CellIssue>,
    blank_numeric_as_zero: bool,
}

impl RowCells<'_> {
    fn cell(&self, field: CanonicalField) -> Option<&RawCell> {
        self.columns
            .get(field)
            .map(|column| self.table.cell(self.row, column))
    }

    fn report(&mut self, field: CanonicalField, cell: &RawCell, reason: String) {
        self.issues.push(CellIssue {
            row: self.row + 1,
            field,
            value: cell.display_text(),
            reason,
        });
    }

    fn required_text(&mut self, field: CanonicalField) -> String {
        match self.cell(field).cloned() {
            Some(cell) if !cell.is_empty() => cell.display_text(),
            Some(cell) => {
                self.report(field, &cell, "value is blank".to_string());
                String::new()
            }
            None => String::new(),
        }
    }

    fn optional_text(&self, field: CanonicalField) -> Option<String> {
        self.cell(field)
            .filter(|cell| !cell.is_empty())
            .map(RawCell::display_text)
    }

    fn required_decimal(&mut self, field: CanonicalField) -> Decimal {
        let Some(cell) = self.cell(field).cloned() else {
            return Decimal::ZERO;
        };
        if cell.is_empty() && self.blank_numeric_as_zero {
            return Decimal::ZERO;
        }
        match parse_decimal(&cell) {
            Ok(value) => value,
            Err(reason) => {
                self.report(field, &cell, reason);
                Decimal::ZERO
            }
        }
    }

    fn optional_decimal(&mut self, field: CanonicalField) -> Option<Decimal> {
        let cell = self.cell(field).filter(|c| !c.is_empty()).cloned()?;
        match parse_decimal(&cell) {
            Ok(value) => Some(value),
            Err(reason) => {
                self.report(field, &cell, reason);
                None
            }
        }
    }

    fn optional_date(&mut self, field: CanonicalField) -> Option<NaiveDate> {
        let cell = self.cell(field).filter(|c| !c.is_empty()).cloned()?;
        match parse_date(&cell) {
            Ok(date) => Some(date),
            Err(reason) => {
                self.report(field, &cell, reason);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::IngestError;
    use rust_decimal_macros::dec;

    const SALES_HEADERS: [&str; 11] = [
        "IDSUBPRODUTO",
        "DESCRICAO",
        "DESCRSECAO",
        "DESCRGRUPO",
        "QTDPRODUTO",
        "VALUNITBRUTO",
        "CUSTOGERENCIAL",
        "VALTOTLIQUIDO",
        "LUCRO",
        "ESTOQUE",
        "CUSTONOTAFISCAL",
    ];

    const REQUIRED_HEADERS: [&str; 6] = [
        "DESCRICAO",
        "QTDPRODUTO",
        "VALUNITBRUTO",
        "CUSTOGERENCIAL",
        "VALTOTLIQUIDO",
        "LUCRO",
    ];

    fn normalizer() -> Normalizer {
        Normalizer::new(&ColumnsConfig::default())
    }

    #[test]
    fn renames_drops_and_types_sales_columns() {
        let table = RawTable::from_strings(
            &SALES_HEADERS,
            &[
                &[
                    "1", "Arroz 5kg", "Mercearia", "Graos", "2", "25.90", "20", "51.80", "11.80",
                    "7", "19.5",
                ],
                &[
                    "2", "Detergente", "Limpeza", "", "-1", "3.50", "4", "-3.50", "0.50", "1", "",
                ],
            ],
        );

        let lines = normalizer().normalize_sales(&table).unwrap();

        assert_eq!(lines.len(), 2);
        let first = &lines[0];
        assert_eq!(first.description, "Arroz 5kg");
        assert_eq!(first.section.as_deref(), Some("Mercearia"));
        assert_eq!(first.group.as_deref(), Some("Graos"));
        assert_eq!(first.quantity, dec!(2));
        assert_eq!(first.unit_gross_value, dec!(25.90));
        assert_eq!(first.managerial_cost, dec!(20));
        assert_eq!(first.net_total_value, dec!(51.80));
        assert_eq!(first.profit, dec!(11.80));
        assert_eq!(first.invoice_cost, Some(dec!(19.5)));
        assert!(first.payment_method.is_none());

        let second = &lines[1];
        assert_eq!(second.description, "Detergente");
        assert!(second.group.is_none());
        assert_eq!(second.quantity, dec!(-1));
        assert!(second.invoice_cost.is_none());
    }

    #[test]
    fn header_matching_ignores_case_and_accepts_canonical_names() {
        let table = RawTable::from_strings(
            &[
                "descricao",
                "quantity",
                "UNITGROSSVALUE",
                "managerialCost",
                "netTotalValue",
                " lucro ",
            ],
            &[&["Cafe", "1", "10", "8", "10", "2"]],
        );

        let lines = normalizer().normalize_sales(&table).unwrap();
        assert_eq!(lines[0].description, "Cafe");
        assert_eq!(lines[0].profit, dec!(2));
    }

    #[test]
    fn absent_drop_columns_are_not_an_error() {
        let mut config = ColumnsConfig::default();
        config.drop.push("COLUNA_INEXISTENTE".to_string());
        let table = RawTable::from_strings(
            &REQUIRED_HEADERS,
            &[&["Cafe", "1", "10", "8", "10", "2"]],
        );

        assert_eq!(Normalizer::new(&config).normalize_sales(&table).unwrap().len(), 1);
    }

    #[test]
    fn dropped_column_wins_over_alias() {
        let mut config = ColumnsConfig::default();
        config.drop.push("LUCRO".to_string());
        let table = RawTable::from_strings(
            &REQUIRED_HEADERS,
            &[&["Cafe", "1", "10", "8", "10", "2"]],
        );

        let err = Normalizer::new(&config).normalize_sales(&table).unwrap_err();
        match err {
            IngestError::Schema(SchemaError::MissingFields(fields)) => {
                assert_eq!(fields, vec![CanonicalField::Profit]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn missing_required_columns_are_all_reported() {
        let table = RawTable::from_strings(&["DESCRICAO", "QTDPRODUTO"], &[&["Cafe", "1"]]);

        let err = normalizer().normalize_sales(&table).unwrap_err();
        match err {
            IngestError::Schema(SchemaError::MissingFields(fields)) => {
                assert_eq!(
                    fields,
                    vec![
                        CanonicalField::UnitGrossValue,
                        CanonicalField::ManagerialCost,
                        CanonicalField::NetTotalValue,
                        CanonicalField::Profit,
                    ]
                );
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn two_columns_for_one_field_is_ambiguous() {
        let table = RawTable::from_strings(&["DESCRICAO", "description"], &[]);

        let err = normalizer().resolve_columns(&table.headers).unwrap_err();
        assert_eq!(
            err,
            SchemaError::AmbiguousColumn {
                field: CanonicalField::Description,
                first: "DESCRICAO".to_string(),
                second: "description".to_string(),
            }
        );
    }

    #[test]
    fn malformed_numbers_are_reported_not_zeroed() {
        let table = RawTable::from_strings(
            &REQUIRED_HEADERS,
            &[
                &["Cafe", "1", "10", "8", "10", "2"],
                &["Leite", "dois", "4", "3", "8", "x"],
                &["Pao", "3", "", "1", "3", "2"],
            ],
        );

        let err = normalizer().normalize_sales(&table).unwrap_err();
        let IngestError::DataQuality(quality) = err else {
            panic!("expected a data quality error");
        };
        assert_eq!(quality.issues.len(), 3);
        assert_eq!(quality.issues[0].row, 2);
        assert_eq!(quality.issues[0].field, CanonicalField::Quantity);
        assert_eq!(quality.issues[0].value, "dois");
        assert_eq!(quality.issues[1].field, CanonicalField::Profit);
        assert_eq!(quality.issues[2].row, 3);
        assert_eq!(quality.issues[2].field, CanonicalField::UnitGrossValue);
    }

    #[test]
    fn blank_numbers_can_be_configured_as_zero() {
        let mut config = ColumnsConfig::default();
        config.blank_numeric_as_zero = true;
        let table = RawTable::from_strings(
            &REQUIRED_HEADERS,
            &[&["Pao", "3", "", "1", "3", "2"]],
        );

        let lines = Normalizer::new(&config).normalize_sales(&table).unwrap();
        assert_eq!(lines[0].unit_gross_value, Decimal::ZERO);
    }

    #[test]
    fn blank_rows_are_skipped_and_order_is_preserved() {
        let table = RawTable::from_strings(
            &REQUIRED_HEADERS,
            &[
                &["Zeta", "1", "1", "1", "1", "0"],
                &["", "", "", "", "", ""],
                &["Alfa", "1", "1", "1", "1", "0"],
            ],
        );

        let lines = normalizer().normalize_sales(&table).unwrap();
        let names: Vec<&str> = lines.iter().map(|l| l.description.as_str()).collect();
        assert_eq!(names, vec!["Zeta", "Alfa"]);
    }

    #[test]
    fn normalizes_movement_exports() {
        let table = RawTable::from_strings(
            &[
                "idcaixa",
                "idempresa",
                "descrrecebimento",
                "dtmovimento",
                "nomeusuario",
                "vallancamento",
            ],
            &[
                &["9", "3", "PIX TEF", "2024-03-15", "ANA", "10.00"],
                &["9", "", "DINHEIRO", "", "BRUNO", "5.00"],
            ],
        );

        let movements = normalizer().normalize_movements(&table).unwrap();
        assert_eq!(movements.len(), 2);
        assert_eq!(movements[0].cash_register_id.as_deref(), Some("3"));
        assert_eq!(movements[0].payment_method, "PIX TEF");
        assert_eq!(movements[0].movement_date, NaiveDate::from_ymd_opt(2024, 3, 15));
        assert!(movements[1].cash_register_id.is_none());
        assert!(movements[1].movement_date.is_none());
    }

    #[test]
    fn malformed_movement_dates_are_reported() {
        let table = RawTable::from_strings(
            &["descrrecebimento", "dtmovimento", "nomeusuario"],
            &[&["PIX TEF", "ontem", "ANA"]],
        );

        let err = normalizer().normalize_movements(&table).unwrap_err();
        assert!(matches!(err, IngestError::DataQuality(_)));
    }
}
