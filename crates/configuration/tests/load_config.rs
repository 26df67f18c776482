use configuration::{ConfigError, OutputFormat, load_config};
use core_types::CanonicalField;
use rust_decimal_macros::dec;
use std::io::Write;

fn write_toml(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(".toml")
        .tempfile()
        .expect("create temp config");
    file.write_all(contents.as_bytes()).expect("write temp config");
    file
}

#[test]
fn file_values_override_defaults() {
    let file = write_toml(
        r#"
[abc]
class_a_max_pct = 70
class_b_max_pct = 90.5

[insights]
min_margin_pct = 12

[report]
top_n = 3
format = "json"

[columns]
csv_delimiter = ";"
aliases = [
    { source = "Produto", field = "description" },
    { source = "Venda", field = "netTotalValue" },
]
"#,
    );

    let config = load_config(Some(file.path())).expect("load config");

    assert_eq!(config.abc.class_a_max_pct, dec!(70));
    assert_eq!(config.abc.class_b_max_pct, dec!(90.5));
    assert_eq!(config.insights.min_margin_pct, dec!(12));
    // Untouched keys in a touched section keep their defaults.
    assert_eq!(config.insights.max_concentration_pct, dec!(50));
    assert_eq!(config.report.top_n, 3);
    assert_eq!(config.report.format, OutputFormat::Json);
    assert_eq!(config.columns.delimiter_byte(), b';');
    assert_eq!(config.columns.aliases.len(), 2);
    assert_eq!(config.columns.aliases[1].field, CanonicalField::NetTotalValue);
    // The drop list was not supplied, so the stock one survives.
    assert!(config.columns.drop.iter().any(|c| c == "REFERENCIA"));
}

#[test]
fn invalid_file_values_fail_validation() {
    let file = write_toml(
        r#"
[abc]
class_a_max_pct = 99
class_b_max_pct = 95
"#,
    );

    let err = load_config(Some(file.path())).unwrap_err();
    assert!(matches!(err, ConfigError::ValidationError(_)));
}

#[test]
fn missing_explicit_file_is_an_error() {
    let err = load_config(Some(std::path::Path::new("/nonexistent/salesight.toml"))).unwrap_err();
    assert!(matches!(err, ConfigError::LoadError(_)));
}
