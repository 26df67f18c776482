use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod logging;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use error::ConfigError;
pub use logging::init_tracing;
pub use settings::{
    AbcCutoffs, ColumnAlias, ColumnsConfig, Config, InsightThresholds, LoggingConfig,
    OutputFormat, ReportConfig,
};

/// Prefix for environment overrides, e.g. `SALESIGHT__REPORT__TOP_N=20`.
pub const ENV_PREFIX: &str = "SALESIGHT";

/// Loads the engine configuration.
///
/// Sources are layered in increasing priority: built-in defaults, an optional
/// `salesight.toml` in the working directory, the explicit `path` (which must
/// exist when given), and finally `SALESIGHT__*` environment variables. The result
/// is validated before it is returned.
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let mut builder = config::Config::builder()
        .add_source(config::File::with_name("salesight").required(false));

    if let Some(path) = path {
        builder = builder.add_source(config::File::from(path).required(true));
    }

    let settings = builder
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__"),
        )
        .build()?;

    // Attempt to deserialize the entire configuration into our `Config` struct
    let config = settings.try_deserialize::<Config>()?;
    config.validate()?;

    tracing::debug!(
        aliases = config.columns.aliases.len(),
        drop = config.columns.drop.len(),
        "Configuration loaded."
    );
    Ok(config)
}
