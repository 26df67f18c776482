use analytics::{
    SalesFilter, SalesMetricsEngine, aggregate_by, aggregate_products, loss_lines, movement_stats,
    rank_by,
};
use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use classifier::{AbcSummary, classify_abc, classify_quadrants, line_statuses};
use configuration::{Config, OutputFormat, load_config};
use core_types::{Aggregation, Dimension, LineMetric, SalesLine, SortOrder};
use insights::InsightGenerator;
use serde_json::json;
use std::path::{Path, PathBuf};

mod render;
mod report;

/// The main entry point for the Salesight command-line application.
fn main() -> anyhow::Result<()> {
    // A missing .env file is not an error.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = load_config(cli.config.as_deref()).context("Failed to load configuration")?;
    let _log_guard =
        configuration::init_tracing(&config.logging).context("Failed to initialize logging")?;

    let format = cli.format.unwrap_or(config.report.format);
    tracing::debug!(?format, "Configuration loaded.");

    match cli.command {
        Commands::Summary(args) => handle_summary(args, &config, format),
        Commands::Rank(args) => handle_rank(args, &config, format),
        Commands::Breakdown(args) => handle_breakdown(args, &config, format),
        Commands::Abc(args) => handle_abc(args, &config, format),
        Commands::Quadrants(args) => handle_quadrants(args, &config, format),
        Commands::Losses(args) => handle_losses(args, &config, format),
        Commands::Insights(args) => handle_insights(args, &config, format),
        Commands::Report(args) => handle_report(args, &config, format),
        Commands::Movements { input } => handle_movements(&input, &config, format),
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Sales metrics, ABC curve, strategic matrix and automatic insights for retail
/// sales exports.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to a TOML configuration file (layered over `salesight.toml`).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format. Defaults to the configured `report.format`.
    #[arg(long, value_enum, global = true)]
    format: Option<OutputFormat>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Totals, profitability, portfolio risk and concentration.
    Summary(SalesArgs),
    /// Rank products by a metric.
    Rank(RankArgs),
    /// Totals per section, group, payment method or operator.
    Breakdown(BreakdownArgs),
    /// Classify products on the cumulative revenue curve.
    Abc(SalesArgs),
    /// Place products in the revenue/margin matrix.
    Quadrants(SalesArgs),
    /// List lines sold below managerial cost.
    Losses(SalesArgs),
    /// Evaluate the automatic insight rules.
    Insights(SalesArgs),
    /// Run every analysis at once.
    Report(SalesArgs),
    /// Count cash-register movements by operator, payment method and register.
    Movements {
        /// A CSV or spreadsheet movement export.
        input: PathBuf,
    },
}

#[derive(Args)]
struct SalesArgs {
    /// A CSV or spreadsheet sales export.
    input: PathBuf,

    /// Keep only these product descriptions (repeatable).
    #[arg(long = "description")]
    descriptions: Vec<String>,

    /// Keep only these sections (repeatable).
    #[arg(long = "section")]
    sections: Vec<String>,

    /// Keep only these groups (repeatable).
    #[arg(long = "group")]
    groups: Vec<String>,

    /// Keep only lines sold below managerial cost.
    #[arg(long)]
    loss_only: bool,
}

impl SalesArgs {
    fn filter(&self) -> SalesFilter {
        SalesFilter {
            descriptions: self.descriptions.clone(),
            sections: self.sections.clone(),
            groups: self.groups.clone(),
            loss_only: self.loss_only,
        }
    }

    /// Loads the export and applies the filters, honoring `--loss-only`.
    fn load_filtered(&self, config: &Config) -> anyhow::Result<Vec<SalesLine>> {
        Ok(self.filter().apply(&load_lines(&self.input, config)?))
    }
}

#[derive(Args)]
struct RankArgs {
    #[command(flatten)]
    sales: SalesArgs,

    /// revenue, profit, quantity, unit-margin or line-loss.
    #[arg(long, default_value = "revenue")]
    metric: LineMetric,

    /// Rows to keep. Defaults to the configured `report.top_n`.
    #[arg(long)]
    top: Option<usize>,

    /// Lowest values first.
    #[arg(long)]
    ascending: bool,

    /// Average the metric per product instead of summing it.
    #[arg(long)]
    mean: bool,
}

#[derive(Args)]
struct BreakdownArgs {
    #[command(flatten)]
    sales: SalesArgs,

    /// section, group, payment-method or operator.
    #[arg(long)]
    by: Dimension,
}

// ==============================================================================
// Command Logic
// ==============================================================================

fn load_lines(input: &Path, config: &Config) -> anyhow::Result<Vec<SalesLine>> {
    let lines = ingest::load_sales(input, &config.columns)
        .with_context(|| format!("Failed to load sales export {}", input.display()))?;
    tracing::info!(lines = lines.len(), file = %input.display(), "Sales export loaded.");
    Ok(lines)
}

fn handle_summary(args: SalesArgs, config: &Config, format: OutputFormat) -> anyhow::Result<()> {
    let lines = args.filter().select(&load_lines(&args.input, config)?);
    let summary = SalesMetricsEngine::new(config.insights.concentration_top_n).summarize(&lines);
    match format {
        OutputFormat::Json => render::print_json(&summary),
        OutputFormat::Table => {
            println!("{}", render::summary_table(&summary));
            Ok(())
        }
    }
}

fn handle_rank(args: RankArgs, config: &Config, format: OutputFormat) -> anyhow::Result<()> {
    let lines = args.sales.load_filtered(config)?;
    let order = if args.ascending { SortOrder::Ascending } else { SortOrder::Descending };
    let aggregation = if args.mean { Aggregation::Mean } else { Aggregation::Sum };
    let n = args.top.unwrap_or(config.report.top_n);
    let ranked = rank_by(&lines, args.metric, aggregation, n, order);
    match format {
        OutputFormat::Json => render::print_json(&ranked),
        OutputFormat::Table => {
            println!("{}", render::ranking_table(&args.metric.to_string(), &ranked));
            Ok(())
        }
    }
}

fn handle_breakdown(
    args: BreakdownArgs,
    config: &Config,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let lines = args.sales.load_filtered(config)?;
    let rows = aggregate_by(&lines, args.by, &report::BREAKDOWN_METRICS);
    if rows.is_empty() {
        tracing::warn!(dimension = %args.by, "No line carries a value for this dimension.");
    }
    match format {
        OutputFormat::Json => render::print_json(&rows),
        OutputFormat::Table => {
            println!("{}", render::breakdown_table(&rows, &report::BREAKDOWN_METRICS));
            Ok(())
        }
    }
}

fn handle_abc(args: SalesArgs, config: &Config, format: OutputFormat) -> anyhow::Result<()> {
    let lines = args.load_filtered(config)?;
    let entries = classify_abc(&aggregate_products(&lines), &config.abc);
    let summary = AbcSummary::from_entries(&entries);
    match format {
        OutputFormat::Json => {
            render::print_json(&json!({ "entries": entries, "summary": summary }))
        }
        OutputFormat::Table => {
            println!("{}", render::abc_table(&entries, config.report.abc_preview));
            println!("{}", render::abc_summary_table(&summary));
            Ok(())
        }
    }
}

fn handle_quadrants(args: SalesArgs, config: &Config, format: OutputFormat) -> anyhow::Result<()> {
    let lines = args.load_filtered(config)?;
    let analysis = classify_quadrants(&aggregate_products(&lines));
    match format {
        OutputFormat::Json => render::print_json(&analysis),
        OutputFormat::Table => {
            println!(
                "Median revenue {}, median margin {}",
                render::money(analysis.median_revenue),
                render::percent(analysis.median_margin_percent)
            );
            println!("{}", render::quadrant_table(&analysis));
            Ok(())
        }
    }
}

fn handle_losses(args: SalesArgs, config: &Config, format: OutputFormat) -> anyhow::Result<()> {
    let losses = loss_lines(&args.load_filtered(config)?);
    let entries = line_statuses(&losses);
    let largest = rank_by(
        &losses,
        LineMetric::UnitMargin,
        Aggregation::Mean,
        config.report.top_n,
        SortOrder::Ascending,
    );
    match format {
        OutputFormat::Json => {
            render::print_json(&json!({ "lines": entries, "largestUnitLosses": largest }))
        }
        OutputFormat::Table => {
            println!("{}", render::loss_table(&entries));
            println!("{}", render::ranking_table("Mean unit margin", &largest));
            Ok(())
        }
    }
}

fn handle_insights(args: SalesArgs, config: &Config, format: OutputFormat) -> anyhow::Result<()> {
    let lines = args.filter().select(&load_lines(&args.input, config)?);
    let summary = SalesMetricsEngine::new(config.insights.concentration_top_n).summarize(&lines);
    let insights = InsightGenerator::new(config.insights.clone()).evaluate_summary(&summary);
    match format {
        OutputFormat::Json => render::print_json(&insights),
        OutputFormat::Table => {
            render::print_insights(&insights);
            Ok(())
        }
    }
}

fn handle_report(args: SalesArgs, config: &Config, format: OutputFormat) -> anyhow::Result<()> {
    let lines = load_lines(&args.input, config)?;
    let report = report::build_report(&lines, &args.filter(), config);
    match format {
        OutputFormat::Json => render::print_json(&report),
        OutputFormat::Table => {
            render::print_report(&report, config.report.abc_preview);
            Ok(())
        }
    }
}

fn handle_movements(input: &Path, config: &Config, format: OutputFormat) -> anyhow::Result<()> {
    let movements = ingest::load_movements(input, &config.columns)
        .with_context(|| format!("Failed to load movement export {}", input.display()))?;
    tracing::info!(movements = movements.len(), file = %input.display(), "Movement export loaded.");

    let stats = movement_stats(
        &movements,
        &config.report.change_payment_label,
        &config.report.highlighted_payment_method,
    );
    match format {
        OutputFormat::Json => render::print_json(&stats),
        OutputFormat::Table => {
            render::print_movements(&stats);
            Ok(())
        }
    }
}
