use analytics::format::format_currency;
use analytics::{AnalyticsError, CalculationRequest, CalculationResult, MetricValue, MetricsEngine};
use clap::{Parser, Subcommand};
use comfy_table::{presets::UTF8_FULL, Table};
use configuration::{Config, LoggingSettings, OutputFormat};
use dataset::{generate, write_csv_file, CsvSource, GeneratorSettings};
use futures::future::join_all;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

mod ask;

/// The main entry point for the sales metrics application.
#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    // Load environment overrides from a .env file, if there is one.
    dotenvy::dotenv().ok();

    // Parse command-line arguments
    let cli = Cli::parse();
    let config = configuration::load_config_from(&cli.config)?;
    let _log_guard = init_tracing(&config.logging)?;

    let engine = MetricsEngine::new().strict_periods(config.engine.strict_periods);

    // Execute the appropriate command
    match cli.command {
        Commands::Calculate(args) => Ok(handle_calculate(args, &engine, &config)),
        Commands::List { format } => {
            handle_list(&engine, format.unwrap_or(config.output.format))?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Report(args) => {
            handle_report(args, Arc::new(engine), &config).await?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Ask(args) => Ok(handle_ask(args, &engine, &config)),
        Commands::Generate(args) => {
            handle_generate(args, &config)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Business metrics over sales transaction data.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the configuration file. A missing file means built-in defaults.
    #[arg(long, global = true, default_value = "config.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Calculate a single metric.
    Calculate(CalculateArgs),
    /// List every available metric.
    List {
        #[arg(long, value_enum)]
        format: Option<OutputFormat>,
    },
    /// Calculate every metric at once and show a summary table.
    Report(ReportArgs),
    /// Answer a plain-English question by picking metrics from its keywords.
    Ask(AskArgs),
    /// Write a reproducible sample dataset.
    Generate(GenerateArgs),
}

#[derive(Parser)]
struct CalculateArgs {
    /// The metric to calculate (e.g. "total_revenue", "top_products").
    metric: String,

    /// Time filter: "all", Q1-Q4, a month name (e.g. "March") or a year.
    #[arg(long, default_value = "all")]
    period: String,

    /// Dimension to group by, overriding the metric's default (e.g. "region").
    #[arg(long)]
    group_by: Option<String>,

    /// Number of entries in rankings. Defaults to `engine.default_limit`.
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    limit: Option<u64>,

    /// Transaction CSV to read. Defaults to `data.source`.
    #[arg(long)]
    data: Option<PathBuf>,

    #[arg(long, value_enum)]
    format: Option<OutputFormat>,
}

#[derive(Parser)]
struct ReportArgs {
    #[arg(long, default_value = "all")]
    period: String,

    #[arg(long)]
    data: Option<PathBuf>,
}

#[derive(Parser)]
struct AskArgs {
    /// The question, e.g. "What are our top 10 products?"
    question: String,

    #[arg(long)]
    data: Option<PathBuf>,
}

#[derive(Parser)]
struct GenerateArgs {
    /// Number of transactions to generate.
    #[arg(long, default_value_t = 1000)]
    rows: usize,

    /// Random seed; the same seed always produces the same file.
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Calendar year the transactions fall in.
    #[arg(long, default_value_t = 2024)]
    year: i32,

    /// Where to write the CSV. Defaults to `data.source`.
    #[arg(long)]
    output: Option<PathBuf>,
}

// ==============================================================================
// Logging
// ==============================================================================

/// Installs the global subscriber. `RUST_LOG` wins over `logging.level`.
///
/// The returned guard flushes the log file on drop and must live until exit.
fn init_tracing(settings: &LoggingSettings) -> anyhow::Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(&settings.level))?;
    let builder = FmtSubscriber::builder().with_env_filter(filter);

    match &settings.directory {
        Some(directory) => {
            let file_appender = tracing_appender::rolling::daily(directory, "bizmetrics.log");
            let (file_writer, guard) = tracing_appender::non_blocking(file_appender);
            let subscriber = builder
                .with_ansi(false)
                .with_writer(std::io::stderr.and(file_writer))
                .finish();
            tracing::subscriber::set_global_default(subscriber)?;
            Ok(Some(guard))
        }
        None => {
            let subscriber = builder.with_writer(std::io::stderr).finish();
            tracing::subscriber::set_global_default(subscriber)?;
            Ok(None)
        }
    }
}

// ==============================================================================
// Command Logic
// ==============================================================================

/// A failed calculation in machine-readable form.
#[derive(Serialize)]
struct Failure<'a> {
    kind: analytics::ErrorKind,
    message: &'a str,
}

fn handle_calculate(args: CalculateArgs, engine: &MetricsEngine, config: &Config) -> ExitCode {
    let source = CsvSource::new(args.data.unwrap_or_else(|| config.data.source.clone()));
    let limit = args
        .limit
        .and_then(|l| usize::try_from(l).ok())
        .unwrap_or(config.engine.default_limit);
    let mut request = CalculationRequest::new(args.metric)
        .with_period(args.period)
        .with_limit(limit);
    if let Some(group_by) = args.group_by {
        request = request.with_group_by(group_by);
    }

    let outcome = engine.calculate(&request, &source);
    let format = args.format.unwrap_or(config.output.format);
    match render_outcome(&outcome, format) {
        Ok(text) => println!("{}", text.trim_end()),
        Err(e) => eprintln!("Failed to render result: {}", e),
    }

    if outcome.is_ok() { ExitCode::SUCCESS } else { ExitCode::FAILURE }
}

fn render_outcome(
    outcome: &Result<CalculationResult, AnalyticsError>,
    format: OutputFormat,
) -> anyhow::Result<String> {
    let text = match (outcome, format) {
        (Ok(result), OutputFormat::Json) => serde_json::to_string_pretty(result)?,
        (Ok(result), OutputFormat::Table) => result_table(result).to_string(),
        (Ok(result), OutputFormat::Text) => format!("✅ {}", result),
        (Err(e), OutputFormat::Json) => {
            let message = e.to_string();
            serde_json::to_string_pretty(&Failure { kind: e.kind(), message: &message })?
        }
        (Err(e), _) => format!("❌ {}", e),
    };
    Ok(text)
}

/// Renders a result's rows as a table; scalar results become a single row.
fn result_table(result: &CalculationResult) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);

    match &result.value {
        MetricValue::Currency { .. } | MetricValue::Count { .. } => {
            table.set_header(vec!["Metric", "Period", "Value"]);
            table.add_row(vec![result.metric.clone(), result.period.clone(), result.summary()]);
        }
        MetricValue::Ranking { entries, .. } => {
            table.set_header(vec!["Rank", "Label", "Value"]);
            for entry in entries {
                table.add_row(vec![entry.rank.to_string(), entry.label.clone(), format_currency(entry.value)]);
            }
        }
        MetricValue::Breakdown { entries: groups } | MetricValue::TimeSeries { points: groups } => {
            table.set_header(vec!["Label", "Value"]);
            for group in groups {
                table.add_row(vec![group.label.clone(), format_currency(group.value)]);
            }
        }
        MetricValue::Growth(growth) => {
            table.set_header(vec!["Period", "Value"]);
            table.add_row(vec![growth.previous_period.clone(), format_currency(growth.previous)]);
            table.add_row(vec![growth.latest_period.clone(), format_currency(growth.latest)]);
            table.add_row(vec!["Growth".to_string(), analytics::format::format_percent(growth.growth_pct)]);
        }
    }
    table
}

fn handle_list(engine: &MetricsEngine, format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Text => print!("{}", engine.describe_metrics()),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(engine.list_metrics())?),
        OutputFormat::Table => {
            let mut table = Table::new();
            table.load_preset(UTF8_FULL);
            table.set_header(vec!["Metric", "Formula", "Column", "Default group", "Description"]);
            for definition in engine.list_metrics() {
                let aggregation = &definition.aggregation;
                table.add_row(vec![
                    definition.name.to_string(),
                    aggregation.name().to_string(),
                    aggregation.column_name().to_string(),
                    aggregation
                        .default_group()
                        .map(|d| d.to_string())
                        .unwrap_or_else(|| "-".to_string()),
                    definition.description.to_string(),
                ]);
            }
            println!("{table}");
        }
    }
    Ok(())
}

/// Calculates every catalogue metric concurrently, one blocking task per metric.
/// Each task loads the data source on its own.
async fn handle_report(args: ReportArgs, engine: Arc<MetricsEngine>, config: &Config) -> anyhow::Result<()> {
    let source = Arc::new(CsvSource::new(args.data.unwrap_or_else(|| config.data.source.clone())));
    let names: Vec<&'static str> = engine.catalogue().names().collect();

    // Set up the progress bar
    let progress_bar = ProgressBar::new(names.len() as u64);
    progress_bar.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );

    // Create concurrent tasks for each metric
    let tasks: Vec<_> = names
        .into_iter()
        .map(|name| {
            let engine = Arc::clone(&engine);
            let source = Arc::clone(&source);
            let request = CalculationRequest::new(name)
                .with_period(args.period.clone())
                .with_limit(config.engine.default_limit);
            let pb_clone = progress_bar.clone();

            tokio::task::spawn_blocking(move || {
                let outcome = engine.calculate(&request, &*source);
                pb_clone.inc(1);
                pb_clone.set_message(format!("{} done", name));
                (name, outcome)
            })
        })
        .collect();

    // Wait for all concurrent tasks to complete
    let results = join_all(tasks).await;
    progress_bar.finish_with_message("Report complete!");

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Metric", "Status", "Result"]);
    for result in results {
        match result {
            Ok((name, Ok(calculation))) => {
                table.add_row(vec![name.to_string(), "✅".to_string(), calculation.summary()]);
            }
            Ok((name, Err(e))) => {
                table.add_row(vec![name.to_string(), "❌".to_string(), e.to_string()]);
            }
            Err(e) => eprintln!("A task failed: {}", e),
        }
    }

    println!("Report for period '{}' from {}", args.period, source.path().display());
    println!("{table}");
    Ok(())
}

fn handle_ask(args: AskArgs, engine: &MetricsEngine, config: &Config) -> ExitCode {
    let requests = ask::route(&args.question, config.engine.default_limit);
    if requests.is_empty() {
        println!("No metric matches that question. Run `bizmetrics list` to see what can be calculated.");
        return ExitCode::FAILURE;
    }

    let source = CsvSource::new(args.data.unwrap_or_else(|| config.data.source.clone()));
    let answers: Vec<String> = requests
        .iter()
        .map(|request| engine.calculate_formatted(request, &source))
        .collect();
    println!("{}", answers.join("\n\n").trim_end());
    ExitCode::SUCCESS
}

fn handle_generate(args: GenerateArgs, config: &Config) -> anyhow::Result<()> {
    let output = args.output.unwrap_or_else(|| config.data.source.clone());
    let settings = GeneratorSettings {
        rows: args.rows,
        seed: args.seed,
        year: args.year,
    };

    tracing::info!(rows = settings.rows, seed = settings.seed, output = %output.display(), "Generating sample dataset.");
    let transactions = generate(&settings);
    write_csv_file(&output, &transactions)?;

    let total = analytics::aggregation::sum(&transactions, core_types::NumericColumn::Revenue)?;
    println!("✅ Generated {} transactions", transactions.len());
    if let (Some(first), Some(last)) = (transactions.first(), transactions.last()) {
        println!("✅ Date range: {} to {}", first.date, last.date);
    }
    println!("✅ Total revenue: {}", format_currency(total));
    println!("📁 Data saved to: {}", output.display());
    Ok(())
}
