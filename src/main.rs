//! CLI entry point for the plant growth analyzer.
//!
//! Provides subcommands for inspecting a measurement file, projecting the next
//! week's heights, and summarizing average growth per plant type.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use plant_growth::{
    GrowthConfig, GrowthError, compute_derived,
    config::parse_increment,
    group_average_delta, load_dataset,
    output::{
        DEFAULT_VALUE_HEADER, print_pretty, summary_to_json, write_dataset,
        write_summary,
    },
    report::{
        banner, column_mean, comparison_lines, record_line, rule, sample_lines, summary_lines,
    },
};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::{
    EnvFilter, Layer,
    filter::LevelFilter,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

const WIDTH: usize = 60;

#[derive(Parser)]
#[command(name = "plant_growth")]
#[command(about = "Summarize and extend plant growth measurements", long_about = None)]
struct Cli {
    /// JSON config file with increment and column names
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show record count, columns and a sample of records
    Inspect {
        /// CSV file with growth measurements
        #[arg(value_name = "INPUT")]
        input: PathBuf,
    },
    /// Append a projected next-week height column
    AppendWeek {
        /// CSV file with growth measurements
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// CSV file to write the extended dataset to
        #[arg(short, long, default_value = "plant_growth_trials_updated.csv")]
        output: PathBuf,

        /// Height increment in cm (overrides config and GROWTH_INCREMENT)
        #[arg(short, long, allow_hyphen_values = true)]
        increment: Option<String>,
    },
    /// Compute average growth per plant type and write a summary CSV
    Summarize {
        /// CSV file with growth measurements
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// CSV file to write the summary to
        #[arg(short, long, default_value = "growth_summary.csv")]
        output: PathBuf,

        /// Also print the summary as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    },
}

fn main() -> ExitCode {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/plant_growth.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("plant_growth.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(log_filter("RUST_LOG", LevelFilter::INFO));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(log_filter("RUST_LOG_JSON", LevelFilter::DEBUG));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %format!("{e:#}"), "Run failed");
            eprintln!("\n❌ ERROR: {e:#}");
            if let Some(kind) = e.downcast_ref::<GrowthError>() {
                eprintln!("{}", kind.hint());
            }
            ExitCode::FAILURE
        }
    }
}

/// Filter read from `var`, falling back to `default` when the variable is unset or empty.
fn log_filter(var: &str, default: LevelFilter) -> EnvFilter {
    parse_log_filter(std::env::var(var).ok().as_deref(), default)
}

fn parse_log_filter(directives: Option<&str>, default: LevelFilter) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(default.into())
        .parse_lossy(directives.unwrap_or_default())
}

fn run(cli: Cli) -> Result<()> {
    let config = GrowthConfig::load_or_default(cli.config.as_deref())?.apply_env()?;

    match cli.command {
        Commands::Inspect { input } => inspect(&config, &input),
        Commands::AppendWeek {
            input,
            output,
            increment,
        } => {
            let config = match increment {
                Some(raw) => config.with_increment(parse_increment(&raw)?)?,
                None => config,
            };
            append_week(&config, &input, &output)
        }
        Commands::Summarize {
            input,
            output,
            json,
        } => summarize(&config, &input, &output, json),
    }
}

fn print_lines<I: IntoIterator<Item = String>>(lines: I) {
    for line in lines {
        println!("{line}");
    }
}

/// Prints record count, first record, column names and sample records.
#[tracing::instrument(skip(config, input), fields(input = %input.display()))]
fn inspect(config: &GrowthConfig, input: &Path) -> Result<()> {
    let data = load_dataset(input)?;

    print_lines(banner("PLANT GROWTH DATA", WIDTH));
    println!("\n✓ Total records: {}", data.len());

    println!("\n{}\nFIRST RECORD:\n{}", rule('-', WIDTH), rule('-', WIDTH));
    match data.records().first() {
        Some(first) => println!("{}", record_line(first)),
        None => println!("(no records)"),
    }

    println!("\n{}\nALL COLUMN NAMES:\n{}", rule('-', WIDTH), rule('-', WIDTH));
    println!("{:?}", data.headers());

    println!(
        "\n{}\nSAMPLE OF FIRST {} RECORDS:\n{}",
        rule('-', WIDTH),
        config.sample_size,
        rule('-', WIDTH)
    );
    let columns: Vec<&str> = data.headers().iter().map(String::as_str).collect();
    print_lines(sample_lines(&data, &columns, config.sample_size));

    Ok(())
}

/// Projects `projected_column = final_column + increment` and writes the extended dataset.
#[tracing::instrument(skip(config, input, output), fields(input = %input.display(), output = %output.display(), increment = config.increment))]
fn append_week(config: &GrowthConfig, input: &Path, output: &Path) -> Result<()> {
    let width = WIDTH + 20;
    print_lines(banner("APPEND NEXT WEEK DATA", width));

    println!("\n[Step 1] Reading {}...", input.display());
    let original = load_dataset(input)?;
    println!("✓ Successfully read {} records", original.len());

    println!("\n[Step 2] Adding {} column...", config.projected_column);
    let updated = compute_derived(
        &original,
        &config.final_column,
        &config.projected_column,
        config.increment,
    )?;
    println!(
        "✓ Added {} column ({} + {})",
        config.projected_column, config.final_column, config.increment
    );

    // Everything the report needs is computed before the file is written.
    let comparison = comparison_lines(
        &original,
        &updated,
        &config.final_column,
        &config.projected_column,
        config.sample_size,
    )?;
    let average = column_mean(&updated, &config.projected_column)?;

    println!("\n[Step 3] Saving updated dataset...");
    write_dataset(output, &updated)
        .with_context(|| format!("writing {}", output.display()))?;
    println!("✓ Updated data successfully written to {}", output.display());

    print_lines(banner("COMPARISON: Original vs Updated Data", width));
    print_lines(comparison);

    println!();
    print_lines(banner("SUMMARY", width));
    println!("Total records processed: {}", updated.len());
    println!("New column added: {}", config.projected_column);
    println!(
        "Formula used: {} = {} + {}",
        config.projected_column, config.final_column, config.increment
    );
    println!("Output file: {}", output.display());
    if let Some(avg) = average {
        println!(
            "\nAverage {} across all plants: {avg:.2} cm",
            config.projected_column
        );
    }

    info!(records = updated.len(), "Append week complete");
    Ok(())
}

/// Averages `final_column - baseline_column` per group and writes the summary CSV.
#[tracing::instrument(skip(config, input, output), fields(input = %input.display(), output = %output.display()))]
fn summarize(config: &GrowthConfig, input: &Path, output: &Path, json: bool) -> Result<()> {
    print_lines(banner("PLANT GROWTH DATA ANALYSIS", WIDTH));

    let data = load_dataset(input)?;
    println!("\n✓ Successfully read the data!");
    println!("✓ Total records: {}", data.len());

    let improvements = group_average_delta(
        &data,
        &config.group_column,
        &config.final_column,
        &config.baseline_column,
    )?;
    print_pretty(&improvements);

    println!();
    print_lines(banner(
        &format!(
            "AVERAGE HEIGHT IMPROVEMENTS ({} - {})",
            config.final_column, config.baseline_column
        ),
        WIDTH,
    ));
    print_lines(summary_lines(&improvements));

    write_summary(output, &improvements, &config.group_column, DEFAULT_VALUE_HEADER)
        .with_context(|| format!("writing {}", output.display()))?;
    println!("\n{}", rule('-', WIDTH));
    println!("✓ Summary written to {}", output.display());
    println!("{}", rule('-', WIDTH));

    if json {
        println!("{}", summary_to_json(&improvements)?);
    }

    println!();
    print_lines(banner("ANALYSIS COMPLETE", WIDTH));
    info!(groups = improvements.len(), "Summary complete");
    Ok(())
}
