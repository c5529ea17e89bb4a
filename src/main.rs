//! asmchart - chart series for attack-surface data
//!
//! A CLI that loads exported entity records, runs a named aggregate over
//! them and writes the resulting series as JSON or Markdown.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Runtime error (bad arguments, unreadable input, unknown aggregate)

use anyhow::{Context, Result};
use asmchart::analysis::Registry;
use asmchart::cli::{Args, OutputFormat};
use asmchart::config::{Config, CONFIG_FILE};
use asmchart::loader;
use asmchart::models::EntityType;
use asmchart::report::{self, ReportMetadata};
use chrono::Utc;
use std::path::Path;
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("❌ Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    let registry = Registry::new();

    if args.list {
        print_aggregates(&registry);
        return Ok(());
    }

    let mut config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Error: {:#}", e);
            std::process::exit(1);
        }
    };
    config.merge_with_args(&args);

    // Initialize logging
    init_logging(&args, &config);

    info!("asmchart v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    if let Err(e) = run(&args, &config, &registry) {
        error!("Aggregation failed: {:#}", e);
        eprintln!("\n❌ Error: {:#}", e);
        eprintln!("   Run `asmchart --list` to see the available aggregates.");
        std::process::exit(1);
    }

    Ok(())
}

/// Handle --init-config: generate a default .asmchart.toml.
fn handle_init_config() -> Result<()> {
    let path = Path::new(CONFIG_FILE);

    if path.exists() {
        eprintln!(
            "⚠️  {} already exists. Remove it first or edit it manually.",
            CONFIG_FILE
        );
        std::process::exit(1);
    }

    std::fs::write(path, Config::default_toml())
        .with_context(|| format!("Failed to write {}", CONFIG_FILE))?;

    println!("✅ Created {} with default settings.", CONFIG_FILE);
    println!("   Edit it to change the default output format, output file and JSON style.");
    Ok(())
}

/// Print every entity's aggregates with their labels and modes.
fn print_aggregates(registry: &Registry) {
    print!("{}", format_aggregates(registry));
}

fn format_aggregates(registry: &Registry) -> String {
    let mut output = String::new();

    for entity in EntityType::ALL {
        output.push_str(&format!("📊 {}:\n", entity));
        for info in registry.entries(entity) {
            output.push_str(&format!(
                "   {:<20} {:<12} {}\n",
                info.name, info.mode, info.label
            ));
        }
    }

    output
}

/// Initialize logging based on verbosity settings.
fn init_logging(args: &Args, config: &Config) {
    let level = if config.general.verbose && !args.quiet {
        tracing::Level::DEBUG
    } else {
        args.log_level()
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

/// Load records, aggregate them and write the report.
fn run(args: &Args, config: &Config, registry: &Registry) -> Result<()> {
    let (Some(entity), Some(name), Some(input)) = (args.entity, &args.aggregate, &args.input)
    else {
        anyhow::bail!("--entity, --aggregate and --input are required");
    };

    let json = std::fs::read_to_string(input)
        .with_context(|| format!("Failed to read records from {}", input.display()))?;

    let output = loader::build_chart(registry, entity, name, &json)
        .with_context(|| format!("Failed to aggregate {}", input.display()))?;

    if output.dropped > 0 {
        warn!(
            "{} of {} records had no usable key and were skipped",
            output.dropped, output.records
        );
    }

    let metadata = ReportMetadata::for_output(&output, Utc::now());
    let rendered = match config.general.format {
        OutputFormat::Json => {
            report::generate_json_report(&metadata, &output.series, &config.report)?
        }
        OutputFormat::Markdown => {
            report::generate_markdown_report(&metadata, &output.series, &config.report)
        }
    };

    match config.general.output {
        Some(ref path) => {
            std::fs::write(path, &rendered)
                .with_context(|| format!("Failed to write report to {}", path.display()))?;
            info!("Report saved to {}", path.display());
            println!(
                "✅ {} points ({} records, {} dropped). Report saved to: {}",
                output.series.points.len(),
                output.records,
                output.dropped,
                path.display()
            );
        }
        None => println!("{}", rendered),
    }

    Ok(())
}

/// Load configuration from file or use defaults.
///
/// Runs before logging is set up, so problems go to stderr directly.
fn load_config(args: &Args) -> Result<Config> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        return Config::load(config_path);
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => Ok(config),
        Ok(None) => Ok(Config::default()),
        Err(e) => {
            eprintln!("⚠️  Ignoring {}: {:#}", CONFIG_FILE, e);
            Ok(Config::default())
        }
    }
}
