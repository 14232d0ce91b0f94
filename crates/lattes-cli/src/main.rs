use std::io::{IsTerminal, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::{ArgAction, Parser};
use lattes_core::config_file::{self, ConfigFile};
use lattes_parsing::{ExtractionStage, ParsingConfig, ParsingConfigBuilder, PublicationExtractor};
use lattes_reporting::ExportFormat;
use tracing_subscriber::EnvFilter;

mod output;

use output::ColorMode;

const DEFAULT_INPUT: &str = "page.html";
const DEFAULT_OUTPUT: &str = "pubs.json";

/// Extract publications from a saved Lattes curriculum page
#[derive(Parser, Debug)]
#[command(name = "lattes-extract", version, about, long_about = None)]
struct Cli {
    /// Saved curriculum page [default: page.html]
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Where to write the records [default: pubs.json]
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format: json, csv or markdown [default: json]
    #[arg(short, long)]
    format: Option<ExportFormat>,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Print the extracted records instead of writing them
    #[arg(long)]
    dry_run: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Build the parsing configuration from the `[parsing]` file section.
fn parsing_config(file_config: &ConfigFile) -> anyhow::Result<ParsingConfig> {
    let mut builder = ParsingConfigBuilder::new();
    if let Some(section) = &file_config.parsing {
        builder = builder.apply_file_section(section);
    }
    builder.build().context("invalid [parsing] configuration")
}

fn main() -> anyhow::Result<()> {
    // A local .env may set RUST_LOG.
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    // Resolve configuration: CLI flags > config file > defaults
    let file_config = config_file::load_config();
    let file_output = file_config.output.clone().unwrap_or_default();

    let input = cli
        .input
        .or_else(|| file_output.input.map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_INPUT));
    let output_path = cli
        .output
        .or_else(|| file_output.path.map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT));
    let format = match (cli.format, file_output.format) {
        (Some(format), _) => format,
        (None, Some(name)) => name
            .parse()
            .with_context(|| format!("invalid [output] format {name:?}"))?,
        (None, None) => ExportFormat::Json,
    };
    let config = parsing_config(&file_config)?;

    if !input.is_file() {
        if input.is_relative() {
            anyhow::bail!("{} not found in current directory", input.display());
        }
        anyhow::bail!("{} not found", input.display());
    }

    let bytes =
        std::fs::read(&input).with_context(|| format!("failed to read {}", input.display()))?;
    let html = String::from_utf8_lossy(&bytes);

    let result = PublicationExtractor::with_config(config).extract(&html);
    if result.stage == ExtractionStage::Fallback {
        tracing::warn!(
            records = result.records.len(),
            "no structured sections found; records come from the markup fallback"
        );
    }

    let color = ColorMode(!cli.no_color && std::io::stdout().is_terminal());
    let mut stdout = std::io::stdout().lock();

    if cli.dry_run {
        output::print_dry_run(&mut stdout, &input.display().to_string(), &result, color)?;
        return Ok(());
    }

    lattes_reporting::export_records(&result.records, format, &output_path)?;
    output::print_summary(&mut stdout, result.records.len(), &output_path, color)?;
    stdout.flush()?;
    Ok(())
}
