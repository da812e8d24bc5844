use std::path::PathBuf;
use std::process::ExitCode;
use std::str::FromStr;

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use plant_guide_csv::extract::DEFAULT_MIN_FILLED_FIELDS;
use plant_guide_csv::{ExtractOptions, ExtractionReport, PageSelection, convert_to_csv};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "plant2csv",
    version,
    about = "Convert a plant care guide (PDF or form-feed separated text) into a CSV table"
)]
struct Cli {
    /// Input guide: a .pdf file, or a UTF-8 text dump with one page per form feed.
    input: PathBuf,

    /// Output CSV path.
    output: PathBuf,

    /// Page selection like 1-3,5.
    #[arg(long)]
    pages: Option<String>,

    /// Output delimiter character.
    #[arg(long, default_value = ",")]
    delimiter: char,

    /// Extra header line to discard when recovering plant names. Repeatable.
    #[arg(long = "skip-line")]
    skip_lines: Vec<String>,

    /// Minimum number of non-empty fields for an entry to be kept.
    #[arg(long, default_value_t = DEFAULT_MIN_FILLED_FIELDS)]
    min_fields: usize,

    /// Print every skipped page and merged duplicate.
    #[arg(short, long)]
    verbose: bool,
}

fn parse_options(cli: &Cli) -> Result<ExtractOptions> {
    let pages = cli
        .pages
        .as_deref()
        .map(PageSelection::from_str)
        .transpose()
        .map_err(|error| anyhow!("invalid page selection: {error}"))
        .context("failed to parse --pages")?;

    if !cli.delimiter.is_ascii() {
        anyhow::bail!("delimiter must be a single ASCII character");
    }

    Ok(ExtractOptions {
        pages,
        delimiter: cli.delimiter as u8,
        extra_boilerplate: cli.skip_lines.clone(),
        min_filled_fields: cli.min_fields,
    })
}

fn log_report(report: &ExtractionReport, verbose: bool) {
    if report.warnings.is_empty() {
        return;
    }

    eprintln!(
        "note: {} page(s) skipped or merged out of {}",
        report.warnings.len(),
        report.page_count
    );
    if verbose {
        for warning in &report.warnings {
            eprintln!("  - {warning}");
        }
    }
}

fn run(cli: &Cli) -> Result<ExtractionReport> {
    let options = parse_options(cli)?;
    convert_to_csv(&cli.input, &cli.output, &options)
        .with_context(|| format!("failed to convert '{}'", cli.input.display()))
}

fn main() -> ExitCode {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("plant_guide_csv=warn"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(report) => {
            log_report(&report, cli.verbose);
            println!(
                "wrote {} with {} records",
                cli.output.display(),
                report.record_count
            );
            ExitCode::SUCCESS
        }
        Err(error) => {
            eprintln!("error: {error:#}");
            ExitCode::from(1)
        }
    }
}
