use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use plant_guide_csv::csv_out::read_table;
use plant_guide_csv::model::{FieldLabel, PlantRow};
use plant_guide_csv::search::{AttributeFilter, SearchQuery, distinct_values, search};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "plant-search",
    version,
    about = "Look up plants in a table produced by plant2csv"
)]
struct Cli {
    /// Table written by plant2csv.
    table: PathBuf,

    /// Name to look for; accents and case are ignored.
    query: Option<String>,

    /// Keep rows whose environment contains any of these. Repeatable.
    #[arg(long)]
    ambiente: Vec<String>,

    /// Keep rows whose sun exposure contains any of these. Repeatable.
    #[arg(long)]
    exposicao: Vec<String>,

    /// Print distinct environment values and exit.
    #[arg(long, conflicts_with = "list_exposicoes")]
    list_ambientes: bool,

    /// Print distinct sun exposure values and exit.
    #[arg(long)]
    list_exposicoes: bool,

    /// Print matching rows as JSON instead of names.
    #[arg(long)]
    json: bool,

    /// Table delimiter character.
    #[arg(long, default_value = ",")]
    delimiter: char,
}

fn run(cli: &Cli) -> Result<usize> {
    if !cli.delimiter.is_ascii() {
        anyhow::bail!("delimiter must be a single ASCII character");
    }

    let table = read_table(&cli.table, cli.delimiter as u8)
        .with_context(|| format!("failed to load '{}'", cli.table.display()))?;

    let listed = if cli.list_ambientes {
        Some(FieldLabel::Ambiente)
    } else if cli.list_exposicoes {
        Some(FieldLabel::Exposicao)
    } else {
        None
    };
    if let Some(label) = listed {
        let values = distinct_values(&table, label);
        for value in &values {
            println!("{value}");
        }
        return Ok(values.len());
    }

    let query = SearchQuery {
        text: cli.query.clone(),
        filters: vec![
            AttributeFilter::new(FieldLabel::Ambiente, &cli.ambiente),
            AttributeFilter::new(FieldLabel::Exposicao, &cli.exposicao),
        ],
    };
    let found = search(&table, &query);

    if cli.json {
        let rows = found
            .iter()
            .map(|record| PlantRow::from(*record))
            .collect::<Vec<_>>();
        println!("{}", serde_json::to_string_pretty(&rows)?);
    } else {
        for record in &found {
            println!("{}", record.name);
        }
    }

    Ok(found.len())
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
        Ok(0) => {
            eprintln!("no results");
            ExitCode::from(2)
        }
        Ok(_) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("error: {error:#}");
            ExitCode::from(1)
        }
    }
}
