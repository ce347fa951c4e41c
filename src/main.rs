use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

use scoreit::{config::Config, ScoreError};

const EXIT_SUCCESS: i32 = 0;
const EXIT_INPUT: i32 = 1;
const EXIT_DATA: i32 = 2;
const EXIT_CONFIG: i32 = 3;

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print entries ranked by score (default if no subcommand)
    Rank,
    /// Show how each judge scored one entry
    Explain {
        /// Entry key as it appears in the input file
        entry: String,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum OutputFormat {
    Table,
    Tsv,
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "scoreit")]
#[command(about = "Rank contest entries from multi-judge scoring sheets", long_about = None)]
#[command(version)]
struct Cli {
    /// Delimited input file with a header row
    input: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/scoreit/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Criterion weight as NAME=WEIGHT, repeatable (replaces config weights)
    #[arg(
        short,
        long = "weight",
        value_name = "NAME=WEIGHT",
        value_parser = parse_weight,
        global = true
    )]
    weights: Vec<(String, f64)>,

    /// Column identifying the judge
    #[arg(long, global = true)]
    judge_key: Option<String>,

    /// Column identifying the entry
    #[arg(long, global = true)]
    entry_key: Option<String>,

    /// Name of the derived combined-score field
    #[arg(long, global = true)]
    sum_field: Option<String>,

    /// Z-score each criterion per judge before weighting
    #[arg(long, global = true, conflicts_with = "no_normalize")]
    normalize: bool,

    /// Use raw criterion values even if the config enables normalization
    #[arg(long, global = true)]
    no_normalize: bool,

    /// Field delimiter of the input file
    #[arg(short, long, global = true)]
    delimiter: Option<String>,

    /// Output format for the ranking
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table, global = true)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Option<Commands>,
}

fn parse_weight(s: &str) -> Result<(String, f64), String> {
    let (name, weight) = s
        .rsplit_once('=')
        .ok_or_else(|| format!("expected NAME=WEIGHT, got '{}'", s))?;
    let weight: f64 = weight
        .trim()
        .parse()
        .map_err(|_| format!("weight for '{}' is not a number: '{}'", name, weight))?;
    Ok((name.to_string(), weight))
}

/// Apply command-line overrides on top of the loaded config.
fn apply_overrides(mut config: Config, cli: &Cli) -> Config {
    if !cli.weights.is_empty() {
        config.weights = cli.weights.iter().cloned().collect();
    }
    if let Some(ref key) = cli.judge_key {
        config.judge_key = key.clone();
    }
    if let Some(ref key) = cli.entry_key {
        config.entry_key = key.clone();
    }
    if let Some(ref field) = cli.sum_field {
        config.sum_field = field.clone();
    }
    if cli.normalize {
        config.normalize_fields = true;
    } else if cli.no_normalize {
        config.normalize_fields = false;
    }
    if let Some(ref delimiter) = cli.delimiter {
        config.delimiter = delimiter.clone();
    }
    config
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn exit_code(err: &ScoreError) -> i32 {
    if err.is_data_error() {
        EXIT_DATA
    } else {
        EXIT_INPUT
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let start_time = Instant::now();

    // Load config
    let config = match scoreit::config::load_config(cli.config.clone()) {
        Ok(c) => apply_overrides(c, &cli),
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    let delimiter = match config.delimiter_byte() {
        Ok(d) => d,
        Err(e) => {
            eprintln!("Config error: {}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    // Validate scoring parameters before touching the input
    let params = config.score_params();
    if let Err(errors) = scoreit::scoring::validate_params(&params) {
        eprintln!("Scoring config errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        std::process::exit(EXIT_CONFIG);
    }

    tracing::debug!(
        "Scoring {} with {} weighted criteria (judge: '{}', entry: '{}', normalize: {})",
        cli.input.display(),
        params.weights.len(),
        params.judge_key,
        params.entry_key,
        params.normalize_fields
    );

    let ranking = match scoreit::compute_scores(&cli.input, delimiter, &params) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(exit_code(&e));
        }
    };

    let use_colors = scoreit::output::should_use_colors();

    // Route based on subcommand
    match cli.command.unwrap_or(Commands::Rank) {
        Commands::Rank => {
            let output = match cli.format {
                OutputFormat::Table => scoreit::output::format_ranking_table(&ranking, use_colors),
                OutputFormat::Tsv => scoreit::output::format_tsv(&ranking),
                OutputFormat::Json => match scoreit::output::format_json(&ranking) {
                    Ok(json) => json,
                    Err(e) => {
                        eprintln!("Failed to serialize ranking: {}", e);
                        std::process::exit(EXIT_DATA);
                    }
                },
            };
            println!("{}", output);
        }
        Commands::Explain { entry } => {
            let Some(position) = ranking.iter().position(|r| r.entry == entry) else {
                eprintln!("No entry named '{}' in {}", entry, cli.input.display());
                std::process::exit(EXIT_DATA);
            };
            println!(
                "{}",
                scoreit::output::format_breakdown(&ranking[position], position + 1, use_colors)
            );
        }
    }

    tracing::debug!("Ranked {} entries in {:?}", ranking.len(), start_time.elapsed());
    std::process::exit(EXIT_SUCCESS);
}
