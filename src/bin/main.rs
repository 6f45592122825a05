//! snql CLI - Translate legacy JSON query bodies to SnQL
//!
//! Usage:
//!   snql translate <body.json> --entity <name> [--config <file>] [--output <format>]
//!   snql check <body.json> --entity <name> [--config <file>]
//!
//! Examples:
//!   snql translate sessions.json --entity sessions
//!   SNQL_LOG=debug snql translate sessions.json --entity sessions --output verbose

use clap::{Parser, Subcommand, ValueEnum};
use snql::config::Settings;
use snql::legacy::{json_to_snql_with, Body, LegacyValue};
use snql::Query;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "snql")]
#[command(about = "snql - Translate legacy JSON query bodies to SnQL")]
#[command(version)]
struct Cli {
    /// Settings file (defaults to $SNQL_CONFIG, ./snql.toml, then the user config dir)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Translate a legacy body and print the SnQL query
    Translate {
        /// Path to the JSON body
        file: PathBuf,

        /// Entity the query targets
        #[arg(short, long)]
        entity: String,

        /// Output format
        #[arg(short, long, default_value = "snql")]
        output: OutputFormat,
    },

    /// Validate a legacy body without printing the query
    Check {
        /// Path to the JSON body
        file: PathBuf,

        /// Entity the query targets
        #[arg(short, long)]
        entity: String,
    },
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// Output SnQL only
    Snql,
    /// Output SnQL with a source header
    Verbose,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_env("SNQL_LOG"))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let settings = match &cli.config {
        Some(path) => Settings::from_file(path),
        None => Settings::load(),
    };
    let settings = match settings {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error loading settings: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match cli.command {
        Commands::Translate {
            file,
            entity,
            output,
        } => cmd_translate(&file, &entity, output, &settings),
        Commands::Check { file, entity } => cmd_check(&file, &entity, &settings),
    }
}

fn cmd_translate(
    file: &Path,
    entity: &str,
    output: OutputFormat,
    settings: &Settings,
) -> ExitCode {
    let query = match load_query(file, entity, settings) {
        Ok(q) => q,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    match output {
        OutputFormat::Snql => {
            println!("{}", query.print());
        }
        OutputFormat::Verbose => {
            println!("-- Source: {}", file.display());
            println!("-- Entity: {}", entity);
            println!();
            println!("{}", query.print());
        }
    }
    ExitCode::SUCCESS
}

fn cmd_check(file: &Path, entity: &str, settings: &Settings) -> ExitCode {
    match load_query(file, entity, settings) {
        Ok(query) => {
            println!(
                "✓ {} is valid ({} selected, {} conditions)",
                file.display(),
                query.select.len(),
                query.where_clause.len() + query.having.len()
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("✗ {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Read, decode and translate a body file.
fn load_query(file: &Path, entity: &str, settings: &Settings) -> Result<Query, String> {
    let source = fs::read_to_string(file)
        .map_err(|e| format!("Error reading file '{}': {}", file.display(), e))?;

    let json: serde_json::Value = serde_json::from_str(&source)
        .map_err(|e| format!("Error parsing JSON in '{}': {}", file.display(), e))?;

    let body: Body = match LegacyValue::from(json) {
        LegacyValue::Map(map) => map,
        other => {
            return Err(format!(
                "Expected a JSON object in '{}', found {}",
                file.display(),
                other.type_name()
            ))
        }
    };

    tracing::debug!(file = %file.display(), fields = body.len(), "loaded legacy body");

    json_to_snql_with(&body, entity, &settings.legacy)
        .map_err(|e| format!("Translation error: {}", e))
}
