use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use starline::{Dataset, LoadOptions, Star, TableFormat};

/// Resolve stars against a stellar parameters table and print what was found.
#[derive(Parser)]
#[command(name = "starline")]
#[command(version, about)]
struct Cli {
    /// Stellar parameters file (.csv, .tsv, .json, .parquet).
    #[arg(long)]
    stars: PathBuf,

    /// Lines file with one equivalent-width column per star.
    #[arg(long)]
    lines: Option<PathBuf>,

    /// Field delimiter for delimited text files.
    #[arg(long)]
    delimiter: Option<char>,

    /// Treat both files as delimited text regardless of extension.
    #[arg(long)]
    delimited: bool,

    /// Print stars as JSON instead of text.
    #[arg(long)]
    json: bool,

    /// Star identifiers to resolve.
    #[arg(required = true)]
    names: Vec<String>,
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    let delimiter = match cli.delimiter {
        Some(c) if c.is_ascii() => Some(c as u8),
        Some(c) => {
            eprintln!("Delimiter must be a single ASCII character, got '{c}'");
            return ExitCode::FAILURE;
        }
        None => None,
    };
    let options = LoadOptions {
        format: cli.delimited.then_some(TableFormat::Delimited),
        delimiter,
        ..Default::default()
    };

    let dataset = match Dataset::load_with(&cli.stars, cli.lines.as_deref(), &options) {
        Ok(ds) => ds,
        Err(err) => {
            eprintln!("{err}");
            return ExitCode::FAILURE;
        }
    };

    let mut stars = Vec::with_capacity(cli.names.len());
    for name in &cli.names {
        let mut star = Star::new(name.as_str());
        let report = star.resolve(&dataset);
        if !cli.json {
            println!("{star}");
            if let Some(lines) = &star.linelist {
                println!("  {} measured lines", lines.len());
            }
            print!("{report}");
        }
        stars.push(star);
    }

    if cli.json {
        match serde_json::to_string_pretty(&stars) {
            Ok(text) => println!("{text}"),
            Err(err) => {
                eprintln!("Failed to serialize stars: {err}");
                return ExitCode::FAILURE;
            }
        }
    }

    ExitCode::SUCCESS
}
