//! Tempest CLI
//!
//! Usage:
//!   tempest [OPTIONS] [MANIFEST]
//!
//! Options:
//!   -n, --namespace <NS>  Prefix every logical id with NS
//!   -c, --compact         Print single-line JSON
//!   -v, --verbose         Log template construction to stderr
//!   -h, --help            Print help

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use tempest::{build_with_config, BuildConfig};

#[derive(Parser)]
#[command(name = "tempest")]
#[command(about = "Build infrastructure template documents from TOML manifests")]
struct Cli {
    /// Manifest file (reads from stdin if not provided)
    input: Option<PathBuf>,

    /// Prefix every logical id with this namespace
    #[arg(short, long)]
    namespace: Option<String>,

    /// Print single-line JSON instead of pretty output
    #[arg(short, long)]
    compact: bool,

    /// Log template construction to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(io::stderr)
        .init();

    // Read input
    let source = match &cli.input {
        Some(path) => match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                eprintln!("Error reading file '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => {
            let mut buffer = String::new();
            match io::stdin().read_to_string(&mut buffer) {
                Ok(_) => buffer,
                Err(e) => {
                    eprintln!("Error reading from stdin: {}", e);
                    std::process::exit(1);
                }
            }
        }
    };

    let mut config = BuildConfig::new();
    if let Some(namespace) = cli.namespace {
        config = config.with_namespace(namespace);
    }

    let document = match build_with_config(&source, config) {
        Ok(document) => document,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let output = if cli.compact {
        serde_json::to_string(&document)
    } else {
        serde_json::to_string_pretty(&document)
    };
    match output {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Error writing JSON: {}", e);
            std::process::exit(1);
        }
    }
}
