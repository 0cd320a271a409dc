//! `refig`: inspect figures saved by the refig store.
//!
//! stdout carries only the recovered record (pretty JSON); everything
//! else goes to stderr. Exit codes distinguish the three read
//! outcomes: 0 record found, 2 readable figure without a record,
//! 1 unreadable file or unsupported format.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

const EXIT_READ_ERROR: u8 = 1;
const EXIT_NO_RECORD: u8 = 2;

#[derive(Parser)]
#[command(name = "refig")]
#[command(about = "Inspect provenance metadata in refig-managed figures", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the provenance record embedded in a figure
    Meta {
        /// Path to a saved figure (.png or .svg)
        figure: PathBuf,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .target(env_logger::Target::Stderr)
        .init();

    match cli.command {
        Commands::Meta { figure } => meta(&figure),
    }
}

fn meta(path: &Path) -> ExitCode {
    let payload = match std::fs::read(path) {
        Ok(payload) => payload,
        Err(err) => {
            eprintln!("refig: cannot read {}: {err}", path.display());
            return ExitCode::from(EXIT_READ_ERROR);
        }
    };

    match refig_codec::extract(&payload) {
        Ok(Some(record)) => {
            let rendered = match serde_json::to_string_pretty(&record) {
                Ok(rendered) => rendered,
                Err(err) => {
                    eprintln!("refig: cannot render record from {}: {err}", path.display());
                    return ExitCode::from(EXIT_READ_ERROR);
                }
            };
            println!("{rendered}");
            ExitCode::SUCCESS
        }
        Ok(None) => {
            log::debug!("payload sniffed fine but carried no record");
            eprintln!("refig: no embedded metadata in {}", path.display());
            ExitCode::from(EXIT_NO_RECORD)
        }
        Err(err) => {
            eprintln!("refig: {}: {err}", path.display());
            ExitCode::from(EXIT_READ_ERROR)
        }
    }
}
