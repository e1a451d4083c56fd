//! CLI for scaffolding solution stubs from markdown problem statements.
//!
//! # Usage
//!
//! ```bash
//! # First statement under Questions/ without a generated folder
//! stubgen
//!
//! # A specific statement, by file name or path
//! stubgen -f TwoSum.md
//!
//! # Preview without writing
//! stubgen -f TwoSum.md --dry-run
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use sg_generator::{ScaffoldConfig, Scaffolder};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "stubgen",
    about = "Scaffold solution stubs and tests from markdown problem statements",
    long_about = "Reads the `## Sample Input` / `## Expected Output` blocks of a markdown problem \
                  statement and writes a typed Python stub plus a pytest module next to it."
)]
struct Cli {
    /// Markdown file name (matched case-insensitively under the root) or path
    #[arg(short = 'f', long)]
    file_path: Option<String>,

    /// Root folder holding the problem statements
    #[arg(short, long, default_value = "Questions")]
    root: PathBuf,

    /// Print the generated files instead of writing them
    #[arg(long)]
    dry_run: bool,

    /// Print the outcome as JSON
    #[arg(long)]
    json: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

/// Log filter used when `RUST_LOG` is unset.
fn default_log_level(verbose: bool) -> &'static str {
    if verbose {
        "debug"
    } else {
        "info"
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let log_level = default_log_level(cli.verbose);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = ScaffoldConfig {
        questions_root: cli.root,
        dry_run: cli.dry_run,
        ..Default::default()
    };
    let scaffolder = Scaffolder::new(config);

    match scaffolder.run(cli.file_path.as_deref()) {
        Ok(outcome) => {
            if cli.json {
                match serde_json::to_string_pretty(&outcome) {
                    Ok(json) => println!("{}", json),
                    Err(e) => {
                        eprintln!("Failed to serialize outcome: {}", e);
                        return ExitCode::FAILURE;
                    }
                }
            } else {
                println!("{}", outcome.message());
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
