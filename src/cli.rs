use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use anyhow::{Context, Result};

use golden_diff::{Comparator, DiffError, DiffResult, FileRef, FingerprintMap, Side};

#[derive(Parser)]
#[command(name = "golden-diff")]
#[command(about = "Normalize, diff and regenerate golden fixtures")]
#[command(version)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compare two files line by line
    Text {
        expected: PathBuf,
        actual: PathBuf,

        /// Rewrite the expected file from the actual one when they differ
        #[arg(long)]
        update: bool,
    },

    /// Compare two JSON documents, ignoring formatting and key order
    Json {
        expected: PathBuf,
        actual: PathBuf,

        /// Rewrite the expected file from the actual one when they differ
        #[arg(long)]
        update: bool,
    },

    /// Compare two raw HTTP requests
    HttpRequest {
        expected: PathBuf,
        actual: PathBuf,

        /// Rewrite the expected file from the actual one when they differ
        #[arg(long)]
        update: bool,
    },

    /// Compare two raw HTTP responses
    HttpResponse {
        expected: PathBuf,
        actual: PathBuf,

        /// Rewrite the expected file from the actual one when they differ
        #[arg(long)]
        update: bool,
    },

    /// Print the fingerprint map of a directory as JSON
    Hash {
        dir: PathBuf,
    },

    /// Compare a directory against a fingerprint map stored as JSON
    Dir {
        dir: PathBuf,
        expected: PathBuf,
    },
}

#[derive(Clone, Copy)]
enum Mode {
    Text,
    Json,
    HttpRequest,
    HttpResponse,
}

impl Cli {
    pub fn execute(self, comparator: Comparator) -> Result<ExitCode> {
        match self.command {
            Commands::Text { expected, actual, update } => {
                compare_files(comparator, Mode::Text, &expected, &actual, update)
            }
            Commands::Json { expected, actual, update } => {
                compare_files(comparator, Mode::Json, &expected, &actual, update)
            }
            Commands::HttpRequest { expected, actual, update } => {
                compare_files(comparator, Mode::HttpRequest, &expected, &actual, update)
            }
            Commands::HttpResponse { expected, actual, update } => {
                compare_files(comparator, Mode::HttpResponse, &expected, &actual, update)
            }
            Commands::Hash { dir } => {
                let fingerprints = comparator.hash_dir(&dir)?;
                println!("{}", serde_json::to_string_pretty(&fingerprints)?);
                Ok(ExitCode::SUCCESS)
            }
            Commands::Dir { dir, expected } => {
                let content = std::fs::read_to_string(&expected)
                    .with_context(|| format!("Failed to read {}", expected.display()))?;
                let fingerprints: FingerprintMap = serde_json::from_str(&content)
                    .with_context(|| format!("{} is not a fingerprint map", expected.display()))?;
                Ok(report(&comparator.dir_checksum(&fingerprints, &dir)))
            }
        }
    }
}

fn compare_files(
    comparator: Comparator,
    mode: Mode,
    expected: &Path,
    actual: &Path,
    update: bool,
) -> Result<ExitCode> {
    let comparator = if update { comparator.with_update(true) } else { comparator };
    let fixture = FileRef::new(expected);

    let actual_text = match std::fs::read_to_string(actual) {
        Ok(text) => text,
        Err(source) => {
            let err = DiffError::Read {
                side: Side::Actual,
                path: actual.to_path_buf(),
                source,
            };
            return Ok(report(&err.into()));
        }
    };

    // A missing fixture is created in update mode whatever the comparison mode
    let result = comparator.golden_with(&fixture, &actual_text, |cmp, expected, actual| match mode {
        Mode::Text => cmp.text(expected, actual),
        Mode::Json => cmp.json_input(expected, actual),
        Mode::HttpRequest => cmp.http_request(expected, actual),
        Mode::HttpResponse => cmp.http_response(expected, actual),
    })?;

    Ok(report(&result))
}

/// Print the outcome; exit 0 when equal, 1 when different, 2 when failed
fn report(result: &DiffResult) -> ExitCode {
    match result {
        DiffResult::Equal => ExitCode::SUCCESS,
        DiffResult::Different(diff) => {
            print!("{}", diff);
            ExitCode::from(1)
        }
        DiffResult::Failed(error) => {
            eprintln!("error: {}", error);
            ExitCode::from(2)
        }
    }
}
