//! `turtle-canon` — Canonicalizes Turtle files in place.
//!
//! Each file is validated, parsed, sorted and re-serialized into a canonical
//! layout. Files are processed in the order given. Paths of files whose
//! content changed are listed on stdout.
//!
//! **Usage:**
//! ```text
//! turtle-canon [--fail-fast] [--log-level <LEVEL>] <TURTLE_FILE>...
//! ```
//!
//! Exits non-zero if any file ends in an error. Warnings (empty files,
//! files without triples) do not affect the exit code.

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

use std::io::{self, Write};
use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;
use turtle_canon::{batch, report, FailurePolicy};

/// Logging verbosity accepted by `--log-level`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogLevel {
    Notset,
    Debug,
    Info,
    Warning,
    Error,
    Critical,
}

impl LogLevel {
    fn directive(self) -> &'static str {
        match self {
            Self::Notset => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warning => "warn",
            Self::Error | Self::Critical => "error",
        }
    }
}

/// Canonicalize Turtle files in place.
#[derive(Parser)]
#[command(
    name = "turtle-canon",
    version,
    about = "Canonicalize Turtle (RDF) files in place"
)]
struct Args {
    /// Turtle files to canonicalize.
    #[arg(value_name = "TURTLE_FILE", required = true, num_args = 1..)]
    files: Vec<PathBuf>,

    /// Stop at the first file that ends in an error.
    #[arg(long)]
    fail_fast: bool,

    /// Logging level. Without it, RUST_LOG applies, else `info`.
    #[arg(long, value_enum)]
    log_level: Option<LogLevel>,
}

fn init_tracing(level: Option<LogLevel>) {
    let filter = match level {
        Some(level) => EnvFilter::new(level.directive()),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.log_level);

    let policy = FailurePolicy::from_fail_fast(args.fail_fast);
    tracing::debug!(files = args.files.len(), ?policy, "starting");

    let result = batch::run(&args.files, policy);
    let rendered = report::render(&result);

    io::stdout()
        .write_all(rendered.stdout.as_bytes())
        .context("Failed to write to stdout")?;
    io::stderr()
        .write_all(rendered.stderr.as_bytes())
        .context("Failed to write to stderr")?;

    process::exit(rendered.exit_code);
}
