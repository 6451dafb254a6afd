//! Turtle Canon: deterministic, in-place canonicalization of RDF Turtle files.
//!
//! Two Turtle files holding the same triples canonicalize to the same bytes,
//! whatever tool wrote them and in whatever order or layout. A plain text
//! diff between canonical files is therefore a diff between graphs.
//!
//! # Pipeline
//!
//! | Stage | Module | Fails with |
//! |-------|--------|------------|
//! | Validate | [`validate`] | not found, unreadable, unwritable, *empty* |
//! | Load and sort | [`sort`], [`blank`] | malformed Turtle, inconsistency, *no triples* |
//! | Export | [`export`] | vanished file, empty serialization |
//!
//! Italic conditions are warnings; everything else is an error. The
//! [`batch`] runner applies the pipeline to many files under a
//! [`FailurePolicy`] and [`report`] renders the outcome for the console.
//!
//! # Entry Point
//!
//! ```no_run
//! use turtle_canon::{batch, report, FailurePolicy};
//!
//! let result = batch::run(&["ontology.ttl"], FailurePolicy::Continue);
//! let rendered = report::render(&result);
//! print!("{}", rendered.stdout);
//! eprint!("{}", rendered.stderr);
//! std::process::exit(rendered.exit_code);
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

pub mod batch;
pub mod blank;
pub mod directives;
pub mod error;
pub mod export;
pub mod model;
pub mod report;
pub mod sort;
pub mod validate;

use std::path::Path;

pub use batch::{BatchResult, FailurePolicy, FileOutcome, FileReport};
pub use error::{CanonError, Kind, Severity};
pub use model::{Graph, SortedGraph, TermKey, Triple, TripleKey};
pub use validate::ValidatedPath;

/// Canonicalizes one Turtle file in place.
///
/// Runs [`validate::validate`], [`sort::sort_graph`] and
/// [`export::export_graph`] in sequence. Returns whether the file changed.
///
/// # Errors
///
/// The first [`CanonError`] raised by any stage, warnings included.
pub fn canonize(path: &Path) -> Result<bool, CanonError> {
    let validated = validate::validate(path)?;
    let sorted = sort::sort_graph(&validated)?;
    export::export_graph(&sorted, &validated)
}

/// Canonical Turtle text for `text`, without touching the file system
/// beyond the serializer's scratch directory.
///
/// # Errors
///
/// Returns the parser or serializer error as a boxed error.
pub fn canonical_string(
    text: &str,
) -> Result<String, Box<dyn std::error::Error + Send + Sync + 'static>> {
    let graph = sort::graph_from_str(text)?;
    let sorted = sort::sort(&graph, Path::new("<memory>"))?;
    export::serialize(sorted.graph())
}
