//! Human-readable rendering of a [`BatchResult`].
//!
//! Rendering is kept apart from printing so the exact console output of a
//! batch can be asserted on without spawning a process.

use std::error::Error as _;
use std::fmt::Write as _;

use crate::batch::{BatchResult, FailurePolicy, FileOutcome};
use crate::error::CanonError;

/// Console output of a batch: what goes where, and the exit code.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Rendered {
    /// Text for standard output (summary on success, changed files).
    pub stdout: String,
    /// Text for standard error (errors, warnings, failure summary).
    pub stderr: String,
    /// Process exit code.
    pub exit_code: i32,
}

/// Appends the error's source chain, one `Caused by:` line per link.
fn push_causes(out: &mut String, err: &CanonError) {
    let mut source = err.source();
    while let Some(cause) = source {
        let _ = writeln!(out, "Caused by: {cause}");
        source = cause.source();
    }
}

/// Per-file block for an error.
#[must_use]
pub fn error_block(err: &CanonError) -> String {
    let mut out = format!("ERROR: Misfire !\n\n{err}\n");
    push_causes(&mut out, err);
    let _ = writeln!(
        out,
        "\nGeneral information about the exception: {}",
        err.kind().general_info()
    );
    out
}

/// Per-file block for a warning.
#[must_use]
pub fn warning_block(err: &CanonError) -> String {
    let mut out = format!("WARNING: Don't come too close !\n\n{err}\n");
    push_causes(&mut out, err);
    let _ = writeln!(
        out,
        "\nGeneral information about the warning: {}",
        err.kind().general_info()
    );
    out
}

fn summary_section<'a>(out: &mut String, title: &str, items: impl Iterator<Item = &'a CanonError>) {
    let mut items = items.peekable();
    if items.peek().is_none() {
        return;
    }
    let _ = writeln!(out, "{title}:");
    for err in items {
        let _ = writeln!(out, "* {err}");
        let _ = writeln!(out, "  General info: {}", err.kind().general_info());
    }
}

/// Renders the console output of a batch.
///
/// - A single requested file ending in a warning renders only that warning.
/// - Under [`FailurePolicy::FailFast`], warnings render as per-file blocks
///   and an error renders as a per-file block with nothing after it.
/// - Otherwise a summary follows: `Successful Fire !` on stdout when nothing
///   went wrong, else the collected errors and warnings on stderr.
/// - Changed files are listed on stdout.
#[must_use]
pub fn render(result: &BatchResult) -> Rendered {
    let mut rendered = Rendered {
        exit_code: result.exit_code(),
        ..Rendered::default()
    };

    if result.requested == 1 {
        if let [report] = result.reports.as_slice() {
            if let FileOutcome::Warning(warning) = &report.outcome {
                rendered.stderr = warning_block(warning);
                return rendered;
            }
        }
    }

    let fail_fast = result.policy == FailurePolicy::FailFast;
    if fail_fast {
        for warning in result.warnings() {
            rendered.stderr.push_str(&warning_block(warning));
        }
        if let Some(err) = result.errors().next() {
            rendered.stderr.push_str(&error_block(err));
            return rendered;
        }
    }

    let has_summary_warnings = !fail_fast && result.warnings().next().is_some();
    if result.has_errors() || has_summary_warnings {
        rendered.stderr.push_str("The balls are stuck !\n\n");
        summary_section(&mut rendered.stderr, "ERRORS", result.errors());
        if !fail_fast {
            summary_section(&mut rendered.stderr, "WARNINGS", result.warnings());
        }
    } else {
        rendered.stdout.push_str("Successful Fire !\n");
    }

    if !result.changed.is_empty() {
        if !rendered.stdout.is_empty() {
            rendered.stdout.push('\n');
        }
        rendered.stdout.push_str("Changed files:\n");
        for path in &result.changed {
            let _ = writeln!(rendered.stdout, "{}", path.display());
        }
    }

    rendered
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::FileReport;
    use std::path::PathBuf;

    fn report(path: &str, outcome: FileOutcome) -> FileReport {
        FileReport {
            path: PathBuf::from(path),
            outcome,
        }
    }

    fn missing(path: &str) -> FileOutcome {
        FileOutcome::Error(CanonError::NotFound {
            path: PathBuf::from(path),
        })
    }

    fn empty(path: &str) -> FileOutcome {
        FileOutcome::Warning(CanonError::EmptyFile {
            path: PathBuf::from(path),
        })
    }

    fn batch(policy: FailurePolicy, requested: usize, reports: Vec<FileReport>) -> BatchResult {
        let changed = reports
            .iter()
            .filter(|r| matches!(r.outcome, FileOutcome::Success { changed: true }))
            .map(|r| r.path.clone())
            .collect();
        let has_errors = reports.iter().any(|r| r.outcome.is_error());
        BatchResult {
            policy,
            requested,
            aborted: policy == FailurePolicy::FailFast && has_errors && reports.len() < requested,
            reports,
            changed,
        }
    }

    #[test]
    fn clean_batch_is_successful() {
        let result = batch(
            FailurePolicy::Continue,
            2,
            vec![
                report("/a.ttl", FileOutcome::Success { changed: true }),
                report("/b.ttl", FileOutcome::Success { changed: false }),
            ],
        );
        let out = render(&result);
        assert!(out.stderr.is_empty());
        assert!(out.stdout.starts_with("Successful Fire !\n"));
        assert!(out.stdout.contains("Changed files:\n/a.ttl\n"));
        assert!(!out.stdout.contains("/b.ttl"));
        assert_eq!(out.exit_code, 0);
    }

    #[test]
    fn single_warning_is_the_only_output() {
        let result = batch(FailurePolicy::Continue, 1, vec![report("/e.ttl", empty("/e.ttl"))]);
        let out = render(&result);
        assert!(out.stdout.is_empty());
        assert!(out.stderr.starts_with("WARNING: Don't come too close !"));
        assert!(out.stderr.contains("The Turtle file /e.ttl is empty."));
        assert!(!out.stderr.contains("The balls are stuck"));
        assert_eq!(out.exit_code, 0);
    }

    #[test]
    fn continue_batch_summarizes_errors_and_warnings() {
        let result = batch(
            FailurePolicy::Continue,
            3,
            vec![
                report("/a.ttl", FileOutcome::Success { changed: true }),
                report("/m.ttl", missing("/m.ttl")),
                report("/e.ttl", empty("/e.ttl")),
            ],
        );
        let out = render(&result);
        assert!(out.stderr.starts_with("The balls are stuck !"));
        assert!(out.stderr.contains("ERRORS:\n* Supplied file /m.ttl not found.\n"));
        assert!(out.stderr.contains("WARNINGS:\n* The Turtle file /e.ttl is empty.\n"));
        assert!(!out.stdout.contains("Successful"));
        assert!(out.stdout.contains("/a.ttl"));
        assert_eq!(out.exit_code, 1);
    }

    #[test]
    fn fail_fast_error_renders_alone() {
        let result = batch(
            FailurePolicy::FailFast,
            4,
            vec![
                report("/a.ttl", FileOutcome::Success { changed: true }),
                report("/e.ttl", empty("/e.ttl")),
                report("/m.ttl", missing("/m.ttl")),
            ],
        );
        let out = render(&result);
        assert!(out.stdout.is_empty());
        assert!(out.stderr.starts_with("WARNING: "));
        assert!(out.stderr.contains("ERROR: Misfire !\n\nSupplied file /m.ttl not found.\n"));
        assert!(!out.stderr.contains('*'));
        assert_eq!(out.exit_code, 1);
    }

    #[test]
    fn fail_fast_warnings_do_not_reach_the_summary() {
        let result = batch(
            FailurePolicy::FailFast,
            2,
            vec![
                report("/a.ttl", FileOutcome::Success { changed: false }),
                report("/e.ttl", empty("/e.ttl")),
            ],
        );
        let out = render(&result);
        assert!(out.stderr.starts_with("WARNING: "));
        assert!(!out.stderr.contains("The balls are stuck"));
        assert!(out.stdout.starts_with("Successful Fire !"));
        assert_eq!(out.exit_code, 0);
    }

    #[test]
    fn error_block_lists_causes() {
        let err = CanonError::Read {
            path: PathBuf::from("/r.ttl"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        let block = error_block(&err);
        assert!(block.contains("Caused by: denied"));
        assert!(block.ends_with("General information about the exception: Failed to read a file.\n"));
    }
}
