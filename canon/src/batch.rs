//! Multi-file batch processing under a failure policy.
//!
//! Files are processed front to back in the order given. Each file runs
//! validate → sort → export and stops at its first failure. The policy only
//! decides what an *error* does to the rest of the batch; warnings never
//! abort it.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::canonize;
use crate::error::{CanonError, Severity};

/// What the first per-file error does to the batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Keep going; collect every error and warning.
    #[default]
    Continue,
    /// Stop at the first error; remaining files are not attempted.
    FailFast,
}

impl FailurePolicy {
    /// Policy selected by a `--fail-fast` style flag.
    #[must_use]
    pub fn from_fail_fast(fail_fast: bool) -> Self {
        if fail_fast {
            FailurePolicy::FailFast
        } else {
            FailurePolicy::Continue
        }
    }
}

/// Result of processing one file.
#[derive(Debug)]
pub enum FileOutcome {
    /// Canonicalized; `changed` tells whether the file's bytes changed.
    Success {
        /// Whether the file was altered.
        changed: bool,
    },
    /// The file is trivial (empty or without triples); left as is.
    Warning(CanonError),
    /// The file could not be canonicalized.
    Error(CanonError),
}

impl FileOutcome {
    /// Classifies the result of [`canonize`].
    #[must_use]
    pub fn from_result(result: Result<bool, CanonError>) -> Self {
        match result {
            Ok(changed) => FileOutcome::Success { changed },
            Err(err) => match err.severity() {
                Severity::Warning => FileOutcome::Warning(err),
                Severity::Error => FileOutcome::Error(err),
            },
        }
    }

    /// Returns true for [`FileOutcome::Error`].
    #[must_use]
    pub fn is_error(&self) -> bool {
        matches!(self, FileOutcome::Error(_))
    }

    /// Returns true for [`FileOutcome::Warning`].
    #[must_use]
    pub fn is_warning(&self) -> bool {
        matches!(self, FileOutcome::Warning(_))
    }
}

/// A requested path and what happened to it.
#[derive(Debug)]
pub struct FileReport {
    /// The path as it was requested.
    pub path: PathBuf,
    /// The file's outcome.
    pub outcome: FileOutcome,
}

/// Everything one batch run produced.
#[derive(Debug)]
pub struct BatchResult {
    /// Policy the batch ran under.
    pub policy: FailurePolicy,
    /// Number of paths requested, attempted or not.
    pub requested: usize,
    /// Attempted files, in processing order.
    pub reports: Vec<FileReport>,
    /// Requested paths of the files whose bytes changed.
    pub changed: Vec<PathBuf>,
    /// True if a fail-fast batch stopped before the end of the list.
    pub aborted: bool,
}

impl BatchResult {
    /// Errors, in processing order.
    pub fn errors(&self) -> impl Iterator<Item = &CanonError> + '_ {
        self.reports.iter().filter_map(|r| match &r.outcome {
            FileOutcome::Error(err) => Some(err),
            _ => None,
        })
    }

    /// Warnings, in processing order.
    pub fn warnings(&self) -> impl Iterator<Item = &CanonError> + '_ {
        self.reports.iter().filter_map(|r| match &r.outcome {
            FileOutcome::Warning(err) => Some(err),
            _ => None,
        })
    }

    /// Returns true if any file ended in an error.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.reports.iter().any(|r| r.outcome.is_error())
    }

    /// Process exit code: 1 if any error occurred, otherwise 0.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        i32::from(self.has_errors())
    }
}

/// Canonicalizes every path in `paths` under `policy`.
///
/// Reports are recorded in processing order; under [`FailurePolicy::FailFast`]
/// the list ends with the aborting error.
pub fn run<P: AsRef<Path>>(paths: &[P], policy: FailurePolicy) -> BatchResult {
    run_with(paths, policy, canonize)
}

/// [`run`] with a caller-supplied per-file pipeline.
pub fn run_with<P, F>(paths: &[P], policy: FailurePolicy, mut pipeline: F) -> BatchResult
where
    P: AsRef<Path>,
    F: FnMut(&Path) -> Result<bool, CanonError>,
{
    let mut result = BatchResult {
        policy,
        requested: paths.len(),
        reports: Vec::with_capacity(paths.len()),
        changed: Vec::new(),
        aborted: false,
    };

    for (index, path) in paths.iter().enumerate() {
        let path = path.as_ref();
        let outcome = FileOutcome::from_result(pipeline(path));
        debug!(path = %path.display(), ?outcome, "processed");

        if let FileOutcome::Success { changed: true } = outcome {
            result.changed.push(path.to_path_buf());
        }
        let stop = outcome.is_error() && policy == FailurePolicy::FailFast;
        result.reports.push(FileReport {
            path: path.to_path_buf(),
            outcome,
        });

        if stop {
            result.aborted = index + 1 < paths.len();
            debug!(remaining = paths.len() - index - 1, "fail-fast abort");
            break;
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scripted(path: &Path) -> Result<bool, CanonError> {
        let name = path.to_string_lossy();
        if name.starts_with("missing") {
            Err(CanonError::NotFound {
                path: path.to_path_buf(),
            })
        } else if name.starts_with("empty") {
            Err(CanonError::EmptyFile {
                path: path.to_path_buf(),
            })
        } else {
            Ok(name.starts_with("dirty"))
        }
    }

    #[test]
    fn continue_policy_attempts_every_file() {
        let paths = ["dirty-1.ttl", "missing.ttl", "empty.ttl", "clean.ttl", "dirty-2.ttl"];
        let result = run_with(&paths, FailurePolicy::Continue, scripted);
        assert_eq!(result.reports.len(), 5);
        assert_eq!(result.errors().count(), 1);
        assert_eq!(result.warnings().count(), 1);
        assert_eq!(
            result.changed,
            vec![PathBuf::from("dirty-1.ttl"), PathBuf::from("dirty-2.ttl")]
        );
        assert!(!result.aborted);
        assert_eq!(result.exit_code(), 1);
    }

    #[test]
    fn fail_fast_stops_at_first_error() {
        let paths = ["dirty-1.ttl", "empty.ttl", "missing.ttl", "dirty-2.ttl"];
        let result = run_with(&paths, FailurePolicy::FailFast, scripted);
        assert_eq!(result.reports.len(), 3);
        assert!(result.reports[1].outcome.is_warning());
        assert!(result.reports[2].outcome.is_error());
        assert_eq!(result.changed, vec![PathBuf::from("dirty-1.ttl")]);
        assert!(result.aborted);
        assert_eq!(result.exit_code(), 1);
    }

    #[test]
    fn fail_fast_error_on_last_file_is_not_an_abort() {
        let paths = ["clean.ttl", "missing.ttl"];
        let result = run_with(&paths, FailurePolicy::FailFast, scripted);
        assert_eq!(result.reports.len(), 2);
        assert!(!result.aborted);
        assert!(result.has_errors());
    }

    #[test]
    fn warnings_alone_exit_zero() {
        let result = run_with(&["empty.ttl"], FailurePolicy::FailFast, scripted);
        assert_eq!(result.warnings().count(), 1);
        assert_eq!(result.exit_code(), 0);
    }

    #[test]
    fn policy_from_flag() {
        assert_eq!(FailurePolicy::from_fail_fast(true), FailurePolicy::FailFast);
        assert_eq!(FailurePolicy::from_fail_fast(false), FailurePolicy::Continue);
    }
}
