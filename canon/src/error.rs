//! Failure taxonomy for the canonicalization pipeline.
//!
//! Every condition a stage can detect is a variant of [`CanonError`]. The
//! variants split into two severities: warnings (the file is acceptable but
//! trivial) and errors (the file cannot be canonicalized). Only the batch
//! runner looks at the severity; the stages just raise.

use std::path::PathBuf;

use thiserror::Error;

/// Severity of a [`CanonError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Non-fatal: processing of the file stops, the batch continues.
    Warning,
    /// Fatal for the file; aborts a fail-fast batch.
    Error,
}

/// The kind of a [`CanonError`], independent of its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    /// The file does not exist.
    NotFound,
    /// The file could not be read or is not valid UTF-8.
    ReadFailure,
    /// The file could not be opened for writing.
    WriteFailure,
    /// The file content is not valid Turtle.
    ParseFailure,
    /// Re-creating the sorted graph lost or duplicated triples.
    Inconsistency,
    /// Serializing the sorted graph failed or produced nothing.
    ExportFailure,
    /// The file is empty.
    EmptyFile,
    /// The file parses but contains no triples.
    NoTriples,
}

impl Kind {
    /// Severity class of this kind.
    #[must_use]
    pub fn severity(self) -> Severity {
        match self {
            Kind::EmptyFile | Kind::NoTriples => Severity::Warning,
            Kind::NotFound
            | Kind::ReadFailure
            | Kind::WriteFailure
            | Kind::ParseFailure
            | Kind::Inconsistency
            | Kind::ExportFailure => Severity::Error,
        }
    }

    /// Fixed, human-readable description of the kind, shown next to the
    /// specific message in reports.
    #[must_use]
    pub fn general_info(self) -> &'static str {
        match self {
            Kind::NotFound => "A Turtle file cannot be found.",
            Kind::ReadFailure => "Failed to read a file.",
            Kind::WriteFailure => "Failed to write to a file.",
            Kind::ParseFailure => "Failed to parse a Turtle file.",
            Kind::Inconsistency => {
                "Inconsistency found between the parsed and the re-created ontology."
            }
            Kind::ExportFailure => "Failed to export an ontology to file.",
            Kind::EmptyFile => "A file's content is empty.",
            Kind::NoTriples => "No triples found in the parsed file.",
        }
    }
}

/// Errors and warnings raised by the pipeline stages.
#[derive(Debug, Error)]
pub enum CanonError {
    /// The supplied path does not exist.
    #[error("Supplied file {} not found.", .path.display())]
    NotFound {
        /// Absolute path that was looked up.
        path: PathBuf,
    },

    /// A validated file disappeared before it could be rewritten.
    #[error("File at {} was unexpectedly not found !", .path.display())]
    Vanished {
        /// Absolute path of the vanished file.
        path: PathBuf,
    },

    /// I/O failure while reading the file.
    #[error(
        "The Turtle file {} could not be opened and read (using UTF-8 encoding).",
        .path.display()
    )]
    Read {
        /// File being read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The file bytes are not valid UTF-8.
    #[error(
        "The Turtle file {} could not be opened and read (using UTF-8 encoding).",
        .path.display()
    )]
    Utf8 {
        /// File being decoded.
        path: PathBuf,
        /// Underlying decoding error.
        #[source]
        source: std::string::FromUtf8Error,
    },

    /// The file cannot be opened for writing.
    #[error(
        "The Turtle file {} could not be opened and written to (using UTF-8 encoding).",
        .path.display()
    )]
    Write {
        /// File being written.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The Turtle parser rejected the file.
    #[error("Failed to properly parse the Turtle file at {}", .path.display())]
    Parse {
        /// File being parsed.
        path: PathBuf,
        /// Parser diagnostic.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
    },

    /// The re-created graph does not hold exactly the parsed triples.
    #[error(
        "After sorting the ontology triples from the Turtle file at {} and re-creating the ontology, inconsistencies were found !",
        .path.display()
    )]
    Inconsistency {
        /// File whose graph was re-created.
        path: PathBuf,
        /// Triples in the parsed graph.
        parsed: usize,
        /// Triples in the re-created graph.
        rebuilt: usize,
    },

    /// Serialization failed or produced empty output.
    #[error("Failed to properly save the loaded ontology from {} to file.", .path.display())]
    Export {
        /// File the graph was loaded from.
        path: PathBuf,
        /// Underlying failure, absent when the serializer produced nothing.
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
    },

    /// The file is empty.
    #[error("The Turtle file {} is empty.", .path.display())]
    EmptyFile {
        /// Empty file.
        path: PathBuf,
    },

    /// The file parsed but holds no triples.
    #[error("No triples found in the parsed non-empty Turtle file at {}", .path.display())]
    NoTriples {
        /// File without triples.
        path: PathBuf,
    },
}

impl CanonError {
    /// The kind of this failure.
    #[must_use]
    pub fn kind(&self) -> Kind {
        match self {
            CanonError::NotFound { .. } | CanonError::Vanished { .. } => Kind::NotFound,
            CanonError::Read { .. } | CanonError::Utf8 { .. } => Kind::ReadFailure,
            CanonError::Write { .. } => Kind::WriteFailure,
            CanonError::Parse { .. } => Kind::ParseFailure,
            CanonError::Inconsistency { .. } => Kind::Inconsistency,
            CanonError::Export { .. } => Kind::ExportFailure,
            CanonError::EmptyFile { .. } => Kind::EmptyFile,
            CanonError::NoTriples { .. } => Kind::NoTriples,
        }
    }

    /// Severity class of this failure.
    #[must_use]
    pub fn severity(&self) -> Severity {
        self.kind().severity()
    }

    /// Returns true if this is a non-fatal warning.
    #[must_use]
    pub fn is_warning(&self) -> bool {
        self.severity() == Severity::Warning
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn warnings_are_empty_file_and_no_triples_only() {
        let path = PathBuf::from("/tmp/x.ttl");
        assert!(CanonError::EmptyFile { path: path.clone() }.is_warning());
        assert!(CanonError::NoTriples { path: path.clone() }.is_warning());
        assert!(!CanonError::NotFound { path: path.clone() }.is_warning());
        assert!(!CanonError::Inconsistency {
            path,
            parsed: 2,
            rebuilt: 1
        }
        .is_warning());
    }

    #[test]
    fn vanished_file_is_classified_as_not_found() {
        let err = CanonError::Vanished {
            path: PathBuf::from("/tmp/gone.ttl"),
        };
        assert_eq!(err.kind(), Kind::NotFound);
        assert_eq!(
            err.to_string(),
            "File at /tmp/gone.ttl was unexpectedly not found !"
        );
    }

    #[test]
    fn not_found_message_contains_path() {
        let err = CanonError::NotFound {
            path: PathBuf::from("/data/onto.ttl"),
        };
        assert_eq!(err.to_string(), "Supplied file /data/onto.ttl not found.");
        assert_eq!(err.severity(), Severity::Error);
    }
}
