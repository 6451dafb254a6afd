//! Turtle export of a sorted graph back to its source file.
//!
//! Serialization goes to a scratch directory first; the source file is only
//! overwritten once a non-empty canonical text exists.

use std::error::Error;
use std::fs::{self, File};
use std::io::{BufWriter, Write};

use sophia_api::prefix::{Prefix, PrefixMapPair};
use sophia_api::serializer::TripleSerializer;
use sophia_iri::Iri;
use sophia_turtle::serializer::turtle::{TurtleConfig, TurtleSerializer};
use tracing::{debug, trace};

use crate::error::CanonError;
use crate::model::{Graph, SortedGraph};
use crate::validate::ValidatedPath;

const SCRATCH_FILE: &str = "canonical.ttl";

/// Prefix map handed to the serializer, in prefix order.
fn prefix_map(graph: &Graph) -> Vec<PrefixMapPair> {
    graph
        .namespaces()
        .iter()
        .filter_map(|(prefix, namespace)| {
            let pair = Prefix::new(prefix.clone().into_boxed_str())
                .ok()
                .zip(Iri::new(namespace.clone().into_boxed_str()).ok());
            if pair.is_none() {
                trace!(prefix = prefix.as_str(), namespace = namespace.as_str(), "unusable binding");
            }
            pair
        })
        .collect()
}

/// Serializes `graph` as pretty Turtle into a scratch directory and returns
/// the text. The scratch directory is removed on every exit path.
///
/// The output is an optional `BASE` line followed by the sophia pretty
/// Turtle rendering of the statements, in graph order, with the graph's
/// namespace bindings.
///
/// # Errors
///
/// Returns the I/O or serializer error that interrupted serialization.
pub fn serialize(graph: &Graph) -> Result<String, Box<dyn Error + Send + Sync + 'static>> {
    let scratch = tempfile::Builder::new()
        .prefix("turtle-canon-")
        .tempdir()?;
    let scratch_file = scratch.path().join(SCRATCH_FILE);

    let mut writer = BufWriter::new(File::create(&scratch_file)?);
    if let Some(base) = graph.base() {
        writeln!(writer, "BASE <{base}>")?;
    }
    let config = TurtleConfig::new()
        .with_pretty(true)
        .with_prefix_map(&prefix_map(graph)[..]);
    TurtleSerializer::new_with_config(&mut writer, config).serialize_graph(&graph.statements())?;
    writer.flush()?;
    drop(writer);

    let text = fs::read_to_string(&scratch_file)?;
    trace!(bytes = text.len(), scratch = %scratch.path().display(), "serialized");
    Ok(text)
}

/// Writes the canonical Turtle of `graph` to `path`.
///
/// The file is always rewritten, even when its content is already canonical.
/// Returns whether the file's bytes changed.
///
/// # Errors
///
/// - [`CanonError::Vanished`] if `path` no longer exists.
/// - [`CanonError::Export`] if serialization fails or yields only whitespace.
/// - [`CanonError::Read`] / [`CanonError::Write`] on I/O failures at `path`.
pub fn export_graph(graph: &SortedGraph, path: &ValidatedPath) -> Result<bool, CanonError> {
    let path = path.as_path();
    if !path.exists() {
        return Err(CanonError::Vanished {
            path: path.to_path_buf(),
        });
    }

    let canonical = serialize(graph.graph()).map_err(|source| CanonError::Export {
        path: path.to_path_buf(),
        source: Some(source),
    })?;
    if canonical.trim().is_empty() {
        return Err(CanonError::Export {
            path: path.to_path_buf(),
            source: None,
        });
    }

    let current = fs::read(path).map_err(|source| CanonError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let changed = current != canonical.as_bytes();

    fs::write(path, canonical.as_bytes()).map_err(|source| CanonError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), changed, "exported");

    Ok(changed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Kind;
    use crate::sort::{graph_from_str, sort};
    use crate::validate::validate;

    const SOURCE: &str = "@prefix ex: <http://example.org/onto#> .\n\
                          ex:b ex:p \"two\" .\n\
                          ex:a ex:p \"one\" .\n";

    #[test]
    fn empty_graph_fails_export() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("empty-graph.ttl");
        fs::write(&file, "# nothing\n").unwrap();
        let validated = validate(&file).unwrap();
        let err = export_graph(&SortedGraph::new(Graph::default()), &validated).unwrap_err();
        assert_eq!(err.kind(), Kind::ExportFailure);
        assert!(err
            .to_string()
            .contains("Failed to properly save the loaded ontology from"));
    }

    #[test]
    fn vanished_file_fails_export() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("onto.ttl");
        fs::write(&file, SOURCE).unwrap();
        let validated = validate(&file).unwrap();
        let sorted = sort(&graph_from_str(SOURCE).unwrap(), &file).unwrap();
        fs::remove_file(&file).unwrap();
        let err = export_graph(&sorted, &validated).unwrap_err();
        assert!(matches!(err, CanonError::Vanished { .. }));
        assert!(err.to_string().contains("was unexpectedly not found !"));
    }

    #[test]
    fn second_export_reports_no_change() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("onto.ttl");
        fs::write(&file, SOURCE).unwrap();
        let validated = validate(&file).unwrap();
        let sorted = sort(&graph_from_str(SOURCE).unwrap(), &file).unwrap();

        export_graph(&sorted, &validated).unwrap();
        let first = fs::read_to_string(&file).unwrap();
        assert!(!export_graph(&sorted, &validated).unwrap());
        assert_eq!(fs::read_to_string(&file).unwrap(), first);
    }

    #[test]
    fn output_keeps_prefixes_and_base() {
        let source = "@base <http://example.org/> .\n\
                      @prefix ex: <http://example.org/onto#> .\n\
                      <thing> ex:p ex:o .\n";
        let text = serialize(&graph_from_str(source).unwrap()).unwrap();
        assert!(text.starts_with("BASE <http://example.org/>\n"));
        assert!(!text.contains("@base"));
        assert!(text.contains("ex: <http://example.org/onto#>"));
        assert!(!text.trim().is_empty());
    }

    #[test]
    fn base_line_survives_a_second_pass() {
        let source = "@base <http://example.org/> .\n<thing> <http://example.org/p> \"o\" .\n";
        let once = serialize(&graph_from_str(source).unwrap()).unwrap();
        let reparsed = graph_from_str(&once).unwrap();
        assert_eq!(reparsed.base(), Some("http://example.org/"));
        assert_eq!(serialize(&reparsed).unwrap(), once);
    }
}
