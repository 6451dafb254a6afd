//! Loading, canonical sorting and re-creation of a Turtle graph.
//!
//! The graph is parsed with sophia, its triples sorted by [`TripleKey`], and
//! a fresh [`Graph`] is built from the sorted sequence. The fresh graph is
//! then checked against the parsed one: re-creation must neither lose nor
//! duplicate a triple.
//!
//! [`TripleKey`]: crate::model::TripleKey

use std::fs;
use std::path::Path;

use sophia_api::source::TripleSource;
use sophia_api::term::SimpleTerm;
use sophia_turtle::parser::turtle;
use tracing::{debug, error, trace};

use crate::blank;
use crate::directives;
use crate::error::CanonError;
use crate::model::{Graph, SortedGraph, Triple};
use crate::validate::ValidatedPath;

/// Parses Turtle text into owned statements, in document order.
///
/// # Errors
///
/// Returns the parser diagnostic if `text` is not valid Turtle.
pub fn parse_statements(
    text: &str,
) -> Result<Vec<[SimpleTerm<'static>; 3]>, Box<dyn std::error::Error + Send + Sync + 'static>> {
    let statements: Vec<[SimpleTerm<'static>; 3]> = turtle::parse_str(text).collect_triples()?;
    Ok(statements)
}

/// Builds a [`Graph`] from Turtle text.
///
/// Blank nodes get their canonical labels. Namespace bindings are kept only
/// when some IRI of the graph falls under them, so unused declarations do
/// not reach the canonical form.
///
/// # Errors
///
/// Returns the parser diagnostic if `text` is not valid Turtle.
pub fn graph_from_str(
    text: &str,
) -> Result<Graph, Box<dyn std::error::Error + Send + Sync + 'static>> {
    let parsed: Graph = blank::relabel(parse_statements(text)?)
        .into_iter()
        .map(Triple::new)
        .collect();
    let declared = directives::scan(text);

    let mut namespaces = declared.namespaces;
    namespaces.retain(|prefix, namespace| {
        let used = parsed
            .mentioned_iris()
            .any(|iri| iri.starts_with(namespace.as_str()));
        if !used {
            trace!(prefix = prefix.as_str(), "dropping unused namespace");
        }
        used
    });

    let mut graph = Graph::with_metadata(namespaces, declared.base);
    for triple in parsed.triples() {
        graph.insert(triple);
    }
    Ok(graph)
}

/// Reads and parses a validated Turtle file.
///
/// # Errors
///
/// - [`CanonError::Read`] / [`CanonError::Utf8`] if the file cannot be read.
/// - [`CanonError::Parse`] if it is not valid Turtle.
pub fn load_graph(path: &ValidatedPath) -> Result<Graph, CanonError> {
    let path = path.as_path();
    let bytes = fs::read(path).map_err(|source| CanonError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let text = String::from_utf8(bytes).map_err(|source| CanonError::Utf8 {
        path: path.to_path_buf(),
        source,
    })?;

    let graph = graph_from_str(&text).map_err(|source| CanonError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(
        path = %path.display(),
        triples = graph.len(),
        namespaces = graph.namespaces().len(),
        "parsed"
    );
    Ok(graph)
}

/// Re-creates `original` with its triples inserted in canonical order.
///
/// # Errors
///
/// - [`CanonError::NoTriples`] (a warning) if the graph is empty.
/// - [`CanonError::Inconsistency`] if re-creation lost or duplicated triples.
pub fn sort(original: &Graph, path: &Path) -> Result<SortedGraph, CanonError> {
    let mut triples: Vec<Triple> = original.triples().collect();
    triples.sort_by(|a, b| a.key().cmp(b.key()));

    if triples.is_empty() {
        return Err(CanonError::NoTriples {
            path: path.to_path_buf(),
        });
    }

    let mut rebuilt = Graph::with_metadata(
        original.namespaces().clone(),
        original.base().map(str::to_string),
    );
    for triple in triples {
        rebuilt.insert(triple);
    }

    check_consistency(original, &rebuilt, path)?;
    Ok(SortedGraph::new(rebuilt))
}

/// Verifies that `rebuilt` holds exactly the triples of `original`.
///
/// # Errors
///
/// Returns [`CanonError::Inconsistency`] if a triple of `original` is missing
/// from `rebuilt` or the triple counts differ.
pub fn check_consistency(original: &Graph, rebuilt: &Graph, path: &Path) -> Result<(), CanonError> {
    let missing = original.keys().filter(|key| !rebuilt.contains(key)).count();
    if missing == 0 && original.len() == rebuilt.len() {
        return Ok(());
    }

    error!(
        path = %path.display(),
        parsed = original.len(),
        rebuilt = rebuilt.len(),
        missing,
        "re-created graph differs from the parsed graph"
    );
    Err(CanonError::Inconsistency {
        path: path.to_path_buf(),
        parsed: original.len(),
        rebuilt: rebuilt.len(),
    })
}

/// Loads a validated Turtle file and returns its canonically sorted graph.
///
/// # Errors
///
/// Any error of [`load_graph`] or [`sort`].
pub fn sort_graph(path: &ValidatedPath) -> Result<SortedGraph, CanonError> {
    let original = load_graph(path)?;
    sort(&original, path.as_path())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Kind;
    use crate::model::TripleKey;

    const ONTOLOGY: &str = r#"@prefix ex: <http://example.org/onto#> .
@prefix rdfs: <http://www.w3.org/2000/01/rdf-schema#> .
@prefix unused: <http://unused.example/> .

ex:B rdfs:label "B" .
ex:A rdfs:subClassOf ex:B ;
    rdfs:label "A"@en .
"#;

    #[test]
    fn sorted_graph_is_in_canonical_order() {
        let graph = graph_from_str(ONTOLOGY).unwrap();
        let sorted = sort(&graph, Path::new("/tmp/onto.ttl")).unwrap();
        let keys: Vec<TripleKey> = sorted.graph().triples().map(|t| t.key().clone()).collect();
        let mut expected = keys.clone();
        expected.sort();
        assert_eq!(keys, expected);
        assert_eq!(keys.len(), 3);
    }

    #[test]
    fn metadata_survives_sorting() {
        let graph = graph_from_str(ONTOLOGY).unwrap();
        let sorted = sort(&graph, Path::new("/tmp/onto.ttl")).unwrap();
        let namespaces = sorted.graph().namespaces();
        assert!(namespaces.contains_key("ex"));
        assert!(namespaces.contains_key("rdfs"));
        assert!(!namespaces.contains_key("unused"));
    }

    #[test]
    fn base_is_kept() {
        let text = "@base <http://example.org/> .\n<a> <b> <c> .\n";
        let graph = graph_from_str(text).unwrap();
        assert_eq!(graph.base(), Some("http://example.org/"));
        let sorted = sort(&graph, Path::new("/tmp/base.ttl")).unwrap();
        assert_eq!(sorted.graph().base(), Some("http://example.org/"));
    }

    #[test]
    fn prefix_only_document_has_no_triples() {
        let graph = graph_from_str("@prefix ex: <http://example.org/> .\n").unwrap();
        let err = sort(&graph, Path::new("/tmp/prefixes.ttl")).unwrap_err();
        assert_eq!(err.kind(), Kind::NoTriples);
        assert!(err.is_warning());
    }

    #[test]
    fn malformed_turtle_is_rejected() {
        assert!(graph_from_str("<http://s.example/> <http://p.example/> .").is_err());
    }

    #[test]
    fn duplicate_statements_collapse() {
        let text = "<http://s/> <http://p/> \"o\" .\n<http://s/> <http://p/> \"o\" .\n";
        let graph = graph_from_str(text).unwrap();
        assert_eq!(graph.len(), 1);
    }

    #[test]
    fn consistency_check_detects_dropped_triple() {
        let graph = graph_from_str(ONTOLOGY).unwrap();
        let partial: Graph = graph.triples().skip(1).collect();
        let err = check_consistency(&graph, &partial, Path::new("/tmp/onto.ttl")).unwrap_err();
        assert_eq!(err.kind(), Kind::Inconsistency);
        assert!(err.to_string().contains("inconsistencies were found"));
    }
}
