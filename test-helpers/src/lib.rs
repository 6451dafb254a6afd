//! Shared fixtures for the turtle-canon integration tests.
//!
//! Not published. Used as a `[dev-dependencies]` path dependency by the
//! `turtle-canon` and `turtle-canon-clients` crates.

#![deny(missing_docs)]

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// Prefix block of the fixture ontology.
pub const PREFIXES: &str = "\
@prefix ex: <http://example.org/canon-tests#> .
@prefix owl: <http://www.w3.org/2002/07/owl#> .
@prefix rdfs: <http://www.w3.org/2000/01/rdf-schema#> .
@prefix xsd: <http://www.w3.org/2001/XMLSchema#> .
";

/// Statements of the fixture ontology, one complete statement per entry.
///
/// Any permutation of these, appended to [`PREFIXES`], is the same graph.
pub const STATEMENTS: &[&str] = &[
    "<http://example.org/canon-tests> a owl:Ontology .",
    "<http://example.org/canon-tests> owl:versionInfo \"0.1.0\" .",
    "ex:Animal a owl:Class .",
    "ex:Animal rdfs:label \"Animal\"@en .",
    "ex:Animal rdfs:label \"Tier\"@de .",
    "ex:Zebra a owl:Class .",
    "ex:Zebra rdfs:subClassOf ex:Animal .",
    "ex:Zebra rdfs:label \"Zebra\"@en .",
    "ex:Aardvark a owl:Class .",
    "ex:Aardvark rdfs:subClassOf ex:Animal .",
    "ex:Aardvark rdfs:comment \"Digs burrows.\" .",
    "ex:legCount a owl:DatatypeProperty .",
    "ex:legCount rdfs:domain ex:Animal .",
    "ex:legCount rdfs:range xsd:nonNegativeInteger .",
    "ex:hasPrey a owl:ObjectProperty .",
    "ex:hasPrey rdfs:domain ex:Animal .",
    "ex:hasPrey rdfs:range ex:Animal .",
];

/// Statements over anonymous blank nodes, one complete statement per entry.
///
/// Uses the prefixes and classes of [`STATEMENTS`]. Several nodes share a
/// shape up to a literal, so their order depends on more than parser labels.
pub const BLANK_STATEMENTS: &[&str] = &[
    "ex:Zebra rdfs:subClassOf [ a owl:Restriction ; owl:onProperty ex:hasPrey ; owl:someValuesFrom ex:Aardvark ] .",
    "ex:Aardvark rdfs:subClassOf [ a owl:Restriction ; owl:onProperty ex:legCount ; owl:hasValue 4 ] .",
    "ex:Animal rdfs:seeAlso [ rdfs:label \"one\" ] .",
    "ex:Animal rdfs:seeAlso [ rdfs:label \"two\" ] .",
    "ex:Animal rdfs:seeAlso [ rdfs:label \"three\" ; rdfs:seeAlso [ rdfs:label \"nested\" ] ] .",
];

/// A hand-written, non-canonical rendering of an ontology, with predicate
/// lists, object lists and a multi-line literal.
pub const ONTOLOGY: &str = r#"@prefix ex: <http://example.org/canon-tests#> .
@prefix owl: <http://www.w3.org/2002/07/owl#> .
@prefix rdfs: <http://www.w3.org/2000/01/rdf-schema#> .

ex:Zebra    a owl:Class ;
  rdfs:subClassOf ex:Animal ;
  rdfs:label "Zebra"@en .

<http://example.org/canon-tests> a owl:Ontology ;
    rdfs:comment """Test ontology file.

Spans several lines.""" ;
    owl:versionInfo "0.1.0" .

ex:Animal a owl:Class ; rdfs:label "Animal"@en , "Tier"@de .
"#;

/// [`ONTOLOGY`]'s graph written the way a different tool would: full IRIs,
/// SPARQL-style prefixes, one statement per line, an unused prefix.
pub const ONTOLOGY_OTHER_TOOL: &str = r#"PREFIX rdfs: <http://www.w3.org/2000/01/rdf-schema#>
PREFIX owl: <http://www.w3.org/2002/07/owl#>
PREFIX ex: <http://example.org/canon-tests#>
PREFIX dc: <http://purl.org/dc/elements/1.1/>

ex:Animal rdfs:label "Tier"@de .
<http://example.org/canon-tests#Animal> <http://www.w3.org/1999/02/22-rdf-syntax-ns#type> <http://www.w3.org/2002/07/owl#Class> .
ex:Animal rdfs:label "Animal"@en .
<http://example.org/canon-tests> owl:versionInfo "0.1.0" .
<http://example.org/canon-tests> rdfs:comment "Test ontology file.\n\nSpans several lines." .
<http://example.org/canon-tests> a owl:Ontology .
ex:Zebra rdfs:label "Zebra"@en .
ex:Zebra rdfs:subClassOf ex:Animal .
ex:Zebra a owl:Class .
"#;

/// Joins [`PREFIXES`] and `statements` into a Turtle document.
#[must_use]
pub fn document<S: AsRef<str>>(statements: &[S]) -> String {
    let mut doc = String::from(PREFIXES);
    doc.push('\n');
    for statement in statements {
        doc.push_str(statement.as_ref());
        doc.push('\n');
    }
    doc
}

/// A scratch directory holding Turtle files; removed when dropped.
pub struct Workspace {
    dir: TempDir,
}

impl Workspace {
    /// Creates an empty scratch directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn new() -> io::Result<Self> {
        Ok(Self {
            dir: tempfile::tempdir()?,
        })
    }

    /// Root of the workspace.
    #[must_use]
    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Path of `name` inside the workspace; the file may not exist.
    #[must_use]
    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    /// Writes `content` to `name` and returns its path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn write(&self, name: &str, content: &str) -> io::Result<PathBuf> {
        let path = self.path(name);
        fs::write(&path, content)?;
        Ok(path)
    }

    /// Reads `name` back as UTF-8.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read.
    pub fn read(&self, name: &str) -> io::Result<String> {
        fs::read_to_string(self.path(name))
    }
}

/// Inserts whitespace that Turtle ignores into `text`: trailing spaces on
/// some lines and blank (or space-only) lines between others. Lines inside
/// triple-quoted literals are left alone, as are their opening lines.
///
/// `seed` selects which lines are touched.
#[must_use]
pub fn sprinkle_whitespace(text: &str, seed: usize) -> String {
    let mut out = String::with_capacity(text.len() * 2);
    let mut in_long_literal = false;

    for (index, line) in text.lines().enumerate() {
        let opens_outside = !in_long_literal;
        if line.matches("\"\"\"").count() % 2 == 1 {
            in_long_literal = !in_long_literal;
        }
        let ends_outside = !in_long_literal;
        let pick = (index + seed) % 3;

        if opens_outside && pick == 0 {
            out.push('\n');
        }
        if opens_outside && pick == 1 {
            out.push_str(&" ".repeat(1 + (index + seed) % 7));
            out.push('\n');
        }
        out.push_str(line);
        if ends_outside && pick == 2 {
            out.push_str(&" ".repeat(1 + (index * seed) % 5));
        }
        out.push('\n');
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sprinkling_leaves_long_literals_alone() {
        let text = "a \"\"\"one\n  two  \nthree\"\"\" .\nb .\n";
        for seed in 0..6 {
            let sprinkled = sprinkle_whitespace(text, seed);
            assert!(sprinkled.contains("a \"\"\"one\n  two  \nthree\"\"\" ."));
        }
    }

    #[test]
    fn document_appends_statements_after_prefixes() {
        let doc = document(&["ex:a ex:b ex:c ."]);
        assert!(doc.starts_with(PREFIXES));
        assert!(doc.ends_with("ex:a ex:b ex:c .\n"));
    }
}
