//! Owned graph model used between parsing and serialization.
//!
//! Triples keep the sophia terms produced by the parser, so they can be
//! handed back to the sophia serializer untouched, and carry a
//! [`TripleKey`]: an owned, totally ordered rendering of the three terms.
//! The derived `Ord` of [`TripleKey`] *is* the canonical order.

use std::collections::{BTreeMap, BTreeSet};

use sophia_api::term::SimpleTerm;

const RDF_LANG_STRING: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#langString";

/// Canonical, totally ordered representation of one RDF term.
///
/// Variant order is significant: blank nodes sort before IRIs, IRIs before
/// literals. Turtle never yields quoted triples or variables; they sort last
/// so the order stays total over every term sophia can produce.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TermKey {
    /// Blank node label, as assigned by [`crate::blank::relabel`].
    BlankNode(String),
    /// Absolute IRI.
    Iri(String),
    /// Literal, ordered by lexical form, then datatype, then language tag.
    Literal {
        /// Lexical form.
        lexical: String,
        /// Datatype IRI (`xsd:string` / `rdf:langString` when implicit).
        datatype: String,
        /// Language tag, if any.
        language: Option<String>,
    },
    /// RDF-star quoted triple.
    Quoted(Box<TripleKey>),
    /// Query variable.
    Variable(String),
}

impl TermKey {
    /// Builds the key of a parsed term.
    #[must_use]
    pub fn of(term: &SimpleTerm<'_>) -> Self {
        match term {
            SimpleTerm::BlankNode(id) => TermKey::BlankNode(id.as_str().to_string()),
            SimpleTerm::Iri(iri) => TermKey::Iri(iri.as_str().to_string()),
            SimpleTerm::LiteralDatatype(lexical, datatype) => TermKey::Literal {
                lexical: lexical.to_string(),
                datatype: datatype.as_str().to_string(),
                language: None,
            },
            SimpleTerm::LiteralLanguage(lexical, tag) => TermKey::Literal {
                lexical: lexical.to_string(),
                datatype: RDF_LANG_STRING.to_string(),
                language: Some(tag.as_str().to_string()),
            },
            SimpleTerm::Triple(spo) => {
                let [s, p, o] = &**spo;
                TermKey::Quoted(Box::new(TripleKey([
                    TermKey::of(s),
                    TermKey::of(p),
                    TermKey::of(o),
                ])))
            }
            SimpleTerm::Variable(name) => TermKey::Variable(name.as_str().to_string()),
        }
    }

    /// IRIs mentioned by this term, including literal datatypes.
    fn iris(&self) -> Vec<&str> {
        match self {
            TermKey::Iri(iri) => vec![iri.as_str()],
            TermKey::Literal { datatype, .. } => vec![datatype.as_str()],
            TermKey::Quoted(inner) => inner.0.iter().flat_map(TermKey::iris).collect(),
            TermKey::BlankNode(_) | TermKey::Variable(_) => Vec::new(),
        }
    }
}

/// Canonical key of a triple: (subject, predicate, object) term keys.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TripleKey(pub [TermKey; 3]);

impl TripleKey {
    /// Builds the key of a parsed triple.
    #[must_use]
    pub fn of(terms: &[SimpleTerm<'static>; 3]) -> Self {
        let [s, p, o] = terms;
        TripleKey([TermKey::of(s), TermKey::of(p), TermKey::of(o)])
    }
}

/// A parsed triple together with its canonical key.
#[derive(Debug, Clone)]
pub struct Triple {
    terms: [SimpleTerm<'static>; 3],
    key: TripleKey,
}

impl Triple {
    /// Wraps parsed terms, computing the canonical key.
    #[must_use]
    pub fn new(terms: [SimpleTerm<'static>; 3]) -> Self {
        let key = TripleKey::of(&terms);
        Self { terms, key }
    }

    /// The canonical key.
    #[must_use]
    pub fn key(&self) -> &TripleKey {
        &self.key
    }
}

/// Namespace-prefix bindings, ordered by prefix.
pub type Namespaces = BTreeMap<String, String>;

/// A set of triples plus namespace bindings and an optional base IRI.
///
/// Insertion order is kept; inserting a triple whose key is already present
/// is a no-op.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    statements: Vec<[SimpleTerm<'static>; 3]>,
    keys: BTreeSet<TripleKey>,
    namespaces: Namespaces,
    base: Option<String>,
}

impl Graph {
    /// Creates an empty graph carrying the given metadata.
    #[must_use]
    pub fn with_metadata(namespaces: Namespaces, base: Option<String>) -> Self {
        Self {
            statements: Vec::new(),
            keys: BTreeSet::new(),
            namespaces,
            base,
        }
    }

    /// Inserts a triple. Returns false if an equal triple was already present.
    pub fn insert(&mut self, triple: Triple) -> bool {
        let Triple { terms, key } = triple;
        if !self.keys.insert(key) {
            return false;
        }
        self.statements.push(terms);
        true
    }

    /// Returns true if a triple with this key is in the graph.
    #[must_use]
    pub fn contains(&self, key: &TripleKey) -> bool {
        self.keys.contains(key)
    }

    /// Number of triples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.statements.len()
    }

    /// Returns true if the graph holds no triples.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }

    /// Triples in insertion order.
    pub fn triples(&self) -> impl Iterator<Item = Triple> + '_ {
        self.statements.iter().cloned().map(Triple::new)
    }

    /// Triple keys in canonical order.
    pub fn keys(&self) -> impl Iterator<Item = &TripleKey> + '_ {
        self.keys.iter()
    }

    /// Raw statements in insertion order, as consumed by sophia serializers.
    #[must_use]
    pub fn statements(&self) -> &[[SimpleTerm<'static>; 3]] {
        &self.statements
    }

    /// Namespace-prefix bindings.
    #[must_use]
    pub fn namespaces(&self) -> &Namespaces {
        &self.namespaces
    }

    /// Base IRI, if declared.
    #[must_use]
    pub fn base(&self) -> Option<&str> {
        self.base.as_deref()
    }

    /// Every IRI mentioned in the graph, datatypes included.
    pub fn mentioned_iris(&self) -> impl Iterator<Item = &str> + '_ {
        self.keys
            .iter()
            .flat_map(|key| key.0.iter().flat_map(TermKey::iris))
    }
}

impl FromIterator<Triple> for Graph {
    fn from_iter<I: IntoIterator<Item = Triple>>(iter: I) -> Self {
        let mut graph = Graph::default();
        for triple in iter {
            graph.insert(triple);
        }
        graph
    }
}

/// A graph whose insertion order is the canonical order.
///
/// Only the sorter constructs one, after the consistency check passed.
#[derive(Debug, Clone)]
pub struct SortedGraph(Graph);

impl SortedGraph {
    pub(crate) fn new(graph: Graph) -> Self {
        Self(graph)
    }

    /// The underlying graph.
    #[must_use]
    pub fn graph(&self) -> &Graph {
        &self.0
    }
}
