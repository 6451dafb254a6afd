//! Canonical relabelling of blank nodes.
//!
//! Parser labels follow document order, so two layouts of the same graph
//! would sort their blank nodes differently. Each blank node is relabelled
//! from the triples around it instead: every node starts in one class, and
//! classes are split by the sorted rendering of each node's triples (with
//! neighbouring blank nodes shown by class) until no class splits further.
//! Nodes still tied after that are singled out one at a time, lowest parser
//! label first, and the split is repeated. Ties that survive refinement are
//! almost always symmetric nodes, for which the choice does not change the
//! output.

use std::collections::{BTreeMap, BTreeSet};

use sophia_api::term::{BnodeId, FromTerm, SimpleTerm};
use tracing::trace;

use crate::model::TermKey;

type Statement = [SimpleTerm<'static>; 3];

/// Class of every blank node, as a dense rank.
type Classes<'a> = BTreeMap<&'a str, usize>;

fn bnode_label<'a>(term: &'a SimpleTerm<'static>) -> Option<&'a str> {
    match term {
        SimpleTerm::BlankNode(id) => Some(id.as_str()),
        _ => None,
    }
}

struct Refiner<'a> {
    statements: &'a [Statement],
    /// Indices of the statements each blank node occurs in.
    occurrences: BTreeMap<&'a str, Vec<usize>>,
}

impl<'a> Refiner<'a> {
    fn new(statements: &'a [Statement]) -> Self {
        let mut occurrences: BTreeMap<&str, Vec<usize>> = BTreeMap::new();
        for (index, statement) in statements.iter().enumerate() {
            let labels: BTreeSet<&str> = statement.iter().filter_map(bnode_label).collect();
            for label in labels {
                occurrences.entry(label).or_default().push(index);
            }
        }
        Self {
            statements,
            occurrences,
        }
    }

    /// One statement as seen from `node`.
    fn render(&self, statement: &Statement, node: &str, classes: &Classes<'a>) -> String {
        statement
            .iter()
            .map(|term| match bnode_label(term) {
                Some(label) if label == node => "*".to_string(),
                Some(label) => format!("_:{}", classes.get(label).copied().unwrap_or_default()),
                None => format!("{:?}", TermKey::of(term)),
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Splits classes once. The previous class leads each signature, so a
    /// split never merges two classes.
    fn refine(&self, classes: &Classes<'a>) -> Classes<'a> {
        let signatures: BTreeMap<&str, (usize, Vec<String>)> = self
            .occurrences
            .iter()
            .map(|(&node, indices)| {
                let mut rendered: Vec<String> = indices
                    .iter()
                    .map(|&index| self.render(&self.statements[index], node, classes))
                    .collect();
                rendered.sort();
                let previous = classes.get(node).copied().unwrap_or_default();
                (node, (previous, rendered))
            })
            .collect();

        let ranks: BTreeMap<&(usize, Vec<String>), usize> = signatures
            .values()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .enumerate()
            .map(|(rank, signature)| (signature, rank))
            .collect();

        signatures
            .iter()
            .map(|(&node, signature)| (node, ranks.get(signature).copied().unwrap_or_default()))
            .collect()
    }

    fn stabilize(&self, mut classes: Classes<'a>) -> Classes<'a> {
        loop {
            let next = self.refine(&classes);
            if class_count(&next) == class_count(&classes) {
                return next;
            }
            classes = next;
        }
    }

    fn classes(&self) -> Classes<'a> {
        let mut classes = self.stabilize(self.occurrences.keys().map(|&node| (node, 0)).collect());
        while let Some(node) = first_tied(&classes) {
            trace!(node, "breaking blank node tie");
            classes.insert(node, classes.len());
            classes = self.stabilize(classes);
        }
        classes
    }
}

fn class_count(classes: &Classes<'_>) -> usize {
    classes.values().collect::<BTreeSet<_>>().len()
}

/// Lowest-labelled node of the lowest class holding more than one node.
fn first_tied<'a>(classes: &Classes<'a>) -> Option<&'a str> {
    let mut members: BTreeMap<usize, Vec<&'a str>> = BTreeMap::new();
    for (&node, &class) in classes {
        members.entry(class).or_default().push(node);
    }
    members
        .into_values()
        .find(|nodes| nodes.len() > 1)
        .and_then(|nodes| nodes.first().copied())
}

/// Canonical label of every blank node in `statements`, keyed by parser
/// label. Empty when the statements hold no blank node.
#[must_use]
pub fn canonical_labels(statements: &[Statement]) -> BTreeMap<String, String> {
    let refiner = Refiner::new(statements);
    if refiner.occurrences.is_empty() {
        return BTreeMap::new();
    }
    refiner
        .classes()
        .into_iter()
        .map(|(node, class)| (node.to_string(), format!("b{class}")))
        .collect()
}

/// Replaces parser blank node labels with [`canonical_labels`].
#[must_use]
pub fn relabel(statements: Vec<Statement>) -> Vec<Statement> {
    let labels = canonical_labels(&statements);
    if labels.is_empty() {
        return statements;
    }
    statements
        .into_iter()
        .map(|terms| terms.map(|term| relabel_term(term, &labels)))
        .collect()
}

fn relabel_term(term: SimpleTerm<'static>, labels: &BTreeMap<String, String>) -> SimpleTerm<'static> {
    let canonical = bnode_label(&term).and_then(|label| labels.get(label));
    match canonical {
        Some(label) => SimpleTerm::from_term(BnodeId::new_unchecked(label.clone())),
        None => term,
    }
}
