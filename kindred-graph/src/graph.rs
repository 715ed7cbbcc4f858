//! The graph store: a set of triples plus the namespace prefix table.

use crate::{Term, Triple};
use std::collections::{BTreeMap, HashSet};

/// A set of RDF triples with a namespace prefix table.
///
/// # Design Decisions
///
/// - **Set semantics**: `insert` is idempotent. A membership set guards
///   the triple vec, so duplicate insertion has no observable effect.
/// - **No removal**: the graph only grows; contradicted facts coexist.
/// - **Pattern matching**: `matching` is a linear scan. The store holds a
///   family, not a ledger; index structures would buy nothing.
/// - **Fresh blank nodes**: labels allocated by `fresh_blank` never
///   collide with labels already present in the graph.
///
/// # Example
///
/// ```
/// use kindred_graph::{Graph, Term, Triple};
///
/// let mut graph = Graph::new();
/// let t = Triple::new(
///     Term::iri("http://example.org/abe"),
///     Term::iri("http://xmlns.com/foaf/0.1/age"),
///     Term::integer(78),
/// );
/// assert!(graph.insert(t.clone()));
/// assert!(!graph.insert(t));
/// assert_eq!(graph.len(), 1);
/// ```
#[derive(Clone, Debug, Default)]
pub struct Graph {
    /// Triples in insertion order
    triples: Vec<Triple>,
    /// Membership set backing idempotent insertion
    index: HashSet<Triple>,
    /// Base IRI from parsing, if any
    pub base: Option<String>,
    /// Prefix mappings (deterministic order for rendering)
    prefixes: BTreeMap<String, String>,
    /// Counter for fresh blank node labels
    blank_counter: u32,
    /// Every blank label seen in this graph's lifetime
    blank_labels: HashSet<String>,
}

impl Graph {
    /// Create an empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the base IRI
    pub fn set_base(&mut self, base: impl Into<String>) {
        self.base = Some(base.into());
    }

    /// Bind a prefix alias to a namespace IRI
    pub fn add_prefix(&mut self, alias: impl Into<String>, namespace: impl Into<String>) {
        self.prefixes.insert(alias.into(), namespace.into());
    }

    /// Look up the namespace bound to an alias.
    ///
    /// Returns `None` for an unregistered alias; the caller decides
    /// whether that is fatal or defaulted.
    pub fn prefix(&self, alias: &str) -> Option<&str> {
        self.prefixes.get(alias).map(String::as_str)
    }

    /// The full prefix table, in alias order.
    pub fn prefixes(&self) -> &BTreeMap<String, String> {
        &self.prefixes
    }

    /// Insert a triple. Returns `true` if the triple was not already
    /// present. Never fails.
    pub fn insert(&mut self, triple: Triple) -> bool {
        if self.index.contains(&triple) {
            return false;
        }
        self.note_blank(&triple.s);
        self.note_blank(&triple.o);
        self.index.insert(triple.clone());
        self.triples.push(triple);
        true
    }

    fn note_blank(&mut self, term: &Term) {
        if let Term::BlankNode(id) = term {
            self.blank_labels.insert(id.as_str().to_string());
        }
    }

    /// Check whether a triple is present
    pub fn contains(&self, triple: &Triple) -> bool {
        self.index.contains(triple)
    }

    /// Allocate a fresh anonymous node, distinct from every node this
    /// graph has seen (parsed labels included).
    pub fn fresh_blank(&mut self) -> Term {
        loop {
            self.blank_counter += 1;
            let label = format!("b{}", self.blank_counter);
            if self.blank_labels.insert(label.clone()) {
                return Term::blank(label);
            }
        }
    }

    /// Find every triple matching the given pattern.
    ///
    /// `None` in a position is a wildcard. The iterator is restartable
    /// (re-querying reflects current store state) and its order is
    /// unspecified.
    pub fn matching<'a>(
        &'a self,
        s: Option<&'a Term>,
        p: Option<&'a Term>,
        o: Option<&'a Term>,
    ) -> impl Iterator<Item = &'a Triple> + 'a {
        self.triples.iter().filter(move |t| {
            s.is_none_or(|s| t.s == *s) && p.is_none_or(|p| t.p == *p) && o.is_none_or(|o| t.o == *o)
        })
    }

    /// Get the number of triples
    pub fn len(&self) -> usize {
        self.triples.len()
    }

    /// Check if the graph is empty
    pub fn is_empty(&self) -> bool {
        self.triples.is_empty()
    }

    /// Iterate over triples (unspecified order)
    pub fn iter(&self) -> impl Iterator<Item = &Triple> {
        self.triples.iter()
    }

    /// Triples sorted by SPO, for deterministic rendering.
    pub fn sorted_triples(&self) -> Vec<&Triple> {
        let mut triples: Vec<&Triple> = self.triples.iter().collect();
        triples.sort();
        triples
    }

    /// All unique subjects, sorted.
    pub fn subjects(&self) -> Vec<&Term> {
        let mut subjects: Vec<&Term> = self.triples.iter().map(|t| &t.s).collect();
        subjects.sort();
        subjects.dedup();
        subjects
    }
}

impl<'a> IntoIterator for &'a Graph {
    type Item = &'a Triple;
    type IntoIter = std::slice::Iter<'a, Triple>;

    fn into_iter(self) -> Self::IntoIter {
        self.triples.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spo(s: &str, p: &str, o: Term) -> Triple {
        Triple::new(Term::iri(s), Term::iri(p), o)
    }

    #[test]
    fn insert_is_idempotent() {
        let mut graph = Graph::new();
        let t = spo("http://e/s", "http://e/p", Term::string("o"));

        assert!(graph.insert(t.clone()));
        assert!(!graph.insert(t.clone()));
        assert!(!graph.insert(t));

        assert_eq!(graph.len(), 1);
        assert_eq!(graph.matching(None, None, None).count(), 1);
    }

    #[test]
    fn matching_filters_each_position() {
        let mut graph = Graph::new();
        graph.insert(spo("http://e/a", "http://e/name", Term::string("A")));
        graph.insert(spo("http://e/a", "http://e/age", Term::integer(3)));
        graph.insert(spo("http://e/b", "http://e/age", Term::integer(4)));

        let a = Term::iri("http://e/a");
        let age = Term::iri("http://e/age");

        assert_eq!(graph.matching(Some(&a), None, None).count(), 2);
        assert_eq!(graph.matching(None, Some(&age), None).count(), 2);
        assert_eq!(graph.matching(Some(&a), Some(&age), None).count(), 1);
        assert_eq!(
            graph
                .matching(None, Some(&age), Some(&Term::integer(4)))
                .count(),
            1
        );
    }

    #[test]
    fn matching_is_restartable() {
        let mut graph = Graph::new();
        graph.insert(spo("http://e/a", "http://e/p", Term::integer(1)));
        let p = Term::iri("http://e/p");

        assert_eq!(graph.matching(None, Some(&p), None).count(), 1);
        graph.insert(spo("http://e/b", "http://e/p", Term::integer(2)));
        assert_eq!(graph.matching(None, Some(&p), None).count(), 2);
    }

    #[test]
    fn fresh_blank_skips_parsed_labels() {
        let mut graph = Graph::new();
        // A parsed triple already uses the label "b1"
        graph.insert(Triple::new(
            Term::blank("b1"),
            Term::iri("http://e/p"),
            Term::string("x"),
        ));

        let fresh = graph.fresh_blank();
        assert_eq!(fresh.as_blank().unwrap().as_str(), "b2");

        let again = graph.fresh_blank();
        assert_ne!(fresh, again);
    }

    #[test]
    fn prefix_lookup_is_explicit() {
        let mut graph = Graph::new();
        graph.add_prefix("sim", "http://example.org/sim#");

        assert_eq!(graph.prefix("sim"), Some("http://example.org/sim#"));
        assert_eq!(graph.prefix("fam"), None);
    }

    #[test]
    fn sorted_triples_are_deterministic() {
        let mut graph = Graph::new();
        graph.insert(spo("http://e/b", "http://e/p", Term::string("x")));
        graph.insert(spo("http://e/a", "http://e/p", Term::string("x")));

        let sorted = graph.sorted_triples();
        assert_eq!(sorted[0].s.as_iri(), Some("http://e/a"));
        assert_eq!(sorted[1].s.as_iri(), Some("http://e/b"));
    }

    #[test]
    fn subjects_are_unique() {
        let mut graph = Graph::new();
        graph.insert(spo("http://e/a", "http://e/p", Term::string("x")));
        graph.insert(spo("http://e/a", "http://e/q", Term::string("y")));
        graph.insert(spo("http://e/b", "http://e/p", Term::string("z")));

        assert_eq!(graph.subjects().len(), 2);
    }
}
