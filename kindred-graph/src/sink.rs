//! GraphSink trait for event-driven graph construction.
//!
//! Parsers emit prefix/term/triple events to a sink without knowing the
//! concrete sink type. `GraphCollectorSink` collects the events into a
//! `Graph`; every codec in the workspace builds graphs through it, so
//! blank label reuse and literal canonicalization behave identically
//! across syntaxes.

use crate::{Datatype, Graph, Term, Triple};
use std::collections::HashMap;

/// Opaque term identifier for efficient triple emission.
///
/// Only valid within a single sink session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TermId(u32);

/// Event-driven interface for RDF graph construction.
pub trait GraphSink {
    /// Called when a base IRI is declared
    fn on_base(&mut self, base_iri: &str);

    /// Called when a prefix is declared
    fn on_prefix(&mut self, alias: &str, namespace_iri: &str);

    /// Create an IRI term (fully expanded) and return its ID
    fn term_iri(&mut self, iri: &str) -> TermId;

    /// Create a blank node term and return its ID.
    ///
    /// With `Some(label)` the same label always yields the same ID; with
    /// `None` a fresh anonymous node is allocated.
    fn term_blank(&mut self, label: Option<&str>) -> TermId;

    /// Create a literal term from its lexical form.
    ///
    /// Well-known datatypes are canonicalized to native values.
    fn term_literal(&mut self, lexical: &str, datatype: Datatype, language: Option<&str>)
        -> TermId;

    /// Create a literal term from an already-constructed term.
    ///
    /// For parsers that produce native values directly (bare Turtle
    /// integers, booleans).
    fn term(&mut self, term: Term) -> TermId;

    /// Emit a triple using previously created term IDs
    fn emit_triple(&mut self, subject: TermId, predicate: TermId, object: TermId);
}

/// A sink that collects triples into a `Graph`.
#[derive(Debug, Default)]
pub struct GraphCollectorSink {
    graph: Graph,
    terms: Vec<Term>,
    blank_labels: HashMap<String, TermId>,
}

impl GraphCollectorSink {
    /// Create a new collector sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Finish building and return the graph
    pub fn finish(self) -> Graph {
        self.graph
    }

    /// The graph built so far
    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    fn add_term(&mut self, term: Term) -> TermId {
        let id = TermId(self.terms.len() as u32);
        self.terms.push(term);
        id
    }

    fn get_term(&self, id: TermId) -> &Term {
        &self.terms[id.0 as usize]
    }
}

impl GraphSink for GraphCollectorSink {
    fn on_base(&mut self, base_iri: &str) {
        self.graph.set_base(base_iri);
    }

    fn on_prefix(&mut self, alias: &str, namespace_iri: &str) {
        self.graph.add_prefix(alias, namespace_iri);
    }

    fn term_iri(&mut self, iri: &str) -> TermId {
        self.add_term(Term::iri(iri))
    }

    fn term_blank(&mut self, label: Option<&str>) -> TermId {
        match label {
            Some(l) => {
                if let Some(&id) = self.blank_labels.get(l) {
                    return id;
                }
                let id = self.add_term(Term::blank(l));
                self.blank_labels.insert(l.to_string(), id);
                id
            }
            None => {
                let fresh = self.graph.fresh_blank();
                self.add_term(fresh)
            }
        }
    }

    fn term_literal(
        &mut self,
        lexical: &str,
        datatype: Datatype,
        language: Option<&str>,
    ) -> TermId {
        let term = if language.is_none() && datatype.is_xsd_string() {
            Term::string(lexical)
        } else {
            Term::canonical_literal(lexical, datatype, language)
        };
        self.add_term(term)
    }

    fn term(&mut self, term: Term) -> TermId {
        self.add_term(term)
    }

    fn emit_triple(&mut self, subject: TermId, predicate: TermId, object: TermId) {
        let s = self.get_term(subject).clone();
        let p = self.get_term(predicate).clone();
        let o = self.get_term(object).clone();
        self.graph.insert(Triple::new(s, p, o));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::LiteralValue;

    #[test]
    fn collector_basic() {
        let mut sink = GraphCollectorSink::new();

        let s = sink.term_iri("http://example.org/maggie");
        let p = sink.term_iri("http://xmlns.com/foaf/0.1/name");
        let o = sink.term_literal("Maggie Simpson", Datatype::xsd_string(), None);
        sink.emit_triple(s, p, o);

        let graph = sink.finish();
        assert_eq!(graph.len(), 1);
        let triple = graph.iter().next().unwrap();
        assert_eq!(triple.s.as_iri(), Some("http://example.org/maggie"));
    }

    #[test]
    fn collector_reuses_blank_labels() {
        let mut sink = GraphCollectorSink::new();

        let b1 = sink.term_blank(Some("x"));
        let b2 = sink.term_blank(Some("x"));
        assert_eq!(b1, b2);

        let anon1 = sink.term_blank(None);
        let anon2 = sink.term_blank(None);
        assert_ne!(anon1, anon2);
    }

    #[test]
    fn collector_canonicalizes_typed_literals() {
        let mut sink = GraphCollectorSink::new();

        let s = sink.term_iri("http://example.org/abe");
        let p = sink.term_iri("http://xmlns.com/foaf/0.1/age");
        let o = sink.term_literal("78", Datatype::from_iri(kindred_vocab::xsd::INT), None);
        sink.emit_triple(s, p, o);

        let graph = sink.finish();
        let triple = graph.iter().next().unwrap();
        let (value, _, _) = triple.o.as_literal().unwrap();
        assert_eq!(value, &LiteralValue::Integer(78));
    }

    #[test]
    fn collector_prefixes_land_in_graph() {
        let mut sink = GraphCollectorSink::new();
        sink.on_prefix("sim", "http://example.org/sim#");
        sink.on_base("http://example.org/");

        let graph = sink.finish();
        assert_eq!(graph.prefix("sim"), Some("http://example.org/sim#"));
        assert_eq!(graph.base.as_deref(), Some("http://example.org/"));
    }
}
