//! Format-agnostic RDF graph store for kindred.
//!
//! This crate provides the canonical types for representing the family
//! graph: terms, triples, and the `Graph` store that parsers populate and
//! formatters render, regardless of serialization syntax.
//!
//! # Key Design Principles
//!
//! 1. **Expanded IRIs only** - All IRIs are stored in expanded form.
//!    Compaction against the prefix table happens in formatters at output
//!    time.
//!
//! 2. **Explicit datatypes** - Literals always carry a datatype. Plain
//!    strings use `xsd:string`, language-tagged strings `rdf:langString`.
//!
//! 3. **Set semantics** - `Graph::insert` is idempotent: inserting a
//!    triple that is already present has no effect. There is no removal.
//!
//! 4. **Deterministic output** - `sorted_triples()` gives formatters a
//!    stable SPO ordering regardless of insertion order.
//!
//! # Example
//!
//! ```
//! use kindred_graph::{Graph, Term, Triple};
//!
//! let mut graph = Graph::new();
//! graph.insert(Triple::new(
//!     Term::iri("http://example.org/maggie"),
//!     Term::iri("http://xmlns.com/foaf/0.1/name"),
//!     Term::string("Maggie Simpson"),
//! ));
//!
//! assert_eq!(graph.len(), 1);
//! ```

mod datatype;
mod graph;
mod sink;
mod term;
mod triple;

pub use datatype::Datatype;
pub use graph::Graph;
pub use sink::{GraphCollectorSink, GraphSink, TermId};
pub use term::{BlankId, LiteralValue, Term};
pub use triple::Triple;
