//! Syntax detection and graph codecs for kindred.
//!
//! Three serializations are supported: Turtle, N-Triples, and RDF/XML.
//! The syntax of a file is chosen by extension with a configurable
//! fallback, and every parser emits into `kindred_graph::GraphSink`, so
//! the same facts compare equal no matter which syntax they arrived in.
//!
//! # Example
//!
//! ```
//! use kindred_format::{parse_str, render, Syntax};
//!
//! let turtle = r#"
//!     @prefix sim: <http://example.org/sim#> .
//!     @prefix foaf: <http://xmlns.com/foaf/0.1/> .
//!     sim:Maggie a foaf:Person ;
//!                foaf:name "Maggie Simpson" ;
//!                foaf:age 1 .
//! "#;
//!
//! let graph = parse_str(turtle, Syntax::Turtle).unwrap();
//! assert_eq!(graph.len(), 3);
//!
//! let ntriples = render(&graph, Syntax::NTriples).unwrap();
//! let reparsed = parse_str(&ntriples, Syntax::NTriples).unwrap();
//! assert_eq!(reparsed.len(), 3);
//! ```

pub mod error;
pub mod ntriples;
pub mod rdfxml;
pub mod syntax;
pub mod turtle;

pub use error::{FormatError, Result};
pub use syntax::Syntax;

use kindred_graph::{Graph, GraphCollectorSink};
use std::path::Path;
use tracing::debug;

/// Parse a document in the given syntax.
pub fn parse_str(input: &str, syntax: Syntax) -> Result<Graph> {
    let mut sink = GraphCollectorSink::new();
    match syntax {
        Syntax::Turtle => turtle::parse(input, &mut sink)?,
        Syntax::NTriples => ntriples::parse(input, &mut sink)?,
        Syntax::RdfXml => rdfxml::parse(input, &mut sink)?,
    }
    let graph = sink.finish();
    debug!(syntax = %syntax, triples = graph.len(), "parsed graph");
    Ok(graph)
}

/// Render a graph in the given syntax.
///
/// Rendering only fails for RDF/XML, and only when a predicate IRI cannot
/// be expressed as an XML qname.
pub fn render(graph: &Graph, syntax: Syntax) -> Result<String> {
    match syntax {
        Syntax::Turtle => Ok(turtle::render(graph)),
        Syntax::NTriples => Ok(ntriples::render(graph)),
        Syntax::RdfXml => rdfxml::render(graph),
    }
}

/// Read and parse a graph file, detecting the syntax from the filename.
pub fn read_graph(path: &Path, default: Syntax) -> Result<Graph> {
    let syntax = Syntax::detect(path, default);
    debug!(path = %path.display(), syntax = %syntax, "reading graph");
    let input = std::fs::read_to_string(path).map_err(|e| FormatError::io(path, e))?;
    parse_str(&input, syntax)
}

/// Render and write a graph file, detecting the syntax from the filename.
///
/// The file is created or truncated; the handle is flushed and closed on
/// every path before this returns.
pub fn write_graph(path: &Path, graph: &Graph, default: Syntax) -> Result<()> {
    let syntax = Syntax::detect(path, default);
    let output = render(graph, syntax)?;
    debug!(path = %path.display(), syntax = %syntax, triples = graph.len(), "writing graph");
    std::fs::write(path, output).map_err(|e| FormatError::io(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use kindred_graph::{Term, Triple};
    use kindred_vocab::{foaf, rdf};
    use std::collections::BTreeSet;

    /// A graph shaped like the fact builder's output: people, names,
    /// ages, a symmetric marriage, and an anonymous father.
    fn builder_like_graph() -> Graph {
        let mut graph = Graph::new();
        graph.add_prefix("sim", "http://example.org/sim#");
        graph.add_prefix("fam", "http://example.org/fam#");
        graph.add_prefix("foaf", foaf::NS);

        let abe = Term::iri("http://example.org/sim#Abraham");
        let mona = Term::iri("http://example.org/sim#Mona");
        let herb = Term::iri("http://example.org/sim#Herb");
        let spouse = Term::iri("http://example.org/fam#hasSpouse");

        for (person, name, age) in [
            (&abe, "Abraham Simpson", Some(78)),
            (&mona, "Mona Simpson", Some(70)),
            (&herb, "Herb Simpson", None),
        ] {
            graph.insert(Triple::new(
                person.clone(),
                Term::iri(rdf::TYPE),
                Term::iri(foaf::PERSON),
            ));
            graph.insert(Triple::new(
                person.clone(),
                Term::iri(foaf::NAME),
                Term::string(name),
            ));
            if let Some(age) = age {
                graph.insert(Triple::new(
                    person.clone(),
                    Term::iri(foaf::AGE),
                    Term::integer(age),
                ));
            }
        }

        graph.insert(Triple::new(abe.clone(), spouse.clone(), mona.clone()));
        graph.insert(Triple::new(mona, spouse, abe));

        let father = graph.fresh_blank();
        graph.insert(Triple::new(
            herb,
            Term::iri("http://example.org/fam#hasFather"),
            father,
        ));

        graph
    }

    fn triple_set(graph: &Graph) -> BTreeSet<Triple> {
        graph.iter().cloned().collect()
    }

    #[test]
    fn round_trip_every_syntax() {
        let graph = builder_like_graph();
        let expected = triple_set(&graph);

        for syntax in [Syntax::Turtle, Syntax::NTriples, Syntax::RdfXml] {
            let rendered = render(&graph, syntax).unwrap();
            let reparsed = parse_str(&rendered, syntax)
                .unwrap_or_else(|e| panic!("{syntax} reparse failed: {e}\n{rendered}"));
            assert_eq!(
                triple_set(&reparsed),
                expected,
                "round-trip mismatch for {syntax}"
            );
        }
    }

    #[test]
    fn malformed_input_fails_per_syntax() {
        assert!(parse_str("this is not turtle @", Syntax::Turtle).is_err());
        assert!(parse_str("<a> <b>\n", Syntax::NTriples).is_err());
        assert!(parse_str("<not-rdf/>", Syntax::RdfXml).is_err());
    }

    #[test]
    fn read_missing_file_is_io_error() {
        let err = read_graph(Path::new("/nonexistent/family.ttl"), Syntax::Turtle).unwrap_err();
        assert!(matches!(err, FormatError::Io { .. }));
    }
}
