//! A triple: one atomic (subject, predicate, object) fact.

use crate::Term;
use serde::{Deserialize, Serialize};

/// An RDF triple.
///
/// The subject is an IRI or blank node and the predicate an IRI; these are
/// conventions of construction, not enforced by the type (the store never
/// produces violations).
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Triple {
    /// Subject term
    pub s: Term,
    /// Predicate term
    pub p: Term,
    /// Object term
    pub o: Term,
}

impl Triple {
    /// Create a new triple
    pub fn new(s: Term, p: Term, o: Term) -> Self {
        Self { s, p, o }
    }
}

impl std::fmt::Display for Triple {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} {} .", self.s, self.p, self.o)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn triple_equality() {
        let a = Triple::new(
            Term::iri("http://example.org/s"),
            Term::iri("http://example.org/p"),
            Term::integer(1),
        );
        let b = Triple::new(
            Term::iri("http://example.org/s"),
            Term::iri("http://example.org/p"),
            Term::integer(1),
        );
        assert_eq!(a, b);
    }

    #[test]
    fn triple_display() {
        let t = Triple::new(
            Term::iri("http://example.org/s"),
            Term::iri("http://example.org/p"),
            Term::string("o"),
        );
        assert_eq!(
            t.to_string(),
            "<http://example.org/s> <http://example.org/p> \"o\" ."
        );
    }
}
