//! Age classification rules.
//!
//! Scans the graph for `foaf:age` facts and derives `rdf:type`
//! assertions under the family namespace. The three rules are evaluated
//! independently for every aged subject, in a fixed order, so one age can
//! produce several classes.

use crate::ClassifyError;
use kindred_graph::{Graph, Term, Triple};
use kindred_vocab::{family, foaf, rdf};
use tracing::debug;

/// Ages strictly below this derive `Minor`.
pub const MINOR_BELOW: i64 = 18;

/// Ages strictly below this derive `Infant` (in addition to `Minor`).
pub const INFANT_BELOW: i64 = 2;

/// Ages strictly above this derive `Old`. 70 itself derives nothing.
pub const OLD_ABOVE: i64 = 70;

/// Derive age classes for every subject with a `foaf:age` fact.
///
/// Returns the number of newly derived triples. The `family_ns` may be
/// empty when the input graph never bound the `fam` alias; the pass still
/// runs, deriving class identifiers under the empty namespace.
///
/// A non-integer age value aborts the whole pass with
/// [`ClassifyError::NotAnInteger`]; triples derived before the bad value
/// was reached remain in the graph.
pub fn classify(graph: &mut Graph, family_ns: &str) -> Result<usize, ClassifyError> {
    let age_pred = Term::iri(foaf::AGE);

    // Snapshot the matches before inserting derived facts
    let aged: Vec<(Term, Term)> = graph
        .matching(None, Some(&age_pred), None)
        .map(|t| (t.s.clone(), t.o.clone()))
        .collect();

    let rdf_type = Term::iri(rdf::TYPE);
    let minor = Term::iri(format!("{family_ns}{}", family::MINOR));
    let infant = Term::iri(format!("{family_ns}{}", family::INFANT));
    let old = Term::iri(format!("{family_ns}{}", family::OLD));

    let mut derived = 0;
    for (subject, object) in aged {
        let age = age_value(&object).ok_or_else(|| ClassifyError::NotAnInteger {
            subject: subject.to_string(),
            value: object.to_string(),
        })?;

        if age < MINOR_BELOW {
            derived += graph.insert(Triple::new(
                subject.clone(),
                rdf_type.clone(),
                minor.clone(),
            )) as usize;
        }
        if age < INFANT_BELOW {
            derived += graph.insert(Triple::new(
                subject.clone(),
                rdf_type.clone(),
                infant.clone(),
            )) as usize;
        }
        if age > OLD_ABOVE {
            derived +=
                graph.insert(Triple::new(subject.clone(), rdf_type.clone(), old.clone())) as usize;
        }

        debug!(subject = %subject, age, "classified subject");
    }

    debug!(derived, "age classification complete");
    Ok(derived)
}

/// Extract an integer age from an object term.
///
/// Native integers are used directly; any other literal has its lexical
/// form parsed. Non-literals and unparseable lexicals yield `None`.
fn age_value(object: &Term) -> Option<i64> {
    let (value, _, _) = object.as_literal()?;
    match value.as_integer() {
        Some(age) => Some(age),
        None => value.lexical().trim().parse().ok(),
    }
}
