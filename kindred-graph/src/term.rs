//! RDF term types: IRI, blank node, and literal.
//!
//! Terms are the building blocks of triples. A term can be:
//! - A named resource (an IRI, always expanded, never prefixed)
//! - An anonymous resource (a blank node with a store-local label)
//! - A literal value (native value + explicit datatype + optional language)

use crate::Datatype;
use kindred_vocab::xsd;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Blank node identifier.
///
/// Labels are stable within a graph but have no global meaning. The label
/// does not include the `_:` prefix.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BlankId(Arc<str>);

impl BlankId {
    /// Create a blank node ID from a label (without the `_:` prefix).
    pub fn new(label: impl AsRef<str>) -> Self {
        Self(Arc::from(label.as_ref()))
    }

    /// Get the label (without `_:` prefix)
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for BlankId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "_:{}", self.0)
    }
}

/// Literal value storage.
///
/// Well-known datatypes are stored natively so that values compare by
/// value rather than lexical form; everything else keeps its lexical
/// string.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum LiteralValue {
    /// String value (also the lexical fallback for unrecognized datatypes)
    String(Arc<str>),
    /// Boolean value
    Boolean(bool),
    /// Integer value (i64 range)
    Integer(i64),
    /// Floating point value
    Double(f64),
}

impl LiteralValue {
    /// Create a string literal value
    pub fn string(s: impl AsRef<str>) -> Self {
        LiteralValue::String(Arc::from(s.as_ref()))
    }

    /// Get the lexical representation of this value
    pub fn lexical(&self) -> String {
        match self {
            LiteralValue::String(s) => s.to_string(),
            LiteralValue::Boolean(b) => b.to_string(),
            LiteralValue::Integer(i) => i.to_string(),
            LiteralValue::Double(d) => {
                if d.is_nan() {
                    "NaN".to_string()
                } else if d.is_infinite() {
                    if d.is_sign_positive() { "INF" } else { "-INF" }.to_string()
                } else {
                    format!("{d:e}")
                }
            }
        }
    }

    /// Try to get as string reference
    pub fn as_str(&self) -> Option<&str> {
        match self {
            LiteralValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Try to get as integer
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            LiteralValue::Integer(i) => Some(*i),
            _ => None,
        }
    }
}

impl PartialEq for LiteralValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (LiteralValue::String(a), LiteralValue::String(b)) => a == b,
            (LiteralValue::Boolean(a), LiteralValue::Boolean(b)) => a == b,
            (LiteralValue::Integer(a), LiteralValue::Integer(b)) => a == b,
            (LiteralValue::Double(a), LiteralValue::Double(b)) => a.to_bits() == b.to_bits(),
            _ => false,
        }
    }
}

impl Eq for LiteralValue {}

impl Hash for LiteralValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            LiteralValue::String(s) => s.hash(state),
            LiteralValue::Boolean(b) => b.hash(state),
            LiteralValue::Integer(i) => i.hash(state),
            LiteralValue::Double(d) => d.to_bits().hash(state),
        }
    }
}

impl PartialOrd for LiteralValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for LiteralValue {
    fn cmp(&self, other: &Self) -> Ordering {
        let type_ord = |v: &LiteralValue| -> u8 {
            match v {
                LiteralValue::String(_) => 0,
                LiteralValue::Boolean(_) => 1,
                LiteralValue::Integer(_) => 2,
                LiteralValue::Double(_) => 3,
            }
        };

        match type_ord(self).cmp(&type_ord(other)) {
            Ordering::Equal => {}
            ord => return ord,
        }

        match (self, other) {
            (LiteralValue::String(a), LiteralValue::String(b)) => a.cmp(b),
            (LiteralValue::Boolean(a), LiteralValue::Boolean(b)) => a.cmp(b),
            (LiteralValue::Integer(a), LiteralValue::Integer(b)) => a.cmp(b),
            (LiteralValue::Double(a), LiteralValue::Double(b)) => a
                .partial_cmp(b)
                .unwrap_or_else(|| a.to_bits().cmp(&b.to_bits())),
            _ => Ordering::Equal,
        }
    }
}

/// An RDF term (subject, predicate, or object position).
///
/// # Invariants
///
/// - `Term::Iri` always contains an **expanded** IRI, never a prefixed form.
/// - For a literal with a language tag, the datatype is `rdf:langString`.
/// - The predicate position of a triple can only be `Term::Iri`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum Term {
    /// Full expanded IRI (e.g., "http://xmlns.com/foaf/0.1/Person")
    Iri(Arc<str>),

    /// Blank node with store-local label
    BlankNode(BlankId),

    /// Literal value with explicit datatype
    Literal {
        /// The actual value
        value: LiteralValue,
        /// Datatype (always present)
        datatype: Datatype,
        /// Language tag (only when the datatype is rdf:langString)
        language: Option<Arc<str>>,
    },
}

impl Term {
    /// Create an IRI term from an expanded IRI string
    pub fn iri(iri: impl AsRef<str>) -> Self {
        Term::Iri(Arc::from(iri.as_ref()))
    }

    /// Create a blank node term
    pub fn blank(label: impl AsRef<str>) -> Self {
        Term::BlankNode(BlankId::new(label))
    }

    /// Create a plain string literal (xsd:string)
    pub fn string(value: impl AsRef<str>) -> Self {
        Term::Literal {
            value: LiteralValue::string(value),
            datatype: Datatype::xsd_string(),
            language: None,
        }
    }

    /// Create an integer literal (xsd:integer)
    pub fn integer(value: i64) -> Self {
        Term::Literal {
            value: LiteralValue::Integer(value),
            datatype: Datatype::xsd_integer(),
            language: None,
        }
    }

    /// Create a boolean literal (xsd:boolean)
    pub fn boolean(value: bool) -> Self {
        Term::Literal {
            value: LiteralValue::Boolean(value),
            datatype: Datatype::xsd_boolean(),
            language: None,
        }
    }

    /// Create a double literal (xsd:double)
    pub fn double(value: f64) -> Self {
        Term::Literal {
            value: LiteralValue::Double(value),
            datatype: Datatype::xsd_double(),
            language: None,
        }
    }

    /// Create a language-tagged string literal (rdf:langString)
    pub fn lang_string(value: impl AsRef<str>, lang: impl AsRef<str>) -> Self {
        Term::Literal {
            value: LiteralValue::string(value),
            datatype: Datatype::rdf_lang_string(),
            language: Some(Arc::from(lang.as_ref())),
        }
    }

    /// Create a typed literal, keeping the lexical form as a string
    pub fn typed(value: impl AsRef<str>, datatype: Datatype) -> Self {
        Term::Literal {
            value: LiteralValue::string(value),
            datatype,
            language: None,
        }
    }

    /// Create a literal from a lexical form, canonicalizing well-known
    /// datatypes to native values.
    ///
    /// Integer-family lexicals become `Integer`, `xsd:boolean` becomes
    /// `Boolean`, `xsd:double` becomes `Double`; anything else (or an
    /// unparseable lexical) keeps its string form. All parsers construct
    /// typed literals through this path so that the same fact compares
    /// equal no matter which syntax it arrived in.
    pub fn canonical_literal(lexical: &str, datatype: Datatype, language: Option<&str>) -> Self {
        if let Some(lang) = language {
            return Term::lang_string(lexical, lang);
        }
        let value = if xsd::is_integer_family(datatype.as_iri()) {
            lexical
                .trim()
                .parse::<i64>()
                .map(LiteralValue::Integer)
                .unwrap_or_else(|_| LiteralValue::string(lexical))
        } else if datatype.as_iri() == xsd::BOOLEAN {
            match lexical.trim() {
                "true" | "1" => LiteralValue::Boolean(true),
                "false" | "0" => LiteralValue::Boolean(false),
                _ => LiteralValue::string(lexical),
            }
        } else if datatype.as_iri() == xsd::DOUBLE {
            lexical
                .trim()
                .parse::<f64>()
                .map(LiteralValue::Double)
                .unwrap_or_else(|_| LiteralValue::string(lexical))
        } else {
            LiteralValue::string(lexical)
        };
        Term::Literal {
            value,
            datatype,
            language: None,
        }
    }

    /// Check if this is an IRI term
    pub fn is_iri(&self) -> bool {
        matches!(self, Term::Iri(_))
    }

    /// Check if this is a blank node
    pub fn is_blank(&self) -> bool {
        matches!(self, Term::BlankNode(_))
    }

    /// Check if this is a literal
    pub fn is_literal(&self) -> bool {
        matches!(self, Term::Literal { .. })
    }

    /// Try to get as IRI string
    pub fn as_iri(&self) -> Option<&str> {
        match self {
            Term::Iri(iri) => Some(iri),
            _ => None,
        }
    }

    /// Try to get as blank node ID
    pub fn as_blank(&self) -> Option<&BlankId> {
        match self {
            Term::BlankNode(id) => Some(id),
            _ => None,
        }
    }

    /// Try to get literal components
    pub fn as_literal(&self) -> Option<(&LiteralValue, &Datatype, Option<&str>)> {
        match self {
            Term::Literal {
                value,
                datatype,
                language,
            } => Some((value, datatype, language.as_deref())),
            _ => None,
        }
    }
}

impl PartialEq for Term {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Term::Iri(a), Term::Iri(b)) => a == b,
            (Term::BlankNode(a), Term::BlankNode(b)) => a == b,
            (
                Term::Literal {
                    value: v1,
                    datatype: d1,
                    language: l1,
                },
                Term::Literal {
                    value: v2,
                    datatype: d2,
                    language: l2,
                },
            ) => v1 == v2 && d1 == d2 && l1 == l2,
            _ => false,
        }
    }
}

impl Eq for Term {}

impl Hash for Term {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Term::Iri(iri) => iri.hash(state),
            Term::BlankNode(id) => id.hash(state),
            Term::Literal {
                value,
                datatype,
                language,
            } => {
                value.hash(state);
                datatype.hash(state);
                language.hash(state);
            }
        }
    }
}

impl PartialOrd for Term {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Term {
    fn cmp(&self, other: &Self) -> Ordering {
        // Type ordering: BlankNode < Iri < Literal
        let type_ord = |t: &Term| -> u8 {
            match t {
                Term::BlankNode(_) => 0,
                Term::Iri(_) => 1,
                Term::Literal { .. } => 2,
            }
        };

        match type_ord(self).cmp(&type_ord(other)) {
            Ordering::Equal => {}
            ord => return ord,
        }

        match (self, other) {
            (Term::Iri(a), Term::Iri(b)) => a.cmp(b),
            (Term::BlankNode(a), Term::BlankNode(b)) => a.cmp(b),
            (
                Term::Literal {
                    value: v1,
                    datatype: d1,
                    language: l1,
                },
                Term::Literal {
                    value: v2,
                    datatype: d2,
                    language: l2,
                },
            ) => (d1, l1, v1).cmp(&(d2, l2, v2)),
            _ => Ordering::Equal,
        }
    }
}

impl std::fmt::Display for Term {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Term::Iri(iri) => write!(f, "<{iri}>"),
            Term::BlankNode(id) => write!(f, "{id}"),
            Term::Literal {
                value,
                datatype,
                language,
            } => {
                write!(f, "\"{}\"", value.lexical())?;
                if let Some(lang) = language {
                    write!(f, "@{lang}")
                } else if !datatype.is_xsd_string() {
                    write!(f, "^^<{}>", datatype.as_iri())
                } else {
                    Ok(())
                }
            }
        }
    }
}
