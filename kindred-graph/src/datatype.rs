//! RDF literal datatypes.
//!
//! Datatypes are always explicit in this store - there is no "untyped"
//! literal. Plain strings default to `xsd:string`, language-tagged strings
//! use `rdf:langString`.

use kindred_vocab::{rdf, xsd};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// An RDF literal datatype, stored as its expanded IRI.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Datatype(Arc<str>);

impl Datatype {
    /// Create a datatype from an expanded IRI
    pub fn from_iri(iri: impl AsRef<str>) -> Self {
        Datatype(Arc::from(iri.as_ref()))
    }

    /// xsd:string - default for plain string literals
    pub fn xsd_string() -> Self {
        Self::from_iri(xsd::STRING)
    }

    /// xsd:boolean
    pub fn xsd_boolean() -> Self {
        Self::from_iri(xsd::BOOLEAN)
    }

    /// xsd:integer
    pub fn xsd_integer() -> Self {
        Self::from_iri(xsd::INTEGER)
    }

    /// xsd:decimal
    pub fn xsd_decimal() -> Self {
        Self::from_iri(xsd::DECIMAL)
    }

    /// xsd:double
    pub fn xsd_double() -> Self {
        Self::from_iri(xsd::DOUBLE)
    }

    /// rdf:langString - for language-tagged literals
    pub fn rdf_lang_string() -> Self {
        Self::from_iri(rdf::LANG_STRING)
    }

    /// Get the expanded IRI of this datatype
    pub fn as_iri(&self) -> &str {
        &self.0
    }

    /// Check if this is the xsd:string datatype
    pub fn is_xsd_string(&self) -> bool {
        self.as_iri() == xsd::STRING
    }

    /// Check if this is the rdf:langString datatype
    pub fn is_lang_string(&self) -> bool {
        self.as_iri() == rdf::LANG_STRING
    }

    /// Check if this is a numeric type (integer family, decimal, double)
    pub fn is_numeric(&self) -> bool {
        xsd::is_integer_family(self.as_iri())
            || matches!(self.as_iri(), xsd::DECIMAL | xsd::DOUBLE)
    }
}

impl std::fmt::Display for Datatype {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_iri())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors() {
        assert_eq!(Datatype::xsd_string().as_iri(), xsd::STRING);
        assert_eq!(Datatype::xsd_integer().as_iri(), xsd::INTEGER);
        assert_eq!(Datatype::rdf_lang_string().as_iri(), rdf::LANG_STRING);
    }

    #[test]
    fn is_checks() {
        assert!(Datatype::xsd_string().is_xsd_string());
        assert!(!Datatype::xsd_integer().is_xsd_string());

        assert!(Datatype::xsd_integer().is_numeric());
        assert!(Datatype::xsd_double().is_numeric());
        assert!(Datatype::from_iri(xsd::INT).is_numeric());
        assert!(!Datatype::xsd_string().is_numeric());
    }
}
