//! RDF vocabulary constants and namespace aliases for kindred.
//!
//! This crate is the single home for the IRIs and local names the rest of
//! the workspace constructs identifiers from.
//!
//! # Organization
//!
//! - `rdf` - RDF vocabulary (http://www.w3.org/1999/02/22-rdf-syntax-ns#)
//! - `foaf` - FOAF vocabulary (http://xmlns.com/foaf/0.1/)
//! - `xsd` - XSD datatypes (http://www.w3.org/2001/XMLSchema#)
//! - `family` - local names of the family-relations vocabulary
//! - `aliases` - well-known prefix aliases expected in input graphs

/// RDF vocabulary constants
pub mod rdf {
    /// RDF namespace IRI
    pub const NS: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";

    /// rdf:type IRI
    pub const TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";

    /// rdf:langString IRI
    pub const LANG_STRING: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#langString";
}

/// FOAF vocabulary constants
///
/// The general-purpose person/attribute vocabulary: `foaf:Person`,
/// `foaf:name`, and `foaf:age` are the class and predicates the fact
/// builder and the age classifier agree on.
pub mod foaf {
    /// FOAF namespace IRI
    pub const NS: &str = "http://xmlns.com/foaf/0.1/";

    /// foaf:Person IRI
    pub const PERSON: &str = "http://xmlns.com/foaf/0.1/Person";

    /// foaf:name IRI
    pub const NAME: &str = "http://xmlns.com/foaf/0.1/name";

    /// foaf:age IRI
    pub const AGE: &str = "http://xmlns.com/foaf/0.1/age";
}

/// XSD datatype constants
pub mod xsd {
    /// xsd:string IRI
    pub const STRING: &str = "http://www.w3.org/2001/XMLSchema#string";

    /// xsd:boolean IRI
    pub const BOOLEAN: &str = "http://www.w3.org/2001/XMLSchema#boolean";

    /// xsd:integer IRI
    pub const INTEGER: &str = "http://www.w3.org/2001/XMLSchema#integer";

    /// xsd:int IRI
    pub const INT: &str = "http://www.w3.org/2001/XMLSchema#int";

    /// xsd:long IRI
    pub const LONG: &str = "http://www.w3.org/2001/XMLSchema#long";

    /// xsd:decimal IRI
    pub const DECIMAL: &str = "http://www.w3.org/2001/XMLSchema#decimal";

    /// xsd:double IRI
    pub const DOUBLE: &str = "http://www.w3.org/2001/XMLSchema#double";

    /// Check if a datatype IRI is in the integer family.
    ///
    /// int, long and friends all map to the same native i64 storage, so
    /// the sink normalizes their lexical forms through one path.
    #[inline]
    pub fn is_integer_family(datatype_iri: &str) -> bool {
        matches!(datatype_iri, INTEGER | INT | LONG)
    }
}

/// Family-relations vocabulary local names.
///
/// These are local names, not full IRIs: the family namespace itself comes
/// from the input graph's `fam` prefix binding, so the full identifiers
/// are only known at run time.
pub mod family {
    /// Symmetric spouse relation
    pub const HAS_SPOUSE: &str = "hasSpouse";

    /// Child-to-father relation
    pub const HAS_FATHER: &str = "hasFather";

    /// Derived class: age under 18
    pub const MINOR: &str = "Minor";

    /// Derived class: age under 2
    pub const INFANT: &str = "Infant";

    /// Derived class: age over 70
    pub const OLD: &str = "Old";
}

/// Well-known prefix aliases expected in input graphs.
pub mod aliases {
    /// Person namespace alias
    pub const SIM: &str = "sim";

    /// Family-relations namespace alias
    pub const FAM: &str = "fam";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_family_membership() {
        assert!(xsd::is_integer_family(xsd::INTEGER));
        assert!(xsd::is_integer_family(xsd::INT));
        assert!(xsd::is_integer_family(xsd::LONG));
        assert!(!xsd::is_integer_family(xsd::DOUBLE));
        assert!(!xsd::is_integer_family(xsd::STRING));
    }

    #[test]
    fn foaf_terms_share_namespace() {
        assert!(foaf::PERSON.starts_with(foaf::NS));
        assert!(foaf::NAME.starts_with(foaf::NS));
        assert!(foaf::AGE.starts_with(foaf::NS));
    }
}
