//! Serialization syntax tags and filename-based detection.

use std::path::Path;

/// A serialization syntax supported by the codecs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Syntax {
    /// Turtle (`.ttl`)
    #[default]
    Turtle,
    /// N-Triples (`.nt`, and `.n3` for compatibility with the original
    /// extension table, which mapped `n3` to the line-based format)
    NTriples,
    /// RDF/XML (`.rdf`)
    RdfXml,
}

impl Syntax {
    /// Detect the syntax from a filename extension.
    ///
    /// Unrecognized or missing extensions fall back to `default`; this
    /// function is total and never fails.
    pub fn detect(path: &Path, default: Syntax) -> Syntax {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        match ext.as_deref() {
            Some("ttl") => Syntax::Turtle,
            Some("nt") | Some("n3") => Syntax::NTriples,
            Some("rdf") => Syntax::RdfXml,
            _ => default,
        }
    }

    /// Short name for logs and diagnostics
    pub fn as_str(&self) -> &'static str {
        match self {
            Syntax::Turtle => "turtle",
            Syntax::NTriples => "ntriples",
            Syntax::RdfXml => "rdfxml",
        }
    }
}

impl std::fmt::Display for Syntax {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_extensions() {
        assert_eq!(
            Syntax::detect(Path::new("family.ttl"), Syntax::Turtle),
            Syntax::Turtle
        );
        assert_eq!(
            Syntax::detect(Path::new("family.n3"), Syntax::Turtle),
            Syntax::NTriples
        );
        assert_eq!(
            Syntax::detect(Path::new("family.nt"), Syntax::Turtle),
            Syntax::NTriples
        );
        assert_eq!(
            Syntax::detect(Path::new("family.rdf"), Syntax::Turtle),
            Syntax::RdfXml
        );
    }

    #[test]
    fn detection_is_case_insensitive() {
        assert_eq!(
            Syntax::detect(Path::new("FAMILY.TTL"), Syntax::RdfXml),
            Syntax::Turtle
        );
        assert_eq!(
            Syntax::detect(Path::new("family.RDF"), Syntax::Turtle),
            Syntax::RdfXml
        );
    }

    #[test]
    fn unknown_extension_falls_back_to_default() {
        assert_eq!(
            Syntax::detect(Path::new("family.txt"), Syntax::Turtle),
            Syntax::Turtle
        );
        assert_eq!(
            Syntax::detect(Path::new("family.txt"), Syntax::RdfXml),
            Syntax::RdfXml
        );
        assert_eq!(
            Syntax::detect(Path::new("family"), Syntax::NTriples),
            Syntax::NTriples
        );
    }
}
