//! Turtle parser that emits to a GraphSink.

use std::collections::HashMap;

use kindred_graph::{Datatype, GraphSink, Term, TermId};
use kindred_vocab::rdf;

use super::lexer::tokenize;
use super::token::{Token, TokenKind};
use crate::error::{FormatError, Result};

/// Turtle parser state.
pub struct Parser<'a, S> {
    tokens: Vec<Token>,
    pos: usize,
    sink: &'a mut S,
    /// Prefix mappings (alias -> namespace IRI)
    prefixes: HashMap<String, String>,
}

impl<'a, S: GraphSink> Parser<'a, S> {
    /// Create a new parser.
    pub fn new(input: &str, sink: &'a mut S) -> Result<Self> {
        Ok(Self {
            tokens: tokenize(input)?,
            pos: 0,
            sink,
            prefixes: HashMap::new(),
        })
    }

    /// Parse the entire Turtle document.
    pub fn parse(mut self) -> Result<()> {
        while !self.is_at_end() {
            self.parse_statement()?;
        }
        Ok(())
    }

    fn is_at_end(&self) -> bool {
        matches!(self.current().kind, TokenKind::Eof)
    }

    fn current(&self) -> &Token {
        &self.tokens[self.pos]
    }

    fn advance(&mut self) -> &Token {
        let token = &self.tokens[self.pos];
        if !self.is_at_end() {
            self.pos += 1;
        }
        token
    }

    fn expect(&mut self, kind: &TokenKind) -> Result<&Token> {
        if std::mem::discriminant(&self.current().kind) == std::mem::discriminant(kind) {
            Ok(self.advance())
        } else {
            Err(FormatError::parse(
                self.current().start,
                format!("expected {}, found {}", kind, self.current().kind),
            ))
        }
    }

    /// Parse a single statement (directive or triples).
    fn parse_statement(&mut self) -> Result<()> {
        match &self.current().kind {
            TokenKind::KwPrefix => self.parse_prefix_directive(),
            TokenKind::KwBase => self.parse_base_directive(),
            TokenKind::Eof => Ok(()),
            _ => self.parse_triples(),
        }
    }

    /// Parse an @prefix directive.
    fn parse_prefix_directive(&mut self) -> Result<()> {
        self.advance(); // consume @prefix

        let alias = match &self.current().kind {
            TokenKind::PrefixedNameNs(p) => p.to_string(),
            _ => {
                return Err(FormatError::parse(
                    self.current().start,
                    "expected prefix namespace",
                ))
            }
        };
        self.advance();

        let namespace = match &self.current().kind {
            TokenKind::Iri(iri) => self.require_absolute(iri)?,
            _ => {
                return Err(FormatError::parse(
                    self.current().start,
                    "expected IRI for prefix namespace",
                ))
            }
        };
        self.advance();

        self.sink.on_prefix(&alias, &namespace);
        self.prefixes.insert(alias, namespace);
        self.expect(&TokenKind::Dot)?;

        Ok(())
    }

    /// Parse an @base directive.
    fn parse_base_directive(&mut self) -> Result<()> {
        self.advance(); // consume @base

        let base_iri = match &self.current().kind {
            TokenKind::Iri(iri) => iri.to_string(),
            _ => {
                return Err(FormatError::parse(
                    self.current().start,
                    "expected IRI for base",
                ))
            }
        };
        self.advance();

        self.sink.on_base(&base_iri);
        self.expect(&TokenKind::Dot)?;

        Ok(())
    }

    /// Parse a triple statement.
    fn parse_triples(&mut self) -> Result<()> {
        let subject = self.parse_subject()?;
        self.parse_predicate_object_list(subject)?;
        self.expect(&TokenKind::Dot)?;
        Ok(())
    }

    /// Parse a subject term.
    fn parse_subject(&mut self) -> Result<TermId> {
        match &self.current().kind.clone() {
            TokenKind::Iri(iri) => {
                let resolved = self.require_absolute(iri)?;
                self.advance();
                Ok(self.sink.term_iri(&resolved))
            }
            TokenKind::PrefixedName { prefix, local } => {
                let iri = self.expand_prefixed_name(prefix, local)?;
                self.advance();
                Ok(self.sink.term_iri(&iri))
            }
            TokenKind::PrefixedNameNs(prefix) => {
                let iri = self.expand_prefixed_name(prefix, "")?;
                self.advance();
                Ok(self.sink.term_iri(&iri))
            }
            TokenKind::BlankNodeLabel(label) => {
                self.advance();
                Ok(self.sink.term_blank(Some(label)))
            }
            TokenKind::Anon => {
                self.advance();
                Ok(self.sink.term_blank(None))
            }
            TokenKind::LBracket => self.parse_blank_node_property_list(),
            _ => Err(FormatError::parse(
                self.current().start,
                format!("expected subject, found {}", self.current().kind),
            )),
        }
    }

    /// Parse a predicate-object list.
    fn parse_predicate_object_list(&mut self, subject: TermId) -> Result<()> {
        loop {
            let predicate = self.parse_predicate()?;
            self.parse_object_list(subject, predicate)?;

            if matches!(self.current().kind, TokenKind::Semicolon) {
                self.advance();
                // A semicolon may be followed by the end of the statement
                if matches!(
                    self.current().kind,
                    TokenKind::Dot | TokenKind::RBracket | TokenKind::Eof
                ) {
                    break;
                }
            } else {
                break;
            }
        }
        Ok(())
    }

    /// Parse a predicate.
    fn parse_predicate(&mut self) -> Result<TermId> {
        match &self.current().kind.clone() {
            TokenKind::Iri(iri) => {
                let resolved = self.require_absolute(iri)?;
                self.advance();
                Ok(self.sink.term_iri(&resolved))
            }
            TokenKind::PrefixedName { prefix, local } => {
                let iri = self.expand_prefixed_name(prefix, local)?;
                self.advance();
                Ok(self.sink.term_iri(&iri))
            }
            TokenKind::PrefixedNameNs(prefix) => {
                let iri = self.expand_prefixed_name(prefix, "")?;
                self.advance();
                Ok(self.sink.term_iri(&iri))
            }
            TokenKind::KwA => {
                self.advance();
                Ok(self.sink.term_iri(rdf::TYPE))
            }
            _ => Err(FormatError::parse(
                self.current().start,
                format!("expected predicate, found {}", self.current().kind),
            )),
        }
    }

    /// Parse an object list (comma-separated objects).
    fn parse_object_list(&mut self, subject: TermId, predicate: TermId) -> Result<()> {
        loop {
            let object = self.parse_object()?;
            self.sink.emit_triple(subject, predicate, object);

            if matches!(self.current().kind, TokenKind::Comma) {
                self.advance();
            } else {
                break;
            }
        }
        Ok(())
    }

    /// Parse an object term.
    fn parse_object(&mut self) -> Result<TermId> {
        match &self.current().kind.clone() {
            TokenKind::Iri(iri) => {
                let resolved = self.require_absolute(iri)?;
                self.advance();
                Ok(self.sink.term_iri(&resolved))
            }
            TokenKind::PrefixedName { prefix, local } => {
                let iri = self.expand_prefixed_name(prefix, local)?;
                self.advance();
                Ok(self.sink.term_iri(&iri))
            }
            TokenKind::PrefixedNameNs(prefix) => {
                let iri = self.expand_prefixed_name(prefix, "")?;
                self.advance();
                Ok(self.sink.term_iri(&iri))
            }
            TokenKind::BlankNodeLabel(label) => {
                self.advance();
                Ok(self.sink.term_blank(Some(label)))
            }
            TokenKind::Anon => {
                self.advance();
                Ok(self.sink.term_blank(None))
            }
            TokenKind::LBracket => self.parse_blank_node_property_list(),
            TokenKind::String(_)
            | TokenKind::Integer(_)
            | TokenKind::Decimal(_)
            | TokenKind::Double(_)
            | TokenKind::KwTrue
            | TokenKind::KwFalse => self.parse_literal(),
            _ => Err(FormatError::parse(
                self.current().start,
                format!("expected object, found {}", self.current().kind),
            )),
        }
    }

    /// Parse a literal (string with optional language tag or datatype,
    /// or a bare numeric/boolean form).
    fn parse_literal(&mut self) -> Result<TermId> {
        match &self.current().kind.clone() {
            TokenKind::String(value) => {
                let value = value.clone();
                self.advance();

                match &self.current().kind.clone() {
                    TokenKind::LangTag(lang) => {
                        let lang = lang.clone();
                        self.advance();
                        Ok(self
                            .sink
                            .term_literal(&value, Datatype::rdf_lang_string(), Some(&lang)))
                    }
                    TokenKind::DoubleCaret => {
                        self.advance();
                        let datatype_iri = self.parse_datatype_iri()?;
                        let datatype = Datatype::from_iri(&datatype_iri);
                        Ok(self.sink.term_literal(&value, datatype, None))
                    }
                    _ => Ok(self.sink.term_literal(&value, Datatype::xsd_string(), None)),
                }
            }
            TokenKind::Integer(n) => {
                let n = *n;
                self.advance();
                Ok(self.sink.term(Term::integer(n)))
            }
            TokenKind::Decimal(s) => {
                let s = s.clone();
                self.advance();
                Ok(self.sink.term(Term::typed(&*s, Datatype::xsd_decimal())))
            }
            TokenKind::Double(n) => {
                let n = *n;
                self.advance();
                Ok(self.sink.term(Term::double(n)))
            }
            TokenKind::KwTrue => {
                self.advance();
                Ok(self.sink.term(Term::boolean(true)))
            }
            TokenKind::KwFalse => {
                self.advance();
                Ok(self.sink.term(Term::boolean(false)))
            }
            _ => Err(FormatError::parse(
                self.current().start,
                format!("expected literal, found {}", self.current().kind),
            )),
        }
    }

    /// Parse a datatype IRI after ^^.
    fn parse_datatype_iri(&mut self) -> Result<String> {
        match &self.current().kind.clone() {
            TokenKind::Iri(iri) => {
                let resolved = self.require_absolute(iri)?;
                self.advance();
                Ok(resolved)
            }
            TokenKind::PrefixedName { prefix, local } => {
                let iri = self.expand_prefixed_name(prefix, local)?;
                self.advance();
                Ok(iri)
            }
            _ => Err(FormatError::parse(
                self.current().start,
                format!("expected datatype IRI, found {}", self.current().kind),
            )),
        }
    }

    /// Parse a blank node property list: `[ predicate object ; ... ]`
    fn parse_blank_node_property_list(&mut self) -> Result<TermId> {
        self.expect(&TokenKind::LBracket)?;

        let bnode = self.sink.term_blank(None);

        if !matches!(self.current().kind, TokenKind::RBracket) {
            self.parse_predicate_object_list(bnode)?;
        }

        self.expect(&TokenKind::RBracket)?;

        Ok(bnode)
    }

    /// Require an absolute IRI reference.
    ///
    /// This codec does not resolve relative references; every IRI in the
    /// document must carry a scheme.
    fn require_absolute(&self, reference: &str) -> Result<String> {
        if has_scheme(reference) {
            Ok(reference.to_string())
        } else {
            Err(FormatError::parse(
                self.current().start,
                format!("relative IRI reference <{reference}> is not supported"),
            ))
        }
    }

    /// Expand a prefixed name to a full IRI.
    fn expand_prefixed_name(&self, prefix: &str, local: &str) -> Result<String> {
        match self.prefixes.get(prefix) {
            Some(namespace) => Ok(format!("{namespace}{local}")),
            None => Err(FormatError::UndefinedPrefix(prefix.to_string())),
        }
    }
}

/// Check whether a reference starts with a URI scheme.
fn has_scheme(reference: &str) -> bool {
    match reference.find(':') {
        Some(pos) if pos > 0 => {
            let scheme = &reference[..pos];
            scheme.chars().next().is_some_and(|c| c.is_ascii_alphabetic())
                && scheme
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '+' || c == '-' || c == '.')
        }
        _ => false,
    }
}

/// Parse a Turtle document into GraphSink events.
pub fn parse<S: GraphSink>(input: &str, sink: &mut S) -> Result<()> {
    Parser::new(input, sink)?.parse()
}

#[cfg(test)]
mod tests {
    use super::*;
    use kindred_graph::{Graph, GraphCollectorSink, LiteralValue};

    fn parse_to_graph(input: &str) -> Result<Graph> {
        let mut sink = GraphCollectorSink::new();
        parse(input, &mut sink)?;
        Ok(sink.finish())
    }

    #[test]
    fn simple_triple() {
        let input = r#"<http://example.org/maggie> <http://xmlns.com/foaf/0.1/name> "Maggie Simpson" ."#;
        let graph = parse_to_graph(input).unwrap();

        assert_eq!(graph.len(), 1);
        let triple = graph.iter().next().unwrap();
        assert_eq!(triple.s.as_iri(), Some("http://example.org/maggie"));
        assert_eq!(triple.p.as_iri(), Some("http://xmlns.com/foaf/0.1/name"));
    }

    #[test]
    fn prefix_directive_expands_names() {
        let input = r#"
            @prefix sim: <http://example.org/sim#> .
            @prefix foaf: <http://xmlns.com/foaf/0.1/> .
            sim:Maggie foaf:name "Maggie Simpson" .
        "#;
        let graph = parse_to_graph(input).unwrap();

        assert_eq!(graph.len(), 1);
        let triple = graph.iter().next().unwrap();
        assert_eq!(triple.s.as_iri(), Some("http://example.org/sim#Maggie"));
        assert_eq!(graph.prefix("sim"), Some("http://example.org/sim#"));
    }

    #[test]
    fn a_keyword_is_rdf_type() {
        let input = r#"
            @prefix sim: <http://example.org/sim#> .
            @prefix foaf: <http://xmlns.com/foaf/0.1/> .
            sim:Maggie a foaf:Person .
        "#;
        let graph = parse_to_graph(input).unwrap();

        let triple = graph.iter().next().unwrap();
        assert_eq!(triple.p.as_iri(), Some(rdf::TYPE));
    }

    #[test]
    fn semicolon_and_comma_lists() {
        let input = r#"
            @prefix ex: <http://example.org/> .
            ex:abe ex:name "Abe" ;
                   ex:knows ex:mona, ex:herb .
        "#;
        let graph = parse_to_graph(input).unwrap();
        assert_eq!(graph.len(), 3);
    }

    #[test]
    fn labeled_and_anonymous_blank_nodes() {
        let input = r#"
            @prefix ex: <http://example.org/> .
            _:b1 ex:name "someone" .
            ex:herb ex:father [] .
        "#;
        let graph = parse_to_graph(input).unwrap();

        assert_eq!(graph.len(), 2);
        let labeled = graph
            .iter()
            .find(|t| t.s.is_blank())
            .expect("labeled blank subject");
        assert_eq!(labeled.s.as_blank().unwrap().as_str(), "b1");
    }

    #[test]
    fn blank_node_property_list() {
        let input = r#"
            @prefix ex: <http://example.org/> .
            ex:herb ex:father [ ex:name "unknown" ] .
        "#;
        let graph = parse_to_graph(input).unwrap();
        assert_eq!(graph.len(), 2);
    }

    #[test]
    fn typed_literal_canonicalizes_integer() {
        let input = r#"
            @prefix ex: <http://example.org/> .
            @prefix xsd: <http://www.w3.org/2001/XMLSchema#> .
            ex:abe ex:age "78"^^xsd:int .
        "#;
        let graph = parse_to_graph(input).unwrap();

        let triple = graph.iter().next().unwrap();
        let (value, datatype, _) = triple.o.as_literal().unwrap();
        assert_eq!(value, &LiteralValue::Integer(78));
        assert_eq!(datatype.as_iri(), kindred_vocab::xsd::INT);
    }

    #[test]
    fn bare_literals() {
        let input = r#"
            @prefix ex: <http://example.org/> .
            ex:x ex:age 1 ;
                 ex:height 1.85 ;
                 ex:mass 6.5e1 ;
                 ex:alive true .
        "#;
        let graph = parse_to_graph(input).unwrap();
        assert_eq!(graph.len(), 4);

        let age = Term::iri("http://example.org/age");
        let t = graph.matching(None, Some(&age), None).next().unwrap();
        let (value, _, _) = t.o.as_literal().unwrap();
        assert_eq!(value.as_integer(), Some(1));
    }

    #[test]
    fn language_tagged_literal() {
        let input = r#"
            @prefix ex: <http://example.org/> .
            ex:x ex:name "Marguerite"@fr .
        "#;
        let graph = parse_to_graph(input).unwrap();

        let triple = graph.iter().next().unwrap();
        let (_, datatype, lang) = triple.o.as_literal().unwrap();
        assert!(datatype.is_lang_string());
        assert_eq!(lang, Some("fr"));
    }

    #[test]
    fn undefined_prefix_is_an_error() {
        let input = "sim:Maggie a sim:Person .";
        let err = parse_to_graph(input).unwrap_err();
        assert!(matches!(err, FormatError::UndefinedPrefix(p) if p == "sim"));
    }

    #[test]
    fn relative_iri_is_an_error() {
        let input = "<maggie> <http://example.org/p> <http://example.org/o> .";
        assert!(matches!(
            parse_to_graph(input),
            Err(FormatError::Parse { .. })
        ));
    }

    #[test]
    fn missing_dot_is_an_error() {
        let input = r#"<http://e/s> <http://e/p> "o""#;
        assert!(parse_to_graph(input).is_err());
    }

    #[test]
    fn duplicate_statements_collapse() {
        let input = r#"
            @prefix ex: <http://example.org/> .
            ex:a ex:p ex:b .
            ex:a ex:p ex:b .
        "#;
        let graph = parse_to_graph(input).unwrap();
        assert_eq!(graph.len(), 1);
    }
}
