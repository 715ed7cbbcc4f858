//! Turtle token types.

use std::sync::Arc;

/// A token with its source span.
#[derive(Clone, Debug, PartialEq)]
pub struct Token {
    /// The token kind
    pub kind: TokenKind,
    /// Source location (start byte offset)
    pub start: usize,
    /// Source location (end byte offset)
    pub end: usize,
}

impl Token {
    /// Create a new token.
    pub fn new(kind: TokenKind, start: usize, end: usize) -> Self {
        Self { kind, start, end }
    }
}

/// Token kinds for the Turtle subset this codec supports.
#[derive(Clone, Debug, PartialEq)]
pub enum TokenKind {
    /// Full IRI: `<http://example.org/>`
    Iri(Arc<str>),

    /// Prefixed name namespace: `prefix:` (no local part)
    PrefixedNameNs(Arc<str>),

    /// Prefixed name with local: `prefix:local`
    PrefixedName {
        /// Namespace alias (without colon)
        prefix: Arc<str>,
        /// Local name
        local: Arc<str>,
    },

    /// Labeled blank node: `_:name`
    BlankNodeLabel(Arc<str>),

    /// Anonymous blank node: `[]`
    Anon,

    /// String literal (unescaped content)
    String(Arc<str>),

    /// Integer literal
    Integer(i64),

    /// Decimal literal (stored as string to preserve the lexical form)
    Decimal(Arc<str>),

    /// Double literal (floating point with exponent)
    Double(f64),

    /// Language tag, stored without the `@` prefix
    LangTag(Arc<str>),

    /// `@prefix` directive
    KwPrefix,

    /// `@base` directive
    KwBase,

    /// `a` keyword (shorthand for rdf:type)
    KwA,

    /// `true` boolean literal
    KwTrue,

    /// `false` boolean literal
    KwFalse,

    /// `.`
    Dot,
    /// `,`
    Comma,
    /// `;`
    Semicolon,
    /// `^^` (datatype marker)
    DoubleCaret,
    /// `[`
    LBracket,
    /// `]`
    RBracket,

    /// End of input
    Eof,
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenKind::Iri(s) => write!(f, "<{s}>"),
            TokenKind::PrefixedNameNs(s) => write!(f, "{s}:"),
            TokenKind::PrefixedName { prefix, local } => write!(f, "{prefix}:{local}"),
            TokenKind::BlankNodeLabel(s) => write!(f, "_:{s}"),
            TokenKind::Anon => write!(f, "[]"),
            TokenKind::String(s) => write!(f, "\"{s}\""),
            TokenKind::Integer(n) => write!(f, "{n}"),
            TokenKind::Decimal(s) => write!(f, "{s}"),
            TokenKind::Double(n) => write!(f, "{n:e}"),
            TokenKind::LangTag(s) => write!(f, "@{s}"),
            TokenKind::KwPrefix => write!(f, "@prefix"),
            TokenKind::KwBase => write!(f, "@base"),
            TokenKind::KwA => write!(f, "a"),
            TokenKind::KwTrue => write!(f, "true"),
            TokenKind::KwFalse => write!(f, "false"),
            TokenKind::Dot => write!(f, "."),
            TokenKind::Comma => write!(f, ","),
            TokenKind::Semicolon => write!(f, ";"),
            TokenKind::DoubleCaret => write!(f, "^^"),
            TokenKind::LBracket => write!(f, "["),
            TokenKind::RBracket => write!(f, "]"),
            TokenKind::Eof => write!(f, "EOF"),
        }
    }
}
