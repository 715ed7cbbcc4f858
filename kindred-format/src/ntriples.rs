//! N-Triples codec: one triple per line, fully expanded IRIs.
//!
//! This is the line-based format the `n3` extension maps to, matching the
//! original extension table. The parser is a small cursor scanner; the
//! writer emits sorted, escaped lines.

use kindred_graph::{Datatype, Graph, GraphSink, Term, TermId};

use crate::error::{FormatError, Result};

/// Parse an N-Triples document into GraphSink events.
pub fn parse<S: GraphSink>(input: &str, sink: &mut S) -> Result<()> {
    for (idx, raw_line) in input.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw_line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let mut cursor = Cursor::new(line, line_no);

        let s = cursor.parse_term()?;
        cursor.skip_ws();
        let p = cursor.parse_term()?;
        cursor.skip_ws();
        let o = cursor.parse_term()?;
        cursor.skip_ws();
        cursor.expect_dot()?;

        if !matches!(s, Term::Iri(_) | Term::BlankNode(_)) {
            return Err(FormatError::malformed(line_no, "subject must be an IRI or blank node"));
        }
        if !matches!(p, Term::Iri(_)) {
            return Err(FormatError::malformed(line_no, "predicate must be an IRI"));
        }

        let s = emit_term(sink, s);
        let p = emit_term(sink, p);
        let o = emit_term(sink, o);
        sink.emit_triple(s, p, o);
    }
    Ok(())
}

fn emit_term<S: GraphSink>(sink: &mut S, term: Term) -> TermId {
    match term {
        Term::BlankNode(id) => sink.term_blank(Some(id.as_str())),
        other => sink.term(other),
    }
}

/// Render a graph as an N-Triples document.
pub fn render(graph: &Graph) -> String {
    let mut out = String::new();
    for triple in graph.sorted_triples() {
        out.push_str(&format_term(&triple.s));
        out.push(' ');
        out.push_str(&format_term(&triple.p));
        out.push(' ');
        out.push_str(&format_term(&triple.o));
        out.push_str(" .\n");
    }
    out
}

fn format_term(term: &Term) -> String {
    match term {
        Term::Iri(iri) => format!("<{iri}>"),
        Term::BlankNode(id) => id.to_string(),
        Term::Literal {
            value,
            datatype,
            language,
        } => {
            let escaped = escape_literal(&value.lexical());
            if let Some(lang) = language {
                format!("\"{escaped}\"@{lang}")
            } else if datatype.is_xsd_string() {
                format!("\"{escaped}\"")
            } else {
                format!("\"{escaped}\"^^<{}>", datatype.as_iri())
            }
        }
    }
}

fn escape_literal(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(ch),
        }
    }
    out
}

/// Character cursor over a single N-Triples line.
struct Cursor<'a> {
    rest: &'a str,
    line: usize,
}

impl<'a> Cursor<'a> {
    fn new(line_content: &'a str, line: usize) -> Self {
        Self {
            rest: line_content,
            line,
        }
    }

    fn err(&self, message: impl Into<String>) -> FormatError {
        FormatError::malformed(self.line, message)
    }

    fn skip_ws(&mut self) {
        self.rest = self.rest.trim_start();
    }

    fn expect_dot(&mut self) -> Result<()> {
        match self.rest.strip_prefix('.') {
            Some(rest) if rest.trim().is_empty() => Ok(()),
            _ => Err(self.err("expected terminating '.'")),
        }
    }

    fn parse_term(&mut self) -> Result<Term> {
        if let Some(rest) = self.rest.strip_prefix('<') {
            let end = rest
                .find('>')
                .ok_or_else(|| self.err("unterminated IRI"))?;
            let iri = &rest[..end];
            if iri.is_empty() {
                return Err(self.err("empty IRI"));
            }
            self.rest = &rest[end + 1..];
            Ok(Term::iri(iri))
        } else if let Some(rest) = self.rest.strip_prefix("_:") {
            let end = rest
                .find(|c: char| c.is_whitespace())
                .unwrap_or(rest.len());
            let label = &rest[..end];
            if label.is_empty() {
                return Err(self.err("empty blank node label"));
            }
            self.rest = &rest[end..];
            Ok(Term::blank(label))
        } else if self.rest.starts_with('"') {
            self.parse_literal()
        } else {
            Err(self.err(format!("unexpected term at: {}", self.rest)))
        }
    }

    fn parse_literal(&mut self) -> Result<Term> {
        // Opening quote already sighted
        let mut chars = self.rest.char_indices();
        chars.next(); // consume '"'

        let mut value = String::new();
        let mut closed_at = None;
        while let Some((i, c)) = chars.next() {
            match c {
                '"' => {
                    closed_at = Some(i);
                    break;
                }
                '\\' => {
                    let (_, escaped) = chars
                        .next()
                        .ok_or_else(|| self.err("dangling escape in literal"))?;
                    match escaped {
                        't' => value.push('\t'),
                        'b' => value.push('\x08'),
                        'n' => value.push('\n'),
                        'r' => value.push('\r'),
                        'f' => value.push('\x0C'),
                        '"' => value.push('"'),
                        '\'' => value.push('\''),
                        '\\' => value.push('\\'),
                        'u' | 'U' => {
                            let width = if escaped == 'u' { 4 } else { 8 };
                            let mut hex = String::new();
                            for _ in 0..width {
                                let (_, h) = chars
                                    .next()
                                    .ok_or_else(|| self.err("truncated unicode escape"))?;
                                hex.push(h);
                            }
                            let code = u32::from_str_radix(&hex, 16)
                                .map_err(|_| self.err("invalid unicode escape"))?;
                            let c = char::from_u32(code)
                                .ok_or_else(|| self.err("invalid unicode escape"))?;
                            value.push(c);
                        }
                        other => {
                            return Err(self.err(format!("invalid escape '\\{other}'")));
                        }
                    }
                }
                c => value.push(c),
            }
        }
        let closed_at = closed_at.ok_or_else(|| self.err("unterminated literal"))?;
        self.rest = &self.rest[closed_at + 1..];

        // Optional language tag or datatype
        if let Some(rest) = self.rest.strip_prefix('@') {
            let end = rest
                .find(|c: char| !(c.is_ascii_alphanumeric() || c == '-'))
                .unwrap_or(rest.len());
            let lang = &rest[..end];
            if lang.is_empty() {
                return Err(self.err("empty language tag"));
            }
            self.rest = &rest[end..];
            Ok(Term::lang_string(value, lang))
        } else if let Some(rest) = self.rest.strip_prefix("^^<") {
            let end = rest
                .find('>')
                .ok_or_else(|| self.err("unterminated datatype IRI"))?;
            let dt = &rest[..end];
            self.rest = &rest[end + 1..];
            Ok(Term::canonical_literal(&value, Datatype::from_iri(dt), None))
        } else {
            Ok(Term::string(value))
        }
    }
}
