//! Turtle renderer.
//!
//! Produces deterministic output: an `@prefix` header from the graph's
//! prefix table, triples sorted by SPO and grouped by subject, IRIs
//! compacted against the declared prefixes, `a` for rdf:type, and bare
//! lexical forms for the numeric and boolean datatypes the parser reads
//! back natively.

use kindred_graph::{Datatype, Graph, LiteralValue, Term, Triple};
use kindred_vocab::{rdf, xsd};
use std::fmt::Write;

/// Render a graph as a Turtle document.
pub fn render(graph: &Graph) -> String {
    let mut out = String::new();

    for (alias, namespace) in graph.prefixes() {
        let _ = writeln!(out, "@prefix {alias}: <{namespace}> .");
    }
    if !graph.prefixes().is_empty() {
        out.push('\n');
    }

    let sorted = graph.sorted_triples();
    let mut i = 0;
    while i < sorted.len() {
        let subject = &sorted[i].s;
        let group_end = sorted[i..]
            .iter()
            .position(|t| t.s != *subject)
            .map(|n| i + n)
            .unwrap_or(sorted.len());

        write_subject_group(&mut out, graph, &sorted[i..group_end]);
        i = group_end;
    }

    out
}

/// Write one subject's triples as a `;`-separated predicate-object block.
fn write_subject_group(out: &mut String, graph: &Graph, triples: &[&Triple]) {
    let subject = format_term(graph, &triples[0].s);
    let _ = write!(out, "{subject}");

    for (idx, triple) in triples.iter().enumerate() {
        let predicate = format_predicate(graph, &triple.p);
        let object = format_term(graph, &triple.o);
        let sep = if idx + 1 < triples.len() { " ;" } else { " ." };
        if idx == 0 {
            let _ = writeln!(out, " {predicate} {object}{sep}");
        } else {
            let _ = writeln!(out, "    {predicate} {object}{sep}");
        }
    }
    out.push('\n');
}

/// Format a predicate, using `a` for rdf:type.
fn format_predicate(graph: &Graph, term: &Term) -> String {
    if term.as_iri() == Some(rdf::TYPE) {
        "a".to_string()
    } else {
        format_term(graph, term)
    }
}

/// Format a term for Turtle output.
fn format_term(graph: &Graph, term: &Term) -> String {
    match term {
        Term::Iri(iri) => compact_iri(graph, iri).unwrap_or_else(|| format!("<{iri}>")),
        Term::BlankNode(id) => id.to_string(),
        Term::Literal {
            value,
            datatype,
            language,
        } => format_literal(graph, value, datatype, language.as_deref()),
    }
}

fn format_literal(
    graph: &Graph,
    value: &LiteralValue,
    datatype: &Datatype,
    language: Option<&str>,
) -> String {
    if let Some(lang) = language {
        return format!("\"{}\"@{lang}", escape_string(&value.lexical()));
    }

    match (value, datatype.as_iri()) {
        // Bare forms the lexer reads back to the same native value
        (LiteralValue::Integer(i), xsd::INTEGER) => i.to_string(),
        (LiteralValue::Boolean(b), xsd::BOOLEAN) => b.to_string(),
        (LiteralValue::Double(d), xsd::DOUBLE) if d.is_finite() => format!("{d:e}"),
        (LiteralValue::String(s), xsd::DECIMAL) if is_decimal_lexical(s) => s.to_string(),
        (LiteralValue::String(s), xsd::STRING) => format!("\"{}\"", escape_string(s)),
        (value, dt_iri) => {
            let dt = compact_iri(graph, dt_iri).unwrap_or_else(|| format!("<{dt_iri}>"));
            format!("\"{}\"^^{dt}", escape_string(&value.lexical()))
        }
    }
}

/// Check that a lexical form is a bare Turtle decimal (`digits.digits`).
fn is_decimal_lexical(s: &str) -> bool {
    let s = s.strip_prefix(['+', '-']).unwrap_or(s);
    match s.split_once('.') {
        Some((whole, frac)) => {
            !whole.is_empty()
                && !frac.is_empty()
                && whole.chars().all(|c| c.is_ascii_digit())
                && frac.chars().all(|c| c.is_ascii_digit())
        }
        None => false,
    }
}

/// Compact an IRI against the graph's prefix table.
///
/// Picks the longest matching namespace; gives up (returns `None`) when
/// the remaining local name would not survive re-parsing as a prefixed
/// name.
fn compact_iri(graph: &Graph, iri: &str) -> Option<String> {
    let (alias, local) = graph
        .prefixes()
        .iter()
        .filter_map(|(alias, ns)| iri.strip_prefix(ns.as_str()).map(|local| (alias, local)))
        .max_by_key(|(_, local)| iri.len() - local.len())?;

    if is_safe_local(local) {
        Some(format!("{alias}:{local}"))
    } else {
        None
    }
}

/// Conservative check for local names that round-trip unambiguously.
fn is_safe_local(local: &str) -> bool {
    !local.is_empty()
        && local
            .chars()
            .all(|c| c.is_alphanumeric() || c == '_' || c == '-')
}

/// Escape a string for a double-quoted Turtle literal.
fn escape_string(s: &str) -> String {
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
