//! RDF/XML codec.
//!
//! Reads the flat RDF/XML subset this tool exchanges: an `rdf:RDF` root,
//! `rdf:Description` elements addressed by `rdf:about` or `rdf:nodeID`,
//! and property elements carrying `rdf:resource`, `rdf:nodeID`,
//! `rdf:datatype`, `xml:lang`, or text content. Not a general-purpose
//! RDF/XML parser; nested node elements and containers are out of scope.
//!
//! The writer emits the same shape: one `rdf:Description` per subject
//! with namespace declarations gathered from the graph's prefix table
//! (auto-generating `ns<N>` aliases for predicate namespaces the table
//! does not cover).

use std::collections::HashMap;

use kindred_graph::{Datatype, Graph, GraphSink, Term, TermId, Triple};
use kindred_vocab::rdf;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::error::{FormatError, Result};

/// Parse an RDF/XML document into GraphSink events.
pub fn parse<S: GraphSink>(input: &str, sink: &mut S) -> Result<()> {
    let mut reader = Reader::from_str(input);

    let mut namespaces: HashMap<String, String> = HashMap::new();
    let mut current_subject: Option<TermId> = None;
    let mut current_predicate: Option<TermId> = None;
    let mut pending_object: Option<TermId> = None;
    let mut current_datatype: Option<String> = None;
    let mut current_lang: Option<String> = None;
    let mut text_buf = String::new();
    let mut in_property = false;
    let mut saw_root = false;

    loop {
        match reader.read_event()? {
            Event::Start(ref e) => {
                let (prefix, local) = split_qname(e.name().as_ref());
                collect_namespaces(e, &mut namespaces, sink);

                if local == "RDF" && prefix_is_rdf(&prefix, &namespaces) {
                    saw_root = true;
                } else if local == "Description"
                    && prefix_is_rdf(&prefix, &namespaces)
                    && !in_property
                {
                    current_subject = Some(description_subject(e, &namespaces, sink));
                } else if current_subject.is_some() && !in_property {
                    current_predicate = Some({
                        let iri = resolve_qname(&prefix, &local, &namespaces)?;
                        sink.term_iri(&iri)
                    });
                    pending_object = object_attr(e, &namespaces, sink);
                    current_datatype = extract_rdf_attr(e, "datatype", &namespaces);
                    current_lang = extract_plain_attr(e, "xml:lang");
                    text_buf.clear();
                    in_property = true;
                } else {
                    return Err(FormatError::RdfXml(format!(
                        "unsupported element <{}>",
                        String::from_utf8_lossy(e.name().as_ref())
                    )));
                }
            }
            Event::Empty(ref e) => {
                let (prefix, local) = split_qname(e.name().as_ref());
                collect_namespaces(e, &mut namespaces, sink);

                if local == "Description" && prefix_is_rdf(&prefix, &namespaces) {
                    // Subject with no properties contributes no triples
                } else if let Some(subject) = current_subject {
                    // Self-closing property (e.g. <fam:hasFather rdf:nodeID="b1"/>)
                    let predicate = {
                        let iri = resolve_qname(&prefix, &local, &namespaces)?;
                        sink.term_iri(&iri)
                    };
                    if let Some(object) = object_attr(e, &namespaces, sink) {
                        sink.emit_triple(subject, predicate, object);
                    }
                }
            }
            Event::Text(ref e) => {
                if in_property {
                    text_buf.push_str(
                        &e.unescape()
                            .map_err(|e| FormatError::RdfXml(e.to_string()))?,
                    );
                }
            }
            Event::End(ref e) => {
                let (prefix, local) = split_qname(e.name().as_ref());

                if local == "Description" && prefix_is_rdf(&prefix, &namespaces) {
                    current_subject = None;
                } else if in_property {
                    if let (Some(subject), Some(predicate)) = (current_subject, current_predicate) {
                        if let Some(object) = pending_object {
                            sink.emit_triple(subject, predicate, object);
                        } else {
                            let value = text_buf.trim();
                            if !value.is_empty() {
                                let datatype = current_datatype
                                    .as_deref()
                                    .map(Datatype::from_iri)
                                    .unwrap_or_else(Datatype::xsd_string);
                                let object =
                                    sink.term_literal(value, datatype, current_lang.as_deref());
                                sink.emit_triple(subject, predicate, object);
                            }
                        }
                    }
                    current_predicate = None;
                    pending_object = None;
                    current_datatype = None;
                    current_lang = None;
                    text_buf.clear();
                    in_property = false;
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !saw_root {
        return Err(FormatError::RdfXml("missing rdf:RDF root element".into()));
    }

    Ok(())
}

/// Determine the subject of an rdf:Description element.
fn description_subject<S: GraphSink>(
    e: &BytesStart,
    namespaces: &HashMap<String, String>,
    sink: &mut S,
) -> TermId {
    if let Some(iri) = extract_rdf_attr(e, "about", namespaces) {
        sink.term_iri(&iri)
    } else if let Some(label) = extract_rdf_attr(e, "nodeID", namespaces) {
        sink.term_blank(Some(&label))
    } else {
        sink.term_blank(None)
    }
}

/// Extract an object from rdf:resource / rdf:nodeID attributes, if present.
fn object_attr<S: GraphSink>(
    e: &BytesStart,
    namespaces: &HashMap<String, String>,
    sink: &mut S,
) -> Option<TermId> {
    if let Some(iri) = extract_rdf_attr(e, "resource", namespaces) {
        Some(sink.term_iri(&iri))
    } else {
        extract_rdf_attr(e, "nodeID", namespaces).map(|label| sink.term_blank(Some(&label)))
    }
}

/// Split a qualified XML name (e.g. b"rdf:Description") into (prefix, local).
fn split_qname(name: &[u8]) -> (String, String) {
    let name_str = String::from_utf8_lossy(name);
    match name_str.find(':') {
        Some(pos) => (name_str[..pos].to_string(), name_str[pos + 1..].to_string()),
        None => (String::new(), name_str.to_string()),
    }
}

/// Check if a prefix maps to the RDF namespace.
fn prefix_is_rdf(prefix: &str, namespaces: &HashMap<String, String>) -> bool {
    namespaces.get(prefix).is_some_and(|ns| ns == rdf::NS)
}

/// Collect xmlns: declarations, forwarding new bindings to the sink so
/// they land in the graph's prefix table.
fn collect_namespaces<S: GraphSink>(
    e: &BytesStart,
    namespaces: &mut HashMap<String, String>,
    sink: &mut S,
) {
    for attr in e.attributes().flatten() {
        let key = String::from_utf8_lossy(attr.key.as_ref()).to_string();
        if let Some(alias) = key.strip_prefix("xmlns:") {
            let ns = String::from_utf8_lossy(&attr.value).to_string();
            sink.on_prefix(alias, &ns);
            namespaces.insert(alias.to_string(), ns);
        }
    }
}

/// Extract an attribute in the RDF namespace (e.g. rdf:about), accepting
/// any prefix bound to the RDF namespace.
fn extract_rdf_attr(
    e: &BytesStart,
    attr_local: &str,
    namespaces: &HashMap<String, String>,
) -> Option<String> {
    for attr in e.attributes().flatten() {
        let key = String::from_utf8_lossy(attr.key.as_ref()).to_string();
        let (aprefix, alocal) = match key.find(':') {
            Some(pos) => (&key[..pos], &key[pos + 1..]),
            None => continue,
        };
        if alocal == attr_local && prefix_is_rdf(aprefix, namespaces) {
            return Some(String::from_utf8_lossy(&attr.value).to_string());
        }
    }
    None
}

/// Extract a literally-named attribute (e.g. xml:lang).
fn extract_plain_attr(e: &BytesStart, name: &str) -> Option<String> {
    for attr in e.attributes().flatten() {
        if attr.key.as_ref() == name.as_bytes() {
            return Some(String::from_utf8_lossy(&attr.value).to_string());
        }
    }
    None
}

/// Resolve a prefixed XML element name to a full IRI.
fn resolve_qname(
    prefix: &str,
    local: &str,
    namespaces: &HashMap<String, String>,
) -> Result<String> {
    if prefix.is_empty() {
        return Err(FormatError::RdfXml(format!(
            "unprefixed property element: {local}"
        )));
    }
    match namespaces.get(prefix) {
        Some(ns) => Ok(format!("{ns}{local}")),
        None => Err(FormatError::UndefinedPrefix(prefix.to_string())),
    }
}

// ============================================================================
// Writer
// ============================================================================

/// Render a graph as an RDF/XML document.
///
/// Fails only when a predicate IRI cannot be split into a namespace and an
/// XML-name-safe local part.
pub fn render(graph: &Graph) -> Result<String> {
    let table = NamespaceTable::build(graph)?;

    let mut out = String::from("<?xml version=\"1.0\" encoding=\"utf-8\"?>\n");
    out.push_str("<rdf:RDF");
    for (alias, ns) in &table.declarations {
        out.push_str(&format!("\n    xmlns:{alias}=\"{}\"", escape_attr(ns)));
    }
    out.push_str(">\n");

    let sorted = graph.sorted_triples();
    let mut i = 0;
    while i < sorted.len() {
        let subject = &sorted[i].s;
        let group_end = sorted[i..]
            .iter()
            .position(|t| t.s != *subject)
            .map(|n| i + n)
            .unwrap_or(sorted.len());

        write_description(&mut out, &table, subject, &sorted[i..group_end])?;
        i = group_end;
    }

    out.push_str("</rdf:RDF>\n");
    Ok(out)
}

fn write_description(
    out: &mut String,
    table: &NamespaceTable,
    subject: &Term,
    triples: &[&Triple],
) -> Result<()> {
    match subject {
        Term::Iri(iri) => {
            out.push_str(&format!(
                "  <rdf:Description rdf:about=\"{}\">\n",
                escape_attr(iri)
            ));
        }
        Term::BlankNode(id) => {
            out.push_str(&format!(
                "  <rdf:Description rdf:nodeID=\"{}\">\n",
                escape_attr(id.as_str())
            ));
        }
        Term::Literal { .. } => {
            return Err(FormatError::RdfXml("literal in subject position".into()));
        }
    }

    for triple in triples {
        let pred_iri = triple.p.as_iri().ok_or_else(|| {
            FormatError::RdfXml("non-IRI predicate cannot be serialized".into())
        })?;
        let qname = table.qname(pred_iri)?;

        match &triple.o {
            Term::Iri(iri) => {
                out.push_str(&format!(
                    "    <{qname} rdf:resource=\"{}\"/>\n",
                    escape_attr(iri)
                ));
            }
            Term::BlankNode(id) => {
                out.push_str(&format!(
                    "    <{qname} rdf:nodeID=\"{}\"/>\n",
                    escape_attr(id.as_str())
                ));
            }
            Term::Literal {
                value,
                datatype,
                language,
            } => {
                let text = escape_text(&value.lexical());
                if let Some(lang) = language {
                    out.push_str(&format!(
                        "    <{qname} xml:lang=\"{}\">{text}</{qname}>\n",
                        escape_attr(lang)
                    ));
                } else if datatype.is_xsd_string() {
                    out.push_str(&format!("    <{qname}>{text}</{qname}>\n"));
                } else {
                    out.push_str(&format!(
                        "    <{qname} rdf:datatype=\"{}\">{text}</{qname}>\n",
                        escape_attr(datatype.as_iri())
                    ));
                }
            }
        }
    }

    out.push_str("  </rdf:Description>\n");
    Ok(())
}

/// Namespace declarations for the document plus predicate qname lookup.
struct NamespaceTable {
    /// (alias, namespace) pairs to declare on the root element
    declarations: Vec<(String, String)>,
    /// namespace -> alias
    by_namespace: HashMap<String, String>,
}

impl NamespaceTable {
    fn build(graph: &Graph) -> Result<Self> {
        let mut declarations = Vec::new();
        let mut by_namespace = HashMap::new();

        // The rdf prefix is always declared first
        declarations.push(("rdf".to_string(), rdf::NS.to_string()));
        by_namespace.insert(rdf::NS.to_string(), "rdf".to_string());

        // Graph-declared prefixes, minus any that cannot be XML aliases
        for (alias, ns) in graph.prefixes() {
            if alias != "rdf"
                && is_xml_name(alias)
                && !by_namespace.contains_key(ns.as_str())
            {
                declarations.push((alias.clone(), ns.clone()));
                by_namespace.insert(ns.clone(), alias.clone());
            }
        }

        // Auto-alias any predicate namespace the table does not cover
        let mut auto = 0;
        for triple in graph.iter() {
            let Some(pred_iri) = triple.p.as_iri() else {
                continue;
            };
            let (ns, _) = split_iri(pred_iri)?;
            if !by_namespace.contains_key(ns) {
                auto += 1;
                let alias = format!("ns{auto}");
                declarations.push((alias.clone(), ns.to_string()));
                by_namespace.insert(ns.to_string(), alias);
            }
        }

        Ok(Self {
            declarations,
            by_namespace,
        })
    }

    fn qname(&self, iri: &str) -> Result<String> {
        let (ns, local) = split_iri(iri)?;
        let alias = self.by_namespace.get(ns).ok_or_else(|| {
            FormatError::RdfXml(format!("no namespace declaration for <{iri}>"))
        })?;
        Ok(format!("{alias}:{local}"))
    }
}

/// Split an IRI into (namespace, local) at the last `#` or `/`.
fn split_iri(iri: &str) -> Result<(&str, &str)> {
    let pos = iri
        .rfind(['#', '/'])
        .ok_or_else(|| FormatError::RdfXml(format!("cannot split IRI <{iri}> into a qname")))?;
    let (ns, local) = iri.split_at(pos + 1);
    if !is_xml_name(local) {
        return Err(FormatError::RdfXml(format!(
            "local name of <{iri}> is not a valid XML name"
        )));
    }
    Ok((ns, local))
}

/// Conservative XML NCName check for aliases and local names.
fn is_xml_name(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_' || c == '-' || c == '.')
}

fn escape_text(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
    out
}

fn escape_attr(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use kindred_graph::{GraphCollectorSink, LiteralValue};

    fn parse_to_graph(input: &str) -> Result<Graph> {
        let mut sink = GraphCollectorSink::new();
        parse(input, &mut sink)?;
        Ok(sink.finish())
    }

    #[test]
    fn iri_object() {
        let xml = r#"<rdf:RDF
            xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#"
            xmlns:fam="http://example.org/fam#">
          <rdf:Description rdf:about="http://example.org/a">
            <fam:hasSpouse rdf:resource="http://example.org/b"/>
          </rdf:Description>
        </rdf:RDF>"#;

        let graph = parse_to_graph(xml).unwrap();
        assert_eq!(graph.len(), 1);
        let triple = graph.iter().next().unwrap();
        assert_eq!(triple.p.as_iri(), Some("http://example.org/fam#hasSpouse"));
        assert_eq!(triple.o.as_iri(), Some("http://example.org/b"));
    }

    #[test]
    fn typed_literal_canonicalizes() {
        let xml = r#"<rdf:RDF
            xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#"
            xmlns:foaf="http://xmlns.com/foaf/0.1/">
          <rdf:Description rdf:about="http://example.org/abe">
            <foaf:age rdf:datatype="http://www.w3.org/2001/XMLSchema#integer">78</foaf:age>
          </rdf:Description>
        </rdf:RDF>"#;

        let graph = parse_to_graph(xml).unwrap();
        let triple = graph.iter().next().unwrap();
        let (value, _, _) = triple.o.as_literal().unwrap();
        assert_eq!(value, &LiteralValue::Integer(78));
    }

    #[test]
    fn plain_literal() {
        let xml = r#"<rdf:RDF
            xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#"
            xmlns:foaf="http://xmlns.com/foaf/0.1/">
          <rdf:Description rdf:about="http://example.org/abe">
            <foaf:name>Abraham Simpson</foaf:name>
          </rdf:Description>
        </rdf:RDF>"#;

        let graph = parse_to_graph(xml).unwrap();
        let triple = graph.iter().next().unwrap();
        let (value, datatype, _) = triple.o.as_literal().unwrap();
        assert_eq!(value.as_str(), Some("Abraham Simpson"));
        assert!(datatype.is_xsd_string());
    }

    #[test]
    fn node_id_blank_nodes_link_up() {
        let xml = r#"<rdf:RDF
            xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#"
            xmlns:fam="http://example.org/fam#">
          <rdf:Description rdf:about="http://example.org/herb">
            <fam:hasFather rdf:nodeID="b1"/>
          </rdf:Description>
          <rdf:Description rdf:nodeID="b1">
            <fam:note>identity unknown</fam:note>
          </rdf:Description>
        </rdf:RDF>"#;

        let graph = parse_to_graph(xml).unwrap();
        assert_eq!(graph.len(), 2);

        let father = Term::blank("b1");
        assert_eq!(graph.matching(None, None, Some(&father)).count(), 1);
        assert_eq!(graph.matching(Some(&father), None, None).count(), 1);
    }

    #[test]
    fn xmlns_declarations_populate_prefix_table() {
        let xml = r#"<rdf:RDF
            xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#"
            xmlns:sim="http://example.org/sim#">
          <rdf:Description rdf:about="http://example.org/sim#Maggie">
            <sim:note>baby</sim:note>
          </rdf:Description>
        </rdf:RDF>"#;

        let graph = parse_to_graph(xml).unwrap();
        assert_eq!(graph.prefix("sim"), Some("http://example.org/sim#"));
    }

    #[test]
    fn missing_root_is_an_error() {
        assert!(matches!(
            parse_to_graph("<foo/>"),
            Err(FormatError::RdfXml(_))
        ));
    }

    #[test]
    fn malformed_xml_is_an_error() {
        let xml = r#"<rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#">
          <rdf:Description"#;
        assert!(parse_to_graph(xml).is_err());
    }

    #[test]
    fn render_declares_namespaces_and_round_trips() {
        let mut graph = Graph::new();
        graph.add_prefix("foaf", "http://xmlns.com/foaf/0.1/");
        graph.insert(Triple::new(
            Term::iri("http://example.org/abe"),
            Term::iri("http://xmlns.com/foaf/0.1/age"),
            Term::integer(78),
        ));

        let xml = render(&graph).unwrap();
        assert!(xml.contains("xmlns:foaf=\"http://xmlns.com/foaf/0.1/\""));
        assert!(xml.contains("rdf:datatype"));

        let reparsed = parse_to_graph(&xml).unwrap();
        assert_eq!(reparsed.len(), 1);
        let triple = reparsed.iter().next().unwrap();
        let (value, _, _) = triple.o.as_literal().unwrap();
        assert_eq!(value, &LiteralValue::Integer(78));
    }

    #[test]
    fn render_auto_aliases_undeclared_namespaces() {
        let mut graph = Graph::new();
        graph.insert(Triple::new(
            Term::iri("http://example.org/a"),
            Term::iri("http://other.org/vocab#p"),
            Term::string("v"),
        ));

        let xml = render(&graph).unwrap();
        assert!(xml.contains("xmlns:ns1=\"http://other.org/vocab#\""));
        assert!(xml.contains("<ns1:p>v</ns1:p>"));
    }

    #[test]
    fn text_escaping_round_trips() {
        let mut graph = Graph::new();
        graph.insert(Triple::new(
            Term::iri("http://e/s"),
            Term::iri("http://e/p"),
            Term::string("a < b & c > d"),
        ));

        let xml = render(&graph).unwrap();
        let reparsed = parse_to_graph(&xml).unwrap();
        let triple = reparsed.iter().next().unwrap();
        let (value, _, _) = triple.o.as_literal().unwrap();
        assert_eq!(value.as_str(), Some("a < b & c > d"));
    }
}
