//! Fact builder: person, marriage, and parentage assertions.

use kindred_graph::{Graph, Term, Triple};
use kindred_vocab::{family, foaf, rdf};
use tracing::debug;

/// Asserts family facts into a graph.
///
/// The builder carries the two run-time namespaces: the person namespace
/// (the input graph's `sim` binding) and the family-relations namespace
/// (`fam`). Either may be empty when the input failed to bind the alias;
/// the operations still work, producing identifiers under the empty
/// namespace (the caller chose that defaulting).
///
/// All operations are pure graph mutations. The store's set semantics
/// make them idempotent, so re-adding a person is harmless.
pub struct FamilyBuilder<'a> {
    graph: &'a mut Graph,
    person_ns: String,
    family_ns: String,
}

impl<'a> FamilyBuilder<'a> {
    /// Create a builder over a graph with resolved namespaces.
    pub fn new(
        graph: &'a mut Graph,
        person_ns: impl Into<String>,
        family_ns: impl Into<String>,
    ) -> Self {
        Self {
            graph,
            person_ns: person_ns.into(),
            family_ns: family_ns.into(),
        }
    }

    /// The underlying graph.
    pub fn graph(&mut self) -> &mut Graph {
        self.graph
    }

    /// Derive the named node for a person from a full name.
    ///
    /// The local name is the first whitespace-delimited token, so
    /// "Maggie Simpson" lives at `<person_ns>Maggie`.
    pub fn person_node(&self, full_name: &str) -> Term {
        let local = full_name.split_whitespace().next().unwrap_or(full_name);
        Term::iri(format!("{}{}", self.person_ns, local))
    }

    /// Assert a person: a `foaf:Person` type triple and a `foaf:name`
    /// triple holding the full name as a plain string.
    pub fn add_person(&mut self, full_name: &str) -> Term {
        let person = self.person_node(full_name);

        self.graph.insert(Triple::new(
            person.clone(),
            Term::iri(rdf::TYPE),
            Term::iri(foaf::PERSON),
        ));
        self.graph.insert(Triple::new(
            person.clone(),
            Term::iri(foaf::NAME),
            Term::string(full_name),
        ));

        debug!(name = full_name, "added person");
        person
    }

    /// Assert a person with a `foaf:age` integer attribute.
    pub fn add_person_aged(&mut self, full_name: &str, age: i64) -> Term {
        let person = self.add_person(full_name);
        self.graph.insert(Triple::new(
            person.clone(),
            Term::iri(foaf::AGE),
            Term::integer(age),
        ));
        person
    }

    /// Assert a symmetric pair of `hasSpouse` triples.
    pub fn add_marriage(&mut self, a: &Term, b: &Term) {
        let spouse = self.family_iri(family::HAS_SPOUSE);
        self.graph
            .insert(Triple::new(a.clone(), spouse.clone(), b.clone()));
        self.graph.insert(Triple::new(b.clone(), spouse, a.clone()));
    }

    /// Assert a single `(child, hasFather, father)` triple.
    ///
    /// `father` may be an anonymous node when the father's identity is
    /// unknown.
    pub fn add_father(&mut self, father: &Term, child: &Term) {
        let has_father = self.family_iri(family::HAS_FATHER);
        self.graph
            .insert(Triple::new(child.clone(), has_father, father.clone()));
    }

    fn family_iri(&self, local: &str) -> Term {
        Term::iri(format!("{}{}", self.family_ns, local))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SIM: &str = "http://example.org/sim#";
    const FAM: &str = "http://example.org/fam#";

    #[test]
    fn person_uses_first_name_as_local() {
        let mut graph = Graph::new();
        let mut builder = FamilyBuilder::new(&mut graph, SIM, FAM);

        let maggie = builder.add_person("Maggie Simpson");
        assert_eq!(maggie.as_iri(), Some("http://example.org/sim#Maggie"));

        // Type and name assertions
        assert_eq!(graph.len(), 2);
        let name_pred = Term::iri(foaf::NAME);
        let name = graph
            .matching(Some(&maggie), Some(&name_pred), None)
            .next()
            .unwrap();
        let (value, _, _) = name.o.as_literal().unwrap();
        assert_eq!(value.as_str(), Some("Maggie Simpson"));
    }

    #[test]
    fn aged_person_gets_age_triple() {
        let mut graph = Graph::new();
        let mut builder = FamilyBuilder::new(&mut graph, SIM, FAM);

        let abe = builder.add_person_aged("Abraham Simpson", 78);

        let age_pred = Term::iri(foaf::AGE);
        let age = graph
            .matching(Some(&abe), Some(&age_pred), None)
            .next()
            .unwrap();
        assert_eq!(age.o, Term::integer(78));
    }

    #[test]
    fn re_adding_a_person_is_idempotent() {
        let mut graph = Graph::new();
        let mut builder = FamilyBuilder::new(&mut graph, SIM, FAM);

        let first = builder.add_person_aged("Mona Simpson", 70);
        let second = builder.add_person("Mona Simpson");

        assert_eq!(first, second);
        assert_eq!(graph.len(), 3);
    }

    #[test]
    fn marriage_is_symmetric() {
        let mut graph = Graph::new();
        let mut builder = FamilyBuilder::new(&mut graph, SIM, FAM);

        let abe = builder.add_person_aged("Abraham Simpson", 78);
        let mona = builder.add_person_aged("Mona Simpson", 70);
        builder.add_marriage(&abe, &mona);

        let spouse = Term::iri(format!("{FAM}hasSpouse"));
        let abes: Vec<_> = graph.matching(Some(&abe), Some(&spouse), None).collect();
        assert_eq!(abes.len(), 1);
        assert_eq!(abes[0].o, mona);

        let monas: Vec<_> = graph.matching(Some(&mona), Some(&spouse), None).collect();
        assert_eq!(monas.len(), 1);
        assert_eq!(monas[0].o, abe);
    }

    #[test]
    fn anonymous_father_links_child_once() {
        let mut graph = Graph::new();
        let before_subjects = graph.subjects().len();

        let mut builder = FamilyBuilder::new(&mut graph, SIM, FAM);
        let herb = builder.add_person("Herb Simpson");
        let father = builder.graph().fresh_blank();
        builder.add_father(&father, &herb);

        let has_father = Term::iri(format!("{FAM}hasFather"));
        let links: Vec<_> = graph.matching(None, Some(&has_father), None).collect();
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].s, herb);
        assert!(links[0].o.is_blank());

        // The father is a new node, distinct from everything before it
        assert!(graph.subjects().len() > before_subjects);
        let again = graph.fresh_blank();
        assert_ne!(again, father);
    }

    #[test]
    fn empty_namespace_still_builds() {
        let mut graph = Graph::new();
        let mut builder = FamilyBuilder::new(&mut graph, "", "");

        let maggie = builder.add_person("Maggie Simpson");
        assert_eq!(maggie.as_iri(), Some("Maggie"));
        assert_eq!(graph.len(), 2);
    }
}
