//! Seed data as records.
//!
//! The facts the tool asserts are data, not code: an ordered sequence of
//! records the builder replays. People are referenced by first name,
//! which is also the local part of their identifier, so a reference does
//! not require the person to have been declared first.

use crate::FamilyBuilder;
use kindred_graph::Term;
use tracing::debug;

/// One seed fact for the family graph.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FamilyRecord {
    /// A person with a full name and an optional age
    Person {
        name: String,
        age: Option<i64>,
    },
    /// A symmetric marriage between two people (by first name)
    Marriage { a: String, b: String },
    /// A child (by first name) whose father is unknown
    UnknownFather { child: String },
}

impl FamilyRecord {
    /// A person without a known age
    pub fn person(name: &str) -> Self {
        FamilyRecord::Person {
            name: name.to_string(),
            age: None,
        }
    }

    /// A person with a known age
    pub fn person_aged(name: &str, age: i64) -> Self {
        FamilyRecord::Person {
            name: name.to_string(),
            age: Some(age),
        }
    }

    /// A marriage between two people referenced by first name
    pub fn marriage(a: &str, b: &str) -> Self {
        FamilyRecord::Marriage {
            a: a.to_string(),
            b: b.to_string(),
        }
    }

    /// An unknown father for a child referenced by first name
    pub fn unknown_father(child: &str) -> Self {
        FamilyRecord::UnknownFather {
            child: child.to_string(),
        }
    }
}

/// Replay a sequence of records through the builder, in order.
pub fn apply_records(builder: &mut FamilyBuilder<'_>, records: &[FamilyRecord]) {
    for record in records {
        match record {
            FamilyRecord::Person { name, age } => {
                match age {
                    Some(age) => builder.add_person_aged(name, *age),
                    None => builder.add_person(name),
                };
            }
            FamilyRecord::Marriage { a, b } => {
                let a = builder.person_node(a);
                let b = builder.person_node(b);
                builder.add_marriage(&a, &b);
            }
            FamilyRecord::UnknownFather { child } => {
                let child: Term = builder.person_node(child);
                let father = builder.graph().fresh_blank();
                builder.add_father(&father, &child);
            }
        }
    }
    debug!(records = records.len(), "applied seed records");
}

/// The canonical Simpson seed data.
pub fn simpson_records() -> Vec<FamilyRecord> {
    vec![
        FamilyRecord::person_aged("Maggie Simpson", 1),
        FamilyRecord::person_aged("Mona Simpson", 70),
        FamilyRecord::person_aged("Abraham Simpson", 78),
        FamilyRecord::person("Herb Simpson"),
        FamilyRecord::marriage("Abraham", "Mona"),
        FamilyRecord::unknown_father("Herb"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use kindred_graph::Graph;
    use kindred_vocab::foaf;

    const SIM: &str = "http://example.org/sim#";
    const FAM: &str = "http://example.org/fam#";

    #[test]
    fn simpson_seed_produces_expected_triples() {
        let mut graph = Graph::new();
        let mut builder = FamilyBuilder::new(&mut graph, SIM, FAM);
        apply_records(&mut builder, &simpson_records());

        // 4 people x (type + name) + 3 ages + 2 spouse + 1 father
        assert_eq!(graph.len(), 14);

        let abe = Term::iri(format!("{SIM}Abraham"));
        let mona = Term::iri(format!("{SIM}Mona"));
        let spouse = Term::iri(format!("{FAM}hasSpouse"));
        assert_eq!(graph.matching(Some(&abe), Some(&spouse), Some(&mona)).count(), 1);
        assert_eq!(graph.matching(Some(&mona), Some(&spouse), Some(&abe)).count(), 1);

        let herb = Term::iri(format!("{SIM}Herb"));
        let age = Term::iri(foaf::AGE);
        assert_eq!(graph.matching(Some(&herb), Some(&age), None).count(), 0);
    }

    #[test]
    fn replaying_records_changes_nothing() {
        let mut graph = Graph::new();
        let records = simpson_records();

        let mut builder = FamilyBuilder::new(&mut graph, SIM, FAM);
        apply_records(&mut builder, &records);
        let first_len = graph.len();

        // A second pass adds a second anonymous father but no other facts
        let mut builder = FamilyBuilder::new(&mut graph, SIM, FAM);
        apply_records(&mut builder, &records);
        assert_eq!(graph.len(), first_len + 1);
    }

    #[test]
    fn marriage_by_reference_needs_no_declaration() {
        let mut graph = Graph::new();
        let mut builder = FamilyBuilder::new(&mut graph, SIM, FAM);
        apply_records(&mut builder, &[FamilyRecord::marriage("Homer", "Marge")]);

        assert_eq!(graph.len(), 2);
        let homer = Term::iri(format!("{SIM}Homer"));
        assert_eq!(graph.matching(Some(&homer), None, None).count(), 1);
    }
}
