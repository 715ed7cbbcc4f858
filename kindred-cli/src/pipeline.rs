//! The one-pass pipeline: parse, seed, classify, render.

use crate::cli::Cli;
use crate::error::CliResult;
use kindred_family::{apply_records, classify, simpson_records, FamilyBuilder};
use kindred_format::{read_graph, write_graph, Syntax};
use kindred_vocab::aliases;
use tracing::{info, warn};

/// Execute the full pipeline for one invocation.
pub fn run(cli: &Cli) -> CliResult<()> {
    let default_syntax: Syntax = cli.default_syntax.into();

    let mut graph = read_graph(&cli.input, default_syntax)?;
    info!(triples = graph.len(), "loaded input graph");

    // Namespaces come from the input graph's prefix table. A missing
    // alias degrades to the empty namespace rather than failing, so a
    // prefix-less input still flows through the whole pipeline.
    let person_ns = resolve_alias(&graph, aliases::SIM);
    let family_ns = resolve_alias(&graph, aliases::FAM);

    let mut builder = FamilyBuilder::new(&mut graph, &person_ns, &family_ns);
    apply_records(&mut builder, &simpson_records());

    let derived = classify(&mut graph, &family_ns)?;
    info!(derived, total = graph.len(), "derived age classes");

    write_graph(&cli.output, &graph, default_syntax)?;
    Ok(())
}

fn resolve_alias(graph: &kindred_graph::Graph, alias: &str) -> String {
    match graph.prefix(alias) {
        Some(ns) => ns.to_string(),
        None => {
            warn!(alias, "input graph does not bind prefix; using empty namespace");
            String::new()
        }
    }
}
