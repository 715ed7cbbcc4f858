use clap::{Parser, ValueEnum};
use kindred_format::Syntax;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "kindred",
    about = "Build, annotate, and classify a family knowledge graph",
    version
)]
pub struct Cli {
    /// Input graph file (syntax detected from the extension)
    pub input: PathBuf,

    /// Output graph file, overwritten with the annotated graph
    pub output: PathBuf,

    /// Enable verbose output
    #[arg(long, short = 'v', conflicts_with = "quiet")]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(long, short = 'q', conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output (also respects NO_COLOR env var)
    #[arg(long)]
    pub no_color: bool,

    /// Fallback syntax for unrecognized filename extensions
    #[arg(long, value_enum, default_value_t = DefaultSyntax::Turtle)]
    pub default_syntax: DefaultSyntax,
}

/// Syntax names accepted by `--default-syntax`.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum DefaultSyntax {
    Turtle,
    Ntriples,
    Rdfxml,
}

impl From<DefaultSyntax> for Syntax {
    fn from(value: DefaultSyntax) -> Self {
        match value {
            DefaultSyntax::Turtle => Syntax::Turtle,
            DefaultSyntax::Ntriples => Syntax::NTriples,
            DefaultSyntax::Rdfxml => Syntax::RdfXml,
        }
    }
}
