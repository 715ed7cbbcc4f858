//! Turtle (TTL) codec.
//!
//! The lexer tokenizes with winnow, the parser walks the token stream and
//! emits to a `GraphSink`, and the writer renders a graph back to a
//! compact, prefix-aware document.

pub mod chars;
pub mod lexer;
pub mod parser;
pub mod token;
pub mod writer;

pub use lexer::tokenize;
pub use parser::parse;
pub use writer::render;
