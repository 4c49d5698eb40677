//! Emission of the generated lexer source file: the user's header, a fixed
//! runtime skeleton, the `create_dfa` tables built from the compiled
//! automaton, and the user's footer.

use relex_core::prelude::{Dfa, LexSpec};
use thiserror::Error;

mod skeleton;
mod tables;

#[derive(Debug, Error)]
pub enum CodegenError {
    #[error("action for rule {rule} is not a valid Rust block: {message}")]
    InvalidAction { rule: i32, message: String },
}

/// Renders the complete lexer source for a compiled specification.
pub fn render_lexer(spec: &LexSpec, dfa: &Dfa) -> Result<String, CodegenError> {
    let tables = tables::generate(dfa)?;
    Ok(skeleton::assemble(
        &spec.header,
        &tables.to_string(),
        &spec.footer,
    ))
}
