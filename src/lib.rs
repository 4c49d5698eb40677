//! relex is a lexer generator: it reads a declarative specification of
//! prioritized token rules, compiles them into a minimized DFA with the
//! direct (position-based) construction, and emits a self-contained Rust
//! lexer embedding the transition tables and the user's action snippets.
//!
//! The compile pipeline and the runtime matcher live in `relex-core`; source
//! emission lives in `relex-codegen`. This crate re-exports both and hosts
//! the command-line generator.

pub use relex_codegen::{render_lexer, CodegenError};
pub use relex_core::{compile, dfa, error, matcher, prelude, regex, spec};
