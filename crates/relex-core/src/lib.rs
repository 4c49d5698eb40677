//! Core of the relex lexer generator: spec parsing, the
//! regex-to-minimized-DFA pipeline, and the runtime matching loop.

pub mod compile;
pub mod dfa;
pub mod error;
pub mod matcher;
pub mod regex;
pub mod spec;

pub mod prelude {
    pub use crate::compile::compile;
    pub use crate::dfa::{Dfa, State, StateId};
    pub use crate::error::{CompileError, SpecError};
    pub use crate::matcher::{Matcher, ScanError, Token};
    pub use crate::regex::Action;
    pub use crate::spec::{parse, LexSpec, Rule};
}
