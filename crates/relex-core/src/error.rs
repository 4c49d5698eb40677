use thiserror::Error;

/// Errors produced while parsing a lexer specification file.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SpecError {
    #[error("line {line}: {reason}")]
    Syntax { line: usize, reason: String },

    #[error("rule pattern `{pattern}` is unbalanced")]
    UnbalancedPattern { pattern: String },

    #[error("line {line}: reference to undefined pattern {{{name}}}")]
    UnknownName { line: usize, name: String },

    #[error("specification declares no rules")]
    EmptyRules,
}

/// Errors produced while compiling rules down to a DFA.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CompileError {
    #[error(transparent)]
    Spec(#[from] SpecError),

    #[error("unbalanced parentheses in pattern `{pattern}`")]
    UnbalancedParens { pattern: String },

    #[error("pattern `{pattern}` is not a well-formed expression")]
    MalformedPattern { pattern: String },
}
