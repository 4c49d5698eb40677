//! The fixed runtime skeleton of the emitted lexer. The generator fills the
//! three splice points with the user's header, the generated tables, and the
//! user's footer.

const HEADER_MARK: &str = "{{HEADER}}";
const TABLES_MARK: &str = "{{TABLES}}";
const FOOTER_MARK: &str = "{{FOOTER}}";

pub(crate) fn assemble(header: &str, tables: &str, footer: &str) -> String {
    SKELETON
        .replacen(HEADER_MARK, header, 1)
        .replacen(TABLES_MARK, tables, 1)
        .replacen(FOOTER_MARK, footer, 1)
}

const SKELETON: &str = r#"// Generated by relex. Do not edit.

use std::collections::HashMap;
use std::fmt;

// =====================
//   Header
// =====================

{{HEADER}}

// =====================
//   Lexer runtime
// =====================

/// Sentinel for "no lexeme recognized yet".
pub const NO_LEXEME: i32 = -1;
/// Returned by an action to discard the current lexeme.
pub const SKIP_LEXEME: i32 = -2;

/// A rule action; returns the token id to emit, or `SKIP_LEXEME`.
pub type ActionFn = fn() -> i32;

pub struct State {
    pub id: usize,
    /// Sorted by priority: the first entry wins ties.
    pub actions: Vec<ActionFn>,
    pub transitions: HashMap<char, usize>,
    pub is_final: bool,
}

pub struct Dfa {
    pub start: usize,
    pub states: Vec<State>,
}

#[derive(Debug)]
pub struct PatternNotFound {
    pub line: usize,
    pub column: usize,
    pub pattern: String,
}

impl fmt::Display for PatternNotFound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "error line {} column {}\n\tpattern not found. current pattern not recognized by the language: {}",
            self.line, self.column, self.pattern
        )
    }
}

impl std::error::Error for PatternNotFound {}

pub struct Token {
    pub value: String,
    pub token_id: i32,
    pub offset: usize,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{ID: {}, OFFSET: {}, VALUE: {}}}",
            self.token_id, self.offset, self.value
        )
    }
}

pub struct Lexer<'a> {
    input: &'a str,
    cursor: usize,
    dfa: Dfa,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            cursor: 0,
            dfa: create_dfa(),
        }
    }

    /// Scans the next longest token. `Ok(None)` signals end of input.
    pub fn next_token(&mut self) -> Result<Option<Token>, PatternNotFound> {
        let mut state = self.dfa.start;
        let mut matched: Option<(usize, i32)> = None;
        let mut len = 0usize;

        loop {
            // acceptance is recorded but the walk continues: the last
            // acceptance reached is the longest prefix
            if let Some(&action) = self.dfa.states[state].actions.first() {
                let token_id = action();
                if token_id == SKIP_LEXEME {
                    self.cursor += len;
                    len = 0;
                    state = self.dfa.start;
                    matched = None;
                } else {
                    matched = Some((len, token_id));
                }
            }

            let Some(c) = self.input[self.cursor + len..].chars().next() else {
                return match matched {
                    Some((accepted, id)) => Ok(Some(self.emit(accepted, id))),
                    None if len == 0 => Ok(None),
                    None => Err(self.pattern_not_found(len, None)),
                };
            };

            match self.dfa.states[state].transitions.get(&c) {
                Some(&next) => {
                    len += c.len_utf8();
                    state = next;
                }
                None => {
                    return match matched {
                        Some((accepted, id)) => Ok(Some(self.emit(accepted, id))),
                        None => Err(self.pattern_not_found(len, Some(c))),
                    };
                }
            }
        }
    }

    fn emit(&mut self, len: usize, token_id: i32) -> Token {
        let token = Token {
            value: self.input[self.cursor..self.cursor + len].to_string(),
            token_id,
            offset: self.cursor,
        };
        self.cursor += len;
        token
    }

    fn pattern_not_found(&self, len: usize, next: Option<char>) -> PatternNotFound {
        let mut pattern = self.input[self.cursor..self.cursor + len].to_string();
        if let Some(c) = next {
            pattern.push(c);
        }
        let (line, column) = self.line_and_column(self.cursor);
        PatternNotFound {
            line,
            column,
            pattern,
        }
    }

    /// Re-reads the input prefix to turn a byte offset into a 1-based line
    /// and column.
    fn line_and_column(&self, offset: usize) -> (usize, usize) {
        let mut line = 1;
        let mut column = 1;
        for c in self.input[..offset].chars() {
            if c == '\n' {
                line += 1;
                column = 1;
            } else {
                column += 1;
            }
        }
        (line, column)
    }
}

impl Iterator for Lexer<'_> {
    type Item = Result<Token, PatternNotFound>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_token().transpose()
    }
}

// =====================
//   Generated tables
// =====================

{{TABLES}}

// =====================
//   Footer
// =====================

{{FOOTER}}
"#;
