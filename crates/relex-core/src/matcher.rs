//! The runtime matching loop: longest match wins, ties go to the rule with
//! the lowest priority value, and a winning skip sentinel advances the
//! cursor without emitting. The generated lexer embeds the same loop; this
//! in-memory version runs directly against a compiled [`Dfa`].

use thiserror::Error;

use crate::dfa::Dfa;
use crate::regex::Action;

/// Raised when no DFA continuation exists and no prior acceptance was
/// recorded. Positions are 1-based and name the start of the failed lexeme.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("error line {line} column {column}\n\tpattern not found. current pattern not recognized by the language: {lexeme}")]
pub struct ScanError {
    pub line: usize,
    pub column: usize,
    pub lexeme: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub lexeme: String,
    pub action: Action,
    /// Byte offset of the lexeme within the input.
    pub offset: usize,
}

/// A matcher owns a cursor over one input; the DFA itself is shared
/// read-only and several matchers may run against it independently.
pub struct Matcher<'d, 'i> {
    dfa: &'d Dfa,
    input: &'i str,
    cursor: usize,
}

impl<'d, 'i> Matcher<'d, 'i> {
    pub fn new(dfa: &'d Dfa, input: &'i str) -> Self {
        Self {
            dfa,
            input,
            cursor: 0,
        }
    }

    /// Byte offset the next token will start at.
    pub fn offset(&self) -> usize {
        self.cursor
    }

    /// Scans the next token. `Ok(None)` signals clean end of input.
    pub fn next_token(&mut self) -> Result<Option<Token>, ScanError> {
        let mut state = self.dfa.start();
        let mut matched: Option<(usize, Action)> = None;
        let mut len = 0usize;

        loop {
            // acceptance is recorded but the walk continues: the last
            // acceptance reached is the longest prefix
            if let Some(first) = self.dfa.state(state).actions.first() {
                if first.is_skip() {
                    self.cursor += len;
                    len = 0;
                    state = self.dfa.start();
                    matched = None;
                } else {
                    matched = Some((len, first.clone()));
                }
            }

            let Some(c) = self.input[self.cursor + len..].chars().next() else {
                return match matched {
                    Some((accepted, action)) => Ok(Some(self.emit(accepted, action))),
                    None if len == 0 => Ok(None),
                    None => Err(self.unrecognized(len, None)),
                };
            };

            match self.dfa.transition(state, c) {
                Some(next) => {
                    len += c.len_utf8();
                    state = next;
                }
                None => {
                    return match matched {
                        // rewind to the accepted length; the cursor advances
                        // by exactly that many bytes
                        Some((accepted, action)) => Ok(Some(self.emit(accepted, action))),
                        None => Err(self.unrecognized(len, Some(c))),
                    };
                }
            }
        }
    }

    fn emit(&mut self, len: usize, action: Action) -> Token {
        let token = Token {
            lexeme: self.input[self.cursor..self.cursor + len].to_string(),
            action,
            offset: self.cursor,
        };
        self.cursor += len;
        token
    }

    fn unrecognized(&self, len: usize, next: Option<char>) -> ScanError {
        let mut lexeme = self.input[self.cursor..self.cursor + len].to_string();
        if let Some(c) = next {
            lexeme.push(c);
        }
        let (line, column) = self.line_and_column(self.cursor);
        ScanError {
            line,
            column,
            lexeme,
        }
    }

    /// Re-reads the input prefix to resolve a byte offset into a 1-based
    /// line and column.
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

impl Iterator for Matcher<'_, '_> {
    type Item = Result<Token, ScanError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_token().transpose()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::compile::compile;
    use crate::spec::Rule;

    fn rules(defs: &[(&str, &str)]) -> Vec<Rule> {
        defs.iter()
            .enumerate()
            .map(|(i, (pattern, code))| Rule {
                pattern: (*pattern).into(),
                action: if *code == "skip" {
                    Action::skip()
                } else {
                    Action::new(i as i32, *code)
                },
            })
            .collect()
    }

    fn lex(defs: &[(&str, &str)], input: &str) -> Result<Vec<(String, String)>, ScanError> {
        let dfa = compile(&rules(defs)).unwrap();
        Matcher::new(&dfa, input)
            .map(|r| r.map(|t| (t.action.code.clone(), t.lexeme)))
            .collect()
    }

    fn owned(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(a, b)| (a.to_string(), b.to_string()))
            .collect()
    }

    #[test]
    fn identifiers_and_keywords() {
        // longest match defeats the keyword on `ifx`; priority would pick IF
        // if the lengths were equal
        let defs = [("if", "IF"), ("[a-z][a-z0-9]*", "ID"), (" ", "WS")];
        assert_eq!(
            lex(&defs, "ifx if").unwrap(),
            owned(&[("ID", "ifx"), ("WS", " "), ("IF", "if")])
        );
    }

    #[test]
    fn numbers_then_identifiers() {
        let defs = [("[0-9]+", "NUMBER"), ("[a-z]+", "ID")];
        assert_eq!(
            lex(&defs, "12abc").unwrap(),
            owned(&[("NUMBER", "12"), ("ID", "abc")])
        );
    }

    #[test]
    fn skip_swallows_whitespace() {
        let defs = [("[ \t\n]+", "skip"), ("[a-z]+", "ID")];
        assert_eq!(
            lex(&defs, "  ab  cd").unwrap(),
            owned(&[("ID", "ab"), ("ID", "cd")])
        );
    }

    #[test]
    fn no_match_reports_position() {
        let defs = [("[a-z]+", "ID")];
        assert_eq!(
            lex(&defs, "1").unwrap_err(),
            ScanError {
                line: 1,
                column: 1,
                lexeme: "1".into()
            }
        );
    }

    #[test]
    fn priority_breaks_ties() {
        let defs = [("ab", "A"), ("ab", "B")];
        assert_eq!(lex(&defs, "ab").unwrap(), owned(&[("A", "ab")]));
    }

    #[test]
    fn kleene_closure_matches_greedily() {
        let defs = [("a*b", "T")];
        assert_eq!(lex(&defs, "aaab").unwrap(), owned(&[("T", "aaab")]));
    }

    #[test]
    fn longest_match_wins_over_shorter_rule() {
        let defs = [("a", "X"), ("aa", "Y")];
        assert_eq!(lex(&defs, "aa").unwrap(), owned(&[("Y", "aa")]));
    }

    #[test]
    fn rewind_returns_to_the_last_acceptance() {
        // `ab` dead-ends on `ac`, so only `a` is consumed
        let defs = [("a", "A"), ("ab", "AB"), ("c", "C")];
        assert_eq!(
            lex(&defs, "ac").unwrap(),
            owned(&[("A", "a"), ("C", "c")])
        );
    }

    #[test]
    fn error_position_counts_lines() {
        let defs = [("[a-z]+", "ID"), ("\n", "skip")];
        let err = lex(&defs, "ab\ncd!").unwrap_err();
        assert_eq!((err.line, err.column), (2, 3));
        assert_eq!(err.lexeme, "!");
    }

    #[test]
    fn offsets_advance_by_lexeme_length() {
        let defs = [("[a-z]+", "ID"), (" ", "skip")];
        let dfa = compile(&rules(&defs)).unwrap();
        let mut matcher = Matcher::new(&dfa, "ab cde");
        let first = matcher.next_token().unwrap().unwrap();
        assert_eq!((first.offset, first.lexeme.as_str()), (0, "ab"));
        let second = matcher.next_token().unwrap().unwrap();
        assert_eq!((second.offset, second.lexeme.as_str()), (3, "cde"));
        assert_eq!(matcher.next_token(), Ok(None));
    }

    #[test]
    fn error_message_format() {
        let err = ScanError {
            line: 3,
            column: 7,
            lexeme: "@".into(),
        };
        assert_eq!(
            err.to_string(),
            "error line 3 column 7\n\tpattern not found. current pattern not recognized by the language: @"
        );
    }

    #[test]
    fn trailing_skip_ends_cleanly() {
        let defs = [("[a-z]+", "ID"), (" ", "skip")];
        assert_eq!(lex(&defs, "ab  ").unwrap(), owned(&[("ID", "ab")]));
    }
}
