//! Parser for the declarative lexer specification format:
//!
//! ```text
//! %{ header code %}
//! { named-pattern block }
//! %%
//! rules
//! %%
//! footer code
//! ```
//!
//! Named patterns may reference previously defined names as `{NAME}`;
//! substitution is textual and happens in definition order, so cycles cannot
//! occur. Rule order defines priority: the first rule wins ties.

use std::collections::HashMap;

use crate::error::SpecError;
use crate::regex::Action;

/// One rule of the specification: a pattern and the action to run when it
/// matches. A rule without an action (or with the bare action `skip`)
/// carries the skip sentinel.
#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    pub pattern: String,
    pub action: Action,
}

/// A parsed specification file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LexSpec {
    pub header: String,
    pub footer: String,
    pub rules: Vec<Rule>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Section {
    Outside,
    Header,
    Patterns,
    Rules,
    Footer,
}

pub fn parse(source: &str) -> Result<LexSpec, SpecError> {
    let mut section = Section::Outside;
    let mut saw_rules_section = false;
    let mut header = String::new();
    let mut footer = String::new();
    let mut names: HashMap<String, String> = HashMap::new();
    let mut rules: Vec<Rule> = Vec::new();

    for (index, line) in source.lines().enumerate() {
        let lineno = index + 1;
        match section {
            Section::Outside => match line.trim() {
                "%{" => section = Section::Header,
                "{" => section = Section::Patterns,
                "%%" => {
                    section = Section::Rules;
                    saw_rules_section = true;
                }
                "" => {}
                other => {
                    if strip_comment(other).trim().is_empty() {
                        continue;
                    }
                    return Err(SpecError::Syntax {
                        line: lineno,
                        reason: format!("unexpected content outside of a section: `{other}`"),
                    });
                }
            },
            Section::Header => {
                if line.trim() == "%}" {
                    section = Section::Outside;
                } else {
                    header.push_str(line);
                    header.push('\n');
                }
            }
            Section::Patterns => {
                if line.trim() == "}" {
                    section = Section::Outside;
                    continue;
                }
                let content = strip_comment(line).trim();
                if content.is_empty() {
                    continue;
                }
                let (name, pattern) = content.split_once(char::is_whitespace).ok_or_else(|| {
                    SpecError::Syntax {
                        line: lineno,
                        reason: format!("named pattern `{content}` has no definition"),
                    }
                })?;
                let pattern = substitute(pattern.trim(), &names, lineno)?;
                names.insert(name.to_string(), pattern);
            }
            Section::Rules => {
                if line.trim() == "%%" {
                    section = Section::Footer;
                    continue;
                }
                let content = strip_comment(line).trim();
                if content.is_empty() {
                    continue;
                }
                let (pattern, action_code) = split_rule(content);
                if !is_balanced(&pattern) {
                    return Err(SpecError::UnbalancedPattern { pattern });
                }
                let pattern = substitute(&pattern, &names, lineno)?;
                if !is_balanced(&pattern) {
                    return Err(SpecError::UnbalancedPattern { pattern });
                }
                let action = if action_code.is_empty() || action_code == "skip" {
                    Action::skip()
                } else {
                    Action::new(rules.len() as i32, action_code)
                };
                rules.push(Rule { pattern, action });
            }
            Section::Footer => {
                footer.push_str(line);
                footer.push('\n');
            }
        }
    }

    match section {
        Section::Header => {
            return Err(SpecError::Syntax {
                line: source.lines().count(),
                reason: "header block `%{` is never closed".into(),
            })
        }
        Section::Patterns => {
            return Err(SpecError::Syntax {
                line: source.lines().count(),
                reason: "pattern block `{` is never closed".into(),
            })
        }
        Section::Rules => {
            return Err(SpecError::Syntax {
                line: source.lines().count(),
                reason: "rules section is never closed by `%%`".into(),
            })
        }
        Section::Outside | Section::Footer => {}
    }
    if !saw_rules_section {
        return Err(SpecError::Syntax {
            line: source.lines().count(),
            reason: "no `%%` rules section".into(),
        });
    }
    if rules.is_empty() {
        return Err(SpecError::EmptyRules);
    }

    Ok(LexSpec {
        header,
        footer,
        rules,
    })
}

/// Expands `{NAME}` references against previously defined names. Escaped
/// braces pass through untouched.
fn substitute(
    pattern: &str,
    names: &HashMap<String, String>,
    line: usize,
) -> Result<String, SpecError> {
    let mut out = String::with_capacity(pattern.len());
    let mut chars = pattern.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                out.push(c);
                if let Some(escaped) = chars.next() {
                    out.push(escaped);
                }
            }
            '{' => {
                let mut name = String::new();
                loop {
                    match chars.next() {
                        Some('}') => break,
                        Some(c) => name.push(c),
                        None => {
                            return Err(SpecError::Syntax {
                                line,
                                reason: format!("unclosed reference `{{{name}`"),
                            })
                        }
                    }
                }
                let value = names.get(&name).ok_or(SpecError::UnknownName {
                    line,
                    name: name.clone(),
                })?;
                out.push_str(value);
            }
            _ => out.push(c),
        }
    }
    Ok(out)
}

/// Splits a rule line into pattern and action at the first unescaped
/// whitespace outside any bracket pair. A line with no such split point is a
/// pattern with no action.
fn split_rule(line: &str) -> (String, String) {
    let mut depth = 0i32;
    let mut escaped = false;
    for (i, c) in line.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => depth -= 1,
            _ if c.is_whitespace() && depth == 0 => {
                return (line[..i].to_string(), line[i..].trim().to_string());
            }
            _ => {}
        }
    }
    (line.to_string(), String::new())
}

/// Checks that `( )` and `[ ]` pairs nest properly, honoring escapes.
fn is_balanced(pattern: &str) -> bool {
    let mut stack = Vec::new();
    let mut chars = pattern.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                chars.next();
            }
            '(' | '[' => stack.push(c),
            ')' => {
                if stack.pop() != Some('(') {
                    return false;
                }
            }
            ']' => {
                if stack.pop() != Some('[') {
                    return false;
                }
            }
            _ => {}
        }
    }
    stack.is_empty()
}

/// Strips a `//` comment, honoring escapes so `\/\/` stays in a pattern.
fn strip_comment(line: &str) -> &str {
    let bytes = line.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'/' if bytes.get(i + 1) == Some(&b'/') => return &line[..i],
            _ => i += 1,
        }
    }
    line
}
