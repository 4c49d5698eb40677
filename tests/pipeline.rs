use relex::prelude::*;
use relex::render_lexer;

const SPEC: &str = "\
%{
pub const IF: i32 = 1;
pub const ID: i32 = 2;
pub const NUMBER: i32 = 3;
%}
{
DIGIT    [0-9]
LETTER   [a-z]
}
%%
if                           { IF }
{LETTER}({LETTER}|{DIGIT})*  { ID }
{DIGIT}{DIGIT}*              { NUMBER }
[ \t]+                       skip
%%
pub fn footer_marker() {}
";

fn tokens_of(source: &str, input: &str) -> Vec<(String, String)> {
    let spec = parse(source).unwrap();
    let dfa = compile(&spec.rules).unwrap();
    Matcher::new(&dfa, input)
        .map(|r| {
            let t = r.unwrap();
            (t.action.code, t.lexeme)
        })
        .collect()
}

#[test]
fn spec_file_drives_the_full_pipeline() {
    let tokens = tokens_of(SPEC, "if ifx 42 x9");
    let expected: Vec<(String, String)> = [
        ("{ IF }", "if"),
        ("{ ID }", "ifx"),
        ("{ NUMBER }", "42"),
        ("{ ID }", "x9"),
    ]
    .iter()
    .map(|(a, b)| (a.to_string(), b.to_string()))
    .collect();
    assert_eq!(tokens, expected);
}

#[test]
fn unrecognized_input_reports_line_and_column() {
    let spec = parse(SPEC).unwrap();
    let dfa = compile(&spec.rules).unwrap();
    let mut matcher = Matcher::new(&dfa, "if !");
    assert!(matcher.next_token().unwrap().is_some());
    let err = matcher.next_token().unwrap_err();
    assert_eq!((err.line, err.column, err.lexeme.as_str()), (1, 4, "!"));
}

#[test]
fn rule_order_breaks_ties_from_the_file() {
    // `if` appears before the identifier rule, so the keyword wins on "if"
    let tokens = tokens_of(SPEC, "if");
    assert_eq!(tokens[0].0, "{ IF }");
}

#[test]
fn generated_source_embeds_every_section() {
    let spec = parse(SPEC).unwrap();
    let dfa = compile(&spec.rules).unwrap();
    let source = render_lexer(&spec, &dfa).unwrap();

    assert!(source.contains("pub const IF: i32 = 1;"));
    assert!(source.contains("pub fn footer_marker()"));
    assert!(source.contains("fn create_dfa"));
    assert!(source.contains("pub fn next_token"));
    // every state of the automaton is allocated in the generated tables
    assert_eq!(source.matches("states . push").count() + source.matches("states.push").count(), dfa.len());
}

#[test]
fn generation_is_idempotent() {
    let spec = parse(SPEC).unwrap();
    let dfa = compile(&spec.rules).unwrap();
    let first = render_lexer(&spec, &dfa).unwrap();

    let spec_again = parse(SPEC).unwrap();
    let dfa_again = compile(&spec_again.rules).unwrap();
    let second = render_lexer(&spec_again, &dfa_again).unwrap();

    assert_eq!(first, second);
}

#[test]
fn demo_specification_compiles_and_tokenizes() {
    let source = include_str!("../demos/tokens.lex");
    let tokens = tokens_of(source, "x1 + 42 * y");
    let kinds: Vec<&str> = tokens.iter().map(|(code, _)| code.as_str()).collect();
    assert_eq!(
        kinds,
        vec!["{ IDENT }", "{ PLUS }", "{ NUMBER }", "{ STAR }", "{ IDENT }"]
    );
    let lexemes: Vec<&str> = tokens.iter().map(|(_, lexeme)| lexeme.as_str()).collect();
    assert_eq!(lexemes, vec!["x1", "+", "42", "*", "y"]);
}

#[test]
fn compiled_dfa_is_deterministic_and_alive() {
    let spec = parse(SPEC).unwrap();
    let dfa = compile(&spec.rules).unwrap();
    for (id, state) in dfa.states().iter().enumerate() {
        // accepting states carry their actions sorted by priority
        let priorities: Vec<i32> = state.actions.iter().map(|a| a.priority).collect();
        let mut sorted = priorities.clone();
        sorted.sort();
        assert_eq!(priorities, sorted);
        assert_eq!(state.is_final, !state.actions.is_empty());
        // no absorbing non-accepting states survive the dead-state sweep
        if !state.is_final && !state.transitions.is_empty() {
            assert!(state.transitions.values().any(|&t| t != id));
        }
    }
}
