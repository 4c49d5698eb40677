use proptest::prelude::*;

use relex_core::prelude::*;

fn rule(pattern: &str, priority: i32, code: &str) -> Rule {
    Rule {
        pattern: pattern.into(),
        action: Action::new(priority, code),
    }
}

fn skip_rule(pattern: &str) -> Rule {
    Rule {
        pattern: pattern.into(),
        action: Action::skip(),
    }
}

/// Walks the automaton over the whole input and reports acceptance.
fn accepts(dfa: &Dfa, input: &str) -> bool {
    let mut state = dfa.start();
    for c in input.chars() {
        match dfa.transition(state, c) {
            Some(next) => state = next,
            None => return false,
        }
    }
    dfa.state(state).is_final
}

proptest! {
    #[test]
    fn recognizes_exactly_the_suffix_language(input in "[ab]{0,12}") {
        // (a|b)*abb accepts a string over {a, b} iff it ends in abb
        let dfa = compile(&[rule("(a|b)*abb", 0, "T")]).unwrap();
        prop_assert_eq!(accepts(&dfa, &input), input.ends_with("abb"));
    }

    #[test]
    fn tokens_cover_the_input_without_gaps(input in "[a-z0-9 ]{0,24}") {
        let dfa = compile(&[
            rule("[0-9][0-9]*", 0, "NUMBER"),
            rule("[a-z][a-z]*", 1, "WORD"),
            skip_rule(" "),
        ])
        .unwrap();

        let tokens: Vec<Token> = Matcher::new(&dfa, &input)
            .collect::<Result<_, _>>()
            .unwrap();

        // concatenated lexemes rebuild the input minus the skipped spaces
        let rebuilt: String = tokens.iter().map(|t| t.lexeme.as_str()).collect();
        prop_assert_eq!(rebuilt, input.replace(' ', ""));

        for token in &tokens {
            prop_assert!(!token.lexeme.is_empty());
            // every lexeme sits at its recorded offset
            prop_assert_eq!(&input[token.offset..token.offset + token.lexeme.len()], token.lexeme.as_str());
        }
    }

    #[test]
    fn longest_match_never_splits_a_run(input in "[0-9]{1,16}") {
        // a maximal digit run always comes back as one token
        let dfa = compile(&[rule("[0-9][0-9]*", 0, "NUMBER")]).unwrap();
        let tokens: Vec<Token> = Matcher::new(&dfa, &input)
            .collect::<Result<_, _>>()
            .unwrap();
        prop_assert_eq!(tokens.len(), 1);
        prop_assert_eq!(tokens[0].lexeme.as_str(), input.as_str());
    }
}
