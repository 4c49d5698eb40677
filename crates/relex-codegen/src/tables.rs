//! Generates the `create_dfa` function and one action function per rule,
//! splicing the user's action snippets in as Rust blocks.

use std::collections::BTreeMap;

use proc_macro2::{Literal, TokenStream};
use quote::{format_ident, quote};
use relex_core::prelude::Dfa;
use syn::Ident;

use crate::CodegenError;

pub(crate) fn generate(dfa: &Dfa) -> Result<TokenStream, CodegenError> {
    // one function per distinct rule action; priorities are unique across
    // non-skip rules, so they double as stable function names
    let mut codes: BTreeMap<i32, &str> = BTreeMap::new();
    let mut has_skip = false;
    for state in dfa.states() {
        for action in &state.actions {
            if action.is_skip() {
                has_skip = true;
            } else {
                codes.insert(action.priority, action.code.as_str());
            }
        }
    }

    let mut action_fns = Vec::with_capacity(codes.len() + 1);
    if has_skip {
        action_fns.push(quote! {
            fn __skip() -> i32 {
                SKIP_LEXEME
            }
        });
    }
    for (&priority, code) in &codes {
        let name = action_ident(priority);
        let block = parse_action(priority, code)?;
        action_fns.push(quote! {
            fn #name() -> i32 #block
        });
    }

    let states = dfa.states().iter().enumerate().map(|(id, state)| {
        let id_lit = Literal::usize_unsuffixed(id);
        let actions = state.actions.iter().map(|action| {
            let name = if action.is_skip() {
                format_ident!("__skip")
            } else {
                action_ident(action.priority)
            };
            quote! { #name as ActionFn }
        });
        let inserts = state.transitions.iter().map(|(&c, &target)| {
            let target = Literal::usize_unsuffixed(target);
            quote! { transitions.insert(#c, #target); }
        });
        let is_final = state.is_final;
        quote! {
            states.push({
                let mut transitions = HashMap::new();
                #(#inserts)*
                State {
                    id: #id_lit,
                    actions: vec![#(#actions),*],
                    transitions,
                    is_final: #is_final,
                }
            });
        }
    });

    let start = Literal::usize_unsuffixed(dfa.start());
    let capacity = Literal::usize_unsuffixed(dfa.len());
    let states = states.collect::<Vec<_>>();
    Ok(quote! {
        #(#action_fns)*

        /// Allocates every state of the recognizer and returns the automaton.
        fn create_dfa() -> Dfa {
            let mut states = Vec::with_capacity(#capacity);
            #(#states)*
            Dfa { start: #start, states }
        }
    })
}

fn action_ident(priority: i32) -> Ident {
    format_ident!("__action_{}", priority as u32)
}

/// Parses an action snippet as a block, wrapping bare expressions in braces.
fn parse_action(priority: i32, code: &str) -> Result<syn::Block, CodegenError> {
    syn::parse_str(code)
        .or_else(|_| syn::parse_str(&format!("{{ {code} }}")))
        .map_err(|e| CodegenError::InvalidAction {
            rule: priority,
            message: e.to_string(),
        })
}
