//! DFA minimization by partition refinement. The initial partition puts all
//! non-accepting states in one class and groups accepting states by action
//! signature: states producing different tokens can never be equivalent.

use std::collections::HashMap;

use super::{Dfa, State, StateId};

pub fn minimize(dfa: &Dfa) -> Dfa {
    if dfa.len() <= 1 {
        return dfa.clone();
    }

    let alphabet: Vec<char> = dfa.alphabet().into_iter().collect();

    // initial partition: classes numbered by first-encountered signature;
    // the empty signature is the non-accepting class
    let mut signatures: HashMap<Vec<(i32, &str)>, usize> = HashMap::new();
    let mut class_of: Vec<usize> = Vec::with_capacity(dfa.len());
    for state in dfa.states() {
        let signature: Vec<(i32, &str)> = state
            .actions
            .iter()
            .map(|a| (a.priority, a.code.as_str()))
            .collect();
        let next = signatures.len();
        class_of.push(*signatures.entry(signature).or_insert(next));
    }
    let mut class_count = signatures.len();

    // refine until no class splits: states stay together only if their
    // successors agree class-wise on every symbol (absent transitions must
    // agree too)
    loop {
        let mut table: HashMap<(usize, Vec<Option<usize>>), usize> = HashMap::new();
        let mut next_of: Vec<usize> = Vec::with_capacity(dfa.len());
        for (id, state) in dfa.states().iter().enumerate() {
            let successors: Vec<Option<usize>> = alphabet
                .iter()
                .map(|c| state.transitions.get(c).map(|&t| class_of[t]))
                .collect();
            let next = table.len();
            next_of.push(*table.entry((class_of[id], successors)).or_insert(next));
        }
        if table.len() == class_count {
            break;
        }
        class_of = next_of;
        class_count = table.len();
    }

    // one representative per class; classes are numbered by first occurrence
    // in state order, so the start state's class keeps a stable position
    let mut representative: Vec<Option<StateId>> = vec![None; class_count];
    for (id, &class) in class_of.iter().enumerate() {
        if representative[class].is_none() {
            representative[class] = Some(id);
        }
    }

    let states: Vec<State> = representative
        .into_iter()
        .map(|rep| {
            let old = dfa.state(rep.expect("every class has a member"));
            State {
                transitions: old
                    .transitions
                    .iter()
                    .map(|(&c, &target)| (c, class_of[target]))
                    .collect(),
                actions: old.actions.clone(),
                is_final: old.is_final,
            }
        })
        .collect();

    Dfa::from_parts(class_of[dfa.start()], states)
}
