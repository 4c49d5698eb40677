//! Subset construction over position sets: the direct method. Each DFA state
//! is a canonical (sorted, deduplicated) set of leaf positions; a state is
//! accepting when the set holds at least one rule marker.

use std::collections::HashMap;

use super::positions::{PosSet, PositionTable};
use super::{Dfa, State, StateId};
use crate::regex::Action;

pub fn build(table: &PositionTable) -> Dfa {
    let alphabet = table.alphabet();

    let start_key: Vec<usize> = table.root_firstpos().iter().copied().collect();
    let mut ids: HashMap<Vec<usize>, StateId> = HashMap::new();
    let mut sets: Vec<Vec<usize>> = Vec::new();
    let mut states: Vec<State> = Vec::new();

    ids.insert(start_key.clone(), 0);
    states.push(state_for(&start_key, table));
    sets.push(start_key);

    // states are appended as they are discovered, so iterating by index
    // walks the worklist in breadth-first order
    let mut current = 0;
    while current < sets.len() {
        for &c in &alphabet {
            let mut union = PosSet::new();
            for &pos in &sets[current] {
                let row = table.row(pos);
                if row.symbol() == Some(c) {
                    union.extend(row.followpos.iter().copied());
                }
            }
            if union.is_empty() {
                continue;
            }

            let key: Vec<usize> = union.into_iter().collect();
            let target = match ids.get(&key) {
                Some(&id) => id,
                None => {
                    let id = sets.len();
                    ids.insert(key.clone(), id);
                    states.push(state_for(&key, table));
                    sets.push(key);
                    id
                }
            };
            states[current].transitions.insert(c, target);
        }
        current += 1;
    }

    Dfa::from_parts(0, states)
}

fn state_for(set: &[usize], table: &PositionTable) -> State {
    let mut actions: Vec<Action> = set
        .iter()
        .filter_map(|&pos| table.row(pos).action().cloned())
        .collect();
    actions.sort();
    actions.dedup();
    State {
        transitions: Default::default(),
        is_final: !actions.is_empty(),
        actions,
    }
}
