use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::regex::Action;

pub mod build;
pub mod minimize;
pub mod positions;

pub type StateId = usize;

/// One DFA state. Transitions are id-to-id over the arena in [`Dfa`];
/// `actions` is kept sorted by ascending priority, and a state is accepting
/// exactly when the list is non-empty.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct State {
    pub transitions: BTreeMap<char, StateId>,
    pub actions: Vec<Action>,
    pub is_final: bool,
}

/// Deterministic automaton over an arena of states. Immutable once built,
/// apart from the dead-state sweep.
#[derive(Debug, Clone, PartialEq)]
pub struct Dfa {
    start: StateId,
    states: Vec<State>,
}

impl Dfa {
    pub(crate) fn from_parts(start: StateId, states: Vec<State>) -> Self {
        Self { start, states }
    }

    pub fn start(&self) -> StateId {
        self.start
    }

    pub fn states(&self) -> &[State] {
        &self.states
    }

    pub fn state(&self, id: StateId) -> &State {
        &self.states[id]
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn transition(&self, from: StateId, c: char) -> Option<StateId> {
        self.states[from].transitions.get(&c).copied()
    }

    /// Every character some state transitions on.
    pub fn alphabet(&self) -> BTreeSet<char> {
        self.states
            .iter()
            .flat_map(|s| s.transitions.keys().copied())
            .collect()
    }

    /// Removes absorbing non-accepting states: states whose every outgoing
    /// transition loops back to themselves. Transitions into removed states
    /// are deleted, so the automaton may become partial; a missing transition
    /// means the match cannot continue. Returns how many states were removed.
    pub fn remove_dead_states(&mut self) -> usize {
        let dead: Vec<bool> = self
            .states
            .iter()
            .enumerate()
            .map(|(id, s)| {
                id != self.start && !s.is_final && s.transitions.values().all(|&t| t == id)
            })
            .collect();

        let removed = dead.iter().filter(|&&d| d).count();
        if removed == 0 {
            return 0;
        }

        let mut remap = vec![usize::MAX; self.states.len()];
        let mut kept = Vec::with_capacity(self.states.len() - removed);
        for (id, state) in std::mem::take(&mut self.states).into_iter().enumerate() {
            if dead[id] {
                continue;
            }
            remap[id] = kept.len();
            kept.push(state);
        }
        for state in &mut kept {
            state.transitions.retain(|_, target| !dead[*target]);
            for target in state.transitions.values_mut() {
                *target = remap[*target];
            }
        }

        self.start = remap[self.start];
        self.states = kept;
        removed
    }
}

impl fmt::Display for Dfa {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let alphabet = self.alphabet();
        writeln!(f, "start: {}", self.start)?;
        write!(f, "        ")?;
        for c in &alphabet {
            write!(f, "{:<4}", c.escape_default().to_string())?;
        }
        writeln!(f)?;
        for (id, state) in self.states.iter().enumerate() {
            let accept = if state.is_final { '*' } else { ' ' };
            write!(f, "{accept}{id:>5} | ")?;
            for c in &alphabet {
                match state.transitions.get(c) {
                    Some(target) => write!(f, "{target:<4}")?,
                    None => write!(f, "{:<4}", '_')?,
                }
            }
            if !state.actions.is_empty() {
                let priorities: Vec<i32> = state.actions.iter().map(|a| a.priority).collect();
                write!(f, " {priorities:?}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
