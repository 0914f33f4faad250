//! Transition table types.
//!
//! States are plain integers. A state exists as soon as a transition, the
//! initial identifier or the accepting identifier mentions it; there is no
//! separate state list.

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// A state identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct StateId(pub u32);

impl fmt::Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One input token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Symbol(pub char);

impl Symbol {
    /// Creates a symbol from its character code. Returns `None` for values
    /// that are not Unicode scalar values.
    pub fn from_ordinal(ordinal: u32) -> Option<Self> {
        char::from_u32(ordinal).map(Self)
    }

    pub fn ordinal(&self) -> u32 {
        u32::from(self.0)
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single `(source, symbol, target)` triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Transition {
    pub source: StateId,
    pub symbol: Symbol,
    pub target: StateId,
}

/// Outgoing transitions per source state.
///
/// Each source keeps its `(symbol, target)` pairs in insertion order. Lookups
/// during evaluation scan that order and stop at the first match, so the
/// order is part of the table's meaning when a source repeats a symbol.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransitionTable {
    states: BTreeMap<StateId, Vec<(Symbol, StateId)>>,
}

impl TransitionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `(symbol, target)` to the outgoing list of `source`.
    ///
    /// Repeated symbols are kept; the earlier entry shadows later ones.
    pub fn add_transition(&mut self, source: StateId, symbol: Symbol, target: StateId) {
        self.states
            .entry(source)
            .or_default()
            .push((symbol, target));
    }

    /// Returns the outgoing transitions of `source`, empty if none were added.
    pub fn outgoing(&self, source: StateId) -> &[(Symbol, StateId)] {
        self.states.get(&source).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of transitions across all sources.
    pub fn transition_count(&self) -> usize {
        self.states.values().map(Vec::len).sum()
    }

    /// Number of states with at least one outgoing transition.
    pub fn source_count(&self) -> usize {
        self.states.len()
    }

    /// Out-degree of `state`.
    pub fn degree(&self, state: StateId) -> usize {
        self.outgoing(state).len()
    }

    /// Returns true if `state` has its own outgoing list.
    pub fn is_declared(&self, state: StateId) -> bool {
        self.states.contains_key(&state)
    }

    /// Every state referenced as a source or a target.
    pub fn states(&self) -> BTreeSet<StateId> {
        let mut all = BTreeSet::new();
        for (source, pairs) in &self.states {
            all.insert(*source);
            all.extend(pairs.iter().map(|(_, target)| *target));
        }
        all
    }

    /// Iterates all transitions, sources ascending, each list in insertion order.
    pub fn transitions(&self) -> impl Iterator<Item = Transition> + '_ {
        self.states.iter().flat_map(|(source, pairs)| {
            pairs.iter().map(move |(symbol, target)| Transition {
                source: *source,
                symbol: *symbol,
                target: *target,
            })
        })
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}

/// Writes one line per declared source in the ordinal description format.
impl fmt::Display for TransitionTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (source, pairs) in &self.states {
            write!(f, "{}:", source)?;
            for (i, (symbol, target)) in pairs.iter().enumerate() {
                if i > 0 {
                    write!(f, " |")?;
                }
                write!(f, " {} {}", symbol.ordinal(), target)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
