//! Automaton evaluation.

use crate::builder::Description;
use crate::table::{StateId, Symbol, TransitionTable};
use serde::{Deserialize, Serialize};

/// Handling of transitions whose target is the current state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelfLoopPolicy {
    /// Pass over self-loops while scanning and keep looking for a matching
    /// transition to another state. Compatible with the original tool.
    #[default]
    Skip,
    /// Take the first matching transition, self-loop or not.
    Follow,
}

/// Evaluation options.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvalOptions {
    pub self_loops: SelfLoopPolicy,
}

/// Outcome of evaluating an input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Accepted,
    Rejected,
}

impl Verdict {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Verdict::Accepted)
    }
}

impl From<bool> for Verdict {
    fn from(accepted: bool) -> Self {
        if accepted {
            Verdict::Accepted
        } else {
            Verdict::Rejected
        }
    }
}

/// A built automaton.
///
/// Evaluation only borrows the automaton, so one instance can serve any
/// number of evaluations, including from several threads at once.
#[derive(Debug, Clone)]
pub struct Automaton {
    table: TransitionTable,
    initial: StateId,
    accepting: StateId,
    options: EvalOptions,
}

impl Automaton {
    /// Creates an automaton from a parsed description.
    pub fn new(description: Description, options: EvalOptions) -> Self {
        Self::from_parts(
            description.table,
            description.initial,
            description.accepting,
            options,
        )
    }

    /// Creates an automaton from its parts.
    ///
    /// `initial` and `accepting` are not checked against the table. An
    /// accepting state that can never be reached makes every input reject.
    pub fn from_parts(
        table: TransitionTable,
        initial: StateId,
        accepting: StateId,
        options: EvalOptions,
    ) -> Self {
        Self {
            table,
            initial,
            accepting,
            options,
        }
    }

    pub fn table(&self) -> &TransitionTable {
        &self.table
    }

    pub fn initial(&self) -> StateId {
        self.initial
    }

    pub fn accepting(&self) -> StateId {
        self.accepting
    }

    /// Returns true if `input` ends in the accepting state.
    pub fn evaluate(&self, input: &str) -> bool {
        self.evaluate_symbols(input.chars().map(Symbol))
    }

    /// Returns true if `symbols` ends in the accepting state.
    pub fn evaluate_symbols(&self, symbols: impl IntoIterator<Item = Symbol>) -> bool {
        self.final_state_of(symbols) == self.accepting
    }

    /// Evaluates `input` and reports the outcome as a [`Verdict`].
    pub fn run(&self, input: &str) -> Verdict {
        Verdict::from(self.evaluate(input))
    }

    /// Returns the state reached after consuming all of `input`.
    pub fn final_state(&self, input: &str) -> StateId {
        self.final_state_of(input.chars().map(Symbol))
    }

    fn final_state_of(&self, symbols: impl IntoIterator<Item = Symbol>) -> StateId {
        symbols.into_iter().fold(self.initial, |current, symbol| {
            self.step(current, symbol).unwrap_or(current)
        })
    }

    /// Returns the transition taken from `current` on `symbol`, if any.
    ///
    /// `None` means the automaton stalls in `current`.
    fn step(&self, current: StateId, symbol: Symbol) -> Option<StateId> {
        self.table
            .outgoing(current)
            .iter()
            .find(|(sym, target)| {
                *sym == symbol
                    && (self.options.self_loops == SelfLoopPolicy::Follow || *target != current)
            })
            .map(|(_, target)| *target)
    }
}
