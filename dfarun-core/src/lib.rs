//! # dfarun-core
//!
//! Deterministic finite automaton engine for dfarun.
//!
//! This crate provides:
//! - The transition table data model
//! - Parsing of the line-oriented description format
//! - Evaluation of input sequences against a built automaton

pub mod builder;
pub mod engine;
pub mod error;
pub mod table;

pub use builder::{
    BlankLines, BuildOptions, Description, StateRole, SymbolEncoding, TableBuilder, UndeclaredState,
};
pub use engine::{Automaton, EvalOptions, SelfLoopPolicy, Verdict};
pub use error::{CoreError, FormatError, FormatErrorKind};
pub use table::{StateId, Symbol, Transition, TransitionTable};

/// Builds an automaton from `text` and evaluates `input` against it.
///
/// Returns the tri-state outcome a driver maps to exit codes: `Ok(Accepted)`,
/// `Ok(Rejected)` or `Err` when the description is malformed.
pub fn evaluate_description(
    text: &str,
    input: &str,
    build: &BuildOptions,
    eval: &EvalOptions,
) -> Result<Verdict, CoreError> {
    let description = TableBuilder::with_options(build.clone()).build(text)?;
    let automaton = Automaton::new(description, eval.clone());
    Ok(automaton.run(input))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "1\n2\n1: 97 2 | 98 3\n2: 97 1\n3: 98 1\n";

    #[test]
    fn test_evaluate_description() {
        let build = BuildOptions::default();
        let eval = EvalOptions::default();

        assert_eq!(
            evaluate_description(SAMPLE, "a", &build, &eval).unwrap(),
            Verdict::Accepted
        );
        assert_eq!(
            evaluate_description(SAMPLE, "b", &build, &eval).unwrap(),
            Verdict::Rejected
        );
    }

    #[test]
    fn test_evaluate_description_format_error() {
        let result = evaluate_description(
            "1\n2\n1 97 2\n",
            "a",
            &BuildOptions::default(),
            &EvalOptions::default(),
        );
        assert!(matches!(result, Err(CoreError::Format(_))));
    }

    #[test]
    fn test_undeclared_roles_from_crate_root() {
        let description = TableBuilder::new().build("1\n2\n1: 97 3\n").unwrap();
        let roles: Vec<StateRole> = description
            .undeclared_states()
            .into_iter()
            .map(|u| u.role)
            .collect();
        assert_eq!(roles, [StateRole::Accepting, StateRole::Target]);
    }
}
