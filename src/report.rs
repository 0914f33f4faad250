//! Result rendering for the driver.

use crate::error::DriverError;
use colored::Colorize;
use dfarun_core::{Automaton, Transition, Verdict};
use serde::Serialize;
use std::fmt::Write;
use std::path::Path;

/// JSON report for a completed evaluation.
#[derive(Debug, Serialize)]
pub struct Report<'a> {
    pub description: String,
    pub input: &'a str,
    pub accepted: bool,
    pub checksum: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transitions: Option<Vec<Transition>>,
}

impl<'a> Report<'a> {
    pub fn new(
        path: &Path,
        automaton: &Automaton,
        checksum: &'a str,
        input: &'a str,
        verdict: Verdict,
        dump: bool,
    ) -> Self {
        Self {
            description: path.display().to_string(),
            input,
            accepted: verdict.is_accepted(),
            checksum,
            transitions: dump.then(|| automaton.table().transitions().collect()),
        }
    }
}

/// JSON report for a failed run.
#[derive(Debug, Serialize)]
pub struct ErrorReport {
    pub error: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
}

impl From<&DriverError> for ErrorReport {
    fn from(e: &DriverError) -> Self {
        Self {
            error: e.error_code(),
            message: e.to_string(),
            line: e.line(),
        }
    }
}

/// Renders the transition table the way `printList` did: one line per
/// declared state, prefixed with the initial and accepting states.
pub fn render_table(automaton: &Automaton) -> String {
    let table = automaton.table();
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} {}, {} {}, {} transitions from {} states",
        "initial".dimmed(),
        automaton.initial(),
        "accepting".dimmed(),
        automaton.accepting(),
        table.transition_count(),
        table.source_count()
    );
    let _ = write!(out, "{}", table);
    out
}

/// Renders the text result lines.
pub fn render_text(input: &str, verdict: Verdict) -> String {
    let evaluation = match verdict {
        Verdict::Accepted => "True".green().bold(),
        Verdict::Rejected => "False".red().bold(),
    };
    format!("Input: {}\nEvaluation: {}", input, evaluation)
}

pub fn render_json(report: &Report<'_>) -> Result<String, DriverError> {
    Ok(serde_json::to_string(report)?)
}

pub fn render_error(e: &DriverError, json: bool) -> String {
    if json {
        serde_json::to_string(&ErrorReport::from(e))
            .unwrap_or_else(|_| format!("{{\"error\":\"{}\"}}", e.error_code()))
    } else {
        format!("{}: {}", "Error".red(), e)
    }
}
