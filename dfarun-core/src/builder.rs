//! Automaton description parsing.
//!
//! Descriptions are line oriented:
//!
//! ```text
//! 1
//! 2
//! 1: 97 2 | 98 3
//! 2: 97 1
//! 3: 98 1
//! ```
//!
//! The first line is the initial state and the second the accepting state.
//! Each following line lists the outgoing transitions of one source state as
//! `<symbol> <target>` pairs separated by `|`. With the default ordinal
//! encoding a symbol is written as its character code (`97` is `a`); the
//! literal encoding writes the character itself.
//!
//! Literal symbols cannot be whitespace or `|`, since those delimit tokens.

use crate::error::{CoreError, FormatError, FormatErrorKind};
use crate::table::{StateId, Symbol, TransitionTable};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::path::Path;

/// How symbols are written in a description.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SymbolEncoding {
    /// Character code, e.g. `97` for `a`.
    #[default]
    Ordinal,
    /// The character itself, e.g. `a`.
    Literal,
}

/// Treatment of whitespace-only lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlankLines {
    /// Ignore them anywhere in the description.
    #[default]
    Skip,
    /// Fail the build on the first one.
    Reject,
}

/// Parser options.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildOptions {
    pub symbols: SymbolEncoding,
    pub blank_lines: BlankLines,
}

/// Why an undeclared state was reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateRole {
    Target,
    Accepting,
}

/// A state that is referenced but never declares outgoing transitions.
///
/// Such a state acts as a sink. This is reported, never rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UndeclaredState {
    pub state: StateId,
    pub role: StateRole,
}

impl fmt::Display for UndeclaredState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let role = match self.role {
            StateRole::Target => "target",
            StateRole::Accepting => "accepting",
        };
        write!(
            f,
            "{} state {} has no transition line and acts as a sink",
            role, self.state
        )
    }
}

/// A parsed description: the table plus initial and accepting states.
#[derive(Debug, Clone)]
pub struct Description {
    pub table: TransitionTable,
    pub initial: StateId,
    pub accepting: StateId,
    /// CRC32C of the description text.
    pub checksum: String,
}

impl Description {
    /// Returns targets and the accepting state that have no outgoing list.
    pub fn undeclared_states(&self) -> Vec<UndeclaredState> {
        let mut seen = BTreeSet::new();
        let mut undeclared = Vec::new();

        if !self.table.is_declared(self.accepting) {
            seen.insert(self.accepting);
            undeclared.push(UndeclaredState {
                state: self.accepting,
                role: StateRole::Accepting,
            });
        }

        for t in self.table.transitions() {
            if !self.table.is_declared(t.target) && seen.insert(t.target) {
                undeclared.push(UndeclaredState {
                    state: t.target,
                    role: StateRole::Target,
                });
            }
        }

        undeclared
    }
}

/// Builds transition tables from description text.
#[derive(Debug, Clone, Default)]
pub struct TableBuilder {
    options: BuildOptions,
}

impl TableBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: BuildOptions) -> Self {
        Self { options }
    }

    /// Reads and builds the description at `path`.
    pub fn load(&self, path: impl AsRef<Path>) -> Result<Description, CoreError> {
        let path = path.as_ref();
        tracing::debug!("Loading description from {}", path.display());
        let text = std::fs::read_to_string(path).map_err(|source| CoreError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(self.build(&text)?)
    }

    /// Parses `text` into a description.
    ///
    /// Only the grammar is checked. Unreachable states, repeated symbols on
    /// one source and targets without their own line are all accepted.
    pub fn build(&self, text: &str) -> Result<Description, FormatError> {
        let mut lines = self.significant_lines(text);
        let end = text.lines().count() + 1;

        let (line, raw) = lines
            .next()
            .transpose()?
            .ok_or_else(|| FormatError::new(end, "", FormatErrorKind::MissingInitial))?;
        let initial = parse_state(line, raw, raw.trim())?;

        let (line, raw) = lines
            .next()
            .transpose()?
            .ok_or_else(|| FormatError::new(end, "", FormatErrorKind::MissingAccepting))?;
        let accepting = parse_state(line, raw, raw.trim())?;

        let mut table = TransitionTable::new();
        for next in lines {
            let (line, raw) = next?;
            self.parse_transition_line(line, raw, &mut table)?;
        }

        let description = Description {
            table,
            initial,
            accepting,
            checksum: format!("{:08x}", crc32c::crc32c(text.as_bytes())),
        };

        tracing::debug!(
            "Built transition table: initial={}, accepting={}, {} transitions from {} states, checksum {}",
            description.initial,
            description.accepting,
            description.table.transition_count(),
            description.table.source_count(),
            description.checksum
        );

        // An accepting sink is a normal shape; only dangling targets warn.
        for undeclared in description.undeclared_states() {
            match undeclared.role {
                StateRole::Accepting => tracing::info!("{}", undeclared),
                StateRole::Target => tracing::warn!("{}", undeclared),
            }
        }

        Ok(description)
    }

    /// Yields `(line_number, raw_line)` for every line the grammar looks at.
    fn significant_lines<'a>(
        &self,
        text: &'a str,
    ) -> impl Iterator<Item = Result<(usize, &'a str), FormatError>> + 'a {
        let policy = self.options.blank_lines;
        text.lines().enumerate().filter_map(move |(i, raw)| {
            let line = i + 1;
            if !raw.trim().is_empty() {
                return Some(Ok((line, raw)));
            }
            match policy {
                BlankLines::Skip => None,
                BlankLines::Reject => {
                    let err = FormatError::new(line, raw, FormatErrorKind::BlankLine);
                    Some(Err(err))
                }
            }
        })
    }

    /// Parses `source: sym target | sym target ...` into `table`.
    fn parse_transition_line(
        &self,
        line: usize,
        raw: &str,
        table: &mut TransitionTable,
    ) -> Result<(), FormatError> {
        let (source, pairs) = raw
            .split_once(':')
            .ok_or_else(|| FormatError::new(line, raw, FormatErrorKind::MissingColon))?;
        let source = parse_state(line, raw, source.trim())?;

        if pairs.trim().is_empty() {
            return Err(FormatError::new(line, raw, FormatErrorKind::EmptyPairList));
        }

        for pair in pairs.split('|') {
            let pair = pair.trim();
            if pair.is_empty() {
                return Err(FormatError::new(line, raw, FormatErrorKind::EmptyPair));
            }

            let tokens: Vec<&str> = pair.split_whitespace().collect();
            let [symbol, target] = tokens.as_slice() else {
                return Err(FormatError::new(
                    line,
                    raw,
                    FormatErrorKind::MalformedPair {
                        found: tokens.len(),
                    },
                ));
            };

            let symbol = self.parse_symbol(line, raw, symbol)?;
            let target = parse_state(line, raw, target)?;
            table.add_transition(source, symbol, target);
        }

        Ok(())
    }

    fn parse_symbol(&self, line: usize, raw: &str, token: &str) -> Result<Symbol, FormatError> {
        let invalid = || {
            FormatError::new(
                line,
                raw,
                FormatErrorKind::InvalidSymbol {
                    token: token.to_string(),
                },
            )
        };

        match self.options.symbols {
            SymbolEncoding::Ordinal => token
                .parse::<u32>()
                .ok()
                .and_then(Symbol::from_ordinal)
                .ok_or_else(invalid),
            SymbolEncoding::Literal => {
                let mut chars = token.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Ok(Symbol(c)),
                    _ => Err(invalid()),
                }
            }
        }
    }
}

fn parse_state(line: usize, raw: &str, token: &str) -> Result<StateId, FormatError> {
    token.parse::<u32>().map(StateId).map_err(|_| {
        FormatError::new(
            line,
            raw,
            FormatErrorKind::InvalidState {
                token: token.to_string(),
            },
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = "1\n2\n1: 97 2 | 98 3\n2: 97 1\n3: 98 1\n";

    fn s(id: u32) -> StateId {
        StateId(id)
    }

    fn build(text: &str) -> Result<Description, FormatError> {
        TableBuilder::new().build(text)
    }

    fn kind(text: &str) -> FormatErrorKind {
        build(text).unwrap_err().kind
    }

    #[test]
    fn test_build_sample() {
        let desc = build(SAMPLE).unwrap();

        assert_eq!(desc.initial, s(1));
        assert_eq!(desc.accepting, s(2));
        assert_eq!(
            desc.table.outgoing(s(1)),
            &[(Symbol('a'), s(2)), (Symbol('b'), s(3))]
        );
        assert_eq!(desc.table.outgoing(s(2)), &[(Symbol('a'), s(1))]);
        assert_eq!(desc.table.outgoing(s(3)), &[(Symbol('b'), s(1))]);
        assert_eq!(desc.table.transition_count(), 4);
        assert_eq!(desc.table.source_count(), 3);
        assert!(desc.undeclared_states().is_empty());
    }

    #[test]
    fn test_whitespace_is_insignificant() {
        let desc = build("  1 \n\t2\n 1 :  97   2  |98 3 \n").unwrap();
        assert_eq!(desc.initial, s(1));
        assert_eq!(desc.accepting, s(2));
        assert_eq!(
            desc.table.outgoing(s(1)),
            &[(Symbol('a'), s(2)), (Symbol('b'), s(3))]
        );
    }

    #[test]
    fn test_crlf_lines() {
        let desc = build("1\r\n2\r\n1: 97 2\r\n").unwrap();
        assert_eq!(desc.table.outgoing(s(1)), &[(Symbol('a'), s(2))]);
    }

    #[test]
    fn test_missing_colon() {
        let err = build("1\n2\n1 97 2\n").unwrap_err();
        assert_eq!(err.kind, FormatErrorKind::MissingColon);
        assert_eq!(err.line, 3);
        assert_eq!(err.text, "1 97 2");
    }

    #[test]
    fn test_missing_header_lines() {
        assert_eq!(kind(""), FormatErrorKind::MissingInitial);
        assert_eq!(kind("1\n"), FormatErrorKind::MissingAccepting);

        let err = build("1\n").unwrap_err();
        assert_eq!(err.line, 2);
    }

    #[test]
    fn test_header_only_is_valid() {
        let desc = build("1\n1\n").unwrap();
        assert!(desc.table.is_empty());
    }

    #[test]
    fn test_invalid_header_integers() {
        assert_eq!(
            kind("one\n2\n"),
            FormatErrorKind::InvalidState {
                token: "one".to_string()
            }
        );
        assert_eq!(
            kind("1\n-2\n"),
            FormatErrorKind::InvalidState {
                token: "-2".to_string()
            }
        );
    }

    #[test]
    fn test_empty_pair_list() {
        assert_eq!(kind("1\n2\n1:\n"), FormatErrorKind::EmptyPairList);
        assert_eq!(kind("1\n2\n1:   \n"), FormatErrorKind::EmptyPairList);
    }

    #[test]
    fn test_empty_pair() {
        assert_eq!(kind("1\n2\n1: 97 2 |\n"), FormatErrorKind::EmptyPair);
        assert_eq!(kind("1\n2\n1: 97 2 || 98 3\n"), FormatErrorKind::EmptyPair);
    }

    #[test]
    fn test_malformed_pair() {
        assert_eq!(
            kind("1\n2\n1: 97\n"),
            FormatErrorKind::MalformedPair { found: 1 }
        );
        assert_eq!(
            kind("1\n2\n1: 97 2 3\n"),
            FormatErrorKind::MalformedPair { found: 3 }
        );
    }

    #[test]
    fn test_invalid_tokens() {
        assert_eq!(
            kind("1\n2\nx: 97 2\n"),
            FormatErrorKind::InvalidState {
                token: "x".to_string()
            }
        );
        assert_eq!(
            kind("1\n2\n1: 97 two\n"),
            FormatErrorKind::InvalidState {
                token: "two".to_string()
            }
        );
        assert_eq!(
            kind("1\n2\n1: a 2\n"),
            FormatErrorKind::InvalidSymbol {
                token: "a".to_string()
            }
        );
        // Surrogate code points are not characters.
        assert_eq!(
            kind("1\n2\n1: 55296 2\n"),
            FormatErrorKind::InvalidSymbol {
                token: "55296".to_string()
            }
        );
    }

    #[test]
    fn test_literal_symbols() {
        let builder = TableBuilder::with_options(BuildOptions {
            symbols: SymbolEncoding::Literal,
            ..Default::default()
        });

        let literal = builder.build("1\n2\n1: a 2 | b 3\n").unwrap();
        let ordinal = build("1\n2\n1: 97 2 | 98 3\n").unwrap();
        assert_eq!(literal.table, ordinal.table);

        let err = builder.build("1\n2\n1: ab 2\n").unwrap_err();
        assert_eq!(
            err.kind,
            FormatErrorKind::InvalidSymbol {
                token: "ab".to_string()
            }
        );
    }

    #[test]
    fn test_blank_lines_skipped_by_default() {
        let desc = build("\n1\n\n2\n1: 97 2\n   \n2: 97 1\n\n").unwrap();
        assert_eq!(desc.initial, s(1));
        assert_eq!(desc.accepting, s(2));
        assert_eq!(desc.table.transition_count(), 2);
    }

    #[test]
    fn test_blank_lines_rejected() {
        let builder = TableBuilder::with_options(BuildOptions {
            blank_lines: BlankLines::Reject,
            ..Default::default()
        });

        let err = builder.build("1\n2\n1: 97 2\n\n2: 97 1\n").unwrap_err();
        assert_eq!(err.kind, FormatErrorKind::BlankLine);
        assert_eq!(err.line, 4);

        // A trailing newline is a terminator, not a blank line.
        assert!(builder.build("1\n2\n1: 97 2\n").is_ok());
    }

    #[test]
    fn test_repeated_source_lines_append() {
        let desc = build("1\n2\n1: 97 2\n2: 97 1\n1: 98 3\n").unwrap();
        assert_eq!(
            desc.table.outgoing(s(1)),
            &[(Symbol('a'), s(2)), (Symbol('b'), s(3))]
        );
    }

    #[test]
    fn test_nondeterministic_table_is_accepted() {
        // Two targets for the same symbol is not a build error.
        let desc = build("1\n2\n1: 97 2 | 97 3\n").unwrap();
        assert_eq!(
            desc.table.outgoing(s(1)),
            &[(Symbol('a'), s(2)), (Symbol('a'), s(3))]
        );
    }

    #[test]
    fn test_undeclared_states_are_reported_not_rejected() {
        let desc = build("1\n5\n1: 97 2 | 98 5\n2: 97 3\n").unwrap();

        let undeclared = desc.undeclared_states();
        assert_eq!(
            undeclared,
            vec![
                UndeclaredState {
                    state: s(5),
                    role: StateRole::Accepting
                },
                UndeclaredState {
                    state: s(3),
                    role: StateRole::Target
                },
            ]
        );
        assert!(undeclared[0].to_string().contains("accepting state 5"));
    }

    #[test]
    fn test_checksum() {
        let a = build(SAMPLE).unwrap();
        let b = build(SAMPLE).unwrap();
        let c = build("1\n2\n1: 97 2\n").unwrap();

        assert_eq!(a.checksum.len(), 8);
        assert_eq!(a.checksum, b.checksum);
        assert_ne!(a.checksum, c.checksum);
    }

    #[test]
    fn test_display_reparses() {
        let desc = build(SAMPLE).unwrap();
        let text = format!("{}\n{}\n{}", desc.initial, desc.accepting, desc.table);
        let again = build(&text).unwrap();
        assert_eq!(again.table, desc.table);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let desc = TableBuilder::new().load(file.path()).unwrap();
        assert_eq!(desc.initial, s(1));
        assert_eq!(desc.table.transition_count(), 4);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let result = TableBuilder::new().load(dir.path().join("missing.dfa"));
        assert!(matches!(result, Err(CoreError::Io { .. })));
    }

    #[test]
    fn test_load_format_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"1\n2\n1 97 2\n").unwrap();

        let err = TableBuilder::new().load(file.path()).unwrap_err();
        let format = err.as_format().unwrap();
        assert_eq!(format.line, 3);
        assert_eq!(format.kind, FormatErrorKind::MissingColon);
    }
}
