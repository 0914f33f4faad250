//! dfarun - Deterministic finite automaton evaluator
//!
//! Builds an automaton from a description file and reports whether an input
//! string ends in its accepting state.
//!
//! Exit codes: 0 when accepted, 1 when rejected, 2 on any error.

mod config;
mod error;
mod report;

use clap::Parser;
use config::Config;
use dfarun_core::{Automaton, BlankLines, SelfLoopPolicy, SymbolEncoding, TableBuilder, Verdict};
use error::DriverError;
use report::Report;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

const EXIT_ACCEPTED: u8 = 0;
const EXIT_REJECTED: u8 = 1;
const EXIT_ERROR: u8 = 2;

#[derive(Parser)]
#[command(name = "dfarun")]
#[command(about = "Evaluate an input string against a DFA description")]
#[command(version)]
struct Cli {
    /// Path to the automaton description
    description: PathBuf,

    /// Input string to evaluate
    input: String,

    /// Path to a YAML configuration file
    #[arg(short, long, env = "DFARUN_CONFIG")]
    config: Option<PathBuf>,

    /// Self-loop handling: skip (compatible) or follow (standard DFA)
    #[arg(long, value_parser = config::parse_self_loops)]
    self_loops: Option<SelfLoopPolicy>,

    /// Symbol encoding in the description: ordinal or literal
    #[arg(long, value_parser = config::parse_symbols)]
    symbols: Option<SymbolEncoding>,

    /// Blank line handling in the description: skip or reject
    #[arg(long, value_parser = config::parse_blank_lines)]
    blank_lines: Option<BlankLines>,

    /// Print the transition table before evaluating
    #[arg(long)]
    dump: bool,

    /// Print a JSON report instead of text
    #[arg(long)]
    json: bool,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,
}

impl Cli {
    /// Loads the configuration and applies command-line overrides.
    fn resolve_config(&self) -> Result<Config, DriverError> {
        let mut config = Config::load(self.config.as_deref())?;

        if let Some(policy) = self.self_loops {
            config.engine.self_loops = policy;
        }
        if let Some(encoding) = self.symbols {
            config.format.symbols = encoding;
        }
        if let Some(policy) = self.blank_lines {
            config.format.blank_lines = policy;
        }
        config.output.dump |= self.dump;
        config.output.json |= self.json;
        if self.no_color {
            config.output.color = false;
        }

        Ok(config)
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let resolved = cli.resolve_config();

    let color = match &resolved {
        Ok(config) => config.output.color,
        Err(_) => !cli.no_color,
    };
    init_logging(color);
    if !color {
        colored::control::set_override(false);
    }

    let config = match resolved {
        Ok(config) => config,
        Err(e) => {
            // The config may be what asked for JSON, so fall back to the env.
            print_error(&e, cli.json || config::json_requested_by_env());
            return ExitCode::from(EXIT_ERROR);
        }
    };

    for ignored in &config.ignored_overrides {
        tracing::warn!("{}", ignored);
    }

    match run(&cli, &config) {
        Ok(Verdict::Accepted) => ExitCode::from(EXIT_ACCEPTED),
        Ok(Verdict::Rejected) => ExitCode::from(EXIT_REJECTED),
        Err(e) => {
            print_error(&e, config.output.json);
            ExitCode::from(EXIT_ERROR)
        }
    }
}

fn init_logging(ansi: bool) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_ansi(ansi)
        .init();
}

/// JSON errors go to stdout next to JSON reports; text errors go to stderr.
fn print_error(e: &DriverError, json: bool) {
    if json {
        println!("{}", report::render_error(e, true));
    } else {
        eprintln!("{}", report::render_error(e, false));
    }
}

fn run(cli: &Cli, config: &Config) -> Result<Verdict, DriverError> {
    if !config.output.json {
        println!("Building DFA from {}", cli.description.display());
    }

    let description = TableBuilder::with_options(config.format.clone()).load(&cli.description)?;
    let checksum = description.checksum.clone();
    let automaton = Automaton::new(description, config.engine.clone());

    tracing::debug!(
        "Evaluating {} symbol(s) with self-loop policy {:?}",
        cli.input.chars().count(),
        config.engine.self_loops
    );
    let verdict = automaton.run(&cli.input);

    if config.output.json {
        let report = Report::new(
            &cli.description,
            &automaton,
            &checksum,
            &cli.input,
            verdict,
            config.output.dump,
        );
        println!("{}", report::render_json(&report)?);
    } else {
        if config.output.dump {
            print!("{}", report::render_table(&automaton));
        }
        println!("{}", report::render_text(&cli.input, verdict));
    }

    Ok(verdict)
}
