//! Trace table runner.
//!
//! Reads a pseudocode program from a file, or from standard input up to a
//! line reading `END`, runs it and prints the trace table. Logging goes to
//! stderr and is controlled by `TRACETABLE_LOG` (default `warn`).

mod render;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tracetable_eval::{run_program, RunOptions, RunOutcome};
use tracetable_parser::{parse_program, read_program};
use tracetable_types::ast::Program;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "tracetable")]
#[command(version, about = "Run a pseudocode program and print its trace table")]
struct Cli {
    /// Program file; without it, lines are read from stdin until `END`
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Abort after this many executed statements
    #[arg(long, value_name = "N")]
    max_steps: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_env("TRACETABLE_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    match execute(Cli::parse()) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            error!("{e:#}");
            eprintln!("error: {e:#}");
            ExitCode::from(2)
        }
    }
}

/// Returns whether the program ran to completion.
fn execute(cli: Cli) -> anyhow::Result<bool> {
    let program = load(cli.input.as_ref())?;
    info!(statements = program.len(), "program loaded");

    let options = RunOptions {
        step_limit: cli.max_steps,
    };
    let outcome = run_program(&program, options);

    let mut stdout = io::stdout().lock();
    print_outcome(&mut stdout, &outcome, cli.format)?;
    stdout.flush()?;

    if cli.format == Format::Text {
        if let Some(err) = &outcome.error {
            eprintln!("error: {err}");
        }
    }
    Ok(outcome.is_ok())
}

fn load(input: Option<&PathBuf>) -> anyhow::Result<Program> {
    match input {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            Ok(parse_program(&text))
        }
        None => read_program(io::stdin().lock()).context("failed to read standard input"),
    }
}

fn print_outcome<W: Write>(out: &mut W, outcome: &RunOutcome, format: Format) -> anyhow::Result<()> {
    match format {
        Format::Text => render::write_table(out, &outcome.table)?,
        Format::Json => {
            serde_json::to_writer_pretty(&mut *out, &outcome.report())
                .context("failed to encode run report")?;
            writeln!(out)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_flags() {
        let cli = Cli::parse_from(["tracetable", "prog.txt", "--format", "json", "--max-steps", "10"]);
        assert_eq!(cli.input, Some(PathBuf::from("prog.txt")));
        assert_eq!(cli.format, Format::Json);
        assert_eq!(cli.max_steps, Some(10));
    }

    #[test]
    fn defaults_to_stdin_and_text() {
        let cli = Cli::parse_from(["tracetable"]);
        assert_eq!(cli.input, None);
        assert_eq!(cli.format, Format::Text);
        assert_eq!(cli.max_steps, None);
    }

    #[test]
    fn json_output_is_a_report() {
        let outcome = tracetable_eval::run("SET x TO 1\nSEND x TO DISPLAY");
        let mut buf = Vec::new();
        print_outcome(&mut buf, &outcome, Format::Json).unwrap();
        let json: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["columns"], serde_json::json!(["x", "Display"]));
    }
}
