use std::fs;
use std::io::{self, Read, Write};

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use log::LevelFilter;

use nfa_compiler::{build, ToText};
use nfa_runtime::text::{Document, FromText};
use nfa_runtime::{trace, Nfa, Simulation, Span};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Raise the log level, repeat for more detail
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run an automaton document against its `input:` line
    Exec {
        /// Automaton document, read from stdin when omitted
        #[arg(value_name = "FILE")]
        file: Option<String>,
    },

    /// Match each line of input against a pattern
    Match {
        pattern: String,

        /// Input lines, read from stdin when omitted
        #[arg(value_name = "FILE")]
        file: Option<String>,

        /// Report the leftmost-longest span within each line
        #[arg(short, long)]
        search: bool,

        /// Report every non-overlapping span within each line
        #[arg(short, long)]
        all: bool,
    },

    /// Print the automaton compiled from a pattern as a text document
    Compile { pattern: String },
}

/// How each input line is matched against a pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MatchMode {
    /// The whole line must match.
    Line,
    /// The leftmost-longest span.
    Search,
    /// Every non-overlapping span.
    All,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = match args.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    let stdout = io::stdout();
    let mut out = stdout.lock();

    match args.command {
        Command::Exec { file } => exec(&mut out, &read_source(file.as_deref())?),
        Command::Match {
            pattern,
            file,
            search,
            all,
        } => {
            let nfa = build(&pattern).with_context(|| format!("invalid pattern {:?}", pattern))?;
            let mode = match (all, search) {
                (true, _) => MatchMode::All,
                (false, true) => MatchMode::Search,
                (false, false) => MatchMode::Line,
            };

            let source = read_source(file.as_deref())?;
            let matched = match_lines(&mut out, &nfa, &source, mode)?;
            log::info!("{} of {} lines matched", matched, source.lines().count());
            Ok(())
        }
        Command::Compile { pattern } => compile(&mut out, &pattern),
    }
}

fn read_source(file: Option<&str>) -> Result<String> {
    match file {
        Some(path) => fs::read_to_string(path).with_context(|| format!("failed to read {}", path)),
        None => {
            let mut contents = String::new();
            io::stdin()
                .read_to_string(&mut contents)
                .context("failed to read stdin")?;
            Ok(contents)
        }
    }
}

/// Writes the accepting path of a document's input, or `Reject`.
fn exec<W: Write>(out: &mut W, source: &str) -> Result<()> {
    let doc = Document::from_text(source).context("failed to read automaton document")?;
    let input = doc
        .input
        .context("automaton document has no `input: ` line")?;

    match trace(&doc.automaton, &input) {
        Some(path) => writeln!(out, "{}", path)?,
        None => writeln!(out, "Reject")?,
    }

    Ok(())
}

/// Writes each matching line of `source`, prefixed by its spans outside of
/// [MatchMode::Line]. Returns the number of matching lines.
fn match_lines<W: Write>(
    out: &mut W,
    nfa: &Nfa,
    source: &str,
    mode: MatchMode,
) -> Result<usize> {
    let mut simulation = Simulation::new(nfa);
    let mut matched = 0;

    for line in source.lines() {
        let spans = match mode {
            MatchMode::All => simulation.find_all(line),
            MatchMode::Search => simulation.find(line).into_iter().collect(),
            MatchMode::Line if simulation.is_match(line) => {
                vec![Span::new(0, line.chars().count())]
            }
            MatchMode::Line => vec![],
        };

        if spans.is_empty() {
            continue;
        }
        matched += 1;

        if mode == MatchMode::Line {
            writeln!(out, "{}", line)?;
        } else {
            let spans = spans
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(" ");
            writeln!(out, "{}: {}", spans, line)?;
        }
    }

    Ok(matched)
}

fn compile<W: Write>(out: &mut W, pattern: &str) -> Result<()> {
    let nfa = build(pattern).with_context(|| format!("invalid pattern {:?}", pattern))?;
    let text = nfa
        .to_text()
        .context("automaton has no text representation")?;

    write!(out, "{}", text)?;
    Ok(())
}
