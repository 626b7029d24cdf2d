use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use chordplan::cost::CostTable;
use chordplan::layout::Layout;
use chordplan::model::Plan;
use chordplan::planner::Planner;
use chordplan::sim;
use chordplan::trace::plan_trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Plan as pretty-printed JSON.
    Json,
    /// One line per frame.
    Trace,
}

#[derive(Debug, Parser)]
#[command(name = "chordplan")]
#[command(about = "Finger press/release planner for chorded keyboards", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Generate a finger plan for a text
    Plan {
        /// Layout file (.json, or the `Chord Assignments:` text format)
        #[arg(long, value_name = "PATH")]
        layout: PathBuf,

        /// Finger press cost table (JSON); defaults to the five-finger table
        #[arg(long, value_name = "PATH")]
        costs: Option<PathBuf>,

        /// Input text file, or '-' for stdin
        #[arg(long, value_name = "PATH")]
        input: PathBuf,

        /// Output file (defaults to stdout)
        #[arg(long, value_name = "PATH")]
        output: Option<PathBuf>,

        #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,
    },

    /// Total finger effort of typing a text with a layout
    Score {
        /// Layout file (.json, or the `Chord Assignments:` text format)
        #[arg(long, value_name = "PATH")]
        layout: PathBuf,

        /// Finger press cost table (JSON); defaults to the five-finger table
        #[arg(long, value_name = "PATH")]
        costs: Option<PathBuf>,

        /// Input text file, or '-' for stdin
        #[arg(long, value_name = "PATH")]
        input: PathBuf,
    },

    /// Replay a saved plan and print the text it types
    Replay {
        /// Layout file used to decode transmitted chords
        #[arg(long, value_name = "PATH")]
        layout: PathBuf,

        /// Plan file (JSON)
        #[arg(long, value_name = "PATH")]
        plan: PathBuf,
    },
}

fn read_input(path: &PathBuf) -> Result<String> {
    if path.as_os_str() == std::ffi::OsStr::new("-") {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read stdin")?;
        return Ok(buf);
    }

    fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

fn write_output(path: &PathBuf, contents: &str) -> Result<()> {
    fs::write(path, contents).with_context(|| format!("failed to write {}", path.display()))
}

fn load_costs(path: Option<&PathBuf>) -> Result<CostTable> {
    match path {
        Some(path) => CostTable::load(path),
        None => Ok(CostTable::default()),
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Plan {
            layout,
            costs,
            input,
            output,
            format,
        } => {
            let layout = Layout::load(&layout)?;
            let costs = load_costs(costs.as_ref())?;
            let text = read_input(&input)?;

            let plan = Planner::new(&layout, &costs)?.finger_plan(&text);

            let stats = sim::stats(&plan);
            eprintln!(
                "Planned: {} frames, {} releases, {} holds, {} skipped characters",
                stats.frames,
                stats.releases,
                stats.holds,
                plan.skipped.len()
            );

            let rendered = match format {
                OutputFormat::Json => {
                    serde_json::to_string_pretty(&plan).context("failed to serialize plan")?
                }
                OutputFormat::Trace => plan_trace(&plan).join("\n"),
            };
            if let Some(out) = output {
                write_output(&out, &rendered)?;
            } else {
                println!("{rendered}");
            }
        }
        Command::Score {
            layout,
            costs,
            input,
        } => {
            let layout = Layout::load(&layout)?;
            let costs = load_costs(costs.as_ref())?;
            let text = read_input(&input)?;

            let total = Planner::new(&layout, &costs)?.score_text(&text);
            let chars = text.chars().count().max(1);
            eprintln!(
                "Scored {} characters, {:.2} ms per character",
                text.chars().count(),
                total as f64 / chars as f64
            );
            println!("{total}");
        }
        Command::Replay { layout, plan } => {
            let layout = Layout::load(&layout)?;
            let json = fs::read_to_string(&plan)
                .with_context(|| format!("failed to read {}", plan.display()))?;
            let plan: Plan = serde_json::from_str(&json).context("failed to parse plan JSON")?;

            let typed = sim::simulate_typed_text(&plan, &layout)?;
            print!("{typed}");
        }
    }

    Ok(())
}
