//! ashiba - scaffold span generation from the command line
//!
//! Usage:
//!   ashiba span --start 0,0 --end 360,0      Generate one span
//!   ashiba plan plan.yaml -f svg -o out.svg  Generate every span of a plan
//!   ashiba import sketch.svg                 One span per <line> of a sketch
//!   ashiba tally drawing.json                Count members in a drawing
//!   ashiba direction --start 0,0 --end 0,100 Member direction for a span

mod cli;

use std::process::ExitCode;

use clap::{ArgAction, Parser, Subcommand};
use log::LevelFilter;

use cli::{
    DirectionArgs, ImportArgs, PlanArgs, SpanArgs, TallyArgs, cmd_direction, cmd_import, cmd_plan,
    cmd_span, cmd_tally,
};

#[derive(Debug, Parser)]
#[command(
    name = "ashiba",
    version,
    about = "Scaffold span generation: pillars, ledgers, brackets and anti boards"
)]
struct Cli {
    /// More log output (-v info, -vv debug, -vvv trace); RUST_LOG overrides
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Generate the parts for one span
    Span(SpanArgs),
    /// Generate every span of a YAML plan
    Plan(PlanArgs),
    /// Generate spans from the <line> elements of an SVG sketch
    Import(ImportArgs),
    /// Count members in a drawing document
    Tally(TallyArgs),
    /// Show which way members face for a span
    Direction(DirectionArgs),
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .init();
}

fn run(command: &Command) -> anyhow::Result<()> {
    match command {
        Command::Span(args) => cmd_span(args),
        Command::Plan(args) => cmd_plan(args),
        Command::Import(args) => cmd_import(args),
        Command::Tally(args) => cmd_tally(args),
        Command::Direction(args) => cmd_direction(args),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(&cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
