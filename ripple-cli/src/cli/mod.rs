//! Command-line front end for ripple.
//!
//! The `run` command builds a session from command-line configuration, plays
//! the spread back on a wall or virtual clock, and prints one line per step
//! followed by a summary.

mod clock;
mod commands;

pub use clock::{Clock, VirtualClock, WallClock};
pub use commands::{
    Cli, CliError, Command, ExecutionSummary, RunCommand, render_progress, render_summary,
    run_cli,
};
