//! Command implementations and argument parsing for the ripple CLI.

use std::io::{self, Write};
use std::sync::{Arc, mpsc::Receiver};

use clap::{Args, Parser, Subcommand};
use ripple_core::{
    ChannelObserver, DEFAULT_GRAVITY, DEFAULT_MAX_DEGREE, DEFAULT_NUM_NODES, DEFAULT_SPEED, Graph,
    LinkState, PlaybackState, Progress, RippleError, Session, SimulationConfig,
    SimulationConfigBuilder, SpreadSummary,
};
use thiserror::Error;
use tracing::{Span, field, info, instrument, warn};

use super::clock::{Clock, VirtualClock, WallClock};

/// Top-level CLI options parsed by [`clap`].
#[derive(Debug, Parser, Clone)]
#[command(
    name = "ripple",
    about = "Animate a breadth-first spread across a random graph."
)]
pub struct Cli {
    /// Command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported CLI commands.
#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Generate a graph and play the spread back from node 0.
    Run(RunCommand),
}

/// Options accepted by the `run` command.
#[derive(Debug, Args, Clone)]
pub struct RunCommand {
    /// Number of nodes to generate.
    #[arg(long, default_value_t = DEFAULT_NUM_NODES)]
    pub nodes: usize,

    /// Upper bound on links per node.
    #[arg(long = "max-degree", default_value_t = DEFAULT_MAX_DEGREE)]
    pub max_degree: usize,

    /// Spread steps per second.
    #[arg(long, default_value_t = DEFAULT_SPEED)]
    pub speed: u32,

    /// Layout gravity, forwarded to renderers.
    #[arg(long, default_value_t = DEFAULT_GRAVITY)]
    pub gravity: f64,

    /// Seed for reproducible graphs.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Stop playback after this many steps.
    #[arg(long = "max-steps")]
    pub max_steps: Option<usize>,

    /// Skip the waits between steps.
    #[arg(long = "virtual-clock")]
    pub virtual_clock: bool,
}

/// Errors surfaced while executing CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// Writing progress output failed.
    #[error("failed to write progress: {source}")]
    Io {
        /// Underlying operating system error.
        #[from]
        source: io::Error,
    },
    /// Configuration or generation failed in the core.
    #[error(transparent)]
    Core(#[from] RippleError),
}

/// Summarises the outcome of a `run` command.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionSummary {
    /// Configuration the run was built from.
    pub config: SimulationConfig,
    /// Number of links in the generated graph.
    pub links: usize,
    /// Nodes left without any link.
    pub isolated: usize,
    /// Spread counts when playback stopped.
    pub spread: SpreadSummary,
    /// Whether the spread ran until the frontier emptied.
    pub completed: bool,
}

/// Executes the CLI command represented by `cli`, writing one line per step
/// to `out`.
///
/// # Errors
/// Returns [`CliError`] when the configuration is rejected or output fails.
///
/// # Examples
/// ```
/// # use std::error::Error;
/// # use ripple_cli::cli::{Cli, run_cli};
/// # use clap::Parser;
/// #
/// # fn main() -> Result<(), Box<dyn Error>> {
/// let cli = Cli::try_parse_from(["ripple", "run", "--nodes", "30", "--seed", "9", "--virtual-clock"])?;
/// let mut out = Vec::new();
/// let summary = run_cli(cli, &mut out)?;
/// assert!(summary.completed);
/// assert_eq!(summary.spread.visited + summary.spread.unreached, 30);
/// # Ok(())
/// # }
/// ```
#[instrument(name = "cli.run", err, skip(cli, out), fields(command = field::Empty))]
pub fn run_cli(cli: Cli, out: impl Write) -> Result<ExecutionSummary, CliError> {
    match cli.command {
        Command::Run(run) => {
            Span::current().record("command", field::display("run"));
            run_command(run, out)
        }
    }
}

#[instrument(
    name = "cli.execute",
    err,
    skip(command, out),
    fields(nodes = command.nodes, seed = field::Empty, clock = field::Empty),
)]
pub(super) fn run_command(
    command: RunCommand,
    mut out: impl Write,
) -> Result<ExecutionSummary, CliError> {
    let config = SimulationConfigBuilder::new()
        .with_num_nodes(command.nodes)
        .with_max_degree(command.max_degree)
        .with_speed(command.speed)
        .with_gravity(command.gravity)
        .with_seed(command.seed)
        .build()?;

    let span = Span::current();
    if let Some(seed) = config.seed() {
        span.record("seed", seed);
    }
    if !config.is_recognised() {
        warn!(
            nodes = command.nodes,
            speed = command.speed,
            gravity = command.gravity,
            "configuration lies outside the recognised control ranges"
        );
    }

    let mut session = Session::new(config)?;
    let (observer, progress) = ChannelObserver::channel();
    session.subscribe(observer);

    let completed = if command.virtual_clock {
        span.record("clock", field::display("virtual"));
        play(
            &mut session,
            &mut VirtualClock::default(),
            &progress,
            command.max_steps,
            &mut out,
        )?
    } else {
        span.record("clock", field::display("wall"));
        play(
            &mut session,
            &mut WallClock::start(),
            &progress,
            command.max_steps,
            &mut out,
        )?
    };
    out.flush()?;

    let graph = session.run().graph();
    let summary = ExecutionSummary {
        config,
        links: graph.links().len(),
        isolated: graph.isolated().count(),
        spread: session.summary(),
        completed,
    };
    info!(
        steps = summary.spread.steps,
        visited = summary.spread.visited,
        completed,
        "command completed"
    );
    Ok(summary)
}

/// Starts playback and fires ticks as their deadlines arrive, rendering each
/// snapshot. Returns whether the spread was exhausted.
#[instrument(name = "cli.play", err, skip_all, fields(max_steps = ?max_steps))]
pub(super) fn play(
    session: &mut Session,
    clock: &mut impl Clock,
    progress: &Receiver<Progress>,
    max_steps: Option<usize>,
    out: &mut impl Write,
) -> Result<bool, CliError> {
    let graph = Arc::clone(session.run().graph());
    session.toggle_play_pause(clock.now());

    let mut steps = 0;
    while let Some(deadline) = session.next_deadline() {
        if max_steps.is_some_and(|limit| steps >= limit) {
            if session.toggle_play_pause(clock.now()) == PlaybackState::Paused {
                info!(steps, "step limit reached; playback stopped");
            }
            break;
        }
        clock.wait_until(deadline);
        steps += session.poll(deadline);
        for snapshot in progress.try_iter() {
            render_progress(&snapshot, &graph, &mut *out)?;
        }
    }
    Ok(session.run().engine().is_exhausted())
}

/// Renders one progress snapshot as a single line.
///
/// # Errors
/// Returns [`io::Error`] if writing to the supplied writer fails.
///
/// # Examples
/// ```
/// # use std::error::Error;
/// # use std::sync::Arc;
/// # use ripple_cli::cli::render_progress;
/// # use ripple_core::{Graph, TraversalEngine};
/// #
/// # fn main() -> Result<(), Box<dyn Error>> {
/// let graph = Arc::new(Graph::from_links(3, &[(0, 1), (1, 2)])?);
/// let mut engine = TraversalEngine::new(Arc::clone(&graph));
/// let progress = engine.step();
/// let mut out = Vec::new();
/// render_progress(&progress, &graph, &mut out)?;
/// assert_eq!(
///     String::from_utf8(out)?,
///     "step 1: visited 1/3, frontier 1, spreading links 1\n",
/// );
/// # Ok(())
/// # }
/// ```
pub fn render_progress<P>(
    progress: &Progress,
    graph: &Graph<P>,
    mut writer: impl Write,
) -> io::Result<()> {
    let spreading = graph
        .links()
        .iter()
        .filter(|link| progress.link_state(link) == LinkState::Spreading)
        .count();
    writeln!(
        writer,
        "step {}: visited {}/{}, frontier {}, spreading links {spreading}",
        progress.step(),
        progress.visited().len(),
        graph.len(),
        progress.frontier().len(),
    )
}

/// Renders `summary` to `writer` in a human-readable text format.
///
/// # Errors
/// Returns [`io::Error`] if writing to the supplied writer fails.
pub fn render_summary(summary: &ExecutionSummary, mut writer: impl Write) -> io::Result<()> {
    let ExecutionSummary {
        config,
        links,
        isolated,
        spread,
        completed,
    } = summary;
    writeln!(writer, "nodes: {}", spread.nodes)?;
    writeln!(writer, "max degree: {}", config.max_degree())?;
    writeln!(writer, "links: {links}")?;
    writeln!(writer, "isolated: {isolated}")?;
    writeln!(writer, "steps: {}", spread.steps)?;
    writeln!(writer, "visited: {}", spread.visited)?;
    writeln!(writer, "frontier: {}", spread.frontier)?;
    writeln!(writer, "unreached: {}", spread.unreached)?;
    let status = if *completed { "complete" } else { "stopped" };
    writeln!(writer, "status: {status}")
}
