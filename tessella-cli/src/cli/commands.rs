//! Command implementations and argument parsing for the tessella CLI.

use std::io::{self, Write};
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use thiserror::Error;
use tracing::{info, instrument};

use tessella_core::{extract_patterns, SynthesisError, SynthesizerBuilder};
use tessella_providers_edgelist::{EdgeListError, Exporter, Reader};

/// Top-level CLI options parsed by [`clap`].
#[derive(Debug, Parser, Clone)]
#[command(name = "tessella", about = "Synthesize graphs from ego-network patterns.")]
pub struct Cli {
    /// Command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported CLI commands.
#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Learn patterns from a training graph and synthesize a new graph.
    Generate(GenerateCommand),
    /// Report the unique ego-network patterns of a training graph.
    Patterns(PatternsCommand),
}

impl Command {
    fn name(&self) -> &'static str {
        match self {
            Command::Generate(_) => "generate",
            Command::Patterns(_) => "patterns",
        }
    }
}

/// Options accepted by the `generate` command.
#[derive(Debug, Args, Clone)]
pub struct GenerateCommand {
    /// Path to the training edge-list file (two ids per line).
    pub edges: PathBuf,

    /// Path to the training label-list file (id and label per line).
    pub labels: PathBuf,

    /// Path to write the generated edge-list file.
    #[arg(long = "out-edges")]
    pub out_edges: PathBuf,

    /// Path to write the generated label-list file.
    #[arg(long = "out-labels")]
    pub out_labels: PathBuf,

    /// Ego-network radius in hops.
    #[arg(long, default_value_t = 2)]
    pub radius: usize,

    /// Target-size multiplier over the training node count.
    #[arg(long = "size-factor", default_value_t = 2)]
    pub size_factor: usize,

    /// Progress fraction at which growth hands over to cleanup.
    #[arg(long = "lower-cap", default_value_t = 0.9)]
    pub lower_cap: f64,

    /// Hard size limit as a fraction of the target size.
    #[arg(long = "upper-cap", default_value_t = 1.1)]
    pub upper_cap: f64,

    /// Training-degree percentile the expansion cap derives from.
    #[arg(long = "expansion-percentile", default_value_t = 0.9)]
    pub expansion_percentile: f64,

    /// Slack multiplier applied to the percentile degree.
    #[arg(long = "expansion-slack", default_value_t = 1.1)]
    pub expansion_slack: f64,

    /// Seed for the collapse-sampling RNG.
    #[arg(long, default_value_t = 0)]
    pub seed: u64,
}

/// Options accepted by the `patterns` command.
#[derive(Debug, Args, Clone)]
pub struct PatternsCommand {
    /// Path to the training edge-list file.
    pub edges: PathBuf,

    /// Path to the training label-list file.
    pub labels: PathBuf,

    /// Ego-network radius in hops.
    #[arg(long, default_value_t = 2)]
    pub radius: usize,
}

/// Errors surfaced while executing CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// Reading or writing an edge-list file failed.
    #[error(transparent)]
    EdgeList(#[from] EdgeListError),
    /// Core synthesis failed.
    #[error(transparent)]
    Core(#[from] SynthesisError),
}

/// Summarises the outcome of executing a CLI command.
#[derive(Debug, Clone)]
pub enum ExecutionSummary {
    /// Outcome of a `generate` run.
    Generation(GenerationSummary),
    /// Outcome of a `patterns` report.
    Patterns(PatternsSummary),
}

/// Key figures of a completed generation run.
#[derive(Debug, Clone)]
pub struct GenerationSummary {
    /// Node count of the training graph.
    pub training_nodes: usize,
    /// Node count of the generated graph.
    pub generated_nodes: usize,
    /// Edge count of the generated graph.
    pub generated_edges: usize,
    /// Edge slots left unfilled when the run ended.
    pub open_stubs: usize,
    /// Whether every created cell was collapsed.
    pub fully_collapsed: bool,
    /// Contradictions recovered during the run.
    pub contradictions: usize,
}

/// One line of the `patterns` report.
#[derive(Debug, Clone)]
pub struct PatternRow {
    /// Pattern identifier.
    pub pid: usize,
    /// Occurrence count in the training graph.
    pub frequency: usize,
    /// Centre label.
    pub center_label: i32,
    /// Centre degree in the training graph.
    pub center_degree: usize,
}

/// Unique-pattern report for a training graph.
#[derive(Debug, Clone)]
pub struct PatternsSummary {
    /// Node count of the training graph.
    pub training_nodes: usize,
    /// One row per unique pattern, in pattern-id order.
    pub rows: Vec<PatternRow>,
}

/// Executes the CLI command represented by `cli`.
///
/// # Errors
/// Returns [`CliError`] when loading, synthesis, or export fails.
#[instrument(name = "cli.run", err, skip(cli), fields(command = %cli.command.name()))]
pub fn run_cli(cli: Cli) -> Result<ExecutionSummary, CliError> {
    match cli.command {
        Command::Generate(command) => run_generate(command).map(ExecutionSummary::Generation),
        Command::Patterns(command) => run_patterns(command).map(ExecutionSummary::Patterns),
    }
}

#[instrument(
    name = "cli.generate",
    err,
    skip(command),
    fields(radius = command.radius, size_factor = command.size_factor, seed = command.seed),
)]
fn run_generate(command: GenerateCommand) -> Result<GenerationSummary, CliError> {
    let training = Reader::load(&command.edges, &command.labels)?;
    let synthesizer = SynthesizerBuilder::new()
        .with_radius(command.radius)
        .with_size_factor(command.size_factor)
        .with_lower_cap(command.lower_cap)
        .with_upper_cap(command.upper_cap)
        .with_expansion_percentile(command.expansion_percentile)
        .with_expansion_slack(command.expansion_slack)
        .with_rng_seed(command.seed)
        .build()?;
    let result = synthesizer.run(&training)?;
    Exporter::export(
        result.cells(),
        result.adjacency(),
        &command.out_edges,
        &command.out_labels,
    )?;

    let summary = GenerationSummary {
        training_nodes: training.node_count(),
        generated_nodes: result.node_count(),
        generated_edges: result.edge_count(),
        open_stubs: result.open_stubs(),
        fully_collapsed: result.fully_collapsed(),
        contradictions: result.contradictions(),
    };
    info!(
        generated_nodes = summary.generated_nodes,
        generated_edges = summary.generated_edges,
        open_stubs_remaining = summary.open_stubs,
        fully_collapsed = summary.fully_collapsed,
        "command completed"
    );
    Ok(summary)
}

#[instrument(name = "cli.patterns", err, skip(command), fields(radius = command.radius))]
fn run_patterns(command: PatternsCommand) -> Result<PatternsSummary, CliError> {
    let training = Reader::load(&command.edges, &command.labels)?;
    let patterns = extract_patterns(&training, command.radius)?;
    let rows = patterns
        .iter()
        .map(|(pid, pattern)| PatternRow {
            pid: pid.get(),
            frequency: pattern.frequency(),
            center_label: pattern.center_label(),
            center_degree: pattern.center_degree(),
        })
        .collect();
    Ok(PatternsSummary {
        training_nodes: training.node_count(),
        rows,
    })
}

/// Renders a summary to the given writer.
///
/// # Errors
/// Returns any error raised by the writer.
pub fn render_summary(summary: &ExecutionSummary, writer: &mut impl Write) -> io::Result<()> {
    match summary {
        ExecutionSummary::Generation(generation) => {
            writeln!(
                writer,
                "generated {} nodes and {} edges from {} training nodes",
                generation.generated_nodes, generation.generated_edges, generation.training_nodes,
            )?;
            writeln!(
                writer,
                "open stubs remaining: {}; fully collapsed: {}; contradictions recovered: {}",
                generation.open_stubs, generation.fully_collapsed, generation.contradictions,
            )
        }
        ExecutionSummary::Patterns(patterns) => {
            writeln!(
                writer,
                "{} unique patterns across {} training nodes",
                patterns.rows.len(),
                patterns.training_nodes,
            )?;
            for row in &patterns.rows {
                writeln!(
                    writer,
                    "pattern {}: frequency {}, label {}, degree {}",
                    row.pid, row.frequency, row.center_label, row.center_degree,
                )?;
            }
            Ok(())
        }
    }
}
