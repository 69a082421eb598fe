//! Command-line interface orchestration for the tessella synthesizer.
//!
//! Offers a `generate` command that learns patterns from a training graph
//! and writes a synthetic graph, and a `patterns` command that reports the
//! unique ego-network patterns of a training graph.

mod commands;

pub use commands::{
    render_summary, run_cli, Cli, CliError, Command, ExecutionSummary, GenerateCommand,
    GenerationSummary, PatternRow, PatternsCommand, PatternsSummary,
};
