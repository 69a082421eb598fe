//! Tessella core library.
//!
//! Synthesizes labelled undirected graphs whose local structure imitates a
//! training graph. Ego-network patterns are mined per node and deduplicated
//! by a Weisfeiler–Lehman canonical form; multi-radius tables record which
//! patterns co-occur at each hop distance; and a wave-function-collapse
//! engine grows an output graph by entropy-weighted collapse, proportional
//! expansion, constraint propagation, and compatibility-validated stub
//! wiring.
//!
//! # Determinism
//!
//! Pattern identifiers follow first-seen deduplication order, every BFS uses
//! FIFO tie-breaking in adjacency insertion order, and the only randomness
//! is the seeded weighted sampler used at collapse time. The same training
//! graph and seed reproduce the same output.

mod builder;
mod error;
mod graph;
mod pattern;
mod result;
mod synthesizer;
mod wfc;

pub use crate::{
    builder::SynthesizerBuilder,
    error::{CellError, CellErrorCode, Result, SynthesisError, SynthesisErrorCode},
    graph::{Graph, Label, NodeId},
    pattern::{
        build_compatibility, extract_patterns, CompatibilityTable, Pattern, PatternId, PatternSet,
    },
    result::SynthesisResult,
    synthesizer::Synthesizer,
    wfc::{Cell, CellId},
};

#[cfg(test)]
pub(crate) mod test_utils;
