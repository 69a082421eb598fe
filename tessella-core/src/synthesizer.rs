//! Entry point for running the synthesis pipeline.

use tracing::info;

use crate::{
    builder::SynthesizerBuilder,
    error::{Result, SynthesisError},
    graph::Graph,
    pattern::{build_compatibility, extract_patterns},
    result::SynthesisResult,
    wfc::{Engine, EngineParams},
};

/// Runs pattern extraction, compatibility mapping, and WFC generation
/// against a training graph.
///
/// Instances are immutable and reusable; every [`Self::run`] call owns its
/// own engine state, so independent runs never interfere.
///
/// # Examples
/// ```
/// use tessella_core::{Graph, SynthesizerBuilder};
///
/// let mut training = Graph::new();
/// training.add_edge(0, 1);
/// training.set_label(0, 1);
/// training.set_label(1, 2);
///
/// let synthesizer = SynthesizerBuilder::new()
///     .with_radius(1)
///     .with_rng_seed(7)
///     .build()
///     .expect("configuration is valid");
/// let result = synthesizer.run(&training).expect("synthesis succeeds");
/// assert!(result.node_count() >= 1);
/// assert!(result.cells().iter().all(|cell| cell.is_collapsed()));
/// ```
#[derive(Clone, Debug)]
pub struct Synthesizer {
    radius: usize,
    size_factor: usize,
    lower_cap: f64,
    upper_cap: f64,
    expansion_percentile: f64,
    expansion_slack: f64,
    rng_seed: u64,
}

impl Synthesizer {
    pub(crate) fn new(
        radius: usize,
        size_factor: usize,
        lower_cap: f64,
        upper_cap: f64,
        expansion_percentile: f64,
        expansion_slack: f64,
        rng_seed: u64,
    ) -> Self {
        Self {
            radius,
            size_factor,
            lower_cap,
            upper_cap,
            expansion_percentile,
            expansion_slack,
            rng_seed,
        }
    }

    /// Returns a builder populated with default parameters.
    #[must_use]
    pub fn builder() -> SynthesizerBuilder {
        SynthesizerBuilder::new()
    }

    /// Configured ego-network radius.
    #[must_use]
    pub fn radius(&self) -> usize {
        self.radius
    }

    /// Configured target-size multiplier.
    #[must_use]
    pub fn size_factor(&self) -> usize {
        self.size_factor
    }

    /// Configured RNG seed.
    #[must_use]
    pub fn rng_seed(&self) -> u64 {
        self.rng_seed
    }

    /// Executes the full pipeline against the training graph.
    ///
    /// Extracts patterns at the configured radius, builds the multi-radius
    /// compatibility tables, and runs the generation engine. Given the same
    /// training graph and seed, the output is reproducible.
    ///
    /// # Errors
    /// Returns [`SynthesisError::EmptyTrainingGraph`] for a graph with no
    /// nodes. Contradictions during generation are recovered internally and
    /// reported through [`SynthesisResult::contradictions`].
    pub fn run(&self, training: &Graph) -> Result<SynthesisResult> {
        if training.is_empty() {
            return Err(SynthesisError::EmptyTrainingGraph);
        }

        let expansion_cap = self.expansion_cap(training);
        let target_size = self.size_factor * training.node_count();
        info!(
            radius = self.radius,
            target_size,
            expansion_cap,
            seed = self.rng_seed,
            "starting synthesis"
        );

        let patterns = extract_patterns(training, self.radius)?;
        let table = build_compatibility(training, self.radius)?;
        let engine = Engine::new(
            &patterns,
            &table,
            EngineParams {
                target_size,
                lower_cap: self.lower_cap,
                upper_cap: self.upper_cap,
                expansion_cap,
                rng_seed: self.rng_seed,
            },
        );
        engine.run()
    }

    /// Expansion cap: the configured percentile of the training degree
    /// distribution, widened by the slack factor and rounded up.
    fn expansion_cap(&self, training: &Graph) -> usize {
        let base = training
            .degree_percentile(self.expansion_percentile)
            .unwrap_or(0);
        ((base as f64) * self.expansion_slack).ceil() as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::labelled_graph;

    #[test]
    fn empty_training_graph_is_rejected() {
        let synthesizer = SynthesizerBuilder::new().build().expect("defaults are valid");
        assert!(matches!(
            synthesizer.run(&Graph::new()),
            Err(SynthesisError::EmptyTrainingGraph)
        ));
    }

    #[test]
    fn expansion_cap_applies_percentile_and_slack() {
        // Star around node 0: degrees [4, 1, 1, 1, 1].
        let graph = labelled_graph(
            &[(0, 1), (0, 2), (0, 3), (0, 4)],
            &[(0, 1), (1, 1), (2, 1), (3, 1), (4, 1)],
        );
        let synthesizer = SynthesizerBuilder::new()
            .with_expansion_percentile(1.0)
            .with_expansion_slack(1.5)
            .build()
            .expect("configuration is valid");
        assert_eq!(synthesizer.expansion_cap(&graph), 6);
    }
}
