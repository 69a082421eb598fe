//! Builder utilities for configuring synthesis runs.
//!
//! Exposes every tunable of the generation engine with validation performed
//! once, at [`SynthesizerBuilder::build`] time.

use crate::{
    error::{Result, SynthesisError},
    synthesizer::Synthesizer,
};

/// Configures and constructs [`Synthesizer`] instances.
///
/// # Examples
/// ```
/// use tessella_core::SynthesizerBuilder;
///
/// let synthesizer = SynthesizerBuilder::new()
///     .with_radius(1)
///     .with_size_factor(3)
///     .with_rng_seed(42)
///     .build()
///     .expect("builder configuration is valid");
/// assert_eq!(synthesizer.radius(), 1);
/// assert_eq!(synthesizer.size_factor(), 3);
/// ```
#[derive(Clone, Debug)]
pub struct SynthesizerBuilder {
    radius: usize,
    size_factor: usize,
    lower_cap: f64,
    upper_cap: f64,
    expansion_percentile: f64,
    expansion_slack: f64,
    rng_seed: u64,
}

impl Default for SynthesizerBuilder {
    fn default() -> Self {
        Self {
            radius: 2,
            size_factor: 2,
            lower_cap: 0.9,
            upper_cap: 1.1,
            expansion_percentile: 0.9,
            expansion_slack: 1.1,
            rng_seed: 0,
        }
    }
}

impl SynthesizerBuilder {
    /// Creates a builder populated with default parameters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the ego-network radius (hops). Must be at least 1.
    #[must_use]
    pub fn with_radius(mut self, radius: usize) -> Self {
        self.radius = radius;
        self
    }

    /// Sets the target-size multiplier over the training node count.
    #[must_use]
    pub fn with_size_factor(mut self, size_factor: usize) -> Self {
        self.size_factor = size_factor;
        self
    }

    /// Sets the progress fraction at which growth hands over to cleanup.
    #[must_use]
    pub fn with_lower_cap(mut self, lower_cap: f64) -> Self {
        self.lower_cap = lower_cap;
        self
    }

    /// Sets the hard size limit as a fraction of the target size.
    #[must_use]
    pub fn with_upper_cap(mut self, upper_cap: f64) -> Self {
        self.upper_cap = upper_cap;
        self
    }

    /// Sets the training-degree percentile the expansion cap derives from.
    #[must_use]
    pub fn with_expansion_percentile(mut self, percentile: f64) -> Self {
        self.expansion_percentile = percentile;
        self
    }

    /// Sets the slack multiplier applied to the percentile degree.
    #[must_use]
    pub fn with_expansion_slack(mut self, slack: f64) -> Self {
        self.expansion_slack = slack;
        self
    }

    /// Seeds the RNG that drives weighted collapse sampling.
    #[must_use]
    pub fn with_rng_seed(mut self, seed: u64) -> Self {
        self.rng_seed = seed;
        self
    }

    /// Validates the configuration and constructs a [`Synthesizer`].
    ///
    /// # Errors
    /// Returns the matching `Invalid*` variant of [`SynthesisError`] when a
    /// parameter is out of range.
    ///
    /// # Examples
    /// ```
    /// use tessella_core::{SynthesisError, SynthesizerBuilder};
    ///
    /// let err = SynthesizerBuilder::new().with_radius(0).build().unwrap_err();
    /// assert!(matches!(err, SynthesisError::InvalidRadius { got: 0 }));
    /// ```
    pub fn build(self) -> Result<Synthesizer> {
        if self.radius < 1 {
            return Err(SynthesisError::InvalidRadius { got: self.radius });
        }
        if self.size_factor < 1 {
            return Err(SynthesisError::InvalidSizeFactor {
                got: self.size_factor,
            });
        }
        if !(self.lower_cap > 0.0 && self.lower_cap <= 1.0) {
            return Err(SynthesisError::InvalidLowerCap {
                got: self.lower_cap,
            });
        }
        if !(self.upper_cap >= 1.0) {
            return Err(SynthesisError::InvalidUpperCap {
                got: self.upper_cap,
            });
        }
        if !(0.0..=1.0).contains(&self.expansion_percentile) {
            return Err(SynthesisError::InvalidPercentile {
                got: self.expansion_percentile,
            });
        }
        if !(self.expansion_slack >= 1.0) {
            return Err(SynthesisError::InvalidSlack {
                got: self.expansion_slack,
            });
        }
        Ok(Synthesizer::new(
            self.radius,
            self.size_factor,
            self.lower_cap,
            self.upper_cap,
            self.expansion_percentile,
            self.expansion_slack,
            self.rng_seed,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SynthesisError;

    use rstest::rstest;

    #[test]
    fn defaults_build_successfully() {
        let synthesizer = SynthesizerBuilder::new().build().expect("defaults are valid");
        assert_eq!(synthesizer.radius(), 2);
        assert_eq!(synthesizer.size_factor(), 2);
    }

    #[rstest]
    #[case(SynthesizerBuilder::new().with_radius(0), "SYNTH_INVALID_RADIUS")]
    #[case(SynthesizerBuilder::new().with_size_factor(0), "SYNTH_INVALID_SIZE_FACTOR")]
    #[case(SynthesizerBuilder::new().with_lower_cap(0.0), "SYNTH_INVALID_LOWER_CAP")]
    #[case(SynthesizerBuilder::new().with_lower_cap(1.5), "SYNTH_INVALID_LOWER_CAP")]
    #[case(SynthesizerBuilder::new().with_upper_cap(0.5), "SYNTH_INVALID_UPPER_CAP")]
    #[case(SynthesizerBuilder::new().with_expansion_percentile(-0.1), "SYNTH_INVALID_PERCENTILE")]
    #[case(SynthesizerBuilder::new().with_expansion_percentile(1.1), "SYNTH_INVALID_PERCENTILE")]
    #[case(SynthesizerBuilder::new().with_expansion_slack(0.9), "SYNTH_INVALID_SLACK")]
    fn out_of_range_parameters_are_rejected(
        #[case] builder: SynthesizerBuilder,
        #[case] code: &str,
    ) {
        let err: SynthesisError = builder.build().unwrap_err();
        assert_eq!(err.code().as_str(), code);
    }
}
