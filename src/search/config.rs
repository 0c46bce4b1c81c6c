//! Local search configuration.

use crate::error::{GroupingError, Result};

/// Configuration for the epsilon-greedy swap search.
///
/// # Exploration
///
/// Each iteration explores (an unconditional random swap) with probability
/// `epsilon`, otherwise exploits (the best pairwise exchange between two
/// groups). `epsilon` starts at `initial_epsilon` and decays geometrically
/// so that it reaches `final_epsilon` after the requested iteration count.
///
/// # Group selection
///
/// With probability `1 - group_bias` the weakest group is paired with a
/// random group other than the strongest; otherwise both groups are random.
///
/// # Convergence
///
/// Every `checkpoint_interval` iterations the total group score is
/// compared with the previous checkpoint. Two consecutive relative changes
/// below `convergence_threshold` stop the search.
///
/// # Examples
///
/// ```
/// use u_grouping::search::SearchConfig;
///
/// let config = SearchConfig::default()
///     .with_initial_epsilon(0.1)
///     .with_checkpoint_interval(250);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SearchConfig {
    /// Exploration probability at the start of a run, in [0, 1].
    pub initial_epsilon: f64,

    /// Exploration probability reached after the full iteration count.
    pub final_epsilon: f64,

    /// Probability of picking both groups at random, in [0, 1].
    pub group_bias: f64,

    /// Relative change in total score treated as "no progress".
    pub convergence_threshold: f64,

    /// Iterations between convergence checks.
    pub checkpoint_interval: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            initial_epsilon: 0.05,
            final_epsilon: 0.001,
            group_bias: 0.25,
            convergence_threshold: 0.001,
            checkpoint_interval: 500,
        }
    }
}

impl SearchConfig {
    /// Pure exchange search with exploration switched off.
    pub fn greedy() -> Self {
        Self::default().with_initial_epsilon(0.0)
    }

    pub fn with_initial_epsilon(mut self, epsilon: f64) -> Self {
        self.initial_epsilon = epsilon;
        self
    }

    pub fn with_final_epsilon(mut self, epsilon: f64) -> Self {
        self.final_epsilon = epsilon;
        self
    }

    pub fn with_group_bias(mut self, bias: f64) -> Self {
        self.group_bias = bias;
        self
    }

    pub fn with_convergence_threshold(mut self, threshold: f64) -> Self {
        self.convergence_threshold = threshold;
        self
    }

    pub fn with_checkpoint_interval(mut self, n: usize) -> Self {
        self.checkpoint_interval = n;
        self
    }

    /// Per-iteration decay factor taking `initial_epsilon` to
    /// `final_epsilon` over `iterations` steps.
    pub fn discount(&self, iterations: usize) -> f64 {
        if self.initial_epsilon <= 0.0 || iterations == 0 {
            return 1.0;
        }
        (self.final_epsilon / self.initial_epsilon).powf(1.0 / iterations as f64)
    }

    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.initial_epsilon) {
            return Err(GroupingError::config(
                "initial_epsilon",
                format!("must be in [0, 1], got {}", self.initial_epsilon),
            ));
        }
        if !(self.final_epsilon > 0.0 && self.final_epsilon <= 1.0) {
            return Err(GroupingError::config(
                "final_epsilon",
                format!("must be in (0, 1], got {}", self.final_epsilon),
            ));
        }
        if !(0.0..=1.0).contains(&self.group_bias) {
            return Err(GroupingError::config(
                "group_bias",
                format!("must be in [0, 1], got {}", self.group_bias),
            ));
        }
        if !self.convergence_threshold.is_finite() {
            return Err(GroupingError::config("convergence_threshold", "must be finite"));
        }
        if self.checkpoint_interval == 0 {
            return Err(GroupingError::config("checkpoint_interval", "must be positive"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SearchConfig::default();
        assert!((config.initial_epsilon - 0.05).abs() < 1e-12);
        assert!((config.group_bias - 0.25).abs() < 1e-12);
        assert_eq!(config.checkpoint_interval, 500);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_discount_reaches_final_epsilon() {
        let config = SearchConfig::default();
        let d = config.discount(15_000);
        let end = config.initial_epsilon * d.powi(15_000);
        assert!((end - config.final_epsilon).abs() < 1e-9);
    }

    #[test]
    fn test_discount_without_exploration() {
        assert_eq!(SearchConfig::greedy().discount(1000), 1.0);
        assert_eq!(SearchConfig::default().discount(0), 1.0);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        assert!(SearchConfig::default().with_initial_epsilon(1.5).validate().is_err());
        assert!(SearchConfig::default().with_final_epsilon(0.0).validate().is_err());
        assert!(SearchConfig::default().with_group_bias(-0.1).validate().is_err());
        assert!(SearchConfig::default().with_checkpoint_interval(0).validate().is_err());
        assert!(SearchConfig::greedy().validate().is_ok());
    }
}
