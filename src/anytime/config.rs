//! Anytime restart configuration.

use std::time::Duration;

use crate::error::{GroupingError, Result};
use crate::search::SearchConfig;

/// Configuration for time-budgeted random restarts.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use u_grouping::anytime::AnytimeConfig;
///
/// let config = AnytimeConfig::new(4)
///     .with_iterations_per_run(2_000)
///     .with_time_budget(Duration::from_millis(500))
///     .with_seed(7);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AnytimeConfig {
    /// Target members per group.
    pub group_size: usize,

    /// Local search iterations per restart.
    pub iterations_per_run: usize,

    /// Wall-clock budget. A run is only started if the average run time
    /// still fits in what remains.
    pub time_budget: Duration,

    /// Independent restart loops (run concurrently with the `parallel`
    /// feature, otherwise only the first is used).
    pub workers: usize,

    /// Master random seed; worker seeds are derived from it.
    pub seed: Option<u64>,

    /// Local search settings for every restart.
    pub search: SearchConfig,
}

impl Default for AnytimeConfig {
    fn default() -> Self {
        Self {
            group_size: 4,
            iterations_per_run: 15_000,
            time_budget: Duration::from_secs(10),
            workers: 1,
            seed: None,
            search: SearchConfig::default(),
        }
    }
}

impl AnytimeConfig {
    pub fn new(group_size: usize) -> Self {
        Self {
            group_size,
            ..Self::default()
        }
    }

    pub fn with_iterations_per_run(mut self, n: usize) -> Self {
        self.iterations_per_run = n;
        self
    }

    pub fn with_time_budget(mut self, budget: Duration) -> Self {
        self.time_budget = budget;
        self
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_search(mut self, search: SearchConfig) -> Self {
        self.search = search;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.group_size < 1 {
            return Err(GroupingError::config("group_size", "must be at least 1"));
        }
        if self.workers < 1 {
            return Err(GroupingError::config("workers", "must be at least 1"));
        }
        if self.time_budget.is_zero() {
            return Err(GroupingError::config("time_budget", "must be positive"));
        }
        self.search.validate()
    }
}
