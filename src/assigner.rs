//! End-to-end group assignment.
//!
//! [`GroupAssigner`] wires the pieces together the two ways a run can be
//! configured:
//!
//! - [`InitMode::Strong`]: greedy combinatorial construction followed by
//!   a pure exchange search (no exploration).
//! - [`InitMode::Random`]: anytime random restarts, each refined by
//!   epsilon-greedy search, within the time budget.

use std::time::Duration;

use tracing::info;

use crate::anytime::{AnytimeConfig, AnytimeRunner};
use crate::error::{GroupingError, Result};
use crate::init::StrongInitializer;
use crate::model::{Assignment, Respondent, Survey};
use crate::random::create_rng;
use crate::report::Summary;
use crate::scoring::{ScoringConfig, ScoringEngine};
use crate::search::{LocalSearch, SearchConfig};

/// How the assignment is built before refinement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum InitMode {
    /// Greedy construction, then greedy exchange.
    #[default]
    Strong,
    /// Anytime random restarts with epsilon-greedy search.
    Random,
}

/// Configuration for [`GroupAssigner`].
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use u_grouping::assigner::{AssignerConfig, InitMode};
///
/// let config = AssignerConfig::new(5)
///     .with_mode(InitMode::Random)
///     .with_time_budget(Duration::from_secs(2))
///     .with_seed(11);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AssignerConfig {
    /// Target members per group.
    pub group_size: usize,

    /// Local search iterations (per restart in random mode).
    pub iterations: usize,

    /// Candidates scored per slot during strong construction.
    pub combination_cap: usize,

    /// Wall-clock budget for random mode.
    pub time_budget: Duration,

    pub mode: InitMode,

    /// Concurrent restart loops in random mode (`parallel` feature).
    pub workers: usize,

    /// Random seed for reproducibility.
    pub seed: Option<u64>,

    /// Local search tunables. Strong mode disables exploration regardless.
    pub search: SearchConfig,

    pub scoring: ScoringConfig,
}

impl Default for AssignerConfig {
    fn default() -> Self {
        Self {
            group_size: 4,
            iterations: 15_000,
            combination_cap: 10_000,
            time_budget: Duration::from_secs(10),
            mode: InitMode::Strong,
            workers: 1,
            seed: None,
            search: SearchConfig::default(),
            scoring: ScoringConfig::default(),
        }
    }
}

impl AssignerConfig {
    pub fn new(group_size: usize) -> Self {
        Self {
            group_size,
            ..Self::default()
        }
    }

    /// Local search iterations per refinement.
    pub fn with_iterations(mut self, n: usize) -> Self {
        self.iterations = n;
        self
    }

    /// Candidate groups considered per strong construction round.
    pub fn with_combination_cap(mut self, cap: usize) -> Self {
        self.combination_cap = cap;
        self
    }

    /// Wall-clock budget of the random flow.
    pub fn with_time_budget(mut self, budget: Duration) -> Self {
        self.time_budget = budget;
        self
    }

    /// Strong construction or anytime random restarts.
    pub fn with_mode(mut self, mode: InitMode) -> Self {
        self.mode = mode;
        self
    }

    /// Independent anytime workers (needs the `parallel` feature).
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    /// Master seed; unseeded runs draw from entropy.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Local search settings shared by both flows.
    pub fn with_search(mut self, search: SearchConfig) -> Self {
        self.search = search;
        self
    }

    /// Delimiter and schedule settings for scoring.
    pub fn with_scoring(mut self, scoring: ScoringConfig) -> Self {
        self.scoring = scoring;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.group_size < 1 {
            return Err(GroupingError::config("group_size", "must be at least 1"));
        }
        if self.combination_cap == 0 {
            return Err(GroupingError::config("combination_cap", "must be positive"));
        }
        if self.workers < 1 {
            return Err(GroupingError::config("workers", "must be at least 1"));
        }
        if self.mode == InitMode::Random && self.time_budget.is_zero() {
            return Err(GroupingError::config("time_budget", "must be positive"));
        }
        self.search.validate()?;
        self.scoring.validate()
    }

    fn anytime(&self) -> AnytimeConfig {
        let mut config = AnytimeConfig::new(self.group_size)
            .with_iterations_per_run(self.iterations)
            .with_time_budget(self.time_budget)
            .with_workers(self.workers)
            .with_search(self.search.clone());
        config.seed = self.seed;
        config
    }
}

/// Final assignment handed to presentation collaborators.
#[derive(Debug, Clone)]
pub struct AssignmentOutcome {
    pub assignment: Assignment,

    /// Mean group score.
    pub score: f64,

    pub summary: Summary,
}

/// Assigns a survey roster to groups.
pub struct GroupAssigner;

impl GroupAssigner {
    /// Runs the configured flow over `roster`.
    pub fn run(
        survey: &Survey,
        roster: &[Respondent],
        config: &AssignerConfig,
    ) -> Result<AssignmentOutcome> {
        config.validate()?;
        let engine = ScoringEngine::new(survey, roster, &config.scoring)?;

        let (assignment, score) = match config.mode {
            InitMode::Strong => Self::run_strong(&engine, config)?,
            InitMode::Random => {
                let result = AnytimeRunner::run(&engine, &config.anytime())?;
                (result.best, result.best_score)
            }
        };

        let summary = Summary::of(&assignment);
        info!(
            mode = ?config.mode,
            respondents = roster.len(),
            groups = assignment.group_count(),
            score,
            "assignment complete"
        );

        Ok(AssignmentOutcome {
            assignment,
            score,
            summary,
        })
    }

    fn run_strong(engine: &ScoringEngine<'_>, config: &AssignerConfig) -> Result<(Assignment, f64)> {
        let mut rng = create_rng(config.seed);
        let init = StrongInitializer::new(config.group_size, config.combination_cap)
            .with_parallel(cfg!(feature = "parallel"));
        let mut assignment = init.initialize(engine, &mut rng)?;

        // The exchange search needs three groups; smaller rosters keep the
        // constructed assignment as is.
        if assignment.group_count() < 3 {
            let score = assignment.mean_score();
            return Ok((assignment, score));
        }

        let greedy = SearchConfig {
            initial_epsilon: 0.0,
            ..config.search.clone()
        };
        let mut search = LocalSearch::new(greedy)?;
        let result = search.refine(engine, &mut assignment, config.iterations, &mut rng)?;
        Ok((assignment, result.score))
    }
}
