//! Anytime random-restart loop.
//!
//! # Algorithm
//!
//! While the elapsed time plus the average time per run fits in the
//! budget:
//!
//! 1. Reset the exploration rate
//! 2. Build a fresh random assignment
//! 3. Refine it with local search
//! 4. Keep it if its score strictly beats the best so far
//!
//! The budget is a soft deadline: a started run always completes.

use std::time::{Duration, Instant};

use rand::Rng;
use tracing::{debug, info};

use super::config::AnytimeConfig;
use crate::error::{GroupingError, Result};
use crate::init::RandomInitializer;
use crate::model::Assignment;
use crate::random::create_rng;
use crate::scoring::ScoringEngine;
use crate::search::LocalSearch;

/// Result of an anytime run.
#[derive(Debug, Clone)]
pub struct AnytimeResult {
    /// Best assignment found across all restarts.
    pub best: Assignment,

    /// Mean group score of `best`.
    pub best_score: f64,

    /// Completed restarts (over all workers).
    pub runs: usize,

    /// Wall-clock time spent.
    pub elapsed: Duration,

    /// Best score after each completed restart, in completion order.
    /// Non-decreasing.
    pub best_history: Vec<f64>,
}

/// Outcome of one worker's restart loop.
struct WorkerOutcome {
    best: Option<(Assignment, f64)>,
    /// (completion time since start, run score) per restart.
    runs: Vec<(Duration, f64)>,
}

/// Executes time-budgeted random restarts.
pub struct AnytimeRunner;

impl AnytimeRunner {
    /// Runs the restart loop with generators seeded from `config.seed`.
    pub fn run(engine: &ScoringEngine<'_>, config: &AnytimeConfig) -> Result<AnytimeResult> {
        config.validate()?;
        let start = Instant::now();

        #[cfg(feature = "parallel")]
        if config.workers > 1 {
            use rayon::prelude::*;

            let master = config.seed.unwrap_or_else(rand::random);
            let outcomes: Vec<Result<WorkerOutcome>> = (0..config.workers)
                .into_par_iter()
                .map(|worker| {
                    let seed = crate::random::derive_seed(master, worker);
                    let mut rng = create_rng(Some(seed));
                    restart_loop(engine, config, &mut rng, start)
                })
                .collect();
            let outcomes = outcomes.into_iter().collect::<Result<Vec<_>>>()?;
            return merge(outcomes, start);
        }

        let mut rng = create_rng(config.seed);
        let outcome = restart_loop(engine, config, &mut rng, start)?;
        merge(vec![outcome], start)
    }

    /// Runs a single restart loop on a caller-supplied generator.
    pub fn run_with_rng<R: Rng>(
        engine: &ScoringEngine<'_>,
        config: &AnytimeConfig,
        rng: &mut R,
    ) -> Result<AnytimeResult> {
        config.validate()?;
        let start = Instant::now();
        let outcome = restart_loop(engine, config, rng, start)?;
        merge(vec![outcome], start)
    }
}

fn restart_loop<R: Rng>(
    engine: &ScoringEngine<'_>,
    config: &AnytimeConfig,
    rng: &mut R,
    start: Instant,
) -> Result<WorkerOutcome> {
    let mut search = LocalSearch::new(config.search.clone())?;
    let mut best: Option<(Assignment, f64)> = None;
    let mut runs = Vec::new();
    let mut average = Duration::ZERO;

    while start.elapsed() + average < config.time_budget {
        search.reset();
        let mut assignment = RandomInitializer::initialize(engine, config.group_size, rng)?;
        let result = search.refine(engine, &mut assignment, config.iterations_per_run, rng)?;

        if best.as_ref().is_none_or(|(_, score)| result.score > *score) {
            debug!(run = runs.len() + 1, score = result.score, "new best assignment");
            best = Some((assignment, result.score));
        }

        let elapsed = start.elapsed();
        runs.push((elapsed, result.score));
        average = elapsed / runs.len() as u32;
    }

    Ok(WorkerOutcome { best, runs })
}

fn merge(outcomes: Vec<WorkerOutcome>, start: Instant) -> Result<AnytimeResult> {
    let mut runs: Vec<(Duration, f64)> = Vec::new();
    let mut best: Option<(Assignment, f64)> = None;

    for outcome in outcomes {
        runs.extend(outcome.runs);
        if let Some((assignment, score)) = outcome.best {
            if best.as_ref().is_none_or(|(_, b)| score > *b) {
                best = Some((assignment, score));
            }
        }
    }

    let (best, best_score) = best.ok_or(GroupingError::NoRunCompleted)?;

    runs.sort_by(|a, b| a.0.cmp(&b.0));
    let mut best_history = Vec::with_capacity(runs.len());
    let mut running = f64::NEG_INFINITY;
    for &(_, score) in &runs {
        running = running.max(score);
        best_history.push(running);
    }

    let elapsed = start.elapsed();
    info!(
        runs = runs.len(),
        best_score,
        elapsed_ms = elapsed.as_millis() as u64,
        "anytime search finished"
    );

    Ok(AnytimeResult {
        best,
        best_score,
        runs: runs.len(),
        elapsed,
        best_history,
    })
}
