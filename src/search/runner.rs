//! Epsilon-greedy pairwise swap search.
//!
//! # Algorithm
//!
//! 1. Pick two groups (biased toward lifting the weakest group)
//! 2. Decay epsilon
//! 3. With probability `1 - epsilon`, try every member pairing between the
//!    two groups and keep the exchange with the best combined score, if it
//!    strictly improves; otherwise swap one random member of each
//! 4. Every checkpoint, stop once two consecutive checkpoints show a
//!    relative improvement below the convergence threshold
//!
//! Trial exchanges are scored on scratch copies of the two member lists;
//! the assignment is only mutated by committed swaps.

use rand::seq::IndexedRandom;
use rand::Rng;
use tracing::debug;

use super::config::SearchConfig;
use crate::error::{GroupingError, Result};
use crate::model::Assignment;
use crate::scoring::ScoringEngine;

/// Result of one [`LocalSearch::refine`] call.
#[derive(Debug, Clone)]
pub struct SearchResult {
    /// Mean group score after the last iteration.
    pub score: f64,

    /// Iterations actually executed.
    pub iterations: usize,

    /// Whether the run stopped early on convergence.
    pub converged: bool,

    /// Committed exchanges that improved the pair of groups.
    pub improving_swaps: usize,

    /// Unconditional exploration swaps.
    pub random_swaps: usize,

    /// Mean group score at each checkpoint.
    pub score_history: Vec<f64>,
}

/// What a single iteration did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// The best exchange improved the two groups and was committed.
    Improved,
    /// No exchange improved the two groups; nothing changed.
    Unchanged,
    /// A random exchange was committed regardless of score.
    Explored,
}

/// Refines assignments in place by swapping members between groups.
///
/// The exploration rate is state: it decays across iterations and carries
/// over between `refine` calls until [`reset`](Self::reset).
#[derive(Debug, Clone)]
pub struct LocalSearch {
    config: SearchConfig,
    epsilon: f64,
}

impl LocalSearch {
    /// Validates `config` and starts at its initial exploration rate.
    pub fn new(config: SearchConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            epsilon: config.initial_epsilon,
            config,
        })
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Current exploration probability.
    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// Restores the exploration probability to its initial value.
    pub fn reset(&mut self) {
        self.epsilon = self.config.initial_epsilon;
    }

    /// Runs up to `iterations` swap steps on `assignment`.
    ///
    /// Cached group scores are consistent on return.
    pub fn refine<R: Rng>(
        &mut self,
        engine: &ScoringEngine<'_>,
        assignment: &mut Assignment,
        iterations: usize,
        rng: &mut R,
    ) -> Result<SearchResult> {
        let groups = assignment.group_count();
        if iterations > 0 && groups < 3 {
            return Err(GroupingError::TooFewGroups { groups });
        }

        let discount = self.config.discount(iterations);
        let interval = self.config.checkpoint_interval;

        let mut previous_sum = 0.0;
        let mut stable = false;
        let mut converged = false;
        let mut executed = 0usize;
        let mut improving_swaps = 0usize;
        let mut random_swaps = 0usize;
        let mut score_history = Vec::new();

        for i in 0..iterations {
            if i % interval == 0 {
                let sum = assignment.score_sum();
                score_history.push(sum / groups as f64);
                debug!(iteration = i, mean = sum / groups as f64, epsilon = self.epsilon, "checkpoint");

                if previous_sum != 0.0
                    && (sum - previous_sum) / f64::abs(previous_sum)
                        < self.config.convergence_threshold
                {
                    if stable {
                        converged = true;
                        break;
                    }
                    stable = true;
                } else if stable {
                    stable = false;
                }

                if !stable {
                    previous_sum = sum;
                }
            }

            match self.step(engine, assignment, discount, rng)? {
                StepOutcome::Improved => improving_swaps += 1,
                StepOutcome::Explored => random_swaps += 1,
                StepOutcome::Unchanged => {}
            }
            executed += 1;
        }

        let score = engine.rescore(assignment);
        debug!(
            iterations = executed,
            converged,
            improving_swaps,
            random_swaps,
            score,
            "local search finished"
        );

        Ok(SearchResult {
            score,
            iterations: executed,
            converged,
            improving_swaps,
            random_swaps,
            score_history,
        })
    }

    /// One selection + exchange step. `discount` is applied to epsilon
    /// before the explore/exploit draw.
    pub fn step<R: Rng>(
        &mut self,
        engine: &ScoringEngine<'_>,
        assignment: &mut Assignment,
        discount: f64,
        rng: &mut R,
    ) -> Result<StepOutcome> {
        let (g1, g2) = self.select_groups(assignment, rng)?;

        self.epsilon *= discount;

        if rng.random::<f64>() > self.epsilon {
            match best_exchange(engine, assignment, g1, g2) {
                Some(exchange) => {
                    assignment.swap(g1, exchange.from_first, g2, exchange.from_second)?;
                    let groups = assignment.groups_mut();
                    groups[g1].score = exchange.first_score;
                    groups[g2].score = exchange.second_score;
                    Ok(StepOutcome::Improved)
                }
                None => Ok(StepOutcome::Unchanged),
            }
        } else {
            let groups = assignment.groups();
            let (Some(&a), Some(&b)) = (
                groups[g1].members.choose(rng),
                groups[g2].members.choose(rng),
            ) else {
                return Ok(StepOutcome::Unchanged);
            };
            assignment.swap(g1, a, g2, b)?;
            let first = engine.score_group(&assignment.groups()[g1]);
            let second = engine.score_group(&assignment.groups()[g2]);
            let groups = assignment.groups_mut();
            groups[g1].score = first;
            groups[g2].score = second;
            Ok(StepOutcome::Explored)
        }
    }

    /// Picks the pair of group positions to exchange between.
    ///
    /// With probability `1 - group_bias` the first group is the weakest
    /// and the strongest is excluded from the second pick; otherwise the
    /// first group is uniform.
    pub fn select_groups<R: Rng>(
        &self,
        assignment: &Assignment,
        rng: &mut R,
    ) -> Result<(usize, usize)> {
        let groups = assignment.groups();
        if groups.len() < 3 {
            return Err(GroupingError::TooFewGroups {
                groups: groups.len(),
            });
        }

        let (first, avoid) = if rng.random::<f64>() > self.config.group_bias {
            let mut weakest = 0;
            let mut strongest = 0;
            for (i, g) in groups.iter().enumerate() {
                if g.score < groups[weakest].score {
                    weakest = i;
                }
                if g.score > groups[strongest].score {
                    strongest = i;
                }
            }
            (weakest, Some(strongest))
        } else {
            (rng.random_range(0..groups.len()), None)
        };

        let candidates: Vec<usize> = (0..groups.len())
            .filter(|&g| g != first && Some(g) != avoid)
            .collect();
        let second = candidates[rng.random_range(0..candidates.len())];
        Ok((first, second))
    }
}

/// A committed-worthy exchange between two groups.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Exchange {
    from_first: usize,
    from_second: usize,
    first_score: f64,
    second_score: f64,
}

/// Best strictly improving single exchange between groups `a` and `b`,
/// ties resolved in favor of the first pairing found.
fn best_exchange(
    engine: &ScoringEngine<'_>,
    assignment: &Assignment,
    a: usize,
    b: usize,
) -> Option<Exchange> {
    let first = &assignment.groups()[a];
    let second = &assignment.groups()[b];

    let mut best_total = first.score + second.score;
    let mut best = None;

    let mut trial_first = first.members.clone();
    let mut trial_second = second.members.clone();

    for (i, &x) in first.members.iter().enumerate() {
        for (j, &y) in second.members.iter().enumerate() {
            trial_first[i] = y;
            trial_second[j] = x;
            let first_score = engine.score_members(&trial_first);
            let second_score = engine.score_members(&trial_second);
            trial_first[i] = x;
            trial_second[j] = y;

            if first_score + second_score > best_total {
                best_total = first_score + second_score;
                best = Some(Exchange {
                    from_first: x,
                    from_second: y,
                    first_score,
                    second_score,
                });
            }
        }
    }
    best
}
