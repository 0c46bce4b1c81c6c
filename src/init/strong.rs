//! Greedy slot-by-slot construction.
//!
//! # Algorithm
//!
//! 1. Shuffle the pool of unplaced respondents
//! 2. Enumerate `group_size`-combinations of the shuffled pool, keeping
//!    only the first `combination_cap` when the space is larger
//! 3. Score each candidate (memoized by membership) and commit the best
//! 4. Repeat while the pool can fill a full group
//! 5. Insert leftovers one at a time into the group whose score rises
//!    the most, never exceeding a per-group ceiling
//!
//! Shuffling before a capped enumeration means the sampled subsets are not
//! biased toward any respondent's roster position, although the sample is
//! not uniform over all subsets.

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

use super::cache::{CandidateKey, ScoreCache};
use super::check_group_size;
use super::combinations::{n_choose_k, Combinations};
use crate::error::{GroupingError, Result};
use crate::model::{Assignment, Group};
use crate::scoring::ScoringEngine;

/// Greedy combinatorial initializer.
///
/// # Examples
///
/// ```
/// use u_grouping::init::StrongInitializer;
///
/// let init = StrongInitializer::new(4, 10_000).with_parallel(false);
/// assert_eq!(init.group_size, 4);
/// ```
#[derive(Debug, Clone)]
pub struct StrongInitializer {
    pub group_size: usize,

    /// Maximum candidates scored per group slot.
    pub combination_cap: usize,

    /// Score uncached candidates with rayon (requires the `parallel` feature).
    pub parallel: bool,
}

impl StrongInitializer {
    /// Considers at most `combination_cap` candidate groups per round.
    pub fn new(group_size: usize, combination_cap: usize) -> Self {
        Self {
            group_size,
            combination_cap,
            parallel: false,
        }
    }

    /// Scores uncached candidates on the rayon pool (`parallel` feature).
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Builds an assignment of the engine's roster.
    pub fn initialize<R: Rng>(&self, engine: &ScoringEngine<'_>, rng: &mut R) -> Result<Assignment> {
        let n = engine.roster().len();
        check_group_size(n, self.group_size)?;
        if self.combination_cap == 0 {
            return Err(GroupingError::config("combination_cap", "must be positive"));
        }

        let mut pool: Vec<usize> = (0..n).collect();
        let mut cache = ScoreCache::new();
        let mut groups: Vec<Group> = Vec::with_capacity(n / self.group_size);

        while pool.len() >= self.group_size {
            pool.shuffle(rng);

            let space = n_choose_k(pool.len(), self.group_size);
            if space > self.combination_cap as u128 {
                debug!(
                    slot = groups.len() + 1,
                    space = %space,
                    cap = self.combination_cap,
                    "sampling capped candidate space"
                );
            }

            let candidates: Vec<Vec<usize>> = Combinations::new(pool.len(), self.group_size)
                .take(self.combination_cap)
                .map(|idx| idx.into_iter().map(|i| pool[i]).collect())
                .collect();
            let scores = self.score_candidates(engine, &candidates, &mut cache);

            let mut best: Option<(usize, f64)> = None;
            for (i, &score) in scores.iter().enumerate() {
                if best.is_none_or(|(_, b)| score > b) {
                    best = Some((i, score));
                }
            }
            let (winner, score) = best.ok_or_else(|| {
                GroupingError::config("combination_cap", "no candidate group was produced")
            })?;

            let members = candidates[winner].clone();
            pool.retain(|r| !members.contains(r));
            let mut group = Group::new(groups.len() + 1, members);
            group.score = score;
            groups.push(group);
        }

        debug!(
            groups = groups.len(),
            leftovers = pool.len(),
            cached = cache.len(),
            cache_hits = cache.hits(),
            "strong construction placed full groups"
        );

        if !pool.is_empty() {
            self.place_leftovers(engine, &mut groups, &pool)?;
        }

        let mut assignment = Assignment::from_groups(groups, n)?;
        engine.rescore(&mut assignment);
        Ok(assignment)
    }

    /// Greedy marginal insertion of respondents that cannot form a group.
    fn place_leftovers(
        &self,
        engine: &ScoringEngine<'_>,
        groups: &mut [Group],
        leftovers: &[usize],
    ) -> Result<()> {
        let ceiling = leftover_ceiling(self.group_size, groups.len(), leftovers.len());

        let mut trial = Vec::with_capacity(ceiling);
        for &respondent in leftovers {
            let mut best: Option<(usize, f64)> = None;
            for (i, group) in groups.iter().enumerate() {
                if group.len() >= ceiling {
                    continue;
                }
                trial.clear();
                trial.extend_from_slice(&group.members);
                trial.push(respondent);
                let delta = engine.score_members(&trial) - group.score;
                if best.is_none_or(|(_, d)| delta > d) {
                    best = Some((i, delta));
                }
            }

            let (target, delta) = best.ok_or_else(|| {
                GroupingError::config("group_size", "no group can absorb leftover respondents")
            })?;
            let group = &mut groups[target];
            group.members.push(respondent);
            group.size += 1;
            group.score += delta;
        }
        Ok(())
    }

    fn score_candidates(
        &self,
        engine: &ScoringEngine<'_>,
        candidates: &[Vec<usize>],
        cache: &mut ScoreCache,
    ) -> Vec<f64> {
        let keys: Vec<CandidateKey> = candidates.iter().map(|c| CandidateKey::new(c)).collect();

        let mut scores = vec![0.0; candidates.len()];
        let mut missing = Vec::new();
        for (i, key) in keys.iter().enumerate() {
            match cache.get(key) {
                Some(score) => scores[i] = score,
                None => missing.push(i),
            }
        }

        let fresh = evaluate(engine, candidates, &missing, self.parallel);
        for (&i, score) in missing.iter().zip(fresh) {
            scores[i] = score;
            cache.insert(keys[i].clone(), score);
        }
        scores
    }
}

/// Largest size a group may reach while absorbing leftovers: one over
/// the target, raised until the groups have room for every leftover.
fn leftover_ceiling(group_size: usize, groups: usize, leftovers: usize) -> usize {
    let mut ceiling = group_size + 1;
    if groups < leftovers {
        while (ceiling - group_size) * groups < leftovers {
            ceiling += 1;
        }
    }
    ceiling
}

#[cfg(feature = "parallel")]
fn evaluate(
    engine: &ScoringEngine<'_>,
    candidates: &[Vec<usize>],
    missing: &[usize],
    parallel: bool,
) -> Vec<f64> {
    use rayon::prelude::*;

    if parallel {
        missing
            .par_iter()
            .map(|&i| engine.score_members(&candidates[i]))
            .collect()
    } else {
        missing
            .iter()
            .map(|&i| engine.score_members(&candidates[i]))
            .collect()
    }
}

#[cfg(not(feature = "parallel"))]
fn evaluate(
    engine: &ScoringEngine<'_>,
    candidates: &[Vec<usize>],
    missing: &[usize],
    _parallel: bool,
) -> Vec<f64> {
    missing
        .iter()
        .map(|&i| engine.score_members(&candidates[i]))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::init::tests::fixture;
    use crate::model::{Preference, Question, QuestionKind, Respondent, Survey};
    use crate::scoring::ScoringConfig;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    /// Best mean score over every partition of `0..n` into groups of `k`,
    /// and the number of partitions visited.
    fn brute_force_best(engine: &ScoringEngine<'_>, n: usize, k: usize) -> (f64, usize) {
        fn recurse(
            engine: &ScoringEngine<'_>,
            remaining: Vec<usize>,
            k: usize,
            acc: f64,
            groups: usize,
            best: &mut f64,
            visited: &mut usize,
        ) {
            if remaining.is_empty() {
                *best = best.max(acc / groups as f64);
                *visited += 1;
                return;
            }
            // Fix the first remaining respondent to avoid permuted duplicates.
            let first = remaining[0];
            let rest = &remaining[1..];
            for combo in Combinations::new(rest.len(), k - 1) {
                let mut members = vec![first];
                members.extend(combo.iter().map(|&i| rest[i]));
                let next: Vec<usize> = rest
                    .iter()
                    .copied()
                    .filter(|r| !members.contains(r))
                    .collect();
                let score = engine.score_members(&members);
                recurse(engine, next, k, acc + score, groups + 1, best, visited);
            }
        }

        let mut best = f64::NEG_INFINITY;
        let mut visited = 0;
        recurse(engine, (0..n).collect(), k, 0.0, 0, &mut best, &mut visited);
        (best, visited)
    }

    /// Two planted groups of four: agreeing on dorm, sharing busy blocks,
    /// and holding distinct hobbies.
    fn planted() -> (Survey, Vec<Respondent>) {
        let survey = Survey::new(vec![
            Question::new("Name", QuestionKind::Identification, 0.0),
            Question::new("Dorm", QuestionKind::MultipleChoice, 4.0)
                .with_preference(Preference::Homogeneous),
            Question::new("Busy", QuestionKind::Scheduling, 3.0),
            Question::new("Hobbies", QuestionKind::Checkbox, 2.0),
        ])
        .unwrap();
        let roster = (0..8)
            .map(|i| {
                let (dorm, busy) = if i % 2 == 0 {
                    ("East", vec!["9L", "10"])
                } else {
                    ("West", vec!["11", "12"])
                };
                let name = format!("s{i}");
                Respondent::new(name.clone())
                    .with_answer("Name", name)
                    .with_answer("Dorm", dorm)
                    .with_answer("Busy", busy)
                    .with_answer("Hobbies", vec![format!("h{i}")])
            })
            .collect();
        (survey, roster)
    }

    #[test]
    fn test_matches_brute_force_on_small_roster() {
        let (survey, roster) = planted();
        let config = ScoringConfig::default();
        let engine = ScoringEngine::new(&survey, &roster, &config).unwrap();
        let (optimum, partitions) = brute_force_best(&engine, 8, 4);
        // Two groups of four out of eight: 35 distinct partitions.
        assert_eq!(partitions, 35);

        for seed in [3u64, 11, 42] {
            let mut rng = StdRng::seed_from_u64(seed);
            // 8 choose 4 = 70 candidates, all scored.
            let a = StrongInitializer::new(4, 10_000)
                .initialize(&engine, &mut rng)
                .unwrap();
            a.validate().unwrap();
            assert!(
                (a.mean_score() - optimum).abs() < 1e-9,
                "strong {} vs brute force {}",
                a.mean_score(),
                optimum
            );
        }
    }

    #[test]
    fn test_scores_are_fresh() {
        let (survey, roster) = fixture(13);
        let config = ScoringConfig::default();
        let engine = ScoringEngine::new(&survey, &roster, &config).unwrap();
        let mut rng = StdRng::seed_from_u64(5);
        let a = StrongInitializer::new(4, 50)
            .initialize(&engine, &mut rng)
            .unwrap();
        a.validate().unwrap();
        assert_eq!(a.group_count(), 3);
        for g in a.groups() {
            assert!((g.score - engine.score_group(g)).abs() < 1e-9);
            assert!(g.len() <= 5);
        }
    }

    #[test]
    fn test_leftovers_exceeding_groups_raise_ceiling() {
        // 7 = 1*4 + 3 leftovers with a single group.
        let (survey, roster) = fixture(7);
        let config = ScoringConfig::default();
        let engine = ScoringEngine::new(&survey, &roster, &config).unwrap();
        let mut rng = StdRng::seed_from_u64(5);
        let a = StrongInitializer::new(4, 100)
            .initialize(&engine, &mut rng)
            .unwrap();
        assert_eq!(a.group_count(), 1);
        assert_eq!(a.groups()[0].len(), 7);
    }

    #[test]
    fn test_leftover_ceiling() {
        assert_eq!(leftover_ceiling(4, 3, 2), 5);
        assert_eq!(leftover_ceiling(4, 1, 3), 7);
        assert_eq!(leftover_ceiling(4, 2, 3), 6);
    }

    #[test]
    fn test_invalid_inputs() {
        let (survey, roster) = fixture(3);
        let config = ScoringConfig::default();
        let engine = ScoringEngine::new(&survey, &roster, &config).unwrap();
        let mut rng = StdRng::seed_from_u64(5);
        assert!(matches!(
            StrongInitializer::new(4, 10).initialize(&engine, &mut rng),
            Err(GroupingError::InsufficientRespondents { .. })
        ));
        assert!(StrongInitializer::new(2, 0).initialize(&engine, &mut rng).is_err());
        assert!(StrongInitializer::new(0, 10).initialize(&engine, &mut rng).is_err());
    }
}
