//! Uniform random partition.

use rand::seq::SliceRandom;
use rand::Rng;

use super::check_group_size;
use crate::error::Result;
use crate::model::{Assignment, Group};
use crate::scoring::ScoringEngine;

/// Builds a baseline assignment by shuffling the roster and slicing it
/// into consecutive groups.
///
/// Leftovers (`n % group_size`) become one extra undersized group when
/// they are exactly one short of a full group (and more than one person,
/// with `group_size >= 3`); otherwise they are dealt round-robin onto the
/// existing groups.
pub struct RandomInitializer;

impl RandomInitializer {
    /// Shuffles the roster and deals it into groups of `group_size`.
    pub fn initialize<R: Rng>(
        engine: &ScoringEngine<'_>,
        group_size: usize,
        rng: &mut R,
    ) -> Result<Assignment> {
        let n = engine.roster().len();
        let forms_extra = |remainder: usize| {
            remainder + 1 == group_size && remainder != 1 && group_size >= 3
        };
        // A roster one short of a single group still yields that group.
        if !forms_extra(n) {
            check_group_size(n, group_size)?;
        }

        let mut order: Vec<usize> = (0..n).collect();
        order.shuffle(rng);

        let full = n / group_size;
        let mut groups: Vec<Group> = order[..full * group_size]
            .chunks(group_size)
            .enumerate()
            .map(|(i, chunk)| Group::new(i + 1, chunk.to_vec()))
            .collect();

        let leftovers = &order[full * group_size..];
        if !leftovers.is_empty() {
            if forms_extra(leftovers.len()) {
                groups.push(Group::new(full + 1, leftovers.to_vec()));
            } else {
                for (j, &respondent) in leftovers.iter().enumerate() {
                    let group = &mut groups[j % full];
                    group.members.push(respondent);
                    group.size += 1;
                }
            }
        }

        let mut assignment = Assignment::from_groups(groups, n)?;
        engine.rescore(&mut assignment);
        Ok(assignment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::init::tests::fixture;
    use crate::scoring::ScoringConfig;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn sizes(n: usize, group_size: usize) -> Vec<usize> {
        let (survey, roster) = fixture(n);
        let config = ScoringConfig::default();
        let engine = ScoringEngine::new(&survey, &roster, &config).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        let a = RandomInitializer::initialize(&engine, group_size, &mut rng).unwrap();
        a.validate().unwrap();
        for g in a.groups() {
            assert_eq!(g.size, g.len());
            assert!((g.score - engine.score_group(g)).abs() < 1e-12);
        }
        a.groups().iter().map(|g| g.len()).collect()
    }

    #[test]
    fn test_even_split() {
        assert_eq!(sizes(12, 4), vec![4, 4, 4]);
    }

    #[test]
    fn test_remainder_one_short_forms_group() {
        // 11 = 2*4 + 3, and 3 + 1 == 4
        assert_eq!(sizes(11, 4), vec![4, 4, 3]);
    }

    #[test]
    fn test_remainder_distributed_round_robin() {
        // 14 = 3*4 + 2: spread onto the first two groups
        assert_eq!(sizes(14, 4), vec![5, 5, 4]);
        // 13 = 3*4 + 1
        assert_eq!(sizes(13, 4), vec![5, 4, 4]);
        // 9 = 4*2 + 1 with group size 2: never an extra group
        assert_eq!(sizes(9, 2), vec![3, 2, 2, 2]);
    }

    #[test]
    fn test_remainder_wraps_when_more_than_groups() {
        // 7 = 1*5 + 2, remainder 2 is not one short of 5
        assert_eq!(sizes(7, 5), vec![7]);
    }

    #[test]
    fn test_undersized_roster_one_short() {
        assert_eq!(sizes(3, 4), vec![3]);
    }

    #[test]
    fn test_too_few_respondents() {
        let (survey, roster) = fixture(2);
        let config = ScoringConfig::default();
        let engine = ScoringEngine::new(&survey, &roster, &config).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        assert!(RandomInitializer::initialize(&engine, 4, &mut rng).is_err());
        assert!(RandomInitializer::initialize(&engine, 0, &mut rng).is_err());
    }

    #[test]
    fn test_every_respondent_placed_once() {
        let (survey, roster) = fixture(23);
        let config = ScoringConfig::default();
        let engine = ScoringEngine::new(&survey, &roster, &config).unwrap();
        let mut rng = StdRng::seed_from_u64(9);
        let a = RandomInitializer::initialize(&engine, 4, &mut rng).unwrap();
        let mut all: Vec<usize> = a.groups().iter().flat_map(|g| g.members.clone()).collect();
        all.sort_unstable();
        assert_eq!(all, (0..23).collect::<Vec<_>>());
    }

    proptest! {
        #[test]
        fn prop_random_partition_is_valid(
            n in 1usize..40,
            group_size in 1usize..7,
            seed in any::<u64>(),
        ) {
            prop_assume!(n >= group_size);
            let (survey, roster) = fixture(n);
            let config = ScoringConfig::default();
            let engine = ScoringEngine::new(&survey, &roster, &config).unwrap();
            let mut rng = StdRng::seed_from_u64(seed);

            let a = RandomInitializer::initialize(&engine, group_size, &mut rng).unwrap();
            prop_assert!(a.validate().is_ok());
            prop_assert_eq!(a.respondent_count(), n);
            prop_assert_eq!(a.groups().iter().map(|g| g.len()).sum::<usize>(), n);
            for (i, g) in a.groups().iter().enumerate() {
                prop_assert_eq!(g.number, i + 1);
            }
        }
    }
}
