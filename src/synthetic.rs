//! Synthetic cohorts with planted groups.
//!
//! Respondents are generated group by group so that each planted group
//! scores well by construction:
//!
//! - Multiple choice / checkbox, heterogeneous: members draw distinct
//!   options from a shuffled deck (refilled when it runs out)
//! - Multiple choice / checkbox, homogeneous: members share one option
//! - Isolation: either `ceil(group_size / 2)` or no minority members
//! - Scheduling: members share the same three busy blocks
//!
//! The roster is shuffled before it is returned so that no initializer
//! sees the planted order. The planted mean score is the yardstick the
//! optimizers are measured against.

use rand::seq::{IndexedRandom, SliceRandom};
use rand::Rng;

use crate::error::{GroupingError, Result};
use crate::model::{Answer, Assignment, Group, Preference, QuestionKind, Respondent, Survey};
use crate::scoring::{ScoringConfig, ScoringEngine};

/// Busy blocks shared by each planted group.
const SHARED_BUSY_BLOCKS: usize = 3;

/// A generated roster and its planted grouping.
#[derive(Debug, Clone)]
pub struct SyntheticCohort {
    /// Generated respondents, shuffled.
    pub respondents: Vec<Respondent>,

    /// The planted groups over `respondents`, with scores.
    pub planted: Assignment,

    /// Mean score of the planted groups.
    pub planted_score: f64,
}

/// Generates `count / group_size` planted groups of `group_size`
/// respondents each.
///
/// Multiple choice and checkbox questions need options; isolation
/// questions need at least one option besides the majority.
pub fn generate<R: Rng>(
    survey: &Survey,
    scoring: &ScoringConfig,
    group_size: usize,
    count: usize,
    rng: &mut R,
) -> Result<SyntheticCohort> {
    if group_size < 1 {
        return Err(GroupingError::config("group_size", "must be at least 1"));
    }
    if count < group_size {
        return Err(GroupingError::InsufficientRespondents {
            respondents: count,
            group_size,
        });
    }
    scoring.validate()?;
    check_options(survey)?;

    let groups = count / group_size;
    let n = groups * group_size;
    let id_question = survey.identification().id.clone();

    let mut planted: Vec<Respondent> = (0..n)
        .map(|i| {
            let name = (i + 1).to_string();
            Respondent::new(name.clone()).with_answer(id_question.clone(), name)
        })
        .collect();

    for members in planted.chunks_mut(group_size) {
        for question in survey.questions() {
            match &question.kind {
                QuestionKind::Identification => {}
                QuestionKind::MultipleChoice | QuestionKind::Checkbox => {
                    let list = question.kind.is_list();
                    let wrap = |option: &str| -> Answer {
                        if list {
                            Answer::List(vec![option.to_string()])
                        } else {
                            Answer::Single(option.to_string())
                        }
                    };
                    match question.preference {
                        Preference::Heterogeneous => {
                            let mut deck: Vec<&String> = Vec::new();
                            for member in members.iter_mut() {
                                if deck.is_empty() {
                                    deck = question.options.iter().collect();
                                    deck.shuffle(rng);
                                }
                                if let Some(option) = deck.pop() {
                                    member
                                        .answers
                                        .insert(question.id.clone(), wrap(option.as_str()));
                                }
                            }
                        }
                        Preference::Homogeneous => {
                            if let Some(option) = question.options.choose(rng) {
                                for member in members.iter_mut() {
                                    member
                                        .answers
                                        .insert(question.id.clone(), wrap(option.as_str()));
                                }
                            }
                        }
                    }
                }
                QuestionKind::Isolation { majority } => {
                    let minority_options: Vec<&String> =
                        question.options.iter().filter(|o| *o != majority).collect();
                    let minority = if rng.random_bool(0.5) {
                        group_size.div_ceil(2)
                    } else {
                        0
                    };
                    for (i, member) in members.iter_mut().enumerate() {
                        let option = if i < minority {
                            minority_options.choose(rng).map_or(majority, |o| *o)
                        } else {
                            majority
                        };
                        member
                            .answers
                            .insert(question.id.clone(), Answer::Single(option.clone()));
                    }
                }
                QuestionKind::Scheduling => {
                    let busy: Vec<String> = scoring
                        .schedule_blocks
                        .choose_multiple(rng, SHARED_BUSY_BLOCKS)
                        .cloned()
                        .collect();
                    for member in members.iter_mut() {
                        member
                            .answers
                            .insert(question.id.clone(), Answer::List(busy.clone()));
                    }
                }
                QuestionKind::Restrictive { .. } => {
                    for member in members.iter_mut() {
                        member
                            .answers
                            .insert(question.id.clone(), Answer::Single(String::new()));
                    }
                }
            }
        }
    }

    let mut order: Vec<usize> = (0..n).collect();
    order.shuffle(rng);
    let mut position = vec![0usize; n];
    for (new_index, &old_index) in order.iter().enumerate() {
        position[old_index] = new_index;
    }
    let respondents: Vec<Respondent> = order.iter().map(|&i| planted[i].clone()).collect();

    let planted_groups = (0..groups)
        .map(|g| {
            let members = (g * group_size..(g + 1) * group_size)
                .map(|i| position[i])
                .collect();
            Group::new(g + 1, members)
        })
        .collect();
    let mut planted = Assignment::from_groups(planted_groups, n)?;

    let engine = ScoringEngine::new(survey, &respondents, scoring)?;
    let planted_score = engine.rescore(&mut planted);

    Ok(SyntheticCohort {
        respondents,
        planted,
        planted_score,
    })
}

fn check_options(survey: &Survey) -> Result<()> {
    for question in survey.questions() {
        match &question.kind {
            QuestionKind::MultipleChoice | QuestionKind::Checkbox if question.options.is_empty() => {
                return Err(GroupingError::config(
                    "options",
                    format!("question '{}' has no options to draw from", question.id),
                ));
            }
            QuestionKind::Isolation { majority }
                if !question.options.iter().any(|o| o != majority) =>
            {
                return Err(GroupingError::config(
                    "options",
                    format!("question '{}' has no minority option", question.id),
                ));
            }
            _ => {}
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Question;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    fn survey() -> Survey {
        Survey::new(vec![
            Question::new("Name", QuestionKind::Identification, 0.0),
            Question::new("Major", QuestionKind::MultipleChoice, 4.0)
                .with_options(["Math", "History", "Physics", "Art"]),
            Question::new("Hobbies", QuestionKind::Checkbox, 2.0)
                .with_options(["chess", "golf", "film", "hiking", "cooking"]),
        ])
        .unwrap()
    }

    fn answer_of<'a>(cohort: &'a SyntheticCohort, member: usize, q: &str) -> &'a Answer {
        cohort.respondents[member].answer(q).unwrap()
    }

    #[test]
    fn test_requires_one_group() {
        let mut rng = StdRng::seed_from_u64(1);
        let err = generate(&survey(), &ScoringConfig::default(), 4, 3, &mut rng).unwrap_err();
        assert_eq!(
            err,
            GroupingError::InsufficientRespondents {
                respondents: 3,
                group_size: 4
            }
        );
    }

    #[test]
    fn test_heterogeneous_groups_reach_full_weight() {
        let mut rng = StdRng::seed_from_u64(7);
        let cohort = generate(&survey(), &ScoringConfig::default(), 4, 22, &mut rng).unwrap();

        assert_eq!(cohort.respondents.len(), 20);
        assert_eq!(cohort.planted.group_count(), 5);
        cohort.planted.validate().unwrap();
        // Distinct majors score 4/4 * 4; distinct hobbies carry no penalty.
        assert!((cohort.planted_score - 6.0).abs() < 1e-9);

        for group in cohort.planted.groups() {
            let majors: HashSet<&Answer> =
                group.members.iter().map(|&m| answer_of(&cohort, m, "Major")).collect();
            assert_eq!(majors.len(), 4);
        }
    }

    #[test]
    fn test_homogeneous_and_shared_blocks() {
        let survey = Survey::new(vec![
            Question::new("Name", QuestionKind::Identification, 0.0),
            Question::new("Dorm", QuestionKind::MultipleChoice, 1.0)
                .with_preference(Preference::Homogeneous)
                .with_options(["East", "West", "North"]),
            Question::new("Busy", QuestionKind::Scheduling, 3.0),
        ])
        .unwrap();
        let mut rng = StdRng::seed_from_u64(11);
        let cohort = generate(&survey, &ScoringConfig::default(), 3, 9, &mut rng).unwrap();

        for group in cohort.planted.groups() {
            let first = group.members[0];
            for &m in &group.members {
                assert_eq!(answer_of(&cohort, m, "Dorm"), answer_of(&cohort, first, "Dorm"));
                assert_eq!(answer_of(&cohort, m, "Busy"), answer_of(&cohort, first, "Busy"));
            }
            match answer_of(&cohort, first, "Busy") {
                Answer::List(blocks) => assert_eq!(blocks.len(), 3),
                other => panic!("unexpected answer {other:?}"),
            }
        }
        // One shared dorm: -(1/3); nine of twelve blocks free: 3 * 9/12.
        assert!((cohort.planted_score - (-1.0 / 3.0 + 2.25)).abs() < 1e-9);
    }

    #[test]
    fn test_isolation_minority_sizes() {
        let survey = Survey::new(vec![
            Question::new("Name", QuestionKind::Identification, 0.0),
            Question::new(
                "Gender",
                QuestionKind::Isolation {
                    majority: "Male".into(),
                },
                1.0,
            )
            .with_options(["Male", "Female"]),
        ])
        .unwrap();
        let mut rng = StdRng::seed_from_u64(3);
        let cohort = generate(&survey, &ScoringConfig::default(), 5, 50, &mut rng).unwrap();

        for group in cohort.planted.groups() {
            let minority = group
                .members
                .iter()
                .filter(|&&m| !answer_of(&cohort, m, "Gender").is("Male"))
                .count();
            assert!(minority == 0 || minority == 3, "minority of {minority}");
            assert_eq!(group.score, 0.0);
        }
    }

    #[test]
    fn test_reproducible_with_seed() {
        let a = generate(
            &survey(),
            &ScoringConfig::default(),
            4,
            16,
            &mut StdRng::seed_from_u64(5),
        )
        .unwrap();
        let b = generate(
            &survey(),
            &ScoringConfig::default(),
            4,
            16,
            &mut StdRng::seed_from_u64(5),
        )
        .unwrap();
        assert_eq!(a.respondents, b.respondents);
        assert_eq!(a.planted, b.planted);
    }

    #[test]
    fn test_rejects_missing_options() {
        let survey = Survey::new(vec![
            Question::new("Name", QuestionKind::Identification, 0.0),
            Question::new("Major", QuestionKind::MultipleChoice, 1.0),
        ])
        .unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        assert!(generate(&survey, &ScoringConfig::default(), 2, 4, &mut rng).is_err());
    }
}
