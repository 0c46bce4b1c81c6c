//! Group scoring over heterogeneous question kinds.
//!
//! # Contributions per question kind
//!
//! Let `w` be the question weight with its preference applied
//! (negative for homogeneous questions) and `n` the member count.
//!
//! - **MultipleChoice**: `d / n * w`, `d` = distinct answers.
//! - **Checkbox**: `w * max(0, 1 - sum(c(v)^2 for c(v) > 1) / (O * T))`,
//!   `c(v)` = members selecting `v`, `T` = total (member, value) pairs,
//!   `O` = distinct selections.
//! - **Scheduling**: `|w| * min(free, U) / U`, `free` = blocks no member
//!   is busy in, `U` = usable block count.
//! - **Restrictive**: `-w` for every associated-question selection of
//!   every member that appears among the group's selections on the
//!   restrictive question.
//! - **Isolation**: `-w` when exactly one member is outside the majority
//!   option, `-w / 3` when exactly two are and `n > 4`, else 0.

use std::collections::{HashMap, HashSet};

use super::config::ScoringConfig;
use crate::error::{GroupingError, Result};
use crate::model::{Answer, Assignment, Group, Question, QuestionKind, Respondent, Survey};

/// Scores groups of roster members against a survey.
///
/// Pure: scoring never mutates its inputs and draws no randomness, so two
/// calls on the same membership return the same value.
#[derive(Debug, Clone, Copy)]
pub struct ScoringEngine<'a> {
    survey: &'a Survey,
    roster: &'a [Respondent],
    config: &'a ScoringConfig,
}

impl<'a> ScoringEngine<'a> {
    /// Creates an engine after checking the configuration and that every
    /// respondent answered every question.
    pub fn new(
        survey: &'a Survey,
        roster: &'a [Respondent],
        config: &'a ScoringConfig,
    ) -> Result<Self> {
        config.validate()?;
        let has_scheduling = survey
            .questions()
            .iter()
            .any(|q| q.kind == QuestionKind::Scheduling);
        if has_scheduling && config.usable_block_count() == 0 {
            return Err(GroupingError::config(
                "schedule_blocks",
                "scheduling questions need at least one block",
            ));
        }
        survey.check_roster(roster)?;
        Ok(Self {
            survey,
            roster,
            config,
        })
    }

    /// Question set the engine scores against.
    pub fn survey(&self) -> &'a Survey {
        self.survey
    }

    /// Respondents that group member indices refer to.
    pub fn roster(&self) -> &'a [Respondent] {
        self.roster
    }

    /// Delimiter and schedule settings in use.
    pub fn config(&self) -> &'a ScoringConfig {
        self.config
    }

    /// Total score of a membership: the sum of every question's contribution.
    pub fn score_members(&self, members: &[usize]) -> f64 {
        self.survey
            .questions()
            .iter()
            .map(|q| self.contribution(q, members))
            .sum()
    }

    /// Scores the group's current members, ignoring its cached score.
    pub fn score_group(&self, group: &Group) -> f64 {
        self.score_members(&group.members)
    }

    /// Mean group score of an assignment, recomputed from membership.
    pub fn mean_score(&self, assignment: &Assignment) -> f64 {
        let groups = assignment.groups();
        if groups.is_empty() {
            return 0.0;
        }
        groups.iter().map(|g| self.score_group(g)).sum::<f64>() / groups.len() as f64
    }

    /// Recomputes every cached group score and returns the mean.
    pub fn rescore(&self, assignment: &mut Assignment) -> f64 {
        for group in assignment.groups_mut() {
            group.score = self.score_members(&group.members);
        }
        assignment.mean_score()
    }

    /// Contribution of a single question to a membership's score.
    pub fn contribution(&self, question: &Question, members: &[usize]) -> f64 {
        if members.is_empty() {
            return 0.0;
        }
        match &question.kind {
            QuestionKind::Identification => 0.0,
            QuestionKind::MultipleChoice => self.multiple_choice(question, members),
            QuestionKind::Checkbox => self.checkbox(question, members),
            QuestionKind::Scheduling => self.scheduling(question, members),
            QuestionKind::Restrictive { associated } => {
                self.restrictive(question, associated, members)
            }
            QuestionKind::Isolation { majority } => self.isolation(question, majority, members),
        }
    }

    fn answers<'q>(&'q self, question: &'q str, members: &'q [usize]) -> impl Iterator<Item = &'a Answer> + 'q
    where
        'a: 'q,
    {
        members
            .iter()
            .filter_map(move |&m| self.roster.get(m).and_then(|r| r.answer(question)))
    }

    fn multiple_choice(&self, question: &Question, members: &[usize]) -> f64 {
        let distinct: HashSet<&Answer> = self.answers(&question.id, members).collect();
        distinct.len() as f64 / members.len() as f64 * question.signed_weight()
    }

    fn checkbox(&self, question: &Question, members: &[usize]) -> f64 {
        let delimiter = self.config.list_delimiter.as_str();
        let mut counts: HashMap<&str, usize> = HashMap::new();
        let mut total = 0usize;
        for answer in self.answers(&question.id, members) {
            // A member counts once per value, however often it is listed.
            let chosen: HashSet<&str> = answer.selections(delimiter).collect();
            total += chosen.len();
            for selection in chosen {
                *counts.entry(selection).or_insert(0) += 1;
            }
        }
        if total == 0 {
            return 0.0;
        }

        let squared: usize = counts.values().filter(|&&c| c > 1).map(|&c| c * c).sum();
        let options = counts.len();
        let spread = (1.0 - squared as f64 / (options * total) as f64).max(0.0);
        spread * question.signed_weight()
    }

    fn scheduling(&self, question: &Question, members: &[usize]) -> f64 {
        let delimiter = self.config.list_delimiter.as_str();
        let busy: HashSet<&str> = self
            .answers(&question.id, members)
            .flat_map(|a| a.selections(delimiter))
            .collect();
        let free = self
            .config
            .schedule_blocks
            .iter()
            .filter(|b| !busy.contains(b.as_str()))
            .count();
        let usable = self.config.usable_block_count();
        question.weight * (free.min(usable) as f64 / usable as f64)
    }

    fn restrictive(&self, question: &Question, associated: &str, members: &[usize]) -> f64 {
        let delimiter = self.config.list_delimiter.as_str();
        let restricted: HashSet<&str> = self
            .answers(&question.id, members)
            .flat_map(|a| a.selections(delimiter))
            .collect();
        if restricted.is_empty() {
            return 0.0;
        }
        let hits = self
            .answers(associated, members)
            .flat_map(|a| a.selections(delimiter))
            .filter(|s| restricted.contains(s))
            .count();
        -(hits as f64) * question.signed_weight()
    }

    fn isolation(&self, question: &Question, majority: &str, members: &[usize]) -> f64 {
        let minority = self
            .answers(&question.id, members)
            .filter(|a| !a.is(majority))
            .count();
        match minority {
            1 => -question.signed_weight(),
            2 if members.len() > 4 => -question.signed_weight() / 3.0,
            _ => 0.0,
        }
    }
}
