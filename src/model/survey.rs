//! Validated question sets and respondent ingestion.

use std::collections::{HashMap, HashSet};

use super::question::{Question, QuestionKind};
use super::respondent::{Answer, Respondent};
use crate::error::{GroupingError, Result};

/// A question set that has passed cross-reference checks.
///
/// Exactly one question is [`QuestionKind::Identification`]; every
/// Restrictive question points at a question in the set; every Isolation
/// question names a majority option.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Survey {
    questions: Vec<Question>,
    identification: usize,
}

impl Survey {
    pub fn new(questions: Vec<Question>) -> Result<Self> {
        let mut identification: Option<usize> = None;
        for (i, q) in questions.iter().enumerate() {
            if q.kind == QuestionKind::Identification {
                if let Some(first) = identification {
                    return Err(GroupingError::MultipleIdentification {
                        first: questions[first].id.clone(),
                        second: q.id.clone(),
                    });
                }
                identification = Some(i);
            }
        }
        let identification = identification.ok_or(GroupingError::MissingIdentification)?;

        let ids: HashSet<&str> = questions.iter().map(|q| q.id.as_str()).collect();
        for q in &questions {
            match &q.kind {
                QuestionKind::Restrictive { associated } if !ids.contains(associated.as_str()) => {
                    return Err(GroupingError::UnknownAssociatedQuestion {
                        question: q.id.clone(),
                        associated: associated.clone(),
                    });
                }
                QuestionKind::Isolation { majority } if majority.is_empty() => {
                    return Err(GroupingError::EmptyMajorityOption {
                        question: q.id.clone(),
                    });
                }
                _ => {}
            }
            if !q.weight.is_finite() {
                return Err(GroupingError::config("weight", format!("{} is not finite", q.id)));
            }
        }

        Ok(Self {
            questions,
            identification,
        })
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    /// The question that supplies display names.
    pub fn identification(&self) -> &Question {
        &self.questions[self.identification]
    }

    pub fn question(&self, id: &str) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == id)
    }

    /// Builds respondents from raw header-to-value records.
    ///
    /// Checkbox and Scheduling answers are split on `delimiter`; all
    /// other answers are kept verbatim. Every configured question must be
    /// present in every record.
    pub fn respondents(
        &self,
        records: &[HashMap<String, String>],
        delimiter: &str,
    ) -> Result<Vec<Respondent>> {
        records
            .iter()
            .enumerate()
            .map(|(index, record)| {
                let mut answers = HashMap::with_capacity(self.questions.len());
                for q in &self.questions {
                    let raw = record.get(&q.id).ok_or_else(|| GroupingError::MissingAnswer {
                        question: q.id.clone(),
                        record: index,
                    })?;
                    let answer = if q.kind.is_list() {
                        Answer::List(
                            raw.split(delimiter)
                                .map(str::trim)
                                .filter(|s| !s.is_empty())
                                .map(String::from)
                                .collect(),
                        )
                    } else {
                        Answer::Single(raw.clone())
                    };
                    answers.insert(q.id.clone(), answer);
                }
                let name = match answers.get(&self.identification().id) {
                    Some(answer) => answer.joined(delimiter),
                    None => String::new(),
                };
                Ok(Respondent { name, answers })
            })
            .collect()
    }

    /// Checks that every respondent answered every configured question.
    pub fn check_roster(&self, roster: &[Respondent]) -> Result<()> {
        for (index, respondent) in roster.iter().enumerate() {
            for q in &self.questions {
                if !respondent.answers.contains_key(&q.id) {
                    return Err(GroupingError::MissingAnswer {
                        question: q.id.clone(),
                        record: index,
                    });
                }
            }
        }
        Ok(())
    }
}
