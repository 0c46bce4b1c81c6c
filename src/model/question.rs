//! Survey questions and how each kind is scored.

use std::fmt;
use std::str::FromStr;

use crate::error::GroupingError;

/// Whether a question rewards similar or differing answers within a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Preference {
    /// Members should differ. Scoring uses the weight as given.
    #[default]
    Heterogeneous,
    /// Members should agree. Scoring uses the negated weight.
    Homogeneous,
}

/// The kind of a question, with the cross-reference each kind needs.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum QuestionKind {
    /// Supplies each respondent's display name. Not scored.
    Identification,
    /// Single answer; rewards the number of distinct answers in a group.
    MultipleChoice,
    /// List answer; penalizes selections shared by several members.
    Checkbox,
    /// List of busy time blocks; rewards blocks free for every member.
    Scheduling,
    /// Penalizes members whose `associated` answers overlap anything a
    /// member selected on this question.
    Restrictive {
        /// Id of the paired question whose answers are checked for overlap.
        associated: String,
    },
    /// Penalizes groups that isolate one or two members outside `majority`.
    Isolation {
        /// The option most respondents are expected to pick.
        majority: String,
    },
}

impl QuestionKind {
    /// Whether answers to this kind arrive as a list of selections.
    pub fn is_list(&self) -> bool {
        matches!(self, QuestionKind::Checkbox | QuestionKind::Scheduling)
    }

    /// Human-readable label as used by the survey export.
    pub fn label(&self) -> &'static str {
        match self {
            QuestionKind::Identification => "(Identification Question)",
            QuestionKind::MultipleChoice => "(Multiple Choice Question)",
            QuestionKind::Checkbox => "(Checkbox Question)",
            QuestionKind::Scheduling => "(Scheduling Question)",
            QuestionKind::Restrictive { .. } => "(Restrictive Question)",
            QuestionKind::Isolation { .. } => "(Isolation Question)",
        }
    }

    /// Parses a kind label, resolving the `R;<question>` and `I;<option>`
    /// short codes with the given delimiter.
    ///
    /// The long Restrictive and Isolation labels carry no payload; they
    /// are accepted only in their coded form.
    pub fn parse_with_delimiter(label: &str, delimiter: &str) -> Result<Self, GroupingError> {
        let label = label.trim();
        let unknown = || GroupingError::UnknownQuestionKind {
            label: label.to_string(),
        };

        let (code, payload) = match label.split_once(delimiter) {
            Some((code, payload)) => (code.trim(), Some(payload.trim())),
            None => (label, None),
        };

        match (code, payload) {
            ("(Identification Question)" | "ID", None) => Ok(QuestionKind::Identification),
            ("(Multiple Choice Question)" | "M", None) => Ok(QuestionKind::MultipleChoice),
            ("(Checkbox Question)" | "C", None) => Ok(QuestionKind::Checkbox),
            ("(Scheduling Question)" | "Sc", None) => Ok(QuestionKind::Scheduling),
            ("(Restrictive Question)" | "R", Some(associated)) if !associated.is_empty() => {
                Ok(QuestionKind::Restrictive {
                    associated: associated.to_string(),
                })
            }
            ("(Isolation Question)" | "I", Some(majority)) if !majority.is_empty() => {
                Ok(QuestionKind::Isolation {
                    majority: majority.to_string(),
                })
            }
            _ => Err(unknown()),
        }
    }
}

impl FromStr for QuestionKind {
    type Err = GroupingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_with_delimiter(s, ";")
    }
}

impl fmt::Display for QuestionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A single survey question.
///
/// # Examples
///
/// ```
/// use u_grouping::model::{Preference, Question, QuestionKind};
///
/// let q = Question::new("Major", QuestionKind::MultipleChoice, 4.0)
///     .with_preference(Preference::Homogeneous)
///     .with_options(["Math", "History"]);
/// assert_eq!(q.signed_weight(), -4.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Question {
    /// Question text; also the key in every respondent record.
    pub id: String,
    pub kind: QuestionKind,
    /// Weight magnitude. Negative inputs are folded to their absolute value.
    pub weight: f64,
    pub preference: Preference,
    /// Valid answer options, in survey order. Empty when free-form.
    pub options: Vec<String>,
}

impl Question {
    pub fn new(id: impl Into<String>, kind: QuestionKind, weight: f64) -> Self {
        Self {
            id: id.into(),
            kind,
            weight: weight.abs(),
            preference: Preference::default(),
            options: Vec::new(),
        }
    }

    /// Builds a question from a legacy signed weight, where a negative
    /// weight meant "homogeneous".
    pub fn from_signed_weight(id: impl Into<String>, kind: QuestionKind, weight: f64) -> Self {
        let preference = if weight < 0.0 {
            Preference::Homogeneous
        } else {
            Preference::Heterogeneous
        };
        Self::new(id, kind, weight).with_preference(preference)
    }

    pub fn with_preference(mut self, preference: Preference) -> Self {
        self.preference = preference;
        self
    }

    pub fn with_options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options = options.into_iter().map(Into::into).collect();
        self
    }

    /// Weight with the preference applied: negative for homogeneous.
    pub fn signed_weight(&self) -> f64 {
        match self.preference {
            Preference::Heterogeneous => self.weight,
            Preference::Homogeneous => -self.weight,
        }
    }
}
