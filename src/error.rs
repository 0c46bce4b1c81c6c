//! Error types for group assignment.

use thiserror::Error;

/// Errors raised by configuration checks and the assignment algorithms.
///
/// Every variant is fatal for the run that produced it: nothing proceeds
/// on an inconsistent question set or partition. "No improving swap found"
/// is not an error and never surfaces here.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GroupingError {
    #[error("no identification question provided in questions")]
    MissingIdentification,

    #[error("more than one identification question: {first} and {second}")]
    MultipleIdentification { first: String, second: String },

    #[error("restrictive question {question} references unknown question {associated}")]
    UnknownAssociatedQuestion { question: String, associated: String },

    #[error("isolation question {question} has no majority option")]
    EmptyMajorityOption { question: String },

    #[error("question {question} not found in respondent record {record}")]
    MissingAnswer { question: String, record: usize },

    #[error("unknown question kind label: {label}")]
    UnknownQuestionKind { label: String },

    #[error("invalid configuration: {field} ({reason})")]
    InvalidConfig { field: &'static str, reason: String },

    #[error("{respondents} respondents cannot fill a group of {group_size}")]
    InsufficientRespondents { respondents: usize, group_size: usize },

    #[error("too few groups for swap selection: {groups} (minimum 3)")]
    TooFewGroups { groups: usize },

    #[error("respondent {respondent} is not a member of group {group}")]
    MemberNotInGroup { group: usize, respondent: usize },

    #[error("time budget expired before any run completed")]
    NoRunCompleted,
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, GroupingError>;

impl GroupingError {
    pub(crate) fn config(field: &'static str, reason: impl Into<String>) -> Self {
        GroupingError::InvalidConfig {
            field,
            reason: reason.into(),
        }
    }
}
