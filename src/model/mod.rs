//! Data model: questions, respondents, groups and assignments.
//!
//! Respondents live in a roster slice owned by the caller. Groups refer
//! to them by roster index, so an [`Assignment`] is a plain value that
//! clones without aliasing.

mod assignment;
mod question;
mod respondent;
mod survey;

pub use assignment::{Assignment, Group};
pub use question::{Preference, Question, QuestionKind};
pub use respondent::{Answer, Respondent};
pub use survey::Survey;
