//! Respondents and their raw answers.

use std::collections::HashMap;

/// A raw survey answer.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Answer {
    /// Single-choice or free-text answer.
    Single(String),
    /// Pre-split list answer (checkbox selections, busy blocks).
    List(Vec<String>),
}

impl Answer {
    /// Individual selections. Single answers are split on `delimiter`;
    /// empty fragments are dropped.
    pub fn selections<'a>(&'a self, delimiter: &'a str) -> Box<dyn Iterator<Item = &'a str> + 'a> {
        match self {
            Answer::Single(text) => Box::new(
                text.split(delimiter)
                    .map(str::trim)
                    .filter(|s| !s.is_empty()),
            ),
            Answer::List(items) => Box::new(
                items
                    .iter()
                    .map(|s| s.as_str())
                    .filter(|s| !s.is_empty()),
            ),
        }
    }

    /// Whether this answer is exactly the single option `option`.
    pub fn is(&self, option: &str) -> bool {
        match self {
            Answer::Single(text) => text == option,
            Answer::List(items) => items.len() == 1 && items[0] == option,
        }
    }

    /// Renders the answer as one string, re-joining lists with `delimiter`.
    pub fn joined(&self, delimiter: &str) -> String {
        match self {
            Answer::Single(text) => text.clone(),
            Answer::List(items) => items.join(delimiter),
        }
    }
}

impl From<&str> for Answer {
    fn from(value: &str) -> Self {
        Answer::Single(value.to_string())
    }
}

impl From<String> for Answer {
    fn from(value: String) -> Self {
        Answer::Single(value)
    }
}

impl From<Vec<&str>> for Answer {
    fn from(value: Vec<&str>) -> Self {
        Answer::List(value.into_iter().map(String::from).collect())
    }
}

impl From<Vec<String>> for Answer {
    fn from(value: Vec<String>) -> Self {
        Answer::List(value)
    }
}

/// One survey respondent. Immutable once built; group membership lives in
/// [`Assignment`](super::Assignment).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Respondent {
    pub name: String,
    pub answers: HashMap<String, Answer>,
}

impl Respondent {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            answers: HashMap::new(),
        }
    }

    pub fn with_answer(mut self, question: impl Into<String>, answer: impl Into<Answer>) -> Self {
        self.answers.insert(question.into(), answer.into());
        self
    }

    pub fn answer(&self, question: &str) -> Option<&Answer> {
        self.answers.get(question)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_selections_split() {
        let a = Answer::from("Red;Blue; ;Green");
        let got: Vec<&str> = a.selections(";").collect();
        assert_eq!(got, vec!["Red", "Blue", "Green"]);
    }

    #[test]
    fn test_list_selections_verbatim() {
        let a = Answer::from(vec!["9L", "10", ""]);
        let got: Vec<&str> = a.selections(";").collect();
        assert_eq!(got, vec!["9L", "10"]);
    }

    #[test]
    fn test_is_and_joined() {
        assert!(Answer::from("Male").is("Male"));
        assert!(!Answer::from("Female").is("Male"));
        assert!(Answer::from(vec!["Male"]).is("Male"));
        assert_eq!(Answer::from(vec!["a", "b"]).joined(";"), "a;b");
    }

    #[test]
    fn test_respondent_builder() {
        let r = Respondent::new("ada").with_answer("Q", "x");
        assert_eq!(r.answer("Q"), Some(&Answer::from("x")));
        assert!(r.answer("missing").is_none());
    }
}
