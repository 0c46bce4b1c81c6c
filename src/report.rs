//! Numeric summary and rendering of a finished assignment.

use std::fmt;

use crate::model::{Assignment, Respondent, Survey};

/// Score statistics over the groups of an assignment.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Summary {
    pub groups: usize,
    pub average: f64,
    pub maximum: f64,
    pub minimum: f64,
    /// Group scores in assignment order.
    pub scores: Vec<f64>,
}

impl Summary {
    /// Summarizes the cached group scores. An empty assignment summarizes
    /// to all zeros.
    pub fn of(assignment: &Assignment) -> Self {
        let scores: Vec<f64> = assignment.groups().iter().map(|g| g.score).collect();
        if scores.is_empty() {
            return Self {
                groups: 0,
                average: 0.0,
                maximum: 0.0,
                minimum: 0.0,
                scores,
            };
        }

        let maximum = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let minimum = scores.iter().copied().fold(f64::INFINITY, f64::min);
        let average = scores.iter().sum::<f64>() / scores.len() as f64;

        Self {
            groups: scores.len(),
            average,
            maximum,
            minimum,
            scores,
        }
    }

    /// Groups whose score reaches `target` (within 1e-9).
    pub fn groups_matching(&self, target: f64) -> usize {
        self.scores.iter().filter(|&&s| s >= target - 1e-9).count()
    }
}

/// Renders an assignment for print and tabular collaborators.
///
/// `Display` lists each group as `Group N (score X.XX)` followed by its
/// members' names, one per line.
pub struct Report<'a> {
    survey: &'a Survey,
    roster: &'a [Respondent],
    assignment: &'a Assignment,
    delimiter: &'a str,
}

impl<'a> Report<'a> {
    /// `delimiter` re-joins list answers in [`Report::rows`].
    pub fn new(
        survey: &'a Survey,
        roster: &'a [Respondent],
        assignment: &'a Assignment,
        delimiter: &'a str,
    ) -> Self {
        Self {
            survey,
            roster,
            assignment,
            delimiter,
        }
    }

    /// Column names: `Group` followed by every question id.
    pub fn header(&self) -> Vec<String> {
        std::iter::once("Group".to_string())
            .chain(self.survey.questions().iter().map(|q| q.id.clone()))
            .collect()
    }

    /// One row per respondent, grouped in assignment order: the group
    /// number then each answer (empty when absent). A member index outside
    /// the roster yields a row of empty answers.
    pub fn rows(&self) -> impl Iterator<Item = Vec<String>> + '_ {
        self.assignment.groups().iter().flat_map(move |group| {
            group.members.iter().map(move |&member| {
                let respondent = self.roster.get(member);
                let mut row = Vec::with_capacity(self.survey.questions().len() + 1);
                row.push(group.number.to_string());
                for q in self.survey.questions() {
                    row.push(
                        respondent
                            .and_then(|r| r.answer(&q.id))
                            .map(|a| a.joined(self.delimiter))
                            .unwrap_or_default(),
                    );
                }
                row
            })
        })
    }
}

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, group) in self.assignment.groups().iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            writeln!(f, "Group {} (score {:.2})", group.number, group.score)?;
            for &member in &group.members {
                match self.roster.get(member) {
                    Some(respondent) => writeln!(f, "  {}", respondent.name)?,
                    None => writeln!(f, "  #{} (not in roster)", member)?,
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Group, Question, QuestionKind};

    fn setup() -> (Survey, Vec<Respondent>, Assignment) {
        let survey = Survey::new(vec![
            Question::new("Name", QuestionKind::Identification, 0.0),
            Question::new("Hobbies", QuestionKind::Checkbox, 1.0),
        ])
        .unwrap();
        let roster: Vec<Respondent> = ["Ann", "Bo", "Cy", "Di"]
            .iter()
            .map(|n| {
                Respondent::new(*n)
                    .with_answer("Name", *n)
                    .with_answer("Hobbies", vec!["chess", "golf"])
            })
            .collect();

        let mut g1 = Group::new(1, vec![0, 2]);
        g1.score = 1.5;
        let mut g2 = Group::new(2, vec![1, 3]);
        g2.score = 0.5;
        let assignment = Assignment::from_groups(vec![g1, g2], 4).unwrap();
        (survey, roster, assignment)
    }

    #[test]
    fn test_summary() {
        let (_, _, assignment) = setup();
        let summary = Summary::of(&assignment);
        assert_eq!(summary.groups, 2);
        assert!((summary.average - 1.0).abs() < 1e-12);
        assert!((summary.maximum - 1.5).abs() < 1e-12);
        assert!((summary.minimum - 0.5).abs() < 1e-12);
        assert_eq!(summary.groups_matching(1.5), 1);
        assert_eq!(summary.groups_matching(0.0), 2);
    }

    #[test]
    fn test_empty_summary() {
        let summary = Summary::of(&Assignment::from_groups(Vec::new(), 0).unwrap());
        assert_eq!(summary.groups, 0);
        assert_eq!(summary.average, 0.0);
        assert_eq!(summary.groups_matching(0.0), 0);
    }

    #[test]
    fn test_display() {
        let (survey, roster, assignment) = setup();
        let text = Report::new(&survey, &roster, &assignment, ";").to_string();
        assert_eq!(
            text,
            "Group 1 (score 1.50)\n  Ann\n  Cy\n\nGroup 2 (score 0.50)\n  Bo\n  Di\n"
        );
    }

    #[test]
    fn test_rows() {
        let (survey, roster, assignment) = setup();
        let report = Report::new(&survey, &roster, &assignment, ";");
        assert_eq!(report.header(), vec!["Group", "Name", "Hobbies"]);

        let rows: Vec<Vec<String>> = report.rows().collect();
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0], vec!["1", "Ann", "chess;golf"]);
        assert_eq!(rows[3], vec!["2", "Di", "chess;golf"]);
    }

    #[test]
    fn test_short_roster_renders_placeholders() {
        let (survey, roster, assignment) = setup();
        let short = &roster[..2];
        let report = Report::new(&survey, short, &assignment, ";");

        assert_eq!(
            report.to_string(),
            "Group 1 (score 1.50)\n  Ann\n  #2 (not in roster)\n\n\
             Group 2 (score 0.50)\n  Bo\n  #3 (not in roster)\n"
        );

        let rows: Vec<Vec<String>> = report.rows().collect();
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[1], vec!["1", "", ""]);
        assert_eq!(rows[2], vec!["2", "Bo", "chess;golf"]);
        assert_eq!(rows[3], vec!["2", "", ""]);
    }
}
