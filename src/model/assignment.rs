//! Groups and the full partition of respondents into groups.

use crate::error::{GroupingError, Result};

/// A group of respondents, identified by index into the roster.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Group {
    /// Ordinal number, starting at 1.
    pub number: usize,
    /// Target size the group was built for.
    pub size: usize,
    /// Roster indices of the members. Order carries no meaning.
    pub members: Vec<usize>,
    /// Cached score of the current membership.
    pub score: f64,
}

impl Group {
    pub fn new(number: usize, members: Vec<usize>) -> Self {
        Self {
            number,
            size: members.len(),
            members,
            score: 0.0,
        }
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn contains(&self, respondent: usize) -> bool {
        self.members.contains(&respondent)
    }
}

/// A full partition of the roster into groups.
///
/// Cloning produces a fully independent snapshot: groups hold roster
/// indices, never shared handles.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Assignment {
    groups: Vec<Group>,
    /// Group number per roster index.
    group_of: Vec<usize>,
}

impl Assignment {
    /// Builds an assignment from groups covering `respondents` roster
    /// entries, checking that every respondent appears exactly once.
    pub fn from_groups(groups: Vec<Group>, respondents: usize) -> Result<Self> {
        let mut group_of = vec![0usize; respondents];
        let mut seen = vec![false; respondents];

        for group in &groups {
            for &member in &group.members {
                if member >= respondents || seen[member] {
                    return Err(GroupingError::config(
                        "groups",
                        format!("respondent {member} is out of range or assigned twice"),
                    ));
                }
                seen[member] = true;
                group_of[member] = group.number;
            }
        }

        if let Some(missing) = seen.iter().position(|&s| !s) {
            return Err(GroupingError::config(
                "groups",
                format!("respondent {missing} is not assigned to any group"),
            ));
        }

        Ok(Self { groups, group_of })
    }

    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    pub(crate) fn groups_mut(&mut self) -> &mut [Group] {
        &mut self.groups
    }

    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    pub fn respondent_count(&self) -> usize {
        self.group_of.len()
    }

    /// Group number recorded for a respondent.
    pub fn group_number_of(&self, respondent: usize) -> Option<usize> {
        self.group_of.get(respondent).copied()
    }

    /// Sum of cached group scores.
    pub fn score_sum(&self) -> f64 {
        self.groups.iter().map(|g| g.score).sum()
    }

    /// Mean of cached group scores (0 for an empty assignment).
    pub fn mean_score(&self) -> f64 {
        if self.groups.is_empty() {
            0.0
        } else {
            self.score_sum() / self.groups.len() as f64
        }
    }

    /// Exchanges `member_a` of group `a` with `member_b` of group `b`
    /// (group positions, not numbers).
    ///
    /// Cached scores are left untouched; callers rescore both groups.
    pub fn swap(&mut self, a: usize, member_a: usize, b: usize, member_b: usize) -> Result<()> {
        let pos_a = self.position(a, member_a)?;
        let pos_b = self.position(b, member_b)?;

        self.groups[a].members[pos_a] = member_b;
        self.groups[b].members[pos_b] = member_a;

        self.group_of[member_a] = self.groups[b].number;
        self.group_of[member_b] = self.groups[a].number;
        Ok(())
    }

    fn position(&self, group: usize, member: usize) -> Result<usize> {
        let not_found = || GroupingError::MemberNotInGroup {
            group: self.groups.get(group).map_or(group + 1, |g| g.number),
            respondent: member,
        };
        self.groups
            .get(group)
            .ok_or_else(not_found)?
            .members
            .iter()
            .position(|&m| m == member)
            .ok_or_else(not_found)
    }

    /// Checks the partition invariants: every respondent in exactly one
    /// group, and recorded group numbers matching actual membership.
    pub fn validate(&self) -> Result<()> {
        let total: usize = self.groups.iter().map(Group::len).sum();
        if total != self.group_of.len() {
            return Err(GroupingError::config(
                "groups",
                format!(
                    "{total} memberships for {} respondents",
                    self.group_of.len()
                ),
            ));
        }
        let rebuilt = Self::from_groups(self.groups.clone(), self.group_of.len())?;
        if rebuilt.group_of != self.group_of {
            return Err(GroupingError::config(
                "groups",
                "recorded group numbers disagree with membership",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn three_pairs() -> Assignment {
        Assignment::from_groups(
            vec![
                Group::new(1, vec![0, 1]),
                Group::new(2, vec![2, 3]),
                Group::new(3, vec![4, 5]),
            ],
            6,
        )
        .unwrap()
    }

    #[test]
    fn test_from_groups_rejects_duplicates() {
        let err = Assignment::from_groups(
            vec![Group::new(1, vec![0, 1]), Group::new(2, vec![1, 2])],
            3,
        );
        assert!(err.is_err());
    }

    #[test]
    fn test_from_groups_rejects_missing() {
        let err = Assignment::from_groups(vec![Group::new(1, vec![0, 1])], 3);
        assert!(err.is_err());
    }

    #[test]
    fn test_swap_updates_membership_and_numbers() {
        let mut a = three_pairs();
        a.swap(0, 1, 2, 4).unwrap();
        assert!(a.groups()[0].contains(4));
        assert!(a.groups()[2].contains(1));
        assert_eq!(a.group_number_of(4), Some(1));
        assert_eq!(a.group_number_of(1), Some(3));
        a.validate().unwrap();
    }

    #[test]
    fn test_swap_member_not_in_group() {
        let mut a = three_pairs();
        let err = a.swap(0, 2, 1, 3).unwrap_err();
        assert_eq!(
            err,
            GroupingError::MemberNotInGroup {
                group: 1,
                respondent: 2
            }
        );
        // Nothing moved.
        assert_eq!(a, three_pairs());
    }

    #[test]
    fn test_clone_is_independent() {
        let a = three_pairs();
        let mut b = a.clone();
        b.swap(0, 0, 1, 2).unwrap();
        assert_ne!(a, b);
        assert!(a.groups()[0].contains(0));
    }

    #[test]
    fn test_mean_score() {
        let mut a = three_pairs();
        for (i, g) in a.groups_mut().iter_mut().enumerate() {
            g.score = i as f64;
        }
        assert!((a.mean_score() - 1.0).abs() < 1e-12);
    }

    proptest! {
        #[test]
        fn prop_swap_is_self_inverse(i in 0usize..2, j in 0usize..2, ga in 0usize..3, gb in 0usize..3) {
            prop_assume!(ga != gb);
            let original = three_pairs();
            let mut a = original.clone();
            let x = a.groups()[ga].members[i];
            let y = a.groups()[gb].members[j];
            a.swap(ga, x, gb, y).unwrap();
            a.validate().unwrap();
            a.swap(ga, y, gb, x).unwrap();
            prop_assert_eq!(a, original);
        }
    }
}
