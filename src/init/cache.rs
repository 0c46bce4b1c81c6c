//! Memoized candidate scores keyed by membership.

use std::collections::HashMap;

/// Order-independent identity of a candidate group: its sorted roster
/// indices.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CandidateKey(Vec<usize>);

impl CandidateKey {
    pub fn new(members: &[usize]) -> Self {
        let mut sorted = members.to_vec();
        sorted.sort_unstable();
        Self(sorted)
    }

    pub fn members(&self) -> &[usize] {
        &self.0
    }
}

/// Scores already computed during one construction run.
///
/// Plain owned data: parallel scorers evaluate misses against a read-only
/// view and the results are merged back with [`insert`](Self::insert).
#[derive(Debug, Clone, Default)]
pub struct ScoreCache {
    scores: HashMap<CandidateKey, f64>,
    hits: usize,
    misses: usize,
}

impl ScoreCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up a score, counting the hit or miss.
    pub fn get(&mut self, key: &CandidateKey) -> Option<f64> {
        match self.scores.get(key) {
            Some(&score) => {
                self.hits += 1;
                Some(score)
            }
            None => {
                self.misses += 1;
                None
            }
        }
    }

    pub fn insert(&mut self, key: CandidateKey, score: f64) {
        self.scores.insert(key, score);
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    pub fn hits(&self) -> usize {
        self.hits
    }

    pub fn misses(&self) -> usize {
        self.misses
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_order_independent() {
        assert_eq!(CandidateKey::new(&[3, 1, 2]), CandidateKey::new(&[2, 3, 1]));
        assert_ne!(CandidateKey::new(&[1, 2]), CandidateKey::new(&[1, 3]));
        assert_eq!(CandidateKey::new(&[9, 4]).members(), &[4, 9]);
    }

    #[test]
    fn test_hits_and_misses() {
        let mut cache = ScoreCache::new();
        let key = CandidateKey::new(&[0, 1]);
        assert_eq!(cache.get(&key), None);
        cache.insert(key.clone(), 1.5);
        assert_eq!(cache.get(&CandidateKey::new(&[1, 0])), Some(1.5));
        assert_eq!(cache.hits(), 1);
        assert_eq!(cache.misses(), 1);
        assert_eq!(cache.len(), 1);
    }
}
