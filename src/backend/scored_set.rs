//! Scored Set Module
//!
//! Ordered set of members keyed by a floating point score, used by the
//! in-memory store for the LRU and LFU order indexes.

use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap};

// == Score ==
/// Totally ordered wrapper around an f64 score.
#[derive(Debug, Clone, Copy)]
struct Score(f64);

impl PartialEq for Score {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Score {}

impl PartialOrd for Score {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Score {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

// == Scored Set ==
/// Members ordered by `(score, member)`.
///
/// Equal scores fall back to lexicographic member order, the same order a
/// Redis sorted set uses, so both stores pop ties identically.
#[derive(Debug, Default)]
pub struct ScoredSet {
    /// Current score of every member
    scores: HashMap<String, f64>,
    /// Members in eviction order, lowest first
    order: BTreeSet<(Score, String)>,
}

impl ScoredSet {
    // == Constructor ==
    /// Creates a new empty set.
    pub fn new() -> Self {
        Self::default()
    }

    // == Upsert ==
    /// Sets the score of a member, inserting it if absent.
    pub fn upsert(&mut self, member: &str, score: f64) {
        self.remove(member);
        self.scores.insert(member.to_string(), score);
        self.order.insert((Score(score), member.to_string()));
    }

    // == Increment ==
    /// Adds `delta` to a member's score and returns the new score.
    ///
    /// An absent member starts from zero.
    pub fn increment(&mut self, member: &str, delta: f64) -> f64 {
        let score = self.scores.get(member).copied().unwrap_or(0.0) + delta;
        self.upsert(member, score);
        score
    }

    // == Remove ==
    /// Removes a member. Returns true if it was present.
    pub fn remove(&mut self, member: &str) -> bool {
        match self.scores.remove(member) {
            Some(score) => {
                self.order.remove(&(Score(score), member.to_string()));
                true
            }
            None => false,
        }
    }

    // == Pop Min ==
    /// Removes and returns up to `count` members with the lowest scores.
    pub fn pop_min(&mut self, count: usize) -> Vec<(String, f64)> {
        let mut popped = Vec::with_capacity(count.min(self.order.len()));
        while popped.len() < count {
            let Some((Score(score), member)) = self.order.pop_first() else {
                break;
            };
            self.scores.remove(&member);
            popped.push((member, score));
        }
        popped
    }

    // == Score ==
    /// Returns the score of a member, if present.
    pub fn score(&self, member: &str) -> Option<f64> {
        self.scores.get(member).copied()
    }

    // == Length ==
    /// Returns the number of members.
    pub fn len(&self) -> usize {
        self.scores.len()
    }

    // == Is Empty ==
    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }
}
