//! Decrease-key priority frontier for the A* open set.
//!
//! Backed by a binary heap with lazy invalidation: improving a node's score
//! pushes a fresh entry and the stale one is discarded when it surfaces.
//! `scores` holds exactly the live entries, so `len` never counts stale ones.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};

use crate::graph::NodeId;

/// Min-priority queue over node ids keyed by an `f64` score.
#[derive(Debug, Clone, Default)]
pub struct Frontier {
    heap: BinaryHeap<FrontierEntry>,
    scores: HashMap<NodeId, f64>,
}

impl Frontier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `node`, or lower its score if `score` is strictly smaller than
    /// the stored one. Returns `true` when the frontier changed.
    pub fn insert_or_improve(&mut self, node: NodeId, score: f64) -> bool {
        match self.scores.get(&node) {
            Some(&current) if current <= score => false,
            _ => {
                self.scores.insert(node, score);
                self.heap.push(FrontierEntry::new(node, score));
                true
            }
        }
    }

    /// Remove and return the node with the smallest score.
    ///
    /// Equal scores resolve to the smaller node id. Returns `None` once the
    /// frontier is empty.
    pub fn extract_min(&mut self) -> Option<NodeId> {
        while let Some(entry) = self.heap.pop() {
            let live = self
                .scores
                .get(&entry.node)
                .is_some_and(|score| score.total_cmp(&entry.score.0) == Ordering::Equal);
            if live {
                self.scores.remove(&entry.node);
                return Some(entry.node);
            }
        }
        None
    }

    /// Current score of a queued node.
    pub fn score(&self, node: NodeId) -> Option<f64> {
        self.scores.get(&node).copied()
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }
}

#[derive(Copy, Clone, Debug, Default)]
struct FloatOrd(f64);

impl PartialEq for FloatOrd {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for FloatOrd {}

impl PartialOrd for FloatOrd {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FloatOrd {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
struct FrontierEntry {
    node: NodeId,
    score: FloatOrd,
}

impl FrontierEntry {
    fn new(node: NodeId, score: f64) -> Self {
        Self {
            node,
            score: FloatOrd(score),
        }
    }
}

impl Ord for FrontierEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering so BinaryHeap becomes a min-heap by score.
        other
            .score
            .cmp(&self.score)
            .then_with(|| other.node.cmp(&self.node))
    }
}

impl PartialOrd for FrontierEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_in_score_order() {
        let mut frontier = Frontier::new();
        frontier.insert_or_improve(1, 5.0);
        frontier.insert_or_improve(2, 1.0);
        frontier.insert_or_improve(3, 3.0);

        assert_eq!(frontier.len(), 3);
        assert_eq!(frontier.extract_min(), Some(2));
        assert_eq!(frontier.extract_min(), Some(3));
        assert_eq!(frontier.extract_min(), Some(1));
        assert_eq!(frontier.extract_min(), None);
        assert!(frontier.is_empty());
    }

    #[test]
    fn improving_repositions_node() {
        let mut frontier = Frontier::new();
        frontier.insert_or_improve(1, 5.0);
        frontier.insert_or_improve(2, 4.0);

        assert!(frontier.insert_or_improve(1, 2.0));
        assert_eq!(frontier.len(), 2);
        assert_eq!(frontier.score(1), Some(2.0));
        assert_eq!(frontier.extract_min(), Some(1));
        assert_eq!(frontier.extract_min(), Some(2));
        // The stale entry for node 1 must not resurface.
        assert_eq!(frontier.extract_min(), None);
    }

    #[test]
    fn worse_or_equal_scores_are_ignored() {
        let mut frontier = Frontier::new();
        frontier.insert_or_improve(1, 2.0);

        assert!(!frontier.insert_or_improve(1, 2.0));
        assert!(!frontier.insert_or_improve(1, 9.0));
        assert_eq!(frontier.score(1), Some(2.0));
        assert_eq!(frontier.len(), 1);
    }

    #[test]
    fn ties_break_on_smaller_id() {
        let mut frontier = Frontier::new();
        frontier.insert_or_improve(9, 1.0);
        frontier.insert_or_improve(4, 1.0);
        frontier.insert_or_improve(6, 1.0);

        assert_eq!(frontier.extract_min(), Some(4));
        assert_eq!(frontier.extract_min(), Some(6));
        assert_eq!(frontier.extract_min(), Some(9));
    }

    #[test]
    fn node_can_be_requeued_after_extraction() {
        let mut frontier = Frontier::new();
        frontier.insert_or_improve(1, 1.0);
        assert_eq!(frontier.extract_min(), Some(1));

        assert!(frontier.insert_or_improve(1, 7.0));
        assert_eq!(frontier.extract_min(), Some(1));
    }

    #[test]
    fn negative_scores_sort_first() {
        let mut frontier = Frontier::new();
        frontier.insert_or_improve(1, 0.5);
        frontier.insert_or_improve(2, -1.0);
        assert_eq!(frontier.extract_min(), Some(2));
    }
}
