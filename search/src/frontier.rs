//! Ordered frontier with an append-only history of every box created.
//!
//! History keys are canonical identity bytes in a `BTreeSet`, so membership
//! is exact code-and-level equality and iteration order is deterministic.

use std::cmp::Ordering;
use std::collections::{BTreeSet, VecDeque};

use crate::candidate::SearchCandidate;
use crate::hash::{canonical_hash, ContentHash, DOMAIN_FRONTIER_ORDER};
use crate::order::eclipsed_mask;

/// The live working set of a search.
#[derive(Debug)]
pub struct Frontier {
    boxes: VecDeque<SearchCandidate>,
    history: BTreeSet<Vec<u8>>,
    high_water: usize,
}

impl Frontier {
    /// A frontier holding only `root`, with `root` recorded in history.
    #[must_use]
    pub fn new(root: SearchCandidate) -> Self {
        let mut history = BTreeSet::new();
        history.insert(root.identity_bytes().to_vec());
        let mut boxes = VecDeque::new();
        boxes.push_back(root);
        Self {
            boxes,
            history,
            high_water: 1,
        }
    }

    /// Add a box unless an identical one was ever created.
    ///
    /// Returns `false` for a duplicate; the box is dropped.
    pub fn admit(&mut self, candidate: SearchCandidate) -> bool {
        if !self.history.insert(candidate.identity_bytes().to_vec()) {
            return false;
        }
        self.boxes.push_back(candidate);
        self.high_water = self.high_water.max(self.boxes.len());
        true
    }

    /// Remove and return the box at the head of the order.
    pub fn pop_first(&mut self) -> Option<SearchCandidate> {
        self.boxes.pop_front()
    }

    #[must_use]
    pub fn first(&self) -> Option<&SearchCandidate> {
        self.boxes.front()
    }

    /// Stable sort by `order`.
    pub fn sort_by<F>(&mut self, order: F)
    where
        F: FnMut(&SearchCandidate, &SearchCandidate) -> Ordering,
    {
        self.boxes.make_contiguous().sort_by(order);
    }

    /// Drop every eclipsed box, keeping the order of the rest.
    ///
    /// Returns the removed boxes in frontier order.
    pub fn prune_eclipsed(&mut self) -> Vec<SearchCandidate> {
        let mask = eclipsed_mask(&self.boxes);
        let (eclipsed, live): (Vec<_>, Vec<_>) = self
            .boxes
            .drain(..)
            .zip(mask)
            .partition(|(_, is_eclipsed)| *is_eclipsed);
        self.boxes = live.into_iter().map(|(candidate, _)| candidate).collect();
        eclipsed.into_iter().map(|(candidate, _)| candidate).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SearchCandidate> + Clone {
        self.boxes.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }

    /// Number of distinct boxes ever created, including the root.
    #[must_use]
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Whether a box with these identity bytes was ever created.
    #[must_use]
    pub fn seen(&self, identity: &[u8]) -> bool {
        self.history.contains(identity)
    }

    /// Largest frontier size observed.
    #[must_use]
    pub fn high_water(&self) -> usize {
        self.high_water
    }

    /// Digest of the fingerprints in frontier order.
    #[must_use]
    pub fn order_digest(&self) -> ContentHash {
        let mut data = Vec::with_capacity(self.boxes.len() * 72);
        for candidate in &self.boxes {
            data.extend_from_slice(candidate.fingerprint().as_str().as_bytes());
            data.push(b'\n');
        }
        canonical_hash(DOMAIN_FRONTIER_ORDER, &data)
    }
}
