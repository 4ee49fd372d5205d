use crate::data_wrappers::SimRecord;
use crate::HacError;
use num_traits::Float;
use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap};

/// The comparison direction of a [`PartnerQueue`]. The distance-based
/// strategies want the smallest similarity, group-average linkage wants
/// the largest. The direction is fixed at construction rather than folded
/// into a shared ordering, so the two semantics can never be confused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Priority {
    SmallestFirst,
    LargestFirst,
}

/// A ranking key: the direction-adjusted similarity, then the partner id.
/// Among equal similarities the lowest partner id ranks first, in both
/// directions.
#[derive(Debug, Clone, Copy)]
struct RankKey<T>(T, usize);

impl<T: Float> PartialEq for RankKey<T> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<T: Float> Eq for RankKey<T> {}

impl<T: Float> PartialOrd for RankKey<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T: Float> Ord for RankKey<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0
            .partial_cmp(&other.0)
            .expect("Invalid float")
            .then(self.1.cmp(&other.1))
    }
}

/// A per-cluster priority structure over the similarities to every other
/// outstanding partner cluster. Keyed by partner id, ordered by similarity
/// in the queue's fixed direction. `set` and `remove` are O(log M),
/// `best` is O(log M), where M is the number of tracked partners.
#[derive(Debug, Clone)]
pub(crate) struct PartnerQueue<T> {
    priority: Priority,
    sims: HashMap<usize, T>,
    ranked: BTreeSet<RankKey<T>>,
}

impl<T: Float> PartnerQueue<T> {
    pub(crate) fn new(priority: Priority) -> Self {
        PartnerQueue {
            priority,
            sims: HashMap::new(),
            ranked: BTreeSet::new(),
        }
    }

    fn rank(&self, sim: T) -> T {
        match self.priority {
            Priority::SmallestFirst => sim,
            Priority::LargestFirst => -sim,
        }
    }

    /// Inserts the similarity to a partner, replacing any previous entry.
    pub(crate) fn set(&mut self, partner: usize, sim: T) {
        if let Some(previous) = self.sims.insert(partner, sim) {
            self.ranked.remove(&RankKey(self.rank(previous), partner));
        }
        self.ranked.insert(RankKey(self.rank(sim), partner));
    }

    /// Removes a partner's entry. The caller's invariant guarantees the
    /// key is present; an absent key is a bug, not a recoverable state.
    pub(crate) fn remove(&mut self, partner: usize) -> Result<(), HacError> {
        let sim = self
            .sims
            .remove(&partner)
            .ok_or(HacError::MissingKey(partner))?;
        self.ranked.remove(&RankKey(self.rank(sim), partner));
        Ok(())
    }

    /// The best outstanding record in the queue's direction. Among equal
    /// similarities the lowest partner id wins.
    pub(crate) fn best(&self) -> Result<SimRecord<T>, HacError> {
        let RankKey(_, partner) = self.ranked.first().ok_or(HacError::EmptyStructure)?;
        Ok(SimRecord {
            partner: *partner,
            sim: self.sims[partner],
        })
    }

    pub(crate) fn clear(&mut self) {
        self.sims.clear();
        self.ranked.clear();
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.sims.len()
    }
}
