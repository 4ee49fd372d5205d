use crate::cluster::Dendrogram;
use crate::dataset::DataElement;
use crate::HacError;

/// The shared lifecycle of every linkage strategy.
///
/// A strategy is driven in two phases: `initialize` validates the dataset,
/// resets the level history to the singleton clusters and builds the
/// strategy's auxiliary structures (similarity matrix, priority queues,
/// best-match cache); `run` then performs exactly N−1 merges, each
/// appending one dendrogram level. The auxiliary state is consumed by
/// `run`, so a second `run` without a fresh `initialize` fails with
/// [`HacError::NotInitialized`].
///
/// The concrete strategies form a closed set: the naive full-rescan
/// family ([`NaiveHac`](crate::NaiveHac)), the priority-queue family
/// ([`CompleteEfficientHac`](crate::CompleteEfficientHac),
/// [`GroupAverageEfficientHac`](crate::GroupAverageEfficientHac)) and
/// next-best-match single linkage
/// ([`SingleLinkageNbm`](crate::SingleLinkageNbm)).
pub trait LinkageStrategy<T> {
    /// A short human-readable description of the strategy.
    fn description(&self) -> &'static str;

    /// Validates the dataset and builds the auxiliary structures,
    /// including the full pairwise similarity matrix. Resets any
    /// previous clustering, so the same instance can be reused across
    /// datasets.
    fn initialize(&mut self, data: &[DataElement<T>]) -> Result<(), HacError>;

    /// Performs the N−1 merges. Requires a completed `initialize`.
    fn run(&mut self) -> Result<(), HacError>;

    /// Read-only access to the accumulated level history. `None` before
    /// `initialize`, or after the dendrogram has been taken.
    fn clustering(&self) -> Option<&Dendrogram<T>>;

    /// Hands the finished dendrogram to the caller, leaving the strategy
    /// ready for a fresh `initialize`.
    fn take_clustering(&mut self) -> Option<Dendrogram<T>>;
}
