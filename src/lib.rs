//! Hierarchical agglomerative clustering ("HAC") in Rust. Generic over
//! floating point numeric types.
//!
//! HAC builds a full merge hierarchy, a dendrogram, instead of a single
//! flat partition: starting from one singleton cluster per data point, the
//! two most similar clusters are merged, N−1 times, until one remains.
//! Every intermediate level is kept, so the tree can be cut at any
//! granularity after the fact. What "most similar" means between clusters
//! is the linkage rule, and this crate implements the classic ones with
//! three different engine designs:
//!
//!  1. [`NaiveHac`]: single, complete and centroid linkage by full
//!     similarity-matrix rescans, O(N³) overall. Simple and the reference
//!     point for the faster engines;
//!  2. [`CompleteEfficientHac`] and [`GroupAverageEfficientHac`]: the
//!     priority-queue driven algorithms, O(N² log N) overall; and
//!  3. [`SingleLinkageNbm`]: single linkage with a next-best-match
//!     cache, amortized O(N²) overall.
//!
//! All strategies share one lifecycle ([`LinkageStrategy`]): `initialize`
//! computes the full pairwise similarity matrix and the strategy's
//! auxiliary state, `run` performs the merges, and the finished
//! [`Dendrogram`] is handed to the caller. The same linkage rule produces
//! the same dendrogram regardless of engine; tie-breaking is
//! deterministic (lowest cluster ids win).
//!
//! # Examples
//! ```
//!use hac::{DataElement, DistanceMetric, LinkageStrategy, SingleLinkageNbm};
//!
//!let data: Vec<DataElement<f64>> = [0.0, 1.0, 2.0, 10.0]
//!    .iter()
//!    .map(|&x| DataElement::new(vec![x]))
//!    .collect();
//!
//!let mut strategy = SingleLinkageNbm::new(DistanceMetric::Euclidean);
//!strategy.initialize(&data).unwrap();
//!strategy.run().unwrap();
//!
//!let dendrogram = strategy.clustering().unwrap();
//!// Four levels: the singletons plus one per merge.
//!assert_eq!(4, dendrogram.n_levels());
//!// The last level holds a single cluster containing every element.
//!let top = dendrogram.level(3).unwrap();
//!assert_eq!(1, top.len());
//!assert_eq!(4, dendrogram.cluster(top[&0]).elements().len());
//! ```
//!
//! # References
//! * [Manning, Raghavan & Schütze, Introduction to Information Retrieval: Hierarchical clustering](https://nlp.stanford.edu/IR-book/html/htmledition/hierarchical-clustering-1.html)
//! * [Time complexity of HAC](https://nlp.stanford.edu/IR-book/html/htmledition/time-complexity-of-hac-1.html)

pub use crate::cluster::{Cluster, Dendrogram, NodeId};
pub use crate::data_wrappers::{MergeStep, SimRecord};
pub use crate::dataset::{DataElement, DataFile};
pub use crate::distance::DistanceMetric;
pub use crate::efficient::{CompleteEfficientHac, GroupAverageEfficientHac};
pub use crate::error::HacError;
pub use crate::naive::{NaiveHac, NaiveLinkage};
pub use crate::nbm::SingleLinkageNbm;
pub use crate::runner::{ClusteringRun, Hac};
pub use crate::strategy::LinkageStrategy;

mod cluster;
mod data_wrappers;
mod dataset;
mod distance;
mod efficient;
mod error;
mod naive;
mod nbm;
mod priority_queue;
pub mod reporting;
mod runner;
mod strategy;
mod validation;
