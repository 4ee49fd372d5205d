/// A (partner cluster, similarity) pair. The comparison direction is
/// decided by the consumer: the distance-based strategies rank smaller
/// values as better, group-average linkage ranks larger values as better.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SimRecord<T> {
    pub partner: usize,
    pub sim: T,
}

/// One merge performed while building a dendrogram: the surviving cluster
/// id, the id it absorbed, and the similarity recorded at that moment.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MergeStep<T> {
    pub kept: usize,
    pub absorbed: usize,
    pub sim: T,
}
