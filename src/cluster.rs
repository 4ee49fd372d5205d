use crate::data_wrappers::MergeStep;
use crate::HacError;
use log::debug;
use std::collections::BTreeMap;

/// Index of a cluster node within a dendrogram's node arena.
pub type NodeId = usize;

/// A node of the merge tree. Either a leaf wrapping exactly one original
/// data element, or the merge of exactly two child clusters together with
/// the similarity recorded at the moment they were merged.
///
/// The element list of a merge node is the concatenation of its children's
/// element lists, computed once at construction and never mutated.
#[derive(Debug, Clone, PartialEq)]
pub enum Cluster<T> {
    Leaf {
        element: usize,
    },
    Merge {
        left: NodeId,
        right: NodeId,
        sim: T,
        elements: Vec<usize>,
    },
}

impl<T> Cluster<T> {
    /// The original data element indices contained in this cluster.
    pub fn elements(&self) -> &[usize] {
        match self {
            Cluster::Leaf { element } => std::slice::from_ref(element),
            Cluster::Merge { elements, .. } => elements,
        }
    }

    /// The two child node ids, or `None` for a leaf.
    pub fn children(&self) -> Option<(NodeId, NodeId)> {
        match self {
            Cluster::Leaf { .. } => None,
            Cluster::Merge { left, right, .. } => Some((*left, *right)),
        }
    }

    /// The similarity recorded when this cluster was formed, or `None`
    /// for a leaf.
    pub fn sim(&self) -> Option<&T> {
        match self {
            Cluster::Leaf { .. } => None,
            Cluster::Merge { sim, .. } => Some(sim),
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, Cluster::Leaf { .. })
    }
}

/// The full history of a clustering run: one level per merge, each level a
/// mapping from surviving cluster id to its node. Level 0 holds the N
/// singleton leaves keyed by original element index; level k holds exactly
/// N−k clusters. Ids removed by a merge are never reused.
///
/// Nodes are stored in an arena indexed by [`NodeId`]; levels share nodes
/// rather than copying them.
#[derive(Debug, Clone, PartialEq)]
pub struct Dendrogram<T> {
    nodes: Vec<Cluster<T>>,
    levels: Vec<BTreeMap<usize, NodeId>>,
    steps: Vec<MergeStep<T>>,
}

impl<T: Copy> Dendrogram<T> {
    /// Starts a dendrogram at level 0: one singleton leaf per element.
    pub(crate) fn singletons(n_samples: usize) -> Self {
        let nodes: Vec<Cluster<T>> = (0..n_samples)
            .map(|element| Cluster::Leaf { element })
            .collect();
        let level_0 = (0..n_samples).map(|id| (id, id)).collect();
        Dendrogram {
            nodes,
            levels: vec![level_0],
            steps: Vec::new(),
        }
    }

    /// Appends the next level by merging the clusters at `id1` and `id2`:
    /// the most recent level is copied, the entry at `id1` is replaced by
    /// a new merge node over the two previous clusters, and the entry at
    /// `id2` is deleted. This is the only place levels are produced.
    pub(crate) fn merge(&mut self, id1: usize, id2: usize, sim: T) -> Result<(), HacError> {
        let mut level = self.levels[self.levels.len() - 1].clone();
        let left = level.remove(&id1).ok_or(HacError::MissingKey(id1))?;
        let right = level.remove(&id2).ok_or(HacError::MissingKey(id2))?;

        let mut elements = Vec::with_capacity(
            self.nodes[left].elements().len() + self.nodes[right].elements().len(),
        );
        elements.extend_from_slice(self.nodes[left].elements());
        elements.extend_from_slice(self.nodes[right].elements());

        let node_id = self.nodes.len();
        self.nodes.push(Cluster::Merge {
            left,
            right,
            sim,
            elements,
        });
        level.insert(id1, node_id);

        debug!(
            "level {}: merging {id1} with {id2}",
            self.levels.len()
        );
        self.levels.push(level);
        self.steps.push(MergeStep {
            kept: id1,
            absorbed: id2,
            sim,
        });
        Ok(())
    }

    /// The number of levels, including level 0.
    pub fn n_levels(&self) -> usize {
        self.levels.len()
    }

    /// The number of original data elements.
    pub fn n_samples(&self) -> usize {
        self.levels[0].len()
    }

    /// The level at index `k`, if it exists.
    pub fn level(&self, k: usize) -> Option<&BTreeMap<usize, NodeId>> {
        self.levels.get(k)
    }

    /// All levels, in merge order.
    pub fn levels(&self) -> &[BTreeMap<usize, NodeId>] {
        &self.levels
    }

    /// The node behind a [`NodeId`] taken from a level mapping.
    pub fn cluster(&self, id: NodeId) -> &Cluster<T> {
        &self.nodes[id]
    }

    /// The merges performed so far, in order.
    pub fn steps(&self) -> &[MergeStep<T>] {
        &self.steps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn singletons_level() {
        let dendrogram = Dendrogram::<f64>::singletons(3);
        assert_eq!(1, dendrogram.n_levels());
        assert_eq!(3, dendrogram.n_samples());
        let level_0 = dendrogram.level(0).unwrap();
        assert_eq!(3, level_0.len());
        for (id, node) in level_0 {
            assert!(dendrogram.cluster(*node).is_leaf());
            assert_eq!(&[*id], dendrogram.cluster(*node).elements());
        }
    }

    #[test]
    fn merge_replaces_two_entries_with_one() {
        let mut dendrogram = Dendrogram::<f64>::singletons(3);
        dendrogram.merge(0, 2, 1.5).unwrap();

        assert_eq!(2, dendrogram.n_levels());
        let level_1 = dendrogram.level(1).unwrap();
        assert_eq!(2, level_1.len());
        assert!(!level_1.contains_key(&2));

        let merged = dendrogram.cluster(level_1[&0]);
        assert_eq!(&[0, 2], merged.elements());
        assert_eq!(Some(&1.5), merged.sim());
        let (left, right) = merged.children().unwrap();
        assert_eq!(&[0], dendrogram.cluster(left).elements());
        assert_eq!(&[2], dendrogram.cluster(right).elements());

        // Earlier levels are untouched.
        assert_eq!(3, dendrogram.level(0).unwrap().len());
    }

    #[test]
    fn merge_records_steps() {
        let mut dendrogram = Dendrogram::<f64>::singletons(3);
        dendrogram.merge(1, 2, 0.5).unwrap();
        dendrogram.merge(0, 1, 2.0).unwrap();
        assert_eq!(
            vec![
                MergeStep { kept: 1, absorbed: 2, sim: 0.5 },
                MergeStep { kept: 0, absorbed: 1, sim: 2.0 },
            ],
            dendrogram.steps().to_vec()
        );
    }

    #[test]
    fn merge_of_absent_id_fails() {
        let mut dendrogram = Dendrogram::<f64>::singletons(3);
        dendrogram.merge(0, 1, 1.0).unwrap();
        assert_eq!(Err(HacError::MissingKey(1)), dendrogram.merge(2, 1, 1.0));
        // The failed merge left no partial level behind.
        assert_eq!(2, dendrogram.n_levels());
    }

    #[test]
    fn elements_are_a_partition_at_every_level() {
        let mut dendrogram = Dendrogram::<f64>::singletons(4);
        dendrogram.merge(0, 3, 1.0).unwrap();
        dendrogram.merge(1, 2, 1.0).unwrap();
        dendrogram.merge(0, 1, 2.0).unwrap();

        for (k, level) in dendrogram.levels().iter().enumerate() {
            assert_eq!(4 - k, level.len());
            let mut seen: Vec<usize> = level
                .values()
                .flat_map(|node| dendrogram.cluster(*node).elements().iter().copied())
                .collect();
            seen.sort_unstable();
            assert_eq!(vec![0, 1, 2, 3], seen);
        }
    }
}
