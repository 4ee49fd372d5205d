use crate::cluster::Dendrogram;
use crate::dataset::DataElement;
use crate::distance::{pairwise_distances, DistanceMetric};
use crate::strategy::LinkageStrategy;
use crate::validation::validate_dataset;
use crate::HacError;
use log::info;
use num_traits::Float;

/// The linkage rule applied by [`NaiveHac`] when rewriting the surviving
/// cluster's similarities after a merge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NaiveLinkage {
    /// min(sim(i1, j), sim(i2, j))
    Single,
    /// max(sim(i1, j), sim(i2, j))
    Complete,
    /// The exact mean of all pairwise similarities between the full
    /// element sets of the merged cluster and of `j`, recomputed from a
    /// retained copy of the original pairwise matrix.
    Centroid,
}

/// The naive full-rescan family of linkage strategies.
///
/// Keeps a dense working matrix of similarities between active clusters
/// and scans every active row on every merge to find the global best
/// pair, giving O(N³) total work (centroid linkage is costlier per
/// merge because its update averages over full cluster memberships).
/// Ties resolve to the lowest id pair: rows and partners are scanned in
/// ascending order and a candidate only replaces the current best when
/// strictly better.
pub struct NaiveHac<T> {
    linkage: NaiveLinkage,
    metric: DistanceMetric,
    state: Option<NaiveState<T>>,
    dendrogram: Option<Dendrogram<T>>,
}

struct NaiveState<T> {
    sims: Vec<Vec<T>>,
    active: Vec<bool>,
    centroid: Option<CentroidState<T>>,
}

/// Centroid linkage recomputes exact averages, so it retains the original
/// pairwise matrix untouched alongside the member list of every active
/// cluster.
struct CentroidState<T> {
    base_sims: Vec<Vec<T>>,
    members: Vec<Vec<usize>>,
}

impl<T: Float> NaiveHac<T> {
    pub fn new(linkage: NaiveLinkage, metric: DistanceMetric) -> Self {
        NaiveHac {
            linkage,
            metric,
            state: None,
            dendrogram: None,
        }
    }

    pub fn single(metric: DistanceMetric) -> Self {
        Self::new(NaiveLinkage::Single, metric)
    }

    pub fn complete(metric: DistanceMetric) -> Self {
        Self::new(NaiveLinkage::Complete, metric)
    }

    pub fn centroid(metric: DistanceMetric) -> Self {
        Self::new(NaiveLinkage::Centroid, metric)
    }

    /// Scans every active row and partner for the globally best record,
    /// in ascending id order with strictly-better replacement.
    fn best_pair(state: &NaiveState<T>) -> Option<(usize, usize, T)> {
        let n = state.active.len();
        let mut best: Option<(usize, usize, T)> = None;
        for row in 0..n {
            if !state.active[row] {
                continue;
            }
            for partner in 0..n {
                if partner == row || !state.active[partner] {
                    continue;
                }
                let sim = state.sims[row][partner];
                if best.map_or(true, |(_, _, best_sim)| best_sim > sim) {
                    best = Some((row, partner, sim));
                }
            }
        }
        best
    }
}

impl<T: Float> LinkageStrategy<T> for NaiveHac<T> {
    fn description(&self) -> &'static str {
        match self.linkage {
            NaiveLinkage::Single => "Naive single linkage",
            NaiveLinkage::Complete => "Naive complete linkage",
            NaiveLinkage::Centroid => "Naive centroid linkage",
        }
    }

    fn initialize(&mut self, data: &[DataElement<T>]) -> Result<(), HacError> {
        validate_dataset(data)?;
        info!(
            "Initializing {} over {} elements",
            self.description(),
            data.len()
        );

        let vectors: Vec<&[T]> = data.iter().map(|element| element.vector()).collect();
        let sims = pairwise_distances(&vectors, self.metric);
        let centroid = match self.linkage {
            NaiveLinkage::Centroid => Some(CentroidState {
                base_sims: sims.clone(),
                members: (0..data.len()).map(|i| vec![i]).collect(),
            }),
            _ => None,
        };

        self.state = Some(NaiveState {
            active: vec![true; data.len()],
            sims,
            centroid,
        });
        self.dendrogram = Some(Dendrogram::singletons(data.len()));
        Ok(())
    }

    fn run(&mut self) -> Result<(), HacError> {
        let mut state = self.state.take().ok_or(HacError::NotInitialized)?;
        let dendrogram = self.dendrogram.as_mut().ok_or(HacError::NotInitialized)?;
        let linkage = self.linkage;
        let n = state.active.len();

        for _ in 0..n.saturating_sub(1) {
            let (i1, i2, sim) = Self::best_pair(&state).ok_or(HacError::EmptyStructure)?;
            dendrogram.merge(i1, i2, sim)?;

            if let Some(centroid) = state.centroid.as_mut() {
                let absorbed = std::mem::take(&mut centroid.members[i2]);
                centroid.members[i1].extend(absorbed);
            }

            for j in 0..n {
                if !state.active[j] || j == i1 || j == i2 {
                    continue;
                }
                let updated = match linkage {
                    NaiveLinkage::Single => state.sims[i1][j].min(state.sims[i2][j]),
                    NaiveLinkage::Complete => state.sims[i1][j].max(state.sims[i2][j]),
                    NaiveLinkage::Centroid => {
                        let centroid = state
                            .centroid
                            .as_ref()
                            .expect("Centroid linkage retains its base matrix");
                        mean_pairwise_sim(centroid, i1, j)
                    }
                };
                state.sims[i1][j] = updated;
                state.sims[j][i1] = updated;
            }

            state.active[i2] = false;
        }
        Ok(())
    }

    fn clustering(&self) -> Option<&Dendrogram<T>> {
        self.dendrogram.as_ref()
    }

    fn take_clustering(&mut self) -> Option<Dendrogram<T>> {
        self.dendrogram.take()
    }
}

fn mean_pairwise_sim<T: Float>(centroid: &CentroidState<T>, i1: usize, j: usize) -> T {
    let mut total = T::zero();
    for &a in &centroid.members[i1] {
        for &b in &centroid.members[j] {
            total = total + centroid.base_sims[a][b];
        }
    }
    let pair_count = centroid.members[i1].len() * centroid.members[j].len();
    total / T::from(pair_count).expect("Pair count not representable")
}
