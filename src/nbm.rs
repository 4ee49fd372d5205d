use crate::cluster::Dendrogram;
use crate::data_wrappers::SimRecord;
use crate::dataset::DataElement;
use crate::distance::{pairwise_distances, DistanceMetric};
use crate::strategy::LinkageStrategy;
use crate::validation::validate_dataset;
use crate::HacError;
use log::info;
use num_traits::Float;

/// Single linkage with a next-best-match cache, amortized O(N²) total.
///
/// Alongside the similarity matrix, every representative cluster caches a
/// record of its current best (minimum distance) partner, and absorbed
/// ids carry a pointer to their surviving representative. A merge scans
/// the cached records once for the global minimum, rewrites only the
/// absorbing cluster's row (min rule), and recomputes only the absorbing
/// cluster's cache. Other caches may go stale, but a stale record always
/// resolves through the pointer array to a pair whose true similarity is
/// also present in the absorbing cluster's fresh cache, so the scan still
/// finds a correct global minimum.
pub struct SingleLinkageNbm<T> {
    metric: DistanceMetric,
    state: Option<NbmState<T>>,
    dendrogram: Option<Dendrogram<T>>,
}

struct NbmState<T> {
    sims: Vec<Vec<T>>,
    /// `parent[i] == i` marks a representative; otherwise the entry names
    /// the representative that absorbed `i`.
    parent: Vec<usize>,
    /// Cached best partner per representative. `None` only once a cluster
    /// has no live partner left.
    best_match: Vec<Option<SimRecord<T>>>,
}

impl<T: Float> SingleLinkageNbm<T> {
    pub fn new(metric: DistanceMetric) -> Self {
        SingleLinkageNbm {
            metric,
            state: None,
            dendrogram: None,
        }
    }

    /// Scans a row for its best live partner, ascending so that equal
    /// similarities fall to the lowest partner id.
    fn best_match_of(
        row: usize,
        sims: &[Vec<T>],
        parent: &[usize],
    ) -> Option<SimRecord<T>> {
        let mut best: Option<SimRecord<T>> = None;
        for partner in 0..sims[row].len() {
            if partner == row || parent[partner] != partner {
                continue;
            }
            let sim = sims[row][partner];
            if best.map_or(true, |held| held.sim > sim) {
                best = Some(SimRecord { partner, sim });
            }
        }
        best
    }
}

impl<T: Float> LinkageStrategy<T> for SingleLinkageNbm<T> {
    fn description(&self) -> &'static str {
        "Single linkage with next-best-match cache"
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
        let parent: Vec<usize> = (0..data.len()).collect();
        let best_match = (0..data.len())
            .map(|row| Self::best_match_of(row, &sims, &parent))
            .collect();

        self.state = Some(NbmState {
            sims,
            parent,
            best_match,
        });
        self.dendrogram = Some(Dendrogram::singletons(data.len()));
        Ok(())
    }

    fn run(&mut self) -> Result<(), HacError> {
        let mut state = self.state.take().ok_or(HacError::NotInitialized)?;
        let dendrogram = self.dendrogram.as_mut().ok_or(HacError::NotInitialized)?;
        let n = state.parent.len();

        for _ in 0..n.saturating_sub(1) {
            let mut best: Option<(usize, SimRecord<T>)> = None;
            for i in 0..n {
                if state.parent[i] != i {
                    continue;
                }
                if let Some(record) = state.best_match[i] {
                    if best.map_or(true, |(_, held)| held.sim > record.sim) {
                        best = Some((i, record));
                    }
                }
            }
            let (i1, record) = best.ok_or(HacError::EmptyStructure)?;
            // The cached partner may have been absorbed since the cache
            // was written; the pointer array resolves it.
            let i2 = state.parent[record.partner];

            dendrogram.merge(i1, i2, record.sim)?;

            for i in 0..n {
                if state.parent[i] == i && i != i1 && i != i2 {
                    let updated = state.sims[i1][i].min(state.sims[i2][i]);
                    state.sims[i1][i] = updated;
                    state.sims[i][i1] = updated;
                }
                if state.parent[i] == i2 {
                    state.parent[i] = i1;
                }
            }

            state.best_match[i1] = Self::best_match_of(i1, &state.sims, &state.parent);
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

#[cfg(test)]
mod tests {
    use super::*;

    fn line_points() -> Vec<DataElement<f64>> {
        [0.0, 1.0, 2.0, 10.0]
            .iter()
            .map(|&x| DataElement::new(vec![x]))
            .collect()
    }

    #[test]
    fn single_linkage_scenario() {
        let mut strategy = SingleLinkageNbm::new(DistanceMetric::Euclidean);
        strategy.initialize(&line_points()).unwrap();
        strategy.run().unwrap();
        let steps: Vec<(usize, usize, f64)> = strategy
            .clustering()
            .unwrap()
            .steps()
            .iter()
            .map(|step| (step.kept, step.absorbed, step.sim))
            .collect();
        assert_eq!(vec![(0, 1, 1.0), (0, 2, 1.0), (0, 3, 8.0)], steps);
    }

    #[test]
    fn stale_cache_resolves_through_pointer_array() {
        // The first merge absorbs 2 into 1, leaving 0's cached record
        // pointing at the dead id 2. That record wins the second scan and
        // must resolve through the pointer array to the survivor 1.
        let data: Vec<DataElement<f64>> = [0.5, 0.0, 0.1, 9.0]
            .iter()
            .map(|&x| DataElement::new(vec![x]))
            .collect();
        let mut strategy = SingleLinkageNbm::new(DistanceMetric::Euclidean);
        strategy.initialize(&data).unwrap();
        strategy.run().unwrap();
        let steps = strategy.clustering().unwrap().steps().to_vec();
        assert_eq!((1, 2), (steps[0].kept, steps[0].absorbed));
        assert_eq!((0, 1), (steps[1].kept, steps[1].absorbed));
        assert_eq!((0, 3), (steps[2].kept, steps[2].absorbed));
        assert!((steps[0].sim - 0.1).abs() < 1e-12);
        assert!((steps[1].sim - 0.4).abs() < 1e-12);
        assert!((steps[2].sim - 8.5).abs() < 1e-12);
    }

    #[test]
    fn run_before_initialize_fails() {
        let mut strategy = SingleLinkageNbm::<f64>::new(DistanceMetric::Euclidean);
        assert_eq!(Err(HacError::NotInitialized), strategy.run());
    }

    #[test]
    fn single_element_dataset_yields_one_level() {
        let mut strategy = SingleLinkageNbm::new(DistanceMetric::Chebyshev);
        strategy.initialize(&[DataElement::new(vec![2.0])]).unwrap();
        strategy.run().unwrap();
        assert_eq!(1, strategy.clustering().unwrap().n_levels());
    }
}
