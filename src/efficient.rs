use crate::cluster::Dendrogram;
use crate::data_wrappers::SimRecord;
use crate::dataset::DataElement;
use crate::distance::{dot_product, normalize, pairwise_distances, DistanceMetric};
use crate::priority_queue::{PartnerQueue, Priority};
use crate::strategy::LinkageStrategy;
use crate::validation::validate_dataset;
use crate::HacError;
use log::info;
use num_traits::Float;

/// Complete linkage maintained through per-cluster priority queues,
/// O(N² log N) total.
///
/// Every active cluster keeps a [`PartnerQueue`] over its outstanding
/// partners, smallest distance first. Each merge scans the active
/// clusters' best records once for the best-of-bests pair, then updates
/// only the entries touched by the merge: the absorbed cluster is deleted
/// from every queue and the surviving cluster's similarities are rewritten
/// as max(sim(i, k1), sim(i, k2)). Semantics are identical to
/// [`NaiveHac`](crate::NaiveHac) with complete linkage; only the
/// asymptotics differ.
pub struct CompleteEfficientHac<T> {
    metric: DistanceMetric,
    state: Option<CompleteState<T>>,
    dendrogram: Option<Dendrogram<T>>,
}

struct CompleteState<T> {
    sims: Vec<Vec<T>>,
    active: Vec<bool>,
    queues: Vec<PartnerQueue<T>>,
}

impl<T: Float> CompleteEfficientHac<T> {
    pub fn new(metric: DistanceMetric) -> Self {
        CompleteEfficientHac {
            metric,
            state: None,
            dendrogram: None,
        }
    }
}

impl<T: Float> LinkageStrategy<T> for CompleteEfficientHac<T> {
    fn description(&self) -> &'static str {
        "Complete linkage with efficient HAC"
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
        let queues = build_queues(&sims, Priority::SmallestFirst);

        self.state = Some(CompleteState {
            active: vec![true; data.len()],
            sims,
            queues,
        });
        self.dendrogram = Some(Dendrogram::singletons(data.len()));
        Ok(())
    }

    fn run(&mut self) -> Result<(), HacError> {
        let mut state = self.state.take().ok_or(HacError::NotInitialized)?;
        let dendrogram = self.dendrogram.as_mut().ok_or(HacError::NotInitialized)?;
        let n = state.active.len();

        for _ in 0..n.saturating_sub(1) {
            // Best-of-bests over the active clusters' queue heads. A
            // candidate only replaces the current best when strictly
            // smaller, so ties fall to the lowest cluster id.
            let mut best: Option<(usize, SimRecord<T>)> = None;
            for z in 0..n {
                if !state.active[z] {
                    continue;
                }
                let record = state.queues[z].best()?;
                if best.map_or(true, |(_, held)| held.sim > record.sim) {
                    best = Some((z, record));
                }
            }
            let (k1, record) = best.ok_or(HacError::EmptyStructure)?;
            let k2 = record.partner;

            dendrogram.merge(k1, k2, record.sim)?;
            state.active[k2] = false;
            state.queues[k1].clear();

            for i in 0..n {
                if !state.active[i] || i == k1 {
                    continue;
                }
                state.queues[i].remove(k2)?;

                let updated = state.sims[i][k1].max(state.sims[i][k2]);
                state.sims[i][k1] = updated;
                state.sims[k1][i] = updated;
                state.queues[i].set(k1, updated);
                state.queues[k1].set(i, updated);
            }
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

/// Group-average linkage maintained through per-cluster priority queues,
/// O(N² log N) total.
///
/// Similarity is the normalized dot product (cosine) of unit-scaled input
/// vectors, largest first, so this strategy takes no distance metric.
/// Each active cluster carries a running vector sum and element count;
/// after a merge the similarity to every other cluster is the closed-form
/// average pairwise cosine across the combined membership:
/// `(dot(v, v) − m) / (m · (m − 1))` with `v` the summed unit vectors and
/// `m` the combined element count.
pub struct GroupAverageEfficientHac<T> {
    state: Option<GroupAverageState<T>>,
    dendrogram: Option<Dendrogram<T>>,
}

struct GroupAverageState<T> {
    sims: Vec<Vec<T>>,
    active: Vec<bool>,
    queues: Vec<PartnerQueue<T>>,
    vector_sums: Vec<Vec<T>>,
    counts: Vec<usize>,
}

impl<T: Float> GroupAverageEfficientHac<T> {
    pub fn new() -> Self {
        GroupAverageEfficientHac {
            state: None,
            dendrogram: None,
        }
    }
}

impl<T: Float> Default for GroupAverageEfficientHac<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Float> LinkageStrategy<T> for GroupAverageEfficientHac<T> {
    fn description(&self) -> &'static str {
        "Group-average linkage with efficient HAC"
    }

    fn initialize(&mut self, data: &[DataElement<T>]) -> Result<(), HacError> {
        validate_dataset(data)?;
        info!(
            "Initializing {} over {} elements",
            self.description(),
            data.len()
        );

        let mut units = Vec::with_capacity(data.len());
        for (n, element) in data.iter().enumerate() {
            let unit = normalize(element.vector()).ok_or_else(|| {
                HacError::ZeroMagnitude(format!("{n}th vector cannot be unit-normalized"))
            })?;
            units.push(unit);
        }

        let n = units.len();
        let mut sims = vec![vec![T::zero(); n]; n];
        for row in 0..n {
            for col in 0..=row {
                let sim = dot_product(&units[row], &units[col]);
                sims[row][col] = sim;
                sims[col][row] = sim;
            }
        }
        let queues = build_queues(&sims, Priority::LargestFirst);

        self.state = Some(GroupAverageState {
            active: vec![true; n],
            sims,
            queues,
            vector_sums: units,
            counts: vec![1; n],
        });
        self.dendrogram = Some(Dendrogram::singletons(n));
        Ok(())
    }

    fn run(&mut self) -> Result<(), HacError> {
        let mut state = self.state.take().ok_or(HacError::NotInitialized)?;
        let dendrogram = self.dendrogram.as_mut().ok_or(HacError::NotInitialized)?;
        let n = state.active.len();

        for _ in 0..n.saturating_sub(1) {
            let mut best: Option<(usize, SimRecord<T>)> = None;
            for z in 0..n {
                if !state.active[z] {
                    continue;
                }
                let record = state.queues[z].best()?;
                if best.map_or(true, |(_, held)| held.sim < record.sim) {
                    best = Some((z, record));
                }
            }
            let (k1, record) = best.ok_or(HacError::EmptyStructure)?;
            let k2 = record.partner;

            dendrogram.merge(k1, k2, record.sim)?;
            state.counts[k1] += state.counts[k2];
            let absorbed_sum = std::mem::take(&mut state.vector_sums[k2]);
            for (total, part) in state.vector_sums[k1].iter_mut().zip(&absorbed_sum) {
                *total = *total + *part;
            }
            state.active[k2] = false;
            state.queues[k1].clear();

            for i in 0..n {
                if !state.active[i] || i == k1 {
                    continue;
                }
                state.queues[i].remove(k2)?;

                let count = T::from(state.counts[i] + state.counts[k1])
                    .expect("Cluster count not representable");
                let combined: Vec<T> = state.vector_sums[i]
                    .iter()
                    .zip(&state.vector_sums[k1])
                    .map(|(a, b)| *a + *b)
                    .collect();
                let updated =
                    (dot_product(&combined, &combined) - count) / (count * (count - T::one()));

                state.sims[i][k1] = updated;
                state.sims[k1][i] = updated;
                state.queues[i].set(k1, updated);
                state.queues[k1].set(i, updated);
            }
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

/// One queue per cluster, holding every other cluster's similarity.
fn build_queues<T: Float>(sims: &[Vec<T>], priority: Priority) -> Vec<PartnerQueue<T>> {
    let n = sims.len();
    (0..n)
        .map(|row| {
            let mut queue = PartnerQueue::new(priority);
            for partner in 0..n {
                if partner != row {
                    queue.set(partner, sims[row][partner]);
                }
            }
            queue
        })
        .collect()
}
