use hac::{
    CompleteEfficientHac, DataElement, Dendrogram, DistanceMetric, GroupAverageEfficientHac,
    HacError, LinkageStrategy, NaiveHac, SingleLinkageNbm,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn random_elements(n: usize, dims: usize, seed: u64) -> Vec<DataElement<f64>> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n)
        .map(|_| DataElement::new((0..dims).map(|_| rng.gen_range(-5.0..5.0)).collect()))
        .collect()
}

fn run_strategy(
    strategy: &mut dyn LinkageStrategy<f64>,
    data: &[DataElement<f64>],
) -> Dendrogram<f64> {
    strategy.initialize(data).unwrap();
    strategy.run().unwrap();
    strategy.take_clustering().unwrap()
}

fn assert_partition_invariants(dendrogram: &Dendrogram<f64>) {
    let n = dendrogram.n_samples();
    for (k, level) in dendrogram.levels().iter().enumerate() {
        // Level k holds exactly N - k clusters.
        assert_eq!(n - k, level.len());

        // Together the clusters of a level hold every element exactly once.
        let mut elements: Vec<usize> = level
            .values()
            .flat_map(|&node| dendrogram.cluster(node).elements().iter().copied())
            .collect();
        elements.sort_unstable();
        assert_eq!((0..n).collect::<Vec<_>>(), elements);
    }

    // Every merge node's element list is the disjoint union of its
    // children's.
    let top = dendrogram.level(dendrogram.n_levels() - 1).unwrap();
    let mut pending: Vec<usize> = top.values().copied().collect();
    while let Some(node) = pending.pop() {
        let cluster = dendrogram.cluster(node);
        if let Some((left, right)) = cluster.children() {
            let left_elements = dendrogram.cluster(left).elements();
            let right_elements = dendrogram.cluster(right).elements();
            assert_eq!(
                cluster.elements().len(),
                left_elements.len() + right_elements.len()
            );
            let mut combined: Vec<usize> = left_elements
                .iter()
                .chain(right_elements.iter())
                .copied()
                .collect();
            combined.sort_unstable();
            let mut elements: Vec<usize> = cluster.elements().to_vec();
            elements.sort_unstable();
            assert_eq!(elements, combined);
            assert!(left_elements.iter().all(|e| !right_elements.contains(e)));
            pending.push(left);
            pending.push(right);
        }
    }
}

#[test]
fn four_point_scenario_single_linkage() {
    let data: Vec<DataElement<f64>> = [0.0, 1.0, 2.0, 10.0]
        .iter()
        .map(|&x| DataElement::new(vec![x]))
        .collect();

    // {0} and {1} merge at distance 1; point 2 joins at distance 1 (its
    // distance to the nearest member); point 10 joins last at distance 8.
    let strategies: Vec<Box<dyn LinkageStrategy<f64>>> = vec![
        Box::new(NaiveHac::single(DistanceMetric::Euclidean)),
        Box::new(SingleLinkageNbm::new(DistanceMetric::Euclidean)),
    ];
    for mut strategy in strategies {
        let dendrogram = run_strategy(strategy.as_mut(), &data);
        let sims: Vec<f64> = dendrogram.steps().iter().map(|s| s.sim).collect();
        assert_eq!(vec![1.0, 1.0, 8.0], sims);
    }
}

#[test]
fn four_point_scenario_complete_linkage() {
    let data: Vec<DataElement<f64>> = [0.0, 1.0, 2.0, 10.0]
        .iter()
        .map(|&x| DataElement::new(vec![x]))
        .collect();

    // Unlike single linkage, {0,1} joins 2 at max(d(0,2), d(1,2)) = 2,
    // and the last merge records max distance 10.
    let strategies: Vec<Box<dyn LinkageStrategy<f64>>> = vec![
        Box::new(NaiveHac::complete(DistanceMetric::Euclidean)),
        Box::new(CompleteEfficientHac::new(DistanceMetric::Euclidean)),
    ];
    for mut strategy in strategies {
        let dendrogram = run_strategy(strategy.as_mut(), &data);
        let sims: Vec<f64> = dendrogram.steps().iter().map(|s| s.sim).collect();
        assert_eq!(vec![1.0, 2.0, 10.0], sims);
    }
}

#[test]
fn naive_and_efficient_complete_linkage_agree() {
    // The O(N^3) rescans and the O(N^2 log N) priority queues implement
    // the same linkage; their dendrograms must be identical, merge order
    // and similarity values included.
    for seed in [7, 21, 99] {
        let data = random_elements(30, 3, seed);
        let naive = run_strategy(&mut NaiveHac::complete(DistanceMetric::Euclidean), &data);
        let efficient = run_strategy(&mut CompleteEfficientHac::new(DistanceMetric::Euclidean), &data);
        assert_eq!(naive, efficient);
    }
}

#[test]
fn naive_and_nbm_single_linkage_agree() {
    for seed in [5, 42, 1234] {
        let data = random_elements(30, 3, seed);
        let naive = run_strategy(&mut NaiveHac::single(DistanceMetric::Manhattan), &data);
        let nbm = run_strategy(&mut SingleLinkageNbm::new(DistanceMetric::Manhattan), &data);
        assert_eq!(naive, nbm);
    }
}

#[test]
fn partition_invariants_hold_for_every_strategy() {
    let data = random_elements(24, 2, 3);
    let strategies: Vec<Box<dyn LinkageStrategy<f64>>> = vec![
        Box::new(NaiveHac::single(DistanceMetric::Euclidean)),
        Box::new(NaiveHac::complete(DistanceMetric::Euclidean)),
        Box::new(NaiveHac::centroid(DistanceMetric::Euclidean)),
        Box::new(CompleteEfficientHac::new(DistanceMetric::Euclidean)),
        Box::new(GroupAverageEfficientHac::new()),
        Box::new(SingleLinkageNbm::new(DistanceMetric::Euclidean)),
    ];
    for mut strategy in strategies {
        let dendrogram = run_strategy(strategy.as_mut(), &data);
        assert_partition_invariants(&dendrogram);
    }
}

#[test]
fn merge_distances_are_monotone_for_single_and_complete() {
    let data = random_elements(25, 3, 11);
    let dendrograms = [
        run_strategy(&mut NaiveHac::single(DistanceMetric::Euclidean), &data),
        run_strategy(&mut SingleLinkageNbm::new(DistanceMetric::Euclidean), &data),
        run_strategy(&mut NaiveHac::complete(DistanceMetric::Euclidean), &data),
        run_strategy(&mut CompleteEfficientHac::new(DistanceMetric::Euclidean), &data),
    ];
    for dendrogram in &dendrograms {
        let sims: Vec<f64> = dendrogram.steps().iter().map(|s| s.sim).collect();
        assert!(
            sims.windows(2).all(|pair| pair[0] <= pair[1]),
            "merge distances decreased: {sims:?}"
        );
    }
    // No such assertion for centroid linkage: inversions are a known
    // property of the rule, not a defect.
}

#[test]
fn rerunning_a_strategy_reproduces_the_dendrogram() {
    let data = random_elements(20, 2, 17);
    let mut strategy = CompleteEfficientHac::new(DistanceMetric::Euclidean);
    let first = run_strategy(&mut strategy, &data);
    let second = run_strategy(&mut strategy, &data);
    assert_eq!(first, second);
}

#[test]
fn single_element_dataset_has_one_level() {
    let data = vec![DataElement::new(vec![3.0, 4.0])];
    let dendrogram = run_strategy(&mut NaiveHac::centroid(DistanceMetric::Euclidean), &data);
    assert_eq!(1, dendrogram.n_levels());
    assert_eq!(1, dendrogram.level(0).unwrap().len());
    assert!(dendrogram.steps().is_empty());
}

#[test]
fn empty_dataset_is_rejected() {
    let mut strategy = GroupAverageEfficientHac::<f64>::new();
    assert_eq!(Err(HacError::EmptyDataset), strategy.initialize(&[]));
}

#[test]
fn run_before_initialize_is_rejected() {
    let mut strategy = NaiveHac::<f64>::centroid(DistanceMetric::Euclidean);
    assert_eq!(Err(HacError::NotInitialized), strategy.run());
    assert!(strategy.clustering().is_none());
}

#[test]
fn metrics_only_change_geometry_not_structure() {
    // On 1-D data every metric here degenerates to |a - b| (squared
    // euclidean aside), so single linkage must merge in the same order.
    let data: Vec<DataElement<f64>> = [0.0, 1.0, 2.0, 10.0]
        .iter()
        .map(|&x| DataElement::new(vec![x]))
        .collect();
    let euclidean = run_strategy(&mut SingleLinkageNbm::new(DistanceMetric::Euclidean), &data);
    let manhattan = run_strategy(&mut SingleLinkageNbm::new(DistanceMetric::Manhattan), &data);
    let chebyshev = run_strategy(&mut SingleLinkageNbm::new(DistanceMetric::Chebyshev), &data);
    assert_eq!(euclidean, manhattan);
    assert_eq!(euclidean, chebyshev);

    let merged: Vec<(usize, usize)> = euclidean
        .steps()
        .iter()
        .map(|s| (s.kept, s.absorbed))
        .collect();
    let squared = run_strategy(
        &mut SingleLinkageNbm::new(DistanceMetric::SquaredEuclidean),
        &data,
    );
    let squared_merged: Vec<(usize, usize)> = squared
        .steps()
        .iter()
        .map(|s| (s.kept, s.absorbed))
        .collect();
    assert_eq!(merged, squared_merged);
}
