use hac::{DistanceMetric, Hac, SingleLinkageNbm};

fn main() {
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| String::from("test_data.csv"));

    let mut hac = Hac::<f64>::new();
    hac.load_csv(&path, 2).expect("Unable to read file");

    let mut strategy = SingleLinkageNbm::new(DistanceMetric::Euclidean);
    hac.cluster(&mut strategy).expect("Clustering failed");

    for run in hac.runs() {
        println!("{}", run.summary());
        for step in run.clustering.steps() {
            println!("{} <- {} at {}", step.kept, step.absorbed, step.sim);
        }
    }
}
