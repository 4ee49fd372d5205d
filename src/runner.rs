use crate::cluster::Dendrogram;
use crate::dataset::{DataElement, DataFile};
use crate::reporting;
use crate::strategy::LinkageStrategy;
use crate::HacError;
use log::info;
use num_traits::Float;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::BTreeMap;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;
use std::time::{Duration, Instant};

/// One completed clustering run: where the data came from, which strategy
/// produced it, how long the two lifecycle phases took, the dendrogram,
/// and a snapshot of the elements it was built from (prefix and sample
/// runs cluster subsets, so each run carries its own).
#[derive(Debug, Clone)]
pub struct ClusteringRun<T> {
    pub source: String,
    pub strategy: String,
    pub init_time: Duration,
    pub run_time: Duration,
    pub clustering: Dendrogram<T>,
    pub elements: Vec<DataElement<T>>,
}

impl<T: Float> ClusteringRun<T> {
    /// A one-line human-readable description of the run.
    pub fn summary(&self) -> String {
        format!(
            "Run of '{}' over '{}' ({} elements): initialize {:.3}s, run {:.3}s, total {:.3}s",
            self.strategy,
            self.source,
            self.elements.len(),
            self.init_time.as_secs_f64(),
            self.run_time.as_secs_f64(),
            (self.init_time + self.run_time).as_secs_f64(),
        )
    }
}

/// The clustering facade: loads data files, drives strategies over them
/// and collects the resulting runs for reporting.
pub struct Hac<T> {
    data_files: Vec<DataFile<T>>,
    runs: Vec<ClusteringRun<T>>,
}

impl<T: Float> Hac<T> {
    pub fn new() -> Self {
        Hac {
            data_files: Vec::new(),
            runs: Vec::new(),
        }
    }

    /// Loads a comma-separated data file (see [`DataFile::load`]) and
    /// returns the number of elements read.
    pub fn load_csv(
        &mut self,
        path: impl AsRef<Path>,
        attribute_columns: usize,
    ) -> Result<usize, HacError> {
        let data_file = DataFile::load(path, attribute_columns)?;
        let loaded = data_file.elements.len();
        info!("Loaded {loaded} elements from {}", data_file.path);
        self.data_files.push(data_file);
        Ok(loaded)
    }

    /// Registers an already constructed data file.
    pub fn add_data_file(&mut self, data_file: DataFile<T>) {
        self.data_files.push(data_file);
    }

    /// Runs the given strategy over every loaded data file, recording one
    /// [`ClusteringRun`] per file.
    pub fn cluster(&mut self, strategy: &mut dyn LinkageStrategy<T>) -> Result<(), HacError> {
        if self.data_files.is_empty() {
            return Err(HacError::EmptyDataset);
        }
        for index in 0..self.data_files.len() {
            let source = self.data_files[index].path.clone();
            let elements = self.data_files[index].elements.clone();
            self.cluster_elements(source, elements, strategy)?;
        }
        Ok(())
    }

    /// Runs the strategy over growing prefixes of one file, `step_size`
    /// elements at a time. Useful for observing how a strategy's runtime
    /// scales with the input.
    pub fn cluster_prefixes(
        &mut self,
        strategy: &mut dyn LinkageStrategy<T>,
        file_index: usize,
        step_size: usize,
    ) -> Result<(), HacError> {
        if step_size == 0 {
            return Err(HacError::Ingest(String::from("step size must be positive")));
        }
        let data_file = self
            .data_files
            .get(file_index)
            .ok_or(HacError::MissingFile(file_index))?;
        let path = data_file.path.clone();
        let elements = data_file.elements.clone();

        let mut upto = step_size;
        while upto <= elements.len() {
            let source = format!("{path}[{upto}]");
            self.cluster_elements(source, elements[..upto].to_vec(), strategy)?;
            upto += step_size;
        }
        Ok(())
    }

    /// Runs the strategy over `n_runs` random samples of `sample_size`
    /// elements from one file. The sampling is driven by the given seed,
    /// so a repeated call reproduces the same runs.
    pub fn cluster_samples(
        &mut self,
        strategy: &mut dyn LinkageStrategy<T>,
        file_index: usize,
        sample_size: usize,
        n_runs: usize,
        seed: u64,
    ) -> Result<(), HacError> {
        let data_file = self
            .data_files
            .get(file_index)
            .ok_or(HacError::MissingFile(file_index))?;
        if sample_size > data_file.elements.len() {
            return Err(HacError::Ingest(format!(
                "sample size {sample_size} exceeds the {} elements loaded",
                data_file.elements.len()
            )));
        }
        let path = data_file.path.clone();
        let elements = data_file.elements.clone();

        let mut rng = StdRng::seed_from_u64(seed);
        for run in 0..n_runs {
            let sample: Vec<DataElement<T>> =
                rand::seq::index::sample(&mut rng, elements.len(), sample_size)
                    .into_iter()
                    .map(|i| elements[i].clone())
                    .collect();
            let source = format!("{path}[sample {run}]");
            self.cluster_elements(source, sample, strategy)?;
        }
        Ok(())
    }

    fn cluster_elements(
        &mut self,
        source: String,
        elements: Vec<DataElement<T>>,
        strategy: &mut dyn LinkageStrategy<T>,
    ) -> Result<(), HacError> {
        let init_started = Instant::now();
        strategy.initialize(&elements)?;
        let run_started = Instant::now();
        strategy.run()?;
        let run_time = run_started.elapsed();

        let clustering = strategy
            .take_clustering()
            .ok_or(HacError::NotInitialized)?;
        let run = ClusteringRun {
            source,
            strategy: strategy.description().to_string(),
            init_time: run_started.duration_since(init_started),
            run_time,
            clustering,
            elements,
        };
        info!("{}", run.summary());
        self.runs.push(run);
        Ok(())
    }

    /// The completed runs, in execution order.
    pub fn runs(&self) -> &[ClusteringRun<T>] {
        &self.runs
    }

    /// Per-cluster tallies of an attribute's values at one level of a
    /// run's dendrogram.
    pub fn distribution(
        &self,
        run_index: usize,
        level: usize,
        attribute: &str,
    ) -> Result<BTreeMap<usize, BTreeMap<String, usize>>, HacError> {
        let run = self
            .runs
            .get(run_index)
            .ok_or(HacError::MissingRun(run_index))?;
        reporting::attribute_distribution(&run.clustering, &run.elements, level, attribute)
    }

    /// The label-matching error rate of one run at the given level (see
    /// [`reporting::clustering_error`]).
    pub fn clustering_error(
        &self,
        run_index: usize,
        level: usize,
        attribute: &str,
    ) -> Result<f64, HacError> {
        let run = self
            .runs
            .get(run_index)
            .ok_or(HacError::MissingRun(run_index))?;
        reporting::clustering_error(&run.clustering, &run.elements, level, attribute)
    }

    /// Timing information of every run as semicolon-separated rows:
    /// source, strategy, initialize seconds, run seconds, total seconds.
    pub fn run_information_csv(&self) -> String {
        let mut out = String::new();
        for run in &self.runs {
            out.push_str(&format!(
                "{};{};{:.6};{:.6};{:.6}\n",
                run.source,
                run.strategy,
                run.init_time.as_secs_f64(),
                run.run_time.as_secs_f64(),
                (run.init_time + run.run_time).as_secs_f64(),
            ));
        }
        out
    }

    /// Appends (or rewrites) the run information rows to a file.
    pub fn save_run_information_csv(
        &self,
        path: impl AsRef<Path>,
        append: bool,
    ) -> Result<(), HacError> {
        write_report(path, append, &self.run_information_csv())
    }

    /// Error rates of every run at the given level as semicolon-separated
    /// rows: strategy, source, error rate.
    pub fn quality_information_csv(
        &self,
        level: usize,
        attribute: &str,
    ) -> Result<String, HacError> {
        let mut out = String::new();
        for (index, run) in self.runs.iter().enumerate() {
            let error = self.clustering_error(index, level, attribute)?;
            out.push_str(&format!("{};{};{:.6}\n", run.strategy, run.source, error));
        }
        Ok(out)
    }

    /// Appends (or rewrites) the quality information rows to a file.
    pub fn save_quality_information_csv(
        &self,
        path: impl AsRef<Path>,
        level: usize,
        attribute: &str,
        append: bool,
    ) -> Result<(), HacError> {
        write_report(path, append, &self.quality_information_csv(level, attribute)?)
    }
}

impl<T: Float> Default for Hac<T> {
    fn default() -> Self {
        Self::new()
    }
}

fn write_report(path: impl AsRef<Path>, append: bool, contents: &str) -> Result<(), HacError> {
    let path = path.as_ref();
    let mut file = OpenOptions::new()
        .create(true)
        .append(append)
        .write(true)
        .truncate(!append)
        .open(path)
        .map_err(|e| HacError::Ingest(format!("{}: {e}", path.display())))?;
    file.write_all(contents.as_bytes())
        .map_err(|e| HacError::Ingest(format!("{}: {e}", path.display())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::DistanceMetric;
    use crate::nbm::SingleLinkageNbm;

    fn line_file() -> DataFile<f64> {
        DataFile::parse(
            "id,class,x\na,near,0.0\nb,near,1.0\nc,near,2.0\nd,far,10.0\n",
            2,
        )
        .unwrap()
    }

    #[test]
    fn cluster_records_one_run_per_file() {
        let mut hac = Hac::new();
        hac.add_data_file(line_file());
        hac.add_data_file(line_file());
        let mut strategy = SingleLinkageNbm::new(DistanceMetric::Euclidean);
        hac.cluster(&mut strategy).unwrap();

        assert_eq!(2, hac.runs().len());
        for run in hac.runs() {
            assert_eq!(4, run.clustering.n_samples());
            assert_eq!(4, run.clustering.n_levels());
        }
    }

    #[test]
    fn cluster_without_data_fails() {
        let mut hac = Hac::<f64>::new();
        let mut strategy = SingleLinkageNbm::new(DistanceMetric::Euclidean);
        assert_eq!(Err(HacError::EmptyDataset), hac.cluster(&mut strategy));
    }

    #[test]
    fn prefixes_grow_by_step_size() {
        let mut hac = Hac::new();
        hac.add_data_file(line_file());
        let mut strategy = SingleLinkageNbm::new(DistanceMetric::Euclidean);
        hac.cluster_prefixes(&mut strategy, 0, 2).unwrap();

        assert_eq!(2, hac.runs().len());
        assert_eq!(2, hac.runs()[0].elements.len());
        assert_eq!(4, hac.runs()[1].elements.len());
        assert!(hac.runs()[0].source.ends_with("[2]"));
    }

    #[test]
    fn samples_are_reproducible_for_a_seed() {
        let mut first = Hac::new();
        first.add_data_file(line_file());
        let mut strategy = SingleLinkageNbm::new(DistanceMetric::Euclidean);
        first.cluster_samples(&mut strategy, 0, 3, 2, 128).unwrap();

        let mut second = Hac::new();
        second.add_data_file(line_file());
        let mut strategy = SingleLinkageNbm::new(DistanceMetric::Euclidean);
        second.cluster_samples(&mut strategy, 0, 3, 2, 128).unwrap();

        assert_eq!(2, first.runs().len());
        for (a, b) in first.runs().iter().zip(second.runs()) {
            assert_eq!(a.elements, b.elements);
            assert_eq!(a.clustering, b.clustering);
        }
    }

    #[test]
    fn oversized_sample_fails() {
        let mut hac = Hac::new();
        hac.add_data_file(line_file());
        let mut strategy = SingleLinkageNbm::new(DistanceMetric::Euclidean);
        assert!(matches!(
            hac.cluster_samples(&mut strategy, 0, 10, 1, 0),
            Err(HacError::Ingest(..))
        ));
    }

    #[test]
    fn missing_file_index_fails() {
        let mut hac = Hac::<f64>::new();
        let mut strategy = SingleLinkageNbm::new(DistanceMetric::Euclidean);
        assert_eq!(
            Err(HacError::MissingFile(1)),
            hac.cluster_prefixes(&mut strategy, 1, 1)
        );
    }

    #[test]
    fn run_information_csv_has_one_row_per_run() {
        let mut hac = Hac::new();
        hac.add_data_file(line_file());
        let mut strategy = SingleLinkageNbm::new(DistanceMetric::Euclidean);
        hac.cluster(&mut strategy).unwrap();

        let csv = hac.run_information_csv();
        assert_eq!(1, csv.lines().count());
        assert!(csv.contains("Single linkage with next-best-match cache"));
    }
}
