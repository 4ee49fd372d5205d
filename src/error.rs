use std::error::Error;
use std::fmt::{Display, Formatter};

/// Possible errors arising from invalid input data or from violated
/// internal invariants. All variants are fatal: a merge is an atomic
/// transformation of the active cluster set, so a failure mid-run leaves
/// no usable partial dendrogram and there is no recovery path.
#[derive(Debug, Clone, PartialEq)]
pub enum HacError {
    /// The dataset provided to `initialize` was empty.
    EmptyDataset,
    /// Input vectors have mismatched dimensions.
    WrongDimension(String),
    /// An input vector contains a non-finite coordinate.
    NonFiniteCoordinate(String),
    /// An input vector has zero magnitude and cannot be unit-normalized.
    ZeroMagnitude(String),
    /// `run` was called before `initialize` completed.
    NotInitialized,
    /// A priority structure was queried for its best entry while empty.
    /// Indicates a broken invariant, not a user error.
    EmptyStructure,
    /// A cluster id was expected in a structure but was absent.
    /// Indicates a broken invariant, not a user error.
    MissingKey(usize),
    /// A dendrogram level index was out of range.
    MissingLevel(usize),
    /// A data file index was out of range.
    MissingFile(usize),
    /// A clustering run index was out of range.
    MissingRun(usize),
    /// A data element lacks the requested attribute.
    MissingAttribute(String),
    /// Loading or parsing a data file failed.
    Ingest(String),
}

impl Error for HacError {}

impl Display for HacError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let message = match self {
            HacError::EmptyDataset => String::from("The dataset provided is empty"),
            HacError::WrongDimension(msg) => {
                format!("Input vectors have mismatched dimensions: {msg}")
            }
            HacError::NonFiniteCoordinate(msg) => format!("Non finite coordinate: {msg}"),
            HacError::ZeroMagnitude(msg) => format!("Zero magnitude vector: {msg}"),
            HacError::NotInitialized => {
                String::from("run was called before initialize completed")
            }
            HacError::EmptyStructure => {
                String::from("best was queried on an empty priority structure")
            }
            HacError::MissingKey(id) => format!("Cluster id {id} is not present"),
            HacError::MissingLevel(level) => format!("There is no level {level}"),
            HacError::MissingFile(index) => format!("There is no data file with index {index}"),
            HacError::MissingRun(index) => {
                format!("There is no clustering run with index {index}")
            }
            HacError::MissingAttribute(name) => {
                format!("Data element has no attribute named '{name}'")
            }
            HacError::Ingest(msg) => format!("Loading data failed: {msg}"),
        };
        write!(f, "{message}")
    }
}
