use crate::dataset::DataElement;
use crate::HacError;
use num_traits::Float;

/// Checks a dataset against the input contract shared by every linkage
/// strategy: non-empty, uniform dimensionality, finite coordinates.
pub(crate) fn validate_dataset<T: Float>(data: &[DataElement<T>]) -> Result<(), HacError> {
    if data.is_empty() {
        return Err(HacError::EmptyDataset);
    }
    let dims_0th = data[0].vector().len();
    for (n, element) in data.iter().enumerate() {
        for coordinate in element.vector() {
            if !coordinate.is_finite() {
                return Err(HacError::NonFiniteCoordinate(format!(
                    "{n}th vector contains non-finite element(s)"
                )));
            }
        }
        let dims_nth = element.vector().len();
        if dims_nth != dims_0th {
            return Err(HacError::WrongDimension(format!(
                "0th data point has {dims_0th} dimensions, but {n}th has {dims_nth}"
            )));
        }
    }
    Ok(())
}
