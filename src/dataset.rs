use crate::HacError;
use num_traits::Float;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// One element of the input data: a fixed-length numeric vector plus an
/// opaque attribute map keyed by name. Only the vector is consumed by the
/// clustering core; attributes pass through to reporting unread.
#[derive(Debug, Clone, PartialEq)]
pub struct DataElement<T> {
    vector: Vec<T>,
    attributes: HashMap<String, String>,
}

impl<T: Float> DataElement<T> {
    pub fn new(vector: Vec<T>) -> Self {
        DataElement {
            vector,
            attributes: HashMap::new(),
        }
    }

    pub fn with_attributes(vector: Vec<T>, attributes: HashMap<String, String>) -> Self {
        DataElement { vector, attributes }
    }

    pub fn vector(&self) -> &[T] {
        &self.vector
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(|value| value.as_str())
    }
}

/// A data file loaded from delimited text, ready for clustering.
#[derive(Debug, Clone, PartialEq)]
pub struct DataFile<T> {
    pub path: String,
    pub attribute_names: Vec<String>,
    pub elements: Vec<DataElement<T>>,
}

impl<T: Float> DataFile<T> {
    /// Loads a comma-separated file. The first row names the columns; in
    /// every following row the first `attribute_columns` cells are kept as
    /// string attributes under their column names, and the remaining cells
    /// are parsed as the numeric vector.
    pub fn load(path: impl AsRef<Path>, attribute_columns: usize) -> Result<Self, HacError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .map_err(|e| HacError::Ingest(format!("{}: {e}", path.display())))?;
        let data_file = Self::parse(&contents, attribute_columns)?;
        Ok(DataFile {
            path: path.display().to_string(),
            ..data_file
        })
    }

    /// Parses delimited text in the format described on [`DataFile::load`].
    pub fn parse(contents: &str, attribute_columns: usize) -> Result<Self, HacError> {
        let mut lines = contents.lines().filter(|line| !line.trim().is_empty());
        let header = lines
            .next()
            .ok_or_else(|| HacError::Ingest(String::from("file has no header row")))?;
        let attribute_names: Vec<String> = header
            .split(',')
            .take(attribute_columns)
            .map(|name| name.trim().to_string())
            .collect();
        if attribute_names.len() < attribute_columns {
            return Err(HacError::Ingest(format!(
                "header has {} columns, but {attribute_columns} attribute column(s) expected",
                attribute_names.len()
            )));
        }

        let mut elements = Vec::new();
        for (row, line) in lines.enumerate() {
            let cells: Vec<&str> = line.split(',').map(|cell| cell.trim()).collect();
            if cells.len() <= attribute_columns {
                return Err(HacError::Ingest(format!(
                    "row {row} has no numeric columns"
                )));
            }
            let attributes = attribute_names
                .iter()
                .cloned()
                .zip(cells[..attribute_columns].iter().map(|s| s.to_string()))
                .collect();
            let mut vector = Vec::with_capacity(cells.len() - attribute_columns);
            for cell in &cells[attribute_columns..] {
                let value = cell
                    .parse::<f64>()
                    .map_err(|e| HacError::Ingest(format!("row {row}: '{cell}': {e}")))?;
                let value = T::from(value).ok_or_else(|| {
                    HacError::Ingest(format!("row {row}: '{cell}' is not representable"))
                })?;
                vector.push(value);
            }
            elements.push(DataElement { vector, attributes });
        }

        Ok(DataFile {
            path: String::new(),
            attribute_names,
            elements,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CSV: &str = "\
id,class,x,y
a,red,1.0,2.0
b,red,1.5,2.5
c,blue,8.0,9.0
";

    #[test]
    fn parse_attributes_and_vectors() {
        let file = DataFile::<f64>::parse(CSV, 2).unwrap();
        assert_eq!(vec!["id", "class"], file.attribute_names);
        assert_eq!(3, file.elements.len());
        assert_eq!(&[1.0, 2.0], file.elements[0].vector());
        assert_eq!(Some("red"), file.elements[0].attribute("class"));
        assert_eq!(Some("c"), file.elements[2].attribute("id"));
        assert_eq!(None, file.elements[0].attribute("missing"));
    }

    #[test]
    fn parse_without_attribute_columns() {
        let file = DataFile::<f32>::parse("x,y\n0.5,0.5\n", 0).unwrap();
        assert!(file.attribute_names.is_empty());
        assert_eq!(&[0.5, 0.5], file.elements[0].vector());
    }

    #[test]
    fn parse_rejects_non_numeric_cells() {
        let result = DataFile::<f64>::parse("id,x\na,not-a-number\n", 1);
        assert!(matches!(result, Err(HacError::Ingest(..))));
    }

    #[test]
    fn parse_rejects_missing_header() {
        let result = DataFile::<f64>::parse("", 1);
        assert!(matches!(result, Err(HacError::Ingest(..))));
    }
}
