//! Read-only consumers of a finished dendrogram: per-cluster attribute
//! tallies and a greedy label-matching error rate. Nothing here mutates
//! the clustering.

use crate::cluster::Dendrogram;
use crate::dataset::DataElement;
use crate::HacError;
use num_traits::Float;
use std::collections::BTreeMap;

/// Tallies the values of one attribute within every cluster of the given
/// level. The result maps cluster id to a value → count table.
pub fn attribute_distribution<T: Float>(
    dendrogram: &Dendrogram<T>,
    elements: &[DataElement<T>],
    level: usize,
    attribute: &str,
) -> Result<BTreeMap<usize, BTreeMap<String, usize>>, HacError> {
    let level_map = dendrogram
        .level(level)
        .ok_or(HacError::MissingLevel(level))?;

    let mut result = BTreeMap::new();
    for (&id, &node) in level_map {
        let mut tally: BTreeMap<String, usize> = BTreeMap::new();
        for &element in dendrogram.cluster(node).elements() {
            let data_element = elements.get(element).ok_or_else(|| {
                HacError::WrongDimension(format!(
                    "dendrogram references element {element}, but only {} were given",
                    elements.len()
                ))
            })?;
            let value = data_element
                .attribute(attribute)
                .ok_or_else(|| HacError::MissingAttribute(attribute.to_string()))?;
            *tally.entry(value.to_string()).or_insert(0) += 1;
        }
        result.insert(id, tally);
    }
    Ok(result)
}

/// The error rate of a level against a labelling attribute.
///
/// Clusters are greedily named after attribute values: repeatedly pick
/// the (cluster, unused value) pair with the highest count (ties fall to
/// the lowest cluster id, then the lexicographically smallest value),
/// falling back to an arbitrary unused value with count zero, then to a
/// synthesized `unknown_<n>` name once values run out. Every element not
/// matching its cluster's name counts as an error; the result is
/// errors / total elements.
pub fn clustering_error<T: Float>(
    dendrogram: &Dendrogram<T>,
    elements: &[DataElement<T>],
    level: usize,
    attribute: &str,
) -> Result<f64, HacError> {
    let distribution = attribute_distribution(dendrogram, elements, level, attribute)?;

    let mut remaining: BTreeMap<usize, &BTreeMap<String, usize>> =
        distribution.iter().map(|(id, tally)| (*id, tally)).collect();
    let mut used: BTreeMap<String, bool> = distribution
        .values()
        .flat_map(|tally| tally.keys())
        .map(|value| (value.clone(), false))
        .collect();

    let mut names: Vec<(String, usize)> = Vec::with_capacity(distribution.len());
    let mut unknown_counter = 0;
    for _ in 0..distribution.len() {
        let mut search: Option<(usize, String, usize)> = None;
        for (&id, tally) in &remaining {
            for (value, &count) in tally.iter() {
                if !used[value] && search.as_ref().map_or(true, |found| found.2 < count) {
                    search = Some((id, value.clone(), count));
                }
            }
        }
        if search.is_none() {
            // No unused value left in any remaining cluster: fall back to
            // an unused value seen elsewhere, then to a synthetic name.
            let fallback = used
                .iter()
                .find(|(_, &is_used)| !is_used)
                .map(|(value, _)| value.clone());
            let first_cluster = remaining.keys().next().copied();
            search = match (fallback, first_cluster) {
                (Some(value), Some(id)) => Some((id, value, 0)),
                (None, Some(id)) => {
                    let value = format!("unknown_{unknown_counter}");
                    unknown_counter += 1;
                    Some((id, value, 0))
                }
                _ => None,
            };
        }
        let (id, value, _) = search.ok_or(HacError::EmptyStructure)?;
        used.insert(value.clone(), true);
        names.push((value, id));
        remaining.remove(&id);
    }

    let mut total = 0.0;
    let mut errors = 0.0;
    for (name, id) in &names {
        for (value, &count) in &distribution[id] {
            total += count as f64;
            if value != name {
                errors += count as f64;
            }
        }
    }
    Ok(errors / total)
}
