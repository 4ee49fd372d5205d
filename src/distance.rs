use num_traits::Float;

/// Possible distance metrics that can be used when calculating the
/// pairwise similarities between data points.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum DistanceMetric {
    Euclidean,
    SquaredEuclidean,
    Manhattan,
    Chebyshev,
}

impl DistanceMetric {
    pub(crate) fn calc_dist<T: Float>(&self, a: &[T], b: &[T]) -> T {
        match *self {
            Self::Euclidean => euclidean_distance(a, b),
            Self::SquaredEuclidean => squared_euclidean_distance(a, b),
            Self::Manhattan => manhattan_distance(a, b),
            Self::Chebyshev => chebyshev_distance(a, b),
        }
    }

    pub(crate) fn name(&self) -> &'static str {
        match *self {
            Self::Euclidean => "euclidean",
            Self::SquaredEuclidean => "squared euclidean",
            Self::Manhattan => "manhattan",
            Self::Chebyshev => "chebyshev",
        }
    }
}

pub(crate) fn euclidean_distance<T: Float>(a: &[T], b: &[T]) -> T {
    squared_euclidean_distance(a, b).sqrt()
}

pub(crate) fn squared_euclidean_distance<T: Float>(a: &[T], b: &[T]) -> T {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| ((*x) - (*y)) * ((*x) - (*y)))
        .fold(T::zero(), std::ops::Add::add)
}

pub(crate) fn manhattan_distance<T: Float>(a: &[T], b: &[T]) -> T {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| ((*x) - (*y)).abs())
        .fold(T::zero(), std::ops::Add::add)
}

pub(crate) fn chebyshev_distance<T: Float>(a: &[T], b: &[T]) -> T {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| ((*x) - (*y)).abs())
        .fold(T::zero(), T::max)
}

pub(crate) fn dot_product<T: Float>(a: &[T], b: &[T]) -> T {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (*x) * (*y))
        .fold(T::zero(), std::ops::Add::add)
}

/// Scales a vector to unit length. Returns `None` for zero-magnitude
/// vectors, which have no direction to preserve.
pub(crate) fn normalize<T: Float>(vector: &[T]) -> Option<Vec<T>> {
    let norm = dot_product(vector, vector).sqrt();
    if norm == T::zero() {
        return None;
    }
    Some(vector.iter().map(|x| *x / norm).collect())
}

/// Computes the dense pairwise distance matrix for the given vectors.
/// The metric is symmetric, so only n(n+1)/2 evaluations are performed
/// and mirrored into the full matrix.
pub(crate) fn pairwise_distances<T: Float>(
    vectors: &[&[T]],
    metric: DistanceMetric,
) -> Vec<Vec<T>> {
    let n = vectors.len();
    let mut matrix = vec![vec![T::zero(); n]; n];
    for row in 0..n {
        for col in 0..=row {
            let dist = metric.calc_dist(vectors[row], vectors[col]);
            matrix[row][col] = dist;
            matrix[col][row] = dist;
        }
    }
    matrix
}
