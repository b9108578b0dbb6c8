//! The clustering adaptor contract (C3) and a deterministic reference implementation.

use ndarray::{Array1, ArrayView2};

use crate::algorithms::kmeans::KMeansBuilder;
use crate::error::{MinasError, Result};

/// A clustering primitive the engine treats as a black box: given `k` and a matrix of instances
/// with at least `k` rows, return an assignment vector of length `|X|` with entries in `[0, k)`.
/// Implementations must be deterministic given a fixed seed — the engine relies on repeated
/// invocations over the same buffer producing the same partition.
pub trait ClusterAdaptor {
    fn cluster(&self, k: usize, x: ArrayView2<f64>) -> Result<Array1<usize>>;
}

/// Reference adaptor: the crate's own Lloyd's-algorithm k-means, seeded for reproducibility.
///
/// Callers are free to supply their own `ClusterAdaptor` (CluStream, a GPU k-means, whatever
/// fits); this one exists so the engine can be exercised end to end without a caller-supplied
/// implementation.
pub struct SeededKMeans {
    seed: u64,
    max_iter: usize,
}

impl SeededKMeans {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            max_iter: 300,
        }
    }

    pub fn max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }
}

impl ClusterAdaptor for SeededKMeans {
    fn cluster(&self, k: usize, x: ArrayView2<f64>) -> Result<Array1<usize>> {
        if x.nrows() < k {
            return Err(MinasError::AdaptorContractViolation(format!(
                "need at least k={k} rows, got {}",
                x.nrows()
            )));
        }
        let mut kmeans = KMeansBuilder::new(k)
            .max_iter(self.max_iter)
            .n_init(1)
            .random_state(self.seed)
            .build();
        let labels = kmeans.fit_predict(&x)?;
        for &label in labels.iter() {
            if label >= k {
                return Err(MinasError::AdaptorContractViolation(format!(
                    "label {label} out of range for k={k}"
                )));
            }
        }
        Ok(labels)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn seeded_kmeans_is_deterministic() {
        let data = array![[0.0, 0.0], [0.1, 0.1], [10.0, 10.0], [10.1, 10.1]];
        let a = SeededKMeans::new(42).cluster(2, data.view()).unwrap();
        let b = SeededKMeans::new(42).cluster(2, data.view()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn cluster_rejects_k_larger_than_rows() {
        let data = array![[0.0, 0.0]];
        assert!(SeededKMeans::new(1).cluster(5, data.view()).is_err());
    }
}
