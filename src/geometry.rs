//! Pure geometry over micro-cluster sufficient statistics (C1).
//!
//! Everything here is a free function: centroid/variance/radius are derived quantities and are
//! never stored on `MicroCluster` itself.

use ndarray::{Array1, ArrayView1};

use crate::micro_cluster::MicroCluster;

/// `ls / n`.
pub fn centroid(micro: &MicroCluster) -> Array1<f64> {
    &micro.ls / micro.n as f64
}

/// Component-wise `(ss - 2*ls*c + n*c^2) / n`, clamped to zero before the caller sums it.
///
/// Rounding can push a component slightly negative through cancellation; clamping here means
/// every caller of `variance` sees a well-formed non-negative vector, rather than each call site
/// having to guard separately.
pub fn variance(micro: &MicroCluster) -> Array1<f64> {
    let c = centroid(micro);
    let n = micro.n as f64;
    let raw = &micro.ss - 2.0 * &micro.ls * &c + n * &c * &c;
    (raw / n).mapv(|v| v.max(0.0))
}

/// `f * sqrt(sum(variance))`.
pub fn radius(micro: &MicroCluster, f: f64) -> f64 {
    f * variance(micro).sum().sqrt()
}

/// Euclidean distance between two equal-length points.
pub fn distance(p: &ArrayView1<f64>, q: &ArrayView1<f64>) -> f64 {
    p.iter()
        .zip(q.iter())
        .map(|(a, b)| (a - b).powi(2))
        .sum::<f64>()
        .sqrt()
}
