//! The micro-cluster sufficient-statistics type.

use ndarray::Array1;

/// A class identifier, or the transient "not yet classified" state of a freshly built candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Label {
    Unassigned,
    Known(u32),
}

impl Label {
    pub fn is_known(&self) -> bool {
        matches!(self, Label::Known(_))
    }
}

/// Sufficient-statistics summary of a point set: `(n, ls, ss, label, t_last)`.
///
/// `centroid`, `variance` and `radius` are derived from these fields by `crate::geometry` and are
/// never cached here — caching them would require invalidating on every `absorb`, which is exactly
/// the mutation this struct exists to make cheap.
#[derive(Debug, Clone)]
pub struct MicroCluster {
    pub n: u64,
    pub ls: Array1<f64>,
    pub ss: Array1<f64>,
    pub label: Label,
    pub t_last: u64,
}

impl MicroCluster {
    /// Build a micro-cluster from a batch of instances sharing a cluster index.
    pub fn from_batch(instances: &[Array1<f64>], label: Label, t_last: u64) -> Self {
        let d = instances[0].len();
        let mut ls = Array1::<f64>::zeros(d);
        let mut ss = Array1::<f64>::zeros(d);
        for x in instances {
            ls = ls + x;
            ss = ss + &(x * x);
        }
        MicroCluster {
            n: instances.len() as u64,
            ls,
            ss,
            label,
            t_last,
        }
    }

    /// In-place absorption of a new instance (the only mutation allowed outside construction).
    ///
    /// Never decreases `n` or `t_last`.
    pub fn absorb(&mut self, x: &Array1<f64>, t: u64) {
        self.n += 1;
        self.ls = &self.ls + x;
        self.ss = &self.ss + &(x * x);
        self.t_last = t;
    }

    pub fn dim(&self) -> usize {
        self.ls.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::centroid;
    use ndarray::array;

    #[test]
    fn absorb_is_monotone_in_n_and_t_last() {
        let mut m = MicroCluster::from_batch(&[array![0.0, 0.0]], Label::Known(1), 0);
        let n0 = m.n;
        let t0 = m.t_last;
        m.absorb(&array![1.0, 1.0], 5);
        assert!(m.n > n0);
        assert!(m.t_last >= t0);
    }

    #[test]
    fn from_batch_centroid_matches_mean() {
        let batch = vec![array![0.0, 0.0], array![2.0, 4.0]];
        let m = MicroCluster::from_batch(&batch, Label::Known(0), 0);
        let c = centroid(&m);
        assert!((c[0] - 1.0).abs() < 1e-9);
        assert!((c[1] - 2.0).abs() < 1e-9);
    }
}
