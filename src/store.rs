//! The micro-cluster store (C2): active model A, sleep memory S, short-term memory U.

use std::collections::VecDeque;

use ndarray::Array1;

use crate::error::{MinasError, Result};
use crate::geometry::{centroid, distance};
use crate::micro_cluster::MicroCluster;

/// Per-candidate tag assigned to an unknown record during novelty detection. Reused as both the
/// "still unknown" marker and the transient "belongs to clustering-candidate j" marker, as a typed
/// enum rather than the source's string-valued `y` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tag {
    Unknown,
    Candidate(u32),
}

/// An instance buffered in short-term memory, awaiting novelty detection.
#[derive(Debug, Clone)]
pub struct UnknownRecord {
    pub instance: Array1<f64>,
    pub t: u64,
    pub tag: Tag,
}

/// Owns the active model, sleep memory, and short-term unknown buffer. All operations here are
/// O(|A|) or O(|U|) with no hidden state; `Engine` drives them, it never reaches into a `Vec`
/// directly.
#[derive(Debug, Default)]
pub struct MicroClusterStore {
    pub active: Vec<MicroCluster>,
    pub sleep: Vec<MicroCluster>,
    pub unknown: VecDeque<UnknownRecord>,
}

impl MicroClusterStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Nearest micro in `active` to `x`, by centroid distance. Ties break to the first in
    /// iteration order. `None` if `active` is empty.
    pub fn nearest_active(&self, x: &Array1<f64>) -> Option<(f64, usize)> {
        nearest(&self.active, x)
    }

    /// Nearest micro in `sleep` to `x`.
    pub fn nearest_sleeping(&self, x: &Array1<f64>) -> Option<(f64, usize)> {
        nearest(&self.sleep, x)
    }

    /// `n += 1; ls += x; ss += x^2; t_last := t` on `active[i]`.
    pub fn absorb(&mut self, i: usize, x: &Array1<f64>, t: u64) {
        self.active[i].absorb(x, t);
        log::debug!(
            "absorbed instance into micro {i} (label={:?}, n={})",
            self.active[i].label,
            self.active[i].n
        );
    }

    pub fn append_unknown(&mut self, x: Array1<f64>, t: u64) {
        self.unknown.push_back(UnknownRecord {
            instance: x,
            t,
            tag: Tag::Unknown,
        });
    }

    /// Move every micro in `active` whose `t_last` is more than `window` behind `now` into
    /// `sleep`. Indices are collected ascending first, then removed in descending order so that
    /// no later removal shifts an index collected earlier in the same pass.
    pub fn drop_stale_micros(&mut self, window: u64, now: u64) {
        let mut stale: Vec<usize> = Vec::new();
        for (i, m) in self.active.iter().enumerate() {
            if now.saturating_sub(m.t_last) > window {
                stale.push(i);
            }
        }
        for &i in stale.iter().rev() {
            let m = self.active.remove(i);
            log::debug!(
                "micro moved to sleep memory (label={:?}, n={}, idle for {} steps)",
                m.label,
                m.n,
                now.saturating_sub(m.t_last)
            );
            self.sleep.push(m);
        }
    }

    /// Remove every unknown record older than `window` steps, mutating `unknown` in place.
    pub fn drop_stale_unknowns(&mut self, window: u64, now: u64) {
        self.unknown
            .retain(|rec| now.saturating_sub(rec.t) <= window);
    }

    /// Remove `sleep[j]` and append it to `active`.
    pub fn revive(&mut self, j: usize) -> Result<()> {
        if j >= self.sleep.len() {
            return Err(MinasError::StaleSleepRevive(j));
        }
        let m = self.sleep.remove(j);
        self.active.push(m);
        Ok(())
    }
}

fn nearest(micros: &[MicroCluster], x: &Array1<f64>) -> Option<(f64, usize)> {
    let mut best: Option<(f64, usize)> = None;
    for (i, m) in micros.iter().enumerate() {
        let c = centroid(m);
        let d = distance(&x.view(), &c.view());
        match best {
            Some((best_d, _)) if d >= best_d => {}
            _ => best = Some((d, i)),
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::micro_cluster::Label;
    use ndarray::array;

    fn micro(cx: f64, cy: f64, t_last: u64) -> MicroCluster {
        MicroCluster::from_batch(&[array![cx, cy]], Label::Known(1), t_last)
    }

    #[test]
    fn nearest_active_picks_closest_with_first_tiebreak() {
        let mut store = MicroClusterStore::new();
        store.active.push(micro(0.0, 0.0, 0));
        store.active.push(micro(10.0, 10.0, 0));
        let (d, i) = store.nearest_active(&array![0.5, 0.5]).unwrap();
        assert_eq!(i, 0);
        assert!(d > 0.0);
    }

    #[test]
    fn drop_stale_micros_moves_everything_past_window() {
        let mut store = MicroClusterStore::new();
        store.active.push(micro(0.0, 0.0, 0)); // stale
        store.active.push(micro(1.0, 1.0, 100)); // fresh
        store.active.push(micro(2.0, 2.0, 0)); // stale
        store.drop_stale_micros(50, 100);
        assert_eq!(store.active.len(), 1);
        assert_eq!(store.sleep.len(), 2);
        for m in &store.active {
            assert!(100u64.saturating_sub(m.t_last) <= 50);
        }
    }

    #[test]
    fn drop_stale_unknowns_expires_old_records() {
        let mut store = MicroClusterStore::new();
        store.append_unknown(array![0.0, 0.0], 0);
        store.append_unknown(array![1.0, 1.0], 90);
        store.drop_stale_unknowns(50, 100);
        assert_eq!(store.unknown.len(), 1);
        assert_eq!(store.unknown[0].t, 90);
    }

    #[test]
    fn revive_moves_sleeping_micro_back_to_active() {
        let mut store = MicroClusterStore::new();
        store.sleep.push(micro(0.0, 0.0, 0));
        store.revive(0).unwrap();
        assert_eq!(store.active.len(), 1);
        assert!(store.sleep.is_empty());
    }

    #[test]
    fn revive_out_of_bounds_is_an_error() {
        let mut store = MicroClusterStore::new();
        assert!(store.revive(0).is_err());
    }
}
