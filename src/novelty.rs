//! The novelty detector (C6): clusters the short-term buffer, validates candidates, and assigns
//! each a known/sleeping/new label.

use ndarray::Array2;

use crate::engine::{Engine, Prediction};
use crate::error::Result;
use crate::geometry::{centroid, distance, radius};
use crate::micro_cluster::{Label, MicroCluster};
use crate::store::Tag;

impl Engine {
    /// Invoked by the online phase once the short-term unknown buffer grows past its trigger
    /// threshold: re-clusters the buffer, validates each resulting candidate, and assigns it a
    /// known, revived, or brand-new label.
    pub(crate) fn novelty_detection(&mut self) -> Result<()> {
        let u_len = self.store.unknown.len();
        if u_len == 0 {
            return Ok(());
        }

        let instances: Vec<_> = self.store.unknown.iter().map(|r| r.instance.clone()).collect();
        let times: Vec<u64> = self.store.unknown.iter().map(|r| r.t).collect();

        let dim = instances[0].len();
        let mut x_u = Array2::<f64>::zeros((u_len, dim));
        for (i, inst) in instances.iter().enumerate() {
            x_u.row_mut(i).assign(inst);
        }

        let k = self.config.micro_count_hint;
        let assignment = self.adaptor.cluster(k, x_u.view())?;

        // Tag every buffered instance with the candidate it was assigned to. Stale tags from a
        // prior, discarded pass are irrelevant — every record gets a fresh tag here.
        for (rec, &a) in self.store.unknown.iter_mut().zip(assignment.iter()) {
            rec.tag = Tag::Candidate(a as u32);
        }

        let min_n = u_len as f64 / k as f64;

        for j in 0..k {
            let member_idx: Vec<usize> = (0..u_len).filter(|&i| assignment[i] == j).collect();
            if member_idx.is_empty() {
                // DegenerateCluster: the adaptor produced a label no instance was assigned to.
                continue;
            }

            let t_max = member_idx.iter().map(|&i| times[i]).max().unwrap();
            let members: Vec<_> = member_idx.iter().map(|&i| instances[i].clone()).collect();
            let mut candidate = MicroCluster::from_batch(&members, Label::Unassigned, t_max);

            let active_ref = self
                .store
                .nearest_active(&centroid(&candidate))
                .map(|(d, i)| (d, i, self.store.active[i].clone()));
            let sleep_ref = self
                .store
                .nearest_sleeping(&centroid(&candidate))
                .map(|(d, i)| (d, i, self.store.sleep[i].clone()));

            let cohesive_active = active_ref
                .as_ref()
                .map(|(_, _, m)| cohesive(&candidate, m, self.config.absorb_factor))
                .unwrap_or(false);
            let cohesive_sleep = sleep_ref
                .as_ref()
                .map(|(_, _, m)| cohesive(&candidate, m, self.config.absorb_factor))
                .unwrap_or(false);

            if !(cohesive_active || cohesive_sleep) || candidate.n as f64 <= min_n {
                log::warn!(
                    "novelty candidate discarded: n={}, cohesive_active={cohesive_active}, cohesive_sleep={cohesive_sleep}",
                    candidate.n
                );
                continue;
            }

            let thresh = radius(&candidate, self.config.match_factor);
            let known_extension = active_ref
                .as_ref()
                .filter(|(d_a, _, _)| *d_a <= thresh)
                .map(|(_, _, m)| m.label);

            let label = match known_extension {
                Some(l) => l,
                None => match sleep_ref
                    .as_ref()
                    .filter(|(d_s, _, _)| *d_s <= thresh)
                {
                    Some((_, i_s, m)) => {
                        let l = m.label;
                        self.store.sleep.remove(*i_s);
                        l
                    }
                    None => self.mint_new_class(),
                },
            };

            candidate.label = label;
            self.store.active.push(candidate);

            let removed_times: Vec<u64> = self
                .store
                .unknown
                .iter()
                .filter(|r| r.tag == Tag::Candidate(j as u32))
                .map(|r| r.t)
                .collect();
            self.store.unknown.retain(|r| r.tag != Tag::Candidate(j as u32));

            if self.evaluate {
                let prediction = Prediction::from(label);
                for t in removed_times {
                    if let Some(slot) = self.predictions.get_mut((t - 1) as usize) {
                        *slot = prediction;
                    }
                }
            }
        }

        // Any record still tagged Candidate(_) belonged to a discarded candidate; leave it in U
        // as plain Unknown so it's eligible for the next detection pass.
        for rec in self.store.unknown.iter_mut() {
            if let Tag::Candidate(_) = rec.tag {
                rec.tag = Tag::Unknown;
            }
        }

        Ok(())
    }

    fn mint_new_class(&mut self) -> Label {
        let new_id = self.classes.iter().next_back().copied().map_or(1, |m| m + 1);
        self.classes.insert(new_id);
        self.novelty_flag = true;
        self.novelty_count += 1;
        log::info!("novelty pattern detected: class {new_id}");
        Label::Known(new_id)
    }
}

/// A candidate is cohesive with a reference micro iff the distance between their centroids
/// exceeds the candidate's own radius. A non-existent reference is never cohesive.
fn cohesive(candidate: &MicroCluster, reference: &MicroCluster, radius_factor: f64) -> bool {
    let b = distance(&centroid(candidate).view(), &centroid(reference).view());
    let a = radius(candidate, radius_factor);
    let denom = b.max(a);
    denom > 0.0 && (b - a) / denom > 0.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::micro_cluster::MicroCluster;
    use ndarray::array;

    fn tight_micro(cx: f64, cy: f64) -> MicroCluster {
        MicroCluster::from_batch(
            &[array![cx, cy], array![cx + 0.01, cy], array![cx, cy + 0.01]],
            Label::Known(1),
            0,
        )
    }

    #[test]
    fn cohesion_is_false_for_identical_centroids() {
        let a = tight_micro(0.0, 0.0);
        let b = tight_micro(0.0, 0.0);
        assert!(!cohesive(&a, &b, 1.0));
    }

    #[test]
    fn cohesion_is_true_when_centroids_far_apart() {
        let candidate = tight_micro(0.0, 0.0);
        let reference = tight_micro(1000.0, 1000.0);
        assert!(cohesive(&candidate, &reference, 1.0));
    }
}
