//! The online phase (C5): per-instance routing, absorption, buffering, and ageing triggers.

use ndarray::ArrayView1;

use crate::engine::{Engine, Prediction};
use crate::error::Result;
use crate::geometry::radius;

impl Engine {
    /// Route one arriving instance: absorb into the nearest micro if it's close enough,
    /// otherwise buffer it as unknown. Ageing runs every `config.window` steps.
    pub fn online_step(&mut self, x: ArrayView1<f64>) -> Result<Prediction> {
        self.check_dim(&x)?;
        self.novelty_flag = false;
        self.t += 1;
        if self.dim.is_none() {
            self.dim = Some(x.len());
        }
        let owned = Engine::to_owned_instance(x);

        let prediction = match self.store.nearest_active(&owned) {
            Some((d, i)) if d <= radius(&self.store.active[i], self.config.absorb_factor) => {
                self.store.absorb(i, &owned, self.t);
                let prediction = Prediction::from(self.store.active[i].label);
                if self.evaluate {
                    self.predictions.push(prediction);
                }
                prediction
            }
            _ => {
                self.store.append_unknown(owned, self.t);
                // Push the placeholder before novelty detection runs: if this very instance
                // is the one that tips `|U|` over the trigger, its slot already exists at
                // index `t - 1` and is addressable for retroactive overwrite below.
                if self.evaluate {
                    self.predictions.push(Prediction::Unknown);
                }
                if self.store.unknown.len() > self.config.num_ex_trigger {
                    self.novelty_detection()?;
                }
                Prediction::Unknown
            }
        };

        if self.t % self.config.window == 0 {
            self.store.drop_stale_micros(self.config.window, self.t);
            self.store.drop_stale_unknowns(self.config.window, self.t);
        }

        Ok(prediction)
    }
}
