//! The engine façade (C7): public entry points and accessor surface.

use ndarray::{Array1, ArrayView1, ArrayView2};
use std::collections::BTreeSet;

use crate::clustering::ClusterAdaptor;
use crate::config::EngineConfig;
use crate::error::{MinasError, Result};
use crate::micro_cluster::{Label, MicroCluster};
use crate::store::MicroClusterStore;
use crate::trainer::build_initial_model;

/// What `online_step` reports for a single instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Prediction {
    Class(u32),
    Unknown,
}

impl From<Label> for Prediction {
    fn from(label: Label) -> Self {
        match label {
            Label::Known(c) => Prediction::Class(c),
            Label::Unassigned => Prediction::Unknown,
        }
    }
}

/// The MINAS streaming engine. Single-threaded and synchronous: every `online_step` call is an
/// atomic unit from the caller's perspective — no reentrancy, no background timers, no cancellation.
pub struct Engine {
    pub(crate) adaptor: Box<dyn ClusterAdaptor>,
    pub(crate) config: EngineConfig,
    pub(crate) store: MicroClusterStore,
    pub(crate) classes: BTreeSet<u32>,
    pub(crate) t: u64,
    pub(crate) dim: Option<usize>,
    pub(crate) evaluate: bool,
    pub(crate) predictions: Vec<Prediction>,
    pub(crate) novelty_count: u64,
    pub(crate) novelty_flag: bool,
}

impl Engine {
    pub fn new(adaptor: impl ClusterAdaptor + 'static, config: EngineConfig, evaluate: bool) -> Self {
        Self {
            adaptor: Box::new(adaptor),
            config,
            store: MicroClusterStore::new(),
            classes: BTreeSet::new(),
            t: 0,
            dim: None,
            evaluate,
            predictions: Vec::new(),
            novelty_count: 0,
            novelty_flag: false,
        }
    }

    /// Offline phase (C4): seed the active model from labelled training data.
    pub fn initial_training(&mut self, x_train: ArrayView2<f64>, y_train: &[u32]) -> Result<()> {
        if let Some(d) = self.dim {
            if x_train.ncols() != d {
                return Err(MinasError::DimensionMismatch {
                    expected: d,
                    actual: x_train.ncols(),
                });
            }
        }
        let model = build_initial_model(x_train, y_train, self.adaptor.as_ref())?;
        self.dim = Some(x_train.ncols());
        self.store.active = model.micros;
        self.classes = model.classes;
        Ok(())
    }

    pub(crate) fn check_dim(&self, x: &ArrayView1<f64>) -> Result<()> {
        if let Some(d) = self.dim {
            if x.len() != d {
                return Err(MinasError::DimensionMismatch {
                    expected: d,
                    actual: x.len(),
                });
            }
        }
        Ok(())
    }

    pub(crate) fn to_owned_instance(x: ArrayView1<f64>) -> Array1<f64> {
        x.to_owned()
    }

    pub fn active_model(&self) -> &[MicroCluster] {
        &self.store.active
    }

    pub fn sleep_memory(&self) -> &[MicroCluster] {
        &self.store.sleep
    }

    pub fn unknown_buffer(&self) -> &std::collections::VecDeque<crate::store::UnknownRecord> {
        &self.store.unknown
    }

    /// Only meaningful when the engine was constructed with `evaluate = true`.
    pub fn predictions(&self) -> &[Prediction] {
        &self.predictions
    }

    pub fn novelty_count(&self) -> u64 {
        self.novelty_count
    }

    pub fn last_step_was_novelty(&self) -> bool {
        self.novelty_flag
    }

    pub fn clock(&self) -> u64 {
        self.t
    }

    pub fn classes(&self) -> &BTreeSet<u32> {
        &self.classes
    }
}
