//! Convenient re-exports for common engine operations.

pub use crate::clustering::{ClusterAdaptor, SeededKMeans};
pub use crate::config::EngineConfig;
pub use crate::engine::{Engine, Prediction};
pub use crate::error::{MinasError, Result};
pub use crate::micro_cluster::{Label, MicroCluster};

// Common types
pub use ndarray::{Array1, Array2, ArrayView1, ArrayView2};
