//! # minas-engine
//!
//! MINAS: an online classifier for unbounded labelled data streams that discovers classes never
//! seen during offline training. It maintains a time-evolving set of micro-clusters summarising
//! both known classes and emerging novelty patterns, classifying each arriving instance on the
//! fly and promoting buffered "unknown" instances into new classes, known-class extensions, or
//! revived sleeping classes.
//!
//! ## Modules
//!
//! - [`geometry`]: centroid/variance/radius/distance over micro-cluster sufficient statistics.
//! - [`micro_cluster`]: the `MicroCluster` sufficient-statistics type.
//! - [`store`]: the active model, sleep memory, and short-term unknown buffer.
//! - [`clustering`]: the `ClusterAdaptor` trait and a seeded k-means reference implementation.
//! - [`trainer`]: the offline training phase.
//! - [`engine`]: the public façade, [`engine::Engine`], which owns the online phase and novelty
//!   detection as private impl blocks.

pub mod algorithms;
pub mod clustering;
pub mod config;
pub mod engine;
pub mod error;
pub mod geometry;
pub mod metrics;
pub mod micro_cluster;
mod novelty;
mod online;
pub mod prelude;
pub mod store;
pub mod trainer;


pub use config::EngineConfig;
pub use engine::{Engine, Prediction};
pub use error::{MinasError, Result};
pub use micro_cluster::{Label, MicroCluster};
