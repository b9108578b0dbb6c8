//! The clustering primitives MINAS builds its `ClusterAdaptor` reference implementation on.

pub mod kmeans;
