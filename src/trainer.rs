//! The offline trainer (C4): builds the initial active model from labelled training data.

use std::collections::BTreeSet;

use ndarray::{Array1, Array2, ArrayView2, Axis};

use crate::clustering::ClusterAdaptor;
use crate::error::{MinasError, Result};
use crate::micro_cluster::{Label, MicroCluster};

/// Result of offline training: the initial active model and the class registry it seeds.
pub struct InitialModel {
    pub micros: Vec<MicroCluster>,
    pub classes: BTreeSet<u32>,
}

/// Builds one batch of micro-clusters per class, sized proportionally to the class's share of the
/// training set, scaled so all classes together request ~`100 * |C|` micros.
pub fn build_initial_model(
    x_train: ArrayView2<f64>,
    y_train: &[u32],
    adaptor: &dyn ClusterAdaptor,
) -> Result<InitialModel> {
    if x_train.nrows() == 0 || y_train.is_empty() {
        return Err(MinasError::EmptyTraining);
    }
    if x_train.nrows() != y_train.len() {
        return Err(MinasError::DimensionMismatch {
            expected: x_train.nrows(),
            actual: y_train.len(),
        });
    }

    let classes: BTreeSet<u32> = y_train.iter().copied().collect();
    if classes.is_empty() {
        return Err(MinasError::EmptyTraining);
    }

    let n_total = x_train.nrows();
    let n_classes = classes.len();
    let mut micros = Vec::new();

    for &cl in &classes {
        let rows: Vec<usize> = y_train
            .iter()
            .enumerate()
            .filter(|(_, &y)| y == cl)
            .map(|(i, _)| i)
            .collect();
        let n_class = rows.len();

        // Proportional allocation, truncated: a very rare class can round down to zero micros
        // and simply contributes none until novelty detection rebuilds it later.
        let k_c = (n_class as f64 / n_total as f64 * 100.0 * n_classes as f64) as usize;
        if k_c == 0 {
            log::warn!(
                "class {cl} received k_c=0 micros from its {n_class}/{n_total} training share; \
                 it cannot classify stream instances until novelty detection rediscovers it"
            );
            continue;
        }

        let x_c = gather_rows(&x_train, &rows);
        let assignment = adaptor.cluster(k_c, x_c.view())?;

        for j in 0..k_c {
            let members: Vec<Array1<f64>> = assignment
                .iter()
                .enumerate()
                .filter(|(_, &label)| label == j)
                .map(|(i, _)| x_c.row(i).to_owned())
                .collect();
            if members.is_empty() {
                // The adaptor returned a partition index no training instance was assigned to.
                // Skipped silently, never an error.
                continue;
            }
            micros.push(MicroCluster::from_batch(&members, Label::Known(cl), 0));
        }
    }

    log::info!(
        "initial_training built {} micro-clusters across {} classes",
        micros.len(),
        n_classes
    );

    Ok(InitialModel { micros, classes })
}

fn gather_rows(data: &ArrayView2<f64>, rows: &[usize]) -> Array2<f64> {
    let mut out = Array2::zeros((rows.len(), data.ncols()));
    for (i, &r) in rows.iter().enumerate() {
        out.index_axis_mut(Axis(0), i).assign(&data.row(r));
    }
    out
}
