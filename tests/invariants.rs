//! Property-based invariant checks for the parts of the engine that are reachable through its
//! public surface: geometry, absorption, dimension guarding, and ageing.

use ndarray::{array, Array1};
use proptest::prelude::*;

use minas_engine::clustering::SeededKMeans;
use minas_engine::config::EngineConfig;
use minas_engine::engine::Engine;
use minas_engine::geometry::{centroid, distance, radius};
use minas_engine::micro_cluster::{Label, MicroCluster};

fn arb_point() -> impl Strategy<Value = [f64; 2]> {
    (-1000.0f64..1000.0, -1000.0f64..1000.0).prop_map(|(x, y)| [x, y])
}

proptest! {
    /// Distance is symmetric and never negative, for any two finite 2-D points.
    #[test]
    fn distance_is_symmetric_and_non_negative(p in arb_point(), q in arb_point()) {
        let p = Array1::from(p.to_vec());
        let q = Array1::from(q.to_vec());
        let d1 = distance(&p.view(), &q.view());
        let d2 = distance(&q.view(), &p.view());
        prop_assert!(d1 >= 0.0);
        prop_assert!((d1 - d2).abs() < 1e-9);
    }

    /// A micro-cluster's radius is never negative, for any non-empty batch of points.
    #[test]
    fn radius_is_never_negative(points in prop::collection::vec(arb_point(), 1..20)) {
        let batch: Vec<Array1<f64>> = points.iter().map(|p| Array1::from(p.to_vec())).collect();
        let m = MicroCluster::from_batch(&batch, Label::Known(1), 0);
        prop_assert!(radius(&m, 1.0) >= 0.0);
    }

    /// Repeated `absorb` calls never decrease `n` or `t_last`, regardless of the sequence of
    /// points and timestamps absorbed (timestamps are fed in non-decreasing, as the engine does).
    #[test]
    fn absorb_is_monotone_over_arbitrary_sequences(
        points in prop::collection::vec(arb_point(), 1..30),
        deltas in prop::collection::vec(1u64..50, 1..30),
    ) {
        let mut m = MicroCluster::from_batch(&[array![0.0, 0.0]], Label::Known(1), 0);
        let mut t = 0u64;
        let mut n = m.n;
        for (p, dt) in points.iter().zip(deltas.iter()) {
            t += dt;
            let x = Array1::from(p.to_vec());
            m.absorb(&x, t);
            prop_assert!(m.n > n);
            prop_assert!(m.t_last == t);
            n = m.n;
        }
    }

    /// The centroid of a batch always lies within the batch's own per-dimension bounding box.
    #[test]
    fn centroid_is_within_bounding_box(points in prop::collection::vec(arb_point(), 1..20)) {
        let batch: Vec<Array1<f64>> = points.iter().map(|p| Array1::from(p.to_vec())).collect();
        let m = MicroCluster::from_batch(&batch, Label::Known(1), 0);
        let c = centroid(&m);

        for dim in 0..2 {
            let lo = points.iter().map(|p| p[dim]).fold(f64::INFINITY, f64::min);
            let hi = points.iter().map(|p| p[dim]).fold(f64::NEG_INFINITY, f64::max);
            prop_assert!(c[dim] >= lo - 1e-6 && c[dim] <= hi + 1e-6);
        }
    }

    /// Any instance whose dimensionality differs from the trained dimension is rejected by
    /// `online_step`, never silently accepted or panicking.
    #[test]
    fn online_step_rejects_every_wrong_dimension(extra in 1usize..5) {
        let mut engine = Engine::new(SeededKMeans::new(3), EngineConfig::default(), false);
        let x = array![[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]];
        let y = vec![1u32, 1, 1];
        engine.initial_training(x.view(), &y).unwrap();

        let wrong = Array1::<f64>::zeros(2 + extra);
        prop_assert!(engine.online_step(wrong.view()).is_err());
    }

    /// Ageing never grows the active model or the unknown buffer; it only moves micros to sleep
    /// or drops expired unknown records.
    #[test]
    fn ageing_never_grows_active_or_unknown(
        active_ages in prop::collection::vec(0u64..200, 0..10),
        unknown_ages in prop::collection::vec(0u64..200, 0..10),
    ) {
        use minas_engine::store::MicroClusterStore;

        let mut store = MicroClusterStore::new();
        for age in &active_ages {
            store.active.push(MicroCluster::from_batch(&[array![0.0, 0.0]], Label::Known(1), *age));
        }
        for age in &unknown_ages {
            store.append_unknown(array![0.0, 0.0], *age);
        }

        let active_before = store.active.len();
        let unknown_before = store.unknown.len();

        store.drop_stale_micros(50, 200);
        store.drop_stale_unknowns(50, 200);

        prop_assert!(store.active.len() <= active_before);
        prop_assert!(store.unknown.len() <= unknown_before);
    }
}
