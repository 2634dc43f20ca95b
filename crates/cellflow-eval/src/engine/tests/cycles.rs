//! Cyclic dependency handling.
use super::common::{a1, bucket_names, grid};
use crate::engine::{EvalConfig, Engine, Workload};
use crate::interpreter::ReferenceEvaluator;
use cellflow_common::{CoreError, exit_code};

fn detecting() -> Engine<ReferenceEvaluator> {
    Engine::new(
        ReferenceEvaluator,
        EvalConfig {
            detect_cycles: true,
            ..EvalConfig::default()
        },
    )
}

#[test]
fn two_cell_cycle_terminates_and_falls_back_to_text() {
    let plan = Workload::from_grid(&grid(&[&["=B1", "=A1"]]))
        .unwrap()
        .partition(false)
        .unwrap();
    assert_eq!(plan.stats.buckets_surviving, 1);
    assert_eq!(bucket_names(&plan)[0].len(), 2);

    let engine = Engine::new(ReferenceEvaluator, EvalConfig::default());
    let out = engine.execute(plan).unwrap();
    assert!(out.grid.is_fully_finalized());
    assert_eq!(out.values().row(0), &["=B1", "=A1"].map(String::from));
    assert_eq!(out.summary.cells_unsupported, 2);
}

#[test]
fn cycle_does_not_disturb_independent_cells() {
    let engine = Engine::new(ReferenceEvaluator, EvalConfig::default());
    let out = engine
        .run(&grid(&[&["=B1", "=A1", "5", "=C1"]]))
        .unwrap();
    assert_eq!(
        out.values().row(0),
        &["=B1", "=A1", "5", "5"].map(String::from)
    );
}

#[test]
fn detection_reports_two_cell_cycle() {
    let err = detecting().run(&grid(&[&["=B1", "=A1"]])).unwrap_err();
    assert!(matches!(err, CoreError::CircularReference { .. }), "{err:?}");
    assert_eq!(err.exit_code(), exit_code::INVALID_CELL_REFERENCE);
}

#[test]
fn self_reference_falls_back_or_is_reported() {
    let rows = grid(&[&["=A1"]]);

    let engine = Engine::new(ReferenceEvaluator, EvalConfig::sequential());
    let out = engine.run(&rows).unwrap();
    assert_eq!(out.values().row(0), &["=A1".to_string()]);

    let err = detecting().run(&rows).unwrap_err();
    assert_eq!(err, CoreError::CircularReference { coord: a1("A1") });
}

#[test]
fn longer_cycle_through_cell_above_is_detected() {
    let rows = grid(&[&["=A3"], &["=E^"], &["=E^"]]);
    assert!(matches!(
        detecting().run(&rows),
        Err(CoreError::CircularReference { .. })
    ));

    let out = Engine::new(ReferenceEvaluator, EvalConfig::default())
        .run(&rows)
        .unwrap();
    assert_eq!(
        out.into_values().into_rows(),
        grid(&[&["=A3"], &["=E^"], &["=E^"]])
    );
}

#[test]
fn detection_accepts_acyclic_diamonds() {
    let out = detecting()
        .run(&grid(&[&["=1", "=A1", "=A1", "=B1C1"]]))
        .unwrap();
    assert_eq!(out.values().row(0)[2], "1");
}
