//! Common test helpers
use crate::engine::{Plan, Status};
use cellflow_common::Coord;

pub fn grid(rows: &[&[&str]]) -> Vec<Vec<String>> {
    rows.iter()
        .map(|r| r.iter().map(|s| s.to_string()).collect())
        .collect()
}

pub fn a1(text: &str) -> Coord {
    Coord::parse_a1(text).unwrap()
}

/// Surviving buckets as A1 names, in bucket order.
pub fn bucket_names(plan: &Plan) -> Vec<Vec<String>> {
    let wl = plan.workload();
    wl.non_empty_buckets()
        .map(|(id, _)| wl.bucket_coords(id).iter().map(|c| c.to_string()).collect())
        .collect()
}

/// Check the structural guarantees of a partitioned, acyclic workload.
pub fn assert_plan_invariants(plan: &Plan) {
    let wl = plan.workload();
    let mut owner = vec![None; wl.cells().len()];

    for (bucket_id, bucket) in wl.non_empty_buckets() {
        for (pos, &id) in bucket.cells().iter().enumerate() {
            assert!(
                owner[id.as_index()].is_none(),
                "{} appears in more than one bucket slot",
                wl.cell(id)
            );
            owner[id.as_index()] = Some((bucket_id, pos));
        }
    }

    for (idx, slot) in owner.iter().enumerate() {
        let cell = &wl.cells()[idx];
        let (bucket_id, pos) = slot.unwrap_or_else(|| panic!("{cell} is not in any bucket"));
        assert_eq!(
            wl.grid().status(cell.coord).unwrap(),
            Status::Unresolved(bucket_id),
            "status of {cell} does not name its bucket"
        );

        for &dep in &cell.dependencies {
            match wl.grid().status(dep).unwrap() {
                Status::Finalized => {}
                Status::Unresolved(other) => {
                    assert_eq!(other, bucket_id, "{cell} depends on {dep} in another bucket");
                    let dep_id = wl.cell_id_at(dep).unwrap();
                    let (_, dep_pos) = owner[dep_id.as_index()].unwrap();
                    assert!(dep_pos < pos, "{cell} is ordered before its dependency {dep}");
                }
                Status::Absent => panic!("{cell} depends on absent {dep}"),
            }
        }
    }
}
