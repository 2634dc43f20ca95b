//! Randomized acyclic grids checked against a straight-line model.
use proptest::prelude::*;

use super::common::assert_plan_invariants;
use crate::engine::{EvalConfig, Engine, Workload};
use crate::interpreter::ReferenceEvaluator;
use cellflow_common::Coord;

/// What a generated cell is expected to display.
#[derive(Debug, Clone)]
enum Expect {
    Text(String),
    /// Copies the display of the cell at this linear index, if that one
    /// resolved; otherwise shows its own text.
    Follow(usize),
    /// `=X+Y` over two earlier cells: never resolves, and shows the values of
    /// whichever operands resolved.
    Sum(usize, usize),
}

struct Case {
    cols: usize,
    rows: Vec<Vec<String>>,
    expect: Vec<Expect>,
}

fn build(rows: usize, cols: usize, seeds: &[(u8, u32)]) -> Case {
    let name = |idx: usize| Coord::new((idx / cols) as u32, (idx % cols) as u32).to_string();
    let mut grid = vec![Vec::with_capacity(cols); rows];
    let mut expect = Vec::with_capacity(rows * cols);

    for (idx, &(kind, arg)) in seeds.iter().enumerate() {
        let (text, e) = match kind {
            0 => (arg.to_string(), Expect::Text(arg.to_string())),
            1 => (String::new(), Expect::Text(String::new())),
            2 if idx > 0 => {
                let target = arg as usize % idx;
                (format!("={}", name(target)), Expect::Follow(target))
            }
            3 if idx >= cols => ("=E^".to_string(), Expect::Follow(idx - cols)),
            2 | 3 | 4 => (format!("=incFrom({arg})"), Expect::Text(arg.to_string())),
            5 if idx > 0 => {
                let (a, b) = (arg as usize % idx, idx - 1);
                (format!("={}+{}", name(a), name(b)), Expect::Sum(a, b))
            }
            6 => ("=@lbl<1>".to_string(), Expect::Text("=@lbl<1>".to_string())),
            _ => (format!("={arg}"), Expect::Text(arg.to_string())),
        };
        grid[idx / cols].push(text);
        expect.push(e);
    }

    Case {
        cols,
        rows: grid,
        expect,
    }
}

/// Resolve every cell in linear order; all references point backwards.
fn model(case: &Case) -> Vec<Vec<String>> {
    let name = |idx: usize| Coord::new((idx / case.cols) as u32, (idx % case.cols) as u32).to_string();
    let mut resolved: Vec<Option<String>> = Vec::with_capacity(case.expect.len());
    let mut display = Vec::with_capacity(case.expect.len());

    for (idx, e) in case.expect.iter().enumerate() {
        let text = &case.rows[idx / case.cols][idx % case.cols];
        let value = match e {
            Expect::Follow(target) => resolved[*target].clone(),
            Expect::Sum(..) => None,
            Expect::Text(v) if v == text && v.starts_with('=') => None,
            Expect::Text(v) => Some(v.clone()),
        };
        let shown = match (e, &value) {
            (_, Some(v)) => v.clone(),
            (Expect::Sum(a, b), None) => {
                let operand = |i: usize| resolved[i].clone().unwrap_or_else(|| name(i));
                format!("={}+{}", operand(*a), operand(*b))
            }
            (_, None) => text.clone(),
        };
        resolved.push(value);
        display.push(shown);
    }

    display.chunks(case.cols).map(<[String]>::to_vec).collect()
}

fn case_strategy() -> impl Strategy<Value = Case> {
    (1usize..6, 1usize..5).prop_flat_map(|(rows, cols)| {
        prop::collection::vec((0u8..8, 0u32..50), rows * cols)
            .prop_map(move |seeds| build(rows, cols, &seeds))
    })
}

impl std::fmt::Debug for Case {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(&self.rows).finish()
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn partition_invariants_hold(case in case_strategy()) {
        let plan = Workload::from_grid(&case.rows).unwrap().partition(true).unwrap();
        assert_plan_invariants(&plan);
    }

    #[test]
    fn execution_matches_model(case in case_strategy()) {
        let expected = model(&case);

        let sequential = Engine::new(ReferenceEvaluator, EvalConfig::sequential());
        let parallel = Engine::new(
            ReferenceEvaluator,
            EvalConfig { max_threads: Some(4), ..EvalConfig::default() },
        );

        let a = sequential.run(&case.rows).unwrap();
        let b = parallel.run(&case.rows).unwrap();
        prop_assert!(a.grid.is_fully_finalized());
        prop_assert_eq!(a.into_values().into_rows(), expected.clone());
        prop_assert_eq!(b.into_values().into_rows(), expected);
    }
}
