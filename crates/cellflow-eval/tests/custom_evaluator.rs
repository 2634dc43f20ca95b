use cellflow_eval::engine::{Cell, EvalConfig, new_engine};
use cellflow_eval::{CoreError, Evaluation, Evaluator, ReferenceEvaluator, ValueReader};

/// Sums `A1+B1`-style expressions on top of the built-in evaluator.
struct Adding;

impl Evaluator for Adding {
    fn evaluate(&self, cell: &Cell, values: &dyn ValueReader) -> Result<Evaluation, CoreError> {
        let body = cell.expr.trim_start_matches('=');
        if !body.contains('+') {
            return ReferenceEvaluator.evaluate(cell, values);
        }
        let mut total = 0i64;
        for &dep in &cell.dependencies {
            let Some(v) = values.value(dep)? else {
                return Ok(Evaluation::unsupported());
            };
            let Ok(n) = v.parse::<i64>() else {
                return Ok(Evaluation::unsupported());
            };
            total += n;
        }
        Ok(Evaluation::Literal(total.to_string()))
    }
}

fn rows(data: &[&[&str]]) -> Vec<Vec<String>> {
    data.iter()
        .map(|r| r.iter().map(|s| s.to_string()).collect())
        .collect()
}

#[test]
fn custom_evaluator_sees_values_of_its_own_bucket() {
    let engine = new_engine(Adding, EvalConfig::default());
    let out = engine
        .run(&rows(&[&["2", "=A1", "=A1+B1"], &["=C1+A1", "", "=E^"]]))
        .unwrap();
    assert_eq!(
        out.into_values().into_rows(),
        rows(&[&["2", "2", "4"], &["6", "", "4"]])
    );
}

#[test]
fn boxed_evaluators_are_accepted() {
    let evaluator: Box<dyn Evaluator> = Box::new(ReferenceEvaluator);
    let engine = new_engine(evaluator, EvalConfig::sequential());
    let out = engine.run(&rows(&[&["x", "=A1"]])).unwrap();
    assert_eq!(out.values().row(0), &["x".to_string(), "x".to_string()]);
}

#[test]
fn bucket_summary_lists_surviving_buckets() {
    let engine = new_engine(ReferenceEvaluator, EvalConfig::default());
    let plan = engine.plan(&rows(&[&["1", "=A1"], &["=B1", "=9"]])).unwrap();
    assert_eq!(plan.workload().bucket_summary(), "Buckets:\n1: B1 -> A2\n2: B2\n");
}
