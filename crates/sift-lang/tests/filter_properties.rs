//! Property tests for compiled filters.

use proptest::prelude::*;
use serde_json::json;
use sift_core::query::FilterEvaluator;
use sift_core::{EntityDef, FieldDef, FieldType};
use sift_lang::{compile_filter, Predicate, Value};

fn person() -> EntityDef {
    EntityDef::new("Person").with_fields([
        FieldDef::new("age", FieldType::Int32),
        FieldDef::new("score", FieldType::Int64),
    ])
}

fn compile(document: serde_json::Value) -> Predicate {
    compile_filter(&person(), "Person", &document).unwrap()
}

fn row_strategy() -> impl Strategy<Value = Vec<(String, Value)>> {
    (0i32..40, proptest::option::of(-50i64..50)).prop_map(|(age, score)| {
        let mut row = vec![("age".to_string(), Value::Int32(age))];
        if let Some(score) = score {
            row.push(("score".to_string(), Value::Int64(score)));
        }
        row
    })
}

fn leaf_strategy() -> impl Strategy<Value = serde_json::Value> {
    let ops = prop_oneof![
        Just("eq"),
        Just("!eq"),
        Just("gt"),
        Just("ge"),
        Just("lt"),
        Just("le")
    ];
    (prop_oneof![Just("age"), Just("score")], ops, -10i64..40)
        .prop_map(|(field, op, n)| json!({ field: { op: n } }))
}

proptest! {
    #[test]
    fn prop_two_branch_and_or(
        left in leaf_strategy(),
        right in leaf_strategy(),
        rows in proptest::collection::vec(row_strategy(), 0..20),
    ) {
        let l = compile(left.clone());
        let r = compile(right.clone());
        let and = compile(json!({"AND": [left.clone(), right.clone()]}));
        let or = compile(json!({"OR": [left, right]}));

        for row in &rows {
            let a = FilterEvaluator::evaluate(&l, row);
            let b = FilterEvaluator::evaluate(&r, row);
            prop_assert_eq!(FilterEvaluator::evaluate(&and, row), a && b);
            prop_assert_eq!(FilterEvaluator::evaluate(&or, row), a || b);
        }
    }

    #[test]
    fn prop_single_child_is_identity(leaf in leaf_strategy()) {
        let p = compile(leaf.clone());
        prop_assert_eq!(compile(json!({"AND": [leaf.clone()]})), p.clone());
        prop_assert_eq!(compile(json!({"OR": [leaf]})), p);
    }

    #[test]
    fn prop_not_in_negates_in(
        field in prop_oneof![Just("age"), Just("score")],
        set in proptest::collection::vec(-10i64..40, 1..8),
        rows in proptest::collection::vec(row_strategy(), 0..20),
    ) {
        let inside = compile(json!({ field: {"in": set.clone()} }));
        let outside = compile(json!({ field: {"!in": set} }));

        for row in &rows {
            prop_assert_eq!(
                FilterEvaluator::evaluate(&outside, row),
                !FilterEvaluator::evaluate(&inside, row)
            );
        }
    }
}
