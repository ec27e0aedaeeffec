//! Predicate evaluation against in-memory records.
//!
//! This module provides the `FilterEvaluator` that evaluates compiled
//! predicates against field values. Storage access stays with the caller:
//! anything that can look a field up by name is a [`Record`].

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

use bigdecimal::BigDecimal;
use num_traits::FromPrimitive;
use sift_proto::{Predicate, Value};
use tracing::debug;

/// A row of named field values.
///
/// `field` returns `None` both for a field the record does not carry and for
/// a field whose value is null.
pub trait Record {
    /// Look a field value up by name.
    fn field(&self, name: &str) -> Option<&Value>;
}

impl Record for [(String, Value)] {
    fn field(&self, name: &str) -> Option<&Value> {
        self.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }
}

impl Record for Vec<(String, Value)> {
    fn field(&self, name: &str) -> Option<&Value> {
        self.as_slice().field(name)
    }
}

impl Record for HashMap<String, Value> {
    fn field(&self, name: &str) -> Option<&Value> {
        self.get(name)
    }
}

impl Record for BTreeMap<String, Value> {
    fn field(&self, name: &str) -> Option<&Value> {
        self.get(name)
    }
}

impl<R: Record + ?Sized> Record for &R {
    fn field(&self, name: &str) -> Option<&Value> {
        (**self).field(name)
    }
}

/// Check whether `record` satisfies `predicate`.
pub fn matches<R: Record + ?Sized>(predicate: &Predicate, record: &R) -> bool {
    FilterEvaluator::evaluate(predicate, record)
}

/// Evaluates compiled predicates against records.
pub struct FilterEvaluator;

impl FilterEvaluator {
    /// Evaluate a predicate against a record.
    ///
    /// Returns `true` if the record matches, `false` otherwise.
    pub fn evaluate<R: Record + ?Sized>(predicate: &Predicate, record: &R) -> bool {
        match predicate {
            Predicate::Eq { field, value } => {
                Self::compare_field(record, field, value, Self::values_equal)
            }
            Predicate::Ne { field, value } => {
                Self::compare_field(record, field, value, |a, b| !Self::values_equal(a, b))
            }
            Predicate::Lt { field, value } => {
                Self::compare_field(record, field, value, |a, b| {
                    Self::compare_values(a, b).is_some_and(Ordering::is_lt)
                })
            }
            Predicate::Le { field, value } => {
                Self::compare_field(record, field, value, |a, b| {
                    Self::compare_values(a, b).is_some_and(Ordering::is_le)
                })
            }
            Predicate::Gt { field, value } => {
                Self::compare_field(record, field, value, |a, b| {
                    Self::compare_values(a, b).is_some_and(Ordering::is_gt)
                })
            }
            Predicate::Ge { field, value } => {
                Self::compare_field(record, field, value, |a, b| {
                    Self::compare_values(a, b).is_some_and(Ordering::is_ge)
                })
            }
            Predicate::In { field, values } => Self::in_set(record, field, values),
            Predicate::NotIn { field, values } => !Self::in_set(record, field, values),
            Predicate::IsNull { field } => record.field(field).is_none(),
            Predicate::IsNotNull { field } => record.field(field).is_some(),
            Predicate::And(children) => children.iter().all(|p| Self::evaluate(p, record)),
            Predicate::Or(children) => children.iter().any(|p| Self::evaluate(p, record)),
        }
    }

    /// Return the records matching `predicate`, in input order.
    pub fn select<'a, R: Record>(predicate: &Predicate, records: &'a [R]) -> Vec<&'a R> {
        let selected: Vec<&R> = records
            .iter()
            .filter(|r| Self::evaluate(predicate, *r))
            .collect();
        debug!(
            predicate = %predicate,
            scanned = records.len(),
            matched = selected.len(),
            "Selected records"
        );
        selected
    }

    fn in_set<R: Record + ?Sized>(record: &R, field: &str, values: &[Value]) -> bool {
        match record.field(field) {
            Some(fv) => values.iter().any(|v| Self::values_equal(fv, v)),
            None => false,
        }
    }

    /// Compare a field value with a comparator function.
    fn compare_field<R, F>(record: &R, field: &str, value: &Value, comparator: F) -> bool
    where
        R: Record + ?Sized,
        F: FnOnce(&Value, &Value) -> bool,
    {
        match record.field(field) {
            Some(fv) => comparator(fv, value),
            None => false, // null never compares
        }
    }

    /// Check if two values are equal.
    fn values_equal(a: &Value, b: &Value) -> bool {
        Self::compare_values(a, b).is_some_and(Ordering::is_eq)
    }

    /// Compare two values, returning their ordering if comparable.
    fn compare_values(a: &Value, b: &Value) -> Option<Ordering> {
        match (a, b) {
            (Value::Int32(a), Value::Int32(b)) => Some(a.cmp(b)),
            (Value::Int64(a), Value::Int64(b)) => Some(a.cmp(b)),
            (Value::Int32(a), Value::Int64(b)) => Some((*a as i64).cmp(b)),
            (Value::Int64(a), Value::Int32(b)) => Some(a.cmp(&(*b as i64))),
            (Value::Float(a), Value::Float(b)) => a.partial_cmp(b),
            (Value::Text(a), Value::Text(b)) => Some(a.cmp(b)),
            (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
            (Value::Date(a), Value::Date(b)) => Some(a.cmp(b)),
            (Value::DateTime(a), Value::DateTime(b)) => Some(a.cmp(b)),
            (a, b) if a.is_numeric() && b.is_numeric() => {
                Some(Self::to_decimal(a)?.cmp(&Self::to_decimal(b)?))
            }
            _ => None, // Incompatible types
        }
    }

    /// Widen a numeric value to a decimal. `None` for non-numeric and
    /// non-finite values.
    fn to_decimal(value: &Value) -> Option<BigDecimal> {
        match value {
            Value::Int32(i) => Some(BigDecimal::from(*i)),
            Value::Int64(i) => Some(BigDecimal::from(*i)),
            Value::Decimal(d) => Some(d.clone()),
            Value::Float(f) => BigDecimal::from_f64(*f),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::str::FromStr;

    fn make_row(fields: Vec<(&str, Value)>) -> Vec<(String, Value)> {
        fields.into_iter().map(|(n, v)| (n.to_string(), v)).collect()
    }

    fn dec(s: &str) -> Value {
        Value::Decimal(BigDecimal::from_str(s).unwrap())
    }

    #[test]
    fn test_eq_filter() {
        let row = make_row(vec![
            ("name", Value::Text("Alice".into())),
            ("age", Value::Int32(30)),
        ]);

        assert!(FilterEvaluator::evaluate(&Predicate::eq("name", "Alice"), &row));
        assert!(!FilterEvaluator::evaluate(&Predicate::eq("name", "Bob"), &row));
        assert!(FilterEvaluator::evaluate(&Predicate::eq("age", 30), &row));
    }

    #[test]
    fn test_ne_filter() {
        let row = make_row(vec![("age", Value::Int32(30))]);

        assert!(FilterEvaluator::evaluate(&Predicate::ne("age", 25), &row));
        assert!(!FilterEvaluator::evaluate(&Predicate::ne("age", 30), &row));
    }

    #[test]
    fn test_comparison_filters() {
        let row = make_row(vec![("score", Value::Int32(75))]);

        assert!(FilterEvaluator::evaluate(&Predicate::gt("score", 50), &row));
        assert!(!FilterEvaluator::evaluate(&Predicate::gt("score", 75), &row));
        assert!(FilterEvaluator::evaluate(&Predicate::ge("score", 75), &row));
        assert!(FilterEvaluator::evaluate(&Predicate::lt("score", 100), &row));
        assert!(FilterEvaluator::evaluate(&Predicate::le("score", 75), &row));
        assert!(!FilterEvaluator::evaluate(&Predicate::lt("score", 75), &row));
    }

    #[test]
    fn test_in_filter() {
        let row = make_row(vec![("status", Value::Text("active".into()))]);

        let filter = Predicate::in_values("status", vec!["active".into(), "pending".into()]);
        assert!(FilterEvaluator::evaluate(&filter, &row));

        let filter = Predicate::in_values("status", vec!["deleted".into(), "archived".into()]);
        assert!(!FilterEvaluator::evaluate(&filter, &row));
    }

    #[test]
    fn test_not_in_filter() {
        let row = make_row(vec![("status", Value::Text("active".into()))]);

        let filter = Predicate::not_in_values("status", vec!["deleted".into(), "archived".into()]);
        assert!(FilterEvaluator::evaluate(&filter, &row));

        let filter = Predicate::not_in_values("status", vec!["active".into()]);
        assert!(!FilterEvaluator::evaluate(&filter, &row));
    }

    #[test]
    fn test_not_in_is_complement_of_in_for_null() {
        let row = make_row(vec![("other", Value::Int32(1))]);
        let values = vec![Value::Int32(1)];

        assert!(!FilterEvaluator::evaluate(&Predicate::in_values("x", values.clone()), &row));
        assert!(FilterEvaluator::evaluate(&Predicate::not_in_values("x", values), &row));
    }

    #[test]
    fn test_is_null_filter() {
        let row_with_value = make_row(vec![("value", Value::Int32(42))]);
        let row_missing_field = make_row(vec![("other", Value::Int32(1))]);

        let filter = Predicate::is_null("value");
        assert!(!FilterEvaluator::evaluate(&filter, &row_with_value));
        assert!(FilterEvaluator::evaluate(&filter, &row_missing_field));

        let filter = Predicate::is_not_null("value");
        assert!(FilterEvaluator::evaluate(&filter, &row_with_value));
        assert!(!FilterEvaluator::evaluate(&filter, &row_missing_field));
    }

    #[test]
    fn test_and_filter() {
        let row = make_row(vec![
            ("age", Value::Int32(25)),
            ("active", Value::Bool(true)),
        ]);

        let filter = Predicate::gt("age", 18).and(Predicate::eq("active", true));
        assert!(FilterEvaluator::evaluate(&filter, &row));

        let filter = Predicate::gt("age", 30).and(Predicate::eq("active", true));
        assert!(!FilterEvaluator::evaluate(&filter, &row));
    }

    #[test]
    fn test_or_filter() {
        let row = make_row(vec![("status", Value::Text("pending".into()))]);

        let filter = Predicate::eq("status", "active").or(Predicate::eq("status", "pending"));
        assert!(FilterEvaluator::evaluate(&filter, &row));

        let filter = Predicate::eq("status", "active").or(Predicate::eq("status", "archived"));
        assert!(!FilterEvaluator::evaluate(&filter, &row));
    }

    #[test]
    fn test_nested_filter() {
        let row = make_row(vec![
            ("age", Value::Int32(10)),
            ("name", Value::Text("Bob".into())),
        ]);

        let filter = Predicate::eq("age", 10)
            .and(Predicate::eq("name", "Alice").or(Predicate::eq("name", "Bob")));
        assert!(FilterEvaluator::evaluate(&filter, &row));

        let filter = Predicate::eq("age", 11)
            .or(Predicate::eq("name", "Alice").and(Predicate::eq("age", 10)));
        assert!(!FilterEvaluator::evaluate(&filter, &row));
    }

    #[test]
    fn test_numeric_type_widening() {
        let row = make_row(vec![("value", Value::Int64(100))]);

        // Int64 field, Int32 filter value
        assert!(FilterEvaluator::evaluate(&Predicate::eq("value", 100i32), &row));
        assert!(FilterEvaluator::evaluate(&Predicate::gt("value", 50i32), &row));

        // Decimal and float operands
        assert!(FilterEvaluator::evaluate(&Predicate::eq("value", dec("100.00")), &row));
        assert!(FilterEvaluator::evaluate(&Predicate::lt("value", 100.5), &row));

        let row = make_row(vec![("score", dec("33.2"))]);
        assert!(FilterEvaluator::evaluate(&Predicate::gt("score", dec("33.1")), &row));
        assert!(FilterEvaluator::evaluate(&Predicate::le("score", 34i32), &row));
        assert!(!FilterEvaluator::evaluate(&Predicate::gt("score", f64::NAN), &row));
    }

    #[test]
    fn test_temporal_comparison() {
        let day = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let row = make_row(vec![
            ("born", Value::Date(day)),
            ("at", Value::DateTime(day.and_hms_opt(12, 0, 0).unwrap())),
        ]);

        let next = day.succ_opt().unwrap();
        assert!(FilterEvaluator::evaluate(&Predicate::lt("born", next), &row));
        assert!(FilterEvaluator::evaluate(
            &Predicate::ge("at", day.and_hms_opt(0, 0, 0).unwrap()),
            &row
        ));

        // Date and date-time never compare
        assert!(!FilterEvaluator::evaluate(&Predicate::le("at", next), &row));
        assert!(!FilterEvaluator::evaluate(&Predicate::eq("born", day.and_hms_opt(0, 0, 0).unwrap()), &row));
    }

    #[test]
    fn test_incompatible_types_do_not_compare() {
        let row = make_row(vec![("name", Value::Text("10".into()))]);

        assert!(!FilterEvaluator::evaluate(&Predicate::eq("name", 10), &row));
        assert!(!FilterEvaluator::evaluate(&Predicate::gt("name", 1), &row));
    }

    #[test]
    fn test_missing_field() {
        let row = make_row(vec![("name", Value::Text("Alice".into()))]);

        // Comparing against missing field returns false
        assert!(!FilterEvaluator::evaluate(&Predicate::eq("age", 30), &row));
        assert!(!FilterEvaluator::evaluate(&Predicate::ne("age", 30), &row));
    }

    #[test]
    fn test_empty_and() {
        let row = make_row(vec![("x", Value::Int32(1))]);

        // Empty AND is true (all zero conditions are met)
        assert!(FilterEvaluator::evaluate(&Predicate::And(vec![]), &row));
    }

    #[test]
    fn test_empty_or() {
        let row = make_row(vec![("x", Value::Int32(1))]);

        // Empty OR is false (no conditions are met)
        assert!(!FilterEvaluator::evaluate(&Predicate::Or(vec![]), &row));
    }

    #[test]
    fn test_map_records() {
        let mut hash = HashMap::new();
        hash.insert("age".to_string(), Value::Int32(40));
        let mut tree = BTreeMap::new();
        tree.insert("age".to_string(), Value::Int32(20));

        let filter = Predicate::ge("age", 30);
        assert!(matches(&filter, &hash));
        assert!(!matches(&filter, &tree));
    }

    #[test]
    fn test_select_preserves_order() {
        let rows = vec![
            make_row(vec![("id", Value::Int64(1)), ("age", Value::Int32(10))]),
            make_row(vec![("id", Value::Int64(2)), ("age", Value::Int32(30))]),
            make_row(vec![("id", Value::Int64(3)), ("age", Value::Int32(50))]),
        ];

        let selected = FilterEvaluator::select(&Predicate::gt("age", 20), &rows);
        let ids: Vec<&Value> = selected.iter().filter_map(|r| r.field("id")).collect();
        assert_eq!(ids, vec![&Value::Int64(2), &Value::Int64(3)]);
    }
}
