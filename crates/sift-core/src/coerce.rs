//! Operand coercion.
//!
//! Converts raw filter literals into [`Value`]s of a field's declared type.
//! Coercion always goes through the literal's textual form: the JSON number
//! `10` and the string `"10"` both coerce to `Int32(10)` for an `int32`
//! field, while `10.5` does not.

use std::str::FromStr;

use bigdecimal::BigDecimal;
use chrono::{NaiveDate, NaiveDateTime};
use sift_proto::{Literal, Value, DATE_FORMAT, DATE_TIME_FORMAT};

use crate::catalog::FieldType;
use crate::error::{CoerceError, CoerceFailure};

/// Coerce a single literal to `field_type`.
pub fn coerce(field_type: FieldType, literal: &Literal) -> Result<Value, CoerceError> {
    coerce_text(field_type, &literal.text())
}

/// Coerce every literal in `literals`, preserving order. Fails on the first
/// literal that does not coerce.
pub fn coerce_many(field_type: FieldType, literals: &[Literal]) -> Result<Vec<Value>, CoerceError> {
    literals
        .iter()
        .map(|literal| coerce(field_type, literal))
        .collect()
}

/// Coerce the textual form of an operand to `field_type`.
pub fn coerce_text(field_type: FieldType, text: &str) -> Result<Value, CoerceError> {
    let fail = |reason: CoerceFailure| CoerceError::new(field_type, text, reason);

    match field_type {
        FieldType::Int32 => text
            .parse::<i32>()
            .map(Value::Int32)
            .map_err(|e| fail(e.into())),
        FieldType::Int64 => text
            .parse::<i64>()
            .map(Value::Int64)
            .map_err(|e| fail(e.into())),
        FieldType::Decimal => BigDecimal::from_str(text)
            .map(Value::Decimal)
            .map_err(|e| fail(CoerceFailure::Decimal(e.to_string()))),
        FieldType::Float => {
            let f = text.parse::<f64>().map_err(|e| fail(e.into()))?;
            if !f.is_finite() {
                return Err(fail(CoerceFailure::NotFinite));
            }
            Ok(Value::Float(f))
        }
        FieldType::Text => Ok(Value::Text(text.to_string())),
        FieldType::Bool => match text {
            "true" => Ok(Value::Bool(true)),
            "false" => Ok(Value::Bool(false)),
            _ => Err(fail(CoerceFailure::Boolean)),
        },
        FieldType::Date => NaiveDate::parse_from_str(text, DATE_FORMAT)
            .map(Value::Date)
            .map_err(|e| fail(e.into())),
        FieldType::DateTime => NaiveDateTime::parse_from_str(text, DATE_TIME_FORMAT)
            .map(Value::DateTime)
            .map_err(|e| fail(e.into())),
    }
}
