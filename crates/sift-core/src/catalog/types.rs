//! Core type definitions for the catalog.

use serde::{Deserialize, Serialize};
use sift_proto::Value;

/// Declared value type of a record field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    /// 64-bit signed integer.
    Int64,
    /// 32-bit signed integer.
    Int32,
    /// Arbitrary-precision decimal.
    Decimal,
    /// 64-bit floating point.
    Float,
    /// UTF-8 text.
    Text,
    /// Boolean.
    Bool,
    /// Calendar date (`YYYY-MM-DD`).
    Date,
    /// Date and time without offset (`YYYY-MM-DDThh:mm:ss`).
    DateTime,
}

impl FieldType {
    /// All field types, in declaration order.
    pub const ALL: [FieldType; 8] = [
        FieldType::Int64,
        FieldType::Int32,
        FieldType::Decimal,
        FieldType::Float,
        FieldType::Text,
        FieldType::Bool,
        FieldType::Date,
        FieldType::DateTime,
    ];

    /// Check if this type is numeric.
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            FieldType::Int64 | FieldType::Int32 | FieldType::Decimal | FieldType::Float
        )
    }

    /// Check if this type is a date or date-time.
    pub fn is_temporal(&self) -> bool {
        matches!(self, FieldType::Date | FieldType::DateTime)
    }

    /// Check if ordering operators (`gt`, `ge`, `lt`, `le`) apply to this type.
    pub fn is_orderable(&self) -> bool {
        self.is_numeric() || self.is_temporal()
    }

    /// Lowercase name, as used in schema documents.
    pub fn name(&self) -> &'static str {
        match self {
            FieldType::Int64 => "int64",
            FieldType::Int32 => "int32",
            FieldType::Decimal => "decimal",
            FieldType::Float => "float",
            FieldType::Text => "text",
            FieldType::Bool => "bool",
            FieldType::Date => "date",
            FieldType::DateTime => "date_time",
        }
    }

    /// The field type a value belongs to.
    pub fn of(value: &Value) -> FieldType {
        match value {
            Value::Int32(_) => FieldType::Int32,
            Value::Int64(_) => FieldType::Int64,
            Value::Decimal(_) => FieldType::Decimal,
            Value::Float(_) => FieldType::Float,
            Value::Text(_) => FieldType::Text,
            Value::Bool(_) => FieldType::Bool,
            Value::Date(_) => FieldType::Date,
            Value::DateTime(_) => FieldType::DateTime,
        }
    }
}

impl std::fmt::Display for FieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
