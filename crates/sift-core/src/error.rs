//! Core error types.

use thiserror::Error;

use crate::catalog::FieldType;

/// Catalog errors.
#[derive(Debug, Error)]
pub enum Error {
    /// Schema document is not valid JSON or has the wrong shape.
    #[error("schema parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// Schema document is well-formed but inconsistent.
    #[error("invalid schema: {0}")]
    InvalidSchema(String),
}

/// Field resolution errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// The record type is not part of the schema.
    #[error("unknown entity '{0}'")]
    UnknownEntity(String),

    /// The record type has no field with this name.
    #[error("unknown field '{field}' on entity '{entity}'")]
    UnknownField {
        /// Entity that was searched.
        entity: String,
        /// Field that was not found.
        field: String,
    },
}

/// An operand whose text cannot be read as the target field type.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("cannot coerce '{text}' to {target}")]
pub struct CoerceError {
    /// Type the operand was coerced to.
    pub target: FieldType,
    /// Textual form of the operand.
    pub text: String,
    /// Why parsing failed.
    #[source]
    pub reason: CoerceFailure,
}

impl CoerceError {
    /// Create a coercion error.
    pub fn new(target: FieldType, text: impl Into<String>, reason: CoerceFailure) -> Self {
        Self {
            target,
            text: text.into(),
            reason,
        }
    }
}

/// Underlying parse failure of a [`CoerceError`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoerceFailure {
    /// Not a base-10 integer, or out of range.
    #[error(transparent)]
    Integer(#[from] std::num::ParseIntError),

    /// Not a floating point number.
    #[error(transparent)]
    Float(#[from] std::num::ParseFloatError),

    /// Parsed, but not a finite number.
    #[error("value is not finite")]
    NotFinite,

    /// Not a decimal number.
    #[error("{0}")]
    Decimal(String),

    /// Neither `true` nor `false`.
    #[error("expected 'true' or 'false'")]
    Boolean,

    /// Not in the canonical date or date-time format.
    #[error(transparent)]
    Temporal(#[from] chrono::ParseError),
}
