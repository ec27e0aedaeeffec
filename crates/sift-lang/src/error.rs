//! Error types for parsing and compilation.

use std::fmt;

use sift_core::{CoerceError, ResolveError};
use thiserror::Error;

use crate::path::Path;

/// Kinds of compilation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompileErrorKind {
    /// Malformed filter tree.
    Structural,
    /// Field (or record type) not known to the schema resolver.
    UnknownField,
    /// Operand cannot be converted to the field's declared type.
    Coercion,
    /// Operator not applicable to the field's declared type.
    Type,
}

impl CompileErrorKind {
    /// Short name for diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            CompileErrorKind::Structural => "structural",
            CompileErrorKind::UnknownField => "unknown_field",
            CompileErrorKind::Coercion => "coercion",
            CompileErrorKind::Type => "type",
        }
    }
}

impl fmt::Display for CompileErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Lower-level failure behind a [`CompileError`].
#[derive(Debug, Error)]
pub enum ErrorCause {
    /// Schema lookup failed.
    #[error(transparent)]
    Resolve(#[from] ResolveError),
    /// Operand coercion failed.
    #[error(transparent)]
    Coerce(#[from] CoerceError),
    /// Filter text is not valid JSON.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Error while turning a filter document into a predicate.
#[derive(Debug, Error)]
pub struct CompileError {
    /// Error kind for programmatic handling.
    pub kind: CompileErrorKind,
    /// The error message.
    pub message: String,
    /// Location of the failing node in the filter document.
    pub path: Path,
    /// Underlying error, if any.
    #[source]
    pub cause: Option<ErrorCause>,
}

impl fmt::Display for CompileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl CompileError {
    /// Create a new compile error.
    pub fn new(kind: CompileErrorKind, message: impl Into<String>, path: Path) -> Self {
        Self {
            kind,
            message: message.into(),
            path,
            cause: None,
        }
    }

    /// Attach the underlying error.
    pub fn with_cause(mut self, cause: impl Into<ErrorCause>) -> Self {
        self.cause = Some(cause.into());
        self
    }

    /// Create a structural error.
    pub fn structural(message: impl Into<String>, path: Path) -> Self {
        Self::new(CompileErrorKind::Structural, message, path)
    }

    /// Create an unknown field error from a failed schema lookup.
    pub fn unknown_field(cause: ResolveError, path: Path) -> Self {
        Self::new(CompileErrorKind::UnknownField, cause.to_string(), path).with_cause(cause)
    }

    /// Create a coercion error.
    pub fn coercion(field: &str, cause: CoerceError, path: Path) -> Self {
        Self::new(
            CompileErrorKind::Coercion,
            format!("invalid value for field '{}': {}", field, cause),
            path,
        )
        .with_cause(cause)
    }

    /// Create a type error.
    pub fn type_error(message: impl Into<String>, path: Path) -> Self {
        Self::new(CompileErrorKind::Type, message, path)
    }

    /// Check the error kind.
    pub fn is(&self, kind: CompileErrorKind) -> bool {
        self.kind == kind
    }

    /// Format the error with its location in the filter document.
    pub fn format_with_path(&self) -> String {
        let mut result = format!("error[{}]: {}\n", self.kind, self.message);
        result.push_str(&format!("  --> {}\n", self.path));
        if let Some(cause) = &self.cause {
            result.push_str(&format!("   = cause: {}\n", cause));
        }
        result
    }
}
