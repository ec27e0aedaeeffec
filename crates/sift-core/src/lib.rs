//! Sift Core - schema catalog, operand coercion and predicate evaluation.
//!
//! This crate holds everything the filter compiler needs to know about
//! record types, plus a reference evaluator for compiled predicates.

pub mod catalog;
pub mod coerce;
pub mod error;
pub mod query;

pub use catalog::{EntityDef, FieldDef, FieldType, SchemaBundle, SchemaResolver};
pub use coerce::{coerce, coerce_many};
pub use error::{CoerceError, CoerceFailure, Error, ResolveError};
pub use query::{FilterEvaluator, Record};

pub use sift_proto as proto;
