//! Field type resolution.
//!
//! The filter compiler never reaches for a global schema: callers pass a
//! [`SchemaResolver`] in, and the compiler asks it for each leaf's type.

use std::sync::Arc;

use super::{EntityDef, FieldType, SchemaBundle};
use crate::error::ResolveError;

/// Maps `(entity, field)` to the field's declared type.
///
/// Implementations are read-only at compile time and are shared across
/// concurrent callers, hence the `Sync` bound.
pub trait SchemaResolver: Sync {
    /// Resolve the declared type of `field` on `entity`.
    fn resolve_field_type(&self, entity: &str, field: &str) -> Result<FieldType, ResolveError>;
}

impl SchemaResolver for SchemaBundle {
    fn resolve_field_type(&self, entity: &str, field: &str) -> Result<FieldType, ResolveError> {
        self.get_entity(entity)
            .ok_or_else(|| ResolveError::UnknownEntity(entity.to_string()))?
            .resolve_field_type(entity, field)
    }
}

impl SchemaResolver for EntityDef {
    fn resolve_field_type(&self, entity: &str, field: &str) -> Result<FieldType, ResolveError> {
        if entity != self.name {
            return Err(ResolveError::UnknownEntity(entity.to_string()));
        }
        self.field_type(field)
            .ok_or_else(|| ResolveError::UnknownField {
                entity: entity.to_string(),
                field: field.to_string(),
            })
    }
}

impl<T: SchemaResolver + ?Sized> SchemaResolver for &T {
    fn resolve_field_type(&self, entity: &str, field: &str) -> Result<FieldType, ResolveError> {
        (**self).resolve_field_type(entity, field)
    }
}

impl<T: SchemaResolver + ?Sized> SchemaResolver for Box<T> {
    fn resolve_field_type(&self, entity: &str, field: &str) -> Result<FieldType, ResolveError> {
        (**self).resolve_field_type(entity, field)
    }
}

impl<T: SchemaResolver + Send + ?Sized> SchemaResolver for Arc<T> {
    fn resolve_field_type(&self, entity: &str, field: &str) -> Result<FieldType, ResolveError> {
        (**self).resolve_field_type(entity, field)
    }
}
