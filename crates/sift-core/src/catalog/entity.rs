//! Entity definitions.

use super::field::FieldDef;
use super::types::FieldType;
use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// An entity definition (record type schema).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityDef {
    /// Entity name (unique within schema).
    pub name: String,
    /// Field definitions.
    pub fields: Vec<FieldDef>,
}

impl EntityDef {
    /// Create a new entity definition.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Add a field to the entity.
    pub fn with_field(mut self, field: FieldDef) -> Self {
        self.fields.push(field);
        self
    }

    /// Add multiple fields.
    pub fn with_fields(mut self, fields: impl IntoIterator<Item = FieldDef>) -> Self {
        self.fields.extend(fields);
        self
    }

    /// Get a field by name.
    pub fn get_field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Get the declared type of a field.
    pub fn field_type(&self, name: &str) -> Option<FieldType> {
        self.get_field(name).map(|f| f.field_type)
    }

    /// Iterate over field names in declaration order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }

    /// Check that field names are unique.
    pub fn validate(&self) -> Result<(), Error> {
        let mut seen = HashSet::new();
        for name in self.field_names() {
            if !seen.insert(name) {
                return Err(Error::InvalidSchema(format!(
                    "duplicate field '{}' in entity '{}'",
                    name, self.name
                )));
            }
        }
        Ok(())
    }
}
