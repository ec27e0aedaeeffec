//! Schema bundle - the set of record types a filter can target.

use super::EntityDef;
use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A read-only snapshot of the record schemas.
///
/// Build it once at startup and share it (by reference or `Arc`) across
/// concurrent compilations; nothing mutates it while filters compile.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SchemaBundle {
    /// Entity definitions keyed by name.
    #[serde(default)]
    pub entities: HashMap<String, EntityDef>,
}

impl SchemaBundle {
    /// Create an empty schema bundle.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entity to the schema.
    pub fn with_entity(mut self, entity: EntityDef) -> Self {
        self.entities.insert(entity.name.clone(), entity);
        self
    }

    /// Get an entity by name.
    pub fn get_entity(&self, name: &str) -> Option<&EntityDef> {
        self.entities.get(name)
    }

    /// List all entity names, sorted.
    pub fn entity_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.entities.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }

    /// Load a schema bundle from its JSON form.
    ///
    /// Entities are keyed by name; a key that disagrees with the entity's
    /// own `name` is rejected.
    pub fn from_json_str(json: &str) -> Result<Self, Error> {
        let bundle: SchemaBundle = serde_json::from_str(json)?;
        if let Some((key, entity)) = bundle.entities.iter().find(|(k, e)| **k != e.name) {
            return Err(Error::InvalidSchema(format!(
                "entity key '{}' does not match entity name '{}'",
                key, entity.name
            )));
        }
        for entity in bundle.entities.values() {
            entity.validate()?;
        }
        Ok(bundle)
    }
}
