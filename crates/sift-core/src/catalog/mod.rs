//! Schema catalog.
//!
//! Describes the record types a filter may target and the declared type of
//! each field. The compiler only ever sees the catalog through
//! [`SchemaResolver`].

mod entity;
mod field;
mod resolver;
mod schema;
mod types;

pub use entity::EntityDef;
pub use field::FieldDef;
pub use resolver::SchemaResolver;
pub use schema::SchemaBundle;
pub use types::FieldType;
