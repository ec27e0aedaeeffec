//! Sift Filter Language
//!
//! This crate provides a parser and compiler for JSON filter documents,
//! turning them into typed [`Predicate`]s for a given record type.
//!
//! # Filter Syntax
//!
//! ```text
//! {"age": {"eq": 10}}
//! {"score": {"eq": null}}
//! {"age": {"in": [10, 11, 12]}}
//! {"AND": [{"age": {"ge": 18}}, {"OR": [{"name": {"eq": "Alice"}}, {"name": {"!eq": "Bob"}}]}]}
//! ```
//!
//! Operators are `eq`, `!eq`, `gt`, `ge`, `lt`, `le`, `in` and `!in`
//! (`neq` and `nin` are accepted as aliases). Ordering operators apply to
//! numeric and temporal fields only.
//!
//! # Usage
//!
//! ```rust
//! use serde_json::json;
//! use sift_core::{EntityDef, FieldDef, FieldType, SchemaBundle};
//! use sift_lang::{compile_filter, FilterCompiler, Predicate};
//!
//! let schema = SchemaBundle::new().with_entity(
//!     EntityDef::new("Person")
//!         .with_field(FieldDef::new("age", FieldType::Int32))
//!         .with_field(FieldDef::new("name", FieldType::Text)),
//! );
//!
//! // Compile a JSON value in one step
//! let predicate = compile_filter(&schema, "Person", &json!({"age": {"gt": 18}})).unwrap();
//! assert_eq!(predicate, Predicate::gt("age", 18));
//!
//! // Or keep a compiler around and feed it JSON text
//! let compiler = FilterCompiler::new(&schema, "Person");
//! let predicate = compiler.compile_str(r#"{"name": {"eq": "Alice"}}"#).unwrap();
//! assert_eq!(predicate.to_string(), "name = 'Alice'");
//! ```

pub mod ast;
pub mod compiler;
pub mod config;
pub mod error;
pub mod parser;
pub mod path;

// Re-export main types
pub use ast::{CombinatorKind, FilterNode, Literal, Operand, Operator};
pub use compiler::{compile_filter, Compiler, FilterCompiler};
pub use config::CompilerConfig;
pub use error::{CompileError, CompileErrorKind, ErrorCause};
pub use path::{Path, Segment};
pub use sift_proto::{Predicate, Value};

/// Parse a filter document into an AST, checking structure only.
///
/// # Example
///
/// ```rust
/// use serde_json::json;
/// use sift_lang::{parse, CompilerConfig};
///
/// let node = parse(&json!({"AND": [{"age": {"eq": 10}}]}), &CompilerConfig::default()).unwrap();
/// assert_eq!(node.leaf_count(), 1);
/// ```
pub fn parse(document: &serde_json::Value, config: &CompilerConfig) -> Result<FilterNode, CompileError> {
    parser::parse(document, config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use sift_core::{EntityDef, FieldDef, FieldType, SchemaBundle};
    use std::sync::Arc;

    fn schema() -> SchemaBundle {
        SchemaBundle::new().with_entity(EntityDef::new("Person").with_fields([
            FieldDef::new("age", FieldType::Int32),
            FieldDef::new("name", FieldType::Text),
        ]))
    }

    #[test]
    fn test_parse_then_compile() {
        let schema = schema();
        let node = parse(&json!({"age": {"le": 3}}), &CompilerConfig::default()).unwrap();
        let predicate = Compiler::new(&schema, "Person").compile(&node).unwrap();
        assert_eq!(predicate, Predicate::le("age", 3));
    }

    #[test]
    fn test_error_with_path_context() {
        let result = compile_filter(
            &schema(),
            "Person",
            &json!({"OR": [{"age": {"eq": 1}}, {"name": {"gt": "x"}}]}),
        );
        let err = result.unwrap_err();
        let formatted = err.format_with_path();
        assert!(formatted.contains("error[type]"));
        assert!(formatted.contains("/OR/1/name/gt"));
    }

    #[test]
    fn test_shared_compiler_across_threads() {
        let compiler = Arc::new(FilterCompiler::new(schema(), "Person"));

        let handles: Vec<_> = (0..4)
            .map(|i| {
                let compiler = Arc::clone(&compiler);
                std::thread::spawn(move || compiler.compile_value(&json!({"age": {"eq": i}})))
            })
            .collect();

        for (i, handle) in handles.into_iter().enumerate() {
            let predicate = handle.join().unwrap().unwrap();
            assert_eq!(predicate, Predicate::eq("age", i as i32));
        }
    }
}
