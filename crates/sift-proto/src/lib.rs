//! Sift protocol types.
//!
//! This crate defines the values and the compiled predicate IR that sit
//! between the filter compiler and whatever executes the predicate.
//!
//! # Modules
//!
//! - [`literal`] - Raw operand literals from filter documents
//! - [`value`] - Typed operand values
//! - [`predicate`] - Compiled predicates and their AND/OR composition
//!
//! # Serialization
//!
//! Every type derives serde's `Serialize` and `Deserialize`, so a compiled
//! predicate can be handed to an external executor as JSON:
//!
//! ```
//! use sift_proto::Predicate;
//!
//! let p = Predicate::eq("age", 10).and(Predicate::is_null("score"));
//! let json = serde_json::to_string(&p).unwrap();
//! let back: Predicate = serde_json::from_str(&json).unwrap();
//! assert_eq!(p, back);
//! ```

pub mod literal;
pub mod predicate;
pub mod value;

pub use literal::Literal;
pub use predicate::{CombinatorKind, Predicate};
pub use value::{Value, DATE_FORMAT, DATE_TIME_FORMAT};
