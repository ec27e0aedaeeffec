//! Reference evaluation of compiled predicates.

mod filter;

pub use filter::{matches, FilterEvaluator, Record};
