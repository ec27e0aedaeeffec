//! Compiled predicate IR.
//!
//! A [`Predicate`] is the output of filter compilation: a description of the
//! condition that a downstream executor applies to records. Leaves compare a
//! single field with already-typed values; `And`/`Or` nodes compose them.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::value::Value;

/// Boolean combinator kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CombinatorKind {
    /// Conjunction.
    And,
    /// Disjunction.
    Or,
}

impl CombinatorKind {
    /// The keyword used for this combinator in filter documents.
    pub fn keyword(&self) -> &'static str {
        match self {
            CombinatorKind::And => "AND",
            CombinatorKind::Or => "OR",
        }
    }

    /// Parse a combinator keyword (case-sensitive).
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "AND" => Some(CombinatorKind::And),
            "OR" => Some(CombinatorKind::Or),
            _ => None,
        }
    }
}

impl fmt::Display for CombinatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// A compiled, composable predicate over the fields of one record type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Predicate {
    /// Field equals value.
    Eq { field: String, value: Value },
    /// Field not equals value.
    Ne { field: String, value: Value },
    /// Field less than value.
    Lt { field: String, value: Value },
    /// Field less than or equal to value.
    Le { field: String, value: Value },
    /// Field greater than value.
    Gt { field: String, value: Value },
    /// Field greater than or equal to value.
    Ge { field: String, value: Value },
    /// Field is in a set of values.
    In { field: String, values: Vec<Value> },
    /// Field is not in a set of values.
    NotIn { field: String, values: Vec<Value> },
    /// Field is null or absent.
    IsNull { field: String },
    /// Field is present and not null.
    IsNotNull { field: String },
    /// All children must hold.
    And(Vec<Predicate>),
    /// At least one child must hold.
    Or(Vec<Predicate>),
}

impl Predicate {
    /// Create an equality predicate.
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Predicate::Eq {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Create a not-equal predicate.
    pub fn ne(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Predicate::Ne {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Create a less-than predicate.
    pub fn lt(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Predicate::Lt {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Create a less-than-or-equal predicate.
    pub fn le(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Predicate::Le {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Create a greater-than predicate.
    pub fn gt(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Predicate::Gt {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Create a greater-than-or-equal predicate.
    pub fn ge(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Predicate::Ge {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Create an IN predicate.
    pub fn in_values(field: impl Into<String>, values: Vec<Value>) -> Self {
        Predicate::In {
            field: field.into(),
            values,
        }
    }

    /// Create a NOT IN predicate.
    pub fn not_in_values(field: impl Into<String>, values: Vec<Value>) -> Self {
        Predicate::NotIn {
            field: field.into(),
            values,
        }
    }

    /// Create an IS NULL predicate.
    pub fn is_null(field: impl Into<String>) -> Self {
        Predicate::IsNull {
            field: field.into(),
        }
    }

    /// Create an IS NOT NULL predicate.
    pub fn is_not_null(field: impl Into<String>) -> Self {
        Predicate::IsNotNull {
            field: field.into(),
        }
    }

    /// Conjunction of `self` and `other`.
    ///
    /// When `self` is already an `And`, `other` is appended to it, so a left
    /// fold over `[a, b, c]` yields `And([a, b, c])` with the input order kept.
    pub fn and(self, other: Predicate) -> Predicate {
        match self {
            Predicate::And(mut children) => {
                children.push(other);
                Predicate::And(children)
            }
            lhs => Predicate::And(vec![lhs, other]),
        }
    }

    /// Disjunction of `self` and `other`. Mirrors [`Predicate::and`].
    pub fn or(self, other: Predicate) -> Predicate {
        match self {
            Predicate::Or(mut children) => {
                children.push(other);
                Predicate::Or(children)
            }
            lhs => Predicate::Or(vec![lhs, other]),
        }
    }

    /// Left-fold `children` with the combinator `kind`.
    ///
    /// A single child is returned unchanged. Returns `None` only when
    /// `children` is empty; there is no neutral "match all" predicate.
    pub fn combine<I>(kind: CombinatorKind, children: I) -> Option<Predicate>
    where
        I: IntoIterator<Item = Predicate>,
    {
        let op: fn(Predicate, Predicate) -> Predicate = match kind {
            CombinatorKind::And => Predicate::and,
            CombinatorKind::Or => Predicate::or,
        };
        children.into_iter().reduce(op)
    }

    /// The combinator kind, if this is a compound predicate.
    pub fn combinator(&self) -> Option<CombinatorKind> {
        match self {
            Predicate::And(_) => Some(CombinatorKind::And),
            Predicate::Or(_) => Some(CombinatorKind::Or),
            _ => None,
        }
    }

    /// The field a leaf predicate tests, or `None` for compound predicates.
    pub fn field(&self) -> Option<&str> {
        match self {
            Predicate::Eq { field, .. }
            | Predicate::Ne { field, .. }
            | Predicate::Lt { field, .. }
            | Predicate::Le { field, .. }
            | Predicate::Gt { field, .. }
            | Predicate::Ge { field, .. }
            | Predicate::In { field, .. }
            | Predicate::NotIn { field, .. }
            | Predicate::IsNull { field }
            | Predicate::IsNotNull { field } => Some(field),
            Predicate::And(_) | Predicate::Or(_) => None,
        }
    }

    /// All field names referenced anywhere in this predicate.
    pub fn referenced_fields(&self) -> BTreeSet<&str> {
        let mut fields = BTreeSet::new();
        self.collect_fields(&mut fields);
        fields
    }

    fn collect_fields<'a>(&'a self, fields: &mut BTreeSet<&'a str>) {
        match self {
            Predicate::And(children) | Predicate::Or(children) => {
                for child in children {
                    child.collect_fields(fields);
                }
            }
            leaf => {
                if let Some(field) = leaf.field() {
                    fields.insert(field);
                }
            }
        }
    }

    /// Number of leaf comparisons in this predicate.
    pub fn leaf_count(&self) -> usize {
        match self {
            Predicate::And(children) | Predicate::Or(children) => {
                children.iter().map(Predicate::leaf_count).sum()
            }
            _ => 1,
        }
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::Eq { field, value } => write!(f, "{} = {}", field, value),
            Predicate::Ne { field, value } => write!(f, "{} <> {}", field, value),
            Predicate::Lt { field, value } => write!(f, "{} < {}", field, value),
            Predicate::Le { field, value } => write!(f, "{} <= {}", field, value),
            Predicate::Gt { field, value } => write!(f, "{} > {}", field, value),
            Predicate::Ge { field, value } => write!(f, "{} >= {}", field, value),
            Predicate::In { field, values } => {
                write!(f, "{} IN (", field)?;
                write_list(f, values)?;
                f.write_str(")")
            }
            Predicate::NotIn { field, values } => {
                write!(f, "{} NOT IN (", field)?;
                write_list(f, values)?;
                f.write_str(")")
            }
            Predicate::IsNull { field } => write!(f, "{} IS NULL", field),
            Predicate::IsNotNull { field } => write!(f, "{} IS NOT NULL", field),
            Predicate::And(children) => write_compound(f, CombinatorKind::And, children),
            Predicate::Or(children) => write_compound(f, CombinatorKind::Or, children),
        }
    }
}

fn write_list(f: &mut fmt::Formatter<'_>, values: &[Value]) -> fmt::Result {
    for (i, value) in values.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{}", value)?;
    }
    Ok(())
}

fn write_compound(
    f: &mut fmt::Formatter<'_>,
    kind: CombinatorKind,
    children: &[Predicate],
) -> fmt::Result {
    for (i, child) in children.iter().enumerate() {
        if i > 0 {
            write!(f, " {} ", kind)?;
        }
        match child.combinator() {
            Some(inner) if inner != kind => write!(f, "({})", child)?,
            _ => write!(f, "{}", child)?,
        }
    }
    Ok(())
}
