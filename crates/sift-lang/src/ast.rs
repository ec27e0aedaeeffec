//! Abstract syntax tree for filter documents.
//!
//! A filter document is a JSON tree of single-key objects. Combinator nodes
//! (`AND`, `OR`) hold an array of children; leaf nodes map a field name to
//! a single `{operator: operand}` object:
//!
//! ```text
//! {"AND": [{"age": {"eq": 10}}, {"OR": [{"name": {"eq": "Alice"}}, {"name": {"eq": "Bob"}}]}]}
//! ```
//!
//! The parser produces this tree without consulting any schema, so leaf
//! operands are still raw literals.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::path::Path;
pub use sift_proto::{CombinatorKind, Literal};

/// Leaf operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    /// Equal (`eq`).
    Eq,
    /// Not equal (`!eq`).
    Ne,
    /// Greater than (`gt`).
    Gt,
    /// Greater than or equal (`ge`).
    Ge,
    /// Less than (`lt`).
    Lt,
    /// Less than or equal (`le`).
    Le,
    /// Set membership (`in`).
    In,
    /// Set non-membership (`!in`).
    NotIn,
}

impl Operator {
    /// All operators, in declaration order.
    pub const ALL: [Operator; 8] = [
        Operator::Eq,
        Operator::Ne,
        Operator::Gt,
        Operator::Ge,
        Operator::Lt,
        Operator::Le,
        Operator::In,
        Operator::NotIn,
    ];

    /// Canonical wire token.
    pub fn token(&self) -> &'static str {
        match self {
            Operator::Eq => "eq",
            Operator::Ne => "!eq",
            Operator::Gt => "gt",
            Operator::Ge => "ge",
            Operator::Lt => "lt",
            Operator::Le => "le",
            Operator::In => "in",
            Operator::NotIn => "!in",
        }
    }

    /// `gt`, `ge`, `lt` and `le`.
    pub fn is_ordering(&self) -> bool {
        matches!(self, Operator::Gt | Operator::Ge | Operator::Lt | Operator::Le)
    }

    /// `in` and `!in`.
    pub fn is_set(&self) -> bool {
        matches!(self, Operator::In | Operator::NotIn)
    }
}

impl FromStr for Operator {
    type Err = String;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        match token {
            "eq" => Ok(Operator::Eq),
            "!eq" | "neq" => Ok(Operator::Ne),
            "gt" => Ok(Operator::Gt),
            "ge" => Ok(Operator::Ge),
            "lt" => Ok(Operator::Lt),
            "le" => Ok(Operator::Le),
            "in" => Ok(Operator::In),
            "!in" | "nin" => Ok(Operator::NotIn),
            other => Err(format!("unsupported operator '{}'", other)),
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// The raw right-hand side of a leaf.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    /// JSON `null`.
    Null,
    /// A single string, number or boolean.
    Scalar(Literal),
    /// A non-empty array of scalars.
    Set(Vec<Literal>),
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Null => f.write_str("null"),
            Operand::Scalar(lit) => write!(f, "{}", lit),
            Operand::Set(lits) => {
                f.write_str("[")?;
                for (i, lit) in lits.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", lit)?;
                }
                f.write_str("]")
            }
        }
    }
}

/// A parsed filter tree.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterNode {
    /// `AND` / `OR` over one or more children.
    Combinator {
        kind: CombinatorKind,
        children: Vec<FilterNode>,
        path: Path,
    },
    /// `{field: {operator: operand}}`.
    Leaf {
        field: String,
        operator: Operator,
        operand: Operand,
        path: Path,
    },
}

impl FilterNode {
    /// Create a combinator node at the root.
    pub fn combinator(kind: CombinatorKind, children: Vec<FilterNode>) -> Self {
        FilterNode::Combinator {
            kind,
            children,
            path: Path::root(),
        }
    }

    /// Create a leaf node at the root.
    pub fn leaf(field: impl Into<String>, operator: Operator, operand: Operand) -> Self {
        FilterNode::Leaf {
            field: field.into(),
            operator,
            operand,
            path: Path::root(),
        }
    }

    /// Location of this node in the source document. For a leaf this is
    /// the operator key (`/name/gt`).
    pub fn path(&self) -> &Path {
        match self {
            FilterNode::Combinator { path, .. } | FilterNode::Leaf { path, .. } => path,
        }
    }

    /// Combinator nesting depth; a lone leaf has depth 0.
    pub fn depth(&self) -> usize {
        match self {
            FilterNode::Leaf { .. } => 0,
            FilterNode::Combinator { children, .. } => {
                1 + children.iter().map(FilterNode::depth).max().unwrap_or(0)
            }
        }
    }

    /// Number of leaves in the tree.
    pub fn leaf_count(&self) -> usize {
        match self {
            FilterNode::Leaf { .. } => 1,
            FilterNode::Combinator { children, .. } => {
                children.iter().map(FilterNode::leaf_count).sum()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operator_tokens() {
        for op in Operator::ALL {
            assert_eq!(op.token().parse::<Operator>().unwrap(), op);
            assert_eq!(op.to_string(), op.token());
        }
    }

    #[test]
    fn test_operator_aliases() {
        assert_eq!("neq".parse::<Operator>().unwrap(), Operator::Ne);
        assert_eq!("nin".parse::<Operator>().unwrap(), Operator::NotIn);
    }

    #[test]
    fn test_operator_tokens_are_case_sensitive() {
        let err = "EQ".parse::<Operator>().unwrap_err();
        assert_eq!(err, "unsupported operator 'EQ'");
        assert!("like".parse::<Operator>().is_err());
        assert!("".parse::<Operator>().is_err());
    }

    #[test]
    fn test_operator_categories() {
        assert!(Operator::Gt.is_ordering());
        assert!(!Operator::Eq.is_ordering());
        assert!(Operator::NotIn.is_set());
        assert!(!Operator::Ne.is_set());
    }

    #[test]
    fn test_operand_display() {
        assert_eq!(Operand::Null.to_string(), "null");
        assert_eq!(Operand::Scalar(Literal::from("Bob")).to_string(), "\"Bob\"");
        let set = Operand::Set(vec![Literal::from(10i64), Literal::from(11i64)]);
        assert_eq!(set.to_string(), "[10, 11]");
    }

    #[test]
    fn test_depth_and_leaf_count() {
        let leaf = || FilterNode::leaf("age", Operator::Eq, Operand::Scalar(Literal::from(1i64)));
        assert_eq!(leaf().depth(), 0);

        let tree = FilterNode::combinator(
            CombinatorKind::And,
            vec![
                leaf(),
                FilterNode::combinator(CombinatorKind::Or, vec![leaf(), leaf()]),
            ],
        );
        assert_eq!(tree.depth(), 2);
        assert_eq!(tree.leaf_count(), 3);
    }
}
