//! Recursive-descent parser from JSON filter documents to the AST.
//!
//! Only structural rules are checked here. Field names are not resolved
//! and operands are not coerced, so every error this module returns has
//! kind [`CompileErrorKind::Structural`](crate::CompileErrorKind).

use std::collections::HashSet;
use std::fmt;

use serde::de::{self, DeserializeSeed, Deserializer, MapAccess, SeqAccess, Visitor};
use serde_json::{Map, Value as Json};

use crate::ast::{CombinatorKind, FilterNode, Literal, Operand, Operator};
use crate::config::CompilerConfig;
use crate::error::CompileError;
use crate::path::Path;

/// Parser for filter documents.
pub struct Parser<'a> {
    config: &'a CompilerConfig,
}

impl<'a> Parser<'a> {
    /// Create a new parser with the given limits.
    pub fn new(config: &'a CompilerConfig) -> Self {
        Self { config }
    }

    /// Parse a complete filter document.
    pub fn parse(&self, document: &Json) -> Result<FilterNode, CompileError> {
        self.parse_node(document, Path::root(), 0)
    }

    /// Parse one node. `depth` is the number of enclosing combinators.
    fn parse_node(&self, value: &Json, path: Path, depth: usize) -> Result<FilterNode, CompileError> {
        let object = Self::expect_object(value, &path)?;
        let (key, inner) = Self::single_entry(
            object,
            &path,
            "empty predicate/logic node",
            "only one predicate per object",
        )?;

        match CombinatorKind::from_keyword(key) {
            Some(kind) => self.parse_combinator(kind, inner, path.key(key), depth + 1),
            None => self.parse_leaf(key, inner, path.key(key)),
        }
    }

    fn parse_combinator(
        &self,
        kind: CombinatorKind,
        value: &Json,
        path: Path,
        depth: usize,
    ) -> Result<FilterNode, CompileError> {
        if depth > self.config.max_depth {
            return Err(CompileError::structural(
                "maximum nesting depth exceeded",
                path,
            ));
        }

        let items = match value {
            Json::Array(items) if !items.is_empty() => items,
            Json::Array(_) => {
                return Err(CompileError::structural(
                    format!("{} requires at least one condition", kind),
                    path,
                ))
            }
            _ => {
                return Err(CompileError::structural(
                    format!("{} expects an array of conditions", kind),
                    path,
                ))
            }
        };

        let children = items
            .iter()
            .enumerate()
            .map(|(i, item)| self.parse_node(item, path.index(i), depth))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(FilterNode::Combinator {
            kind,
            children,
            path,
        })
    }

    fn parse_leaf(&self, field: &str, value: &Json, path: Path) -> Result<FilterNode, CompileError> {
        let object = Self::expect_object(value, &path)?;
        let (token, operand) = Self::single_entry(
            object,
            &path,
            "missing operator/value",
            "only one operator per predicate",
        )?;

        let path = path.key(token);
        let operator: Operator = token
            .parse()
            .map_err(|message: String| CompileError::structural(message, path.clone()))?;
        let operand = self.parse_operand(operator, operand, &path)?;

        Ok(FilterNode::Leaf {
            field: field.to_string(),
            operator,
            operand,
            path,
        })
    }

    fn parse_operand(
        &self,
        operator: Operator,
        value: &Json,
        path: &Path,
    ) -> Result<Operand, CompileError> {
        if operator.is_set() {
            let items = match value {
                Json::Array(items) => items,
                _ => {
                    return Err(CompileError::structural(
                        format!("operator '{}' expects an array", operator),
                        path.clone(),
                    ))
                }
            };
            if items.is_empty() {
                return Err(CompileError::structural(
                    format!("operator '{}' expects a non-empty array", operator),
                    path.clone(),
                ));
            }
            if items.len() > self.config.max_set_len {
                return Err(CompileError::structural(
                    format!(
                        "operator '{}' accepts at most {} values",
                        operator, self.config.max_set_len
                    ),
                    path.clone(),
                ));
            }

            let literals = items
                .iter()
                .enumerate()
                .map(|(i, item)| {
                    Literal::from_json(item).ok_or_else(|| {
                        CompileError::structural(
                            format!("operator '{}' expects scalar values", operator),
                            path.index(i),
                        )
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;
            return Ok(Operand::Set(literals));
        }

        match value {
            Json::Null => Ok(Operand::Null),
            Json::Array(_) | Json::Object(_) => Err(CompileError::structural(
                format!("operator '{}' expects a scalar value", operator),
                path.clone(),
            )),
            scalar => Literal::from_json(scalar).map(Operand::Scalar).ok_or_else(|| {
                CompileError::structural(
                    format!("operator '{}' expects a scalar value", operator),
                    path.clone(),
                )
            }),
        }
    }

    fn expect_object<'v>(value: &'v Json, path: &Path) -> Result<&'v Map<String, Json>, CompileError> {
        value
            .as_object()
            .ok_or_else(|| CompileError::structural("object expected", path.clone()))
    }

    /// The only entry of `object`.
    fn single_entry<'v>(
        object: &'v Map<String, Json>,
        path: &Path,
        empty_message: &str,
        multi_message: &str,
    ) -> Result<(&'v str, &'v Json), CompileError> {
        let mut entries = object.iter();
        match (entries.next(), entries.next()) {
            (Some((key, value)), None) => Ok((key.as_str(), value)),
            (None, _) => Err(CompileError::structural(empty_message, path.clone())),
            (Some(_), Some(_)) => Err(CompileError::structural(multi_message, path.clone())),
        }
    }
}

/// Parse a filter document into its AST.
pub fn parse(document: &Json, config: &CompilerConfig) -> Result<FilterNode, CompileError> {
    Parser::new(config).parse(document)
}

/// Parse a filter document from JSON text.
///
/// `serde_json` keeps the last of two equal keys, so the text is scanned
/// for repeated keys before the tree is parsed.
pub fn parse_str(text: &str, config: &CompilerConfig) -> Result<FilterNode, CompileError> {
    if text.len() > config.max_input_len {
        return Err(CompileError::structural(
            format!("filter document exceeds {} bytes", config.max_input_len),
            Path::root(),
        ));
    }
    let document: Json = serde_json::from_str(text).map_err(malformed)?;

    let mut deserializer = serde_json::Deserializer::from_str(text);
    let scan = KeyScan {
        role: Role::Node,
        path: Path::root(),
    };
    if let Some(err) = scan.deserialize(&mut deserializer).map_err(malformed)? {
        return Err(err);
    }

    Parser::new(config).parse(&document)
}

fn malformed(e: serde_json::Error) -> CompileError {
    CompileError::structural(format!("malformed filter document: {}", e), Path::root()).with_cause(e)
}

/// What a JSON value stands for in a filter document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Role {
    /// A predicate or logic object.
    Node,
    /// The array under `AND`/`OR`.
    Conditions,
    /// The `{operator: operand}` object of a leaf.
    Operators,
    /// Anything else.
    Other,
}

impl Role {
    fn duplicate_key(self, key: &str, path: Path) -> CompileError {
        let message = match self {
            Role::Node => "only one predicate per object".to_string(),
            Role::Operators => "only one operator per predicate".to_string(),
            Role::Conditions | Role::Other => format!("duplicate key '{}'", key),
        };
        CompileError::structural(message, path)
    }

    fn entry(self, key: &str) -> Role {
        match self {
            Role::Node if CombinatorKind::from_keyword(key).is_some() => Role::Conditions,
            Role::Node => Role::Operators,
            _ => Role::Other,
        }
    }

    fn element(self) -> Role {
        match self {
            Role::Conditions => Role::Node,
            _ => Role::Other,
        }
    }
}

/// Walks JSON text and yields the first repeated object key, if any.
struct KeyScan {
    role: Role,
    path: Path,
}

impl<'de> DeserializeSeed<'de> for KeyScan {
    type Value = Option<CompileError>;

    fn deserialize<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(self)
    }
}

impl<'de> Visitor<'de> for KeyScan {
    type Value = Option<CompileError>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a JSON value")
    }

    fn visit_bool<E: de::Error>(self, _: bool) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_i64<E: de::Error>(self, _: i64) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_u64<E: de::Error>(self, _: u64) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_f64<E: de::Error>(self, _: f64) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_str<E: de::Error>(self, _: &str) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut found = None;
        let mut index = 0;
        while let Some(inner) = seq.next_element_seed(KeyScan {
            role: self.role.element(),
            path: self.path.index(index),
        })? {
            found = found.or(inner);
            index += 1;
        }
        Ok(found)
    }

    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut found = None;
        let mut seen = HashSet::new();
        while let Some(key) = map.next_key::<String>()? {
            let inner = map.next_value_seed(KeyScan {
                role: self.role.entry(&key),
                path: self.path.key(key.as_str()),
            })?;
            if found.is_none() && !seen.insert(key.clone()) {
                found = Some(self.role.duplicate_key(&key, self.path.clone()));
            }
            found = found.or(inner);
        }
        Ok(found)
    }
}
