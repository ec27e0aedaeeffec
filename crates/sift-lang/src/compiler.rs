//! Compiler from the filter AST to predicate IR.

use serde_json::Value as Json;
use sift_core::{coerce, coerce_many, FieldType, SchemaResolver};
use sift_proto::{Predicate, Value};
use tracing::{debug, instrument, trace};

use crate::ast::{FilterNode, Literal, Operand, Operator};
use crate::config::CompilerConfig;
use crate::error::CompileError;
use crate::parser;
use crate::path::Path;

/// Turns a parsed filter tree into a predicate for one record type.
///
/// Each leaf's field is resolved, the operator is checked against the
/// field's type and the operand is coerced. Combinators fold their
/// children left to right.
pub struct Compiler<'a, R: SchemaResolver + ?Sized> {
    resolver: &'a R,
    entity: &'a str,
}

impl<'a, R: SchemaResolver + ?Sized> Compiler<'a, R> {
    /// Create a compiler targeting `entity`.
    pub fn new(resolver: &'a R, entity: &'a str) -> Self {
        Self { resolver, entity }
    }

    /// Compile a filter tree to a predicate.
    ///
    /// No depth limit is applied here; [`FilterCompiler::compile_node`]
    /// checks it before compiling.
    pub fn compile(&self, node: &FilterNode) -> Result<Predicate, CompileError> {
        match node {
            FilterNode::Combinator {
                kind,
                children,
                path,
            } => {
                let predicates = children
                    .iter()
                    .map(|child| self.compile(child))
                    .collect::<Result<Vec<_>, _>>()?;
                trace!(kind = %kind, arity = predicates.len(), "Combining predicates");
                Predicate::combine(*kind, predicates).ok_or_else(|| {
                    CompileError::structural(
                        format!("{} requires at least one condition", kind),
                        path.clone(),
                    )
                })
            }
            FilterNode::Leaf {
                field,
                operator,
                operand,
                path,
            } => {
                let predicate = self.build_leaf(field, *operator, operand, path)?;
                debug!(field = %field, op = %operator, operand = %operand, "Compiled leaf");
                Ok(predicate)
            }
        }
    }

    /// Build the predicate for a single `field operator operand` leaf.
    fn build_leaf(
        &self,
        field: &str,
        operator: Operator,
        operand: &Operand,
        path: &Path,
    ) -> Result<Predicate, CompileError> {
        let field_type = self
            .resolver
            .resolve_field_type(self.entity, field)
            .map_err(|e| CompileError::unknown_field(e, path.clone()))?;

        if operator.is_ordering() && !field_type.is_orderable() {
            return Err(CompileError::type_error(
                format!(
                    "operator '{}' supported only for numeric or temporal fields",
                    operator
                ),
                path.clone(),
            ));
        }

        match operand {
            Operand::Null => match operator {
                Operator::Eq => Ok(Predicate::is_null(field)),
                Operator::Ne => Ok(Predicate::is_not_null(field)),
                op if op.is_ordering() => Err(CompileError::type_error(
                    format!("operator '{}' does not accept null", op),
                    path.clone(),
                )),
                op => Err(CompileError::structural(
                    format!("operator '{}' expects an array", op),
                    path.clone(),
                )),
            },
            Operand::Scalar(literal) => {
                let build: fn(&str, Value) -> Predicate = match operator {
                    Operator::Eq => |f, v| Predicate::eq(f, v),
                    Operator::Ne => |f, v| Predicate::ne(f, v),
                    Operator::Gt => |f, v| Predicate::gt(f, v),
                    Operator::Ge => |f, v| Predicate::ge(f, v),
                    Operator::Lt => |f, v| Predicate::lt(f, v),
                    Operator::Le => |f, v| Predicate::le(f, v),
                    Operator::In | Operator::NotIn => {
                        return Err(CompileError::structural(
                            format!("operator '{}' expects an array", operator),
                            path.clone(),
                        ))
                    }
                };
                let value = self.coerce_one(field, field_type, literal, path)?;
                Ok(build(field, value))
            }
            Operand::Set(literals) => {
                if !operator.is_set() {
                    return Err(CompileError::structural(
                        format!("operator '{}' expects a scalar value", operator),
                        path.clone(),
                    ));
                }
                if literals.is_empty() {
                    return Err(CompileError::structural(
                        format!("operator '{}' expects a non-empty array", operator),
                        path.clone(),
                    ));
                }
                let values = coerce_many(field_type, literals)
                    .map_err(|e| CompileError::coercion(field, e, path.clone()))?;
                Ok(if operator == Operator::In {
                    Predicate::in_values(field, values)
                } else {
                    Predicate::not_in_values(field, values)
                })
            }
        }
    }

    fn coerce_one(
        &self,
        field: &str,
        field_type: FieldType,
        literal: &Literal,
        path: &Path,
    ) -> Result<Value, CompileError> {
        coerce(field_type, literal).map_err(|e| CompileError::coercion(field, e, path.clone()))
    }
}

/// Filter compiler bound to a schema resolver and a target record type.
///
/// The compiler holds no per-request state, so one instance can serve
/// concurrent requests when `R` is `Sync`.
#[derive(Debug, Clone)]
pub struct FilterCompiler<R> {
    resolver: R,
    entity: String,
    config: CompilerConfig,
}

impl<R: SchemaResolver> FilterCompiler<R> {
    /// Create a compiler for `entity` with default limits.
    pub fn new(resolver: R, entity: impl Into<String>) -> Self {
        Self {
            resolver,
            entity: entity.into(),
            config: CompilerConfig::default(),
        }
    }

    /// Replace the compiler limits.
    pub fn with_config(mut self, config: CompilerConfig) -> Self {
        self.config = config;
        self
    }

    /// The target record type.
    pub fn entity(&self) -> &str {
        &self.entity
    }

    /// The active limits.
    pub fn config(&self) -> &CompilerConfig {
        &self.config
    }

    /// Parse and compile a filter document.
    #[instrument(skip_all, fields(entity = %self.entity))]
    pub fn compile_value(&self, document: &Json) -> Result<Predicate, CompileError> {
        let result = parser::parse(document, &self.config).and_then(|node| self.compile_node(&node));
        if let Err(e) = &result {
            debug!(kind = %e.kind, path = %e.path, error = %e, "Filter compilation failed");
        }
        result
    }

    /// Compile an already parsed filter tree.
    ///
    /// Trees built by hand are held to the same depth limit as parsed ones.
    pub fn compile_node(&self, node: &FilterNode) -> Result<Predicate, CompileError> {
        if node.depth() > self.config.max_depth {
            return Err(CompileError::structural(
                "maximum nesting depth exceeded",
                node.path().clone(),
            ));
        }
        Compiler::new(&self.resolver, &self.entity).compile(node)
    }

    /// Parse JSON text and compile the filter document it holds.
    #[instrument(skip_all, fields(entity = %self.entity))]
    pub fn compile_str(&self, text: &str) -> Result<Predicate, CompileError> {
        let result = parser::parse_str(text, &self.config).and_then(|node| self.compile_node(&node));
        if let Err(e) = &result {
            debug!(kind = %e.kind, path = %e.path, error = %e, "Filter compilation failed");
        }
        result
    }
}

/// Compile a filter document against `entity` with default limits.
pub fn compile_filter<R: SchemaResolver + ?Sized>(
    resolver: &R,
    entity: &str,
    document: &Json,
) -> Result<Predicate, CompileError> {
    FilterCompiler::new(resolver, entity).compile_value(document)
}
