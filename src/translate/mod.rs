//! Lowering of typed queries into the backend wire format.
//!
//! The wire format is a JSON S-expression: every compound expression is an
//! array whose first element is the operator tag, e.g.
//! `[".", ["navigate", "study"], ["navigate", "code"]]`.

mod options;

pub use options::TranslateOptions;

use serde_json::{json, Value};
use tracing::trace;

use crate::error::{Result, RexError};
use crate::query::{BinaryOp, Expr, ExprOp, Query, QueryBinding, QueryOp, SortBy};
use crate::types::Literal;

/// Wire-format expression.
pub type WireExpr = Value;

/// Suffix of the internal binding that holds the value of a `define`.
pub const REGULAR_SUFFIX: &str = "__regular";

/// Translates a typed query into the wire format.
///
/// # Errors
///
/// Returns [`RexError::Translate`] if the query has not been through
/// inference or contains invalid nodes.
pub fn translate(query: &Query, options: &TranslateOptions) -> Result<WireExpr> {
    Translator::new(options).translate(query)
}

/// Translator from typed queries to wire expressions.
#[derive(Debug, Clone)]
pub struct Translator<'a> {
    options: &'a TranslateOptions,
}

impl<'a> Translator<'a> {
    /// Creates a new translator with the given options.
    #[must_use]
    pub fn new(options: &'a TranslateOptions) -> Self {
        Translator { options }
    }

    /// Translates a typed query into the wire format.
    ///
    /// # Errors
    ///
    /// Returns [`RexError::Translate`] if the query has not been through
    /// inference or contains invalid nodes.
    pub fn translate(&self, query: &Query) -> Result<WireExpr> {
        let context = query.context().ok_or_else(|| {
            RexError::Translate("query has not been type checked".to_string())
        })?;
        if context.has_invalid_type {
            return Err(RexError::Translate(format!(
                "query has invalid type (at {})",
                context.title.as_deref().unwrap_or(query.op.name())
            )));
        }
        self.lower(None, query)
    }

    /// Lowers `query` as the continuation of the already lowered `prev`.
    fn lower(&self, prev: Option<WireExpr>, query: &Query) -> Result<WireExpr> {
        trace!(node = query.op.name(), "lower");

        match &query.op {
            QueryOp::Here => Ok(prev.unwrap_or_else(here)),
            QueryOp::Navigate { path } => Ok(compose(prev, navigate(path))),
            QueryOp::Pipeline { pipeline } => {
                let mut acc = prev;
                for step in pipeline {
                    acc = Some(self.lower(acc, step)?);
                }
                Ok(acc.unwrap_or_else(here))
            }
            QueryOp::Select { select, sort } => self.lower_select(prev, select, sort.as_ref()),
            QueryOp::Filter { predicate } => Ok(json!([
                "filter",
                prev.unwrap_or_else(here),
                self.lower_expr(predicate)?
            ])),
            QueryOp::Limit { limit } => Ok(json!(["take", prev.unwrap_or_else(here), limit])),
            QueryOp::Aggregate { aggregate, path } => {
                let input = match path {
                    Some(path) => compose(prev, navigate(path)),
                    None => prev.unwrap_or_else(here),
                };
                Ok(json!([aggregate.name(), input]))
            }
            QueryOp::Define { binding } => self.lower_define(prev, binding),
            QueryOp::Group { by_path } => {
                let mut group = vec![json!("group"), prev.unwrap_or_else(here)];
                group.extend(by_path.iter().map(|p| navigate(p)));
                Ok(Value::Array(group))
            }
        }
    }

    fn lower_select(
        &self,
        prev: Option<WireExpr>,
        select: &indexmap::IndexMap<String, Query>,
        sort: Option<&SortBy>,
    ) -> Result<WireExpr> {
        let mut items = Vec::with_capacity(select.len() + 2);
        items.push(json!("select"));
        items.push(prev.unwrap_or_else(here));

        for (name, field) in select {
            let mut lowered = self.lower(None, field)?;
            if let Some(limit) = self.options.limit_select {
                let ty = field.ty().ok_or_else(|| {
                    RexError::Translate(format!("select field '{name}' has not been type checked"))
                })?;
                if ty.is_seq() {
                    lowered = json!(["take", lowered, limit]);
                }
            }
            items.push(json!(["=>", name, lowered]));
        }

        let select = Value::Array(items);
        Ok(match sort {
            Some(sort) => json!(["sort", select, [sort.dir.as_str(), navigate(&sort.name)]]),
            None => select,
        })
    }

    fn lower_define(&self, prev: Option<WireExpr>, binding: &QueryBinding) -> Result<WireExpr> {
        let regular = format!("{}{REGULAR_SUFFIX}", binding.name);
        let value = self.lower(None, &binding.query)?;
        Ok(json!([
            "define",
            prev.unwrap_or_else(here),
            ["=>", regular, value],
            ["=>", binding.name, navigate(&regular)]
        ]))
    }

    fn lower_expr(&self, expr: &Expr) -> Result<WireExpr> {
        match &expr.op {
            ExprOp::Value { value } => Ok(value.to_wire()),
            ExprOp::Navigate { path } => Ok(navigate(path)),
            ExprOp::Query { query } => self.lower(None, query),
            ExprOp::Binary { op, left, right } => {
                let left = self.lower_expr(left)?;
                if let Some(Literal::List(values)) = right.as_literal() {
                    return Ok(lower_alternatives(*op, &left, values));
                }
                Ok(json!([op.as_str(), left, self.lower_expr(right)?]))
            }
            ExprOp::Unary { op, expression } => {
                Ok(json!([op.as_str(), self.lower_expr(expression)?]))
            }
            ExprOp::LogicalBinary { op, expressions } => {
                let mut items = Vec::with_capacity(expressions.len() + 1);
                items.push(json!(op.as_str()));
                for operand in expressions {
                    items.push(self.lower_expr(operand)?);
                }
                Ok(Value::Array(items))
            }
        }
    }
}

/// `x = [a, b]` becomes `x = a | x = b`; `x != [a, b]` becomes
/// `x != a & x != b`.
fn lower_alternatives(op: BinaryOp, left: &WireExpr, values: &[String]) -> WireExpr {
    let join = if op == BinaryOp::NotEqual { "&" } else { "|" };
    let mut items = Vec::with_capacity(values.len() + 1);
    items.push(json!(join));
    items.extend(values.iter().map(|v| json!([op.as_str(), left, v])));
    Value::Array(items)
}

fn here() -> WireExpr {
    json!(["here"])
}

fn navigate(path: &str) -> WireExpr {
    json!(["navigate", path])
}

/// Composes `next` after `prev`; `here` is the identity of composition.
fn compose(prev: Option<WireExpr>, next: WireExpr) -> WireExpr {
    match prev {
        Some(prev) if prev != here() => json!([".", prev, next]),
        _ => next,
    }
}
