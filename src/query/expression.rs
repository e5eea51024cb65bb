//! Predicate expressions used by `filter`.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::infer::Context;
use crate::types::Literal;

use super::ir::Query;

/// An expression together with its inferred context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expr {
    #[serde(flatten)]
    pub op: ExprOp,
    #[serde(skip)]
    pub context: Option<Arc<Context>>,
}

/// Expression variants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "name", rename_all = "camelCase")]
pub enum ExprOp {
    /// Literal value (constant).
    Value { value: Literal },

    /// Attribute or binding of the current row.
    Navigate { path: String },

    /// Sub-query evaluated against the current row.
    Query { query: Box<Query> },

    /// Comparison.
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },

    /// NOT / EXISTS.
    Unary { op: UnaryOp, expression: Box<Expr> },

    /// AND / OR over any number of operands.
    LogicalBinary {
        op: LogicalOp,
        expressions: Vec<Expr>,
    },
}

impl From<ExprOp> for Expr {
    fn from(op: ExprOp) -> Self {
        Expr { op, context: None }
    }
}

impl Expr {
    /// Creates a literal expression.
    #[must_use]
    pub fn value(value: impl Into<Literal>) -> Self {
        ExprOp::Value {
            value: value.into(),
        }
        .into()
    }

    /// Creates a navigation expression.
    #[must_use]
    pub fn navigate(path: impl Into<String>) -> Self {
        ExprOp::Navigate { path: path.into() }.into()
    }

    /// Creates a sub-query expression.
    #[must_use]
    pub fn query(query: Query) -> Self {
        ExprOp::Query {
            query: Box::new(query),
        }
        .into()
    }

    /// Creates a comparison expression.
    #[must_use]
    pub fn binary(op: BinaryOp, left: Expr, right: Expr) -> Self {
        ExprOp::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
        .into()
    }

    #[must_use]
    pub fn equal(left: Expr, right: Expr) -> Self {
        Expr::binary(BinaryOp::Equal, left, right)
    }

    #[must_use]
    pub fn not_equal(left: Expr, right: Expr) -> Self {
        Expr::binary(BinaryOp::NotEqual, left, right)
    }

    #[must_use]
    pub fn less(left: Expr, right: Expr) -> Self {
        Expr::binary(BinaryOp::Less, left, right)
    }

    #[must_use]
    pub fn greater(left: Expr, right: Expr) -> Self {
        Expr::binary(BinaryOp::Greater, left, right)
    }

    #[must_use]
    pub fn contains(left: Expr, right: Expr) -> Self {
        Expr::binary(BinaryOp::Contains, left, right)
    }

    /// Creates a logical NOT expression.
    #[must_use]
    pub fn not(expression: Expr) -> Self {
        ExprOp::Unary {
            op: UnaryOp::Not,
            expression: Box::new(expression),
        }
        .into()
    }

    /// Creates an EXISTS expression.
    #[must_use]
    pub fn exists(expression: Expr) -> Self {
        ExprOp::Unary {
            op: UnaryOp::Exists,
            expression: Box::new(expression),
        }
        .into()
    }

    /// Creates a logical AND expression.
    #[must_use]
    pub fn and(expressions: Vec<Expr>) -> Self {
        ExprOp::LogicalBinary {
            op: LogicalOp::And,
            expressions,
        }
        .into()
    }

    /// Creates a logical OR expression.
    #[must_use]
    pub fn or(expressions: Vec<Expr>) -> Self {
        ExprOp::LogicalBinary {
            op: LogicalOp::Or,
            expressions,
        }
        .into()
    }

    /// Returns the inferred context, if any.
    #[must_use]
    pub fn context(&self) -> Option<&Arc<Context>> {
        self.context.as_ref()
    }

    /// Returns the literal if this is a value expression.
    #[must_use]
    pub fn as_literal(&self) -> Option<&Literal> {
        match &self.op {
            ExprOp::Value { value } => Some(value),
            _ => None,
        }
    }
}

/// Comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BinaryOp {
    Equal,
    NotEqual,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    /// Substring match.
    Contains,
}

impl BinaryOp {
    /// Returns the wire symbol of this operator.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            BinaryOp::Equal => "=",
            BinaryOp::NotEqual => "!=",
            BinaryOp::Less => "<",
            BinaryOp::LessEqual => "<=",
            BinaryOp::Greater => ">",
            BinaryOp::GreaterEqual => ">=",
            BinaryOp::Contains => "~",
        }
    }

    /// Returns true for operators that need ordered operands.
    #[must_use]
    pub fn is_ordering(&self) -> bool {
        matches!(
            self,
            BinaryOp::Less | BinaryOp::LessEqual | BinaryOp::Greater | BinaryOp::GreaterEqual
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum UnaryOp {
    Not,
    Exists,
}

impl UnaryOp {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            UnaryOp::Not => "!",
            UnaryOp::Exists => "exists",
        }
    }
}

/// Logical operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LogicalOp {
    And,
    Or,
}

impl LogicalOp {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            LogicalOp::And => "&",
            LogicalOp::Or => "|",
        }
    }
}
