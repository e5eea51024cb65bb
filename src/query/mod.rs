//! Query intermediate representation.
//!
//! Queries are built with the constructor helpers on [`Query`] and [`Expr`]
//! (or deserialized from JSON) and are immutable afterwards. Inference
//! returns a new tree with every node's `context` populated.

mod expression;
mod ir;

pub use expression::{BinaryOp, Expr, ExprOp, LogicalOp, UnaryOp};
pub use ir::{Query, QueryBinding, QueryOp, SortBy, SortDirection};
