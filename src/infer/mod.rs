//! Type inference for query pipelines.
//!
//! Inference threads a [`Context`] through the query:
//! - `navigate` resolves scope bindings before schema attributes
//! - `select`, `filter`, `define` and `group` check their sub-queries
//!   against the row context (the incoming context without cardinality)
//! - ill-typed steps become `invalid` and taint everything downstream
//!
//! The output is a new query tree with every node's context populated.

mod checker;
mod context;
mod expression;
mod scope;

pub use checker::{infer_type, TypeChecker, GROUP_ROWS};
pub use context::Context;
pub use scope::{Binding, Scope};
