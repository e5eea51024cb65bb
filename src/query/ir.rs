//! Query pipeline nodes.

use std::sync::Arc;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::domain::AggregateFunction;
use crate::infer::Context;
use crate::types::Type;

use super::expression::Expr;

/// A query node together with its inferred context.
///
/// `context` is `None` until the node has been passed through
/// [`crate::infer::infer_type`]. The JSON form is the one the query builder
/// stores, e.g. `{"name": "navigate", "path": "study"}`; contexts are never
/// serialized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Query {
    #[serde(flatten)]
    pub op: QueryOp,
    #[serde(skip)]
    pub context: Option<Arc<Context>>,
}

/// Query node variants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "name", rename_all = "camelCase")]
pub enum QueryOp {
    /// Identity; the start of a pipeline.
    Here,
    /// Step to an attribute, relationship or scope binding.
    Navigate { path: String },
    /// Sequential composition.
    Pipeline { pipeline: Vec<Query> },
    /// Fan out into a record of independent sub-pipelines.
    Select {
        select: IndexMap<String, Query>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        sort: Option<SortBy>,
    },
    /// Keep rows for which the predicate holds.
    Filter { predicate: Expr },
    /// Keep at most `limit` rows.
    Limit { limit: usize },
    /// Reduce a `seq` value, optionally after navigating to `path`.
    Aggregate {
        aggregate: AggregateFunction,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        path: Option<String>,
    },
    /// Introduce a named binding for later steps.
    Define { binding: QueryBinding },
    /// Group rows by attributes.
    Group {
        #[serde(rename = "byPath")]
        by_path: Vec<String>,
    },
}

impl QueryOp {
    /// Returns the tag name of this node.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            QueryOp::Here => "here",
            QueryOp::Navigate { .. } => "navigate",
            QueryOp::Pipeline { .. } => "pipeline",
            QueryOp::Select { .. } => "select",
            QueryOp::Filter { .. } => "filter",
            QueryOp::Limit { .. } => "limit",
            QueryOp::Aggregate { .. } => "aggregate",
            QueryOp::Define { .. } => "define",
            QueryOp::Group { .. } => "group",
        }
    }
}

/// Named sub-pipeline introduced by `define`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryBinding {
    pub name: String,
    pub query: Arc<Query>,
}

/// Sort order applied to a select.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortBy {
    /// Field of the select to sort by.
    pub name: String,
    pub dir: SortDirection,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

impl From<QueryOp> for Query {
    fn from(op: QueryOp) -> Self {
        Query { op, context: None }
    }
}

impl Query {
    /// Creates a `here` node.
    #[must_use]
    pub fn here() -> Self {
        QueryOp::Here.into()
    }

    /// Creates a `navigate` node.
    #[must_use]
    pub fn navigate(path: impl Into<String>) -> Self {
        QueryOp::Navigate { path: path.into() }.into()
    }

    /// Creates a pipeline from its steps.
    #[must_use]
    pub fn pipeline(steps: impl IntoIterator<Item = Query>) -> Self {
        QueryOp::Pipeline {
            pipeline: steps.into_iter().collect(),
        }
        .into()
    }

    /// Creates a select from `(field, sub-pipeline)` pairs in declaration order.
    #[must_use]
    pub fn select<K: Into<String>>(fields: impl IntoIterator<Item = (K, Query)>) -> Self {
        QueryOp::Select {
            select: fields.into_iter().map(|(k, q)| (k.into(), q)).collect(),
            sort: None,
        }
        .into()
    }

    /// Creates a filter node.
    #[must_use]
    pub fn filter(predicate: Expr) -> Self {
        QueryOp::Filter { predicate }.into()
    }

    /// Creates a limit node.
    #[must_use]
    pub fn limit(limit: usize) -> Self {
        QueryOp::Limit { limit }.into()
    }

    /// Creates an aggregate node, optionally navigating to `path` first.
    #[must_use]
    pub fn aggregate(aggregate: AggregateFunction, path: Option<&str>) -> Self {
        QueryOp::Aggregate {
            aggregate,
            path: path.map(String::from),
        }
        .into()
    }

    /// Creates a define node binding `name` to `query`.
    #[must_use]
    pub fn define(name: impl Into<String>, query: Query) -> Self {
        QueryOp::Define {
            binding: QueryBinding {
                name: name.into(),
                query: Arc::new(query),
            },
        }
        .into()
    }

    /// Creates a group node.
    #[must_use]
    pub fn group<S: Into<String>>(by_path: impl IntoIterator<Item = S>) -> Self {
        QueryOp::Group {
            by_path: by_path.into_iter().map(Into::into).collect(),
        }
        .into()
    }

    /// Sets the sort order of a select node. Other nodes are returned unchanged.
    #[must_use]
    pub fn with_sort(mut self, name: impl Into<String>, dir: SortDirection) -> Self {
        if let QueryOp::Select { sort, .. } = &mut self.op {
            *sort = Some(SortBy {
                name: name.into(),
                dir,
            });
        }
        self
    }

    /// Parses a query from its JSON form.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or names an unknown node
    /// kind or aggregate function.
    pub fn from_json(json: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Returns the inferred context, if any.
    #[must_use]
    pub fn context(&self) -> Option<&Arc<Context>> {
        self.context.as_ref()
    }

    /// Returns the inferred type, if any.
    #[must_use]
    pub fn ty(&self) -> Option<&Type> {
        self.context.as_deref().map(|c| &c.ty)
    }

    /// Returns true if the node is typed and neither it nor anything it
    /// depends on is invalid.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.context.as_deref().is_some_and(|c| !c.has_invalid_type)
    }
}
