//! Context propagation over query pipelines.

use std::sync::Arc;

use indexmap::IndexMap;
use tracing::{debug, trace};

use crate::domain::{record_like_attributes, AggregateFunction, Domain};
use crate::query::{Query, QueryBinding, QueryOp, SortBy};
use crate::types::{seq_type, Attribute, AttributeMap, Type};

use super::context::Context;
use super::scope::{Binding, Scope};

/// Name of the attribute holding grouped rows when the grouped value is
/// not an entity.
pub const GROUP_ROWS: &str = "value";

/// Infers the context of every node of `query` against `domain`.
///
/// Returns a new tree; `query` is left untouched. Ill-typed steps are
/// marked `invalid` rather than reported as errors.
#[must_use]
pub fn infer_type(domain: &Arc<Domain>, query: &Query) -> Query {
    TypeChecker::new(Arc::clone(domain)).check(query)
}

/// Type checker for query pipelines.
#[derive(Debug, Clone)]
pub struct TypeChecker {
    domain: Arc<Domain>,
}

impl TypeChecker {
    /// Creates a new type checker for the given domain.
    #[must_use]
    pub fn new(domain: Arc<Domain>) -> Self {
        TypeChecker { domain }
    }

    /// Returns the domain queries are checked against.
    #[must_use]
    pub fn domain(&self) -> &Arc<Domain> {
        &self.domain
    }

    /// Returns the context a query starts from.
    #[must_use]
    pub fn root_context(&self) -> Arc<Context> {
        Arc::new(Context::root(Arc::clone(&self.domain)))
    }

    /// Infers `query` from the root context.
    #[must_use]
    pub fn check(&self, query: &Query) -> Query {
        self.check_in(&self.root_context(), query)
    }

    /// Infers `query` as a continuation of `context`.
    #[must_use]
    pub fn check_in(&self, context: &Arc<Context>, query: &Query) -> Query {
        self.infer_query(context, query).0
    }

    pub(super) fn infer_query(&self, ctx: &Arc<Context>, query: &Query) -> (Query, Arc<Context>) {
        trace!(node = query.op.name(), input = %ctx.ty, "infer");

        let (op, next) = match &query.op {
            QueryOp::Here => (QueryOp::Here, Arc::clone(ctx)),
            QueryOp::Navigate { path } => (
                QueryOp::Navigate { path: path.clone() },
                Arc::new(self.navigate(ctx, path)),
            ),
            QueryOp::Pipeline { pipeline } => self.infer_pipeline(ctx, pipeline),
            QueryOp::Select { select, sort } => self.infer_select(ctx, select, sort.as_ref()),
            QueryOp::Filter { predicate } => {
                let row = Arc::new(ctx.row());
                let (predicate, pctx) = self.infer_expr(&row, predicate);
                let is_predicate = pctx.ty.is_boolean() && !pctx.ty.is_seq();
                let next = Context::next(ctx, ctx.ty.clone()).taint(pctx.has_invalid_type);
                let next = if is_predicate { next } else { next.invalidate() };
                (QueryOp::Filter { predicate }, Arc::new(next))
            }
            QueryOp::Limit { limit } => {
                let next = Context::next(ctx, ctx.ty.clone());
                let next = if ctx.ty.is_seq() { next } else { next.invalidate() };
                (QueryOp::Limit { limit: *limit }, Arc::new(next))
            }
            QueryOp::Aggregate { aggregate, path } => (
                QueryOp::Aggregate {
                    aggregate: *aggregate,
                    path: path.clone(),
                },
                Arc::new(self.infer_aggregate(ctx, *aggregate, path.as_deref())),
            ),
            QueryOp::Define { binding } => self.infer_define(ctx, binding),
            QueryOp::Group { by_path } => (
                QueryOp::Group {
                    by_path: by_path.clone(),
                },
                Arc::new(self.infer_group(ctx, by_path)),
            ),
        };

        if next.is_invalid() && !ctx.is_invalid() {
            debug!(node = op.name(), title = ?next.title, input = %ctx.ty, "query step is invalid");
        }

        let typed = Query {
            op,
            context: Some(Arc::clone(&next)),
        };
        (typed, next)
    }

    /// Resolves `path` from `ctx`: scope bindings first, then attributes.
    pub(super) fn navigate(&self, ctx: &Arc<Context>, path: &str) -> Context {
        if ctx.is_invalid() {
            return unresolved(ctx, path);
        }

        if let Some(binding) = ctx.scope.lookup(path) {
            let declared = &binding.context.ty;
            let ty = declared.clone().compose_card(ctx.ty.card);
            let nav_path = next_path(ctx, path, declared);
            return Context::next(ctx, ty)
                .with_title(binding.name.clone())
                .with_scope(Scope::new())
                .with_path(nav_path)
                .taint(binding.context.has_invalid_type);
        }

        match record_like_attributes(&ctx.domain, &ctx.ty).and_then(|attrs| attrs.get(path)) {
            Some(attr) => {
                let ty = attr.ty.clone().compose_card(ctx.ty.card);
                let nav_path = next_path(ctx, path, &attr.ty);
                Context::next(ctx, ty)
                    .with_title(attr.title.clone())
                    .with_scope(Scope::new())
                    .with_path(nav_path)
            }
            None => {
                debug!(path, ty = %ctx.ty, "navigation target not found");
                unresolved(ctx, path)
            }
        }
    }

    fn infer_pipeline(&self, ctx: &Arc<Context>, steps: &[Query]) -> (QueryOp, Arc<Context>) {
        let mut current = Arc::clone(ctx);
        let mut pipeline = Vec::with_capacity(steps.len());
        for step in steps {
            let (typed, next) = self.infer_query(&current, step);
            pipeline.push(typed);
            current = next;
        }
        if steps.is_empty() {
            current = Arc::new(Context::next(ctx, Type::void()));
        }
        (QueryOp::Pipeline { pipeline }, current)
    }

    fn infer_select(
        &self,
        ctx: &Arc<Context>,
        select: &IndexMap<String, Query>,
        sort: Option<&SortBy>,
    ) -> (QueryOp, Arc<Context>) {
        let row = Arc::new(ctx.row());
        let mut fields = IndexMap::with_capacity(select.len());
        let mut attributes = AttributeMap::with_capacity(select.len());
        let mut tainted = false;

        for (name, query) in select {
            let (typed, fctx) = self.infer_query(&row, query);
            tainted |= fctx.has_invalid_type;
            let title = fctx.title.clone().unwrap_or_else(|| name.clone());
            attributes.insert(name.clone(), Attribute::new(title, fctx.ty.clone()));
            fields.insert(name.clone(), typed);
        }

        let sortable = sort.map_or(true, |s| {
            attributes
                .get(&s.name)
                .is_some_and(|a| !a.ty.is_seq() && !a.ty.is_invalid())
        });

        let ty = Type::record(None, attributes).with_card(ctx.ty.card);
        let next = Context::next(ctx, ty).taint(tainted);
        let next = if ctx.is_invalid() || !sortable {
            next.invalidate()
        } else {
            next
        };

        let op = QueryOp::Select {
            select: fields,
            sort: sort.cloned(),
        };
        (op, Arc::new(next))
    }

    fn infer_aggregate(
        &self,
        ctx: &Arc<Context>,
        aggregate: AggregateFunction,
        path: Option<&str>,
    ) -> Context {
        let base = match path {
            Some(path) => Arc::new(self.navigate(ctx, path)),
            None => Arc::clone(ctx),
        };

        let allowed = !base.is_invalid() && base.ty.is_seq() && aggregate.is_allowed(&base.ty);
        let ty = if allowed {
            aggregate.make_type(&base.ty)
        } else {
            Type::invalid()
        };
        let title = match &base.title {
            Some(title) => format!("{} {title}", aggregate.title()),
            None => aggregate.title().to_string(),
        };

        Context::next(&base, ty)
            .with_title(title)
            .with_scope(Scope::new())
            .with_path(Vec::new())
    }

    fn infer_define(&self, ctx: &Arc<Context>, binding: &QueryBinding) -> (QueryOp, Arc<Context>) {
        let row = Arc::new(ctx.row());
        let (typed, bctx) = self.infer_query(&row, &binding.query);
        let typed = Arc::new(typed);
        let tainted = bctx.has_invalid_type;

        let scope = ctx.scope.with_binding(Binding {
            name: binding.name.clone(),
            query: Arc::clone(&typed),
            context: bctx,
        });
        let next = Context::next(ctx, ctx.ty.clone())
            .with_scope(scope)
            .taint(tainted);

        let op = QueryOp::Define {
            binding: QueryBinding {
                name: binding.name.clone(),
                query: typed,
            },
        };
        (op, Arc::new(next))
    }

    fn infer_group(&self, ctx: &Arc<Context>, by_path: &[String]) -> Context {
        let row = Arc::new(ctx.row());
        let mut valid = !ctx.is_invalid() && ctx.ty.is_seq();
        let mut attributes = AttributeMap::with_capacity(by_path.len() + 1);

        for path in by_path {
            let pctx = self.navigate(&row, path);
            valid &= !pctx.is_invalid() && !pctx.ty.is_seq();
            let title = pctx.title.clone().unwrap_or_else(|| path.clone());
            attributes.insert(path.clone(), Attribute::new(title, pctx.ty.clone()));
        }

        let rows_name = ctx.ty.entity_name().unwrap_or(GROUP_ROWS).to_string();
        if !attributes.contains_key(&rows_name) {
            let title = ctx.title.clone().unwrap_or_else(|| rows_name.clone());
            attributes.insert(rows_name, Attribute::new(title, seq_type(ctx.ty.regular())));
        }

        let next = Context::next(ctx, seq_type(Type::record(None, attributes)))
            .with_scope(Scope::new())
            .with_path(Vec::new());
        if valid {
            next
        } else {
            next.invalidate()
        }
    }
}

/// Context for a path that could not be resolved; titled by the raw path.
fn unresolved(ctx: &Arc<Context>, path: &str) -> Context {
    Context::next(ctx, Type::invalid())
        .with_title(path)
        .with_scope(Scope::new())
}

/// Navigating into a `seq` value starts a new path; anything else extends it.
fn next_path(ctx: &Context, name: &str, declared: &Type) -> Vec<String> {
    if declared.is_seq() {
        vec![name.to_string()]
    } else {
        let mut path = ctx.path.clone();
        path.push(name.to_string());
        path
    }
}
