//! Per-node inference result.

use std::sync::Arc;

use crate::domain::Domain;
use crate::types::Type;

use super::scope::Scope;

/// Inference result attached to every query and expression node.
///
/// `prev` links to the context of the logical predecessor step. Many
/// contexts may share the same predecessor; contexts are never mutated
/// once attached to a node.
#[derive(Debug, Clone, PartialEq)]
pub struct Context {
    pub domain: Arc<Domain>,
    /// Inferred type.
    pub ty: Type,
    /// Bindings visible to subsequent `navigate` steps.
    pub scope: Scope,
    pub prev: Option<Arc<Context>>,
    /// Display title of the value, if known.
    pub title: Option<String>,
    /// True if this node or anything it depends on is invalid.
    pub has_invalid_type: bool,
    /// Dotted navigation path since the last `seq` step.
    pub path: Vec<String>,
}

impl Context {
    /// Creates the context queries start from: `void`, empty scope, no
    /// predecessor.
    #[must_use]
    pub fn root(domain: Arc<Domain>) -> Self {
        Context {
            domain,
            ty: Type::void(),
            scope: Scope::new(),
            prev: None,
            title: None,
            has_invalid_type: false,
            path: Vec::new(),
        }
    }

    /// Creates the context of a step following `prev` with result type `ty`.
    ///
    /// Scope, title and path are inherited; invalidity is inherited and
    /// raised if `ty` is itself invalid.
    #[must_use]
    pub fn next(prev: &Arc<Context>, ty: Type) -> Self {
        let has_invalid_type = prev.has_invalid_type || ty.is_invalid();
        Context {
            domain: Arc::clone(&prev.domain),
            ty,
            scope: prev.scope.clone(),
            prev: Some(Arc::clone(prev)),
            title: prev.title.clone(),
            has_invalid_type,
            path: prev.path.clone(),
        }
    }

    /// Returns the context of a single row of this context: the same
    /// context with the type's cardinality stripped.
    #[must_use]
    pub fn row(&self) -> Self {
        Context {
            ty: self.ty.regular(),
            ..self.clone()
        }
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn with_scope(mut self, scope: Scope) -> Self {
        self.scope = scope;
        self
    }

    #[must_use]
    pub fn with_path(mut self, path: Vec<String>) -> Self {
        self.path = path;
        self
    }

    /// Marks this context invalid if `tainted` is set.
    #[must_use]
    pub fn taint(mut self, tainted: bool) -> Self {
        self.has_invalid_type |= tainted;
        self
    }

    /// Replaces the type with `invalid` and marks the context.
    #[must_use]
    pub fn invalidate(mut self) -> Self {
        self.ty = Type::invalid();
        self.has_invalid_type = true;
        self
    }

    /// Returns true if this node's own type is invalid.
    #[must_use]
    pub fn is_invalid(&self) -> bool {
        self.ty.is_invalid()
    }

    /// Returns the dotted navigation path, e.g. `"site.address"`.
    #[must_use]
    pub fn dotted_path(&self) -> String {
        self.path.join(".")
    }

    #[cfg(test)]
    pub(crate) fn placeholder(ty: Type) -> Self {
        let domain = Domain::new(Vec::new()).expect("empty domain");
        Context {
            ty,
            ..Context::root(Arc::new(domain))
        }
    }
}
