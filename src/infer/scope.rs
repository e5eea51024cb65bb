//! Binding scope for name resolution during inference.

use std::sync::Arc;

use indexmap::IndexMap;

use crate::query::Query;

use super::context::Context;

/// Persistent scope of `define` bindings.
///
/// Each binding is a link in a parent-pointer chain, so extending a scope
/// never affects contexts that hold the shorter chain.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scope {
    head: Option<Arc<ScopeEntry>>,
}

#[derive(Debug, PartialEq)]
struct ScopeEntry {
    binding: Binding,
    parent: Option<Arc<ScopeEntry>>,
}

impl Scope {
    /// Creates a new empty scope.
    #[must_use]
    pub fn new() -> Self {
        Scope { head: None }
    }

    /// Returns a scope extending this one with `binding`.
    ///
    /// A binding shadows any earlier binding of the same name.
    #[must_use]
    pub fn with_binding(&self, binding: Binding) -> Self {
        Scope {
            head: Some(Arc::new(ScopeEntry {
                binding,
                parent: self.head.clone(),
            })),
        }
    }

    /// Looks up a binding by name, most recent first.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<&Binding> {
        let mut entry = self.head.as_deref();
        while let Some(e) = entry {
            if e.binding.name == name {
                return Some(&e.binding);
            }
            entry = e.parent.as_deref();
        }
        None
    }

    /// Returns true if a binding with the given name is visible.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.lookup(name).is_some()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    /// Returns the visible bindings in insertion order.
    ///
    /// A shadowed name keeps the position of its first definition and
    /// resolves to its latest binding.
    #[must_use]
    pub fn bindings(&self) -> Vec<&Binding> {
        let mut chain = Vec::new();
        let mut entry = self.head.as_deref();
        while let Some(e) = entry {
            chain.push(&e.binding);
            entry = e.parent.as_deref();
        }

        let mut visible: IndexMap<&str, &Binding> = IndexMap::with_capacity(chain.len());
        for binding in chain.into_iter().rev() {
            visible.insert(binding.name.as_str(), binding);
        }
        visible.into_values().collect()
    }
}

/// A named, inferred sub-pipeline introduced by `define`.
#[derive(Debug, Clone, PartialEq)]
pub struct Binding {
    /// Binding name.
    pub name: String,
    /// The inferred sub-pipeline.
    pub query: Arc<Query>,
    /// Context of the sub-pipeline's result.
    pub context: Arc<Context>,
}
