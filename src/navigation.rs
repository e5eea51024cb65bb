//! Navigation resolution: what can be navigated to from a context.

use indexmap::IndexMap;

use crate::domain::record_like_attributes;
use crate::infer::Context;
use crate::types::Type;

/// Name of the synthetic entry offered on `seq` contexts.
pub const COUNT_NAVIGATION: &str = "count";

/// A possible next `navigate` step.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryNavigation {
    /// Path to navigate to.
    pub value: String,
    /// Display label.
    pub label: String,
    /// Type of the value reached, composed with the context cardinality.
    pub ty: Type,
    /// True for bindings introduced by `define` rather than schema attributes.
    pub from_query: bool,
}

/// Enumerates the navigations available from `ctx`.
///
/// Schema attributes come first in declaration order, followed by scope
/// bindings in insertion order. A binding shadowing an attribute replaces
/// it. `seq` contexts additionally offer a `count` entry.
#[must_use]
pub fn get_navigation(ctx: &Context) -> IndexMap<String, QueryNavigation> {
    let mut navigation = IndexMap::new();

    if let Some(attributes) = record_like_attributes(&ctx.domain, &ctx.ty) {
        for (name, attr) in attributes {
            navigation.insert(
                name.clone(),
                QueryNavigation {
                    value: name.clone(),
                    label: attr.title.clone(),
                    ty: attr.ty.clone().compose_card(ctx.ty.card),
                    from_query: false,
                },
            );
        }
    }

    for binding in ctx.scope.bindings() {
        navigation.shift_remove(&binding.name);
        navigation.insert(
            binding.name.clone(),
            QueryNavigation {
                value: binding.name.clone(),
                label: binding.name.clone(),
                ty: binding.context.ty.clone().compose_card(ctx.ty.card),
                from_query: true,
            },
        );
    }

    if ctx.ty.is_seq() && !navigation.contains_key(COUNT_NAVIGATION) {
        navigation.insert(
            COUNT_NAVIGATION.to_string(),
            QueryNavigation {
                value: COUNT_NAVIGATION.to_string(),
                label: "Count".to_string(),
                ty: Type::number(),
                from_query: false,
            },
        );
    }

    navigation
}
