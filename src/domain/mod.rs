//! Domain schema: entities and aggregate functions.
//!
//! A [`Domain`] is built once (usually from a backend catalog, see
//! [`crate::catalog`]) and shared by reference across inference calls.

mod aggregate;

pub use aggregate::AggregateFunction;

use std::collections::HashSet;

use indexmap::IndexMap;

use crate::error::{Result, RexError};
use crate::types::{seq_type, Attribute, AttributeMap, Type, TypeKind};

/// Schema definition for a domain entity.
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    /// Entity identifier.
    pub name: String,
    /// Human readable title.
    pub title: String,
    /// Attributes in catalog declaration order.
    pub attributes: AttributeMap,
}

impl Entity {
    /// Creates a new entity definition.
    #[must_use]
    pub fn new(name: impl Into<String>, title: impl Into<String>, attributes: AttributeMap) -> Self {
        Entity {
            name: name.into(),
            title: title.into(),
            attributes,
        }
    }

    /// Finds an attribute by name.
    #[must_use]
    pub fn get_attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.get(name)
    }
}

/// Root schema that queries are checked against.
#[derive(Debug, Clone, PartialEq)]
pub struct Domain {
    entities: IndexMap<String, Entity>,
    /// Attributes reachable from the query root: one `seq` entry per entity.
    root: AttributeMap,
}

impl Domain {
    /// Creates a domain from entity definitions.
    ///
    /// # Errors
    ///
    /// Returns an error if two entities share a name or an attribute refers
    /// to an entity that is not part of the domain.
    pub fn new(entities: Vec<Entity>) -> Result<Self> {
        let mut by_name = IndexMap::with_capacity(entities.len());
        for entity in entities {
            if by_name.contains_key(&entity.name) {
                return Err(RexError::CatalogError(format!(
                    "Entity '{}' is defined more than once",
                    entity.name
                )));
            }
            by_name.insert(entity.name.clone(), entity);
        }

        let names: HashSet<&str> = by_name.keys().map(String::as_str).collect();
        for entity in by_name.values() {
            for (attr_name, attr) in &entity.attributes {
                if let TypeKind::Entity { name } = &attr.ty.kind {
                    if !names.contains(name.as_str()) {
                        return Err(RexError::CatalogError(format!(
                            "Attribute '{}.{attr_name}' links to unknown entity '{name}'",
                            entity.name
                        )));
                    }
                }
            }
        }

        let root = by_name
            .values()
            .map(|e| {
                (
                    e.name.clone(),
                    Attribute::new(e.title.clone(), seq_type(Type::entity(e.name.clone()))),
                )
            })
            .collect();

        tracing::debug!(entities = by_name.len(), "built domain");

        Ok(Domain {
            entities: by_name,
            root,
        })
    }

    /// Retrieves an entity by name.
    #[must_use]
    pub fn entity(&self, name: &str) -> Option<&Entity> {
        self.entities.get(name)
    }

    /// Returns all entities in declaration order.
    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.entities.values()
    }

    /// Returns the attributes reachable from the query root.
    #[must_use]
    pub fn root_attributes(&self) -> &AttributeMap {
        &self.root
    }

    /// Looks up an aggregate function by name.
    ///
    /// # Errors
    ///
    /// Returns [`RexError::UnknownAggregate`] for names outside the table.
    pub fn aggregate(&self, name: &str) -> Result<AggregateFunction> {
        name.parse()
    }

    /// Returns the aggregate function table.
    #[must_use]
    pub fn aggregates(&self) -> &'static [AggregateFunction] {
        &AggregateFunction::ALL
    }
}

/// Returns the attributes available on values of type `ty`.
///
/// Records expose their own attributes, entities the attributes of the
/// entity definition and `void` the domain root. Other kinds have none.
#[must_use]
pub fn record_like_attributes<'a>(domain: &'a Domain, ty: &'a Type) -> Option<&'a AttributeMap> {
    match &ty.kind {
        TypeKind::Void => Some(domain.root_attributes()),
        TypeKind::Record { attributes, .. } => Some(attributes.as_ref()),
        TypeKind::Entity { name } => domain.entity(name).map(|e| &e.attributes),
        _ => None,
    }
}
