//! Catalog definitions as served by the backend, and their conversion
//! into a [`Domain`].

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::domain::{Domain, Entity};
use crate::error::{Result, RexError};
use crate::types::{opt_type, seq_type, Attribute, AttributeMap, Type};

/// Catalog of all entities exposed by the query backend.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalog {
    /// Entity definitions in declaration order.
    #[serde(default)]
    pub entity: Vec<EntityDef>,
}

impl Catalog {
    /// Creates a new empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Catalog { entity: Vec::new() }
    }

    /// Parses a catalog from its JSON form.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or names an unknown column type.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Finds an entity definition by name.
    #[must_use]
    pub fn get_entity(&self, name: &str) -> Option<&EntityDef> {
        self.entity.iter().find(|e| e.name == name)
    }

    /// Converts this catalog into a domain.
    ///
    /// # Errors
    ///
    /// Returns an error if a field is duplicated, has neither a column nor a
    /// link, or links to an entity that is not in the catalog.
    pub fn to_domain(&self) -> Result<Domain> {
        let entities = self
            .entity
            .iter()
            .map(EntityDef::to_entity)
            .collect::<Result<Vec<_>>>()?;
        Domain::new(entities)
    }
}

/// Schema definition for a catalog entity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityDef {
    /// Entity identifier.
    pub name: String,
    /// Display label; defaults to the name.
    #[serde(default)]
    pub label: Option<String>,
    /// Ordered list of field definitions.
    #[serde(default)]
    pub field: Vec<FieldDef>,
}

impl EntityDef {
    fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for field in &self.field {
            if !seen.insert(&field.label) {
                return Err(RexError::CatalogError(format!(
                    "Duplicate field '{}' in entity '{}'",
                    field.label, self.name
                )));
            }
        }
        Ok(())
    }

    fn to_entity(&self) -> Result<Entity> {
        self.validate()?;
        let mut attributes = AttributeMap::with_capacity(self.field.len());
        for field in self.field.iter().filter(|f| f.public) {
            let ty = field.to_type().map_err(|msg| {
                RexError::CatalogError(format!("Field '{}.{}': {msg}", self.name, field.label))
            })?;
            attributes.insert(field.label.clone(), Attribute::new(field.title(), ty));
        }
        let title = self.label.clone().unwrap_or_else(|| self.name.clone());
        Ok(Entity::new(self.name.clone(), title, attributes))
    }
}

/// Definition of a single field of an entity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldDef {
    /// Field identifier.
    pub label: String,
    /// Display title; defaults to the label.
    #[serde(default)]
    pub title: Option<String>,
    /// Storage column, absent for links and calculations.
    #[serde(default)]
    pub column: Option<ColumnDef>,
    /// Non-public fields are not exposed to queries.
    #[serde(default = "default_public")]
    pub public: bool,
    /// Field may be absent (`opt`).
    #[serde(default)]
    pub partial: bool,
    /// Field holds many values (`seq`).
    #[serde(default)]
    pub plural: bool,
    /// Field kind, e.g. `"column"`, `"link"` or `"calculation"`.
    #[serde(default)]
    pub kind: Option<String>,
    /// Link to another entity.
    #[serde(default)]
    pub link: Option<LinkDef>,
}

fn default_public() -> bool {
    true
}

impl FieldDef {
    /// Returns the display title of this field.
    #[must_use]
    pub fn title(&self) -> String {
        self.title.clone().unwrap_or_else(|| self.label.clone())
    }

    /// Returns true for calculated fields.
    #[must_use]
    pub fn is_calculation(&self) -> bool {
        self.kind.as_deref() == Some("calculation")
    }

    fn to_type(&self) -> std::result::Result<Type, String> {
        let ty = if let Some(link) = &self.link {
            Type::entity(link.target.clone())
        } else if self.is_calculation() {
            Type::text()
        } else {
            let column = self
                .column
                .as_ref()
                .ok_or_else(|| "field has neither a column nor a link".to_string())?;
            column.to_type()
        };
        let ty = if self.plural { seq_type(ty) } else { ty };
        Ok(if self.partial { opt_type(ty) } else { ty })
    }
}

/// Storage column of a field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnDef {
    /// Column data type.
    #[serde(rename = "type")]
    pub column_type: ColumnType,
    /// Allowed values for `enum` columns.
    #[serde(default, rename = "enum")]
    pub values: Option<Vec<String>>,
}

impl ColumnDef {
    /// Creates a new column definition.
    #[must_use]
    pub fn new(column_type: ColumnType) -> Self {
        ColumnDef {
            column_type,
            values: None,
        }
    }

    /// Maps this column onto the type algebra.
    #[must_use]
    pub fn to_type(&self) -> Type {
        match self.column_type {
            ColumnType::Text => Type::text(),
            ColumnType::Json => Type::json(),
            ColumnType::Enum => Type::enumeration(self.values.clone().unwrap_or_default()),
            ColumnType::Boolean => Type::boolean(),
            ColumnType::Integer | ColumnType::Decimal | ColumnType::Float => Type::number(),
            ColumnType::Date => Type::date(),
            ColumnType::Time => Type::time(),
            ColumnType::Datetime => Type::datetime(),
        }
    }
}

/// Column data types understood by the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    Text,
    Json,
    Enum,
    Boolean,
    Integer,
    Decimal,
    Float,
    Date,
    Time,
    Datetime,
}

/// Link from a field to another entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkDef {
    /// Target entity name.
    pub target: String,
    /// Name of the reverse link on the target, if any.
    #[serde(default)]
    pub inverse: Option<String>,
}
