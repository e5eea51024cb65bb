//! Schema type algebra.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;

/// Cardinality of a value position.
///
/// Variants are ordered so that composing two cardinalities is their
/// maximum: `Seq` dominates `Opt`, which dominates `One`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Card {
    /// Exactly one value.
    #[default]
    One,
    /// Zero or one value.
    Opt,
    /// Zero or many values.
    Seq,
}

impl Card {
    /// Composes the cardinality of a nested position with its container.
    #[must_use]
    pub fn compose(self, other: Card) -> Card {
        self.max(other)
    }

    /// Returns the prefix used when rendering a type (`""`, `"opt"`, `"seq"`).
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Card::One => "",
            Card::Opt => "opt",
            Card::Seq => "seq",
        }
    }
}

/// A named attribute of a record or entity.
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    /// Human readable title.
    pub title: String,
    /// Attribute type.
    pub ty: Type,
}

impl Attribute {
    /// Creates a new attribute.
    #[must_use]
    pub fn new(title: impl Into<String>, ty: Type) -> Self {
        Attribute {
            title: title.into(),
            ty,
        }
    }
}

/// Attributes keyed by identifier, in declaration order.
pub type AttributeMap = IndexMap<String, Attribute>;

/// Shape of a value, independent of its cardinality.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeKind {
    /// No value; the type of the query root.
    Void,
    /// Result of an ill-typed query step.
    Invalid,
    Text,
    Number,
    Boolean,
    Date,
    Time,
    DateTime,
    Json,
    /// Text restricted to a fixed set of values.
    Enumeration { values: Vec<String> },
    /// Record with an explicit attribute map. `entity` names the entity the
    /// record was derived from, if any.
    Record {
        entity: Option<String>,
        attributes: Arc<AttributeMap>,
    },
    /// Reference to a domain entity, resolved lazily against the domain.
    Entity { name: String },
}

impl TypeKind {
    /// Returns the tag name of this kind.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            TypeKind::Void => "void",
            TypeKind::Invalid => "invalid",
            TypeKind::Text => "text",
            TypeKind::Number => "number",
            TypeKind::Boolean => "boolean",
            TypeKind::Date => "date",
            TypeKind::Time => "time",
            TypeKind::DateTime => "datetime",
            TypeKind::Json => "json",
            TypeKind::Enumeration { .. } => "enumeration",
            TypeKind::Record { .. } => "record",
            TypeKind::Entity { .. } => "entity",
        }
    }
}

/// A type together with its cardinality.
#[derive(Debug, Clone, PartialEq)]
pub struct Type {
    pub kind: TypeKind,
    pub card: Card,
}

impl Type {
    /// Creates a plain-cardinality type of the given kind.
    #[must_use]
    pub fn new(kind: TypeKind) -> Self {
        Type {
            kind,
            card: Card::One,
        }
    }

    #[must_use]
    pub fn void() -> Self {
        Type::new(TypeKind::Void)
    }

    #[must_use]
    pub fn invalid() -> Self {
        Type::new(TypeKind::Invalid)
    }

    #[must_use]
    pub fn text() -> Self {
        Type::new(TypeKind::Text)
    }

    #[must_use]
    pub fn number() -> Self {
        Type::new(TypeKind::Number)
    }

    #[must_use]
    pub fn boolean() -> Self {
        Type::new(TypeKind::Boolean)
    }

    #[must_use]
    pub fn date() -> Self {
        Type::new(TypeKind::Date)
    }

    #[must_use]
    pub fn time() -> Self {
        Type::new(TypeKind::Time)
    }

    #[must_use]
    pub fn datetime() -> Self {
        Type::new(TypeKind::DateTime)
    }

    #[must_use]
    pub fn json() -> Self {
        Type::new(TypeKind::Json)
    }

    #[must_use]
    pub fn enumeration(values: Vec<String>) -> Self {
        Type::new(TypeKind::Enumeration { values })
    }

    /// Creates a record type from an attribute map.
    #[must_use]
    pub fn record(entity: Option<String>, attributes: AttributeMap) -> Self {
        Type::new(TypeKind::Record {
            entity,
            attributes: Arc::new(attributes),
        })
    }

    /// Creates a reference to the named domain entity.
    #[must_use]
    pub fn entity(name: impl Into<String>) -> Self {
        Type::new(TypeKind::Entity { name: name.into() })
    }

    /// Returns this type with its cardinality replaced.
    #[must_use]
    pub fn with_card(mut self, card: Card) -> Self {
        self.card = card;
        self
    }

    /// Returns this type with its cardinality composed with `card`.
    #[must_use]
    pub fn compose_card(self, card: Card) -> Self {
        let card = self.card.compose(card);
        self.with_card(card)
    }

    /// Returns a plain-cardinality copy of this type.
    #[must_use]
    pub fn regular(&self) -> Self {
        self.clone().with_card(Card::One)
    }

    #[must_use]
    pub fn is_invalid(&self) -> bool {
        matches!(self.kind, TypeKind::Invalid)
    }

    #[must_use]
    pub fn is_void(&self) -> bool {
        matches!(self.kind, TypeKind::Void)
    }

    #[must_use]
    pub fn is_seq(&self) -> bool {
        self.card == Card::Seq
    }

    /// Returns true for plain-cardinality booleans.
    #[must_use]
    pub fn is_boolean(&self) -> bool {
        matches!(self.kind, TypeKind::Boolean)
    }

    /// Returns true if values of this type have attributes.
    #[must_use]
    pub fn is_record(&self) -> bool {
        matches!(self.kind, TypeKind::Record { .. } | TypeKind::Entity { .. })
    }

    /// Returns true for text and enumeration types.
    #[must_use]
    pub fn is_textual(&self) -> bool {
        matches!(self.kind, TypeKind::Text | TypeKind::Enumeration { .. })
    }

    /// Returns true for kinds with a total order usable by comparisons.
    #[must_use]
    pub fn is_orderable(&self) -> bool {
        matches!(
            self.kind,
            TypeKind::Number
                | TypeKind::Text
                | TypeKind::Enumeration { .. }
                | TypeKind::Date
                | TypeKind::Time
                | TypeKind::DateTime
        )
    }

    /// Returns the entity name for entity types and entity-derived records.
    #[must_use]
    pub fn entity_name(&self) -> Option<&str> {
        match &self.kind {
            TypeKind::Entity { name } => Some(name),
            TypeKind::Record { entity, .. } => entity.as_deref(),
            _ => None,
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.card != Card::One {
            write!(f, "{} ", self.card.as_str())?;
        }
        match &self.kind {
            TypeKind::Entity { name } => write!(f, "entity({name})"),
            kind => f.write_str(kind.name()),
        }
    }
}

/// Wraps a type in `seq` cardinality.
#[must_use]
pub fn seq_type(ty: Type) -> Type {
    ty.compose_card(Card::Seq)
}

/// Wraps a type in `opt` cardinality; a `seq` type stays `seq`.
#[must_use]
pub fn opt_type(ty: Type) -> Type {
    ty.compose_card(Card::Opt)
}
