//! Type algebra and literal values.

mod ty;
mod value;

pub use ty::{opt_type, seq_type, Attribute, AttributeMap, Card, Type, TypeKind};
pub use value::Literal;
