//! Backend catalog model and its conversion into a domain.

mod schema;

pub use schema::{Catalog, ColumnDef, ColumnType, EntityDef, FieldDef, LinkDef};
