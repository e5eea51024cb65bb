//! rex-query - typed query model for a visual query builder.
//!
//! The crate is a small compiler front-end:
//! - [`query`]: the query IR and its constructor helpers
//! - [`infer`]: context propagation / type inference against a [`Domain`]
//! - [`navigation`]: the next steps available from an inferred context
//! - [`translate`]: lowering of a typed query into the backend wire format
//!
//! A [`Domain`] is usually built from the backend catalog:
//!
//! ```ignore
//! let domain = Arc::new(Catalog::from_json(json)?.to_domain()?);
//! let typed = infer_type(&domain, &query);
//! let wire = translate(&typed, &TranslateOptions::default())?;
//! ```

pub mod catalog;
pub mod domain;
pub mod error;
pub mod infer;
pub mod navigation;
pub mod query;
pub mod translate;
pub mod types;

pub use catalog::Catalog;
pub use domain::{AggregateFunction, Domain};
pub use error::{Result, RexError};
pub use infer::{infer_type, Context};
pub use navigation::{get_navigation, QueryNavigation};
pub use query::{Expr, Query};
pub use translate::{translate, TranslateOptions, WireExpr};
pub use types::{Card, Type};
