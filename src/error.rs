//! Error types for rex-query operations.
//!
//! Mistakes in a user-authored query are never reported through this type:
//! they are carried in-band as `invalid` types on the inferred contexts.
//! `RexError` covers integrity problems (a malformed catalog, an unknown
//! aggregate name) and misuse of the translator.

use thiserror::Error;

/// Result type alias using [`RexError`].
pub type Result<T> = std::result::Result<T, RexError>;

/// Error types for rex-query operations.
#[derive(Debug, Error)]
pub enum RexError {
    /// Catalog is inconsistent (unknown link target, duplicate field, etc.).
    #[error("Catalog error: {0}")]
    CatalogError(String),

    /// Aggregate function name outside the domain's aggregate table.
    #[error("Unknown aggregate function: {0}")]
    UnknownAggregate(String),

    /// Translation was requested for an untyped or invalid query.
    #[error("Translate error: {0}")]
    Translate(String),

    /// JSON (de)serialization failure.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
