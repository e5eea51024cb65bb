//! Translation options.

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Options controlling the wire output of [`super::translate`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslateOptions {
    /// Caps the rows returned by each `seq` field of a select.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit_select: Option<usize>,
}

impl TranslateOptions {
    /// Creates options with no limits.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the per-field row limit for `seq` select fields.
    #[must_use]
    pub fn with_limit_select(mut self, limit: usize) -> Self {
        self.limit_select = Some(limit);
        self
    }

    /// Parses options from JSON, e.g. `{"limitSelect": 100}`.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
