//! Aggregate function table.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::RexError;
use crate::types::{Type, TypeKind};

/// Aggregate functions known to every domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AggregateFunction {
    Count,
    Exists,
    Sum,
    Min,
    Max,
    Mean,
}

impl AggregateFunction {
    /// All aggregate functions in table order.
    pub const ALL: [AggregateFunction; 6] = [
        AggregateFunction::Count,
        AggregateFunction::Exists,
        AggregateFunction::Sum,
        AggregateFunction::Min,
        AggregateFunction::Max,
        AggregateFunction::Mean,
    ];

    /// Returns the name of this aggregate function as used on the wire.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            AggregateFunction::Count => "count",
            AggregateFunction::Exists => "exists",
            AggregateFunction::Sum => "sum",
            AggregateFunction::Min => "min",
            AggregateFunction::Max => "max",
            AggregateFunction::Mean => "mean",
        }
    }

    /// Returns the human readable title of this aggregate function.
    #[must_use]
    pub fn title(&self) -> &'static str {
        match self {
            AggregateFunction::Count => "Count",
            AggregateFunction::Exists => "Exists",
            AggregateFunction::Sum => "Sum",
            AggregateFunction::Min => "Min",
            AggregateFunction::Max => "Max",
            AggregateFunction::Mean => "Mean",
        }
    }

    /// Returns whether this function applies to elements of the given type.
    ///
    /// Cardinality is ignored; the caller checks that the input is `seq`.
    #[must_use]
    pub fn is_allowed(&self, ty: &Type) -> bool {
        if ty.is_invalid() || ty.is_void() {
            return false;
        }
        match self {
            AggregateFunction::Count | AggregateFunction::Exists => true,
            AggregateFunction::Sum | AggregateFunction::Mean => {
                matches!(ty.kind, TypeKind::Number)
            }
            AggregateFunction::Min | AggregateFunction::Max => ty.is_orderable(),
        }
    }

    /// Returns the output type for this aggregate function given an input type.
    ///
    /// The result always has plain cardinality.
    #[must_use]
    pub fn make_type(&self, ty: &Type) -> Type {
        match self {
            AggregateFunction::Count | AggregateFunction::Sum | AggregateFunction::Mean => {
                Type::number()
            }
            AggregateFunction::Exists => Type::boolean(),
            AggregateFunction::Min | AggregateFunction::Max => ty.regular(),
        }
    }
}

impl FromStr for AggregateFunction {
    type Err = RexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AggregateFunction::ALL
            .into_iter()
            .find(|f| f.name() == s)
            .ok_or_else(|| RexError::UnknownAggregate(s.to_string()))
    }
}

impl fmt::Display for AggregateFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
