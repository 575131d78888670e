//! Error types for the item grid.
//!
//! Every variant is an invalid-argument error: the call is rejected, a warning
//! is logged and the grid state is left untouched. Nothing here is fatal.

use horizon_itemgrid_core::logging::targets;

use crate::cell::CellId;
use crate::model::{ColumnKind, RowId};

/// A specialized Result type for item grid operations.
pub type Result<T> = std::result::Result<T, GridError>;

/// Errors reported by the item grid, its cell registry and the list store.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GridError {
    /// The cell handle does not refer to an attached cell.
    #[error("unknown cell {0:?}")]
    InvalidCell(CellId),

    /// The renderer has no property with this name.
    #[error("renderer `{renderer}` has no property `{property}`")]
    UnknownProperty {
        renderer: &'static str,
        property: String,
    },

    /// The column index is not below the model's column count.
    #[error("column {column} out of range (model has {count} columns)")]
    ColumnOutOfRange { column: usize, count: usize },

    /// A column or value type is incompatible with the target.
    #[error("`{target}` expects {expected:?}, got {found:?}")]
    TypeMismatch {
        target: String,
        expected: ColumnKind,
        found: Option<ColumnKind>,
    },

    /// The row identity is not (or no longer) part of the model.
    #[error("unknown row {0}")]
    UnknownRow(RowId),

    /// A row index is out of range.
    #[error("index {index} out of range (length {len})")]
    IndexOutOfRange { index: usize, len: usize },

    /// A position argument is out of range.
    #[error("position {position} out of range (length {len})")]
    InvalidPosition { position: usize, len: usize },

    /// The operation needs a model and none is set.
    #[error("no model set")]
    NoModel,
}

impl GridError {
    /// Create an unknown-property error.
    pub fn unknown_property(renderer: &'static str, property: impl Into<String>) -> Self {
        Self::UnknownProperty {
            renderer,
            property: property.into(),
        }
    }

    /// Create a type-mismatch error.
    pub fn type_mismatch(
        target: impl Into<String>,
        expected: ColumnKind,
        found: Option<ColumnKind>,
    ) -> Self {
        Self::TypeMismatch {
            target: target.into(),
            expected,
            found,
        }
    }

    /// Create an index error after bounds checking failed.
    pub fn index(index: usize, len: usize) -> Self {
        Self::IndexOutOfRange { index, len }
    }

    /// Log the error as a rejected call and hand it back.
    pub(crate) fn logged(self) -> Self {
        tracing::warn!(target: targets::API, error = %self, "call rejected");
        self
    }
}

/// Check `index < len`, logging and returning an error otherwise.
pub(crate) fn check_index(index: usize, len: usize) -> Result<()> {
    if index < len {
        Ok(())
    } else {
        Err(GridError::index(index, len).logged())
    }
}
