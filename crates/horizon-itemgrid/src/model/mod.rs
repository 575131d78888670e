//! Data model for the item grid.
//!
//! The grid displays rows of a [`DataSource`]. Each row has a stable
//! [`RowId`] and typed [`CellValue`]s; [`ListStore`] is the in-memory
//! implementation.

mod data_source;
mod list_store;
mod value;

pub use data_source::{DataSource, DataSourceSignals};
pub use list_store::ListStore;
pub use value::{CellValue, ColumnKind, RowId};
