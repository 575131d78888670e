//! The data-source abstraction the item grid displays.

use horizon_itemgrid_core::Signal;

use super::value::{CellValue, ColumnKind, RowId};

/// An ordered, mutable sequence of rows with typed columns.
///
/// Implementations must emit the matching [`DataSourceSignals`] after every
/// structural or value change; the grid mirrors the rows from those
/// notifications alone.
///
/// # Example
///
/// ```
/// use horizon_itemgrid::model::{CellValue, ColumnKind, DataSource, ListStore};
///
/// let store = ListStore::new(vec![ColumnKind::Icon, ColumnKind::Text]);
/// store.push(vec![CellValue::Icon("folder".into()), "Documents".into()]);
///
/// assert_eq!(store.row_count(), 1);
/// assert_eq!(store.value(0, 1), CellValue::from("Documents"));
/// ```
pub trait DataSource: Send + Sync {
    /// Number of rows.
    fn row_count(&self) -> usize;

    /// Number of columns.
    fn column_count(&self) -> usize;

    /// Declared type of a column, `None` if out of range.
    fn column_kind(&self, column: usize) -> Option<ColumnKind>;

    /// Stable identity of the row currently at `row`.
    fn row_id(&self, row: usize) -> Option<RowId>;

    /// Value at `row`/`column`; [`CellValue::None`] when out of range.
    fn value(&self, row: usize, column: usize) -> CellValue;

    /// Change notifications.
    fn signals(&self) -> &DataSourceSignals;

    /// Whether the row may be dragged out of the grid.
    fn row_draggable(&self, _row: usize) -> bool {
        true
    }

    /// Move a row to a new position, for reorderable grids.
    ///
    /// Returns `false` if the source does not support moving rows.
    fn move_row(&self, _from: usize, _to: usize) -> bool {
        false
    }
}

/// Signals emitted by a [`DataSource`].
///
/// Every signal is emitted after the change has been applied.
#[derive(Debug, Default)]
pub struct DataSourceSignals {
    /// A row was inserted. Args: (row index, row identity)
    pub row_inserted: Signal<(usize, RowId)>,
    /// A row's values changed. Args: (row index, row identity)
    pub row_changed: Signal<(usize, RowId)>,
    /// A row was deleted. Args: (former row index, row identity)
    pub row_deleted: Signal<(usize, RowId)>,
    /// Rows were permuted. `new_order[new_index] == old_index`.
    pub rows_reordered: Signal<Vec<usize>>,
}

impl DataSourceSignals {
    /// Creates a new set of data-source signals.
    pub fn new() -> Self {
        Self::default()
    }
}
