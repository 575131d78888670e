//! In-memory row store.
//!
//! `ListStore` is the stock [`DataSource`]: a vector of rows with fixed,
//! typed columns. Every mutation emits the matching signal after the write
//! lock has been released, so slots may read the store.

use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;

use horizon_itemgrid_core::logging::targets;

use super::data_source::{DataSource, DataSourceSignals};
use super::value::{CellValue, ColumnKind, RowId};
use crate::error::{check_index, GridError, Result};

#[derive(Debug, Clone)]
struct StoredRow {
    id: RowId,
    values: Vec<CellValue>,
    draggable: bool,
}

/// A list of rows with typed columns.
pub struct ListStore {
    columns: Vec<ColumnKind>,
    rows: RwLock<Vec<StoredRow>>,
    next_id: AtomicU64,
    signals: DataSourceSignals,
}

impl std::fmt::Debug for ListStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListStore")
            .field("columns", &self.columns)
            .field("rows", &self.rows.read().len())
            .finish()
    }
}

impl ListStore {
    /// Create an empty store with the given column types.
    pub fn new(columns: Vec<ColumnKind>) -> Self {
        Self {
            columns,
            rows: RwLock::new(Vec::new()),
            next_id: AtomicU64::new(1),
            signals: DataSourceSignals::new(),
        }
    }

    /// Returns the number of rows.
    pub fn len(&self) -> usize {
        self.rows.read().len()
    }

    /// Returns `true` if the store has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.read().is_empty()
    }

    /// Append a row. Missing trailing values are filled with `None`.
    ///
    /// Rows with too many or mistyped values are still stored: offending
    /// values are replaced by `None` and a warning is logged.
    pub fn push(&self, values: Vec<CellValue>) -> RowId {
        let row = self.len();
        let values = self.coerce_row(values);
        self.insert_unchecked(row, values)
    }

    /// Insert a row at `index` (`index == len()` appends).
    pub fn insert(&self, index: usize, values: Vec<CellValue>) -> Result<RowId> {
        let len = self.len();
        if index > len {
            return Err(GridError::InvalidPosition {
                position: index,
                len,
            }
            .logged());
        }
        self.check_row(&values)?;
        let mut values = values;
        values.resize(self.columns.len(), CellValue::None);
        Ok(self.insert_unchecked(index, values))
    }

    /// Remove the row at `index`, returning its values.
    pub fn remove(&self, index: usize) -> Result<Vec<CellValue>> {
        let removed = {
            let mut rows = self.rows.write();
            check_index(index, rows.len())?;
            rows.remove(index)
        };
        self.signals.row_deleted.emit((index, removed.id));
        Ok(removed.values)
    }

    /// Remove a row by identity.
    pub fn remove_row(&self, id: RowId) -> Result<Vec<CellValue>> {
        let index = self
            .index_of(id)
            .ok_or_else(|| GridError::UnknownRow(id).logged())?;
        self.remove(index)
    }

    /// Remove every row, emitting one deletion per row from the end.
    pub fn clear(&self) {
        loop {
            let removed = {
                let mut rows = self.rows.write();
                rows.pop().map(|row| (rows.len(), row.id))
            };
            match removed {
                Some(args) => self.signals.row_deleted.emit(args),
                None => break,
            }
        }
    }

    /// Replace one value.
    pub fn set_value(&self, row: usize, column: usize, value: CellValue) -> Result<()> {
        self.check_value(column, &value)?;
        let id = {
            let mut rows = self.rows.write();
            check_index(row, rows.len())?;
            rows[row].values[column] = value;
            rows[row].id
        };
        self.signals.row_changed.emit((row, id));
        Ok(())
    }

    /// Set whether a row may be dragged out of the grid.
    pub fn set_row_draggable(&self, row: usize, draggable: bool) -> Result<()> {
        let mut rows = self.rows.write();
        check_index(row, rows.len())?;
        rows[row].draggable = draggable;
        Ok(())
    }

    /// Read one value.
    pub fn get(&self, row: usize, column: usize) -> Option<CellValue> {
        self.rows
            .read()
            .get(row)
            .and_then(|r| r.values.get(column).cloned())
    }

    /// Current index of a row identity.
    pub fn index_of(&self, id: RowId) -> Option<usize> {
        self.rows.read().iter().position(|r| r.id == id)
    }

    /// Move the row at `from` so that it ends up at index `to`.
    pub fn move_to(&self, from: usize, to: usize) -> Result<()> {
        let len = self.len();
        check_index(from, len)?;
        if to >= len {
            return Err(GridError::InvalidPosition { position: to, len }.logged());
        }
        if from == to {
            return Ok(());
        }

        let mut new_order: Vec<usize> = (0..len).collect();
        let moved = new_order.remove(from);
        new_order.insert(to, moved);
        self.reorder(new_order)
    }

    /// Permute the rows: the row formerly at `new_order[i]` ends up at `i`.
    pub fn reorder(&self, new_order: Vec<usize>) -> Result<()> {
        {
            let mut rows = self.rows.write();
            let len = rows.len();
            if new_order.len() != len {
                return Err(GridError::InvalidPosition {
                    position: new_order.len(),
                    len,
                }
                .logged());
            }
            let mut seen = vec![false; len];
            for &old in &new_order {
                check_index(old, len)?;
                if std::mem::replace(&mut seen[old], true) {
                    return Err(GridError::InvalidPosition { position: old, len }.logged());
                }
            }
            let old_rows = std::mem::take(&mut *rows);
            let mut slots: Vec<Option<StoredRow>> = old_rows.into_iter().map(Some).collect();
            *rows = new_order
                .iter()
                .filter_map(|&old| slots[old].take())
                .collect();
        }
        self.signals.rows_reordered.emit(new_order);
        Ok(())
    }

    fn insert_unchecked(&self, index: usize, values: Vec<CellValue>) -> RowId {
        let id = RowId::new(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.rows.write().insert(
            index,
            StoredRow {
                id,
                values,
                draggable: true,
            },
        );
        self.signals.row_inserted.emit((index, id));
        id
    }

    fn check_value(&self, column: usize, value: &CellValue) -> Result<()> {
        let Some(&expected) = self.columns.get(column) else {
            return Err(GridError::ColumnOutOfRange {
                column,
                count: self.columns.len(),
            }
            .logged());
        };
        match value.kind() {
            None => Ok(()),
            Some(found) if expected.accepts(found) => Ok(()),
            found => Err(GridError::type_mismatch(format!("column {column}"), expected, found).logged()),
        }
    }

    fn check_row(&self, values: &[CellValue]) -> Result<()> {
        if values.len() > self.columns.len() {
            return Err(GridError::ColumnOutOfRange {
                column: values.len() - 1,
                count: self.columns.len(),
            }
            .logged());
        }
        values
            .iter()
            .enumerate()
            .try_for_each(|(column, value)| self.check_value(column, value))
    }

    fn coerce_row(&self, mut values: Vec<CellValue>) -> Vec<CellValue> {
        if values.len() > self.columns.len() {
            tracing::warn!(
                target: targets::MODEL,
                extra = values.len() - self.columns.len(),
                "dropping surplus row values"
            );
        }
        values.resize(self.columns.len(), CellValue::None);
        for (column, value) in values.iter_mut().enumerate() {
            if self.check_value(column, value).is_err() {
                *value = CellValue::None;
            }
        }
        values
    }
}

impl DataSource for ListStore {
    fn row_count(&self) -> usize {
        self.len()
    }

    fn column_count(&self) -> usize {
        self.columns.len()
    }

    fn column_kind(&self, column: usize) -> Option<ColumnKind> {
        self.columns.get(column).copied()
    }

    fn row_id(&self, row: usize) -> Option<RowId> {
        self.rows.read().get(row).map(|r| r.id)
    }

    fn value(&self, row: usize, column: usize) -> CellValue {
        self.get(row, column).unwrap_or_default()
    }

    fn signals(&self) -> &DataSourceSignals {
        &self.signals
    }

    fn row_draggable(&self, row: usize) -> bool {
        self.rows.read().get(row).is_some_and(|r| r.draggable)
    }

    fn move_row(&self, from: usize, to: usize) -> bool {
        self.move_to(from, to).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::Arc;

    fn store() -> ListStore {
        ListStore::new(vec![ColumnKind::Text, ColumnKind::Int])
    }

    #[test]
    fn test_push_and_get() {
        let s = store();
        let id = s.push(vec!["a".into(), CellValue::Int(1)]);
        assert_eq!(s.len(), 1);
        assert_eq!(s.row_id(0), Some(id));
        assert_eq!(s.value(0, 0), CellValue::from("a"));
        assert_eq!(s.value(0, 5), CellValue::None);
    }

    #[test]
    fn test_push_coerces_bad_values() {
        let s = store();
        s.push(vec![CellValue::Bool(true)]);
        assert_eq!(s.value(0, 0), CellValue::None);
        assert_eq!(s.value(0, 1), CellValue::None);
    }

    #[test]
    fn test_insert_rejects_mismatch() {
        let s = store();
        let err = s.insert(0, vec![CellValue::Int(1)]).unwrap_err();
        assert!(matches!(err, GridError::TypeMismatch { .. }));
        assert!(s.insert(2, vec![]).is_err());
        assert!(s.is_empty());
    }

    #[test]
    fn test_signals_emitted_after_change() {
        let s = Arc::new(store());
        let log = Arc::new(Mutex::new(Vec::new()));

        let log_clone = log.clone();
        s.signals().row_inserted.connect(move |&(index, _)| {
            log_clone.lock().push(format!("ins {index}"));
        });
        let log_clone = log.clone();
        s.signals().row_deleted.connect(move |&(index, _)| {
            log_clone.lock().push(format!("del {index}"));
        });
        let log_clone = log.clone();
        s.signals().row_changed.connect(move |&(index, _)| {
            log_clone.lock().push(format!("chg {index}"));
        });

        s.push(vec!["a".into()]);
        s.push(vec!["b".into()]);
        s.set_value(1, 0, "c".into()).unwrap();
        s.remove(0).unwrap();

        assert_eq!(*log.lock(), vec!["ins 0", "ins 1", "chg 1", "del 0"]);
    }

    #[test]
    fn test_move_to_preserves_ids() {
        let s = store();
        let ids: Vec<RowId> = (0..4).map(|i| s.push(vec![format!("{i}").into()])).collect();

        let orders = Arc::new(Mutex::new(Vec::new()));
        let orders_clone = orders.clone();
        s.signals().rows_reordered.connect(move |order| {
            orders_clone.lock().push(order.clone());
        });

        s.move_to(0, 2).unwrap();
        assert_eq!(s.row_id(0), Some(ids[1]));
        assert_eq!(s.row_id(1), Some(ids[2]));
        assert_eq!(s.row_id(2), Some(ids[0]));
        assert_eq!(s.row_id(3), Some(ids[3]));
        assert_eq!(*orders.lock(), vec![vec![1, 2, 0, 3]]);
    }

    #[test]
    fn test_reorder_rejects_non_permutation() {
        let s = store();
        s.push(vec![]);
        s.push(vec![]);
        assert!(s.reorder(vec![0, 0]).is_err());
        assert!(s.reorder(vec![0]).is_err());
        assert!(s.reorder(vec![1, 0]).is_ok());
    }

    #[test]
    fn test_clear_emits_per_row() {
        let s = store();
        s.push(vec![]);
        s.push(vec![]);
        let deleted = Arc::new(Mutex::new(Vec::new()));
        let deleted_clone = deleted.clone();
        s.signals().row_deleted.connect(move |&(index, _)| {
            deleted_clone.lock().push(index);
        });
        s.clear();
        assert_eq!(*deleted.lock(), vec![1, 0]);
        assert!(s.is_empty());
    }
}
