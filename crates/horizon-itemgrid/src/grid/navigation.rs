//! Keyboard cursor movement, cell focus and cell activation.

use horizon_itemgrid_core::logging::targets;

use super::item::ItemKey;
use super::ItemGrid;
use crate::cell::{CellId, CellMode};
use crate::config::{ItemOrientation, LayoutMode, SelectionMode};
use crate::error::{GridError, Result};
use crate::events::KeyboardModifiers;
use crate::model::RowId;

/// Unit of a cursor movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MovementStep {
    /// Left/right, by item (or by cell when cells are side by side).
    VisualPositions,
    /// Up/down, by item (or by cell when cells are stacked).
    DisplayLines,
    /// One viewport extent along the scroll axis.
    Pages,
    /// To the first or last item.
    BufferEnds,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    Horizontal,
    Vertical,
}

impl ItemGrid {
    // =========================================================================
    // Cursor
    // =========================================================================

    /// Index of the cursor item.
    pub fn cursor(&mut self) -> Option<usize> {
        self.sync_model();
        self.cursor.map(|key| self.items[key].index)
    }

    /// Row identity of the cursor item.
    pub fn cursor_row(&mut self) -> Option<RowId> {
        self.sync_model();
        self.cursor.map(|key| self.items[key].row_id)
    }

    /// The focused cell of the cursor item.
    pub fn cursor_cell(&mut self) -> Option<CellId> {
        self.sync_model();
        self.cursor_cell
    }

    /// Put the cursor on the item at `index`, optionally focusing `cell`,
    /// and scroll it into view. With `start_editing`, the focused cell is
    /// activated or starts editing.
    pub fn set_cursor(
        &mut self,
        index: usize,
        cell: Option<CellId>,
        start_editing: bool,
    ) -> Result<()> {
        self.sync_model();
        let key = self.key_at(index)?;
        if let Some(cell) = cell
            && !self.cells.contains(cell)
        {
            return Err(GridError::InvalidCell(cell).logged());
        }
        self.stop_editing(true);
        self.flush_layout();
        self.scroll_to_key(key, None);
        self.set_cursor_key(key, cell);
        if start_editing && let Some(cell) = cell {
            self.activate_cell(key, cell);
        }
        Ok(())
    }

    /// Move the cursor by `count` steps.
    ///
    /// Without ctrl the selection follows the cursor (a range from the
    /// anchor in multiple mode with shift). Returns `false` if the cursor
    /// could not move.
    pub fn move_cursor(
        &mut self,
        step: MovementStep,
        count: i32,
        modifiers: KeyboardModifiers,
    ) -> bool {
        self.sync_model();
        if self.order.is_empty() || count == 0 {
            return false;
        }
        self.flush_layout();
        self.stop_editing(false);

        let Some(current) = self.cursor else {
            let index = if count > 0 { 0 } else { self.order.len() - 1 };
            let key = self.order[index];
            self.finish_move(key, None, modifiers);
            return true;
        };

        let target = match step {
            MovementStep::DisplayLines => self.step_lines(current, count, Axis::Vertical),
            MovementStep::VisualPositions => self.step_lines(current, count, Axis::Horizontal),
            MovementStep::Pages => self
                .find_item_page(current, count)
                .map(|key| (key, self.cursor_cell)),
            MovementStep::BufferEnds => {
                let index = if count > 0 { self.order.len() - 1 } else { 0 };
                Some((self.order[index], self.cursor_cell))
            }
        };

        match target {
            Some((key, cell)) if (key, cell) != (current, self.cursor_cell) => {
                tracing::trace!(target: targets::NAVIGATION, ?step, count, index = self.items[key].index, "cursor moved");
                self.finish_move(key, cell, modifiers);
                true
            }
            _ => {
                tracing::trace!(target: targets::NAVIGATION, ?step, count, "cursor cannot move");
                false
            }
        }
    }

    /// Set the cursor and re-derive the selection after a keyboard move.
    fn finish_move(&mut self, key: ItemKey, cell: Option<CellId>, modifiers: KeyboardModifiers) {
        let mode = self.config.selection_mode;
        if !modifiers.shift || self.anchor.is_none() || mode != SelectionMode::Multiple {
            self.anchor = Some(key);
        }
        self.set_cursor_key(key, cell);

        let mut dirty = false;
        if !modifiers.control && mode != SelectionMode::None {
            dirty |= self.clear_selection_flags();
            let anchor = self.anchor.unwrap_or(key);
            dirty |= self.select_range(anchor, key);
        }
        self.scroll_to_key(key, None);
        if dirty {
            self.selection_changed.emit(());
        }
    }

    /// Move `count` steps along `axis`, first among the focusable cells of
    /// the item when they are stacked along that axis.
    fn step_lines(
        &mut self,
        mut key: ItemKey,
        count: i32,
        axis: Axis,
    ) -> Option<(ItemKey, Option<CellId>)> {
        let stacking = match self.config.item_orientation {
            ItemOrientation::Vertical => Axis::Vertical,
            ItemOrientation::Horizontal => Axis::Horizontal,
        };
        let along_cells = axis == stacking;
        let dir = count.signum();
        let mut cell = self.cursor_cell;
        for _ in 0..count.unsigned_abs() {
            if along_cells && let Some(next) = self.step_cell(key, cell, dir) {
                cell = Some(next);
                continue;
            }
            key = self.neighbour(key, dir, axis)?;
            if along_cells {
                cell = self.step_cell(key, None, dir);
            }
        }
        Some((key, cell))
    }

    /// Next focusable cell of `key` after `cell` in direction `dir`. With no
    /// current cell, the first (or last, moving backwards) focusable cell.
    fn step_cell(&mut self, key: ItemKey, cell: Option<CellId>, dir: i32) -> Option<CellId> {
        let mut focusable = self.focusable_cells(key);
        if self.config.item_orientation == ItemOrientation::Horizontal
            && self.config.text_direction.is_rtl()
        {
            focusable.reverse();
        }
        let current = cell.and_then(|c| focusable.iter().position(|&f| f == c));
        let next = match (current, dir > 0) {
            (None, true) => Some(0),
            (None, false) => focusable.len().checked_sub(1),
            (Some(i), true) => Some(i + 1),
            (Some(i), false) => i.checked_sub(1),
        }?;
        focusable.get(next).copied()
    }

    /// Visible cells of `key` that can take the keyboard focus, in visual
    /// order.
    pub(super) fn focusable_cells(&mut self, key: ItemKey) -> Vec<CellId> {
        let index = self.items[key].index;
        if let Some(model) = self.model.clone() {
            self.cells.bind_row(model.as_ref(), index);
        }
        self.items[key]
            .cells
            .iter()
            .map(|b| b.cell)
            .filter(|&cell| {
                self.cells
                    .renderer(cell)
                    .is_some_and(|r| r.mode().is_focusable())
            })
            .collect()
    }

    /// The adjacent item along `axis`, by layout coordinates, falling back
    /// to the data-order neighbour along the fill direction.
    fn neighbour(&self, key: ItemKey, dir: i32, axis: Axis) -> Option<ItemKey> {
        let item = &self.items[key];
        let pos = item.grid?;
        let target = match (axis, dir > 0) {
            (Axis::Vertical, true) => Some((pos.row + pos.row_span, pos.col)),
            (Axis::Vertical, false) => pos.row.checked_sub(1).map(|row| (row, pos.col)),
            (Axis::Horizontal, true) => Some((pos.row, pos.col + pos.col_span)),
            (Axis::Horizontal, false) => pos.col.checked_sub(1).map(|col| (pos.row, col)),
        };
        if let Some((row, col)) = target
            && let Some(found) = self.find_item(row, col)
        {
            return Some(found);
        }

        let data_step = match (self.config.layout_mode, axis) {
            (LayoutMode::Rows, Axis::Horizontal) if self.config.text_direction.is_rtl() => -dir,
            (LayoutMode::Rows, Axis::Horizontal) | (LayoutMode::Columns, Axis::Vertical) => dir,
            _ => return None,
        };
        let index = item.index.checked_add_signed(data_step as isize)?;
        self.order.get(index).copied()
    }

    fn find_item(&self, row: usize, col: usize) -> Option<ItemKey> {
        self.order.iter().copied().find(|&key| {
            self.items[key]
                .grid
                .is_some_and(|pos| pos.covers(row, col))
        })
    }

    /// Item one page away in the same line, or `None` if the cursor is
    /// already the furthest item within reach.
    fn find_item_page(&self, current: ItemKey, count: i32) -> Option<ItemKey> {
        let item = &self.items[current];
        let pos = item.grid?;
        let (line, origin, page) = match self.config.layout_mode {
            LayoutMode::Rows => (pos.col, item.area.top(), self.viewport.height),
            LayoutMode::Columns => (pos.row, item.area.left(), self.viewport.width),
        };
        let limit = origin + count as f32 * page;
        let same_line = |key: &ItemKey| {
            let other = &self.items[*key];
            other.grid.is_some_and(|p| match self.config.layout_mode {
                LayoutMode::Rows => p.col == line,
                LayoutMode::Columns => p.row == line,
            })
        };
        let coord = |key: ItemKey| {
            let area = self.items[key].area;
            match self.config.layout_mode {
                LayoutMode::Rows => area.top(),
                LayoutMode::Columns => area.left(),
            }
        };

        let mut found = current;
        if count > 0 {
            for &key in self.order[item.index + 1..].iter().filter(|&&k| same_line(&k)) {
                if coord(key) > limit {
                    break;
                }
                found = key;
            }
        } else {
            for &key in self.order[..item.index].iter().rev().filter(|&&k| same_line(&k)) {
                if coord(key) < limit {
                    break;
                }
                found = key;
            }
        }
        (found != current).then_some(found)
    }

    /// Move the cursor to `key`, damaging the old and new cursor items.
    pub(super) fn set_cursor_key(&mut self, key: ItemKey, cell: Option<CellId>) {
        if self.cursor == Some(key) && self.cursor_cell == cell {
            return;
        }
        if let Some(old) = self.cursor {
            self.damage_item(old);
        }
        self.cursor = Some(key);
        self.cursor_cell = cell;
        self.damage_item(key);
        self.cursor_changed.emit(Some(self.items[key].row_id));
    }

    // =========================================================================
    // Cell activation and editing
    // =========================================================================

    /// Activate or start editing `cell` of `key`. Returns `true` if the
    /// renderer reacted.
    pub(super) fn activate_cell(&mut self, key: ItemKey, cell: CellId) -> bool {
        let Some(content) = self.items[key].cell_box(cell).map(|b| b.content) else {
            return false;
        };
        let (index, row) = (self.items[key].index, self.items[key].row_id);
        if let Some(model) = self.model.clone() {
            self.cells.bind_row(model.as_ref(), index);
        }
        let mode = match self.cells.renderer(cell) {
            Some(renderer) => renderer.mode(),
            None => return false,
        };
        let reacted = match mode {
            CellMode::Inert => false,
            CellMode::Activatable => self
                .cells
                .renderer_mut(cell)
                .is_some_and(|r| r.activate(row)),
            CellMode::Editable => {
                self.stop_editing(true);
                let started = self
                    .cells
                    .renderer_mut(cell)
                    .is_some_and(|r| r.start_editing(row, content));
                if started {
                    self.edited = Some((key, cell));
                }
                started
            }
        };
        if reacted {
            tracing::debug!(target: targets::NAVIGATION, %row, ?mode, "cell activated");
            self.damage_item(key);
        }
        reacted
    }

    /// End in-place editing, if any.
    pub fn stop_editing(&mut self, canceled: bool) {
        if let Some((key, cell)) = self.edited.take() {
            if let Some(renderer) = self.cells.renderer_mut(cell) {
                renderer.stop_editing(canceled);
            }
            self.damage_item(key);
        }
    }

    /// Index and cell of the item being edited.
    pub fn editing(&mut self) -> Option<(usize, CellId)> {
        self.sync_model();
        self.edited
            .and_then(|(key, cell)| self.items.get(key).map(|item| (item.index, cell)))
    }
}
