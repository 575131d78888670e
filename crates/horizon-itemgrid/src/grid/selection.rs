//! Selection state, click semantics and the rubber band.

use std::time::Duration;

use horizon_itemgrid_core::logging::targets;
use horizon_itemgrid_core::TimerKind;
use horizon_itemgrid_render::{Point, Rect};

use super::item::ItemKey;
use super::{Autoscroll, ItemGrid, RubberBand};
use crate::cell::CellId;
use crate::config::SelectionMode;
use crate::error::Result;
use crate::events::KeyboardModifiers;
use crate::model::RowId;

/// Width of the band along the viewport edges that triggers autoscroll.
const AUTOSCROLL_EDGE: f32 = 30.0;
/// Autoscroll repeat interval.
const AUTOSCROLL_INTERVAL: Duration = Duration::from_millis(30);

impl ItemGrid {
    // =========================================================================
    // Public API
    // =========================================================================

    /// Select the item at `index`.
    ///
    /// In single and browse mode the previous selection is replaced.
    pub fn select_row(&mut self, index: usize) -> Result<()> {
        self.sync_model();
        let key = self.key_at(index)?;
        self.select_item(key);
        Ok(())
    }

    /// Unselect the item at `index`. Refused in browse mode.
    pub fn unselect_row(&mut self, index: usize) -> Result<()> {
        self.sync_model();
        let key = self.key_at(index)?;
        self.unselect_item(key);
        Ok(())
    }

    /// Whether the item at `index` is selected.
    pub fn is_row_selected(&mut self, index: usize) -> bool {
        self.sync_model();
        self.order
            .get(index)
            .is_some_and(|&key| self.items[key].selected)
    }

    /// Row identities of the selected items, in data order.
    pub fn selected_rows(&mut self) -> Vec<RowId> {
        self.sync_model();
        self.order
            .iter()
            .map(|&key| &self.items[key])
            .filter(|item| item.selected)
            .map(|item| item.row_id)
            .collect()
    }

    /// Indices of the selected items, ascending.
    pub fn selected_indices(&mut self) -> Vec<usize> {
        self.sync_model();
        self.order
            .iter()
            .enumerate()
            .filter(|&(_, &key)| self.items[key].selected)
            .map(|(index, _)| index)
            .collect()
    }

    /// Select every item. Only meaningful in multiple mode.
    pub fn select_all(&mut self) {
        self.sync_model();
        if self.config.selection_mode != SelectionMode::Multiple {
            return;
        }
        let mut dirty = false;
        for i in 0..self.order.len() {
            dirty |= self.set_selected(self.order[i], true);
        }
        if dirty {
            self.selection_changed.emit(());
        }
    }

    /// Clear the selection. Refused in browse mode.
    pub fn unselect_all(&mut self) {
        self.sync_model();
        if self.config.selection_mode == SelectionMode::Browse {
            return;
        }
        if self.clear_selection_flags() {
            self.selection_changed.emit(());
        }
    }

    /// Toggle the selection of the cursor item.
    pub fn toggle_cursor_item(&mut self) {
        self.sync_model();
        let Some(key) = self.cursor else {
            return;
        };
        match self.config.selection_mode {
            SelectionMode::None => {}
            SelectionMode::Browse => self.select_item(key),
            _ if self.items[key].selected => self.unselect_item(key),
            _ => self.select_item(key),
        }
        self.anchor = Some(key);
    }

    /// Activate or edit the focused cell, or else make the cursor item the
    /// only selected item.
    pub fn select_cursor_item(&mut self) {
        self.sync_model();
        let Some(key) = self.cursor else {
            return;
        };
        if let Some(cell) = self.cursor_cell
            && self.activate_cell(key, cell)
        {
            return;
        }
        if self.config.selection_mode == SelectionMode::None {
            return;
        }
        let mut dirty = self.clear_selection_flags();
        dirty |= self.set_selected(key, true);
        self.anchor = Some(key);
        if dirty {
            self.selection_changed.emit(());
        }
    }

    /// Activate the cursor item: its focused cell if that reacts, otherwise
    /// `item_activated`.
    pub fn activate_cursor_item(&mut self) -> bool {
        self.sync_model();
        let Some(key) = self.cursor else {
            return false;
        };
        if let Some(cell) = self.cursor_cell
            && self.activate_cell(key, cell)
        {
            return true;
        }
        let row = self.row_of(key);
        tracing::debug!(target: targets::SELECTION, %row, "item activated");
        self.item_activated.emit(row);
        true
    }

    /// Whether a rubber band is being dragged.
    pub fn is_rubber_banding(&self) -> bool {
        self.rubber_band.is_some()
    }

    /// The rubber band rectangle in content coordinates.
    pub fn rubber_band_rect(&self) -> Option<Rect> {
        self.rubber_band.map(|band| band.rect())
    }

    // =========================================================================
    // Selection primitives
    // =========================================================================

    /// Set one item's flag, damaging it if it changed.
    pub(super) fn set_selected(&mut self, key: ItemKey, selected: bool) -> bool {
        let item = &mut self.items[key];
        if item.selected == selected {
            return false;
        }
        item.selected = selected;
        self.damage_item(key);
        true
    }

    pub(super) fn select_item(&mut self, key: ItemKey) {
        let mode = self.config.selection_mode;
        if mode == SelectionMode::None || self.items[key].selected {
            return;
        }
        if mode != SelectionMode::Multiple {
            self.clear_selection_flags();
        }
        self.set_selected(key, true);
        self.selection_changed.emit(());
    }

    pub(super) fn unselect_item(&mut self, key: ItemKey) {
        if self.config.selection_mode == SelectionMode::Browse || !self.items[key].selected {
            return;
        }
        self.set_selected(key, false);
        self.selection_changed.emit(());
    }

    /// Clear every selected flag without notifying. Returns whether anything
    /// changed.
    pub(super) fn clear_selection_flags(&mut self) -> bool {
        let mut dirty = false;
        for i in 0..self.order.len() {
            dirty |= self.set_selected(self.order[i], false);
        }
        dirty
    }

    /// Select the items between `a` and `b` (inclusive, data order).
    pub(super) fn select_range(&mut self, a: ItemKey, b: ItemKey) -> bool {
        let (a, b) = (self.items[a].index, self.items[b].index);
        let mut dirty = false;
        for i in a.min(b)..=a.max(b) {
            dirty |= self.set_selected(self.order[i], true);
        }
        dirty
    }

    /// Apply a button press on `key` to the selection.
    ///
    /// Returns `true` when a plain click landed on an already selected item
    /// in multiple mode: the selection collapses to it on release unless a
    /// drag starts.
    pub(super) fn click_item(
        &mut self,
        key: ItemKey,
        cell: Option<CellId>,
        modifiers: KeyboardModifiers,
    ) -> bool {
        let mode = self.config.selection_mode;
        if mode == SelectionMode::None {
            self.set_cursor_key(key, cell);
            return false;
        }

        let selected = self.items[key].selected;
        let mut dirty = false;
        let mut collapse = false;
        if modifiers.shift && mode == SelectionMode::Multiple {
            dirty |= self.clear_selection_flags();
            self.set_cursor_key(key, cell);
            let anchor = *self.anchor.get_or_insert(key);
            dirty |= self.select_range(anchor, key);
        } else {
            let toggles = mode == SelectionMode::Multiple
                || (mode == SelectionMode::Single && selected);
            if modifiers.control && toggles {
                dirty |= self.set_selected(key, !selected);
            } else if !selected {
                dirty |= self.clear_selection_flags();
                dirty |= self.set_selected(key, true);
            } else if mode == SelectionMode::Multiple && modifiers.none() {
                collapse = self.items.values().filter(|item| item.selected).count() > 1;
            }
            self.anchor = Some(key);
            self.set_cursor_key(key, cell);
        }

        if dirty {
            tracing::trace!(target: targets::SELECTION, index = self.items[key].index, "click selection");
            self.selection_changed.emit(());
        }
        collapse
    }

    /// Reduce the selection to `key` after a click without drag.
    pub(super) fn collapse_selection(&mut self, key: ItemKey) {
        let mut dirty = self.clear_selection_flags();
        dirty |= self.set_selected(key, true);
        if dirty {
            self.selection_changed.emit(());
        }
    }

    // =========================================================================
    // Rubber band
    // =========================================================================

    /// Start a rubber band at `start` (content coordinates).
    pub(super) fn start_rubber_band(&mut self, start: Point) {
        for item in self.items.values_mut() {
            item.selected_before = item.selected;
        }
        self.rubber_band = Some(RubberBand { start, end: start });
        tracing::trace!(target: targets::SELECTION, x = start.x, y = start.y, "rubber band started");
    }

    /// Move the free corner of the rubber band to `end` (content coordinates).
    ///
    /// Every item ends up `inside XOR selected_before`.
    pub(super) fn update_rubber_band(&mut self, end: Point) {
        let Some(band) = self.rubber_band.as_mut() else {
            return;
        };
        let old = band.rect();
        band.end = end;
        let rect = band.rect();

        let mut dirty = false;
        for i in 0..self.order.len() {
            let key = self.order[i];
            let selected = {
                let item = &self.items[key];
                let inside = item.is_placed() && Self::item_hit_test(item, &rect);
                inside ^ item.selected_before
            };
            dirty |= self.set_selected(key, selected);
        }

        let union = old.union(&rect).offset(-self.scroll.x, -self.scroll.y);
        self.damage.add_damage(union.inflate(1.0, 1.0));
        if dirty {
            self.selection_changed.emit(());
        }
    }

    pub(super) fn stop_rubber_band(&mut self) {
        if let Some(band) = self.rubber_band.take() {
            let rect = band.rect().offset(-self.scroll.x, -self.scroll.y);
            self.damage.add_damage(rect.inflate(1.0, 1.0));
        }
        self.stop_autoscroll();
    }

    // =========================================================================
    // Autoscroll
    // =========================================================================

    /// Start, update or stop edge autoscroll for a pointer at `pos` (widget
    /// coordinates).
    pub(super) fn update_autoscroll(&mut self, pos: Point) {
        let edge = |v: f32, extent: f32| {
            if v < AUTOSCROLL_EDGE {
                v - AUTOSCROLL_EDGE
            } else if v > extent - AUTOSCROLL_EDGE {
                v - (extent - AUTOSCROLL_EDGE)
            } else {
                0.0
            }
        };
        let dx = edge(pos.x, self.viewport.width);
        let dy = edge(pos.y, self.viewport.height);
        if dx == 0.0 && dy == 0.0 {
            self.stop_autoscroll();
            return;
        }
        match self.autoscroll.as_mut() {
            Some(scroll) => {
                scroll.dx = dx;
                scroll.dy = dy;
                scroll.pos = pos;
            }
            None => {
                let timer = self
                    .timers
                    .start(self.now, AUTOSCROLL_INTERVAL, TimerKind::Repeating);
                self.autoscroll = Some(Autoscroll { timer, dx, dy, pos });
            }
        }
    }

    pub(super) fn stop_autoscroll(&mut self) {
        if let Some(scroll) = self.autoscroll.take() {
            self.timers.stop(scroll.timer).ok();
        }
    }

    pub(super) fn autoscroll_step(&mut self) {
        let Some(scroll) = self.autoscroll else {
            return;
        };
        let offset = self.scroll.offset(scroll.dx, scroll.dy);
        self.set_scroll_offset(offset);
        let pos = self.widget_to_content(scroll.pos);
        if self.rubber_band.is_some() {
            self.update_rubber_band(pos);
        } else if self.drag.is_some() {
            self.update_drag_dest(pos);
        }
    }

    // =========================================================================
    // Hover selection (single-click mode)
    // =========================================================================

    pub(super) fn restart_hover_timer(&mut self, modifiers: KeyboardModifiers) {
        self.stop_hover_timer();
        if !self.config.single_click {
            return;
        }
        if let Some(timeout) = self.config.single_click_timeout {
            let timer = self.timers.start(self.now, timeout, TimerKind::OneShot);
            self.hover_timer = Some((timer, modifiers));
        }
    }

    pub(super) fn stop_hover_timer(&mut self) {
        if let Some((timer, _)) = self.hover_timer.take() {
            self.timers.stop(timer).ok();
        }
    }

    pub(super) fn hover_timeout(&mut self) {
        let Some((_, modifiers)) = self.hover_timer.take() else {
            return;
        };
        if let Some(key) = self.prelit {
            tracing::trace!(target: targets::SELECTION, "hover selection");
            self.click_item(key, None, modifiers);
        }
    }
}
