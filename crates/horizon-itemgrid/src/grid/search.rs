//! Interactive search ("typeahead").
//!
//! Typing into a focused grid opens a small overlay with the needle. Every
//! change clears the selection and selects the first matching row; Up/Down
//! step through the matches. The overlay hides itself after a few seconds
//! without input.

use std::time::Duration;

use unicode_segmentation::UnicodeSegmentation;

use horizon_itemgrid_core::logging::targets;
use horizon_itemgrid_core::{TimerId, TimerKind};
use horizon_itemgrid_render::{Rect, Size};

use super::ItemGrid;
use crate::config::SelectionMode;
use crate::events::{Key, KeyPressEvent};
use crate::model::{ColumnKind, DataSource};

/// Decides whether a row does NOT match: `(model, column, needle, row)`
/// returns `true` to skip the row.
pub type SearchEqualFunc = Box<dyn Fn(&dyn DataSource, usize, &str, usize) -> bool>;

/// Places the overlay: `(grid screen rectangle, overlay size)` to the
/// overlay's screen rectangle.
pub type SearchPositionFunc = Box<dyn Fn(Rect, Size) -> Rect>;

/// Snapshot of the visible search overlay.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchOverlay {
    /// Screen rectangle of the overlay.
    pub rect: Rect,
    /// Current needle.
    pub needle: String,
}

/// Size of the overlay entry.
const OVERLAY_SIZE: Size = Size::new(200.0, 28.0);
/// Inactivity before the overlay hides.
const SEARCH_TIMEOUT: Duration = Duration::from_millis(5000);

pub(super) struct SearchState {
    pub visible: bool,
    pub needle: String,
    /// 1-based number of the selected match.
    pub counter: usize,
    pub timer: Option<TimerId>,
    pub rect: Rect,
    /// Grid and monitor rectangles in screen coordinates.
    pub screen: Option<(Rect, Rect)>,
    pub equal_func: Option<SearchEqualFunc>,
    pub position_func: Option<SearchPositionFunc>,
}

impl SearchState {
    pub fn new() -> Self {
        Self {
            visible: false,
            needle: String::new(),
            counter: 0,
            timer: None,
            rect: Rect::ZERO,
            screen: None,
            equal_func: None,
            position_func: None,
        }
    }
}

/// Case-insensitive prefix test on the display text of the cell. Returns
/// `true` for rows that do not match.
fn default_equal(model: &dyn DataSource, column: usize, needle: &str, row: usize) -> bool {
    let Some(text) = model.value(row, column).display_text() else {
        return true;
    };
    !text.to_lowercase().starts_with(&needle.to_lowercase())
}

/// Below the grid's bottom-right corner, kept on the monitor; above the
/// grid when there is no room below.
fn default_position(grid: Rect, monitor: Rect, size: Size) -> Rect {
    let mut x = grid.right() - size.width;
    let mut y = grid.bottom();
    if x + size.width > monitor.right() {
        x = monitor.right() - size.width;
    }
    if x < monitor.left() {
        x = monitor.left();
    }
    if y + size.height > monitor.bottom() {
        y = grid.top() - size.height;
    }
    if y < monitor.top() {
        y = monitor.top();
    }
    Rect::new(x, y, size.width, size.height)
}

impl ItemGrid {
    // =========================================================================
    // Public API
    // =========================================================================

    /// Tell the grid where it sits on screen, for placing the search overlay.
    pub fn set_screen_geometry(&mut self, grid: Rect, monitor: Rect) {
        self.search.screen = Some((grid, monitor));
    }

    /// Replace the match test, or restore the default with `None`.
    pub fn set_search_equal_func(&mut self, func: Option<SearchEqualFunc>) {
        self.search.equal_func = func;
    }

    /// Replace the overlay placement, or restore the default with `None`.
    pub fn set_search_position_func(&mut self, func: Option<SearchPositionFunc>) {
        self.search.position_func = func;
    }

    /// Whether interactive search is enabled.
    pub fn enable_search(&self) -> bool {
        self.config.enable_search
    }

    /// Enable or disable interactive search.
    pub fn set_enable_search(&mut self, enabled: bool) {
        self.config.enable_search = enabled;
        if !enabled {
            self.hide_search();
        }
    }

    /// Column matched by interactive search.
    pub fn search_column(&self) -> Option<usize> {
        let model = self.model.as_ref()?;
        match self.config.search_column {
            Some(column) => (column < model.column_count()).then_some(column),
            None => (0..model.column_count())
                .find(|&column| model.column_kind(column) == Some(ColumnKind::Text)),
        }
    }

    /// Set the column matched by interactive search; `None` picks the first
    /// text column.
    pub fn set_search_column(&mut self, column: Option<usize>) {
        if self.config.search_column != column {
            self.config.search_column = column;
            self.hide_search();
        }
    }

    /// Open the search overlay with an empty needle.
    ///
    /// Returns `false` when search is disabled or there is nothing to search.
    pub fn start_interactive_search(&mut self) -> bool {
        self.sync_model();
        if !self.config.enable_search || self.search_column().is_none() {
            return false;
        }
        if self.search.visible {
            self.restart_search_timer();
            return true;
        }
        self.search.visible = true;
        self.search.needle.clear();
        self.search.counter = 0;
        self.search.rect = self.place_overlay();
        self.restart_search_timer();
        tracing::debug!(target: targets::SEARCH, "interactive search started");
        self.search_started.emit(());
        true
    }

    /// The overlay, while it is shown.
    pub fn search_overlay(&self) -> Option<SearchOverlay> {
        self.search.visible.then(|| SearchOverlay {
            rect: self.search.rect,
            needle: self.search.needle.clone(),
        })
    }

    /// Whether the overlay is shown.
    pub fn search_visible(&self) -> bool {
        self.search.visible
    }

    /// Hide the overlay and forget the needle.
    pub fn hide_search(&mut self) {
        if let Some(timer) = self.search.timer.take() {
            self.timers.stop(timer).ok();
        }
        if self.search.visible {
            tracing::trace!(target: targets::SEARCH, "interactive search hidden");
        }
        self.search.visible = false;
        self.search.needle.clear();
        self.search.counter = 0;
    }

    // =========================================================================
    // Input
    // =========================================================================

    /// Append typed text, opening the overlay if needed.
    pub(super) fn search_insert(&mut self, text: &str) -> bool {
        if !self.start_interactive_search() {
            return false;
        }
        self.search.needle.push_str(text);
        self.search_text_changed();
        true
    }

    /// Route a key press to the open overlay.
    pub(super) fn search_key_press(&mut self, event: &KeyPressEvent) -> bool {
        let mods = event.modifiers;
        match event.key {
            Key::Escape | Key::Tab => {
                self.hide_search();
                true
            }
            Key::Enter | Key::NumpadEnter => {
                self.hide_search();
                if let Some(key) = self.cursor
                    && self.items[key].selected
                {
                    let row = self.items[key].row_id;
                    self.item_activated.emit(row);
                }
                true
            }
            Key::ArrowUp => {
                self.search_move(true);
                true
            }
            Key::ArrowDown => {
                self.search_move(false);
                true
            }
            Key::G if mods.control => {
                self.search_move(mods.shift);
                true
            }
            Key::Backspace => {
                let cut = self
                    .search
                    .needle
                    .grapheme_indices(true)
                    .next_back()
                    .map(|(i, _)| i);
                if let Some(cut) = cut {
                    self.search.needle.truncate(cut);
                    self.search_text_changed();
                } else {
                    self.restart_search_timer();
                }
                true
            }
            _ if !event.text.is_empty() && !(mods.control || mods.alt || mods.meta) => {
                let text: String = event.text.chars().filter(|c| !c.is_control()).collect();
                if !text.is_empty() {
                    self.search.needle.push_str(&text);
                    self.search_text_changed();
                }
                true
            }
            _ => false,
        }
    }

    /// Wheel over the grid while searching moves between matches.
    pub(super) fn search_wheel(&mut self, delta_y: f32) -> bool {
        if delta_y == 0.0 {
            return false;
        }
        self.search_move(delta_y > 0.0);
        true
    }

    fn search_text_changed(&mut self) {
        self.restart_search_timer();
        if self.config.selection_mode != SelectionMode::Browse && self.clear_selection_flags() {
            self.selection_changed.emit(());
        }
        self.search.counter = 0;
        if self.search.needle.is_empty() {
            return;
        }
        if self.search_iter(1) {
            self.search.counter = 1;
        }
    }

    /// Move to the previous (`up`) or next match, staying on the current one
    /// when there is none.
    fn search_move(&mut self, up: bool) {
        self.restart_search_timer();
        if self.search.needle.is_empty() || (up && self.search.counter <= 1) {
            return;
        }
        let current = self.search.counter;
        let wanted = if up { current - 1 } else { current + 1 };
        if self.config.selection_mode != SelectionMode::Browse && self.clear_selection_flags() {
            self.selection_changed.emit(());
        }
        if self.search_iter(wanted) {
            self.search.counter = wanted;
        } else if current > 0 {
            self.search_iter(current);
        }
    }

    /// Select and focus the `n`-th (1-based) matching row.
    fn search_iter(&mut self, n: usize) -> bool {
        let (Some(model), Some(column)) = (self.model.clone(), self.search_column()) else {
            return false;
        };
        let needle = self.search.needle.clone();
        let mut remaining = n;
        let found = (0..self.order.len()).find(|&row| {
            let skip = match &self.search.equal_func {
                Some(func) => func(model.as_ref(), column, &needle, row),
                None => default_equal(model.as_ref(), column, &needle, row),
            };
            if !skip {
                remaining -= 1;
            }
            remaining == 0
        });
        let Some(index) = found else {
            return false;
        };

        tracing::trace!(target: targets::SEARCH, %needle, n, index, "search match");
        let key = self.order[index];
        self.select_item(key);
        self.flush_layout();
        self.scroll_to_key(key, Some((0.5, 0.5)));
        self.set_cursor_key(key, None);
        true
    }

    fn restart_search_timer(&mut self) {
        if let Some(timer) = self.search.timer.take() {
            self.timers.stop(timer).ok();
        }
        if self.search.visible {
            self.search.timer = Some(self.timers.start(self.now, SEARCH_TIMEOUT, TimerKind::OneShot));
        }
    }

    fn place_overlay(&self) -> Rect {
        let (grid, monitor) = self.search.screen.unwrap_or_else(|| {
            let local = Rect::new(0.0, 0.0, self.viewport.width, self.viewport.height);
            (local, Rect::new(0.0, 0.0, f32::MAX, f32::MAX))
        });
        match &self.search.position_func {
            Some(func) => func(grid, OVERLAY_SIZE),
            None => default_position(grid, monitor, OVERLAY_SIZE),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CellValue, ListStore};

    #[test]
    fn test_default_equal_is_case_insensitive_prefix() {
        let store = ListStore::new(vec![ColumnKind::Text]);
        store.push(vec!["Report.pdf".into()]);
        store.push(vec![CellValue::None]);
        assert!(!default_equal(&store, 0, "re", 0));
        assert!(!default_equal(&store, 0, "REP", 0));
        assert!(default_equal(&store, 0, "port", 0));
        assert!(default_equal(&store, 0, "re", 1));
    }

    #[test]
    fn test_default_position_below_right_edge() {
        let grid = Rect::new(100.0, 100.0, 400.0, 300.0);
        let monitor = Rect::new(0.0, 0.0, 1920.0, 1080.0);
        let rect = default_position(grid, monitor, OVERLAY_SIZE);
        assert_eq!(rect, Rect::new(300.0, 400.0, 200.0, 28.0));
    }

    #[test]
    fn test_default_position_flips_above_at_monitor_bottom() {
        let grid = Rect::new(0.0, 700.0, 150.0, 380.0);
        let monitor = Rect::new(0.0, 0.0, 1920.0, 1080.0);
        let rect = default_position(grid, monitor, OVERLAY_SIZE);
        assert_eq!(rect, Rect::new(0.0, 672.0, 200.0, 28.0));
    }
}
