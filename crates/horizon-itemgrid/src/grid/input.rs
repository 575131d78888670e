//! Event handling.

use horizon_itemgrid_core::logging::targets;

use super::{ItemGrid, MovementStep, Press};
use crate::config::SelectionMode;
use crate::events::{
    GridEvent, Key, KeyPressEvent, MouseButton, MouseMoveEvent, MousePressEvent,
    MouseReleaseEvent,
};

impl ItemGrid {
    /// Handle an input event. Returns `true` if the grid consumed it.
    pub fn event(&mut self, event: &GridEvent) -> bool {
        match event {
            GridEvent::MousePress(e) => self.handle_mouse_press(e),
            GridEvent::MouseRelease(e) => self.handle_mouse_release(e),
            GridEvent::MouseMove(e) => self.handle_mouse_move(e),
            GridEvent::Leave => self.handle_leave(),
            GridEvent::KeyPress(e) => self.handle_key_press(e),
            GridEvent::Wheel(e) => self.handle_wheel(e),
            GridEvent::FocusIn => self.handle_focus_in(),
            GridEvent::FocusOut => self.handle_focus_out(),
        }
    }

    // =========================================================================
    // Mouse
    // =========================================================================

    /// Handle a button press.
    pub fn handle_mouse_press(&mut self, event: &MousePressEvent) -> bool {
        self.sync_model();
        self.flush_layout();
        self.hide_search();
        if event.button != MouseButton::Left {
            return false;
        }

        let pos = self.widget_to_content(event.local_pos);
        let mods = event.modifiers;
        match self.hit(pos, false, true) {
            Some((key, cell)) => {
                let cell = cell.filter(|&c| self.focusable_cells(key).contains(&c));
                if event.click_count >= 2
                    && !self.config.single_click
                    && self.last_single_clicked == Some(key)
                {
                    self.last_single_clicked = None;
                    self.press = None;
                    let row = self.row_of(key);
                    tracing::debug!(target: targets::SELECTION, %row, "item activated by double click");
                    self.item_activated.emit(row);
                    return true;
                }

                let collapse = self.click_item(key, cell, mods);
                self.press = Some(Press {
                    item: Some(key),
                    pos: event.local_pos,
                    button: event.button,
                    modifiers: mods,
                    collapse,
                });
                self.last_single_clicked = Some(key);

                self.stop_editing(true);
                if let Some(cell) = cell
                    && mods.none()
                {
                    self.activate_cell(key, cell);
                }
            }
            None => {
                self.stop_editing(true);
                let mode = self.config.selection_mode;
                if mode != SelectionMode::Browse
                    && !mods.control
                    && self.clear_selection_flags()
                {
                    self.selection_changed.emit(());
                }
                if mode == SelectionMode::Multiple {
                    self.start_rubber_band(pos);
                }
                self.press = Some(Press {
                    item: None,
                    pos: event.local_pos,
                    button: event.button,
                    modifiers: mods,
                    collapse: false,
                });
            }
        }
        true
    }

    /// Handle a button release.
    ///
    /// A drag started from this grid stays alive until the host calls
    /// [`drag_drop`](Self::drag_drop) or [`end_drag`](Self::end_drag).
    pub fn handle_mouse_release(&mut self, event: &MouseReleaseEvent) -> bool {
        self.sync_model();
        let Some(press) = self.press else {
            self.stop_rubber_band();
            return false;
        };
        if press.button != event.button {
            return false;
        }
        self.press = None;

        let dragging = self.drag.is_some();
        if let Some(key) = press.item
            && !dragging
        {
            if press.collapse {
                self.collapse_selection(key);
            }
            let pos = self.widget_to_content(event.local_pos);
            let same_item = self.hit(pos, false, false).map(|(k, _)| k) == Some(key);
            if self.config.single_click
                && same_item
                && press.modifiers.none()
                && event.modifiers.none()
            {
                let row = self.row_of(key);
                tracing::debug!(target: targets::SELECTION, %row, "item activated by single click");
                self.item_activated.emit(row);
            }
        }
        self.stop_rubber_band();
        true
    }

    /// Handle pointer motion.
    pub fn handle_mouse_move(&mut self, event: &MouseMoveEvent) -> bool {
        self.sync_model();
        self.flush_layout();

        if self.drag.is_some() {
            if self.drag_dest_enabled {
                self.drag_motion(event.local_pos);
            }
            return true;
        }

        if let Some(press) = self.press {
            match press.item {
                Some(key) => {
                    let index = self.items[key].index;
                    let draggable = self
                        .model
                        .as_ref()
                        .is_some_and(|model| model.row_draggable(index));
                    let travel = press.pos.distance(event.local_pos);
                    if self.drag_source_enabled
                        && draggable
                        && travel > self.config.sanitized().drag_threshold
                    {
                        if let Some(p) = self.press.as_mut() {
                            p.collapse = false;
                        }
                        self.begin_drag(key);
                        if self.drag_dest_enabled {
                            self.drag_motion(event.local_pos);
                        }
                        return true;
                    }
                }
                None if self.rubber_band.is_some() => {
                    let pos = self.widget_to_content(event.local_pos);
                    self.update_rubber_band(pos);
                    self.update_autoscroll(event.local_pos);
                    return true;
                }
                None => {}
            }
        }

        let pos = self.widget_to_content(event.local_pos);
        let hovered = self.hit(pos, false, false).map(|(key, _)| key);
        if hovered != self.prelit {
            if let Some(old) = self.prelit {
                self.damage_item(old);
            }
            self.prelit = hovered;
            match hovered {
                Some(key) => {
                    self.damage_item(key);
                    self.restart_hover_timer(event.modifiers);
                }
                None => self.stop_hover_timer(),
            }
        }
        hovered.is_some()
    }

    /// The pointer left the grid.
    pub fn handle_leave(&mut self) -> bool {
        if let Some(old) = self.prelit.take() {
            self.damage_item(old);
        }
        self.stop_hover_timer();
        true
    }

    // =========================================================================
    // Focus
    // =========================================================================

    /// The grid gained keyboard focus.
    pub fn handle_focus_in(&mut self) -> bool {
        self.has_focus = true;
        if let Some(key) = self.cursor {
            self.damage_item(key);
        }
        true
    }

    /// The grid lost keyboard focus. The search overlay hides.
    pub fn handle_focus_out(&mut self) -> bool {
        self.has_focus = false;
        self.hide_search();
        if let Some(key) = self.cursor {
            self.damage_item(key);
        }
        true
    }

    // =========================================================================
    // Keyboard
    // =========================================================================

    /// Handle a key press.
    pub fn handle_key_press(&mut self, event: &KeyPressEvent) -> bool {
        self.sync_model();
        self.flush_layout();
        if self.search_visible() && self.search_key_press(event) {
            return true;
        }

        let mods = event.modifiers;
        let step = match event.key {
            Key::ArrowUp => Some((MovementStep::DisplayLines, -1)),
            Key::ArrowDown => Some((MovementStep::DisplayLines, 1)),
            Key::ArrowLeft => Some((MovementStep::VisualPositions, -1)),
            Key::ArrowRight => Some((MovementStep::VisualPositions, 1)),
            Key::PageUp => Some((MovementStep::Pages, -1)),
            Key::PageDown => Some((MovementStep::Pages, 1)),
            Key::Home => Some((MovementStep::BufferEnds, -1)),
            Key::End => Some((MovementStep::BufferEnds, 1)),
            _ => None,
        };
        if let Some((step, count)) = step {
            self.move_cursor(step, count, mods);
            return true;
        }

        match event.key {
            Key::Space => {
                if mods.control {
                    self.toggle_cursor_item();
                } else {
                    self.select_cursor_item();
                }
                true
            }
            Key::Enter | Key::NumpadEnter => self.activate_cursor_item(),
            Key::A if mods.control && mods.shift => {
                self.unselect_all();
                true
            }
            Key::A if mods.control => {
                self.select_all();
                true
            }
            Key::F if mods.control => self.start_interactive_search(),
            _ => {
                let printable = !event.text.is_empty()
                    && !event.text.chars().any(char::is_control)
                    && !(mods.control || mods.alt || mods.meta);
                printable && self.config.enable_search && self.search_insert(&event.text)
            }
        }
    }
}
