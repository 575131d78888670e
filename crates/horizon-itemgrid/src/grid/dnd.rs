//! Drag source and drop destination.
//!
//! The grid does not talk to a platform drag-and-drop system. It detects the
//! start of a drag, renders the drag icon and resolves drop targets; the host
//! forwards drag motion and the final drop.

use horizon_itemgrid_core::logging::targets;
use horizon_itemgrid_render::{Point, Rect, RecordingSurface, Surface};

use super::item::ItemKey;
use super::ItemGrid;
use crate::error::Result;
use crate::model::RowId;

/// Where a drop lands relative to the target item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DropPosition {
    /// Before the item, on its left side.
    Left,
    /// After the item, on its right side.
    Right,
    /// Before the item, above it.
    Above,
    /// After the item, below it.
    Below,
    /// Onto the item itself.
    Into,
}

impl DropPosition {
    /// Classify `point` inside `area`: the outer quarters of the width pick
    /// left/right, then the outer quarters of the height pick above/below.
    pub fn classify(area: Rect, point: Point) -> Self {
        let (w, h) = (area.width(), area.height());
        if point.x < area.left() + w / 4.0 {
            DropPosition::Left
        } else if point.x > area.left() + 3.0 * w / 4.0 {
            DropPosition::Right
        } else if point.y < area.top() + h / 4.0 {
            DropPosition::Above
        } else if point.y > area.top() + 3.0 * h / 4.0 {
            DropPosition::Below
        } else {
            DropPosition::Into
        }
    }

    /// Whether a row dropped here goes before the target.
    pub fn is_before(self) -> bool {
        matches!(self, DropPosition::Left | DropPosition::Above)
    }
}

/// A resolved drop target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DropTarget {
    /// Index of the target item (0 when the grid is empty).
    pub index: usize,
    /// Position relative to the target.
    pub position: DropPosition,
}

/// A drag started from this grid.
#[derive(Debug, Clone)]
pub struct DragSession {
    /// The dragged row.
    pub row: RowId,
    /// Rendering of the dragged item, with its top-left at the origin.
    pub icon: RecordingSurface,
}

/// Outcome of a drop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropRequest {
    /// The dragged row when the drag started in this grid.
    pub source_row: Option<RowId>,
    /// Where the drop landed.
    pub target: DropTarget,
    /// The row was moved inside the model.
    pub moved: bool,
}

impl ItemGrid {
    // =========================================================================
    // Source
    // =========================================================================

    /// Whether presses may turn into drags.
    pub fn drag_source_enabled(&self) -> bool {
        self.drag_source_enabled
    }

    /// Allow or forbid starting drags from this grid.
    pub fn set_drag_source_enabled(&mut self, enabled: bool) {
        self.drag_source_enabled = enabled;
    }

    /// The drag started from this grid, if one is in progress.
    pub fn drag_session(&self) -> Option<&DragSession> {
        self.drag.as_ref()
    }

    /// Render the item at `index` for use as a drag icon.
    pub fn create_drag_icon(&mut self, index: usize) -> Result<RecordingSurface> {
        self.sync_model();
        let key = self.key_at(index)?;
        self.flush_layout();
        let area = self.items[key].area;
        let mut icon = RecordingSurface::new();
        icon.translate(-area.left(), -area.top());
        self.paint_item(&mut icon, key);
        Ok(icon)
    }

    /// Finish the current drag without a drop.
    pub fn end_drag(&mut self) {
        if let Some(session) = self.drag.take() {
            tracing::debug!(target: targets::DND, row = %session.row, "drag ended");
        }
        self.set_drag_dest(None);
        self.stop_autoscroll();
    }

    pub(super) fn begin_drag(&mut self, key: ItemKey) {
        let index = self.items[key].index;
        let row = self.items[key].row_id;
        let icon = match self.create_drag_icon(index) {
            Ok(icon) => icon,
            Err(_) => return,
        };
        self.stop_rubber_band();
        tracing::debug!(target: targets::DND, %row, index, "drag started");
        self.drag = Some(DragSession { row, icon });
        self.drag_started.emit(row);
    }

    // =========================================================================
    // Destination
    // =========================================================================

    /// Whether drops are accepted.
    pub fn drag_dest_enabled(&self) -> bool {
        self.drag_dest_enabled
    }

    /// Accept or refuse drops.
    pub fn set_drag_dest_enabled(&mut self, enabled: bool) {
        self.drag_dest_enabled = enabled;
        if !enabled {
            self.set_drag_dest(None);
        }
    }

    /// Resolve the drop target under `pos` (widget coordinates).
    ///
    /// Empty space targets below the last item, or above row 0 when the grid
    /// has no items.
    pub fn drop_target_at(&mut self, pos: Point) -> DropTarget {
        self.sync_model();
        self.drop_target_at_content(self.widget_to_content(pos))
    }

    /// A drag moved over the grid to `pos` (widget coordinates).
    ///
    /// Highlights the target and runs edge autoscroll. Returns `None` when
    /// drops are disabled.
    pub fn drag_motion(&mut self, pos: Point) -> Option<DropTarget> {
        self.sync_model();
        if !self.drag_dest_enabled {
            return None;
        }
        self.flush_layout();
        let target = self.update_drag_dest(self.widget_to_content(pos));
        self.update_autoscroll(pos);
        Some(target)
    }

    /// The drag left the grid.
    pub fn drag_leave(&mut self) {
        self.set_drag_dest(None);
        self.stop_autoscroll();
    }

    /// Drop at `pos` (widget coordinates).
    ///
    /// A row dragged from this grid is moved in the model when the grid is
    /// reorderable. The drag ends either way.
    pub fn drag_drop(&mut self, pos: Point) -> Option<DropRequest> {
        self.sync_model();
        if !self.drag_dest_enabled {
            self.end_drag();
            return None;
        }
        self.flush_layout();
        let target = self.drop_target_at(pos);
        let source_row = self.drag.as_ref().map(|session| session.row);

        let mut moved = false;
        if self.config.reorderable
            && let (Some(row), Some(model)) = (source_row, self.model.clone())
            && let Some(from) = self.index_of(row)
        {
            let mut to = if target.position.is_before() {
                target.index
            } else {
                target.index + 1
            };
            if from < to {
                to -= 1;
            }
            if from != to {
                moved = model.move_row(from, to);
            }
            tracing::debug!(target: targets::DND, from, to, moved, "drop reorder");
        }
        self.end_drag();
        self.sync_model();
        Some(DropRequest {
            source_row,
            target,
            moved,
        })
    }

    /// Highlight a drop destination, or clear it with `None`.
    pub fn set_drag_dest_item(&mut self, target: Option<DropTarget>) -> Result<()> {
        self.sync_model();
        let dest = match target {
            Some(target) => Some((self.key_at(target.index)?, target.position)),
            None => None,
        };
        self.set_drag_dest(dest);
        Ok(())
    }

    /// The highlighted drop destination.
    pub fn drag_dest_item(&mut self) -> Option<DropTarget> {
        self.sync_model();
        self.drag_dest.map(|(key, position)| DropTarget {
            index: self.items[key].index,
            position,
        })
    }

    pub(super) fn update_drag_dest(&mut self, point: Point) -> DropTarget {
        let target = self.drop_target_at_content(point);
        let dest = self.order.get(target.index).map(|&key| (key, target.position));
        self.set_drag_dest(dest);
        target
    }

    fn drop_target_at_content(&self, point: Point) -> DropTarget {
        match self.hit(point, false, false) {
            Some((key, _)) => {
                let item = &self.items[key];
                DropTarget {
                    index: item.index,
                    position: DropPosition::classify(item.area, point),
                }
            }
            None if self.order.is_empty() => DropTarget {
                index: 0,
                position: DropPosition::Above,
            },
            None => DropTarget {
                index: self.order.len() - 1,
                position: DropPosition::Below,
            },
        }
    }

    fn set_drag_dest(&mut self, dest: Option<(ItemKey, DropPosition)>) {
        if self.drag_dest == dest {
            return;
        }
        if let Some((old, _)) = self.drag_dest {
            self.damage_item(old);
        }
        self.drag_dest = dest;
        if let Some((key, _)) = dest {
            self.damage_item(key);
        }
    }
}
