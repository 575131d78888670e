//! Viewport, scroll offset and coordinate conversion.

use horizon_itemgrid_core::logging::targets;
use horizon_itemgrid_render::{Point, Rect, Size};

use super::item::ItemKey;
use super::ItemGrid;
use crate::config::LayoutMode;
use crate::error::Result;
use crate::events::WheelEvent;

impl ItemGrid {
    /// The visible size of the grid.
    pub fn viewport(&self) -> Size {
        self.viewport
    }

    /// Resize the visible area. Items are re-flowed on the next layout.
    pub fn set_viewport(&mut self, size: Size) {
        let size = size.sanitized();
        if size == self.viewport {
            return;
        }
        self.viewport = size;
        self.damage
            .set_viewport(Rect::new(0.0, 0.0, size.width, size.height));
        self.queue_layout();
    }

    /// Content coordinates of the viewport's top-left corner.
    pub fn scroll_offset(&self) -> Point {
        self.scroll
    }

    /// Scroll to `offset`, clamped to the scrollable range.
    pub fn set_scroll_offset(&mut self, offset: Point) {
        let clamped = self.clamp_offset(offset);
        if clamped != self.scroll {
            self.scroll = clamped;
            self.damage.invalidate_all();
        }
    }

    /// Largest valid scroll offset.
    pub fn max_scroll_offset(&self) -> Point {
        let content = self.layout.content;
        let bar = self.config.sanitized().scrollbar_thickness;
        let mut inner = self.viewport;
        if content.height > self.viewport.height {
            inner.width = (inner.width - bar).max(0.0);
        }
        if content.width > self.viewport.width {
            inner.height = (inner.height - bar).max(0.0);
        }
        Point::new(
            (content.width - inner.width).max(0.0),
            (content.height - inner.height).max(0.0),
        )
    }

    /// Scroll so the item at `index` is visible.
    ///
    /// With `align = Some((row_align, col_align))` the item is placed at that
    /// fraction of the free space (0.0 start, 0.5 center, 1.0 end); otherwise
    /// the grid scrolls as little as possible.
    pub fn scroll_to_row(&mut self, index: usize, align: Option<(f32, f32)>) -> Result<()> {
        self.sync_model();
        let key = self.key_at(index)?;
        self.flush_layout();
        self.scroll_to_key(key, align);
        Ok(())
    }

    /// Convert a widget-local point to content coordinates.
    pub fn widget_to_content(&self, point: Point) -> Point {
        point.offset(self.scroll.x, self.scroll.y)
    }

    /// Convert a content point to widget-local coordinates.
    pub fn content_to_widget(&self, point: Point) -> Point {
        point.offset(-self.scroll.x, -self.scroll.y)
    }

    /// Scroll by a wheel event. Vertical wheel motion scrolls horizontally
    /// in columns mode.
    pub fn handle_wheel(&mut self, event: &WheelEvent) -> bool {
        self.sync_model();
        if self.search_visible() {
            return self.search_wheel(event.delta_y);
        }
        let (dx, dy) = match self.config.layout_mode {
            LayoutMode::Rows => (event.delta_x, -event.delta_y),
            LayoutMode::Columns if event.delta_x == 0.0 => (-event.delta_y, 0.0),
            LayoutMode::Columns => (event.delta_x, -event.delta_y),
        };
        let before = self.scroll;
        self.set_scroll_offset(before.offset(dx, dy));
        self.scroll != before
    }

    pub(super) fn scroll_to_key(&mut self, key: ItemKey, align: Option<(f32, f32)>) {
        let item = &self.items[key];
        if !item.is_placed() {
            return;
        }
        let area = item.area;
        let vp = self.viewport;
        let offset = match align {
            Some((row_align, col_align)) => Point::new(
                area.left() - col_align.clamp(0.0, 1.0) * (vp.width - area.width()),
                area.top() - row_align.clamp(0.0, 1.0) * (vp.height - area.height()),
            ),
            None => {
                let nearest = |start: f32, end: f32, scroll: f32, extent: f32| {
                    if start < scroll {
                        start
                    } else if end > scroll + extent {
                        (end - extent).min(start)
                    } else {
                        scroll
                    }
                };
                Point::new(
                    nearest(area.left(), area.right(), self.scroll.x, vp.width),
                    nearest(area.top(), area.bottom(), self.scroll.y, vp.height),
                )
            }
        };
        tracing::trace!(target: targets::LAYOUT, x = offset.x, y = offset.y, "scroll to item");
        self.set_scroll_offset(offset);
    }

    pub(super) fn clamp_scroll(&mut self) {
        self.scroll = self.clamp_offset(self.scroll);
    }

    fn clamp_offset(&self, offset: Point) -> Point {
        let max = self.max_scroll_offset();
        let clamp = |v: f32, max: f32| if v.is_finite() { v.clamp(0.0, max) } else { 0.0 };
        Point::new(clamp(offset.x, max.x), clamp(offset.y, max.y))
    }
}
