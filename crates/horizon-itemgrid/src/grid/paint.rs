//! Painting onto a [`Surface`].

use horizon_itemgrid_core::logging::targets;
use horizon_itemgrid_render::{Rect, RenderResult, Surface};

use super::dnd::DropPosition;
use super::item::ItemKey;
use super::ItemGrid;
use crate::cell::CellState;

/// Log a failed drawing call and carry on.
fn contained(result: RenderResult<()>, what: &str) {
    if let Err(error) = result {
        tracing::warn!(target: targets::PAINT, %error, what, "paint operation failed");
    }
}

impl ItemGrid {
    /// Paint the visible items, decorations and rubber band.
    ///
    /// A pending layout runs first. Renderer failures are logged and the
    /// failing cell is skipped; only an unbalanced surface stack is
    /// reported. The damage region is cleared afterwards.
    pub fn paint(&mut self, surface: &mut dyn Surface) -> RenderResult<()> {
        self.flush_layout();
        let view = Rect::new(
            self.scroll.x,
            self.scroll.y,
            self.viewport.width,
            self.viewport.height,
        );

        surface.save();
        surface.clip_rect(Rect::new(0.0, 0.0, view.width(), view.height()));
        surface.translate(-self.scroll.x, -self.scroll.y);

        for i in 0..self.order.len() {
            let key = self.order[i];
            let item = &self.items[key];
            if !item.is_placed() || !item.area.intersects(&view) {
                continue;
            }
            self.paint_item(surface, key);
            self.paint_decorations(surface, key);
        }

        if let Some(band) = self.rubber_band {
            let rect = band.rect();
            contained(
                surface.fill_rect(rect, self.style.rubber_band_fill),
                "rubber band",
            );
            contained(
                surface.stroke_rect(rect, self.style.rubber_band_outline, 1.0),
                "rubber band",
            );
        }

        let result = surface.restore();
        self.damage.clear();
        result
    }

    /// Paint the selection background and the cells of one item.
    pub(super) fn paint_item(&mut self, surface: &mut dyn Surface, key: ItemKey) {
        let index = self.items[key].index;
        if let Some(model) = self.model.clone() {
            self.cells.bind_row(model.as_ref(), index);
        }

        let item = &self.items[key];
        if item.selected {
            contained(
                surface.fill_rect(item.area, self.style.selected_background),
                "selection",
            );
        }
        let focused_item = self.has_focus && self.cursor == Some(key);
        for cell_box in &item.cells {
            let Some(renderer) = self.cells.renderer(cell_box.cell) else {
                continue;
            };
            let state = CellState {
                selected: item.selected,
                prelit: self.prelit == Some(key),
                focused: focused_item
                    && self.cursor_cell.is_none_or(|cell| cell == cell_box.cell),
            };
            if let Err(error) = renderer.paint(surface, cell_box.content, state) {
                tracing::warn!(
                    target: targets::PAINT,
                    %error,
                    renderer = renderer.name(),
                    index,
                    "cell failed to paint, skipped"
                );
            }
        }
    }

    fn paint_decorations(&self, surface: &mut dyn Surface, key: ItemKey) {
        let item = &self.items[key];
        let area = item.area;

        if let Some((dest, position)) = self.drag_dest
            && dest == key
        {
            let color = self.style.drop_highlight;
            let result = match position {
                DropPosition::Into => surface.stroke_rect(area, color, 2.0),
                DropPosition::Left => {
                    surface.fill_rect(Rect::new(area.left() - 1.0, area.top(), 2.0, area.height()), color)
                }
                DropPosition::Right => {
                    surface.fill_rect(Rect::new(area.right() - 1.0, area.top(), 2.0, area.height()), color)
                }
                DropPosition::Above => {
                    surface.fill_rect(Rect::new(area.left(), area.top() - 1.0, area.width(), 2.0), color)
                }
                DropPosition::Below => {
                    surface.fill_rect(Rect::new(area.left(), area.bottom() - 1.0, area.width(), 2.0), color)
                }
            };
            contained(result, "drop highlight");
        }

        if self.prelit == Some(key) {
            contained(
                surface.stroke_rect(area, self.style.prelight_outline, 1.0),
                "prelight",
            );
        }

        if self.has_focus && self.cursor == Some(key) {
            let rect = self
                .cursor_cell
                .and_then(|cell| item.cell_box(cell))
                .map_or(area, |b| b.rect);
            contained(
                surface.stroke_rect(rect, self.style.focus_outline, 1.0),
                "focus",
            );
        }
    }
}
