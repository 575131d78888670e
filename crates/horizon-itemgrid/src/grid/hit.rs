//! Mapping points and rectangles to items and cells.

use horizon_itemgrid_render::{Point, Rect};

use super::item::{Item, ItemKey};
use super::ItemGrid;
use crate::cell::CellId;
use crate::model::RowId;

/// Result of a point hit test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemHit {
    /// Index of the item.
    pub index: usize,
    /// Row identity of the item.
    pub row: RowId,
    /// The cell under the point, if the point is inside one.
    pub cell: Option<CellId>,
}

/// Closed-interval containment: points on the far edges still hit.
fn covers(rect: &Rect, p: Point) -> bool {
    p.x >= rect.left() && p.x <= rect.right() && p.y >= rect.top() && p.y <= rect.bottom()
}

impl ItemGrid {
    /// Find the item at `point` (content coordinates).
    ///
    /// The item's hit box extends half the row and column spacing around its
    /// area. With `only_in_cell`, points between cells miss.
    pub fn item_at(&mut self, point: Point, only_in_cell: bool) -> Option<ItemHit> {
        self.sync_model();
        let (key, cell) = self.hit(point, only_in_cell, true)?;
        let item = &self.items[key];
        Some(ItemHit {
            index: item.index,
            row: item.row_id,
            cell,
        })
    }

    /// Find the item at `point` in widget coordinates.
    pub fn item_at_widget_pos(&mut self, point: Point, only_in_cell: bool) -> Option<ItemHit> {
        self.sync_model();
        self.item_at(self.widget_to_content(point), only_in_cell)
    }

    /// Slot rectangle of `cell` inside the item at `index`, in content
    /// coordinates.
    pub fn cell_area(&mut self, index: usize, cell: CellId) -> Option<Rect> {
        self.sync_model();
        let key = *self.order.get(index)?;
        self.items[key].cell_box(cell).map(|b| b.rect)
    }

    /// First and last index of the items intersecting the viewport.
    pub fn visible_range(&mut self) -> Option<(usize, usize)> {
        self.sync_model();
        let view = Rect::new(
            self.scroll.x,
            self.scroll.y,
            self.viewport.width,
            self.viewport.height,
        );
        let mut visible = self
            .order
            .iter()
            .map(|&key| &self.items[key])
            .filter(|item| item.is_placed() && item.area.intersects(&view))
            .map(|item| item.index);
        let first = visible.next()?;
        let last = visible.last().unwrap_or(first);
        Some((first, last))
    }

    pub(super) fn hit(
        &self,
        point: Point,
        only_in_cell: bool,
        want_cell: bool,
    ) -> Option<(ItemKey, Option<CellId>)> {
        let config = self.sanitized_config();
        let (dx, dy) = (config.column_spacing / 2.0, config.row_spacing / 2.0);
        for &key in &self.order {
            let item = &self.items[key];
            if !item.is_placed() || !covers(&item.area.inflate(dx, dy), point) {
                continue;
            }
            if !(only_in_cell || want_cell) {
                return Some((key, None));
            }
            let cell = item
                .cells
                .iter()
                .find(|b| covers(&b.rect, point))
                .map(|b| b.cell);
            if only_in_cell && cell.is_none() {
                return None;
            }
            return Some((key, cell));
        }
        None
    }

    /// Whether `item` overlaps `rect` (content coordinates). Items with
    /// cells test each aligned content box; empty items test their area.
    pub(super) fn item_hit_test(item: &Item, rect: &Rect) -> bool {
        if item.cells.is_empty() {
            return item.area.intersects(rect);
        }
        item.cells.iter().any(|b| b.content.intersects(rect))
    }
}
