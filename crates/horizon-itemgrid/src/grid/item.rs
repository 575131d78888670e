//! Per-row item state held in the grid's arena.

use slotmap::new_key_type;

use horizon_itemgrid_render::{Rect, Size};

use crate::cell::CellId;
use crate::model::RowId;

new_key_type! {
    /// Arena handle of an item.
    pub(crate) struct ItemKey;
}

/// Position of an item in the layout grid.
///
/// In rows mode an item may span several columns; in columns mode every
/// item occupies one cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridPos {
    /// Layout row.
    pub row: usize,
    /// Layout column (visual, so mirrored for right-to-left).
    pub col: usize,
    /// Rows covered.
    pub row_span: usize,
    /// Columns covered.
    pub col_span: usize,
}

impl GridPos {
    /// Whether the layout cell at `row`, `col` is covered by this item.
    pub fn covers(&self, row: usize, col: usize) -> bool {
        (self.row..self.row + self.row_span).contains(&row)
            && (self.col..self.col + self.col_span).contains(&col)
    }
}

/// Measured natural size of one cell for one item.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct CellMeasure {
    /// Content size, padding excluded.
    pub natural: Size,
    pub xpad: f32,
    pub ypad: f32,
    pub xalign: f32,
    pub yalign: f32,
}

impl CellMeasure {
    /// Size including padding on both sides.
    pub fn outer(&self) -> Size {
        Size::new(
            self.natural.width + 2.0 * self.xpad,
            self.natural.height + 2.0 * self.ypad,
        )
    }
}

/// Placed geometry of one visible cell, in content coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct CellBox {
    pub cell: CellId,
    /// Full slot rectangle inside the item.
    pub rect: Rect,
    /// Aligned content rectangle handed to the renderer.
    pub content: Rect,
    /// Gap between the slot start and the content along the stacking axis.
    pub before: f32,
    /// Gap between the content and the slot end along the stacking axis.
    pub after: f32,
}

#[derive(Debug, Clone)]
pub(crate) struct Item {
    pub row_id: RowId,
    pub index: usize,
    /// Natural size, `None` until measured.
    pub natural: Option<Size>,
    /// One entry per cell in visual order, `None` for hidden cells.
    pub cell_natural: Vec<Option<CellMeasure>>,
    pub area: Rect,
    pub cells: Vec<CellBox>,
    /// Set once the item has been through a layout pass.
    pub grid: Option<GridPos>,
    pub selected: bool,
    pub selected_before: bool,
}

impl Item {
    pub fn new(row_id: RowId, index: usize) -> Self {
        Self {
            row_id,
            index,
            natural: None,
            cell_natural: Vec::new(),
            area: Rect::ZERO,
            cells: Vec::new(),
            grid: None,
            selected: false,
            selected_before: false,
        }
    }

    pub fn is_placed(&self) -> bool {
        self.grid.is_some()
    }

    /// Drop the cached size; the placed geometry stays usable for hit
    /// testing until the next layout.
    pub fn invalidate(&mut self) {
        self.natural = None;
    }

    pub fn cell_box(&self, cell: CellId) -> Option<&CellBox> {
        self.cells.iter().find(|b| b.cell == cell)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_pos_covers_span() {
        let pos = GridPos {
            row: 1,
            col: 2,
            row_span: 1,
            col_span: 2,
        };
        assert!(pos.covers(1, 2));
        assert!(pos.covers(1, 3));
        assert!(!pos.covers(1, 4));
        assert!(!pos.covers(0, 2));
    }

    #[test]
    fn test_invalidate_keeps_geometry() {
        let mut item = Item::new(RowId::new(1), 0);
        item.natural = Some(Size::new(10.0, 10.0));
        item.area = Rect::new(0.0, 0.0, 10.0, 10.0);
        item.grid = Some(GridPos {
            row: 0,
            col: 0,
            row_span: 1,
            col_span: 1,
        });
        item.invalidate();
        assert!(item.natural.is_none());
        assert!(item.is_placed());
        assert_eq!(item.area.width(), 10.0);
    }
}
