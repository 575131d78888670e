//! Item placement.
//!
//! Layout is a pure function of the measured items and the parameters:
//! [`compute`] never looks at previous results, so running it twice on the
//! same input gives the same placement.
//!
//! Rows mode walks the items in data order, filling a row until the next
//! item would cross the viewport width (or the column cap), then aligns every
//! cell of the row to the per-slot maximum height. Columns mode is the
//! transpose, filling columns against the viewport height.
//!
//! When the auto-fitted result overflows the scroll axis, the scrollbar that
//! appears eats into the cross axis. If the content then no longer fits
//! beside it, the pass is redone once with one line fewer.

use horizon_itemgrid_render::{Rect, Size};

use super::item::{CellBox, CellMeasure, GridPos};
use crate::cell::CellId;
use crate::config::{GridConfig, ItemOrientation, LayoutMode};

/// Inputs of one layout run.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct LayoutParams {
    pub mode: LayoutMode,
    pub orientation: ItemOrientation,
    pub rtl: bool,
    pub margin: f32,
    pub spacing: f32,
    pub row_spacing: f32,
    pub column_spacing: f32,
    pub item_width: Option<f32>,
    /// Column cap in rows mode, row cap in columns mode.
    pub lines: Option<usize>,
    pub viewport: Size,
    pub scrollbar: f32,
}

impl LayoutParams {
    pub fn new(config: &GridConfig, viewport: Size) -> Self {
        let config = config.sanitized();
        Self {
            mode: config.layout_mode,
            orientation: config.item_orientation,
            rtl: config.text_direction.is_rtl(),
            margin: config.margin,
            spacing: config.spacing,
            row_spacing: config.row_spacing,
            column_spacing: config.column_spacing,
            item_width: config.item_width,
            lines: config.columns,
            viewport: viewport.sanitized(),
            scrollbar: config.scrollbar_thickness,
        }
    }
}

/// A cell slot, in visual order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct CellSlot {
    pub cell: CellId,
    pub expand: bool,
}

/// A measured item.
#[derive(Debug, Clone, Copy)]
pub(crate) struct LayoutItem<'a> {
    pub natural: Size,
    /// Aligned with the slots; `None` for hidden cells.
    pub cells: &'a [Option<CellMeasure>],
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Placement {
    pub area: Rect,
    pub grid: GridPos,
    pub cells: Vec<CellBox>,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct LayoutResult {
    pub placements: Vec<Placement>,
    pub content: Size,
    pub rows: usize,
    pub cols: usize,
    /// The pass was redone with one line fewer.
    pub corrected: bool,
}

impl LayoutResult {
    fn empty() -> Self {
        Self {
            placements: Vec::new(),
            content: Size::ZERO,
            rows: 0,
            cols: 0,
            corrected: false,
        }
    }

    /// Lines along the wrap axis: columns in rows mode, rows in columns mode.
    fn lines(&self, mode: LayoutMode) -> usize {
        match mode {
            LayoutMode::Rows => self.cols,
            LayoutMode::Columns => self.rows,
        }
    }
}

/// Place `items` according to `params`.
pub(crate) fn compute(
    params: &LayoutParams,
    slots: &[CellSlot],
    items: &[LayoutItem<'_>],
) -> LayoutResult {
    let first = run_pass(params, slots, items, params.lines);
    match correction_cap(params, &first) {
        Some(cap) => {
            tracing::trace!(
                target: horizon_itemgrid_core::logging::targets::LAYOUT,
                cap,
                "scrollbar squeezes content, relayout with fewer lines"
            );
            let mut second = run_pass(params, slots, items, Some(cap));
            second.corrected = true;
            second
        }
        None => first,
    }
}

fn correction_cap(params: &LayoutParams, result: &LayoutResult) -> Option<usize> {
    if params.lines.is_some() {
        return None;
    }
    let lines = result.lines(params.mode);
    let vp = params.viewport;
    let content = result.content;
    let (overflows, squeezed, fitted) = match params.mode {
        LayoutMode::Rows => (
            content.height > vp.height,
            content.width > vp.width - params.scrollbar,
            content.width <= vp.width,
        ),
        LayoutMode::Columns => (
            content.width > vp.width,
            content.height > vp.height - params.scrollbar,
            content.height <= vp.height,
        ),
    };
    (lines > 1 && overflows && squeezed && fitted).then(|| lines - 1)
}

fn run_pass(
    params: &LayoutParams,
    slots: &[CellSlot],
    items: &[LayoutItem<'_>],
    cap: Option<usize>,
) -> LayoutResult {
    if items.is_empty() {
        return LayoutResult::empty();
    }
    let mut result = match params.mode {
        LayoutMode::Rows => rows_pass(params, slots, items, cap),
        LayoutMode::Columns => columns_pass(params, slots, items, cap),
    };
    if params.rtl {
        mirror(&mut result);
    }
    result
}

/// Number of layout columns an item of width `width` covers.
pub(crate) fn col_span(width: f32, item_width: f32, column_spacing: f32) -> usize {
    if width <= item_width || item_width <= 0.0 {
        return 1;
    }
    ((width + column_spacing) / (item_width + column_spacing)).ceil().max(1.0) as usize
}

struct RowEntry {
    index: usize,
    x: f32,
    width: f32,
    col: usize,
    span: usize,
}

fn rows_pass(
    params: &LayoutParams,
    slots: &[CellSlot],
    items: &[LayoutItem<'_>],
    cap: Option<usize>,
) -> LayoutResult {
    let n = items.len();
    let margin = params.margin;
    let cs = params.column_spacing;
    let item_width = params.item_width.unwrap_or_else(|| {
        items
            .iter()
            .map(|item| item.natural.width)
            .fold(0.0_f32, f32::max)
    });

    let mut placements = Vec::with_capacity(n);
    let mut y = margin;
    let mut row = 0;
    let mut start = 0;
    let mut max_right = 0.0_f32;
    let mut last_bottom = margin;
    let mut total_cols = 0;

    while start < n {
        let mut entries = Vec::new();
        let mut current_width = 2.0 * margin;
        let mut x = margin;
        let mut col = 0;
        let mut end = start;
        while end < n {
            let span = col_span(items[end].natural.width, item_width, cs);
            let width = span as f32 * item_width + (span - 1) as f32 * cs;
            current_width += width;
            if end != start {
                let full = match cap {
                    None => current_width > params.viewport.width,
                    Some(cap) => col + span > cap,
                };
                if full {
                    break;
                }
            }
            current_width += cs;
            entries.push(RowEntry {
                index: end,
                x,
                width,
                col,
                span,
            });
            x = current_width - margin;
            col += span;
            end += 1;
        }
        total_cols = total_cols.max(col);

        let row_heights = slot_maxima(slots.len(), entries.iter().map(|e| &items[e.index]), |m| {
            m.outer().height
        });

        let mut bottom = y;
        for entry in &entries {
            let item = &items[entry.index];
            let (area, cells) = match params.orientation {
                ItemOrientation::Vertical => {
                    let height = stacked_extent(item.cells, &row_heights, params.spacing);
                    let area = Rect::new(entry.x, y, entry.width, height);
                    let cells = arrange_cells(params, slots, item.cells, area, &row_heights);
                    (area, cells)
                }
                ItemOrientation::Horizontal => {
                    let height = visible(item.cells)
                        .map(|(slot, _)| row_heights[slot])
                        .fold(0.0_f32, f32::max);
                    let widths: Vec<f32> = item
                        .cells
                        .iter()
                        .map(|m| m.map_or(0.0, |m| m.outer().width))
                        .collect();
                    let area = Rect::new(entry.x, y, entry.width, height);
                    let cells = arrange_cells(params, slots, item.cells, area, &widths);
                    (area, cells)
                }
            };
            bottom = bottom.max(area.bottom());
            max_right = max_right.max(area.right());
            placements.push(Placement {
                area,
                grid: GridPos {
                    row,
                    col: entry.col,
                    row_span: 1,
                    col_span: entry.span,
                },
                cells,
            });
        }

        last_bottom = bottom;
        y = bottom + params.row_spacing;
        row += 1;
        start = end;
    }

    LayoutResult {
        placements,
        content: Size::new(max_right + margin, last_bottom + margin),
        rows: row,
        cols: total_cols,
        corrected: false,
    }
}

fn columns_pass(
    params: &LayoutParams,
    slots: &[CellSlot],
    items: &[LayoutItem<'_>],
    cap: Option<usize>,
) -> LayoutResult {
    let n = items.len();
    let margin = params.margin;
    let rs = params.row_spacing;

    // Every layout cell has the same height, so icons line up across columns.
    let global_heights = slot_maxima(slots.len(), items.iter(), |m| m.outer().height);
    let cell_height = match params.orientation {
        ItemOrientation::Vertical => items
            .iter()
            .map(|item| stacked_extent(item.cells, &global_heights, params.spacing))
            .fold(0.0_f32, f32::max),
        ItemOrientation::Horizontal => items
            .iter()
            .map(|item| item.natural.height)
            .fold(0.0_f32, f32::max),
    };

    let mut placements = Vec::with_capacity(n);
    let mut x = margin;
    let mut col = 0;
    let mut start = 0;
    let mut max_bottom = 0.0_f32;
    let mut max_rows = 0;
    let mut last_right = margin;

    while start < n {
        let mut entries = Vec::new();
        let mut current_height = 2.0 * margin;
        let mut y = margin;
        let mut row = 0;
        let mut end = start;
        while end < n {
            current_height += cell_height;
            if end != start {
                let full = match cap {
                    None => current_height > params.viewport.height,
                    Some(cap) => row >= cap,
                };
                if full {
                    break;
                }
            }
            current_height += rs;
            entries.push((end, y, row));
            y = current_height - margin;
            row += 1;
            end += 1;
        }
        max_rows = max_rows.max(row);

        let column_widths = slot_maxima(
            slots.len(),
            entries.iter().map(|&(index, _, _)| &items[index]),
            |m| m.outer().width,
        );
        let width = params.item_width.unwrap_or_else(|| match params.orientation {
            ItemOrientation::Vertical => entries
                .iter()
                .map(|&(index, _, _)| items[index].natural.width)
                .fold(0.0_f32, f32::max),
            ItemOrientation::Horizontal => entries
                .iter()
                .map(|&(index, _, _)| {
                    stacked_extent(items[index].cells, &column_widths, params.spacing)
                })
                .fold(0.0_f32, f32::max),
        });

        for &(index, y, row) in &entries {
            let item = &items[index];
            let (area, cells) = match params.orientation {
                ItemOrientation::Vertical => {
                    let height = stacked_extent(item.cells, &global_heights, params.spacing);
                    let area = Rect::new(x, y, width, height);
                    (area, arrange_cells(params, slots, item.cells, area, &global_heights))
                }
                ItemOrientation::Horizontal => {
                    let area = Rect::new(x, y, width, cell_height);
                    (area, arrange_cells(params, slots, item.cells, area, &column_widths))
                }
            };
            max_bottom = max_bottom.max(area.bottom());
            placements.push(Placement {
                area,
                grid: GridPos {
                    row,
                    col,
                    row_span: 1,
                    col_span: 1,
                },
                cells,
            });
        }

        last_right = x + width;
        x = last_right + params.column_spacing;
        col += 1;
        start = end;
    }

    LayoutResult {
        placements,
        content: Size::new(last_right + margin, max_bottom + margin),
        rows: max_rows,
        cols: col,
        corrected: false,
    }
}

/// Mirror the whole layout horizontally.
fn mirror(result: &mut LayoutResult) {
    let width = result.content.width;
    let cols = result.cols;
    let flip = |r: Rect| Rect::new(width - r.right(), r.top(), r.width(), r.height());
    for placement in &mut result.placements {
        placement.area = flip(placement.area);
        placement.grid.col = cols - placement.grid.col_span - placement.grid.col;
        for cell in &mut placement.cells {
            cell.rect = flip(cell.rect);
            cell.content = flip(cell.content);
        }
    }
}

fn visible<'a>(
    cells: &'a [Option<CellMeasure>],
) -> impl Iterator<Item = (usize, &'a CellMeasure)> + 'a {
    cells
        .iter()
        .enumerate()
        .filter_map(|(slot, m)| m.as_ref().map(|m| (slot, m)))
}

/// Per-slot maximum of `extent` over `items`.
fn slot_maxima<'a, 'b: 'a>(
    slot_count: usize,
    items: impl Iterator<Item = &'a LayoutItem<'b>>,
    extent: impl Fn(&CellMeasure) -> f32,
) -> Vec<f32> {
    let mut maxima = vec![0.0_f32; slot_count];
    for item in items {
        for (slot, measure) in visible(item.cells) {
            if let Some(max) = maxima.get_mut(slot) {
                *max = max.max(extent(measure));
            }
        }
    }
    maxima
}

/// Total extent of the visible slots stacked with `spacing` between them.
fn stacked_extent(cells: &[Option<CellMeasure>], extents: &[f32], spacing: f32) -> f32 {
    let (sum, count) = visible(cells).fold((0.0_f32, 0_usize), |(sum, count), (slot, _)| {
        (sum + extents.get(slot).copied().unwrap_or(0.0), count + 1)
    });
    sum + spacing * count.saturating_sub(1) as f32
}

/// Split `area` into one box per visible cell along the stacking axis.
///
/// `extents` gives each slot's size along that axis. Horizontally stacked
/// cells share leftover width equally among expanding cells.
fn arrange_cells(
    params: &LayoutParams,
    slots: &[CellSlot],
    cells: &[Option<CellMeasure>],
    area: Rect,
    extents: &[f32],
) -> Vec<CellBox> {
    let vertical = params.orientation == ItemOrientation::Vertical;
    let mut sizes: Vec<(usize, &CellMeasure, f32)> = visible(cells)
        .map(|(slot, m)| (slot, m, extents.get(slot).copied().unwrap_or(0.0)))
        .collect();

    if !vertical {
        let used = sizes.iter().map(|&(_, _, w)| w).sum::<f32>()
            + params.spacing * sizes.len().saturating_sub(1) as f32;
        let expanders = sizes
            .iter()
            .filter(|&&(slot, _, _)| slots.get(slot).is_some_and(|s| s.expand))
            .count();
        let extra = area.width() - used;
        if extra > 0.0 && expanders > 0 {
            let share = extra / expanders as f32;
            for (slot, _, width) in &mut sizes {
                if slots.get(*slot).is_some_and(|s| s.expand) {
                    *width += share;
                }
            }
        }
    }

    let mut cursor = if vertical { area.top() } else { area.left() };
    let mut boxes = Vec::with_capacity(sizes.len());
    for (slot, measure, extent) in sizes {
        let Some(cell) = slots.get(slot).map(|s| s.cell) else {
            continue;
        };
        let rect = if vertical {
            Rect::new(area.left(), cursor, area.width(), extent)
        } else {
            Rect::new(cursor, area.top(), extent, area.height())
        };
        cursor += extent + params.spacing;

        let content = align_content(rect, measure);
        let (before, after) = if vertical {
            (content.top() - rect.top(), rect.bottom() - content.bottom())
        } else {
            (content.left() - rect.left(), rect.right() - content.right())
        };
        boxes.push(CellBox {
            cell,
            rect,
            content,
            before,
            after,
        });
    }
    boxes
}

fn align_content(rect: Rect, m: &CellMeasure) -> Rect {
    let room_w = (rect.width() - 2.0 * m.xpad).max(0.0);
    let room_h = (rect.height() - 2.0 * m.ypad).max(0.0);
    let width = m.natural.width.min(room_w);
    let height = m.natural.height.min(room_h);
    Rect::new(
        rect.left() + m.xpad + m.xalign * (room_w - width),
        rect.top() + m.ypad + m.yalign * (room_h - height),
        width,
        height,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::SlotMap;

    fn slots(n: usize) -> Vec<CellSlot> {
        let mut ids: SlotMap<CellId, ()> = SlotMap::with_key();
        (0..n)
            .map(|_| CellSlot {
                cell: ids.insert(()),
                expand: false,
            })
            .collect()
    }

    fn measure(w: f32, h: f32) -> Option<CellMeasure> {
        Some(CellMeasure {
            natural: Size::new(w, h),
            xpad: 0.0,
            ypad: 0.0,
            xalign: 0.5,
            yalign: 0.5,
        })
    }

    fn params(viewport: Size) -> LayoutParams {
        LayoutParams::new(&GridConfig::default(), viewport)
    }

    /// Items made of a single cell of the given sizes.
    fn single_cell(sizes: &[(f32, f32)]) -> Vec<Vec<Option<CellMeasure>>> {
        sizes.iter().map(|&(w, h)| vec![measure(w, h)]).collect()
    }

    fn items(cells: &[Vec<Option<CellMeasure>>]) -> Vec<LayoutItem<'_>> {
        cells
            .iter()
            .map(|c| {
                let natural = c
                    .iter()
                    .flatten()
                    .fold(Size::ZERO, |acc, m| {
                        Size::new(acc.width.max(m.outer().width), acc.height + m.outer().height)
                    });
                LayoutItem { natural, cells: c }
            })
            .collect()
    }

    #[test]
    fn test_empty_layout() {
        let result = compute(&params(Size::new(100.0, 100.0)), &slots(1), &[]);
        assert_eq!(result.content, Size::ZERO);
        assert_eq!(result.rows, 0);
    }

    #[test]
    fn test_rows_wrap_at_viewport() {
        // 6 + 50 + 6 + 50 + 6 + 50 + 6 = 174 > 170: the third item wraps.
        let cells = single_cell(&[(50.0, 20.0); 5]);
        let result = compute(&params(Size::new(170.0, 500.0)), &slots(1), &items(&cells));
        let grid: Vec<(usize, usize)> = result
            .placements
            .iter()
            .map(|p| (p.grid.row, p.grid.col))
            .collect();
        assert_eq!(grid, vec![(0, 0), (0, 1), (1, 0), (1, 1), (2, 0)]);
        assert_eq!(result.placements[1].area, Rect::new(62.0, 6.0, 50.0, 20.0));
        assert_eq!(result.placements[2].area, Rect::new(6.0, 32.0, 50.0, 20.0));
        assert_eq!(result.content, Size::new(118.0, 84.0));
    }

    #[test]
    fn test_fixed_columns() {
        let cells = single_cell(&[(40.0, 20.0); 7]);
        let mut p = params(Size::new(1000.0, 1000.0));
        p.lines = Some(3);
        let result = compute(&p, &slots(1), &items(&cells));
        let grid: Vec<(usize, usize)> = result
            .placements
            .iter()
            .map(|p| (p.grid.row, p.grid.col))
            .collect();
        assert_eq!(
            grid,
            vec![(0, 0), (0, 1), (0, 2), (1, 0), (1, 1), (1, 2), (2, 0)]
        );
        assert_eq!((result.rows, result.cols), (3, 3));
    }

    #[test]
    fn test_wide_item_spans_columns() {
        let cells = single_cell(&[(40.0, 20.0), (90.0, 20.0), (40.0, 20.0)]);
        let mut p = params(Size::new(1000.0, 1000.0));
        p.item_width = Some(40.0);
        let result = compute(&p, &slots(1), &items(&cells));
        assert_eq!(result.placements[1].grid.col_span, 3);
        assert_eq!(result.placements[1].area.width(), 3.0 * 40.0 + 2.0 * 6.0);
        assert_eq!(result.placements[2].grid.col, 4);
    }

    #[test]
    fn test_column_cap_counts_spans() {
        // With 20px columns a 40px item spans two of them.
        let cells = single_cell(&[(20.0, 20.0), (40.0, 20.0), (20.0, 20.0), (40.0, 20.0), (40.0, 20.0)]);
        let mut p = params(Size::new(1000.0, 1000.0));
        p.item_width = Some(20.0);
        p.lines = Some(3);
        let result = compute(&p, &slots(1), &items(&cells));
        let grid: Vec<(usize, usize, usize)> = result
            .placements
            .iter()
            .map(|p| (p.grid.row, p.grid.col, p.grid.col_span))
            .collect();
        assert_eq!(
            grid,
            vec![(0, 0, 1), (0, 1, 2), (1, 0, 1), (1, 1, 2), (2, 0, 2)]
        );
        assert_eq!((result.rows, result.cols), (3, 3));
    }

    #[test]
    fn test_row_aligns_slots() {
        // Icon slot heights differ; labels start at the same y.
        let cells = vec![
            vec![measure(48.0, 48.0), measure(40.0, 16.0)],
            vec![measure(32.0, 32.0), measure(40.0, 16.0)],
        ];
        let result = compute(&params(Size::new(500.0, 500.0)), &slots(2), &items(&cells));
        let label_a = result.placements[0].cells[1];
        let label_b = result.placements[1].cells[1];
        assert_eq!(label_a.rect.top(), label_b.rect.top());
        assert_eq!(result.placements[1].area.height(), 64.0);

        let icon_b = result.placements[1].cells[0];
        assert_eq!(icon_b.content.height(), 32.0);
        assert_eq!(icon_b.before, 8.0);
        assert_eq!(icon_b.after, 8.0);
    }

    #[test]
    fn test_rtl_mirrors_columns() {
        let cells = single_cell(&[(50.0, 20.0); 3]);
        let mut p = params(Size::new(500.0, 500.0));
        p.rtl = true;
        let result = compute(&p, &slots(1), &items(&cells));
        assert_eq!(result.placements[0].grid.col, 2);
        assert_eq!(result.placements[2].grid.col, 0);
        assert!(result.placements[0].area.left() > result.placements[1].area.left());
        assert_eq!(
            result.placements[0].area.right(),
            result.content.width - p.margin
        );
    }

    #[test]
    fn test_columns_mode_fills_down() {
        let cells = single_cell(&[(50.0, 20.0); 5]);
        let mut p = params(Size::new(500.0, 80.0));
        p.mode = LayoutMode::Columns;
        let result = compute(&p, &slots(1), &items(&cells));
        let grid: Vec<(usize, usize)> = result
            .placements
            .iter()
            .map(|p| (p.grid.row, p.grid.col))
            .collect();
        // 6 + 20 + 6 + 20 + 6 + 20 + 6 = 84 > 80
        assert_eq!(grid, vec![(0, 0), (1, 0), (0, 1), (1, 1), (0, 2)]);
        assert_eq!(result.placements[2].area.left(), 62.0);
    }

    #[test]
    fn test_scrollbar_correction_runs_once() {
        // Two columns fit in 124 but overflow 124 - 14 once the items
        // need a vertical scrollbar.
        let cells = single_cell(&[(50.0, 40.0); 6]);
        let p = params(Size::new(124.0, 100.0));
        let result = compute(&p, &slots(1), &items(&cells));
        assert!(result.corrected);
        assert_eq!(result.cols, 1);
        assert_eq!(compute(&p, &slots(1), &items(&cells)), result);
    }

    #[test]
    fn test_horizontal_orientation_expands() {
        let mut s = slots(2);
        s[1].expand = true;
        let cells = vec![vec![measure(16.0, 16.0), measure(30.0, 10.0)]];
        let mut p = params(Size::new(500.0, 500.0));
        p.orientation = ItemOrientation::Horizontal;
        p.item_width = Some(100.0);
        let result = compute(&p, &s, &items(&cells));
        let boxes = &result.placements[0].cells;
        assert_eq!(boxes[0].rect.width(), 16.0);
        assert_eq!(boxes[1].rect.width(), 84.0);
        assert_eq!(result.placements[0].area.height(), 16.0);
    }

    #[test]
    fn test_col_span() {
        assert_eq!(col_span(10.0, 40.0, 6.0), 1);
        assert_eq!(col_span(40.0, 40.0, 6.0), 1);
        assert_eq!(col_span(41.0, 40.0, 6.0), 2);
        assert_eq!(col_span(86.0, 40.0, 6.0), 2);
        assert_eq!(col_span(87.0, 40.0, 6.0), 3);
    }
}
