//! Item measurement and the layout run.

use horizon_itemgrid_core::logging::targets;
use horizon_itemgrid_render::Size;

use super::item::CellMeasure;
use super::layout::{self, CellSlot, LayoutItem, LayoutParams};
use super::{ItemGrid, LayoutState};
use crate::cell::SizeContext;
use crate::config::ItemOrientation;

/// Replace negative and non-finite extents by zero.
fn clamp_extent(v: f32) -> f32 {
    if v.is_finite() { v.max(0.0) } else { 0.0 }
}

impl ItemGrid {
    /// Measure every item without a cached size, then place all items.
    pub(super) fn run_layout(&mut self) {
        let _span = tracing::debug_span!(target: targets::LAYOUT, "layout", items = self.order.len())
            .entered();

        let visual = self.cells.visual_order();
        let slots: Vec<CellSlot> = visual
            .iter()
            .map(|&cell| CellSlot {
                cell,
                expand: self.cells.descriptor(cell).is_some_and(|d| d.expand()),
            })
            .collect();

        let config = self.sanitized_config();
        let mut measured = 0usize;
        for i in 0..self.order.len() {
            let key = self.order[i];
            if self.items[key].natural.is_some() {
                continue;
            }
            let cell_natural = self.measure_row(i, &visual, &config);
            let natural = natural_size(&cell_natural, config.item_orientation, config.spacing);
            let item = &mut self.items[key];
            item.cell_natural = cell_natural;
            item.natural = Some(natural);
            measured += 1;
        }

        let params = LayoutParams::new(&self.config, self.viewport);
        let result = {
            let inputs: Vec<LayoutItem<'_>> = self
                .order
                .iter()
                .map(|&key| {
                    let item = &self.items[key];
                    LayoutItem {
                        natural: item.natural.unwrap_or(Size::ZERO),
                        cells: &item.cell_natural,
                    }
                })
                .collect();
            layout::compute(&params, &slots, &inputs)
        };

        for (&key, placement) in self.order.iter().zip(result.placements) {
            let item = &mut self.items[key];
            item.area = placement.area;
            item.grid = Some(placement.grid);
            item.cells = placement.cells;
        }
        self.layout = LayoutState {
            content: result.content,
            rows: result.rows,
            cols: result.cols,
        };
        tracing::debug!(
            target: targets::LAYOUT,
            measured,
            rows = result.rows,
            cols = result.cols,
            width = result.content.width,
            height = result.content.height,
            corrected = result.corrected,
            "layout done"
        );

        self.clamp_scroll();
        self.damage.invalidate_all();
    }

    /// Bind row `index` into the renderers and measure each cell in visual
    /// order. Hidden cells measure as `None`.
    fn measure_row(
        &mut self,
        index: usize,
        visual: &[crate::cell::CellId],
        config: &crate::config::GridConfig,
    ) -> Vec<Option<CellMeasure>> {
        if let Some(model) = self.model.clone() {
            self.cells.bind_row(model.as_ref(), index);
        }
        visual
            .iter()
            .map(|&cell| {
                let renderer = self.cells.renderer(cell)?;
                if !renderer.is_visible() {
                    return None;
                }
                let (xpad, ypad) = renderer.padding();
                let (xalign, yalign) = renderer.alignment();
                let max_width = match config.item_orientation {
                    ItemOrientation::Vertical => config
                        .item_width
                        .map(|w| (w - 2.0 * xpad).max(0.0)),
                    ItemOrientation::Horizontal => None,
                };
                let raw = renderer.preferred_size(&SizeContext { max_width });
                let natural = Size::new(clamp_extent(raw.width), clamp_extent(raw.height));
                if natural != raw {
                    tracing::warn!(
                        target: targets::CELLS,
                        renderer = renderer.name(),
                        width = raw.width,
                        height = raw.height,
                        "renderer reported an invalid size, clamped"
                    );
                }
                Some(CellMeasure {
                    natural,
                    xpad,
                    ypad,
                    xalign,
                    yalign,
                })
            })
            .collect()
    }
}

/// Size of an item from its cells: stacked along the orientation, with
/// `spacing` between visible cells.
fn natural_size(cells: &[Option<CellMeasure>], orientation: ItemOrientation, spacing: f32) -> Size {
    let outer: Vec<Size> = cells.iter().flatten().map(CellMeasure::outer).collect();
    if outer.is_empty() {
        return Size::ZERO;
    }
    let gaps = spacing * (outer.len() - 1) as f32;
    match orientation {
        ItemOrientation::Vertical => Size::new(
            outer.iter().map(|s| s.width).fold(0.0, f32::max),
            outer.iter().map(|s| s.height).sum::<f32>() + gaps,
        ),
        ItemOrientation::Horizontal => Size::new(
            outer.iter().map(|s| s.width).sum::<f32>() + gaps,
            outer.iter().map(|s| s.height).fold(0.0, f32::max),
        ),
    }
}
