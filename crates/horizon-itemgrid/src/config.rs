//! Grid configuration and paint style.

use std::time::Duration;

use horizon_itemgrid_render::Color;

/// How the grid reacts to clicks and keyboard selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SelectionMode {
    /// Nothing can be selected.
    None,
    /// At most one item is selected.
    #[default]
    Single,
    /// Exactly one item is selected once any is; the user cannot unselect it.
    Browse,
    /// Any number of items; ctrl toggles, shift extends, rubber band.
    Multiple,
}

/// Order in which items fill the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LayoutMode {
    /// Fill a row left to right, then wrap; scrolls vertically.
    #[default]
    Rows,
    /// Fill a column top to bottom, then wrap; scrolls horizontally.
    Columns,
}

/// How the cells of one item are stacked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ItemOrientation {
    /// Cells stacked top to bottom (icon above label).
    #[default]
    Vertical,
    /// Cells side by side (icon beside label).
    Horizontal,
}

/// Text direction; right-to-left mirrors the layout horizontally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TextDirection {
    /// Left to right.
    #[default]
    Ltr,
    /// Right to left.
    Rtl,
}

impl TextDirection {
    /// Returns `true` for right-to-left.
    pub fn is_rtl(self) -> bool {
        self == TextDirection::Rtl
    }
}

/// Layout and behavior parameters of an [`ItemGrid`](crate::ItemGrid).
///
/// # Example
///
/// ```
/// use horizon_itemgrid::{GridConfig, LayoutMode, SelectionMode};
///
/// let config = GridConfig::default()
///     .with_selection_mode(SelectionMode::Multiple)
///     .with_layout_mode(LayoutMode::Columns)
///     .with_columns(Some(3));
/// assert_eq!(config.margin, 6.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridConfig {
    /// Space around the content.
    pub margin: f32,
    /// Space between the cells of one item.
    pub spacing: f32,
    /// Space between layout rows.
    pub row_spacing: f32,
    /// Space between layout columns.
    pub column_spacing: f32,
    /// Fixed layout cell width; `None` uses the widest item.
    pub item_width: Option<f32>,
    /// Fixed column count (row count in columns mode); `None` fills the viewport.
    pub columns: Option<usize>,
    /// Selection mode.
    pub selection_mode: SelectionMode,
    /// Layout mode.
    pub layout_mode: LayoutMode,
    /// Cell stacking inside an item.
    pub item_orientation: ItemOrientation,
    /// Text direction.
    pub text_direction: TextDirection,
    /// Activate items on single click instead of double click.
    pub single_click: bool,
    /// In single-click mode, select the hovered item after this delay.
    pub single_click_timeout: Option<Duration>,
    /// Start an interactive search when the user types.
    pub enable_search: bool,
    /// Column matched by interactive search; `None` uses the first text column.
    pub search_column: Option<usize>,
    /// Pointer travel before a press turns into a drag.
    pub drag_threshold: f32,
    /// Thickness reserved for a scrollbar when content overflows.
    pub scrollbar_thickness: f32,
    /// Let the user reorder rows by dragging them.
    pub reorderable: bool,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            margin: 6.0,
            spacing: 0.0,
            row_spacing: 6.0,
            column_spacing: 6.0,
            item_width: None,
            columns: None,
            selection_mode: SelectionMode::Single,
            layout_mode: LayoutMode::Rows,
            item_orientation: ItemOrientation::Vertical,
            text_direction: TextDirection::Ltr,
            single_click: false,
            single_click_timeout: None,
            enable_search: true,
            search_column: None,
            drag_threshold: 4.0,
            scrollbar_thickness: 14.0,
            reorderable: false,
        }
    }
}

impl GridConfig {
    /// Set the content margin.
    pub fn with_margin(mut self, margin: f32) -> Self {
        self.margin = margin;
        self
    }

    /// Set the spacing between cells of an item.
    pub fn with_spacing(mut self, spacing: f32) -> Self {
        self.spacing = spacing;
        self
    }

    /// Set the spacing between layout rows.
    pub fn with_row_spacing(mut self, spacing: f32) -> Self {
        self.row_spacing = spacing;
        self
    }

    /// Set the spacing between layout columns.
    pub fn with_column_spacing(mut self, spacing: f32) -> Self {
        self.column_spacing = spacing;
        self
    }

    /// Set a fixed item width.
    pub fn with_item_width(mut self, width: Option<f32>) -> Self {
        self.item_width = width;
        self
    }

    /// Set a fixed column count.
    pub fn with_columns(mut self, columns: Option<usize>) -> Self {
        self.columns = columns;
        self
    }

    /// Set the selection mode.
    pub fn with_selection_mode(mut self, mode: SelectionMode) -> Self {
        self.selection_mode = mode;
        self
    }

    /// Set the layout mode.
    pub fn with_layout_mode(mut self, mode: LayoutMode) -> Self {
        self.layout_mode = mode;
        self
    }

    /// Set the item orientation.
    pub fn with_item_orientation(mut self, orientation: ItemOrientation) -> Self {
        self.item_orientation = orientation;
        self
    }

    /// Set the text direction.
    pub fn with_text_direction(mut self, direction: TextDirection) -> Self {
        self.text_direction = direction;
        self
    }

    /// Enable single-click activation, with an optional hover-select delay.
    pub fn with_single_click(mut self, enabled: bool, timeout: Option<Duration>) -> Self {
        self.single_click = enabled;
        self.single_click_timeout = timeout;
        self
    }

    /// Enable or disable interactive search.
    pub fn with_search(mut self, enabled: bool, column: Option<usize>) -> Self {
        self.enable_search = enabled;
        self.search_column = column;
        self
    }

    /// Set the drag threshold.
    pub fn with_drag_threshold(mut self, threshold: f32) -> Self {
        self.drag_threshold = threshold;
        self
    }

    /// Set the reserved scrollbar thickness.
    pub fn with_scrollbar_thickness(mut self, thickness: f32) -> Self {
        self.scrollbar_thickness = thickness;
        self
    }

    /// Make rows reorderable by drag and drop.
    pub fn with_reorderable(mut self, reorderable: bool) -> Self {
        self.reorderable = reorderable;
        self
    }

    /// Copy with negative and non-finite lengths replaced by zero.
    pub(crate) fn sanitized(&self) -> Self {
        let len = |v: f32| if v.is_finite() { v.max(0.0) } else { 0.0 };
        Self {
            margin: len(self.margin),
            spacing: len(self.spacing),
            row_spacing: len(self.row_spacing),
            column_spacing: len(self.column_spacing),
            item_width: self.item_width.map(len).filter(|w| *w > 0.0),
            columns: self.columns.filter(|c| *c > 0),
            drag_threshold: len(self.drag_threshold),
            scrollbar_thickness: len(self.scrollbar_thickness),
            ..self.clone()
        }
    }
}

/// Colors used when painting the grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridStyle {
    /// Fill behind selected items.
    pub selected_background: Color,
    /// Outline of the hovered item.
    pub prelight_outline: Color,
    /// Outline of the cursor item or cell.
    pub focus_outline: Color,
    /// Outline of the drop destination.
    pub drop_highlight: Color,
    /// Rubber band fill.
    pub rubber_band_fill: Color,
    /// Rubber band outline.
    pub rubber_band_outline: Color,
}

impl Default for GridStyle {
    fn default() -> Self {
        let accent = Color::from_rgb8(53, 132, 228);
        Self {
            selected_background: accent,
            prelight_outline: Color::LIGHT_GRAY,
            focus_outline: Color::GRAY,
            drop_highlight: accent,
            rubber_band_fill: accent.with_alpha(0.25),
            rubber_band_outline: accent,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = GridConfig::default();
        assert_eq!(config.margin, 6.0);
        assert_eq!(config.row_spacing, 6.0);
        assert_eq!(config.selection_mode, SelectionMode::Single);
        assert_eq!(config.layout_mode, LayoutMode::Rows);
        assert!(config.enable_search);
    }

    #[test]
    fn test_sanitized() {
        let config = GridConfig::default()
            .with_margin(-3.0)
            .with_row_spacing(f32::NAN)
            .with_item_width(Some(0.0))
            .with_columns(Some(0));
        let clean = config.sanitized();
        assert_eq!(clean.margin, 0.0);
        assert_eq!(clean.row_spacing, 0.0);
        assert_eq!(clean.item_width, None);
        assert_eq!(clean.columns, None);
    }
}
