//! Check box cell renderer.

use horizon_itemgrid_core::Signal;
use horizon_itemgrid_render::{Color, Rect, RenderResult, Size, Surface};

use super::renderer::{CellMode, CellProps, CellRenderer, CellState, SizeContext};
use crate::error::{GridError, Result};
use crate::model::{CellValue, ColumnKind, RowId};

/// Renders a check box indicator.
///
/// The renderer does not write back to the model: activating an activatable
/// toggle emits [`toggled`](Self::toggled) with the row, and the host decides
/// what to store.
///
/// Properties: `active` (bool), `activatable` (bool), plus the shared ones.
#[derive(Debug)]
pub struct ToggleRenderer {
    props: CellProps,
    active: bool,
    activatable: bool,
    indicator_size: f32,
    color: Color,
    /// Emitted when an activatable toggle is activated.
    pub toggled: Signal<RowId>,
}

impl Default for ToggleRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl ToggleRenderer {
    /// Default edge length of the indicator.
    pub const DEFAULT_INDICATOR_SIZE: f32 = 16.0;

    /// Create an inactive, activatable toggle.
    pub fn new() -> Self {
        Self {
            props: CellProps {
                xpad: 2.0,
                ypad: 2.0,
                ..CellProps::default()
            },
            active: false,
            activatable: true,
            indicator_size: Self::DEFAULT_INDICATOR_SIZE,
            color: Color::BLACK,
            toggled: Signal::new(),
        }
    }

    /// Set the indicator edge length.
    pub fn with_indicator_size(mut self, size: f32) -> Self {
        self.indicator_size = size.max(0.0);
        self
    }

    /// Whether the indicator is checked.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Whether activating the cell emits `toggled`.
    pub fn is_activatable(&self) -> bool {
        self.activatable
    }
}

impl CellRenderer for ToggleRenderer {
    fn name(&self) -> &'static str {
        "toggle"
    }

    fn props(&self) -> &CellProps {
        &self.props
    }

    fn props_mut(&mut self) -> &mut CellProps {
        &mut self.props
    }

    fn own_property_kind(&self, name: &str) -> Option<ColumnKind> {
        match name {
            "active" | "activatable" => Some(ColumnKind::Bool),
            _ => None,
        }
    }

    fn set_own_property(&mut self, name: &str, value: &CellValue) -> Result<()> {
        let flag = match name {
            "active" => &mut self.active,
            "activatable" => &mut self.activatable,
            _ => return Err(GridError::unknown_property("toggle", name)),
        };
        match value {
            CellValue::None => *flag = false,
            CellValue::Bool(b) => *flag = *b,
            other => return Err(GridError::type_mismatch(name, ColumnKind::Bool, other.kind())),
        }
        Ok(())
    }

    fn preferred_size(&self, _ctx: &SizeContext) -> Size {
        Size::new(self.indicator_size, self.indicator_size)
    }

    fn paint(
        &self,
        surface: &mut dyn Surface,
        content: Rect,
        _state: CellState,
    ) -> RenderResult<()> {
        surface.stroke_rect(content, self.color, 1.0)?;
        if self.active {
            surface.fill_rect(content.inflate(-3.0, -3.0), self.color)?;
        }
        Ok(())
    }

    fn mode(&self) -> CellMode {
        if self.activatable {
            CellMode::Activatable
        } else {
            CellMode::Inert
        }
    }

    fn activate(&mut self, row: RowId) -> bool {
        if !self.activatable {
            return false;
        }
        self.toggled.emit(row);
        true
    }
}
