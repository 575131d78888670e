//! Icon cell renderer.

use horizon_itemgrid_render::{Rect, RenderResult, Size, Surface};

use super::renderer::{CellProps, CellRenderer, CellState, SizeContext};
use crate::error::{GridError, Result};
use crate::model::{CellValue, ColumnKind};

/// Renders a named icon at a square size.
///
/// With no icon bound the cell collapses to zero size.
///
/// Properties: `icon` (icon name, text accepted), `size` (int), plus the
/// shared ones.
#[derive(Debug, Clone)]
pub struct IconRenderer {
    props: CellProps,
    icon: Option<String>,
    size: f32,
}

impl Default for IconRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl IconRenderer {
    /// Default icon edge length.
    pub const DEFAULT_SIZE: f32 = 48.0;

    /// Create an icon renderer with no icon.
    pub fn new() -> Self {
        Self {
            props: CellProps::default(),
            icon: None,
            size: Self::DEFAULT_SIZE,
        }
    }

    /// Set the icon edge length.
    pub fn with_size(mut self, size: f32) -> Self {
        self.size = size;
        self
    }

    /// Set a fixed icon.
    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    /// The currently bound icon name.
    pub fn icon(&self) -> Option<&str> {
        self.icon.as_deref()
    }
}

impl CellRenderer for IconRenderer {
    fn name(&self) -> &'static str {
        "icon"
    }

    fn props(&self) -> &CellProps {
        &self.props
    }

    fn props_mut(&mut self) -> &mut CellProps {
        &mut self.props
    }

    fn own_property_kind(&self, name: &str) -> Option<ColumnKind> {
        match name {
            "icon" => Some(ColumnKind::Icon),
            "size" => Some(ColumnKind::Int),
            _ => None,
        }
    }

    fn set_own_property(&mut self, name: &str, value: &CellValue) -> Result<()> {
        match (name, value) {
            ("icon", CellValue::None) => self.icon = None,
            ("icon", CellValue::Icon(s) | CellValue::Text(s)) => self.icon = Some(s.clone()),
            ("size", CellValue::Int(px)) => self.size = *px as f32,
            ("icon", other) => {
                return Err(GridError::type_mismatch(name, ColumnKind::Icon, other.kind()));
            }
            ("size", other) => {
                return Err(GridError::type_mismatch(name, ColumnKind::Int, other.kind()));
            }
            _ => return Err(GridError::unknown_property(self.name(), name)),
        }
        Ok(())
    }

    fn preferred_size(&self, _ctx: &SizeContext) -> Size {
        match self.icon {
            Some(_) => Size::new(self.size, self.size),
            None => Size::ZERO,
        }
    }

    fn paint(
        &self,
        surface: &mut dyn Surface,
        content: Rect,
        _state: CellState,
    ) -> RenderResult<()> {
        match &self.icon {
            Some(name) => surface.draw_icon(name, content),
            None => Ok(()),
        }
    }
}
