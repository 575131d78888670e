//! The cell renderer capability trait.
//!
//! A renderer draws one cell of an item (an icon, a label, a check box).
//! The grid binds the current row's values into the renderer's properties,
//! asks it for its preferred size and later asks it to paint.

use horizon_itemgrid_render::{Rect, RenderResult, Size, Surface};

use crate::error::{GridError, Result};
use crate::model::{CellValue, ColumnKind, RowId};

/// How a cell reacts to the pointer and keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum CellMode {
    /// The cell only displays data.
    #[default]
    Inert,
    /// The cell can be activated (for example toggled).
    Activatable,
    /// The cell can be edited in place.
    Editable,
}

impl CellMode {
    /// Whether the keyboard cursor may rest on a cell of this mode.
    pub fn is_focusable(self) -> bool {
        !matches!(self, CellMode::Inert)
    }
}

/// Per-paint state of the item the cell belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CellState {
    /// The item is selected.
    pub selected: bool,
    /// The pointer hovers the item.
    pub prelit: bool,
    /// The keyboard cursor is on this cell (or on the item, with no cell cursor).
    pub focused: bool,
}

/// Constraints passed to [`CellRenderer::preferred_size`].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SizeContext {
    /// Maximum content width, used by text to wrap.
    pub max_width: Option<f32>,
}

/// Properties every renderer shares.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellProps {
    /// Whether the cell takes part in layout and painting.
    pub visible: bool,
    /// Horizontal alignment of the content in its box, 0.0 (start) to 1.0 (end).
    pub xalign: f32,
    /// Vertical alignment of the content in its box, 0.0 (top) to 1.0 (bottom).
    pub yalign: f32,
    /// Horizontal padding on each side.
    pub xpad: f32,
    /// Vertical padding on each side.
    pub ypad: f32,
}

impl Default for CellProps {
    fn default() -> Self {
        Self {
            visible: true,
            xalign: 0.5,
            yalign: 0.5,
            xpad: 0.0,
            ypad: 0.0,
        }
    }
}

impl CellProps {
    /// Type of a shared property, `None` if `name` is not one.
    pub fn property_kind(name: &str) -> Option<ColumnKind> {
        match name {
            "visible" => Some(ColumnKind::Bool),
            "xalign" | "yalign" | "xpad" | "ypad" => Some(ColumnKind::Float),
            _ => None,
        }
    }

    /// Set a shared property from a value.
    pub fn set(&mut self, name: &str, value: &CellValue) -> Result<()> {
        let Some(expected) = Self::property_kind(name) else {
            return Err(GridError::unknown_property("cell", name));
        };
        let mismatch = || GridError::type_mismatch(name, expected, value.kind());
        match name {
            "visible" => self.visible = value.as_bool().ok_or_else(mismatch)?,
            _ => {
                let v = value.as_f64().ok_or_else(mismatch)? as f32;
                match name {
                    "xalign" => self.xalign = v.clamp(0.0, 1.0),
                    "yalign" => self.yalign = v.clamp(0.0, 1.0),
                    "xpad" => self.xpad = v.max(0.0),
                    _ => self.ypad = v.max(0.0),
                }
            }
        }
        Ok(())
    }
}

/// A pluggable per-cell renderer.
///
/// Implementors provide their own properties through
/// [`own_property_kind`](Self::own_property_kind) and
/// [`set_own_property`](Self::set_own_property); the shared properties of
/// [`CellProps`] are handled by the provided methods.
pub trait CellRenderer {
    /// Short name used in diagnostics.
    fn name(&self) -> &'static str;

    /// Shared properties.
    fn props(&self) -> &CellProps;

    /// Shared properties, mutably.
    fn props_mut(&mut self) -> &mut CellProps;

    /// Type of a renderer-specific property.
    fn own_property_kind(&self, name: &str) -> Option<ColumnKind>;

    /// Set a renderer-specific property.
    fn set_own_property(&mut self, name: &str, value: &CellValue) -> Result<()>;

    /// Content size (padding excluded) for the currently bound values.
    fn preferred_size(&self, ctx: &SizeContext) -> Size;

    /// Paint the content into `content`, the aligned content rectangle.
    fn paint(&self, surface: &mut dyn Surface, content: Rect, state: CellState)
    -> RenderResult<()>;

    /// Interaction mode.
    fn mode(&self) -> CellMode {
        CellMode::Inert
    }

    /// Activate the cell for `row`. Returns `true` if something happened.
    fn activate(&mut self, _row: RowId) -> bool {
        false
    }

    /// Begin in-place editing. Returns `true` if editing started.
    fn start_editing(&mut self, _row: RowId, _content: Rect) -> bool {
        false
    }

    /// End in-place editing.
    fn stop_editing(&mut self, _canceled: bool) {}

    /// Type of any property, shared or renderer-specific.
    fn property_kind(&self, name: &str) -> Option<ColumnKind> {
        CellProps::property_kind(name).or_else(|| self.own_property_kind(name))
    }

    /// Set any property, shared or renderer-specific.
    fn set_property(&mut self, name: &str, value: &CellValue) -> Result<()> {
        if CellProps::property_kind(name).is_some() {
            self.props_mut().set(name, value)
        } else {
            self.set_own_property(name, value)
        }
    }

    /// Whether the cell takes part in layout.
    fn is_visible(&self) -> bool {
        self.props().visible
    }

    /// `(xalign, yalign)`.
    fn alignment(&self) -> (f32, f32) {
        let p = self.props();
        (p.xalign, p.yalign)
    }

    /// `(xpad, ypad)`.
    fn padding(&self) -> (f32, f32) {
        let p = self.props();
        (p.xpad, p.ypad)
    }
}

impl std::fmt::Debug for dyn CellRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CellRenderer")
            .field("name", &self.name())
            .field("props", self.props())
            .finish()
    }
}
