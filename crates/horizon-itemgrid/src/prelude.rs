//! Prelude module for Horizon ItemGrid.
//!
//! ```
//! use horizon_itemgrid::prelude::*;
//! ```
//!
//! This provides access to:
//! - The grid and its configuration (`ItemGrid`, `GridConfig`, modes)
//! - Data sources (`DataSource`, `ListStore`, `CellValue`)
//! - Cell renderers (`TextRenderer`, `IconRenderer`, `ToggleRenderer`)
//! - Input events and geometry types

// ============================================================================
// Grid
// ============================================================================

pub use crate::{
    DropPosition, DropTarget, GridConfig, GridError, GridStyle, ItemGrid, ItemHit,
    ItemOrientation, LayoutMode, MovementStep, SelectionMode, TextDirection,
};

// ============================================================================
// Model
// ============================================================================

pub use crate::model::{CellValue, ColumnKind, DataSource, ListStore, RowId};

// ============================================================================
// Cells
// ============================================================================

pub use crate::cell::{
    CellId, CellMode, CellRenderer, IconRenderer, PackSide, TextRenderer, ToggleRenderer,
};

// ============================================================================
// Events
// ============================================================================

pub use crate::events::{
    GridEvent, Key, KeyPressEvent, KeyboardModifiers, MouseButton, MouseMoveEvent,
    MousePressEvent, MouseReleaseEvent, WheelEvent,
};

// ============================================================================
// Geometry and signals
// ============================================================================

pub use horizon_itemgrid_core::Signal;
pub use horizon_itemgrid_render::{Color, Point, Rect, RecordingSurface, Size, Surface};
