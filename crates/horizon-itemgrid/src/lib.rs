//! Horizon ItemGrid - a toolkit-agnostic icon grid.
//!
//! [`ItemGrid`] presents the rows of a [`DataSource`](model::DataSource) as a
//! wrapping grid of items, each composed of pluggable cell renderers (an icon
//! above a label, a check box beside a name). It handles:
//!
//! - **Layout**: rows-first or columns-first flow, fixed or automatic column
//!   count, right-to-left mirroring
//! - **Selection**: none/single/browse/multiple modes, ctrl-toggle,
//!   shift-range and rubber-band selection with edge autoscroll
//! - **Keyboard navigation**: arrows, pages and ends, with cell focus
//! - **Drag and drop**: drag detection, drag icons and drop target resolution
//! - **Interactive search**: type to find, Up/Down between matches
//!
//! The grid is headless. The host feeds it [`GridEvent`]s, drives its clock
//! with [`ItemGrid::tick`], and paints it onto a
//! [`Surface`](horizon_itemgrid_render::Surface).
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use horizon_itemgrid::prelude::*;
//!
//! let store = Arc::new(ListStore::new(vec![ColumnKind::Text]));
//! for name in ["alpha", "beta", "gamma"] {
//!     store.push(vec![name.into()]);
//! }
//!
//! let mut grid = ItemGrid::with_config(
//!     GridConfig::default().with_selection_mode(SelectionMode::Multiple),
//! );
//! let label = grid.attach_cell(TextRenderer::new(), PackSide::Start, false);
//! grid.set_model(Some(store));
//! grid.bind_attribute(label, "text", 0).unwrap();
//! grid.set_viewport(Size::new(320.0, 240.0));
//!
//! grid.select_all();
//! assert_eq!(grid.selected_indices(), vec![0, 1, 2]);
//! ```

pub mod cell;
mod config;
mod error;
pub mod events;
mod grid;
pub mod model;
pub mod prelude;

pub use config::{GridConfig, GridStyle, ItemOrientation, LayoutMode, SelectionMode, TextDirection};
pub use error::{GridError, Result};
pub use events::{
    GridEvent, Key, KeyPressEvent, KeyboardModifiers, MouseButton, MouseMoveEvent,
    MousePressEvent, MouseReleaseEvent, WheelEvent,
};
pub use grid::{
    DragSession, DropPosition, DropRequest, DropTarget, GridPos, ItemGrid, ItemHit, MovementStep,
    SearchEqualFunc, SearchOverlay, SearchPositionFunc,
};

/// Rendering primitives.
pub mod render {
    pub use horizon_itemgrid_render::*;
}
