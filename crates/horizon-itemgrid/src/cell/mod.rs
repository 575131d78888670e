//! Cells: the renderers an item is composed of.
//!
//! An item shows one row of the model through a stack of cells (typically an
//! icon above a label). Each cell is a [`CellRenderer`] registered in the
//! [`CellRegistry`] with attribute bindings to model columns.
//!
//! Three stock renderers are provided: [`IconRenderer`], [`TextRenderer`]
//! and [`ToggleRenderer`].

mod icon;
mod registry;
mod renderer;
mod text;
mod toggle;

pub use icon::IconRenderer;
pub use registry::{CellDataFunc, CellDescriptor, CellId, CellRegistry, PackSide};
pub use renderer::{CellMode, CellProps, CellRenderer, CellState, SizeContext};
pub use text::TextRenderer;
pub use toggle::ToggleRenderer;
