//! Rendering primitives for Horizon ItemGrid.
//!
//! The item grid is headless: it computes geometry and issues drawing calls
//! against a host-provided [`Surface`]. This crate holds what both sides share:
//!
//! - **Geometry**: [`Point`], [`Size`], [`Rect`] and [`Color`]
//! - **Surfaces**: the [`Surface`] trait and the [`RecordingSurface`] used for
//!   drag icons and tests
//! - **Damage tracking**: [`DamageTracker`] for partial repaint
//!
//! # Example
//!
//! ```
//! use horizon_itemgrid_render::{Color, RecordingSurface, Rect, Surface};
//!
//! let mut surface = RecordingSurface::new();
//! surface.translate(4.0, 4.0);
//! surface.fill_rect(Rect::new(0.0, 0.0, 10.0, 10.0), Color::WHITE).unwrap();
//! assert_eq!(surface.bounds(), Some(Rect::new(4.0, 4.0, 10.0, 10.0)));
//! ```

pub mod damage;
mod error;
pub mod logging;
pub mod surface;
mod types;

pub use damage::DamageTracker;
pub use error::{RenderError, RenderResult};
pub use surface::{PaintOp, RecordedOp, RecordingSurface, Surface};
pub use types::{Color, Point, Rect, Size};
