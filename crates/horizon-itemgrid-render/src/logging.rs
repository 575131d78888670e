//! Log targets for the rendering primitives.
//!
//! The grid's own subsystems log under `horizon_itemgrid_core::logging`
//! targets; this crate only reports misuse of a surface.

/// Target names for log filtering.
pub mod targets {
    /// Paint surface target.
    pub const SURFACE: &str = "horizon_itemgrid_render::surface";
}
