//! Logging facilities for Horizon ItemGrid.
//!
//! Horizon ItemGrid uses the `tracing` crate for instrumentation. Libraries in
//! this workspace never install a subscriber; to see logs, install one in the
//! host application:
//!
//! ```ignore
//! fn main() {
//!     tracing_subscriber::fmt()
//!         .with_env_filter("horizon_itemgrid::layout=debug")
//!         .init();
//! }
//! ```

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Signal/slot system target.
    pub const SIGNAL: &str = "horizon_itemgrid_core::signal";
    /// Timer system target.
    pub const TIMER: &str = "horizon_itemgrid_core::timer";
    /// Deferred task target.
    pub const TASK: &str = "horizon_itemgrid_core::task";
    /// Cell registry and renderer target.
    pub const CELLS: &str = "horizon_itemgrid::cells";
    /// Model synchronisation target.
    pub const MODEL: &str = "horizon_itemgrid::model";
    /// Layout engine target.
    pub const LAYOUT: &str = "horizon_itemgrid::layout";
    /// Selection and rubber band target.
    pub const SELECTION: &str = "horizon_itemgrid::selection";
    /// Keyboard navigation target.
    pub const NAVIGATION: &str = "horizon_itemgrid::navigation";
    /// Drag and drop target.
    pub const DND: &str = "horizon_itemgrid::dnd";
    /// Interactive search target.
    pub const SEARCH: &str = "horizon_itemgrid::search";
    /// Painting target.
    pub const PAINT: &str = "horizon_itemgrid::paint";
    /// Rejected API calls (invalid arguments).
    pub const API: &str = "horizon_itemgrid::api";
}
