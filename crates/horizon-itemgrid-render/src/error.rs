//! Error types for the render crate.

use thiserror::Error;

/// Errors that can occur while painting onto a surface.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RenderError {
    /// `restore` was called without a matching `save`.
    #[error("restore called without a matching save")]
    UnbalancedRestore,

    /// A rectangle with NaN or infinite coordinates was submitted.
    #[error("non-finite rectangle: {x}, {y}, {width}x{height}")]
    NonFiniteRect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    },
}

/// Result type for render operations.
pub type RenderResult<T> = Result<T, RenderError>;
