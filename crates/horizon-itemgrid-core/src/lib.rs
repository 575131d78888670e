//! Core systems for Horizon ItemGrid.
//!
//! This crate provides the event-loop-facing building blocks the item grid is
//! composed from:
//!
//! - **Signal/Slot System**: Type-safe change notifications ([`Signal`])
//! - **Timers**: One-shot and repeating timers driven by the host clock ([`TimerQueue`])
//! - **Deferred Tasks**: A coalescing idle slot for work such as re-layout ([`DeferredTask`])
//! - **Logging**: `tracing` targets and span names used across the workspace
//!
//! Everything here is single-threaded cooperative: the host's event loop owns
//! the clock and calls into the grid, which in turn polls its timers and idle
//! work. Nothing spawns threads or blocks.
//!
//! # Signal/Slot Example
//!
//! ```
//! use horizon_itemgrid_core::Signal;
//!
//! let selection_changed = Signal::<()>::new();
//! let id = selection_changed.connect(|_| println!("selection changed"));
//! selection_changed.emit(());
//! selection_changed.disconnect(id);
//! ```
//!
//! # Timer Example
//!
//! ```
//! use std::time::{Duration, Instant};
//! use horizon_itemgrid_core::{TimerKind, TimerQueue};
//!
//! let start = Instant::now();
//! let mut timers = TimerQueue::new();
//! let id = timers.start(start, Duration::from_millis(30), TimerKind::Repeating);
//!
//! let fired = timers.process_expired(start + Duration::from_millis(31));
//! assert_eq!(fired, vec![id]);
//! ```

pub mod error;
pub mod logging;
pub mod signal;
pub mod task;
pub mod timer;

pub use error::{CoreError, Result, TimerError};
pub use signal::{ConnectionGuard, ConnectionId, Signal};
pub use task::{DeferredTask, TaskId};
pub use timer::{TimerId, TimerKind, TimerQueue};
