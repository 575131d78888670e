//! Timer system for Horizon ItemGrid.
//!
//! Provides one-shot and repeating timers driven by a host-supplied clock.
//! The grid never reads the system clock itself: every operation takes the
//! current `Instant`, which keeps timer behavior deterministic under test.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::time::{Duration, Instant};

use slotmap::{new_key_type, SlotMap};

use crate::error::{Result, TimerError};
use crate::logging::targets;

new_key_type! {
    /// A unique identifier for a timer.
    pub struct TimerId;
}

/// The type of timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerKind {
    /// Fires once after the specified duration.
    OneShot,
    /// Fires repeatedly at the specified interval.
    Repeating,
}

/// Internal timer data.
#[derive(Debug)]
struct TimerData {
    /// When this timer should next fire.
    next_fire: Instant,
    /// The interval for repeating timers.
    interval: Duration,
    /// The kind of timer.
    kind: TimerKind,
}

/// An entry in the timer queue (min-heap by fire time).
#[derive(Debug, Clone, Copy)]
struct TimerQueueEntry {
    id: TimerId,
    fire_time: Instant,
}

impl PartialEq for TimerQueueEntry {
    fn eq(&self, other: &Self) -> bool {
        self.fire_time == other.fire_time
    }
}

impl Eq for TimerQueueEntry {}

impl PartialOrd for TimerQueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TimerQueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse order for min-heap (BinaryHeap is max-heap by default).
        other.fire_time.cmp(&self.fire_time)
    }
}

/// Owns every timer of one grid instance.
///
/// Stale heap entries (for stopped or rescheduled timers) are skipped lazily
/// when they reach the front of the queue.
#[derive(Debug, Default)]
pub struct TimerQueue {
    /// All registered timers.
    timers: SlotMap<TimerId, TimerData>,
    /// Priority queue of pending timer fires (min-heap by fire time).
    queue: BinaryHeap<TimerQueueEntry>,
}

impl TimerQueue {
    /// Create an empty timer queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a timer that first fires `interval` after `now`.
    ///
    /// A repeating timer with a zero interval would fire forever within a
    /// single `process_expired` call, so it is started as one-shot instead.
    pub fn start(&mut self, now: Instant, interval: Duration, kind: TimerKind) -> TimerId {
        let kind = if kind == TimerKind::Repeating && interval.is_zero() {
            tracing::warn!(target: targets::TIMER, "zero-interval repeating timer started as one-shot");
            TimerKind::OneShot
        } else {
            kind
        };
        let next_fire = now + interval;
        let id = self.timers.insert(TimerData {
            next_fire,
            interval,
            kind,
        });
        self.queue.push(TimerQueueEntry {
            id,
            fire_time: next_fire,
        });
        tracing::trace!(target: targets::TIMER, ?id, ?interval, ?kind, "timer started");
        id
    }

    /// Start a repeating timer, rejecting a zero interval.
    pub fn try_start_repeating(&mut self, now: Instant, interval: Duration) -> Result<TimerId> {
        if interval.is_zero() {
            return Err(TimerError::ZeroInterval.into());
        }
        Ok(self.start(now, interval, TimerKind::Repeating))
    }

    /// Stop and remove a timer.
    ///
    /// Returns `Ok(())` if the timer was found and removed, or an error if not found.
    pub fn stop(&mut self, id: TimerId) -> Result<()> {
        match self.timers.remove(id) {
            Some(_) => {
                tracing::trace!(target: targets::TIMER, ?id, "timer stopped");
                Ok(())
            }
            None => Err(TimerError::InvalidTimerId.into()),
        }
    }

    /// Move a timer's next fire to `interval` after `now`, keeping its kind.
    pub fn restart(&mut self, id: TimerId, now: Instant) -> Result<()> {
        let timer = self.timers.get_mut(id).ok_or(TimerError::InvalidTimerId)?;
        timer.next_fire = now + timer.interval;
        self.queue.push(TimerQueueEntry {
            id,
            fire_time: timer.next_fire,
        });
        Ok(())
    }

    /// Check if a timer is currently active.
    pub fn is_active(&self, id: TimerId) -> bool {
        self.timers.contains_key(id)
    }

    /// Number of active timers.
    pub fn len(&self) -> usize {
        self.timers.len()
    }

    /// Whether no timers are active.
    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    /// Get the duration until the next timer fires, if any.
    ///
    /// Returns `None` if there are no active timers.
    pub fn time_until_next(&mut self, now: Instant) -> Option<Duration> {
        self.discard_stale();
        self.queue
            .peek()
            .map(|entry| entry.fire_time.saturating_duration_since(now))
    }

    /// Process all timers that should fire at `now`.
    ///
    /// Returns the fired timers in fire-time order. One-shot timers are
    /// removed; repeating timers are rescheduled one interval after `now`.
    #[tracing::instrument(skip(self), target = "horizon_itemgrid_core::timer", level = "trace")]
    pub fn process_expired(&mut self, now: Instant) -> Vec<TimerId> {
        let mut fired = Vec::new();

        while let Some(entry) = self.queue.peek().copied() {
            if entry.fire_time > now {
                break;
            }
            self.queue.pop();

            let id = entry.id;
            let Some(timer) = self.timers.get_mut(id) else {
                continue;
            };
            if timer.next_fire != entry.fire_time {
                // Superseded by a restart.
                continue;
            }

            fired.push(id);
            match timer.kind {
                TimerKind::OneShot => {
                    self.timers.remove(id);
                }
                TimerKind::Repeating => {
                    timer.next_fire = now + timer.interval;
                    self.queue.push(TimerQueueEntry {
                        id,
                        fire_time: timer.next_fire,
                    });
                }
            }
        }

        if !fired.is_empty() {
            tracing::trace!(target: targets::TIMER, count = fired.len(), "timers fired");
        }
        fired
    }

    /// Stop every timer.
    pub fn clear(&mut self) {
        self.timers.clear();
        self.queue.clear();
    }

    fn discard_stale(&mut self) {
        while let Some(entry) = self.queue.peek() {
            let live = self
                .timers
                .get(entry.id)
                .is_some_and(|t| t.next_fire == entry.fire_time);
            if live {
                break;
            }
            self.queue.pop();
        }
    }
}
