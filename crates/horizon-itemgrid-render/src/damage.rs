//! Damage tracking for partial repaint.
//!
//! [`DamageTracker`] accumulates the regions that changed since the host last
//! painted. The host asks for the combined region, repaints it and clears the
//! tracker. Individual rectangles are kept as well so callers can tell exactly
//! which areas were invalidated.

use crate::types::Rect;

/// Switch to a full repaint once this many fragments have been added.
const MAX_DAMAGE_COUNT: usize = 100;

/// Tracks damaged (dirty) regions that need repainting.
///
/// # Example
///
/// ```
/// use horizon_itemgrid_render::{DamageTracker, Rect};
///
/// let mut tracker = DamageTracker::with_viewport(Rect::new(0.0, 0.0, 400.0, 300.0));
/// tracker.add_damage(Rect::new(10.0, 10.0, 50.0, 30.0));
/// tracker.add_damage(Rect::new(100.0, 100.0, 20.0, 20.0));
///
/// assert_eq!(tracker.damage_region(), Some(Rect::new(10.0, 10.0, 110.0, 110.0)));
/// tracker.clear();
/// assert!(!tracker.has_damage());
/// ```
#[derive(Debug, Clone, Default)]
pub struct DamageTracker {
    /// The accumulated damage region (union of all dirty rects).
    damage: Option<Rect>,
    /// Individual damaged rectangles, clipped to the viewport.
    rects: Vec<Rect>,
    /// Whether a full repaint is needed.
    full_repaint: bool,
    /// Viewport bounds for damage clipping.
    viewport: Option<Rect>,
}

impl DamageTracker {
    /// Create a new damage tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a damage tracker with a specific viewport.
    pub fn with_viewport(viewport: Rect) -> Self {
        Self {
            viewport: Some(viewport),
            ..Self::default()
        }
    }

    /// Set the viewport bounds. Resizing invalidates everything.
    pub fn set_viewport(&mut self, viewport: Rect) {
        if self.viewport != Some(viewport) {
            self.viewport = Some(viewport);
            self.invalidate_all();
        }
    }

    /// Get the viewport bounds.
    pub fn viewport(&self) -> Option<Rect> {
        self.viewport
    }

    /// Add a damaged region that needs repainting.
    ///
    /// Empty rectangles and rectangles outside the viewport are ignored.
    pub fn add_damage(&mut self, rect: Rect) {
        if self.full_repaint || rect.width() <= 0.0 || rect.height() <= 0.0 {
            return;
        }

        let rect = match &self.viewport {
            Some(viewport) => match rect.intersect(viewport) {
                Some(clipped) => clipped,
                None => return,
            },
            None => rect,
        };

        self.rects.push(rect);
        self.damage = Some(match self.damage {
            Some(existing) => existing.union(&rect),
            None => rect,
        });

        if self.rects.len() > MAX_DAMAGE_COUNT {
            self.invalidate_all();
        }
    }

    /// Mark the entire viewport as damaged.
    pub fn invalidate_all(&mut self) {
        self.full_repaint = true;
        self.rects.clear();
        self.damage = self.viewport;
    }

    /// Get the current damage region.
    ///
    /// Returns the viewport if a full repaint is flagged.
    pub fn damage_region(&self) -> Option<Rect> {
        if self.full_repaint {
            self.viewport
        } else {
            self.damage
        }
    }

    /// The individual damaged rectangles. Empty after a full invalidation.
    pub fn rects(&self) -> &[Rect] {
        &self.rects
    }

    /// Check if any damage has been recorded.
    #[inline]
    pub fn has_damage(&self) -> bool {
        self.damage.is_some() || self.full_repaint
    }

    /// Check if a full repaint is needed.
    #[inline]
    pub fn needs_full_repaint(&self) -> bool {
        self.full_repaint
    }

    /// Clear all damage. Call after repainting.
    pub fn clear(&mut self) {
        self.damage = None;
        self.rects.clear();
        self.full_repaint = false;
    }
}
