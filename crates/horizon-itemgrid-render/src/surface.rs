//! Paint surfaces.
//!
//! [`Surface`] is the drawing target that cell renderers and the item grid
//! paint onto. It is deliberately small and object-safe so a host can back it
//! with any 2D API. [`RecordingSurface`] is the in-crate implementation: it
//! records every operation in absolute coordinates, which is what drag icons
//! and tests are built from.

use crate::error::{RenderError, RenderResult};
use crate::logging::targets;
use crate::types::{Color, Point, Rect};

/// A 2D drawing target.
///
/// Coordinates passed to drawing methods are relative to the current
/// translation. `save`/`restore` bracket changes to the translation and clip.
pub trait Surface {
    /// Push the current translation and clip.
    fn save(&mut self);

    /// Pop the translation and clip pushed by the matching `save`.
    fn restore(&mut self) -> RenderResult<()>;

    /// Translate subsequent drawing by the given amount.
    fn translate(&mut self, dx: f32, dy: f32);

    /// Intersect the clip with the given rectangle.
    fn clip_rect(&mut self, rect: Rect);

    /// Fill a rectangle with a solid color.
    fn fill_rect(&mut self, rect: Rect, color: Color) -> RenderResult<()>;

    /// Stroke the outline of a rectangle.
    fn stroke_rect(&mut self, rect: Rect, color: Color, width: f32) -> RenderResult<()>;

    /// Draw a run of (already laid out) text inside `rect`.
    fn draw_text(&mut self, text: &str, rect: Rect, color: Color) -> RenderResult<()>;

    /// Draw a named icon scaled into `rect`.
    fn draw_icon(&mut self, name: &str, rect: Rect) -> RenderResult<()>;
}

/// One recorded drawing operation, in absolute coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum PaintOp {
    /// A filled rectangle.
    FillRect { rect: Rect, color: Color },
    /// A stroked rectangle outline.
    StrokeRect { rect: Rect, color: Color, width: f32 },
    /// A text run.
    Text { text: String, rect: Rect, color: Color },
    /// A named icon.
    Icon { name: String, rect: Rect },
}

impl PaintOp {
    /// The rectangle covered by this operation.
    pub fn rect(&self) -> Rect {
        match self {
            PaintOp::FillRect { rect, .. }
            | PaintOp::StrokeRect { rect, .. }
            | PaintOp::Text { rect, .. }
            | PaintOp::Icon { rect, .. } => *rect,
        }
    }

    fn translated(&self, dx: f32, dy: f32) -> PaintOp {
        let mut op = self.clone();
        match &mut op {
            PaintOp::FillRect { rect, .. }
            | PaintOp::StrokeRect { rect, .. }
            | PaintOp::Text { rect, .. }
            | PaintOp::Icon { rect, .. } => *rect = rect.offset(dx, dy),
        }
        op
    }
}

/// A recorded operation together with the clip active when it was issued.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedOp {
    pub op: PaintOp,
    pub clip: Option<Rect>,
}

#[derive(Debug, Clone, Copy, Default)]
struct SurfaceState {
    offset: Point,
    clip: Option<Rect>,
}

/// A [`Surface`] that records operations instead of rasterizing them.
///
/// Operations entirely outside the current clip are dropped.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    ops: Vec<RecordedOp>,
    state: SurfaceState,
    stack: Vec<SurfaceState>,
}

impl RecordingSurface {
    /// Create an empty recording.
    pub fn new() -> Self {
        Self::default()
    }

    /// The recorded operations in issue order.
    pub fn ops(&self) -> &[RecordedOp] {
        &self.ops
    }

    /// Take the recorded operations, leaving the recording empty.
    pub fn take_ops(&mut self) -> Vec<RecordedOp> {
        std::mem::take(&mut self.ops)
    }

    /// Whether nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Bounding box of every recorded operation.
    pub fn bounds(&self) -> Option<Rect> {
        self.ops
            .iter()
            .map(|r| r.op.rect())
            .reduce(|acc, r| acc.union(&r))
    }

    /// Count the recorded text runs equal to `text`.
    pub fn text_count(&self, text: &str) -> usize {
        self.ops
            .iter()
            .filter(|r| matches!(&r.op, PaintOp::Text { text: t, .. } if t == text))
            .count()
    }

    /// Replay the recording onto another surface, offset by `(dx, dy)`.
    pub fn replay(&self, target: &mut dyn Surface, dx: f32, dy: f32) -> RenderResult<()> {
        for recorded in &self.ops {
            target.save();
            if let Some(clip) = recorded.clip {
                target.clip_rect(clip.offset(dx, dy));
            }
            match recorded.op.translated(dx, dy) {
                PaintOp::FillRect { rect, color } => target.fill_rect(rect, color)?,
                PaintOp::StrokeRect { rect, color, width } => {
                    target.stroke_rect(rect, color, width)?
                }
                PaintOp::Text { text, rect, color } => target.draw_text(&text, rect, color)?,
                PaintOp::Icon { name, rect } => target.draw_icon(&name, rect)?,
            }
            target.restore()?;
        }
        Ok(())
    }

    fn record(&mut self, op: PaintOp) -> RenderResult<()> {
        let rect = op.rect();
        if !(rect.left().is_finite()
            && rect.top().is_finite()
            && rect.width().is_finite()
            && rect.height().is_finite())
        {
            return Err(RenderError::NonFiniteRect {
                x: rect.left(),
                y: rect.top(),
                width: rect.width(),
                height: rect.height(),
            });
        }

        let op = op.translated(self.state.offset.x, self.state.offset.y);
        if let Some(clip) = self.state.clip {
            if !op.rect().intersects(&clip) {
                return Ok(());
            }
        }
        self.ops.push(RecordedOp {
            op,
            clip: self.state.clip,
        });
        Ok(())
    }
}

impl Surface for RecordingSurface {
    fn save(&mut self) {
        self.stack.push(self.state);
    }

    fn restore(&mut self) -> RenderResult<()> {
        match self.stack.pop() {
            Some(state) => {
                self.state = state;
                Ok(())
            }
            None => {
                tracing::warn!(target: targets::SURFACE, "unbalanced restore");
                Err(RenderError::UnbalancedRestore)
            }
        }
    }

    fn translate(&mut self, dx: f32, dy: f32) {
        self.state.offset = self.state.offset.offset(dx, dy);
    }

    fn clip_rect(&mut self, rect: Rect) {
        let rect = rect.offset(self.state.offset.x, self.state.offset.y);
        self.state.clip = Some(match self.state.clip {
            Some(existing) => existing.intersect(&rect).unwrap_or(Rect::new(
                rect.left(),
                rect.top(),
                0.0,
                0.0,
            )),
            None => rect,
        });
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) -> RenderResult<()> {
        self.record(PaintOp::FillRect { rect, color })
    }

    fn stroke_rect(&mut self, rect: Rect, color: Color, width: f32) -> RenderResult<()> {
        self.record(PaintOp::StrokeRect { rect, color, width })
    }

    fn draw_text(&mut self, text: &str, rect: Rect, color: Color) -> RenderResult<()> {
        self.record(PaintOp::Text {
            text: text.to_owned(),
            rect,
            color,
        })
    }

    fn draw_icon(&mut self, name: &str, rect: Rect) -> RenderResult<()> {
        self.record(PaintOp::Icon {
            name: name.to_owned(),
            rect,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_translate_is_applied() {
        let mut surface = RecordingSurface::new();
        surface.translate(10.0, 20.0);
        surface
            .fill_rect(Rect::new(1.0, 2.0, 3.0, 4.0), Color::BLACK)
            .unwrap();

        assert_eq!(
            surface.ops()[0].op,
            PaintOp::FillRect {
                rect: Rect::new(11.0, 22.0, 3.0, 4.0),
                color: Color::BLACK
            }
        );
    }

    #[test]
    fn test_save_restore() {
        let mut surface = RecordingSurface::new();
        surface.save();
        surface.translate(5.0, 5.0);
        surface.clip_rect(Rect::new(0.0, 0.0, 10.0, 10.0));
        surface.restore().unwrap();
        surface
            .draw_icon("folder", Rect::new(0.0, 0.0, 16.0, 16.0))
            .unwrap();

        assert_eq!(surface.ops()[0].clip, None);
        assert_eq!(surface.ops()[0].op.rect(), Rect::new(0.0, 0.0, 16.0, 16.0));
        assert_eq!(surface.restore(), Err(RenderError::UnbalancedRestore));
    }

    /// Collects the target of every event.
    struct EventTargets(std::sync::Arc<std::sync::Mutex<Vec<String>>>);

    impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for EventTargets {
        fn on_event(
            &self,
            event: &tracing::Event<'_>,
            _ctx: tracing_subscriber::layer::Context<'_, S>,
        ) {
            if let Ok(mut targets) = self.0.lock() {
                targets.push(event.metadata().target().to_owned());
            }
        }
    }

    #[test]
    fn test_unbalanced_restore_logs_under_surface_target() {
        use tracing_subscriber::layer::SubscriberExt;

        let seen = std::sync::Arc::new(std::sync::Mutex::new(Vec::new()));
        let subscriber = tracing_subscriber::registry().with(EventTargets(seen.clone()));
        let result = tracing::subscriber::with_default(subscriber, || {
            RecordingSurface::new().restore()
        });

        assert_eq!(result, Err(RenderError::UnbalancedRestore));
        assert_eq!(*seen.lock().unwrap(), vec![targets::SURFACE.to_owned()]);
    }

    #[test]
    fn test_clipped_out_ops_dropped() {
        let mut surface = RecordingSurface::new();
        surface.clip_rect(Rect::new(0.0, 0.0, 50.0, 50.0));
        surface
            .draw_text("hidden", Rect::new(60.0, 60.0, 10.0, 10.0), Color::BLACK)
            .unwrap();
        surface
            .draw_text("shown", Rect::new(40.0, 40.0, 20.0, 20.0), Color::BLACK)
            .unwrap();

        assert_eq!(surface.text_count("hidden"), 0);
        assert_eq!(surface.text_count("shown"), 1);
    }

    #[test]
    fn test_non_finite_rejected() {
        let mut surface = RecordingSurface::new();
        let result = surface.fill_rect(Rect::new(f32::NAN, 0.0, 1.0, 1.0), Color::BLACK);
        assert!(matches!(result, Err(RenderError::NonFiniteRect { .. })));
        assert!(surface.is_empty());
    }

    #[test]
    fn test_replay_with_offset() {
        let mut source = RecordingSurface::new();
        source
            .fill_rect(Rect::new(10.0, 10.0, 5.0, 5.0), Color::WHITE)
            .unwrap();
        source
            .draw_text("a", Rect::new(20.0, 10.0, 5.0, 5.0), Color::BLACK)
            .unwrap();
        assert_eq!(source.bounds(), Some(Rect::new(10.0, 10.0, 15.0, 5.0)));

        let mut target = RecordingSurface::new();
        source.replay(&mut target, -10.0, -10.0).unwrap();
        assert_eq!(target.bounds(), Some(Rect::new(0.0, 0.0, 15.0, 5.0)));
    }
}
