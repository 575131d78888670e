//! Text cell renderer.

use unicode_segmentation::UnicodeSegmentation;

use horizon_itemgrid_render::{Color, Rect, RenderResult, Size, Surface};

use super::renderer::{CellMode, CellProps, CellRenderer, CellState, SizeContext};
use crate::error::{GridError, Result};
use crate::model::{CellValue, ColumnKind, RowId};

/// Renders a label, wrapping at word boundaries when the grid constrains the
/// item width.
///
/// Text is measured on a fixed grid of `char_width` per grapheme cluster and
/// `line_height` per line, which is what a host with a monospace or
/// pre-measured font expects.
///
/// Properties: `text` (text), `editable` (bool), plus the shared ones.
#[derive(Debug, Clone)]
pub struct TextRenderer {
    props: CellProps,
    text: String,
    editable: bool,
    editing: bool,
    char_width: f32,
    line_height: f32,
    color: Color,
    selected_color: Color,
}

impl Default for TextRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TextRenderer {
    /// Default advance per grapheme cluster.
    pub const DEFAULT_CHAR_WIDTH: f32 = 7.0;
    /// Default line height.
    pub const DEFAULT_LINE_HEIGHT: f32 = 16.0;

    /// Create a text renderer with default metrics.
    pub fn new() -> Self {
        Self {
            props: CellProps {
                xpad: 2.0,
                ypad: 2.0,
                ..CellProps::default()
            },
            text: String::new(),
            editable: false,
            editing: false,
            char_width: Self::DEFAULT_CHAR_WIDTH,
            line_height: Self::DEFAULT_LINE_HEIGHT,
            color: Color::BLACK,
            selected_color: Color::WHITE,
        }
    }

    /// Set the text metrics.
    pub fn with_metrics(mut self, char_width: f32, line_height: f32) -> Self {
        self.char_width = char_width.max(0.0);
        self.line_height = line_height.max(0.0);
        self
    }

    /// Set the text colors for normal and selected items.
    pub fn with_colors(mut self, color: Color, selected_color: Color) -> Self {
        self.color = color;
        self.selected_color = selected_color;
        self
    }

    /// Set the text.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Allow in-place editing.
    pub fn with_editable(mut self, editable: bool) -> Self {
        self.editable = editable;
        self
    }

    /// The currently bound text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Whether an edit is in progress.
    pub fn is_editing(&self) -> bool {
        self.editing
    }

    fn measure(&self, s: &str) -> f32 {
        s.graphemes(true).count() as f32 * self.char_width
    }

    /// Break the text into lines no wider than `max_width`.
    ///
    /// Words longer than the limit are split at grapheme boundaries. Explicit
    /// newlines are honored.
    pub fn layout_lines(&self, max_width: Option<f32>) -> Vec<String> {
        let mut lines = Vec::new();
        for paragraph in self.text.split('\n') {
            match max_width {
                Some(limit) if limit > 0.0 => self.wrap_paragraph(paragraph, limit, &mut lines),
                _ => lines.push(paragraph.to_owned()),
            }
        }
        lines
    }

    fn wrap_paragraph(&self, paragraph: &str, limit: f32, lines: &mut Vec<String>) {
        let mut line = String::new();
        for word in paragraph.split_word_bounds() {
            let candidate_width = self.measure(&line) + self.measure(word);
            if candidate_width <= limit {
                line.push_str(word);
                continue;
            }
            if !line.is_empty() {
                lines.push(line.trim_end().to_owned());
                line.clear();
            }
            if word.trim().is_empty() {
                continue;
            }
            for g in word.graphemes(true) {
                if !line.is_empty() && self.measure(&line) + self.char_width > limit {
                    lines.push(std::mem::take(&mut line));
                }
                line.push_str(g);
            }
        }
        if !line.is_empty() || lines.is_empty() {
            lines.push(line.trim_end().to_owned());
        }
    }
}

impl CellRenderer for TextRenderer {
    fn name(&self) -> &'static str {
        "text"
    }

    fn props(&self) -> &CellProps {
        &self.props
    }

    fn props_mut(&mut self) -> &mut CellProps {
        &mut self.props
    }

    fn own_property_kind(&self, name: &str) -> Option<ColumnKind> {
        match name {
            "text" => Some(ColumnKind::Text),
            "editable" => Some(ColumnKind::Bool),
            _ => None,
        }
    }

    fn set_own_property(&mut self, name: &str, value: &CellValue) -> Result<()> {
        match (name, value) {
            ("text", CellValue::None) => self.text.clear(),
            ("text", CellValue::Text(s)) => self.text.clone_from(s),
            ("editable", CellValue::Bool(b)) => self.editable = *b,
            ("text" | "editable", other) => {
                let expected = self.own_property_kind(name).unwrap_or(ColumnKind::Text);
                return Err(GridError::type_mismatch(name, expected, other.kind()));
            }
            _ => return Err(GridError::unknown_property(self.name(), name)),
        }
        Ok(())
    }

    fn preferred_size(&self, ctx: &SizeContext) -> Size {
        let lines = self.layout_lines(ctx.max_width);
        let width = lines
            .iter()
            .map(|l| self.measure(l))
            .fold(0.0_f32, f32::max);
        Size::new(width, lines.len() as f32 * self.line_height)
    }

    fn paint(
        &self,
        surface: &mut dyn Surface,
        content: Rect,
        state: CellState,
    ) -> RenderResult<()> {
        let color = if state.selected {
            self.selected_color
        } else {
            self.color
        };
        let mut y = content.top();
        for line in self.layout_lines(Some(content.width())) {
            if line.is_empty() {
                y += self.line_height;
                continue;
            }
            let width = self.measure(&line);
            let x = content.left() + (content.width() - width).max(0.0) / 2.0;
            surface.draw_text(&line, Rect::new(x, y, width, self.line_height), color)?;
            y += self.line_height;
        }
        Ok(())
    }

    fn mode(&self) -> CellMode {
        if self.editable {
            CellMode::Editable
        } else {
            CellMode::Inert
        }
    }

    fn start_editing(&mut self, _row: RowId, _content: Rect) -> bool {
        if self.editable {
            self.editing = true;
        }
        self.editing
    }

    fn stop_editing(&mut self, _canceled: bool) {
        self.editing = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use horizon_itemgrid_render::RecordingSurface;

    #[test]
    fn test_unwrapped_size() {
        let r = TextRenderer::new().with_text("hello");
        let size = r.preferred_size(&SizeContext::default());
        assert_eq!(size, Size::new(35.0, 16.0));
    }

    #[test]
    fn test_graphemes_measure_as_one() {
        let r = TextRenderer::new().with_text("e\u{301}a");
        assert_eq!(r.preferred_size(&SizeContext::default()).width, 14.0);
    }

    #[test]
    fn test_wraps_at_words() {
        let r = TextRenderer::new().with_text("alpha beta gamma");
        let lines = r.layout_lines(Some(63.0));
        assert_eq!(lines, vec!["alpha", "beta", "gamma"]);
        assert_eq!(r.layout_lines(Some(70.0)), vec!["alpha beta", "gamma"]);

        let size = r.preferred_size(&SizeContext {
            max_width: Some(63.0),
        });
        assert_eq!(size, Size::new(35.0, 48.0));
    }

    #[test]
    fn test_long_word_is_broken() {
        let r = TextRenderer::new().with_text("abcdefghij");
        let lines = r.layout_lines(Some(28.0));
        assert_eq!(lines, vec!["abcd", "efgh", "ij"]);
    }

    #[test]
    fn test_empty_text_has_one_line() {
        let r = TextRenderer::new();
        assert_eq!(
            r.preferred_size(&SizeContext::default()),
            Size::new(0.0, 16.0)
        );
    }

    #[test]
    fn test_set_properties() {
        let mut r = TextRenderer::new();
        r.set_property("text", &CellValue::from("x")).unwrap();
        r.set_property("editable", &CellValue::Bool(true)).unwrap();
        assert_eq!(r.text(), "x");
        assert_eq!(r.mode(), CellMode::Editable);
        assert!(r.set_property("text", &CellValue::Int(3)).is_err());
        assert!(r.set_property("font", &CellValue::None).is_err());
    }

    #[test]
    fn test_paint_centers_lines() {
        let r = TextRenderer::new().with_text("ab");
        let mut surface = RecordingSurface::new();
        r.paint(
            &mut surface,
            Rect::new(0.0, 0.0, 34.0, 16.0),
            CellState::default(),
        )
        .unwrap();
        assert_eq!(surface.ops()[0].op.rect(), Rect::new(10.0, 0.0, 14.0, 16.0));
    }
}
