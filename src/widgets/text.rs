//! Text item view.

use crate::core::component::{Component, ItemView, LayoutParams};
use crate::core::text::width::fit_to_width;
use crate::core::text::wrap::wrap_text;

/// Word-wrapped text with horizontal and vertical padding.
pub struct TextView {
    text: String,
    padding_x: usize,
    padding_y: usize,
    layout_params: Option<LayoutParams>,
    cached_text: Option<String>,
    cached_width: Option<usize>,
    cached_lines: Option<Vec<String>>,
}

impl TextView {
    pub fn new(text: impl Into<String>) -> Self {
        Self::with_padding(text, 0, 0)
    }

    pub fn with_padding(text: impl Into<String>, padding_x: usize, padding_y: usize) -> Self {
        Self {
            text: text.into(),
            padding_x,
            padding_y,
            layout_params: None,
            cached_text: None,
            cached_width: None,
            cached_lines: None,
        }
    }

    pub fn with_layout_params(mut self, params: LayoutParams) -> Self {
        self.layout_params = Some(params);
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.invalidate();
    }

    pub fn set_padding(&mut self, padding_x: usize, padding_y: usize) {
        self.padding_x = padding_x;
        self.padding_y = padding_y;
        self.invalidate();
    }

    fn render_lines(&mut self, width: usize) -> Vec<String> {
        if let Some(cached) = self.cached_lines.as_ref() {
            if self.cached_text.as_deref() == Some(&self.text) && self.cached_width == Some(width) {
                return cached.clone();
            }
        }

        let lines = if self.text.trim().is_empty() {
            Vec::new()
        } else {
            let content_width = width.saturating_sub(self.padding_x * 2).max(1);
            let margin = " ".repeat(self.padding_x);
            let blank = " ".repeat(width);

            let mut lines = vec![blank.clone(); self.padding_y];
            for line in wrap_text(&self.text, content_width) {
                lines.push(fit_to_width(&format!("{margin}{line}"), width));
            }
            lines.extend(std::iter::repeat(blank).take(self.padding_y));
            lines
        };

        self.cached_text = Some(self.text.clone());
        self.cached_width = Some(width);
        self.cached_lines = Some(lines.clone());
        lines
    }
}

impl Component for TextView {
    fn render(&mut self, width: usize) -> Vec<String> {
        self.render_lines(width)
    }

    fn invalidate(&mut self) {
        self.cached_text = None;
        self.cached_width = None;
        self.cached_lines = None;
    }
}

impl ItemView for TextView {
    fn layout_params(&self) -> Option<LayoutParams> {
        self.layout_params
    }
}
