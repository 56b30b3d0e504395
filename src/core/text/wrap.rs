//! Word wrapping by display width.

use unicode_segmentation::UnicodeSegmentation;

use super::width::{grapheme_width, visible_width};

/// Wraps `text` into lines no wider than `width` columns.
///
/// Explicit newlines are kept. Words longer than `width` are broken at grapheme
/// boundaries. An empty input yields no lines.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    if text.is_empty() {
        return lines;
    }

    for paragraph in text.split('\n') {
        let mut current = String::new();
        let mut current_width = 0;

        for word in paragraph.split_whitespace() {
            let word_width = visible_width(word);
            let gap = usize::from(!current.is_empty());

            if current_width + gap + word_width <= width {
                if gap == 1 {
                    current.push(' ');
                }
                current.push_str(word);
                current_width += gap + word_width;
                continue;
            }

            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
                current_width = 0;
            }

            if word_width <= width {
                current.push_str(word);
                current_width = word_width;
                continue;
            }

            for grapheme in word.graphemes(true) {
                let cols = grapheme_width(grapheme);
                if current_width + cols > width && !current.is_empty() {
                    lines.push(std::mem::take(&mut current));
                    current_width = 0;
                }
                current.push_str(grapheme);
                current_width += cols;
            }
        }

        lines.push(current);
    }

    lines
}
