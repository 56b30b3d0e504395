//! Grapheme width and display-width clipping helpers.

use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthChar;

const TAB_WIDTH: usize = 3;

pub fn grapheme_width(grapheme: &str) -> usize {
    if grapheme.is_empty() {
        return 0;
    }
    if grapheme == "\t" {
        return TAB_WIDTH;
    }

    let mut width = 0;
    for ch in grapheme.chars() {
        if ch == '\t' {
            width += TAB_WIDTH;
            continue;
        }
        width += UnicodeWidthChar::width(ch).unwrap_or(0);
    }
    width
}

pub fn visible_width(input: &str) -> usize {
    input.graphemes(true).map(grapheme_width).sum()
}

/// Clips `line` to at most `width` display columns.
///
/// A wide grapheme that would straddle the boundary is dropped rather than split.
pub fn clip_to_width(line: &str, width: usize) -> String {
    let mut out = String::with_capacity(line.len().min(width * 4));
    let mut used = 0;
    for grapheme in line.graphemes(true) {
        let grapheme_cols = grapheme_width(grapheme);
        if used + grapheme_cols > width {
            break;
        }
        out.push_str(grapheme);
        used += grapheme_cols;
    }
    out
}

/// Clips `line` to `width` display columns and pads the remainder with spaces.
pub fn fit_to_width(line: &str, width: usize) -> String {
    let mut out = clip_to_width(line, width);
    let used = visible_width(&out);
    out.push_str(&" ".repeat(width.saturating_sub(used)));
    out
}
