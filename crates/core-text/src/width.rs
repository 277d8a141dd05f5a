//! Column mapping between the three coordinate spaces of a line.
//!
//! 1. Logical column: index into the line's codepoint sequence.
//! 2. Tab-expanded visual column: tabs replaced by spaces to the next multiple
//!    of [`TAB_SIZE`].
//! 3. Screen-width column: like (2) but each codepoint additionally advances
//!    by its terminal display width (2 for East Asian wide glyphs).
//!
//! `column_to_screen_width` and `column_from_screen_width` are mutual inverses
//! for narrow text. A screen position inside a wide glyph's two-cell span maps
//! to that glyph's starting logical column, never past it; the cursor cannot
//! land in the middle of a glyph.
//!
//! All functions are pure and operate on a single line slice. Every display
//! width decision flows through [`char_width`].

use unicode_width::UnicodeWidthChar;

/// Fixed tab stop width in columns.
pub const TAB_SIZE: usize = 4;

/// Terminal cell width of a single codepoint. Tabs are handled by the mapping
/// functions and must not be passed here.
pub fn char_width(c: char) -> usize {
    UnicodeWidthChar::width(c).unwrap_or(1)
}

/// Expand tabs to spaces for display, honoring tab stops measured in screen
/// cells.
pub fn expand_tabs(line: &[char]) -> Vec<char> {
    let mut out = Vec::with_capacity(line.len());
    let mut col = 0usize;
    for &c in line {
        if c == '\t' {
            let spaces = TAB_SIZE - (col % TAB_SIZE);
            out.extend(std::iter::repeat_n(' ', spaces));
            col += spaces;
        } else {
            out.push(c);
            col += char_width(c);
        }
    }
    out
}

/// Logical column to tab-expanded visual column (every non-tab codepoint
/// counts one column).
pub fn column_to_visual(line: &[char], col: usize) -> usize {
    let col = col.min(line.len());
    let mut visual = 0usize;
    for &c in &line[..col] {
        if c == '\t' {
            visual += TAB_SIZE - (visual % TAB_SIZE);
        } else {
            visual += 1;
        }
    }
    visual
}

/// Logical column to screen-width column, accounting for tabs and wide
/// glyphs.
pub fn column_to_screen_width(line: &[char], col: usize) -> usize {
    let col = col.min(line.len());
    let mut screen = 0usize;
    for &c in &line[..col] {
        if c == '\t' {
            screen += TAB_SIZE - (screen % TAB_SIZE);
        } else {
            screen += char_width(c);
        }
    }
    screen
}

/// Screen-width column back to the logical column. Positions that fall inside
/// a glyph's span (a tab's stop run or a wide glyph's second cell) resolve to
/// that glyph's own logical column.
pub fn column_from_screen_width(line: &[char], screen_col: usize) -> usize {
    if screen_col == 0 {
        return 0;
    }
    let mut width = 0usize;
    for (i, &c) in line.iter().enumerate() {
        if c == '\t' {
            width += TAB_SIZE - (width % TAB_SIZE);
        } else {
            width += char_width(c);
        }
        if screen_col < width {
            return i;
        }
    }
    line.len()
}
