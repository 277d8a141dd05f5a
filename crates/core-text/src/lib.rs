//! Line-oriented text storage.
//!
//! A document is a non-empty ordered sequence of [`Line`]s, each an owned
//! vector of Unicode codepoints with no embedded newlines. The store is a
//! growable array addressed by row index: split and merge are plain vector
//! splices, random access is O(1), and removing a row never invalidates the
//! identity of other rows mid-edit.
//!
//! Column indices throughout the workspace are codepoint indices into a line.
//! Conversions to tab-expanded and screen-width columns live in [`width`].

pub mod width;

/// One line of text as a sequence of codepoints. Never contains `'\n'`.
pub type Line = Vec<char>;

/// A (row, column) pair; `col` is a codepoint index in `[0, line_len(row)]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
    pub fn origin() -> Self {
        Self { row: 0, col: 0 }
    }
}

/// Convert a string slice (no newlines expected) to a [`Line`].
pub fn line_from_str(s: &str) -> Line {
    s.chars().collect()
}

/// Convert a [`Line`] back to a `String`.
pub fn line_to_string(line: &[char]) -> String {
    line.iter().collect()
}

/// Index of the first non-whitespace codepoint, or the line length for an
/// all-whitespace line.
pub fn leading_whitespace(line: &[char]) -> usize {
    line.iter()
        .position(|&c| c != ' ' && c != '\t')
        .unwrap_or(line.len())
}

/// Ordered, non-empty collection of lines.
///
/// Invariant: there is always at least one line. An empty buffer is a single
/// empty [`Line`]. Removal re-establishes the invariant rather than leaving
/// the store empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineStore {
    lines: Vec<Line>,
}

impl Default for LineStore {
    fn default() -> Self {
        Self::new()
    }
}

impl LineStore {
    /// A store holding a single empty line.
    pub fn new() -> Self {
        Self {
            lines: vec![Vec::new()],
        }
    }

    /// Build a store from explicit lines. An empty input yields the empty
    /// store.
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let lines: Vec<Line> = lines.into_iter().map(|s| line_from_str(s.as_ref())).collect();
        if lines.is_empty() {
            Self::new()
        } else {
            Self { lines }
        }
    }

    /// Build a store from file-shaped text: split on `'\n'` and guarantee a
    /// trailing empty line, so a saved store ends with exactly one newline.
    pub fn from_source(text: &str) -> Self {
        let mut lines: Vec<Line> = text.split('\n').map(line_from_str).collect();
        match lines.last() {
            Some(last) if last.is_empty() => {}
            _ => lines.push(Vec::new()),
        }
        Self { lines }
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn get(&self, row: usize) -> Option<&Line> {
        self.lines.get(row)
    }

    pub fn get_mut(&mut self, row: usize) -> Option<&mut Line> {
        self.lines.get_mut(row)
    }

    /// Codepoint length of the line at `row`, or 0 past the end.
    pub fn line_len(&self, row: usize) -> usize {
        self.lines.get(row).map(Vec::len).unwrap_or(0)
    }

    pub fn last_row(&self) -> usize {
        self.lines.len() - 1
    }

    pub fn iter(&self) -> impl Iterator<Item = &Line> {
        self.lines.iter()
    }

    /// Replace the line at `row`. No-op past the end.
    pub fn set(&mut self, row: usize, line: Line) {
        if let Some(slot) = self.lines.get_mut(row) {
            *slot = line;
        }
    }

    /// Insert `line` immediately after `row` (clamped to the last row).
    pub fn insert_after(&mut self, row: usize, line: Line) {
        let at = row.min(self.last_row()) + 1;
        self.lines.insert(at, line);
    }

    /// Remove and return the line at `row`. Removing the only line leaves a
    /// single empty line in its place.
    pub fn remove(&mut self, row: usize) -> Option<Line> {
        if row >= self.lines.len() {
            return None;
        }
        let line = self.lines.remove(row);
        if self.lines.is_empty() {
            self.lines.push(Vec::new());
        }
        Some(line)
    }

    /// Split the line at `row`: it keeps `[0, col)` and a new line holding
    /// `[col, end)` is inserted immediately after.
    pub fn split(&mut self, row: usize, col: usize) {
        let Some(line) = self.lines.get_mut(row) else {
            return;
        };
        let col = col.min(line.len());
        let tail: Line = line.split_off(col);
        self.lines.insert(row + 1, tail);
    }

    /// Append the next line's content to `row` and remove the next line.
    /// No-op on the last row.
    pub fn merge_with_next(&mut self, row: usize) {
        if row + 1 >= self.lines.len() {
            return;
        }
        let next = self.lines.remove(row + 1);
        self.lines[row].extend(next);
    }

    /// Serialize the store, joining lines with `'\n'`.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        for (i, line) in self.lines.iter().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            out.extend(line.iter());
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_store_is_single_empty_line() {
        let s = LineStore::new();
        assert_eq!(s.len(), 1);
        assert_eq!(s.line_len(0), 0);
    }

    #[test]
    fn from_source_guarantees_trailing_empty_line() {
        let s = LineStore::from_source("a\nb");
        assert_eq!(s.len(), 3);
        assert_eq!(line_to_string(s.get(1).unwrap()), "b");
        assert_eq!(s.line_len(2), 0);

        let t = LineStore::from_source("a\nb\n");
        assert_eq!(t.len(), 3);
        assert_eq!(t.line_len(2), 0);

        let e = LineStore::from_source("");
        assert_eq!(e.len(), 1);
    }

    #[test]
    fn split_then_merge_round_trips() {
        let mut s = LineStore::from_lines(["hello world"]);
        s.split(0, 5);
        assert_eq!(s.len(), 2);
        assert_eq!(line_to_string(s.get(0).unwrap()), "hello");
        assert_eq!(line_to_string(s.get(1).unwrap()), " world");
        s.merge_with_next(0);
        assert_eq!(s.len(), 1);
        assert_eq!(line_to_string(s.get(0).unwrap()), "hello world");
    }

    #[test]
    fn insert_after_and_remove() {
        let mut s = LineStore::from_lines(["a", "c"]);
        s.insert_after(0, line_from_str("b"));
        assert_eq!(s.to_text(), "a\nb\nc");
        let removed = s.remove(1).unwrap();
        assert_eq!(line_to_string(&removed), "b");
        assert_eq!(s.to_text(), "a\nc");
    }

    #[test]
    fn remove_last_line_restores_invariant() {
        let mut s = LineStore::from_lines(["only"]);
        s.remove(0);
        assert_eq!(s.len(), 1);
        assert_eq!(s.line_len(0), 0);
    }

    #[test]
    fn merge_on_last_row_is_noop() {
        let mut s = LineStore::from_lines(["a", "b"]);
        s.merge_with_next(1);
        assert_eq!(s.to_text(), "a\nb");
    }

    #[test]
    fn leading_whitespace_mixed() {
        assert_eq!(leading_whitespace(&line_from_str("\t  x")), 3);
        assert_eq!(leading_whitespace(&line_from_str("   ")), 3);
        assert_eq!(leading_whitespace(&line_from_str("x")), 0);
    }
}
