//! Single-line command console: mode-prefixed input, candidate filtering, and
//! Enter dispatch resolution.
//!
//! The console is a pure state machine. It reads the active document's symbol
//! index and the workspace file list to maintain candidates, and resolves key
//! presses into either buffer mutations or a textual command for the command
//! queue. It owns nothing beyond its own input state: it is created when
//! focus moves to the console line and destroyed on Escape or a successful
//! dispatch.
//!
//! Mode is keyed by the first buffer character: `>` command, `:` goto-line,
//! `@` goto-symbol, `#` find; anything else is filename-open.

use core_symbol::SymbolIndex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleMode {
    Command,
    GotoLine,
    GotoSymbol,
    Find,
    OpenFile,
}

/// Outcome of pressing Enter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    /// Submit this command string and close the console.
    Command(String),
    /// Close the console without dispatching.
    Close,
}

#[derive(Debug, Default, Clone)]
pub struct Console {
    buf: Vec<char>,
    cursor: usize,
    candidates: Vec<String>,
    selected: Option<usize>,
}

impl Console {
    pub fn new() -> Self {
        Self::default()
    }

    /// Console pre-filled with `text` (e.g. a mode prefix like `"@"` or a
    /// seeded search), cursor at the end.
    pub fn with_text(text: &str) -> Self {
        let buf: Vec<char> = text.chars().collect();
        let cursor = buf.len();
        Self {
            buf,
            cursor,
            candidates: Vec::new(),
            selected: None,
        }
    }

    pub fn mode(&self) -> ConsoleMode {
        match self.buf.first() {
            Some('>') => ConsoleMode::Command,
            Some(':') => ConsoleMode::GotoLine,
            Some('@') => ConsoleMode::GotoSymbol,
            Some('#') => ConsoleMode::Find,
            _ => ConsoleMode::OpenFile,
        }
    }

    pub fn text(&self) -> String {
        self.buf.iter().collect()
    }

    pub fn chars(&self) -> &[char] {
        &self.buf
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn set_cursor(&mut self, at: usize) {
        self.cursor = at.min(self.buf.len());
    }

    /// Buffer content after the mode prefix; the whole buffer in filename
    /// mode.
    pub fn remainder(&self) -> String {
        match self.mode() {
            ConsoleMode::OpenFile => self.text(),
            _ => self.buf.iter().skip(1).collect(),
        }
    }

    pub fn candidates(&self) -> &[String] {
        &self.candidates
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn selected_candidate(&self) -> Option<&str> {
        self.selected
            .and_then(|i| self.candidates.get(i))
            .map(String::as_str)
    }

    /// Install an externally computed candidate list (symbol jump with
    /// multiple hits pre-fills the console this way).
    pub fn set_candidates(&mut self, candidates: Vec<String>, selected: Option<usize>) {
        self.selected = selected.filter(|&i| i < candidates.len());
        self.candidates = candidates;
    }

    pub fn insert(&mut self, ch: char) {
        self.buf.insert(self.cursor, ch);
        self.cursor += 1;
    }

    pub fn backspace(&mut self) {
        if self.cursor > 0 && !self.buf.is_empty() {
            self.buf.remove(self.cursor - 1);
            self.cursor -= 1;
        }
    }

    pub fn move_left(&mut self) {
        let floor = match self.mode() {
            ConsoleMode::OpenFile => 0,
            _ => 1,
        };
        if self.cursor > floor {
            self.cursor -= 1;
        }
    }

    pub fn move_right(&mut self) {
        if self.cursor < self.buf.len() {
            self.cursor += 1;
        }
    }

    /// Re-derive the candidate list after a buffer change. Only the symbol
    /// and filename modes carry candidates; the others leave the list empty.
    pub fn refilter(&mut self, symbols: &SymbolIndex, files: &[String]) {
        match self.mode() {
            ConsoleMode::GotoSymbol => {
                let keyword = self.remainder();
                if keyword.is_empty() {
                    self.set_candidates(Vec::new(), None);
                    return;
                }
                let mut names: Vec<String> = symbols.qualified_names().collect();
                names.sort();
                let ranked = rank_matches(&keyword, names);
                let selected = if ranked.is_empty() { None } else { Some(0) };
                self.set_candidates(ranked, selected);
            }
            ConsoleMode::OpenFile => {
                let keyword = self.text();
                if keyword.is_empty() {
                    // Show the whole list but select nothing until Tab.
                    self.set_candidates(files.to_vec(), None);
                    return;
                }
                let ranked = rank_matches(&keyword, files.to_vec());
                let selected = if ranked.is_empty() { None } else { Some(0) };
                self.set_candidates(ranked, selected);
            }
            _ => {}
        }
    }

    /// Cycle the selected candidate, wrapping in both directions. No-op when
    /// the list is empty.
    pub fn cycle(&mut self, forward: bool) {
        let n = self.candidates.len();
        if n == 0 {
            return;
        }
        self.selected = Some(match (self.selected, forward) {
            (Some(i), true) => (i + 1) % n,
            (Some(i), false) => (i + n - 1) % n,
            (None, true) => 0,
            (None, false) => n - 1,
        });
    }

    /// Resolve Enter into a command or a silent close.
    ///
    /// * Empty buffer with a selected candidate: open that candidate.
    /// * `:`/`#`/`>` with a non-empty remainder: dispatch the literal buffer.
    /// * `@` or filename mode with a selected candidate: dispatch using the
    ///   candidate's text.
    /// * Anything else closes the console without dispatching.
    pub fn resolve_enter(&self) -> Dispatch {
        let cmd = self.text().trim().to_string();
        if cmd.is_empty() {
            return match self.selected_candidate() {
                Some(c) => Dispatch::Command(format!(">open {c}")),
                None => Dispatch::Close,
            };
        }
        match self.mode() {
            ConsoleMode::Command | ConsoleMode::GotoLine | ConsoleMode::Find => {
                if cmd.chars().count() > 1 {
                    Dispatch::Command(cmd)
                } else {
                    Dispatch::Close
                }
            }
            ConsoleMode::GotoSymbol => match self.selected_candidate() {
                Some(c) => Dispatch::Command(format!("@{c}")),
                None => Dispatch::Close,
            },
            ConsoleMode::OpenFile => match self.selected_candidate() {
                Some(c) => Dispatch::Command(format!(">open {c}")),
                None => Dispatch::Close,
            },
        }
    }
}

/// Case-insensitive substring filter that keeps prefix matches ahead of
/// substring-only matches, stable within each group.
pub fn rank_matches(keyword: &str, names: Vec<String>) -> Vec<String> {
    let needle = keyword.to_lowercase();
    let (prefix, substring): (Vec<String>, Vec<String>) = names
        .into_iter()
        .filter(|n| n.to_lowercase().contains(&needle))
        .partition(|n| n.to_lowercase().starts_with(&needle));
    prefix.into_iter().chain(substring).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_symbol::{Symbol, SymbolIndex, SymbolKind};

    fn sym_index(names: &[(&str, &str)]) -> SymbolIndex {
        let mut idx = SymbolIndex::new();
        for (name, receiver) in names {
            idx.insert(Symbol {
                name: (*name).into(),
                kind: SymbolKind::Func,
                line: 1,
                column: 1,
                receiver: (*receiver).into(),
            });
        }
        idx
    }

    #[test]
    fn mode_from_first_char() {
        assert_eq!(Console::with_text(">save x").mode(), ConsoleMode::Command);
        assert_eq!(Console::with_text(":12").mode(), ConsoleMode::GotoLine);
        assert_eq!(Console::with_text("@foo").mode(), ConsoleMode::GotoSymbol);
        assert_eq!(Console::with_text("#bar").mode(), ConsoleMode::Find);
        assert_eq!(Console::with_text("main.rs").mode(), ConsoleMode::OpenFile);
        assert_eq!(Console::new().mode(), ConsoleMode::OpenFile);
    }

    #[test]
    fn rank_puts_prefix_matches_first_stably() {
        let ranked = rank_matches(
            "re",
            vec![
                "parse_request".into(),
                "reload".into(),
                "prepare".into(),
                "reset".into(),
            ],
        );
        assert_eq!(ranked, vec!["reload", "reset", "parse_request", "prepare"]);
    }

    #[test]
    fn rank_is_case_insensitive() {
        let ranked = rank_matches("han", vec!["Handler".into(), "unhand".into()]);
        assert_eq!(ranked, vec!["Handler", "unhand"]);
    }

    #[test]
    fn symbol_refilter_resets_selection_and_clears_on_miss() {
        let idx = sym_index(&[("Handler", ""), ("handle", "Server"), ("other", "")]);
        let mut c = Console::with_text("@hand");
        c.refilter(&idx, &[]);
        assert_eq!(c.selected(), Some(0));
        assert!(c.candidates().iter().all(|n| n.to_lowercase().contains("hand")));
        // Prefix matches lead
        assert!(c.candidates()[0].to_lowercase().starts_with("hand"));

        let mut miss = Console::with_text("@zzz");
        miss.refilter(&idx, &[]);
        assert!(miss.candidates().is_empty());
        assert_eq!(miss.selected(), None);
    }

    #[test]
    fn filename_refilter_with_empty_buffer_lists_all_unselected() {
        let files = vec!["src/main.rs".to_string(), "README.md".to_string()];
        let mut c = Console::new();
        c.refilter(&SymbolIndex::new(), &files);
        assert_eq!(c.candidates().len(), 2);
        assert_eq!(c.selected(), None);
    }

    #[test]
    fn cycle_wraps_both_directions() {
        let mut c = Console::new();
        c.set_candidates(vec!["a".into(), "b".into(), "c".into()], None);
        c.cycle(true);
        assert_eq!(c.selected(), Some(0));
        c.cycle(false);
        assert_eq!(c.selected(), Some(2));
        c.cycle(true);
        assert_eq!(c.selected(), Some(0));
        // Backward from no selection lands on the last candidate
        let mut d = Console::new();
        d.set_candidates(vec!["a".into(), "b".into()], None);
        d.cycle(false);
        assert_eq!(d.selected(), Some(1));
    }

    #[test]
    fn cycle_on_empty_list_is_noop() {
        let mut c = Console::new();
        c.cycle(true);
        assert_eq!(c.selected(), None);
    }

    #[test]
    fn enter_literal_modes_need_nonempty_remainder() {
        assert_eq!(
            Console::with_text(":42").resolve_enter(),
            Dispatch::Command(":42".into())
        );
        assert_eq!(Console::with_text(":").resolve_enter(), Dispatch::Close);
        assert_eq!(
            Console::with_text("#needle").resolve_enter(),
            Dispatch::Command("#needle".into())
        );
        assert_eq!(Console::with_text(">").resolve_enter(), Dispatch::Close);
    }

    #[test]
    fn enter_symbol_mode_uses_selected_candidate() {
        let idx = sym_index(&[("Handler", ""), ("handle", "Server")]);
        let mut c = Console::with_text("@hand");
        c.refilter(&idx, &[]);
        c.cycle(true); // move off the first candidate
        let expect = format!("@{}", c.selected_candidate().unwrap());
        assert_eq!(c.resolve_enter(), Dispatch::Command(expect));

        let empty = Console::with_text("@zzz");
        assert_eq!(empty.resolve_enter(), Dispatch::Close);
    }

    #[test]
    fn enter_empty_buffer_opens_selected_candidate() {
        let mut c = Console::new();
        c.set_candidates(vec!["src/lib.rs".into()], None);
        assert_eq!(c.resolve_enter(), Dispatch::Close, "nothing selected yet");
        c.cycle(true);
        assert_eq!(
            c.resolve_enter(),
            Dispatch::Command(">open src/lib.rs".into())
        );
    }

    #[test]
    fn editing_keeps_cursor_in_bounds() {
        let mut c = Console::with_text("@ab");
        c.move_left();
        c.move_left();
        c.move_left();
        assert_eq!(c.cursor(), 1, "cursor never crosses the mode prefix");
        c.move_right();
        c.backspace();
        assert_eq!(c.text(), "@b");
        let mut f = Console::with_text("ab");
        f.move_left();
        f.move_left();
        f.move_left();
        assert_eq!(f.cursor(), 0, "filename mode has no prefix floor");
    }
}
