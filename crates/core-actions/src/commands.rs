//! Console command parsing and execution.
//!
//! Parsing is pure classification into [`ParsedCommand`]; execution mutates
//! the editor state on the command consumer thread. Failures surface as
//! ephemeral status messages and tracing events, never as process errors:
//! a missing file, an unknown symbol, or a bad line number leaves the
//! document untouched.

use crate::dispatcher::jump_to;
use crate::io_ops::{read_lines, write_lines};
use core_console::Console;
use core_state::{Document, EditorState, Selection};
use core_symbol::SymbolProvider;
use std::path::PathBuf;
use tracing::{error, info};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedCommand {
    Open(PathBuf),
    Save(PathBuf),
    /// `>save` without a path: prompt for one in the console.
    SavePrompt,
    ToggleLineNumber,
    Back,
    Forward,
    GotoLine(i64),
    BadLineNumber,
    GotoSymbol {
        receiver: String,
        name: String,
    },
    Find(String),
    /// Well-formed but empty commands (`>open` with no path, `#` with no
    /// text) are ignored silently.
    Noop,
    Unknown(String),
}

pub struct CommandParser;

impl CommandParser {
    pub fn parse(raw: &str) -> ParsedCommand {
        let s = raw.trim();
        let Some(prefix) = s.chars().next() else {
            return ParsedCommand::Noop;
        };
        let body = &s[prefix.len_utf8()..];
        match prefix {
            '>' => Self::parse_named(body, s),
            ':' => match body.trim().parse::<i64>() {
                Ok(n) => ParsedCommand::GotoLine(n),
                Err(_) => ParsedCommand::BadLineNumber,
            },
            '@' => {
                let body = body.trim();
                if body.is_empty() {
                    return ParsedCommand::Noop;
                }
                let (receiver, name) = match body.split_once('.') {
                    Some((r, n)) => (r.to_string(), n.to_string()),
                    None => (String::new(), body.to_string()),
                };
                ParsedCommand::GotoSymbol { receiver, name }
            }
            '#' => {
                if body.is_empty() {
                    ParsedCommand::Noop
                } else {
                    ParsedCommand::Find(body.to_string())
                }
            }
            _ => ParsedCommand::Unknown(s.to_string()),
        }
    }

    fn parse_named(body: &str, raw: &str) -> ParsedCommand {
        let mut parts = body.splitn(2, ' ');
        let verb = parts.next().unwrap_or("");
        let arg = parts.next().unwrap_or("").trim();
        match verb {
            "open" => {
                if arg.is_empty() {
                    ParsedCommand::Noop
                } else {
                    ParsedCommand::Open(PathBuf::from(arg))
                }
            }
            "save" => {
                if arg.is_empty() {
                    ParsedCommand::SavePrompt
                } else {
                    ParsedCommand::Save(PathBuf::from(arg))
                }
            }
            "linenumber" => ParsedCommand::ToggleLineNumber,
            "back" => ParsedCommand::Back,
            "forward" => ParsedCommand::Forward,
            _ => ParsedCommand::Unknown(raw.to_string()),
        }
    }
}

/// Execute a console command against the editor state. Returns true when the
/// screen needs repainting (commands run outside the input loop's own repaint
/// step, so the caller requests a refresh on true).
pub fn execute(
    raw: &str,
    state: &mut EditorState,
    console: &mut Option<Console>,
    provider: &dyn SymbolProvider,
) -> bool {
    info!(target: "runtime.commands", cmd = raw, "command_received");
    if state.session.is_empty() {
        // Terminal state: the last tab closed while this command was queued.
        return false;
    }
    match CommandParser::parse(raw) {
        ParsedCommand::Open(path) => open(path, state, provider),
        ParsedCommand::Save(path) => save(path, state, provider),
        ParsedCommand::SavePrompt => {
            *console = Some(Console::with_text(">save "));
            true
        }
        ParsedCommand::ToggleLineNumber => {
            state.line_number = !state.line_number;
            // Gutter width changed; re-derive horizontal scroll.
            let (row, col) = (state.doc().row, state.doc().col);
            jump_to(state, row, col);
            true
        }
        ParsedCommand::Back => {
            if let Some(p) = state.doc_mut().pop_back() {
                jump_to(state, p.row, p.col);
            }
            true
        }
        ParsedCommand::Forward => {
            if let Some(p) = state.doc_mut().pop_forward() {
                jump_to(state, p.row, p.col);
            }
            true
        }
        ParsedCommand::GotoLine(n) => {
            let len = state.doc().store.len() as i64;
            let row = if n < 0 { len - 1 } else { (n - 1).clamp(0, len - 1) };
            jump_to(state, row as usize, 0);
            true
        }
        ParsedCommand::BadLineNumber => {
            state.set_status("Invalid line number");
            true
        }
        ParsedCommand::GotoSymbol { receiver, name } => goto_symbol(&receiver, &name, state),
        ParsedCommand::Find(keyword) => find(&keyword, state, console),
        ParsedCommand::Noop => false,
        ParsedCommand::Unknown(cmd) => {
            state.set_status(format!("unknown command: {cmd}"));
            true
        }
    }
}

fn open(path: PathBuf, state: &mut EditorState, provider: &dyn SymbolProvider) -> bool {
    if let Some(i) = state.session.find_path(&path) {
        state.session.switch(i);
        return true;
    }
    match read_lines(&path) {
        Ok(store) => {
            let mut doc = Document::with_store(store, Some(path.clone()));
            doc.symbols = compute_index(provider, &path, &doc.store.to_text(), state);
            state.session.push_tab(doc);
            true
        }
        Err(e) => {
            error!(target: "io", %e, file = %path.display(), "file_open_error");
            state.set_status(format!("{e}"));
            true
        }
    }
}

fn save(path: PathBuf, state: &mut EditorState, provider: &dyn SymbolProvider) -> bool {
    match write_lines(&path, &state.doc().store) {
        Ok(()) => {
            let text = state.doc().store.to_text();
            let idx = compute_index(provider, &path, &text, state);
            let doc = state.doc_mut();
            doc.file_name = Some(path.clone());
            doc.symbols = idx;
            state.set_status(format!("File saved as: {}", path.display()));
        }
        Err(e) => {
            error!(target: "io", %e, file = %path.display(), "file_write_error");
            state.set_status(format!("Failed to save file: {e}"));
        }
    }
    true
}

/// A provider failure yields an empty index plus a status message; editing
/// continues normally.
fn compute_index(
    provider: &dyn SymbolProvider,
    path: &std::path::Path,
    text: &str,
    state: &mut EditorState,
) -> core_symbol::SymbolIndex {
    match provider.index(path, text) {
        Ok(idx) => idx,
        Err(e) => {
            error!(target: "symbols", %e, "symbol_index_failed");
            state.set_status(format!("symbol index failed: {e}"));
            core_symbol::SymbolIndex::new()
        }
    }
}

fn goto_symbol(receiver: &str, name: &str, state: &mut EditorState) -> bool {
    let Some(sym) = state.doc().symbols.resolve(name, receiver) else {
        state.set_status(format!("symbol not found: {name}"));
        return true;
    };
    let (line, column) = (sym.line, sym.column);
    state.doc_mut().record_position();
    jump_to(state, line.saturating_sub(1), column.saturating_sub(1));
    true
}

/// Case-insensitive forward search from the cursor, wrapping once to the
/// start. A hit jumps to the end of the match, selects it, and re-seeds the
/// console for incremental search; a miss restores the console text without
/// moving the cursor.
fn find(keyword: &str, state: &mut EditorState, console: &mut Option<Console>) -> bool {
    let needle: Vec<char> = keyword.chars().map(fold_char).collect();
    if needle.is_empty() {
        return false;
    }
    let len = state.doc().store.len();
    let start_row = state.doc().row;
    let mut row = start_row;
    let mut col = state.doc().col;
    let mut wrapped = false;
    loop {
        if row >= len {
            row = 0;
            col = 0;
            wrapped = true;
        }
        if wrapped && row == start_row {
            // Full circle without a hit: keep console text, no motion.
            *console = Some(Console::with_text(&format!("#{keyword}")));
            return true;
        }
        let hit = state
            .doc()
            .line(row)
            .and_then(|line| find_in_line(line, col, &needle));
        if let Some(i) = hit {
            state.doc_mut().record_position();
            jump_to(state, row, i + needle.len());
            state.doc_mut().set_selection(Selection {
                start_row: row,
                start_col: i,
                end_row: row,
                end_col: i + needle.len(),
            });
            *console = Some(Console::with_text(&format!("#{keyword}")));
            return true;
        }
        row += 1;
        col = 0;
    }
}

fn find_in_line(line: &[char], from: usize, needle: &[char]) -> Option<usize> {
    let from = from.min(line.len());
    if needle.is_empty() || line.len() - from < needle.len() {
        return None;
    }
    (from..=line.len() - needle.len()).find(|&i| {
        line[i..i + needle.len()]
            .iter()
            .zip(needle)
            .all(|(&c, &n)| fold_char(c) == n)
    })
}

/// One-to-one case fold; multi-codepoint lowercase expansions keep their
/// first codepoint so column arithmetic stays aligned.
fn fold_char(c: char) -> char {
    c.to_lowercase().next().unwrap_or(c)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_named_commands() {
        assert_eq!(
            CommandParser::parse(">open src/main.rs"),
            ParsedCommand::Open(PathBuf::from("src/main.rs"))
        );
        assert_eq!(
            CommandParser::parse(">save  out.txt"),
            ParsedCommand::Save(PathBuf::from("out.txt"))
        );
        assert_eq!(CommandParser::parse(">save"), ParsedCommand::SavePrompt);
        assert_eq!(CommandParser::parse(">save "), ParsedCommand::SavePrompt);
        assert_eq!(
            CommandParser::parse(">linenumber"),
            ParsedCommand::ToggleLineNumber
        );
        assert_eq!(CommandParser::parse(">back"), ParsedCommand::Back);
        assert_eq!(CommandParser::parse(">forward"), ParsedCommand::Forward);
        assert_eq!(CommandParser::parse(">open"), ParsedCommand::Noop);
        assert_eq!(
            CommandParser::parse(">frobnicate"),
            ParsedCommand::Unknown(">frobnicate".into())
        );
    }

    #[test]
    fn parses_goto_line() {
        assert_eq!(CommandParser::parse(":12"), ParsedCommand::GotoLine(12));
        assert_eq!(CommandParser::parse(":-1"), ParsedCommand::GotoLine(-1));
        assert_eq!(CommandParser::parse(":abc"), ParsedCommand::BadLineNumber);
    }

    #[test]
    fn parses_symbol_with_receiver() {
        assert_eq!(
            CommandParser::parse("@Conn.close"),
            ParsedCommand::GotoSymbol {
                receiver: "Conn".into(),
                name: "close".into()
            }
        );
        assert_eq!(
            CommandParser::parse("@main"),
            ParsedCommand::GotoSymbol {
                receiver: String::new(),
                name: "main".into()
            }
        );
    }

    #[test]
    fn parses_find_preserving_case() {
        assert_eq!(
            CommandParser::parse("#Needle"),
            ParsedCommand::Find("Needle".into())
        );
    }

    #[test]
    fn find_in_line_is_case_insensitive() {
        let line: Vec<char> = "say Hello world".chars().collect();
        let needle: Vec<char> = "hello".chars().collect();
        assert_eq!(find_in_line(&line, 0, &needle), Some(4));
        assert_eq!(find_in_line(&line, 5, &needle), None);
    }
}
