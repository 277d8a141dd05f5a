//! Symbol index consumed by navigation and completion.
//!
//! The editor never analyzes syntax itself: it is handed a freshly computed
//! name → occurrences table through [`SymbolProvider`] and only reads it.
//! Positions are 1-based (parser convention); the document layer converts to
//! 0-based rows/columns at the jump site.

use anyhow::Result;
use std::collections::HashMap;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolKind {
    Func,
    Type,
    Var,
    Const,
    Import,
    Field,
}

/// One occurrence of a named symbol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
    pub name: String,
    pub kind: SymbolKind,
    /// 1-based line.
    pub line: usize,
    /// 1-based column.
    pub column: usize,
    /// Receiver type name for methods/fields; empty for free symbols.
    pub receiver: String,
}

impl Symbol {
    /// Display name: `receiver.name` when a receiver exists, else `name`.
    pub fn qualified_name(&self) -> String {
        if self.receiver.is_empty() {
            self.name.clone()
        } else {
            format!("{}.{}", self.receiver, self.name)
        }
    }
}

/// Read-only mapping from symbol name to its occurrences.
#[derive(Debug, Clone, Default)]
pub struct SymbolIndex {
    map: HashMap<String, Vec<Symbol>>,
}

impl SymbolIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_map(map: HashMap<String, Vec<Symbol>>) -> Self {
        Self { map }
    }

    pub fn insert(&mut self, sym: Symbol) {
        self.map.entry(sym.name.clone()).or_default().push(sym);
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// All occurrences of `name` (unqualified).
    pub fn lookup(&self, name: &str) -> &[Symbol] {
        self.map.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Resolve `name` with an exact receiver match; `receiver` is empty for
    /// free symbols.
    pub fn resolve(&self, name: &str, receiver: &str) -> Option<&Symbol> {
        self.lookup(name).iter().find(|s| s.receiver == receiver)
    }

    /// Qualified display names of every occurrence, in index order.
    pub fn qualified_names(&self) -> impl Iterator<Item = String> + '_ {
        self.map.values().flatten().map(Symbol::qualified_name)
    }

    /// First symbol name with the given case-insensitive prefix, used for the
    /// inline end-of-line hint. Requires at least two prefix codepoints.
    pub fn prefix_match(&self, word: &str) -> Option<&str> {
        if word.chars().count() < 2 {
            return None;
        }
        let folded = word.to_lowercase();
        self.map
            .keys()
            .find(|k| k.to_lowercase().starts_with(&folded))
            .map(String::as_str)
    }
}

/// Seam between the editor and whatever computes symbol tables. Implementors
/// return a fresh index for the given file content; the editor snapshots it
/// per document on open and save.
pub trait SymbolProvider: Send + Sync {
    fn index(&self, path: &Path, text: &str) -> Result<SymbolIndex>;
}

/// Provider that indexes nothing; symbol navigation stays inert but every
/// other feature works.
#[derive(Debug, Default)]
pub struct NullSymbols;

impl SymbolProvider for NullSymbols {
    fn index(&self, _path: &Path, _text: &str) -> Result<SymbolIndex> {
        Ok(SymbolIndex::new())
    }
}
