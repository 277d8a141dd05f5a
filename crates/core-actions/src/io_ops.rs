//! File persistence and workspace discovery.
//!
//! Synchronous by design: these run on the command consumer thread, where a
//! blocking read/write only delays the next queued command, never input
//! handling.

use core_text::LineStore;
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("{0}")]
    Io(#[from] std::io::Error),
}

/// Read a file into a line store. The store always carries a trailing empty
/// line so a later save ends the file with exactly one newline.
pub fn read_lines(path: &Path) -> Result<LineStore, PersistError> {
    let content = fs::read_to_string(path)?;
    debug!(target: "io", file = %path.display(), size_bytes = content.len(), "file_read_ok");
    Ok(LineStore::from_source(&content))
}

/// Write the store to `path`, joining lines with `'\n'` and ensuring the file
/// ends with exactly one trailing newline.
pub fn write_lines(path: &Path, store: &LineStore) -> Result<(), PersistError> {
    let mut content = store.to_text();
    if !content.ends_with('\n') {
        content.push('\n');
    }
    fs::write(path, content.as_bytes())?;
    debug!(target: "io", file = %path.display(), lines = store.len(), "file_write_ok");
    Ok(())
}

/// Recursively list workspace files relative to `root`, skipping dot-files
/// and dot-directories. Only available inside a git-rooted workspace (a
/// `.git` directory at the top level); elsewhere returns `None` so the
/// filename-open console stays empty rather than walking arbitrary trees.
pub fn workspace_files(root: &Path) -> Option<Vec<String>> {
    if !root.join(".git").is_dir() {
        return None;
    }
    let mut files = Vec::new();
    collect_files(root, root, &mut files);
    files.sort();
    Some(files)
}

fn collect_files(root: &Path, dir: &Path, out: &mut Vec<String>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let name = entry.file_name();
        let Some(name) = name.to_str() else { continue };
        if name.starts_with('.') {
            continue;
        }
        let path = entry.path();
        if path.is_dir() {
            collect_files(root, &path, out);
        } else if let Ok(rel) = path.strip_prefix(root)
            && let Some(rel) = rel.to_str()
        {
            out.push(rel.to_string());
        }
    }
}

/// Convenience wrapper for the current working directory.
pub fn workspace_files_here() -> Option<Vec<String>> {
    let root = std::env::current_dir().ok()?;
    workspace_files(&root)
}
