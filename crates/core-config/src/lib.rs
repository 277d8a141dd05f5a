//! Configuration loading and parsing.
//!
//! Looks for `jot.toml` in the working directory, then the platform config
//! directory. Unknown fields are ignored and a parse failure falls back to
//! defaults, so a broken config never prevents startup.
//!
//! Recognized keys:
//! * `[editor] line_numbers = true`: initial gutter visibility.
//! * `[scroll] wheel_step = 3`: rows scrolled per wheel event.

use anyhow::Result;
use serde::Deserialize;
use std::{fs, path::PathBuf};
use tracing::info;

#[derive(Debug, Deserialize, Clone)]
pub struct EditorConfig {
    #[serde(default = "EditorConfig::default_line_numbers")]
    pub line_numbers: bool,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            line_numbers: Self::default_line_numbers(),
        }
    }
}

impl EditorConfig {
    const fn default_line_numbers() -> bool {
        true
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ScrollConfig {
    #[serde(default = "ScrollConfig::default_wheel_step")]
    pub wheel_step: usize,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            wheel_step: Self::default_wheel_step(),
        }
    }
}

impl ScrollConfig {
    const fn default_wheel_step() -> usize {
        3
    }
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct Config {
    #[serde(default)]
    pub editor: EditorConfig,
    #[serde(default)]
    pub scroll: ScrollConfig,
}

/// Best-effort config path: working directory first, then the platform
/// config dir.
pub fn discover() -> PathBuf {
    let local = PathBuf::from("jot.toml");
    if local.exists() {
        return local;
    }
    if let Some(dir) = dirs::config_dir() {
        return dir.join("jot").join("jot.toml");
    }
    PathBuf::from("jot.toml")
}

pub fn load_from(path: Option<PathBuf>) -> Result<Config> {
    let path = path.unwrap_or_else(discover);
    match fs::read_to_string(&path) {
        Ok(content) => match toml::from_str::<Config>(&content) {
            Ok(config) => {
                info!(target: "config", file = %path.display(), "config_loaded");
                Ok(config)
            }
            Err(e) => {
                info!(target: "config", file = %path.display(), %e, "config_parse_failed_using_defaults");
                Ok(Config::default())
            }
        },
        Err(_) => Ok(Config::default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_file_missing() {
        let cfg = load_from(Some(PathBuf::from("__nonexistent_jot__.toml"))).unwrap();
        assert!(cfg.editor.line_numbers);
        assert_eq!(cfg.scroll.wheel_step, 3);
    }

    #[test]
    fn parses_recognized_fields() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        fs::write(
            tmp.path(),
            "[editor]\nline_numbers = false\n[scroll]\nwheel_step = 5\n",
        )
        .unwrap();
        let cfg = load_from(Some(tmp.path().to_path_buf())).unwrap();
        assert!(!cfg.editor.line_numbers);
        assert_eq!(cfg.scroll.wheel_step, 5);
    }

    #[test]
    fn unknown_fields_are_tolerated() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        fs::write(tmp.path(), "[future]\nfeature = 1\n[editor]\nline_numbers = false\n").unwrap();
        let cfg = load_from(Some(tmp.path().to_path_buf())).unwrap();
        assert!(!cfg.editor.line_numbers);
    }

    #[test]
    fn malformed_file_falls_back_to_defaults() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        fs::write(tmp.path(), "not [valid toml").unwrap();
        let cfg = load_from(Some(tmp.path().to_path_buf())).unwrap();
        assert!(cfg.editor.line_numbers);
    }
}
