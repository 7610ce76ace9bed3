// src/config/options.rs
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use super::consts::*;
use crate::error::{Result, ScrapeError};

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AppOptions {
    pub scrape: ScrapeOptions,
    pub export: ExportOptions,
    pub log_level: String,
    pub log_file: Option<PathBuf>,
}

impl Default for AppOptions {
    fn default() -> Self {
        Self {
            scrape: ScrapeOptions::default(),
            export: ExportOptions::default(),
            log_level: s!(DEFAULT_LOG_LEVEL),
            log_file: None,
        }
    }
}

impl AppOptions {
    /// Read a TOML options file. Missing file → defaults; unreadable or malformed → error.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = fs::read_to_string(path).map_err(|e| ScrapeError::io(path, e))?;
        Self::from_toml(&text).map_err(|source| ScrapeError::Config {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_toml(text: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(text)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ScrapeOptions {
    /// Skip a container whose link was already seen earlier in the same document.
    pub dedupe_urls: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ExportOptions {
    pub out_path: PathBuf,
    pub pretty: bool,
    /// Spaces per level when pretty; 0 = tabs.
    pub indent: usize,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            out_path: PathBuf::from(DEFAULT_OUT_DIR).join(DEFAULT_FILE),
            pretty: true,
            indent: DEFAULT_INDENT,
        }
    }
}

impl ExportOptions {
    pub fn indent_bytes(&self) -> Vec<u8> {
        if self.indent == 0 {
            b"\t".to_vec()
        } else {
            vec![b' '; self.indent]
        }
    }
}
