// src/file.rs

use std::{
    fs::{self, File},
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};

use crate::aggregate::MatchMap;
use crate::config::consts::DEFAULT_FILE;
use crate::config::options::ExportOptions;
use crate::error::{Result, ScrapeError};

/// Render the match map as JSON text per `export` (pretty/compact, indent).
pub fn to_json_string(export: &ExportOptions, matches: &MatchMap) -> Result<String> {
    let mut buf = Vec::new();
    write_json(&mut buf, export, matches)?;
    // serde_json only emits UTF-8
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

fn write_json<W: Write>(out: W, export: &ExportOptions, matches: &MatchMap) -> Result<()> {
    if export.pretty {
        let indent = export.indent_bytes();
        let mut ser = Serializer::with_formatter(out, PrettyFormatter::with_indent(&indent));
        matches.serialize(&mut ser)?;
    } else {
        serde_json::to_writer(out, matches)?;
    }
    Ok(())
}

/// Write the match map to `export.out_path` (directory hints get the default file name).
/// Returns the final path written to.
pub fn write_export(export: &ExportOptions, matches: &MatchMap) -> Result<PathBuf> {
    let path = resolve_out_path(&export.out_path)?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            ensure_directory(parent)?;
        }
    }

    let file = File::create(&path).map_err(|e| ScrapeError::io(&path, e))?;
    let mut out = BufWriter::new(file);
    write_json(&mut out, export, matches)?;
    out.write_all(b"\n").map_err(|e| ScrapeError::io(&path, e))?;
    out.flush().map_err(|e| ScrapeError::io(&path, e))?;
    Ok(path)
}

/// A path ending in a separator, or an existing directory, gets `DEFAULT_FILE` appended.
pub fn resolve_out_path(p: &Path) -> Result<PathBuf> {
    if p.as_os_str().is_empty() {
        return Ok(PathBuf::from(DEFAULT_FILE));
    }
    if looks_like_dir_hint(p) || p.is_dir() {
        ensure_directory(p)?;
        Ok(p.join(DEFAULT_FILE))
    } else {
        Ok(p.to_path_buf())
    }
}

pub fn ensure_directory(dir: &Path) -> Result<()> {
    if dir.exists() && !dir.is_dir() {
        return Err(ScrapeError::io(
            dir,
            std::io::Error::new(std::io::ErrorKind::AlreadyExists, "path exists but is not a directory"),
        ));
    }
    if !dir.exists() {
        fs::create_dir_all(dir).map_err(|e| ScrapeError::io(dir, e))?;
    }
    Ok(())
}

pub fn looks_like_dir_hint(p: &Path) -> bool {
    let s = p.to_string_lossy();
    s.ends_with('/') || s.ends_with('\\')
}
