//! Narration clip lookup for `/audio/<name>` requests.
//!
//! The page table records lowercase filenames, but the clips people drop
//! into the audio directory are not always lowercase. Lookup is a two-step
//! resolution: exact filename first, then a case-insensitive directory scan.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::warn;

/// Last path component of a requested clip name. Blank names and anything
/// containing `..` are rejected.
pub fn sanitize_clip_name(raw: &str) -> Option<&str> {
    let name = raw.rsplit(['/', '\\']).next()?;
    if name.is_empty() || name.contains("..") {
        return None;
    }
    Some(name)
}

/// Resolve `name` in `dir`: exact match, then a case-insensitive scan.
/// Returns the on-disk path.
pub fn resolve_clip(dir: &Path, name: &str) -> Option<PathBuf> {
    let exact = dir.join(name);
    if exact.is_file() {
        return Some(exact);
    }
    let entries = fs::read_dir(dir).ok()?;
    for entry in entries.flatten() {
        let file_name = entry.file_name();
        if file_name.to_string_lossy().eq_ignore_ascii_case(name) {
            return Some(dir.join(file_name));
        }
    }
    None
}

/// Clip filenames in `dir`, sorted.
pub fn list_clips(dir: &Path) -> Result<Vec<String>, String> {
    let entries =
        fs::read_dir(dir).map_err(|e| format!("cannot read {}: {e}", dir.display()))?;
    let mut names: Vec<String> = entries
        .flatten()
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    Ok(names)
}

/// Warn-level diagnostics for a missed clip, listing what the directory
/// actually holds so the operator can spot the mismatch.
pub fn log_missing_clip(dir: &Path, name: &str) {
    warn!("audio clip not found: {name}");
    match list_clips(dir) {
        Ok(files) if !files.is_empty() => {
            warn!("  files in {}: {}", dir.display(), files.join(", "));
        }
        _ => {
            warn!("  audio directory missing or empty: {}", dir.display());
        }
    }
}
