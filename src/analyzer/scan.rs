//! Source file enumeration.
//!
//! Walks the project root, skipping ignored directories and keeping files
//! whose extension marks them as analyzable source. Output order is
//! deterministic (sorted relative paths).

use std::path::{Path, PathBuf};

use globset::{Glob, GlobSet, GlobSetBuilder};
use once_cell::sync::Lazy;
use walkdir::WalkDir;

use crate::config::{DEFAULT_IGNORE_DIRS, SOURCE_EXTENSIONS, TangramConfig};

use super::graph::normalize_path;

static DEFAULT_IGNORE_SET: Lazy<GlobSet> = Lazy::new(|| {
    build_ignore_set(DEFAULT_IGNORE_DIRS.iter().map(|s| s.to_string()))
        .expect("default ignore globs are valid")
});

fn build_ignore_set(dirs: impl Iterator<Item = String>) -> Option<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for dir in dirs {
        let trimmed = dir.trim();
        if trimmed.is_empty() {
            continue;
        }
        match Glob::new(&format!("**/{trimmed}")) {
            Ok(glob) => {
                builder.add(glob);
            }
            Err(err) => tracing::warn!("invalid ignore pattern '{trimmed}': {err}"),
        }
    }
    builder.build().ok()
}

fn ignore_set(config: &TangramConfig) -> GlobSet {
    if config.scan.ignore_dirs.is_empty() {
        return DEFAULT_IGNORE_SET.clone();
    }
    build_ignore_set(config.ignore_dirs().into_iter())
        .unwrap_or_else(|| DEFAULT_IGNORE_SET.clone())
}

fn is_source_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .is_some_and(|e| SOURCE_EXTENSIONS.contains(&e.as_str()))
}

fn is_hidden(name: &str) -> bool {
    name.starts_with('.') && name != "." && name != ".."
}

/// Enumerate candidate source files under `root`, returned as normalized
/// root-relative paths in sorted order.
pub fn scan_files(root: &Path, config: &TangramConfig) -> std::io::Result<Vec<String>> {
    let ignore = ignore_set(config);
    let mut files = Vec::new();

    let walker = WalkDir::new(root).follow_links(false).into_iter();
    for entry in walker.filter_entry(|e| {
        let name = e.file_name().to_string_lossy();
        if e.depth() > 0 && is_hidden(&name) {
            return false;
        }
        let relative = e.path().strip_prefix(root).unwrap_or(e.path());
        !(e.file_type().is_dir() && ignore.is_match(relative))
    }) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                tracing::warn!("scan: {err}");
                continue;
            }
        };
        if !entry.file_type().is_file() || !is_source_file(entry.path()) {
            continue;
        }
        let relative = entry.path().strip_prefix(root).unwrap_or(entry.path());
        files.push(normalize_path(&relative.to_string_lossy()));
    }

    files.sort();
    Ok(files)
}
