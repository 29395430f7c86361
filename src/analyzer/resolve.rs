//! Import specifier resolution.
//!
//! Only relative (`./`, `../`) and alias-prefixed (`@/`) specifiers are
//! resolved; bare package imports denote edges leaving the project and are
//! dropped. Resolution is purely lexical against the set of scanned paths —
//! no disk access happens here.

use std::collections::HashMap;

/// Extension/index suffixes tried, in order, after the exact path.
pub const RESOLUTION_SUFFIXES: &[&str] = &[
    ".ts",
    ".tsx",
    ".js",
    ".jsx",
    "/index.ts",
    "/index.tsx",
    "/index.js",
];

/// Resolve `origin` as written in `importer` to a known node id.
///
/// `paths` maps normalized relative paths to node ids. Returns `None` for
/// bare specifiers and for anything that matches no scanned file.
pub fn resolve_specifier(
    importer: &str,
    origin: &str,
    paths: &HashMap<String, String>,
    alias_prefixes: &[String],
    alias_root: &str,
) -> Option<String> {
    let base = if origin.starts_with('.') {
        let dir = parent_dir(importer);
        join_normalize(dir, origin)
    } else if let Some(rest) = strip_alias(origin, alias_prefixes) {
        join_normalize(alias_root, rest)
    } else {
        return None;
    };

    if let Some(id) = paths.get(&base) {
        return Some(id.clone());
    }
    for suffix in RESOLUTION_SUFFIXES {
        if let Some(id) = paths.get(&format!("{base}{suffix}")) {
            return Some(id.clone());
        }
    }
    None
}

fn strip_alias<'a>(origin: &'a str, alias_prefixes: &[String]) -> Option<&'a str> {
    alias_prefixes
        .iter()
        .find_map(|prefix| origin.strip_prefix(prefix.as_str()))
}

fn parent_dir(path: &str) -> &str {
    match path.rfind('/') {
        Some(idx) => &path[..idx],
        None => "",
    }
}

/// Lexically join `base` and `rel`, collapsing `.` and `..` segments.
fn join_normalize(base: &str, rel: &str) -> String {
    let mut stack: Vec<&str> = base.split('/').filter(|s| !s.is_empty()).collect();
    for seg in rel.split('/') {
        match seg {
            "" | "." => {}
            ".." => {
                stack.pop();
            }
            other => stack.push(other),
        }
    }
    stack.join("/")
}
