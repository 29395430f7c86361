//! Line-level patches: generation, transactional application, rollback.
//!
//! Application is transactional per file: whole-file read, all patches for
//! that file applied in memory, whole-file atomic write. A stale patch fails
//! alone; its siblings still apply. Applied patches are retained in an
//! in-memory history solely to support rollback within the current session.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::workspace::Workspace;

/// How far (in lines, each direction) the applier searches for a drifted
/// anchor before declaring a patch stale.
pub const RELOCATION_WINDOW: usize = 5;

/// A single anchored line replacement, deletion, or (for rollback of a
/// deletion) insertion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Patch {
    pub id: String,
    pub path: String,
    /// 1-based anchor; mutated only when the applier fuzzy-relocates
    pub line: usize,
    /// Expected original line text, trimmed. Empty means "insert".
    pub old_text: String,
    /// Replacement text, trimmed. Empty means "delete the line".
    pub new_text: String,
    pub description: String,
    pub auto_fixable: bool,
    #[serde(default)]
    pub applied: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Patch {
    pub fn new(
        path: String,
        line: usize,
        old_text: String,
        new_text: String,
        description: String,
        auto_fixable: bool,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            path,
            line,
            old_text,
            new_text,
            description,
            auto_fixable,
            applied: false,
            error: None,
        }
    }

    /// An auto-fixable patch.
    pub fn fix(
        path: String,
        line: usize,
        old_text: String,
        new_text: String,
        description: String,
    ) -> Self {
        Self::new(path, line, old_text, new_text, description, true)
    }

    /// A suggested change that needs human judgement before applying.
    pub fn suggestion(
        path: String,
        line: usize,
        old_text: String,
        new_text: String,
        description: String,
    ) -> Self {
        Self::new(path, line, old_text, new_text, description, false)
    }

    /// The patch that undoes this one: texts swapped, description flipped.
    /// Keeps the same id so rollback can be traced to the original.
    pub fn inverse(&self) -> Self {
        let description = match self.description.strip_prefix("Rollback: ") {
            Some(original) => original.to_string(),
            None => format!("Rollback: {}", self.description),
        };
        Self {
            id: self.id.clone(),
            path: self.path.clone(),
            line: self.line,
            old_text: self.new_text.clone(),
            new_text: self.old_text.clone(),
            description,
            auto_fixable: self.auto_fixable,
            applied: false,
            error: None,
        }
    }

    fn failed(mut self, error: String) -> Self {
        self.applied = false;
        self.error = Some(error);
        self
    }
}

/// Outcome of one `apply` call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatchApplyResult {
    /// True when every patch applied and no file-level error occurred
    pub success: bool,
    pub applied: Vec<Patch>,
    pub failed: Vec<Patch>,
    pub file_level_errors: Vec<String>,
    pub files_modified: Vec<String>,
}

/// Session-scoped record of applied patches, in chronological order.
/// Rollback should proceed in strict reverse chronological order; the
/// engine does not detect overlapping later edits on its own.
#[derive(Debug, Default)]
pub struct PatchHistory {
    applied: Vec<Patch>,
}

impl PatchHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn applied(&self) -> &[Patch] {
        &self.applied
    }

    fn record(&mut self, patch: Patch) {
        self.applied.push(patch);
    }

    fn remove(&mut self, id: &str) {
        self.applied.retain(|p| p.id != id);
    }
}

/// Apply a patch set: transactional per file, fuzzy relocation within a
/// ±5-line window, per-patch stale failures, per-file read/write failures.
/// Successfully applied patches are recorded in `history` for rollback.
pub fn apply(
    patches: Vec<Patch>,
    workspace: &dyn Workspace,
    history: &mut PatchHistory,
) -> PatchApplyResult {
    let result = apply_inner(patches, workspace);
    for patch in &result.applied {
        history.record(patch.clone());
    }
    result
}

/// Roll back previously applied patches by id: construct inverse patches,
/// run them back through the applier, and drop the originals from history
/// for every inverse that succeeded.
pub fn rollback(
    ids: &[String],
    workspace: &dyn Workspace,
    history: &mut PatchHistory,
) -> PatchApplyResult {
    let mut inverses = Vec::new();
    let mut missing = Vec::new();
    // Reverse chronological order, so the most recent edit is undone first.
    for id in ids {
        match history.applied.iter().rev().find(|p| p.id == *id) {
            Some(patch) => inverses.push(patch.inverse()),
            None => missing.push(format!("patch {id} is not in the apply history")),
        }
    }

    let mut result = apply_inner(inverses, workspace);
    for patch in &result.applied {
        history.remove(&patch.id);
    }
    result.file_level_errors.extend(missing);
    result.success = result.success && result.file_level_errors.is_empty();
    result
}

fn apply_inner(patches: Vec<Patch>, workspace: &dyn Workspace) -> PatchApplyResult {
    let mut by_file: BTreeMap<String, Vec<Patch>> = BTreeMap::new();
    for patch in patches {
        by_file.entry(patch.path.clone()).or_default().push(patch);
    }

    let mut applied = Vec::new();
    let mut failed = Vec::new();
    let mut file_level_errors = Vec::new();
    let mut files_modified = Vec::new();

    for (path, mut file_patches) in by_file {
        let content = match workspace.read_text(Path::new(&path)) {
            Ok(content) => content,
            Err(err) => {
                // File-level failure: every patch for this file fails, the
                // remaining files still proceed.
                file_level_errors.push(format!("{path}: {err}"));
                failed.extend(
                    file_patches
                        .into_iter()
                        .map(|p| p.failed(format!("file unreadable: {err}"))),
                );
                continue;
            }
        };

        let had_trailing_newline = content.ends_with('\n');
        let mut lines: Vec<String> = content.lines().map(|l| l.to_string()).collect();

        // Replacements and deletions run top-down from the highest line so
        // removals do not invalidate the anchors below them; insertions
        // (rollback of deletions) run bottom-up for the same reason.
        file_patches.sort_by(|a, b| match (a.old_text.is_empty(), b.old_text.is_empty()) {
            (false, false) => b.line.cmp(&a.line),
            (true, true) => a.line.cmp(&b.line),
            (false, true) => std::cmp::Ordering::Less,
            (true, false) => std::cmp::Ordering::Greater,
        });

        let mut file_applied = Vec::new();
        for mut patch in file_patches {
            if patch.old_text.is_empty() {
                // Insertion: re-add a previously deleted line at its anchor.
                let idx = (patch.line.saturating_sub(1)).min(lines.len());
                lines.insert(idx, patch.new_text.clone());
                patch.applied = true;
                file_applied.push(patch);
                continue;
            }

            match locate_anchor(&lines, &patch) {
                Some(idx) => {
                    patch.line = idx + 1;
                    if patch.new_text.is_empty() {
                        // Deletion. Keep the raw removed line in old_text so
                        // the inverse insertion restores the exact bytes.
                        patch.old_text = lines.remove(idx);
                    } else {
                        lines[idx] = reindent(&lines[idx], &patch.new_text);
                    }
                    patch.applied = true;
                    file_applied.push(patch);
                }
                None => {
                    let line = patch.line;
                    failed.push(patch.failed(format!(
                        "stale patch: expected text not found within {RELOCATION_WINDOW} lines of line {line}"
                    )));
                }
            }
        }

        if file_applied.is_empty() {
            continue;
        }

        let mut output = lines.join("\n");
        if had_trailing_newline {
            output.push('\n');
        }
        match workspace.write_text(Path::new(&path), &output) {
            Ok(()) => {
                applied.extend(file_applied);
                files_modified.push(path);
            }
            Err(err) => {
                file_level_errors.push(format!("{path}: {err}"));
                failed.extend(
                    file_applied
                        .into_iter()
                        .map(|p| p.failed(format!("file write failed: {err}"))),
                );
            }
        }
    }

    let success = failed.is_empty() && file_level_errors.is_empty();
    PatchApplyResult {
        success,
        applied,
        failed,
        file_level_errors,
        files_modified,
    }
}

/// Verify the anchor line, searching a ±5-line window for an exact trimmed
/// match when the anchor has drifted. Returns the 0-based index to patch.
fn locate_anchor(lines: &[String], patch: &Patch) -> Option<usize> {
    let anchor = patch.line.checked_sub(1)?;
    if anchor < lines.len() && lines[anchor].trim() == patch.old_text {
        return Some(anchor);
    }
    for delta in 1..=RELOCATION_WINDOW {
        if let Some(idx) = anchor.checked_sub(delta)
            && idx < lines.len()
            && lines[idx].trim() == patch.old_text
        {
            return Some(idx);
        }
        let idx = anchor + delta;
        if idx < lines.len() && lines[idx].trim() == patch.old_text {
            return Some(idx);
        }
    }
    None
}

/// Keep the original line's leading and trailing whitespace around the
/// replacement text, so indentation survives the edit.
fn reindent(original: &str, replacement: &str) -> String {
    let trimmed = original.trim();
    let start = original.find(trimmed).unwrap_or(0);
    let end = start + trimmed.len();
    format!("{}{}{}", &original[..start], replacement, &original[end..])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workspace::FsWorkspace;
    use std::fs;

    fn setup(content: &str) -> (tempfile::TempDir, FsWorkspace) {
        let tmp = tempfile::tempdir().expect("tmp");
        fs::create_dir_all(tmp.path().join("src")).expect("mkdir");
        fs::write(tmp.path().join("src/cart.ts"), content).expect("write");
        let ws = FsWorkspace::new(tmp.path());
        (tmp, ws)
    }

    fn read(ws: &FsWorkspace) -> String {
        ws.read_text(Path::new("src/cart.ts")).expect("read")
    }

    #[test]
    fn applies_replacement_preserving_indentation() {
        let (_tmp, ws) = setup("function total() {\n  return sum(UserId);\n}\n");
        let patch = Patch::fix(
            "src/cart.ts".to_string(),
            2,
            "return sum(UserId);".to_string(),
            "return sum(AccountId);".to_string(),
            "Rename 'UserId' to 'AccountId'".to_string(),
        );
        let mut history = PatchHistory::new();
        let result = apply(vec![patch], &ws, &mut history);

        assert!(result.success);
        assert_eq!(result.applied.len(), 1);
        assert_eq!(result.files_modified, vec!["src/cart.ts"]);
        assert_eq!(read(&ws), "function total() {\n  return sum(AccountId);\n}\n");
    }

    #[test]
    fn empty_new_text_deletes_the_line() {
        let (_tmp, ws) = setup("import { gone } from \"./gone\";\nconst x = 1;\n");
        let patch = Patch::fix(
            "src/cart.ts".to_string(),
            1,
            "import { gone } from \"./gone\";".to_string(),
            String::new(),
            "Remove import".to_string(),
        );
        let mut history = PatchHistory::new();
        let result = apply(vec![patch], &ws, &mut history);

        assert!(result.success);
        assert_eq!(read(&ws), "const x = 1;\n");
    }

    #[test]
    fn relocates_within_window_and_updates_line() {
        // Anchor says line 2, actual target drifted to line 4.
        let (_tmp, ws) = setup("const a = 1;\nconst b = 2;\nconst c = 3;\nconst target = 4;\n");
        let patch = Patch::fix(
            "src/cart.ts".to_string(),
            2,
            "const target = 4;".to_string(),
            "const target = 5;".to_string(),
            "bump".to_string(),
        );
        let mut history = PatchHistory::new();
        let result = apply(vec![patch], &ws, &mut history);

        assert!(result.success);
        assert_eq!(result.applied[0].line, 4);
        assert!(read(&ws).contains("const target = 5;"));
        // Unrelated lines untouched.
        assert!(read(&ws).contains("const b = 2;"));
    }

    #[test]
    fn stale_patch_fails_without_corrupting_siblings() {
        let (_tmp, ws) = setup("line one\nline two\nline three\n");
        let stale = Patch::fix(
            "src/cart.ts".to_string(),
            2,
            "this text no longer exists".to_string(),
            "whatever".to_string(),
            "stale".to_string(),
        );
        let good = Patch::fix(
            "src/cart.ts".to_string(),
            3,
            "line three".to_string(),
            "line 3".to_string(),
            "ok".to_string(),
        );
        let mut history = PatchHistory::new();
        let result = apply(vec![stale, good], &ws, &mut history);

        assert!(!result.success);
        assert_eq!(result.applied.len(), 1);
        assert_eq!(result.failed.len(), 1);
        assert!(result.failed[0].error.as_deref().unwrap().contains("stale"));
        assert_eq!(read(&ws), "line one\nline two\nline 3\n");
    }

    #[test]
    fn multiple_patches_one_file_apply_in_descending_order() {
        let (_tmp, ws) = setup("import a from \"./a\";\nimport b from \"./b\";\nconst keep = 1;\n");
        let p1 = Patch::fix(
            "src/cart.ts".to_string(),
            1,
            "import a from \"./a\";".to_string(),
            String::new(),
            "drop a".to_string(),
        );
        let p2 = Patch::fix(
            "src/cart.ts".to_string(),
            2,
            "import b from \"./b\";".to_string(),
            String::new(),
            "drop b".to_string(),
        );
        let mut history = PatchHistory::new();
        let result = apply(vec![p1, p2], &ws, &mut history);

        assert!(result.success);
        assert_eq!(read(&ws), "const keep = 1;\n");
    }

    #[test]
    fn missing_file_is_a_file_level_error() {
        let tmp = tempfile::tempdir().expect("tmp");
        let ws = FsWorkspace::new(tmp.path());
        let patch = Patch::fix(
            "src/nope.ts".to_string(),
            1,
            "x".to_string(),
            "y".to_string(),
            "noop".to_string(),
        );
        let mut history = PatchHistory::new();
        let result = apply(vec![patch], &ws, &mut history);

        assert!(!result.success);
        assert_eq!(result.failed.len(), 1);
        assert_eq!(result.file_level_errors.len(), 1);
        assert!(result.files_modified.is_empty());
    }

    #[test]
    fn rollback_restores_original_bytes() {
        let original = "import { gone } from \"./gone\";\nfunction f() {\n  return UserId;\n}\n";
        let (_tmp, ws) = setup(original);
        let delete = Patch::fix(
            "src/cart.ts".to_string(),
            1,
            "import { gone } from \"./gone\";".to_string(),
            String::new(),
            "Remove import".to_string(),
        );
        let rename = Patch::fix(
            "src/cart.ts".to_string(),
            3,
            "return UserId;".to_string(),
            "return AccountId;".to_string(),
            "Rename".to_string(),
        );

        let mut history = PatchHistory::new();
        let result = apply(vec![delete, rename], &ws, &mut history);
        assert!(result.success);
        assert_ne!(read(&ws), original);

        // Reverse chronological order.
        let ids: Vec<String> = result.applied.iter().rev().map(|p| p.id.clone()).collect();
        let rolled = rollback(&ids, &ws, &mut history);
        assert!(rolled.success, "rollback errors: {:?}", rolled.file_level_errors);
        assert_eq!(read(&ws), original);
        assert!(history.applied().is_empty());
    }

    #[test]
    fn rollback_of_unknown_id_reports_error() {
        let (_tmp, ws) = setup("const x = 1;\n");
        let mut history = PatchHistory::new();
        let result = rollback(&["not-a-real-id".to_string()], &ws, &mut history);
        assert!(!result.success);
        assert_eq!(result.file_level_errors.len(), 1);
    }

    #[test]
    fn inverse_swaps_texts_and_flips_description() {
        let patch = Patch::fix(
            "src/cart.ts".to_string(),
            7,
            "old".to_string(),
            "new".to_string(),
            "Do the thing".to_string(),
        );
        let inverse = patch.inverse();
        assert_eq!(inverse.old_text, "new");
        assert_eq!(inverse.new_text, "old");
        assert_eq!(inverse.description, "Rollback: Do the thing");
        assert_eq!(inverse.inverse().description, "Do the thing");
        assert_eq!(inverse.id, patch.id);
    }
}
