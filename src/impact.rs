//! Impact analysis: what breaks when a unit is renamed, reshaped, or deleted.
//!
//! Walks the graph's reverse edges to find dependents, then scans each
//! dependent's text line-by-line for usages that match the proposed change.
//! Matching is conservative and token-based; misses are false negatives,
//! never silent corruption.

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::analyzer::graph::Graph;
use crate::analyzer::resolve::resolve_specifier;
use crate::config::TangramConfig;
use crate::error::{EngineError, EngineResult};
use crate::patch::Patch;
use crate::types::{ExportKind, GraphNode};
use crate::workspace::Workspace;

/// Overall risk of applying a change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    pub fn label(&self) -> &'static str {
        match self {
            RiskLevel::Low => "LOW",
            RiskLevel::Medium => "MEDIUM",
            RiskLevel::High => "HIGH",
            RiskLevel::Critical => "CRITICAL",
        }
    }
}

/// The proposed change, shaped by its kind.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "change_kind", rename_all = "kebab-case")]
pub enum ChangeSpec {
    Rename {
        before: String,
        after: String,
    },
    AddField {
        field: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        field_type: Option<String>,
    },
    RemoveField {
        field: String,
    },
    ChangeType {
        field: String,
        before_type: String,
        after_type: String,
    },
    Delete,
}

/// An impact-analysis request against one target node.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Change {
    pub target_node_id: String,
    #[serde(flatten)]
    pub spec: ChangeSpec,
}

/// One dependent unit touched by the change.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AffectedUnit {
    pub node_id: String,
    pub path: String,
    pub reason: String,
    /// 1 = direct dependent, 2 = dependent of a dependent
    pub depth: usize,
}

/// How a matched usage is affected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UsageSeverity {
    /// Will not work after the change
    Breaking,
    /// Possibly needs a follow-up, not mechanically wrong
    Affected,
    /// Breaking but safely auto-fixable
    Fixable,
}

/// A single matched usage line in a dependent file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BreakingUsage {
    pub path: String,
    /// 1-based line number
    pub line: usize,
    /// Trimmed text of the matched line
    pub text: String,
    pub reason: String,
    pub severity: UsageSeverity,
}

/// Full result of an impact-analysis request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImpactResult {
    pub target_node_id: String,
    pub change: Change,
    pub direct_impact: Vec<AffectedUnit>,
    pub transitive_impact: Vec<AffectedUnit>,
    pub breaking_changes: Vec<BreakingUsage>,
    pub suggested_fixes: Vec<Patch>,
    pub risk_level: RiskLevel,
}

/// Analyze the impact of `change` against the current graph.
///
/// The only hard error is an unknown target id — a caller-contract
/// violation. Everything else degrades: unreadable dependents are reported
/// as affected without line detail.
pub fn analyze_change(
    graph: &Graph,
    change: &Change,
    config: &TangramConfig,
    workspace: &dyn Workspace,
) -> EngineResult<ImpactResult> {
    let target = graph
        .node(&change.target_node_id)
        .ok_or_else(|| EngineError::UnknownTarget(change.target_node_id.clone()))?;

    // Direct dependents, deduplicated, with their edge labels for reporting.
    let mut dependent_labels: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
    for edge in graph.dependents(&target.id) {
        dependent_labels
            .entry(edge.source.as_str())
            .or_default()
            .push(edge.label.as_str());
    }

    let mut direct_impact = Vec::new();
    let mut breaking_changes = Vec::new();
    let mut suggested_fixes = Vec::new();

    for (dep_id, labels) in &dependent_labels {
        let Some(dep) = graph.node(dep_id) else {
            continue;
        };
        direct_impact.push(AffectedUnit {
            node_id: dep.id.clone(),
            path: dep.path.clone(),
            reason: format!("uses {} from {}", labels.join(", "), target.path),
            depth: 1,
        });

        match workspace.read_text(Path::new(&dep.path)) {
            Ok(content) => scan_dependent(
                target,
                dep,
                &content,
                &change.spec,
                graph,
                config,
                &mut breaking_changes,
                &mut suggested_fixes,
            ),
            Err(err) => {
                tracing::warn!("impact: cannot read {}: {err}", dep.path);
            }
        }
    }
    direct_impact.sort_by(|a, b| a.path.cmp(&b.path));

    // Second-order impact: dependents of dependents not already counted.
    let direct_ids: HashSet<&str> = dependent_labels.keys().copied().collect();
    let mut transitive_impact = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();
    for dep_id in &direct_ids {
        for edge in graph.dependents(dep_id) {
            let second = edge.source.as_str();
            if second == target.id
                || direct_ids.contains(second)
                || !seen.insert(second.to_string())
            {
                continue;
            }
            if let Some(node) = graph.node(second) {
                let via = graph.node(dep_id).map(|n| n.path.as_str()).unwrap_or(dep_id);
                transitive_impact.push(AffectedUnit {
                    node_id: node.id.clone(),
                    path: node.path.clone(),
                    reason: format!("transitively affected through {via}"),
                    depth: 2,
                });
            }
        }
    }
    transitive_impact.sort_by(|a, b| a.path.cmp(&b.path));

    let risk_level = assess_risk(
        breaking_changes.len(),
        direct_impact.len(),
        matches!(change.spec, ChangeSpec::Delete),
    );

    Ok(ImpactResult {
        target_node_id: target.id.clone(),
        change: change.clone(),
        direct_impact,
        transitive_impact,
        breaking_changes,
        suggested_fixes,
        risk_level,
    })
}

#[allow(clippy::too_many_arguments)]
fn scan_dependent(
    target: &GraphNode,
    dep: &GraphNode,
    content: &str,
    spec: &ChangeSpec,
    graph: &Graph,
    config: &TangramConfig,
    usages: &mut Vec<BreakingUsage>,
    fixes: &mut Vec<Patch>,
) {
    match spec {
        ChangeSpec::Rename { before, after } => {
            for (idx, line) in content.lines().enumerate() {
                if !contains_word(line, before) {
                    continue;
                }
                let trimmed = line.trim().to_string();
                usages.push(BreakingUsage {
                    path: dep.path.clone(),
                    line: idx + 1,
                    text: trimmed.clone(),
                    reason: format!("references '{before}'"),
                    severity: UsageSeverity::Fixable,
                });
                fixes.push(Patch::fix(
                    dep.path.clone(),
                    idx + 1,
                    trimmed.clone(),
                    replace_word(&trimmed, before, after),
                    format!("Rename '{before}' to '{after}'"),
                ));
            }
        }
        ChangeSpec::AddField { field, .. } => {
            let type_names: Vec<&str> = target
                .exports
                .iter()
                .filter(|e| {
                    matches!(e.kind, ExportKind::Interface | ExportKind::Type | ExportKind::Enum)
                })
                .map(|e| e.name.as_str())
                .collect();
            for (idx, line) in content.lines().enumerate() {
                let Some(type_name) = type_names.iter().find(|t| looks_like_literal(line, t))
                else {
                    continue;
                };
                usages.push(BreakingUsage {
                    path: dep.path.clone(),
                    line: idx + 1,
                    text: line.trim().to_string(),
                    reason: format!(
                        "object literal of '{type_name}' may need new field '{field}'"
                    ),
                    severity: UsageSeverity::Affected,
                });
            }
        }
        ChangeSpec::RemoveField { field } => {
            for (idx, line) in content.lines().enumerate() {
                let trimmed = line.trim().to_string();
                if has_dot_access(line, field) {
                    usages.push(BreakingUsage {
                        path: dep.path.clone(),
                        line: idx + 1,
                        text: trimmed.clone(),
                        reason: format!("accesses removed field '.{field}'"),
                        severity: UsageSeverity::Breaking,
                    });
                    fixes.push(Patch::fix(
                        dep.path.clone(),
                        idx + 1,
                        trimmed.clone(),
                        strip_dot_access(&trimmed, field),
                        format!("Remove access to deleted field '{field}'"),
                    ));
                } else if destructures_field(line, field) {
                    // Removing a destructured binding safely needs broader
                    // context, so this is flagged but not auto-fixed.
                    usages.push(BreakingUsage {
                        path: dep.path.clone(),
                        line: idx + 1,
                        text: trimmed,
                        reason: format!("destructures removed field '{field}'"),
                        severity: UsageSeverity::Breaking,
                    });
                }
            }
        }
        ChangeSpec::ChangeType {
            field,
            before_type,
            after_type,
        } => {
            for (idx, line) in content.lines().enumerate() {
                if !has_dot_access(line, field)
                    || !type_conflict(line, before_type, after_type)
                {
                    continue;
                }
                let trimmed = line.trim().to_string();
                usages.push(BreakingUsage {
                    path: dep.path.clone(),
                    line: idx + 1,
                    text: trimmed.clone(),
                    reason: format!(
                        "'.{field}' used in a way that conflicts with {before_type} -> {after_type}"
                    ),
                    severity: UsageSeverity::Breaking,
                });
                // Type migrations always need human judgement: suggested,
                // never auto-fixable.
                if contains_word(&trimmed, before_type) {
                    fixes.push(Patch::suggestion(
                        dep.path.clone(),
                        idx + 1,
                        trimmed.clone(),
                        replace_word(&trimmed, before_type, after_type),
                        format!("Migrate '{field}' from {before_type} to {after_type}"),
                    ));
                }
            }
        }
        ChangeSpec::Delete => {
            let paths: std::collections::HashMap<String, String> = graph
                .nodes
                .iter()
                .map(|n| (n.path.clone(), n.id.clone()))
                .collect();
            let alias_prefixes = config.alias_prefixes();
            let mut seen_lines = HashSet::new();
            for import in &dep.imports {
                let resolved = resolve_specifier(
                    &dep.path,
                    &import.origin,
                    &paths,
                    &alias_prefixes,
                    config.alias_root(),
                );
                if resolved.as_deref() != Some(target.id.as_str())
                    || !seen_lines.insert(import.line)
                {
                    continue;
                }
                let trimmed = content
                    .lines()
                    .nth(import.line - 1)
                    .unwrap_or_default()
                    .trim()
                    .to_string();
                usages.push(BreakingUsage {
                    path: dep.path.clone(),
                    line: import.line,
                    text: trimmed.clone(),
                    reason: format!("imports deleted unit {}", target.display_name),
                    severity: UsageSeverity::Breaking,
                });
                fixes.push(Patch::fix(
                    dep.path.clone(),
                    import.line,
                    trimmed,
                    String::new(),
                    format!("Remove import of deleted unit '{}'", target.display_name),
                ));
            }
        }
    }
}

/// Risk level from breaking/direct counts, per the fixed thresholds.
fn assess_risk(breaking: usize, direct: usize, is_delete: bool) -> RiskLevel {
    if breaking > 5 || (is_delete && direct > 3) {
        RiskLevel::Critical
    } else if breaking > 0 || direct > 10 {
        RiskLevel::High
    } else if direct > 5 {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    }
}

// ---------------------------------------------------------------------------
// Token matching helpers
// ---------------------------------------------------------------------------

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '$'
}

/// Whole-word containment: `token` bounded by non-identifier characters.
pub(crate) fn contains_word(line: &str, token: &str) -> bool {
    find_word(line, token, 0).is_some()
}

fn find_word(line: &str, token: &str, from: usize) -> Option<usize> {
    if token.is_empty() {
        return None;
    }
    let mut start = from;
    while let Some(rel) = line[start..].find(token) {
        let pos = start + rel;
        let before_ok = pos == 0
            || !line[..pos].chars().next_back().is_some_and(is_ident_char);
        let end = pos + token.len();
        let after_ok = end >= line.len()
            || !line[end..].chars().next().is_some_and(is_ident_char);
        if before_ok && after_ok {
            return Some(pos);
        }
        start = pos + token.len();
    }
    None
}

/// Replace every whole-word occurrence of `from` with `to`.
pub(crate) fn replace_word(line: &str, from: &str, to: &str) -> String {
    let mut out = String::with_capacity(line.len());
    let mut cursor = 0;
    while let Some(pos) = find_word(line, from, cursor) {
        out.push_str(&line[cursor..pos]);
        out.push_str(to);
        cursor = pos + from.len();
    }
    out.push_str(&line[cursor..]);
    out
}

/// `.field` access with an identifier boundary after the field name.
fn has_dot_access(line: &str, field: &str) -> bool {
    let needle = format!(".{field}");
    let mut start = 0;
    while let Some(rel) = line[start..].find(&needle) {
        let pos = start + rel;
        let end = pos + needle.len();
        let after_ok = end >= line.len()
            || !line[end..].chars().next().is_some_and(is_ident_char);
        // `..field` is a spread, not an access
        let before_ok = pos == 0 || !line[..pos].ends_with('.');
        if after_ok && before_ok {
            return true;
        }
        start = end;
    }
    false
}

/// Remove every `.field` access from the line.
fn strip_dot_access(line: &str, field: &str) -> String {
    let needle = format!(".{field}");
    let mut out = String::with_capacity(line.len());
    let mut cursor = 0;
    while let Some(rel) = line[cursor..].find(&needle) {
        let pos = cursor + rel;
        let end = pos + needle.len();
        let after_ok = end >= line.len()
            || !line[end..].chars().next().is_some_and(is_ident_char);
        if after_ok {
            out.push_str(&line[cursor..pos]);
        } else {
            out.push_str(&line[cursor..end]);
        }
        cursor = end;
    }
    out.push_str(&line[cursor..]);
    out
}

/// Destructuring that binds `field`: `{ ... field ... }` on one line.
fn destructures_field(line: &str, field: &str) -> bool {
    let Some(open) = line.find('{') else {
        return false;
    };
    let Some(close) = line[open..].find('}') else {
        return false;
    };
    contains_word(&line[open..open + close], field)
}

/// A line that looks like an object literal of the given type.
fn looks_like_literal(line: &str, type_name: &str) -> bool {
    if !line.contains('{') {
        return false;
    }
    line.contains(&format!(": {type_name}"))
        || line.contains(&format!("<{type_name}>"))
        || line.contains(&format!("as {type_name}"))
}

/// Heuristic type-conflict test for change-type impact.
fn type_conflict(line: &str, before_type: &str, after_type: &str) -> bool {
    if before_type.contains('|') || after_type.contains('|') {
        return true;
    }
    let string_ward = (before_type == "string") != (after_type == "string");
    if !string_ward {
        return false;
    }
    ["+", "-", "*", "/", "<", ">"]
        .iter()
        .any(|op| line.contains(&format!(" {op} ")))
}
