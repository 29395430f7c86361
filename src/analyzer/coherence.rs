//! Coherence analysis: graph-level findings and the 0–100 score.
//!
//! Cycle detection is a plain depth-first walk with a recursion-stack set.
//! Revisiting a node still on the stack records the stack slice from that
//! node to the top as one cycle, so overlapping cycles are reported as found
//! rather than reduced to a minimal basis — callers depend on that
//! granularity.

use std::collections::{HashMap, HashSet};

use uuid::Uuid;

use crate::config::TangramConfig;
use crate::types::{CoherenceIssue, IssueKind, NodeKind, Severity};

use super::graph::Graph;

/// Findings plus the aggregate score.
#[derive(Debug, Clone)]
pub struct CoherenceReport {
    pub issues: Vec<CoherenceIssue>,
    pub score: u8,
}

pub fn analyze(graph: &Graph, config: &TangramConfig) -> CoherenceReport {
    let mut issues = Vec::new();
    detect_cycles(graph, &mut issues);
    detect_unused_exports(graph, &mut issues);
    detect_orphans(graph, &mut issues);
    detect_god_objects(graph, config.graph.god_object_threshold, &mut issues);

    let score = coherence_score(&issues);
    CoherenceReport { issues, score }
}

/// Start at 100, subtract a fixed penalty per issue by severity, clamp to
/// [0, 100].
pub fn coherence_score(issues: &[CoherenceIssue]) -> u8 {
    let penalty: u32 = issues.iter().map(|i| i.severity.penalty()).sum();
    100u32.saturating_sub(penalty).min(100) as u8
}

fn issue(
    kind: IssueKind,
    severity: Severity,
    node_ids: Vec<String>,
    message: String,
    suggestion: Option<String>,
) -> CoherenceIssue {
    CoherenceIssue {
        id: Uuid::new_v4().to_string(),
        kind,
        severity,
        node_ids,
        message,
        suggestion,
    }
}

// ---------------------------------------------------------------------------
// Cycles
// ---------------------------------------------------------------------------

struct DfsState<'a> {
    adj: &'a HashMap<&'a str, Vec<&'a str>>,
    visited: HashSet<String>,
    stack: Vec<String>,
    on_stack: HashSet<String>,
    cycles: Vec<Vec<String>>,
}

pub fn find_cycles(graph: &Graph) -> Vec<Vec<String>> {
    let mut adj: HashMap<&str, Vec<&str>> = HashMap::new();
    for edge in &graph.edges {
        adj.entry(edge.source.as_str())
            .or_default()
            .push(edge.target.as_str());
    }

    let mut roots: Vec<&str> = adj.keys().copied().collect();
    roots.sort();

    let mut state = DfsState {
        adj: &adj,
        visited: HashSet::new(),
        stack: Vec::new(),
        on_stack: HashSet::new(),
        cycles: Vec::new(),
    };

    for root in roots {
        if !state.visited.contains(root) {
            dfs(root, &mut state);
        }
    }

    state.cycles
}

fn dfs(node: &str, state: &mut DfsState<'_>) {
    state.visited.insert(node.to_string());
    state.stack.push(node.to_string());
    state.on_stack.insert(node.to_string());

    if let Some(neighbors) = state.adj.get(node) {
        // Clone: the recursion below needs &mut state
        let neighbors: Vec<String> = neighbors.iter().map(|s| s.to_string()).collect();
        for next in neighbors {
            if state.on_stack.contains(&next) {
                let pos = state
                    .stack
                    .iter()
                    .position(|n| *n == next)
                    .expect("on_stack member must be on the stack");
                state.cycles.push(state.stack[pos..].to_vec());
            } else if !state.visited.contains(&next) {
                dfs(&next, state);
            }
        }
    }

    state.stack.pop();
    state.on_stack.remove(node);
}

fn detect_cycles(graph: &Graph, issues: &mut Vec<CoherenceIssue>) {
    for cycle in find_cycles(graph) {
        let display: Vec<&str> = cycle
            .iter()
            .map(|id| graph.node(id).map(|n| n.path.as_str()).unwrap_or(id))
            .collect();
        let severity = if cycle.len() >= 2 {
            Severity::Critical
        } else {
            Severity::High
        };
        let mut chain = display.join(" -> ");
        chain.push_str(" -> ");
        chain.push_str(display.first().unwrap_or(&""));
        issues.push(issue(
            IssueKind::CircularDependency,
            severity,
            cycle,
            format!("Circular dependency: {chain}"),
            Some("Extract the shared pieces into a module both sides can import".to_string()),
        ));
    }
}

// ---------------------------------------------------------------------------
// Unused exports
// ---------------------------------------------------------------------------

/// Name-based and conservative: an exported non-default symbol is unused when
/// its exact name never appears as an import name in any other file. Name
/// collisions across files produce false negatives, which is acceptable for
/// advisory findings.
fn detect_unused_exports(graph: &Graph, issues: &mut Vec<CoherenceIssue>) {
    let mut imported_by: HashMap<&str, HashSet<&str>> = HashMap::new();
    for node in &graph.nodes {
        for import in &node.imports {
            imported_by
                .entry(import.name.as_str())
                .or_default()
                .insert(node.id.as_str());
        }
    }

    for node in &graph.nodes {
        for export in &node.exports {
            if matches!(export.kind, crate::types::ExportKind::Default) {
                continue;
            }
            let used_elsewhere = imported_by
                .get(export.name.as_str())
                .is_some_and(|users| users.iter().any(|&u| u != node.id));
            if !used_elsewhere {
                issues.push(issue(
                    IssueKind::UnusedExport,
                    Severity::Medium,
                    vec![node.id.clone()],
                    format!(
                        "Export '{}' in {} is never imported",
                        export.name, node.path
                    ),
                    Some(format!(
                        "Remove the export of '{}' or delete the dead code",
                        export.name
                    )),
                ));
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Orphans
// ---------------------------------------------------------------------------

/// Zero incoming and zero outgoing edges. Entry points (api-endpoint nodes)
/// are expected to have no project-internal consumers and are excluded.
fn detect_orphans(graph: &Graph, issues: &mut Vec<CoherenceIssue>) {
    let mut connected: HashSet<&str> = HashSet::new();
    for edge in &graph.edges {
        connected.insert(edge.source.as_str());
        connected.insert(edge.target.as_str());
    }

    for node in &graph.nodes {
        if node.kind == NodeKind::ApiEndpoint {
            continue;
        }
        if !connected.contains(node.id.as_str()) {
            issues.push(issue(
                IssueKind::OrphanedFile,
                Severity::Low,
                vec![node.id.clone()],
                format!("{} has no connections to the rest of the project", node.path),
                Some("Wire the file into the project or remove it".to_string()),
            ));
        }
    }
}

// ---------------------------------------------------------------------------
// God objects
// ---------------------------------------------------------------------------

fn detect_god_objects(graph: &Graph, threshold: u32, issues: &mut Vec<CoherenceIssue>) {
    for node in &graph.nodes {
        let degree = graph.weighted_degree(&node.id);
        if degree > threshold {
            issues.push(issue(
                IssueKind::GodObject,
                Severity::Medium,
                vec![node.id.clone()],
                format!(
                    "{} is coupled to too much of the project (weighted degree {degree})",
                    node.path
                ),
                Some("Split responsibilities into smaller modules".to_string()),
            ));
        }
    }
}
