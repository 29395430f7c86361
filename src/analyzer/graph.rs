//! The owned dependency graph.
//!
//! Nodes are keyed by a stable id derived from the normalized relative path,
//! so edges can reference nodes created in any order. The graph is rebuilt
//! from scratch on every analysis pass; analysis passes take it by shared
//! reference and never mutate it.

use std::collections::HashMap;

use sha2::{Digest, Sha256};

use crate::config::TangramConfig;
use crate::types::{BindingKind, Edge, EdgeKind, ExportKind, GraphNode, Group};

use super::resolve::resolve_specifier;

/// Normalize a path for identity purposes: forward slashes, no leading `./`.
pub fn normalize_path(path: &str) -> String {
    path.replace('\\', "/")
        .trim_start_matches("./")
        .trim_start_matches('/')
        .to_string()
}

/// Deterministic node id: first 12 hex chars of SHA-256 over the normalized
/// relative path. A pure function of the path, stable across re-scans.
pub fn node_id(path: &str) -> String {
    let digest = Sha256::digest(normalize_path(path).as_bytes());
    let mut id = String::with_capacity(12);
    for byte in digest.iter().take(6) {
        id.push_str(&format!("{byte:02x}"));
    }
    id
}

#[derive(Debug, Default)]
pub struct Graph {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<Edge>,
    index: HashMap<String, usize>,
}

impl Graph {
    /// Aggregate extracted nodes into a graph, resolving each import to a
    /// directed edge. Unresolvable and bare imports are silently omitted.
    pub fn build(mut nodes: Vec<GraphNode>, config: &TangramConfig) -> Self {
        let paths: HashMap<String, String> = nodes
            .iter()
            .map(|n| (n.path.clone(), n.id.clone()))
            .collect();

        let alias_prefixes = config.alias_prefixes();
        let alias_root = config.alias_root();

        let mut edges = Vec::new();
        for node in &nodes {
            for import in &node.imports {
                let Some(target) = resolve_specifier(
                    &node.path,
                    &import.origin,
                    &paths,
                    &alias_prefixes,
                    alias_root,
                ) else {
                    continue;
                };
                let kind = match import.binding {
                    BindingKind::TypeOnly => EdgeKind::UsesType,
                    _ => EdgeKind::Imports,
                };
                edges.push(Edge::new(
                    node.id.clone(),
                    target,
                    kind,
                    import.name.clone(),
                ));
            }
        }

        // Declared relationships: a field whose type names another node's
        // exported interface/type/enum yields a `references` edge, unless an
        // import edge for that symbol already exists.
        let mut type_owners: HashMap<&str, &str> = HashMap::new();
        for node in &nodes {
            for export in &node.exports {
                if matches!(
                    export.kind,
                    ExportKind::Interface | ExportKind::Type | ExportKind::Enum
                ) {
                    type_owners
                        .entry(export.name.as_str())
                        .or_insert(node.id.as_str());
                }
            }
        }
        let mut reference_edges = Vec::new();
        for node in &nodes {
            for field in &node.fields {
                let base = base_type_name(&field.ty);
                let Some(&owner) = type_owners.get(base) else {
                    continue;
                };
                if owner == node.id {
                    continue;
                }
                let duplicate = edges.iter().chain(reference_edges.iter()).any(|e| {
                    e.source == node.id && e.target == owner && e.label == base
                });
                if !duplicate {
                    reference_edges.push(Edge::new(
                        node.id.clone(),
                        owner.to_string(),
                        EdgeKind::References,
                        base.to_string(),
                    ));
                }
            }
        }
        edges.extend(reference_edges);

        nodes.sort_by(|a, b| a.path.cmp(&b.path));
        let index = nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (n.id.clone(), i))
            .collect();

        Self {
            nodes,
            edges,
            index,
        }
    }

    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.index.get(id).map(|&i| &self.nodes[i])
    }

    pub fn node_by_path(&self, path: &str) -> Option<&GraphNode> {
        let normalized = normalize_path(path);
        self.nodes.iter().find(|n| n.path == normalized)
    }

    /// Edges pointing at `id` (consumers of the node).
    pub fn dependents(&self, id: &str) -> Vec<&Edge> {
        self.edges.iter().filter(|e| e.target == id).collect()
    }

    /// Edges leaving `id` (providers the node consumes).
    pub fn dependencies(&self, id: &str) -> Vec<&Edge> {
        self.edges.iter().filter(|e| e.source == id).collect()
    }

    /// Sum of in+out edge weights, the god-object metric.
    pub fn weighted_degree(&self, id: &str) -> u32 {
        self.edges
            .iter()
            .filter(|e| e.source == id || e.target == id)
            .map(|e| e.weight)
            .sum()
    }

    /// Directory-segment groups, recomputed per analysis (presentation only).
    pub fn groups(&self) -> Vec<Group> {
        let mut by_dir: HashMap<String, Vec<String>> = HashMap::new();
        for node in &self.nodes {
            let dir = match node.path.rfind('/') {
                Some(idx) => node.path[..idx].to_string(),
                None => ".".to_string(),
            };
            by_dir.entry(dir).or_default().push(node.id.clone());
        }
        let mut groups: Vec<Group> = by_dir
            .into_iter()
            .map(|(name, node_ids)| Group {
                id: node_id(&name),
                name,
                node_ids,
            })
            .collect();
        groups.sort_by(|a, b| a.name.cmp(&b.name));
        groups
    }
}

/// Strip generics, arrays, and unions down to the leading identifier:
/// `CartItem[]` -> `CartItem`, `Map<string, Totals>` -> `Map`.
fn base_type_name(ty: &str) -> &str {
    let t = ty.trim();
    let end = t
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_' || c == '$'))
        .unwrap_or(t.len());
    &t[..end]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::extract::{LexicalExtractor, UnitExtractor};

    fn build(files: &[(&str, &str)]) -> Graph {
        let nodes = files
            .iter()
            .map(|(p, c)| LexicalExtractor.extract(p, c))
            .collect();
        Graph::build(nodes, &TangramConfig::default())
    }

    #[test]
    fn node_id_is_deterministic_and_normalized() {
        assert_eq!(node_id("src/a.ts"), node_id("./src/a.ts"));
        assert_eq!(node_id("src\\a.ts"), node_id("src/a.ts"));
        assert_eq!(node_id("src/a.ts").len(), 12);
        assert_ne!(node_id("src/a.ts"), node_id("src/b.ts"));
    }

    #[test]
    fn builds_edges_from_resolved_imports() {
        let graph = build(&[
            ("src/a.ts", "import { b } from \"./b\";\n"),
            ("src/b.ts", "export const b = 1;\n"),
        ]);
        assert_eq!(graph.edges.len(), 1);
        let edge = &graph.edges[0];
        assert_eq!(edge.source, node_id("src/a.ts"));
        assert_eq!(edge.target, node_id("src/b.ts"));
        assert_eq!(edge.kind, EdgeKind::Imports);
        assert_eq!(edge.label, "b");
    }

    #[test]
    fn type_only_imports_become_uses_type_edges() {
        let graph = build(&[
            ("src/a.ts", "import type { B } from \"./b\";\n"),
            ("src/b.ts", "export interface B { x: number; }\n"),
        ]);
        assert_eq!(graph.edges.len(), 1);
        assert_eq!(graph.edges[0].kind, EdgeKind::UsesType);
        assert_eq!(graph.edges[0].weight, 1);
    }

    #[test]
    fn bare_imports_produce_no_edges() {
        let graph = build(&[("src/a.ts", "import React from \"react\";\n")]);
        assert!(graph.edges.is_empty());
    }

    #[test]
    fn field_type_reference_creates_references_edge() {
        let graph = build(&[
            (
                "src/types/order.ts",
                "export interface Order { items: CartItem[]; }\n",
            ),
            (
                "src/types/cart.ts",
                "export interface CartItem { id: string; }\n",
            ),
        ]);
        let refs: Vec<_> = graph
            .edges
            .iter()
            .filter(|e| e.kind == EdgeKind::References)
            .collect();
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].source, node_id("src/types/order.ts"));
        assert_eq!(refs[0].target, node_id("src/types/cart.ts"));
        assert_eq!(refs[0].label, "CartItem");
    }

    #[test]
    fn rebuild_is_isomorphic_up_to_positions() {
        let files = [
            ("src/a.ts", "import { b } from \"./b\";\n"),
            ("src/b.ts", "export const b = 1;\n"),
        ];
        let g1 = build(&files);
        let g2 = build(&files);
        let ids1: Vec<_> = g1.nodes.iter().map(|n| n.id.clone()).collect();
        let ids2: Vec<_> = g2.nodes.iter().map(|n| n.id.clone()).collect();
        assert_eq!(ids1, ids2);
        assert_eq!(g1.edges.len(), g2.edges.len());
    }

    #[test]
    fn groups_follow_directory_segments() {
        let graph = build(&[
            ("src/pages/Cart.tsx", ""),
            ("src/pages/Home.tsx", ""),
            ("src/lib/money.ts", ""),
        ]);
        let groups = graph.groups();
        assert_eq!(groups.len(), 2);
        let pages = groups.iter().find(|g| g.name == "src/pages").expect("pages");
        assert_eq!(pages.node_ids.len(), 2);
    }
}
