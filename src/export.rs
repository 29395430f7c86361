//! The serialized analysis document handed to collaborators.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::analyzer::Analysis;
use crate::types::{CoherenceIssue, Edge, GraphNode, Group};

/// Summary metadata attached to every export.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportMetadata {
    pub project_name: String,
    /// RFC 3339 timestamp of the analysis pass
    pub analyzed_at: DateTime<Utc>,
    pub total_files: usize,
    pub total_nodes: usize,
    pub total_edges: usize,
    /// 0–100, higher is healthier
    pub coherence_score: u8,
    pub issues: Vec<CoherenceIssue>,
}

/// The complete analysis output: nodes, edges, presentation groups, and
/// metadata, serialized as one JSON-compatible document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphExport {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<Edge>,
    pub groups: Vec<Group>,
    pub metadata: ExportMetadata,
}

impl GraphExport {
    pub fn from_analysis(project_name: &str, analysis: &Analysis) -> Self {
        let groups = analysis.graph.groups();
        Self {
            nodes: analysis.graph.nodes.clone(),
            edges: analysis.graph.edges.clone(),
            groups,
            metadata: ExportMetadata {
                project_name: project_name.to_string(),
                analyzed_at: Utc::now(),
                total_files: analysis.total_files,
                total_nodes: analysis.graph.nodes.len(),
                total_edges: analysis.graph.edges.len(),
                coherence_score: analysis.report.score,
                issues: analysis.report.issues.clone(),
            },
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
