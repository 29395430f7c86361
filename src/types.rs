//! Core data model shared across the analyzer, impact, and patch layers.
//!
//! Everything here serializes to the JSON-compatible documents consumed by
//! editor-side collaborators, so the structs carry serde derives throughout.

use serde::{Deserialize, Serialize};

/// Structural role of a source file in the graph. Mutually exclusive;
/// assigned by path heuristics first, content heuristics second.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NodeKind {
    /// Route-level screen (page/view)
    Screen,
    /// Reusable UI building block
    UiComponent,
    /// Request handler (API route)
    ApiEndpoint,
    /// Persisted data table / model definition
    DataTable,
    /// Type-definition module (interfaces, type aliases, enums)
    TypeDefinition,
    /// Reusable logic unit (hook-style, `use*` convention)
    LogicUnit,
    /// Class-based helper module
    Service,
    /// Gatekeeper check (guard / middleware)
    Gatekeeper,
    /// Shared-state provider (context / store)
    StateProvider,
    /// Form handler component
    FormHandler,
    /// Scheduled task (cron / job)
    ScheduledTask,
    /// Plain file with no stronger signal
    File,
}

impl NodeKind {
    /// Stable order used for layout banding and summaries.
    pub const ALL: [NodeKind; 12] = [
        NodeKind::Screen,
        NodeKind::UiComponent,
        NodeKind::FormHandler,
        NodeKind::ApiEndpoint,
        NodeKind::LogicUnit,
        NodeKind::StateProvider,
        NodeKind::Gatekeeper,
        NodeKind::ScheduledTask,
        NodeKind::Service,
        NodeKind::DataTable,
        NodeKind::TypeDefinition,
        NodeKind::File,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            NodeKind::Screen => "screen",
            NodeKind::UiComponent => "ui-component",
            NodeKind::ApiEndpoint => "api-endpoint",
            NodeKind::DataTable => "data-table",
            NodeKind::TypeDefinition => "type-definition",
            NodeKind::LogicUnit => "logic-unit",
            NodeKind::Service => "service",
            NodeKind::Gatekeeper => "gatekeeper",
            NodeKind::StateProvider => "state-provider",
            NodeKind::FormHandler => "form-handler",
            NodeKind::ScheduledTask => "scheduled-task",
            NodeKind::File => "file",
        }
    }
}

/// How an imported symbol is bound at the import site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BindingKind {
    Default,
    Named,
    Namespace,
    TypeOnly,
}

/// One imported symbol, as written in source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportRef {
    /// Local binding name (`*` for namespace imports)
    pub name: String,
    /// Origin specifier exactly as written (`./foo`, `@/lib/bar`, `react`)
    pub origin: String,
    /// Binding kind (default/named/namespace/type-only)
    pub binding: BindingKind,
    /// 1-based source line of the import statement
    pub line: usize,
}

/// Declared kind of an exported symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExportKind {
    Default,
    Named,
    Interface,
    Type,
    Enum,
}

/// One exported symbol with its declaration line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportRef {
    pub name: String,
    pub kind: ExportKind,
    /// 1-based source line of the declaration
    pub line: usize,
}

/// A declared field on a type-definition or data-table unit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldFacet {
    pub name: String,
    /// Declared type text, as written
    #[serde(rename = "type")]
    pub ty: String,
    /// True for `name?:` style optional fields
    pub optional: bool,
}

/// Layout-only 2-D position. Mutable for presentation, never analysis input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

/// One source file's role-classified representation in the graph.
///
/// Exactly one node exists per scanned file. `id` is a pure function of
/// the normalized relative `path`, so edges can reference nodes created in
/// any order and ids are stable across re-scans.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphNode {
    /// Deterministic id derived from `path`
    pub id: String,
    pub kind: NodeKind,
    /// Normalized project-relative path (forward slashes)
    pub path: String,
    /// Human-facing name derived from the file stem
    pub display_name: String,
    /// Presentation position assigned by the layout pass
    pub position: Position,
    pub lines_of_code: usize,
    /// Cyclomatic-complexity estimate: 1 + branching constructs found
    pub complexity: usize,
    pub imports: Vec<ImportRef>,
    pub exports: Vec<ExportRef>,
    /// UI component props (ui-component / form-handler)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub properties: Vec<String>,
    /// Declared fields (type-definition / data-table / service)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<FieldFacet>,
    /// Handler names (api-endpoint verbs, logic-unit callables)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub handlers: Vec<String>,
    /// Method names (service classes)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub methods: Vec<String>,
}

impl GraphNode {
    pub fn new(id: String, path: String, display_name: String) -> Self {
        Self {
            id,
            kind: NodeKind::File,
            path,
            display_name,
            position: Position::default(),
            lines_of_code: 0,
            complexity: 1,
            imports: Vec::new(),
            exports: Vec::new(),
            properties: Vec::new(),
            fields: Vec::new(),
            handlers: Vec::new(),
            methods: Vec::new(),
        }
    }
}

/// Kind of a directed relationship between two nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EdgeKind {
    Imports,
    UsesType,
    References,
}

impl EdgeKind {
    /// Fixed per-kind weight, used only for god-object thresholding.
    pub fn weight(&self) -> u32 {
        match self {
            EdgeKind::Imports => 2,
            EdgeKind::UsesType => 1,
            EdgeKind::References => 1,
        }
    }
}

/// Directed, typed, weighted edge from consumer to provider.
///
/// Edges are not deduplicated: one edge is generated per import statement,
/// which makes them naturally unique per (source, target, kind, label).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Edge {
    /// Consumer node id
    pub source: String,
    /// Provider node id
    pub target: String,
    pub kind: EdgeKind,
    /// Imported symbol name, kept for display and debugging
    pub label: String,
    pub weight: u32,
}

impl Edge {
    pub fn new(source: String, target: String, kind: EdgeKind, label: String) -> Self {
        let weight = kind.weight();
        Self {
            source,
            target,
            kind,
            label,
            weight,
        }
    }
}

/// Presentation-only aggregation of nodes under a directory segment.
/// Recomputed on every analysis, never persisted as a source of truth.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Group {
    pub id: String,
    /// Directory segment name
    pub name: String,
    pub node_ids: Vec<String>,
}

/// Category of a structural finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IssueKind {
    CircularDependency,
    UnusedExport,
    OrphanedFile,
    GodObject,
}

/// Severity scale for coherence issues, with fixed score penalties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    /// Points subtracted from the 100-point coherence score per issue.
    pub fn penalty(&self) -> u32 {
        match self {
            Severity::Critical => 15,
            Severity::High => 10,
            Severity::Medium => 5,
            Severity::Low => 2,
            Severity::Info => 1,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Severity::Critical => "critical",
            Severity::High => "high",
            Severity::Medium => "medium",
            Severity::Low => "low",
            Severity::Info => "info",
        }
    }
}

/// A single structural finding produced by the coherence analyzer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoherenceIssue {
    pub id: String,
    pub kind: IssueKind,
    pub severity: Severity,
    /// Nodes involved in the finding (cycle members, the orphan, etc.)
    pub node_ids: Vec<String>,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}
