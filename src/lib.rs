//! # tangram
//!
//! Structural coherence analysis and safe lexical refactoring for web
//! projects. tangram scans a project, classifies every source file into a
//! structural role (screen, ui-component, api-endpoint, ...), builds a typed
//! dependency graph, scores the project's structural health, and — given a
//! proposed rename, field change, or deletion — computes exactly which files
//! break, generates line-level patches, and applies or rolls them back
//! safely.
//!
//! There is deliberately no compiler front end here: extraction is lexical
//! and line-oriented, matching is conservative, and patch application is
//! transactional per file with fuzzy anchor relocation.
//!
//! ## Library usage
//!
//! ```rust,no_run
//! use std::path::Path;
//! use tangram::analyzer::run_analysis;
//! use tangram::config::TangramConfig;
//! use tangram::export::GraphExport;
//!
//! let config = TangramConfig::load(Path::new("."));
//! let analysis = run_analysis(Path::new("."), &config).unwrap();
//! let export = GraphExport::from_analysis("my-project", &analysis);
//! println!("coherence: {}", export.metadata.coherence_score);
//! ```
//!
//! ## CLI usage
//!
//! ```bash
//! tangram analyze --pretty               # graph + coherence document
//! tangram impact --target src/types/cart.ts --rename CartItem:BasketItem
//! tangram apply --patches fixes.json     # transactional, rollback-able
//! ```

// ============================================================================
// Core Modules
// ============================================================================

/// The analysis pipeline: scanning, extraction, classification, graph
/// building, coherence analysis, and layout.
pub mod analyzer;

/// Command-line interface (clap definitions and dispatch).
pub mod cli;

/// Optional `.tangram/config.toml` support.
pub mod config;

/// Engine error taxonomy.
pub mod error;

/// The serialized analysis document (`GraphExport`).
pub mod export;

/// Impact analysis: what breaks when a unit is renamed, reshaped, or deleted.
pub mod impact;

/// Line-level patches: generation, transactional application, rollback.
pub mod patch;

/// Progress UI helpers for the CLI.
pub mod progress;

/// Core data model shared across layers.
pub mod types;

/// File-system capability seam consumed by impact analysis and patching.
pub mod workspace;

// ============================================================================
// Re-exports for convenience
// ============================================================================

/// Run the full analysis pipeline.
pub use analyzer::run_analysis;

/// A completed analysis pass.
pub use analyzer::Analysis;

/// The dependency graph.
pub use analyzer::graph::Graph;

/// The analysis output document.
pub use export::GraphExport;

/// An impact-analysis request.
pub use impact::{Change, ChangeSpec, ImpactResult};

/// Patch application entry points.
pub use patch::{Patch, PatchApplyResult, PatchHistory, apply, rollback};

/// The default file-system workspace.
pub use workspace::{FsWorkspace, Workspace};
