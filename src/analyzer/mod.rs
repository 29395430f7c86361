//! The analysis pipeline: scan -> extract -> graph -> coherence -> layout.
//!
//! Everything is rebuilt from scratch per invocation; there is no
//! incremental state. Extraction is per-file and independent; the graph
//! passes need global visibility and run single-threaded over the built
//! graph.

pub mod classify;
pub mod coherence;
pub mod extract;
pub mod facets;
pub mod graph;
pub mod layout;
pub(crate) mod regexes;
pub mod resolve;
pub mod scan;

use std::fs;
use std::path::Path;

use crate::config::TangramConfig;
use crate::error::{EngineError, EngineResult};

use coherence::CoherenceReport;
use extract::{LexicalExtractor, UnitExtractor};
use graph::Graph;

/// A completed analysis pass: the graph plus its coherence findings.
#[derive(Debug)]
pub struct Analysis {
    pub graph: Graph,
    pub report: CoherenceReport,
    /// Files enumerated by the scanner (nodes can be fewer if reads failed).
    pub total_files: usize,
}

/// Run the full pipeline over a project root.
pub fn run_analysis(root: &Path, config: &TangramConfig) -> EngineResult<Analysis> {
    run_analysis_with(root, config, &LexicalExtractor)
}

/// Same pipeline with a caller-supplied extractor behind the seam.
pub fn run_analysis_with(
    root: &Path,
    config: &TangramConfig,
    extractor: &dyn UnitExtractor,
) -> EngineResult<Analysis> {
    let root = root
        .canonicalize()
        .map_err(|source| EngineError::RootUnreadable {
            path: root.display().to_string(),
            source,
        })?;

    let files = scan::scan_files(&root, config)?;
    let total_files = files.len();
    tracing::debug!("scanned {total_files} candidate files under {}", root.display());

    let mut nodes = Vec::with_capacity(files.len());
    for relative in &files {
        match fs::read_to_string(root.join(relative)) {
            Ok(content) => nodes.push(extractor.extract(relative, &content)),
            // Recoverable per unit: skip the file, keep analyzing.
            Err(err) => tracing::warn!("skipping {relative}: {err}"),
        }
    }

    let mut graph = Graph::build(nodes, config);
    let report = coherence::analyze(&graph, config);
    layout::assign_positions(&mut graph.nodes);

    tracing::debug!(
        "graph: {} nodes, {} edges, score {}",
        graph.nodes.len(),
        graph.edges.len(),
        report.score
    );

    Ok(Analysis {
        graph,
        report,
        total_files,
    })
}
