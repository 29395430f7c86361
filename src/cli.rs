//! Command-line interface: argument definitions and dispatch.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};

use crate::analyzer::run_analysis;
use crate::config::TangramConfig;
use crate::export::GraphExport;
use crate::impact::{Change, ChangeSpec, analyze_change};
use crate::patch::{Patch, PatchHistory, apply};
use crate::progress::{self, Spinner};
use crate::workspace::FsWorkspace;

#[derive(Parser)]
#[command(
    name = "tangram",
    version,
    about = "Structural coherence analysis and safe lexical refactoring"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Scan a project and emit the graph document with coherence findings
    Analyze {
        /// Project root
        #[arg(default_value = ".")]
        root: PathBuf,
        /// Extra directory names to ignore (repeatable)
        #[arg(long = "ignore", value_name = "DIR")]
        ignore: Vec<String>,
        /// Write the JSON document to a file instead of stdout
        #[arg(long, value_name = "PATH")]
        json: Option<PathBuf>,
        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },
    /// Compute which files a proposed change breaks
    Impact {
        /// Project root
        #[arg(default_value = ".")]
        root: PathBuf,
        /// Target file, project-relative (e.g. src/types/cart.ts)
        #[arg(long, value_name = "PATH")]
        target: String,
        /// Rename a symbol: OLD:NEW
        #[arg(long, value_name = "OLD:NEW")]
        rename: Option<String>,
        /// Flag object literals that may need a new field
        #[arg(long, value_name = "FIELD")]
        add_field: Option<String>,
        /// Find usages of a field about to be removed
        #[arg(long, value_name = "FIELD")]
        remove_field: Option<String>,
        /// Find type-conflicting usages: FIELD:BEFORE:AFTER
        #[arg(long, value_name = "FIELD:BEFORE:AFTER")]
        change_type: Option<String>,
        /// Compute the impact of deleting the target file
        #[arg(long)]
        delete: bool,
        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },
    /// Apply a patch set produced by `impact`
    Apply {
        /// Project root
        #[arg(default_value = ".")]
        root: PathBuf,
        /// JSON file: an array of patches or a full impact result
        #[arg(long, value_name = "FILE")]
        patches: PathBuf,
        /// Invert the patches before applying (undo a previous apply)
        #[arg(long)]
        rollback: bool,
        /// Also apply patches that are not marked auto-fixable
        #[arg(long)]
        force: bool,
    },
}

pub fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Analyze {
            root,
            ignore,
            json,
            pretty,
        } => run_analyze(root, ignore, json, pretty),
        Command::Impact {
            root,
            target,
            rename,
            add_field,
            remove_field,
            change_type,
            delete,
            pretty,
        } => run_impact(
            root,
            target,
            rename,
            add_field,
            remove_field,
            change_type,
            delete,
            pretty,
        ),
        Command::Apply {
            root,
            patches,
            rollback,
            force,
        } => run_apply(root, patches, rollback, force),
    }
}

fn run_analyze(
    root: PathBuf,
    ignore: Vec<String>,
    json: Option<PathBuf>,
    pretty: bool,
) -> anyhow::Result<()> {
    let mut config = TangramConfig::load(&root);
    config.scan.ignore_dirs.extend(ignore);

    let spinner = Spinner::new("Scanning project...");
    let analysis = run_analysis(&root, &config)?;
    spinner.finish_clear();

    let project_name = root
        .canonicalize()
        .ok()
        .and_then(|p| p.file_name().map(|n| n.to_string_lossy().to_string()))
        .unwrap_or_else(|| "project".to_string());
    let export = GraphExport::from_analysis(&project_name, &analysis);

    let document = if pretty {
        export.to_json_pretty()?
    } else {
        export.to_json()?
    };

    match json {
        Some(path) => {
            fs::write(&path, &document)
                .with_context(|| format!("writing {}", path.display()))?;
            progress::success(&format!(
                "{} nodes, {} edges, coherence {} -> {}",
                export.metadata.total_nodes,
                export.metadata.total_edges,
                export.metadata.coherence_score,
                path.display()
            ));
        }
        None => println!("{document}"),
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn run_impact(
    root: PathBuf,
    target: String,
    rename: Option<String>,
    add_field: Option<String>,
    remove_field: Option<String>,
    change_type: Option<String>,
    delete: bool,
    pretty: bool,
) -> anyhow::Result<()> {
    let spec = parse_change_spec(rename, add_field, remove_field, change_type, delete)?;

    let config = TangramConfig::load(&root);
    let analysis = run_analysis(&root, &config)?;
    let Some(node) = analysis.graph.node_by_path(&target) else {
        bail!("target '{target}' is not part of the analyzed project");
    };

    let change = Change {
        target_node_id: node.id.clone(),
        spec,
    };
    let workspace = FsWorkspace::new(&root);
    let result = analyze_change(&analysis.graph, &change, &config, &workspace)?;

    let document = if pretty {
        serde_json::to_string_pretty(&result)?
    } else {
        serde_json::to_string(&result)?
    };
    println!("{document}");
    Ok(())
}

fn parse_change_spec(
    rename: Option<String>,
    add_field: Option<String>,
    remove_field: Option<String>,
    change_type: Option<String>,
    delete: bool,
) -> anyhow::Result<ChangeSpec> {
    let mut specs = Vec::new();
    if let Some(raw) = rename {
        let (before, after) = raw
            .split_once(':')
            .context("--rename expects OLD:NEW")?;
        specs.push(ChangeSpec::Rename {
            before: before.to_string(),
            after: after.to_string(),
        });
    }
    if let Some(field) = add_field {
        specs.push(ChangeSpec::AddField {
            field,
            field_type: None,
        });
    }
    if let Some(field) = remove_field {
        specs.push(ChangeSpec::RemoveField { field });
    }
    if let Some(raw) = change_type {
        let parts: Vec<&str> = raw.splitn(3, ':').collect();
        if parts.len() != 3 {
            bail!("--change-type expects FIELD:BEFORE:AFTER");
        }
        specs.push(ChangeSpec::ChangeType {
            field: parts[0].to_string(),
            before_type: parts[1].to_string(),
            after_type: parts[2].to_string(),
        });
    }
    if delete {
        specs.push(ChangeSpec::Delete);
    }

    match specs.len() {
        0 => bail!("pick one of --rename, --add-field, --remove-field, --change-type, --delete"),
        1 => Ok(specs.remove(0)),
        _ => bail!("only one change per impact request"),
    }
}

fn run_apply(root: PathBuf, patches: PathBuf, rollback: bool, force: bool) -> anyhow::Result<()> {
    let raw = fs::read_to_string(&patches)
        .with_context(|| format!("reading {}", patches.display()))?;
    let mut patch_set = parse_patch_file(&raw)?;

    if !force {
        patch_set.retain(|p| p.auto_fixable);
    }
    if patch_set.is_empty() {
        bail!("no applicable patches in {}", patches.display());
    }
    if rollback {
        patch_set = patch_set.iter().rev().map(|p| p.inverse()).collect();
    }

    let workspace = FsWorkspace::new(&root);
    let mut history = PatchHistory::new();
    let result = apply(patch_set, &workspace, &mut history);

    println!("{}", serde_json::to_string_pretty(&result)?);
    if result.success {
        progress::success(&format!(
            "applied {} patches across {} files",
            result.applied.len(),
            result.files_modified.len()
        ));
    } else {
        for err in &result.file_level_errors {
            progress::error(err);
        }
        progress::warning(&format!(
            "{} applied, {} failed",
            result.applied.len(),
            result.failed.len()
        ));
        std::process::exit(1);
    }
    Ok(())
}

/// Accept either a bare `[Patch]` array or a full impact-result document.
fn parse_patch_file(raw: &str) -> anyhow::Result<Vec<Patch>> {
    if let Ok(patches) = serde_json::from_str::<Vec<Patch>>(raw) {
        return Ok(patches);
    }
    let result: crate::impact::ImpactResult =
        serde_json::from_str(raw).context("patch file is neither a patch array nor an impact result")?;
    Ok(result.suggested_fixes)
}
