//! Structural-kind classification.
//!
//! First match wins, evaluated in a fixed priority order: path-based signals
//! are more reliable than content-based signals and are checked first.

use heck::ToPascalCase;

use crate::types::NodeKind;

use super::regexes::{
    regex_class_decl, regex_component_fn, regex_form_markup, regex_markup, regex_submit_handler,
    regex_table_decl, regex_type_decl,
};

fn segments(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}

fn has_segment(path: &str, name: &str) -> bool {
    segments(path).iter().any(|s| s.eq_ignore_ascii_case(name))
}

fn file_stem(path: &str) -> &str {
    let file = path.rsplit('/').next().unwrap_or(path);
    // `.d.ts` keeps its marker; everything else drops the last extension only
    file.split_once('.').map(|(stem, _)| stem).unwrap_or(file)
}

/// True when the file is named like a route handler: `route.ts`, `index.ts`,
/// or a lowercase-led handler module (`users.ts`, `checkout.ts`).
fn is_route_handler_name(path: &str) -> bool {
    let stem = file_stem(path);
    stem == "route"
        || stem == "index"
        || stem.chars().next().is_some_and(|c| c.is_ascii_lowercase())
}

fn is_hook_name(path: &str) -> bool {
    let stem = file_stem(path);
    stem.starts_with("use") && stem.chars().nth(3).is_some_and(|c| c.is_ascii_uppercase())
}

/// Classify one file into its structural kind.
///
/// The ordering here is a contract: reordering the checks changes which kind
/// wins for files that carry more than one signal.
pub fn classify(path: &str, content: &str) -> NodeKind {
    let lower = path.to_ascii_lowercase();
    let stem_lower = file_stem(&lower).to_string();

    // 1. API directory + route-handler file name
    if has_segment(&lower, "api") && is_route_handler_name(&lower) {
        return NodeKind::ApiEndpoint;
    }

    // 2. Scheduled task signals
    if has_segment(&lower, "jobs")
        || has_segment(&lower, "cron")
        || stem_lower.contains("cron")
        || stem_lower.ends_with("job")
        || stem_lower.contains("scheduled")
    {
        return NodeKind::ScheduledTask;
    }

    // 3. Reusable logic unit: `use*` prefix convention or hooks directory
    if is_hook_name(path) || has_segment(&lower, "hooks") {
        return NodeKind::LogicUnit;
    }

    // 4. Gatekeeper checks
    if has_segment(&lower, "guards")
        || has_segment(&lower, "middleware")
        || stem_lower.ends_with("guard")
        || stem_lower == "middleware"
    {
        return NodeKind::Gatekeeper;
    }

    // 5. Shared-state provider
    if has_segment(&lower, "context")
        || has_segment(&lower, "contexts")
        || has_segment(&lower, "store")
        || has_segment(&lower, "stores")
        || has_segment(&lower, "providers")
        || stem_lower.ends_with("context")
        || stem_lower.ends_with("store")
        || stem_lower.ends_with("provider")
    {
        return NodeKind::StateProvider;
    }

    // 6. Type-definition module by path
    if has_segment(&lower, "types")
        || has_segment(&lower, "interfaces")
        || has_segment(&lower, "models")
        || stem_lower == "types"
        || lower.ends_with(".d.ts")
    {
        return NodeKind::TypeDefinition;
    }

    // 7. Screen: route-level page files
    if has_segment(&lower, "pages")
        || has_segment(&lower, "screens")
        || has_segment(&lower, "views")
        || (has_segment(&lower, "app") && stem_lower == "page")
    {
        return NodeKind::Screen;
    }

    // 8. Data table: schema paths or table-shaped declarations
    if has_segment(&lower, "schema")
        || has_segment(&lower, "tables")
        || stem_lower.ends_with("schema")
        || regex_table_decl().is_match(content)
    {
        return NodeKind::DataTable;
    }

    // 9. UI-rendering syntax: capitalized exported function returning markup
    if regex_component_fn().is_match(content) && regex_markup().is_match(content) {
        if regex_form_markup().is_match(content) && regex_submit_handler().is_match(content) {
            return NodeKind::FormHandler;
        }
        return NodeKind::UiComponent;
    }

    // 10. Class declaration
    if regex_class_decl().is_match(content) {
        return NodeKind::Service;
    }

    // 11. Top-level exported interface/type/enum
    if regex_type_decl().is_match(content) {
        return NodeKind::TypeDefinition;
    }

    NodeKind::File
}

/// Human-facing name for a node: the Pascal-cased file stem, falling back to
/// the parent directory for `index` files.
pub fn display_name(path: &str) -> String {
    let stem = file_stem(path);
    if stem == "index" || stem == "route" || stem == "page" {
        let parts = segments(path);
        if parts.len() >= 2 {
            let parent = parts[parts.len() - 2];
            return format!("{} ({})", parent.to_pascal_case(), stem);
        }
    }
    stem.to_pascal_case()
}
