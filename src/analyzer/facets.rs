//! Kind-specific facet extraction: props, fields, handlers, methods.
//!
//! All of this is best-effort lexical work. A construct that fails to match
//! is skipped; nothing here can fail the extraction of a file.

use crate::types::FieldFacet;

use super::regexes::{
    regex_branching, regex_class_decl, regex_class_method, regex_field_line, regex_local_callable,
    regex_props_destructure, regex_route_default_handler, regex_route_verb,
};

const METHOD_KEYWORDS: &[&str] = &[
    "if", "for", "while", "switch", "catch", "return", "constructor", "function", "new", "await",
    "typeof",
];

/// Cyclomatic-complexity estimate: base 1 plus one per branching, looping,
/// or logical-combinator construct. Comment-only lines are skipped.
pub fn complexity_estimate(content: &str) -> usize {
    let mut count = 1usize;
    for line in content.lines() {
        let trimmed = line.trim_start();
        if trimmed.starts_with("//") || trimmed.starts_with('*') {
            continue;
        }
        count += regex_branching().find_iter(line).count();
    }
    count
}

/// Declared fields from interface / type-literal / table blocks.
///
/// Tracks brace depth from a declaration header so that arbitrary statement
/// lines elsewhere in the file are not misread as fields.
pub fn extract_fields(content: &str) -> Vec<FieldFacet> {
    let mut fields = Vec::new();
    let mut depth = 0usize;

    for line in content.lines() {
        if depth == 0 {
            if is_field_block_header(line) && line.contains('{') {
                depth = brace_delta_positive(line);
            }
            continue;
        }

        if let Some(caps) = regex_field_line().captures(line) {
            let ty = caps[3].trim().to_string();
            fields.push(FieldFacet {
                name: caps[1].to_string(),
                ty,
                optional: caps.get(2).is_some(),
            });
        }

        depth = depth.saturating_add(line.matches('{').count());
        depth = depth.saturating_sub(line.matches('}').count());
    }

    fields
}

fn is_field_block_header(line: &str) -> bool {
    let t = line.trim_start();
    t.starts_with("interface ")
        || t.starts_with("export interface ")
        || t.starts_with("export declare interface ")
        || (t.contains("type ") && t.contains("= {"))
        || t.contains("defineTable(")
        || t.contains("pgTable(")
}

fn brace_delta_positive(line: &str) -> usize {
    let open = line.matches('{').count();
    let close = line.matches('}').count();
    open.saturating_sub(close).max(1)
}

/// Props for a UI component: destructured parameter names, with default
/// values and rest spreads stripped.
pub fn extract_properties(content: &str) -> Vec<String> {
    let mut props = Vec::new();
    if let Some(caps) = regex_props_destructure().captures(content) {
        for raw in caps[1].split(',') {
            let name = raw
                .split(['=', ':'])
                .next()
                .unwrap_or("")
                .trim()
                .trim_start_matches("...");
            if !name.is_empty()
                && name
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
                && !props.contains(&name.to_string())
            {
                props.push(name.to_string());
            }
        }
    }
    props
}

/// Handler names for an api-endpoint: exported HTTP verbs, or the default
/// `handler` function.
pub fn extract_route_handlers(content: &str) -> Vec<String> {
    let mut handlers = Vec::new();
    for line in content.lines() {
        if let Some(caps) = regex_route_verb().captures(line) {
            let verb = caps[1].to_string();
            if !handlers.contains(&verb) {
                handlers.push(verb);
            }
        } else if let Some(caps) = regex_route_default_handler().captures(line) {
            let name = caps[1].to_string();
            if !handlers.contains(&name) {
                handlers.push(name);
            }
        }
    }
    handlers
}

/// Callables declared in a logic unit (returned or internal).
pub fn extract_callables(content: &str) -> Vec<String> {
    let mut names = Vec::new();
    for line in content.lines() {
        if let Some(caps) = regex_local_callable().captures(line) {
            let name = caps[1].to_string();
            if !METHOD_KEYWORDS.contains(&name.as_str()) && !names.contains(&name) {
                names.push(name);
            }
        }
    }
    names
}

/// Method names declared inside the first class block of the file.
pub fn extract_methods(content: &str) -> Vec<String> {
    let mut methods = Vec::new();
    let mut in_class = false;
    let mut depth = 0usize;

    for line in content.lines() {
        if !in_class {
            if regex_class_decl().is_match(line) {
                in_class = true;
                depth = line.matches('{').count().saturating_sub(line.matches('}').count());
            }
            continue;
        }

        if depth == 1
            && let Some(caps) = regex_class_method().captures(line)
        {
            let name = caps[1].to_string();
            if !METHOD_KEYWORDS.contains(&name.as_str()) && !methods.contains(&name) {
                methods.push(name);
            }
        }

        depth = depth.saturating_add(line.matches('{').count());
        depth = depth.saturating_sub(line.matches('}').count());
        if depth == 0 {
            break;
        }
    }

    methods
}
