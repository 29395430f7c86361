//! Per-file unit extraction.
//!
//! Line-oriented lexical scanning: every recognized construct records its
//! exact 1-based line so later patches can anchor to it. The extractor is
//! total over arbitrary input — a construct that fails a pattern is skipped
//! and extraction continues.

use crate::types::{BindingKind, ExportKind, ExportRef, GraphNode, ImportRef, NodeKind};

use super::classify::{classify, display_name};
use super::facets;
use super::graph::node_id;
use super::regexes::{
    regex_export_brace, regex_export_default, regex_export_named_decl, regex_import_default,
    regex_import_named, regex_import_namespace, regex_import_type_only,
};

/// Extraction seam: swap in a real per-language parser later without touching
/// the graph or impact layers.
pub trait UnitExtractor {
    /// Build a populated node (without edges) from one file's text.
    /// Must never fail: malformed input degrades to a sparser node.
    fn extract(&self, path: &str, content: &str) -> GraphNode;
}

/// The default regex-backed extractor.
#[derive(Debug, Default)]
pub struct LexicalExtractor;

impl UnitExtractor for LexicalExtractor {
    fn extract(&self, path: &str, content: &str) -> GraphNode {
        let mut node = GraphNode::new(
            node_id(path),
            path.to_string(),
            display_name(path),
        );

        for (idx, line) in content.lines().enumerate() {
            let line_no = idx + 1;
            scan_import_line(line, line_no, &mut node.imports);
            scan_export_line(line, line_no, &mut node.exports);
        }

        node.lines_of_code = content.lines().count();
        node.complexity = facets::complexity_estimate(content);
        node.kind = classify(path, content);
        attach_facets(&mut node, content);
        node
    }
}

fn scan_import_line(line: &str, line_no: usize, imports: &mut Vec<ImportRef>) {
    // Type-only first: the default/named patterns would otherwise misread
    // `import type` lines.
    if let Some(caps) = regex_import_type_only().captures(line) {
        let origin = caps[3].to_string();
        if let Some(list) = caps.get(1) {
            for name in brace_list_names(list.as_str()) {
                imports.push(ImportRef {
                    name,
                    origin: origin.clone(),
                    binding: BindingKind::TypeOnly,
                    line: line_no,
                });
            }
        } else if let Some(single) = caps.get(2) {
            imports.push(ImportRef {
                name: single.as_str().to_string(),
                origin,
                binding: BindingKind::TypeOnly,
                line: line_no,
            });
        }
        return;
    }

    if let Some(caps) = regex_import_namespace().captures(line) {
        imports.push(ImportRef {
            name: caps[1].to_string(),
            origin: caps[2].to_string(),
            binding: BindingKind::Namespace,
            line: line_no,
        });
        return;
    }

    if let Some(caps) = regex_import_default().captures(line) {
        let origin = caps[3].to_string();
        imports.push(ImportRef {
            name: caps[1].to_string(),
            origin: origin.clone(),
            binding: BindingKind::Default,
            line: line_no,
        });
        if let Some(list) = caps.get(2) {
            push_named(list.as_str(), &origin, line_no, imports);
        }
        return;
    }

    // Side-effect imports (`import "./x.css"`) carry no binding and
    // intentionally match none of the four patterns.
    if let Some(caps) = regex_import_named().captures(line) {
        let origin = caps[2].to_string();
        push_named(&caps[1], &origin, line_no, imports);
    }
}

fn push_named(list: &str, origin: &str, line_no: usize, imports: &mut Vec<ImportRef>) {
    for item in list.split(',') {
        let trimmed = item.trim();
        if trimmed.is_empty() {
            continue;
        }
        // `type Foo` inside a value import list is still a type-only binding
        let (binding, rest) = match trimmed.strip_prefix("type ") {
            Some(rest) => (BindingKind::TypeOnly, rest.trim()),
            None => (BindingKind::Named, trimmed),
        };
        let name = match rest.split_once(" as ") {
            Some((_, alias)) => alias.trim(),
            None => rest,
        };
        if name.is_empty() {
            continue;
        }
        imports.push(ImportRef {
            name: name.to_string(),
            origin: origin.to_string(),
            binding,
            line: line_no,
        });
    }
}

fn brace_list_names(list: &str) -> Vec<String> {
    list.split(',')
        .filter_map(|item| {
            let trimmed = item.trim();
            if trimmed.is_empty() {
                return None;
            }
            match trimmed.split_once(" as ") {
                Some((_, alias)) => Some(alias.trim().to_string()),
                None => Some(trimmed.to_string()),
            }
        })
        .filter(|n| !n.is_empty())
        .collect()
}

fn scan_export_line(line: &str, line_no: usize, exports: &mut Vec<ExportRef>) {
    if let Some(caps) = regex_export_named_decl().captures(line) {
        let kind = match caps[1].trim() {
            "interface" => ExportKind::Interface,
            "type" => ExportKind::Type,
            "enum" => ExportKind::Enum,
            _ => ExportKind::Named,
        };
        push_export(exports, caps[2].to_string(), kind, line_no);
        return;
    }

    if let Some(caps) = regex_export_default().captures(line) {
        let name = caps
            .get(1)
            .map(|m| m.as_str().to_string())
            .unwrap_or_else(|| "default".to_string());
        push_export(exports, name, ExportKind::Default, line_no);
        return;
    }

    if let Some(caps) = regex_export_brace().captures(line) {
        for name in brace_list_names(&caps[1]) {
            push_export(exports, name, ExportKind::Named, line_no);
        }
    }
}

fn push_export(exports: &mut Vec<ExportRef>, name: String, kind: ExportKind, line: usize) {
    if exports.iter().any(|e| e.name == name) {
        return;
    }
    exports.push(ExportRef { name, kind, line });
}

fn attach_facets(node: &mut GraphNode, content: &str) {
    match node.kind {
        NodeKind::UiComponent | NodeKind::FormHandler | NodeKind::Screen => {
            node.properties = facets::extract_properties(content);
        }
        NodeKind::TypeDefinition | NodeKind::DataTable => {
            node.fields = facets::extract_fields(content);
        }
        NodeKind::ApiEndpoint => {
            node.handlers = facets::extract_route_handlers(content);
        }
        NodeKind::LogicUnit => {
            node.handlers = facets::extract_callables(content);
        }
        NodeKind::Service => {
            node.methods = facets::extract_methods(content);
            node.fields = facets::extract_fields(content);
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{BindingKind, ExportKind, NodeKind};

    fn extract(path: &str, content: &str) -> GraphNode {
        LexicalExtractor.extract(path, content)
    }

    #[test]
    fn extracts_import_bindings_with_lines() {
        let content = r#"import Layout from "./Layout";
import { formatPrice, type Money } from "../lib/money";
import * as cartApi from "@/lib/cart";
import type { CartItem } from "@/types/cart";
import "./globals.css";
"#;
        let node = extract("src/pages/Cart.tsx", content);

        assert_eq!(node.imports.len(), 5);
        let layout = &node.imports[0];
        assert_eq!(layout.name, "Layout");
        assert_eq!(layout.binding, BindingKind::Default);
        assert_eq!(layout.line, 1);

        let money: Vec<_> = node.imports.iter().filter(|i| i.origin == "../lib/money").collect();
        assert_eq!(money.len(), 2);
        assert_eq!(money[0].name, "formatPrice");
        assert_eq!(money[0].binding, BindingKind::Named);
        assert_eq!(money[1].name, "Money");
        assert_eq!(money[1].binding, BindingKind::TypeOnly);

        let ns = node.imports.iter().find(|i| i.name == "cartApi").expect("ns");
        assert_eq!(ns.binding, BindingKind::Namespace);
        assert_eq!(ns.line, 3);

        let item = node.imports.iter().find(|i| i.name == "CartItem").expect("type");
        assert_eq!(item.binding, BindingKind::TypeOnly);
        assert_eq!(item.origin, "@/types/cart");
    }

    #[test]
    fn extracts_exports_with_kinds() {
        let content = r#"export interface Totals { net: number; }
export type Currency = "usd" | "eur";
export enum Status { Open, Done }
export const TAX_RATE = 0.19;
export default function CartPage() {
  return <div />;
}
"#;
        let node = extract("src/pages/Cart.tsx", content);
        let kind_of = |name: &str| {
            node.exports
                .iter()
                .find(|e| e.name == name)
                .map(|e| e.kind)
        };
        assert_eq!(kind_of("Totals"), Some(ExportKind::Interface));
        assert_eq!(kind_of("Currency"), Some(ExportKind::Type));
        assert_eq!(kind_of("Status"), Some(ExportKind::Enum));
        assert_eq!(kind_of("TAX_RATE"), Some(ExportKind::Named));
        assert_eq!(kind_of("CartPage"), Some(ExportKind::Default));
        assert_eq!(
            node.exports.iter().find(|e| e.name == "TAX_RATE").map(|e| e.line),
            Some(4)
        );
    }

    #[test]
    fn aliased_named_imports_record_local_binding() {
        let node = extract(
            "src/a.ts",
            "import { original as renamed } from \"./b\";\n",
        );
        assert_eq!(node.imports.len(), 1);
        assert_eq!(node.imports[0].name, "renamed");
    }

    #[test]
    fn total_over_garbage_input() {
        let node = extract("src/weird.ts", "import from from;\n\u{0}\u{1}\nexport {");
        // Nothing matched, nothing panicked.
        assert!(node.imports.is_empty());
        assert_eq!(node.kind, NodeKind::File);
        assert_eq!(node.complexity, 1);
    }

    #[test]
    fn id_is_deterministic_across_extractions() {
        let a = extract("src/pages/Cart.tsx", "");
        let b = extract("src/pages/Cart.tsx", "// changed content\n");
        assert_eq!(a.id, b.id);
        let c = extract("src/pages/Checkout.tsx", "");
        assert_ne!(a.id, c.id);
    }
}
