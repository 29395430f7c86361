use std::sync::OnceLock;

use regex::Regex;

fn regex(pattern: &str) -> Regex {
    Regex::new(pattern).expect("valid regex literal")
}

// ---------------------------------------------------------------------------
// Import bindings (applied per line)
// ---------------------------------------------------------------------------

/// `import Foo from "./x"` and `import Foo, { a, b } from "./x"`
pub(crate) fn regex_import_default() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        regex(
            r#"^\s*import\s+([A-Za-z_$][A-Za-z0-9_$]*)\s*(?:,\s*\{([^}]*)\})?\s+from\s+["']([^"']+)["']"#,
        )
    })
}

/// `import { a, b as c } from "./x"`
pub(crate) fn regex_import_named() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| regex(r#"^\s*import\s+\{([^}]*)\}\s+from\s+["']([^"']+)["']"#))
}

/// `import * as ns from "./x"`
pub(crate) fn regex_import_namespace() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        regex(r#"^\s*import\s+\*\s+as\s+([A-Za-z_$][A-Za-z0-9_$]*)\s+from\s+["']([^"']+)["']"#)
    })
}

/// `import type { A, B } from "./x"` and `import type A from "./x"`
pub(crate) fn regex_import_type_only() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        regex(
            r#"^\s*import\s+type\s+(?:\{([^}]*)\}|([A-Za-z_$][A-Za-z0-9_$]*))\s+from\s+["']([^"']+)["']"#,
        )
    })
}

// ---------------------------------------------------------------------------
// Export bindings (applied per line)
// ---------------------------------------------------------------------------

/// `export default function Foo`, `export default class Foo`, bare `export default`
pub(crate) fn regex_export_default() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        regex(
            r#"^\s*export\s+default\s*(?:(?:async\s+)?(?:function|class)\s+([A-Za-z_$][A-Za-z0-9_$]*))?"#,
        )
    })
}

/// `export [async] function|const|let|var|class|interface|type|enum Name`
pub(crate) fn regex_export_named_decl() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        regex(
            r#"^\s*export\s+(?:async\s+)?(function|const|let|var|class|abstract\s+class|interface|type|enum)\s+([A-Za-z_$][A-Za-z0-9_$.]*)"#,
        )
    })
}

/// `export { a, b as c };` (with or without a trailing `from`)
pub(crate) fn regex_export_brace() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| regex(r#"^\s*export\s+\{([^}]+)\}"#))
}

// ---------------------------------------------------------------------------
// Classification / facet patterns
// ---------------------------------------------------------------------------

/// Exported capitalized function, the usual component shape.
pub(crate) fn regex_component_fn() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        regex(
            r#"(?m)^\s*export\s+(?:default\s+)?(?:async\s+)?(?:function\s+[A-Z][A-Za-z0-9_]*|const\s+[A-Z][A-Za-z0-9_]*\s*(?::[^=]+)?=)"#,
        )
    })
}

/// Markup-returning syntax: an element tag opened inside the file.
pub(crate) fn regex_markup() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| regex(r#"<([A-Za-z][A-Za-z0-9]*)(\s|>|/)"#))
}

/// `<form` opening tag, the form-handler signal.
pub(crate) fn regex_form_markup() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| regex(r#"<form[\s>]"#))
}

/// Submit wiring on a form: `onSubmit={...}` or a `handleSubmit` binding.
pub(crate) fn regex_submit_handler() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| regex(r#"onSubmit\s*=|handleSubmit"#))
}

/// Top-level class declaration.
pub(crate) fn regex_class_decl() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        regex(r#"(?m)^\s*(?:export\s+)?(?:default\s+)?(?:abstract\s+)?class\s+([A-Za-z_$][A-Za-z0-9_$]*)"#)
    })
}

/// Top-level exported interface/type/enum.
pub(crate) fn regex_type_decl() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| regex(r#"(?m)^\s*export\s+(?:declare\s+)?(interface|type|enum)\s+"#))
}

/// Table-shaped declaration (`defineTable`, `createTable`, `pgTable`, …).
pub(crate) fn regex_table_decl() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| regex(r#"\b(?:defineTable|createTable|pgTable|sqliteTable|mysqlTable)\s*\("#))
}

/// Branching/looping/logical-combinator constructs for the complexity estimate.
pub(crate) fn regex_branching() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| regex(r#"\b(?:if|for|while|case|catch)\b|&&|\|\||\s\?\s"#))
}

/// Interface/object-type field line: `name?: Type;`
pub(crate) fn regex_field_line() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        regex(r#"^\s*(?:readonly\s+)?([A-Za-z_$][A-Za-z0-9_$]*)(\?)?\s*:\s*([^;,{}]+?)[;,]?\s*$"#)
    })
}

/// Route-handler verb export: `export async function GET(...)` / `export const POST = ...`
pub(crate) fn regex_route_verb() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        regex(
            r#"^\s*export\s+(?:async\s+)?(?:function|const)\s+(GET|POST|PUT|PATCH|DELETE|OPTIONS|HEAD)\b"#,
        )
    })
}

/// Default route handler: `export default [async] function handler(`
pub(crate) fn regex_route_default_handler() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| regex(r#"^\s*export\s+default\s+(?:async\s+)?function\s+(handler|[a-zA-Z]+Handler)\b"#))
}

/// Callable declared in a logic unit: `const doThing = (...)` / `function doThing(`
pub(crate) fn regex_local_callable() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        regex(
            r#"^\s*(?:const|function)\s+([a-z_$][A-Za-z0-9_$]*)\s*(?:=\s*(?:async\s*)?\(|\()"#,
        )
    })
}

/// Class member signature: `  [async] name(` at member indentation.
pub(crate) fn regex_class_method() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        regex(r#"^\s+(?:public\s+|private\s+|protected\s+|static\s+)*(?:async\s+)?([A-Za-z_$][A-Za-z0-9_$]*)\s*\("#)
    })
}

/// Props destructuring in a component signature: `({ a, b }: Props)` or `({ a, b })`.
pub(crate) fn regex_props_destructure() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| regex(r#"\(\s*\{([^}]*)\}\s*(?::\s*[A-Za-z_$][A-Za-z0-9_$<>,\s]*)?\)"#))
}
