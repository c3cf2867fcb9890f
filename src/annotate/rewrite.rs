//! Textual rewriting of `Parameter { .. }` records.
//!
//! The grammar here is fixed and ad-hoc (the declarative parameter blocks
//! of a stdlib function implementation), so the rewriting is regex-based
//! rather than a general parse. Every transformation is idempotent:
//! applying it to already-annotated text yields the text unchanged.

use regex::{Captures, Regex};

use super::docs::{escape, DefaultConstant};

/// Extract the function identifier from a source file.
///
/// Looks for the `identifier()` method implementation:
/// `fn identifier(&self) -> &'static str { "name" }`.
pub fn extract_identifier(content: &str) -> Option<String> {
    let re = Regex::new(r#"fn identifier\(&self\) -> &'static str \{\s*"([^"]+)""#)
        .expect("identifier regex is valid");
    re.captures(content).map(|caps| caps[1].to_string())
}

/// Extract `Parameter { .. }` blocks as (keyword, block text) pairs.
///
/// Blocks without a recognizable `keyword:` field are skipped.
pub fn extract_parameter_blocks(content: &str) -> Vec<(String, String)> {
    let block_re = Regex::new(r"Parameter\s*\{[^}]+\}").expect("block regex is valid");
    let keyword_re = Regex::new(r#"keyword:\s*"([^"]+)""#).expect("keyword regex is valid");

    block_re
        .find_iter(content)
        .filter_map(|m| {
            let block = m.as_str();
            keyword_re
                .captures(block)
                .map(|caps| (caps[1].to_string(), block.to_string()))
        })
        .collect()
}

/// Insert or refresh the `description:` field of a parameter block.
///
/// An existing description is replaced; otherwise the field is added
/// directly after `required:`.
pub fn set_description(block: &str, description: &str) -> String {
    let escaped = escape(description);

    let existing = Regex::new(r#"description:\s*"[^"]*""#).expect("description regex is valid");
    if existing.is_match(block) {
        return existing
            .replace(block, |_: &Captures| format!("description: \"{}\"", escaped))
            .into_owned();
    }

    let after_required =
        Regex::new(r"(required:\s*(?:true|false)\s*,)").expect("required regex is valid");
    let updated = after_required
        .replace(block, |caps: &Captures| {
            format!("{}\n            description: \"{}\",", &caps[1], escaped)
        })
        .into_owned();

    if updated != block {
        return updated;
    }

    // `required` without a trailing comma, right before the closing brace
    let before_brace =
        Regex::new(r"(required:\s*(?:true|false)\s*)(\})").expect("required regex is valid");
    before_brace
        .replace(block, |caps: &Captures| {
            format!(
                "{},\n            description: \"{}\",\n        {}",
                &caps[1], escaped, &caps[2]
            )
        })
        .into_owned()
}

/// Insert or refresh the `default:` field of a parameter block.
///
/// `Some(static_name)` produces `default: Some(&NAME)`, `None` produces
/// `default: None`. A new field is added directly after `description:`.
pub fn set_default(block: &str, static_name: Option<&str>) -> String {
    let value = match static_name {
        Some(name) => format!("Some(&{})", name),
        None => "None".to_string(),
    };

    let existing =
        Regex::new(r"default:\s*(?:Some\([^)]+\)|None)").expect("default regex is valid");
    if existing.is_match(block) {
        return existing
            .replace(block, |_: &Captures| format!("default: {}", value))
            .into_owned();
    }

    let after_description =
        Regex::new(r#"(description:\s*"[^"]*",)"#).expect("description regex is valid");
    after_description
        .replace(block, |caps: &Captures| {
            format!("{}\n            default: {},", &caps[1], value)
        })
        .into_owned()
}

/// Add `static NAME: LazyLock<Value> = ...;` declarations for constants not
/// already declared, inserted after the imports.
pub fn add_static_declarations(content: &str, constants: &[DefaultConstant]) -> String {
    let missing: Vec<&DefaultConstant> = constants
        .iter()
        .filter(|c| !content.contains(&format!("static {}:", c.static_name)))
        .collect();

    if missing.is_empty() {
        return content.to_string();
    }

    let declarations: Vec<String> = missing
        .iter()
        .map(|c| {
            format!(
                "static {}: LazyLock<Value> = LazyLock::new(|| {});",
                c.static_name, c.constructor
            )
        })
        .collect();

    let mut lines: Vec<&str> = content.lines().collect();
    let insert_idx = item_insertion_index(&lines);

    let mut block = Vec::new();
    if insert_idx > 0 {
        block.push(String::new());
    }
    block.extend(declarations);
    block.push(String::new());

    let mut result: Vec<String> = lines.drain(..insert_idx).map(str::to_string).collect();
    result.extend(block);
    result.extend(lines.into_iter().map(str::to_string));

    let mut joined = result.join("\n");
    if content.ends_with('\n') && !joined.ends_with('\n') {
        joined.push('\n');
    }
    joined
}

/// Rewrite a `fn parameters()` body that references `DEFAULT_*` statics
/// into a shared `static PARAMETERS: LazyLock<Vec<Parameter>>`, with the
/// method returning `PARAMETERS.as_slice()`.
///
/// Returns `None` when the file carries no such defaults, is already
/// wrapped, or has no recognizable `parameters()` method.
pub fn wrap_parameters(content: &str) -> Option<String> {
    if !content.contains("default: Some(&DEFAULT") {
        return None;
    }
    if content.contains("static PARAMETERS: LazyLock<Vec<Parameter>>") {
        return None;
    }

    let method_re =
        Regex::new(r"(?s)fn parameters\(&self\) -> &'static \[Parameter\] \{\s*&\[(.*?)\]\s*\}")
            .expect("parameters regex is valid");
    let caps = method_re.captures(content)?;
    let method = caps.get(0).map(|m| m.as_str())?;
    let body = caps[1].trim();

    let declaration = format!(
        "static PARAMETERS: LazyLock<Vec<Parameter>> = LazyLock::new(|| {{\n    vec![\n        {},\n    ]\n}});",
        body.trim_end_matches(',')
    );

    let mut lines: Vec<&str> = content.lines().collect();
    let insert_idx = item_insertion_index(&lines);

    let mut block = Vec::new();
    if insert_idx > 0 && !lines[insert_idx - 1].trim().is_empty() {
        block.push(String::new());
    }
    block.extend(declaration.lines().map(str::to_string));
    block.push(String::new());

    let mut result: Vec<String> = lines.drain(..insert_idx).map(str::to_string).collect();
    result.extend(block);
    result.extend(lines.into_iter().map(str::to_string));

    let mut joined = result.join("\n");
    if content.ends_with('\n') && !joined.ends_with('\n') {
        joined.push('\n');
    }

    let replacement =
        "fn parameters(&self) -> &'static [Parameter] {\n        PARAMETERS.as_slice()\n    }";
    Some(joined.replace(method, replacement))
}

/// Add `use` lines for LazyLock/Bytes when newly needed.
pub fn add_imports(content: &str, needs_bytes: bool, needs_lazylock: bool) -> String {
    let has_bytes = content.contains("use bytes::Bytes")
        || content.contains("use crate::compiler::prelude::*");
    let has_lazylock = content.contains("use std::sync::LazyLock");

    let mut imports = Vec::new();
    if needs_lazylock && !has_lazylock {
        imports.push("use std::sync::LazyLock;");
    }
    if needs_bytes && !has_bytes {
        imports.push("use bytes::Bytes;");
    }

    if imports.is_empty() {
        return content.to_string();
    }

    let lines: Vec<&str> = content.lines().collect();
    let insert_idx = import_insertion_index(&lines);

    let mut result: Vec<&str> = Vec::with_capacity(lines.len() + imports.len());
    result.extend(&lines[..insert_idx]);
    result.extend(&imports);
    result.extend(&lines[insert_idx..]);

    let mut joined = result.join("\n");
    if content.ends_with('\n') && !joined.ends_with('\n') {
        joined.push('\n');
    }
    joined
}

/// Index after the last `use` line, bounded by the first item declaration.
fn import_insertion_index(lines: &[&str]) -> usize {
    let mut idx = 0;
    for (i, line) in lines.iter().enumerate() {
        if line.starts_with("use ") || line.starts_with("pub use ") {
            idx = i + 1;
        } else if line.starts_with("fn ")
            || line.starts_with("pub fn ")
            || line.starts_with("struct ")
            || line.starts_with("pub struct ")
        {
            break;
        }
    }
    idx
}

/// Index of the first item declaration following the imports.
fn item_insertion_index(lines: &[&str]) -> usize {
    let mut idx = 0;
    for (i, line) in lines.iter().enumerate() {
        let stripped = line.trim_start();
        if stripped.starts_with("fn ")
            || stripped.starts_with("pub fn ")
            || stripped.starts_with("struct ")
            || stripped.starts_with("pub struct ")
            || stripped.starts_with("impl ")
            || stripped.starts_with("const ")
            || stripped.starts_with("#[derive")
        {
            return i;
        }
        if !stripped.is_empty() && !stripped.starts_with("use ") && !stripped.starts_with("//") {
            idx = i;
        }
    }
    idx
}

#[cfg(test)]
mod tests {
    use super::*;

    const SOURCE: &str = r#"use crate::compiler::prelude::*;

fn identifier(&self) -> &'static str {
    "contains"
}

fn parameters(&self) -> &'static [Parameter] {
    &[
        Parameter {
            keyword: "value",
            kind: kind::BYTES,
            required: true,
        },
        Parameter {
            keyword: "case_sensitive",
            kind: kind::BOOLEAN,
            required: false,
        },
    ]
}
"#;

    #[test]
    fn test_extract_identifier() {
        assert_eq!(extract_identifier(SOURCE).as_deref(), Some("contains"));
        assert_eq!(extract_identifier("fn main() {}"), None);
    }

    #[test]
    fn test_extract_parameter_blocks() {
        let blocks = extract_parameter_blocks(SOURCE);
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].0, "value");
        assert_eq!(blocks[1].0, "case_sensitive");
        assert!(blocks[1].1.contains("required: false"));
    }

    #[test]
    fn test_set_description_inserts_after_required() {
        let blocks = extract_parameter_blocks(SOURCE);
        let updated = set_description(&blocks[0].1, "The text to search.");
        assert!(updated.contains("required: true,\n            description: \"The text to search.\","));
    }

    #[test]
    fn test_set_description_replaces_existing() {
        let block = "Parameter {\n            keyword: \"value\",\n            required: true,\n            description: \"old text\",\n        }";
        let updated = set_description(block, "new text");
        assert!(updated.contains("description: \"new text\""));
        assert!(!updated.contains("old text"));
    }

    #[test]
    fn test_set_description_idempotent() {
        let blocks = extract_parameter_blocks(SOURCE);
        let once = set_description(&blocks[0].1, "The text to search.");
        let twice = set_description(&once, "The text to search.");
        assert_eq!(once, twice);
    }

    #[test]
    fn test_set_description_escapes_quotes() {
        let blocks = extract_parameter_blocks(SOURCE);
        let updated = set_description(&blocks[0].1, r#"matches "exactly""#);
        assert!(updated.contains(r#"description: "matches \"exactly\"","#));
    }

    #[test]
    fn test_set_default_after_description() {
        let blocks = extract_parameter_blocks(SOURCE);
        let with_description = set_description(&blocks[1].1, "Case sensitivity.");
        let updated = set_default(&with_description, Some("DEFAULT_CASE_SENSITIVE"));
        assert!(updated.contains("description: \"Case sensitivity.\",\n            default: Some(&DEFAULT_CASE_SENSITIVE),"));
    }

    #[test]
    fn test_set_default_replaces_existing() {
        let block = "Parameter {\n            keyword: \"x\",\n            required: false,\n            description: \"d\",\n            default: Some(&OLD),\n        }";
        assert!(set_default(block, Some("NEW")).contains("default: Some(&NEW)"));
        assert!(set_default(block, None).contains("default: None"));
    }

    #[test]
    fn test_add_static_declarations() {
        let constant = DefaultConstant {
            static_name: "DEFAULT_CASE_SENSITIVE".to_string(),
            constructor: "Value::Boolean(true)".to_string(),
            needs_bytes: false,
        };
        let updated = add_static_declarations(SOURCE, std::slice::from_ref(&constant));
        assert!(updated.contains(
            "static DEFAULT_CASE_SENSITIVE: LazyLock<Value> = LazyLock::new(|| Value::Boolean(true));"
        ));

        // Second application must not duplicate the declaration
        let again = add_static_declarations(&updated, &[constant]);
        assert_eq!(updated, again);
    }

    #[test]
    fn test_add_imports_skips_present_ones() {
        let updated = add_imports(SOURCE, true, true);
        // Bytes comes in through the prelude glob already
        assert!(!updated.contains("use bytes::Bytes;"));
        assert!(updated.contains("use std::sync::LazyLock;"));

        let again = add_imports(&updated, true, true);
        assert_eq!(updated, again);
    }

    const ANNOTATED: &str = r#"use crate::compiler::prelude::*;
use std::sync::LazyLock;

static DEFAULT_CASE_SENSITIVE: LazyLock<Value> = LazyLock::new(|| Value::Boolean(true));

fn identifier(&self) -> &'static str {
    "contains"
}

fn parameters(&self) -> &'static [Parameter] {
    &[
        Parameter {
            keyword: "value",
            required: true,
            description: "The text to search.",
            default: None,
        },
        Parameter {
            keyword: "case_sensitive",
            required: false,
            description: "Case sensitivity.",
            default: Some(&DEFAULT_CASE_SENSITIVE),
        },
    ]
}
"#;

    #[test]
    fn test_wrap_parameters_builds_shared_static() {
        let wrapped = wrap_parameters(ANNOTATED).unwrap();

        assert!(wrapped.contains("static PARAMETERS: LazyLock<Vec<Parameter>> = LazyLock::new(|| {"));
        assert!(wrapped.contains("vec!["));
        assert!(wrapped.contains("default: Some(&DEFAULT_CASE_SENSITIVE),"));
        assert!(wrapped
            .contains("fn parameters(&self) -> &'static [Parameter] {\n        PARAMETERS.as_slice()\n    }"));
        // The old borrowed-array body is gone
        assert!(!wrapped.contains("&[\n"));
    }

    #[test]
    fn test_wrap_parameters_declares_static_before_items() {
        let wrapped = wrap_parameters(ANNOTATED).unwrap();
        let static_idx = wrapped.find("static PARAMETERS").unwrap();
        let identifier_idx = wrapped.find("fn identifier").unwrap();
        assert!(static_idx < identifier_idx);
    }

    #[test]
    fn test_wrap_parameters_skips_files_without_defaults() {
        assert!(wrap_parameters(SOURCE).is_none());
    }

    #[test]
    fn test_wrap_parameters_already_wrapped_is_skipped() {
        let wrapped = wrap_parameters(ANNOTATED).unwrap();
        assert!(wrap_parameters(&wrapped).is_none());
    }

    #[test]
    fn test_add_imports_inserts_after_use_block() {
        let source = "use a::b;\nuse c::d;\n\nfn main() {}\n";
        let updated = add_imports(source, false, true);
        assert_eq!(
            updated,
            "use a::b;\nuse c::d;\nuse std::sync::LazyLock;\n\nfn main() {}\n"
        );
    }
}
