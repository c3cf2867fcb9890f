//! Typed view over the JSON documentation export.
//!
//! The export is keyed by function name under `remap.functions`, each
//! carrying an `arguments` array with `name`, `description`, and an
//! optional literal `default`.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;
use serde_json::Value;

use crate::error::{ReleaseError, Result};

#[derive(Debug, Deserialize)]
struct RawExport {
    remap: RemapSection,
}

#[derive(Debug, Deserialize)]
struct RemapSection {
    functions: HashMap<String, FunctionDocs>,
}

#[derive(Debug, Deserialize, Default)]
pub struct FunctionDocs {
    #[serde(default)]
    arguments: Vec<ArgumentDocs>,
}

#[derive(Debug, Deserialize)]
pub struct ArgumentDocs {
    name: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    default: Option<Value>,
}

/// A shared-constant declaration backing a parameter default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefaultConstant {
    /// e.g. `DEFAULT_CASE_SENSITIVE`
    pub static_name: String,
    /// e.g. `Value::Boolean(true)`
    pub constructor: String,
    /// Whether the constructor needs the `Bytes` import.
    pub needs_bytes: bool,
}

/// Documentation export keyed by function and parameter name.
#[derive(Debug)]
pub struct DocsExport {
    functions: HashMap<String, FunctionDocs>,
}

impl DocsExport {
    /// Load and parse the documentation export from disk.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let raw: RawExport = serde_json::from_str(&content)?;
        Ok(DocsExport {
            functions: raw.remap.functions,
        })
    }

    #[cfg(test)]
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: RawExport = serde_json::from_str(json)?;
        Ok(DocsExport {
            functions: raw.remap.functions,
        })
    }

    /// Number of documented functions.
    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    fn argument(&self, function: &str, param: &str) -> Option<&ArgumentDocs> {
        self.functions
            .get(function)?
            .arguments
            .iter()
            .find(|arg| arg.name == param)
    }

    /// Description text for a parameter, if documented.
    pub fn description(&self, function: &str, param: &str) -> Option<&str> {
        self.argument(function, param)?.description.as_deref()
    }

    /// Default-value constant for a parameter, if the export declares one.
    ///
    /// Literal defaults map to `Value` constructors: booleans and integers
    /// directly, strings through `Bytes`. Floats and structured values are
    /// rejected rather than guessed at.
    pub fn default_constant(&self, function: &str, param: &str) -> Result<Option<DefaultConstant>> {
        let default = match self.argument(function, param).and_then(|a| a.default.as_ref()) {
            Some(value) => value,
            None => return Ok(None),
        };

        let constructor = match default {
            Value::Bool(b) => format!("Value::Boolean({})", b),
            Value::Number(n) if n.is_i64() => format!("Value::Integer({})", n),
            Value::String(s) => format!("Value::Bytes(Bytes::from(\"{}\"))", escape(s)),
            other => {
                return Err(ReleaseError::config(format!(
                    "Unsupported default value {} for {}.{}",
                    other, function, param
                )))
            }
        };

        Ok(Some(DefaultConstant {
            static_name: format!("DEFAULT_{}", param.to_uppercase()),
            needs_bytes: constructor.contains("Bytes::from"),
            constructor,
        }))
    }
}

/// Escape a description or default for use in a Rust string literal.
pub fn escape(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXPORT: &str = r#"{
        "remap": {
            "functions": {
                "contains": {
                    "arguments": [
                        {"name": "value", "description": "The text to search."},
                        {"name": "case_sensitive", "description": "Whether the match is case sensitive.", "default": true},
                        {"name": "max_depth", "default": 3},
                        {"name": "mode", "default": "strict \"quoted\""}
                    ]
                },
                "upcase": {}
            }
        }
    }"#;

    #[test]
    fn test_load_and_lookup_description() {
        let docs = DocsExport::from_json(EXPORT).unwrap();
        assert_eq!(docs.len(), 2);
        assert_eq!(
            docs.description("contains", "value"),
            Some("The text to search.")
        );
        assert_eq!(docs.description("contains", "missing"), None);
        assert_eq!(docs.description("unknown_fn", "value"), None);
    }

    #[test]
    fn test_bool_default() {
        let docs = DocsExport::from_json(EXPORT).unwrap();
        let constant = docs
            .default_constant("contains", "case_sensitive")
            .unwrap()
            .unwrap();
        assert_eq!(constant.static_name, "DEFAULT_CASE_SENSITIVE");
        assert_eq!(constant.constructor, "Value::Boolean(true)");
        assert!(!constant.needs_bytes);
    }

    #[test]
    fn test_integer_default() {
        let docs = DocsExport::from_json(EXPORT).unwrap();
        let constant = docs
            .default_constant("contains", "max_depth")
            .unwrap()
            .unwrap();
        assert_eq!(constant.constructor, "Value::Integer(3)");
    }

    #[test]
    fn test_string_default_is_escaped_and_needs_bytes() {
        let docs = DocsExport::from_json(EXPORT).unwrap();
        let constant = docs.default_constant("contains", "mode").unwrap().unwrap();
        assert_eq!(
            constant.constructor,
            "Value::Bytes(Bytes::from(\"strict \\\"quoted\\\"\"))"
        );
        assert!(constant.needs_bytes);
    }

    #[test]
    fn test_no_default_returns_none() {
        let docs = DocsExport::from_json(EXPORT).unwrap();
        assert!(docs.default_constant("contains", "value").unwrap().is_none());
    }

    #[test]
    fn test_float_default_is_rejected() {
        let export = r#"{"remap": {"functions": {"f": {"arguments": [{"name": "x", "default": 1.5}]}}}}"#;
        let docs = DocsExport::from_json(export).unwrap();
        assert!(docs.default_constant("f", "x").is_err());
    }

    #[test]
    fn test_escape() {
        assert_eq!(escape(r#"say "hi" \ bye"#), r#"say \"hi\" \\ bye"#);
    }
}
