//! Doc-driven source annotator.
//!
//! Reads a JSON documentation export keyed by function and parameter name
//! and rewrites the declarative `Parameter { .. }` records in a source
//! tree: descriptions are inserted or refreshed, (optionally) literal
//! default values become references to shared `LazyLock` constants that
//! the annotator also declares, and (optionally) defaulted parameter
//! arrays are wrapped in a shared `PARAMETERS` static.
//!
//! The whole pass is idempotent textual rewriting: running it twice with
//! unchanged input leaves the files exactly as the first run wrote them.

pub mod docs;
pub mod rewrite;

pub use docs::DocsExport;

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::ui;

/// Counts reported after an annotation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnnotateSummary {
    /// Files whose contents changed.
    pub modified: usize,
    /// Files examined.
    pub total: usize,
}

/// Annotate every `.rs` file under `source_dir`.
///
/// # Arguments
/// * `docs` - The documentation export
/// * `source_dir` - Root of the source tree to rewrite
/// * `with_defaults` - Also inject default-value constants, not just descriptions
/// * `wrap` - Also wrap defaulted parameter arrays in a shared `PARAMETERS` static
pub fn annotate_tree(
    docs: &DocsExport,
    source_dir: &Path,
    with_defaults: bool,
    wrap: bool,
) -> Result<AnnotateSummary> {
    let mut files = Vec::new();
    collect_rust_files(source_dir, &mut files)?;
    files.sort();

    let mut modified = 0;
    for file in &files {
        if annotate_file(file, docs, with_defaults, wrap)? {
            ui::display_success(&format!("Updated {}", file.display()));
            modified += 1;
        }
    }

    Ok(AnnotateSummary {
        modified,
        total: files.len(),
    })
}

/// Annotate a single source file. Returns whether it was modified.
///
/// Files without an `identifier()` implementation or without parameter
/// records are skipped.
pub fn annotate_file(
    path: &Path,
    docs: &DocsExport,
    with_defaults: bool,
    wrap: bool,
) -> Result<bool> {
    let content = fs::read_to_string(path)?;

    let function_name = match rewrite::extract_identifier(&content) {
        Some(name) => name,
        None => return Ok(false),
    };

    let blocks = rewrite::extract_parameter_blocks(&content);
    if blocks.is_empty() {
        return Ok(false);
    }

    let mut updated_content = content.clone();
    let mut constants = Vec::new();

    for (param_name, block) in &blocks {
        let description = docs
            .description(&function_name, param_name)
            .unwrap_or("TODO");
        let mut updated_block = rewrite::set_description(block, description);

        if with_defaults {
            let constant = docs.default_constant(&function_name, param_name)?;
            updated_block =
                rewrite::set_default(&updated_block, constant.as_ref().map(|c| c.static_name.as_str()));
            if let Some(constant) = constant {
                constants.push(constant);
            }
        }

        if &updated_block != block {
            updated_content = updated_content.replace(block, &updated_block);
        }
    }

    if !constants.is_empty() {
        let needs_bytes = constants.iter().any(|c| c.needs_bytes);
        updated_content = rewrite::add_static_declarations(&updated_content, &constants);
        updated_content = rewrite::add_imports(&updated_content, needs_bytes, true);
    }

    if wrap {
        if let Some(wrapped) = rewrite::wrap_parameters(&updated_content) {
            updated_content = rewrite::add_imports(&wrapped, false, true);
        }
    }

    if updated_content == content {
        return Ok(false);
    }

    fs::write(path, updated_content)?;
    Ok(true)
}

fn collect_rust_files(dir: &Path, files: &mut Vec<PathBuf>) -> Result<()> {
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            collect_rust_files(&path, files)?;
        } else if path.extension().is_some_and(|ext| ext == "rs") {
            files.push(path);
        }
    }
    Ok(())
}
