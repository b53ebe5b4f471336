use anyhow::{Context, Result};
use rackdiff_core::compare::document_diff;
use rackdiff_core::diff::{render, render_structural, structural_diff, DiffHeaders, DiffMode};
use rackdiff_core::inventory::{fingerprint, short_fingerprint};
use rackdiff_core::model::Server;

use crate::commands::util::{find_server, GlobalOptions, Settings};

/// Whole-document diff of two servers' JSON.
pub fn diff_json_command(
    options: &GlobalOptions,
    left: &str,
    right: &str,
    mode: Option<DiffMode>,
    structural: bool,
) -> Result<()> {
    let settings = Settings::load(options)?;
    let inventory = settings.load_inventory()?;
    let left = find_server(&inventory, left)?;
    let right = find_server(&inventory, right)?;

    print!("{}", render_document_diff(left, right, settings.diff_mode(mode), structural)?);
    Ok(())
}

/// Line diff in `mode`, or the path-level diff when `structural` is set.
///
/// Servers with equal fingerprints get an "identical" header line above the
/// (all unchanged) diff.
pub fn render_document_diff(
    left: &Server,
    right: &Server,
    mode: DiffMode,
    structural: bool,
) -> Result<String> {
    let left_fp = fingerprint(left)?;
    let right_fp = fingerprint(right)?;
    let mut out = String::new();
    if left_fp == right_fp {
        out.push_str(&format!(
            "{} and {} are identical (fingerprint {}).\n",
            left.name,
            right.name,
            short_fingerprint(&left_fp)
        ));
    }

    if structural {
        let old = serde_json::to_value(left)
            .with_context(|| format!("Failed to serialize server '{}'", left.name))?;
        let new = serde_json::to_value(right)
            .with_context(|| format!("Failed to serialize server '{}'", right.name))?;
        out.push_str(&render_structural(&structural_diff(&old, &new)));
        return Ok(out);
    }

    let diff = document_diff(left, right).context("Failed to serialize servers for diffing")?;
    out.push_str(&render(&diff, mode, &DiffHeaders::new(&left.name, &right.name)));
    Ok(out)
}
