use anyhow::{bail, Result};
use chrono::Utc;
use rackdiff_core::compare::{
    compare_servers, ComponentDiff, DependencyDiff, DiffEntry, DiffStatus, FieldDiff,
    Reconciliation, ServerComparison,
};
use rackdiff_core::diff::{COLLAPSED_MARKER, EXPANDED_MARKER};
use serde::Serialize;

use crate::commands::util::{find_server, GlobalOptions, Settings};

/// Which rows of the comparison table are expanded.
#[derive(Debug, Clone, Default)]
pub struct RowExpansion {
    pub names: Vec<String>,
    pub all: bool,
}

impl RowExpansion {
    pub fn is_expanded(&self, name: &str) -> bool {
        self.all || self.names.iter().any(|n| n == name)
    }
}

#[derive(Debug, Serialize)]
pub struct ComparisonReport<'a> {
    pub generated_at: String,
    pub left: &'a str,
    pub right: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,
    pub common: Vec<&'a str>,
    pub left_only: Vec<&'a str>,
    pub right_only: Vec<&'a str>,
    pub overview: Reconciliation,
    pub components: Vec<ComponentReport>,
}

/// Outcome of one component comparison; exactly one of `diff`/`error` is set.
#[derive(Debug, Serialize)]
pub struct ComponentReport {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diff: Option<ComponentDiff>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Compare two servers component by component.
pub fn compare_command(
    options: &GlobalOptions,
    left: &str,
    right: &str,
    filter: Option<&str>,
    expansion: &RowExpansion,
    json: bool,
) -> Result<()> {
    let settings = Settings::load(options)?;
    let inventory = settings.load_inventory()?;
    let left = find_server(&inventory, left)?;
    let right = find_server(&inventory, right)?;

    let comparison = compare_servers(left, right, filter);

    let unknown: Vec<&str> = expansion
        .names
        .iter()
        .map(String::as_str)
        .filter(|name| !comparison.common_names().iter().any(|common| common == name))
        .collect();
    if !unknown.is_empty() {
        bail!(
            "Not a shared component of '{}' and '{}': {}. Shared components: {}",
            left.name,
            right.name,
            unknown.join(", "),
            comparison.common_names().join(", ")
        );
    }

    if json {
        let report = build_report(&comparison);
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", render_comparison(&comparison, expansion));
    }
    Ok(())
}

/// JSON report with a diff (or error) for every shared component.
pub fn build_report<'a>(comparison: &ServerComparison<'a>) -> ComparisonReport<'a> {
    let components = comparison
        .diff_all()
        .into_iter()
        .map(|(name, result)| match result {
            Ok(diff) => ComponentReport { name: name.to_string(), diff: Some(diff), error: None },
            Err(err) => {
                ComponentReport { name: name.to_string(), diff: None, error: Some(err.to_string()) }
            }
        })
        .collect();

    ComparisonReport {
        generated_at: Utc::now().to_rfc3339(),
        left: &comparison.left().name,
        right: &comparison.right().name,
        filter: comparison.filter().map(str::to_string),
        common: comparison.common_names().to_vec(),
        left_only: comparison.left_only(),
        right_only: comparison.right_only(),
        overview: comparison.overview(),
        components,
    }
}

/// Text table: one summary row per shared component, diffs under expanded rows.
///
/// Diffs are computed only for expanded rows. A failed comparison is printed
/// on its row and the rest of the table is unaffected.
pub fn render_comparison(comparison: &ServerComparison<'_>, expansion: &RowExpansion) -> String {
    let left = comparison.left();
    let right = comparison.right();

    let mut out = format!("{} × {}\n", left.name, right.name);
    if let Some(filter) = comparison.filter() {
        out.push_str(&format!("Filter: \"{filter}\"\n"));
    }

    let counts = comparison.overview().counts();
    out.push_str(&format!(
        "Overview: {} unchanged, {} changed, {} only on {}, {} only on {}\n",
        counts.unchanged, counts.changed, counts.removed, left.name, counts.added, right.name
    ));

    let common = comparison.common_names();
    out.push_str(&format!("\nCommon components ({}):\n", common.len()));
    if common.is_empty() {
        out.push_str("  (none)\n");
    }
    for name in common {
        let expanded = expansion.is_expanded(name);
        let marker = if expanded { EXPANDED_MARKER } else { COLLAPSED_MARKER };
        out.push_str(&format!("{marker} {}\n", summary_row(comparison, name)));
        if !expanded {
            continue;
        }
        match comparison.diff_for(name) {
            Ok(diff) => push_indented(&mut out, &render_component_diff(&diff), 4),
            Err(err) => out.push_str(&format!("    ! {err}\n")),
        }
    }

    push_name_list(&mut out, &format!("Only on {}", left.name), &comparison.left_only());
    push_name_list(&mut out, &format!("Only on {}", right.name), &comparison.right_only());
    out
}

/// Row label built from the left-hand component.
fn summary_row(comparison: &ServerComparison<'_>, name: &str) -> String {
    match comparison.left().component(name) {
        Some(component) => {
            let mut row = format!(
                "[{}] {}  v{}  {}",
                component.variant(),
                component.name,
                component.version,
                component.short_commit()
            );
            if let Some(pid) = component.pid() {
                row.push_str(&format!("  {pid}"));
            }
            if !component.url.is_empty() {
                row.push_str(&format!("  {}", component.url));
            }
            row
        }
        None => name.to_string(),
    }
}

fn push_name_list(out: &mut String, title: &str, names: &[&str]) {
    if names.is_empty() {
        return;
    }
    out.push_str(&format!("\n{title} ({}):\n", names.len()));
    for name in names {
        out.push_str(&format!("  - {name}\n"));
    }
}

fn push_indented(out: &mut String, block: &str, indent: usize) {
    let pad = " ".repeat(indent);
    for line in block.lines() {
        if line.is_empty() {
            out.push('\n');
        } else {
            out.push_str(&pad);
            out.push_str(line);
            out.push('\n');
        }
    }
}

/// Field and dependency sections of one component diff.
pub fn render_component_diff(diff: &ComponentDiff) -> String {
    let mut out = String::from("Fields\n");
    for field in &diff.fields {
        out.push_str(&render_field(field));
    }

    match &diff.dependencies {
        DependencyDiff::Device { package_dependencies, binary_dependencies } => {
            push_section(&mut out, "Package Dependencies", package_dependencies);
            push_section(&mut out, "Binary Dependencies", binary_dependencies);
        }
        DependencyDiff::Common { dependencies, files } => {
            push_section(&mut out, "Dependencies", dependencies);
            push_section(&mut out, "Files", files);
        }
    }
    out
}

fn render_field(field: &FieldDiff) -> String {
    if field.is_different {
        format!("  ~ {}: {} → {}\n", field.field.label(), field.before, field.after)
    } else {
        format!("    {}: {}\n", field.field.label(), field.before)
    }
}

fn push_section(out: &mut String, title: &str, section: &Reconciliation) {
    out.push_str(&format!("\n{title}\n"));
    if section.entries.is_empty() {
        out.push_str("  (none)\n");
    }
    for entry in &section.entries {
        out.push_str(&format!("  {} {}\n", entry.status.marker(), entry_text(entry)));
    }
    for dup in &section.duplicates {
        out.push_str(&format!(
            "  ! '{}' appears {} times on the {} side; first occurrence used\n",
            dup.name, dup.occurrences, dup.side
        ));
    }
}

fn entry_text(entry: &DiffEntry) -> String {
    let value = |v: &Option<String>| v.clone().unwrap_or_else(|| "N/A".to_string());
    if entry.before.is_none() && entry.after.is_none() {
        return entry.key.clone();
    }
    match entry.status {
        DiffStatus::Changed => {
            format!("{}: {} → {}", entry.key, value(&entry.before), value(&entry.after))
        }
        DiffStatus::Added => format!("{}: {}", entry.key, value(&entry.after)),
        DiffStatus::Removed | DiffStatus::Unchanged => {
            format!("{}: {}", entry.key, value(&entry.before))
        }
    }
}
