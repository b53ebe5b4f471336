use anyhow::{anyhow, Context, Result};
use rackdiff_core::diff::{render_value, ExpansionState, NodePath, ViewMode};
use rackdiff_core::inventory::{fingerprint, short_fingerprint, FileContentProvider};
use rackdiff_core::model::{Component, ComponentKind, Dependency, Server};
use serde::Serialize;
use tracing::warn;

use crate::commands::util::{find_server, GlobalOptions, Settings};

#[derive(Debug, Serialize)]
pub struct ServerSummary {
    pub name: String,
    pub components: usize,
    pub fingerprint: String,
}

/// List servers, optionally filtered by a case-insensitive name fragment.
pub fn list_servers_command(
    options: &GlobalOptions,
    filter: Option<&str>,
    json: bool,
) -> Result<()> {
    let settings = Settings::load(options)?;
    let inventory = settings.load_inventory()?;

    let servers = match filter {
        Some(term) => inventory.filter(term),
        None => inventory.servers.iter().collect(),
    };

    let mut summaries = Vec::with_capacity(servers.len());
    for server in servers {
        let fingerprint = fingerprint(server)
            .with_context(|| format!("Failed to fingerprint server '{}'", server.name))?;
        summaries.push(ServerSummary {
            name: server.name.clone(),
            components: server.components.len(),
            fingerprint,
        });
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&summaries)?);
        return Ok(());
    }

    if summaries.is_empty() {
        match filter {
            Some(term) => println!("No servers match '{term}'."),
            None => println!("No servers found in {}.", settings.inventory_path.display()),
        }
        return Ok(());
    }

    println!("Servers ({}):", summaries.len());
    for summary in &summaries {
        println!(
            "  - {} ({} components) [{}]",
            summary.name,
            summary.components,
            short_fingerprint(&summary.fingerprint)
        );
    }
    Ok(())
}

/// Print a server's component table followed by its document view.
pub fn show_server_command(
    options: &GlobalOptions,
    server: &str,
    view: Option<ViewMode>,
    expand: &[String],
    expand_all: bool,
) -> Result<()> {
    let settings = Settings::load(options)?;
    let inventory = settings.load_inventory()?;
    let server = find_server(&inventory, server)?;

    let value = serde_json::to_value(server)
        .with_context(|| format!("Failed to serialize server '{}'", server.name))?;
    let mut state = ExpansionState::new();
    if expand_all {
        state.expand_all(&value);
    }
    for path in expand {
        state.expand(NodePath::from(path.as_str()));
    }

    print!("{}", render_component_table(server));
    println!();
    let mode = settings.view_mode(view);
    print!("{}", render_value(&value, Some(server.name.as_str()), &state, mode)?);
    Ok(())
}

/// Show one component in detail, including file contents for common components.
pub fn show_component_command(
    options: &GlobalOptions,
    server: &str,
    component: &str,
    files_dir: Option<&str>,
    view: Option<ViewMode>,
) -> Result<()> {
    let settings = Settings::load(options)?;
    let inventory = settings.load_inventory()?;
    let server = find_server(&inventory, server)?;
    let component = server.component(component).ok_or_else(|| {
        let known: Vec<&str> = server.component_names().collect();
        anyhow!(
            "Server '{}' has no component '{}'. Known components: {}",
            server.name,
            component,
            known.join(", ")
        )
    })?;

    let provider = settings.content_provider(files_dir)?;
    print!(
        "{}",
        render_component_details(component, provider.as_ref(), settings.view_mode(view))?
    );
    Ok(())
}

/// One row per component: variant, name, version, short commit and pid.
pub fn render_component_table(server: &Server) -> String {
    let mut out = format!("Server: {} ({} components)\n", server.name, server.components.len());
    if server.components.is_empty() {
        out.push_str("  (none)\n");
        return out;
    }

    let width = server.components.iter().map(|c| c.name.chars().count()).max().unwrap_or(0);
    for component in &server.components {
        let mut row = format!(
            "  [{:<6}] {:<width$}  v{}  {}",
            component.variant().as_str(),
            component.name,
            component.version,
            component.short_commit()
        );
        if let Some(pid) = component.pid() {
            row.push_str(&format!("  PID {pid}"));
        }
        out.push_str(&row);
        out.push('\n');
    }
    out
}

/// Detail view of a single component.
///
/// A file whose content fails to load gets its error printed in place of the
/// content; the remaining files still render.
pub fn render_component_details(
    component: &Component,
    provider: &dyn FileContentProvider,
    mode: ViewMode,
) -> Result<String> {
    let mut out = format!("{} [{}]\n", component.name, component.variant());
    out.push_str(&format!("  URL: {}\n", component.url));
    out.push_str(&format!("  Version: {}\n", component.version));
    out.push_str(&format!("  Commit: {}\n", component.commit));

    match &component.kind {
        ComponentKind::Device { pid, package_dependencies, binary_dependencies } => {
            out.push_str(&format!("  PID: {pid}\n"));
            let rows: Vec<(&str, &str)> =
                package_dependencies.iter().map(|d| (d.name.as_str(), d.commit.as_str())).collect();
            push_table(&mut out, "Package Dependencies", ("Name", "Commit"), &rows);
            let rows: Vec<(&str, &str)> =
                binary_dependencies.iter().map(|d| (d.name.as_str(), d.version.as_str())).collect();
            push_table(&mut out, "Binary Dependencies", ("Name", "Version"), &rows);
        }
        ComponentKind::Common { dependencies, files } => {
            let rows: Vec<(&str, &str)> = dependencies
                .iter()
                .map(|d| match d {
                    Dependency::Name(name) => (name.as_str(), ""),
                    Dependency::Package(dep) => (dep.name.as_str(), dep.commit.as_str()),
                    Dependency::Binary(dep) => (dep.name.as_str(), dep.version.as_str()),
                })
                .collect();
            push_table(&mut out, "Dependencies", ("Name", "Commit / Version"), &rows);

            out.push_str("\nFiles\n");
            if files.is_empty() {
                out.push_str("  (none)\n");
            }
            for file in files {
                let rendered = match provider.content(file) {
                    Ok(content) => {
                        render_value(&content, Some(file.as_str()), &ExpansionState::new(), mode)?
                    }
                    Err(err) => {
                        warn!(file = %file, error = %err, "failed to load file content");
                        format!("{file}\n! {err}\n")
                    }
                };
                for line in rendered.lines() {
                    out.push_str("  ");
                    out.push_str(line);
                    out.push('\n');
                }
            }
        }
    }
    Ok(out)
}

fn push_table(out: &mut String, title: &str, headers: (&str, &str), rows: &[(&str, &str)]) {
    out.push('\n');
    out.push_str(title);
    out.push('\n');
    if rows.is_empty() {
        out.push_str("  (none)\n");
        return;
    }
    let width = rows
        .iter()
        .map(|(name, _)| name.chars().count())
        .chain(std::iter::once(headers.0.chars().count()))
        .max()
        .unwrap_or(0);
    out.push_str(format!("  {:<width$}  {}", headers.0, headers.1).trim_end());
    out.push('\n');
    for (name, value) in rows {
        out.push_str(format!("  {name:<width$}  {value}").trim_end());
        out.push('\n');
    }
}

/// Print data-quality warnings; exits zero either way.
pub fn validate_command(options: &GlobalOptions, json: bool) -> Result<()> {
    let settings = Settings::load(options)?;
    let inventory = settings.load_inventory()?;
    let warnings = inventory.validate();

    if json {
        println!("{}", serde_json::to_string_pretty(&warnings)?);
        return Ok(());
    }

    if warnings.is_empty() {
        println!("Inventory OK: {} servers, no duplicate names.", inventory.len());
        return Ok(());
    }

    println!("Warnings ({}):", warnings.len());
    for warning in &warnings {
        println!("  - {warning}");
    }
    Ok(())
}
