//! Key-by-key comparison of two values.
//!
//! Not used by the document view, which diffs serialized text. This one
//! ignores key order and reports leaf-level changes by path.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::diff::tree::NodePath;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PathChangeKind {
    Added,
    Removed,
    Changed,
}

/// One differing location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathChange {
    pub path: NodePath,
    pub kind: PathChangeKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub before: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub after: Option<Value>,
}

/// Walk both values in parallel and list every differing location.
///
/// Objects are matched by key, arrays by index. A type change at a node
/// (e.g. object to string) is one `Changed` entry for that node.
pub fn structural_diff(old: &Value, new: &Value) -> Vec<PathChange> {
    let mut out = Vec::new();
    walk(NodePath::root(), old, new, &mut out);
    out
}

fn walk(path: NodePath, old: &Value, new: &Value, out: &mut Vec<PathChange>) {
    match (old, new) {
        (Value::Object(a), Value::Object(b)) => {
            for (key, va) in a {
                match b.get(key) {
                    Some(vb) => walk(path.child(key.as_str()), va, vb, out),
                    None => out.push(removed(path.child(key.as_str()), va)),
                }
            }
            for (key, vb) in b {
                if !a.contains_key(key) {
                    out.push(added(path.child(key.as_str()), vb));
                }
            }
        }
        (Value::Array(a), Value::Array(b)) => {
            for idx in 0..a.len().max(b.len()) {
                let child = path.child(idx.to_string());
                match (a.get(idx), b.get(idx)) {
                    (Some(va), Some(vb)) => walk(child, va, vb, out),
                    (Some(va), None) => out.push(removed(child, va)),
                    (None, Some(vb)) => out.push(added(child, vb)),
                    (None, None) => {}
                }
            }
        }
        (a, b) if a != b => out.push(PathChange {
            path,
            kind: PathChangeKind::Changed,
            before: Some(a.clone()),
            after: Some(b.clone()),
        }),
        _ => {}
    }
}

fn added(path: NodePath, value: &Value) -> PathChange {
    PathChange { path, kind: PathChangeKind::Added, before: None, after: Some(value.clone()) }
}

fn removed(path: NodePath, value: &Value) -> PathChange {
    PathChange { path, kind: PathChangeKind::Removed, before: Some(value.clone()), after: None }
}

/// One line per change: `+ path: value`, `- path: value`, `~ path: old -> new`.
pub fn render_structural(changes: &[PathChange]) -> String {
    if changes.is_empty() {
        return "No structural differences.\n".to_string();
    }

    let mut out = String::new();
    for change in changes {
        let line = match change.kind {
            PathChangeKind::Added => format!("+ {}: {}", change.path, show(&change.after)),
            PathChangeKind::Removed => format!("- {}: {}", change.path, show(&change.before)),
            PathChangeKind::Changed => {
                format!("~ {}: {} -> {}", change.path, show(&change.before), show(&change.after))
            }
        };
        out.push_str(&line);
        out.push('\n');
    }
    out
}

fn show(value: &Option<Value>) -> String {
    value.as_ref().map(Value::to_string).unwrap_or_else(|| "null".to_string())
}
