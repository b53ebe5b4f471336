use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Location of a node inside a value tree.
///
/// Segments are object keys or array indices. The root is the empty path and
/// displays as `/`. Other paths display JSON-Pointer style, with `~` written
/// as `~0` and `/` as `~1` inside a segment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodePath(Vec<String>);

impl NodePath {
    pub fn root() -> Self {
        Self(Vec::new())
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    pub fn child(&self, segment: impl Into<String>) -> Self {
        let mut segments = self.0.clone();
        segments.push(segment.into());
        Self(segments)
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    pub fn depth(&self) -> usize {
        self.0.len()
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("/");
        }
        for segment in &self.0 {
            write!(f, "/{}", segment.replace('~', "~0").replace('/', "~1"))?;
        }
        Ok(())
    }
}

/// Parses the display form; empty segments are ignored, so `""` and `"/"`
/// are both the root.
impl From<&str> for NodePath {
    fn from(s: &str) -> Self {
        Self(
            s.split('/')
                .filter(|seg| !seg.is_empty())
                .map(|seg| seg.replace("~1", "/").replace("~0", "~"))
                .collect(),
        )
    }
}

impl FromStr for NodePath {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s))
    }
}

/// Which container nodes are currently expanded.
///
/// Owned by whoever displays the tree. A fresh state has only the root
/// expanded; transitions never touch the data being shown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpansionState {
    expanded: BTreeSet<NodePath>,
}

impl Default for ExpansionState {
    fn default() -> Self {
        let mut expanded = BTreeSet::new();
        expanded.insert(NodePath::root());
        Self { expanded }
    }
}

impl ExpansionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_expanded(&self, path: &NodePath) -> bool {
        self.expanded.contains(path)
    }

    /// Flip one node; returns whether it is expanded afterwards.
    pub fn toggle(&mut self, path: &NodePath) -> bool {
        if self.expanded.remove(path) {
            false
        } else {
            self.expanded.insert(path.clone());
            true
        }
    }

    pub fn expand(&mut self, path: NodePath) {
        self.expanded.insert(path);
    }

    pub fn collapse(&mut self, path: &NodePath) {
        self.expanded.remove(path);
    }

    /// Expand every container node in `value`, root included.
    pub fn expand_all(&mut self, value: &Value) {
        collect_containers(value, NodePath::root(), &mut self.expanded);
    }

    /// Collapse everything, root included.
    pub fn collapse_all(&mut self) {
        self.expanded.clear();
    }

    pub fn expanded_paths(&self) -> impl Iterator<Item = &NodePath> {
        self.expanded.iter()
    }
}

fn collect_containers(value: &Value, path: NodePath, out: &mut BTreeSet<NodePath>) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                collect_containers(child, path.child(key.as_str()), out);
            }
            out.insert(path);
        }
        Value::Array(items) => {
            for (idx, child) in items.iter().enumerate() {
                collect_containers(child, path.child(idx.to_string()), out);
            }
            out.insert(path);
        }
        _ => {}
    }
}

/// Interactive tree or flat pretty-printed text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Interactive,
    Text,
}

impl ViewMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ViewMode::Interactive => "interactive",
            ViewMode::Text => "text",
        }
    }

    pub fn toggle(self) -> Self {
        match self {
            ViewMode::Interactive => ViewMode::Text,
            ViewMode::Text => ViewMode::Interactive,
        }
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ViewMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "interactive" => Ok(ViewMode::Interactive),
            "text" => Ok(ViewMode::Text),
            other => Err(format!("Invalid view mode '{other}'; expected interactive or text")),
        }
    }
}

pub const EXPANDED_MARKER: char = '▾';
pub const COLLAPSED_MARKER: char = '▸';

/// One rendered row of the interactive tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeLine {
    pub depth: usize,
    /// Node this row belongs to; closing brackets share their container's path.
    pub path: NodePath,
    pub text: String,
}

/// Render `value` as an expandable tree using the caller's expansion state.
///
/// Array children are labelled by index. Collapsed containers show on one
/// row with an ellipsis.
pub fn render_tree(value: &Value, name: Option<&str>, state: &ExpansionState) -> Vec<TreeLine> {
    let mut out = Vec::new();
    walk(value, name, NodePath::root(), 0, state, &mut out);
    out
}

fn walk(
    value: &Value,
    label: Option<&str>,
    path: NodePath,
    depth: usize,
    state: &ExpansionState,
    out: &mut Vec<TreeLine>,
) {
    let (open, close, children): (char, char, Vec<(String, &Value)>) = match value {
        Value::Object(map) => ('{', '}', map.iter().map(|(k, v)| (k.clone(), v)).collect()),
        Value::Array(items) => {
            ('[', ']', items.iter().enumerate().map(|(i, v)| (i.to_string(), v)).collect())
        }
        scalar => {
            let text = match label {
                Some(label) => format!("{label}: {scalar}"),
                None => scalar.to_string(),
            };
            out.push(TreeLine { depth, path, text });
            return;
        }
    };

    let prefix = label.map(|l| format!("{l} ")).unwrap_or_default();
    if !state.is_expanded(&path) {
        let text = format!("{COLLAPSED_MARKER} {prefix}{open} … {close}");
        out.push(TreeLine { depth, path, text });
        return;
    }

    out.push(TreeLine { depth, path: path.clone(), text: format!("{EXPANDED_MARKER} {prefix}{open}") });
    for (key, child) in children {
        let child_path = path.child(key.as_str());
        walk(child, Some(key.as_str()), child_path, depth + 1, state, out);
    }
    out.push(TreeLine { depth, path, text: close.to_string() });
}

/// Join tree rows with two spaces of indentation per level.
pub fn render_lines(lines: &[TreeLine]) -> String {
    let mut out = String::new();
    for line in lines {
        out.push_str(&"  ".repeat(line.depth));
        out.push_str(&line.text);
        out.push('\n');
    }
    out
}

/// Render `value` in the given mode.
///
/// Text mode ignores the expansion state and prints the whole structure.
pub fn render_value(
    value: &Value,
    name: Option<&str>,
    state: &ExpansionState,
    mode: ViewMode,
) -> serde_json::Result<String> {
    match mode {
        ViewMode::Interactive => Ok(render_lines(&render_tree(value, name, state))),
        ViewMode::Text => {
            let mut out = String::new();
            if let Some(name) = name {
                out.push_str(name);
                out.push('\n');
            }
            out.push_str(&serde_json::to_string_pretty(value)?);
            out.push('\n');
            Ok(out)
        }
    }
}
