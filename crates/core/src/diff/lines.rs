use std::collections::{HashMap, HashSet};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Classification of one line in a line diff.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineKind {
    Unchanged,
    Added,
    Removed,
}

impl LineKind {
    /// Prefix used by both renderers.
    pub fn marker(&self) -> char {
        match self {
            LineKind::Unchanged => ' ',
            LineKind::Added => '+',
            LineKind::Removed => '-',
        }
    }
}

/// One line of a line diff.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineDiff {
    pub text: String,
    pub kind: LineKind,
}

impl LineDiff {
    fn new(text: &str, kind: LineKind) -> Self {
        Self { text: text.to_string(), kind }
    }
}

/// Line diff of two texts.
///
/// Lines are split on `\n` only; a trailing newline does not add an empty
/// line. The common prefix and suffix are matched directly and the middle by
/// a linear-space longest common subsequence. Inside each run of changes the
/// removed lines come before the added ones.
pub fn diff_text(old: &str, new: &str) -> Vec<LineDiff> {
    let old_lines = split_lines(old);
    let new_lines = split_lines(new);

    let prefix = old_lines.iter().zip(&new_lines).take_while(|(a, b)| a == b).count();
    let max_suffix = old_lines.len().min(new_lines.len()) - prefix;
    let suffix = old_lines
        .iter()
        .rev()
        .zip(new_lines.iter().rev())
        .take(max_suffix)
        .take_while(|(a, b)| a == b)
        .count();

    let old_mid = &old_lines[prefix..old_lines.len() - suffix];
    let new_mid = &new_lines[prefix..new_lines.len() - suffix];

    let mut out = Vec::with_capacity(old_lines.len().max(new_lines.len()));
    out.extend(old_lines[..prefix].iter().map(|l| LineDiff::new(l, LineKind::Unchanged)));
    diff_middle(old_mid, new_mid, &mut out);
    out.extend(
        old_lines[old_lines.len() - suffix..].iter().map(|l| LineDiff::new(l, LineKind::Unchanged)),
    );
    out
}

fn split_lines(text: &str) -> Vec<&str> {
    let mut lines: Vec<&str> = text.split('\n').collect();
    if lines.last() == Some(&"") {
        lines.pop();
    }
    lines
}

fn diff_middle<'a>(old: &[&'a str], new: &[&'a str], out: &mut Vec<LineDiff>) {
    let mut ids: HashMap<&'a str, usize> = HashMap::new();
    let old_ids: Vec<usize> = old.iter().map(|line| intern(&mut ids, line)).collect();
    let new_ids: Vec<usize> = new.iter().map(|line| intern(&mut ids, line)).collect();

    // A line missing from the other side can never be matched.
    let in_old: HashSet<usize> = old_ids.iter().copied().collect();
    let in_new: HashSet<usize> = new_ids.iter().copied().collect();
    let old_keep: Vec<usize> = (0..old.len()).filter(|&i| in_new.contains(&old_ids[i])).collect();
    let new_keep: Vec<usize> = (0..new.len()).filter(|&j| in_old.contains(&new_ids[j])).collect();
    let a: Vec<usize> = old_keep.iter().map(|&i| old_ids[i]).collect();
    let b: Vec<usize> = new_keep.iter().map(|&j| new_ids[j]).collect();

    let mut matches = Vec::new();
    lcs_matches(&a, &b, 0, 0, &mut matches);

    let (mut i, mut j) = (0, 0);
    for (x, y) in matches {
        let (oi, nj) = (old_keep[x], new_keep[y]);
        push_run(&old[i..oi], &new[j..nj], out);
        out.push(LineDiff::new(old[oi], LineKind::Unchanged));
        i = oi + 1;
        j = nj + 1;
    }
    push_run(&old[i..], &new[j..], out);
}

fn intern<'a>(ids: &mut HashMap<&'a str, usize>, line: &'a str) -> usize {
    let next = ids.len();
    *ids.entry(line).or_insert(next)
}

fn push_run(removed: &[&str], added: &[&str], out: &mut Vec<LineDiff>) {
    out.extend(removed.iter().map(|l| LineDiff::new(l, LineKind::Removed)));
    out.extend(added.iter().map(|l| LineDiff::new(l, LineKind::Added)));
}

/// Hirschberg's divide and conquer: appends matched index pairs in order,
/// keeping only two rows of the length table alive at a time.
fn lcs_matches(
    a: &[usize],
    b: &[usize],
    a_off: usize,
    b_off: usize,
    out: &mut Vec<(usize, usize)>,
) {
    if a.is_empty() || b.is_empty() {
        return;
    }
    if a.len() == 1 {
        if let Some(j) = b.iter().position(|&id| id == a[0]) {
            out.push((a_off, b_off + j));
        }
        return;
    }

    let mid = a.len() / 2;
    let forward = lcs_row(&a[..mid], b);
    let a_rev: Vec<usize> = a[mid..].iter().rev().copied().collect();
    let b_rev: Vec<usize> = b.iter().rev().copied().collect();
    let backward = lcs_row(&a_rev, &b_rev);

    let m = b.len();
    let mut split = 0;
    let mut best = 0;
    for k in 0..=m {
        let total = forward[k] + backward[m - k];
        if total > best {
            best = total;
            split = k;
        }
    }

    lcs_matches(&a[..mid], &b[..split], a_off, b_off, out);
    lcs_matches(&a[mid..], &b[split..], a_off + mid, b_off + split, out);
}

/// `row[j]` is the LCS length of `a` and `b[..j]`.
fn lcs_row(a: &[usize], b: &[usize]) -> Vec<usize> {
    let mut prev = vec![0; b.len() + 1];
    let mut cur = vec![0; b.len() + 1];
    for &x in a {
        for (j, &y) in b.iter().enumerate() {
            cur[j + 1] = if x == y { prev[j] + 1 } else { prev[j + 1].max(cur[j]) };
        }
        std::mem::swap(&mut prev, &mut cur);
    }
    prev
}

/// Serialize both values as pretty JSON and diff the text.
///
/// Field reordering or formatting changes show up as removed/added pairs even
/// when the values are semantically equal.
pub fn diff_values<T: Serialize + ?Sized>(old: &T, new: &T) -> serde_json::Result<Vec<LineDiff>> {
    let old_text = serde_json::to_string_pretty(old)?;
    let new_text = serde_json::to_string_pretty(new)?;
    Ok(diff_text(&old_text, &new_text))
}

/// True when no line was added or removed.
pub fn is_identical(diff: &[LineDiff]) -> bool {
    diff.iter().all(|l| l.kind == LineKind::Unchanged)
}

/// How a line diff is laid out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiffMode {
    #[default]
    Split,
    Unified,
}

impl DiffMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiffMode::Split => "split",
            DiffMode::Unified => "unified",
        }
    }

    pub fn toggle(self) -> Self {
        match self {
            DiffMode::Split => DiffMode::Unified,
            DiffMode::Unified => DiffMode::Split,
        }
    }
}

impl fmt::Display for DiffMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DiffMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "split" => Ok(DiffMode::Split),
            "unified" => Ok(DiffMode::Unified),
            other => Err(format!("Invalid diff mode '{other}'; expected split or unified")),
        }
    }
}

/// Labels for the two sides of a rendered diff.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffHeaders {
    pub old: String,
    pub new: String,
}

impl DiffHeaders {
    pub fn new(old: impl Into<String>, new: impl Into<String>) -> Self {
        Self { old: old.into(), new: new.into() }
    }
}

/// Single-column rendering with `-`/`+`/space prefixes.
pub fn render_unified(diff: &[LineDiff], headers: &DiffHeaders) -> String {
    let mut out = String::new();
    out.push_str(&format!("--- {} (Removed)\n", headers.old));
    out.push_str(&format!("+++ {} (Added)\n", headers.new));
    for line in diff {
        out.push(line.kind.marker());
        out.push_str(&line.text);
        out.push('\n');
    }
    out
}

/// Two independent columns of a split diff.
///
/// The columns are not row-aligned: the left one lists unchanged and removed
/// lines, the right one unchanged and added lines, each in diff order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitView {
    pub left: Vec<String>,
    pub right: Vec<String>,
}

/// Build the two columns of a split rendering.
pub fn split_view(diff: &[LineDiff]) -> SplitView {
    let mut view = SplitView::default();
    for line in diff {
        let rendered = format!("{}{}", line.kind.marker(), line.text);
        match line.kind {
            LineKind::Unchanged => {
                view.left.push(rendered.clone());
                view.right.push(rendered);
            }
            LineKind::Removed => view.left.push(rendered),
            LineKind::Added => view.right.push(rendered),
        }
    }
    view
}

impl SplitView {
    /// Lay the columns out side by side under the two headers.
    pub fn render(&self, headers: &DiffHeaders) -> String {
        let width = self
            .left
            .iter()
            .map(|l| l.chars().count())
            .chain(std::iter::once(headers.old.chars().count()))
            .max()
            .unwrap_or(0);

        let mut out = String::new();
        push_row(&mut out, &headers.old, &headers.new, width);
        let rows = self.left.len().max(self.right.len());
        for idx in 0..rows {
            let left = self.left.get(idx).map(String::as_str).unwrap_or("");
            let right = self.right.get(idx).map(String::as_str).unwrap_or("");
            push_row(&mut out, left, right, width);
        }
        out
    }
}

fn push_row(out: &mut String, left: &str, right: &str, width: usize) {
    let row = format!("{left:<width$} | {right}");
    out.push_str(row.trim_end());
    out.push('\n');
}

/// Render a line diff in the requested mode.
pub fn render(diff: &[LineDiff], mode: DiffMode, headers: &DiffHeaders) -> String {
    match mode {
        DiffMode::Unified => render_unified(diff, headers),
        DiffMode::Split => split_view(diff).render(headers),
    }
}
