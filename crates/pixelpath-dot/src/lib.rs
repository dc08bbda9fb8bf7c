//! Generate Graphviz DOT visualizations of pixelpath commit graphs.
//!
//! Commits become nodes and parent links become edges, emitted in the same
//! depth-first order a history panel displays them. Nodes are color-coded by
//! kind (gray root, blue edit, yellow branch, purple merge). The current
//! commit is drawn bold, merge selections get a red outline, and commits off
//! the current commit's ancestry are dimmed.
//!
//! # Example
//!
//! ```
//! use chrono::Utc;
//! use pixelpath::v1::{Commit, CommitGraph};
//! use pixelpath_dot::{Highlight, RenderOptions, render};
//!
//! let now = Utc::now();
//! let mut graph = CommitGraph::new();
//! graph.insert(Commit::new("root", now).with_title("Initial Image")).unwrap();
//! graph.insert(Commit::new("hat", now).with_parent("root").with_title("Add hat")).unwrap();
//!
//! let highlight = Highlight { current: Some("hat"), ..Highlight::default() };
//! let dot = render(&graph, &highlight, &RenderOptions::default());
//! assert!(dot.contains("digraph pixelpath"));
//! assert!(dot.contains("\"root\" -> \"hat\""));
//! ```
//!
//! Pipe the output through Graphviz to produce images:
//!
//! ```bash
//! pix replay --image cat.png --script edits.json --format dot | dot -Tpng -o history.png
//! ```

use std::collections::HashSet;

use pixelpath::v1::{Commit, CommitGraph, CommitId, query};

/// Options controlling what information is rendered in the DOT output.
pub struct RenderOptions {
    /// Include the time portion of each commit's timestamp.
    pub show_timestamps: bool,
    /// Include each commit's instruction under its title.
    pub show_prompts: bool,
    /// Render commits that are not ancestors of the current commit with
    /// dashed, faded borders.
    pub highlight_off_path: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            show_timestamps: false,
            show_prompts: false,
            highlight_off_path: true,
        }
    }
}

/// Session state to emphasize in the drawing.
#[derive(Debug, Clone, Copy, Default)]
pub struct Highlight<'a> {
    pub current: Option<&'a str>,
    pub selected: &'a [CommitId],
}

const OFF_PATH_FILL: &str = "#f0f0f0";
const SELECTED_OUTLINE: &str = "#d9534f";

/// Render a [`CommitGraph`] as a DOT digraph.
///
/// An empty graph renders as an empty digraph.
pub fn render(graph: &CommitGraph, highlight: &Highlight<'_>, options: &RenderOptions) -> String {
    let mut dot = String::new();
    dot.push_str("digraph pixelpath {\n");
    dot.push_str("  rankdir=TB;\n");
    dot.push_str("  node [shape=box, style=rounded, fontname=\"Helvetica\"];\n");
    dot.push_str("  edge [color=\"#666666\"];\n\n");

    let Some(root_id) = graph.root_id() else {
        dot.push_str("}\n");
        return dot;
    };

    // Everything the current commit was derived from
    let active = highlight
        .current
        .map(|id| query::ancestors(graph, id))
        .unwrap_or_default();

    let order = query::render_order(graph, root_id.as_str());
    for entry in &order {
        let commit = entry.commit;
        let is_current = highlight.current == Some(commit.id.as_str());
        let is_selected = highlight.selected.contains(&commit.id);
        let is_off_path = options.highlight_off_path
            && highlight.current.is_some()
            && !active.contains(commit.id.as_str());

        let mut fillcolor = kind_color(commit);
        let mut style = "rounded,filled";
        let mut attrs = String::new();

        if is_current {
            style = "rounded,filled,bold";
            attrs.push_str(", penwidth=3");
        } else if is_off_path {
            fillcolor = OFF_PATH_FILL;
            style = "rounded,filled,dashed";
        }
        if is_selected {
            attrs.push_str(&format!(", color=\"{}\"", SELECTED_OUTLINE));
            if !is_current {
                attrs.push_str(", penwidth=2");
            }
        }
        if commit.is_root() {
            attrs.push_str(", shape=ellipse");
        }

        dot.push_str(&format!(
            "  \"{}\" [label={}, fillcolor=\"{}\", style=\"{}\"{}];\n",
            escape_dot(commit.id.as_str()),
            format_commit_label_html(commit, options),
            fillcolor,
            style,
            attrs
        ));
    }

    dot.push('\n');

    for entry in &order {
        let commit = entry.commit;
        for (i, parent) in commit.parent_ids.iter().enumerate() {
            let is_active_edge =
                active.contains(commit.id.as_str()) && active.contains(parent.as_str());
            let mut edge_style = if is_active_edge {
                "color=\"#333333\", penwidth=2".to_string()
            } else {
                "color=\"#cccccc\", style=dashed".to_string()
            };
            // Merge parents are ordered: 1 is the first selection
            if commit.is_merge() {
                edge_style.push_str(&format!(", label=\"{}\"", i + 1));
            }
            dot.push_str(&format!(
                "  \"{}\" -> \"{}\" [{}];\n",
                escape_dot(parent.as_str()),
                escape_dot(commit.id.as_str()),
                edge_style
            ));
        }
    }

    push_legend(&mut dot, options);
    dot.push_str("}\n");
    dot
}

fn push_legend(dot: &mut String, options: &RenderOptions) {
    dot.push_str("\n  // Legend\n");
    dot.push_str("  subgraph cluster_legend {\n");
    dot.push_str("    label=\"Legend\";\n");
    dot.push_str("    fontname=\"Helvetica-Bold\";\n");
    dot.push_str("    style=filled;\n");
    dot.push_str("    fillcolor=\"#f8f8f8\";\n");
    dot.push_str("    node [shape=box, style=\"rounded,filled\", width=0.9, fontname=\"Helvetica\", fontsize=10];\n");
    for (key, label, color) in [
        ("leg_root", "root", "#e0e0e0"),
        ("leg_edit", "edit", "#cce5ff"),
        ("leg_branch", "branch", "#fff3cd"),
        ("leg_merge", "merge", "#e2d5f1"),
    ] {
        dot.push_str(&format!(
            "    {} [label=\"{}\", fillcolor=\"{}\"];\n",
            key, label, color
        ));
    }
    if options.highlight_off_path {
        dot.push_str(&format!(
            "    leg_off [label=\"off path\", fillcolor=\"{}\", style=\"rounded,filled,dashed\"];\n",
            OFF_PATH_FILL
        ));
    }
    dot.push_str("  }\n");
}

fn format_commit_label_html(commit: &Commit, options: &RenderOptions) -> String {
    let mut rows = vec![format!(
        "<b>{}</b>",
        escape_html(&safe_prefix(commit.id.as_str(), 8))
    )];

    if !commit.title.is_empty() {
        rows.push(format!(
            "<font point-size=\"10\">{}</font>",
            escape_html(&truncate(&commit.title, 40))
        ));
    }

    if let Some(branch) = &commit.branch_name {
        rows.push(format!(
            "<font point-size=\"9\" color=\"#8a6d3b\">{}</font>",
            escape_html(branch)
        ));
    }

    if options.show_prompts && !commit.prompt.is_empty() {
        rows.push(format!(
            "<font point-size=\"9\"><i>{}</i></font>",
            escape_html(&truncate(&commit.prompt, 40))
        ));
    }

    if options.show_timestamps {
        rows.push(format!(
            "<font point-size=\"8\" color=\"gray\">{}</font>",
            commit.timestamp.format("%H:%M:%S")
        ));
    }

    format!("<{}>", rows.join("<br/>"))
}

/// Return a fill color for a commit based on how it was made.
pub fn kind_color(commit: &Commit) -> &'static str {
    if commit.is_root() {
        "#e0e0e0" // Gray
    } else if commit.is_merge() {
        "#e2d5f1" // Light purple
    } else if commit.branch_name.is_some() {
        "#fff3cd" // Light yellow
    } else {
        "#cce5ff" // Light blue
    }
}

/// Shorten to at most `max` characters, ending in an ellipsis when cut.
fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() > max {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}\u{2026}", kept)
    } else {
        s.to_string()
    }
}

/// Return the first `n` characters of a string, safe for any UTF-8 content.
fn safe_prefix(s: &str, n: usize) -> String {
    s.chars().take(n).collect()
}

/// Escape a string for use in DOT label attributes (double-quoted context).
pub fn escape_dot(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
}

/// Escape a string for use inside HTML-like DOT labels.
pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
