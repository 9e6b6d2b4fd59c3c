//! Export utilities for decision trees
//!
//! Provides DOT graph export and pretty JSON export of a parsed tree.

use crate::model::{Decision, DecisionTree};
use std::fmt::Write;

/// Configuration for DOT export
#[derive(Debug, Clone)]
pub struct DotConfig {
    /// Title for the graph (defaults to the tree name)
    pub title: Option<String>,
    /// Include decision status in labels
    pub show_status: bool,
    /// Include decision ids in labels
    pub show_ids: bool,
    /// Orientation: "TB" (top-bottom), "LR" (left-right)
    pub rankdir: String,
}

impl Default for DotConfig {
    fn default() -> Self {
        Self {
            title: None,
            show_status: true,
            show_ids: true,
            rankdir: "TB".to_string(),
        }
    }
}

/// Get the fill color for a decision's path state
fn node_color(decision: &Decision) -> &'static str {
    match decision.selected_path {
        Some(true) => "#90EE90",  // Light green: on the chosen path
        Some(false) => "#FFB6C1", // Light pink: rejected
        None => "#E6E6FA",        // Lavender: undecided
    }
}

/// Get the shape for a decision
fn node_shape(decision: &Decision) -> &'static str {
    if decision.is_root() {
        "house"
    } else {
        "box"
    }
}

/// Get the edge style for the dependent decision's path state
fn edge_style(child: &Decision) -> &'static str {
    match child.selected_path {
        Some(true) => "bold",
        Some(false) => "dashed",
        None => "solid",
    }
}

/// Get the edge color for the dependent decision's path state
fn edge_color(child: &Decision) -> &'static str {
    match child.selected_path {
        Some(true) => "#228B22",  // Forest green
        Some(false) => "#DC143C", // Crimson
        None => "#333333",        // Dark gray
    }
}

/// Escape a string for DOT labels
fn escape_dot(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
}

/// Truncate a string to max length in bytes, never splitting a
/// character.
fn truncate(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        return s.to_string();
    }
    let mut cut = max_len - 3;
    while !s.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}...", &s[..cut])
}

/// Convert a decision tree to DOT format
pub fn tree_to_dot(tree: &DecisionTree, config: &DotConfig) -> String {
    let mut dot = String::new();

    // Graph header
    writeln!(dot, "digraph DecisionTree {{").unwrap();
    writeln!(dot, "  rankdir={};", config.rankdir).unwrap();
    writeln!(dot, "  node [fontname=\"Arial\" fontsize=10];").unwrap();
    writeln!(dot, "  edge [fontname=\"Arial\" fontsize=9];").unwrap();

    let title = config.title.as_deref().unwrap_or(&tree.name);
    writeln!(dot, "  label=\"{}\";", escape_dot(title)).unwrap();
    writeln!(dot, "  labelloc=t;").unwrap();
    writeln!(dot, "  fontsize=14;").unwrap();
    writeln!(dot).unwrap();

    // Nodes
    for decision in tree.decisions.values() {
        let mut label = String::new();

        if config.show_ids {
            write!(label, "[{}] ", decision.id).unwrap();
        }

        label.push_str(&truncate(&decision.title, 40));

        if config.show_status {
            if let Some(status) = &decision.status {
                write!(label, "\\n({})", status).unwrap();
            }
        }

        match decision.selected_path {
            Some(true) => label.push_str("\\nselected"),
            Some(false) => label.push_str("\\nrejected"),
            None => {}
        }

        writeln!(
            dot,
            "  \"{}\" [label=\"{}\" shape=\"{}\" fillcolor=\"{}\" style=\"filled\"];",
            escape_dot(&decision.id),
            escape_dot(&label),
            node_shape(decision),
            node_color(decision)
        )
        .unwrap();
    }

    writeln!(dot).unwrap();

    // Edges run dependency -> dependent, the direction the tree is read
    for decision in tree.decisions.values() {
        for dep in decision.dependencies.iter().flatten() {
            if !tree.decisions.contains_key(dep) {
                continue;
            }
            writeln!(
                dot,
                "  \"{}\" -> \"{}\" [style=\"{}\" color=\"{}\"];",
                escape_dot(dep),
                escape_dot(&decision.id),
                edge_style(decision),
                edge_color(decision)
            )
            .unwrap();
        }
    }

    writeln!(dot, "}}").unwrap();

    dot
}

/// Serialize the resolved tree as pretty JSON for downstream viewers
pub fn tree_to_json(tree: &DecisionTree) -> serde_json::Result<String> {
    serde_json::to_string_pretty(tree)
}
