//! Selected-path propagation
//!
//! Authors mark a handful of decisions as chosen (`selectedPath: true`)
//! or abandoned (`selectedPath: false`); propagation fills in the rest.
//! Three passes run in fixed order over the whole tree:
//!
//! 1. Rejection wins: every descendant of a rejected decision is forced
//!    to rejected, overriding explicit `true` annotations below it.
//! 2. Selection inherits: descendants of a chosen decision become chosen
//!    unless already fixed at rejected.
//! 3. Siblings resolve: once one child of a decision is chosen, siblings
//!    still undecided are rejected. Explicit annotations are never
//!    overridden by this pass.
//!
//! Decisions no pass touches stay `None`: neutral is a real state, not a
//! synonym for rejected. Each pass owns its visited set, so traversal
//! terminates even when the graph has a cycle the validator has yet to
//! report.

use crate::model::{Decision, DecisionTree};
use indexmap::IndexMap;
use std::collections::HashSet;

/// Fill in `selected_path` across the whole tree, in place.
///
/// Never fails; a tree with no explicit annotations comes back
/// unchanged.
pub fn propagate_selection(tree: &mut DecisionTree) {
    // Pass 1: rejection dominance.
    let rejected: Vec<String> = annotated(tree, false);
    let mut visited = HashSet::new();
    for id in &rejected {
        force_rejected(&mut tree.decisions, id, &mut visited);
    }

    // Pass 2: selection inheritance. Snapshot taken after pass 1, so a
    // `true` annotation overridden by an ancestor rejection is excluded.
    let selected: Vec<String> = annotated(tree, true);
    let mut visited = HashSet::new();
    for id in &selected {
        inherit_selected(&mut tree.decisions, id, &mut visited);
    }

    // Pass 3: sibling-conflict resolution.
    resolve_siblings(&mut tree.decisions);
}

fn annotated(tree: &DecisionTree, value: bool) -> Vec<String> {
    tree.decisions
        .values()
        .filter(|d| d.selected_path == Some(value))
        .map(|d| d.id.clone())
        .collect()
}

/// Force the entire subtree under `id` to rejected, overwriting any
/// explicit `true` below it. The node itself keeps its own flag.
fn force_rejected(
    decisions: &mut IndexMap<String, Decision>,
    id: &str,
    visited: &mut HashSet<String>,
) {
    if !visited.insert(id.to_string()) {
        return;
    }
    let children = match decisions.get(id) {
        Some(d) => d.children.clone(),
        None => return,
    };
    for child in children {
        if let Some(d) = decisions.get_mut(&child) {
            d.selected_path = Some(false);
        }
        force_rejected(decisions, &child, visited);
    }
}

/// Mark undecided descendants of `id` as chosen. Descendants fixed at
/// rejected are left alone, and their subtrees were already forced
/// rejected in pass 1, so recursion stops there.
fn inherit_selected(
    decisions: &mut IndexMap<String, Decision>,
    id: &str,
    visited: &mut HashSet<String>,
) {
    if !visited.insert(id.to_string()) {
        return;
    }
    let children = match decisions.get(id) {
        Some(d) => d.children.clone(),
        None => return,
    };
    for child in children {
        let skip = match decisions.get_mut(&child) {
            Some(d) => {
                if d.selected_path == Some(false) {
                    true
                } else {
                    d.selected_path = Some(true);
                    false
                }
            }
            None => true,
        };
        if !skip {
            inherit_selected(decisions, &child, visited);
        }
    }
}

/// Choosing one branch implicitly rejects undecided sibling branches.
/// Siblings already annotated, either way, are untouched.
fn resolve_siblings(decisions: &mut IndexMap<String, Decision>) {
    let parents: Vec<Vec<String>> = decisions
        .values()
        .filter(|d| d.children.len() > 1)
        .map(|d| d.children.clone())
        .collect();

    for siblings in parents {
        let any_chosen = siblings
            .iter()
            .any(|c| matches!(decisions.get(c), Some(d) if d.selected_path == Some(true)));
        if !any_chosen {
            continue;
        }
        for child in &siblings {
            if let Some(d) = decisions.get_mut(child) {
                if d.selected_path.is_none() {
                    d.selected_path = Some(false);
                }
            }
        }
    }
}
