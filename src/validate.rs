//! Semantic validation of a linked decision tree
//!
//! [`validate_tree`] is a pure function: it never fails, it returns every
//! independent problem it finds as a human-readable string, and calling
//! it twice on the same tree yields the same sequence. Errors are data,
//! not exceptions, because the caller renders all of them at once.
//!
//! Cycle detection is the one short-circuiting check: at most one cycle
//! error per call, naming the first involved decision found.

use crate::model::{
    Decision, DecisionTree, Impact, ProsConsItem, IMPACT_LEVELS, LINK_TYPES, RISK_LEVELS,
    STATUS_VALUES, TASK_STATUSES,
};
use chrono::NaiveDate;
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashSet;

lazy_static! {
    static ref DATE_RE: Regex = Regex::new(r"^\d{4}-\d{2}-\d{2}$").unwrap();
}

/// A date field must match YYYY-MM-DD literally and name a real
/// calendar date.
fn is_valid_date(value: &str) -> bool {
    DATE_RE.is_match(value) && NaiveDate::parse_from_str(value, "%Y-%m-%d").is_ok()
}

/// Walk the tree and collect every semantic problem found.
pub fn validate_tree(tree: &DecisionTree) -> Vec<String> {
    let mut errors = Vec::new();

    check_cycles(tree, &mut errors);

    for decision in tree.decisions.values() {
        check_references(tree, decision, &mut errors);
        check_attributes(decision, &mut errors);
        check_external_dependencies(decision, &mut errors);
        check_pros_cons(decision, &mut errors);
        check_links(decision, &mut errors);
        check_tasks(decision, &mut errors);
    }

    errors
}

/// Depth-first cycle detection over the `children` adjacency, with a
/// recursion stack. Stops after the first cycle found.
fn check_cycles(tree: &DecisionTree, errors: &mut Vec<String>) {
    let mut visited = HashSet::new();
    let mut stack = HashSet::new();

    for id in tree.decisions.keys() {
        if has_cycle(tree, id, &mut visited, &mut stack) {
            errors.push(format!(
                "Circular dependency detected involving decision: {}",
                id
            ));
            break;
        }
    }
}

fn has_cycle(
    tree: &DecisionTree,
    id: &str,
    visited: &mut HashSet<String>,
    stack: &mut HashSet<String>,
) -> bool {
    if stack.contains(id) {
        return true;
    }
    if !visited.insert(id.to_string()) {
        return false;
    }
    stack.insert(id.to_string());

    if let Some(decision) = tree.decisions.get(id) {
        for child in &decision.children {
            if has_cycle(tree, child, visited, stack) {
                return true;
            }
        }
    }

    stack.remove(id);
    false
}

/// Dependencies, supersedes and supersededBy must all resolve to
/// decisions present in the tree.
fn check_references(tree: &DecisionTree, decision: &Decision, errors: &mut Vec<String>) {
    for dep in decision.dependencies.iter().flatten() {
        if !tree.decisions.contains_key(dep) {
            errors.push(format!(
                "Decision \"{}\" references unknown dependency: {}",
                decision.id, dep
            ));
        }
    }

    for superseded in decision.supersedes.iter().flatten() {
        if !tree.decisions.contains_key(superseded) {
            errors.push(format!(
                "Decision \"{}\" supersedes unknown decision: {}",
                decision.id, superseded
            ));
        }
    }

    if let Some(successor) = &decision.superseded_by {
        if !tree.decisions.contains_key(successor) {
            errors.push(format!(
                "Decision \"{}\" is superseded by unknown decision: {}",
                decision.id, successor
            ));
        }
    }
}

/// Enum and date checks on the decision's own fields.
fn check_attributes(decision: &Decision, errors: &mut Vec<String>) {
    if let Some(status) = &decision.status {
        if !STATUS_VALUES.contains(&status.as_str()) {
            errors.push(format!(
                "Decision \"{}\" has invalid status: {}. Must be one of: {}",
                decision.id,
                status,
                STATUS_VALUES.join(", ")
            ));
        }
    }

    if let Some(risk) = &decision.risk_level {
        if !RISK_LEVELS.contains(&risk.as_str()) {
            errors.push(format!(
                "Decision \"{}\" has invalid risk level: {}. Must be one of: {}",
                decision.id,
                risk,
                RISK_LEVELS.join(", ")
            ));
        }
    }

    let date_fields = [
        ("decisionDate", &decision.decision_date),
        ("lastReviewed", &decision.last_reviewed),
    ];
    for (field, value) in date_fields {
        if let Some(date) = value {
            if !is_valid_date(date) {
                errors.push(format!(
                    "Decision \"{}\" {} has invalid date format. Use YYYY-MM-DD format.",
                    decision.id, field
                ));
            }
        }
    }
}

/// Within one decision, external dependency ids are unique and the
/// expected resolution date must be well-formed.
fn check_external_dependencies(decision: &Decision, errors: &mut Vec<String>) {
    let mut seen: HashSet<&str> = HashSet::new();

    for ext in decision.external_dependencies.iter().flatten() {
        if !seen.insert(ext.id.as_str()) {
            errors.push(format!(
                "Decision \"{}\" has duplicate external dependency ID: {}",
                decision.id, ext.id
            ));
        }

        if let Some(date) = &ext.expected_resolution_date {
            if !is_valid_date(date) {
                errors.push(format!(
                    "Decision \"{}\" external dependency \"{}\" has invalid date format. Use YYYY-MM-DD format.",
                    decision.id, ext.id
                ));
            }
        }
    }
}

/// Ids are unique across the union of pros and cons, and every impact
/// value must be a known level. Numeric leftovers are legacy ratings
/// the parser could not map; they get the rating message.
fn check_pros_cons(decision: &Decision, errors: &mut Vec<String>) {
    let Some(pros_cons) = &decision.pros_cons else {
        return;
    };
    let mut seen: HashSet<&str> = HashSet::new();

    for pro in pros_cons.pros.iter().flatten() {
        check_pros_cons_item(decision, "pro", pro, &mut seen, errors);
    }
    for con in pros_cons.cons.iter().flatten() {
        check_pros_cons_item(decision, "con", con, &mut seen, errors);
    }
}

fn check_pros_cons_item<'a>(
    decision: &Decision,
    kind: &str,
    item: &'a ProsConsItem,
    seen: &mut HashSet<&'a str>,
    errors: &mut Vec<String>,
) {
    if !seen.insert(item.id.as_str()) {
        errors.push(format!(
            "Decision \"{}\" has duplicate pros/cons ID: {}",
            decision.id, item.id
        ));
    }

    match &item.impact {
        None => {}
        Some(Impact::Level(level)) => {
            if !IMPACT_LEVELS.contains(&level.as_str()) {
                errors.push(invalid_impact(decision, kind, item));
            }
        }
        Some(Impact::Rating(rating)) => {
            // In-range ratings were mapped to levels at parse time.
            if !(1..=5).contains(rating) {
                errors.push(invalid_rating(decision, kind, item));
            }
        }
        Some(Impact::Raw(value)) => {
            if matches!(value, serde_yaml::Value::Number(_)) {
                errors.push(invalid_rating(decision, kind, item));
            } else {
                errors.push(invalid_impact(decision, kind, item));
            }
        }
    }
}

fn invalid_impact(decision: &Decision, kind: &str, item: &ProsConsItem) -> String {
    format!(
        "Decision \"{}\" {} \"{}\" has invalid impact level. Must be one of: {}",
        decision.id,
        kind,
        item.id,
        IMPACT_LEVELS.join(", ")
    )
}

fn invalid_rating(decision: &Decision, kind: &str, item: &ProsConsItem) -> String {
    format!(
        "Decision \"{}\" {} \"{}\" has invalid rating. Rating must be an integer between 1 and 5.",
        decision.id, kind, item.id
    )
}

/// Link ids are unique within one decision and the type, when present,
/// must be a known kind.
fn check_links(decision: &Decision, errors: &mut Vec<String>) {
    let mut seen: HashSet<&str> = HashSet::new();

    for link in decision.links.iter().flatten() {
        if !seen.insert(link.id.as_str()) {
            errors.push(format!(
                "Decision \"{}\" has duplicate link ID: {}",
                decision.id, link.id
            ));
        }

        if let Some(link_type) = &link.link_type {
            if !LINK_TYPES.contains(&link_type.as_str()) {
                errors.push(format!(
                    "Decision \"{}\" link \"{}\" has invalid type: {}. Must be one of: {}",
                    decision.id,
                    link.id,
                    link_type,
                    LINK_TYPES.join(", ")
                ));
            }
        }
    }
}

/// Implementation task ids are unique within one decision; status and
/// due date must be well-formed.
fn check_tasks(decision: &Decision, errors: &mut Vec<String>) {
    let mut seen: HashSet<&str> = HashSet::new();

    for task in decision.implementation_tasks.iter().flatten() {
        if !seen.insert(task.id.as_str()) {
            errors.push(format!(
                "Decision \"{}\" has duplicate implementation task ID: {}",
                decision.id, task.id
            ));
        }

        if let Some(status) = &task.status {
            if !TASK_STATUSES.contains(&status.as_str()) {
                errors.push(format!(
                    "Decision \"{}\" task \"{}\" has invalid status: {}. Must be one of: {}",
                    decision.id,
                    task.id,
                    status,
                    TASK_STATUSES.join(", ")
                ));
            }
        }

        if let Some(due) = &task.due_date {
            if !is_valid_date(due) {
                errors.push(format!(
                    "Decision \"{}\" task \"{}\" dueDate has invalid date format. Use YYYY-MM-DD format.",
                    decision.id, task.id
                ));
            }
        }
    }
}
