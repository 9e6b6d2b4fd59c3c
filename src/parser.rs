//! YAML parsing and graph linking
//!
//! [`parse_tree`] turns raw document text into a linked [`DecisionTree`]:
//! deserialize the flat decision list, wire `children` as the inverse of
//! `dependencies`, collect the roots, then run selected-path propagation.
//!
//! Only unparsable text fails here. Dangling references, bad enum values
//! and the like parse fine and are reported by [`crate::validate`], so
//! callers can tell "the document is not valid YAML" apart from "the
//! document is YAML but inconsistent".

use crate::model::{Decision, DecisionTree, Impact};
use crate::propagate;
use indexmap::IndexMap;
use serde::Deserialize;
use sha2::{Digest, Sha256};

/// Error type for parse failures.
#[derive(Debug)]
pub enum ParseError {
    Yaml(serde_yaml::Error),
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::Yaml(e) => write!(f, "Failed to parse YAML: {}", e),
        }
    }
}

impl std::error::Error for ParseError {}

impl From<serde_yaml::Error> for ParseError {
    fn from(e: serde_yaml::Error) -> Self {
        ParseError::Yaml(e)
    }
}

pub type Result<T> = std::result::Result<T, ParseError>;

/// Document shape as authored: a flat list of decisions.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawTree {
    name: String,
    #[serde(default)]
    description: Option<String>,
    decisions: Vec<Decision>,
}

/// Compute SHA256 hash of content
pub fn compute_hash(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Parse raw YAML text into a linked, propagated decision tree.
///
/// Fails only when the text does not deserialize; semantic problems are
/// left for [`crate::validate::validate_tree`].
pub fn parse_tree(source: &str) -> Result<DecisionTree> {
    let raw: RawTree = serde_yaml::from_str(source)?;
    let mut tree = link_tree(raw, compute_hash(source));
    propagate::propagate_selection(&mut tree);
    Ok(tree)
}

fn link_tree(raw: RawTree, source_hash: String) -> DecisionTree {
    let mut decisions: IndexMap<String, Decision> = IndexMap::new();

    // First pass: index every decision by id. A repeated id keeps the
    // later record, matching plain map assignment.
    for mut decision in raw.decisions {
        decision.children = Vec::new();
        normalize_legacy_ratings(&mut decision);
        decisions.insert(decision.id.clone(), decision);
    }

    // Second pass: derive children as the inverse of dependencies.
    // Unknown dependency ids are skipped here; the validator reports them.
    let ids: Vec<String> = decisions.keys().cloned().collect();
    for id in &ids {
        let deps = decisions[id].dependencies.clone().unwrap_or_default();
        for dep in deps {
            if let Some(parent) = decisions.get_mut(&dep) {
                parent.children.push(id.clone());
            }
        }
    }

    let root_decisions = decisions
        .values()
        .filter(|d| d.is_root())
        .map(|d| d.id.clone())
        .collect();

    DecisionTree {
        name: raw.name,
        description: raw.description,
        decisions,
        root_decisions,
        source_hash,
    }
}

// Legacy documents rated pros/cons 1-5 instead of naming an impact
// level. In-range ratings are mapped onto levels here so the rest of
// the pipeline sees one shape; out-of-range ratings are left alone for
// the validator to report.
fn normalize_legacy_ratings(decision: &mut Decision) {
    let Some(pros_cons) = decision.pros_cons.as_mut() else {
        return;
    };
    let items = pros_cons
        .pros
        .iter_mut()
        .flatten()
        .chain(pros_cons.cons.iter_mut().flatten());
    for item in items {
        let rating = match item.impact {
            Some(Impact::Rating(r)) => r,
            _ => continue,
        };
        if let Some(level) = Impact::from_legacy_rating(rating) {
            item.impact = Some(Impact::Level(level.to_string()));
        }
    }
}
