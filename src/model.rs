//! Data model for architecture decision trees
//!
//! A tree is authored as a flat list of decisions in YAML. The parser links
//! that list into a graph: `children` is derived as the inverse of
//! `dependencies`, and `root_decisions` collects every decision with no
//! dependencies, in source order.
//!
//! Enum-like fields (`status`, `riskLevel`, link `type`, task `status`,
//! pros/cons `impact`) are kept as plain strings and checked against the
//! allowed-value slices below. The validator reports bad values as data;
//! closed Rust enums would reject them at deserialization time instead,
//! which is the wrong error channel for a document a person is editing.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Allowed `status` values for a decision.
pub const STATUS_VALUES: &[&str] = &["proposed", "accepted", "rejected", "deprecated"];

/// Allowed `riskLevel` values.
pub const RISK_LEVELS: &[&str] = &["low", "medium", "high"];

/// Allowed `impact` levels for pros/cons items.
pub const IMPACT_LEVELS: &[&str] = &["minor", "major", "high"];

/// Allowed link `type` values.
pub const LINK_TYPES: &[&str] = &[
    "rfc",
    "ticket",
    "confluence",
    "github",
    "documentation",
    "other",
];

/// Allowed implementation task `status` values.
pub const TASK_STATUSES: &[&str] = &["todo", "in-progress", "done", "blocked"];

/// A fully linked decision tree.
///
/// Built fresh from source text on every parse; never mutated after
/// [`crate::propagate::propagate_selection`] has run.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionTree {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Decisions keyed by id, in source order.
    pub decisions: IndexMap<String, Decision>,
    /// Ids of decisions with no dependencies, in source order.
    pub root_decisions: Vec<String>,
    /// SHA256 of the raw document text this tree was built from.
    pub source_hash: String,
}

/// One node in the decision tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Decision {
    pub id: String,
    pub title: String,
    pub description: String,

    /// Ids of decisions that must be settled before this one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dependencies: Option<Vec<String>>,

    /// Ids of decisions that declared this one as a dependency.
    /// Derived at build time; never read from input.
    #[serde(default, skip_deserializing)]
    pub children: Vec<String>,

    /// Tri-state path flag: `Some(true)` on the chosen path,
    /// `Some(false)` rejected, `None` undetermined. May be authored
    /// and is overwritten by propagation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_path: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub risk_level: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authors: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost_estimate: Option<String>,

    /// ISO date (YYYY-MM-DD).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decision_date: Option<String>,
    /// ISO date (YYYY-MM-DD).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_reviewed: Option<String>,

    /// Ids of decisions this one supersedes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supersedes: Option<Vec<String>>,
    /// Id of the decision that supersedes this one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub superseded_by: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_dependencies: Option<Vec<ExternalDependency>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pros_cons: Option<ProsCons>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub links: Option<Vec<Link>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub implementation_tasks: Option<Vec<ImplementationTask>>,
}

impl Decision {
    /// A root decision has no dependencies.
    pub fn is_root(&self) -> bool {
        match &self.dependencies {
            Some(deps) => deps.is_empty(),
            None => true,
        }
    }
}

/// A blocking factor outside the tree's control (an approval, a
/// procurement). Id is unique only within the owning decision.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExternalDependency {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// ISO date (YYYY-MM-DD).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_resolution_date: Option<String>,
}

/// Weighted arguments for and against a decision.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProsCons {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pros: Option<Vec<ProsConsItem>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cons: Option<Vec<ProsConsItem>>,
}

/// One pro or con. Id is unique across the union of the owning
/// decision's pros and cons lists.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProsConsItem {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub impact: Option<Impact>,
}

/// Impact of a pros/cons item as authored.
///
/// Current documents name a category (`minor`, `major`, `high`). Older
/// documents rated items 1-5; the parser maps in-range ratings onto
/// categories via [`Impact::from_legacy_rating`]. Anything else is kept
/// raw so validation can report it instead of failing the parse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Impact {
    Level(String),
    Rating(i64),
    Raw(serde_yaml::Value),
}

impl Impact {
    /// Map a legacy 1-5 rating onto an impact category.
    pub fn from_legacy_rating(rating: i64) -> Option<&'static str> {
        match rating {
            1 | 2 => Some("minor"),
            3 => Some("major"),
            4 | 5 => Some("high"),
            _ => None,
        }
    }
}

/// A reference attached to a decision (RFC, ticket, doc page).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Link {
    pub id: String,
    pub title: String,
    pub url: String,
    #[serde(
        rename = "type",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub link_type: Option<String>,
}

/// A unit of implementation work attached to a decision.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImplementationTask {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,
    /// ISO date (YYYY-MM-DD).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_legacy_rating_mapping() {
        assert_eq!(Impact::from_legacy_rating(1), Some("minor"));
        assert_eq!(Impact::from_legacy_rating(2), Some("minor"));
        assert_eq!(Impact::from_legacy_rating(3), Some("major"));
        assert_eq!(Impact::from_legacy_rating(4), Some("high"));
        assert_eq!(Impact::from_legacy_rating(5), Some("high"));
        assert_eq!(Impact::from_legacy_rating(0), None);
        assert_eq!(Impact::from_legacy_rating(6), None);
        assert_eq!(Impact::from_legacy_rating(-1), None);
    }

    #[test]
    fn test_decision_camel_case_fields() {
        let yaml = r#"
id: "use-postgres"
title: "Use Postgres"
description: "Primary data store"
riskLevel: "low"
decisionDate: "2024-03-15"
supersededBy: "use-cockroach"
selectedPath: true
"#;
        let decision: Decision = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(decision.risk_level.as_deref(), Some("low"));
        assert_eq!(decision.decision_date.as_deref(), Some("2024-03-15"));
        assert_eq!(decision.superseded_by.as_deref(), Some("use-cockroach"));
        assert_eq!(decision.selected_path, Some(true));
    }

    #[test]
    fn test_children_never_deserialized() {
        let yaml = r#"
id: "a"
title: "A"
description: "A decision"
children: ["forged"]
"#;
        let decision: Decision = serde_yaml::from_str(yaml).unwrap();
        assert!(decision.children.is_empty());
    }

    #[test]
    fn test_impact_untagged_shapes() {
        let level: Impact = serde_yaml::from_str("\"major\"").unwrap();
        assert_eq!(level, Impact::Level("major".to_string()));

        let rating: Impact = serde_yaml::from_str("4").unwrap();
        assert_eq!(rating, Impact::Rating(4));

        let raw: Impact = serde_yaml::from_str("2.5").unwrap();
        assert!(matches!(raw, Impact::Raw(_)));
    }

    #[test]
    fn test_is_root() {
        let yaml = r#"
id: "a"
title: "A"
description: "A decision"
"#;
        let no_deps: Decision = serde_yaml::from_str(yaml).unwrap();
        assert!(no_deps.is_root());

        let yaml = r#"
id: "b"
title: "B"
description: "B decision"
dependencies: []
"#;
        let empty_deps: Decision = serde_yaml::from_str(yaml).unwrap();
        assert!(empty_deps.is_root());

        let yaml = r#"
id: "c"
title: "C"
description: "C decision"
dependencies: ["a"]
"#;
        let with_deps: Decision = serde_yaml::from_str(yaml).unwrap();
        assert!(!with_deps.is_root());
    }
}
