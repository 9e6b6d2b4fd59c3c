//! Espalier - Architecture decision tree tooling
//!
//! Author a decision tree as a flat YAML document and get back a linked,
//! validated graph: which decisions depend on which, which branches are
//! on the chosen path, and everything that is inconsistent about the
//! document, reported all at once.
//!
//! # Pipeline
//!
//! | Stage | Entry point | Failure mode |
//! |-------|-------------|--------------|
//! | Build | [`parse_tree`] | [`ParseError`] when the text is not YAML |
//! | Propagate | runs inside [`parse_tree`] | never fails |
//! | Validate | [`validate_tree`] | never fails; problems come back as strings |
//!
//! Parse errors and validation errors are deliberately separate
//! channels: a document that does not deserialize raises `ParseError`,
//! while a document that parses into an inconsistent tree (cycles,
//! dangling references, bad enum values, malformed dates, duplicate
//! ids) yields a list of human-readable error strings the caller can
//! render together.
//!
//! # Quick Start
//!
//! ```
//! use espalier::{parse_tree, validate_tree};
//!
//! let yaml = r#"
//! name: "Storage layer"
//! decisions:
//!   - id: "pick-store"
//!     title: "Pick a data store"
//!     description: "Entry point"
//!   - id: "postgres"
//!     title: "Use Postgres"
//!     description: "Relational, boring, good"
//!     dependencies: ["pick-store"]
//!     selectedPath: true
//!   - id: "mongo"
//!     title: "Use Mongo"
//!     description: "Considered and not chosen"
//!     dependencies: ["pick-store"]
//! "#;
//!
//! let tree = parse_tree(yaml).unwrap();
//! assert_eq!(tree.root_decisions, vec!["pick-store".to_string()]);
//! // Choosing postgres implicitly rejected its undecided sibling
//! assert_eq!(tree.decisions["mongo"].selected_path, Some(false));
//! assert!(validate_tree(&tree).is_empty());
//! ```

pub mod config;
pub mod export;
pub mod model;
pub mod parser;
pub mod propagate;
pub mod validate;

pub use config::Config;
pub use export::{tree_to_dot, tree_to_json, DotConfig};
pub use model::{
    Decision, DecisionTree, ExternalDependency, Impact, ImplementationTask, Link, ProsCons,
    ProsConsItem, IMPACT_LEVELS, LINK_TYPES, RISK_LEVELS, STATUS_VALUES, TASK_STATUSES,
};
pub use parser::{compute_hash, parse_tree, ParseError};
pub use propagate::propagate_selection;
pub use validate::validate_tree;
