//! Configuration file support for espalier
//!
//! Reads from .espalier/config.toml

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration structure
#[derive(Debug, Deserialize, Serialize, Default, Clone)]
pub struct Config {
    /// Tree document settings
    #[serde(default)]
    pub tree: TreeConfig,

    /// DOT export defaults
    #[serde(default)]
    pub dot: DotDefaults,
}

/// Tree document settings
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct TreeConfig {
    /// Default document to load when a command is given no file
    /// Default: "decisions.yaml"
    #[serde(default = "default_tree_file")]
    pub file: String,
}

/// Defaults applied to `espalier dot` unless overridden on the command line
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct DotDefaults {
    /// Orientation: "TB" (top-bottom) or "LR" (left-right)
    /// Default: "TB"
    #[serde(default = "default_rankdir")]
    pub rankdir: String,

    /// Include decision ids in node labels
    /// Default: true
    #[serde(default = "default_true")]
    pub show_ids: bool,

    /// Include decision status in node labels
    /// Default: true
    #[serde(default = "default_true")]
    pub show_status: bool,
}

fn default_tree_file() -> String {
    "decisions.yaml".to_string()
}

fn default_rankdir() -> String {
    "TB".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            file: default_tree_file(),
        }
    }
}

impl Default for DotDefaults {
    fn default() -> Self {
        Self {
            rankdir: default_rankdir(),
            show_ids: true,
            show_status: true,
        }
    }
}

impl Config {
    /// Load config from .espalier/config.toml
    /// Returns default config if file doesn't exist
    pub fn load() -> Self {
        if let Some(path) = Self::find_config_path() {
            if let Ok(contents) = std::fs::read_to_string(&path) {
                if let Ok(config) = toml::from_str(&contents) {
                    return config;
                }
            }
        }
        Self::default()
    }

    /// Find config.toml by walking up directory tree
    fn find_config_path() -> Option<PathBuf> {
        let current_dir = std::env::current_dir().ok()?;
        let mut dir = current_dir.as_path();

        loop {
            let config_path = dir.join(".espalier").join("config.toml");
            if config_path.exists() {
                return Some(config_path);
            }

            match dir.parent() {
                Some(parent) => dir = parent,
                None => break,
            }
        }
        None
    }
}
