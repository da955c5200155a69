//! Traversal configuration.

use std::fs;
use std::path::{Path, PathBuf};

use arbor_ast::{NodeType, RemovePropertiesOptions};
use jsonc_parser::ParseOptions;
use serde::{Deserialize, Serialize};

use crate::{ConfigError, Visitor};

/// Options read from `.arbor.jsonc` / `.arbor.json`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TraverseConfig {
    /// Traverse without scopes and without the program-root requirement.
    #[serde(default)]
    pub no_scope: bool,

    /// Node types whose subtrees are never entered.
    #[serde(default)]
    pub blacklist: Vec<String>,

    /// Keep comment properties when stripping nodes.
    #[serde(default)]
    pub preserve_comments: bool,
}

impl TraverseConfig {
    /// File names looked up by [`discover`](Self::discover), in order.
    pub const FILE_NAMES: &'static [&'static str] = &[".arbor.jsonc", ".arbor.json"];

    /// Loads configuration from a file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Parses configuration from JSON. Comments and trailing commas are
    /// accepted; an empty document yields the defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let value = jsonc_parser::parse_to_serde_value(json, &ParseOptions::default())
            .map_err(|e| ConfigError::invalid(e.to_string()))?
            .unwrap_or(serde_json::Value::Object(serde_json::Map::new()));

        let config: Self =
            serde_json::from_value(value).map_err(|e| ConfigError::invalid(e.to_string()))?;

        // Surface unknown type tags at load time.
        config.blacklist_types()?;
        Ok(config)
    }

    /// Finds the first config file in `dir`.
    pub fn discover(dir: impl AsRef<Path>) -> Option<PathBuf> {
        let dir = dir.as_ref();
        Self::FILE_NAMES
            .iter()
            .map(|name| dir.join(name))
            .find(|path| path.is_file())
    }

    /// Parses the blacklist entries into node types.
    pub fn blacklist_types(&self) -> Result<Vec<NodeType>, ConfigError> {
        self.blacklist
            .iter()
            .map(|tag| tag.parse::<NodeType>().map_err(ConfigError::from))
            .collect()
    }

    pub fn remove_properties_options(&self) -> RemovePropertiesOptions {
        RemovePropertiesOptions {
            preserve_comments: self.preserve_comments,
        }
    }

    /// Applies `noScope` and `blacklist` to a visitor.
    pub fn apply<S>(&self, visitor: Visitor<S>) -> Result<Visitor<S>, ConfigError> {
        let blacklist = self.blacklist_types()?;
        Ok(visitor.blacklist(blacklist).with_no_scope(self.no_scope))
    }
}
