//! Command implementations

pub mod has_type;
pub mod keys;
pub mod strip;
pub mod walk;

use std::path::Path;

use arbor_ast::{Ast, NodeId};
use arbor_traverse::TraverseConfig;
use miette::{IntoDiagnostic, Result};
use tracing::debug;

/// Loads the configuration given on the command line, or the first config
/// file found in the working directory, or the defaults.
pub fn load_config(path: Option<&Path>) -> Result<TraverseConfig> {
    if let Some(path) = path {
        debug!("Loading config from {}", path.display());
        return TraverseConfig::from_file(path)
            .map_err(|e| miette::miette!("{}: {}", path.display(), e));
    }

    let cwd = std::env::current_dir().into_diagnostic()?;
    match TraverseConfig::discover(&cwd) {
        Some(found) => {
            debug!("Loading config from {}", found.display());
            TraverseConfig::from_file(&found)
                .map_err(|e| miette::miette!("{}: {}", found.display(), e))
        }
        None => Ok(TraverseConfig::default()),
    }
}

/// Reads a JSON AST from disk.
pub fn read_tree(path: &Path) -> Result<(Ast, NodeId)> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| miette::miette!("Failed to read {}: {}", path.display(), e))?;
    Ast::from_json_str(&content).map_err(|e| miette::miette!("{}: {}", path.display(), e))
}
