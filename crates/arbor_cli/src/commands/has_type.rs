//! Has-type command implementation

use std::path::Path;

use arbor_ast::NodeType;
use arbor_traverse::{TraverseConfig, Traverser};
use miette::{IntoDiagnostic, Result};
use tracing::debug;

use super::read_tree;

/// Prints whether `node_type` occurs in the tree and returns the answer.
pub fn run_has_type(
    file: &Path,
    node_type: &str,
    blacklist: &[String],
    config: &TraverseConfig,
) -> Result<bool> {
    let target: NodeType = node_type.parse().into_diagnostic()?;

    let mut types = config.blacklist_types().into_diagnostic()?;
    for tag in blacklist {
        types.push(tag.parse().into_diagnostic()?);
    }

    let (mut ast, root) = read_tree(file)?;
    debug!("Searching {} for {} (blacklist: {:?})", file.display(), target, types);

    let found = Traverser::new().has_type(&mut ast, root, None, target, &types);
    println!("{}", found);

    Ok(found)
}
