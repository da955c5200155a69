//! Strip command implementation

use std::path::Path;

use arbor_traverse::{TraverseConfig, Traverser};
use miette::{IntoDiagnostic, Result};
use tracing::debug;

use super::read_tree;

pub fn run_strip(file: &Path, preserve_comments: bool, config: &TraverseConfig) -> Result<()> {
    let (mut ast, root) = read_tree(file)?;

    let mut opts = config.remove_properties_options();
    opts.preserve_comments |= preserve_comments;
    debug!("Stripping {} ({:?})", file.display(), opts);

    let root = Traverser::new().remove_properties(&mut ast, root, opts);

    let output = serde_json::to_string_pretty(&ast.to_json(root)).into_diagnostic()?;
    println!("{}", output);

    Ok(())
}
