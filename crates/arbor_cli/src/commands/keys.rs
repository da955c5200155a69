//! Keys command implementation

use arbor_ast::{NodeType, VisitorKeys};
use miette::{IntoDiagnostic, Result};

fn describe(keys: &VisitorKeys, node_type: NodeType) -> String {
    match keys.get(node_type) {
        Some([]) | None => format!("{}: (leaf)", node_type),
        Some(child_keys) => format!("{}: {}", node_type, child_keys.join(", ")),
    }
}

pub fn run_keys(node_type: Option<&str>) -> Result<()> {
    let keys = VisitorKeys::standard();

    match node_type {
        Some(tag) => {
            let node_type: NodeType = tag.parse().into_diagnostic()?;
            println!("{}", describe(&keys, node_type));
        }
        None => {
            for node_type in NodeType::ALL {
                println!("{}", describe(&keys, *node_type));
            }
        }
    }

    Ok(())
}
