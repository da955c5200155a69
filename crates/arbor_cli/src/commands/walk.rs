//! Walk command implementation

use std::path::Path;

use arbor_traverse::{Path as NodePathView, TraverseConfig, Traverser, Visitor};
use miette::{IntoDiagnostic, Result};

use super::read_tree;

#[derive(Debug, Default)]
struct Trace {
    depth: usize,
    lines: Vec<String>,
}

impl Trace {
    fn push(&mut self, marker: char, label: String) {
        self.lines
            .push(format!("{}{} {}", "  ".repeat(self.depth), marker, label));
    }
}

fn label(path: &NodePathView<'_, Trace>) -> String {
    match path.node().name() {
        Some(name) => format!("{} {}", path.node_type(), name),
        None => path.node_type().to_string(),
    }
}

pub fn run_walk(file: &Path, config: &TraverseConfig) -> Result<()> {
    let (mut ast, root) = read_tree(file)?;

    let visitor = Visitor::<Trace>::new()
        .enter(|path| {
            let label = label(path);
            let trace = path.state_mut();
            trace.depth += 1;
            trace.push('>', label);
            Ok(())
        })
        .exit(|path| {
            let label = label(path);
            let trace = path.state_mut();
            trace.push('<', label);
            trace.depth -= 1;
            Ok(())
        });
    let visitor = config.apply(visitor).into_diagnostic()?;

    let mut trace = Trace::default();
    trace.push('>', ast.node_type(root).to_string());

    Traverser::new()
        .traverse(&mut ast, root, &visitor, None, &mut trace, None)
        .into_diagnostic()?;

    trace.push('<', ast.node_type(root).to_string());

    for line in trace.lines {
        println!("{}", line);
    }

    Ok(())
}
