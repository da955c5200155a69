//! CLI argument definitions

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// arbor - Walk, search, and strip JavaScript ASTs
#[derive(Parser)]
#[command(name = "arbor")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the enter/exit order of a traversal
    Walk {
        /// Babel-style JSON AST
        file: PathBuf,
    },

    /// Check whether a node type occurs in a tree
    HasType {
        /// Babel-style JSON AST
        file: PathBuf,

        /// Node type to look for
        node_type: String,

        /// Node types whose subtrees are not searched
        #[arg(short, long)]
        blacklist: Vec<String>,
    },

    /// Strip transient properties and print the tree
    Strip {
        /// Babel-style JSON AST
        file: PathBuf,

        /// Keep comment properties
        #[arg(long)]
        preserve_comments: bool,
    },

    /// Print the child keys of node types
    Keys {
        /// Only this node type
        node_type: Option<String>,
    },
}
