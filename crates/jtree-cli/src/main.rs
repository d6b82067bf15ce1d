//! `jtree` CLI — build JSON token trees and inspect their structure.
//!
//! ## Usage
//!
//! ```sh
//! # Indented outline of the tree (stdin → stdout)
//! echo '{"name":"Alice","tags":["a","b"]}' | jtree outline
//!
//! # Node counts per type and tree depth
//! jtree stats -i data.json
//!
//! # Rebuild the tree and print it as pretty JSON
//! jtree json -i data.json -o out.json
//!
//! # Show writer trace events on stderr
//! jtree --log-level trace outline -i data.json
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use jtree_core::{ContainerFlavor, Node, NodeKind, Token, Value};
use std::collections::BTreeMap;
use std::io::{self, Read};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "jtree",
    version,
    about = "Build JSON token trees and report on their structure"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log filter for stderr output (overrides RUST_LOG; default "warn")
    #[arg(long, global = true)]
    log_level: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print an indented outline of the token tree
    Outline {
        /// Input JSON file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Show node counts per type and tree depth
    Stats {
        /// Input JSON file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
    },
    /// Rebuild the token tree and print it as pretty JSON
    Json {
        /// Input JSON file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_level.as_deref());

    match cli.command {
        Commands::Outline { input, output } => {
            let token = build_token(input.as_deref())?;
            write_output(output.as_deref(), &outline(&token))?;
        }
        Commands::Stats { input } => {
            let token = build_token(input.as_deref())?;
            let stats = Stats::of(&token);
            println!("Nodes:  {}", stats.nodes);
            println!("Depth:  {}", stats.depth);
            for (node_type, count) in &stats.by_type {
                println!("  {node_type}: {count}");
            }
        }
        Commands::Json { input, output } => {
            let token = build_token(input.as_deref())?;
            let mut pretty =
                serde_json::to_string_pretty(&token).context("Failed to render tree as JSON")?;
            pretty.push('\n');
            write_output(output.as_deref(), &pretty)?;
        }
    }

    Ok(())
}

fn init_tracing(level: Option<&str>) {
    let env_filter = match level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(io::stderr)
        .try_init();
}

fn build_token(input: Option<&str>) -> Result<Token> {
    let text = read_input(input)?;
    let json: serde_json::Value =
        serde_json::from_str(&text).context("Failed to parse JSON input")?;
    let token = jtree_core::from_json(&json).context("Failed to build token tree")?;
    tracing::debug!(
        nodes = token.as_document().map_or(1, |doc| doc.len()),
        "built token tree"
    );
    Ok(token)
}

// ============================================================================
// Outline
// ============================================================================

fn outline(token: &Token) -> String {
    let mut lines = Vec::new();
    match token {
        Token::Tree(doc) => {
            if let Some(root) = doc.root() {
                outline_node(root, 0, &mut lines);
            }
        }
        Token::Scalar(value) => lines.push(describe(value)),
    }
    let mut out = lines.join("\n");
    out.push('\n');
    out
}

fn outline_node(node: Node<'_>, indent: usize, lines: &mut Vec<String>) {
    let label = match node.kind() {
        NodeKind::Container {
            flavor: ContainerFlavor::Constructor,
            name,
            ..
        } => format!("constructor {}", name.as_deref().unwrap_or_default()),
        NodeKind::Container { flavor, .. } => flavor.to_string(),
        NodeKind::Member { key, .. } => format!("member {key:?}"),
        NodeKind::Value(value) => describe(value),
    };
    let pad = "  ".repeat(indent);
    lines.push(format!("{pad}{label}"));
    for child in node.children() {
        outline_node(child, indent + 1, lines);
    }
}

/// `kind value`, or just the kind when the value carries no payload.
fn describe(value: &Value) -> String {
    match value {
        Value::Null | Value::Undefined => value.kind().to_string(),
        other => format!("{} {other}", other.kind()),
    }
}

// ============================================================================
// Stats
// ============================================================================

struct Stats {
    nodes: usize,
    depth: usize,
    by_type: BTreeMap<String, usize>,
}

impl Stats {
    fn of(token: &Token) -> Self {
        let mut stats = Stats {
            nodes: 0,
            depth: 0,
            by_type: BTreeMap::new(),
        };
        match token {
            Token::Tree(doc) => {
                stats.depth = doc.depth();
                if let Some(root) = doc.root() {
                    stats.count(root);
                }
            }
            Token::Scalar(value) => stats.tally(value.kind().to_string()),
        }
        stats
    }

    fn count(&mut self, node: Node<'_>) {
        self.tally(node.node_type().to_string());
        for child in node.children() {
            self.count(child);
        }
    }

    fn tally(&mut self, node_type: String) {
        self.nodes += 1;
        *self.by_type.entry(node_type).or_default() += 1;
    }
}

// ============================================================================
// I/O
// ============================================================================

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {path}"))
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

fn write_output(path: Option<&str>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write file: {path}"))?;
        }
        None => {
            print!("{content}");
        }
    }
    Ok(())
}
