use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use depgraph_layout::{Direction, GraphInput, LayeredLayout};
use tracing::{debug, info};
use tracing_subscriber::{prelude::*, EnvFilter};

/// Compute node positions for a dependency graph
///
/// Reads `{"nodes": [...], "edges": [["from", "to"], ...]}` and prints a JSON
/// array of `{"id", "x", "y"}` objects in node order.
#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Graph file, stdin when omitted or `-`
    input: Option<PathBuf>,

    /// Orientation of the layers
    #[arg(short, long, value_enum, default_value_t = Direction::TopToBottom)]
    direction: Direction,

    /// JSON file with layout settings, missing fields keep their defaults
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the number of refinement rounds
    #[arg(long)]
    iterations: Option<usize>,

    /// Log layer, component and crossing counts
    #[arg(long)]
    stats: bool,

    /// Pretty-print the output
    #[arg(long)]
    pretty: bool,
}

impl Args {
    fn engine(&self) -> Result<LayeredLayout> {
        let mut engine = match &self.config {
            Some(path) => {
                let text = fs::read_to_string(path)
                    .with_context(|| format!("Failed to read config {}", path.display()))?;
                serde_json::from_str(&text)
                    .with_context(|| format!("Invalid config {}", path.display()))?
            }
            None => LayeredLayout::default(),
        };

        if let Some(iterations) = self.iterations {
            engine.iterations = iterations;
        }

        Ok(engine)
    }

    fn graph(&self) -> Result<GraphInput> {
        let text = match &self.input {
            Some(path) if path.as_os_str() != "-" => fs::read_to_string(path)
                .with_context(|| format!("Failed to read graph {}", path.display()))?,
            _ => {
                let mut text = String::new();
                io::stdin()
                    .read_to_string(&mut text)
                    .context("Failed to read graph from stdin")?;
                text
            }
        };

        serde_json::from_str(&text).context("Invalid graph")
    }
}

fn run(args: &Args) -> Result<()> {
    let engine = args.engine()?;
    let graph = args.graph()?;
    debug!("Using {engine:?}");

    let layers = engine.compute_layers(&graph)?;
    let layout = engine.compute_positions(&layers, args.direction);

    if args.stats {
        info!(
            nodes = graph.nodes.len(),
            layers = layout.layer_count,
            virtual_nodes = layers.virtual_count(),
            components = layout.components,
            crossings = layout.crossings,
            "Layout done"
        );
    }

    let mut stdout = io::stdout().lock();
    if args.pretty {
        serde_json::to_writer_pretty(&mut stdout, &layout.nodes)?;
    } else {
        serde_json::to_writer(&mut stdout, &layout.nodes)?;
    }
    writeln!(stdout)?;

    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    run(&args)
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    #[test]
    fn defaults() {
        let args = Args::try_parse_from(["depgraph-layout"]).unwrap();

        assert_eq!(args.direction, Direction::TopToBottom);
        assert_eq!(args.engine().unwrap(), LayeredLayout::default());
    }

    #[test]
    fn iterations_override_the_config() {
        let args = Args::try_parse_from([
            "depgraph-layout",
            "graph.json",
            "--direction",
            "left-to-right",
            "--iterations",
            "9",
        ])
        .unwrap();

        assert_eq!(args.input, Some(PathBuf::from("graph.json")));
        assert_eq!(args.direction, Direction::LeftToRight);
        assert_eq!(args.engine().unwrap().iterations, 9);
    }

    #[test]
    fn direction_names_match_the_json_ones() {
        let args = Args::try_parse_from(["depgraph-layout", "-d", "left-to-right"]).unwrap();
        assert_eq!(args.direction, Direction::LeftToRight);

        let parsed: Direction = serde_json::from_str("\"left-to-right\"").unwrap();
        assert_eq!(parsed, args.direction);

        assert!(Args::try_parse_from(["depgraph-layout", "-d", "sideways"]).is_err());
    }

    #[test]
    fn missing_config_is_reported() {
        let args = Args::try_parse_from(["depgraph-layout", "--config", "/nonexistent/layout.json"])
            .unwrap();

        let err = args.engine().unwrap_err();
        assert!(err.to_string().contains("Failed to read config"));
    }
}
