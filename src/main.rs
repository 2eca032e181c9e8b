use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use linkgraph::app::LinkGraphApp;
use linkgraph::graph::item_name;
use linkgraph::{Graph, GraphConfig};
use tracing::{Level, info};

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// JSON graph: `{"nodes": {id: {label, weight, context}}, "links": [...]}`.
    #[arg(long)]
    graph: Option<PathBuf>,
    /// Size of the synthetic graph used when no file is given.
    #[arg(long, default_value_t = 60)]
    nodes: usize,
    #[arg(long)]
    root: Option<String>,
    /// Anchor appended to `--root` (e.g. `#todo`) when that node exists.
    #[arg(long, default_value = "")]
    fragment: String,
    #[arg(long, default_value = "")]
    search: String,
    #[arg(long)]
    search_depth: Option<usize>,
    /// Node budget after filtering; 0 disables it.
    #[arg(long)]
    max_nodes: Option<usize>,
    #[arg(long, default_value_t = 1440.0)]
    width: f32,
    #[arg(long, default_value_t = 920.0)]
    height: f32,
    #[arg(long)]
    debug: bool,
    #[arg(long, default_value = "info")]
    log_level: Level,
}

fn load_graph(path: &Path) -> Result<Graph> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read graph file {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse graph file {}", path.display()))
}

fn config_from_args(args: &Args, graph: &Graph) -> GraphConfig {
    let mut config = GraphConfig::for_viewport(args.width, args.height);
    config.root_node = args
        .root
        .as_deref()
        .map(|root| item_name(graph, root, &args.fragment));
    config.search_query = args.search.clone();
    if let Some(depth) = args.search_depth {
        config.search_depth = depth;
    }
    if let Some(max_nodes) = args.max_nodes {
        config.max_nodes = max_nodes;
    }
    config.debug = args.debug;
    config
}

fn main() -> Result<()> {
    let args = Args::parse();
    tracing_subscriber::fmt().with_max_level(args.log_level).init();

    let graph = match &args.graph {
        Some(path) => load_graph(path)?,
        None => Graph::many(args.nodes),
    };
    info!(
        nodes = graph.node_count(),
        links = graph.links.len(),
        "graph loaded"
    );

    let config = config_from_args(&args, &graph);
    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default().with_inner_size([args.width, args.height]),
        ..Default::default()
    };

    eframe::run_native(
        "linkgraph",
        options,
        Box::new(move |cc| Ok(Box::new(LinkGraphApp::new(cc, graph, config)))),
    )
    .map_err(|err| anyhow::anyhow!("viewer exited with an error: {err}"))
}
