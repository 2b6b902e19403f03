//! CLI command handlers.
//!
//! Each handler reads its inputs from disk and returns the text to print,
//! so `main` owns stdout and the handlers stay testable.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

use std::path::Path;

use anyhow::{Context, Result};
use flowgraph_core::{ComponentCatalog, Graph, ROOT_NODE_KEY};
use flowgraph_crawler::{Breadcrumbs, Crawler};
use flowgraph_editor::{MutationEngine, Op, RandomIds, apply_ops, invert_ops, summarize_ops};
use serde::de::DeserializeOwned;
use tracing::info;

use crate::cli::{Cli, Commands};
use crate::config::FlowgraphConfig;

/// Execute a parsed command line against a resolved config.
///
/// # Errors
///
/// Returns an error if an input file cannot be read or parsed, or if the
/// underlying graph operation rejects its arguments.
pub fn execute(cli: &Cli, config: &FlowgraphConfig) -> Result<String> {
    let catalog = load_catalog(cli.catalog.as_deref(), config)?;

    match &cli.command {
        Commands::Validate { graph } => cmd_validate(graph),
        Commands::Upcoming {
            graph,
            breadcrumbs,
            depth_first,
        } => cmd_upcoming(graph, breadcrumbs.as_deref(), *depth_first, catalog),
        Commands::Apply { graph, ops, invert } => cmd_apply(graph, ops, *invert),
        Commands::Summarize { graph, ops } => cmd_summarize(graph, ops, &catalog),
        Commands::MakeUnique { graph, id, parent } => {
            let engine =
                MutationEngine::with_parts(catalog, RandomIds::with_length(config.id_length));
            cmd_make_unique(graph, id, parent.as_deref(), &engine)
        }
    }
}

fn load_catalog(path: Option<&Path>, config: &FlowgraphConfig) -> Result<ComponentCatalog> {
    path.map_or_else(
        || Ok(config.catalog()),
        |path| {
            ComponentCatalog::from_file(path)
                .with_context(|| format!("Failed to load catalog {}", path.display()))
        },
    )
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("Failed to parse {}", path.display()))
}

fn read_graph(path: &Path) -> Result<Graph> {
    read_json(path)
}

fn cmd_validate(graph_path: &Path) -> Result<String> {
    let graph = read_graph(graph_path)?;
    graph
        .validate()
        .with_context(|| format!("{} is not a valid flow", graph_path.display()))?;

    info!(nodes = graph.len(), "graph is valid");
    Ok(format!("ok: {} nodes", graph.len()))
}

fn cmd_upcoming(
    graph_path: &Path,
    breadcrumbs_path: Option<&Path>,
    depth_first: bool,
    catalog: ComponentCatalog,
) -> Result<String> {
    let graph = read_graph(graph_path)?;
    let breadcrumbs: Breadcrumbs = breadcrumbs_path
        .map(read_json::<Breadcrumbs>)
        .transpose()?
        .unwrap_or_default();

    let crawler = Crawler::with_breadcrumbs(graph, catalog, breadcrumbs)
        .context("Failed to replay breadcrumbs")?;

    let ids = if depth_first {
        crawler.upcoming_ids_depth_first()
    } else {
        crawler.upcoming_ids()
    };
    Ok(serde_json::to_string_pretty(&ids)?)
}

fn cmd_apply(graph_path: &Path, ops_path: &Path, invert: bool) -> Result<String> {
    let graph = read_graph(graph_path)?;
    let ops: Vec<Op> = read_json(ops_path)?;
    let ops = if invert { invert_ops(&ops) } else { ops };

    let result = apply_ops(&graph, &ops).context("Failed to apply ops")?;
    info!(ops = ops.len(), invert, "applied ops");
    Ok(serde_json::to_string_pretty(&result)?)
}

fn cmd_summarize(graph_path: &Path, ops_path: &Path, catalog: &ComponentCatalog) -> Result<String> {
    let graph = read_graph(graph_path)?;
    let ops: Vec<Op> = read_json(ops_path)?;

    Ok(summarize_ops(&graph, &ops, catalog).join("\n"))
}

fn cmd_make_unique(
    graph_path: &Path,
    id: &str,
    parent: Option<&str>,
    engine: &MutationEngine<ComponentCatalog, RandomIds>,
) -> Result<String> {
    let graph = read_graph(graph_path)?;
    let mutation = engine
        .make_unique(&graph, id, parent)
        .with_context(|| {
            format!(
                "Failed to make {id} unique under {}",
                parent.unwrap_or(ROOT_NODE_KEY)
            )
        })?;

    Ok(serde_json::to_string_pretty(&mutation)?)
}
