//! CLI Command Tests - BDD Style
//!
//! Drives `commands::execute` with parsed argv and on-disk fixtures.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

use std::io::Write;

use anyhow::Result;
use clap::Parser;
use flowgraph::cli::Cli;
use flowgraph::commands::execute;
use flowgraph::config::FlowgraphConfig;
use flowgraph_core::Graph;
use flowgraph_editor::{Mutation, apply_ops};
use tempfile::TempDir;

const FLOW: &str = r#"{
    "_root": {"edges": ["q", "notice"]},
    "q": {"type": 100, "data": {"text": "Tenure?"}, "edges": ["own", "rent"]},
    "own": {"type": 200, "data": {"text": "Own"}, "edges": ["portal"]},
    "rent": {"type": 200, "data": {"text": "Rent"}},
    "portal": {"type": 300, "edges": ["detail"]},
    "detail": {"data": {"text": "Tell us more"}},
    "notice": {"data": {"text": "Thanks"}}
}"#;

const CATALOG: &str = r#"
[[components]]
type = 100
name = "Question"
branching = true

[[components]]
type = 200
name = "Answer"

[[components]]
type = 300
name = "InternalPortal"
transparent = true
"#;

fn write_file(dir: &TempDir, name: &str, content: &str) -> Result<String> {
    let path = dir.path().join(name);
    std::fs::write(&path, content)?;
    Ok(path.display().to_string())
}

fn run(args: &[&str]) -> Result<String> {
    let cli = Cli::try_parse_from(std::iter::once("flowgraph").chain(args.iter().copied()))?;
    execute(&cli, &FlowgraphConfig::default())
}

// ============================================================================
// VALIDATE
// ============================================================================

#[test]
fn given_valid_flow_when_validated_then_reports_node_count() -> Result<()> {
    let dir = TempDir::new()?;
    let graph = write_file(&dir, "flow.json", FLOW)?;

    let output = run(&["validate", &graph])?;

    assert_eq!(output, "ok: 7 nodes");
    Ok(())
}

#[test]
fn given_dangling_edge_when_validated_then_fails() -> Result<()> {
    let dir = TempDir::new()?;
    let graph = write_file(&dir, "flow.json", r#"{"_root": {"edges": ["ghost"]}}"#)?;

    let result = run(&["validate", &graph]);

    assert!(result.is_err());
    Ok(())
}

#[test]
fn given_missing_file_when_validated_then_error_names_the_path() {
    let result = run(&["validate", "/no/such/flow.json"]);

    let message = result.err().map(|e| e.to_string()).unwrap_or_default();
    assert!(message.contains("/no/such/flow.json"));
}

// ============================================================================
// UPCOMING
// ============================================================================

#[test]
fn given_catalog_and_breadcrumbs_when_upcoming_then_follows_answers() -> Result<()> {
    // GIVEN: a flow, its catalog, and an answer recorded at q
    let dir = TempDir::new()?;
    let graph = write_file(&dir, "flow.json", FLOW)?;
    let catalog = write_file(&dir, "catalog.toml", CATALOG)?;
    let crumbs = write_file(&dir, "crumbs.json", r#"{"q": ["own"]}"#)?;

    // WHEN: upcoming ids are requested
    let output = run(&["--catalog", &catalog, "upcoming", &graph, "--breadcrumbs", &crumbs])?;

    // THEN: the portal's content comes before the rest of the root
    let ids: Vec<String> = serde_json::from_str(&output)?;
    assert_eq!(ids, vec!["detail".to_string(), "notice".to_string()]);
    Ok(())
}

#[test]
fn given_no_breadcrumbs_when_upcoming_then_starts_at_root() -> Result<()> {
    let dir = TempDir::new()?;
    let graph = write_file(&dir, "flow.json", FLOW)?;
    let catalog = write_file(&dir, "catalog.toml", CATALOG)?;

    let output = run(&["--catalog", &catalog, "upcoming", &graph])?;

    let ids: Vec<String> = serde_json::from_str(&output)?;
    assert_eq!(ids, vec!["q".to_string(), "notice".to_string()]);
    Ok(())
}

// ============================================================================
// MAKE-UNIQUE, APPLY, SUMMARIZE
// ============================================================================

#[test]
fn given_make_unique_output_when_ops_applied_and_inverted_then_round_trips() -> Result<()> {
    // GIVEN: the mutation printed by make-unique
    let dir = TempDir::new()?;
    let graph_path = write_file(&dir, "flow.json", FLOW)?;
    let output = run(&["make-unique", &graph_path, "own"])?;
    let mutation: Mutation = serde_json::from_str(&output)?;
    let original = Graph::from_json_str(FLOW)?;

    assert_eq!(apply_ops(&original, &mutation.ops)?, mutation.graph);

    // WHEN: its ops are written out and applied, then inverted
    let ops_path = write_file(&dir, "ops.json", &serde_json::to_string(&mutation.ops)?)?;
    let forward: Graph = serde_json::from_str(&run(&["apply", &graph_path, &ops_path])?)?;

    let new_path = write_file(&dir, "new.json", &serde_json::to_string(&forward)?)?;
    let back: Graph =
        serde_json::from_str(&run(&["apply", &new_path, &ops_path, "--invert"])?)?;

    // THEN: forward matches the mutation, inverse restores the input
    assert_eq!(forward, mutation.graph);
    assert_eq!(back, original);
    assert_eq!(forward.edges_of("_root").len(), 3);
    Ok(())
}

#[test]
fn given_unknown_id_when_made_unique_then_fails() -> Result<()> {
    let dir = TempDir::new()?;
    let graph = write_file(&dir, "flow.json", FLOW)?;

    let result = run(&["make-unique", &graph, "nope"]);

    let message = result.err().map(|e| format!("{e:#}")).unwrap_or_default();
    assert!(message.contains("id not found"));
    Ok(())
}

#[test]
fn given_data_change_ops_when_summarized_then_describes_the_edit() -> Result<()> {
    let dir = TempDir::new()?;
    let graph = write_file(&dir, "flow.json", FLOW)?;
    let catalog = write_file(&dir, "catalog.toml", CATALOG)?;
    let ops = write_file(
        &dir,
        "ops.json",
        r#"[{"p": ["q", "data", "text"], "od": "Tenure?", "oi": "Do you own?"}]"#,
    )?;

    let output = run(&["--catalog", &catalog, "summarize", &graph, &ops])?;

    assert_eq!(output, r#"Updated Question text from "Tenure?" to "Do you own?""#);
    Ok(())
}

// ============================================================================
// CONFIG
// ============================================================================

#[test]
fn given_config_with_components_when_loaded_then_drives_upcoming() -> Result<()> {
    let dir = TempDir::new()?;
    let graph = write_file(&dir, "flow.json", FLOW)?;
    let mut config_file = tempfile::Builder::new().suffix(".toml").tempfile()?;
    write!(config_file, "{CATALOG}")?;

    let config = FlowgraphConfig::discover(Some(config_file.path()))?;
    let cli = Cli::try_parse_from(["flowgraph", "upcoming", graph.as_str()])?;
    let output = execute(&cli, &config)?;

    let ids: Vec<String> = serde_json::from_str(&output)?;
    assert_eq!(ids, vec!["q".to_string(), "notice".to_string()]);
    Ok(())
}
