//! Crawler Behavioral Tests - BDD Style
//!
//! Following BDD naming convention: given_<context>_when_<action>_then_<outcome>

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

use flowgraph_core::{
    ComponentCatalog, ComponentKind, Error, Graph, NodeType, PredicateClassifier, Result,
};
use flowgraph_crawler::{Breadcrumbs, Crawler};

const BRANCH: NodeType = NodeType(100);
const LEAF: NodeType = NodeType(200);
const PORTAL: NodeType = NodeType(300);

fn catalog() -> ComponentCatalog {
    ComponentCatalog::new()
        .with(ComponentKind::new(BRANCH).named("Question").branching())
        .with(ComponentKind::new(LEAF).named("Answer"))
        .with(ComponentKind::new(PORTAL).named("InternalPortal").transparent())
}

fn ids(list: &[&str]) -> Vec<String> {
    list.iter().map(ToString::to_string).collect()
}

fn scenario_a() -> Result<Graph> {
    Graph::from_json_str(
        r#"{
            "_root": {"edges": ["a", "b"]},
            "a": {"type": 100, "edges": ["c"]},
            "b": {"type": 100},
            "c": {"type": 200, "edges": ["d"]},
            "d": {"type": 100, "edges": ["e", "f"]},
            "e": {"type": 200},
            "f": {"type": 200}
        }"#,
    )
}

// ============================================================================
// UPCOMING IDS
// ============================================================================

#[test]
fn given_branching_flow_when_answers_recorded_then_upcoming_follows_choices() -> Result<()> {
    // GIVEN: Scenario A with no history
    let mut crawler = Crawler::new(scenario_a()?, catalog())?;

    // THEN: only a is shown; b is a branch with nowhere to go
    assert_eq!(crawler.upcoming_ids(), ids(&["a"]));

    // WHEN: c is chosen at a
    crawler.record("a", ids(&["c"]))?;
    // THEN: d (reached through c) is next
    assert_eq!(crawler.upcoming_ids(), ids(&["d"]));

    // WHEN: both e and f are chosen at d
    crawler.record("d", ids(&["e", "f"]))?;
    // THEN: the flow is finished
    assert_eq!(crawler.upcoming_ids(), Vec::<String>::new());
    Ok(())
}

#[test]
fn given_transparent_portal_when_crawled_then_its_children_surface_in_place() -> Result<()> {
    // GIVEN: Scenario B, a is a portal onto c
    let graph = Graph::from_json_str(
        r#"{
            "_root": {"edges": ["a", "b"]},
            "a": {"type": 300, "edges": ["c"]},
            "b": {"edges": ["d"]},
            "c": {"edges": ["d"]},
            "d": {}
        }"#,
    )?;

    // WHEN: upcoming ids are computed with no history
    let crawler = Crawler::new(graph, catalog())?;

    // THEN: c stands in for the portal, ahead of b
    assert_eq!(crawler.upcoming_ids(), ids(&["c", "b"]));
    Ok(())
}

#[test]
fn given_nested_portals_when_crawled_then_all_levels_are_passed_through() -> Result<()> {
    let graph = Graph::from_json_str(
        r#"{
            "_root": {"edges": ["p1", "z"]},
            "p1": {"type": 300, "edges": ["p2", "x"]},
            "p2": {"type": 300, "edges": ["y"]},
            "x": {}, "y": {}, "z": {}
        }"#,
    )?;

    let crawler = Crawler::new(graph, catalog())?;

    assert_eq!(crawler.upcoming_ids(), ids(&["y", "x", "z"]));
    Ok(())
}

#[test]
fn given_recent_answer_when_crawled_then_its_branch_comes_before_root() -> Result<()> {
    // GIVEN: a question whose answer leads to a follow-up, then a notice
    let graph = Graph::from_json_str(
        r#"{
            "_root": {"edges": ["q", "notice"]},
            "q": {"type": 100, "edges": ["yes", "no"]},
            "yes": {"type": 200, "edges": ["follow-up"]},
            "no": {"type": 200},
            "follow-up": {},
            "notice": {}
        }"#,
    )?;
    let mut crawler = Crawler::new(graph, catalog())?;

    // WHEN: yes is chosen
    crawler.record("q", ids(&["yes"]))?;

    // THEN: the follow-up precedes the remaining root nodes
    assert_eq!(crawler.upcoming_ids(), ids(&["follow-up", "notice"]));
    assert_eq!(crawler.current_id().as_deref(), Some("follow-up"));
    Ok(())
}

#[test]
fn given_shared_node_reached_twice_when_crawled_then_listed_once() -> Result<()> {
    let graph = Graph::from_json_str(
        r#"{
            "_root": {"edges": ["q", "s"]},
            "q": {"type": 100, "edges": ["yes"]},
            "yes": {"type": 200, "edges": ["s"]},
            "s": {}
        }"#,
    )?;
    let mut crawler = Crawler::new(graph, catalog())?;

    crawler.record("q", ids(&["yes"]))?;

    assert_eq!(crawler.upcoming_ids(), ids(&["s"]));
    Ok(())
}

#[test]
fn given_no_record_between_calls_when_upcoming_ids_read_twice_then_identical() -> Result<()> {
    let mut crawler = Crawler::new(scenario_a()?, catalog())?;
    crawler.record("a", ids(&["c"]))?;

    let first = crawler.upcoming_ids();
    let second = crawler.upcoming_ids();

    assert_eq!(first, second);
    Ok(())
}

#[test]
fn given_upcoming_ids_when_sorted_depth_first_then_graph_order_used() -> Result<()> {
    let graph = Graph::from_json_str(
        r#"{
            "_root": {"edges": ["q", "notice"]},
            "q": {"type": 100, "edges": ["yes"]},
            "yes": {"type": 200, "edges": ["follow-up"]},
            "follow-up": {},
            "notice": {}
        }"#,
    )?;
    let mut crawler = Crawler::new(graph, catalog())?;
    crawler.record("q", ids(&["yes"]))?;

    assert_eq!(crawler.upcoming_ids_depth_first(), ids(&["follow-up", "notice"]));
    Ok(())
}

#[test]
fn given_predicate_classifier_when_crawled_then_it_drives_traversal() -> Result<()> {
    let classifier = PredicateClassifier::new(|t| t == Some(BRANCH), |t| t == Some(PORTAL));

    let crawler = Crawler::new(scenario_a()?, classifier)?;

    assert_eq!(crawler.upcoming_ids(), ids(&["a"]));
    Ok(())
}

// ============================================================================
// RECORD
// ============================================================================

#[test]
fn given_recorded_id_when_recorded_again_then_fails_with_already_recorded() -> Result<()> {
    let mut crawler = Crawler::new(scenario_a()?, catalog())?;
    crawler.record("a", ids(&["c"]))?;

    let result = crawler.record("a", ids(&["c"]));

    let err = result.err();
    assert!(matches!(err, Some(Error::AlreadyRecorded { .. })));
    assert_eq!(err.map(|e| e.to_string()).as_deref(), Some("already recorded"));
    assert_eq!(crawler.breadcrumbs().len(), 1);
    Ok(())
}

#[test]
fn given_unknown_id_when_recorded_then_fails_with_id_not_found() -> Result<()> {
    let mut crawler = Crawler::new(scenario_a()?, catalog())?;

    let result = crawler.record("nope", vec![]);

    assert!(matches!(result, Err(Error::IdNotFound { .. })));
    assert!(crawler.breadcrumbs().is_empty());
    Ok(())
}

// ============================================================================
// SESSIONS
// ============================================================================

#[test]
fn given_empty_graph_when_crawler_created_then_fails_with_invalid_graph() {
    let result = Crawler::new(Graph::default(), catalog());

    let err = result.err();
    assert!(matches!(err, Some(Error::InvalidGraph { .. })));
    assert_eq!(err.map(|e| e.to_string()).as_deref(), Some("invalid graph"));
}

#[test]
fn given_stored_breadcrumbs_when_session_resumed_then_state_matches_live_session() -> Result<()> {
    // GIVEN: a live session that answered a
    let mut live = Crawler::new(scenario_a()?, catalog())?;
    live.record("a", ids(&["c"]))?;
    let stored = serde_json::to_string(live.breadcrumbs()).map_err(Error::from)?;

    // WHEN: the session is resumed from storage
    let crumbs: Breadcrumbs = serde_json::from_str(&stored).map_err(Error::from)?;
    let resumed = Crawler::with_breadcrumbs(scenario_a()?, catalog(), crumbs)?;

    // THEN: both agree on what comes next
    assert_eq!(resumed.upcoming_ids(), live.upcoming_ids());
    assert_eq!(resumed.into_breadcrumbs(), live.into_breadcrumbs());
    Ok(())
}

#[test]
fn given_breadcrumb_for_deleted_node_when_session_resumed_then_fails() -> Result<()> {
    let crumbs: Breadcrumbs =
        serde_json::from_str(r#"{"gone": ["x"]}"#).map_err(Error::from)?;

    let result = Crawler::with_breadcrumbs(scenario_a()?, catalog(), crumbs);

    assert!(matches!(result, Err(Error::IdNotFound { .. })));
    Ok(())
}
