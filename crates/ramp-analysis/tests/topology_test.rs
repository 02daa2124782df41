//! Airfield topology tests: loading, adjacency, location resolution, BFS.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use ramp_analysis::topology::{TopologyGraph, TopologyStore};
use ramp_core::errors::{RampErrorCode, TopologyError};
use ramp_core::types::FacilityType;

fn graph_path() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../config/topology/airfield.json")
}

fn airfield() -> TopologyGraph {
    TopologyGraph::from_path(&graph_path()).unwrap()
}

#[test]
fn test_shipped_graph_counts() {
    let g = airfield();
    assert_eq!(g.node_count(), 15);
    assert_eq!(g.edge_count(), 14);
    assert_eq!(g.runway_count(), 2);
    assert_eq!(g.get_nodes_by_type(FacilityType::Stand).len(), 8);
    assert_eq!(
        g.get_nodes_by_type(FacilityType::Runway),
        ["runway_01L", "runway_01R"]
    );
}

#[test]
fn test_node_metadata_and_coordinates() {
    let g = airfield();
    let node = g.get_node("stand_501").unwrap();
    assert_eq!(node.facility, FacilityType::Stand);
    assert_eq!(node.coordinates(), Some((30.2291, 120.4321)));
    assert_eq!(node.metadata.get("apron").and_then(|v| v.as_str()), Some("west"));
    assert_eq!(node.suffix(), "501");
    assert!(g.get_node("stand_999").is_none());
    assert!(!g.contains("stand_999"));
}

#[test]
fn test_adjacency_is_sorted_and_symmetric() {
    let g = airfield();
    assert_eq!(
        g.get_adjacent_nodes("taxiway_A1"),
        ["stand_501", "stand_502", "taxiway_A2", "taxiway_B2"]
    );
    for node in g.nodes() {
        for neighbor in g.get_adjacent_nodes(&node.id) {
            assert!(
                g.get_adjacent_nodes(neighbor).contains(&node.id.as_str()),
                "{} -> {neighbor} not symmetric",
                node.id
            );
        }
    }
    assert!(g.get_adjacent_nodes("nowhere").is_empty());
}

#[test]
fn test_adjacent_edges_carry_distance() {
    let g = airfield();
    let edges = g.get_adjacent_edges("runway_01L");
    assert_eq!(edges.len(), 1);
    assert_eq!(edges[0].0.id, "taxiway_B1");
    assert_eq!(edges[0].1.distance, 300.0);
    assert_eq!(edges[0].1.usage_count, 95);
}

#[test]
fn test_resolve_location_text() {
    let g = airfield();
    let cases = [
        ("stand_501", "stand_501"),
        ("STAND_501", "stand_501"),
        ("501机位", "stand_501"),
        ("停机位501", "stand_501"),
        ("gate 502", "stand_502"),
        ("taxiway A3", "taxiway_A3"),
        ("滑行道A3", "taxiway_A3"),
        ("RWY 01L", "runway_01L"),
        ("501", "stand_501"),
        ("A3", "taxiway_A3"),
        ("near stand_602 apron", "stand_602"),
        ("taxiway A3 near stand 501", "taxiway_A3"),
        ("gate area, gate 502", "stand_502"),
        ("gate area, gate 502 by taxiway A3", "stand_502"),
        ("stand apron, 停机位 602", "stand_602"),
    ];
    for (text, expected) in cases {
        assert_eq!(
            g.find_nearest_node(text, None).as_deref(),
            Some(expected),
            "resolving {text:?}"
        );
    }
}

#[test]
fn test_resolve_misses_and_filters() {
    let g = airfield();
    assert_eq!(g.find_nearest_node("gate 999", None), None);
    assert_eq!(g.find_nearest_node("   ", None), None);
    assert_eq!(g.find_nearest_node("somewhere on the apron", None), None);
    assert_eq!(g.find_nearest_node("A3", Some(FacilityType::Runway)), None);
    assert_eq!(
        g.find_nearest_node("A3", Some(FacilityType::Taxiway)).as_deref(),
        Some("taxiway_A3")
    );
}

#[test]
fn test_resolve_by_coordinates() {
    let g = airfield();
    let (id, d) = g.find_nearest_by_coordinates(30.2291, 120.4321, None).unwrap();
    assert_eq!(id, "stand_501");
    assert!(d < 1.0);

    let (id, _) = g
        .find_nearest_by_coordinates(30.2291, 120.4321, Some(FacilityType::Runway))
        .unwrap();
    assert_eq!(id, "runway_01R");
}

#[test]
fn test_bfs_spread_levels() {
    let g = airfield();
    let levels = g.bfs_spread_levels("stand_501", 2);
    assert_eq!(
        levels,
        vec![
            vec!["stand_501".to_string()],
            vec!["taxiway_A1".to_string()],
            vec![
                "stand_502".to_string(),
                "taxiway_A2".to_string(),
                "taxiway_B2".to_string()
            ],
        ]
    );

    let spread = g.bfs_spread("stand_501", 0);
    assert_eq!(spread.into_iter().collect::<Vec<_>>(), ["stand_501"]);
    assert!(g.bfs_spread("nowhere", 3).is_empty());
    assert!(g.bfs_spread_levels("nowhere", 3).is_empty());
}

#[test]
fn test_bfs_spread_covers_graph_at_large_radius() {
    let g = airfield();
    assert_eq!(g.bfs_spread("stand_501", 50).len(), g.node_count());
}

#[test]
fn test_invalid_documents() {
    let unknown_type = r#"{"nodes": {"x": {"type": "hangar"}}, "edges": []}"#;
    let unknown_endpoint =
        r#"{"nodes": {"stand_1": {"type": "stand"}}, "edges": [{"from": "stand_1", "to": "taxiway_Z"}]}"#;
    let negative = r#"{"nodes": {"stand_1": {"type": "stand"}, "taxiway_A": {"type": "taxiway"}},
        "edges": [{"from": "stand_1", "to": "taxiway_A", "distance": -5}]}"#;

    for text in [unknown_type, unknown_endpoint, negative, "not json"] {
        let err = TopologyGraph::from_json_str(text, "inline.json").unwrap_err();
        assert!(matches!(err, TopologyError::GraphInvalid { .. }), "{err}");
        assert_eq!(err.error_code(), "GRAPH_INVALID");
    }
}

#[test]
fn test_self_loops_and_duplicates_are_skipped() {
    let text = r#"{
        "nodes": {"stand_1": {"type": "stand"}, "taxiway_A": {"type": "taxiway"}},
        "edges": [
            {"from": "stand_1", "to": "taxiway_A"},
            {"from": "taxiway_A", "to": "stand_1"},
            {"from": "stand_1", "to": "stand_1"}
        ]
    }"#;
    let g = TopologyGraph::from_json_str(text, "inline.json").unwrap();
    assert_eq!(g.edge_count(), 1);
    assert_eq!(g.get_adjacent_nodes("stand_1"), ["taxiway_A"]);
}

#[test]
fn test_store_loads_once() {
    let store = TopologyStore::new(graph_path());
    let a = store.load().unwrap();
    let b = store.load().unwrap();
    assert!(Arc::ptr_eq(&a, &b));
    assert_eq!(store.load_count(), 1);
}

#[test]
fn test_store_missing_and_invalid_files() {
    let dir = tempfile::TempDir::new().unwrap();

    let missing = TopologyStore::new(dir.path().join("absent.json"));
    let err = missing.load().unwrap_err();
    assert!(matches!(err, TopologyError::GraphNotFound { .. }));
    assert_eq!(err.error_code(), "GRAPH_NOT_FOUND");

    let path = dir.path().join("broken.json");
    std::fs::write(&path, "{\"nodes\": [").unwrap();
    let broken = TopologyStore::new(&path);
    assert!(matches!(broken.load(), Err(TopologyError::GraphInvalid { .. })));
    assert_eq!(broken.load_count(), 0);
}

#[test]
fn test_store_from_graph_never_reads_disk() {
    let store = TopologyStore::from_graph(airfield());
    assert_eq!(store.load().unwrap().node_count(), 15);
    assert_eq!(store.load_count(), 0);
}
