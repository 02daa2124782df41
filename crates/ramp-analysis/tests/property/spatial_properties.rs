use std::collections::BTreeSet;
use std::path::Path;
use std::sync::{Arc, OnceLock};

use proptest::prelude::*;
use ramp_analysis::spatial::SpatialPropagator;
use ramp_analysis::topology::TopologyGraph;
use ramp_core::types::{HazardClass, RiskTier};
use serde_json::{json, Map, Value};

const HAZARDS: &[HazardClass] = &[
    HazardClass::Fuel,
    HazardClass::Hydraulic,
    HazardClass::Oil,
    HazardClass::Debris,
    HazardClass::BirdStrike,
    HazardClass::Unknown,
];

fn airfield() -> Arc<TopologyGraph> {
    static GRAPH: OnceLock<Arc<TopologyGraph>> = OnceLock::new();
    GRAPH
        .get_or_init(|| {
            let path =
                Path::new(env!("CARGO_MANIFEST_DIR")).join("../../config/topology/airfield.json");
            Arc::new(TopologyGraph::from_path(&path).unwrap())
        })
        .clone()
}

fn node_ids(graph: &TopologyGraph) -> Vec<String> {
    let mut ids: Vec<String> = graph.nodes().map(|n| n.id.clone()).collect();
    ids.sort();
    ids
}

/// A graph of `n` nodes cycling through stand/taxiway/runway, with the given
/// edges taken modulo `n`.
fn random_graph(n: usize, edges: &[(usize, usize)]) -> TopologyGraph {
    const KINDS: [&str; 3] = ["stand", "taxiway", "runway"];
    let mut nodes = Map::new();
    for i in 0..n {
        let kind = KINDS[i % 3];
        nodes.insert(format!("{kind}_{i}"), json!({ "type": kind }));
    }
    let id = |i: usize| format!("{}_{}", KINDS[i % 3], i);
    let edges: Vec<Value> = edges
        .iter()
        .map(|(a, b)| json!({ "from": id(a % n), "to": id(b % n) }))
        .collect();
    let doc = json!({ "nodes": nodes, "edges": edges });
    TopologyGraph::from_json_str(&doc.to_string(), "random.json").unwrap()
}

proptest! {
    #[test]
    fn anchor_is_always_isolated(
        node in 0usize..15,
        hazard in 0..HAZARDS.len(),
        tier in proptest::option::of(0..RiskTier::all().len()),
    ) {
        let graph = airfield();
        let anchor = node_ids(&graph)[node].clone();
        let propagator = SpatialPropagator::new(graph);
        let tier = tier.map(|t| RiskTier::all()[t]);
        let zone = propagator.calculate_impact_zone(&anchor, HAZARDS[hazard], tier);
        prop_assert!(zone.is_resolved());
        prop_assert!(zone.isolated_nodes.contains(&anchor));
        prop_assert_eq!(zone.levels[0].clone(), vec![anchor]);
    }

    #[test]
    fn zones_grow_with_risk_tier(node in 0usize..15, hazard in 0..HAZARDS.len()) {
        let graph = airfield();
        let anchor = node_ids(&graph)[node].clone();
        let propagator = SpatialPropagator::new(graph);
        let zones: Vec<BTreeSet<String>> = RiskTier::all()
            .iter()
            .map(|t| {
                propagator
                    .calculate_impact_zone(&anchor, HAZARDS[hazard], Some(*t))
                    .isolated_nodes
            })
            .collect();
        for pair in zones.windows(2) {
            prop_assert!(pair[0].is_subset(&pair[1]), "{:?} not within {:?}", pair[0], pair[1]);
        }
    }

    #[test]
    fn chain_spread_is_a_prefix(hops in 0u32..6) {
        let graph = random_graph(4, &[(0, 1), (1, 2), (2, 3)]);
        let spread = graph.bfs_spread("stand_0", hops);
        let expected: BTreeSet<String> = ["stand_0", "taxiway_1", "runway_2", "stand_3"]
            .iter()
            .take(hops as usize + 1)
            .map(|s| s.to_string())
            .collect();
        prop_assert_eq!(spread, expected);
    }

    #[test]
    fn spread_is_monotone_and_levels_partition_it(
        n in 2usize..12,
        edges in proptest::collection::vec((0usize..12, 0usize..12), 0..24),
        start in 0usize..12,
        hops in 0u32..5,
    ) {
        let graph = random_graph(n, &edges);
        let ids = node_ids(&graph);
        let start = &ids[start % ids.len()];

        let inner = graph.bfs_spread(start, hops);
        let outer = graph.bfs_spread(start, hops + 1);
        prop_assert!(inner.contains(start));
        prop_assert!(inner.is_subset(&outer));

        let levels = graph.bfs_spread_levels(start, hops);
        let flattened: Vec<&String> = levels.iter().flatten().collect();
        let unique: BTreeSet<&String> = flattened.iter().copied().collect();
        prop_assert_eq!(flattened.len(), unique.len());
        prop_assert_eq!(unique.len(), inner.len());
        prop_assert!(levels.len() <= hops as usize + 1);
    }

    #[test]
    fn adjacency_is_symmetric(
        n in 2usize..12,
        edges in proptest::collection::vec((0usize..12, 0usize..12), 0..24),
    ) {
        let graph = random_graph(n, &edges);
        for node in graph.nodes() {
            for neighbor in graph.get_adjacent_nodes(&node.id) {
                prop_assert_ne!(neighbor, node.id.as_str());
                prop_assert!(graph.get_adjacent_nodes(neighbor).contains(&node.id.as_str()));
            }
        }
    }
}
