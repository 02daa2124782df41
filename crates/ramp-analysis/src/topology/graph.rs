//! TopologyGraph: petgraph undirected graph with id and per-type indices.

use std::path::Path;

use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;
use ramp_core::errors::TopologyError;
use ramp_core::types::collections::FxHashMap;
use ramp_core::types::FacilityType;
use tracing::warn;

use super::types::{GraphDocument, TopologyEdge, TopologyNode};

/// The airfield graph. Immutable once built; share it behind an `Arc`.
#[derive(Debug)]
pub struct TopologyGraph {
    pub(crate) graph: UnGraph<TopologyNode, TopologyEdge>,
    pub(crate) node_index: FxHashMap<String, NodeIndex>,
    /// Lower-cased id → index, for case-insensitive lookups.
    pub(crate) lower_index: FxHashMap<String, NodeIndex>,
    /// Facility type → node ids, sorted.
    type_index: FxHashMap<FacilityType, Vec<String>>,
}

impl TopologyGraph {
    /// Parse a graph document from JSON text. `source` names the file in
    /// errors.
    pub fn from_json_str(text: &str, source: &str) -> Result<Self, TopologyError> {
        let doc: GraphDocument =
            serde_json::from_str(text).map_err(|e| TopologyError::GraphInvalid {
                path: source.to_string(),
                message: e.to_string(),
            })?;
        Self::from_document(doc, source)
    }

    /// Read and parse a graph file.
    pub fn from_path(path: &Path) -> Result<Self, TopologyError> {
        let source = path.display().to_string();
        let text = std::fs::read_to_string(path)
            .map_err(|_| TopologyError::GraphNotFound { path: source.clone() })?;
        Self::from_json_str(&text, &source)
    }

    pub fn from_document(doc: GraphDocument, source: &str) -> Result<Self, TopologyError> {
        let invalid = |message: String| TopologyError::GraphInvalid {
            path: source.to_string(),
            message,
        };

        let mut graph = UnGraph::with_capacity(doc.nodes.len(), doc.edges.len());
        let mut node_index = FxHashMap::default();
        let mut lower_index = FxHashMap::default();
        let mut type_index: FxHashMap<FacilityType, Vec<String>> = FxHashMap::default();

        for (id, raw) in doc.nodes {
            if id.trim().is_empty() {
                return Err(invalid("node with empty id".to_string()));
            }
            let facility = FacilityType::parse(&raw.kind)
                .ok_or_else(|| invalid(format!("node '{id}' has unknown type '{}'", raw.kind)))?;
            let idx = graph.add_node(TopologyNode {
                id: id.clone(),
                facility,
                lat: raw.lat,
                lon: raw.lon,
                metadata: raw.metadata,
            });
            if lower_index.insert(id.to_lowercase(), idx).is_some() {
                warn!(node = %id, "node id collides case-insensitively; keeping the later one");
            }
            type_index.entry(facility).or_default().push(id.clone());
            node_index.insert(id, idx);
        }

        for edge in doc.edges {
            let from = *node_index
                .get(&edge.from)
                .ok_or_else(|| invalid(format!("edge references unknown node '{}'", edge.from)))?;
            let to = *node_index
                .get(&edge.to)
                .ok_or_else(|| invalid(format!("edge references unknown node '{}'", edge.to)))?;
            if from == to {
                warn!(node = %edge.from, "skipping self-loop edge");
                continue;
            }
            if graph.find_edge(from, to).is_some() {
                warn!(from = %edge.from, to = %edge.to, "skipping duplicate edge");
                continue;
            }
            let distance = edge.distance.unwrap_or(0.0);
            if !distance.is_finite() || distance < 0.0 {
                return Err(invalid(format!(
                    "edge {} - {} has invalid distance {distance}",
                    edge.from, edge.to
                )));
            }
            graph.add_edge(
                from,
                to,
                TopologyEdge {
                    distance,
                    usage_count: edge.usage_count.unwrap_or(0),
                },
            );
        }

        for ids in type_index.values_mut() {
            ids.sort();
        }

        Ok(Self {
            graph,
            node_index,
            lower_index,
            type_index,
        })
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.node_index.contains_key(id)
    }

    pub fn get_node(&self, id: &str) -> Option<&TopologyNode> {
        self.node_index.get(id).map(|&idx| &self.graph[idx])
    }

    /// Neighbor ids, sorted. Empty for unknown nodes.
    pub fn get_adjacent_nodes(&self, id: &str) -> Vec<&str> {
        let Some(&idx) = self.node_index.get(id) else {
            return Vec::new();
        };
        let mut out: Vec<&str> = self
            .graph
            .neighbors(idx)
            .map(|n| self.graph[n].id.as_str())
            .collect();
        out.sort_unstable();
        out
    }

    /// Neighbors with the connecting edge.
    pub fn get_adjacent_edges(&self, id: &str) -> Vec<(&TopologyNode, &TopologyEdge)> {
        let Some(&idx) = self.node_index.get(id) else {
            return Vec::new();
        };
        self.graph
            .edges(idx)
            .map(|e| {
                let other = if e.source() == idx { e.target() } else { e.source() };
                (&self.graph[other], e.weight())
            })
            .collect()
    }

    /// Node ids of one facility type, sorted.
    pub fn get_nodes_by_type(&self, facility: FacilityType) -> &[String] {
        self.type_index
            .get(&facility)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn runway_count(&self) -> usize {
        self.get_nodes_by_type(FacilityType::Runway).len()
    }

    /// Every node, in insertion (id-sorted) order.
    pub fn nodes(&self) -> impl Iterator<Item = &TopologyNode> {
        self.graph.node_weights()
    }

    pub(crate) fn index_of(&self, id: &str) -> Option<NodeIndex> {
        self.node_index.get(id).copied()
    }
}
