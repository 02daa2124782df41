//! Airfield topology: stands, taxiways, and runways as an undirected graph.

pub mod graph;
pub mod resolve;
pub mod store;
pub mod traversal;
pub mod types;

pub use graph::TopologyGraph;
pub use resolve::haversine_m;
pub use store::TopologyStore;
pub use types::{GraphDocument, TopologyEdge, TopologyNode};
