//! Level-by-level breadth-first spread over the airfield graph.

use std::collections::{BTreeSet, VecDeque};

use petgraph::graph::NodeIndex;
use ramp_core::types::collections::FxHashSet;

use super::graph::TopologyGraph;

impl TopologyGraph {
    /// Every node within `max_hops` of `start`, including `start`.
    /// Unknown starts yield an empty set.
    pub fn bfs_spread(&self, start: &str, max_hops: u32) -> BTreeSet<String> {
        self.bfs_spread_levels(start, max_hops)
            .into_iter()
            .flatten()
            .collect()
    }

    /// Same walk as [`bfs_spread`](Self::bfs_spread), partitioned by hop
    /// distance: `levels[0] == [start]`, `levels[k]` holds the nodes first
    /// reached at hop `k`, each level sorted.
    pub fn bfs_spread_levels(&self, start: &str, max_hops: u32) -> Vec<Vec<String>> {
        let Some(start_idx) = self.index_of(start) else {
            return Vec::new();
        };

        let mut visited: FxHashSet<NodeIndex> = FxHashSet::default();
        let mut queue = VecDeque::new();
        let mut levels: Vec<Vec<String>> = vec![Vec::new()];

        visited.insert(start_idx);
        queue.push_back((start_idx, 0u32));

        while let Some((node, depth)) = queue.pop_front() {
            let depth_slot = depth as usize;
            if levels.len() <= depth_slot {
                levels.push(Vec::new());
            }
            levels[depth_slot].push(self.graph[node].id.clone());

            if depth == max_hops {
                continue;
            }
            for next in self.graph.neighbors(node) {
                if visited.insert(next) {
                    queue.push_back((next, depth + 1));
                }
            }
        }

        for level in &mut levels {
            level.sort();
        }
        levels
    }
}
