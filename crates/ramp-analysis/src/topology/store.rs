//! TopologyStore: loads the airfield graph once and hands out shared
//! references.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use std::time::Instant;

use ramp_core::errors::TopologyError;
use ramp_core::tracing::fields;
use tracing::field::Empty;
use tracing::{info, instrument, Span};

use super::graph::TopologyGraph;

pub struct TopologyStore {
    path: PathBuf,
    graph: RwLock<Option<Arc<TopologyGraph>>>,
    load_lock: Mutex<()>,
    loads: AtomicUsize,
}

impl TopologyStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            graph: RwLock::new(None),
            load_lock: Mutex::new(()),
            loads: AtomicUsize::new(0),
        }
    }

    /// A store around an already built graph. `load` never touches disk.
    pub fn from_graph(graph: TopologyGraph) -> Self {
        Self {
            path: PathBuf::new(),
            graph: RwLock::new(Some(Arc::new(graph))),
            load_lock: Mutex::new(()),
            loads: AtomicUsize::new(0),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The graph, parsed on first call and cached afterwards.
    #[instrument(skip_all, fields(load_time_ms = Empty))]
    pub fn load(&self) -> Result<Arc<TopologyGraph>, TopologyError> {
        if let Some(graph) = self.cached() {
            return Ok(graph);
        }

        let _guard = self.load_lock.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(graph) = self.cached() {
            return Ok(graph);
        }

        let start = Instant::now();
        let graph = Arc::new(TopologyGraph::from_path(&self.path)?);
        self.loads.fetch_add(1, Ordering::Relaxed);
        Span::current().record(fields::LOAD_TIME_MS, start.elapsed().as_millis() as u64);
        info!(
            path = %self.path.display(),
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            runways = graph.runway_count(),
            "airfield topology loaded"
        );

        *self.graph.write().unwrap_or_else(PoisonError::into_inner) = Some(Arc::clone(&graph));
        Ok(graph)
    }

    /// Number of times the graph file was parsed.
    pub fn load_count(&self) -> usize {
        self.loads.load(Ordering::Relaxed)
    }

    fn cached(&self) -> Option<Arc<TopologyGraph>> {
        self.graph
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}
