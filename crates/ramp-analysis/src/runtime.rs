//! RampRuntime: process-wide singleton via `OnceLock`, lock-free after
//! initialization.
//!
//! The runtime owns the configuration, the constraint store, and the loaded
//! airfield graph. It is initialized once at startup with `initialize()` and
//! read with `get()`. Tests build private instances with `RampRuntime::new`.

use std::path::PathBuf;
use std::sync::{Arc, OnceLock};

use ramp_core::config::RampConfig;
use ramp_core::errors::{ConstraintError, InitError};
use ramp_core::types::{HazardClass, IncidentSnapshot, RiskLevel};
use serde::Serialize;
use tracing::info;

use crate::compliance::{self, Assessment, EngineRecord};
use crate::constraints::ConstraintStore;
use crate::spatial::{ImpactZone, PositionImpact, PositionImpactAnalyzer, SpatialPropagator};
use crate::topology::{TopologyGraph, TopologyStore};

static RUNTIME: OnceLock<Arc<RampRuntime>> = OnceLock::new();

/// Options for building the runtime.
#[derive(Debug, Default, Clone)]
pub struct RuntimeOptions {
    /// Project root holding `ramp.toml`. Relative config paths resolve here.
    pub project_root: Option<PathBuf>,
    /// TOML configuration string. Takes precedence over `ramp.toml`.
    pub config_toml: Option<String>,
    /// Overrides the configured scenarios directory.
    pub scenarios_dir: Option<PathBuf>,
    /// Overrides the configured topology graph path.
    pub graph_path: Option<PathBuf>,
    /// Overrides `constraints.preload`.
    pub preload: Option<bool>,
}

pub struct RampRuntime {
    pub config: RampConfig,
    pub constraints: ConstraintStore,
    pub topology: TopologyStore,
    pub graph: Arc<TopologyGraph>,
    pub propagator: SpatialPropagator,
    pub analyzer: PositionImpactAnalyzer,
}

/// Both spatial results for one position.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImpactReport {
    pub zone: ImpactZone,
    pub position: PositionImpact,
}

impl RampRuntime {
    /// Build a runtime: resolve config, open the constraint store (optionally
    /// preloading every scenario), and load the airfield graph.
    pub fn new(opts: RuntimeOptions) -> Result<Self, InitError> {
        // `RampConfig::load` already resolves paths against the root; a TOML
        // string does not, so its relative paths are joined here.
        let (config, base) = match (&opts.config_toml, &opts.project_root) {
            (Some(toml_str), root) => (RampConfig::from_toml(toml_str)?, root.clone()),
            (None, Some(root)) => (RampConfig::load(root)?, None),
            (None, None) => (RampConfig::default(), None),
        };
        let resolve = |path: PathBuf| match &base {
            Some(root) if path.is_relative() => root.join(path),
            _ => path,
        };

        let scenarios_dir = opts
            .scenarios_dir
            .clone()
            .unwrap_or_else(|| resolve(config.constraints.effective_scenarios_dir()));
        let graph_path = opts
            .graph_path
            .clone()
            .unwrap_or_else(|| resolve(config.topology.effective_graph_path()));

        let constraints = ConstraintStore::new(scenarios_dir);
        if opts.preload.unwrap_or_else(|| config.constraints.effective_preload()) {
            let loaded = constraints.preload_all()?;
            info!(scenarios = ?loaded, "scenario constraints preloaded");
        }

        let topology = TopologyStore::new(graph_path);
        let graph = topology.load()?;

        Ok(Self {
            propagator: SpatialPropagator::new(Arc::clone(&graph)),
            analyzer: PositionImpactAnalyzer::new(Arc::clone(&graph)),
            graph,
            config,
            constraints,
            topology,
        })
    }

    /// Initialize the global runtime. Fails if already initialized.
    pub fn initialize(opts: RuntimeOptions) -> Result<Arc<RampRuntime>, InitError> {
        let runtime = Arc::new(Self::new(opts)?);
        RUNTIME
            .set(Arc::clone(&runtime))
            .map_err(|_| InitError::AlreadyInitialized)?;
        info!("ramp runtime initialized");
        Ok(runtime)
    }

    /// The global runtime, if `initialize` has run.
    pub fn get() -> Option<Arc<RampRuntime>> {
        RUNTIME.get().cloned()
    }

    /// Validate and step the snapshot's incident. The returned record belongs
    /// back on the snapshot for the next call.
    pub fn assess(&self, snapshot: &IncidentSnapshot) -> Result<Assessment, ConstraintError> {
        let scenario = snapshot.scenario_type.as_deref().unwrap_or_default();
        let constraints = self.constraints.load(scenario)?;
        Ok(compliance::assess(
            &constraints,
            EngineRecord::from_snapshot(snapshot),
            snapshot,
            &self.config.compliance,
        ))
    }

    /// Isolation zone plus position impact for one location.
    pub fn impact(
        &self,
        anchor_text: &str,
        hazard: HazardClass,
        risk: Option<RiskLevel>,
    ) -> ImpactReport {
        let zone = self
            .propagator
            .calculate_impact_zone(anchor_text, hazard, risk.map(|r| r.tier()));
        let position = self.analyzer.analyze_zone(&zone, hazard, risk);
        ImpactReport { zone, position }
    }

    /// Impact for the snapshot's own location, hazard, and risk. `None` when
    /// the snapshot has no location yet.
    pub fn impact_for(
        &self,
        snapshot: &IncidentSnapshot,
    ) -> Result<Option<ImpactReport>, ConstraintError> {
        let scenario = snapshot.scenario_type.as_deref().unwrap_or_default();
        let constraints = self.constraints.load(scenario)?;
        let Some(location) = constraints.location_for(snapshot) else {
            return Ok(None);
        };
        let hazard = constraints.hazard_for(snapshot);
        let risk = snapshot
            .risk_assessment
            .as_ref()
            .and_then(|ra| ra.resolve_level(&self.config.compliance));
        Ok(Some(self.impact(&location, hazard, risk)))
    }
}
