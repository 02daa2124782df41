//! ConstraintStore: per-scenario constraint cache.
//!
//! Loads are double-checked: a read-locked lookup, then a single load mutex,
//! then a re-check before parsing. Concurrent first callers parse once.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use std::time::Instant;

use ramp_core::errors::ConstraintError;
use ramp_core::tracing::fields;
use ramp_core::types::collections::FxHashMap;
use tracing::field::Empty;
use tracing::{debug, info, instrument, Span};

use super::loader::load_scenario;
use super::types::{FieldSpec, ScenarioConstraints};

pub struct ConstraintStore {
    scenarios_dir: PathBuf,
    cache: RwLock<FxHashMap<String, Arc<ScenarioConstraints>>>,
    load_lock: Mutex<()>,
    loads: AtomicUsize,
}

impl ConstraintStore {
    pub fn new(scenarios_dir: impl Into<PathBuf>) -> Self {
        Self {
            scenarios_dir: scenarios_dir.into(),
            cache: RwLock::new(FxHashMap::default()),
            load_lock: Mutex::new(()),
            loads: AtomicUsize::new(0),
        }
    }

    pub fn scenarios_dir(&self) -> &Path {
        &self.scenarios_dir
    }

    /// Load (or return the cached) constraints for a scenario.
    #[instrument(skip_all, fields(scenario = Empty, load_time_ms = Empty))]
    pub fn load(&self, scenario: &str) -> Result<Arc<ScenarioConstraints>, ConstraintError> {
        let id = normalize_scenario_id(scenario).ok_or_else(|| ConstraintError::ConfigNotFound {
            scenario: scenario.to_string(),
            path: self.scenarios_dir.join(scenario).display().to_string(),
        })?;
        let span = Span::current();
        span.record(fields::SCENARIO, id.as_str());

        if let Some(hit) = self.cached(&id) {
            debug!("constraint cache hit");
            return Ok(hit);
        }

        let _guard = self.load_lock.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(hit) = self.cached(&id) {
            return Ok(hit);
        }

        let start = Instant::now();
        let constraints = Arc::new(load_scenario(&self.scenarios_dir, &id)?);
        self.loads.fetch_add(1, Ordering::Relaxed);
        span.record(fields::LOAD_TIME_MS, start.elapsed().as_millis() as u64);
        info!(
            kind = constraints.kind.id(),
            required = constraints.required_fields.len(),
            mandatory_actions = constraints.mandatory_actions.len(),
            "scenario constraints loaded"
        );

        self.cache
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id, Arc::clone(&constraints));
        Ok(constraints)
    }

    /// The scenario's required fields, in declared order.
    pub fn get_required_fields(&self, scenario: &str) -> Result<Vec<FieldSpec>, ConstraintError> {
        Ok(self.load(scenario)?.required_fields.clone())
    }

    /// Number of scenarios parsed from disk so far.
    pub fn load_count(&self) -> usize {
        self.loads.load(Ordering::Relaxed)
    }

    /// Cached scenario ids, sorted.
    pub fn cached_scenarios(&self) -> Vec<String> {
        let cache = self.cache.read().unwrap_or_else(PoisonError::into_inner);
        let mut ids: Vec<String> = cache.keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Load every scenario directory that holds a checklist. Returns the
    /// loaded ids, sorted. The first broken scenario fails the whole call.
    pub fn preload_all(&self) -> Result<Vec<String>, ConstraintError> {
        let entries = fs::read_dir(&self.scenarios_dir).map_err(|_| {
            ConstraintError::ConfigNotFound {
                scenario: "*".to_string(),
                path: self.scenarios_dir.display().to_string(),
            }
        })?;

        let mut ids: Vec<String> = entries
            .filter_map(Result::ok)
            .filter(|e| e.path().join(ramp_core::constants::CHECKLIST_FILE).is_file())
            .filter_map(|e| e.file_name().to_str().map(str::to_string))
            .collect();
        ids.sort();

        for id in &ids {
            self.load(id)?;
        }
        Ok(ids)
    }

    fn cached(&self, id: &str) -> Option<Arc<ScenarioConstraints>> {
        self.cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id)
            .cloned()
    }
}

/// Trim and lower-case a scenario id. Ids that could escape the scenarios
/// directory are rejected.
pub fn normalize_scenario_id(raw: &str) -> Option<String> {
    let id = raw.trim().to_lowercase();
    if id.is_empty() || id.contains("..") || id.contains('/') || id.contains('\\') {
        return None;
    }
    Some(id)
}
