//! Resolving free-form location text (and coordinates) to topology nodes.

use ramp_core::types::FacilityType;

use super::graph::TopologyGraph;

/// Mean Earth radius in metres.
const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Characters allowed between a facility word and its designator
/// (`stand 501`, `twy-A3`, `跑道：01L`).
fn is_separator(c: char) -> bool {
    c.is_whitespace() || matches!(c, '_' | '-' | '#' | ':' | '：' | '.' | '号')
}

impl TopologyGraph {
    /// Resolve location text to a node id.
    ///
    /// Tried in order: exact id, case-insensitive id, facility word plus
    /// designator (`501机位`, `taxiway A3`, `RWY 01L`), a bare designator, then
    /// any node whose designator appears as a token of the text. Returns
    /// `None` when nothing matches.
    pub fn find_nearest_node(&self, text: &str, filter: Option<FacilityType>) -> Option<String> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        let allowed = |facility: FacilityType| filter.map_or(true, |f| f == facility);

        if let Some(node) = self.get_node(text) {
            if allowed(node.facility) {
                return Some(node.id.clone());
            }
        }

        let lowered = text.to_lowercase();
        if let Some(id) = self.lookup_lower(&lowered, &allowed) {
            return Some(id);
        }

        if let Some(id) = self.resolve_by_word(&lowered, &allowed) {
            return Some(id);
        }

        if lowered.chars().all(|c| c.is_ascii_alphanumeric()) {
            for facility in FacilityType::all() {
                if !allowed(*facility) {
                    continue;
                }
                let candidate = format!("{}_{lowered}", facility.id_prefix());
                if let Some(id) = self.lookup_lower(&candidate, &allowed) {
                    return Some(id);
                }
            }
        }

        self.resolve_by_substring(&lowered, &allowed)
    }

    /// Nearest node by great-circle distance, with the distance in metres.
    /// Nodes without coordinates are ignored.
    pub fn find_nearest_by_coordinates(
        &self,
        lat: f64,
        lon: f64,
        filter: Option<FacilityType>,
    ) -> Option<(String, f64)> {
        let mut best: Option<(&str, f64)> = None;
        for node in self.nodes() {
            if filter.is_some_and(|f| f != node.facility) {
                continue;
            }
            let Some((nlat, nlon)) = node.coordinates() else {
                continue;
            };
            let d = haversine_m(lat, lon, nlat, nlon);
            let closer = match best {
                None => true,
                Some((best_id, best_d)) => d < best_d || (d == best_d && node.id.as_str() < best_id),
            };
            if closer {
                best = Some((node.id.as_str(), d));
            }
        }
        best.map(|(id, d)| (id.to_string(), d))
    }

    fn lookup_lower(&self, lowered: &str, allowed: &impl Fn(FacilityType) -> bool) -> Option<String> {
        let &idx = self.lower_index.get(lowered)?;
        let node = &self.graph[idx];
        allowed(node.facility).then(|| node.id.clone())
    }

    fn resolve_by_word(
        &self,
        lowered: &str,
        allowed: &impl Fn(FacilityType) -> bool,
    ) -> Option<String> {
        // (position in text, facility, designator)
        let mut hits: Vec<(usize, FacilityType, String)> = Vec::new();
        for facility in FacilityType::all() {
            if !allowed(*facility) {
                continue;
            }
            // Longer words come first; a shorter word inside an already
            // matched span (`机位` within `停机位`) is skipped.
            let mut covered: Vec<(usize, usize)> = Vec::new();
            for word in facility.location_words() {
                for (pos, _) in lowered.match_indices(word) {
                    let end = pos + word.len();
                    if covered.iter().any(|&(s, e)| pos < e && s < end) {
                        continue;
                    }
                    covered.push((pos, end));
                    let designator = leading_designator(&lowered[end..])
                        .or_else(|| trailing_designator(&lowered[..pos]));
                    if let Some(designator) = designator {
                        hits.push((pos, *facility, designator));
                    }
                }
            }
        }
        hits.sort_by_key(|(pos, _, _)| *pos);

        hits.into_iter().find_map(|(_, facility, designator)| {
            let candidate = format!("{}_{designator}", facility.id_prefix());
            self.lookup_lower(&candidate, allowed)
        })
    }

    fn resolve_by_substring(
        &self,
        lowered: &str,
        allowed: &impl Fn(FacilityType) -> bool,
    ) -> Option<String> {
        let tokens: Vec<&str> = lowered
            .split(|c: char| !c.is_ascii_alphanumeric() && c != '_')
            .filter(|t| !t.is_empty())
            .collect();
        if tokens.is_empty() {
            return None;
        }

        let mut ids: Vec<&str> = self.node_index.keys().map(String::as_str).collect();
        ids.sort_unstable();

        let mut best: Option<(&str, usize)> = None;
        for id in ids {
            let Some(node) = self.get_node(id) else {
                continue;
            };
            if !allowed(node.facility) {
                continue;
            }
            let lower_id = id.to_lowercase();
            let suffix = node.suffix().to_lowercase();
            let score = if tokens.iter().any(|t| *t == lower_id) {
                usize::MAX
            } else if tokens.iter().any(|t| *t == suffix) {
                suffix.len()
            } else {
                continue;
            };
            if best.map_or(true, |(_, s)| score > s) {
                best = Some((id, score));
            }
        }
        best.map(|(id, _)| id.to_string())
    }
}

/// First ASCII-alphanumeric run at the start of `text`, after separators.
fn leading_designator(text: &str) -> Option<String> {
    let rest = text.trim_start_matches(is_separator);
    let run: String = rest.chars().take_while(|c| c.is_ascii_alphanumeric()).collect();
    (!run.is_empty()).then_some(run)
}

/// Last ASCII-alphanumeric run at the end of `text`, before separators.
fn trailing_designator(text: &str) -> Option<String> {
    let rest = text.trim_end_matches(is_separator);
    let mut run: Vec<char> = rest
        .chars()
        .rev()
        .take_while(|c| c.is_ascii_alphanumeric())
        .collect();
    run.reverse();
    (!run.is_empty()).then(|| run.into_iter().collect())
}

/// Great-circle distance in metres.
pub fn haversine_m(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let (p1, p2) = (lat1.to_radians(), lat2.to_radians());
    let dp = (lat2 - lat1).to_radians();
    let dl = (lon2 - lon1).to_radians();
    let a = (dp / 2.0).sin().powi(2) + p1.cos() * p2.cos() * (dl / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_M * a.sqrt().asin()
}
