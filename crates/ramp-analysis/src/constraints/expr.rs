//! Condition expressions over incident facts.
//!
//! Conditions are parsed once when a scenario loads and evaluated many times
//! afterwards, so paths are pre-split and literals pre-normalized.
//!
//! Grammar (no parentheses; `||` binds looser than `&&`):
//!
//! ```text
//! expr     := and ( "||" and )*
//! and      := unary ( "&&" unary )*
//! unary    := "!" unary | atom
//! atom     := "core_facts_present" | "required_facts_present" | "risk_assessed"
//!           | "fire_notified" | "risk_at_least(" level ")"
//!           | path "==" literal | path "!=" literal
//!           | path "in" "[" literal ( "," literal )* "]"
//!           | path
//! ```

use std::fmt;

use ramp_core::config::ComplianceConfig;
use ramp_core::types::collections::SmallVec4;
use ramp_core::types::snapshot::SNAPSHOT_ROOTS;
use ramp_core::types::{is_truthy, IncidentSnapshot, RiskLevel};
use serde::Serialize;
use serde_json::Value;

use super::types::ScenarioConstraints;

/// A dotted path into the snapshot, split at parse time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FactPath {
    segments: SmallVec4<String>,
}

impl FactPath {
    /// Parse `a.b.c`. A first segment that is not a snapshot root is read
    /// from `incident`.
    pub fn parse(text: &str) -> Result<Self, String> {
        let text = text.trim();
        if text.is_empty() {
            return Err("empty fact path".to_string());
        }
        let mut segments = SmallVec4::new();
        for segment in text.split('.') {
            let valid = !segment.is_empty()
                && segment
                    .chars()
                    .all(|c| c.is_alphanumeric() || c == '_' || c == '-');
            if !valid {
                return Err(format!("invalid path segment '{segment}' in '{text}'"));
            }
            segments.push(segment.to_string());
        }
        if !SNAPSHOT_ROOTS.contains(&segments[0].as_str()) {
            segments.insert(0, "incident".to_string());
        }
        Ok(Self { segments })
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn resolve(&self, snapshot: &IncidentSnapshot) -> Option<Value> {
        snapshot.lookup(self.segments.as_slice())
    }
}

impl fmt::Display for FactPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("."))
    }
}

/// A literal operand, compared case-insensitively.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Literal {
    text: String,
    #[serde(skip)]
    number: Option<f64>,
}

impl Literal {
    fn parse(raw: &str) -> Result<Self, String> {
        let trimmed = raw.trim();
        let unquoted = trimmed
            .strip_prefix('"')
            .and_then(|s| s.strip_suffix('"'))
            .or_else(|| trimmed.strip_prefix('\'').and_then(|s| s.strip_suffix('\'')))
            .unwrap_or(trimmed);
        if unquoted.is_empty() {
            return Err(format!("empty literal in '{raw}'"));
        }
        Ok(Self {
            text: unquoted.to_lowercase(),
            number: unquoted.parse::<f64>().ok(),
        })
    }

    fn matches(&self, value: &Value) -> bool {
        match value {
            Value::String(s) => s.trim().to_lowercase() == self.text,
            Value::Number(n) => match (self.number, n.as_f64()) {
                (Some(a), Some(b)) => (a - b).abs() < f64::EPSILON,
                _ => false,
            },
            Value::Bool(b) => (if *b { "true" } else { "false" }) == self.text,
            _ => false,
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Closed expression tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Condition {
    Exists { path: FactPath },
    Equals { path: FactPath, value: Literal },
    NotEquals { path: FactPath, value: Literal },
    OneOf { path: FactPath, values: SmallVec4<Literal> },
    Not { inner: Box<Condition> },
    All { terms: Vec<Condition> },
    Any { terms: Vec<Condition> },
    /// Both core facts (hazard type and location) are present.
    CoreFactsPresent,
    /// Every required field of the scenario is present.
    RequiredFactsPresent,
    /// The snapshot carries a usable risk assessment.
    RiskAssessed,
    /// The resolved risk level (label or score) is at least `level`.
    RiskAtLeast { level: RiskLevel },
    /// The configured fire notification action is done or the incident
    /// says the fire department was notified.
    FireNotified,
}

impl Condition {
    pub fn parse(source: &str) -> Result<Self, String> {
        let source = source.trim();
        if source.is_empty() {
            return Err("empty condition".to_string());
        }
        let mut any: Vec<Condition> = Vec::new();
        for disjunct in source.split("||") {
            let mut all: Vec<Condition> = Vec::new();
            for term in disjunct.split("&&") {
                all.push(Self::parse_unary(term)?);
            }
            any.push(if all.len() == 1 {
                all.remove(0)
            } else {
                Condition::All { terms: all }
            });
        }
        Ok(if any.len() == 1 {
            any.remove(0)
        } else {
            Condition::Any { terms: any }
        })
    }

    fn parse_unary(term: &str) -> Result<Self, String> {
        let term = term.trim();
        if let Some(rest) = term.strip_prefix('!') {
            if !rest.starts_with('=') {
                return Ok(Condition::Not {
                    inner: Box::new(Self::parse_unary(rest)?),
                });
            }
        }
        Self::parse_atom(term)
    }

    fn parse_atom(term: &str) -> Result<Self, String> {
        match term {
            "core_facts_present" => return Ok(Condition::CoreFactsPresent),
            "required_facts_present" => return Ok(Condition::RequiredFactsPresent),
            "risk_assessed" => return Ok(Condition::RiskAssessed),
            "fire_notified" => return Ok(Condition::FireNotified),
            "" => return Err("empty term".to_string()),
            _ => {}
        }

        if let Some(arg) = term
            .strip_prefix("risk_at_least(")
            .and_then(|rest| rest.strip_suffix(')'))
        {
            let level = RiskLevel::parse(arg)
                .ok_or_else(|| format!("unknown risk level '{}' in '{term}'", arg.trim()))?;
            return Ok(Condition::RiskAtLeast { level });
        }

        if let Some((lhs, rhs)) = term.split_once("!=") {
            return Ok(Condition::NotEquals {
                path: FactPath::parse(lhs)?,
                value: Literal::parse(rhs)?,
            });
        }
        if let Some((lhs, rhs)) = term.split_once("==") {
            return Ok(Condition::Equals {
                path: FactPath::parse(lhs)?,
                value: Literal::parse(rhs)?,
            });
        }
        if let Some((lhs, rhs)) = term.split_once(" in ") {
            let list = rhs
                .trim()
                .strip_prefix('[')
                .and_then(|s| s.strip_suffix(']'))
                .ok_or_else(|| format!("expected [..] list in '{term}'"))?;
            let values = list
                .split(',')
                .map(Literal::parse)
                .collect::<Result<SmallVec4<_>, _>>()?;
            return Ok(Condition::OneOf {
                path: FactPath::parse(lhs)?,
                values,
            });
        }
        Ok(Condition::Exists {
            path: FactPath::parse(term)?,
        })
    }

    /// Evaluate against a snapshot. Missing facts make comparisons false;
    /// evaluation never fails.
    pub fn evaluate(
        &self,
        snapshot: &IncidentSnapshot,
        constraints: &ScenarioConstraints,
        config: &ComplianceConfig,
    ) -> bool {
        match self {
            Condition::Exists { path } => path.resolve(snapshot).is_some_and(|v| is_truthy(&v)),
            Condition::Equals { path, value } => {
                path.resolve(snapshot).is_some_and(|v| value.matches(&v))
            }
            Condition::NotEquals { path, value } => {
                !path.resolve(snapshot).is_some_and(|v| value.matches(&v))
            }
            Condition::OneOf { path, values } => path
                .resolve(snapshot)
                .is_some_and(|v| values.iter().any(|lit| lit.matches(&v))),
            Condition::Not { inner } => !inner.evaluate(snapshot, constraints, config),
            Condition::All { terms } => terms
                .iter()
                .all(|t| t.evaluate(snapshot, constraints, config)),
            Condition::Any { terms } => terms
                .iter()
                .any(|t| t.evaluate(snapshot, constraints, config)),
            Condition::CoreFactsPresent => constraints.core_facts_present(snapshot),
            Condition::RequiredFactsPresent => constraints.all_required_present(snapshot),
            Condition::RiskAssessed => snapshot.is_risk_assessed(),
            Condition::RiskAtLeast { level } => {
                snapshot.risk_level(config).is_some_and(|l| l >= *level)
            }
            Condition::FireNotified => snapshot.fire_notified(config),
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Condition::Exists { path } => write!(f, "{path}"),
            Condition::Equals { path, value } => write!(f, "{path} == {value}"),
            Condition::NotEquals { path, value } => write!(f, "{path} != {value}"),
            Condition::OneOf { path, values } => {
                let list: Vec<String> = values.iter().map(|v| v.to_string()).collect();
                write!(f, "{path} in [{}]", list.join(", "))
            }
            Condition::Not { inner } => write!(f, "!{inner}"),
            Condition::All { terms } => {
                let parts: Vec<String> = terms.iter().map(|t| t.to_string()).collect();
                f.write_str(&parts.join(" && "))
            }
            Condition::Any { terms } => {
                let parts: Vec<String> = terms.iter().map(|t| t.to_string()).collect();
                f.write_str(&parts.join(" || "))
            }
            Condition::CoreFactsPresent => f.write_str("core_facts_present"),
            Condition::RequiredFactsPresent => f.write_str("required_facts_present"),
            Condition::RiskAssessed => f.write_str("risk_assessed"),
            Condition::RiskAtLeast { level } => write!(f, "risk_at_least({level})"),
            Condition::FireNotified => f.write_str("fire_notified"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ramp_core::types::RiskAssessment;

    #[test]
    fn bare_paths_are_rooted_at_incident() {
        let path = FactPath::parse("fluid_type").unwrap();
        assert_eq!(path.segments(), ["incident", "fluid_type"]);
        let rooted = FactPath::parse("risk_assessment.level").unwrap();
        assert_eq!(rooted.segments(), ["risk_assessment", "level"]);
    }

    #[test]
    fn precedence_or_looser_than_and() {
        let c = Condition::parse("a && b || c").unwrap();
        match c {
            Condition::Any { terms } => {
                assert_eq!(terms.len(), 2);
                assert!(matches!(terms[0], Condition::All { .. }));
                assert!(matches!(terms[1], Condition::Exists { .. }));
            }
            other => panic!("expected Any, got {other:?}"),
        }
    }

    #[test]
    fn parses_comparisons_and_lists() {
        assert!(matches!(
            Condition::parse("fluid_type == 'FUEL'").unwrap(),
            Condition::Equals { .. }
        ));
        assert!(matches!(
            Condition::parse("fluid_type != OIL").unwrap(),
            Condition::NotEquals { .. }
        ));
        match Condition::parse("risk_assessment.level in [HIGH, CRITICAL]").unwrap() {
            Condition::OneOf { values, .. } => assert_eq!(values.len(), 2),
            other => panic!("expected OneOf, got {other:?}"),
        }
        assert!(matches!(
            Condition::parse("!mandatory_actions_done.notify_fire_dept").unwrap(),
            Condition::Not { .. }
        ));
    }

    #[test]
    fn rejects_malformed() {
        assert!(Condition::parse("").is_err());
        assert!(Condition::parse("a && ").is_err());
        assert!(Condition::parse("x in HIGH").is_err());
        assert!(Condition::parse("bad path == 1").is_err());
        assert!(Condition::parse("a..b").is_err());
    }

    #[test]
    fn risk_at_least_uses_resolved_level() {
        let c = Condition::parse("risk_at_least(HIGH)").unwrap();
        assert_eq!(c, Condition::RiskAtLeast { level: RiskLevel::High });
        assert!(Condition::parse("risk_at_least(R9)").is_err());
        assert!(Condition::parse("risk_at_least(HIGH").is_err());

        let constraints = crate::constraints::build_constraints(
            "oil_spill",
            "required_fields:\n  - key: fluid_type\n  - key: position\n",
            None,
        )
        .unwrap();
        let config = ComplianceConfig::default();
        let with = |level: Option<&str>, score: Option<f64>| {
            let mut snap = IncidentSnapshot::new("oil_spill");
            snap.risk_assessment = Some(RiskAssessment {
                level: level.map(str::to_string),
                score,
            });
            c.evaluate(&snap, &constraints, &config)
        };
        assert!(with(Some("R4"), None));
        assert!(with(Some("高"), None));
        assert!(with(None, Some(95.0)));
        assert!(with(Some("unreadable"), Some(70.0)));
        assert!(!with(Some("R2"), Some(95.0)));
        assert!(!with(None, Some(10.0)));
        assert!(!c.evaluate(&IncidentSnapshot::new("oil_spill"), &constraints, &config));
    }

    #[test]
    fn fire_notified_follows_configured_action() {
        let c = Condition::parse("!fire_notified").unwrap();
        let constraints = crate::constraints::build_constraints(
            "oil_spill",
            "required_fields:\n  - key: fluid_type\n  - key: position\n",
            None,
        )
        .unwrap();
        let config = ComplianceConfig {
            fire_notification_action: Some("call_arff".into()),
            ..Default::default()
        };
        let snap = IncidentSnapshot::new("oil_spill");
        assert!(c.evaluate(&snap, &constraints, &config));
        assert!(c.evaluate(&snap.clone().with_action_done("notify_fire_dept"), &constraints, &config));
        assert!(!c.evaluate(&snap.clone().with_action_done("call_arff"), &constraints, &config));
        assert!(!c.evaluate(
            &snap.with_fact("fire_dept_notified", true),
            &constraints,
            &config
        ));
    }

    #[test]
    fn display_is_readable() {
        let c = Condition::parse("fluid_type == FUEL && risk_assessed").unwrap();
        assert_eq!(c.to_string(), "incident.fluid_type == fuel && risk_assessed");
        let c = Condition::parse("risk_at_least(r3) && !fire_notified").unwrap();
        assert_eq!(c.to_string(), "risk_at_least(HIGH) && !fire_notified");
    }
}
