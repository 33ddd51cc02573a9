//! Scenario intelligence domain model.
//!
//! Four mutually exclusive crisis trajectories (A–D), the persisted
//! probability snapshot, the analyzer wire contract, and the ephemeral
//! collected-data payload fed to the reasoning service.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The four crisis trajectories. Closed set; handling is exhaustively
/// checked wherever a scenario id is matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ScenarioId {
    A,
    B,
    C,
    D,
}

impl ScenarioId {
    pub const ALL: [Self; 4] = [Self::A, Self::B, Self::C, Self::D];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
        }
    }

    /// Short display label for notifications.
    pub const fn label(self) -> &'static str {
        match self {
            Self::A => "De-escalation",
            Self::B => "Contained conflict",
            Self::C => "Chokepoint disruption",
            Self::D => "Regional war",
        }
    }
}

impl std::str::FromStr for ScenarioId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "A" => Ok(Self::A),
            "B" => Ok(Self::B),
            "C" => Ok(Self::C),
            "D" => Ok(Self::D),
            other => Err(format!("unknown scenario id: {other}")),
        }
    }
}

impl std::fmt::Display for ScenarioId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Probabilities for all four scenarios, in percent. The analyzer is trusted
/// to normalize to ~100; these are stored as given.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScenarioProbabilities {
    #[serde(rename = "A")]
    pub a: f64,
    #[serde(rename = "B")]
    pub b: f64,
    #[serde(rename = "C")]
    pub c: f64,
    #[serde(rename = "D")]
    pub d: f64,
}

impl ScenarioProbabilities {
    pub const fn get(&self, id: ScenarioId) -> f64 {
        match id {
            ScenarioId::A => self.a,
            ScenarioId::B => self.b,
            ScenarioId::C => self.c,
            ScenarioId::D => self.d,
        }
    }

    /// The scenario with the highest probability. Ties resolve to the
    /// earliest id, which keeps the result stable across runs.
    pub fn argmax(&self) -> ScenarioId {
        let mut best = ScenarioId::A;
        for id in ScenarioId::ALL {
            if self.get(id) > self.get(best) {
                best = id;
            }
        }
        best
    }
}

/// One persisted scenario analysis snapshot. Rows are immutable once
/// written; corrections are new rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioState {
    pub id: i64,
    pub timestamp: DateTime<Utc>,
    pub probabilities: ScenarioProbabilities,
    pub primary_scenario: ScenarioId,
    pub primary_sub_scenario: Option<String>,
    /// "PREV→NEW" when the primary scenario moved on this analysis.
    pub transition_detected: Option<String>,
    /// Free-form tracked-variable snapshot; the catalog of known keys is
    /// configuration, not schema.
    pub variables_snapshot: BTreeMap<String, serde_json::Value>,
    pub reasoning: String,
    pub trigger_news_ids: Vec<i64>,
}

/// A scenario state that has not been persisted yet (no row id).
#[derive(Debug, Clone, PartialEq)]
pub struct NewScenarioState {
    pub timestamp: DateTime<Utc>,
    pub probabilities: ScenarioProbabilities,
    pub primary_scenario: ScenarioId,
    pub primary_sub_scenario: Option<String>,
    pub transition_detected: Option<String>,
    pub variables_snapshot: BTreeMap<String, serde_json::Value>,
    pub reasoning: String,
    pub trigger_news_ids: Vec<i64>,
}

/// One tracked-variable change reported by the analyzer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableChange {
    pub variable: String,
    pub old_value: serde_json::Value,
    pub new_value: serde_json::Value,
    /// 0.0–1.0 as reported; not clamped here.
    pub confidence: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

/// Analyzer-reported importance of an update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ScenarioAlertLevel {
    Critical,
    High,
    Medium,
    Low,
    None,
}

impl ScenarioAlertLevel {
    /// Only these levels produce an immediate alert dispatch.
    pub const fn is_dispatchable(self) -> bool {
        matches!(self, Self::Critical | Self::High)
    }
}

/// The probability portion of an analyzer response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioUpdate {
    pub previous: ScenarioProbabilities,
    pub updated: ScenarioProbabilities,
    pub primary_scenario: ScenarioId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_sub_scenario: Option<String>,
    /// The analyzer's own transition claim; the state manager's detection
    /// takes precedence.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transition_detected: Option<String>,
    #[serde(default)]
    pub reasoning: String,
}

/// Structured response from the reasoning service. Shape-validated on
/// receipt; the reasoning itself is never second-guessed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResponse {
    pub alert_level: ScenarioAlertLevel,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub variable_changes: Vec<VariableChange>,
    pub scenario_update: ScenarioUpdate,
    /// Market-impact lines rendered into the fallback alert message.
    #[serde(default)]
    pub market_impact: Option<MarketImpact>,
    /// Pre-rendered notification text; when empty the dispatcher builds one
    /// from the structured fields.
    #[serde(default)]
    pub alert_message: Option<String>,
}

/// Analyzer's market-impact assessment, free-text per asset class.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MarketImpact {
    #[serde(default)]
    pub oil: Option<String>,
    #[serde(default)]
    pub equities: Option<String>,
    #[serde(default)]
    pub shipping: Option<String>,
}

/// Ephemeral delta payload handed to the analyzer. Built fresh every
/// collector run, never persisted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CollectedData {
    pub news: Vec<CollectedNews>,
    pub oil: CollectedOil,
    pub traffic: Option<CollectedTraffic>,
    pub security_alerts: Vec<CollectedSecurityAlert>,
    pub map_events: Vec<CollectedMapEvent>,
    pub news_count: usize,
    pub news_severity_critical: usize,
    pub news_severity_high: usize,
    /// Absolute 1h oil move (daily change as fallback), percent.
    pub oil_change_1h_pct: f64,
    pub traffic_change_1h_pct: f64,
    pub new_security_alerts: usize,
    pub new_map_events_critical: usize,
    pub minutes_since_last_analysis: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectedNews {
    pub id: i64,
    pub title: String,
    pub source_name: String,
    pub severity: String,
    pub category: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CollectedOil {
    pub brent_price: Option<f64>,
    pub wti_price: Option<f64>,
    pub brent_change_pct: Option<f64>,
    pub wti_change_pct: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CollectedTraffic {
    pub total_vessels: i64,
    pub tanker_count: i64,
    pub stopped_count: i64,
    pub u_turn_count: i64,
    pub dark_vessel_count: i64,
    pub traffic_change_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectedSecurityAlert {
    pub id: i64,
    pub title: String,
    pub threat_level: String,
    pub source: String,
    pub affects_chokepoint: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectedMapEvent {
    pub id: i64,
    pub event_type: String,
    pub title: String,
    pub severity: String,
    pub location_name: Option<String>,
}

/// Headline variables shown in every status report, in display order.
pub const HEADLINE_VARIABLES: [&str; 6] = [
    "chokepoint_status",
    "oil_price_brent",
    "escort_operations",
    "insurance_risk_score",
    "ceasefire_talks",
    "naval_posture",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn argmax_picks_highest() {
        let probs = ScenarioProbabilities {
            a: 10.0,
            b: 20.0,
            c: 60.0,
            d: 10.0,
        };
        assert_eq!(probs.argmax(), ScenarioId::C);
    }

    #[test]
    fn argmax_tie_resolves_to_earliest() {
        let probs = ScenarioProbabilities {
            a: 25.0,
            b: 25.0,
            c: 25.0,
            d: 25.0,
        };
        assert_eq!(probs.argmax(), ScenarioId::A);
    }

    #[test]
    fn probabilities_serialize_with_uppercase_keys() {
        let probs = ScenarioProbabilities {
            a: 40.0,
            b: 30.0,
            c: 20.0,
            d: 10.0,
        };
        let json = serde_json::to_value(probs).unwrap();
        assert_eq!(json["A"], 40.0);
        assert_eq!(json["D"], 10.0);
    }

    #[test]
    fn alert_level_dispatchability() {
        assert!(ScenarioAlertLevel::Critical.is_dispatchable());
        assert!(ScenarioAlertLevel::High.is_dispatchable());
        assert!(!ScenarioAlertLevel::Medium.is_dispatchable());
        assert!(!ScenarioAlertLevel::None.is_dispatchable());
    }
}
