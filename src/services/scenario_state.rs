//! Scenario state management.
//!
//! Append-only state machine over "which scenario is primary". Every
//! analysis produces a new immutable row; transitions are detected here by
//! comparing against the previous row, overriding whatever the analyzer
//! itself claimed.

use crate::domain::models::{
    AnalysisResponse, NewScenarioState, ScenarioId, ScenarioState,
};
use crate::domain::ports::errors::StoreError;
use crate::domain::ports::ScenarioStore;
use chrono::Utc;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::info;

/// "PREV→NEW" when the primary scenario moved, else `None`.
pub fn detect_transition(previous: Option<&ScenarioState>, new_primary: ScenarioId) -> Option<String> {
    let prev = previous?.primary_scenario;
    (prev != new_primary).then(|| format!("{prev}\u{2192}{new_primary}"))
}

/// Previous snapshot with each reported change applied as a key-overwrite.
pub fn merge_snapshot(
    previous: Option<&ScenarioState>,
    response: &AnalysisResponse,
) -> BTreeMap<String, serde_json::Value> {
    let mut snapshot = previous
        .map(|s| s.variables_snapshot.clone())
        .unwrap_or_default();
    for change in &response.variable_changes {
        snapshot.insert(change.variable.clone(), change.new_value.clone());
    }
    snapshot
}

/// Persists analysis results as immutable scenario rows.
pub struct ScenarioStateManager {
    store: Arc<dyn ScenarioStore>,
}

impl ScenarioStateManager {
    pub fn new(store: Arc<dyn ScenarioStore>) -> Self {
        Self { store }
    }

    /// Append a new state row and its variable-change history.
    ///
    /// There is no undo: correcting a bad analysis means appending a
    /// corrective row later. Probabilities are stored as reported.
    pub async fn apply(
        &self,
        previous: Option<&ScenarioState>,
        response: &AnalysisResponse,
        trigger_news_ids: Vec<i64>,
    ) -> Result<(i64, NewScenarioState), StoreError> {
        let update = &response.scenario_update;
        let detected = detect_transition(previous, update.primary_scenario);
        // own detection wins; the analyzer's claim is the fallback
        let transition = detected.or_else(|| update.transition_detected.clone());

        let state = NewScenarioState {
            timestamp: Utc::now(),
            probabilities: update.updated,
            primary_scenario: update.primary_scenario,
            primary_sub_scenario: update.primary_sub_scenario.clone(),
            transition_detected: transition,
            variables_snapshot: merge_snapshot(previous, response),
            reasoning: update.reasoning.clone(),
            trigger_news_ids,
        };

        let state_id = self.store.insert_state(&state).await?;
        self.store
            .insert_variable_changes(state_id, &response.variable_changes)
            .await?;

        if let Some(transition) = &state.transition_detected {
            info!(state_id, transition = %transition, "scenario transition recorded");
        }
        Ok((state_id, state))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{
        ScenarioAlertLevel, ScenarioProbabilities, ScenarioUpdate, VariableChange,
    };
    use serde_json::json;

    fn prior(primary: ScenarioId) -> ScenarioState {
        let mut variables = BTreeMap::new();
        variables.insert("chokepoint_status".to_string(), json!("open"));
        variables.insert("ceasefire_talks".to_string(), json!("none"));
        ScenarioState {
            id: 1,
            timestamp: Utc::now(),
            probabilities: ScenarioProbabilities {
                a: 25.0,
                b: 40.0,
                c: 30.0,
                d: 5.0,
            },
            primary_scenario: primary,
            primary_sub_scenario: None,
            transition_detected: None,
            variables_snapshot: variables,
            reasoning: "baseline".to_string(),
            trigger_news_ids: vec![],
        }
    }

    fn response(primary: ScenarioId, claim: Option<&str>) -> AnalysisResponse {
        AnalysisResponse {
            alert_level: ScenarioAlertLevel::Medium,
            summary: String::new(),
            variable_changes: vec![VariableChange {
                variable: "chokepoint_status".to_string(),
                old_value: json!("open"),
                new_value: json!("restricted"),
                confidence: 0.9,
                source: None,
            }],
            scenario_update: ScenarioUpdate {
                previous: ScenarioProbabilities {
                    a: 25.0,
                    b: 40.0,
                    c: 30.0,
                    d: 5.0,
                },
                updated: ScenarioProbabilities {
                    a: 15.0,
                    b: 35.0,
                    c: 45.0,
                    d: 5.0,
                },
                primary_scenario: primary,
                primary_sub_scenario: None,
                transition_detected: claim.map(Into::into),
                reasoning: String::new(),
            },
            market_impact: None,
            alert_message: None,
        }
    }

    #[test]
    fn transition_detected_when_primary_moves() {
        let prev = prior(ScenarioId::B);
        assert_eq!(
            detect_transition(Some(&prev), ScenarioId::C),
            Some("B\u{2192}C".to_string())
        );
    }

    #[test]
    fn no_transition_when_primary_unchanged_or_first_run() {
        let prev = prior(ScenarioId::B);
        assert_eq!(detect_transition(Some(&prev), ScenarioId::B), None);
        assert_eq!(detect_transition(None, ScenarioId::C), None);
    }

    #[test]
    fn snapshot_merge_overwrites_and_preserves() {
        let prev = prior(ScenarioId::B);
        let merged = merge_snapshot(Some(&prev), &response(ScenarioId::C, None));
        assert_eq!(merged["chokepoint_status"], json!("restricted"));
        assert_eq!(merged["ceasefire_talks"], json!("none"));
    }

    #[test]
    fn analyzer_claim_survives_when_nothing_detected() {
        // primary unchanged but the analyzer reported its own transition
        let prev = prior(ScenarioId::B);
        let resp = response(ScenarioId::B, Some("B\u{2192}B1"));
        let detected = detect_transition(Some(&prev), resp.scenario_update.primary_scenario);
        let transition = detected.or_else(|| resp.scenario_update.transition_detected.clone());
        assert_eq!(transition, Some("B\u{2192}B1".to_string()));
    }
}
