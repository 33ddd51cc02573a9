//! Prompt construction for the reasoning service.
//!
//! The scenario framework and tracked-variable catalog are static prompt
//! content: the service reasons over them, this crate never does.

use crate::domain::models::{CollectedData, ScenarioState};

/// The four-trajectory scenario framework given to the reasoning service.
const SCENARIO_FRAMEWORK: &str = r#"{
  "A": {"name": "De-escalation", "description": "Negotiated wind-down; traffic and insurance normalize"},
  "B": {"name": "Contained conflict", "description": "Hostilities continue without sustained chokepoint interference"},
  "C": {"name": "Chokepoint disruption", "description": "Transit actively impeded: closures, seizures, strikes on shipping"},
  "D": {"name": "Regional war", "description": "Multi-state escalation with broad military engagement"}
}"#;

/// Tracked key variables the service reports changes against.
const KEY_VARIABLE_CATALOG: &str = r#"{
  "chokepoint_status": "open | restricted | closed",
  "oil_price_brent": "latest Brent price in USD",
  "escort_operations": "naval escort posture in the strait",
  "insurance_risk_score": "war-risk insurance proxy, 0-10",
  "ceasefire_talks": "none | rumored | confirmed | collapsed",
  "naval_posture": "posture of regional naval forces",
  "tanker_reroutes": "observed long-haul rerouting volume"
}"#;

/// Default probabilities injected when no prior analysis exists.
const INITIAL_STATE_JSON: &str =
    r#"{"A": 25, "B": 40, "C": 30, "D": 5, "primary_scenario": "B"}"#;

/// Build the system prompt from the persisted scenario state.
pub fn build_system_prompt(current_state: Option<&ScenarioState>) -> String {
    let state_json = current_state.map_or_else(
        || INITIAL_STATE_JSON.to_string(),
        |state| {
            serde_json::json!({
                "A": state.probabilities.a,
                "B": state.probabilities.b,
                "C": state.probabilities.c,
                "D": state.probabilities.d,
                "primary_scenario": state.primary_scenario.as_str(),
                "primary_sub_scenario": state.primary_sub_scenario,
                "variables_snapshot": state.variables_snapshot,
            })
            .to_string()
        },
    );

    format!(
        "You are a maritime chokepoint crisis analyst. You maintain probability \
estimates over four mutually exclusive scenarios and track key variables from \
incoming signals.\n\n\
## Current scenario state\n{state_json}\n\n\
## Scenario framework\n{SCENARIO_FRAMEWORK}\n\n\
## Key variables\n{KEY_VARIABLE_CATALOG}\n\n\
## Task\n\
Analyze the new data and report: variable changes (with old/new values, a \
confidence score 0.0-1.0 and a source for each), updated probabilities for \
all four scenarios summing to 100, the primary scenario, an optional \
transition string \"X\u{2192}Y\" if the primary moved, an alert level, and a short \
notification message.\n\n\
## Rules\n\
- Never declare a scenario transition from a single source; require 2+ independent sources.\n\
- If unsure, say so; never fabricate analysis.\n\
- Probabilities must sum to 100.\n\n\
## Response format\n\
Respond ONLY with valid JSON:\n\
{{\n\
  \"alert_level\": \"CRITICAL|HIGH|MEDIUM|LOW|NONE\",\n\
  \"summary\": \"one or two sentences\",\n\
  \"variable_changes\": [{{\"variable\": \"...\", \"old_value\": \"...\", \"new_value\": \"...\", \"confidence\": 0.0, \"source\": \"...\"}}],\n\
  \"scenario_update\": {{\n\
    \"previous\": {{\"A\": 0, \"B\": 0, \"C\": 0, \"D\": 0}},\n\
    \"updated\": {{\"A\": 0, \"B\": 0, \"C\": 0, \"D\": 0}},\n\
    \"primary_scenario\": \"A|B|C|D\",\n\
    \"primary_sub_scenario\": null,\n\
    \"transition_detected\": null,\n\
    \"reasoning\": \"...\"\n\
  }},\n\
  \"market_impact\": {{\"oil\": \"...\", \"equities\": \"...\", \"shipping\": \"...\"}},\n\
  \"alert_message\": \"...\"\n\
}}"
    )
}

/// Build the user prompt from the collected delta payload.
pub fn build_user_prompt(data: &CollectedData, last_check: &str) -> String {
    let news: Vec<_> = data.news.iter().take(20).collect();
    let map_events: Vec<_> = data.map_events.iter().take(10).collect();

    format!(
        "## New data since last check ({last_check})\n\n\
### News ({count} items, {critical} critical / {high} high)\n{news}\n\n\
### Oil prices\n{oil}\n\n\
### Traffic\n{traffic}\n\n\
### New security alerts ({alert_count})\n{alerts}\n\n\
### Map events\n{events}\n\n\
Minutes since last analysis: {minutes}\n\n\
Analyze this data and provide your assessment.",
        count = data.news_count,
        critical = data.news_severity_critical,
        high = data.news_severity_high,
        news = serde_json::to_string_pretty(&news).unwrap_or_default(),
        oil = serde_json::to_string_pretty(&data.oil).unwrap_or_default(),
        traffic = serde_json::to_string_pretty(&data.traffic).unwrap_or_default(),
        alert_count = data.new_security_alerts,
        alerts = serde_json::to_string_pretty(&data.security_alerts).unwrap_or_default(),
        events = serde_json::to_string_pretty(&map_events).unwrap_or_default(),
        minutes = data.minutes_since_last_analysis,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{ScenarioId, ScenarioProbabilities};
    use chrono::Utc;
    use std::collections::BTreeMap;

    #[test]
    fn system_prompt_without_state_uses_initial_probabilities() {
        let prompt = build_system_prompt(None);
        assert!(prompt.contains("\"B\": 40"));
        assert!(prompt.contains("Response format"));
    }

    #[test]
    fn system_prompt_embeds_current_state() {
        let state = ScenarioState {
            id: 7,
            timestamp: Utc::now(),
            probabilities: ScenarioProbabilities {
                a: 10.0,
                b: 20.0,
                c: 65.0,
                d: 5.0,
            },
            primary_scenario: ScenarioId::C,
            primary_sub_scenario: None,
            transition_detected: None,
            variables_snapshot: BTreeMap::new(),
            reasoning: String::new(),
            trigger_news_ids: vec![],
        };
        let prompt = build_system_prompt(Some(&state));
        assert!(prompt.contains("\"C\":65.0"));
        assert!(prompt.contains("\"primary_scenario\":\"C\""));
    }

    #[test]
    fn user_prompt_carries_derived_counts() {
        let data = CollectedData {
            news_count: 12,
            news_severity_critical: 3,
            minutes_since_last_analysis: 45,
            ..Default::default()
        };
        let prompt = build_user_prompt(&data, "initial");
        assert!(prompt.contains("12 items, 3 critical"));
        assert!(prompt.contains("Minutes since last analysis: 45"));
    }
}
