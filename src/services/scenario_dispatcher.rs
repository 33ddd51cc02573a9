//! Scenario alert and status-report dispatch.
//!
//! Two independent paths: immediate alerts for critical/high analyses, and
//! the periodic full status report. Both broadcast to the whole destination
//! set; one destination's failure never stops the others.

use crate::domain::models::{
    AnalysisResponse, ScenarioId, ScenarioState, HEADLINE_VARIABLES,
};
use crate::domain::ports::Notifier;
use std::sync::Arc;
use tracing::{info, warn};

const BAR_CELLS: usize = 10;
const TOP_VARIABLE_CHANGES: usize = 5;
const REASONING_PREVIEW: usize = 300;

/// Per-broadcast delivery counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeliverySummary {
    pub sent: usize,
    pub failed: usize,
}

/// Broadcasts scenario messages to the configured destinations.
pub struct ScenarioDispatcher {
    notifier: Arc<dyn Notifier>,
    destinations: Vec<String>,
}

impl ScenarioDispatcher {
    pub fn new(notifier: Arc<dyn Notifier>, destinations: Vec<String>) -> Self {
        Self {
            notifier,
            destinations,
        }
    }

    /// Immediate alert path. Only dispatchable alert levels send anything;
    /// the analyzer's pre-rendered message wins over the local fallback.
    pub async fn dispatch_alert(&self, response: &AnalysisResponse) -> DeliverySummary {
        if !response.alert_level.is_dispatchable() {
            return DeliverySummary::default();
        }

        let message = match response.alert_message.as_deref() {
            Some(text) if !text.trim().is_empty() => text.to_string(),
            _ => build_alert_message(response),
        };
        self.broadcast(&message).await
    }

    /// Periodic status report path, invoked on the scheduler's cadence.
    pub async fn dispatch_status(&self, state: &ScenarioState) -> DeliverySummary {
        let message = build_status_report(state);
        self.broadcast(&message).await
    }

    async fn broadcast(&self, message: &str) -> DeliverySummary {
        let mut summary = DeliverySummary::default();
        for destination in &self.destinations {
            match self.notifier.send(destination, message).await {
                Ok(()) => summary.sent += 1,
                Err(e) => {
                    warn!(destination = %destination, error = %e, "scenario message delivery failed");
                    summary.failed += 1;
                }
            }
        }
        info!(
            sent = summary.sent,
            failed = summary.failed,
            "scenario broadcast complete"
        );
        summary
    }
}

/// Fallback alert message built from the structured response fields.
pub fn build_alert_message(response: &AnalysisResponse) -> String {
    let update = &response.scenario_update;
    let mut lines = Vec::new();

    match &update.transition_detected {
        Some(transition) => lines.push(format!(
            "\u{1f6a8} <b>Scenario transition: {transition}</b>"
        )),
        None => lines.push("\u{26a0} <b>Scenario update</b>".to_string()),
    }
    if !response.summary.is_empty() {
        lines.push(response.summary.clone());
    }
    lines.push(String::new());

    for id in ScenarioId::ALL {
        let prev = update.previous.get(id);
        let now = update.updated.get(id);
        let arrow = if now > prev {
            '\u{25b2}'
        } else if now < prev {
            '\u{25bc}'
        } else {
            '\u{2501}'
        };
        lines.push(format!(
            "{id} {}: {prev:.0}% {arrow} {now:.0}%",
            id.label()
        ));
    }

    if !response.variable_changes.is_empty() {
        lines.push(String::new());
        lines.push("<b>Key changes</b>".to_string());
        for change in response.variable_changes.iter().take(TOP_VARIABLE_CHANGES) {
            lines.push(format!(
                "\u{2022} {}: {} \u{2192} {} ({:.0}%)",
                change.variable,
                render_value(&change.old_value),
                render_value(&change.new_value),
                change.confidence * 100.0
            ));
        }
    }

    if let Some(impact) = &response.market_impact {
        lines.push(String::new());
        lines.push("<b>Market impact</b>".to_string());
        for (label, text) in [
            ("Oil", &impact.oil),
            ("Equities", &impact.equities),
            ("Shipping", &impact.shipping),
        ] {
            if let Some(text) = text {
                lines.push(format!("\u{2022} {label}: {text}"));
            }
        }
    }

    lines.join("\n")
}

/// Full status report: proportional probability bars plus the headline
/// variables.
pub fn build_status_report(state: &ScenarioState) -> String {
    let mut lines = vec!["\u{1f4ca} <b>Scenario status</b>".to_string(), String::new()];

    for id in ScenarioId::ALL {
        let pct = state.probabilities.get(id);
        lines.push(format!(
            "{} {id} {}: {pct:.0}%{}",
            probability_bar(pct),
            id.label(),
            if id == state.primary_scenario {
                " \u{2b50}"
            } else {
                ""
            }
        ));
    }

    let known: Vec<String> = HEADLINE_VARIABLES
        .iter()
        .filter_map(|key| {
            state
                .variables_snapshot
                .get(*key)
                .map(|value| format!("\u{2022} {key}: {}", render_value(value)))
        })
        .collect();
    if !known.is_empty() {
        lines.push(String::new());
        lines.push("<b>Key variables</b>".to_string());
        lines.extend(known);
    }

    if !state.reasoning.is_empty() {
        lines.push(String::new());
        let mut reasoning = state.reasoning.clone();
        if reasoning.chars().count() > REASONING_PREVIEW {
            reasoning = reasoning.chars().take(REASONING_PREVIEW).collect::<String>() + "\u{2026}";
        }
        lines.push(format!("<i>{reasoning}</i>"));
    }

    lines.join("\n")
}

/// Ten-cell bar, filled proportionally to the percentage.
fn probability_bar(pct: f64) -> String {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let filled = ((pct / 100.0 * BAR_CELLS as f64).round().clamp(0.0, BAR_CELLS as f64)) as usize;
    let mut bar = "\u{2588}".repeat(filled);
    bar.push_str(&"\u{2591}".repeat(BAR_CELLS - filled));
    bar
}

/// JSON scalar without quotes, anything else as compact JSON.
fn render_value(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{
        MarketImpact, ScenarioAlertLevel, ScenarioProbabilities, ScenarioUpdate, VariableChange,
    };
    use crate::domain::ports::errors::NotifyError;
    use async_trait::async_trait;
    use chrono::Utc;
    use serde_json::json;
    use std::collections::BTreeMap;
    use std::sync::Mutex;

    struct CountingNotifier {
        sent: Mutex<usize>,
    }

    #[async_trait]
    impl Notifier for CountingNotifier {
        async fn send(&self, _destination: &str, _text: &str) -> Result<(), NotifyError> {
            *self.sent.lock().unwrap() += 1;
            Ok(())
        }
    }

    fn response(level: ScenarioAlertLevel, message: Option<&str>) -> AnalysisResponse {
        AnalysisResponse {
            alert_level: level,
            summary: "Transit interference confirmed.".to_string(),
            variable_changes: vec![VariableChange {
                variable: "chokepoint_status".to_string(),
                old_value: json!("open"),
                new_value: json!("restricted"),
                confidence: 0.85,
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
                primary_scenario: ScenarioId::C,
                primary_sub_scenario: None,
                transition_detected: Some("B\u{2192}C".to_string()),
                reasoning: String::new(),
            },
            market_impact: Some(MarketImpact {
                oil: Some("upward pressure".to_string()),
                equities: None,
                shipping: Some("rates rising".to_string()),
            }),
            alert_message: message.map(Into::into),
        }
    }

    #[tokio::test]
    async fn low_alert_levels_dispatch_nothing() {
        let notifier = Arc::new(CountingNotifier {
            sent: Mutex::new(0),
        });
        let dispatcher = ScenarioDispatcher::new(notifier.clone(), vec!["chat-1".into()]);
        let summary = dispatcher
            .dispatch_alert(&response(ScenarioAlertLevel::Low, None))
            .await;
        assert_eq!(summary, DeliverySummary::default());
        assert_eq!(*notifier.sent.lock().unwrap(), 0);
    }

    #[tokio::test]
    async fn high_alert_broadcasts_to_all_destinations() {
        let notifier = Arc::new(CountingNotifier {
            sent: Mutex::new(0),
        });
        let dispatcher =
            ScenarioDispatcher::new(notifier.clone(), vec!["a".into(), "b".into()]);
        let summary = dispatcher
            .dispatch_alert(&response(ScenarioAlertLevel::High, None))
            .await;
        assert_eq!(summary.sent, 2);
        assert_eq!(*notifier.sent.lock().unwrap(), 2);
    }

    #[test]
    fn fallback_message_carries_deltas_and_impact() {
        let message = build_alert_message(&response(ScenarioAlertLevel::Critical, None));
        assert!(message.contains("Scenario transition: B\u{2192}C"));
        assert!(message.contains("C Chokepoint disruption: 30% \u{25b2} 45%"));
        assert!(message.contains("A De-escalation: 25% \u{25bc} 15%"));
        assert!(message.contains("D Regional war: 5% \u{2501} 5%"));
        assert!(message.contains("chokepoint_status: open \u{2192} restricted (85%)"));
        assert!(message.contains("Oil: upward pressure"));
    }

    #[test]
    fn prerendered_message_wins() {
        let response = response(ScenarioAlertLevel::High, Some("custom text"));
        let message = match response.alert_message.as_deref() {
            Some(text) if !text.trim().is_empty() => text.to_string(),
            _ => build_alert_message(&response),
        };
        assert_eq!(message, "custom text");
    }

    #[test]
    fn status_report_renders_bars_and_headline_variables() {
        let mut variables = BTreeMap::new();
        variables.insert("chokepoint_status".to_string(), json!("restricted"));
        variables.insert("oil_price_brent".to_string(), json!(95.4));
        variables.insert("unlisted_extra".to_string(), json!("hidden"));

        let state = ScenarioState {
            id: 3,
            timestamp: Utc::now(),
            probabilities: ScenarioProbabilities {
                a: 10.0,
                b: 30.0,
                c: 55.0,
                d: 5.0,
            },
            primary_scenario: ScenarioId::C,
            primary_sub_scenario: None,
            transition_detected: None,
            variables_snapshot: variables,
            reasoning: "Sustained interference with transit.".to_string(),
            trigger_news_ids: vec![],
        };

        let report = build_status_report(&state);
        // 55% rounds to 6 of 10 cells
        assert!(report.contains("\u{2588}\u{2588}\u{2588}\u{2588}\u{2588}\u{2588}\u{2591}\u{2591}\u{2591}\u{2591} C"));
        assert!(report.contains("\u{2b50}"));
        assert!(report.contains("chokepoint_status: restricted"));
        assert!(report.contains("oil_price_brent: 95.4"));
        assert!(!report.contains("unlisted_extra"));
    }

    #[test]
    fn probability_bar_bounds() {
        assert_eq!(probability_bar(0.0), "\u{2591}".repeat(10));
        assert_eq!(probability_bar(100.0), "\u{2588}".repeat(10));
    }
}
