//! Scenario pipeline orchestration: collect → analyze → persist → dispatch.
//!
//! Strictly sequential within one run. Analyzer failures and insignificant
//! data both end the run cleanly with nothing persisted; the caller is
//! responsible for not overlapping runs.

use crate::domain::models::CollectedData;
use crate::domain::ports::errors::StoreError;
use crate::domain::ports::{ScenarioAnalyzer, ScenarioStore};
use crate::services::scenario_collector::ScenarioCollector;
use crate::services::scenario_dispatcher::{DeliverySummary, ScenarioDispatcher};
use crate::services::scenario_state::ScenarioStateManager;
use std::sync::Arc;
use tracing::{info, warn};

/// How one pipeline run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineOutcome {
    /// Nothing noteworthy in the collected data; the reasoning call was
    /// skipped entirely.
    SkippedInsignificant,
    /// The reasoning call failed or returned garbage; state untouched.
    SkippedAnalyzerFailure(String),
    /// A new state row was appended.
    Completed {
        state_id: i64,
        transition: Option<String>,
        alerts_sent: usize,
        alerts_failed: usize,
    },
}

/// Immediate triggers: any single one justifies a reasoning call.
/// Accumulation triggers: at least two must hold.
pub fn has_significant_updates(data: &CollectedData) -> bool {
    let immediate = data.news_severity_critical > 0
        || data.oil_change_1h_pct >= 5.0
        || data.traffic_change_1h_pct <= -30.0
        || data.new_security_alerts > 0
        || data.new_map_events_critical > 0;
    if immediate {
        return true;
    }

    let accumulation = [
        data.news_count >= 10,
        data.news_severity_high >= 3,
        data.minutes_since_last_analysis >= 60,
    ]
    .into_iter()
    .filter(|&held| held)
    .count();
    accumulation >= 2
}

/// Wires the scenario stages together for one run.
pub struct ScenarioPipeline {
    collector: ScenarioCollector,
    analyzer: Arc<dyn ScenarioAnalyzer>,
    scenario_store: Arc<dyn ScenarioStore>,
    state_manager: ScenarioStateManager,
    dispatcher: ScenarioDispatcher,
}

impl ScenarioPipeline {
    pub fn new(
        collector: ScenarioCollector,
        analyzer: Arc<dyn ScenarioAnalyzer>,
        scenario_store: Arc<dyn ScenarioStore>,
        dispatcher: ScenarioDispatcher,
    ) -> Self {
        let state_manager = ScenarioStateManager::new(scenario_store.clone());
        Self {
            collector,
            analyzer,
            scenario_store,
            state_manager,
            dispatcher,
        }
    }

    /// One full pipeline run.
    pub async fn run(&self) -> Result<PipelineOutcome, StoreError> {
        let data = self.collector.collect().await?;
        if !has_significant_updates(&data) {
            info!("no significant updates, skipping analysis");
            return Ok(PipelineOutcome::SkippedInsignificant);
        }

        // read fresh; also the previous state for transition detection
        let previous = self.scenario_store.latest_state().await?;

        let response = match self.analyzer.analyze(previous.as_ref(), &data).await {
            Ok(response) => response,
            Err(e) => {
                // fail closed: skip the cycle rather than persist garbage
                warn!(error = %e, "analysis failed, skipping this cycle");
                return Ok(PipelineOutcome::SkippedAnalyzerFailure(e.to_string()));
            }
        };

        let trigger_news_ids: Vec<i64> = data.news.iter().map(|n| n.id).collect();
        let (state_id, state) = self
            .state_manager
            .apply(previous.as_ref(), &response, trigger_news_ids)
            .await?;

        let DeliverySummary { sent, failed } = self.dispatcher.dispatch_alert(&response).await;

        info!(
            state_id,
            primary = %state.primary_scenario,
            alert_level = ?response.alert_level,
            sent,
            failed,
            "scenario pipeline run complete"
        );
        Ok(PipelineOutcome::Completed {
            state_id,
            transition: state.transition_detected,
            alerts_sent: sent,
            alerts_failed: failed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn critical_news_alone_is_significant() {
        let data = CollectedData {
            news_severity_critical: 1,
            ..Default::default()
        };
        assert!(has_significant_updates(&data));
    }

    #[test]
    fn traffic_collapse_is_significant() {
        let data = CollectedData {
            traffic_change_1h_pct: -35.0,
            ..Default::default()
        };
        assert!(has_significant_updates(&data));
    }

    #[test]
    fn one_accumulation_trigger_is_not_enough() {
        let data = CollectedData {
            minutes_since_last_analysis: 90,
            ..Default::default()
        };
        assert!(!has_significant_updates(&data));
    }

    #[test]
    fn two_accumulation_triggers_suffice() {
        let data = CollectedData {
            news_count: 12,
            minutes_since_last_analysis: 90,
            ..Default::default()
        };
        assert!(has_significant_updates(&data));
    }

    #[test]
    fn quiet_payload_is_insignificant() {
        assert!(!has_significant_updates(&CollectedData::default()));
    }
}
