use crate::domain::models::{NewScenarioState, ScenarioState, VariableChange};
use crate::domain::ports::errors::StoreError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Persistence port for the scenario state time series.
///
/// scenario_state and scenario_variable_history are append-only: a bad
/// analysis is corrected by inserting a new row, never by editing history.
#[async_trait]
pub trait ScenarioStore: Send + Sync {
    /// Most recent persisted state, if any analysis has ever run.
    async fn latest_state(&self) -> Result<Option<ScenarioState>, StoreError>;

    /// Timestamp of the last analysis, read fresh from storage each time so
    /// the collector stays correct across process restarts.
    async fn last_analysis_timestamp(&self) -> Result<Option<DateTime<Utc>>, StoreError>;

    /// Append a new immutable state row; returns its id.
    async fn insert_state(&self, state: &NewScenarioState) -> Result<i64, StoreError>;

    /// Bulk-append variable changes referencing the state row.
    async fn insert_variable_changes(
        &self,
        state_id: i64,
        changes: &[VariableChange],
    ) -> Result<(), StoreError>;
}
