use crate::domain::models::{
    NewScenarioState, ScenarioProbabilities, ScenarioState, VariableChange,
};
use crate::domain::ports::errors::StoreError;
use crate::domain::ports::ScenarioStore;
use crate::infrastructure::database::utils::{format_datetime, parse_datetime};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use tracing::info;

/// SQLite implementation of the scenario state store.
pub struct SqliteScenarioStore {
    pool: SqlitePool,
}

impl SqliteScenarioStore {
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_state(row: &SqliteRow) -> Result<ScenarioState, StoreError> {
        Ok(ScenarioState {
            id: row.get("id"),
            timestamp: parse_datetime(row.get::<String, _>("timestamp").as_str())?,
            probabilities: ScenarioProbabilities {
                a: row.get("scenario_a_pct"),
                b: row.get("scenario_b_pct"),
                c: row.get("scenario_c_pct"),
                d: row.get("scenario_d_pct"),
            },
            primary_scenario: row
                .get::<String, _>("primary_scenario")
                .parse()
                .map_err(StoreError::InvalidValue)?,
            primary_sub_scenario: row.get("primary_sub_scenario"),
            transition_detected: row.get("transition_detected"),
            variables_snapshot: serde_json::from_str(
                row.get::<String, _>("variables_snapshot").as_str(),
            )?,
            reasoning: row.get("reasoning"),
            trigger_news_ids: serde_json::from_str(
                row.get::<String, _>("trigger_news_ids").as_str(),
            )?,
        })
    }
}

#[async_trait]
impl ScenarioStore for SqliteScenarioStore {
    async fn latest_state(&self) -> Result<Option<ScenarioState>, StoreError> {
        let row = sqlx::query(
            "SELECT id, timestamp, scenario_a_pct, scenario_b_pct, scenario_c_pct, \
                    scenario_d_pct, primary_scenario, primary_sub_scenario, \
                    transition_detected, variables_snapshot, reasoning, trigger_news_ids \
             FROM scenario_state \
             ORDER BY timestamp DESC \
             LIMIT 1",
        )
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(Self::row_to_state).transpose()
    }

    async fn last_analysis_timestamp(&self) -> Result<Option<DateTime<Utc>>, StoreError> {
        let row: Option<(String,)> =
            sqlx::query_as("SELECT timestamp FROM scenario_state ORDER BY timestamp DESC LIMIT 1")
                .fetch_optional(&self.pool)
                .await?;

        row.map(|(ts,)| parse_datetime(&ts))
            .transpose()
            .map_err(StoreError::from)
    }

    async fn insert_state(&self, state: &NewScenarioState) -> Result<i64, StoreError> {
        let variables = serde_json::to_string(&state.variables_snapshot)?;
        let news_ids = serde_json::to_string(&state.trigger_news_ids)?;

        let result = sqlx::query(
            "INSERT INTO scenario_state \
                 (timestamp, scenario_a_pct, scenario_b_pct, scenario_c_pct, scenario_d_pct, \
                  primary_scenario, primary_sub_scenario, transition_detected, \
                  variables_snapshot, reasoning, trigger_news_ids) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
        )
        .bind(format_datetime(state.timestamp))
        .bind(state.probabilities.a)
        .bind(state.probabilities.b)
        .bind(state.probabilities.c)
        .bind(state.probabilities.d)
        .bind(state.primary_scenario.as_str())
        .bind(&state.primary_sub_scenario)
        .bind(&state.transition_detected)
        .bind(variables)
        .bind(&state.reasoning)
        .bind(news_ids)
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_rowid();
        info!(
            state_id = id,
            primary = %state.primary_scenario,
            transition = state.transition_detected.as_deref().unwrap_or("-"),
            "scenario state appended"
        );
        Ok(id)
    }

    async fn insert_variable_changes(
        &self,
        state_id: i64,
        changes: &[VariableChange],
    ) -> Result<(), StoreError> {
        let recorded_at = format_datetime(Utc::now());
        for change in changes {
            sqlx::query(
                "INSERT INTO scenario_variable_history \
                     (variable_name, old_value, new_value, confidence, source, state_id, \
                      recorded_at) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            )
            .bind(&change.variable)
            .bind(change.old_value.to_string())
            .bind(change.new_value.to_string())
            .bind(change.confidence)
            .bind(&change.source)
            .bind(state_id)
            .bind(&recorded_at)
            .execute(&self.pool)
            .await?;
        }
        Ok(())
    }
}
