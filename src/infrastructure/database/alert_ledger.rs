use crate::domain::models::{CooldownLogEntry, TriggerKind};
use crate::domain::ports::errors::StoreError;
use crate::domain::ports::AlertLedger;
use crate::infrastructure::database::utils::format_datetime;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;

/// SQLite implementation of the append-only alert ledger.
pub struct SqliteAlertLedger {
    pool: SqlitePool,
}

impl SqliteAlertLedger {
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AlertLedger for SqliteAlertLedger {
    async fn in_cooldown(
        &self,
        kind: TriggerKind,
        since: DateTime<Utc>,
    ) -> Result<bool, StoreError> {
        // Any row inside the window counts, failed deliveries included.
        let (count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM alert_log WHERE trigger_type = ?1 AND sent_at >= ?2",
        )
        .bind(kind.as_str())
        .bind(format_datetime(since))
        .fetch_one(&self.pool)
        .await?;

        Ok(count > 0)
    }

    async fn append(&self, entry: &CooldownLogEntry) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO alert_log \
                 (trigger_type, alert_level, message, destination, delivery_status, sent_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        )
        .bind(entry.trigger_type.as_str())
        .bind(entry.alert_level.as_str())
        .bind(&entry.message)
        .bind(&entry.destination)
        .bind(entry.delivery_status.as_str())
        .bind(format_datetime(entry.sent_at))
        .execute(&self.pool)
        .await?;

        debug!(
            trigger = %entry.trigger_type,
            destination = %entry.destination,
            status = entry.delivery_status.as_str(),
            "alert delivery logged"
        );
        Ok(())
    }
}
