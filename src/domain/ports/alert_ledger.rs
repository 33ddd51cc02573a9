use crate::domain::models::{CooldownLogEntry, TriggerKind};
use crate::domain::ports::errors::StoreError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Append-only notification log, doubling as the cooldown mechanism.
///
/// The probe is check-then-act against the log, not a lock: under two
/// overlapping scheduler ticks a duplicate fire is possible. Accepted at
/// this scale; the windows are tens of minutes.
#[async_trait]
pub trait AlertLedger: Send + Sync {
    /// True when any log row for `kind` exists at or after `since`,
    /// regardless of delivery status. A failed send still opens the
    /// cooldown window, which avoids retry storms against a misconfigured
    /// destination.
    async fn in_cooldown(&self, kind: TriggerKind, since: DateTime<Utc>)
        -> Result<bool, StoreError>;

    /// Append one delivery record. Never updates existing rows.
    async fn append(&self, entry: &CooldownLogEntry) -> Result<(), StoreError>;
}
