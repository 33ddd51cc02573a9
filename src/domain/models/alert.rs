//! Alert trigger domain model.
//!
//! Eight closed trigger kinds, their static cooldown/severity table, and the
//! per-check outcome type the evaluator reports.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// The eight alert triggers. A closed set: adding a trigger means adding a
/// variant, a config entry and a check, and the compiler enforces all three.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerKind {
    TrafficDrop,
    OilSpike,
    VesselUTurn,
    DarkVesselSurge,
    SecurityAlertNew,
    WarNewsCritical,
    InsuranceIndicator,
    ScheduledStatus,
}

impl TriggerKind {
    pub const ALL: [Self; 8] = [
        Self::TrafficDrop,
        Self::OilSpike,
        Self::VesselUTurn,
        Self::DarkVesselSurge,
        Self::SecurityAlertNew,
        Self::WarNewsCritical,
        Self::InsuranceIndicator,
        Self::ScheduledStatus,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::TrafficDrop => "traffic_drop",
            Self::OilSpike => "oil_spike",
            Self::VesselUTurn => "vessel_u_turn",
            Self::DarkVesselSurge => "dark_vessel_surge",
            Self::SecurityAlertNew => "security_alert_new",
            Self::WarNewsCritical => "war_news_critical",
            Self::InsuranceIndicator => "insurance_indicator",
            Self::ScheduledStatus => "scheduled_status",
        }
    }

    /// Static per-trigger configuration. One entry per kind, cooldowns all
    /// positive; the exhaustive match keeps the table in lockstep with the
    /// enum.
    pub const fn config(self) -> TriggerConfig {
        match self {
            Self::TrafficDrop => TriggerConfig::new(self, 120, AlertLevel::Critical),
            Self::OilSpike => TriggerConfig::new(self, 30, AlertLevel::Warning),
            Self::VesselUTurn => TriggerConfig::new(self, 60, AlertLevel::Warning),
            Self::DarkVesselSurge => TriggerConfig::new(self, 120, AlertLevel::Warning),
            Self::SecurityAlertNew => TriggerConfig::new(self, 60, AlertLevel::Critical),
            Self::WarNewsCritical => TriggerConfig::new(self, 30, AlertLevel::Warning),
            Self::InsuranceIndicator => TriggerConfig::new(self, 360, AlertLevel::Warning),
            Self::ScheduledStatus => TriggerConfig::new(self, 360, AlertLevel::Status),
        }
    }
}

impl std::str::FromStr for TriggerKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "traffic_drop" => Ok(Self::TrafficDrop),
            "oil_spike" => Ok(Self::OilSpike),
            "vessel_u_turn" => Ok(Self::VesselUTurn),
            "dark_vessel_surge" => Ok(Self::DarkVesselSurge),
            "security_alert_new" => Ok(Self::SecurityAlertNew),
            "war_news_critical" => Ok(Self::WarNewsCritical),
            "insurance_indicator" => Ok(Self::InsuranceIndicator),
            "scheduled_status" => Ok(Self::ScheduledStatus),
            other => Err(format!("unknown trigger kind: {other}")),
        }
    }
}

impl std::fmt::Display for TriggerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Severity attached to a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertLevel {
    Critical,
    Warning,
    /// Heartbeat/status report, not a crisis signal.
    Status,
}

impl AlertLevel {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Critical => "critical",
            Self::Warning => "warning",
            Self::Status => "status",
        }
    }
}

impl std::str::FromStr for AlertLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "critical" => Ok(Self::Critical),
            "warning" => Ok(Self::Warning),
            "status" => Ok(Self::Status),
            other => Err(format!("unknown alert level: {other}")),
        }
    }
}

/// Static trigger configuration entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TriggerConfig {
    pub kind: TriggerKind,
    pub cooldown_minutes: i64,
    pub level: AlertLevel,
}

impl TriggerConfig {
    const fn new(kind: TriggerKind, cooldown_minutes: i64, level: AlertLevel) -> Self {
        Self {
            kind,
            cooldown_minutes,
            level,
        }
    }

    pub fn cooldown(&self) -> Duration {
        Duration::minutes(self.cooldown_minutes)
    }
}

/// Result of one trigger check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerOutcome {
    pub kind: TriggerKind,
    pub fired: bool,
    pub level: AlertLevel,
    pub message: Option<String>,
    /// The condition held but a prior notification is still inside the
    /// cooldown window; nothing was sent.
    pub cooldown_suppressed: bool,
}

impl TriggerOutcome {
    /// Condition not met (or signal unavailable, which reads the same).
    pub fn quiet(kind: TriggerKind) -> Self {
        Self {
            kind,
            fired: false,
            level: kind.config().level,
            message: None,
            cooldown_suppressed: false,
        }
    }

    /// Condition met but suppressed by an active cooldown.
    pub fn suppressed(kind: TriggerKind) -> Self {
        Self {
            cooldown_suppressed: true,
            ..Self::quiet(kind)
        }
    }

    /// Condition met; carry the rendered message at the configured level.
    pub fn fired(kind: TriggerKind, message: String) -> Self {
        Self::fired_at(kind, kind.config().level, message)
    }

    /// Condition met at an upgraded severity (oil_spike escalation).
    pub fn fired_at(kind: TriggerKind, level: AlertLevel, message: String) -> Self {
        Self {
            kind,
            fired: true,
            level,
            message: Some(message),
            cooldown_suppressed: false,
        }
    }
}

/// One append-only notification log row. Doubles as the cooldown ledger:
/// the newest row for a trigger kind inside its window suppresses re-firing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CooldownLogEntry {
    pub trigger_type: TriggerKind,
    pub alert_level: AlertLevel,
    pub message: String,
    pub destination: String,
    pub delivery_status: DeliveryStatus,
    pub sent_at: DateTime<Utc>,
}

/// Per-destination delivery result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryStatus {
    Sent,
    Failed,
}

impl DeliveryStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sent => "sent",
            Self::Failed => "failed",
        }
    }
}

impl std::str::FromStr for DeliveryStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sent" => Ok(Self::Sent),
            "failed" => Ok(Self::Failed),
            other => Err(format!("unknown delivery status: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_trigger_has_positive_cooldown() {
        for kind in TriggerKind::ALL {
            assert!(kind.config().cooldown_minutes > 0, "{kind} cooldown");
            assert_eq!(kind.config().kind, kind);
        }
    }

    #[test]
    fn trigger_kind_round_trips_through_str() {
        for kind in TriggerKind::ALL {
            assert_eq!(kind.as_str().parse::<TriggerKind>(), Ok(kind));
        }
    }

    #[test]
    fn cooldown_table_matches_trigger_policy() {
        assert_eq!(TriggerKind::TrafficDrop.config().cooldown_minutes, 120);
        assert_eq!(TriggerKind::OilSpike.config().cooldown_minutes, 30);
        assert_eq!(TriggerKind::InsuranceIndicator.config().cooldown_minutes, 360);
        assert_eq!(
            TriggerKind::SecurityAlertNew.config().level,
            AlertLevel::Critical
        );
        assert_eq!(
            TriggerKind::ScheduledStatus.config().level,
            AlertLevel::Status
        );
    }
}
