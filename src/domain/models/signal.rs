//! Read-only signal row types.
//!
//! These rows are owned by the upstream ingestion workers; this crate only
//! queries them. Field sets mirror the signal store schema.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Hourly or daily traffic rollup for one zone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrafficSnapshot {
    pub zone: String,
    pub period_type: PeriodType,
    pub total_vessels: i64,
    pub tanker_count: i64,
    pub stopped_count: i64,
    pub u_turn_count: i64,
    pub dark_vessel_count: i64,
    pub period_start: DateTime<Utc>,
}

/// Rollup granularity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PeriodType {
    Hourly,
    Daily,
}

impl PeriodType {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Hourly => "hourly",
            Self::Daily => "daily",
        }
    }
}

impl std::str::FromStr for PeriodType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "hourly" => Ok(Self::Hourly),
            "daily" => Ok(Self::Daily),
            other => Err(format!("unknown period type: {other}")),
        }
    }
}

/// One crude-benchmark price observation with upstream-computed change
/// windows. `spike_flag` is set by the ingestion layer's own anomaly rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceTick {
    pub benchmark: String,
    pub price: f64,
    pub prev_close: Option<f64>,
    pub change_pct: Option<f64>,
    pub change_30m_pct: Option<f64>,
    pub change_1h_pct: Option<f64>,
    pub spike_flag: bool,
    pub fetched_at: DateTime<Utc>,
}

impl PriceTick {
    /// Absolute price move since previous close, when known.
    pub fn abs_diff_from_close(&self) -> Option<f64> {
        self.prev_close.map(|close| (self.price - close).abs())
    }
}

/// Maritime security advisory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SecurityAlert {
    pub id: i64,
    pub title: String,
    pub threat_level: SecurityThreatLevel,
    pub source: String,
    pub region: Option<String>,
    pub affects_chokepoint: bool,
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl SecurityAlert {
    /// Timestamp used for "new since" comparisons: published when known,
    /// otherwise ingestion time.
    pub fn effective_at(&self) -> DateTime<Utc> {
        self.published_at.unwrap_or(self.created_at)
    }
}

/// Advisory severity as classified by the issuing source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SecurityThreatLevel {
    Critical,
    Substantial,
    Other,
}

impl SecurityThreatLevel {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Critical => "critical",
            Self::Substantial => "substantial",
            Self::Other => "other",
        }
    }
}

impl std::str::FromStr for SecurityThreatLevel {
    type Err = std::convert::Infallible;

    /// Unknown levels collapse to `Other`; upstream sources use a long tail
    /// of labels and only critical/substantial carry scoring weight.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "critical" => Self::Critical,
            "substantial" => Self::Substantial,
            _ => Self::Other,
        })
    }
}

/// Tagged news feed item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsItem {
    pub id: i64,
    pub title: String,
    pub source_name: String,
    pub severity: NewsSeverity,
    pub category: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
    pub fetched_at: DateTime<Utc>,
}

impl NewsItem {
    pub fn effective_at(&self) -> DateTime<Utc> {
        self.published_at.unwrap_or(self.fetched_at)
    }

    /// Categories that speak directly to chokepoint transit risk.
    pub fn is_chokepoint_category(&self) -> bool {
        matches!(
            self.category.as_deref(),
            Some("chokepoint_shipping" | "insurance_maritime")
        )
    }
}

/// News severity assigned by the upstream tagger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NewsSeverity {
    Critical,
    High,
    Medium,
    Low,
}

impl NewsSeverity {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Critical => "critical",
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

impl std::str::FromStr for NewsSeverity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "critical" => Ok(Self::Critical),
            "high" => Ok(Self::High),
            "medium" => Ok(Self::Medium),
            "low" => Ok(Self::Low),
            other => Err(format!("unknown news severity: {other}")),
        }
    }
}

/// Named shipping-market indicator observation (e.g. the insurance-risk
/// proxy score). Compared consecutive-pair to detect jumps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShippingIndicator {
    pub indicator_type: String,
    pub value: f64,
    pub fetched_at: DateTime<Utc>,
}

/// Geolocated incident marker shown on the upstream map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapEvent {
    pub id: i64,
    pub event_type: String,
    pub title: String,
    pub severity: String,
    pub location_name: Option<String>,
    pub event_date: DateTime<Utc>,
}

impl MapEvent {
    pub fn is_critical(&self) -> bool {
        self.severity == "critical"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn security_threat_level_unknown_collapses_to_other() {
        let level: SecurityThreatLevel = "moderate".parse().unwrap();
        assert_eq!(level, SecurityThreatLevel::Other);
    }

    #[test]
    fn news_severity_rejects_unknown() {
        assert!("urgent".parse::<NewsSeverity>().is_err());
        assert_eq!("critical".parse::<NewsSeverity>(), Ok(NewsSeverity::Critical));
    }

    #[test]
    fn chokepoint_category_match() {
        let mut item = NewsItem {
            id: 1,
            title: "Tanker reroutes".into(),
            source_name: "wire".into(),
            severity: NewsSeverity::Medium,
            category: Some("chokepoint_shipping".into()),
            published_at: None,
            fetched_at: Utc::now(),
        };
        assert!(item.is_chokepoint_category());
        item.category = Some("energy_markets".into());
        assert!(!item.is_chokepoint_category());
    }
}
