//! Shared fixtures: seeded in-memory database, recording notifier, and a
//! stub analyzer.

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use sqlx::SqlitePool;
use std::sync::Mutex;

use straitwatch::domain::models::{
    AnalysisResponse, CollectedData, ScenarioState,
};
use straitwatch::domain::ports::errors::{AnalyzerError, NotifyError};
use straitwatch::domain::ports::{Notifier, ScenarioAnalyzer};
use straitwatch::infrastructure::database::utils::format_datetime;
use straitwatch::infrastructure::database::DatabaseConnection;

/// Fresh in-memory database with the full schema applied. Single
/// connection: a second `:memory:` connection would be a different db.
pub async fn memory_db() -> DatabaseConnection {
    let db = DatabaseConnection::new("sqlite::memory:", 1)
        .await
        .expect("open in-memory database");
    db.migrate().await.expect("apply migrations");
    db
}

pub async fn seed_hourly_traffic(
    pool: &SqlitePool,
    zone: &str,
    totals: &[i64],
    dark_counts: &[i64],
) {
    // totals[0] is the most recent hour
    let now = Utc::now();
    for (i, total) in totals.iter().enumerate() {
        let dark = dark_counts.get(i).copied().unwrap_or(0);
        sqlx::query(
            "INSERT INTO traffic_summary \
                 (zone, period_type, total_vessels, tanker_count, stopped_count, \
                  u_turn_count, dark_vessel_count, period_start) \
             VALUES (?1, 'hourly', ?2, 40, 0, 0, ?3, ?4)",
        )
        .bind(zone)
        .bind(total)
        .bind(dark)
        .bind(format_datetime(now - Duration::hours(i as i64)))
        .execute(pool)
        .await
        .expect("seed traffic");
    }
}

pub async fn seed_price_tick(
    pool: &SqlitePool,
    benchmark: &str,
    price: f64,
    change_pct: f64,
    change_1h_pct: f64,
    spike: bool,
) {
    sqlx::query(
        "INSERT INTO price_ticks \
             (benchmark, price, prev_close, change_pct, change_30m_pct, change_1h_pct, \
              spike_flag, fetched_at) \
         VALUES (?1, ?2, ?3, ?4, NULL, ?5, ?6, ?7)",
    )
    .bind(benchmark)
    .bind(price)
    .bind(price / (1.0 + change_pct / 100.0))
    .bind(change_pct)
    .bind(change_1h_pct)
    .bind(i64::from(spike))
    .bind(format_datetime(Utc::now()))
    .execute(pool)
    .await
    .expect("seed price tick");
}

pub async fn seed_security_alert(
    pool: &SqlitePool,
    title: &str,
    threat_level: &str,
    affects_chokepoint: bool,
    created_at: DateTime<Utc>,
) {
    sqlx::query(
        "INSERT INTO security_alerts \
             (title, threat_level, source, region, affects_chokepoint, published_at, created_at) \
         VALUES (?1, ?2, 'agency', 'gulf', ?3, ?4, ?4)",
    )
    .bind(title)
    .bind(threat_level)
    .bind(i64::from(affects_chokepoint))
    .bind(format_datetime(created_at))
    .execute(pool)
    .await
    .expect("seed security alert");
}

pub async fn seed_news(
    pool: &SqlitePool,
    title: &str,
    severity: &str,
    category: Option<&str>,
    fetched_at: DateTime<Utc>,
) {
    sqlx::query(
        "INSERT INTO news_items \
             (title, source_name, severity, category, published_at, fetched_at) \
         VALUES (?1, 'wire', ?2, ?3, ?4, ?4)",
    )
    .bind(title)
    .bind(severity)
    .bind(category)
    .bind(format_datetime(fetched_at))
    .execute(pool)
    .await
    .expect("seed news");
}

pub async fn seed_indicator(pool: &SqlitePool, value: f64, fetched_at: DateTime<Utc>) {
    sqlx::query(
        "INSERT INTO shipping_indicators (indicator_type, value, fetched_at) \
         VALUES ('insurance_risk_score', ?1, ?2)",
    )
    .bind(value)
    .bind(format_datetime(fetched_at))
    .execute(pool)
    .await
    .expect("seed indicator");
}

pub async fn seed_u_turns(pool: &SqlitePool, count: usize, recorded_at: DateTime<Utc>) {
    for i in 0..count {
        sqlx::query(
            "INSERT INTO vessel_tracking (mmsi, vessel_name, zone, status, recorded_at) \
             VALUES (?1, ?2, 'strait', 'u_turn', ?3)",
        )
        .bind(format!("36600{i}"))
        .bind(format!("Vessel {i}"))
        .bind(format_datetime(recorded_at))
        .execute(pool)
        .await
        .expect("seed u-turn");
    }
}

/// Notifier that records every send and can fail selected destinations.
#[derive(Default)]
pub struct RecordingNotifier {
    pub fail_destinations: Vec<String>,
    pub sent: Mutex<Vec<(String, String)>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self {
            fail_destinations: vec![],
            sent: Mutex::new(vec![]),
        }
    }

    pub fn failing_on(destination: &str) -> Self {
        Self {
            fail_destinations: vec![destination.to_string()],
            sent: Mutex::new(vec![]),
        }
    }

    pub fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send(&self, destination: &str, text: &str) -> Result<(), NotifyError> {
        if self.fail_destinations.iter().any(|d| d == destination) {
            return Err(NotifyError::SendFailed {
                destination: destination.to_string(),
                reason: "simulated network failure".to_string(),
            });
        }
        self.sent
            .lock()
            .unwrap()
            .push((destination.to_string(), text.to_string()));
        Ok(())
    }
}

/// Analyzer stub returning a canned response (or failure).
pub struct StubAnalyzer {
    pub response: Result<AnalysisResponse, String>,
}

#[async_trait]
impl ScenarioAnalyzer for StubAnalyzer {
    async fn analyze(
        &self,
        _current_state: Option<&ScenarioState>,
        _data: &CollectedData,
    ) -> Result<AnalysisResponse, AnalyzerError> {
        self.response
            .clone()
            .map_err(AnalyzerError::MalformedResponse)
    }
}
