//! Scenario data collection.
//!
//! Builds the delta payload for the reasoning service: everything new
//! since the last completed analysis, plus derived counts. Deliberately
//! free of decision logic; interpretation belongs to the analyzer.

use crate::domain::models::{
    CollectedData, CollectedMapEvent, CollectedNews, CollectedOil, CollectedSecurityAlert,
    CollectedTraffic,
};
use crate::domain::ports::errors::StoreError;
use crate::domain::ports::{ScenarioStore, SignalStore};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::debug;

const NEWS_LIMIT: i64 = 50;
const SECURITY_ALERT_LIMIT: i64 = 10;
const MAP_EVENT_LIMIT: i64 = 20;

/// Aggregates fresh signals into a `CollectedData` payload.
pub struct ScenarioCollector {
    signal_store: Arc<dyn SignalStore>,
    scenario_store: Arc<dyn ScenarioStore>,
    zone: String,
}

impl ScenarioCollector {
    pub fn new(
        signal_store: Arc<dyn SignalStore>,
        scenario_store: Arc<dyn ScenarioStore>,
        zone: impl Into<String>,
    ) -> Self {
        Self {
            signal_store,
            scenario_store,
            zone: zone.into(),
        }
    }

    /// Collect everything published strictly after the last analysis.
    ///
    /// The last-analysis timestamp is read fresh from storage on every run,
    /// never cached, so it stays correct across restarts. With no prior
    /// analysis everything fetched counts as new.
    pub async fn collect(&self) -> Result<CollectedData, StoreError> {
        let now = Utc::now();
        let last_analysis = self.scenario_store.last_analysis_timestamp().await?;
        let since = last_analysis.unwrap_or(DateTime::UNIX_EPOCH);

        let (news, ticks, traffic, security_alerts, map_events) = tokio::try_join!(
            self.signal_store.recent_news(NEWS_LIMIT),
            self.signal_store.latest_price_ticks(),
            self.signal_store.recent_hourly_traffic(&self.zone, 2),
            self.signal_store.recent_security_alerts(SECURITY_ALERT_LIMIT),
            self.signal_store.active_map_events(MAP_EVENT_LIMIT),
        )?;

        let news: Vec<CollectedNews> = news
            .into_iter()
            .filter(|n| n.effective_at() > since)
            .map(|n| CollectedNews {
                id: n.id,
                title: n.title,
                source_name: n.source_name,
                severity: n.severity.as_str().to_string(),
                category: n.category,
                published_at: n.published_at,
            })
            .collect();

        let news_severity_critical = news.iter().filter(|n| n.severity == "critical").count();
        let news_severity_high = news.iter().filter(|n| n.severity == "high").count();

        let brent = ticks.iter().find(|t| t.benchmark == "brent");
        let wti = ticks.iter().find(|t| t.benchmark == "wti");
        let oil = CollectedOil {
            brent_price: brent.map(|t| t.price),
            wti_price: wti.map(|t| t.price),
            brent_change_pct: brent.and_then(|t| t.change_pct),
            wti_change_pct: wti.and_then(|t| t.change_pct),
        };
        // 1h move preferred, daily change as fallback
        let oil_change_1h_pct = brent
            .and_then(|t| t.change_1h_pct.or(t.change_pct))
            .unwrap_or(0.0)
            .abs();

        let traffic_change_1h_pct = match traffic.as_slice() {
            [latest, previous, ..] if previous.total_vessels > 0 => {
                #[allow(clippy::cast_precision_loss)]
                let change = (latest.total_vessels - previous.total_vessels) as f64
                    / previous.total_vessels as f64
                    * 100.0;
                change
            }
            _ => 0.0,
        };
        let traffic = traffic.into_iter().next().map(|t| CollectedTraffic {
            total_vessels: t.total_vessels,
            tanker_count: t.tanker_count,
            stopped_count: t.stopped_count,
            u_turn_count: t.u_turn_count,
            dark_vessel_count: t.dark_vessel_count,
            traffic_change_pct: traffic_change_1h_pct,
        });

        let security_alerts: Vec<CollectedSecurityAlert> = security_alerts
            .into_iter()
            .filter(|a| a.effective_at() > since)
            .map(|a| CollectedSecurityAlert {
                id: a.id,
                title: a.title,
                threat_level: a.threat_level.as_str().to_string(),
                source: a.source,
                affects_chokepoint: a.affects_chokepoint,
            })
            .collect();

        let new_map_events_critical = map_events
            .iter()
            .filter(|e| e.is_critical() && e.event_date > since)
            .count();
        let map_events: Vec<CollectedMapEvent> = map_events
            .into_iter()
            .map(|e| CollectedMapEvent {
                id: e.id,
                event_type: e.event_type,
                title: e.title,
                severity: e.severity,
                location_name: e.location_name,
            })
            .collect();

        let data = CollectedData {
            news_count: news.len(),
            news_severity_critical,
            news_severity_high,
            oil_change_1h_pct,
            traffic_change_1h_pct,
            new_security_alerts: security_alerts.len(),
            new_map_events_critical,
            minutes_since_last_analysis: (now - since).num_minutes(),
            news,
            oil,
            traffic,
            security_alerts,
            map_events,
        };

        debug!(
            news = data.news_count,
            critical = data.news_severity_critical,
            alerts = data.new_security_alerts,
            minutes = data.minutes_since_last_analysis,
            "scenario data collected"
        );
        Ok(data)
    }
}
