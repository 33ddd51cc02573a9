use crate::domain::models::{
    MapEvent, NewsItem, NewsSeverity, PriceTick, SecurityAlert, ShippingIndicator, TrafficSnapshot,
};
use crate::domain::ports::errors::StoreError;
use crate::domain::ports::SignalStore;
use crate::infrastructure::database::utils::{format_datetime, parse_datetime};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

/// SQLite implementation of the read-only signal store.
pub struct SqliteSignalStore {
    pool: SqlitePool,
}

impl SqliteSignalStore {
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_traffic(row: &SqliteRow) -> Result<TrafficSnapshot, StoreError> {
        Ok(TrafficSnapshot {
            zone: row.get("zone"),
            period_type: row
                .get::<String, _>("period_type")
                .parse()
                .map_err(StoreError::InvalidValue)?,
            total_vessels: row.get("total_vessels"),
            tanker_count: row.get("tanker_count"),
            stopped_count: row.get("stopped_count"),
            u_turn_count: row.get("u_turn_count"),
            dark_vessel_count: row.get("dark_vessel_count"),
            period_start: parse_datetime(row.get::<String, _>("period_start").as_str())?,
        })
    }

    fn row_to_tick(row: &SqliteRow) -> Result<PriceTick, StoreError> {
        Ok(PriceTick {
            benchmark: row.get("benchmark"),
            price: row.get("price"),
            prev_close: row.get("prev_close"),
            change_pct: row.get("change_pct"),
            change_30m_pct: row.get("change_30m_pct"),
            change_1h_pct: row.get("change_1h_pct"),
            spike_flag: row.get::<i64, _>("spike_flag") != 0,
            fetched_at: parse_datetime(row.get::<String, _>("fetched_at").as_str())?,
        })
    }

    fn row_to_security_alert(row: &SqliteRow) -> Result<SecurityAlert, StoreError> {
        // Parsing is infallible; unknown labels collapse to Other.
        let threat_level = row
            .get::<String, _>("threat_level")
            .parse()
            .unwrap_or(crate::domain::models::SecurityThreatLevel::Other);
        Ok(SecurityAlert {
            id: row.get("id"),
            title: row.get("title"),
            threat_level,
            source: row.get("source"),
            region: row.get("region"),
            affects_chokepoint: row.get::<i64, _>("affects_chokepoint") != 0,
            published_at: row
                .get::<Option<String>, _>("published_at")
                .as_deref()
                .map(parse_datetime)
                .transpose()?,
            created_at: parse_datetime(row.get::<String, _>("created_at").as_str())?,
        })
    }

    fn row_to_news(row: &SqliteRow) -> Result<NewsItem, StoreError> {
        Ok(NewsItem {
            id: row.get("id"),
            title: row.get("title"),
            source_name: row.get("source_name"),
            severity: row
                .get::<String, _>("severity")
                .parse()
                .map_err(StoreError::InvalidValue)?,
            category: row.get("category"),
            published_at: row
                .get::<Option<String>, _>("published_at")
                .as_deref()
                .map(parse_datetime)
                .transpose()?,
            fetched_at: parse_datetime(row.get::<String, _>("fetched_at").as_str())?,
        })
    }

    fn row_to_map_event(row: &SqliteRow) -> Result<MapEvent, StoreError> {
        Ok(MapEvent {
            id: row.get("id"),
            event_type: row.get("event_type"),
            title: row.get("title"),
            severity: row.get("severity"),
            location_name: row.get("location_name"),
            event_date: parse_datetime(row.get::<String, _>("event_date").as_str())?,
        })
    }
}

#[async_trait]
impl SignalStore for SqliteSignalStore {
    async fn recent_hourly_traffic(
        &self,
        zone: &str,
        limit: i64,
    ) -> Result<Vec<TrafficSnapshot>, StoreError> {
        let rows = sqlx::query(
            "SELECT zone, period_type, total_vessels, tanker_count, stopped_count, \
                    u_turn_count, dark_vessel_count, period_start \
             FROM traffic_summary \
             WHERE zone = ?1 AND period_type = 'hourly' \
             ORDER BY period_start DESC \
             LIMIT ?2",
        )
        .bind(zone)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(Self::row_to_traffic).collect()
    }

    async fn vessel_status_count(
        &self,
        status: &str,
        since: DateTime<Utc>,
    ) -> Result<i64, StoreError> {
        let (count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM vessel_tracking WHERE status = ?1 AND recorded_at >= ?2",
        )
        .bind(status)
        .bind(format_datetime(since))
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    async fn vessel_status_names(
        &self,
        status: &str,
        since: DateTime<Utc>,
        limit: i64,
    ) -> Result<Vec<String>, StoreError> {
        let rows = sqlx::query(
            "SELECT mmsi, vessel_name, zone FROM vessel_tracking \
             WHERE status = ?1 AND recorded_at >= ?2 \
             ORDER BY recorded_at DESC \
             LIMIT ?3",
        )
        .bind(status)
        .bind(format_datetime(since))
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .iter()
            .map(|row| {
                row.get::<Option<String>, _>("vessel_name").map_or_else(
                    || format!("MMSI {}", row.get::<String, _>("mmsi")),
                    |name| format!("{name} ({})", row.get::<String, _>("zone")),
                )
            })
            .collect())
    }

    async fn latest_price_ticks(&self) -> Result<Vec<PriceTick>, StoreError> {
        let rows = sqlx::query(
            "SELECT benchmark, price, prev_close, change_pct, change_30m_pct, \
                    change_1h_pct, spike_flag, fetched_at \
             FROM price_ticks \
             ORDER BY fetched_at DESC \
             LIMIT 10",
        )
        .fetch_all(&self.pool)
        .await?;

        // Newest-first scan, keeping the first tick seen per benchmark.
        let mut seen = std::collections::HashSet::new();
        let mut ticks = Vec::new();
        for row in &rows {
            let tick = Self::row_to_tick(row)?;
            if seen.insert(tick.benchmark.clone()) {
                ticks.push(tick);
            }
        }
        Ok(ticks)
    }

    async fn security_alerts_since(
        &self,
        since: DateTime<Utc>,
        threat_level: Option<&str>,
    ) -> Result<Vec<SecurityAlert>, StoreError> {
        let rows = match threat_level {
            Some(level) => {
                sqlx::query(
                    "SELECT id, title, threat_level, source, region, affects_chokepoint, \
                            published_at, created_at \
                     FROM security_alerts \
                     WHERE created_at >= ?1 AND threat_level = ?2 \
                     ORDER BY created_at DESC",
                )
                .bind(format_datetime(since))
                .bind(level)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query(
                    "SELECT id, title, threat_level, source, region, affects_chokepoint, \
                            published_at, created_at \
                     FROM security_alerts \
                     WHERE created_at >= ?1 \
                     ORDER BY created_at DESC",
                )
                .bind(format_datetime(since))
                .fetch_all(&self.pool)
                .await?
            }
        };

        rows.iter().map(Self::row_to_security_alert).collect()
    }

    async fn recent_security_alerts(&self, limit: i64) -> Result<Vec<SecurityAlert>, StoreError> {
        let rows = sqlx::query(
            "SELECT id, title, threat_level, source, region, affects_chokepoint, \
                    published_at, created_at \
             FROM security_alerts \
             ORDER BY created_at DESC \
             LIMIT ?1",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(Self::row_to_security_alert).collect()
    }

    async fn news_since(
        &self,
        since: DateTime<Utc>,
        severity: Option<NewsSeverity>,
    ) -> Result<Vec<NewsItem>, StoreError> {
        let rows = match severity {
            Some(severity) => {
                sqlx::query(
                    "SELECT id, title, source_name, severity, category, published_at, fetched_at \
                     FROM news_items \
                     WHERE fetched_at >= ?1 AND severity = ?2 \
                     ORDER BY fetched_at DESC",
                )
                .bind(format_datetime(since))
                .bind(severity.as_str())
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query(
                    "SELECT id, title, source_name, severity, category, published_at, fetched_at \
                     FROM news_items \
                     WHERE fetched_at >= ?1 \
                     ORDER BY fetched_at DESC",
                )
                .bind(format_datetime(since))
                .fetch_all(&self.pool)
                .await?
            }
        };

        rows.iter().map(Self::row_to_news).collect()
    }

    async fn recent_news(&self, limit: i64) -> Result<Vec<NewsItem>, StoreError> {
        let rows = sqlx::query(
            "SELECT id, title, source_name, severity, category, published_at, fetched_at \
             FROM news_items \
             ORDER BY fetched_at DESC \
             LIMIT ?1",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(Self::row_to_news).collect()
    }

    async fn indicator_pair(
        &self,
        indicator_type: &str,
    ) -> Result<Vec<ShippingIndicator>, StoreError> {
        let rows = sqlx::query(
            "SELECT indicator_type, value, fetched_at \
             FROM shipping_indicators \
             WHERE indicator_type = ?1 \
             ORDER BY fetched_at DESC \
             LIMIT 2",
        )
        .bind(indicator_type)
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| {
                Ok(ShippingIndicator {
                    indicator_type: row.get("indicator_type"),
                    value: row.get("value"),
                    fetched_at: parse_datetime(row.get::<String, _>("fetched_at").as_str())?,
                })
            })
            .collect()
    }

    async fn active_map_events(&self, limit: i64) -> Result<Vec<MapEvent>, StoreError> {
        let rows = sqlx::query(
            "SELECT id, event_type, title, severity, location_name, event_date \
             FROM map_events \
             WHERE is_active = 1 \
             ORDER BY event_date DESC \
             LIMIT ?1",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(Self::row_to_map_event).collect()
    }
}
