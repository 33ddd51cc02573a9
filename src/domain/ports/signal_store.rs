use crate::domain::models::{
    MapEvent, NewsItem, NewsSeverity, PriceTick, SecurityAlert, ShippingIndicator, TrafficSnapshot,
};
use crate::domain::ports::errors::StoreError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Read-only port over the upstream signal tables.
///
/// Every trigger check and the scenario collector read through this trait;
/// tests substitute an in-memory or seeded-SQLite implementation.
#[async_trait]
pub trait SignalStore: Send + Sync {
    /// Most recent hourly traffic snapshots for the zone, newest first.
    /// `limit` ≈ 25 gives the trailing-24h baseline window.
    async fn recent_hourly_traffic(
        &self,
        zone: &str,
        limit: i64,
    ) -> Result<Vec<TrafficSnapshot>, StoreError>;

    /// Count of vessel_tracking rows with the given status since `since`.
    async fn vessel_status_count(
        &self,
        status: &str,
        since: DateTime<Utc>,
    ) -> Result<i64, StoreError>;

    /// Vessel names (or MMSIs) with the given status since `since`, for
    /// message rendering. Bounded by `limit`.
    async fn vessel_status_names(
        &self,
        status: &str,
        since: DateTime<Utc>,
        limit: i64,
    ) -> Result<Vec<String>, StoreError>;

    /// Most recent tick per benchmark.
    async fn latest_price_ticks(&self) -> Result<Vec<PriceTick>, StoreError>;

    /// Security alerts created since `since`, optionally filtered to one
    /// threat level string.
    async fn security_alerts_since(
        &self,
        since: DateTime<Utc>,
        threat_level: Option<&str>,
    ) -> Result<Vec<SecurityAlert>, StoreError>;

    /// Most recent security alerts regardless of age, newest first.
    async fn recent_security_alerts(&self, limit: i64) -> Result<Vec<SecurityAlert>, StoreError>;

    /// News fetched since `since`, optionally filtered to one severity.
    async fn news_since(
        &self,
        since: DateTime<Utc>,
        severity: Option<NewsSeverity>,
    ) -> Result<Vec<NewsItem>, StoreError>;

    /// Most recent news items regardless of age, newest first.
    async fn recent_news(&self, limit: i64) -> Result<Vec<NewsItem>, StoreError>;

    /// Last two observations of a named indicator, newest first.
    async fn indicator_pair(&self, indicator_type: &str)
        -> Result<Vec<ShippingIndicator>, StoreError>;

    /// Active map events, newest first.
    async fn active_map_events(&self, limit: i64) -> Result<Vec<MapEvent>, StoreError>;
}
