//! Composite threat scoring.
//!
//! Additive tiered scoring over four signal categories. Saturating per
//! category, never globally capped: one extreme signal alone cannot reach
//! CRITICAL, correlated confirmation across categories is required. A
//! missing signal source contributes zero.

use crate::domain::models::{
    NewsItem, NewsSeverity, PriceTick, SecurityAlert, SecurityThreatLevel, ThreatScore,
    TrafficSnapshot,
};
use crate::domain::ports::errors::StoreError;
use crate::domain::ports::SignalStore;
use chrono::{Duration, Utc};
use std::sync::Arc;
use tracing::debug;

/// Traffic category: up to 3 for depressed total count, up to 3 for
/// u-turns, up to 2 each for dark and stopped vessels.
pub fn score_traffic(latest: Option<&TrafficSnapshot>) -> u32 {
    let Some(snapshot) = latest else { return 0 };
    let mut score = 0;

    score += match snapshot.total_vessels {
        v if v < 50 => 3,
        v if v < 80 => 2,
        v if v < 100 => 1,
        _ => 0,
    };
    score += match snapshot.u_turn_count {
        n if n >= 5 => 3,
        n if n >= 3 => 2,
        n if n >= 1 => 1,
        _ => 0,
    };
    score += match snapshot.dark_vessel_count {
        n if n >= 10 => 2,
        n if n >= 5 => 1,
        _ => 0,
    };
    score += match snapshot.stopped_count {
        n if n >= 10 => 2,
        n if n >= 5 => 1,
        _ => 0,
    };
    score
}

/// Price category: tiered on the largest absolute daily move across
/// benchmarks, plus 2 when any tick carries the upstream spike flag.
pub fn score_price(ticks: &[PriceTick]) -> u32 {
    let mut score = 0;

    let max_move = ticks
        .iter()
        .filter_map(|t| t.change_pct)
        .map(f64::abs)
        .fold(0.0_f64, f64::max);
    score += if max_move >= 15.0 {
        3
    } else if max_move >= 10.0 {
        2
    } else if max_move >= 5.0 {
        1
    } else {
        0
    };

    if ticks.iter().any(|t| t.spike_flag) {
        score += 2;
    }
    score
}

/// Security category: critical and substantial levels both count, plus a
/// bonus for chokepoint-flagged alerts.
pub fn score_security(alerts: &[SecurityAlert]) -> u32 {
    let mut score = 0;

    if alerts
        .iter()
        .any(|a| a.threat_level == SecurityThreatLevel::Critical)
    {
        score += 3;
    }
    if alerts
        .iter()
        .any(|a| a.threat_level == SecurityThreatLevel::Substantial)
    {
        score += 2;
    }

    let chokepoint = alerts.iter().filter(|a| a.affects_chokepoint).count();
    score += match chokepoint {
        n if n >= 3 => 2,
        n if n >= 1 => 1,
        _ => 0,
    };
    score
}

/// News category: critical-count tiers are mutually exclusive (take the
/// higher), high volume and chokepoint categories add on top.
pub fn score_news(items: &[NewsItem]) -> u32 {
    let mut score = 0;

    let critical = items
        .iter()
        .filter(|n| n.severity == NewsSeverity::Critical)
        .count();
    score += match critical {
        n if n >= 3 => 3,
        n if n >= 1 => 2,
        _ => 0,
    };

    let high = items
        .iter()
        .filter(|n| n.severity == NewsSeverity::High)
        .count();
    if high >= 5 {
        score += 1;
    }

    let chokepoint = items.iter().filter(|n| n.is_chokepoint_category()).count();
    score += match chokepoint {
        n if n >= 3 => 2,
        n if n >= 1 => 1,
        _ => 0,
    };
    score
}

/// Score a full signal snapshot.
pub fn compute_score(
    traffic: Option<&TrafficSnapshot>,
    ticks: &[PriceTick],
    alerts: &[SecurityAlert],
    news: &[NewsItem],
) -> ThreatScore {
    ThreatScore {
        traffic: score_traffic(traffic),
        price: score_price(ticks),
        security: score_security(alerts),
        news: score_news(news),
    }
}

/// Fetches the current signal snapshot and scores it.
pub struct ThreatScorer {
    store: Arc<dyn SignalStore>,
    zone: String,
}

impl ThreatScorer {
    pub fn new(store: Arc<dyn SignalStore>, zone: impl Into<String>) -> Self {
        Self {
            store,
            zone: zone.into(),
        }
    }

    /// Current composite score: latest hourly traffic, latest tick per
    /// benchmark, 24 h of security alerts, 6 h of news.
    pub async fn assess(&self) -> Result<ThreatScore, StoreError> {
        let now = Utc::now();
        let (traffic, ticks, alerts, news) = tokio::try_join!(
            self.store.recent_hourly_traffic(&self.zone, 1),
            self.store.latest_price_ticks(),
            self.store
                .security_alerts_since(now - Duration::hours(24), None),
            self.store.news_since(now - Duration::hours(6), None),
        )?;

        let score = compute_score(traffic.first(), &ticks, &alerts, &news);
        debug!(
            traffic = score.traffic,
            price = score.price,
            security = score.security,
            news = score.news,
            total = score.total(),
            level = %score.level(),
            "threat score computed"
        );
        Ok(score)
    }
}
