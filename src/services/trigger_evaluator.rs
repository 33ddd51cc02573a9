//! Alert trigger evaluation.
//!
//! Eight independent checks, each reading a narrow signal slice and
//! deciding fire / no-fire. The checks run concurrently; a failure inside
//! one check is logged and read as "no fire" so it can never block the
//! other seven. Cooldown is consulted only after a condition holds.

use crate::domain::models::{AlertLevel, TriggerKind, TriggerOutcome};
use crate::domain::ports::errors::StoreError;
use crate::domain::ports::{AlertLedger, SignalStore};
use chrono::{Duration, Utc};
use futures::future::join_all;
use std::sync::Arc;
use tracing::{debug, warn};

/// Baseline window for traffic comparisons, in hourly points.
const TRAFFIC_WINDOW: i64 = 25;

/// Named indicator used by the insurance trigger.
const INSURANCE_INDICATOR: &str = "insurance_risk_score";

/// Runs all eight trigger checks against the signal store and ledger.
pub struct TriggerEvaluator {
    store: Arc<dyn SignalStore>,
    ledger: Arc<dyn AlertLedger>,
    zone: String,
}

impl TriggerEvaluator {
    pub fn new(store: Arc<dyn SignalStore>, ledger: Arc<dyn AlertLedger>, zone: impl Into<String>) -> Self {
        Self {
            store,
            ledger,
            zone: zone.into(),
        }
    }

    /// Evaluate all eight triggers concurrently. Always returns eight
    /// outcomes, one per kind, in table order.
    pub async fn evaluate(&self) -> Vec<TriggerOutcome> {
        join_all(TriggerKind::ALL.map(|kind| self.evaluate_one(kind))).await
    }

    async fn evaluate_one(&self, kind: TriggerKind) -> TriggerOutcome {
        let decision = match self.check(kind).await {
            Ok(decision) => decision,
            Err(e) => {
                warn!(trigger = %kind, error = %e, "trigger check failed, treating as no-fire");
                return TriggerOutcome::quiet(kind);
            }
        };

        let Some((level, message)) = decision else {
            return TriggerOutcome::quiet(kind);
        };

        let window_start = Utc::now() - kind.config().cooldown();
        match self.ledger.in_cooldown(kind, window_start).await {
            Ok(true) => {
                debug!(trigger = %kind, "condition met but inside cooldown window");
                TriggerOutcome::suppressed(kind)
            }
            Ok(false) => TriggerOutcome::fired_at(kind, level, message),
            Err(e) => {
                warn!(trigger = %kind, error = %e, "cooldown lookup failed, treating as no-fire");
                TriggerOutcome::quiet(kind)
            }
        }
    }

    /// One condition check. `Some((level, message))` means the condition
    /// holds; cooldown has not been consulted yet.
    async fn check(&self, kind: TriggerKind) -> Result<Option<(AlertLevel, String)>, StoreError> {
        match kind {
            TriggerKind::TrafficDrop => self.check_traffic_drop().await,
            TriggerKind::OilSpike => self.check_oil_spike().await,
            TriggerKind::VesselUTurn => self.check_vessel_u_turn().await,
            TriggerKind::DarkVesselSurge => self.check_dark_vessel_surge().await,
            TriggerKind::SecurityAlertNew => self.check_security_alert_new().await,
            TriggerKind::WarNewsCritical => self.check_war_news_critical().await,
            TriggerKind::InsuranceIndicator => self.check_insurance_indicator().await,
            TriggerKind::ScheduledStatus => self.build_status_report().await,
        }
    }

    /// Latest hourly total below half the trailing average.
    async fn check_traffic_drop(&self) -> Result<Option<(AlertLevel, String)>, StoreError> {
        let rows = self
            .store
            .recent_hourly_traffic(&self.zone, TRAFFIC_WINDOW)
            .await?;
        if rows.len() < 2 {
            return Ok(None);
        }

        let latest = &rows[0];
        #[allow(clippy::cast_precision_loss)]
        let baseline = rows[1..]
            .iter()
            .map(|r| r.total_vessels as f64)
            .sum::<f64>()
            / (rows.len() - 1) as f64;

        #[allow(clippy::cast_precision_loss)]
        let current = latest.total_vessels as f64;
        if baseline <= 0.0 || current >= 0.5 * baseline {
            return Ok(None);
        }

        let pct = current / baseline * 100.0;
        let message = format!(
            "\u{1f6a8} <b>Traffic drop</b>\n\
             Vessels in the strait: {} (trailing avg {:.0})\n\
             Currently at {:.0}% of normal levels.",
            latest.total_vessels, baseline, pct
        );
        Ok(Some((TriggerKind::TrafficDrop.config().level, message)))
    }

    /// Any benchmark carrying the upstream spike flag. Upgraded to
    /// critical on a >10% hourly move or a >$10 absolute jump.
    async fn check_oil_spike(&self) -> Result<Option<(AlertLevel, String)>, StoreError> {
        let ticks = self.store.latest_price_ticks().await?;
        let Some(spiking) = ticks.iter().find(|t| t.spike_flag) else {
            return Ok(None);
        };

        let move_1h = spiking.change_1h_pct.unwrap_or(0.0);
        let abs_diff = spiking.abs_diff_from_close().unwrap_or(0.0);
        let level = if move_1h.abs() > 10.0 || abs_diff > 10.0 {
            AlertLevel::Critical
        } else {
            TriggerKind::OilSpike.config().level
        };

        let message = format!(
            "\u{26a0} <b>Oil price spike</b>\n\
             {} at ${:.2} ({:+.1}% today, {:+.1}% last hour)",
            spiking.benchmark.to_uppercase(),
            spiking.price,
            spiking.change_pct.unwrap_or(0.0),
            move_1h
        );
        Ok(Some((level, message)))
    }

    /// Three or more u-turn statuses logged in the last hour.
    async fn check_vessel_u_turn(&self) -> Result<Option<(AlertLevel, String)>, StoreError> {
        let since = Utc::now() - Duration::hours(1);
        let count = self.store.vessel_status_count("u_turn", since).await?;
        if count < 3 {
            return Ok(None);
        }

        let names = self.store.vessel_status_names("u_turn", since, 5).await?;
        let message = format!(
            "\u{26a0} <b>Vessel U-turns</b>\n\
             {count} vessels reversed course in the last hour: {}",
            names.join(", ")
        );
        Ok(Some((TriggerKind::VesselUTurn.config().level, message)))
    }

    /// Latest hourly dark-vessel count more than double the trailing
    /// baseline; a zero baseline never fires.
    async fn check_dark_vessel_surge(&self) -> Result<Option<(AlertLevel, String)>, StoreError> {
        let rows = self
            .store
            .recent_hourly_traffic(&self.zone, TRAFFIC_WINDOW)
            .await?;
        if rows.len() < 2 {
            return Ok(None);
        }

        let latest = &rows[0];
        #[allow(clippy::cast_precision_loss)]
        let baseline = rows[1..]
            .iter()
            .map(|r| r.dark_vessel_count as f64)
            .sum::<f64>()
            / (rows.len() - 1) as f64;

        #[allow(clippy::cast_precision_loss)]
        let current = latest.dark_vessel_count as f64;
        if baseline <= 0.0 || current <= 2.0 * baseline {
            return Ok(None);
        }

        let message = format!(
            "\u{26a0} <b>Dark vessel surge</b>\n\
             {} vessels without transponder signal (baseline {:.1})",
            latest.dark_vessel_count, baseline
        );
        Ok(Some((TriggerKind::DarkVesselSurge.config().level, message)))
    }

    /// New critical security alert inside the last hour.
    async fn check_security_alert_new(&self) -> Result<Option<(AlertLevel, String)>, StoreError> {
        let since = Utc::now() - Duration::hours(1);
        let alerts = self
            .store
            .security_alerts_since(since, Some("critical"))
            .await?;
        let Some(newest) = alerts.first() else {
            return Ok(None);
        };

        let message = format!(
            "\u{1f6a8} <b>New security alert</b>\n\
             {} ({})\n\
             {} critical alert(s) in the last hour.",
            newest.title,
            newest.source,
            alerts.len()
        );
        Ok(Some((TriggerKind::SecurityAlertNew.config().level, message)))
    }

    /// Critical-severity news inside the last 30 minutes.
    async fn check_war_news_critical(&self) -> Result<Option<(AlertLevel, String)>, StoreError> {
        let since = Utc::now() - Duration::minutes(30);
        let items = self
            .store
            .news_since(since, Some(crate::domain::models::NewsSeverity::Critical))
            .await?;
        let Some(newest) = items.first() else {
            return Ok(None);
        };

        let message = format!(
            "\u{26a0} <b>Critical news</b>\n\
             {} \u{2014} {}\n\
             {} critical item(s) in the last 30 minutes.",
            newest.title,
            newest.source_name,
            items.len()
        );
        Ok(Some((TriggerKind::WarNewsCritical.config().level, message)))
    }

    /// Consecutive-pair jump of at least 2 points in the insurance risk
    /// proxy, in either direction.
    async fn check_insurance_indicator(&self) -> Result<Option<(AlertLevel, String)>, StoreError> {
        let pair = self.store.indicator_pair(INSURANCE_INDICATOR).await?;
        if pair.len() < 2 {
            return Ok(None);
        }

        let current = pair[0].value;
        let previous = pair[1].value;
        let delta = current - previous;
        if delta.abs() < 2.0 {
            return Ok(None);
        }

        let direction = if delta > 0.0 { "up" } else { "down" };
        let message = format!(
            "\u{26a0} <b>Insurance risk shift</b>\n\
             Risk score {direction} {:.1} points: {previous:.1} \u{2192} {current:.1}",
            delta.abs()
        );
        Ok(Some((
            TriggerKind::InsuranceIndicator.config().level,
            message,
        )))
    }

    /// Heartbeat rollup of the last 6 hours. Always eligible; the 360 min
    /// cooldown turns it into the periodic cadence.
    async fn build_status_report(&self) -> Result<Option<(AlertLevel, String)>, StoreError> {
        let now = Utc::now();
        let since = now - Duration::hours(6);

        let (traffic, ticks, critical_alerts, news) = tokio::try_join!(
            self.store.recent_hourly_traffic(&self.zone, 1),
            self.store.latest_price_ticks(),
            self.store.security_alerts_since(since, Some("critical")),
            self.store.news_since(since, None),
        )?;

        let traffic_line = traffic.first().map_or_else(
            || "no data".to_string(),
            |t| {
                format!(
                    "{} vessels ({} tankers, {} dark)",
                    t.total_vessels, t.tanker_count, t.dark_vessel_count
                )
            },
        );

        let price_lines: Vec<String> = ticks
            .iter()
            .map(|t| {
                format!(
                    "{}: ${:.2} ({:+.1}%)",
                    t.benchmark.to_uppercase(),
                    t.price,
                    t.change_pct.unwrap_or(0.0)
                )
            })
            .collect();

        let critical_news = news
            .iter()
            .filter(|n| n.severity == crate::domain::models::NewsSeverity::Critical)
            .count();
        let high_news = news
            .iter()
            .filter(|n| n.severity == crate::domain::models::NewsSeverity::High)
            .count();

        let message = format!(
            "\u{1f4ca} <b>Strait status</b>\n\
             Traffic: {traffic_line}\n\
             Oil: {}\n\
             Security: {} critical alert(s) in 6h\n\
             News: {critical_news} critical / {high_news} high in 6h",
            if price_lines.is_empty() {
                "no data".to_string()
            } else {
                price_lines.join(" | ")
            },
            critical_alerts.len()
        );
        Ok(Some((TriggerKind::ScheduledStatus.config().level, message)))
    }
}
