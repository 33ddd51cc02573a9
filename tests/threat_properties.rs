//! Property tests for the threat scorer.

use chrono::Utc;
use proptest::prelude::*;
use straitwatch::domain::models::{PeriodType, PriceTick, ThreatLevel, TrafficSnapshot};
use straitwatch::services::threat_scorer::{score_price, score_traffic};

fn snapshot(total: i64, u_turns: i64, dark: i64, stopped: i64) -> TrafficSnapshot {
    TrafficSnapshot {
        zone: "strait".to_string(),
        period_type: PeriodType::Hourly,
        total_vessels: total,
        tanker_count: 0,
        stopped_count: stopped,
        u_turn_count: u_turns,
        dark_vessel_count: dark,
        period_start: Utc::now(),
    }
}

fn tick(change_pct: f64, spike: bool) -> PriceTick {
    PriceTick {
        benchmark: "brent".to_string(),
        price: 90.0,
        prev_close: None,
        change_pct: Some(change_pct),
        change_30m_pct: None,
        change_1h_pct: None,
        spike_flag: spike,
        fetched_at: Utc::now(),
    }
}

proptest! {
    /// More u-turns never lower the traffic score, other inputs fixed.
    #[test]
    fn traffic_monotonic_in_u_turns(
        total in 0_i64..300,
        dark in 0_i64..30,
        stopped in 0_i64..30,
        low in 0_i64..20,
        bump in 0_i64..20,
    ) {
        let a = score_traffic(Some(&snapshot(total, low, dark, stopped)));
        let b = score_traffic(Some(&snapshot(total, low + bump, dark, stopped)));
        prop_assert!(b >= a);
    }

    /// Fewer vessels never lower the traffic score.
    #[test]
    fn traffic_monotonic_in_vessel_drop(
        total in 0_i64..300,
        cut in 0_i64..100,
    ) {
        let a = score_traffic(Some(&snapshot(total, 0, 0, 0)));
        let b = score_traffic(Some(&snapshot((total - cut).max(0), 0, 0, 0)));
        prop_assert!(b >= a);
    }

    /// A larger absolute price move never lowers the price score, and the
    /// spike flag always adds exactly 2 on top of the tier.
    #[test]
    fn price_monotonic_and_spike_additive(
        pct in -30.0_f64..30.0,
        growth in 0.0_f64..20.0,
    ) {
        let grown = if pct >= 0.0 { pct + growth } else { pct - growth };
        let a = score_price(&[tick(pct, false)]);
        let b = score_price(&[tick(grown, false)]);
        prop_assert!(b >= a);
        prop_assert_eq!(score_price(&[tick(pct, true)]), a + 2);
    }

    /// The score→level mapping never moves down as the score moves up.
    #[test]
    fn level_monotonic_in_score(score in 0_u32..40, bump in 0_u32..10) {
        prop_assert!(ThreatLevel::from_score(score + bump) >= ThreatLevel::from_score(score));
    }
}

#[test]
fn exact_level_boundaries() {
    assert_eq!(ThreatLevel::from_score(2), ThreatLevel::Low);
    assert_eq!(ThreatLevel::from_score(3), ThreatLevel::Elevated);
    assert_eq!(ThreatLevel::from_score(11), ThreatLevel::High);
    assert_eq!(ThreatLevel::from_score(12), ThreatLevel::Critical);
}
