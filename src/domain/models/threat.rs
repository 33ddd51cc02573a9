//! Composite threat level.

use serde::{Deserialize, Serialize};

/// Four-step composite threat level derived from the additive score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ThreatLevel {
    Low,
    Elevated,
    High,
    Critical,
}

impl ThreatLevel {
    /// Score → level mapping. Boundaries are exact: 12 is the first
    /// CRITICAL score, 7 the first HIGH, 3 the first ELEVATED.
    pub const fn from_score(score: u32) -> Self {
        if score >= 12 {
            Self::Critical
        } else if score >= 7 {
            Self::High
        } else if score >= 3 {
            Self::Elevated
        } else {
            Self::Low
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Elevated => "ELEVATED",
            Self::High => "HIGH",
            Self::Critical => "CRITICAL",
        }
    }
}

impl std::fmt::Display for ThreatLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Composite score with its per-category contributions, for explainability
/// in logs and the `threat` command output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThreatScore {
    pub traffic: u32,
    pub price: u32,
    pub security: u32,
    pub news: u32,
}

impl ThreatScore {
    pub const fn total(&self) -> u32 {
        self.traffic + self.price + self.security + self.news
    }

    pub const fn level(&self) -> ThreatLevel {
        ThreatLevel::from_score(self.total())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_boundaries_are_exact() {
        assert_eq!(ThreatLevel::from_score(0), ThreatLevel::Low);
        assert_eq!(ThreatLevel::from_score(2), ThreatLevel::Low);
        assert_eq!(ThreatLevel::from_score(3), ThreatLevel::Elevated);
        assert_eq!(ThreatLevel::from_score(6), ThreatLevel::Elevated);
        assert_eq!(ThreatLevel::from_score(7), ThreatLevel::High);
        assert_eq!(ThreatLevel::from_score(11), ThreatLevel::High);
        assert_eq!(ThreatLevel::from_score(12), ThreatLevel::Critical);
        assert_eq!(ThreatLevel::from_score(30), ThreatLevel::Critical);
    }

    #[test]
    fn levels_order_by_severity() {
        assert!(ThreatLevel::Critical > ThreatLevel::High);
        assert!(ThreatLevel::High > ThreatLevel::Elevated);
        assert!(ThreatLevel::Elevated > ThreatLevel::Low);
    }
}
