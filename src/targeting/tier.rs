//! Marketing-priority tiers.

use serde::{Deserialize, Serialize};

/// Four ordered, mutually exclusive tiers (highest first).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Premium,
    High,
    Medium,
    Standard,
}

impl Tier {
    pub const ALL: [Tier; 4] = [Tier::Premium, Tier::High, Tier::Medium, Tier::Standard];

    pub fn key(&self) -> &'static str {
        match self {
            Tier::Premium => "premium",
            Tier::High => "high",
            Tier::Medium => "medium",
            Tier::Standard => "standard",
        }
    }

    /// Label used in the CSV `타겟등급` column.
    pub fn display_name(&self) -> &'static str {
        match self {
            Tier::Premium => "프리미엄",
            Tier::High => "고가치",
            Tier::Medium => "중간",
            Tier::Standard => "표준",
        }
    }

    /// Inclusive lower bounds; anything below `medium` is standard.
    pub fn from_revenue(revenue: u64, thresholds: &TierThresholds) -> Tier {
        if revenue >= thresholds.premium {
            Tier::Premium
        } else if revenue >= thresholds.high {
            Tier::High
        } else if revenue >= thresholds.medium {
            Tier::Medium
        } else {
            Tier::Standard
        }
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// Minimum estimated revenue (KRW) for each tier above standard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierThresholds {
    pub premium: u64,
    pub high: u64,
    pub medium: u64,
}

impl Default for TierThresholds {
    fn default() -> Self {
        Self {
            premium: 100_000_000,
            high: 50_000_000,
            medium: 20_000_000,
        }
    }
}

impl TierThresholds {
    pub fn is_descending(&self) -> bool {
        self.premium > self.high && self.high > self.medium && self.medium > 0
    }
}
