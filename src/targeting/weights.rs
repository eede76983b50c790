//! Revenue Weight Tables
//!
//! Three categorical lookups feed the revenue estimate:
//! - industries: base revenue (KRW) plus a multiplier
//! - entry types: multiplier (생산법인, 판매법인, ...)
//! - investment types: multiplier (단독투자, 합작투자, ...)
//!
//! The tables are business heuristics kept as data (`data/tier_weights.json`,
//! embedded below). Every table carries a `미분류` row, used for records whose
//! label is absent. A label the industry table does not know also gets the
//! `미분류` row; entry and investment labels it does not know get the neutral
//! `unknown_weight` (1.0 in the built-in table). Lookups are total.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::record::UNCLASSIFIED;
use super::tier::TierThresholds;

const BUILTIN_WEIGHTS: &str = include_str!("../../data/tier_weights.json");

// Used only if a table somehow lacks its 미분류 row (validated tables never do)
const FALLBACK_INDUSTRY: IndustryWeight = IndustryWeight { base_revenue: 25_000_000.0, weight: 0.7 };

fn default_unknown_weight() -> f64 {
    1.0
}

#[derive(Debug, Error)]
pub enum WeightTableError {
    #[error("failed to read weight table {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse weight table: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("table '{0}' has no '미분류' fallback row")]
    MissingFallback(&'static str),

    #[error("table '{table}' has a non-positive or non-finite weight for '{label}'")]
    InvalidWeight { table: &'static str, label: String },

    #[error("tier thresholds must be strictly descending and positive: {0:?}")]
    Thresholds(TierThresholds),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IndustryWeight {
    pub base_revenue: f64,
    pub weight: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightTables {
    pub industries: BTreeMap<String, IndustryWeight>,
    pub entry_types: BTreeMap<String, f64>,
    pub investment_types: BTreeMap<String, f64>,
    /// Multiplier for entry/investment labels missing from their table
    #[serde(default = "default_unknown_weight")]
    pub unknown_weight: f64,
    #[serde(default)]
    pub thresholds: TierThresholds,
}

impl WeightTables {
    /// The embedded table.
    pub fn builtin() -> Result<Self, WeightTableError> {
        Self::from_json(BUILTIN_WEIGHTS)
    }

    pub fn from_json(json: &str) -> Result<Self, WeightTableError> {
        let tables: WeightTables = serde_json::from_str(json)?;
        tables.validate()?;
        Ok(tables)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, WeightTableError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| WeightTableError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&json)
    }

    pub fn validate(&self) -> Result<(), WeightTableError> {
        if !self.industries.contains_key(UNCLASSIFIED) {
            return Err(WeightTableError::MissingFallback("industries"));
        }
        if !self.entry_types.contains_key(UNCLASSIFIED) {
            return Err(WeightTableError::MissingFallback("entry_types"));
        }
        if !self.investment_types.contains_key(UNCLASSIFIED) {
            return Err(WeightTableError::MissingFallback("investment_types"));
        }

        let valid = |v: f64| v.is_finite() && v > 0.0;
        for (label, w) in &self.industries {
            if !valid(w.base_revenue) || !valid(w.weight) {
                return Err(WeightTableError::InvalidWeight { table: "industries", label: label.clone() });
            }
        }
        for (table, map) in [("entry_types", &self.entry_types), ("investment_types", &self.investment_types)] {
            if let Some((label, _)) = map.iter().find(|(_, w)| !valid(**w)) {
                return Err(WeightTableError::InvalidWeight { table, label: label.clone() });
            }
        }
        if !valid(self.unknown_weight) {
            return Err(WeightTableError::InvalidWeight { table: "unknown_weight", label: String::new() });
        }

        if !self.thresholds.is_descending() {
            return Err(WeightTableError::Thresholds(self.thresholds));
        }
        Ok(())
    }

    /// Industry row for `label`, falling back to `미분류`.
    pub fn industry(&self, label: &str) -> IndustryWeight {
        self.industries
            .get(label)
            .or_else(|| self.industries.get(UNCLASSIFIED))
            .copied()
            .unwrap_or(FALLBACK_INDUSTRY)
    }

    /// Multiplier for `label`; `unknown_weight` when the table lacks it.
    pub fn entry_weight(&self, label: &str) -> f64 {
        self.entry_types.get(label).copied().unwrap_or(self.unknown_weight)
    }

    pub fn investment_weight(&self, label: &str) -> f64 {
        self.investment_types.get(label).copied().unwrap_or(self.unknown_weight)
    }
}
