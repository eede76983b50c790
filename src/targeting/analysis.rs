//! Per-city aggregation: revenue totals, industry breakdown, tier buckets.

use rustc_hash::FxHashMap;
use serde::Serialize;
use tracing::info;

use super::record::{CompanyRecord, ScoredCompany};
use super::scoring::classify;
use super::store::CityFilter;
use super::tier::Tier;
use super::weights::WeightTables;

/// How many industries are echoed to the log per city.
const LOGGED_INDUSTRIES: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IndustrySummary {
    pub industry: String,
    pub count: usize,
    pub total_revenue: u64,
    pub average_revenue: f64,
}

/// Every record of one city, scored once.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CityAnalysis {
    #[serde(skip)]
    pub city_key: String,
    #[serde(skip)]
    pub display_name: String,
    pub companies: Vec<ScoredCompany>,
    /// Sorted by total revenue, descending; ties by label
    pub industry_breakdown: Vec<IndustrySummary>,
    pub total_revenue: u64,
    /// 0 for a city without records
    pub average_revenue: f64,
}

impl CityAnalysis {
    pub fn build(city: &CityFilter, records: &[CompanyRecord], tables: &WeightTables) -> Self {
        let companies: Vec<ScoredCompany> = records.iter().map(|r| classify(r, tables)).collect();
        let total_revenue: u64 = companies.iter().map(|c| c.estimated_revenue).sum();
        let average_revenue = if companies.is_empty() {
            0.0
        } else {
            total_revenue as f64 / companies.len() as f64
        };

        let mut by_industry: FxHashMap<&str, (usize, u64)> = FxHashMap::default();
        for company in &companies {
            let entry = by_industry.entry(company.record.industry_label()).or_default();
            entry.0 += 1;
            entry.1 += company.estimated_revenue;
        }

        let mut industry_breakdown: Vec<IndustrySummary> = by_industry
            .into_iter()
            .map(|(industry, (count, total))| IndustrySummary {
                industry: industry.to_string(),
                count,
                total_revenue: total,
                average_revenue: total as f64 / count as f64,
            })
            .collect();
        industry_breakdown.sort_by(|a, b| {
            b.total_revenue
                .cmp(&a.total_revenue)
                .then_with(|| a.industry.cmp(&b.industry))
        });

        info!(
            city = %city.key,
            companies = companies.len(),
            total_revenue,
            average_revenue,
            "{} industry analysis",
            city.display_name
        );
        for summary in industry_breakdown.iter().take(LOGGED_INDUSTRIES) {
            info!(
                city = %city.key,
                "  {}: {} companies, {} KRW",
                summary.industry, summary.count, summary.total_revenue
            );
        }

        Self {
            city_key: city.key.clone(),
            display_name: city.display_name.clone(),
            companies,
            industry_breakdown,
            total_revenue,
            average_revenue,
        }
    }

    pub fn tiers(&self) -> TierBuckets<'_> {
        TierBuckets::from_scored(&self.companies)
    }
}

/// Companies grouped by tier, preserving input order within each tier.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TierBuckets<'a> {
    pub premium: Vec<&'a ScoredCompany>,
    pub high: Vec<&'a ScoredCompany>,
    pub medium: Vec<&'a ScoredCompany>,
    pub standard: Vec<&'a ScoredCompany>,
}

impl<'a> TierBuckets<'a> {
    pub fn from_scored(companies: &'a [ScoredCompany]) -> Self {
        let mut buckets = Self::default();
        for company in companies {
            buckets.bucket_mut(company.tier).push(company);
        }
        buckets
    }

    pub fn bucket(&self, tier: Tier) -> &[&'a ScoredCompany] {
        match tier {
            Tier::Premium => &self.premium,
            Tier::High => &self.high,
            Tier::Medium => &self.medium,
            Tier::Standard => &self.standard,
        }
    }

    fn bucket_mut(&mut self, tier: Tier) -> &mut Vec<&'a ScoredCompany> {
        match tier {
            Tier::Premium => &mut self.premium,
            Tier::High => &mut self.high,
            Tier::Medium => &mut self.medium,
            Tier::Standard => &mut self.standard,
        }
    }

    /// Bucket sizes in tier order.
    pub fn counts(&self) -> [(Tier, usize); 4] {
        Tier::ALL.map(|t| (t, self.bucket(t).len()))
    }

    /// Every company in tier order, then input order.
    pub fn rows(&self) -> impl Iterator<Item = (Tier, &'a ScoredCompany)> + '_ {
        Tier::ALL
            .into_iter()
            .flat_map(move |t| self.bucket(t).iter().map(move |c| (t, *c)))
    }

    pub fn len(&self) -> usize {
        self.premium.len() + self.high.len() + self.medium.len() + self.standard.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn log_counts(&self, city: &CityFilter) {
        info!(city = %city.key, "{} target tiers", city.display_name);
        for (tier, count) in self.counts() {
            info!(city = %city.key, "  {}: {}", tier.display_name(), count);
        }
    }
}
