//! Target Marketing Module
//!
//! Batch classification of company records into four marketing-priority
//! tiers. Each record's estimated revenue is the product of three weighted
//! lookups (industry, entry type, investment type); the tier follows from
//! fixed inclusive thresholds.
//!
//! Flow (see `pipeline`):
//! 1. `store`: fetch records per city from a `CompanySource`
//! 2. `analysis`: score every record, aggregate per industry, bucket by tier
//! 3. `output`: one JSON report plus one CSV per city

pub mod record;
pub mod weights;
pub mod tier;
pub mod scoring;
pub mod analysis;
pub mod store;
pub mod output;
pub mod pipeline;

pub use record::{CompanyRecord, ScoredCompany, UNCLASSIFIED};
pub use weights::{IndustryWeight, WeightTableError, WeightTables};
pub use tier::{Tier, TierThresholds};
pub use scoring::{classify, estimate_revenue};
pub use analysis::{CityAnalysis, IndustrySummary, TierBuckets};
pub use store::{CityFilter, CompanySource, InMemorySource, JsonFileSource, StoreError, SupabaseSource};
pub use output::{AnalysisReport, OutputError};
pub use pipeline::{CityRunSummary, PipelineError, RunOutcome, RunSummary, TargetMarketingPipeline};
