//! Target Marketing Pipeline
//!
//! One run: read every city, analyse, classify, write. Reads happen first
//! so a failed read leaves the output directory untouched.

use std::path::PathBuf;

use chrono::Utc;
use thiserror::Error;
use tracing::{error, info};

use super::analysis::CityAnalysis;
use super::output::{self, csv_file_name, AnalysisReport, OutputError};
use super::record::CompanyRecord;
use super::store::{CityFilter, CompanySource};
use super::weights::{WeightTableError, WeightTables};

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Weights(#[from] WeightTableError),

    #[error(transparent)]
    Output(#[from] OutputError),

    #[error("failed to create output directory {path}: {source}")]
    OutputDir {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Per-city figures of a completed run.
#[derive(Debug, Clone, PartialEq)]
pub struct CityRunSummary {
    pub city: String,
    pub companies: usize,
    pub total_revenue: u64,
    /// Bucket sizes in tier order (premium, high, medium, standard)
    pub tier_counts: [usize; 4],
    pub csv_path: PathBuf,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub report_path: PathBuf,
    pub cities: Vec<CityRunSummary>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    Completed(RunSummary),
    /// A read failed; nothing was written
    Aborted { city: String, cause: String },
}

pub struct TargetMarketingPipeline {
    source: Box<dyn CompanySource>,
    tables: WeightTables,
    cities: Vec<CityFilter>,
    output_dir: PathBuf,
}

impl TargetMarketingPipeline {
    /// Pipeline over the default cities (Mumbai, Chennai).
    pub fn new(source: Box<dyn CompanySource>, tables: WeightTables, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            source,
            tables,
            cities: CityFilter::defaults(),
            output_dir: output_dir.into(),
        }
    }

    pub fn with_cities(mut self, cities: Vec<CityFilter>) -> Self {
        self.cities = cities;
        self
    }

    pub async fn run(&self) -> Result<RunOutcome, PipelineError> {
        info!("Target marketing analysis using {}", self.source.describe());

        // 1. Read every city before touching the filesystem
        let mut fetched: Vec<(&CityFilter, Vec<CompanyRecord>)> = Vec::with_capacity(self.cities.len());
        for city in &self.cities {
            info!(city = %city.key, "Fetching {} companies", city.display_name);
            match self.source.fetch_companies(city).await {
                Ok(records) => fetched.push((city, records)),
                Err(e) => {
                    error!(city = %city.key, error = %e, "Data store read failed; aborting run");
                    return Ok(RunOutcome::Aborted {
                        city: city.key.clone(),
                        cause: e.to_string(),
                    });
                }
            }
        }

        // 2. Analyse + classify
        let analyses: Vec<CityAnalysis> = fetched
            .iter()
            .map(|(city, records)| CityAnalysis::build(city, records, &self.tables))
            .collect();
        for (analysis, (city, _)) in analyses.iter().zip(&fetched) {
            analysis.tiers().log_counts(city);
        }

        // 3. Write
        std::fs::create_dir_all(&self.output_dir).map_err(|source| PipelineError::OutputDir {
            path: self.output_dir.display().to_string(),
            source,
        })?;

        let report = AnalysisReport::new(&analyses, Utc::now());
        let report_path = output::write_json_report(&self.output_dir, &report)?;

        let mut cities = Vec::with_capacity(analyses.len());
        for analysis in &analyses {
            let tiers = analysis.tiers();
            let csv_path = self.output_dir.join(csv_file_name(&analysis.city_key));
            output::write_tier_csv(&csv_path, &tiers)?;

            cities.push(CityRunSummary {
                city: analysis.city_key.clone(),
                companies: analysis.companies.len(),
                total_revenue: analysis.total_revenue,
                tier_counts: tiers.counts().map(|(_, n)| n),
                csv_path,
            });
        }

        info!("Target marketing analysis complete: {}", self.output_dir.display());
        Ok(RunOutcome::Completed(RunSummary { report_path, cities }))
    }
}
