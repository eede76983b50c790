// Target Marketing Binary
//
// Purpose: classify company records per city into four marketing tiers and
// write target_marketing_analysis.json plus one CSV per city.
// Usage: cargo run --bin target_marketing
//
// A failed data store read is logged and ends the run without output
// (exit code 0); configuration or write failures exit with 1.

use std::process::ExitCode;

use strategy_reports::config::{self, RecordSourceConfig, TargetingConfig};
use strategy_reports::logging;
use strategy_reports::targeting::{
    CompanySource, JsonFileSource, RunOutcome, SupabaseSource, TargetMarketingPipeline, WeightTables,
};

fn main() -> ExitCode {
    config::load_dotenv();
    logging::init(logging::CLI_FILTER);

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run() -> anyhow::Result<()> {
    let config = TargetingConfig::from_env()?;

    let tables = match &config.weights_path {
        Some(path) => {
            tracing::info!("Loading weight tables from {}", path.display());
            WeightTables::from_path(path)?
        }
        None => WeightTables::builtin()?,
    };

    let source: Box<dyn CompanySource> = match config.source {
        RecordSourceConfig::Remote(store) => Box::new(SupabaseSource::new(store)?),
        RecordSourceConfig::File(path) => Box::new(JsonFileSource::new(path)),
    };

    let runtime = tokio::runtime::Runtime::new()?;
    let pipeline = TargetMarketingPipeline::new(source, tables, &config.output_dir);

    match runtime.block_on(pipeline.run())? {
        RunOutcome::Completed(summary) => {
            for city in &summary.cities {
                tracing::info!(
                    "{}: {} companies, {} KRW total -> {}",
                    city.city,
                    city.companies,
                    city.total_revenue,
                    city.csv_path.display()
                );
            }
            tracing::info!("Report: {}", summary.report_path.display());
        }
        RunOutcome::Aborted { city, cause } => {
            tracing::warn!("Run aborted while reading {}: {}", city, cause);
        }
    }

    Ok(())
}
