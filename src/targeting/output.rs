//! Output artifacts: one JSON report for all cities, one CSV per city.

use std::path::{Path, PathBuf};

use chrono::{DateTime, SecondsFormat, Utc};
use polars::prelude::*;
use serde::ser::{Serialize, SerializeMap, Serializer};
use thiserror::Error;
use tracing::info;

use super::analysis::{CityAnalysis, IndustrySummary, TierBuckets};
use super::record::{CompanyRecord, ScoredCompany};
use super::tier::Tier;

pub const REPORT_FILE: &str = "target_marketing_analysis.json";

pub const CSV_HEADER: [&str; 12] = [
    "타겟등급",
    "기업명(한국어)",
    "기업명(영어)",
    "업종",
    "진출유형",
    "투자유형",
    "예상매출(원)",
    "도시",
    "주소",
    "전화번호",
    "이메일",
    "홈페이지",
];

#[derive(Debug, Error)]
pub enum OutputError {
    #[error("failed to write {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize report: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to write CSV: {0}")]
    Csv(#[from] PolarsError),
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> OutputError + '_ {
    move |source| OutputError::Io { path: path.display().to_string(), source }
}

pub fn csv_file_name(city_key: &str) -> String {
    format!("{}_targets.csv", city_key)
}

// ============================================================================
// JSON report
// ============================================================================

/// JSON object keyed by city, in the order the cities were analysed.
#[derive(Debug)]
pub struct CityMap<T>(pub Vec<(String, T)>);

impl<T: Serialize> Serialize for CityMap<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (key, value) in &self.0 {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

#[derive(Debug, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CitySummary<'a> {
    pub total_companies: usize,
    pub total_estimated_revenue: u64,
    pub average_revenue: f64,
    pub industry_breakdown: &'a [IndustrySummary],
}

#[derive(Debug, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport<'a> {
    pub timestamp: String,
    pub summary: CityMap<CitySummary<'a>>,
    pub target_marketing: CityMap<TierBuckets<'a>>,
    pub industry_analysis: CityMap<&'a CityAnalysis>,
}

impl<'a> AnalysisReport<'a> {
    pub fn new(analyses: &'a [CityAnalysis], generated_at: DateTime<Utc>) -> Self {
        Self {
            timestamp: generated_at.to_rfc3339_opts(SecondsFormat::Millis, true),
            summary: CityMap(
                analyses
                    .iter()
                    .map(|a| {
                        (
                            a.city_key.clone(),
                            CitySummary {
                                total_companies: a.companies.len(),
                                total_estimated_revenue: a.total_revenue,
                                average_revenue: a.average_revenue,
                                industry_breakdown: &a.industry_breakdown,
                            },
                        )
                    })
                    .collect(),
            ),
            target_marketing: CityMap(analyses.iter().map(|a| (a.city_key.clone(), a.tiers())).collect()),
            industry_analysis: CityMap(analyses.iter().map(|a| (a.city_key.clone(), a)).collect()),
        }
    }
}

/// Write `target_marketing_analysis.json` into `dir`.
pub fn write_json_report(dir: &Path, report: &AnalysisReport<'_>) -> Result<PathBuf, OutputError> {
    let path = dir.join(REPORT_FILE);
    let json = serde_json::to_string_pretty(report)?;
    std::fs::write(&path, json).map_err(io_error(&path))?;
    info!("Wrote {}", path.display());
    Ok(path)
}

// ============================================================================
// CSV
// ============================================================================

/// One row per company in tier order, every cell quoted.
/// Returns the number of data rows written.
pub fn write_tier_csv(path: &Path, tiers: &TierBuckets<'_>) -> Result<usize, OutputError> {
    let rows: Vec<(Tier, &ScoredCompany)> = tiers.rows().collect();
    let text = |f: fn(&CompanyRecord) -> &Option<String>| column(&rows, f);

    let mut df = df!(
        CSV_HEADER[0] => rows.iter().map(|(t, _)| t.display_name()).collect::<Vec<_>>(),
        CSV_HEADER[1] => text(|r| &r.company_name_kr),
        CSV_HEADER[2] => text(|r| &r.company_name_en),
        CSV_HEADER[3] => text(|r| &r.industry_major),
        CSV_HEADER[4] => text(|r| &r.entry_type),
        CSV_HEADER[5] => text(|r| &r.investment_type),
        CSV_HEADER[6] => rows.iter().map(|(_, c)| c.estimated_revenue.to_string()).collect::<Vec<_>>(),
        CSV_HEADER[7] => text(|r| &r.city),
        CSV_HEADER[8] => text(|r| &r.local_address),
        CSV_HEADER[9] => text(|r| &r.phone),
        CSV_HEADER[10] => text(|r| &r.email),
        CSV_HEADER[11] => text(|r| &r.homepage),
    )?;

    let mut file = std::fs::File::create(path).map_err(io_error(path))?;
    CsvWriter::new(&mut file)
        .include_header(true)
        .with_quote_style(QuoteStyle::Always)
        .finish(&mut df)?;

    info!("Wrote {} ({} rows)", path.display(), rows.len());
    Ok(rows.len())
}

/// Raw cell values; absent fields are written as empty strings.
fn column<'r>(rows: &[(Tier, &'r ScoredCompany)], field: fn(&CompanyRecord) -> &Option<String>) -> Vec<&'r str> {
    rows.iter()
        .map(|(_, c)| field(&c.record).as_deref().unwrap_or(""))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::targeting::store::CityFilter;
    use crate::targeting::weights::WeightTables;

    fn analysis(city: CityFilter, industries: &[&str]) -> CityAnalysis {
        let records: Vec<CompanyRecord> = industries
            .iter()
            .map(|i| CompanyRecord {
                company_name_kr: Some(format!("{} 회사", i)),
                industry_major: Some(i.to_string()),
                entry_type: Some("생산법인".into()),
                investment_type: Some("합작투자".into()),
                ..Default::default()
            })
            .collect();
        CityAnalysis::build(&city, &records, &WeightTables::builtin().unwrap())
    }

    #[test]
    fn test_report_keys_follow_city_order() {
        let analyses = vec![
            analysis(CityFilter::mumbai(), &["금융 및 보험업"]),
            analysis(CityFilter::chennai(), &[]),
        ];
        let report = AnalysisReport::new(&analyses, Utc::now());
        let json = serde_json::to_string(&report).unwrap();

        assert!(json.find("\"mumbai\"").unwrap() < json.find("\"chennai\"").unwrap());

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["summary"]["mumbai"]["totalCompanies"], 1);
        assert_eq!(value["summary"]["mumbai"]["totalEstimatedRevenue"], 202_800_000);
        assert_eq!(value["summary"]["chennai"]["averageRevenue"], 0.0);
        assert_eq!(value["targetMarketing"]["mumbai"]["premium"][0]["estimatedRevenue"], 202_800_000);
        assert_eq!(value["targetMarketing"]["mumbai"]["premium"][0]["tier"], "premium");
        assert!(value["industryAnalysis"]["chennai"]["companies"].as_array().unwrap().is_empty());
        assert!(value["timestamp"].as_str().unwrap().ends_with('Z'));
    }

    #[test]
    fn test_industry_breakdown_is_sorted_array_without_companies() {
        let analyses = vec![analysis(
            CityFilter::mumbai(),
            &["숙박 및 음식점업", "금융 및 보험업", "숙박 및 음식점업"],
        )];
        let value = serde_json::to_value(AnalysisReport::new(&analyses, Utc::now())).unwrap();

        let breakdown = value["summary"]["mumbai"]["industryBreakdown"].as_array().unwrap();
        assert_eq!(breakdown.len(), 2);
        assert_eq!(breakdown[0]["industry"], "금융 및 보험업");
        assert_eq!(breakdown[0]["count"], 1);
        assert_eq!(breakdown[0]["totalRevenue"], 202_800_000);
        assert_eq!(breakdown[1]["industry"], "숙박 및 음식점업");
        assert_eq!(breakdown[1]["count"], 2);
        for entry in breakdown {
            assert!(entry.get("companies").is_none());
        }
        assert_eq!(value["industryAnalysis"]["mumbai"]["companies"].as_array().unwrap().len(), 3);
    }

    #[test]
    fn test_csv_header_and_quoting() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(csv_file_name("mumbai"));
        let city = analysis(CityFilter::mumbai(), &["금융 및 보험업", "숙박 및 음식점업"]);

        let written = write_tier_csv(&path, &city.tiers()).unwrap();
        assert_eq!(written, 2);

        let content = std::fs::read_to_string(&path).unwrap();
        let mut lines = content.lines();
        let header = lines.next().unwrap();
        for column in CSV_HEADER {
            assert!(header.contains(column));
        }
        let first = lines.next().unwrap();
        assert!(first.starts_with("\"프리미엄\""));
        assert!(first.contains("\"202800000\""));
        assert_eq!(lines.count(), 1);
    }
}
