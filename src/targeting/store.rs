//! Company record sources.
//!
//! The hosted store is a PostgREST endpoint (`/rest/v1/{table}`); each city
//! is one filtered read. A local JSON export and an in-memory list implement
//! the same trait for offline runs and tests.

use std::path::PathBuf;

use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, info};

use super::record::CompanyRecord;
use crate::config::DataStoreConfig;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("data store returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode company rows: {0}")]
    Decode(#[from] serde_json::Error),
}

// ============================================================================
// City filters
// ============================================================================

/// Which rows belong to a city: any `city` or `office` column containing
/// one of the patterns (case-insensitive).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CityFilter {
    /// Output key (`mumbai` → `mumbai_targets.csv`)
    pub key: String,
    pub display_name: String,
    pub city_patterns: Vec<String>,
    pub office_patterns: Vec<String>,
}

impl CityFilter {
    pub fn new(key: &str, display_name: &str, city_patterns: &[&str], office_patterns: &[&str]) -> Self {
        Self {
            key: key.to_string(),
            display_name: display_name.to_string(),
            city_patterns: city_patterns.iter().map(|p| p.to_lowercase()).collect(),
            office_patterns: office_patterns.iter().map(|p| p.to_lowercase()).collect(),
        }
    }

    pub fn mumbai() -> Self {
        Self::new("mumbai", "뭄바이", &["mumbai", "bombay"], &["뭄바이"])
    }

    pub fn chennai() -> Self {
        Self::new("chennai", "첸나이", &["chennai", "madras"], &["첸나이"])
    }

    /// Cities analysed by default, in report order.
    pub fn defaults() -> Vec<Self> {
        vec![Self::mumbai(), Self::chennai()]
    }

    pub fn matches(&self, record: &CompanyRecord) -> bool {
        let contains = |value: &Option<String>, patterns: &[String]| {
            value.as_deref().is_some_and(|v| {
                let v = v.to_lowercase();
                patterns.iter().any(|p| v.contains(p.as_str()))
            })
        };
        contains(&record.city, &self.city_patterns) || contains(&record.office, &self.office_patterns)
    }

    /// PostgREST `or` filter, e.g. `(city.ilike.*mumbai*,office.ilike.*뭄바이*)`.
    pub fn postgrest_or(&self) -> String {
        let clauses: Vec<String> = self
            .city_patterns
            .iter()
            .map(|p| format!("city.ilike.*{}*", p))
            .chain(self.office_patterns.iter().map(|p| format!("office.ilike.*{}*", p)))
            .collect();
        format!("({})", clauses.join(","))
    }
}

// ============================================================================
// Sources
// ============================================================================

#[async_trait]
pub trait CompanySource: Send + Sync {
    /// All rows for one city. Called once per city per run.
    async fn fetch_companies(&self, city: &CityFilter) -> Result<Vec<CompanyRecord>, StoreError>;

    /// Short description for logs.
    fn describe(&self) -> String;
}

/// Hosted PostgREST (Supabase) table.
pub struct SupabaseSource {
    client: reqwest::Client,
    config: DataStoreConfig,
}

impl SupabaseSource {
    pub fn new(config: DataStoreConfig) -> Result<Self, StoreError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("strategy-reports/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self::with_client(config, client))
    }

    /// Reuse an existing client (shared pools, custom proxy settings).
    pub fn with_client(config: DataStoreConfig, client: reqwest::Client) -> Self {
        Self { client, config }
    }

    fn endpoint(&self) -> String {
        format!("{}/rest/v1/{}", self.config.url, self.config.table)
    }
}

#[async_trait]
impl CompanySource for SupabaseSource {
    async fn fetch_companies(&self, city: &CityFilter) -> Result<Vec<CompanyRecord>, StoreError> {
        let filter = city.postgrest_or();
        debug!(city = %city.key, filter = %filter, "Querying data store");

        let resp = self
            .client
            .get(self.endpoint())
            .query(&[("select", "*"), ("or", filter.as_str())])
            .header("apikey", &self.config.api_key)
            .bearer_auth(&self.config.api_key)
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(StoreError::Status { status, body });
        }

        let bytes = resp.bytes().await?;
        let records: Vec<CompanyRecord> = serde_json::from_slice(&bytes)?;
        info!(city = %city.key, count = records.len(), "{} companies fetched", city.display_name);
        Ok(records)
    }

    fn describe(&self) -> String {
        format!("data store table '{}' at {}", self.config.table, self.config.url)
    }
}

/// JSON array exported from the `kotra` table; filtered locally.
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl CompanySource for JsonFileSource {
    async fn fetch_companies(&self, city: &CityFilter) -> Result<Vec<CompanyRecord>, StoreError> {
        let bytes = tokio::fs::read(&self.path).await.map_err(|source| StoreError::Io {
            path: self.path.display().to_string(),
            source,
        })?;
        let all: Vec<CompanyRecord> = serde_json::from_slice(&bytes)?;
        let records: Vec<CompanyRecord> = all.into_iter().filter(|r| city.matches(r)).collect();
        info!(city = %city.key, count = records.len(), "{} companies read", city.display_name);
        Ok(records)
    }

    fn describe(&self) -> String {
        format!("JSON export {}", self.path.display())
    }
}

/// Fixed records, filtered per city like the hosted store would.
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    records: Vec<CompanyRecord>,
}

impl InMemorySource {
    pub fn new(records: Vec<CompanyRecord>) -> Self {
        Self { records }
    }
}

#[async_trait]
impl CompanySource for InMemorySource {
    async fn fetch_companies(&self, city: &CityFilter) -> Result<Vec<CompanyRecord>, StoreError> {
        Ok(self.records.iter().filter(|r| city.matches(r)).cloned().collect())
    }

    fn describe(&self) -> String {
        format!("{} in-memory records", self.records.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::{Query, State};
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::get;
    use axum::{Json, Router};
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    type Seen = Arc<Mutex<Vec<(HashMap<String, String>, HeaderMap)>>>;

    async fn kotra_rows(
        State(seen): State<Seen>,
        Query(query): Query<HashMap<String, String>>,
        headers: HeaderMap,
    ) -> Json<serde_json::Value> {
        seen.lock().unwrap().push((query, headers));
        Json(serde_json::json!([
            {"company_name_kr": "가나", "city": "Mumbai", "industry_major": "정보통신업", "kotra_id": 3}
        ]))
    }

    async fn unavailable() -> (StatusCode, &'static str) {
        (StatusCode::SERVICE_UNAVAILABLE, "maintenance")
    }

    async fn garbage() -> &'static str {
        "not json"
    }

    /// Serve `router` on an ephemeral local port; returns its base URL.
    async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn remote(url: &str, table: &str) -> SupabaseSource {
        let config = DataStoreConfig {
            url: url.to_string(),
            api_key: "anon-key".into(),
            table: table.into(),
        };
        let client = reqwest::Client::builder().no_proxy().build().unwrap();
        SupabaseSource::with_client(config, client)
    }

    fn located(city: Option<&str>, office: Option<&str>) -> CompanyRecord {
        CompanyRecord {
            city: city.map(String::from),
            office: office.map(String::from),
            ..Default::default()
        }
    }

    #[test]
    fn test_city_matching_is_case_insensitive() {
        let mumbai = CityFilter::mumbai();
        assert!(mumbai.matches(&located(Some("Navi MUMBAI"), None)));
        assert!(mumbai.matches(&located(Some("Bombay"), None)));
        assert!(mumbai.matches(&located(None, Some("뭄바이무역관"))));
        assert!(!mumbai.matches(&located(Some("Chennai"), Some("첸나이무역관"))));
        assert!(!mumbai.matches(&located(None, None)));
    }

    #[test]
    fn test_postgrest_filter() {
        assert_eq!(
            CityFilter::chennai().postgrest_or(),
            "(city.ilike.*chennai*,city.ilike.*madras*,office.ilike.*첸나이*)"
        );
    }

    #[tokio::test]
    async fn test_in_memory_source_filters_by_city() {
        let source = InMemorySource::new(vec![
            located(Some("Mumbai"), None),
            located(Some("Chennai"), None),
            located(Some("Madras"), None),
        ]);
        assert_eq!(source.fetch_companies(&CityFilter::mumbai()).await.unwrap().len(), 1);
        assert_eq!(source.fetch_companies(&CityFilter::chennai()).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_json_file_source() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("kotra.json");
        std::fs::write(
            &path,
            r#"[{"company_name_kr":"가","city":"Mumbai"},{"company_name_kr":"나","office":"첸나이무역관"}]"#,
        )
        .unwrap();

        let source = JsonFileSource::new(&path);
        let chennai = source.fetch_companies(&CityFilter::chennai()).await.unwrap();
        assert_eq!(chennai.len(), 1);
        assert_eq!(chennai[0].company_name_kr.as_deref(), Some("나"));

        let missing = JsonFileSource::new(dir.path().join("nope.json"));
        assert!(matches!(
            missing.fetch_companies(&CityFilter::mumbai()).await.unwrap_err(),
            StoreError::Io { .. }
        ));
    }

    #[tokio::test]
    async fn test_supabase_source_sends_filter_and_credentials() {
        let seen: Seen = Arc::default();
        let router = Router::new()
            .route("/rest/v1/kotra", get(kotra_rows))
            .with_state(seen.clone());
        let url = serve(router).await;

        let records = remote(&url, "kotra")
            .fetch_companies(&CityFilter::mumbai())
            .await
            .unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].company_name_kr.as_deref(), Some("가나"));
        assert_eq!(records[0].extra["kotra_id"], 3);

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        let (query, headers) = &seen[0];
        assert_eq!(query["select"], "*");
        assert_eq!(query["or"], CityFilter::mumbai().postgrest_or());
        assert_eq!(headers["apikey"].to_str().unwrap(), "anon-key");
        assert_eq!(headers["authorization"].to_str().unwrap(), "Bearer anon-key");
    }

    #[tokio::test]
    async fn test_supabase_source_maps_error_status() {
        let url = serve(Router::new().route("/rest/v1/kotra", get(unavailable))).await;

        let err = remote(&url, "kotra")
            .fetch_companies(&CityFilter::chennai())
            .await
            .unwrap_err();
        match err {
            StoreError::Status { status, body } => {
                assert_eq!(status, 503);
                assert_eq!(body, "maintenance");
            }
            other => panic!("expected status error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_supabase_source_rejects_malformed_rows() {
        let url = serve(Router::new().route("/rest/v1/kotra", get(garbage))).await;

        let err = remote(&url, "kotra")
            .fetch_companies(&CityFilter::mumbai())
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Decode(_)));
    }
}
