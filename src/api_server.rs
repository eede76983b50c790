// Report API Server Module
//
// Purpose: serve strategy reports as HTML pages and JSON, and expose the
// navigation rules (deep links, scroll-spy) over HTTP for thin clients.

#[cfg(feature = "api")]
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};

#[cfg(feature = "api")]
use tower_http::{
    compression::CompressionLayer,
    cors::CorsLayer,
    trace::TraceLayer,
};

#[cfg(feature = "api")]
use moka::future::Cache;

#[cfg(feature = "api")]
use serde::{Deserialize, Serialize};

#[cfg(feature = "api")]
use std::sync::Arc;

#[cfg(feature = "api")]
use std::time::Duration;

#[cfg(feature = "api")]
use url::Url;

#[cfg(feature = "api")]
use crate::config::ServerConfig;

#[cfg(feature = "api")]
use crate::navigation::{ReportLocation, ReportSession, ScrollRequest, ScrollSpy, SectionRect, ViewMode};

#[cfg(feature = "api")]
use crate::report::{ReportCatalog, ReportDocument, ReportGenerator};

#[cfg(feature = "api")]
use crate::web::handlers::pages;

// ============================================================================
// Application State
// ============================================================================

#[cfg(feature = "api")]
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<ReportCatalog>,
    /// Rendered report pages keyed by `id|mode|sectionId`
    pub cache: Cache<String, String>,
    /// Prefix for generated links when mounted under a sub-path
    pub base_path: String,
}

#[cfg(feature = "api")]
impl AppState {
    pub fn new(config: &ServerConfig) -> anyhow::Result<Self> {
        tracing::info!("Loading report catalog...");
        let catalog = if config.reports_dir.is_dir() {
            ReportCatalog::load_dir(&config.reports_dir)?
        } else {
            tracing::warn!(
                "Reports directory {} not found; serving built-in reports",
                config.reports_dir.display()
            );
            ReportCatalog::builtin()?
        };

        Ok(Self::from_catalog(catalog, &config.base_path))
    }

    pub fn from_catalog(catalog: ReportCatalog, base_path: &str) -> Self {
        tracing::info!("Initializing Moka cache...");
        let cache = Cache::builder()
            .max_capacity(1_000)
            .time_to_live(Duration::from_secs(300)) // 5 min TTL
            .build();

        Self {
            catalog: Arc::new(catalog),
            cache,
            base_path: base_path.trim_end_matches('/').to_string(),
        }
    }

    pub fn document(&self, id: &str) -> Result<Arc<ReportDocument>, AppError> {
        self.catalog
            .get(id)
            .ok_or_else(|| AppError::NotFound(format!("Report {} not found", id)))
    }

    /// Page path for a report (`{base}/reports/{id}`).
    pub fn report_path(&self, id: &str) -> String {
        format!("{}/reports/{}", self.base_path, urlencoding::encode(id))
    }

    pub fn generator_for(&self, id: &str) -> ReportGenerator {
        ReportGenerator::with_link_base(self.report_path(id))
    }
}

// ============================================================================
// Router
// ============================================================================

#[cfg(feature = "api")]
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health_check))

        // HTML pages
        .route("/", get(pages::home_page))
        .route("/reports/:id", get(pages::report_page))

        // Report endpoints (JSON API)
        .route("/api/reports", get(list_reports))
        .route("/api/reports/:id", get(get_report))
        .route("/api/reports/:id/toc", get(get_toc))
        .route("/api/reports/:id/navigate", get(navigate))
        .route("/api/reports/:id/scroll-spy", post(scroll_spy))

        // Middleware (applied in reverse order)
        .layer(CompressionLayer::new()) // gzip + brotli compression
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http()) // Request logging
        .with_state(state)
}

// ============================================================================
// Request types
// ============================================================================

/// `?mode=&sectionId=` on report routes.
#[cfg(feature = "api")]
#[derive(Debug, Default, Deserialize)]
pub struct ReportQuery {
    pub mode: Option<String>,
    #[serde(rename = "sectionId")]
    pub section_id: Option<String>,
}

#[cfg(feature = "api")]
impl ReportQuery {
    pub fn location(&self, report_id: &str) -> ReportLocation {
        let location = ReportLocation::new(report_id)
            .with_mode(self.mode.as_deref().map(ViewMode::parse).unwrap_or_default());
        match self.section_id.as_deref() {
            Some(section) => location.with_section(section),
            None => location,
        }
    }
}

#[cfg(feature = "api")]
#[derive(Debug, Deserialize)]
pub struct NavigateQuery {
    pub anchor: Option<String>,
    pub mode: Option<String>,
    #[serde(rename = "sectionId")]
    pub section_id: Option<String>,
}

#[cfg(feature = "api")]
#[derive(Debug, Deserialize)]
pub struct ScrollSpyRequest {
    pub rects: Vec<SectionRect>,
    #[serde(default)]
    pub offset: Option<f64>,
}

#[cfg(feature = "api")]
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct NavigateResponse {
    location: ReportLocation,
    /// Shareable path + query after navigation
    href: String,
    active_chapter: String,
    found: bool,
    scroll: Option<ScrollRequest>,
}

// ============================================================================
// Endpoint Handlers
// ============================================================================

#[cfg(feature = "api")]
async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

#[cfg(feature = "api")]
async fn list_reports(State(state): State<AppState>) -> Json<serde_json::Value> {
    let reports: Vec<serde_json::Value> = state
        .catalog
        .iter()
        .map(|doc| {
            serde_json::json!({
                "id": doc.id,
                "title": doc.title,
                "subtitle": doc.subtitle,
                "chapters": doc.chapters.len(),
                "anchors": doc.toc().anchors().count(),
                "href": state.report_path(&doc.id),
            })
        })
        .collect();

    Json(serde_json::json!({
        "count": reports.len(),
        "reports": reports
    }))
}

#[cfg(feature = "api")]
async fn get_toc(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let doc = state.document(&id)?;
    Ok(Json(serde_json::json!({
        "reportId": doc.id,
        "items": doc.toc().items()
    })))
}

#[cfg(feature = "api")]
async fn get_report(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<ReportQuery>,
) -> Result<Json<serde_json::Value>, AppError> {
    let doc = state.document(&id)?;
    let rendered = state.generator_for(&id).render(&doc, &query.location(&id));
    let value = serde_json::to_value(&rendered)
        .map_err(|e| AppError::Internal(format!("Serialization error: {}", e)))?;
    Ok(Json(value))
}

/// Replays a deep-link click: rewrites the location, resolves the chapter
/// that must be on screen, and reports whether the anchor can be scrolled to.
#[cfg(feature = "api")]
async fn navigate(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<NavigateQuery>,
) -> Result<Json<NavigateResponse>, AppError> {
    let anchor = query
        .anchor
        .as_deref()
        .map(|a| a.trim_start_matches('#'))
        .filter(|a| !a.is_empty())
        .ok_or_else(|| AppError::BadRequest("Missing 'anchor' query parameter".to_string()))?
        .to_string();

    let doc = state.document(&id)?;
    let current = ReportQuery { mode: query.mode, section_id: query.section_id }.location(&id);

    let base = Url::parse(&format!("http://localhost{}", state.report_path(&id)))
        .map_err(|e| AppError::Internal(format!("Invalid base path: {}", e)))?;

    let mut session = ReportSession::new(doc, current, base);
    let scroll = session.follow_link(&anchor);

    Ok(Json(NavigateResponse {
        location: session.location().clone(),
        href: session.navigator().href(),
        active_chapter: session.active_chapter(),
        found: scroll.is_some(),
        scroll,
    }))
}

#[cfg(feature = "api")]
async fn scroll_spy(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<ScrollSpyRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let doc = state.document(&id)?;
    let spy = request.offset.map(ScrollSpy::with_offset).unwrap_or_default();

    let active = spy.active_section(&request.rects);
    let chapter = active.and_then(|a| doc.toc().chapter_of(a)).map(|c| c.id.as_str());

    Ok(Json(serde_json::json!({
        "activeSection": active,
        "chapter": chapter,
        "offset": spy.offset
    })))
}

// ============================================================================
// Error Handling
// ============================================================================

#[cfg(feature = "api")]
#[derive(Debug)]
pub enum AppError {
    Internal(String),
    NotFound(String),
    BadRequest(String),
}

#[cfg(feature = "api")]
impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
        };

        let body = Json(serde_json::json!({
            "error": message
        }));

        (status, body).into_response()
    }
}
