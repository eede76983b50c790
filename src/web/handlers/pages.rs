// Page handlers for HTML rendering with Askama

use axum::{
    extract::{Path, Query, State},
    response::{Html, IntoResponse},
};
use askama::Template;

use crate::api_server::{AppError, AppState, ReportQuery};
use crate::navigation::ViewMode;
use crate::report::formatters::HtmlFormatter;

// ============================================================================
// Home Page
// ============================================================================

pub struct ReportLink {
    pub title: String,
    pub subtitle: String,
    pub href: String,
    pub chapter_count: usize,
}

#[derive(Template)]
#[template(path = "pages/home.html")]
pub struct HomeTemplate {
    pub title: String,
    pub reports: Vec<ReportLink>,
}

pub async fn home_page(State(state): State<AppState>) -> impl IntoResponse {
    let reports = state
        .catalog
        .iter()
        .map(|doc| ReportLink {
            title: doc.title.clone(),
            subtitle: doc.subtitle.clone().unwrap_or_default(),
            href: state.report_path(&doc.id),
            chapter_count: doc.chapters.len(),
        })
        .collect();

    let template = HomeTemplate {
        title: "전략 보고서".to_string(),
        reports,
    };
    Html(template.render().unwrap_or_else(|e| {
        format!("Template error: {}", e)
    }))
}

// ============================================================================
// Report Page
// ============================================================================

#[derive(Template)]
#[template(path = "pages/report.html")]
pub struct ReportTemplate {
    pub title: String,
    pub styles: &'static str,
    /// Sidebar + main column, already escaped
    pub body: String,
    /// Scroll-spy script; empty in section mode
    pub script: String,
}

pub async fn report_page(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<ReportQuery>,
) -> Result<Html<String>, AppError> {
    let doc = state.document(&id)?;
    let location = query.location(&id);

    let cache_key = format!(
        "{}|{}|{}",
        id,
        location.mode,
        location.section_id.as_deref().unwrap_or("")
    );
    if let Some(cached) = state.cache.get(&cache_key).await {
        tracing::debug!("Page cache hit: {}", cache_key);
        return Ok(Html(cached));
    }

    let generator = state.generator_for(&id);
    let rendered = generator.render(&doc, &location);

    let template = ReportTemplate {
        title: rendered.title.clone(),
        styles: HtmlFormatter::styles(),
        body: HtmlFormatter::format_fragment(&rendered, generator.link_base()),
        script: if rendered.mode == ViewMode::All {
            HtmlFormatter::scroll_spy_script()
        } else {
            String::new()
        },
    };
    let html = template
        .render()
        .map_err(|e| AppError::Internal(format!("Template error: {}", e)))?;

    state.cache.insert(cache_key, html.clone()).await;
    Ok(Html(html))
}
