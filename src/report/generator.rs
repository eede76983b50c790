//! Report Generator
//!
//! Resolves a `ReportLocation` against a document and produces the
//! chapters that should be on screen, with markdown bodies converted to HTML.
//!
//! Public API (consumed by api_server.rs, web handlers and render_report):
//! - ReportGenerator::new() -> Self
//! - ReportGenerator::render(document, location) -> RenderedReport

use pulldown_cmark::{html, CowStr, Event, Options, Parser, Tag};
use serde::Serialize;
use tracing::debug;

use super::types::{Chapter, ReportDocument};
use crate::navigation::{AnchorLookup, ReportLocation, ViewMode};
use crate::toc::{TocItem, TocTree};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedSubsection {
    pub id: String,
    pub title: String,
    pub body_html: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedChapter {
    pub id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary_html: Option<String>,
    pub subsections: Vec<RenderedSubsection>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedReport {
    pub report_id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    pub mode: ViewMode,
    /// Chapter the requested section resolved to (first chapter on fallback)
    pub active_chapter: Option<String>,
    /// `sectionId` exactly as requested
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requested_section: Option<String>,
    pub chapters: Vec<RenderedChapter>,
    pub toc: Vec<TocItem>,
}

impl RenderedReport {
    /// Every anchor present in the rendered output, in document order.
    pub fn anchors(&self) -> impl Iterator<Item = &str> {
        self.chapters.iter().flat_map(|c| {
            std::iter::once(c.id.as_str()).chain(c.subsections.iter().map(|s| s.id.as_str()))
        })
    }
}

impl AnchorLookup for RenderedReport {
    fn has_anchor(&self, id: &str) -> bool {
        self.anchors().any(|a| a == id)
    }
}

/// Stateless apart from the prefix used for generated deep links.
#[derive(Debug, Clone, Default)]
pub struct ReportGenerator {
    link_base: String,
}

impl ReportGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prefix for deep links, e.g. `/reports/epsilon-growth`.
    /// Empty means links are relative query strings.
    pub fn with_link_base(link_base: impl Into<String>) -> Self {
        Self { link_base: link_base.into() }
    }

    pub fn link_base(&self) -> &str {
        &self.link_base
    }

    pub fn render(&self, doc: &ReportDocument, location: &ReportLocation) -> RenderedReport {
        let toc = doc.toc();
        let active = location
            .section_id
            .as_deref()
            .and_then(|id| toc.chapter_of(id))
            .or_else(|| toc.first_section())
            .map(|c| c.id.clone());

        let chapters: Vec<&Chapter> = match location.mode {
            ViewMode::All => doc.chapters.iter().collect(),
            ViewMode::Section => active
                .as_deref()
                .and_then(|id| doc.chapter(id))
                .into_iter()
                .collect(),
        };

        debug!(
            report = %doc.id,
            mode = %location.mode,
            chapters = chapters.len(),
            "Rendering report"
        );

        RenderedReport {
            report_id: doc.id.clone(),
            title: doc.title.clone(),
            subtitle: doc.subtitle.clone(),
            mode: location.mode,
            active_chapter: active,
            requested_section: location.section_id.clone(),
            chapters: chapters
                .into_iter()
                .map(|c| self.render_chapter(c, location, toc))
                .collect(),
            toc: toc.items().to_vec(),
        }
    }

    fn render_chapter(&self, chapter: &Chapter, location: &ReportLocation, toc: &TocTree) -> RenderedChapter {
        RenderedChapter {
            id: chapter.id.clone(),
            title: chapter.title.clone(),
            summary_html: chapter
                .summary
                .as_deref()
                .map(|s| self.markdown_to_html(s, location, toc)),
            subsections: chapter
                .subsections
                .iter()
                .map(|s| RenderedSubsection {
                    id: s.id.clone(),
                    title: s.title.clone(),
                    body_html: self.markdown_to_html(&s.body, location, toc),
                })
                .collect(),
        }
    }

    /// Shareable link that opens `anchor` in the current mode.
    pub fn deep_link(&self, location: &ReportLocation, anchor: &str) -> String {
        format!(
            "{}{}#{}",
            self.link_base,
            location.clone().with_section(anchor).to_query(),
            urlencoding::encode(anchor)
        )
    }

    fn markdown_to_html(&self, markdown: &str, location: &ReportLocation, toc: &TocTree) -> String {
        let parser = Parser::new_ext(markdown, Options::ENABLE_TABLES).map(|event| match event {
            Event::Start(Tag::Link { link_type, dest_url, title, id }) if dest_url.starts_with('#') => {
                let anchor = &dest_url[1..];
                if !toc.contains(anchor) {
                    debug!(anchor = %anchor, "Deep link target is not part of this report");
                }
                let href = self.deep_link(location, anchor);
                Event::Start(Tag::Link { link_type, dest_url: CowStr::from(href), title, id })
            }
            other => other,
        });

        let mut out = String::with_capacity(markdown.len() * 2);
        html::push_html(&mut out, parser);
        out
    }
}
