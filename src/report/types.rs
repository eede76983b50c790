//! Report document model.

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::toc::{TocEntry, TocError, TocItem, TocTree};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subsection {
    pub id: String,
    pub title: String,
    /// Markdown; `#anchor` links are cross-section deep links
    #[serde(default)]
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chapter {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default)]
    pub subsections: Vec<Subsection>,
}

/// On-disk shape; the TOC is derived, never stored.
#[derive(Deserialize)]
struct ReportSource {
    id: String,
    title: String,
    #[serde(default)]
    subtitle: Option<String>,
    chapters: Vec<Chapter>,
}

/// A validated report with its table of contents.
#[derive(Debug, Clone, Serialize)]
pub struct ReportDocument {
    pub id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    pub chapters: Vec<Chapter>,
    #[serde(skip)]
    toc: TocTree,
}

impl ReportDocument {
    /// Fails when any chapter or subsection id is empty or repeated.
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        subtitle: Option<String>,
        chapters: Vec<Chapter>,
    ) -> Result<Self, TocError> {
        let toc = TocTree::new(
            chapters
                .iter()
                .map(|c| TocItem {
                    id: c.id.clone(),
                    label: c.title.clone(),
                    subsections: c
                        .subsections
                        .iter()
                        .map(|s| TocEntry { id: s.id.clone(), label: s.title.clone() })
                        .collect(),
                })
                .collect(),
        )?;

        Ok(Self {
            id: id.into(),
            title: title.into(),
            subtitle,
            chapters,
            toc,
        })
    }

    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        let source: ReportSource = serde_json::from_str(json).context("Failed to parse report JSON")?;
        let id = source.id.clone();
        Self::new(source.id, source.title, source.subtitle, source.chapters)
            .with_context(|| format!("Invalid table of contents in report '{}'", id))
    }

    pub fn toc(&self) -> &TocTree {
        &self.toc
    }

    pub fn chapter(&self, id: &str) -> Option<&Chapter> {
        self.chapters.iter().find(|c| c.id == id)
    }
}
