//! Report Catalog
//!
//! Reports are JSON files, one per report. The catalog keeps them in a
//! stable order (file name order for directories) and hands out shared
//! handles so sessions and request handlers never copy a document.

use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use tracing::{debug, info};

use super::types::ReportDocument;

const BUILTIN_REPORTS: &[(&str, &str)] = &[(
    "epsilon_growth.json",
    include_str!("../../data/reports/epsilon_growth.json"),
)];

#[derive(Debug, Clone, Default)]
pub struct ReportCatalog {
    reports: Vec<Arc<ReportDocument>>,
}

impl ReportCatalog {
    /// Reports compiled into the binary.
    pub fn builtin() -> Result<Self> {
        let mut catalog = Self::default();
        for (name, json) in BUILTIN_REPORTS {
            let doc = ReportDocument::from_json(json)
                .with_context(|| format!("Failed to load built-in report {}", name))?;
            catalog.insert(doc)?;
        }
        Ok(catalog)
    }

    /// Load every `*.json` file in `dir`.
    pub fn load_dir(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        let mut paths = Vec::new();
        for entry in std::fs::read_dir(dir)
            .with_context(|| format!("Failed to read reports directory {}", dir.display()))?
        {
            let path = entry?.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                paths.push(path);
            }
        }
        paths.sort();

        let mut catalog = Self::default();
        for path in paths {
            let json = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            let doc = ReportDocument::from_json(&json)
                .with_context(|| format!("Failed to load report {}", path.display()))?;
            debug!("Loaded report '{}' from {}", doc.id, path.display());
            catalog.insert(doc)?;
        }

        info!("Loaded {} reports from {}", catalog.len(), dir.display());
        Ok(catalog)
    }

    pub fn insert(&mut self, doc: ReportDocument) -> Result<()> {
        if self.get(&doc.id).is_some() {
            bail!("Duplicate report id '{}'", doc.id);
        }
        self.reports.push(Arc::new(doc));
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<Arc<ReportDocument>> {
        self.reports.iter().find(|r| r.id == id).cloned()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.reports.iter().map(|r| r.id.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<ReportDocument>> {
        self.reports.iter()
    }

    pub fn len(&self) -> usize {
        self.reports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }
}
