//! TOC tree types and anchor resolution.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A subsection entry in the sidebar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TocEntry {
    pub id: String,
    pub label: String,
}

/// A top-level chapter in the sidebar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TocItem {
    pub id: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub subsections: Vec<TocEntry>,
}

/// Where an anchor lives in the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TocTarget<'a> {
    pub chapter: &'a TocItem,
    /// `None` when the anchor is the chapter itself
    pub subsection: Option<&'a TocEntry>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TocError {
    #[error("anchor id {0:?} appears more than once")]
    DuplicateAnchor(String),
    #[error("anchor id must not be empty")]
    EmptyAnchor,
}

/// Ordered chapters plus an anchor → chapter index.
#[derive(Debug, Clone, Default)]
pub struct TocTree {
    items: Vec<TocItem>,
    /// anchor id → (chapter index, subsection index)
    index: FxHashMap<String, (usize, Option<usize>)>,
}

impl TocTree {
    /// Build the tree, rejecting empty or duplicate anchor ids.
    pub fn new(items: Vec<TocItem>) -> Result<Self, TocError> {
        let mut index = FxHashMap::default();

        for (ci, item) in items.iter().enumerate() {
            register(&mut index, &item.id, (ci, None))?;
            for (si, sub) in item.subsections.iter().enumerate() {
                register(&mut index, &sub.id, (ci, Some(si)))?;
            }
        }

        Ok(Self { items, index })
    }

    pub fn items(&self) -> &[TocItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Default section shown when no (valid) section is requested.
    pub fn first_section(&self) -> Option<&TocItem> {
        self.items.first()
    }

    pub fn contains(&self, anchor: &str) -> bool {
        self.index.contains_key(anchor)
    }

    pub fn resolve(&self, anchor: &str) -> Option<TocTarget<'_>> {
        let &(ci, si) = self.index.get(anchor)?;
        let chapter = &self.items[ci];
        Some(TocTarget {
            chapter,
            subsection: si.map(|i| &chapter.subsections[i]),
        })
    }

    /// Chapter owning `anchor` (the chapter itself for chapter ids).
    pub fn chapter_of(&self, anchor: &str) -> Option<&TocItem> {
        self.resolve(anchor).map(|t| t.chapter)
    }

    /// Parent chapter of a subsection anchor; `None` for chapter ids.
    pub fn parent_of_subsection(&self, anchor: &str) -> Option<&TocItem> {
        self.resolve(anchor)
            .filter(|t| t.subsection.is_some())
            .map(|t| t.chapter)
    }

    /// Every anchor in document order.
    pub fn anchors(&self) -> impl Iterator<Item = &str> {
        self.items.iter().flat_map(|item| {
            std::iter::once(item.id.as_str())
                .chain(item.subsections.iter().map(|s| s.id.as_str()))
        })
    }
}

fn register(
    index: &mut FxHashMap<String, (usize, Option<usize>)>,
    id: &str,
    slot: (usize, Option<usize>),
) -> Result<(), TocError> {
    if id.trim().is_empty() {
        return Err(TocError::EmptyAnchor);
    }
    if index.insert(id.to_string(), slot).is_some() {
        return Err(TocError::DuplicateAnchor(id.to_string()));
    }
    Ok(())
}
