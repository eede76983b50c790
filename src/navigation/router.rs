//! In-page navigation with explicit subscribers.
//!
//! `Navigator` owns the shareable URL. Every navigation rewrites the query,
//! then calls each subscribed `NavigationListener` synchronously in
//! subscription order, and only then hands back the scroll target. Listeners
//! therefore see the new location before the view scrolls, which lets a
//! section-mode view swap in the chapter that owns the anchor first.
//! Anchor links to ids the document does not know change nothing.

use std::sync::Arc;
use tracing::{debug, warn};
use url::Url;

use super::location::{ReportLocation, ViewMode};
use crate::toc::TocTree;

// ============================================================================
// Scroll requests
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScrollBehavior {
    #[default]
    Smooth,
    Instant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScrollBlock {
    #[default]
    Start,
    Center,
    End,
    Nearest,
}

/// Instruction for the view layer to bring an anchor into view.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct ScrollRequest {
    pub anchor: String,
    pub behavior: ScrollBehavior,
    pub block: ScrollBlock,
}

impl ScrollRequest {
    /// Smooth scroll aligning the anchor with the top of the viewport.
    pub fn smooth_to(anchor: impl Into<String>) -> Self {
        Self {
            anchor: anchor.into(),
            behavior: ScrollBehavior::Smooth,
            block: ScrollBlock::Start,
        }
    }
}

// ============================================================================
// Seams
// ============================================================================

/// Anything that can answer "is this anchor on the page right now".
pub trait AnchorLookup {
    fn has_anchor(&self, id: &str) -> bool;
}

impl AnchorLookup for TocTree {
    fn has_anchor(&self, id: &str) -> bool {
        self.contains(id)
    }
}

/// Payload delivered to listeners after the URL has been rewritten.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationEvent {
    pub previous: ReportLocation,
    pub current: ReportLocation,
    /// Set for anchor navigation, `None` for plain section/mode changes
    pub anchor: Option<String>,
}

pub trait NavigationListener: Send + Sync {
    fn on_navigate(&self, event: &NavigationEvent);
}

pub type SubscriptionId = u64;

// ============================================================================
// Navigator
// ============================================================================

pub struct Navigator {
    url: Url,
    location: ReportLocation,
    listeners: Vec<(SubscriptionId, Arc<dyn NavigationListener>)>,
    next_id: SubscriptionId,
}

impl std::fmt::Debug for Navigator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Navigator")
            .field("url", &self.url.as_str())
            .field("location", &self.location)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl Navigator {
    /// Start at `location`, writing it onto `base_url`'s query.
    pub fn new(mut base_url: Url, location: ReportLocation) -> Self {
        base_url.set_fragment(None);
        location.apply_to_url(&mut base_url);
        Self {
            url: base_url,
            location,
            listeners: Vec::new(),
            next_id: 1,
        }
    }

    pub fn location(&self) -> &ReportLocation {
        &self.location
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Path plus query, as it would appear in the address bar.
    pub fn href(&self) -> String {
        match self.url.query() {
            Some(q) => format!("{}?{}", self.url.path(), q),
            None => self.url.path().to_string(),
        }
    }

    pub fn subscribe(&mut self, listener: Arc<dyn NavigationListener>) -> SubscriptionId {
        let id = self.next_id;
        self.next_id += 1;
        self.listeners.push((id, listener));
        id
    }

    /// Returns `false` when `id` was not subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sid, _)| *sid != id);
        self.listeners.len() != before
    }

    /// Deep-link to `anchor`.
    ///
    /// `lookup` answers whether the document has the anchor at all. When it
    /// does, the URL's `sectionId` becomes `anchor`, listeners are notified
    /// and the scroll request is returned. A missing anchor is logged and
    /// yields `None` with the location untouched. An empty anchor is a no-op.
    pub fn navigate_to_anchor(&mut self, anchor: &str, lookup: &dyn AnchorLookup) -> Option<ScrollRequest> {
        let anchor = anchor.trim_start_matches('#');
        if anchor.is_empty() {
            return None;
        }
        if !lookup.has_anchor(anchor) {
            warn!(anchor = %anchor, "Navigation target not found");
            return None;
        }

        let next = self.location.clone().with_section(anchor);
        self.commit(next, Some(anchor.to_string()));
        Some(ScrollRequest::smooth_to(anchor))
    }

    /// Section-mode navigation: URL + notify, no scroll.
    pub fn change_section(&mut self, section_id: &str) {
        let next = self.location.clone().with_section(section_id);
        self.commit(next, None);
    }

    pub fn set_mode(&mut self, mode: ViewMode) {
        if self.location.mode == mode {
            return;
        }
        let next = self.location.clone().with_mode(mode);
        self.commit(next, None);
    }

    fn commit(&mut self, next: ReportLocation, anchor: Option<String>) {
        next.apply_to_url(&mut self.url);
        let previous = std::mem::replace(&mut self.location, next);

        debug!(href = %self.href(), "Navigation committed");

        let event = NavigationEvent {
            previous,
            current: self.location.clone(),
            anchor,
        };
        for (_, listener) in &self.listeners {
            listener.on_navigate(&event);
        }
    }
}
