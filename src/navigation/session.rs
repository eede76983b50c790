//! One reader's view of one report.
//!
//! The session wires the navigator, the sidebar reducer and the scroll-spy
//! tracker together. It subscribes a small view-sync listener to its own
//! navigator, so after every URL change the rendered chapter is recomputed
//! before the scroll request reaches the caller. Links to anchors the
//! document does not contain leave the view where it is.

use std::sync::{Arc, Mutex};

use url::Url;

use super::location::{ReportLocation, ViewMode};
use super::router::{NavigationEvent, NavigationListener, Navigator, ScrollRequest};
use super::scroll_spy::{ScrollSpyTracker, SectionRect};
use super::sidebar::{SidebarAction, SidebarEffect, SidebarState};
use crate::report::{RenderedReport, ReportDocument, ReportGenerator};

/// What is currently on the page.
#[derive(Debug, Clone, Default)]
struct ViewState {
    active_chapter: String,
}

impl ViewState {
    fn for_location(document: &ReportDocument, location: &ReportLocation) -> Self {
        let toc = document.toc();
        let chapter = location
            .section_id
            .as_deref()
            .and_then(|id| toc.chapter_of(id))
            .or_else(|| toc.first_section());

        chapter
            .map(|c| Self { active_chapter: c.id.clone() })
            .unwrap_or_default()
    }
}

struct ViewSync {
    document: Arc<ReportDocument>,
    view: Arc<Mutex<ViewState>>,
}

impl NavigationListener for ViewSync {
    fn on_navigate(&self, event: &NavigationEvent) {
        let next = ViewState::for_location(&self.document, &event.current);
        *self.view.lock().unwrap_or_else(|e| e.into_inner()) = next;
    }
}

pub struct ReportSession {
    document: Arc<ReportDocument>,
    navigator: Navigator,
    sidebar: SidebarState,
    view: Arc<Mutex<ViewState>>,
    tracker: ScrollSpyTracker,
}

impl ReportSession {
    pub fn new(document: Arc<ReportDocument>, location: ReportLocation, base_url: Url) -> Self {
        let view = Arc::new(Mutex::new(ViewState::for_location(&document, &location)));
        let mut navigator = Navigator::new(base_url, location);
        navigator.subscribe(Arc::new(ViewSync {
            document: document.clone(),
            view: view.clone(),
        }));

        let current = view
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .active_chapter
            .clone();

        Self {
            document,
            navigator,
            sidebar: SidebarState::new(current),
            view,
            tracker: ScrollSpyTracker::default(),
        }
    }

    pub fn document(&self) -> &ReportDocument {
        &self.document
    }

    pub fn location(&self) -> &ReportLocation {
        self.navigator.location()
    }

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    /// Listeners added here run after the session's own view sync.
    pub fn navigator_mut(&mut self) -> &mut Navigator {
        &mut self.navigator
    }

    pub fn sidebar(&self) -> &SidebarState {
        &self.sidebar
    }

    /// Chapter currently rendered (section mode) or last navigated to.
    pub fn active_chapter(&self) -> String {
        self.view
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .active_chapter
            .clone()
    }

    /// Cross-section deep link (`#anchor` in a body).
    pub fn follow_link(&mut self, anchor: &str) -> Option<ScrollRequest> {
        let request = self
            .navigator
            .navigate_to_anchor(anchor, self.document.toc());
        self.sync_sidebar();
        request
    }

    /// Apply a sidebar interaction; returns the scroll the view must perform.
    pub fn dispatch(&mut self, action: SidebarAction) -> Option<ScrollRequest> {
        let mode = self.navigator.location().mode;
        let (next, effect) = self.sidebar.clone().reduce(action, mode, self.document.toc());
        self.sidebar = next;

        match effect? {
            SidebarEffect::ChangeSection(section) => {
                self.navigator.change_section(&section);
                None
            }
            SidebarEffect::ScrollTo(request) => Some(request),
        }
    }

    /// Feed one scroll frame. Only active in view-all mode.
    pub fn on_scroll(&mut self, rects: &[SectionRect]) -> Option<String> {
        if self.navigator.location().mode != ViewMode::All {
            return None;
        }
        let active = self.tracker.observe(rects)?;
        self.dispatch(SidebarAction::ScrollSpy(active.clone()));
        Some(active)
    }

    pub fn set_mode(&mut self, mode: ViewMode) {
        self.navigator.set_mode(mode);
        self.tracker.reset();
        self.sync_sidebar();
    }

    pub fn render(&self, generator: &ReportGenerator) -> RenderedReport {
        generator.render(&self.document, self.navigator.location())
    }

    fn sync_sidebar(&mut self) {
        let target = self
            .navigator
            .location()
            .section_id
            .clone()
            .filter(|id| self.document.toc().contains(id))
            .unwrap_or_else(|| self.active_chapter());
        let mode = self.navigator.location().mode;
        let (next, _) = self
            .sidebar
            .clone()
            .reduce(SidebarAction::SyncSection(target), mode, self.document.toc());
        self.sidebar = next;
    }
}
