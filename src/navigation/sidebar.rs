//! Sidebar TOC state and its reducer.
//!
//! State lives in a plain value; `reduce` takes it by value and returns the
//! next state plus at most one side effect for the caller to perform.

use serde::Serialize;

use super::location::ViewMode;
use super::router::ScrollRequest;
use crate::toc::TocTree;

/// Below this width the sidebar is an overlay that closes after a click.
pub const MOBILE_BREAKPOINT_PX: u32 = 1024;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SidebarState {
    pub current_section: String,
    pub expanded: Vec<String>,
    pub active_subsection: Option<String>,
    pub is_open: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SidebarAction {
    /// Chevron click: expand or collapse a chapter
    ToggleSection(String),
    /// Chapter or subsection link click
    SelectSection {
        section: String,
        subsection: Option<String>,
        viewport_width: u32,
    },
    /// Scroll-spy reported a new active anchor
    ScrollSpy(String),
    ToggleMobileMenu,
    CloseMenu,
    /// The rendered chapter changed outside the sidebar (deep link, reload)
    SyncSection(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SidebarEffect {
    ChangeSection(String),
    ScrollTo(ScrollRequest),
}

impl SidebarState {
    /// Initial state with `current_section` expanded.
    pub fn new(current_section: impl Into<String>) -> Self {
        let current_section = current_section.into();
        Self {
            expanded: vec![current_section.clone()],
            current_section,
            active_subsection: None,
            is_open: false,
        }
    }

    pub fn is_expanded(&self, section: &str) -> bool {
        self.expanded.iter().any(|s| s == section)
    }

    fn expand(&mut self, section: &str) {
        if !self.is_expanded(section) {
            self.expanded.push(section.to_string());
        }
    }

    pub fn reduce(
        mut self,
        action: SidebarAction,
        mode: ViewMode,
        toc: &TocTree,
    ) -> (Self, Option<SidebarEffect>) {
        match action {
            SidebarAction::ToggleSection(id) => {
                if self.is_expanded(&id) {
                    self.expanded.retain(|s| s != &id);
                } else if toc.resolve(&id).is_some_and(|t| t.subsection.is_none()) {
                    self.expanded.push(id);
                }
                (self, None)
            }

            SidebarAction::SelectSection { section, subsection, viewport_width } => {
                if !toc.contains(&section) {
                    return (self, None);
                }
                let subsection = subsection.filter(|s| toc.contains(s));

                if let Some(sub) = &subsection {
                    self.active_subsection = Some(sub.clone());
                }
                if viewport_width < MOBILE_BREAKPOINT_PX {
                    self.is_open = false;
                }

                let effect = match mode {
                    ViewMode::Section => {
                        self.current_section = section.clone();
                        self.expand(&section);
                        SidebarEffect::ChangeSection(section)
                    }
                    ViewMode::All => {
                        let target = subsection.unwrap_or(section);
                        SidebarEffect::ScrollTo(ScrollRequest::smooth_to(target))
                    }
                };
                (self, Some(effect))
            }

            SidebarAction::ScrollSpy(id) => {
                if !toc.contains(&id) {
                    return (self, None);
                }
                if let Some(parent) = toc.parent_of_subsection(&id) {
                    let parent = parent.id.clone();
                    self.expand(&parent);
                }
                self.active_subsection = Some(id);
                (self, None)
            }

            SidebarAction::ToggleMobileMenu => {
                self.is_open = !self.is_open;
                (self, None)
            }

            SidebarAction::CloseMenu => {
                self.is_open = false;
                (self, None)
            }

            SidebarAction::SyncSection(id) => {
                if let Some(chapter) = toc.chapter_of(&id) {
                    let chapter = chapter.id.clone();
                    self.expand(&chapter);
                    if chapter != id {
                        self.active_subsection = Some(id);
                    }
                    self.current_section = chapter;
                }
                (self, None)
            }
        }
    }
}
