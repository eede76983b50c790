//! Active-section detection for view-all mode.
//!
//! The view layer reports the bounding rect of every `[data-section-id]`
//! element (viewport coordinates, document order) on each scroll; the spy
//! picks the first one straddling a fixed line below the viewport top.

use serde::{Deserialize, Serialize};

/// Distance of the detection line from the top of the viewport.
pub const SCROLL_SPY_OFFSET_PX: f64 = 100.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionRect {
    pub id: String,
    pub top: f64,
    pub bottom: f64,
}

impl SectionRect {
    pub fn new(id: impl Into<String>, top: f64, bottom: f64) -> Self {
        Self { id: id.into(), top, bottom }
    }

    /// Top edge at or above the line, bottom edge strictly below it.
    pub fn straddles(&self, line: f64) -> bool {
        self.top <= line && self.bottom > line
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollSpy {
    pub offset: f64,
}

impl Default for ScrollSpy {
    fn default() -> Self {
        Self { offset: SCROLL_SPY_OFFSET_PX }
    }
}

impl ScrollSpy {
    pub fn with_offset(offset: f64) -> Self {
        Self { offset }
    }

    pub fn active_section<'a>(&self, rects: &'a [SectionRect]) -> Option<&'a str> {
        rects
            .iter()
            .find(|r| r.straddles(self.offset))
            .map(|r| r.id.as_str())
    }
}

/// Remembers the last reported section so repeated scroll events with the
/// same result are swallowed.
#[derive(Debug, Clone, Default)]
pub struct ScrollSpyTracker {
    spy: ScrollSpy,
    last: Option<String>,
}

impl ScrollSpyTracker {
    pub fn new(spy: ScrollSpy) -> Self {
        Self { spy, last: None }
    }

    /// `Some(id)` only when the active section changed.
    /// A frame with no straddling section keeps the previous one.
    pub fn observe(&mut self, rects: &[SectionRect]) -> Option<String> {
        let active = self.spy.active_section(rects)?;
        if self.last.as_deref() == Some(active) {
            return None;
        }
        self.last = Some(active.to_string());
        self.last.clone()
    }

    pub fn current(&self) -> Option<&str> {
        self.last.as_deref()
    }

    pub fn reset(&mut self) {
        self.last = None;
    }
}
