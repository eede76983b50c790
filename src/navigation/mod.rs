//! Report Navigation
//!
//! Client-side navigation state for a single report, modelled as plain values
//! with explicit update functions:
//! - `location`: the shareable URL state (`view`, `mode`, `sectionId`)
//! - `router`: URL rewrites + subscriber notification + scroll requests
//! - `scroll_spy`: which section sits under the fixed viewport offset
//! - `sidebar`: sidebar menu state and its reducer
//! - `session`: ties the above to one report document

pub mod location;
pub mod router;
pub mod scroll_spy;
pub mod sidebar;
pub mod session;

pub use location::{ReportLocation, ViewMode};
pub use router::{
    AnchorLookup, NavigationEvent, NavigationListener, Navigator, ScrollBehavior, ScrollBlock,
    ScrollRequest, SubscriptionId,
};
pub use scroll_spy::{ScrollSpy, ScrollSpyTracker, SectionRect, SCROLL_SPY_OFFSET_PX};
pub use sidebar::{SidebarAction, SidebarEffect, SidebarState, MOBILE_BREAKPOINT_PX};
pub use session::ReportSession;
