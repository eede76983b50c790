//! Strategy Reports
//!
//! Two independent pieces that share one crate:
//! - `report/`, `toc/`, `navigation/`: long-form strategy reports rendered as a
//!   navigable single page (section or view-all mode, sidebar TOC, scroll-spy,
//!   cross-section deep links)
//! - `targeting/`: batch classification of company records into four
//!   marketing-priority tiers from weighted lookup tables, with JSON/CSV output
//!
//! The web server (`api_server`, `web/`) is behind the `api` feature.

pub mod config;
pub mod logging;
pub mod toc;
pub mod navigation;
pub mod report;
pub mod targeting;

#[cfg(feature = "api")]
pub mod api_server;
#[cfg(feature = "api")]
pub mod web;

// Re-export commonly used types
pub use navigation::{Navigator, ReportLocation, ReportSession, ScrollRequest, ScrollSpy, ViewMode};
pub use report::{ReportCatalog, ReportDocument, ReportGenerator, RenderedReport};
pub use targeting::{Tier, WeightTables, TargetMarketingPipeline};

#[cfg(feature = "api")]
pub use api_server::{AppState, create_router};
