//! Table of Contents
//!
//! The sidebar menu of a report: ordered chapters, each with optional
//! subsections, plus an index from every anchor id to its owning chapter.

pub mod types;

pub use types::{TocEntry, TocError, TocItem, TocTarget, TocTree};
