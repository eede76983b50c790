//! Report Module
//!
//! Static strategy reports: the document model, the catalog that loads them,
//! the generator that resolves a location into the chapters to show, and the
//! output formatters.
//!
//! Public API:
//! - ReportCatalog::builtin() / load_dir(path)
//! - ReportGenerator::render(document, location) -> RenderedReport
//! - formatters::{HtmlFormatter, MarkdownFormatter, JsonFormatter}

pub mod types;
pub mod catalog;
pub mod generator;
pub mod formatters;

pub use types::{Chapter, ReportDocument, Subsection};
pub use catalog::ReportCatalog;
pub use generator::{RenderedChapter, RenderedReport, RenderedSubsection, ReportGenerator};
