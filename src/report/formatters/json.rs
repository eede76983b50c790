use crate::report::generator::RenderedReport;

/// JSON formatter for rendered reports
pub struct JsonFormatter;

impl JsonFormatter {
    /// Format report as pretty-printed JSON
    pub fn format(report: &RenderedReport) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(report)
    }

    /// Format report as compact JSON (no whitespace)
    pub fn format_compact(report: &RenderedReport) -> Result<String, serde_json::Error> {
        serde_json::to_string(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::navigation::{ReportLocation, ViewMode};
    use crate::report::{ReportCatalog, ReportGenerator};

    #[test]
    fn test_format_json() {
        let catalog = ReportCatalog::builtin().unwrap();
        let doc = catalog.get("epsilon-growth").unwrap();
        let location = ReportLocation::new("epsilon-growth").with_section("ref-glossary");
        let report = ReportGenerator::new().render(&doc, &location);

        let json = JsonFormatter::format(&report).unwrap();
        assert!(json.contains("\"reportId\": \"epsilon-growth\""));
        assert!(json.contains("\"mode\": \"section\""));
        assert!(json.contains("\"activeChapter\": \"data-references\""));
        assert!(json.contains("\"requestedSection\": \"ref-glossary\""));

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["chapters"].as_array().unwrap().len(), 1);
        assert_eq!(value["toc"].as_array().unwrap().len(), 7);
    }

    #[test]
    fn test_format_compact() {
        let catalog = ReportCatalog::builtin().unwrap();
        let doc = catalog.get("epsilon-growth").unwrap();
        let location = ReportLocation::new("epsilon-growth").with_mode(ViewMode::All);
        let report = ReportGenerator::new().render(&doc, &location);

        let json = JsonFormatter::format_compact(&report).unwrap();
        assert!(!json.contains("\n  "));
        assert!(json.contains("\"mode\":\"all\""));
    }
}
