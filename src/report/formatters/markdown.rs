use crate::navigation::ViewMode;
use crate::report::generator::RenderedReport;

/// Markdown formatter for rendered reports
///
/// Bodies are already HTML after rendering, so they are embedded verbatim;
/// GitHub-style renderers pass inline HTML through.
pub struct MarkdownFormatter;

impl MarkdownFormatter {
    pub fn format(report: &RenderedReport) -> String {
        let mut md = String::with_capacity(8 * 1024);

        md.push_str(&format!("# {}\n\n", report.title));
        if let Some(subtitle) = &report.subtitle {
            md.push_str(&format!("_{}_\n\n", subtitle));
        }

        // Table of contents
        md.push_str("## 목차\n\n");
        for item in &report.toc {
            md.push_str(&format!("- [{}](#{})\n", item.label, item.id));
            for sub in &item.subsections {
                md.push_str(&format!("  - [{}](#{})\n", sub.label, sub.id));
            }
        }
        md.push('\n');

        for (i, chapter) in report.chapters.iter().enumerate() {
            if i > 0 && report.mode == ViewMode::All {
                md.push_str("---\n\n");
            }
            md.push_str(&format!("<a id=\"{}\"></a>\n\n## {}\n\n", chapter.id, chapter.title));
            if let Some(summary) = &chapter.summary_html {
                md.push_str(summary.trim_end());
                md.push_str("\n\n");
            }
            for sub in &chapter.subsections {
                md.push_str(&format!("<a id=\"{}\"></a>\n\n### {}\n\n", sub.id, sub.title));
                md.push_str(sub.body_html.trim_end());
                md.push_str("\n\n");
            }
        }

        md
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::navigation::ReportLocation;
    use crate::report::{ReportCatalog, ReportGenerator};

    #[test]
    fn test_format_markdown_section() {
        let catalog = ReportCatalog::builtin().unwrap();
        let doc = catalog.get("epsilon-growth").unwrap();
        let report = ReportGenerator::new().render(&doc, &ReportLocation::new("epsilon-growth"));

        let md = MarkdownFormatter::format(&report);
        assert!(md.starts_with("# Epsilon 성장 전략 보고서\n"));
        assert!(md.contains("- [6. 근거 자료 및 세부 데이터](#data-references)"));
        assert!(md.contains("<a id=\"johor-overview\"></a>"));
        assert!(!md.contains("<a id=\"ref-sources\"></a>"));
        assert!(!md.contains("---\n"));
    }

    #[test]
    fn test_format_markdown_all_has_dividers() {
        let catalog = ReportCatalog::builtin().unwrap();
        let doc = catalog.get("epsilon-growth").unwrap();
        let location = ReportLocation::new("epsilon-growth").with_mode(ViewMode::All);
        let report = ReportGenerator::new().render(&doc, &location);

        let md = MarkdownFormatter::format(&report);
        assert_eq!(md.matches("---\n\n").count(), 6);
        assert!(md.contains("<a id=\"ref-sources\"></a>"));
    }
}
