use crate::navigation::{ReportLocation, ViewMode, SCROLL_SPY_OFFSET_PX};
use crate::report::generator::{RenderedChapter, RenderedReport};

/// Scroll-spy for view-all pages: first `[data-section-id]` element whose
/// box straddles the offset line gets the `active` class in the sidebar.
const SCROLL_SPY_SCRIPT: &str = r#"<script>
(function () {
  var OFFSET = __OFFSET__;
  var last = null;
  function spy() {
    var found = null;
    var nodes = document.querySelectorAll('[data-section-id]');
    for (var i = 0; i < nodes.length; i++) {
      var r = nodes[i].getBoundingClientRect();
      if (r.top <= OFFSET && r.bottom > OFFSET) { found = nodes[i].getAttribute('data-section-id'); break; }
    }
    if (!found || found === last) return;
    last = found;
    document.querySelectorAll('[data-nav-id]').forEach(function (a) {
      a.classList.toggle('active', a.getAttribute('data-nav-id') === found);
    });
  }
  window.addEventListener('scroll', spy, { passive: true });
  spy();
})();
</script>
"#;

/// HTML formatter for rendered reports
pub struct HtmlFormatter;

impl HtmlFormatter {
    /// Standalone page with sidebar TOC and embedded CSS.
    ///
    /// `link_base` prefixes section-mode links (e.g. `/reports/epsilon-growth`).
    pub fn format(report: &RenderedReport, link_base: &str) -> String {
        let mut html = String::with_capacity(16 * 1024);

        html.push_str("<!DOCTYPE html>\n<html lang=\"ko\">\n<head>\n");
        html.push_str("<meta charset=\"UTF-8\">\n");
        html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
        html.push_str(&format!("<title>{}</title>\n", escape_html(&report.title)));
        html.push_str("<style>\n");
        html.push_str(Self::styles());
        html.push_str("</style>\n</head>\n<body>\n");

        Self::push_sidebar(&mut html, report, link_base);
        Self::push_content(&mut html, report);

        if report.mode == ViewMode::All {
            html.push_str(&Self::scroll_spy_script());
        }

        html.push_str("</body>\n</html>\n");
        html
    }

    /// Main column only, for embedding into a page shell.
    pub fn format_fragment(report: &RenderedReport, link_base: &str) -> String {
        let mut html = String::with_capacity(8 * 1024);
        Self::push_sidebar(&mut html, report, link_base);
        Self::push_content(&mut html, report);
        html
    }

    /// Inline `<script>` block driving the sidebar highlight in view-all mode.
    pub fn scroll_spy_script() -> String {
        SCROLL_SPY_SCRIPT.replace("__OFFSET__", &SCROLL_SPY_OFFSET_PX.to_string())
    }

    pub fn styles() -> &'static str {
        concat!(
            "body { font-family: system-ui, sans-serif; margin: 0; line-height: 1.6; color: #2c3e50; }\n",
            "nav.toc { position: fixed; top: 0; left: 0; width: 20rem; height: 100vh; overflow-y: auto; background: #fff; box-shadow: 2px 0 8px rgba(0,0,0,.08); padding: 1rem; box-sizing: border-box; }\n",
            "nav.toc ul { list-style: none; padding-left: 0; margin: 0; }\n",
            "nav.toc ul ul { padding-left: 1rem; }\n",
            "nav.toc a { display: block; padding: 4px 8px; color: #34495e; text-decoration: none; border-radius: 4px; }\n",
            "nav.toc a.current, nav.toc a.active { background: #e8f0fe; color: #1a56db; font-weight: 600; }\n",
            "main { margin-left: 20rem; max-width: 960px; padding: 2rem; }\n",
            "h1 { margin-bottom: 4px; }\n",
            ".subtitle { color: #6c757d; margin-top: 0; }\n",
            "h2 { border-bottom: 2px solid #ecf0f1; padding-bottom: 5px; margin-top: 40px; }\n",
            "hr.chapter-divider { border: 0; border-top: 4px double #ced4da; margin: 48px 0; }\n",
            ".summary { background: #f8f9fa; border-left: 4px solid #1a56db; padding: 12px 16px; border-radius: 4px; }\n",
            "table { width: 100%; border-collapse: collapse; margin: 16px 0; }\n",
            "th { background: #34495e; color: white; text-align: left; padding: 8px; }\n",
            "td { padding: 8px; border-bottom: 1px solid #ecf0f1; }\n",
            "@media (max-width: 1023px) { nav.toc { position: static; width: auto; height: auto; } main { margin-left: 0; } }\n",
        )
    }

    fn push_sidebar(html: &mut String, report: &RenderedReport, link_base: &str) {
        let location = ReportLocation::new(report.report_id.clone()).with_mode(report.mode);
        let active = report.active_chapter.as_deref();

        html.push_str("<nav class=\"toc\">\n<h3>목차</h3>\n<ul>\n");
        for item in &report.toc {
            let class = if report.mode == ViewMode::Section && active == Some(item.id.as_str()) {
                " class=\"current\""
            } else {
                ""
            };
            html.push_str(&format!(
                "<li><a href=\"{}\" data-nav-id=\"{}\"{}>{}</a>",
                escape_html(&nav_href(&location, link_base, &item.id, None)),
                escape_html(&item.id),
                class,
                escape_html(&item.label)
            ));
            if !item.subsections.is_empty() {
                html.push_str("\n<ul>\n");
                for sub in &item.subsections {
                    html.push_str(&format!(
                        "<li><a href=\"{}\" data-nav-id=\"{}\">{}</a></li>\n",
                        escape_html(&nav_href(&location, link_base, &item.id, Some(&sub.id))),
                        escape_html(&sub.id),
                        escape_html(&sub.label)
                    ));
                }
                html.push_str("</ul>\n");
            }
            html.push_str("</li>\n");
        }
        html.push_str("</ul>\n");

        let toggle = location.clone().with_mode(report.mode.toggled());
        let toggle = match (&report.mode, active) {
            (ViewMode::All, Some(chapter)) => toggle.with_section(chapter),
            _ => toggle,
        };
        html.push_str(&format!(
            "<p><a href=\"{}{}\">{}</a></p>\n",
            escape_html(link_base),
            escape_html(&toggle.to_query()),
            match report.mode {
                ViewMode::Section => "전체 보기",
                ViewMode::All => "섹션별 보기",
            }
        ));
        html.push_str("</nav>\n");
    }

    fn push_content(html: &mut String, report: &RenderedReport) {
        html.push_str("<main>\n");
        html.push_str(&format!("<h1>{}</h1>\n", escape_html(&report.title)));
        if let Some(subtitle) = &report.subtitle {
            html.push_str(&format!("<p class=\"subtitle\">{}</p>\n", escape_html(subtitle)));
        }

        for (i, chapter) in report.chapters.iter().enumerate() {
            if i > 0 {
                html.push_str("<hr class=\"chapter-divider\">\n");
            }
            Self::push_chapter(html, chapter);
        }
        html.push_str("</main>\n");
    }

    fn push_chapter(html: &mut String, chapter: &RenderedChapter) {
        let id = escape_html(&chapter.id);
        html.push_str(&format!("<section id=\"{id}\" data-section-id=\"{id}\">\n"));
        html.push_str(&format!("<h2>{}</h2>\n", escape_html(&chapter.title)));
        if let Some(summary) = &chapter.summary_html {
            html.push_str(&format!("<div class=\"summary\">{}</div>\n", summary));
        }
        for sub in &chapter.subsections {
            let sid = escape_html(&sub.id);
            html.push_str(&format!("<article id=\"{sid}\" data-section-id=\"{sid}\">\n"));
            html.push_str(&format!("<h3>{}</h3>\n", escape_html(&sub.title)));
            html.push_str(&sub.body_html);
            html.push_str("</article>\n");
        }
        html.push_str("</section>\n");
    }
}

/// Sidebar target: in-page anchor in view-all mode, section link otherwise.
fn nav_href(location: &ReportLocation, link_base: &str, chapter: &str, subsection: Option<&str>) -> String {
    match (location.mode, subsection) {
        (ViewMode::All, sub) => format!("#{}", urlencoding::encode(sub.unwrap_or(chapter))),
        (ViewMode::Section, None) => {
            format!("{}{}", link_base, location.clone().with_section(chapter).to_query())
        }
        (ViewMode::Section, Some(sub)) => format!(
            "{}{}#{}",
            link_base,
            location.clone().with_section(chapter).to_query(),
            urlencoding::encode(sub)
        ),
    }
}

pub(crate) fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
