//! Shareable URL state for a report view.
//!
//! Three query parameters describe what is on screen:
//! - `view`: report id (e.g. `epsilon-growth`)
//! - `mode`: `section` (one chapter) or `all` (every chapter on one page)
//! - `sectionId`: chapter or subsection anchor
//!
//! Other query parameters on the URL are left untouched when rewriting.

use serde::{Deserialize, Serialize};
use url::{form_urlencoded, Url};

pub const VIEW_PARAM: &str = "view";
pub const MODE_PARAM: &str = "mode";
pub const SECTION_PARAM: &str = "sectionId";

/// Section-at-a-time or everything on one page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Section,
    All,
}

impl ViewMode {
    /// Unknown values fall back to section mode.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "all" => ViewMode::All,
            _ => ViewMode::Section,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ViewMode::Section => "section",
            ViewMode::All => "all",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            ViewMode::Section => ViewMode::All,
            ViewMode::All => ViewMode::Section,
        }
    }
}

impl std::fmt::Display for ViewMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which report, which mode, which section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportLocation {
    #[serde(rename = "view")]
    pub report_id: String,
    pub mode: ViewMode,
    #[serde(rename = "sectionId", default, skip_serializing_if = "Option::is_none")]
    pub section_id: Option<String>,
}

impl ReportLocation {
    pub fn new(report_id: impl Into<String>) -> Self {
        Self {
            report_id: report_id.into(),
            mode: ViewMode::default(),
            section_id: None,
        }
    }

    pub fn with_mode(mut self, mode: ViewMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_section(mut self, section_id: impl Into<String>) -> Self {
        let section_id = section_id.into();
        self.section_id = (!section_id.is_empty()).then_some(section_id);
        self
    }

    /// Parse from a raw query string (leading `?` optional).
    /// Returns `None` when no `view` parameter is present.
    pub fn from_query(query: &str) -> Option<Self> {
        let query = query.strip_prefix('?').unwrap_or(query);
        Self::from_pairs(form_urlencoded::parse(query.as_bytes()))
    }

    pub fn from_url(url: &Url) -> Option<Self> {
        Self::from_pairs(url.query_pairs())
    }

    fn from_pairs<'a, I>(pairs: I) -> Option<Self>
    where
        I: Iterator<Item = (std::borrow::Cow<'a, str>, std::borrow::Cow<'a, str>)>,
    {
        let mut report_id = None;
        let mut mode = ViewMode::default();
        let mut section_id = None;

        // Last occurrence wins, like URLSearchParams.set followed by get
        for (key, value) in pairs {
            match key.as_ref() {
                VIEW_PARAM if !value.is_empty() => report_id = Some(value.into_owned()),
                MODE_PARAM => mode = ViewMode::parse(&value),
                SECTION_PARAM if !value.is_empty() => section_id = Some(value.into_owned()),
                _ => {}
            }
        }

        Some(Self {
            report_id: report_id?,
            mode,
            section_id,
        })
    }

    /// Rewrite `view`, `mode` and `sectionId` on `url`, keeping every other
    /// query parameter in its original order.
    pub fn apply_to_url(&self, url: &mut Url) {
        let preserved: Vec<(String, String)> = url
            .query_pairs()
            .filter(|(k, _)| !matches!(k.as_ref(), VIEW_PARAM | MODE_PARAM | SECTION_PARAM))
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();

        let mut pairs = url.query_pairs_mut();
        pairs.clear();
        for (k, v) in &preserved {
            pairs.append_pair(k, v);
        }
        pairs.append_pair(VIEW_PARAM, &self.report_id);
        pairs.append_pair(MODE_PARAM, self.mode.as_str());
        if let Some(section) = &self.section_id {
            pairs.append_pair(SECTION_PARAM, section);
        }
    }

    /// Relative link (`?view=..&mode=..&sectionId=..`).
    pub fn to_query(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::from("?"));
        serializer.append_pair(VIEW_PARAM, &self.report_id);
        serializer.append_pair(MODE_PARAM, self.mode.as_str());
        if let Some(section) = &self.section_id {
            serializer.append_pair(SECTION_PARAM, section);
        }
        serializer.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_view_mode_parse() {
        assert_eq!(ViewMode::parse("all"), ViewMode::All);
        assert_eq!(ViewMode::parse("ALL"), ViewMode::All);
        assert_eq!(ViewMode::parse("section"), ViewMode::Section);
        assert_eq!(ViewMode::parse("dashboard"), ViewMode::Section);
        assert_eq!(ViewMode::All.toggled(), ViewMode::Section);
    }

    #[test]
    fn test_query_round_trip() {
        let location = ReportLocation::new("epsilon-growth")
            .with_mode(ViewMode::All)
            .with_section("ref-sources");

        let query = location.to_query();
        assert_eq!(query, "?view=epsilon-growth&mode=all&sectionId=ref-sources");
        assert_eq!(ReportLocation::from_query(&query), Some(location));
    }

    #[test]
    fn test_from_query_requires_view() {
        assert!(ReportLocation::from_query("sectionId=johor-overview").is_none());
        assert!(ReportLocation::from_query("").is_none());

        let location = ReportLocation::from_query("view=epsilon-growth").unwrap();
        assert_eq!(location.mode, ViewMode::Section);
        assert!(location.section_id.is_none());
    }

    #[test]
    fn test_apply_to_url_preserves_other_params() {
        let mut url = Url::parse("https://reports.local/dashboard?lang=ko&sectionId=old&view=x").unwrap();
        ReportLocation::new("epsilon-growth")
            .with_section("iru-route")
            .apply_to_url(&mut url);

        assert_eq!(
            url.query(),
            Some("lang=ko&view=epsilon-growth&mode=section&sectionId=iru-route")
        );
        assert_eq!(url.path(), "/dashboard");
    }

    #[test]
    fn test_non_ascii_section_ids_are_encoded() {
        let location = ReportLocation::new("r").with_section("시장 분석");
        let query = location.to_query();
        assert!(!query.contains(' '));
        assert_eq!(ReportLocation::from_query(&query).unwrap().section_id.as_deref(), Some("시장 분석"));
    }
}
