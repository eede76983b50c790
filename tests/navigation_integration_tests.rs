// Navigation Integration Tests
//
// Purpose: drive a full reader session (deep links, sidebar, scroll-spy,
// mode switches) against the built-in report
// Run with: cargo test --test navigation_integration_tests

use std::sync::{Arc, Mutex};

use strategy_reports::navigation::{
    NavigationEvent, NavigationListener, SectionRect, SidebarAction,
};
use strategy_reports::report::formatters::HtmlFormatter;
use strategy_reports::{ReportCatalog, ReportGenerator, ReportLocation, ReportSession, ViewMode};
use url::Url;

fn session(location: ReportLocation) -> ReportSession {
    let catalog = ReportCatalog::builtin().unwrap();
    let doc = catalog.get("epsilon-growth").unwrap();
    let base = Url::parse("https://reports.example.com/strategy?lang=ko").unwrap();
    ReportSession::new(doc, location, base)
}

#[derive(Default)]
struct Recorder(Mutex<Vec<NavigationEvent>>);

impl NavigationListener for Recorder {
    fn on_navigate(&self, event: &NavigationEvent) {
        self.0.lock().unwrap().push(event.clone());
    }
}

#[test]
fn test_deep_link_from_first_chapter_to_references() {
    let mut session = session(ReportLocation::new("epsilon-growth"));
    let recorder = Arc::new(Recorder::default());
    session.navigator_mut().subscribe(recorder.clone());

    assert_eq!(session.active_chapter(), "johor-singapore-dc");

    let scroll = session.follow_link("#ref-methodology").unwrap();
    assert_eq!(scroll.anchor, "ref-methodology");
    assert_eq!(session.active_chapter(), "data-references");
    assert_eq!(session.sidebar().active_subsection.as_deref(), Some("ref-methodology"));
    assert!(session.sidebar().is_expanded("data-references"));

    // Other query parameters survive the rewrite
    assert_eq!(
        session.navigator().href(),
        "/strategy?lang=ko&view=epsilon-growth&mode=section&sectionId=ref-methodology"
    );

    let events = recorder.0.lock().unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].anchor.as_deref(), Some("ref-methodology"));
    assert_eq!(events[0].previous.section_id, None);
}

#[test]
fn test_broken_link_keeps_reader_in_place() {
    let mut session = session(ReportLocation::new("epsilon-growth").with_section("sea-cable-direct"));
    let recorder = Arc::new(Recorder::default());
    session.navigator_mut().subscribe(recorder.clone());
    let before = session.navigator().href();

    assert!(session.follow_link("#not-a-section").is_none());
    assert_eq!(session.active_chapter(), "sea-cable-direct");
    assert_eq!(session.location().section_id.as_deref(), Some("sea-cable-direct"));
    assert_eq!(session.sidebar().current_section, "sea-cable-direct");
    assert_eq!(session.navigator().href(), before);
    assert!(recorder.0.lock().unwrap().is_empty());

    let rendered = session.render(&ReportGenerator::new());
    assert_eq!(rendered.chapters[0].id, "sea-cable-direct");
}

#[test]
fn test_empty_link_is_ignored() {
    let mut session = session(ReportLocation::new("epsilon-growth").with_section("sea-cable-direct"));
    let before = session.navigator().href();
    assert!(session.follow_link("#").is_none());
    assert_eq!(session.navigator().href(), before);
}

#[test]
fn test_sidebar_click_in_section_mode_changes_chapter() {
    let mut session = session(ReportLocation::new("epsilon-growth"));
    session.dispatch(SidebarAction::ToggleMobileMenu);
    assert!(session.sidebar().is_open);

    let scroll = session.dispatch(SidebarAction::SelectSection {
        section: "australia-cable-iru".into(),
        subsection: None,
        viewport_width: 390,
    });
    assert!(scroll.is_none());
    assert_eq!(session.location().section_id.as_deref(), Some("australia-cable-iru"));
    assert_eq!(session.active_chapter(), "australia-cable-iru");
    assert_eq!(session.sidebar().current_section, "australia-cable-iru");
    assert!(!session.sidebar().is_open);
}

#[test]
fn test_view_all_scroll_spy_and_sidebar_scroll() {
    let mut session = session(ReportLocation::new("epsilon-growth").with_mode(ViewMode::All));

    let rects = vec![
        SectionRect::new("pop-overview", -900.0, 20.0),
        SectionRect::new("pop-thailand", 20.0, 700.0),
    ];
    assert_eq!(session.on_scroll(&rects).as_deref(), Some("pop-thailand"));
    // Same frame again is not re-reported
    assert_eq!(session.on_scroll(&rects), None);
    assert_eq!(session.sidebar().active_subsection.as_deref(), Some("pop-thailand"));
    assert!(session.sidebar().is_expanded("sea-pop-expansion"));

    let scroll = session
        .dispatch(SidebarAction::SelectSection {
            section: "europe-datacenter-market".into(),
            subsection: Some("europe-bridge".into()),
            viewport_width: 1440,
        })
        .unwrap();
    assert_eq!(scroll.anchor, "europe-bridge");
    // View-all clicks scroll; the URL is left alone
    assert_eq!(session.location().section_id, None);
}

#[test]
fn test_mode_switch_renders_every_chapter() {
    let mut session = session(ReportLocation::new("epsilon-growth").with_section("iru-route"));
    let generator = ReportGenerator::new();

    let section = session.render(&generator);
    assert_eq!(section.chapters.len(), 1);
    assert_eq!(section.chapters[0].id, "singapore-europe-iru");

    session.set_mode(ViewMode::All);
    let all = session.render(&generator);
    assert_eq!(all.chapters.len(), 7);
    assert_eq!(session.location().section_id.as_deref(), Some("iru-route"));

    // Scroll-spy is inert again after switching back
    session.set_mode(ViewMode::Section);
    assert!(session
        .on_scroll(&[SectionRect::new("iru-route", 0.0, 500.0)])
        .is_none());
}

#[test]
fn test_location_round_trips_through_shared_url() {
    let mut session = session(ReportLocation::new("epsilon-growth").with_mode(ViewMode::All));
    session.follow_link("ref-glossary");

    let restored = ReportLocation::from_url(session.navigator().url()).unwrap();
    assert_eq!(&restored, session.location());
}

#[test]
fn test_section_page_links_point_at_other_chapters() {
    let catalog = ReportCatalog::builtin().unwrap();
    let doc = catalog.get("epsilon-growth").unwrap();
    let generator = ReportGenerator::with_link_base("/reports/epsilon-growth");
    let rendered = generator.render(&doc, &ReportLocation::new("epsilon-growth"));

    let html = HtmlFormatter::format(&rendered, generator.link_base());
    assert!(html.contains("data-section-id=\"johor-singapore-dc\""));
    assert!(!html.contains("data-section-id=\"data-references\""));
    assert!(html.contains("data-nav-id=\"data-references\""));
}
