//! End-to-end behaviour of a full landing page session

use lumen_core::{Color, Document, ElementId, ElementSpec, Rect, ScrollBehavior, SharedDocument, Translate};
use lumen_motion::MotionPhase;
use lumen_page::{MemoryClipboard, PageConfig, PageEvent, PageRuntime};

const WIDTH: f32 = 1280.0;
const HEIGHT: f32 = 800.0;

struct Landing {
    document: SharedDocument,
    header: ElementId,
    hamburger: ElementId,
    menu: ElementId,
    features_link: ElementId,
    hero_code: ElementId,
    stats: Vec<ElementId>,
    cards: Vec<ElementId>,
    blockquote: ElementId,
    cite: ElementId,
    install_code: ElementId,
}

fn landing() -> Landing {
    let mut doc = Document::new(WIDTH, HEIGHT);
    let root = doc.root();

    let header = doc.append(
        root,
        ElementSpec::new("header")
            .class("header")
            .bounds(Rect::new(0.0, 0.0, WIDTH, 72.0)),
    );
    let hamburger = doc.append(header, ElementSpec::new("div").class("hamburger"));
    let menu = doc.append(header, ElementSpec::new("ul").class("nav-menu"));
    let item = doc.append(menu, ElementSpec::new("li"));
    let features_link = doc.append(
        item,
        ElementSpec::new("a").attr("href", "#features").text("Features"),
    );

    let hero_code = doc.append(
        root,
        ElementSpec::new("pre")
            .class("python-code")
            .text("import lumen\n\nlumen.run()")
            .bounds(Rect::new(640.0, 120.0, 560.0, 200.0)),
    );

    let stats_section = doc.append(root, ElementSpec::new("section").class("stats"));
    let stats = ["1,234", "98.5%", "150+", "N/A"]
        .iter()
        .enumerate()
        .map(|(i, text)| {
            doc.append(
                stats_section,
                ElementSpec::new("span")
                    .class("stat-number")
                    .text(*text)
                    .bounds(Rect::new(i as f32 * 300.0, 1200.0, 200.0, 60.0)),
            )
        })
        .collect();

    let features = doc.append(
        root,
        ElementSpec::new("section")
            .id("features")
            .bounds(Rect::new(0.0, 2000.0, WIDTH, 400.0)),
    );
    let cards = ["card", "tool-card", "guideline-item", "card", "tool-card"]
        .iter()
        .enumerate()
        .map(|(i, class)| {
            doc.append(
                features,
                ElementSpec::new("div")
                    .class(*class)
                    .bounds(Rect::new(i as f32 * 250.0, 2000.0, 240.0, 300.0)),
            )
        })
        .collect();

    let quote = doc.append(
        root,
        ElementSpec::new("section")
            .class("quote-section")
            .bounds(Rect::new(0.0, 3000.0, WIDTH, 400.0)),
    );
    let blockquote = doc.append(
        quote,
        ElementSpec::new("blockquote").text("Beautiful is better than ugly."),
    );
    let cite = doc.append(quote, ElementSpec::new("cite").text("The Zen of Python"));

    let install_code = doc.append(
        root,
        ElementSpec::new("code")
            .text("pip install lumen")
            .bounds(Rect::new(0.0, 3600.0, 400.0, 40.0)),
    );

    Landing {
        document: doc.into_shared(),
        header,
        hamburger,
        menu,
        features_link,
        hero_code,
        stats,
        cards,
        blockquote,
        cite,
        install_code,
    }
}

fn start(page: &Landing, clipboard: MemoryClipboard) -> PageRuntime {
    PageRuntime::initialize(
        page.document.clone(),
        PageConfig::default(),
        Box::new(clipboard),
        false,
    )
    .unwrap()
}

fn text(page: &Landing, id: ElementId) -> String {
    page.document.borrow().text_content(id).unwrap()
}

/// Advance in fixed steps from `from` through `to` inclusive
fn run(runtime: &mut PageRuntime, from: f64, to: f64, step: f64, mut each: impl FnMut(&PageRuntime)) {
    let mut now = from;
    while now <= to {
        runtime.advance(now);
        each(runtime);
        now += step;
    }
}

#[test]
fn test_counters_converge_to_formatted_targets() {
    let page = landing();
    let mut runtime = start(&page, MemoryClipboard::new());
    assert_eq!(text(&page, page.stats[0]), "1,234");

    runtime.advance(100.0);
    runtime.dispatch(PageEvent::Scroll { y: 1000.0 });
    assert!(page
        .stats
        .iter()
        .all(|id| runtime.tracker().phase(*id) != Some(MotionPhase::Pending)));

    let mut integer_frames = Vec::new();
    let mut percent_frames = Vec::new();
    run(&mut runtime, 116.0, 2200.0, 16.0, |_| {
        integer_frames.push(text(&page, page.stats[0]));
        percent_frames.push(text(&page, page.stats[1]));
    });

    assert_eq!(text(&page, page.stats[0]), "1,234");
    assert_eq!(text(&page, page.stats[1]), "98.5%");
    assert_eq!(text(&page, page.stats[2]), "150");
    assert_eq!(text(&page, page.stats[3]), "0");

    let mut last = 0;
    for frame in &integer_frames {
        assert!(!frame.contains('.'), "{frame}");
        let value: u32 = frame.replace(',', "").parse().unwrap();
        assert!(value >= last);
        last = value;
    }
    for frame in &percent_frames {
        let digits = frame.strip_suffix('%').unwrap();
        let (_, fraction) = digits.split_once('.').unwrap();
        assert_eq!(fraction.len(), 1, "{frame}");
    }

    for id in &page.stats {
        assert_eq!(runtime.tracker().phase(*id), Some(MotionPhase::Settled));
    }
    assert!(runtime.tracker().settled_at(page.stats[0]).unwrap() >= 2100.0);
}

#[test]
fn test_counters_fire_once_under_scroll_oscillation() {
    let page = landing();
    let mut runtime = start(&page, MemoryClipboard::new());

    runtime.advance(50.0);
    runtime.dispatch(PageEvent::Scroll { y: 1000.0 });
    let triggered_at = runtime.tracker().triggered_at(page.stats[0]);
    assert_eq!(triggered_at, Some(50.0));
    run(&mut runtime, 66.0, 2100.0, 16.0, |_| {});

    for (i, now) in (2200..3000).step_by(100).enumerate() {
        let y = if i % 2 == 0 { 0.0 } else { 1000.0 };
        runtime.dispatch(PageEvent::Scroll { y });
        runtime.advance(now as f64);
    }

    assert_eq!(runtime.tracker().triggered_at(page.stats[0]), triggered_at);
    assert_eq!(text(&page, page.stats[0]), "1,234");
    assert_eq!(text(&page, page.stats[1]), "98.5%");
}

#[test]
fn test_counter_completes_after_leaving_viewport() {
    let page = landing();
    let mut runtime = start(&page, MemoryClipboard::new());

    runtime.advance(0.0);
    runtime.dispatch(PageEvent::Scroll { y: 1000.0 });
    run(&mut runtime, 16.0, 400.0, 16.0, |_| {});
    assert_ne!(text(&page, page.stats[0]), "1,234");

    runtime.dispatch(PageEvent::Scroll { y: 0.0 });
    run(&mut runtime, 416.0, 2100.0, 16.0, |_| {});
    assert_eq!(text(&page, page.stats[0]), "1,234");
    assert_eq!(runtime.tracker().phase(page.stats[0]), Some(MotionPhase::Settled));
}

#[test]
fn test_counter_below_threshold_waits() {
    let page = landing();
    let mut runtime = start(&page, MemoryClipboard::new());

    // Viewport 500..1300, root bottom at 1200 after the margin: stats touch it only at the edge
    runtime.dispatch(PageEvent::Scroll { y: 500.0 });
    assert_eq!(runtime.tracker().phase(page.stats[0]), Some(MotionPhase::Pending));

    // Root bottom at 1240: 40 of 60 visible, below 0.7
    runtime.dispatch(PageEvent::Scroll { y: 540.0 });
    assert_eq!(runtime.tracker().phase(page.stats[0]), Some(MotionPhase::Pending));

    // Root bottom at 1250: 50 of 60 visible
    runtime.dispatch(PageEvent::Scroll { y: 550.0 });
    assert_eq!(runtime.tracker().phase(page.stats[0]), Some(MotionPhase::Animating));
}

#[test]
fn test_cards_cascade_in_registration_order() {
    let page = landing();
    let mut runtime = start(&page, MemoryClipboard::new());
    {
        let doc = page.document.borrow();
        for id in &page.cards {
            assert_eq!(doc.style(*id).unwrap().opacity, Some(0.0));
            assert_eq!(doc.style(*id).unwrap().transform, Some(Translate::Y(20.0)));
        }
    }

    runtime.advance(300.0);
    runtime.dispatch(PageEvent::Scroll { y: 1700.0 });
    run(&mut runtime, 300.0, 1000.0, 10.0, |_| {});

    let settled: Vec<f64> = page
        .cards
        .iter()
        .map(|id| runtime.tracker().settled_at(*id).unwrap())
        .collect();
    assert_eq!(settled, vec![300.0, 400.0, 500.0, 600.0, 700.0]);

    let doc = page.document.borrow();
    for id in &page.cards {
        assert_eq!(doc.style(*id).unwrap().opacity, Some(1.0));
        assert_eq!(doc.style(*id).unwrap().transform, Some(Translate::Y(0.0)));
    }
}

#[test]
fn test_quote_reveals_at_fixed_offsets() {
    let page = landing();
    let mut runtime = start(&page, MemoryClipboard::new());

    runtime.advance(1000.0);
    runtime.dispatch(PageEvent::Scroll { y: 2500.0 });
    {
        let doc = page.document.borrow();
        assert_eq!(doc.style(page.blockquote).unwrap().transform, Some(Translate::Y(30.0)));
        assert_eq!(doc.style(page.cite).unwrap().transform, Some(Translate::Y(20.0)));
    }

    run(&mut runtime, 1050.0, 2000.0, 50.0, |_| {});
    assert_eq!(runtime.tracker().settled_at(page.blockquote), Some(1200.0));
    assert_eq!(runtime.tracker().settled_at(page.cite), Some(1600.0));
}

#[test]
fn test_hero_lines_reveal_after_startup() {
    let page = landing();
    let mut runtime = start(&page, MemoryClipboard::new());
    let lines = runtime.installed().hero_lines.clone();
    assert_eq!(lines.len(), 3);
    assert_eq!(text(&page, page.hero_code), "import lumenlumen.run()");

    runtime.advance(999.0);
    assert_eq!(runtime.tracker().phase(lines[0]), Some(MotionPhase::Animating));

    run(&mut runtime, 1000.0, 1300.0, 50.0, |_| {});
    let settled: Vec<f64> = lines
        .iter()
        .map(|id| runtime.tracker().settled_at(*id).unwrap())
        .collect();
    assert_eq!(settled, vec![1000.0, 1100.0, 1200.0]);
    assert_eq!(
        page.document.borrow().style(lines[2]).unwrap().transform,
        Some(Translate::X(0.0))
    );
}

#[test]
fn test_navigation_and_header() {
    let page = landing();
    let mut runtime = start(&page, MemoryClipboard::new());

    runtime.dispatch(PageEvent::Click { target: page.hamburger });
    assert!(page.document.borrow().has_class(page.menu, "active"));
    runtime.dispatch(PageEvent::Click { target: page.features_link });
    assert!(!page.document.borrow().has_class(page.menu, "active"));

    runtime.dispatch(PageEvent::Click { target: page.hamburger });
    runtime.dispatch(PageEvent::KeyDown { key: "Escape".to_string() });
    assert!(!page.document.borrow().has_class(page.hamburger, "active"));

    runtime.dispatch(PageEvent::Scroll { y: 240.0 });
    assert_eq!(
        page.document.borrow().style(page.header).unwrap().background,
        Some(Color::rgba8(255, 255, 255, 0.98))
    );

    runtime.dispatch(PageEvent::ColorScheme { prefers_dark: true });
    assert_eq!(
        page.document.borrow().style(page.header).unwrap().background,
        Some(Color::rgba8(15, 23, 42, 0.95))
    );

    assert!(runtime.scroll_to_section("features"));
    let request = page.document.borrow_mut().take_scroll_request().unwrap();
    assert_eq!(request.top, 2000.0 - 72.0 - 20.0);
    assert_eq!(request.behavior, ScrollBehavior::Smooth);
}

#[test]
fn test_code_copy_round_trip() {
    let page = landing();
    let clipboard = MemoryClipboard::new();
    let mut runtime = start(&page, clipboard.clone());

    runtime.advance(100.0);
    runtime.dispatch(PageEvent::Click { target: page.install_code });
    assert_eq!(clipboard.contents().as_deref(), Some("pip install lumen"));
    assert_eq!(text(&page, page.install_code), "✅ Copied!");

    runtime.advance(1100.0);
    assert_eq!(text(&page, page.install_code), "pip install lumen");

    clipboard.set_denied(true);
    runtime.dispatch(PageEvent::Click { target: page.install_code });
    assert_eq!(text(&page, page.install_code), "pip install lumen");
    assert_eq!(clipboard.write_count(), 1);
}
