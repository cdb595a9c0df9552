//! Page session runtime
//!
//! [`PageRuntime::initialize`] performs all setup once. After that the host
//! drives the session with three inputs:
//! - [`PageRuntime::dispatch`] for user and environment events
//! - [`PageRuntime::advance`] once per host loop turn, which runs due timers,
//!   one rendering tick, then a visibility pass
//! - [`PageRuntime::refresh_visibility`] after layout changes that happen
//!   outside scrolling and resizing
//!
//! The runtime owns the scheduler and the visibility detector; controllers
//! only ever see a weak scheduler handle and the shared document.

use lumen_animation::{AnimationScheduler, SchedulerHandle};
use lumen_core::{ElementId, ScrollBehavior, SharedDocument};
use lumen_motion::{
    CounterController, Detector, IntersectionDetector, LineRevealController, MotionContext, MotionTracker,
    SequentialRevealController, StaggerController,
};

use crate::clipboard::Clipboard;
use crate::config::PageConfig;
use crate::copy::CodeCopy;
use crate::error::Result;
use crate::header::HeaderStyler;
use crate::nav::NavMenu;

/// Input delivered to a running page
#[derive(Clone, Debug, PartialEq)]
pub enum PageEvent {
    /// Viewport scrolled to `y`
    Scroll { y: f32 },
    /// Viewport resized
    Resize { width: f32, height: f32 },
    /// Pointer click on an element
    Click { target: ElementId },
    /// Key pressed anywhere on the page (`"Escape"`, `"Enter"`, ...)
    KeyDown { key: String },
    /// The "prefers dark" media signal reported a value
    ColorScheme { prefers_dark: bool },
}

/// Elements each feature registered during initialization
#[derive(Clone, Debug, Default)]
pub struct Installed {
    pub counters: Vec<ElementId>,
    pub cards: Vec<ElementId>,
    pub quote: Option<ElementId>,
    pub hero_lines: Vec<ElementId>,
}

/// A running page session
pub struct PageRuntime {
    document: SharedDocument,
    scheduler: AnimationScheduler,
    detector: IntersectionDetector<ElementId>,
    motion: MotionContext,
    clipboard: Box<dyn Clipboard>,
    nav: Option<NavMenu>,
    header: Option<HeaderStyler>,
    copy: CodeCopy,
    installed: Installed,
    config: PageConfig,
}

impl PageRuntime {
    /// Set up every page feature against `document`
    ///
    /// Missing elements disable their feature; only malformed selectors in
    /// `config` are errors. Elements already in view trigger during the
    /// initial visibility pass at the end of setup.
    pub fn initialize(
        document: SharedDocument,
        config: PageConfig,
        clipboard: Box<dyn Clipboard>,
        prefers_dark: bool,
    ) -> Result<Self> {
        let scheduler = AnimationScheduler::new();
        let motion = MotionContext::new(document.clone(), scheduler.handle());
        let mut detector = IntersectionDetector::new();

        let (nav, header) = {
            let mut doc = document.borrow_mut();
            let nav = NavMenu::install(&doc, &config.navigation)?;
            let header = HeaderStyler::install(&mut doc, &config.header, prefers_dark)?;
            (nav, header)
        };

        let installed = Installed {
            counters: CounterController::install(&motion, &mut detector, &config.counters)?,
            cards: StaggerController::install(&motion, &mut detector, &config.cards)?,
            quote: SequentialRevealController::install(&motion, &mut detector, &config.quote)?,
            hero_lines: LineRevealController::install(&motion, &config.hero_code)?,
        };
        let copy = CodeCopy::install(document.clone(), scheduler.handle(), &config.copy)?;

        tracing::debug!(
            "page initialized: {} counters, {} cards, quote={}, {} hero lines, {} code blocks, nav={}, header={}",
            installed.counters.len(),
            installed.cards.len(),
            installed.quote.is_some(),
            installed.hero_lines.len(),
            copy.blocks().len(),
            nav.is_some(),
            header.is_some()
        );

        let mut runtime = Self {
            document,
            scheduler,
            detector,
            motion,
            clipboard,
            nav,
            header,
            copy,
            installed,
            config,
        };
        runtime.refresh_visibility();
        Ok(runtime)
    }

    pub fn document(&self) -> &SharedDocument {
        &self.document
    }

    pub fn config(&self) -> &PageConfig {
        &self.config
    }

    pub fn installed(&self) -> &Installed {
        &self.installed
    }

    /// Lifecycle of every animated element
    pub fn tracker(&self) -> &MotionTracker {
        &self.motion.tracker
    }

    pub fn scheduler_handle(&self) -> SchedulerHandle {
        self.scheduler.handle()
    }

    pub fn now_ms(&self) -> f64 {
        self.scheduler.now_ms()
    }

    /// Whether timers or frame requests are still queued
    pub fn has_pending(&self) -> bool {
        self.scheduler.has_pending()
    }

    /// Number of elements still waiting to become visible
    pub fn watching(&self) -> usize {
        self.detector.watch_count()
    }

    /// Deliver one event
    pub fn dispatch(&mut self, event: PageEvent) {
        tracing::trace!("dispatch {:?}", event);
        match event {
            PageEvent::Scroll { y } => {
                {
                    let mut doc = self.document.borrow_mut();
                    doc.set_scroll_y(y);
                    let scroll_y = doc.viewport().scroll_y;
                    if let Some(header) = &self.header {
                        header.on_scroll(&mut doc, scroll_y);
                    }
                }
                self.refresh_visibility();
            }
            PageEvent::Resize { width, height } => {
                self.document.borrow_mut().resize(width, height);
                self.refresh_visibility();
            }
            PageEvent::Click { target } => {
                if let Some(nav) = &self.nav {
                    nav.handle_click(&mut self.document.borrow_mut(), target);
                }
                self.copy.handle_click(self.clipboard.as_mut(), target);
            }
            PageEvent::KeyDown { key } => {
                if let Some(nav) = &self.nav {
                    nav.handle_key(&mut self.document.borrow_mut(), &key);
                }
            }
            PageEvent::ColorScheme { prefers_dark } => {
                if let Some(header) = &mut self.header {
                    header.on_color_scheme(&mut self.document.borrow_mut(), prefers_dark);
                }
            }
        }
    }

    /// Run one host loop turn at `now_ms`
    ///
    /// Returns true while timers or frame requests are pending.
    pub fn advance(&mut self, now_ms: f64) -> bool {
        self.scheduler.tick(now_ms);
        self.refresh_visibility();
        self.scheduler.has_pending()
    }

    /// Run a visibility pass without advancing time; returns how many elements entered
    pub fn refresh_visibility(&mut self) -> usize {
        self.detector.recompute(&*self.document)
    }

    /// Smooth-scroll so the section with `section_id` sits just below the header
    ///
    /// Returns false (and requests nothing) if there is no such section.
    pub fn scroll_to_section(&self, section_id: &str) -> bool {
        let mut doc = self.document.borrow_mut();
        let Some(section) = doc.find_by_id(section_id) else {
            tracing::debug!("scroll_to_section: no #{}", section_id);
            return false;
        };
        let section_top = doc.bounds(section).map(|b| b.y()).unwrap_or(0.0);
        let header_height = self
            .header
            .as_ref()
            .map(|header| header.height(&doc))
            .unwrap_or(0.0);
        let top = section_top - header_height - self.config.header.section_gap;
        tracing::debug!("scroll_to_section: #{} -> {}", section_id, top);
        doc.scroll_to(top, ScrollBehavior::Smooth);
        true
    }
}
