//! Lumen CLI
//!
//! Run landing page behaviour headlessly against a JSON page fixture.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use lumen_animation::{Clock, VirtualClock};
use lumen_core::{Document, ElementId};
use lumen_motion::MotionPhase;
use lumen_page::{MemoryClipboard, PageConfig, PageEvent, PageRuntime};

mod fixture;

use fixture::{Action, Fixture};

#[derive(Parser)]
#[command(name = "lumen")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Lumen landing page behaviour CLI", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Simulate a page session and print the resulting element state
    Simulate {
        /// Page fixture (JSON)
        fixture: PathBuf,

        /// Page configuration (TOML)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Simulated time to run for, in milliseconds
        #[arg(short, long, default_value = "6000")]
        until: f64,

        /// Frame interval in milliseconds
        #[arg(short, long, default_value = "16")]
        step: f64,

        /// Start with the dark color scheme
        #[arg(long)]
        dark: bool,
    },

    /// Validate a page configuration and print it with defaults filled in
    CheckConfig {
        /// Page configuration (TOML)
        file: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG wins over --verbose
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("info")
        }
    });

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    match cli.command {
        Commands::Simulate {
            fixture,
            config,
            until,
            step,
            dark,
        } => cmd_simulate(&fixture, config.as_deref(), until, step, dark),

        Commands::CheckConfig { file } => cmd_check_config(&file),
    }
}

fn load_config(path: Option<&Path>) -> Result<PageConfig> {
    match path {
        Some(path) => PageConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display())),
        None => Ok(PageConfig::default()),
    }
}

fn cmd_simulate(path: &Path, config: Option<&Path>, until: f64, step: f64, dark: bool) -> Result<()> {
    if !step.is_finite() || step <= 0.0 {
        anyhow::bail!("Frame interval must be positive, got {}", step);
    }

    let fixture = Fixture::load(path)?;
    let config = load_config(config)?;
    let document = fixture.build_document().into_shared();
    let clipboard = MemoryClipboard::new();

    let mut page = PageRuntime::initialize(
        document.clone(),
        config,
        Box::new(clipboard.clone()),
        dark || fixture.prefers_dark,
    )
    .context("Failed to initialize page")?;

    info!(
        "Simulating {} for {}ms ({} scripted steps, {} elements watched)",
        path.display(),
        until,
        fixture.script.len(),
        page.watching()
    );

    let clock = VirtualClock::new();
    let mut script = fixture.script.iter().peekable();
    loop {
        let now = clock.now_ms();
        if now > until {
            break;
        }
        while let Some(scripted) = script.next_if(|scripted| scripted.at <= now) {
            apply(&mut page, &scripted.action, now)?;
        }
        page.advance(now);
        clock.advance(step);
    }

    if page.has_pending() {
        info!("Stopped at {}ms with animations still running", until);
    }

    print_document(&document.borrow());
    if let Some(contents) = clipboard.contents() {
        println!();
        println!("clipboard: {:?}", contents);
    }

    let tracker = page.tracker();
    println!();
    println!(
        "motion: {} pending, {} animating, {} settled, {} still watched",
        tracker.count(MotionPhase::Pending),
        tracker.count(MotionPhase::Animating),
        tracker.count(MotionPhase::Settled),
        page.watching()
    );

    Ok(())
}

fn apply(page: &mut PageRuntime, action: &Action, now: f64) -> Result<()> {
    debug!("{:.0}ms: {:?}", now, action);
    match action {
        Action::Scroll { y } => page.dispatch(PageEvent::Scroll { y: *y }),
        Action::Resize { width, height } => page.dispatch(PageEvent::Resize {
            width: *width,
            height: *height,
        }),
        Action::Click { target } => {
            let found = page
                .document()
                .borrow()
                .query(target)
                .with_context(|| format!("Invalid click target '{}'", target))?;
            match found {
                Some(id) => page.dispatch(PageEvent::Click { target: id }),
                None => tracing::warn!("Click target '{}' matched nothing", target),
            }
        }
        Action::Key { key } => page.dispatch(PageEvent::KeyDown { key: key.clone() }),
        Action::ColorScheme { prefers_dark } => page.dispatch(PageEvent::ColorScheme {
            prefers_dark: *prefers_dark,
        }),
        Action::ScrollToSection { id } => {
            if page.scroll_to_section(id) {
                // No smooth scrolling here; jump straight to the target
                let request = page.document().borrow_mut().take_scroll_request();
                if let Some(request) = request {
                    page.dispatch(PageEvent::Scroll { y: request.top });
                }
            } else {
                tracing::warn!("No section #{}", id);
            }
        }
    }
    Ok(())
}

fn print_document(doc: &Document) {
    for id in doc.descendants_inclusive(doc.root()) {
        let Some(element) = doc.get(id) else {
            continue;
        };
        if element.text().is_empty() && element.style().is_empty() {
            continue;
        }

        let mut line = format!("{}{}", "  ".repeat(depth(doc, id)), element.tag());
        if let Some(name) = element.id() {
            line.push('#');
            line.push_str(name);
        }
        for class in element.classes() {
            line.push('.');
            line.push_str(class);
        }
        if !element.text().is_empty() {
            line.push_str(&format!(" {:?}", element.text()));
        }
        if !element.style().is_empty() {
            line.push_str(&format!(" [{}]", element.style()));
        }
        println!("{}", line);
    }
}

fn depth(doc: &Document, id: ElementId) -> usize {
    let mut depth = 0;
    let mut current = doc.get(id).and_then(|element| element.parent());
    while let Some(parent) = current {
        depth += 1;
        current = doc.get(parent).and_then(|element| element.parent());
    }
    depth
}

fn cmd_check_config(path: &Path) -> Result<()> {
    let config = load_config(Some(path))?;
    let rendered = toml::to_string_pretty(&config).context("Failed to render config")?;
    info!("{} is valid", path.display());
    print!("{}", rendered);
    Ok(())
}
