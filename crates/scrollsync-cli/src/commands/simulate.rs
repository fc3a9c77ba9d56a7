use std::rc::Rc;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{bail, Result};
use serde_json::json;
use tokio::sync::{mpsc, watch};
use tracing::{debug, info};

use scrollsync_core::behaviour::{compose, Behaviour, BehaviourResolver};
use scrollsync_core::config::FrameConfig;
use scrollsync_core::driver::{
    DriverFactory, Element, FrameLoop, MomentumDriver, MomentumEvent, Rect, ScrollContext,
};
use scrollsync_core::motion::{elapsed_ms, progress_at};
use scrollsync_core::{BehaviourRegistry, EasingType, EngineConfig};
use scrollsync_tui::app::SECTION_ROWS;
use scrollsync_tui::page::{PageProvider, PageSurface};

/// Upper bound on how long the carousel may take to come to rest
const MAX_SETTLE: Duration = Duration::from_secs(10);

pub struct SimulateOptions {
    pub sections: usize,
    pub behaviours: Vec<String>,
    pub duration_ms: u64,
    pub fps: Option<u32>,
    pub wheel: Option<f64>,
}

/// A page section that prints every style write
struct LoggedSection {
    id: String,
    index: usize,
    page: Rc<PageSurface>,
    start: Instant,
}

impl Element for LoggedSection {
    fn set_style_property(&self, name: &str, value: &str) {
        println!(
            "{:>7.1}ms  {:<12} {:<18} {}",
            elapsed_ms(self.start, Instant::now()),
            self.id,
            name,
            value
        );
    }

    fn bounding_rect(&self) -> Rect {
        self.page.section_rect(self.index)
    }
}

pub async fn run(config: &EngineConfig, registry: &BehaviourRegistry, options: SimulateOptions) -> Result<()> {
    if options.sections == 0 {
        bail!("Nothing to simulate: --sections must be at least 1");
    }

    let resolver = BehaviourResolver::new(registry);
    let ids = if options.behaviours.is_empty() {
        vec!["fade-in".to_string()]
    } else {
        options.behaviours.clone()
    };
    // Typos on the command line are errors, not silent no-ops
    for id in &ids {
        resolver.require(id)?;
    }

    let page = Rc::new(PageSurface::new(options.sections, SECTION_ROWS));
    page.set_viewport(80.0, 24.0);

    let (_motion_tx, motion_rx) = watch::channel(false);
    let factory = DriverFactory::new(
        Rc::new(PageProvider::new(page.clone())),
        motion_rx,
        config.driver.clone(),
    );
    let driver = factory.get_driver(ScrollContext::Page);

    let start = Instant::now();
    for index in 0..options.sections {
        let behaviour = stack(&resolver, &ids[index % ids.len()]);
        let id = format!("section-{index}");
        let element = Rc::new(LoggedSection {
            id: id.clone(),
            index,
            page: page.clone(),
            start,
        });
        driver.register(id, element, behaviour, json!({}), None);
    }

    let (event_tx, mut events) = mpsc::unbounded_channel();
    let mut carousel = options.wheel.map(|delta| {
        let heights = config.preview.carousel_heights.clone();
        let mut carousel = MomentumDriver::new(config.momentum.clone(), heights.len())
            .with_event_sender(event_tx);
        carousel.set_section_heights(heights);
        carousel.on_wheel(delta, start);
        carousel
    });

    let duration = Duration::from_millis(options.duration_ms);
    let max_offset = page.max_offset();
    let frame_config = FrameConfig {
        fps: options.fps.unwrap_or(config.frame.fps),
    };
    info!(
        "Simulating {} sections over {}ms at {} fps",
        options.sections, options.duration_ms, frame_config.fps
    );

    let (stop_tx, stop_rx) = watch::channel(false);
    let frame_loop = FrameLoop::new(frame_config);
    let summary = frame_loop
        .run_with(&factory, stop_rx, |now| {
            let t = progress_at(start, now, duration);
            if page.scroll_to(max_offset * EasingType::EaseInOutCubic.apply(t)) {
                driver.on_scroll(now);
            }

            if let Some(carousel) = carousel.as_mut() {
                carousel.tick(now);
                while let Ok(event) = events.try_recv() {
                    print_carousel_event(start, now, &event);
                }
            }

            let carousel_busy = carousel.as_ref().is_some_and(MomentumDriver::needs_update);
            let timed_out = now.saturating_duration_since(start) >= duration + MAX_SETTLE;
            if (t >= 1.0 && !carousel_busy) || timed_out {
                debug!("Scripted scroll finished");
                let _ = stop_tx.send(true);
            }
        })
        .await;

    println!();
    println!(
        "{} frames, {} applied, {} writes, final scroll {:.0}%",
        summary.frames,
        summary.applied_frames,
        summary.writes,
        driver.scroll_progress() * 100.0
    );
    if let Some(carousel) = carousel.as_mut() {
        println!(
            "carousel: card {} of {}, looped: {}",
            carousel.current_index() + 1,
            carousel.total_sections(),
            carousel.has_looped()
        );
        carousel.destroy();
    }

    factory.release_driver(ScrollContext::Page);
    Ok(())
}

/// The behaviour with its prerequisites folded in
fn stack(resolver: &BehaviourResolver<'_>, id: &str) -> Arc<Behaviour> {
    let mut parts = resolver.resolve_with_dependencies(&[id]);
    if parts.len() == 1 {
        return parts.remove(0);
    }
    let label = parts.iter().map(|b| b.id()).collect::<Vec<_>>().join("+");
    Arc::new(compose(label, parts))
}

fn print_carousel_event(start: Instant, now: Instant, event: &MomentumEvent) {
    let elapsed = elapsed_ms(start, now);
    match event {
        MomentumEvent::Looped => println!("{:>7.1}ms  carousel     looped", elapsed),
        MomentumEvent::SnapStarted { target } => {
            println!("{:>7.1}ms  carousel     snapping to {}", elapsed, target)
        }
        MomentumEvent::Settled { index } => {
            println!("{:>7.1}ms  carousel     settled on card {}", elapsed, index + 1)
        }
    }
}
