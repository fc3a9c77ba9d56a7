use std::rc::Rc;
use std::sync::Arc;
use std::time::Instant;

use ratatui::layout::Rect;
use serde_json::json;
use tokio::sync::{mpsc, watch};
use tracing::{debug, info};

use scrollsync_core::behaviour::{compose, Behaviour, BehaviourResolver, NONE_ID};
use scrollsync_core::driver::{
    DriverFactory, FrameReport, Interaction, MomentumDriver, MomentumEvent, ScrollContext,
    ScrollDriver, ScrollSurface,
};
use scrollsync_core::{BehaviourRegistry, EngineConfig};

use crate::input::WHEEL_NOTCH;
use crate::page::{PageProvider, PageSurface, VirtualSection};
use crate::theme::Theme;

/// Height of one simulated page section, in terminal rows
pub const SECTION_ROWS: f64 = 12.0;

/// Rows moved by one scroll step
const SCROLL_STEP: f64 = 2.0;

/// Stacked on every section so hover and focus have something to show
const INTERACTION_BEHAVIOURS: [&str; 3] = ["hover-lift", "press-scale", "active-highlight"];

/// Which panel keyboard scrolling applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Page,
    Carousel,
}

/// One section of the simulated page
pub struct Section {
    pub id: String,
    pub behaviour: Arc<Behaviour>,
    pub element: Rc<VirtualSection>,
    pub interaction: Interaction,
}

/// Application state
pub struct App {
    pub config: EngineConfig,
    pub theme: Theme,
    /// Simulated scroll surface for the page panel
    pub page: Rc<PageSurface>,
    pub sections: Vec<Section>,
    factory: DriverFactory,
    pub driver: ScrollDriver,
    /// Momentum engine behind the carousel panel
    pub carousel: MomentumDriver,
    carousel_events: mpsc::UnboundedReceiver<MomentumEvent>,
    motion_tx: watch::Sender<bool>,
    pub focus: Focus,
    pub focused_section: usize,
    /// Panel areas from the last draw, for mouse routing
    pub page_area: Option<Rect>,
    pub carousel_area: Option<Rect>,
    pub last_frame: FrameReport,
    pub status_message: Option<String>,
    pub should_quit: bool,
}

impl App {
    pub fn new(config: EngineConfig, registry: &BehaviourRegistry) -> Self {
        let (motion_tx, motion_rx) = watch::channel(false);
        let preview = config.preview.clone();

        let page = Rc::new(PageSurface::new(preview.page_sections, SECTION_ROWS));
        let factory = DriverFactory::new(
            Rc::new(PageProvider::new(page.clone())),
            motion_rx,
            config.driver.clone(),
        );
        let driver = factory.get_driver(ScrollContext::Page);

        let resolver = BehaviourResolver::new(registry);
        let mut sections = Vec::with_capacity(preview.page_sections);
        for index in 0..preview.page_sections {
            let primary = if preview.page_behaviours.is_empty() {
                NONE_ID
            } else {
                preview.page_behaviours[index % preview.page_behaviours.len()].as_str()
            };
            let behaviour = section_behaviour(&resolver, primary);
            let element = Rc::new(VirtualSection::new(index, page.clone()));
            let id = format!("section-{index}");
            driver.register(id.clone(), element.clone(), behaviour.clone(), json!({}), None);
            sections.push(Section {
                id,
                behaviour,
                element,
                interaction: Interaction::default(),
            });
        }

        let (carousel_tx, carousel_events) = mpsc::unbounded_channel();
        let mut carousel = MomentumDriver::new(config.momentum.clone(), preview.carousel_heights.len())
            .with_event_sender(carousel_tx);
        carousel.set_section_heights(preview.carousel_heights.clone());

        info!(
            "Preview ready: {} page sections, {} carousel cards",
            sections.len(),
            carousel.total_sections()
        );

        let mut app = Self {
            config,
            theme: Theme::default(),
            page,
            sections,
            factory,
            driver,
            carousel,
            carousel_events,
            motion_tx,
            focus: Focus::Page,
            focused_section: 0,
            page_area: None,
            carousel_area: None,
            last_frame: FrameReport::idle(),
            status_message: None,
            should_quit: false,
        };
        app.sync_interaction(0);
        app
    }

    /// Advance one frame: momentum first, then every scroll driver
    pub fn tick(&mut self, now: Instant) {
        self.carousel.tick(now);
        while let Ok(event) = self.carousel_events.try_recv() {
            self.handle_carousel_event(event);
        }
        self.last_frame = self.factory.frame();
    }

    /// Whether the next tick should come at animation rate
    pub fn needs_fast_update(&self) -> bool {
        self.carousel.needs_update()
    }

    /// Resize the page viewport from the panel's inner area
    pub fn set_page_viewport(&mut self, width: u16, height: u16, now: Instant) {
        if self.page.set_viewport(width as f64, height as f64) {
            self.driver.on_resize(now);
        }
    }

    pub fn scroll_page(&mut self, rows: f64, now: Instant) {
        if self.page.scroll_by(rows) {
            self.driver.on_scroll(now);
        }
    }

    /// One keyboard scroll step on the focused panel
    pub fn scroll(&mut self, direction: f64, now: Instant) {
        match self.focus {
            Focus::Page => self.scroll_page(direction * SCROLL_STEP, now),
            Focus::Carousel => self.carousel.on_wheel(direction * WHEEL_NOTCH, now),
        }
    }

    pub fn page_down(&mut self, now: Instant) {
        match self.focus {
            Focus::Page => self.scroll_page(self.page.client_height() / 2.0, now),
            Focus::Carousel => self.carousel_step(1, now),
        }
    }

    pub fn page_up(&mut self, now: Instant) {
        match self.focus {
            Focus::Page => self.scroll_page(-self.page.client_height() / 2.0, now),
            Focus::Carousel => self.carousel_step(-1, now),
        }
    }

    pub fn jump_to_top(&mut self, now: Instant) {
        match self.focus {
            Focus::Page => {
                if self.page.scroll_to(0.0) {
                    self.driver.on_scroll(now);
                }
            }
            Focus::Carousel => self.carousel.snap_to(0, now),
        }
    }

    pub fn jump_to_bottom(&mut self, now: Instant) {
        match self.focus {
            Focus::Page => {
                if self.page.scroll_to(self.page.max_offset()) {
                    self.driver.on_scroll(now);
                }
            }
            Focus::Carousel => {
                let last = self.carousel.total_sections().saturating_sub(1);
                self.carousel.snap_to(last, now);
            }
        }
    }

    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            Focus::Page => Focus::Carousel,
            Focus::Carousel => Focus::Page,
        };
    }

    /// Move the active section forward (`1`) or back (`-1`)
    pub fn move_section(&mut self, step: isize) {
        if self.sections.is_empty() {
            return;
        }
        let previous = self.focused_section;
        let last = self.sections.len() - 1;
        self.focused_section = previous.saturating_add_signed(step).min(last);
        if previous != self.focused_section {
            // Hover and press stay with the section they were set on
            self.sync_interaction(previous);
            self.sync_interaction(self.focused_section);
        }
    }

    pub fn toggle_hover(&mut self) {
        let index = self.focused_section;
        if let Some(section) = self.sections.get_mut(index) {
            section.interaction.hovered = !section.interaction.hovered;
            self.sync_interaction(index);
        }
    }

    pub fn toggle_press(&mut self) {
        let index = self.focused_section;
        if let Some(section) = self.sections.get_mut(index) {
            section.interaction.pressed = !section.interaction.pressed;
            self.sync_interaction(index);
        }
    }

    pub fn toggle_reduced_motion(&mut self) {
        let enabled = !*self.motion_tx.borrow();
        self.motion_tx.send_replace(enabled);
        self.set_status(if enabled {
            "Reduced motion on"
        } else {
            "Reduced motion off"
        });
    }

    pub fn reduced_motion(&self) -> bool {
        *self.motion_tx.borrow()
    }

    /// Snap the carousel one card forward or back
    pub fn carousel_step(&mut self, step: isize, now: Instant) {
        let total = self.carousel.total_sections();
        if total == 0 {
            return;
        }
        let current = self.carousel.current_index();
        let next = if self.carousel.config().infinite {
            (current as isize + step).rem_euclid(total as isize) as usize
        } else {
            current.saturating_add_signed(step).min(total - 1)
        };
        self.carousel.snap_to(next, now);
    }

    pub fn carousel_wheel(&mut self, delta: f64, now: Instant) {
        self.focus = Focus::Carousel;
        self.carousel.on_wheel(delta, now);
    }

    pub fn carousel_touch_start(&mut self, y: f64, now: Instant) {
        self.focus = Focus::Carousel;
        self.carousel.on_touch_start(y, now);
    }

    pub fn carousel_touch_move(&mut self, y: f64, now: Instant) {
        self.carousel.on_touch_move(y, now);
    }

    pub fn carousel_touch_end(&mut self, now: Instant) {
        self.carousel.on_touch_end(now);
    }

    /// Set a status message
    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
    }

    /// Clear the status message
    pub fn clear_status(&mut self) {
        self.status_message = None;
    }

    /// Release the page driver and stop the carousel
    pub fn shutdown(&mut self) {
        self.carousel.destroy();
        self.factory.release_driver(ScrollContext::Page);
        debug!("Preview shut down");
    }

    pub fn driver_ref_count(&self) -> usize {
        self.factory.driver_ref_count(ScrollContext::Page)
    }

    fn sync_interaction(&mut self, index: usize) {
        let focused = self.focused_section;
        if let Some(section) = self.sections.get_mut(index) {
            section.interaction.active = index == focused;
            self.driver.set_interaction(&section.id, section.interaction);
        }
    }

    fn handle_carousel_event(&mut self, event: MomentumEvent) {
        match event {
            MomentumEvent::Looped => self.set_status("Carousel looped"),
            MomentumEvent::SnapStarted { target } => {
                debug!(snap_target = target, "Carousel snap started");
            }
            MomentumEvent::Settled { index } => {
                self.set_status(format!("Carousel settled on card {}", index + 1));
            }
        }
    }
}

/// Resolve `primary` with its prerequisites, plus the interaction set
fn section_behaviour(resolver: &BehaviourResolver<'_>, primary: &str) -> Arc<Behaviour> {
    let mut ids = vec![primary];
    ids.extend(INTERACTION_BEHAVIOURS);
    let parts = resolver.resolve_with_dependencies(&ids);
    match parts.len() {
        0 => Behaviour::none(),
        1 => parts[0].clone(),
        _ => {
            let id = parts.iter().map(|b| b.id()).collect::<Vec<_>>().join("+");
            Arc::new(compose(id, parts))
        }
    }
}
