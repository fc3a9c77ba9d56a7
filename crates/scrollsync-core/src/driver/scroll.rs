//! Frame-synchronized scroll driver
//!
//! One driver serves one scroll context. Input handlers (`on_scroll`,
//! `on_resize`, `on_intersection`, ...) only record facts and mark the driver
//! dirty; every style write happens in `frame`, once per frame, and only for
//! values that actually changed. A frame with nothing dirty does no work.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::sync::Arc;
use std::time::Instant;

use serde_json::Value;
use tokio::sync::watch;
use tracing::{debug, trace, warn};

use super::element::{Element, Rect, ScrollContext, ScrollSurface};
use super::intersection::IntersectionTracker;
use crate::behaviour::{Behaviour, BehaviourState, StyleValue, StyleVars};
use crate::config::DriverConfig;
use crate::motion::elapsed_ms;

/// Opacity outputs of pre-rasterized behaviours never drop below this
pub const PRERASTER_OPACITY_FLOOR: f64 = 0.001;

/// Visibility supplied by an external intersection collaborator
pub type VisibilityGetter = Box<dyn Fn() -> f64>;

/// Pointer state of one target
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Interaction {
    pub hovered: bool,
    pub pressed: bool,
    pub active: bool,
}

/// Outcome of one frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameReport {
    /// Whether the apply pass ran
    pub applied: bool,
    /// Style writes performed
    pub writes: usize,
}

impl FrameReport {
    pub fn idle() -> Self {
        Self::default()
    }

    pub fn merge(self, other: FrameReport) -> Self {
        Self {
            applied: self.applied || other.applied,
            writes: self.writes + other.writes,
        }
    }
}

/// Running counters, for instrumentation and tests
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DriverStats {
    pub frames_applied: u64,
    pub frames_skipped: u64,
    pub writes: u64,
}

enum VisibilitySource {
    Tracker,
    External(Rc<dyn Fn() -> f64>),
}

struct Target {
    id: String,
    element: Rc<dyn Element>,
    behaviour: Arc<Behaviour>,
    options: Rc<Value>,
    source: VisibilitySource,
    interaction: Interaction,
}

/// One target's inputs, copied out so `compute` runs with no borrow held
struct Job {
    id: String,
    index: usize,
    element: Rc<dyn Element>,
    behaviour: Arc<Behaviour>,
    options: Rc<Value>,
    visibility: f64,
    interaction: Interaction,
}

/// An apply pass in flight; `state` is the driver's scratch buffer on loan
struct Pass {
    jobs: Vec<Job>,
    viewport: Option<Rect>,
    state: BehaviourState,
}

#[derive(Debug, Default)]
struct ScrollState {
    progress: f64,
    velocity: f64,
    last_offset: f64,
    last_sample: Option<Instant>,
    needs_update: bool,
}

struct PendingWrite {
    element: Rc<dyn Element>,
    name: String,
    value: String,
}

struct DriverInner {
    context: ScrollContext,
    surface: Option<Rc<dyn ScrollSurface>>,
    config: DriverConfig,
    motion: watch::Receiver<bool>,
    reduced_motion: bool,
    /// Cached on construction and resize, never per frame
    max_scroll: f64,
    scroll: ScrollState,
    tracker: IntersectionTracker,
    targets: Vec<Target>,
    /// Last value read from each external visibility getter
    external_visibility: HashMap<String, f64>,
    /// Last value written per target, per variable
    applied: HashMap<String, HashMap<String, String>>,
    extensions: HashMap<String, f64>,
    /// Reused for every target of every frame
    scratch: BehaviourState,
    stats: DriverStats,
    destroyed: bool,
}

/// Scheduling engine for one scroll context
///
/// Cheap to clone; clones share the same driver. Per-target state is keyed by
/// the caller's id, so independent consumers can register and unregister
/// without coordinating with each other.
#[derive(Clone)]
pub struct ScrollDriver {
    inner: Rc<RefCell<DriverInner>>,
}

impl ScrollDriver {
    /// Create a driver for `context`
    ///
    /// Without a surface the driver is inert: registrations are ignored and
    /// frames do nothing.
    pub fn new(
        context: ScrollContext,
        surface: Option<Rc<dyn ScrollSurface>>,
        motion: watch::Receiver<bool>,
        config: DriverConfig,
    ) -> Self {
        let reduced_motion = *motion.borrow();
        let tracker = IntersectionTracker::new(config.thresholds());
        let mut inner = DriverInner {
            context,
            surface,
            config,
            motion,
            reduced_motion,
            max_scroll: 0.0,
            scroll: ScrollState::default(),
            tracker,
            targets: Vec::new(),
            external_visibility: HashMap::new(),
            applied: HashMap::new(),
            extensions: HashMap::new(),
            scratch: BehaviourState::new(),
            stats: DriverStats::default(),
            destroyed: false,
        };

        if let Some(surface) = inner.surface.clone() {
            inner.max_scroll = surface.scroll_height() - surface.client_height();
            inner.scroll.last_offset = surface.scroll_offset();
            inner.scroll.progress = progress_for(inner.scroll.last_offset, inner.max_scroll);
            inner.scroll.needs_update = true;
            debug!(context = %context, max_scroll = inner.max_scroll, "Scroll driver started");
        } else {
            debug!(context = %context, "No scroll surface, scroll driver is inert");
        }

        Self {
            inner: Rc::new(RefCell::new(inner)),
        }
    }

    /// Track `element` under `id` and apply its behaviour immediately
    ///
    /// Without a `visibility` getter the driver's own tracker measures the
    /// element. Registering an id again replaces the previous target in place.
    /// Returns `false` when the driver is destroyed or inert.
    pub fn register(
        &self,
        id: impl Into<String>,
        element: Rc<dyn Element>,
        behaviour: Arc<Behaviour>,
        options: Value,
        visibility: Option<VisibilityGetter>,
    ) -> bool {
        let id = id.into();
        let initial = visibility.as_ref().map(|getter| getter().clamp(0.0, 1.0));
        let pass = {
            let mut inner = self.inner.borrow_mut();
            if inner.destroyed {
                warn!(target_id = %id, context = %inner.context, "Register called on a destroyed scroll driver, ignoring");
                return false;
            }
            let Some(surface) = inner.surface.clone() else {
                debug!(target_id = %id, "Inert scroll driver ignoring registration");
                return false;
            };

            inner.purge(&id);

            let source = match (visibility, initial) {
                (Some(getter), Some(ratio)) => {
                    inner.external_visibility.insert(id.clone(), ratio);
                    VisibilitySource::External(Rc::from(getter))
                }
                _ => {
                    inner.tracker.observe(&id, element.clone());
                    inner.tracker.measure(&id, &surface.viewport());
                    VisibilitySource::Tracker
                }
            };

            let target = Target {
                id: id.clone(),
                element,
                behaviour,
                options: Rc::new(options),
                source,
                interaction: Interaction::default(),
            };
            let index = match inner.targets.iter().position(|t| t.id == id) {
                Some(index) => {
                    inner.targets[index] = target;
                    index
                }
                None => {
                    inner.targets.push(target);
                    inner.targets.len() - 1
                }
            };

            trace!(target_id = %id, "Registered target");
            inner.begin_pass(Some(index))
        };
        let writes = self.run_pass(pass);
        self.flush(writes);
        true
    }

    /// Stop tracking `id` and drop its cached values
    pub fn unregister(&self, id: &str) -> bool {
        let mut inner = self.inner.borrow_mut();
        let before = inner.targets.len();
        inner.purge(id);
        inner.targets.retain(|t| t.id != id);
        inner.targets.len() != before
    }

    /// Tear down: drop every target, cache and listener. Idempotent.
    pub fn destroy(&self) {
        let mut inner = self.inner.borrow_mut();
        if inner.destroyed {
            return;
        }
        inner.destroyed = true;
        inner.targets.clear();
        inner.tracker.clear();
        inner.external_visibility.clear();
        inner.applied.clear();
        inner.extensions.clear();
        inner.scroll.needs_update = false;
        inner.surface = None;
        debug!(context = %inner.context, "Scroll driver destroyed");
    }

    /// Scroll listener: sample the surface and mark dirty
    pub fn on_scroll(&self, now: Instant) {
        let mut inner = self.inner.borrow_mut();
        let Some(surface) = inner.live_surface() else {
            return;
        };
        inner.sample_scroll(surface.scroll_offset(), now);
        inner.tracker.sample(&surface.viewport());
        inner.scroll.needs_update = true;
    }

    /// Resize listener: recompute the cached scroll extent and mark dirty
    pub fn on_resize(&self, now: Instant) {
        let mut inner = self.inner.borrow_mut();
        let Some(surface) = inner.live_surface() else {
            return;
        };
        inner.max_scroll = surface.scroll_height() - surface.client_height();
        inner.sample_scroll(surface.scroll_offset(), now);
        inner.tracker.sample(&surface.viewport());
        inner.scroll.needs_update = true;
    }

    /// Intersection callback from the host's own observer for a tracked target
    pub fn on_intersection(&self, id: &str, ratio: f64) {
        let mut inner = self.inner.borrow_mut();
        if inner.destroyed {
            return;
        }
        if inner.tracker.record(id, ratio) {
            inner.scroll.needs_update = true;
        }
    }

    /// Update pointer state for one target
    pub fn set_interaction(&self, id: &str, interaction: Interaction) -> bool {
        let mut inner = self.inner.borrow_mut();
        if inner.destroyed {
            return false;
        }
        let Some(target) = inner.targets.iter_mut().find(|t| t.id == id) else {
            return false;
        };
        if target.interaction != interaction {
            target.interaction = interaction;
            inner.scroll.needs_update = true;
        }
        true
    }

    /// Set a mode-specific shared state field (video time, intro phase, ...)
    pub fn set_extension(&self, key: &str, value: f64) {
        let mut inner = self.inner.borrow_mut();
        if inner.destroyed {
            return;
        }
        if inner.extensions.get(key) != Some(&value) {
            inner.extensions.insert(key.to_string(), value);
            inner.scroll.needs_update = true;
        }
    }

    pub fn remove_extension(&self, key: &str) {
        let mut inner = self.inner.borrow_mut();
        if inner.extensions.remove(key).is_some() {
            inner.scroll.needs_update = true;
        }
    }

    /// Run one frame: skip when nothing changed, otherwise compute every
    /// target and write the values that differ from the last write
    pub fn frame(&self) -> FrameReport {
        let getters = {
            let mut inner = self.inner.borrow_mut();
            if inner.destroyed || inner.surface.is_none() {
                return FrameReport::idle();
            }
            inner.refresh_reduced_motion();
            inner.external_getters()
        };

        // Getters can't notify us, so they're polled every frame
        let ratios: Vec<(String, f64)> = getters
            .into_iter()
            .map(|(id, getter)| (id, getter().clamp(0.0, 1.0)))
            .collect();

        let pass = {
            let mut inner = self.inner.borrow_mut();
            if inner.destroyed {
                return FrameReport::idle();
            }
            let external_changed = inner.record_external(ratios);
            if !inner.scroll.needs_update && !external_changed {
                inner.stats.frames_skipped += 1;
                return FrameReport::idle();
            }
            inner.scroll.needs_update = false;
            inner.stats.frames_applied += 1;
            inner.begin_pass(None)
        };

        let writes = self.run_pass(pass);
        trace!(writes = writes.len(), "Applied frame");
        FrameReport {
            applied: true,
            writes: self.flush(writes),
        }
    }

    pub fn target_count(&self) -> usize {
        self.inner.borrow().targets.len()
    }

    pub fn is_registered(&self, id: &str) -> bool {
        self.inner.borrow().targets.iter().any(|t| t.id == id)
    }

    pub fn is_destroyed(&self) -> bool {
        self.inner.borrow().destroyed
    }

    /// True when built without a scroll surface
    pub fn is_inert(&self) -> bool {
        let inner = self.inner.borrow();
        !inner.destroyed && inner.surface.is_none()
    }

    pub fn context(&self) -> ScrollContext {
        self.inner.borrow().context
    }

    pub fn scroll_progress(&self) -> f64 {
        self.inner.borrow().scroll.progress
    }

    pub fn scroll_velocity(&self) -> f64 {
        self.inner.borrow().scroll.velocity
    }

    pub fn prefers_reduced_motion(&self) -> bool {
        self.inner.borrow().reduced_motion
    }

    pub fn stats(&self) -> DriverStats {
        self.inner.borrow().stats
    }

    /// Last value written for `name` on target `id`
    pub fn applied_value(&self, id: &str, name: &str) -> Option<String> {
        self.inner
            .borrow()
            .applied
            .get(id)
            .and_then(|values| values.get(name))
            .cloned()
    }

    /// Visibility the next frame would see for `id`
    pub fn visibility(&self, id: &str) -> Option<f64> {
        let inner = self.inner.borrow();
        let target = inner.targets.iter().find(|t| t.id == id)?;
        match target.source {
            VisibilitySource::Tracker => inner.tracker.ratio(id),
            VisibilitySource::External(_) => inner.external_visibility.get(id).copied(),
        }
    }

    /// Compute every job with no borrow held, then diff the results against
    /// the write cache
    fn run_pass(&self, pass: Pass) -> Vec<PendingWrite> {
        let Pass {
            jobs,
            viewport,
            mut state,
        } = pass;

        let mut results = Vec::with_capacity(jobs.len());
        for job in jobs {
            state.clear_target_fields();
            state.section_visibility = job.visibility;
            if let Some(viewport) = viewport.as_ref() {
                state.section_progress = job.element.bounding_rect().travel_progress(viewport);
            }
            state.section_index = job.index;
            state.is_hovered = job.interaction.hovered;
            state.is_pressed = job.interaction.pressed;
            state.is_active = job.interaction.active;

            let vars = job.behaviour.compute(&state, &job.options, Some(&*job.element));
            results.push((job, vars));
        }

        let mut inner = self.inner.borrow_mut();
        inner.scratch = state;
        inner.collect_writes(results)
    }

    /// Perform queued writes with no borrow held, so element callbacks may
    /// re-enter the driver
    fn flush(&self, writes: Vec<PendingWrite>) -> usize {
        let count = writes.len();
        for write in writes {
            write.element.set_style_property(&write.name, &write.value);
        }
        if count > 0 {
            self.inner.borrow_mut().stats.writes += count as u64;
        }
        count
    }
}

impl DriverInner {
    fn live_surface(&self) -> Option<Rc<dyn ScrollSurface>> {
        if self.destroyed {
            return None;
        }
        self.surface.clone()
    }

    fn purge(&mut self, id: &str) {
        self.tracker.unobserve(id);
        self.external_visibility.remove(id);
        self.applied.remove(id);
    }

    fn sample_scroll(&mut self, offset: f64, now: Instant) {
        if let Some(last) = self.scroll.last_sample {
            let dt = elapsed_ms(last, now);
            if dt > 0.0 {
                self.scroll.velocity = (offset - self.scroll.last_offset) / dt;
            }
        }
        self.scroll.last_offset = offset;
        self.scroll.last_sample = Some(now);
        self.scroll.progress = progress_for(offset, self.max_scroll);
    }

    fn refresh_reduced_motion(&mut self) {
        if let Ok(true) = self.motion.has_changed() {
            let value = *self.motion.borrow_and_update();
            if value != self.reduced_motion {
                debug!(context = %self.context, reduced_motion = value, "Reduced motion preference changed");
                self.reduced_motion = value;
                self.scroll.needs_update = true;
            }
        }
    }

    fn external_getters(&self) -> Vec<(String, Rc<dyn Fn() -> f64>)> {
        self.targets
            .iter()
            .filter_map(|target| match &target.source {
                VisibilitySource::External(getter) => Some((target.id.clone(), getter.clone())),
                VisibilitySource::Tracker => None,
            })
            .collect()
    }

    /// Store polled getter values; returns whether any differed from the cache
    fn record_external(&mut self, ratios: Vec<(String, f64)>) -> bool {
        let mut changed = false;
        for (id, ratio) in ratios {
            // A getter may have unregistered its own target
            if !self.targets.iter().any(|t| t.id == id) {
                continue;
            }
            if self.external_visibility.get(&id) != Some(&ratio) {
                self.external_visibility.insert(id, ratio);
                changed = true;
            }
        }
        changed
    }

    /// Fill the scratch state and snapshot the targets to compute; `only`
    /// limits the pass to one target
    fn begin_pass(&mut self, only: Option<usize>) -> Pass {
        self.scratch.scroll_progress = self.scroll.progress;
        self.scratch.scroll_velocity = self.scroll.velocity;
        self.scratch.prefers_reduced_motion = self.reduced_motion;
        self.scratch.total_sections = self.targets.len();
        self.scratch.extensions.clone_from(&self.extensions);

        let jobs = self
            .targets
            .iter()
            .enumerate()
            .filter(|(index, _)| only.map_or(true, |only| only == *index))
            .map(|(index, target)| Job {
                id: target.id.clone(),
                index,
                element: target.element.clone(),
                behaviour: target.behaviour.clone(),
                options: target.options.clone(),
                visibility: match target.source {
                    VisibilitySource::Tracker => self.tracker.ratio(&target.id),
                    VisibilitySource::External(_) => self.external_visibility.get(&target.id).copied(),
                }
                .unwrap_or(0.0),
                interaction: target.interaction,
            })
            .collect();

        Pass {
            jobs,
            viewport: self.surface.as_ref().map(|s| s.viewport()),
            state: std::mem::take(&mut self.scratch),
        }
    }

    fn collect_writes(&mut self, results: Vec<(Job, StyleVars)>) -> Vec<PendingWrite> {
        let mut writes = Vec::new();
        if self.destroyed {
            return writes;
        }
        let floor = self.config.prerasterize_floor;
        for (job, mut vars) in results {
            // Unregistered while its behaviour was computing
            if !self.targets.iter().any(|t| t.id == job.id) {
                continue;
            }

            if job.behaviour.prerasterize() {
                for (name, value) in vars.iter_mut() {
                    if name.contains("opacity") {
                        if let StyleValue::Number(n) = value {
                            if *n < floor {
                                *n = floor;
                            }
                        }
                    }
                }
            }

            let cache = self.applied.entry(job.id).or_default();
            for (name, value) in vars.iter() {
                let text = value.to_string();
                if cache.get(name) == Some(&text) {
                    continue;
                }
                cache.insert(name.to_string(), text.clone());
                writes.push(PendingWrite {
                    element: job.element.clone(),
                    name: name.to_string(),
                    value: text,
                });
            }
        }
        writes
    }
}

/// Scroll progress for `offset` over a scrollable range of `max_scroll`;
/// an empty or negative range reads as 0
#[inline]
pub fn progress_for(offset: f64, max_scroll: f64) -> f64 {
    if max_scroll <= 0.0 || !offset.is_finite() {
        return 0.0;
    }
    (offset / max_scroll).clamp(0.0, 1.0)
}
