//! Momentum and snap state machine for carousel navigation
//!
//! Turns discrete wheel/touch input into a continuous section index. Input
//! accumulates into velocity, friction decays it every tick, and once it
//! stops a delayed snap animates the index onto a whole section.
//!
//! ```text
//! FreeRunning -> Decaying -> SnapPending -> Snapping -> Settled
//!      ^____________|______________|____________|   (new input)
//! ```

use std::time::{Duration, Instant};

use tokio::sync::mpsc;
use tracing::{debug, trace, warn};

use crate::config::MomentumConfig;
use crate::motion::{is_complete_at, lerp, progress_at, shortest_delta, wrap, EasingType};

/// Below this distance the visible position lands exactly on its target
const SETTLE_EPSILON: f64 = 1e-4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MomentumPhase {
    /// Input arrived this tick
    FreeRunning,
    /// Coasting under friction
    Decaying,
    /// Stopped; waiting out the snap delay
    SnapPending,
    /// Animating onto a whole section
    Snapping,
    /// At rest
    Settled,
}

/// Notifications for whoever renders the carousel
#[derive(Debug, Clone, PartialEq)]
pub enum MomentumEvent {
    /// Wrapped past the last section for the first time
    Looped,
    SnapStarted { target: f64 },
    Settled { index: usize },
}

#[derive(Debug, Clone)]
struct SnapAnimation {
    start: Instant,
    from: f64,
    to: f64,
    duration: Duration,
    easing: EasingType,
}

#[derive(Debug, Default)]
struct MomentumState {
    velocity: f64,
    /// Visible position, eased toward `target_progress`
    scroll_progress: f64,
    target_progress: f64,
    last_touch: Option<f64>,
    zero_velocity_at: Option<Instant>,
    snap_due: Option<Instant>,
    snap: Option<SnapAnimation>,
}

/// Friction/snap engine driving a continuous carousel index
pub struct MomentumDriver {
    config: MomentumConfig,
    state: MomentumState,
    phase: MomentumPhase,
    total_sections: usize,
    section_heights: Vec<f64>,
    has_looped: bool,
    touching: bool,
    input_this_tick: bool,
    destroyed: bool,
    event_tx: Option<mpsc::UnboundedSender<MomentumEvent>>,
}

impl MomentumDriver {
    pub fn new(config: MomentumConfig, total_sections: usize) -> Self {
        Self {
            config,
            state: MomentumState::default(),
            phase: MomentumPhase::Settled,
            total_sections,
            section_heights: Vec::new(),
            has_looped: false,
            touching: false,
            input_this_tick: false,
            destroyed: false,
            event_tx: None,
        }
    }

    /// Set the event sender for renderer notifications
    pub fn with_event_sender(mut self, tx: mpsc::UnboundedSender<MomentumEvent>) -> Self {
        self.event_tx = Some(tx);
        self
    }

    pub fn config(&self) -> &MomentumConfig {
        &self.config
    }

    /// Wheel listener
    pub fn on_wheel(&mut self, delta: f64, now: Instant) {
        if !self.accepts_input() {
            return;
        }
        self.interrupt();
        self.push_velocity(delta * self.config.wheel_multiplier);
        trace!(delta, velocity = self.state.velocity, ?now, "Wheel input");
    }

    /// Touch listener: a finger lands and catches any motion
    pub fn on_touch_start(&mut self, y: f64, _now: Instant) {
        if !self.accepts_input() {
            return;
        }
        self.interrupt();
        self.touching = true;
        self.state.velocity = 0.0;
        self.state.last_touch = Some(y);
    }

    pub fn on_touch_move(&mut self, y: f64, _now: Instant) {
        if !self.accepts_input() {
            return;
        }
        let Some(last) = self.state.last_touch else {
            return;
        };
        self.interrupt();
        self.push_velocity((last - y) * self.config.touch_multiplier);
        self.state.last_touch = Some(y);
    }

    pub fn on_touch_end(&mut self, now: Instant) {
        if self.destroyed || !std::mem::replace(&mut self.touching, false) {
            return;
        }
        self.state.last_touch = None;
        // Released without a fling, or after the finger rested long enough for
        // friction to stop the motion: decide the snap from where it was left
        let snap_underway = matches!(self.phase, MomentumPhase::SnapPending | MomentumPhase::Snapping);
        if self.state.velocity == 0.0 && !snap_underway {
            self.state.zero_velocity_at.get_or_insert(now);
            self.arm_snap(now);
        }
    }

    /// Advance one frame
    pub fn tick(&mut self, now: Instant) {
        if self.destroyed || self.total_sections == 0 {
            return;
        }

        if self.state.snap.is_some() {
            self.step_snap(now);
            return;
        }

        if self.state.velocity != 0.0 {
            self.state.target_progress += self.state.velocity;
            self.bound_target();
            self.state.velocity *= self.config.friction;
            if !self.input_this_tick {
                self.phase = MomentumPhase::Decaying;
            }
            if self.state.velocity.abs() < self.config.velocity_threshold {
                self.state.velocity = 0.0;
                self.state.zero_velocity_at = Some(now);
                if !self.touching {
                    self.arm_snap(now);
                }
            }
        } else if self.phase == MomentumPhase::SnapPending {
            if let Some(due) = self.state.snap_due {
                if now >= due {
                    self.state.snap_due = None;
                    let target = snap_target(self.state.target_progress, self.config.snap_threshold);
                    self.start_snap(target, now);
                    return;
                }
            }
        }
        self.input_this_tick = false;

        self.smooth();
    }

    /// Animate to `index` (programmatic navigation)
    pub fn snap_to(&mut self, index: usize, now: Instant) {
        if self.destroyed || self.total_sections == 0 {
            return;
        }
        self.interrupt();
        self.state.velocity = 0.0;
        let index = index.min(self.total_sections - 1);
        self.start_snap(index as f64, now);
    }

    /// Move to `position` without animation
    pub fn jump_to(&mut self, position: f64) {
        if self.destroyed || self.total_sections == 0 {
            return;
        }
        self.interrupt();
        self.state.velocity = 0.0;
        self.state.target_progress = position;
        self.bound_target();
        self.state.scroll_progress = self.state.target_progress;
        self.phase = MomentumPhase::Settled;
    }

    pub fn set_total_sections(&mut self, count: usize) {
        self.total_sections = count;
        if count == 0 {
            self.cancel_snap();
            self.state.velocity = 0.0;
            self.state.scroll_progress = 0.0;
            self.state.target_progress = 0.0;
            self.phase = MomentumPhase::Settled;
            return;
        }
        self.bound_target();
        self.state.scroll_progress = if self.config.infinite {
            wrap(self.state.scroll_progress, count as f64)
        } else {
            self.state.scroll_progress.clamp(0.0, (count - 1) as f64)
        };
    }

    /// Height of each section relative to the viewport (1.0 = one viewport)
    pub fn set_section_heights(&mut self, ratios: Vec<f64>) {
        if ratios.iter().any(|r| !(r.is_finite() && *r > 0.0)) {
            warn!("Ignoring non-positive section height ratios");
        }
        self.section_heights = ratios;
    }

    /// Remove listeners, cancel animations and timers. Idempotent.
    pub fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        self.destroyed = true;
        self.cancel_snap();
        self.state.velocity = 0.0;
        self.state.zero_velocity_at = None;
        self.state.last_touch = None;
        self.touching = false;
        self.event_tx = None;
        debug!("Momentum driver destroyed");
    }

    pub fn progress(&self) -> f64 {
        self.state.scroll_progress
    }

    pub fn velocity(&self) -> f64 {
        self.state.velocity
    }

    pub fn target_progress(&self) -> f64 {
        self.state.target_progress
    }

    pub fn phase(&self) -> MomentumPhase {
        self.phase
    }

    pub fn has_looped(&self) -> bool {
        self.has_looped
    }

    pub fn total_sections(&self) -> usize {
        self.total_sections
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// Nearest whole section to the visible position
    pub fn current_index(&self) -> usize {
        if self.total_sections == 0 {
            return 0;
        }
        let index = self.state.scroll_progress.round().max(0.0) as usize;
        index % self.total_sections
    }

    /// Time since velocity last reached zero
    pub fn idle_for(&self, now: Instant) -> Option<Duration> {
        self.state
            .zero_velocity_at
            .map(|at| now.saturating_duration_since(at))
    }

    /// Whether the next tick would change anything; drives fast ticking
    pub fn needs_update(&self) -> bool {
        !self.destroyed
            && (self.phase != MomentumPhase::Settled
                || self.state.velocity != 0.0
                || (self.state.scroll_progress - self.state.target_progress).abs() > 0.0)
    }

    fn accepts_input(&self) -> bool {
        !self.destroyed && self.total_sections > 0
    }

    /// New input cancels any pending or running snap
    fn interrupt(&mut self) {
        if self.state.snap.is_some() {
            // Resume from wherever the animation left the visible position
            self.state.target_progress = self.state.scroll_progress;
        }
        self.cancel_snap();
        self.phase = MomentumPhase::FreeRunning;
        self.input_this_tick = true;
    }

    fn cancel_snap(&mut self) {
        self.state.snap = None;
        self.state.snap_due = None;
    }

    fn push_velocity(&mut self, raw: f64) {
        let ratio = self.height_ratio(self.section_at(self.state.target_progress));
        let max = self.config.max_velocity.abs();
        self.state.velocity = (self.state.velocity + raw / ratio).clamp(-max, max);
        if self.state.velocity != 0.0 {
            self.state.zero_velocity_at = None;
        }
    }

    fn arm_snap(&mut self, now: Instant) {
        if self.snap_allowed(self.state.target_progress) {
            self.phase = MomentumPhase::SnapPending;
            self.state.snap_due = Some(now + self.config.snap_delay());
        } else {
            // Free scrolling through the middle of a tall section
            self.phase = MomentumPhase::Settled;
        }
    }

    fn start_snap(&mut self, target: f64, now: Instant) {
        let from = self.state.scroll_progress;
        let to = if self.config.infinite {
            nearest_equivalent(from, target, self.total_sections as f64)
        } else {
            target
        };

        debug!(from, to, "Snapping");
        self.send_event(MomentumEvent::SnapStarted { target: to });
        self.phase = MomentumPhase::Snapping;
        self.state.snap = Some(SnapAnimation {
            start: now,
            from,
            to,
            duration: self.config.snap_duration(),
            easing: self.config.snap_easing,
        });
    }

    fn step_snap(&mut self, now: Instant) {
        let Some(anim) = self.state.snap.clone() else {
            return;
        };
        if is_complete_at(anim.start, now, anim.duration) {
            // Land exactly on the integer; no drift from interpolation
            let landed = self.bound_position(anim.to);
            self.note_forward_crossing(anim.to);
            self.state.scroll_progress = landed;
            self.state.target_progress = landed;
            self.state.velocity = 0.0;
            self.state.snap = None;
            self.phase = MomentumPhase::Settled;
            let index = self.current_index();
            self.send_event(MomentumEvent::Settled { index });
        } else {
            let t = anim.easing.apply(progress_at(anim.start, now, anim.duration));
            let raw = lerp(anim.from, anim.to, t);
            self.note_forward_crossing(raw);
            let position = self.bound_position(raw);
            self.state.scroll_progress = position;
            self.state.target_progress = position;
        }
    }

    fn smooth(&mut self) {
        let total = self.total_sections as f64;
        let delta = if self.config.infinite {
            shortest_delta(self.state.scroll_progress, self.state.target_progress, total)
        } else {
            self.state.target_progress - self.state.scroll_progress
        };
        if delta.abs() < SETTLE_EPSILON {
            self.state.scroll_progress = self.state.target_progress;
            return;
        }
        let next = self.state.scroll_progress + delta * self.config.smoothing;
        self.state.scroll_progress = self.bound_position(next);
    }

    /// Keep `target_progress` inside the track after velocity moved it
    fn bound_target(&mut self) {
        let total = self.total_sections as f64;
        let target = self.state.target_progress;
        if self.config.infinite {
            if target >= total {
                self.note_forward_crossing(target);
                self.state.target_progress = wrap(target, total);
            } else if target < 0.0 {
                if self.has_looped {
                    self.state.target_progress = wrap(target, total);
                } else {
                    // No backward wrap before the first full loop
                    self.state.target_progress = 0.0;
                    self.state.velocity = 0.0;
                }
            }
        } else {
            let max = (total - 1.0).max(0.0);
            if target < 0.0 || target > max {
                self.state.target_progress = target.clamp(0.0, max);
                self.state.velocity = 0.0;
            }
        }
    }

    fn bound_position(&self, position: f64) -> f64 {
        let total = self.total_sections as f64;
        if self.config.infinite {
            wrap(position, total)
        } else {
            position.clamp(0.0, (total - 1.0).max(0.0))
        }
    }

    fn note_forward_crossing(&mut self, raw: f64) {
        if self.config.infinite && !self.has_looped && raw >= self.total_sections as f64 {
            self.has_looped = true;
            debug!("Carousel looped");
            self.send_event(MomentumEvent::Looped);
        }
    }

    fn section_at(&self, position: f64) -> usize {
        if self.total_sections == 0 {
            return 0;
        }
        let position = if self.config.infinite {
            wrap(position, self.total_sections as f64)
        } else {
            position
        };
        (position.floor().max(0.0) as usize).min(self.total_sections - 1)
    }

    fn height_ratio(&self, index: usize) -> f64 {
        self.section_heights
            .get(index)
            .copied()
            .filter(|r| r.is_finite() && *r > 0.0)
            .unwrap_or(1.0)
    }

    /// Sections taller than one viewport only snap near their start or end
    fn snap_allowed(&self, position: f64) -> bool {
        let ratio = self.height_ratio(self.section_at(position));
        if ratio <= 1.0 {
            return true;
        }
        let fraction = position - position.floor();
        let edge = self.config.edge_zone / ratio;
        fraction < edge || fraction > 1.0 - edge
    }

    fn send_event(&self, event: MomentumEvent) {
        if let Some(ref tx) = self.event_tx {
            if tx.send(event).is_err() {
                warn!("Failed to send momentum event: receiver dropped");
            }
        }
    }
}

/// Whole section to snap to from `position`
///
/// A fractional part below `threshold` snaps back to the floor, one above
/// `1 - threshold` snaps forward to the ceiling, anything between rounds.
pub fn snap_target(position: f64, threshold: f64) -> f64 {
    let floor = position.floor();
    let fraction = position - floor;
    if fraction < threshold {
        floor
    } else if fraction > 1.0 - threshold {
        position.ceil()
    } else {
        position.round()
    }
}

/// The copy of `target` (shifted by whole loops) closest to `from`
fn nearest_equivalent(from: f64, target: f64, total: f64) -> f64 {
    if total <= 0.0 {
        return target;
    }
    [target - total, target, target + total]
        .into_iter()
        .min_by(|a, b| (a - from).abs().total_cmp(&(b - from).abs()))
        .unwrap_or(target)
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAME: Duration = Duration::from_millis(16);

    fn config() -> MomentumConfig {
        MomentumConfig {
            wheel_multiplier: 0.01,
            max_velocity: 10.0,
            ..Default::default()
        }
    }

    /// Tick until `done` or the frame budget runs out; returns the time reached
    fn run_until(
        driver: &mut MomentumDriver,
        mut now: Instant,
        frames: usize,
        done: impl Fn(&MomentumDriver) -> bool,
    ) -> Instant {
        for _ in 0..frames {
            if done(driver) {
                break;
            }
            now += FRAME;
            driver.tick(now);
        }
        now
    }

    #[test]
    fn test_snap_target_selection() {
        assert_eq!(snap_target(2.1, 0.25), 2.0);
        assert_eq!(snap_target(2.5, 0.25), (2.5_f64).round());
        assert_eq!(snap_target(2.4, 0.25), 2.0);
        assert_eq!(snap_target(2.9, 0.25), 3.0);
        assert_eq!(snap_target(3.0, 0.25), 3.0);
    }

    #[test]
    fn test_infinite_wrap_loops_once() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut driver = MomentumDriver::new(
            MomentumConfig {
                infinite: true,
                friction: 0.9,
                ..config()
            },
            5,
        )
        .with_event_sender(tx);
        let now = Instant::now();

        driver.on_wheel(450.0, now);
        for i in 1..=4 {
            driver.tick(now + FRAME * i);
            let target = driver.target_progress();
            assert!((0.0..5.0).contains(&target), "target {target} escaped the loop");
            assert!((0.0..5.0).contains(&driver.progress()));
        }

        assert!(driver.has_looped());
        let mut looped = 0;
        while let Ok(event) = rx.try_recv() {
            if event == MomentumEvent::Looped {
                looped += 1;
            }
        }
        assert_eq!(looped, 1);
    }

    #[test]
    fn test_backward_before_loop_clamps_at_start() {
        let mut driver = MomentumDriver::new(MomentumConfig { infinite: true, ..config() }, 5);
        let now = Instant::now();
        driver.on_wheel(-100.0, now);
        driver.tick(now + FRAME);

        assert_eq!(driver.target_progress(), 0.0);
        assert_eq!(driver.velocity(), 0.0);
        assert!(!driver.has_looped());
    }

    #[test]
    fn test_backward_after_loop_wraps() {
        let mut driver = MomentumDriver::new(MomentumConfig { infinite: true, ..config() }, 5);
        let now = Instant::now();
        driver.on_wheel(520.0, now);
        driver.tick(now + FRAME);
        assert!(driver.has_looped());

        driver.jump_to(0.5);
        driver.on_wheel(-100.0, now + FRAME * 2);
        driver.tick(now + FRAME * 3);
        assert!((driver.target_progress() - 4.5).abs() < 1e-9);
    }

    #[test]
    fn test_smoothing_takes_short_way_round() {
        let mut driver = MomentumDriver::new(MomentumConfig { infinite: true, ..config() }, 5);
        let now = Instant::now();
        driver.jump_to(4.9);
        driver.on_wheel(20.0, now);
        driver.tick(now + FRAME);

        // Target wrapped to ~0.1; visible position keeps moving forward
        assert!(driver.target_progress() < 1.0);
        assert!(driver.progress() > 4.9);
        assert!(driver.progress() < 5.0);
    }

    #[test]
    fn test_finite_track_clamps() {
        let mut driver = MomentumDriver::new(config(), 3);
        let now = Instant::now();
        driver.on_wheel(1000.0, now);
        driver.tick(now + FRAME);
        assert_eq!(driver.target_progress(), 2.0);
        assert_eq!(driver.velocity(), 0.0);
    }

    #[test]
    fn test_input_scaled_by_section_height() {
        let mut driver = MomentumDriver::new(config(), 3);
        driver.set_section_heights(vec![2.0, 1.0, 1.0]);
        driver.on_wheel(10.0, Instant::now());
        assert!((driver.velocity() - 0.05).abs() < 1e-12);
    }

    #[test]
    fn test_full_cycle_settles_on_exact_integer() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut driver = MomentumDriver::new(config(), 5).with_event_sender(tx);
        let start = Instant::now();

        driver.on_wheel(12.0, start);
        assert_eq!(driver.phase(), MomentumPhase::FreeRunning);
        driver.tick(start + FRAME);
        driver.tick(start + FRAME * 2);
        assert_eq!(driver.phase(), MomentumPhase::Decaying);

        let now = run_until(&mut driver, start, 500, |d| d.phase() == MomentumPhase::SnapPending);
        assert_eq!(driver.phase(), MomentumPhase::SnapPending);
        assert!(driver.target_progress() > 1.0);

        // Nothing happens before the delay elapses
        driver.tick(now + Duration::from_millis(100));
        assert_eq!(driver.phase(), MomentumPhase::SnapPending);

        let now = now + driver.config().snap_delay();
        driver.tick(now);
        assert_eq!(driver.phase(), MomentumPhase::Snapping);

        driver.tick(now + Duration::from_millis(300));
        assert_eq!(driver.phase(), MomentumPhase::Snapping);

        driver.tick(now + driver.config().snap_duration());
        assert_eq!(driver.phase(), MomentumPhase::Settled);
        assert_eq!(driver.progress(), driver.progress().round());
        assert_eq!(driver.progress(), driver.target_progress());
        assert!(!driver.needs_update());

        let events: Vec<MomentumEvent> = std::iter::from_fn(|| rx.try_recv().ok()).collect();
        assert!(matches!(events.first(), Some(MomentumEvent::SnapStarted { .. })));
        assert!(matches!(events.last(), Some(MomentumEvent::Settled { .. })));
    }

    #[test]
    fn test_input_cancels_pending_and_running_snap() {
        let mut driver = MomentumDriver::new(config(), 5);
        let start = Instant::now();
        driver.on_wheel(12.0, start);
        let now = run_until(&mut driver, start, 500, |d| d.phase() == MomentumPhase::SnapPending);

        driver.on_wheel(1.0, now);
        assert_eq!(driver.phase(), MomentumPhase::FreeRunning);

        let now = run_until(&mut driver, now, 500, |d| d.phase() == MomentumPhase::SnapPending);
        let now = now + driver.config().snap_delay();
        driver.tick(now);
        assert_eq!(driver.phase(), MomentumPhase::Snapping);

        driver.tick(now + Duration::from_millis(100));
        let mid = driver.progress();
        driver.on_wheel(1.0, now + Duration::from_millis(120));
        assert_eq!(driver.phase(), MomentumPhase::FreeRunning);
        assert_eq!(driver.target_progress(), mid);
    }

    #[test]
    fn test_tall_section_suppresses_mid_snap() {
        let mut driver = MomentumDriver::new(config(), 3);
        driver.set_section_heights(vec![3.0, 1.0, 1.0]);

        // Edge band of a 3-viewport section is 0.05 of its length
        assert!(!driver.snap_allowed(0.5));
        assert!(driver.snap_allowed(0.02));
        assert!(driver.snap_allowed(0.97));
        assert!(driver.snap_allowed(1.5));

        driver.jump_to(0.5);
        driver.on_touch_start(100.0, Instant::now());
        driver.on_touch_end(Instant::now());
        assert_eq!(driver.phase(), MomentumPhase::Settled);
    }

    #[test]
    fn test_touch_drag_adds_velocity() {
        let mut driver = MomentumDriver::new(config(), 5);
        let now = Instant::now();
        driver.on_touch_start(300.0, now);
        driver.on_touch_move(250.0, now + FRAME);
        assert!((driver.velocity() - 0.2).abs() < 1e-12);
        assert_eq!(driver.phase(), MomentumPhase::FreeRunning);
    }

    #[test]
    fn test_release_after_resting_finger_snaps() {
        let mut driver = MomentumDriver::new(config(), 5);
        let start = Instant::now();
        driver.on_touch_start(300.0, start);
        driver.on_touch_move(290.0, start + FRAME);

        // Finger held still while friction drains the drag velocity
        let held = run_until(&mut driver, start + FRAME, 300, |d| d.velocity() == 0.0);
        assert_eq!(driver.velocity(), 0.0);
        assert_eq!(driver.phase(), MomentumPhase::Decaying);
        assert!(driver.target_progress().fract() != 0.0);

        driver.on_touch_end(held);
        assert_eq!(driver.phase(), MomentumPhase::SnapPending);

        let config = driver.config().clone();
        let now = held + config.snap_delay();
        driver.tick(now);
        assert_eq!(driver.phase(), MomentumPhase::Snapping);
        driver.tick(now + config.snap_duration());

        assert_eq!(driver.phase(), MomentumPhase::Settled);
        assert_eq!(driver.progress(), driver.progress().round());
        assert!(!driver.needs_update());

        // A stray release with no touch in progress leaves it at rest
        driver.on_touch_end(now + config.snap_duration());
        assert_eq!(driver.phase(), MomentumPhase::Settled);
    }

    #[test]
    fn test_snap_to_takes_nearest_path_when_infinite() {
        let mut driver = MomentumDriver::new(MomentumConfig { infinite: true, ..config() }, 5);
        let now = Instant::now();
        driver.jump_to(4.0);
        driver.snap_to(0, now);
        driver.tick(now + Duration::from_millis(300));
        // Moving forward through 4.x toward 5 == 0, not backward through 3, 2, 1
        assert!(driver.progress() > 4.0);

        driver.tick(now + driver.config().snap_duration());
        assert_eq!(driver.progress(), 0.0);
        assert_eq!(driver.current_index(), 0);
    }

    #[test]
    fn test_set_total_sections_rebounds_positions() {
        let mut driver = MomentumDriver::new(config(), 5);
        driver.jump_to(4.0);
        driver.set_total_sections(3);
        assert_eq!(driver.progress(), 2.0);
        assert_eq!(driver.target_progress(), 2.0);

        driver.set_total_sections(0);
        assert_eq!(driver.progress(), 0.0);
        driver.on_wheel(10.0, Instant::now());
        assert_eq!(driver.velocity(), 0.0);
    }

    #[test]
    fn test_destroy_is_idempotent_and_stops_input() {
        let mut driver = MomentumDriver::new(config(), 5);
        let now = Instant::now();
        driver.on_wheel(10.0, now);
        driver.snap_to(2, now);
        driver.destroy();
        driver.destroy();

        assert!(driver.is_destroyed());
        assert_eq!(driver.velocity(), 0.0);
        driver.on_wheel(10.0, now);
        driver.tick(now + FRAME);
        assert_eq!(driver.velocity(), 0.0);
        assert!(!driver.needs_update());
    }
}
