use std::time::Instant;

use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, trace};

use super::factory::DriverFactory;
use super::scroll::FrameReport;
use crate::config::FrameConfig;

/// Totals accumulated over one run of the loop
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoopSummary {
    pub frames: u64,
    pub applied_frames: u64,
    pub writes: u64,
}

impl LoopSummary {
    fn record(&mut self, report: FrameReport) {
        self.frames += 1;
        if report.applied {
            self.applied_frames += 1;
        }
        self.writes += report.writes as u64;
    }
}

/// Drives every live driver of a factory at a fixed frame rate
///
/// Runs on the caller's task; the factory is single-threaded so nothing here
/// needs to be `Send`.
pub struct FrameLoop {
    config: FrameConfig,
}

impl FrameLoop {
    pub fn new(config: FrameConfig) -> Self {
        Self { config }
    }

    /// Tick `factory` until `shutdown` flips to true
    pub async fn run(&self, factory: &DriverFactory, shutdown: watch::Receiver<bool>) -> LoopSummary {
        self.run_with(factory, shutdown, |_| {}).await
    }

    /// Like `run`, calling `before_frame` with the frame timestamp ahead of
    /// each pass. Input simulation hooks in here.
    pub async fn run_with<F>(
        &self,
        factory: &DriverFactory,
        mut shutdown: watch::Receiver<bool>,
        mut before_frame: F,
    ) -> LoopSummary
    where
        F: FnMut(Instant),
    {
        let mut summary = LoopSummary::default();
        if *shutdown.borrow() {
            return summary;
        }

        let tick = self.config.tick_duration();
        info!("Frame loop started: {:?} per frame", tick);

        let mut interval = tokio::time::interval(tick);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                result = shutdown.changed() => {
                    if result.is_err() || *shutdown.borrow() {
                        debug!("Frame loop received shutdown signal");
                        break;
                    }
                }

                _ = interval.tick() => {
                    before_frame(Instant::now());
                    let report = factory.frame();
                    trace!(applied = report.applied, writes = report.writes, "Frame");
                    summary.record(report);
                }
            }
        }

        info!(
            "Frame loop stopped after {} frames ({} applied, {} writes)",
            summary.frames, summary.applied_frames, summary.writes
        );
        summary
    }
}
