use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use crate::foundation::core::Fps;
use crate::foundation::error::StrataResult;
use crate::render::backend::Backend;
use crate::scene::graph::Scene;
use crate::view::frame::View;

/// What to do with ticks that came due while the previous frames were still running.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TickPolicy {
    /// Run one frame and drop every other overdue tick.
    #[default]
    Skip,
    /// Run at most one extra catch-up frame, drop the rest.
    QueueOne,
}

impl TickPolicy {
    fn allowed(self) -> u64 {
        match self {
            Self::Skip => 1,
            Self::QueueOne => 2,
        }
    }
}

/// Options for [`FrameDriver`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DriverOpts {
    /// Tick rate.
    pub fps: Fps,
    /// Overrun handling.
    pub policy: TickPolicy,
}

/// Cross-thread stop request for a running [`FrameDriver`].
#[derive(Clone, Debug, Default)]
pub struct ShutdownHandle(Arc<AtomicBool>);

impl ShutdownHandle {
    /// Ask the driver to return after the frame in progress.
    pub fn shutdown(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Whether a shutdown is pending.
    pub fn is_requested(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Fixed-rate scheduler calling [`View::run_frame`].
#[derive(Debug)]
pub struct FrameDriver {
    interval: Duration,
    policy: TickPolicy,
    next_due: Option<Instant>,
    skipped: u64,
    shutdown: ShutdownHandle,
}

impl FrameDriver {
    /// Create a driver; fails on an invalid frame rate.
    pub fn new(opts: DriverOpts) -> StrataResult<Self> {
        let fps = Fps::new(opts.fps.num, opts.fps.den)?;
        Ok(Self {
            interval: fps.frame_interval().max(Duration::from_nanos(1)),
            policy: opts.policy,
            next_due: None,
            skipped: 0,
            shutdown: ShutdownHandle::default(),
        })
    }

    /// Time between ticks.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Overdue ticks dropped so far.
    pub fn skipped(&self) -> u64 {
        self.skipped
    }

    /// Handle for stopping [`FrameDriver::run`] from another thread or from a handler.
    ///
    /// A request stops the current run, or the next one if none is in progress.
    pub fn shutdown_handle(&self) -> ShutdownHandle {
        self.shutdown.clone()
    }

    /// Number of frames to run at `now`.
    ///
    /// The first call arms the schedule and returns 0. Afterwards every elapsed interval is one
    /// tick; ticks beyond what the policy allows are dropped and counted in
    /// [`FrameDriver::skipped`]. The schedule stays phase-locked to the first call.
    pub fn ticks_due(&mut self, now: Instant) -> u64 {
        let Some(due) = self.next_due else {
            self.next_due = Some(now + self.interval);
            return 0;
        };
        if now < due {
            return 0;
        }

        let interval = self.interval.as_nanos();
        let behind = (now - due).as_nanos();
        let overdue = u64::try_from(1 + behind / interval).unwrap_or(u64::MAX);
        let run = overdue.min(self.policy.allowed());
        let dropped = overdue - run;
        if dropped > 0 {
            self.skipped = self.skipped.saturating_add(dropped);
            tracing::warn!(dropped, total = self.skipped, "frame driver fell behind");
        }

        let into_tick = u64::try_from(behind % interval).unwrap_or(0);
        self.next_due = Some(now + self.interval - Duration::from_nanos(into_tick));
        run
    }

    /// Drive `view` until `max_frames` frames ran or a shutdown was requested.
    ///
    /// Returns the number of frames run. Blocks the calling thread, sleeping between ticks.
    pub fn run<B: Backend>(
        &mut self,
        view: &mut View<B>,
        scene: &mut Scene<B>,
        max_frames: Option<u64>,
    ) -> u64 {
        let mut guard = RunGuard { driver: self };
        let limit = max_frames.unwrap_or(u64::MAX);
        let mut ran = 0;
        guard.driver.ticks_due(Instant::now());
        tracing::debug!(interval = ?guard.driver.interval, ?max_frames, "frame driver started");

        while ran < limit && !guard.driver.shutdown.is_requested() {
            let due = guard.driver.ticks_due(Instant::now());
            for _ in 0..due {
                if ran >= limit {
                    break;
                }
                view.run_frame(scene);
                ran += 1;
            }
            if due == 0 {
                let wait = guard
                    .driver
                    .next_due
                    .map_or(Duration::ZERO, |d| d.saturating_duration_since(Instant::now()));
                std::thread::sleep(wait);
            }
        }
        ran
    }
}

// Resets the schedule and the shutdown flag on every exit path of `run`.
struct RunGuard<'a> {
    driver: &'a mut FrameDriver,
}

impl Drop for RunGuard<'_> {
    fn drop(&mut self) {
        self.driver.next_due = None;
        self.driver.shutdown.0.store(false, Ordering::SeqCst);
        tracing::debug!(skipped = self.driver.skipped, "frame driver stopped");
    }
}

#[cfg(test)]
#[path = "../../tests/unit/view/driver.rs"]
mod tests;
