//! # Carousel Scheduler
//!
//! Drives the pure [`Carousel`] state machine with a real autoplay timer.
//!
//! ## Scheduler Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    CarouselScheduler Loop                               │
//! │                                                                         │
//! │  CarouselHandle ──commands──► run() loop ◄──ticks── Option<Interval>    │
//! │  (advance, pause, ...)           │                                      │
//! │                                  ▼                                      │
//! │                        vitrine_core::Carousel                           │
//! │                                  │                                      │
//! │                                  ▼                                      │
//! │                   Arc<RwLock<CarouselSnapshot>>  (read by the UI)       │
//! │                                                                         │
//! │  TIMER RULE:                                                            │
//! │    armed  ⟺  is_auto_playing ∧ ¬is_paused                               │
//! │                                                                         │
//! │  • A flag transition or interval change tears the timer down and        │
//! │    re-arms it under the new condition                                   │
//! │  • Slide-only transitions (advance/retreat/goTo) keep the timer phase   │
//! │  • resume() schedules the next tick a full period out; time spent       │
//! │    paused is never caught up                                            │
//! │  • At most one interval exists per instance; task exit cancels it       │
//! │    unconditionally                                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The interval handle lives on the loop's stack, owned by this instance
//! alone; there is no shared or module-level timer state anywhere.

use std::sync::{Arc, RwLock};
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::{interval_at, Instant, Interval, MissedTickBehavior};
use tracing::{debug, warn};

use vitrine_core::{Carousel, CarouselConfig, CarouselSnapshot, CoreError};

use crate::error::{StateError, StateResult};

/// Command buffer size. UI interactions are slow; a shallow queue keeps
/// back-pressure immediate if something spins.
const COMMAND_BUFFER: usize = 16;

// =============================================================================
// Commands
// =============================================================================

/// Operations a handle can request from the scheduler loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CarouselCommand {
    Advance,
    Retreat,
    GoTo(usize),
    Pause,
    Resume,
    ToggleAutoPlay,
    SetInterval(Duration),
}

// =============================================================================
// Handle
// =============================================================================

/// Handle for controlling a running carousel scheduler.
///
/// Cloneable; the scheduler task exits when every handle is dropped or when
/// [`CarouselHandle::shutdown`] is called, cancelling the timer either way.
#[derive(Debug, Clone)]
pub struct CarouselHandle {
    snapshot: Arc<RwLock<CarouselSnapshot>>,
    cmd_tx: mpsc::Sender<CarouselCommand>,
    shutdown_tx: mpsc::Sender<()>,
}

impl CarouselHandle {
    /// Returns the current carousel state.
    pub fn snapshot(&self) -> CarouselSnapshot {
        *self.snapshot.read().expect("Carousel snapshot lock poisoned")
    }

    /// Advances to the next slide.
    pub async fn advance(&self) -> StateResult<()> {
        self.send(CarouselCommand::Advance).await
    }

    /// Retreats to the previous slide.
    pub async fn retreat(&self) -> StateResult<()> {
        self.send(CarouselCommand::Retreat).await
    }

    /// Jumps to `index`; out-of-range requests are silently ignored.
    pub async fn go_to(&self, index: usize) -> StateResult<()> {
        self.send(CarouselCommand::GoTo(index)).await
    }

    /// Pauses autoplay; the timer is disarmed before the next tick fires.
    pub async fn pause(&self) -> StateResult<()> {
        self.send(CarouselCommand::Pause).await
    }

    /// Resumes autoplay on a fresh tick boundary.
    pub async fn resume(&self) -> StateResult<()> {
        self.send(CarouselCommand::Resume).await
    }

    /// Flips autoplay on/off.
    pub async fn toggle_auto_play(&self) -> StateResult<()> {
        self.send(CarouselCommand::ToggleAutoPlay).await
    }

    /// Changes the autoplay interval; the timer is re-armed under the new
    /// period.
    pub async fn set_interval(&self, interval: Duration) -> StateResult<()> {
        if interval.is_zero() {
            return Err(StateError::InvalidConfig(CoreError::ZeroInterval));
        }
        self.send(CarouselCommand::SetInterval(interval)).await
    }

    /// Signals the scheduler to shut down, cancelling the timer.
    pub async fn shutdown(&self) {
        let _ = self.shutdown_tx.send(()).await;
    }

    async fn send(&self, command: CarouselCommand) -> StateResult<()> {
        self.cmd_tx
            .send(command)
            .await
            .map_err(|_| StateError::ChannelClosed("carousel command channel".into()))
    }
}

// =============================================================================
// Scheduler
// =============================================================================

/// The carousel scheduler task.
pub struct CarouselScheduler {
    carousel: Carousel,
    snapshot: Arc<RwLock<CarouselSnapshot>>,
    cmd_rx: mpsc::Receiver<CarouselCommand>,
    shutdown_rx: mpsc::Receiver<()>,
}

impl CarouselScheduler {
    /// Spawns a scheduler for `config` and returns its handle.
    pub fn spawn(config: CarouselConfig) -> CarouselHandle {
        let carousel = Carousel::new(config);
        let snapshot = Arc::new(RwLock::new(carousel.snapshot()));
        let (cmd_tx, cmd_rx) = mpsc::channel(COMMAND_BUFFER);
        let (shutdown_tx, shutdown_rx) = mpsc::channel(1);

        let scheduler = CarouselScheduler {
            carousel,
            snapshot: snapshot.clone(),
            cmd_rx,
            shutdown_rx,
        };

        tokio::spawn(scheduler.run());

        CarouselHandle {
            snapshot,
            cmd_tx,
            shutdown_tx,
        }
    }

    /// Runs the scheduler loop. Exits on shutdown or when every handle is
    /// dropped; the timer dies with the loop.
    async fn run(mut self) {
        debug!(
            total_slides = self.carousel.total_slides(),
            armed = self.carousel.timer_armed(),
            "Carousel scheduler starting"
        );

        let mut ticker: Option<Interval> = self
            .carousel
            .timer_armed()
            .then(|| arm(self.carousel.autoplay_interval()));

        loop {
            tokio::select! {
                _ = next_tick(&mut ticker) => {
                    self.carousel.advance();
                    self.publish();
                }

                command = self.cmd_rx.recv() => match command {
                    Some(command) => self.apply(command, &mut ticker),
                    // Every handle dropped: unmount.
                    None => {
                        debug!("All carousel handles dropped, stopping scheduler");
                        break;
                    }
                },

                _ = self.shutdown_rx.recv() => {
                    debug!("Carousel scheduler shutting down");
                    break;
                }
            }
        }

        debug!("Carousel scheduler stopped");
    }

    /// Applies one command and re-arms the timer when the arming condition
    /// or the period changed. Slide-only transitions keep the timer phase.
    fn apply(&mut self, command: CarouselCommand, ticker: &mut Option<Interval>) {
        let was_armed = self.carousel.timer_armed();
        let mut period_changed = false;

        match command {
            CarouselCommand::Advance => self.carousel.advance(),
            CarouselCommand::Retreat => self.carousel.retreat(),
            CarouselCommand::GoTo(index) => self.carousel.go_to(index),
            CarouselCommand::Pause => self.carousel.pause(),
            CarouselCommand::Resume => self.carousel.resume(),
            CarouselCommand::ToggleAutoPlay => self.carousel.toggle_auto_play(),
            CarouselCommand::SetInterval(interval) => {
                // Zero intervals are rejected at the handle; a failure here
                // means a raced invalid command and is safe to drop.
                match self.carousel.set_interval(interval) {
                    Ok(()) => period_changed = true,
                    Err(error) => warn!(%error, "Ignoring invalid interval"),
                }
            }
        }

        self.publish();

        let now_armed = self.carousel.timer_armed();
        if was_armed != now_armed || (now_armed && period_changed) {
            // Tear down and re-arm under the new condition. Disarming takes
            // effect immediately: no stray tick can fire once paused.
            *ticker = now_armed.then(|| arm(self.carousel.autoplay_interval()));
        }
    }

    fn publish(&self) {
        *self
            .snapshot
            .write()
            .expect("Carousel snapshot lock poisoned") = self.carousel.snapshot();
    }
}

/// Arms a fresh interval whose first tick is a full period away: resuming
/// never replays ticks that would have fired while paused.
fn arm(period: Duration) -> Interval {
    let mut interval = interval_at(Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    interval
}

/// Resolves on the next tick when armed; pends forever when disarmed.
async fn next_tick(ticker: &mut Option<Interval>) {
    match ticker {
        Some(interval) => {
            interval.tick().await;
        }
        None => std::future::pending().await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PERIOD: Duration = Duration::from_millis(100);

    fn config(total: usize) -> CarouselConfig {
        CarouselConfig::new(total)
            .unwrap()
            .with_interval(PERIOD)
            .unwrap()
    }

    async fn wait_for<F: Fn(&CarouselSnapshot) -> bool>(handle: &CarouselHandle, pred: F) {
        tokio::time::timeout(Duration::from_secs(5), async {
            loop {
                if pred(&handle.snapshot()) {
                    return;
                }
                tokio::task::yield_now().await;
            }
        })
        .await
        .expect("condition not reached");
    }

    #[tokio::test(start_paused = true)]
    async fn test_autoplay_advances_on_each_period() {
        let handle = CarouselScheduler::spawn(config(3));

        tokio::time::sleep(PERIOD + Duration::from_millis(10)).await;
        assert_eq!(handle.snapshot().current_slide, 1);

        tokio::time::sleep(PERIOD).await;
        assert_eq!(handle.snapshot().current_slide, 2);

        // Wraps back around.
        tokio::time::sleep(PERIOD).await;
        assert_eq!(handle.snapshot().current_slide, 0);

        handle.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_pause_suppresses_autoplay_for_any_elapsed_time() {
        let handle = CarouselScheduler::spawn(config(3));

        handle.pause().await.unwrap();
        wait_for(&handle, |s| s.is_paused).await;

        let before = handle.snapshot().current_slide;
        tokio::time::sleep(PERIOD * 50).await;
        assert_eq!(handle.snapshot().current_slide, before);

        handle.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_resume_restarts_without_catch_up() {
        let handle = CarouselScheduler::spawn(config(4));

        handle.pause().await.unwrap();
        wait_for(&handle, |s| s.is_paused).await;
        tokio::time::sleep(PERIOD * 10).await;

        handle.resume().await.unwrap();
        wait_for(&handle, |s| !s.is_paused).await;

        // Exactly one advance a full period after resume; the ten paused
        // periods are not replayed.
        tokio::time::sleep(PERIOD + Duration::from_millis(10)).await;
        assert_eq!(handle.snapshot().current_slide, 1);

        handle.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_toggle_auto_play_disarms_timer() {
        let handle = CarouselScheduler::spawn(config(3));

        handle.toggle_auto_play().await.unwrap();
        wait_for(&handle, |s| !s.is_auto_playing).await;

        tokio::time::sleep(PERIOD * 10).await;
        assert_eq!(handle.snapshot().current_slide, 0);

        // Toggling back on re-arms.
        handle.toggle_auto_play().await.unwrap();
        wait_for(&handle, |s| s.is_auto_playing).await;
        tokio::time::sleep(PERIOD + Duration::from_millis(10)).await;
        assert_eq!(handle.snapshot().current_slide, 1);

        handle.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_manual_navigation_and_silent_out_of_range() {
        let handle = CarouselScheduler::spawn(config(5));
        handle.pause().await.unwrap();
        wait_for(&handle, |s| s.is_paused).await;

        handle.go_to(3).await.unwrap();
        wait_for(&handle, |s| s.current_slide == 3).await;

        handle.advance().await.unwrap();
        wait_for(&handle, |s| s.current_slide == 4).await;

        handle.retreat().await.unwrap();
        wait_for(&handle, |s| s.current_slide == 3).await;

        // Out of range: silently ignored.
        handle.go_to(99).await.unwrap();
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(handle.snapshot().current_slide, 3);

        handle.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_set_interval_rearms_under_new_period() {
        let handle = CarouselScheduler::spawn(config(10));

        let slow = PERIOD * 10;
        handle.set_interval(slow).await.unwrap();
        // Command processed once visible state settles on the next probe.
        tokio::time::sleep(Duration::from_millis(10)).await;

        // Old period elapses without a tick...
        tokio::time::sleep(PERIOD * 2).await;
        assert_eq!(handle.snapshot().current_slide, 0);

        // ...the new period fires.
        tokio::time::sleep(slow).await;
        assert_eq!(handle.snapshot().current_slide, 1);

        handle.shutdown().await;
    }

    #[tokio::test]
    async fn test_set_interval_rejects_zero() {
        let handle = CarouselScheduler::spawn(config(3));
        let err = handle.set_interval(Duration::ZERO).await.unwrap_err();
        assert!(matches!(err, StateError::InvalidConfig(_)));
        handle.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_cancels_timer() {
        let handle = CarouselScheduler::spawn(config(3));

        handle.shutdown().await;
        // Give the loop a moment to exit, then confirm no stray tick fires.
        tokio::time::sleep(Duration::from_millis(10)).await;
        tokio::time::sleep(PERIOD * 10).await;
        assert_eq!(handle.snapshot().current_slide, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_autoplay_disabled_initially_stays_put() {
        let handle = CarouselScheduler::spawn(config(3).with_autoplay(false));

        tokio::time::sleep(PERIOD * 10).await;
        assert_eq!(handle.snapshot().current_slide, 0);
        assert!(!handle.snapshot().is_auto_playing);

        handle.shutdown().await;
    }
}
