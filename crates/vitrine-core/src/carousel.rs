//! # Carousel State Machine
//!
//! Pure slide-index state machine for the storefront hero carousel.
//!
//! ## State Machine
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Carousel State Machine                             │
//! │                                                                         │
//! │   current_slide ∈ [0, total_slides-1]     (always in range)            │
//! │                                                                         │
//! │   advance():  n-1 ──wrap──► 0        (wrap=true)                        │
//! │               n-1 ──stay──► n-1      (wrap=false)                       │
//! │   retreat():  0   ──wrap──► n-1      (wrap=true)                        │
//! │               0   ──stay──► 0        (wrap=false)                       │
//! │   go_to(i):   in-range ► jump, out-of-range ► SILENT NO-OP              │
//! │                                                                         │
//! │   TIMER RULE (enforced by vitrine-state's scheduler):                   │
//! │                                                                         │
//! │     timer armed  ⟺  is_auto_playing ∧ ¬is_paused                        │
//! │                                                                         │
//! │   pause()/resume()/toggle_auto_play() flip the flags; this crate        │
//! │   never owns a timer, it only answers `timer_armed()`.                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Out-of-range `go_to` requests are silently ignored rather than reported:
//! a dot-indicator click racing a slide-count change must never crash or
//! error the surrounding UI.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::DEFAULT_AUTOPLAY_INTERVAL_MS;

// =============================================================================
// Configuration
// =============================================================================

/// Immutable-per-lifetime configuration for a carousel.
///
/// `total_slides` is fixed for the life of the state machine; remounting
/// with a different slide count means constructing a new carousel.
///
/// Fields are private: [`CarouselConfig::new`] and the `with_*` builders
/// are the only construction path, so `total_slides >= 1` holds for every
/// value of this type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CarouselConfig {
    total_slides: usize,
    autoplay_interval: Duration,
    autoplay_enabled: bool,
    wrap: bool,
}

impl CarouselConfig {
    /// Creates a config with the default interval (5s), autoplay on, and
    /// wrapping enabled.
    pub fn new(total_slides: usize) -> CoreResult<Self> {
        if total_slides == 0 {
            return Err(CoreError::EmptyCarousel(total_slides));
        }

        Ok(CarouselConfig {
            total_slides,
            autoplay_interval: Duration::from_millis(DEFAULT_AUTOPLAY_INTERVAL_MS),
            autoplay_enabled: true,
            wrap: true,
        })
    }

    /// Sets the autoplay interval.
    pub fn with_interval(mut self, interval: Duration) -> CoreResult<Self> {
        if interval.is_zero() {
            return Err(CoreError::ZeroInterval);
        }
        self.autoplay_interval = interval;
        Ok(self)
    }

    /// Sets whether autoplay starts enabled.
    pub fn with_autoplay(mut self, enabled: bool) -> Self {
        self.autoplay_enabled = enabled;
        self
    }

    /// Sets whether slide navigation wraps around the ends.
    pub fn with_wrap(mut self, wrap: bool) -> Self {
        self.wrap = wrap;
        self
    }

    /// Number of slides. Always ≥ 1.
    pub fn total_slides(&self) -> usize {
        self.total_slides
    }

    /// Period between automatic advances.
    pub fn autoplay_interval(&self) -> Duration {
        self.autoplay_interval
    }

    /// Whether autoplay starts enabled.
    pub fn autoplay_enabled(&self) -> bool {
        self.autoplay_enabled
    }

    /// Whether advance/retreat wrap around the ends.
    pub fn wrap(&self) -> bool {
        self.wrap
    }
}

// =============================================================================
// Snapshot
// =============================================================================

/// Read-only view of carousel state, shaped for the frontend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CarouselSnapshot {
    /// Index of the currently displayed slide.
    pub current_slide: usize,

    /// Whether autoplay is enabled.
    pub is_auto_playing: bool,

    /// Whether autoplay is temporarily suppressed (e.g. pointer hover).
    pub is_paused: bool,
}

// =============================================================================
// Carousel
// =============================================================================

/// The carousel state machine.
///
/// ## Invariants
/// - `current_slide` is always within `[0, total_slides - 1]`
/// - Flag transitions never move the slide index
/// - The machine holds no timer; [`Carousel::timer_armed`] tells the
///   scheduler whether one should exist
#[derive(Debug, Clone)]
pub struct Carousel {
    config: CarouselConfig,
    current_slide: usize,
    is_auto_playing: bool,
    is_paused: bool,
}

impl Carousel {
    /// Creates a carousel at slide 0.
    pub fn new(config: CarouselConfig) -> Self {
        let is_auto_playing = config.autoplay_enabled;
        Carousel {
            config,
            current_slide: 0,
            is_auto_playing,
            is_paused: false,
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Index of the currently displayed slide.
    pub fn current_slide(&self) -> usize {
        self.current_slide
    }

    /// Number of slides.
    pub fn total_slides(&self) -> usize {
        self.config.total_slides
    }

    /// Current autoplay interval.
    pub fn autoplay_interval(&self) -> Duration {
        self.config.autoplay_interval
    }

    /// Whether autoplay is enabled.
    pub fn is_auto_playing(&self) -> bool {
        self.is_auto_playing
    }

    /// Whether autoplay is paused.
    pub fn is_paused(&self) -> bool {
        self.is_paused
    }

    /// Whether the recurring autoplay timer should currently be armed.
    ///
    /// This is the single predicate the scheduler consults:
    /// `is_auto_playing ∧ ¬is_paused`.
    pub fn timer_armed(&self) -> bool {
        self.is_auto_playing && !self.is_paused
    }

    /// Returns a frontend-shaped snapshot of the current state.
    pub fn snapshot(&self) -> CarouselSnapshot {
        CarouselSnapshot {
            current_slide: self.current_slide,
            is_auto_playing: self.is_auto_playing,
            is_paused: self.is_paused,
        }
    }

    // =========================================================================
    // Slide Transitions
    // =========================================================================

    /// Advances to the next slide.
    ///
    /// At the last slide: wraps to 0 when `wrap`, otherwise stays put.
    pub fn advance(&mut self) {
        let last = self.config.total_slides - 1;
        if self.current_slide == last {
            if self.config.wrap {
                self.current_slide = 0;
            }
        } else {
            self.current_slide += 1;
        }
    }

    /// Retreats to the previous slide.
    ///
    /// At slide 0: wraps to the last slide when `wrap`, otherwise stays put.
    pub fn retreat(&mut self) {
        if self.current_slide == 0 {
            if self.config.wrap {
                self.current_slide = self.config.total_slides - 1;
            }
        } else {
            self.current_slide -= 1;
        }
    }

    /// Jumps to `index` if it is in range; out-of-range requests are
    /// silently ignored.
    pub fn go_to(&mut self, index: usize) {
        if index < self.config.total_slides {
            self.current_slide = index;
        }
    }

    // =========================================================================
    // Flag Transitions
    // =========================================================================

    /// Pauses autoplay. The scheduler must disarm its timer immediately.
    pub fn pause(&mut self) {
        self.is_paused = true;
    }

    /// Resumes autoplay. Scheduling restarts on the next tick boundary;
    /// time spent paused is never "caught up".
    pub fn resume(&mut self) {
        self.is_paused = false;
    }

    /// Flips autoplay on/off. When off, no timer is armed regardless of the
    /// pause flag.
    pub fn toggle_auto_play(&mut self) {
        self.is_auto_playing = !self.is_auto_playing;
    }

    /// Changes the autoplay interval. The scheduler must tear down and
    /// re-arm its timer under the new period.
    pub fn set_interval(&mut self, interval: Duration) -> CoreResult<()> {
        if interval.is_zero() {
            return Err(CoreError::ZeroInterval);
        }
        self.config.autoplay_interval = interval;
        Ok(())
    }
}
