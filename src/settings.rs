//! Animation Settings
//!
//! Per-channel playback configuration.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use myth_pose::{AnimationSettings, LoopMode};
//!
//! // Default: 0.3 s cross-fade, looping at normal speed
//! let settings = AnimationSettings::default();
//!
//! // Snappier transitions for a UI-driven pose editor
//! let settings = AnimationSettings::default()
//!     .with_blend_duration(0.1)
//!     .with_loop_mode(LoopMode::Clamp);
//! ```

use crate::animation::channel::LoopMode;
use crate::errors::{AnimationError, Result};

/// Default cross-fade length in seconds.
pub const DEFAULT_BLEND_DURATION: f32 = 0.3;

/// Playback configuration applied whenever a channel switches to a new clip.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationSettings {
    /// Length of the cross-fade requested by `blend_to`, in seconds.
    /// `0.0` switches instantly.
    pub blend_duration: f32,

    /// Loop mode a freshly selected clip starts with.
    pub loop_mode: LoopMode,

    /// Playback rate a freshly selected clip starts with.
    pub speed: f32,
}

impl Default for AnimationSettings {
    #[inline]
    fn default() -> Self {
        Self {
            blend_duration: DEFAULT_BLEND_DURATION,
            loop_mode: LoopMode::Loop,
            speed: 1.0,
        }
    }
}

impl AnimationSettings {
    #[must_use]
    pub fn with_blend_duration(mut self, seconds: f32) -> Self {
        self.blend_duration = seconds;
        self
    }

    #[must_use]
    pub fn with_loop_mode(mut self, loop_mode: LoopMode) -> Self {
        self.loop_mode = loop_mode;
        self
    }

    #[must_use]
    pub fn with_speed(mut self, speed: f32) -> Self {
        self.speed = speed;
        self
    }

    /// Checks that durations and rates are finite and non-negative.
    pub fn validate(&self) -> Result<()> {
        if !self.blend_duration.is_finite() || self.blend_duration < 0.0 {
            return Err(AnimationError::InvalidBlendDuration(self.blend_duration));
        }
        if !self.speed.is_finite() || self.speed < 0.0 {
            return Err(AnimationError::InvalidSpeed(self.speed));
        }
        Ok(())
    }
}
