use std::sync::Arc;

use uuid::Uuid;

use crate::animation::clip::AnimationClip;
use crate::animation::store::ClipStore;
use crate::errors::{AnimationError, Result};
use crate::settings::AnimationSettings;
use crate::skeleton::Skeleton;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopMode {
    /// Wrap around to the start.
    Loop,
    /// Stop on the last frame and force the speed to zero.
    Once,
    /// Hold the last frame, keeping the nominal speed.
    Clamp,
}

/// Wraps `time` into `[0, period)`.
pub fn wrap_time(time: f32, period: f32) -> Result<f32> {
    if period.is_nan() || period <= 0.0 {
        return Err(AnimationError::InvalidPeriod(period));
    }
    let wrapped = time.rem_euclid(period);
    // rem_euclid can round up to `period` for tiny negative inputs
    Ok(if wrapped >= period { 0.0 } else { wrapped })
}

/// A cross-fade the evaluator should perform, from whatever pose is current
/// when it picks the request up toward the start of `to`.
#[derive(Debug, Clone, PartialEq)]
pub struct CrossFade {
    /// Clip that was playing, `None` when leaving the bind pose.
    pub from: Option<String>,
    pub to: String,
    pub duration: f32,
}

/// What a call to [`AnimationChannel::blend_to`] did.
#[derive(Debug, Clone, PartialEq)]
pub enum Transition {
    /// Snapped to the bind pose without a fade.
    BindPose,
    /// The requested clip was already playing.
    Unchanged,
    /// Switched clips; the evaluator will fade.
    CrossFade(CrossFade),
}

#[derive(Debug, Clone)]
pub enum ChannelState {
    BindPose,
    Playing {
        clip: Arc<AnimationClip>,
        time: f32,
        speed: f32,
        loop_mode: LoopMode,
    },
}

/// Per-character playback state: which clip is selected and how far into it.
///
/// A channel is tied to the skeleton it was created for. Driving another
/// skeleton with it panics.
#[derive(Debug, Clone)]
pub struct AnimationChannel {
    skeleton_id: Uuid,
    settings: AnimationSettings,
    state: ChannelState,
    pending_fade: Option<CrossFade>,
}

impl AnimationChannel {
    /// Creates a channel for `skeleton` and puts the skeleton in its bind pose.
    pub fn new(skeleton: &mut Skeleton, settings: AnimationSettings) -> Result<Self> {
        settings.validate()?;
        skeleton.reset_to_bind_pose();
        skeleton.update_model_transforms();
        Ok(Self {
            skeleton_id: skeleton.id(),
            settings,
            state: ChannelState::BindPose,
            pending_fade: None,
        })
    }

    /// Switches to `target`, or to the bind pose for `None`.
    ///
    /// - `None`: every bone snaps to its bind transform, time is discarded
    ///   and any pending fade is dropped.
    /// - the clip already playing: no-op.
    /// - another clip: restarts at `t = 0` with the configured speed and
    ///   loop mode, and queues a [`CrossFade`] for the evaluator. A newer
    ///   request replaces an older one.
    ///
    /// An unknown clip name returns [`AnimationError::ClipNotFound`] and
    /// leaves the channel as it was.
    pub fn blend_to(
        &mut self,
        target: Option<&str>,
        clips: &impl ClipStore,
        skeleton: &mut Skeleton,
    ) -> Result<Transition> {
        self.assert_owner(skeleton);

        let Some(name) = target else {
            self.state = ChannelState::BindPose;
            self.pending_fade = None;
            skeleton.reset_to_bind_pose();
            skeleton.update_model_transforms();
            log::debug!("Channel on '{}' -> bind pose", skeleton.name);
            return Ok(Transition::BindPose);
        };

        if self.active_clip_name() == Some(name) {
            return Ok(Transition::Unchanged);
        }

        let clip = clips
            .get(name)
            .ok_or_else(|| AnimationError::ClipNotFound(name.to_string()))?;

        let fade = CrossFade {
            from: self.active_clip_name().map(str::to_string),
            to: name.to_string(),
            duration: self.settings.blend_duration,
        };
        log::debug!(
            "Channel on '{}': {:?} -> '{}' over {}s",
            skeleton.name,
            fade.from,
            fade.to,
            fade.duration
        );

        self.state = ChannelState::Playing {
            clip,
            time: 0.0,
            speed: self.settings.speed,
            loop_mode: self.settings.loop_mode,
        };
        self.pending_fade = Some(fade.clone());
        Ok(Transition::CrossFade(fade))
    }

    /// Re-reads the active clip from `clips` after it was replaced there, for
    /// instance by [`PoseCapture::capture_into`](crate::animation::PoseCapture::capture_into).
    ///
    /// [`Self::blend_to`] with the active name is a no-op even when the stored
    /// clip changed, so a replaced pose only shows after this call. Playback
    /// restarts from zero with a cross-fade, keeping speed and loop mode.
    /// Returns `Unchanged` in the bind pose or when the store still holds the
    /// clip being played.
    pub fn refresh_active_clip(
        &mut self,
        clips: &impl ClipStore,
        skeleton: &mut Skeleton,
    ) -> Result<Transition> {
        self.assert_owner(skeleton);

        let ChannelState::Playing { clip, time, .. } = &mut self.state else {
            return Ok(Transition::Unchanged);
        };
        let stored = clips
            .get(&clip.name)
            .ok_or_else(|| AnimationError::ClipNotFound(clip.name.clone()))?;
        if Arc::ptr_eq(&stored, clip) {
            return Ok(Transition::Unchanged);
        }

        let fade = CrossFade {
            from: Some(clip.name.clone()),
            to: stored.name.clone(),
            duration: self.settings.blend_duration,
        };
        log::debug!("Channel on '{}': reloading '{}'", skeleton.name, fade.to);

        *clip = stored;
        *time = 0.0;
        self.pending_fade = Some(fade.clone());
        Ok(Transition::CrossFade(fade))
    }

    /// Advances playback by `dt * speed` seconds.
    pub fn advance(&mut self, dt: f32) -> Result<()> {
        if !dt.is_finite() || dt < 0.0 {
            return Err(AnimationError::NegativeDeltaTime(dt));
        }

        let ChannelState::Playing {
            clip,
            time,
            speed,
            loop_mode,
        } = &mut self.state
        else {
            return Ok(());
        };

        if clip.is_static() {
            *time = 0.0;
            return Ok(());
        }

        let duration = clip.duration;
        let next = *time + dt * *speed;

        match loop_mode {
            LoopMode::Loop => *time = wrap_time(next, duration)?,
            LoopMode::Once => {
                if next >= duration {
                    *time = duration;
                    *speed = 0.0;
                } else {
                    *time = next;
                }
            }
            LoopMode::Clamp => *time = next.min(duration),
        }
        Ok(())
    }

    // ========================================================================
    // Setters
    // ========================================================================

    /// Sets the playback rate. Ignored in the bind pose.
    pub fn set_speed(&mut self, value: f32) -> Result<()> {
        if !value.is_finite() || value < 0.0 {
            return Err(AnimationError::InvalidSpeed(value));
        }
        if let ChannelState::Playing { speed, .. } = &mut self.state {
            *speed = value;
        }
        Ok(())
    }

    /// Jumps to `value`, folded into the clip range per the loop mode.
    /// Ignored in the bind pose.
    pub fn set_time(&mut self, value: f32) -> Result<()> {
        if !value.is_finite() || value < 0.0 {
            return Err(AnimationError::InvalidTime(value));
        }
        if let ChannelState::Playing {
            clip,
            time,
            loop_mode,
            ..
        } = &mut self.state
        {
            *time = if clip.is_static() {
                0.0
            } else if *loop_mode == LoopMode::Loop {
                wrap_time(value, clip.duration)?
            } else {
                value.min(clip.duration)
            };
        }
        Ok(())
    }

    pub fn set_loop_mode(&mut self, mode: LoopMode) {
        if let ChannelState::Playing { loop_mode, .. } = &mut self.state {
            *loop_mode = mode;
        }
    }

    // ========================================================================
    // Queries
    // ========================================================================

    #[inline]
    #[must_use]
    pub fn is_bind_pose_selected(&self) -> bool {
        matches!(self.state, ChannelState::BindPose)
    }

    #[must_use]
    pub fn active_clip_name(&self) -> Option<&str> {
        match &self.state {
            ChannelState::BindPose => None,
            ChannelState::Playing { clip, .. } => Some(clip.name.as_str()),
        }
    }

    #[must_use]
    pub fn clip(&self) -> Option<&Arc<AnimationClip>> {
        match &self.state {
            ChannelState::BindPose => None,
            ChannelState::Playing { clip, .. } => Some(clip),
        }
    }

    /// Seconds into the active clip. Always `0.0` for the bind pose and for
    /// static clips.
    #[must_use]
    pub fn time(&self) -> f32 {
        match &self.state {
            ChannelState::Playing { clip, time, .. } if !clip.is_static() => *time,
            _ => 0.0,
        }
    }

    /// Effective playback rate. Always `0.0` for the bind pose and for static
    /// clips, whatever the nominal speed.
    #[must_use]
    pub fn speed(&self) -> f32 {
        match &self.state {
            ChannelState::Playing { clip, speed, .. } if !clip.is_static() => *speed,
            _ => 0.0,
        }
    }

    #[must_use]
    pub fn loop_mode(&self) -> Option<LoopMode> {
        match &self.state {
            ChannelState::BindPose => None,
            ChannelState::Playing { loop_mode, .. } => Some(*loop_mode),
        }
    }

    #[inline]
    #[must_use]
    pub fn state(&self) -> &ChannelState {
        &self.state
    }

    #[inline]
    #[must_use]
    pub fn settings(&self) -> &AnimationSettings {
        &self.settings
    }

    #[inline]
    #[must_use]
    pub fn skeleton_id(&self) -> Uuid {
        self.skeleton_id
    }

    /// A cross-fade requested since the last call, if any.
    #[inline]
    pub fn take_cross_fade(&mut self) -> Option<CrossFade> {
        self.pending_fade.take()
    }

    /// # Panics
    /// If `skeleton` is not the one this channel was created for.
    pub fn assert_owner(&self, skeleton: &Skeleton) {
        assert_eq!(
            self.skeleton_id,
            skeleton.id(),
            "AnimationChannel used with skeleton '{}' it was not created for",
            skeleton.name
        );
    }
}
