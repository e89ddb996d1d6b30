use glam::{Quat, Vec3};

use crate::animation::tracks::{KeyframeCursor, KeyframeTrack};
use crate::skeleton::BoneTransform;

/// Keyframes for a single bone, relative to its bind pose.
///
/// - `rotation` is applied on top of the bind rotation
/// - `translation` is added to the bind translation
/// - `scale` multiplies the bind scale
///
/// Absent translation/scale tracks leave the bind values untouched.
#[derive(Debug, Clone)]
pub struct BoneTrack {
    pub bone: usize,
    pub rotation: KeyframeTrack<Quat>,
    pub translation: Option<KeyframeTrack<Vec3>>,
    pub scale: Option<KeyframeTrack<Vec3>>,
}

impl BoneTrack {
    #[must_use]
    pub fn new(bone: usize, rotation: KeyframeTrack<Quat>) -> Self {
        Self {
            bone,
            rotation,
            translation: None,
            scale: None,
        }
    }

    #[must_use]
    pub fn with_translation(mut self, translation: KeyframeTrack<Vec3>) -> Self {
        self.translation = Some(translation);
        self
    }

    #[must_use]
    pub fn with_scale(mut self, scale: KeyframeTrack<Vec3>) -> Self {
        self.scale = Some(scale);
        self
    }

    #[must_use]
    pub fn end_time(&self) -> f32 {
        let mut end = self.rotation.end_time();
        if let Some(t) = &self.translation {
            end = end.max(t.end_time());
        }
        if let Some(s) = &self.scale {
            end = end.max(s.end_time());
        }
        end
    }

    /// Samples the bind-relative delta at `time`.
    pub fn sample_delta(&self, time: f32, cursors: &mut TrackCursors) -> BoneTransform {
        BoneTransform {
            rotation: self.rotation.sample_with_cursor(time, &mut cursors.rotation),
            translation: self
                .translation
                .as_ref()
                .map_or(Vec3::ZERO, |t| t.sample_with_cursor(time, &mut cursors.translation)),
            scale: self
                .scale
                .as_ref()
                .map_or(Vec3::ONE, |s| s.sample_with_cursor(time, &mut cursors.scale)),
        }
    }
}

/// One cursor per channel of a [`BoneTrack`].
#[derive(Debug, Clone, Default)]
pub struct TrackCursors {
    pub rotation: KeyframeCursor,
    pub translation: KeyframeCursor,
    pub scale: KeyframeCursor,
}

/// Named set of per-bone tracks.
///
/// A clip with `duration == 0.0` is a static pose: each track has a single
/// key at `t = 0`.
#[derive(Debug, Clone)]
pub struct AnimationClip {
    pub name: String,
    pub duration: f32,
    pub tracks: Vec<BoneTrack>,
}

impl AnimationClip {
    /// Builds a clip whose duration is the latest key time across its tracks.
    #[must_use]
    pub fn new(name: impl Into<String>, tracks: Vec<BoneTrack>) -> Self {
        let duration = tracks
            .iter()
            .map(BoneTrack::end_time)
            .fold(0.0_f32, f32::max);

        Self {
            name: name.into(),
            duration,
            tracks,
        }
    }

    #[inline]
    #[must_use]
    pub fn is_static(&self) -> bool {
        self.duration <= 0.0
    }

    /// The track driving `bone`, if any.
    #[must_use]
    pub fn track_for_bone(&self, bone: usize) -> Option<&BoneTrack> {
        self.tracks.iter().find(|t| t.bone == bone)
    }
}
