use std::sync::Arc;

use glam::Vec3;

use crate::animation::clip::{AnimationClip, BoneTrack};
use crate::animation::store::ClipStore;
use crate::animation::tracks::KeyframeTrack;
use crate::skeleton::{BindPoseCache, Skeleton};

/// Freezes a skeleton's current pose into a static clip.
pub struct PoseCapture;

impl PoseCapture {
    /// Builds a zero-duration clip with one track per bone.
    ///
    /// Each rotation key is the bone's delta over its bind rotation.
    /// Translation and scale are written as identity placeholders: only the
    /// rotational pose is captured.
    #[must_use]
    pub fn capture_current_pose_as_clip(
        skeleton: &Skeleton,
        bind_pose: &BindPoseCache,
        clip_name: &str,
    ) -> AnimationClip {
        let tracks = skeleton
            .bones()
            .iter()
            .enumerate()
            .map(|(index, bone)| {
                let delta = bind_pose.delta_rotation(index, bone.local_rotation());
                BoneTrack::new(index, KeyframeTrack::constant(delta))
                    .with_translation(KeyframeTrack::constant(Vec3::ZERO))
                    .with_scale(KeyframeTrack::constant(Vec3::ONE))
            })
            .collect();

        AnimationClip::new(clip_name, tracks)
    }

    /// Captures the pose and stores it under `clip_name`, replacing any clip
    /// already there.
    ///
    /// A channel already playing `clip_name` keeps the old clip until
    /// [`AnimationChannel::refresh_active_clip`](crate::animation::AnimationChannel::refresh_active_clip)
    /// is called.
    pub fn capture_into(
        store: &mut impl ClipStore,
        skeleton: &Skeleton,
        clip_name: &str,
    ) -> Arc<AnimationClip> {
        let clip = Arc::new(Self::capture_current_pose_as_clip(
            skeleton,
            skeleton.bind_pose(),
            clip_name,
        ));

        if store.remove(clip_name).is_some() {
            log::debug!("Replacing captured pose '{clip_name}'");
        }
        store.put(clip_name, Arc::clone(&clip));
        clip
    }
}
