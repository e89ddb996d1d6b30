use std::sync::Arc;

use crate::animation::channel::AnimationChannel;
use crate::animation::clip::{AnimationClip, TrackCursors};
use crate::skeleton::{BoneTransform, Skeleton};

/// Turns a channel's state into bone local transforms once per frame.
///
/// Implementations must skip user-controlled bones, checking the flag per
/// bone, and must honour cross-fade requests taken from the channel.
pub trait AnimationEvaluator {
    fn evaluate(&mut self, channel: &mut AnimationChannel, skeleton: &mut Skeleton, dt: f32);
}

#[derive(Debug, Clone)]
struct ActiveFade {
    /// Local transforms at the moment the fade was requested, one per bone.
    from: Vec<BoneTransform>,
    elapsed: f32,
    duration: f32,
}

impl ActiveFade {
    fn weight(&self) -> f32 {
        (self.elapsed / self.duration).clamp(0.0, 1.0)
    }
}

/// Reference evaluator: samples bind-relative clip tracks and cross-fades
/// from a snapshot of the previous pose.
///
/// Every non-user-controlled bone is written each frame. Bones without a
/// track in the active clip take their bind transform, so the pose depends
/// only on the active clip and its time.
#[derive(Debug, Default)]
pub struct SkeletalEvaluator {
    fade: Option<ActiveFade>,
    clip: Option<Arc<AnimationClip>>,
    cursors: Vec<TrackCursors>,
}

impl SkeletalEvaluator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    #[must_use]
    pub fn is_fading(&self) -> bool {
        self.fade.is_some()
    }

    /// Progress of the running fade in `[0, 1]`, `None` when not fading.
    #[must_use]
    pub fn fade_weight(&self) -> Option<f32> {
        self.fade.as_ref().map(ActiveFade::weight)
    }

    fn bind_clip(&mut self, clip: &Arc<AnimationClip>, skeleton: &Skeleton) {
        let unchanged = self.clip.as_ref().is_some_and(|c| Arc::ptr_eq(c, clip));
        if unchanged {
            return;
        }

        for track in &clip.tracks {
            if track.bone >= skeleton.bone_count() {
                log::warn!(
                    "Clip '{}' has a track for bone {} but skeleton '{}' has {} bones, skipping",
                    clip.name,
                    track.bone,
                    skeleton.name,
                    skeleton.bone_count()
                );
            }
        }
        self.cursors = vec![TrackCursors::default(); clip.tracks.len()];
        self.clip = Some(Arc::clone(clip));
    }
}

impl AnimationEvaluator for SkeletalEvaluator {
    fn evaluate(&mut self, channel: &mut AnimationChannel, skeleton: &mut Skeleton, dt: f32) {
        channel.assert_owner(skeleton);

        let picked_up = channel.take_cross_fade();
        if let Some(request) = &picked_up {
            self.fade = (request.duration > 0.0).then(|| ActiveFade {
                from: skeleton.bones().iter().map(|b| *b.local()).collect(),
                elapsed: 0.0,
                duration: request.duration,
            });
        } else if let Some(fade) = &mut self.fade {
            fade.elapsed += dt;
        }

        let Some(clip) = channel.clip().cloned() else {
            // Bind pose: the channel already reset the bones
            self.fade = None;
            self.clip = None;
            return;
        };
        self.bind_clip(&clip, skeleton);

        let time = channel.time();
        let weight = self.fade.as_ref().map(ActiveFade::weight);

        // Bones the clip does not track are driven back to bind
        let mut targets: Vec<BoneTransform> = skeleton.bones().iter().map(|b| *b.bind()).collect();
        for (track, cursors) in clip.tracks.iter().zip(&mut self.cursors) {
            let index = track.bone;
            if index >= skeleton.bone_count() {
                continue;
            }
            let bind = targets[index];
            let delta = track.sample_delta(time, cursors);
            targets[index] = BoneTransform {
                translation: bind.translation + delta.translation,
                rotation: skeleton.bind_pose().rotation_from_delta(index, delta.rotation),
                scale: bind.scale * delta.scale,
            };
        }

        for (index, mut target) in targets.into_iter().enumerate() {
            if skeleton.bone(index).is_user_controlled() {
                continue;
            }
            if let (Some(w), Some(fade)) = (weight, &self.fade) {
                let from = fade.from[index];
                target = BoneTransform {
                    translation: from.translation.lerp(target.translation, w),
                    rotation: from.rotation.slerp(target.rotation, w),
                    scale: from.scale.lerp(target.scale, w),
                };
            }
            skeleton.set_local_transform(index, target);
        }

        if let Some(w) = weight {
            log::trace!("Fade into '{}' at {:.3}", clip.name, w);
            if w >= 1.0 {
                self.fade = None;
            }
        }

        skeleton.update_model_transforms();
    }
}
