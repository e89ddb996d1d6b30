//! Skeletal pose bookkeeping and animation cross-fading.
//!
//! # Overview
//!
//! - [`skeleton`]: bone hierarchy, bind pose, world/local pose conversion
//! - [`animation`]: clips, pose capture, playback channels, evaluation
//! - [`settings`]: per-channel playback configuration
//! - [`errors`]: the crate error type
//!
//! # Frame loop
//!
//! ```rust,ignore
//! let mut channel = AnimationChannel::new(&mut skeleton, AnimationSettings::default())?;
//! let mut evaluator = SkeletalEvaluator::new();
//!
//! channel.blend_to(Some("walk"), &clips, &mut skeleton)?;
//! loop {
//!     AnimationSystem::update(&mut channel, &mut evaluator, &mut skeleton, dt)?;
//!     let hand = PoseResolver::world_location(&owner, &skeleton, hand_index);
//! }
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod animation;
pub mod errors;
pub mod settings;
pub mod skeleton;

pub use animation::{
    AnimationChannel, AnimationClip, AnimationEvaluator, AnimationSystem, BoneTrack, ClipLibrary,
    ClipStore, LoopMode, PoseCapture, SkeletalEvaluator, Transition,
};
pub use errors::{AnimationError, Result};
pub use settings::AnimationSettings;
pub use skeleton::{
    BindPoseCache, Bone, BoneTransform, OwnerTransform, PoseResolver, Skeleton, SkeletonBuilder,
    Transform,
};
