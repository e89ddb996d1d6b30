//! Animation
//!
//! Clips, playback channels and the evaluator that writes poses into a
//! [`Skeleton`](crate::skeleton::Skeleton).

pub mod capture;
pub mod channel;
pub mod clip;
pub mod evaluator;
pub mod store;
pub mod system;
pub mod tracks;
pub mod values;

pub use capture::PoseCapture;
pub use channel::{AnimationChannel, ChannelState, CrossFade, LoopMode, Transition, wrap_time};
pub use clip::{AnimationClip, BoneTrack, TrackCursors};
pub use evaluator::{AnimationEvaluator, SkeletalEvaluator};
pub use store::{ClipLibrary, ClipStore};
pub use system::AnimationSystem;
pub use tracks::{InterpolationMode, KeyframeCursor, KeyframeTrack};
pub use values::Interpolatable;
