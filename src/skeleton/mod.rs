//! Skeleton
//!
//! Bone hierarchy, bind pose and world/local pose conversion.
//!
//! - [`Skeleton`]: ordered bones (parents first) with cached model-space transforms
//! - [`BindPoseCache`]: inverse bind rotations for pose-relative-to-rest deltas
//! - [`PoseResolver`]: world ↔ bone-local conversion through an [`OwnerTransform`]

pub mod bind_pose;
pub mod bone;
pub mod hierarchy;
pub mod owner;
pub mod resolve;

pub use bind_pose::BindPoseCache;
pub use bone::{Bone, BoneTransform};
pub use hierarchy::{Skeleton, SkeletonBuilder};
pub use owner::{OwnerTransform, Transform};
pub use resolve::PoseResolver;
