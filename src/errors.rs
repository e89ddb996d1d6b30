//! Error Types
//!
//! This module defines the error types used throughout the pose subsystem.
//!
//! # Overview
//!
//! [`AnimationError`] covers the recoverable failure modes:
//! - Invalid arguments rejected at the call boundary (negative `dt`,
//!   non-positive periods, negative speeds)
//! - Malformed skeleton descriptions at construction time
//! - Clip lookups that miss while switching a channel
//!
//! Broken invariants (a bone index out of range, a channel driving a skeleton
//! it was not created for) are caller bugs and panic instead.
//!
//! ```rust,ignore
//! use myth_pose::errors::{AnimationError, Result};
//!
//! fn tick(channel: &mut AnimationChannel, dt: f32) -> Result<()> {
//!     channel.advance(dt)?;
//!     Ok(())
//! }
//! ```

use thiserror::Error;

/// The error type for skeleton and animation operations.
///
/// When an operation returns one of these, it has not mutated anything.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnimationError {
    // ========================================================================
    // Invalid Arguments
    // ========================================================================
    /// A time step was negative (or NaN).
    #[error("Delta time must be non-negative, got {0}")]
    NegativeDeltaTime(f32),

    /// A periodic time computation was given a period that is not positive.
    #[error("Period must be positive, got {0}")]
    InvalidPeriod(f32),

    /// Playback speed was negative or not finite.
    #[error("Playback speed must be a finite non-negative number, got {0}")]
    InvalidSpeed(f32),

    /// Playback time was negative or not finite.
    #[error("Playback time must be a finite non-negative number, got {0}")]
    InvalidTime(f32),

    /// Cross-fade duration was negative or not finite.
    #[error("Blend duration must be a finite non-negative number, got {0}")]
    InvalidBlendDuration(f32),

    // ========================================================================
    // Lookups
    // ========================================================================
    /// The requested clip does not exist in the clip store.
    #[error("Animation clip not found: {0}")]
    ClipNotFound(String),

    // ========================================================================
    // Skeleton Construction
    // ========================================================================
    /// Two bones share the same name.
    #[error("Duplicate bone name: {0}")]
    DuplicateBone(String),

    /// A bone names a parent that has not been declared before it.
    #[error("Bone '{bone}' refers to unknown parent '{parent}'")]
    UnknownParent {
        /// The bone being declared
        bone: String,
        /// The missing parent name
        parent: String,
    },

    /// A parent index does not precede its child.
    #[error("Bone {bone} has parent index {parent}, parents must precede children")]
    InvalidParentIndex {
        /// Index of the offending bone
        bone: usize,
        /// Its declared parent index
        parent: isize,
    },

    /// A supplied rest pose does not match the skeleton's bone count.
    #[error("Rest pose has {actual} rotations, skeleton has {expected} bones")]
    RestPoseLength {
        /// Bone count of the skeleton
        expected: usize,
        /// Length of the supplied pose
        actual: usize,
    },
}

/// Alias for `Result<T, AnimationError>`.
pub type Result<T> = std::result::Result<T, AnimationError>;
