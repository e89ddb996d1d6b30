use glam::Quat;

use crate::errors::{AnimationError, Result};
use crate::skeleton::bone::Bone;

/// Inverse bind rotations, one per bone.
///
/// A bone's pose relative to rest is `inverse_bind * local_rotation`. At the
/// bind pose that product is the identity.
#[derive(Debug, Clone, Default)]
pub struct BindPoseCache {
    inverse_bind: Vec<Quat>,
}

impl BindPoseCache {
    /// Resets every bone to its bind transform and stores the inverse of
    /// each bind rotation.
    ///
    /// Idempotent. Call again after the bind pose has been redefined.
    pub fn capture(&mut self, bones: &mut [Bone]) {
        self.inverse_bind.clear();
        self.inverse_bind.reserve(bones.len());
        for bone in bones.iter_mut() {
            bone.local = bone.bind;
            self.inverse_bind.push(bone.local.rotation.normalize().inverse());
        }
        log::debug!("Bind pose captured for {} bones", bones.len());
    }

    /// Installs `rest_rotations` as the bind rotations, then captures.
    ///
    /// Nothing is modified when the length does not match the bone count.
    pub fn capture_with_rest(&mut self, bones: &mut [Bone], rest_rotations: &[Quat]) -> Result<()> {
        if rest_rotations.len() != bones.len() {
            return Err(AnimationError::RestPoseLength {
                expected: bones.len(),
                actual: rest_rotations.len(),
            });
        }
        for (bone, &rest) in bones.iter_mut().zip(rest_rotations) {
            bone.bind.rotation = rest;
        }
        self.capture(bones);
        Ok(())
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.inverse_bind.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inverse_bind.is_empty()
    }

    /// # Panics
    /// If `index` is out of range.
    #[inline]
    #[must_use]
    pub fn inverse_bind(&self, index: usize) -> Quat {
        self.check_index(index);
        self.inverse_bind[index]
    }

    /// Rotation applied on top of the bind pose: `inverse_bind * current`.
    #[inline]
    #[must_use]
    pub fn delta_rotation(&self, index: usize, current: Quat) -> Quat {
        self.check_index(index);
        (self.inverse_bind[index] * current).normalize()
    }

    /// Inverse of [`Self::delta_rotation`]: the local rotation that yields `delta`.
    #[inline]
    #[must_use]
    pub fn rotation_from_delta(&self, index: usize, delta: Quat) -> Quat {
        self.check_index(index);
        (self.inverse_bind[index].inverse() * delta).normalize()
    }

    #[inline]
    fn check_index(&self, index: usize) {
        assert!(
            index < self.inverse_bind.len(),
            "Bind pose: bone index {} out of range (bone count {})",
            index,
            self.inverse_bind.len()
        );
    }
}
