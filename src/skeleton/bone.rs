use glam::{Affine3A, Quat, Vec3};

/// Translation / rotation / scale triple.
///
/// Used both for a bone's transform relative to its parent and for the
/// composed model-space result.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoneTransform {
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl BoneTransform {
    pub const IDENTITY: Self = Self {
        translation: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };

    #[must_use]
    pub const fn new(translation: Vec3, rotation: Quat, scale: Vec3) -> Self {
        Self {
            translation,
            rotation,
            scale,
        }
    }

    #[must_use]
    pub const fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }

    #[must_use]
    pub fn from_translation_rotation(translation: Vec3, rotation: Quat) -> Self {
        Self {
            translation,
            rotation,
            scale: Vec3::ONE,
        }
    }

    /// Places `local` inside `parent`.
    ///
    /// Scale is carried component-wise, so a non-uniformly scaled parent with a
    /// rotated child does not produce shear. That matches how bones are
    /// authored.
    #[inline]
    #[must_use]
    pub fn compose(parent: &Self, local: &Self) -> Self {
        Self {
            translation: parent.translation + parent.rotation * (parent.scale * local.translation),
            rotation: (parent.rotation * local.rotation).normalize(),
            scale: parent.scale * local.scale,
        }
    }

    #[inline]
    #[must_use]
    pub fn transform_point(&self, point: Vec3) -> Vec3 {
        self.translation + self.rotation * (self.scale * point)
    }

    #[must_use]
    pub fn to_affine(&self) -> Affine3A {
        Affine3A::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }
}

impl Default for BoneTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// A node of the skeleton.
///
/// `local` is what animation or user code writes; `bind` is the rest pose the
/// bone returns to on reset.
#[derive(Debug, Clone)]
pub struct Bone {
    pub(crate) name: String,
    pub(crate) parent: Option<usize>,

    pub(crate) local: BoneTransform,
    pub(crate) bind: BoneTransform,

    /// When set, the evaluator leaves `local` alone (ragdoll, IK, pose editor).
    pub(crate) user_controlled: bool,
}

impl Bone {
    pub(crate) fn new(name: String, parent: Option<usize>, rest: BoneTransform) -> Self {
        Self {
            name,
            parent,
            local: rest,
            bind: rest,
            user_controlled: false,
        }
    }

    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    #[must_use]
    pub fn parent(&self) -> Option<usize> {
        self.parent
    }

    /// Parent index in the `-1`-for-root convention used by skeleton assets.
    #[must_use]
    pub fn parent_index(&self) -> isize {
        self.parent.map_or(-1, |p| p as isize)
    }

    #[inline]
    #[must_use]
    pub fn local(&self) -> &BoneTransform {
        &self.local
    }

    #[inline]
    #[must_use]
    pub fn local_translation(&self) -> Vec3 {
        self.local.translation
    }

    #[inline]
    #[must_use]
    pub fn local_rotation(&self) -> Quat {
        self.local.rotation
    }

    #[inline]
    #[must_use]
    pub fn local_scale(&self) -> Vec3 {
        self.local.scale
    }

    #[inline]
    #[must_use]
    pub fn bind(&self) -> &BoneTransform {
        &self.bind
    }

    #[inline]
    #[must_use]
    pub fn bind_rotation(&self) -> Quat {
        self.bind.rotation
    }

    #[inline]
    #[must_use]
    pub fn is_user_controlled(&self) -> bool {
        self.user_controlled
    }
}
