use glam::{Quat, Vec3};
use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use uuid::Uuid;

use crate::errors::{AnimationError, Result};
use crate::skeleton::bind_pose::BindPoseCache;
use crate::skeleton::bone::{Bone, BoneTransform};

/// Ordered bone hierarchy plus its bind-pose bookkeeping.
///
/// Bones are stored parents-first: every non-root bone's parent index is
/// smaller than its own. This lets model-space transforms be composed in a
/// single forward pass.
///
/// The bone count and indices are fixed after construction.
///
/// A clone is a new skeleton instance with its own id, so channels created
/// for the original reject it.
#[derive(Debug)]
pub struct Skeleton {
    id: Uuid,
    pub name: String,

    // === Core Data ===
    bones: Vec<Bone>,
    name_lookup: FxHashMap<String, usize>,
    bind_pose: BindPoseCache,

    // === Runtime Data ===
    // Recomputed by `update_model_transforms`, read by the resolver
    model_transforms: Vec<BoneTransform>,
    model_dirty: bool,
}

impl Skeleton {
    /// Builds a skeleton from `(name, parent_index, rest)` entries, with `-1`
    /// marking a root.
    ///
    /// The bones start in their rest pose and the bind pose is captured from it.
    pub fn new<S: Into<String>>(
        name: &str,
        bones: impl IntoIterator<Item = (S, isize, BoneTransform)>,
    ) -> Result<Self> {
        let mut built = Vec::new();
        let mut name_lookup: FxHashMap<String, usize> = FxHashMap::default();

        for (index, (bone_name, parent, rest)) in bones.into_iter().enumerate() {
            let bone_name: String = bone_name.into();
            let parent = match parent {
                -1 => None,
                p if p >= 0 && (p as usize) < index => Some(p as usize),
                p => return Err(AnimationError::InvalidParentIndex { bone: index, parent: p }),
            };
            if name_lookup.insert(bone_name.clone(), index).is_some() {
                return Err(AnimationError::DuplicateBone(bone_name));
            }
            built.push(Bone::new(bone_name, parent, rest));
        }

        let count = built.len();
        let mut skeleton = Self {
            id: Uuid::new_v4(),
            name: name.to_string(),
            bones: built,
            name_lookup,
            bind_pose: BindPoseCache::default(),
            model_transforms: vec![BoneTransform::IDENTITY; count],
            model_dirty: true,
        };
        skeleton.capture_bind_pose();
        skeleton.update_model_transforms();

        log::debug!("Skeleton '{}' created with {} bones", skeleton.name, count);
        Ok(skeleton)
    }

    #[must_use]
    pub fn builder(name: &str) -> SkeletonBuilder {
        SkeletonBuilder::new(name)
    }

    #[inline]
    #[must_use]
    pub fn id(&self) -> Uuid {
        self.id
    }

    #[inline]
    #[must_use]
    pub fn bone_count(&self) -> usize {
        self.bones.len()
    }

    #[inline]
    #[must_use]
    pub fn bones(&self) -> &[Bone] {
        &self.bones
    }

    /// # Panics
    /// If `index` is out of range.
    #[inline]
    #[must_use]
    pub fn bone(&self, index: usize) -> &Bone {
        self.check_index(index);
        &self.bones[index]
    }

    #[must_use]
    pub fn find_index(&self, name: &str) -> Option<usize> {
        self.name_lookup.get(name).copied()
    }

    /// Direct children of `index`, in bone order.
    #[must_use]
    pub fn children(&self, index: usize) -> SmallVec<[usize; 4]> {
        self.check_index(index);
        self.bones
            .iter()
            .enumerate()
            .skip(index + 1)
            .filter(|(_, b)| b.parent == Some(index))
            .map(|(i, _)| i)
            .collect()
    }

    #[inline]
    #[must_use]
    pub fn bind_pose(&self) -> &BindPoseCache {
        &self.bind_pose
    }

    // ========================================================================
    // Local Mutators
    // ========================================================================

    pub fn set_local_rotation(&mut self, index: usize, rotation: Quat) {
        self.check_index(index);
        self.bones[index].local.rotation = rotation;
        self.model_dirty = true;
    }

    pub fn set_local_translation(&mut self, index: usize, translation: Vec3) {
        self.check_index(index);
        self.bones[index].local.translation = translation;
        self.model_dirty = true;
    }

    pub fn set_local_scale(&mut self, index: usize, scale: Vec3) {
        self.check_index(index);
        self.bones[index].local.scale = scale;
        self.model_dirty = true;
    }

    pub fn set_local_transform(&mut self, index: usize, transform: BoneTransform) {
        self.check_index(index);
        self.bones[index].local = transform;
        self.model_dirty = true;
    }

    pub fn set_bone_user_controlled(&mut self, index: usize, enabled: bool) {
        self.check_index(index);
        self.bones[index].user_controlled = enabled;
    }

    /// Flips the override flag on every bone at once.
    ///
    /// The flag stays per-bone, so individual bones can be handed back to the
    /// evaluator afterwards with [`Self::set_bone_user_controlled`].
    pub fn set_user_controlled(&mut self, enabled: bool) {
        for bone in &mut self.bones {
            bone.user_controlled = enabled;
        }
    }

    // ========================================================================
    // Bind Pose
    // ========================================================================

    /// Puts every bone back into its bind transform.
    pub fn reset_to_bind_pose(&mut self) {
        for bone in &mut self.bones {
            bone.local = bone.bind;
        }
        self.model_dirty = true;
    }

    /// Forces the bind pose and recaptures the inverse bind rotations.
    pub fn capture_bind_pose(&mut self) {
        self.bind_pose.capture(&mut self.bones);
        self.model_dirty = true;
    }

    /// Forces an externally supplied rest rotation per bone, then captures.
    ///
    /// The supplied rotations become the new bind rotations.
    pub fn capture_bind_pose_with_rest(&mut self, rest_rotations: &[Quat]) -> Result<()> {
        self.bind_pose.capture_with_rest(&mut self.bones, rest_rotations)?;
        self.model_dirty = true;
        Ok(())
    }

    /// Makes the current local transforms the new bind pose.
    pub fn set_bind_pose_from_current(&mut self) {
        for bone in &mut self.bones {
            bone.bind = bone.local;
        }
        self.capture_bind_pose();
        log::debug!("Skeleton '{}' bind pose redefined", self.name);
    }

    // ========================================================================
    // Model Space
    // ========================================================================

    /// Composes every bone's model transform from its parent's.
    ///
    /// `out` is resized to the bone count. Parents precede children, so each
    /// parent result is already in `out` when its children are visited.
    pub fn compute_model_transforms(&self, out: &mut Vec<BoneTransform>) {
        out.clear();
        out.reserve(self.bones.len());
        for bone in &self.bones {
            let model = match bone.parent {
                Some(parent) => BoneTransform::compose(&out[parent], &bone.local),
                None => bone.local,
            };
            out.push(model);
        }
    }

    /// Refreshes the cached model-space transforms if any bone changed.
    pub fn update_model_transforms(&mut self) {
        if !self.model_dirty {
            return;
        }
        let mut cache = std::mem::take(&mut self.model_transforms);
        self.compute_model_transforms(&mut cache);
        self.model_transforms = cache;
        self.model_dirty = false;
    }

    /// Whether a local mutation happened since the last
    /// [`Self::update_model_transforms`].
    #[inline]
    #[must_use]
    pub fn is_model_dirty(&self) -> bool {
        self.model_dirty
    }

    /// Cached model-space transform of `index`.
    ///
    /// The cache must be refreshed with [`Self::update_model_transforms`]
    /// after local mutations.
    #[must_use]
    pub fn model_space_transform(&self, index: usize) -> BoneTransform {
        self.check_index(index);
        debug_assert!(
            !self.model_dirty,
            "Skeleton '{}': model transforms read before update_model_transforms()",
            self.name
        );
        self.model_transforms[index]
    }

    #[inline]
    #[must_use]
    pub fn model_transforms(&self) -> &[BoneTransform] {
        &self.model_transforms
    }

    #[inline]
    fn check_index(&self, index: usize) {
        assert!(
            index < self.bones.len(),
            "Skeleton '{}': bone index {} out of range (bone count {})",
            self.name,
            index,
            self.bones.len()
        );
    }
}

impl Clone for Skeleton {
    fn clone(&self) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: self.name.clone(),
            bones: self.bones.clone(),
            name_lookup: self.name_lookup.clone(),
            bind_pose: self.bind_pose.clone(),
            model_transforms: self.model_transforms.clone(),
            model_dirty: self.model_dirty,
        }
    }
}

/// Declares bones by name, resolving parent names to indices.
#[derive(Debug)]
pub struct SkeletonBuilder {
    name: String,
    bones: Vec<(String, isize, BoneTransform)>,
    lookup: FxHashMap<String, usize>,
    error: Option<AnimationError>,
}

impl SkeletonBuilder {
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            bones: Vec::new(),
            lookup: FxHashMap::default(),
            error: None,
        }
    }

    /// Adds a bone. `parent` must name a bone added earlier.
    ///
    /// The first error is kept and reported by [`Self::build`].
    #[must_use]
    pub fn bone(mut self, name: &str, parent: Option<&str>, rest: BoneTransform) -> Self {
        if self.error.is_some() {
            return self;
        }
        let parent_index = match parent {
            None => -1,
            Some(parent_name) => match self.lookup.get(parent_name) {
                Some(&i) => i as isize,
                None => {
                    self.error = Some(AnimationError::UnknownParent {
                        bone: name.to_string(),
                        parent: parent_name.to_string(),
                    });
                    return self;
                }
            },
        };
        if self.lookup.contains_key(name) {
            self.error = Some(AnimationError::DuplicateBone(name.to_string()));
            return self;
        }
        self.lookup.insert(name.to_string(), self.bones.len());
        self.bones.push((name.to_string(), parent_index, rest));
        self
    }

    pub fn build(self) -> Result<Skeleton> {
        if let Some(err) = self.error {
            return Err(err);
        }
        Skeleton::new(&self.name, self.bones)
    }
}
