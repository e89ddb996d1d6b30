use glam::{Quat, Vec3};

use crate::skeleton::bone::BoneTransform;
use crate::skeleton::hierarchy::Skeleton;
use crate::skeleton::owner::OwnerTransform;

/// Converts bone poses between world space and bone-local space.
///
/// World space is `owner.world_transform() * model_space_transform(bone)`.
pub struct PoseResolver;

impl PoseResolver {
    /// World position of the bone origin.
    ///
    /// Reads the skeleton's model-space cache, which must be up to date.
    #[must_use]
    pub fn world_location(owner: &impl OwnerTransform, skeleton: &Skeleton, bone: usize) -> Vec3 {
        let model = skeleton.model_space_transform(bone);
        owner.local_to_world(model.translation)
    }

    /// World orientation of the bone.
    #[must_use]
    pub fn world_orientation(owner: &impl OwnerTransform, skeleton: &Skeleton, bone: usize) -> Quat {
        let model = skeleton.model_space_transform(bone);
        (owner.world_rotation() * model.rotation).normalize()
    }

    /// Moves `bone` so that its origin lands on `world_position` with
    /// `world_orientation`, and marks it user-controlled.
    ///
    /// Only this bone's local transform is written; its scale is kept.
    /// Descendants keep their local transforms and therefore follow along.
    /// The model-space cache is refreshed before and after the write.
    pub fn position_bone_in_world(
        owner: &impl OwnerTransform,
        skeleton: &mut Skeleton,
        bone: usize,
        world_position: Vec3,
        world_orientation: Quat,
    ) {
        skeleton.update_model_transforms();

        let model_position = owner.world_to_local(world_position);
        let model_rotation = owner.world_rotation().inverse() * world_orientation;

        let parent = match skeleton.bone(bone).parent() {
            Some(p) => skeleton.model_space_transform(p),
            None => BoneTransform::IDENTITY,
        };
        let parent_inverse = parent.rotation.inverse();

        let local_rotation = (parent_inverse * model_rotation).normalize();
        let local_translation =
            (parent_inverse * (model_position - parent.translation)) / parent.scale;

        skeleton.set_bone_user_controlled(bone, true);
        skeleton.set_local_translation(bone, local_translation);
        skeleton.set_local_rotation(bone, local_rotation);
        skeleton.update_model_transforms();
    }

    /// Sets the user-control flag on every bone of `skeleton`.
    ///
    /// While set, the evaluator skips those bones; the check is per bone.
    pub fn set_user_controlled(skeleton: &mut Skeleton, enabled: bool) {
        skeleton.set_user_controlled(enabled);
    }
}
