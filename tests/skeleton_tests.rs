//! Skeleton Tests
//!
//! Tests for:
//! - Skeleton construction and validation (indices, builder, names)
//! - Model-space transform composition and the dirty cache
//! - Bind pose capture and delta rotations
//! - World ↔ local conversion through PoseResolver
//! - Owner transforms and skeleton identity

use std::f32::consts::{FRAC_PI_2, FRAC_PI_4};

use glam::{Affine3A, Quat, Vec3};

use myth_pose::errors::AnimationError;
use myth_pose::skeleton::{
    BoneTransform, OwnerTransform, PoseResolver, Skeleton, SkeletonBuilder, Transform,
};

const EPSILON: f32 = 1e-5;

fn vec3_approx(a: Vec3, b: Vec3) -> bool {
    (a - b).length() < 1e-4
}

fn quat_approx(a: Quat, b: Quat) -> bool {
    (a.dot(b).abs() - 1.0).abs() < EPSILON
}

/// Angular distance from identity stays below 1e-5 rad.
fn is_identity(q: Quat) -> bool {
    q.xyz().length() < 5e-6
}

fn arm() -> Skeleton {
    Skeleton::builder("arm")
        .bone(
            "shoulder",
            None,
            BoneTransform::from_translation_rotation(Vec3::new(0.0, 1.0, 0.0), Quat::IDENTITY),
        )
        .bone("elbow", Some("shoulder"), BoneTransform::from_translation(Vec3::X))
        .bone("wrist", Some("elbow"), BoneTransform::from_translation(Vec3::X))
        .build()
        .expect("valid skeleton")
}

// ============================================================================
// Construction
// ============================================================================

#[test]
fn builder_resolves_parents_in_order() {
    let skeleton = arm();
    assert_eq!(skeleton.bone_count(), 3);
    assert_eq!(skeleton.bone(0).parent_index(), -1);
    assert_eq!(skeleton.bone(1).parent(), Some(0));
    assert_eq!(skeleton.bone(2).parent(), Some(1));
    assert_eq!(skeleton.find_index("wrist"), Some(2));
    assert_eq!(skeleton.find_index("tail"), None);
}

#[test]
fn builder_rejects_unknown_parent() {
    let err = SkeletonBuilder::new("broken")
        .bone("root", None, BoneTransform::IDENTITY)
        .bone("child", Some("missing"), BoneTransform::IDENTITY)
        .build()
        .unwrap_err();
    assert_eq!(
        err,
        AnimationError::UnknownParent {
            bone: "child".to_string(),
            parent: "missing".to_string()
        }
    );
}

#[test]
fn builder_rejects_duplicate_names() {
    let err = SkeletonBuilder::new("broken")
        .bone("root", None, BoneTransform::IDENTITY)
        .bone("root", None, BoneTransform::IDENTITY)
        .build()
        .unwrap_err();
    assert_eq!(err, AnimationError::DuplicateBone("root".to_string()));
}

#[test]
fn new_rejects_parent_after_child() {
    let err = Skeleton::new(
        "broken",
        [
            ("a", -1, BoneTransform::IDENTITY),
            ("b", 1, BoneTransform::IDENTITY),
        ],
    )
    .unwrap_err();
    assert_eq!(err, AnimationError::InvalidParentIndex { bone: 1, parent: 1 });

    let err = Skeleton::new("broken", [("a", -3, BoneTransform::IDENTITY)]).unwrap_err();
    assert_eq!(err, AnimationError::InvalidParentIndex { bone: 0, parent: -3 });
}

#[test]
fn children_lists_direct_descendants() {
    let skeleton = Skeleton::new(
        "tree",
        [
            ("root", -1, BoneTransform::IDENTITY),
            ("left", 0, BoneTransform::IDENTITY),
            ("right", 0, BoneTransform::IDENTITY),
            ("left_tip", 1, BoneTransform::IDENTITY),
        ],
    )
    .unwrap();

    assert_eq!(skeleton.children(0).as_slice(), &[1, 2]);
    assert_eq!(skeleton.children(1).as_slice(), &[3]);
    assert!(skeleton.children(3).is_empty());
}

#[test]
#[should_panic(expected = "out of range")]
fn bone_index_out_of_range_panics() {
    let skeleton = arm();
    let _ = skeleton.bone(3);
}

#[test]
#[should_panic(expected = "out of range")]
fn mutating_out_of_range_panics() {
    let mut skeleton = arm();
    skeleton.set_local_rotation(7, Quat::IDENTITY);
}

// ============================================================================
// Model Space
// ============================================================================

#[test]
fn model_transform_composes_parent_chain() {
    let mut skeleton = arm();
    skeleton.set_local_rotation(0, Quat::from_rotation_y(FRAC_PI_2));
    skeleton.update_model_transforms();

    // +X rotated 90° about Y points along -Z
    let elbow = skeleton.model_space_transform(1);
    assert!(vec3_approx(elbow.translation, Vec3::new(0.0, 1.0, -1.0)), "{elbow:?}");

    let wrist = skeleton.model_space_transform(2);
    assert!(vec3_approx(wrist.translation, Vec3::new(0.0, 1.0, -2.0)), "{wrist:?}");
    assert!(quat_approx(wrist.rotation, Quat::from_rotation_y(FRAC_PI_2)));
}

#[test]
fn model_transform_carries_scale() {
    let mut skeleton = arm();
    skeleton.set_local_scale(0, Vec3::splat(2.0));
    skeleton.update_model_transforms();

    let wrist = skeleton.model_space_transform(2);
    assert!(vec3_approx(wrist.translation, Vec3::new(4.0, 1.0, 0.0)), "{wrist:?}");
    assert!(vec3_approx(wrist.scale, Vec3::splat(2.0)));
}

#[test]
fn mutators_mark_cache_dirty() {
    let mut skeleton = arm();
    assert!(!skeleton.is_model_dirty());

    skeleton.set_local_translation(1, Vec3::new(2.0, 0.0, 0.0));
    assert!(skeleton.is_model_dirty());

    skeleton.update_model_transforms();
    assert!(!skeleton.is_model_dirty());
    assert!(vec3_approx(
        skeleton.model_space_transform(2).translation,
        Vec3::new(3.0, 1.0, 0.0)
    ));
}

#[test]
fn compute_model_transforms_matches_cache() {
    let mut skeleton = arm();
    skeleton.set_local_rotation(1, Quat::from_rotation_z(FRAC_PI_4));
    skeleton.update_model_transforms();

    let mut out = Vec::new();
    skeleton.compute_model_transforms(&mut out);
    assert_eq!(out.as_slice(), skeleton.model_transforms());
}

// ============================================================================
// Bind Pose
// ============================================================================

#[test]
fn delta_at_bind_pose_is_identity() {
    let skeleton = Skeleton::new(
        "twisted",
        [
            ("a", -1, BoneTransform::from_translation_rotation(Vec3::ZERO, Quat::from_rotation_x(0.7))),
            ("b", 0, BoneTransform::from_translation_rotation(Vec3::Y, Quat::from_rotation_y(-2.1))),
            (
                "c",
                1,
                BoneTransform::from_translation_rotation(
                    Vec3::Y,
                    Quat::from_euler(glam::EulerRot::XYZ, 0.3, 1.2, -0.4),
                ),
            ),
        ],
    )
    .unwrap();

    let bind_pose = skeleton.bind_pose();
    assert_eq!(bind_pose.len(), 3);
    for (i, bone) in skeleton.bones().iter().enumerate() {
        let delta = bind_pose.delta_rotation(i, bone.bind_rotation());
        assert!(is_identity(delta), "bone {i}: {delta:?}");
    }
}

#[test]
fn delta_is_zero_when_current_equals_bind() {
    let quarter_y = Quat::from_rotation_y(FRAC_PI_2);
    let mut skeleton = Skeleton::new(
        "pair",
        [
            ("root", -1, BoneTransform::IDENTITY),
            ("child", 0, BoneTransform::from_translation_rotation(Vec3::X, quarter_y)),
        ],
    )
    .unwrap();

    skeleton.set_local_rotation(1, quarter_y);
    let delta = skeleton
        .bind_pose()
        .delta_rotation(1, skeleton.bone(1).local_rotation());
    assert!(is_identity(delta), "{delta:?}");
}

#[test]
fn delta_recovers_applied_rotation() {
    let bind = Quat::from_rotation_z(0.5);
    let skeleton = Skeleton::new(
        "one",
        [("root", -1, BoneTransform::from_translation_rotation(Vec3::ZERO, bind))],
    )
    .unwrap();

    let applied = Quat::from_rotation_x(0.25);
    let delta = skeleton.bind_pose().delta_rotation(0, bind * applied);
    assert!(quat_approx(delta, applied));
    assert!(quat_approx(skeleton.bind_pose().rotation_from_delta(0, delta), bind * applied));
}

#[test]
fn capture_forces_bind_pose_first() {
    let mut skeleton = arm();
    skeleton.set_local_rotation(1, Quat::from_rotation_x(1.0));
    skeleton.set_local_translation(2, Vec3::splat(9.0));

    skeleton.capture_bind_pose();

    assert_eq!(skeleton.bone(1).local_rotation(), Quat::IDENTITY);
    assert_eq!(skeleton.bone(2).local_translation(), Vec3::X);
}

#[test]
fn capture_with_rest_installs_rotations() {
    let mut skeleton = arm();
    let rest = [
        Quat::IDENTITY,
        Quat::from_rotation_y(FRAC_PI_2),
        Quat::from_rotation_x(FRAC_PI_4),
    ];
    skeleton.capture_bind_pose_with_rest(&rest).unwrap();

    for (i, q) in rest.iter().enumerate() {
        assert_eq!(skeleton.bone(i).bind_rotation(), *q);
        assert_eq!(skeleton.bone(i).local_rotation(), *q);
        assert!(is_identity(skeleton.bind_pose().delta_rotation(i, *q)));
    }
}

#[test]
fn capture_with_rest_rejects_wrong_length() {
    let mut skeleton = arm();
    let err = skeleton
        .capture_bind_pose_with_rest(&[Quat::IDENTITY])
        .unwrap_err();
    assert_eq!(err, AnimationError::RestPoseLength { expected: 3, actual: 1 });
    assert_eq!(skeleton.bone(1).bind_rotation(), Quat::IDENTITY);
}

#[test]
fn redefined_bind_pose_becomes_zero_point() {
    let mut skeleton = arm();
    let bent = Quat::from_rotation_z(0.9);
    skeleton.set_local_rotation(1, bent);
    skeleton.set_bind_pose_from_current();

    assert_eq!(skeleton.bone(1).local_rotation(), bent);
    assert!(is_identity(skeleton.bind_pose().delta_rotation(1, bent)));

    skeleton.set_local_rotation(1, Quat::IDENTITY);
    skeleton.reset_to_bind_pose();
    assert_eq!(skeleton.bone(1).local_rotation(), bent);
}

// ============================================================================
// Pose Resolver
// ============================================================================

fn owner() -> Transform {
    Transform::from_trs(
        Vec3::new(5.0, 0.0, -3.0),
        Quat::from_rotation_y(FRAC_PI_4),
        Vec3::splat(2.0),
    )
}

#[test]
fn world_location_applies_owner_transform() {
    let skeleton = arm();
    let owner = owner();

    let location = PoseResolver::world_location(&owner, &skeleton, 2);
    let expected = owner
        .world_matrix()
        .transform_point3(Vec3::new(2.0, 1.0, 0.0));
    assert!(vec3_approx(location, expected), "{location} vs {expected}");

    let orientation = PoseResolver::world_orientation(&owner, &skeleton, 2);
    assert!(quat_approx(orientation, Quat::from_rotation_y(FRAC_PI_4)));
}

#[test]
fn position_in_world_round_trips() {
    let mut skeleton = arm();
    skeleton.set_local_rotation(0, Quat::from_rotation_z(0.4));
    skeleton.update_model_transforms();
    let owner = owner();

    let target_position = Vec3::new(6.0, 3.0, -1.5);
    let target_orientation = Quat::from_euler(glam::EulerRot::XYZ, 0.2, -0.8, 1.1);
    PoseResolver::position_bone_in_world(&owner, &mut skeleton, 1, target_position, target_orientation);

    assert!(skeleton.bone(1).is_user_controlled());
    assert!(!skeleton.bone(0).is_user_controlled());

    let location = PoseResolver::world_location(&owner, &skeleton, 1);
    let orientation = PoseResolver::world_orientation(&owner, &skeleton, 1);
    assert!(vec3_approx(location, target_position), "{location} vs {target_position}");
    assert!(quat_approx(orientation, target_orientation));
}

#[test]
fn position_in_world_leaves_children_local() {
    let mut skeleton = arm();
    let owner = Affine3A::IDENTITY;
    let wrist_local = *skeleton.bone(2).local();

    PoseResolver::position_bone_in_world(
        &owner,
        &mut skeleton,
        1,
        Vec3::new(0.0, 4.0, 0.0),
        Quat::from_rotation_z(FRAC_PI_2),
    );

    assert_eq!(*skeleton.bone(2).local(), wrist_local);
    assert!(!skeleton.bone(2).is_user_controlled());
    // Wrist follows its moved parent: +X turned 90° about Z is +Y
    let wrist = PoseResolver::world_location(&owner, &skeleton, 2);
    assert!(vec3_approx(wrist, Vec3::new(0.0, 5.0, 0.0)), "{wrist}");
}

#[test]
fn set_user_controlled_flips_every_bone() {
    let mut skeleton = arm();
    PoseResolver::set_user_controlled(&mut skeleton, true);
    assert!(skeleton.bones().iter().all(|b| b.is_user_controlled()));

    skeleton.set_bone_user_controlled(1, false);
    assert!(!skeleton.bone(1).is_user_controlled());
    assert!(skeleton.bone(2).is_user_controlled());

    PoseResolver::set_user_controlled(&mut skeleton, false);
    assert!(skeleton.bones().iter().all(|b| !b.is_user_controlled()));
}

#[test]
fn owner_conversions_are_inverse() {
    let owner = owner();
    let p = Vec3::new(0.3, -1.2, 4.0);
    assert!(vec3_approx(owner.world_to_local(owner.local_to_world(p)), p));
    assert!(quat_approx(owner.world_rotation(), Quat::from_rotation_y(FRAC_PI_4)));
}

#[test]
fn parented_owner_composes_world_matrix() {
    let parent = Transform::from_trs(Vec3::X, Quat::from_rotation_y(FRAC_PI_2), Vec3::ONE);
    let mut child = Transform::from_trs(Vec3::new(0.0, 0.0, 2.0), Quat::IDENTITY, Vec3::ONE);
    assert_eq!(*child.local_matrix(), Affine3A::from_translation(Vec3::new(0.0, 0.0, 2.0)));

    child.update_world_matrix(Some((parent.world_matrix(), parent.world_rotation())));
    assert!(vec3_approx(child.local_to_world(Vec3::ZERO), Vec3::new(3.0, 0.0, 0.0)));
    assert!(quat_approx(child.world_rotation(), Quat::from_rotation_y(FRAC_PI_2)));

    // Edited fields are picked up on the next update
    child.position = Vec3::ZERO;
    child.update_world_matrix(Some((parent.world_matrix(), parent.world_rotation())));
    assert!(vec3_approx(child.local_to_world(Vec3::ZERO), Vec3::X));
}

// ============================================================================
// Identity
// ============================================================================

#[test]
fn clone_is_a_distinct_skeleton() {
    let mut skeleton = arm();
    skeleton.set_local_rotation(1, Quat::from_rotation_z(0.5));
    let copy = skeleton.clone();

    assert_ne!(copy.id(), skeleton.id());
    assert_eq!(copy.bone_count(), skeleton.bone_count());
    assert_eq!(copy.bone(1).local(), skeleton.bone(1).local());
    assert_eq!(copy.find_index("wrist"), Some(2));
}
