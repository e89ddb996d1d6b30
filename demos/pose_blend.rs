//! Builds a small arm, captures a pose from it, and cross-fades between a
//! waving clip, the captured pose and the bind pose.
//!
//! Run with `RUST_LOG=debug cargo run --example pose_blend`.

use std::f32::consts::FRAC_PI_2;

use glam::{Quat, Vec3};
use myth_pose::animation::{ClipStore, InterpolationMode, KeyframeTrack};
use myth_pose::{
    AnimationChannel, AnimationClip, AnimationSettings, AnimationSystem, BoneTrack, BoneTransform,
    ClipLibrary, PoseCapture, PoseResolver, SkeletalEvaluator, Skeleton, Transform,
};

const DT: f32 = 1.0 / 30.0;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let mut skeleton = Skeleton::builder("arm")
        .bone("shoulder", None, BoneTransform::from_translation(Vec3::new(0.0, 1.4, 0.0)))
        .bone("elbow", Some("shoulder"), BoneTransform::from_translation(Vec3::X * 0.3))
        .bone("hand", Some("elbow"), BoneTransform::from_translation(Vec3::X * 0.25))
        .build()?;
    let owner = Transform::from_trs(
        Vec3::new(2.0, 0.0, 0.0),
        Quat::from_rotation_y(FRAC_PI_2),
        Vec3::ONE,
    );

    let elbow = skeleton.find_index("elbow").unwrap_or(1);
    let hand = skeleton.find_index("hand").unwrap_or(2);

    let mut clips = ClipLibrary::new();
    clips.add(AnimationClip::new(
        "wave",
        vec![BoneTrack::new(
            elbow,
            KeyframeTrack::new(
                vec![0.0, 0.5, 1.0],
                vec![
                    Quat::from_rotation_z(0.2),
                    Quat::from_rotation_z(1.2),
                    Quat::from_rotation_z(0.2),
                ],
                InterpolationMode::Linear,
            ),
        )],
    ));

    // A hand-posed salute, frozen into a clip
    skeleton.set_local_rotation(0, Quat::from_rotation_z(0.9));
    skeleton.set_local_rotation(elbow, Quat::from_rotation_z(1.8));
    PoseCapture::capture_into(&mut clips, &skeleton, "salute");
    println!("Clips: {:?}", clips.list_names());

    let mut channel = AnimationChannel::new(&mut skeleton, AnimationSettings::default())?;
    let mut evaluator = SkeletalEvaluator::new();

    for (target, frames) in [(Some("wave"), 45), (Some("salute"), 20), (None, 5)] {
        channel.blend_to(target, &clips, &mut skeleton)?;
        for frame in 0..frames {
            AnimationSystem::update(&mut channel, &mut evaluator, &mut skeleton, DT)?;
            if frame % 5 == 0 {
                let p = PoseResolver::world_location(&owner, &skeleton, hand);
                println!(
                    "{:>8} t={:.2} fading={} hand=({:.3}, {:.3}, {:.3})",
                    target.unwrap_or("bind"),
                    channel.time(),
                    evaluator.is_fading(),
                    p.x,
                    p.y,
                    p.z
                );
            }
        }
    }

    Ok(())
}
