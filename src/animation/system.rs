use crate::animation::channel::AnimationChannel;
use crate::animation::evaluator::AnimationEvaluator;
use crate::errors::Result;
use crate::skeleton::Skeleton;

/// Animation system.
///
/// Drives one channel/skeleton pair through a frame.
pub struct AnimationSystem;

impl AnimationSystem {
    /// Advances the channel by `dt`, then lets the evaluator pose the skeleton.
    ///
    /// # Arguments
    /// * `channel` - Playback state of the character
    /// * `evaluator` - Writes sampled poses into the skeleton
    /// * `skeleton` - The skeleton the channel was created for
    /// * `dt` - Delta time per frame (in seconds)
    ///
    /// A negative `dt` is rejected before anything is touched.
    #[inline]
    pub fn update(
        channel: &mut AnimationChannel,
        evaluator: &mut impl AnimationEvaluator,
        skeleton: &mut Skeleton,
        dt: f32,
    ) -> Result<()> {
        channel.advance(dt)?;
        evaluator.evaluate(channel, skeleton, dt);
        Ok(())
    }
}
