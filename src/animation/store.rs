use std::collections::BTreeMap;
use std::sync::Arc;

use crate::animation::clip::AnimationClip;

/// Named clip storage owned outside the animation subsystem.
///
/// Clips are handed out as `Arc`s so several channels can play the same clip.
pub trait ClipStore {
    fn get(&self, name: &str) -> Option<Arc<AnimationClip>>;

    /// Inserts `clip` under `name`, returning the clip it replaced.
    fn put(&mut self, name: &str, clip: Arc<AnimationClip>) -> Option<Arc<AnimationClip>>;

    fn remove(&mut self, name: &str) -> Option<Arc<AnimationClip>>;

    /// Clip names in ascending order.
    fn list_names(&self) -> Vec<String>;

    fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }
}

/// In-memory [`ClipStore`] keyed by name.
#[derive(Debug, Clone, Default)]
pub struct ClipLibrary {
    clips: BTreeMap<String, Arc<AnimationClip>>,
}

impl ClipLibrary {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `clip` under its own name.
    pub fn add(&mut self, clip: AnimationClip) -> Arc<AnimationClip> {
        let clip = Arc::new(clip);
        self.clips.insert(clip.name.clone(), Arc::clone(&clip));
        clip
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.clips.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Arc<AnimationClip>)> {
        self.clips.iter().map(|(name, clip)| (name.as_str(), clip))
    }
}

impl ClipStore for ClipLibrary {
    fn get(&self, name: &str) -> Option<Arc<AnimationClip>> {
        self.clips.get(name).cloned()
    }

    fn put(&mut self, name: &str, clip: Arc<AnimationClip>) -> Option<Arc<AnimationClip>> {
        if clip.name != name {
            log::warn!("Clip '{}' stored under a different name '{}'", clip.name, name);
        }
        self.clips.insert(name.to_string(), clip)
    }

    fn remove(&mut self, name: &str) -> Option<Arc<AnimationClip>> {
        self.clips.remove(name)
    }

    fn list_names(&self) -> Vec<String> {
        self.clips.keys().cloned().collect()
    }

    fn contains(&self, name: &str) -> bool {
        self.clips.contains_key(name)
    }
}
