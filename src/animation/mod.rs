//! Host animations: a flat library of named animations with a playback
//! cursor and a lock flag the rig can hold.

pub mod action;

use slotmap::{SlotMap, new_key_type};

pub use action::{Animation, LoopMode, PlayState};

new_key_type! {
    pub struct AnimationKey;
}

#[derive(Debug, Default)]
pub struct AnimationLibrary {
    animations: SlotMap<AnimationKey, Animation>,
}

impl AnimationLibrary {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, animation: Animation) -> AnimationKey {
        self.animations.insert(animation)
    }

    pub fn remove(&mut self, key: AnimationKey) -> Option<Animation> {
        self.animations.remove(key)
    }

    #[must_use]
    pub fn get(&self, key: AnimationKey) -> Option<&Animation> {
        self.animations.get(key)
    }

    pub fn get_mut(&mut self, key: AnimationKey) -> Option<&mut Animation> {
        self.animations.get_mut(key)
    }

    /// First animation (in insertion slot order) whose name ends with
    /// `suffix`.
    #[must_use]
    pub fn find_by_suffix(&self, suffix: &str) -> Option<AnimationKey> {
        self.animations
            .iter()
            .find(|(_, animation)| animation.name().ends_with(suffix))
            .map(|(key, _)| key)
    }

    /// Advances every playing animation.
    pub fn update(&mut self, dt: f32) {
        for animation in self.animations.values_mut() {
            animation.update(dt);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (AnimationKey, &Animation)> {
        self.animations.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.animations.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.animations.is_empty()
    }
}
