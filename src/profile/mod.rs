//! Display Profiles
//!
//! A display profile describes how an item-style model is posed in one usage
//! context (held in a hand, worn on the head, framed on a wall...). Item
//! models export them in the `display` object of their model file, keyed by
//! slot id:
//!
//! ```json
//! {
//!     "display": {
//!         "head": { "rotation": [0, 180, 0], "translation": [0, 13, 7], "scale": [1, 1, 1] },
//!         "fixed": { "scale": [0.5, 0.5, 0.5] }
//!     }
//! }
//! ```
//!
//! Missing triples default to zero rotation, zero translation and unit
//! scale.
//!
//! The [`resolver`] submodule looks profiles up on a source model and owns the
//! fixed table of slot corrections layered on top of them.

pub mod resolver;

use std::collections::BTreeMap;
use std::fmt;

use glam::Vec3;
use serde::Deserialize;

use crate::errors::Result;

pub use resolver::{corrective_offset, profile_steps, resolve, suggest_profile};

/// Multiplier applied to the Y rotation of left-hand slots.
///
/// Kept at −3 for parity with the existing authoring tool: Z rotation and Z
/// translation are plain sign flips, Y rotation is not. Models tuned against
/// that tool rely on it.
pub const LEFT_HAND_Y_ROTATION_FACTOR: f32 = -3.0;

/// Usage context a display profile applies to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SlotId {
    ThirdPersonRightHand,
    ThirdPersonLeftHand,
    FirstPersonRightHand,
    FirstPersonLeftHand,
    Head,
    Gui,
    Ground,
    Fixed,
    Other(String),
}

impl SlotId {
    #[must_use]
    pub fn parse(id: &str) -> Self {
        match id {
            "thirdperson_righthand" => SlotId::ThirdPersonRightHand,
            "thirdperson_lefthand" => SlotId::ThirdPersonLeftHand,
            "firstperson_righthand" => SlotId::FirstPersonRightHand,
            "firstperson_lefthand" => SlotId::FirstPersonLeftHand,
            "head" => SlotId::Head,
            "gui" => SlotId::Gui,
            "ground" => SlotId::Ground,
            "fixed" => SlotId::Fixed,
            other => SlotId::Other(other.to_owned()),
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            SlotId::ThirdPersonRightHand => "thirdperson_righthand",
            SlotId::ThirdPersonLeftHand => "thirdperson_lefthand",
            SlotId::FirstPersonRightHand => "firstperson_righthand",
            SlotId::FirstPersonLeftHand => "firstperson_lefthand",
            SlotId::Head => "head",
            SlotId::Gui => "gui",
            SlotId::Ground => "ground",
            SlotId::Fixed => "fixed",
            SlotId::Other(id) => id,
        }
    }

    /// Left-hand slots are authored as mirrors of the right-hand ones.
    #[must_use]
    pub fn is_left_hand(&self) -> bool {
        match self {
            SlotId::ThirdPersonLeftHand | SlotId::FirstPersonLeftHand => true,
            SlotId::Other(id) => id.ends_with("lefthand"),
            _ => false,
        }
    }
}

impl From<&str> for SlotId {
    fn from(id: &str) -> Self {
        SlotId::parse(id)
    }
}

impl fmt::Display for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One named pose read from a source model's metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayProfile {
    pub slot: SlotId,
    /// Euler rotation in degrees.
    pub rotation: Vec3,
    pub translation: Vec3,
    pub scale: Vec3,
}

impl DisplayProfile {
    #[must_use]
    pub fn new(slot: SlotId) -> Self {
        Self {
            slot,
            rotation: Vec3::ZERO,
            translation: Vec3::ZERO,
            scale: Vec3::ONE,
        }
    }

    #[must_use]
    pub fn with_rotation(mut self, rotation: Vec3) -> Self {
        self.rotation = rotation;
        self
    }

    #[must_use]
    pub fn with_translation(mut self, translation: Vec3) -> Self {
        self.translation = translation;
        self
    }

    #[must_use]
    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    /// Rotation actually applied, with the left-hand mirroring rule.
    #[must_use]
    pub fn effective_rotation(&self) -> Vec3 {
        if self.slot.is_left_hand() {
            Vec3::new(
                self.rotation.x,
                LEFT_HAND_Y_ROTATION_FACTOR * self.rotation.y,
                -self.rotation.z,
            )
        } else {
            self.rotation
        }
    }

    /// Translation actually applied, Z mirrored for left-hand slots.
    #[must_use]
    pub fn effective_translation(&self) -> Vec3 {
        if self.slot.is_left_hand() {
            Vec3::new(self.translation.x, self.translation.y, -self.translation.z)
        } else {
            self.translation
        }
    }
}

#[derive(Deserialize)]
struct RawDisplayEntry {
    #[serde(default)]
    rotation: [f32; 3],
    #[serde(default)]
    translation: [f32; 3],
    #[serde(default = "unit_scale")]
    scale: [f32; 3],
}

fn unit_scale() -> [f32; 3] {
    [1.0; 3]
}

#[derive(Deserialize)]
struct RawModelFile {
    #[serde(default)]
    display: BTreeMap<String, RawDisplayEntry>,
}

/// The set of display profiles a source model exports.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DisplayProfiles {
    profiles: Vec<DisplayProfile>,
}

impl DisplayProfiles {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses the `display` object of an item model file. Other top-level
    /// keys are ignored; a file without `display` yields an empty set.
    pub fn from_model_json(json: &str) -> Result<Self> {
        let raw: RawModelFile = serde_json::from_str(json)?;
        let profiles = raw
            .display
            .into_iter()
            .map(|(slot, entry)| DisplayProfile {
                slot: SlotId::parse(&slot),
                rotation: Vec3::from_array(entry.rotation),
                translation: Vec3::from_array(entry.translation),
                scale: Vec3::from_array(entry.scale),
            })
            .collect();
        Ok(Self { profiles })
    }

    /// Adds or replaces the profile for its slot.
    pub fn insert(&mut self, profile: DisplayProfile) {
        if let Some(existing) = self.profiles.iter_mut().find(|p| p.slot == profile.slot) {
            *existing = profile;
        } else {
            self.profiles.push(profile);
        }
    }

    #[must_use]
    pub fn get(&self, slot: &str) -> Option<&DisplayProfile> {
        self.profiles.iter().find(|p| p.slot.as_str() == slot)
    }

    #[must_use]
    pub fn contains(&self, slot: &str) -> bool {
        self.get(slot).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DisplayProfile> {
        self.profiles.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}

impl FromIterator<DisplayProfile> for DisplayProfiles {
    fn from_iter<T: IntoIterator<Item = DisplayProfile>>(iter: T) -> Self {
        let mut profiles = DisplayProfiles::new();
        for profile in iter {
            profiles.insert(profile);
        }
        profiles
    }
}
