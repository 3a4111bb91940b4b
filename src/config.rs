//! Rig Configuration
//!
//! Tunable constants of the attachment pipeline. Every field has a default
//! matching the behavior item and entity modelers expect, so an empty JSON
//! object is a valid configuration:
//!
//! ```rust,ignore
//! use locator_rig::config::{RefreshMode, RigConfig};
//!
//! let config = RigConfig::from_json_str(r#"{ "refresh": "versioned" }"#)?;
//! assert_eq!(config.refresh, RefreshMode::Versioned);
//! ```

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::errors::{Result, RigError};

/// How live proxies pick up edits to their source model on each frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RefreshMode {
    /// Reclone the source geometry on every frame. Always shows the latest
    /// edit, at the cost of one clone per proxy per frame.
    #[default]
    RecloneEveryFrame,
    /// Reclone only when the host reports a new model version; otherwise only
    /// the transform is rewritten.
    Versioned,
}

/// An animation forced to play while a given attachment point shows a proxy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnimationLock {
    /// Matched against the end of animation names, e.g. `.hold_item`.
    pub suffix: String,
    /// Exact attachment point name.
    pub attachment: String,
}

impl AnimationLock {
    #[must_use]
    pub fn new(suffix: impl Into<String>, attachment: impl Into<String>) -> Self {
        Self {
            suffix: suffix.into(),
            attachment: attachment.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RigConfig {
    /// Translation re-centering item-style models on their geometric origin.
    pub item_pivot: [f32; 3],
    /// Numerator of the seat scale compensation.
    pub seat_base_scale: f32,
    /// Smallest binding scale an edit may set.
    pub min_scale: f32,
    /// Largest binding scale an edit may set.
    pub max_scale: f32,
    pub animation_locks: Vec<AnimationLock>,
    pub refresh: RefreshMode,
}

impl Default for RigConfig {
    fn default() -> Self {
        Self {
            item_pivot: [-8.0, -8.0, -8.0],
            seat_base_scale: 0.9375,
            min_scale: 0.05,
            max_scale: 4.0,
            animation_locks: vec![
                AnimationLock::new(".hold_item", "item"),
                AnimationLock::new(".wear_hat", "item_hat"),
            ],
            refresh: RefreshMode::default(),
        }
    }
}

impl RigConfig {
    /// Parses and validates a JSON configuration.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: RigConfig =
            serde_json::from_str(json).map_err(|err| RigError::Config(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.item_pivot.iter().all(|c| c.is_finite()) {
            return Err(RigError::Config(format!(
                "item pivot must be finite, got {:?}",
                self.item_pivot
            )));
        }
        if !(self.seat_base_scale.is_finite() && self.seat_base_scale > 0.0) {
            return Err(RigError::Config(format!(
                "seat base scale must be positive, got {}",
                self.seat_base_scale
            )));
        }
        if !(self.min_scale.is_finite() && self.max_scale.is_finite())
            || self.min_scale <= 0.0
            || self.min_scale > self.max_scale
        {
            return Err(RigError::Config(format!(
                "scale range must satisfy 0 < min <= max, got [{}, {}]",
                self.min_scale, self.max_scale
            )));
        }
        if let Some(lock) = self
            .animation_locks
            .iter()
            .find(|lock| lock.suffix.is_empty() || lock.attachment.is_empty())
        {
            return Err(RigError::Config(format!("incomplete animation lock {lock:?}")));
        }
        Ok(())
    }

    #[inline]
    #[must_use]
    pub fn item_pivot(&self) -> Vec3 {
        Vec3::from_array(self.item_pivot)
    }

    /// Clamps a user-entered scale into the accepted range.
    #[inline]
    #[must_use]
    pub fn clamp_scale(&self, scale: f32) -> f32 {
        scale.clamp(self.min_scale, self.max_scale)
    }
}
