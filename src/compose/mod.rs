//! Transform Composition
//!
//! Turns a binding, an optional display profile and the attachment point's
//! live world matrix into the final matrix of a proxy.
//!
//! # Order
//!
//! Steps are applied one after another, each acting on the result of the
//! previous ones (the same "apply matrix" semantics a scene graph uses when
//! baking a transform into an object):
//!
//! 1. item pivot shift, item-style models only
//! 2. profile scale, rotation, translation, then the slot corrections
//! 3. binding scale (inverse-compensated on seats)
//! 4. attachment point world matrix
//!
//! which yields `W * S_bind * C_n … C_1 * T_p * R_p * S_p * T_pivot`.

mod step;

use glam::{Mat4, Vec3};
use smallvec::SmallVec;

use crate::config::RigConfig;
use crate::locator::{AttachmentClass, AttachmentPoint};
use crate::profile::{DisplayProfile, corrective_offset, profile_steps};
use crate::registry::Binding;

pub use step::{TransformStep, apply_steps};

/// Local composition chain, everything before the world matrix.
pub type StepChain = SmallVec<[TransformStep; 12]>;

/// Pure binding-to-matrix composer.
///
/// Holds only the tunable constants; cheap to copy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransformCompositor {
    item_pivot: Vec3,
    seat_base_scale: f32,
}

impl Default for TransformCompositor {
    fn default() -> Self {
        Self::from_config(&RigConfig::default())
    }
}

impl TransformCompositor {
    #[must_use]
    pub fn from_config(config: &RigConfig) -> Self {
        Self {
            item_pivot: config.item_pivot(),
            seat_base_scale: config.seat_base_scale,
        }
    }

    /// Scale actually applied for a binding scale on a given locator.
    ///
    /// Seats shrink as the configured scale grows, so the seated model keeps
    /// a constant absolute size regardless of the rider's size setting.
    #[inline]
    #[must_use]
    pub fn applied_scale(&self, binding_scale: f32, class: AttachmentClass) -> f32 {
        if class.is_seat() {
            self.seat_base_scale / binding_scale
        } else {
            binding_scale
        }
    }

    /// The local chain (steps 1 to 3), in application order.
    #[must_use]
    pub fn steps(
        &self,
        binding: &Binding,
        point: &AttachmentPoint,
        profile: Option<&DisplayProfile>,
        is_item_style: bool,
    ) -> StepChain {
        let mut chain = StepChain::new();

        if is_item_style {
            chain.push(TransformStep::Translate(self.item_pivot));
        }

        if let Some(profile) = profile {
            chain.extend(profile_steps(profile));
            chain.extend(corrective_offset(&profile.slot, point.class()));
        }

        let scale = self.applied_scale(binding.scale, point.class());
        chain.push(TransformStep::uniform_scale(scale));

        chain
    }

    /// Final proxy matrix.
    #[must_use]
    pub fn compose(
        &self,
        binding: &Binding,
        point: &AttachmentPoint,
        profile: Option<&DisplayProfile>,
        attachment_world: Mat4,
        is_item_style: bool,
    ) -> Mat4 {
        let steps = self.steps(binding, point, profile, is_item_style);
        attachment_world * apply_steps(Mat4::IDENTITY, &steps)
    }
}
