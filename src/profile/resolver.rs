//! Profile lookup and slot corrections.
//!
//! Everything here is pure: no host mutation, no logging. Callers decide how
//! loudly a missing profile should be reported.

use smallvec::{SmallVec, smallvec};

use crate::compose::TransformStep;
use crate::errors::{Result, RigError};
use crate::host::{ModelId, ModelSource};
use crate::locator::AttachmentClass;
use crate::profile::{DisplayProfile, DisplayProfiles, SlotId};

/// Short step list; no slot needs more than three corrections.
pub type Steps = SmallVec<[TransformStep; 4]>;

/// Looks up `profile_id` among the display profiles `model` exports.
///
/// Fails with [`RigError::ProfileNotFound`] when the model is gone, exports
/// no profiles, or has none for that slot.
pub fn resolve<M>(models: &M, model: ModelId, profile_id: &str) -> Result<DisplayProfile>
where
    M: ModelSource + ?Sized,
{
    models
        .display_profiles(model)
        .and_then(|profiles| profiles.get(profile_id))
        .cloned()
        .ok_or_else(|| RigError::ProfileNotFound {
            model,
            profile: profile_id.to_owned(),
        })
}

/// The raw profile pose as steps: scale, rotation, translation, with the
/// left-hand mirroring already folded in.
#[must_use]
pub fn profile_steps(profile: &DisplayProfile) -> Steps {
    smallvec![
        TransformStep::Scale(profile.scale),
        TransformStep::RotateEuler(profile.effective_rotation()),
        TransformStep::Translate(profile.effective_translation()),
    ]
}

/// Fixed per-slot corrections applied after the raw profile.
///
/// Independent of the source model. The head slot additionally depends on
/// whether the attachment point is a hat or face locator.
#[must_use]
pub fn corrective_offset(slot: &SlotId, class: AttachmentClass) -> Steps {
    match slot {
        SlotId::Fixed => smallvec![
            TransformStep::uniform_scale(0.5),
            TransformStep::RotateX(90.0),
            TransformStep::translate(0.0, 0.25, 0.0),
        ],
        SlotId::ThirdPersonRightHand | SlotId::ThirdPersonLeftHand => {
            let side = if slot.is_left_hand() { -1.0 } else { 1.0 };
            smallvec![
                TransformStep::RotateX(-90.0),
                TransformStep::RotateZ(90.0),
                TransformStep::translate(side, 0.0, 0.0),
            ]
        }
        SlotId::Head => {
            let mut steps: Steps = smallvec![TransformStep::uniform_scale(0.62)];
            match class {
                AttachmentClass::ItemHat => steps.push(TransformStep::translate(0.0, -4.25, 0.0)),
                AttachmentClass::ItemFace => steps.push(TransformStep::translate(0.0, 0.5, 4.25)),
                AttachmentClass::Seat(_) | AttachmentClass::Generic => {}
            }
            steps
        }
        _ => Steps::new(),
    }
}

/// Picks the profile to preselect when a source model is bound to an
/// attachment point.
///
/// Keeps `current` if the model exports it, then prefers `head` for hat and
/// face locators, then `fixed`.
#[must_use]
pub fn suggest_profile(
    profiles: &DisplayProfiles,
    class: AttachmentClass,
    current: Option<&str>,
) -> Option<String> {
    if let Some(current) = current
        && profiles.contains(current)
    {
        return Some(current.to_owned());
    }

    let wants_head = matches!(class, AttachmentClass::ItemHat | AttachmentClass::ItemFace);
    if wants_head && profiles.contains(SlotId::Head.as_str()) {
        return Some(SlotId::Head.as_str().to_owned());
    }

    profiles
        .contains(SlotId::Fixed.as_str())
        .then(|| SlotId::Fixed.as_str().to_owned())
}
