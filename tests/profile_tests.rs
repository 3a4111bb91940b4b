//! Display Profile Tests
//!
//! Tests for:
//! - Parsing the `display` object of item model files
//! - Left-hand mirroring of rotation and translation
//! - The fixed slot correction table
//! - Profile lookup on a source model and profile suggestion

use glam::Vec3;

use locator_rig::compose::TransformStep;
use locator_rig::host::ModelFormat;
use locator_rig::locator::AttachmentClass;
use locator_rig::profile::{
    DisplayProfile, DisplayProfiles, LEFT_HAND_Y_ROTATION_FACTOR, SlotId, corrective_offset, resolve,
    suggest_profile,
};
use locator_rig::scene::{self, Geometry, Scene, SourceModel};
use locator_rig::RigError;

const EPSILON: f32 = 1e-5;

fn vec3_approx(a: Vec3, b: Vec3) -> bool {
    a.abs_diff_eq(b, EPSILON)
}

const SWORD_JSON: &str = r#"{
    "credit": "made by hand",
    "textures": { "0": "item/sword" },
    "display": {
        "thirdperson_righthand": { "rotation": [0, -90, 55], "translation": [0, 4, 0.5], "scale": [0.85, 0.85, 0.85] },
        "head": { "rotation": [0, 180, 0], "translation": [0, 13, 7] },
        "fixed": { "scale": [2, 2, 2] },
        "custom_slot": {}
    }
}"#;

// ============================================================================
// Parsing
// ============================================================================

#[test]
fn parse_display_section() {
    let profiles = DisplayProfiles::from_model_json(SWORD_JSON).unwrap();
    assert_eq!(profiles.len(), 4);

    let hand = profiles.get("thirdperson_righthand").unwrap();
    assert_eq!(hand.slot, SlotId::ThirdPersonRightHand);
    assert!(vec3_approx(hand.rotation, Vec3::new(0.0, -90.0, 55.0)));
    assert!(vec3_approx(hand.translation, Vec3::new(0.0, 4.0, 0.5)));
    assert!(vec3_approx(hand.scale, Vec3::splat(0.85)));
}

#[test]
fn parse_missing_triples_use_defaults() {
    let profiles = DisplayProfiles::from_model_json(SWORD_JSON).unwrap();

    let head = profiles.get("head").unwrap();
    assert_eq!(head.scale, Vec3::ONE);

    let fixed = profiles.get("fixed").unwrap();
    assert_eq!(fixed.rotation, Vec3::ZERO);
    assert_eq!(fixed.translation, Vec3::ZERO);
    assert_eq!(fixed.scale, Vec3::splat(2.0));
}

#[test]
fn parse_keeps_unknown_slots() {
    let profiles = DisplayProfiles::from_model_json(SWORD_JSON).unwrap();
    let custom = profiles.get("custom_slot").unwrap();
    assert_eq!(custom.slot, SlotId::Other("custom_slot".to_owned()));
}

#[test]
fn parse_without_display_is_empty() {
    let profiles = DisplayProfiles::from_model_json(r#"{ "elements": [] }"#).unwrap();
    assert!(profiles.is_empty());
}

#[test]
fn parse_malformed_json_fails() {
    let err = DisplayProfiles::from_model_json(r#"{ "display": { "head": { "scale": "big" } } }"#)
        .unwrap_err();
    assert!(matches!(err, RigError::ProfileParse(_)));
}

#[test]
fn insert_replaces_same_slot() {
    let mut profiles = DisplayProfiles::new();
    profiles.insert(DisplayProfile::new(SlotId::Head));
    profiles.insert(DisplayProfile::new(SlotId::Head).with_scale(Vec3::splat(3.0)));
    assert_eq!(profiles.len(), 1);
    assert_eq!(profiles.get("head").unwrap().scale, Vec3::splat(3.0));
}

// ============================================================================
// Slot ids & mirroring
// ============================================================================

#[test]
fn slot_id_roundtrips_known_names() {
    for name in [
        "thirdperson_righthand",
        "thirdperson_lefthand",
        "firstperson_righthand",
        "firstperson_lefthand",
        "head",
        "gui",
        "ground",
        "fixed",
    ] {
        assert_eq!(SlotId::parse(name).as_str(), name);
        assert!(!matches!(SlotId::parse(name), SlotId::Other(_)));
    }
}

#[test]
fn left_hand_detection() {
    assert!(SlotId::ThirdPersonLeftHand.is_left_hand());
    assert!(SlotId::FirstPersonLeftHand.is_left_hand());
    assert!(SlotId::parse("modded_lefthand").is_left_hand());
    assert!(!SlotId::ThirdPersonRightHand.is_left_hand());
    assert!(!SlotId::Head.is_left_hand());
}

#[test]
fn left_hand_mirrors_rotation_and_translation() {
    let rotation = Vec3::new(10.0, 20.0, 30.0);
    let translation = Vec3::new(1.0, 2.0, 3.0);

    let right = DisplayProfile::new(SlotId::ThirdPersonRightHand)
        .with_rotation(rotation)
        .with_translation(translation);
    let left = DisplayProfile::new(SlotId::ThirdPersonLeftHand)
        .with_rotation(rotation)
        .with_translation(translation);

    assert_eq!(right.effective_rotation(), rotation);
    assert_eq!(right.effective_translation(), translation);

    let mirrored_rot = left.effective_rotation();
    assert_eq!(mirrored_rot.x, 10.0);
    assert_eq!(mirrored_rot.y, LEFT_HAND_Y_ROTATION_FACTOR * 20.0);
    assert_eq!(mirrored_rot.y, -60.0);
    assert_eq!(mirrored_rot.z, -30.0);

    let mirrored_t = left.effective_translation();
    assert_eq!(mirrored_t, Vec3::new(1.0, 2.0, -3.0));
}

#[test]
fn first_person_left_hand_is_mirrored_too() {
    let left = DisplayProfile::new(SlotId::FirstPersonLeftHand)
        .with_translation(Vec3::new(0.0, 0.0, 4.0));
    assert_eq!(left.effective_translation().z, -4.0);
}

// ============================================================================
// Corrective offsets
// ============================================================================

#[test]
fn fixed_corrections() {
    let steps = corrective_offset(&SlotId::Fixed, AttachmentClass::Generic);
    assert_eq!(
        steps.as_slice(),
        &[
            TransformStep::Scale(Vec3::splat(0.5)),
            TransformStep::RotateX(90.0),
            TransformStep::Translate(Vec3::new(0.0, 0.25, 0.0)),
        ]
    );
}

#[test]
fn hand_corrections_flip_side() {
    let right = corrective_offset(&SlotId::ThirdPersonRightHand, AttachmentClass::Generic);
    let left = corrective_offset(&SlotId::ThirdPersonLeftHand, AttachmentClass::Generic);

    assert_eq!(right[0], TransformStep::RotateX(-90.0));
    assert_eq!(right[1], TransformStep::RotateZ(90.0));
    assert_eq!(right[2], TransformStep::Translate(Vec3::new(1.0, 0.0, 0.0)));
    assert_eq!(left[..2], right[..2]);
    assert_eq!(left[2], TransformStep::Translate(Vec3::new(-1.0, 0.0, 0.0)));
}

#[test]
fn head_corrections_depend_on_locator() {
    let generic = corrective_offset(&SlotId::Head, AttachmentClass::Generic);
    assert_eq!(generic.as_slice(), &[TransformStep::Scale(Vec3::splat(0.62))]);

    let hat = corrective_offset(&SlotId::Head, AttachmentClass::ItemHat);
    assert_eq!(hat.len(), 2);
    assert_eq!(hat[1], TransformStep::Translate(Vec3::new(0.0, -4.25, 0.0)));

    let face = corrective_offset(&SlotId::Head, AttachmentClass::ItemFace);
    assert_eq!(face.len(), 2);
    assert_eq!(face[1], TransformStep::Translate(Vec3::new(0.0, 0.5, 4.25)));
}

#[test]
fn other_slots_have_no_corrections() {
    for slot in [
        SlotId::Gui,
        SlotId::Ground,
        SlotId::FirstPersonRightHand,
        SlotId::FirstPersonLeftHand,
        SlotId::Other("custom".into()),
    ] {
        assert!(corrective_offset(&slot, AttachmentClass::ItemHat).is_empty());
    }
}

// ============================================================================
// Resolution
// ============================================================================

#[test]
fn resolve_finds_profile_on_source_model() {
    let mut scene = Scene::new();
    let sword = scene.add_model(
        SourceModel::new("sword", ModelFormat::ItemStyle, Geometry::block())
            .with_display(DisplayProfiles::from_model_json(SWORD_JSON).unwrap()),
    );

    let profile = resolve(&scene, scene::model_id(sword), "head").unwrap();
    assert_eq!(profile.slot, SlotId::Head);
    assert!(vec3_approx(profile.translation, Vec3::new(0.0, 13.0, 7.0)));
}

#[test]
fn resolve_reports_missing_profile() {
    let mut scene = Scene::new();
    let sword = scene.add_model(
        SourceModel::new("sword", ModelFormat::ItemStyle, Geometry::block())
            .with_display(DisplayProfiles::from_model_json(SWORD_JSON).unwrap()),
    );
    let ball = scene.add_model(SourceModel::new("ball", ModelFormat::Entity, Geometry::block()));

    let err = resolve(&scene, scene::model_id(sword), "gui").unwrap_err();
    assert!(matches!(err, RigError::ProfileNotFound { ref profile, .. } if profile == "gui"));

    // No display metadata at all.
    let err = resolve(&scene, scene::model_id(ball), "head").unwrap_err();
    assert!(matches!(err, RigError::ProfileNotFound { .. }));

    // Model gone.
    scene.remove_model(sword);
    assert!(resolve(&scene, scene::model_id(sword), "head").is_err());
}

// ============================================================================
// Suggestion
// ============================================================================

#[test]
fn suggest_prefers_current_slot() {
    let profiles = DisplayProfiles::from_model_json(SWORD_JSON).unwrap();
    let suggested = suggest_profile(&profiles, AttachmentClass::Generic, Some("thirdperson_righthand"));
    assert_eq!(suggested.as_deref(), Some("thirdperson_righthand"));
}

#[test]
fn suggest_head_for_hat_and_face() {
    let profiles = DisplayProfiles::from_model_json(SWORD_JSON).unwrap();
    assert_eq!(
        suggest_profile(&profiles, AttachmentClass::ItemHat, None).as_deref(),
        Some("head")
    );
    assert_eq!(
        suggest_profile(&profiles, AttachmentClass::ItemFace, Some("gui")).as_deref(),
        Some("head")
    );
}

#[test]
fn suggest_fixed_otherwise() {
    let profiles = DisplayProfiles::from_model_json(SWORD_JSON).unwrap();
    assert_eq!(
        suggest_profile(&profiles, AttachmentClass::Generic, None).as_deref(),
        Some("fixed")
    );
    assert_eq!(
        suggest_profile(&profiles, AttachmentClass::Seat(0), Some("gui")).as_deref(),
        Some("fixed")
    );
}

#[test]
fn suggest_nothing_without_candidates() {
    let profiles: DisplayProfiles = [DisplayProfile::new(SlotId::Gui)].into_iter().collect();
    assert_eq!(suggest_profile(&profiles, AttachmentClass::ItemHat, None), None);
}
