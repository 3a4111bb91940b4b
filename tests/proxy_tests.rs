//! Proxy Lifecycle Tests
//!
//! Tests for:
//! - Rebuild: one proxy per bound point, no leaks across rebuilds
//! - Per-frame refresh: following locators, picking up geometry edits
//! - Refresh policies
//! - Failure handling per attachment point

use glam::{Mat4, Vec3};

use locator_rig::config::{RefreshMode, RigConfig};
use locator_rig::host::{ModelFormat, SceneHost};
use locator_rig::profile::{DisplayProfile, DisplayProfiles, SlotId};
use locator_rig::proxy::{ProxyLifecycleManager, VersionedRefresh};
use locator_rig::registry::{AttachmentRegistry, BindingPatch};
use locator_rig::scene::{
    self, Cuboid, Geometry, ModelKey, Node, NodeHandle, NodeKind, Scene, SourceModel,
};

// ============================================================================
// Fixture
// ============================================================================

const EPSILON: f32 = 1e-4;

fn init() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn vec3_approx(a: Vec3, b: Vec3) -> bool {
    a.abs_diff_eq(b, EPSILON)
}

struct Rig {
    scene: Scene,
    registry: AttachmentRegistry,
    body: NodeHandle,
    item: NodeHandle,
    hat: NodeHandle,
    seat: NodeHandle,
    sword: ModelKey,
    ball: ModelKey,
}

impl Rig {
    fn new() -> Self {
        init();
        let mut scene = Scene::new();

        let mut body = Node::group("body");
        body.transform.position = Vec3::new(0.0, 10.0, 0.0);
        let body = scene.add_node(body);
        let item = scene.add_locator("item", Some(body));
        scene.get_node_mut(item).unwrap().transform.position = Vec3::new(2.0, 0.0, 0.0);
        let hat = scene.add_locator("item_hat", Some(body));
        let seat = scene.add_locator("seat_0", None);

        let display: DisplayProfiles = [
            DisplayProfile::new(SlotId::Head).with_translation(Vec3::new(0.0, 1.0, 0.0)),
            DisplayProfile::new(SlotId::Fixed),
            DisplayProfile::new(SlotId::ThirdPersonRightHand),
        ]
        .into_iter()
        .collect();
        let sword = scene.add_model(
            SourceModel::new("sword", ModelFormat::ItemStyle, Geometry::block()).with_display(display),
        );
        let ball = scene.add_model(SourceModel::new("ball", ModelFormat::Entity, Geometry::block()));

        scene.update_matrix_world();
        let registry = AttachmentRegistry::with_points(scene.attachment_points());

        Self {
            scene,
            registry,
            body,
            item,
            hat,
            seat,
            sword,
            ball,
        }
    }

    fn bind(&mut self, locator: NodeHandle, model: ModelKey, profile: Option<&str>) {
        self.registry
            .set(
                scene::attachment_id(locator),
                BindingPatch::new()
                    .source(Some(scene::model_id(model)))
                    .profile(profile.map(str::to_owned)),
            )
            .unwrap();
    }

    fn resync_points(&mut self) {
        self.registry.sync_points(self.scene.attachment_points());
    }
}

fn manager() -> ProxyLifecycleManager {
    ProxyLifecycleManager::new(&RigConfig::default())
}

fn only_proxy_geometry(scene: &Scene) -> Geometry {
    let mut proxies = scene.proxies();
    let (_, node) = proxies.next().expect("one proxy");
    assert!(proxies.next().is_none());
    match &node.kind {
        NodeKind::Proxy { geometry, .. } => geometry.clone(),
        other => panic!("not a proxy: {other:?}"),
    }
}

// ============================================================================
// Rebuild
// ============================================================================

#[test]
fn rebuild_spawns_one_proxy_per_bound_point() {
    let mut rig = Rig::new();
    rig.bind(rig.item, rig.sword, Some("thirdperson_righthand"));
    rig.bind(rig.seat, rig.ball, None);

    let mut proxies = manager();
    let stats = proxies.rebuild_all(&mut rig.scene, &rig.registry);

    assert_eq!(stats.spawned, 2);
    assert_eq!(stats.failed, 0);
    assert_eq!(proxies.len(), 2);
    assert!(proxies.has_proxy(scene::attachment_id(rig.item)));
    assert!(proxies.has_proxy(scene::attachment_id(rig.seat)));
    assert!(!proxies.has_proxy(scene::attachment_id(rig.hat)));
    assert_eq!(rig.scene.proxy_count(), 2);
}

#[test]
fn unbound_points_get_no_proxy() {
    let mut rig = Rig::new();
    rig.registry
        .set(scene::attachment_id(rig.hat), BindingPatch::new().scale(2.0).profile(Some("head".into())))
        .unwrap();

    let mut proxies = manager();
    let stats = proxies.rebuild_all(&mut rig.scene, &rig.registry);
    assert_eq!(stats.spawned, 0);
    assert!(proxies.is_empty());

    proxies.update_positions_only(&mut rig.scene, &rig.registry);
    assert_eq!(rig.scene.proxy_node_count(), 0);
}

#[test]
fn rebuild_is_idempotent() {
    let mut rig = Rig::new();
    rig.bind(rig.item, rig.sword, Some("fixed"));
    rig.bind(rig.hat, rig.sword, Some("head"));

    let mut proxies = manager();
    proxies.rebuild_all(&mut rig.scene, &rig.registry);
    let first: Vec<_> = {
        let mut v: Vec<_> = proxies.iter().map(|(id, r)| (id, r.transform())).collect();
        v.sort_by_key(|(id, _)| *id);
        v
    };

    proxies.rebuild_all(&mut rig.scene, &rig.registry);
    proxies.rebuild_all(&mut rig.scene, &rig.registry);
    let mut second: Vec<_> = proxies.iter().map(|(id, r)| (id, r.transform())).collect();
    second.sort_by_key(|(id, _)| *id);

    assert_eq!(first, second);
    assert_eq!(rig.scene.proxy_count(), 2);
    assert_eq!(rig.scene.proxy_node_count(), 2);
}

#[test]
fn cleared_binding_loses_its_proxy_on_rebuild() {
    let mut rig = Rig::new();
    rig.bind(rig.item, rig.sword, Some("fixed"));

    let mut proxies = manager();
    proxies.rebuild_all(&mut rig.scene, &rig.registry);
    assert_eq!(rig.scene.proxy_count(), 1);

    rig.registry.clear(scene::attachment_id(rig.item)).unwrap();
    proxies.rebuild_all(&mut rig.scene, &rig.registry);
    assert!(proxies.is_empty());
    assert_eq!(rig.scene.proxy_node_count(), 0);
}

#[test]
fn stale_proxy_is_disposed_on_next_frame() {
    let mut rig = Rig::new();
    rig.bind(rig.item, rig.sword, Some("fixed"));

    let mut proxies = manager();
    proxies.rebuild_all(&mut rig.scene, &rig.registry);

    // Rebound to another model without a rebuild.
    rig.bind(rig.item, rig.ball, None);
    let stats = proxies.update_positions_only(&mut rig.scene, &rig.registry);

    assert_eq!(stats.disposed, 1);
    assert!(proxies.is_empty());
    assert_eq!(rig.scene.proxy_node_count(), 0);
}

#[test]
fn dispose_all_empties_the_scene() {
    let mut rig = Rig::new();
    rig.bind(rig.item, rig.sword, Some("fixed"));
    rig.bind(rig.hat, rig.sword, Some("head"));
    rig.bind(rig.seat, rig.ball, None);

    let mut proxies = manager();
    proxies.rebuild_all(&mut rig.scene, &rig.registry);
    assert_eq!(rig.scene.proxy_count(), 3);

    proxies.dispose_all(&mut rig.scene);
    assert!(proxies.is_empty());
    assert_eq!(rig.scene.proxy_node_count(), 0);
}

// ============================================================================
// Per-frame refresh
// ============================================================================

#[test]
fn proxy_follows_its_locator() {
    let mut rig = Rig::new();
    rig.bind(rig.item, rig.ball, None);
    let id = scene::attachment_id(rig.item);

    let mut proxies = manager();
    proxies.rebuild_all(&mut rig.scene, &rig.registry);
    let placed = proxies.get(id).unwrap().transform();
    assert!(vec3_approx(placed.w_axis.truncate(), Vec3::new(2.0, 10.0, 0.0)));

    rig.scene.get_node_mut(rig.body).unwrap().transform.position = Vec3::new(0.0, 20.0, 5.0);
    rig.scene.update_matrix_world();
    proxies.update_positions_only(&mut rig.scene, &rig.registry);

    let moved = proxies.get(id).unwrap().transform();
    assert!(vec3_approx(moved.w_axis.truncate(), Vec3::new(2.0, 20.0, 5.0)));

    let (_, node) = rig.scene.proxies().next().unwrap();
    assert!(vec3_approx(Vec3::from(node.world_matrix().translation), Vec3::new(2.0, 20.0, 5.0)));
}

#[test]
fn proxy_survives_hierarchy_updates() {
    let mut rig = Rig::new();
    rig.bind(rig.seat, rig.ball, None);

    let mut proxies = manager();
    proxies.rebuild_all(&mut rig.scene, &rig.registry);
    let expected = proxies.get(scene::attachment_id(rig.seat)).unwrap().transform();

    rig.scene.update_matrix_world();
    let (_, node) = rig.scene.proxies().next().unwrap();
    assert!(Mat4::from(*node.world_matrix()).abs_diff_eq(expected, EPSILON));
}

#[test]
fn reclone_every_frame_picks_up_geometry_edits() {
    let mut rig = Rig::new();
    rig.bind(rig.item, rig.sword, Some("fixed"));

    let mut proxies = manager();
    proxies.rebuild_all(&mut rig.scene, &rig.registry);
    assert_eq!(only_proxy_geometry(&rig.scene), Geometry::block());

    rig.scene.model_mut(rig.sword).unwrap().edit_geometry(|g| {
        g.cuboids.push(Cuboid::new(Vec3::ZERO, Vec3::ONE));
    });

    let stats = proxies.update_positions_only(&mut rig.scene, &rig.registry);
    assert_eq!(stats.recloned, 1);
    assert_eq!(only_proxy_geometry(&rig.scene).cuboids.len(), 2);
    assert_eq!(rig.scene.proxy_node_count(), 1);

    // Unedited frames reclone too.
    let stats = proxies.update_positions_only(&mut rig.scene, &rig.registry);
    assert_eq!(stats.recloned, 1);
    assert_eq!(rig.scene.proxy_node_count(), 1);
}

#[test]
fn versioned_refresh_reclones_only_after_edits() {
    let mut rig = Rig::new();
    rig.bind(rig.item, rig.sword, Some("fixed"));
    let id = scene::attachment_id(rig.item);

    let config = RigConfig {
        refresh: RefreshMode::Versioned,
        ..RigConfig::default()
    };
    let mut proxies = ProxyLifecycleManager::new(&config);
    proxies.rebuild_all(&mut rig.scene, &rig.registry);
    let handle = proxies.get(id).unwrap().handle();

    let stats = proxies.update_positions_only(&mut rig.scene, &rig.registry);
    assert_eq!((stats.moved, stats.recloned), (1, 0));
    assert_eq!(proxies.get(id).unwrap().handle(), handle);

    rig.scene.model_mut(rig.sword).unwrap().edit_geometry(|g| g.cuboids.clear());
    let stats = proxies.update_positions_only(&mut rig.scene, &rig.registry);
    assert_eq!((stats.moved, stats.recloned), (0, 1));
    assert_ne!(proxies.get(id).unwrap().handle(), handle);
    assert!(only_proxy_geometry(&rig.scene).is_empty());
    assert_eq!(rig.scene.proxy_node_count(), 1);
}

#[test]
fn policy_can_be_swapped() {
    let mut rig = Rig::new();
    rig.bind(rig.seat, rig.ball, None);

    let mut proxies = manager().with_policy(Box::new(VersionedRefresh));
    proxies.rebuild_all(&mut rig.scene, &rig.registry);
    let stats = proxies.update_positions_only(&mut rig.scene, &rig.registry);
    assert_eq!(stats.moved, 1);
}

// ============================================================================
// Failures
// ============================================================================

#[test]
fn unavailable_source_skips_only_that_point() {
    let mut rig = Rig::new();
    rig.bind(rig.item, rig.sword, Some("fixed"));
    rig.bind(rig.seat, rig.ball, None);
    rig.scene.remove_model(rig.ball);

    let mut proxies = manager();
    let stats = proxies.rebuild_all(&mut rig.scene, &rig.registry);

    assert_eq!(stats.spawned, 1);
    assert_eq!(stats.failed, 1);
    assert!(proxies.has_proxy(scene::attachment_id(rig.item)));
    assert!(!proxies.has_proxy(scene::attachment_id(rig.seat)));
}

#[test]
fn source_removed_after_spawn_drops_proxy() {
    let mut rig = Rig::new();
    rig.bind(rig.seat, rig.ball, None);

    let mut proxies = manager();
    proxies.rebuild_all(&mut rig.scene, &rig.registry);
    rig.scene.remove_model(rig.ball);

    let stats = proxies.update_positions_only(&mut rig.scene, &rig.registry);
    assert_eq!(stats.disposed, 1);
    assert!(proxies.is_empty());
    assert_eq!(rig.scene.proxy_node_count(), 0);
}

#[test]
fn point_without_world_matrix_is_retried() {
    let mut rig = Rig::new();
    let late = rig.scene.add_locator("late", None);
    rig.resync_points();
    rig.bind(late, rig.ball, None);
    let id = scene::attachment_id(late);

    let mut proxies = manager();
    let stats = proxies.rebuild_all(&mut rig.scene, &rig.registry);
    assert_eq!(stats.pending, 1);
    assert!(proxies.is_pending(id));
    assert!(!proxies.has_proxy(id));

    let stats = proxies.update_positions_only(&mut rig.scene, &rig.registry);
    assert_eq!(stats.skipped, 1);
    assert!(proxies.is_pending(id));

    rig.scene.update_matrix_world();
    let stats = proxies.update_positions_only(&mut rig.scene, &rig.registry);
    assert_eq!(stats.spawned, 1);
    assert!(!proxies.is_pending(id));
    assert!(proxies.has_proxy(id));
    assert_eq!(rig.scene.proxy_count(), 1);
}

#[test]
fn removed_point_drops_proxy() {
    let mut rig = Rig::new();
    rig.bind(rig.hat, rig.sword, Some("head"));

    let mut proxies = manager();
    proxies.rebuild_all(&mut rig.scene, &rig.registry);

    rig.scene.remove_node(rig.hat);
    rig.resync_points();
    let stats = proxies.update_positions_only(&mut rig.scene, &rig.registry);

    assert_eq!(stats.disposed, 1);
    assert_eq!(rig.scene.proxy_node_count(), 0);
}

#[test]
fn missing_profile_composes_without_corrections() {
    let mut rig = Rig::new();
    rig.bind(rig.item, rig.sword, Some("gui"));

    let mut proxies = manager();
    let stats = proxies.rebuild_all(&mut rig.scene, &rig.registry);
    assert_eq!(stats.spawned, 1);

    let transform = proxies.get(scene::attachment_id(rig.item)).unwrap().transform();
    let expected = Mat4::from_translation(Vec3::new(2.0, 10.0, 0.0)) * Mat4::from_translation(Vec3::splat(-8.0));
    assert!(transform.abs_diff_eq(expected, EPSILON));
}

#[test]
fn profile_is_ignored_for_entity_models() {
    let mut rig = Rig::new();
    rig.bind(rig.item, rig.ball, Some("head"));

    let mut proxies = manager();
    proxies.rebuild_all(&mut rig.scene, &rig.registry);

    let transform = proxies.get(scene::attachment_id(rig.item)).unwrap().transform();
    let expected = Mat4::from_translation(Vec3::new(2.0, 10.0, 0.0));
    assert!(transform.abs_diff_eq(expected, EPSILON));
}

#[test]
fn hat_profile_applies_hat_corrections() {
    let mut rig = Rig::new();
    rig.bind(rig.hat, rig.sword, Some("head"));

    let mut proxies = manager();
    proxies.rebuild_all(&mut rig.scene, &rig.registry);

    let transform = proxies.get(scene::attachment_id(rig.hat)).unwrap().transform();
    let expected = Mat4::from_translation(Vec3::new(0.0, 10.0, 0.0))
        * Mat4::from_translation(Vec3::new(0.0, -4.25, 0.0))
        * Mat4::from_scale(Vec3::splat(0.62))
        * Mat4::from_translation(Vec3::new(0.0, 1.0, 0.0))
        * Mat4::from_translation(Vec3::splat(-8.0));
    assert!(transform.abs_diff_eq(expected, EPSILON));
}
