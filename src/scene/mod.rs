//! Reference Host Scene
//!
//! An in-memory host that implements the rig's host traits:
//! - [`Node`]: hierarchy node (group, locator or proxy)
//! - [`Transform`]: TRS component with cached local/world matrices
//! - [`SourceModel`]: bindable model with geometry, format and display profiles
//! - [`Scene`]: node arena, model library and animation library
//! - [`transform_system`]: world matrix propagation
//!
//! Embedders with their own scene graph implement
//! [`SceneHost`](crate::host::SceneHost) and
//! [`AnimationHost`](crate::host::AnimationHost) directly instead.

pub mod model;
pub mod node;
pub mod scene;
pub mod transform;
pub mod transform_system;

use slotmap::{Key, KeyData, new_key_type};

use crate::animation::AnimationKey;
use crate::host::{AnimationId, AttachmentId, ModelId, ProxyHandle};

pub use model::{Cuboid, Geometry, ModelKey, SourceModel};
pub use node::{Node, NodeKind};
pub use scene::Scene;
pub use transform::Transform;

new_key_type! {
    pub struct NodeHandle;
}

fn to_raw<K: Key>(key: K) -> u64 {
    key.data().as_ffi()
}

fn from_raw<K: Key>(raw: u64) -> K {
    KeyData::from_ffi(raw).into()
}

// === Key <-> host id conversions ===

#[must_use]
pub fn attachment_id(handle: NodeHandle) -> AttachmentId {
    AttachmentId(to_raw(handle))
}

#[must_use]
pub fn proxy_handle(handle: NodeHandle) -> ProxyHandle {
    ProxyHandle(to_raw(handle))
}

#[must_use]
pub fn model_id(key: ModelKey) -> ModelId {
    ModelId(to_raw(key))
}

#[must_use]
pub fn animation_id(key: AnimationKey) -> AnimationId {
    AnimationId(to_raw(key))
}

pub(crate) fn node_of_attachment(id: AttachmentId) -> NodeHandle {
    from_raw(id.raw())
}

pub(crate) fn node_of_proxy(proxy: ProxyHandle) -> NodeHandle {
    from_raw(proxy.raw())
}

pub(crate) fn model_key(id: ModelId) -> ModelKey {
    from_raw(id.raw())
}

pub(crate) fn animation_key(id: AnimationId) -> AnimationKey {
    from_raw(id.raw())
}
