//! Host Boundary
//!
//! The rig never owns the scene graph, the model library or the animation
//! player. It talks to them through the traits in this module:
//!
//! - [`ModelSource`]: format flag, exported display profiles and edit version
//!   of a source model
//! - [`SceneHost`]: attachment point listing, live world matrices, and the
//!   clone / insert / remove primitives for proxy subtrees
//! - [`AnimationHost`]: animations addressable by name with a lock flag
//!
//! Identifiers crossing the boundary are opaque `u64` newtypes. Hosts built on
//! slotmap arenas can round-trip their keys through `KeyData::as_ffi`.

use glam::Mat4;

use crate::errors::Result;
use crate::locator::AttachmentPoint;
use crate::profile::DisplayProfiles;

macro_rules! host_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(pub u64);

        impl $name {
            /// Returns the raw host value.
            #[inline]
            #[must_use]
            pub fn raw(self) -> u64 {
                self.0
            }
        }

        impl From<u64> for $name {
            #[inline]
            fn from(value: u64) -> Self {
                Self(value)
            }
        }
    };
}

host_id! {
    /// Stable identity of a locator inside the host model.
    AttachmentId
}

host_id! {
    /// Reference to a source model (another open project in the editor).
    ModelId
}

host_id! {
    /// Handle of a cloned render subtree owned by the host scene.
    ProxyHandle
}

host_id! {
    /// Handle of a host animation.
    AnimationId
}

/// Project format of a source model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModelFormat {
    /// Item/block style model: pivot sits at the block corner and the file
    /// exports per-context display profiles.
    ItemStyle,
    /// Any other format (entity models, generic meshes).
    Entity,
}

impl ModelFormat {
    #[inline]
    #[must_use]
    pub fn is_item_style(self) -> bool {
        matches!(self, ModelFormat::ItemStyle)
    }
}

/// Read access to source model metadata.
pub trait ModelSource {
    /// Project format of `model`, or `None` if the model no longer exists.
    fn model_format(&self, model: ModelId) -> Option<ModelFormat>;

    /// Display profiles exported by `model`. `None` for models that export
    /// none or that no longer exist.
    fn display_profiles(&self, model: ModelId) -> Option<&DisplayProfiles>;

    /// Monotonic counter bumped on every edit of `model`'s geometry.
    ///
    /// Hosts that cannot track edits return `None`, which forces a reclone
    /// under every refresh policy.
    fn model_version(&self, _model: ModelId) -> Option<u64> {
        None
    }
}

/// Scene graph primitives consumed by the proxy manager.
pub trait SceneHost: ModelSource {
    /// Every attachment point currently defined in the host model.
    fn attachment_points(&self) -> Vec<AttachmentPoint>;

    /// Current world matrix of an attachment point, refreshed by the host
    /// before each frame callback. `None` when the point has not been laid
    /// out yet.
    fn attachment_world_matrix(&self, id: AttachmentId) -> Option<Mat4>;

    /// Produces an independent, detached copy of `model`'s current render
    /// geometry.
    fn clone_model(&mut self, model: ModelId) -> Result<ProxyHandle>;

    /// Inserts a detached proxy at the scene root with the given transform.
    fn insert_proxy(&mut self, proxy: ProxyHandle, transform: Mat4);

    /// Overwrites the transform of a live proxy. Returns `false` if the proxy
    /// is no longer in the scene.
    fn set_proxy_transform(&mut self, proxy: ProxyHandle, transform: Mat4) -> bool;

    /// Removes a proxy (inserted or detached) and frees its geometry.
    fn remove_proxy(&mut self, proxy: ProxyHandle);
}

/// Animation player primitives consumed by the sync coordinator.
pub trait AnimationHost {
    /// Whether the host's animation mode is open. Locks are only touched
    /// while it is.
    fn animation_mode_active(&self) -> bool {
        true
    }

    /// First animation whose name ends with `suffix`.
    fn find_animation(&self, suffix: &str) -> Option<AnimationId>;

    /// Whether the animation is currently held in the locked-playing state.
    fn is_animation_locked(&self, id: AnimationId) -> bool;

    /// Forces the animation into the locked-playing state, or hands it back
    /// to the user.
    fn set_animation_locked(&mut self, id: AnimationId, locked: bool);
}
