//! # Locator Rig
//!
//! Attach one model onto a named locator of another so it follows the
//! locator every frame, posed the way it would be in a given usage context
//! (held in the right or left hand, worn on the head, framed...).
//!
//! # Architecture
//!
//! - [`profile`]: display profile lookup and the fixed slot corrections
//! - [`compose`]: binding + profile + locator world matrix → proxy matrix
//! - [`registry`]: attachment points and their bindings, per project
//! - [`proxy`]: spawning, per-frame refresh and disposal of proxies
//! - [`anim_sync`]: animations locked while a locator shows a proxy
//! - [`session`]: the per-project context tying the above together
//! - [`host`]: traits the embedding editor implements
//! - [`scene`] / [`animation`]: an in-memory reference host
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use locator_rig::prelude::*;
//!
//! let mut scene = Scene::new();
//! let hand = scene.add_locator("item", None);
//! let sword = scene.add_model(SourceModel::new("sword", ModelFormat::ItemStyle, Geometry::block()));
//! scene.update_matrix_world();
//!
//! let mut session = ProjectSession::open(RigConfig::default(), &scene)?;
//! session.bind_source(&mut scene, scene::attachment_id(hand), Some(scene::model_id(sword)))?;
//!
//! // every frame
//! scene.update_matrix_world();
//! session.on_render_frame(&mut scene);
//! ```

pub mod anim_sync;
pub mod animation;
pub mod compose;
pub mod config;
pub mod errors;
pub mod host;
pub mod locator;
pub mod profile;
pub mod proxy;
pub mod registry;
pub mod scene;
pub mod session;

pub use anim_sync::AnimationSyncCoordinator;
pub use compose::{TransformCompositor, TransformStep};
pub use config::{AnimationLock, RefreshMode, RigConfig};
pub use errors::{Result, RigError};
pub use host::{AnimationHost, AnimationId, AttachmentId, ModelFormat, ModelId, ModelSource, ProxyHandle, SceneHost};
pub use locator::{AttachmentClass, AttachmentPoint};
pub use profile::{DisplayProfile, DisplayProfiles, SlotId};
pub use proxy::{ProxyLifecycleManager, RefreshPolicy};
pub use registry::{AttachmentRegistry, Binding, BindingPatch};
pub use session::{BindingEdit, ProjectKey, ProjectSession, SessionManager};

pub mod prelude {
    pub use crate::scene::{self, Geometry, Scene, SourceModel};
    pub use crate::{
        AttachmentId, Binding, BindingEdit, DisplayProfiles, ModelFormat, ModelId, ProjectSession,
        RigConfig, SlotId,
    };
}
