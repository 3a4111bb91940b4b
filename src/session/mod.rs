//! Project Sessions
//!
//! A [`ProjectSession`] is the per-project context every core operation runs
//! against: it owns the attachment registry, the live proxies and the
//! animation coordinator of one open project. It is built when the project
//! opens and torn down with [`ProjectSession::close`] when it closes.
//!
//! Hosts drive it from two kinds of callbacks:
//!
//! - edit callbacks ([`apply_edit`](ProjectSession::apply_edit),
//!   [`clear_binding`](ProjectSession::clear_binding),
//!   [`attachment_points_changed`](ProjectSession::attachment_points_changed)),
//!   which mutate the registry and then rebuild and resync synchronously;
//! - frame callbacks ([`on_render_frame`](ProjectSession::on_render_frame),
//!   [`on_animation_frame`](ProjectSession::on_animation_frame)), which
//!   refresh proxy placement and resync animations only when a proxy
//!   appeared or went away.
//!
//! [`SessionManager`] tracks the sessions of every open project.

mod manager;

use uuid::Uuid;

use crate::anim_sync::AnimationSyncCoordinator;
use crate::config::RigConfig;
use crate::errors::{Result, RigError};
use crate::host::{AnimationHost, AttachmentId, ModelId, SceneHost};
use crate::profile::suggest_profile;
use crate::proxy::{FrameStats, ProxyLifecycleManager, RebuildStats, RefreshPolicy};
use crate::registry::{AttachmentRegistry, BindingPatch, PointsDelta};

pub use manager::{ProjectKey, SessionManager};

/// One discrete edit coming from a binding panel.
#[derive(Debug, Clone, PartialEq)]
pub enum BindingEdit {
    /// Bind a source model (or detach with `None`). The profile is
    /// re-suggested for the new model.
    Source(Option<ModelId>),
    /// Select a display profile by slot id.
    Profile(Option<String>),
    /// Set the scale; clamped into the configured range. Non-finite values
    /// are rejected.
    Scale(f32),
}

pub struct ProjectSession {
    id: Uuid,
    config: RigConfig,
    registry: AttachmentRegistry,
    proxies: ProxyLifecycleManager,
    animations: AnimationSyncCoordinator,
}

impl ProjectSession {
    /// Opens a session on the host's current attachment points.
    ///
    /// Nothing is bound yet, so no proxy is created.
    pub fn open<H>(config: RigConfig, host: &H) -> Result<Self>
    where
        H: SceneHost + ?Sized,
    {
        config.validate()?;
        let registry = AttachmentRegistry::with_points(host.attachment_points());
        let session = Self {
            id: Uuid::new_v4(),
            proxies: ProxyLifecycleManager::new(&config),
            animations: AnimationSyncCoordinator::new(&config),
            registry,
            config,
        };
        log::info!(
            "Opened rig session {} with {} attachment points",
            session.id,
            session.registry.points().len()
        );
        Ok(session)
    }

    /// Swaps the per-frame refresh policy.
    #[must_use]
    pub fn with_refresh_policy(mut self, policy: Box<dyn RefreshPolicy>) -> Self {
        self.proxies = self.proxies.with_policy(policy);
        self
    }

    #[must_use]
    pub fn id(&self) -> Uuid {
        self.id
    }

    #[must_use]
    pub fn config(&self) -> &RigConfig {
        &self.config
    }

    #[must_use]
    pub fn registry(&self) -> &AttachmentRegistry {
        &self.registry
    }

    #[must_use]
    pub fn proxies(&self) -> &ProxyLifecycleManager {
        &self.proxies
    }

    // ========================================================================
    // Edit callbacks
    // ========================================================================

    /// Applies one panel edit, then rebuilds proxies and resyncs animations.
    pub fn apply_edit<H>(&mut self, host: &mut H, id: AttachmentId, edit: BindingEdit) -> Result<RebuildStats>
    where
        H: SceneHost + AnimationHost + ?Sized,
    {
        let patch = match edit {
            BindingEdit::Source(source) => self.source_patch(host, id, source)?,
            BindingEdit::Profile(profile) => BindingPatch::new().profile(profile),
            BindingEdit::Scale(scale) if !scale.is_finite() => return Err(RigError::InvalidScale(scale)),
            BindingEdit::Scale(scale) => BindingPatch::new().scale(self.config.clamp_scale(scale)),
        };
        self.registry.set(id, patch)?;
        Ok(self.refresh(host))
    }

    /// Binds `source` to a point with the suggested profile.
    pub fn bind_source<H>(&mut self, host: &mut H, id: AttachmentId, source: Option<ModelId>) -> Result<RebuildStats>
    where
        H: SceneHost + AnimationHost + ?Sized,
    {
        self.apply_edit(host, id, BindingEdit::Source(source))
    }

    /// Detaches a point: binding back to defaults, proxy disposed, animation
    /// locks resynced.
    pub fn clear_binding<H>(&mut self, host: &mut H, id: AttachmentId) -> Result<RebuildStats>
    where
        H: SceneHost + AnimationHost + ?Sized,
    {
        self.registry.clear(id)?;
        Ok(self.refresh(host))
    }

    /// Re-reads the host's attachment points after locators were added,
    /// removed or renamed.
    pub fn attachment_points_changed<H>(&mut self, host: &mut H) -> PointsDelta
    where
        H: SceneHost + AnimationHost + ?Sized,
    {
        let delta = self.registry.sync_points(host.attachment_points());
        if !delta.is_empty() {
            log::debug!(
                "Attachment points changed: +{} -{}",
                delta.added.len(),
                delta.removed.len()
            );
        }
        self.refresh(host);
        delta
    }

    /// The binding panel was (re)mounted.
    pub fn panel_mounted<H>(&mut self, host: &mut H) -> RebuildStats
    where
        H: SceneHost + AnimationHost + ?Sized,
    {
        self.refresh(host)
    }

    /// Full rebuild followed by an animation sync.
    pub fn refresh<H>(&mut self, host: &mut H) -> RebuildStats
    where
        H: SceneHost + AnimationHost + ?Sized,
    {
        let stats = self.proxies.rebuild_all(host, &self.registry);
        self.animations.sync(host, &self.registry, &self.proxies);
        stats
    }

    // ========================================================================
    // Frame callbacks
    // ========================================================================

    pub fn on_render_frame<H>(&mut self, host: &mut H) -> FrameStats
    where
        H: SceneHost + AnimationHost + ?Sized,
    {
        self.frame(host)
    }

    pub fn on_animation_frame<H>(&mut self, host: &mut H) -> FrameStats
    where
        H: SceneHost + AnimationHost + ?Sized,
    {
        self.frame(host)
    }

    /// Refreshes placement; resyncs animation locks when the frame spawned
    /// or disposed a proxy.
    fn frame<H>(&mut self, host: &mut H) -> FrameStats
    where
        H: SceneHost + AnimationHost + ?Sized,
    {
        let stats = self.proxies.update_positions_only(host, &self.registry);
        if stats.changed_proxy_set() {
            self.animations.sync(host, &self.registry, &self.proxies);
        }
        stats
    }

    // ========================================================================
    // Teardown
    // ========================================================================

    /// Disposes every proxy, releases animation locks and drops the registry.
    pub fn close<H>(mut self, host: &mut H)
    where
        H: SceneHost + AnimationHost + ?Sized,
    {
        self.proxies.dispose_all(host);
        self.animations.release_all(host);
        self.registry.reset();
        log::info!("Closed rig session {}", self.id);
    }

    fn source_patch<H>(&self, host: &H, id: AttachmentId, source: Option<ModelId>) -> Result<BindingPatch>
    where
        H: SceneHost + ?Sized,
    {
        let point = self.registry.point(id).ok_or(RigError::UnknownAttachment(id))?;
        let current = self.registry.get(id)?;

        let profile = source
            .filter(|model| host.model_format(*model).is_some_and(|f| f.is_item_style()))
            .and_then(|model| host.display_profiles(model))
            .and_then(|profiles| suggest_profile(profiles, point.class(), current.profile.as_deref()));

        Ok(BindingPatch::new().source(source).profile(profile))
    }
}

impl std::fmt::Debug for ProjectSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProjectSession")
            .field("id", &self.id)
            .field("points", &self.registry.points().len())
            .field("proxies", &self.proxies.len())
            .finish_non_exhaustive()
    }
}
