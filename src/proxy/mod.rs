//! Proxy Lifecycle
//!
//! A proxy is a cloned render subtree of a source model, inserted at the
//! scene root with its placement baked into its transform. This module keeps
//! exactly one proxy per bound attachment point and reconciles them with the
//! registry.
//!
//! # Operations
//!
//! - [`ProxyLifecycleManager::rebuild_all`]: throw every proxy away and spawn
//!   fresh ones for every bound point. Run after binding edits, attachment
//!   point list changes and panel mounts.
//! - [`ProxyLifecycleManager::update_positions_only`]: the per-frame path.
//!   Recomposes every live proxy against the point's current world matrix
//!   and, depending on the [`RefreshPolicy`], reclones its geometry.
//! - [`ProxyLifecycleManager::dispose_all`]: remove everything (project close,
//!   plugin teardown).
//!
//! # Failure handling
//!
//! Work is done per attachment point. A failure on one point is logged and
//! the batch moves on:
//!
//! | Error                        | Effect                                       |
//! |------------------------------|----------------------------------------------|
//! | `ProfileNotFound`            | composed without slot corrections            |
//! | `SourceUnavailable`          | no proxy for that point                      |
//! | `MissingAttachmentTransform` | point is retried on the next frame           |
//!
//! Every replacement disposes the old proxy before the new one is inserted,
//! all within one call, so two proxies never coexist for a point.

pub mod refresh;

use glam::Mat4;
use log::Level;
use rustc_hash::{FxHashMap, FxHashSet};
use smallvec::SmallVec;

use crate::compose::TransformCompositor;
use crate::config::RigConfig;
use crate::errors::{Result, RigError};
use crate::host::{AttachmentId, ModelId, ProxyHandle, SceneHost};
use crate::locator::AttachmentPoint;
use crate::profile::resolve;
use crate::registry::{AttachmentRegistry, Binding};

pub use refresh::{RecloneEveryFrame, RefreshPolicy, VersionedRefresh};

type IdBatch = SmallVec<[AttachmentId; 8]>;

/// Bookkeeping for one live proxy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProxyRecord {
    handle: ProxyHandle,
    model: ModelId,
    version: Option<u64>,
    transform: Mat4,
}

impl ProxyRecord {
    #[inline]
    #[must_use]
    pub fn handle(&self) -> ProxyHandle {
        self.handle
    }

    #[inline]
    #[must_use]
    pub fn model(&self) -> ModelId {
        self.model
    }

    /// Source model version the geometry was cloned at.
    #[inline]
    #[must_use]
    pub fn version(&self) -> Option<u64> {
        self.version
    }

    /// Transform last written to the host.
    #[inline]
    #[must_use]
    pub fn transform(&self) -> Mat4 {
        self.transform
    }
}

/// Outcome of a [`ProxyLifecycleManager::rebuild_all`] pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RebuildStats {
    pub spawned: usize,
    /// Bound points waiting for a world matrix.
    pub pending: usize,
    pub failed: usize,
}

/// Outcome of a [`ProxyLifecycleManager::update_positions_only`] pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub recloned: usize,
    pub moved: usize,
    /// Proxies spawned for points that were pending.
    pub spawned: usize,
    /// Points left untouched this frame for lack of a world matrix.
    pub skipped: usize,
    pub disposed: usize,
}

impl FrameStats {
    /// Whether any attachment point gained or lost its proxy.
    #[must_use]
    pub fn changed_proxy_set(&self) -> bool {
        self.spawned + self.disposed > 0
    }
}

#[derive(Debug)]
pub struct ProxyLifecycleManager {
    proxies: FxHashMap<AttachmentId, ProxyRecord>,
    pending: FxHashSet<AttachmentId>,
    compositor: TransformCompositor,
    refresh: Box<dyn RefreshPolicy>,
}

impl ProxyLifecycleManager {
    #[must_use]
    pub fn new(config: &RigConfig) -> Self {
        Self {
            proxies: FxHashMap::default(),
            pending: FxHashSet::default(),
            compositor: TransformCompositor::from_config(config),
            refresh: config.refresh.into(),
        }
    }

    /// Replaces the per-frame refresh policy.
    #[must_use]
    pub fn with_policy(mut self, policy: Box<dyn RefreshPolicy>) -> Self {
        self.refresh = policy;
        self
    }

    #[must_use]
    pub fn compositor(&self) -> &TransformCompositor {
        &self.compositor
    }

    // ========================================================================
    // Queries
    // ========================================================================

    #[must_use]
    pub fn get(&self, id: AttachmentId) -> Option<&ProxyRecord> {
        self.proxies.get(&id)
    }

    #[must_use]
    pub fn has_proxy(&self, id: AttachmentId) -> bool {
        self.proxies.contains_key(&id)
    }

    /// Bound but not yet placed because the point has no world matrix.
    #[must_use]
    pub fn is_pending(&self, id: AttachmentId) -> bool {
        self.pending.contains(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (AttachmentId, &ProxyRecord)> {
        self.proxies.iter().map(|(id, record)| (*id, record))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.proxies.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.proxies.is_empty()
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Disposes every proxy and spawns one per bound attachment point.
    pub fn rebuild_all<H>(&mut self, host: &mut H, registry: &AttachmentRegistry) -> RebuildStats
    where
        H: SceneHost + ?Sized,
    {
        self.dispose_proxies(host);
        self.pending.clear();

        let mut stats = RebuildStats::default();
        for (point, binding) in registry.bound() {
            let Some(model) = binding.source else {
                continue;
            };

            match self.spawn(host, point, binding, model, Level::Warn) {
                Ok(record) => {
                    self.proxies.insert(point.id(), record);
                    stats.spawned += 1;
                }
                Err(RigError::MissingAttachmentTransform(id)) => {
                    log::debug!("'{}' has no world transform yet, deferring proxy", point.name());
                    self.pending.insert(id);
                    stats.pending += 1;
                }
                Err(err) => {
                    log::warn!("Skipping proxy for '{}': {err}", point.name());
                    stats.failed += 1;
                }
            }
        }

        log::debug!(
            "Rebuilt proxies: {} spawned, {} pending, {} failed",
            stats.spawned,
            stats.pending,
            stats.failed
        );
        stats
    }

    /// Per-frame refresh of every live proxy.
    ///
    /// Proxies whose binding no longer points at the model they were cloned
    /// from are disposed here as well, so a missed rebuild cannot leave an
    /// orphan behind for more than one frame.
    pub fn update_positions_only<H>(&mut self, host: &mut H, registry: &AttachmentRegistry) -> FrameStats
    where
        H: SceneHost + ?Sized,
    {
        let mut stats = FrameStats::default();

        let live: IdBatch = self.proxies.keys().copied().collect();
        for id in live {
            let Some(record) = self.proxies.get(&id).copied() else {
                continue;
            };

            let pair = registry
                .point(id)
                .zip(registry.get(id).ok())
                .filter(|(_, binding)| binding.source == Some(record.model));
            let Some((point, binding)) = pair else {
                self.dispose(host, id);
                stats.disposed += 1;
                continue;
            };

            let transform = match self.compose_for(host, point, binding, record.model, Level::Debug) {
                Ok(transform) => transform,
                Err(RigError::MissingAttachmentTransform(_)) => {
                    log::debug!("'{}' lost its world transform, keeping last placement", point.name());
                    stats.skipped += 1;
                    continue;
                }
                Err(err) => {
                    log::warn!("Dropping proxy for '{}': {err}", point.name());
                    self.dispose(host, id);
                    stats.disposed += 1;
                    continue;
                }
            };

            let version = host.model_version(record.model);
            if !self.refresh.needs_reclone(&record, version)
                && host.set_proxy_transform(record.handle, transform)
            {
                if let Some(live) = self.proxies.get_mut(&id) {
                    live.transform = transform;
                }
                stats.moved += 1;
                continue;
            }

            host.remove_proxy(record.handle);
            match host.clone_model(record.model) {
                Ok(handle) => {
                    host.insert_proxy(handle, transform);
                    self.proxies.insert(
                        id,
                        ProxyRecord {
                            handle,
                            model: record.model,
                            version,
                            transform,
                        },
                    );
                    stats.recloned += 1;
                }
                Err(err) => {
                    log::warn!("Dropping proxy for '{}': {err}", point.name());
                    self.proxies.remove(&id);
                    stats.disposed += 1;
                }
            }
        }

        self.retry_pending(host, registry, &mut stats);
        stats
    }

    /// Spawns proxies for pending points whose world matrix showed up.
    fn retry_pending<H>(&mut self, host: &mut H, registry: &AttachmentRegistry, stats: &mut FrameStats)
    where
        H: SceneHost + ?Sized,
    {
        let waiting: IdBatch = self.pending.iter().copied().collect();
        for id in waiting {
            let bound = registry
                .point(id)
                .zip(registry.get(id).ok())
                .and_then(|(point, binding)| binding.source.map(|model| (point, binding, model)));
            let Some((point, binding, model)) = bound else {
                self.pending.remove(&id);
                continue;
            };

            match self.spawn(host, point, binding, model, Level::Warn) {
                Ok(record) => {
                    self.pending.remove(&id);
                    self.proxies.insert(id, record);
                    stats.spawned += 1;
                }
                Err(RigError::MissingAttachmentTransform(_)) => stats.skipped += 1,
                Err(err) => {
                    log::warn!("Giving up on proxy for '{}': {err}", point.name());
                    self.pending.remove(&id);
                }
            }
        }
    }

    /// Removes every proxy from the scene and forgets pending points.
    pub fn dispose_all<H>(&mut self, host: &mut H)
    where
        H: SceneHost + ?Sized,
    {
        let count = self.proxies.len();
        self.dispose_proxies(host);
        self.pending.clear();
        if count > 0 {
            log::info!("Disposed {count} proxies");
        }
    }

    /// Removes the proxy of one point. Returns whether one existed.
    pub fn dispose<H>(&mut self, host: &mut H, id: AttachmentId) -> bool
    where
        H: SceneHost + ?Sized,
    {
        self.pending.remove(&id);
        match self.proxies.remove(&id) {
            Some(record) => {
                host.remove_proxy(record.handle);
                true
            }
            None => false,
        }
    }

    // ========================================================================
    // Internals
    // ========================================================================

    fn dispose_proxies<H>(&mut self, host: &mut H)
    where
        H: SceneHost + ?Sized,
    {
        for (_, record) in self.proxies.drain() {
            host.remove_proxy(record.handle);
        }
    }

    fn spawn<H>(
        &self,
        host: &mut H,
        point: &AttachmentPoint,
        binding: &Binding,
        model: ModelId,
        level: Level,
    ) -> Result<ProxyRecord>
    where
        H: SceneHost + ?Sized,
    {
        let transform = self.compose_for(host, point, binding, model, level)?;
        let handle = host.clone_model(model)?;
        host.insert_proxy(handle, transform);
        Ok(ProxyRecord {
            handle,
            model,
            version: host.model_version(model),
            transform,
        })
    }

    fn compose_for<H>(
        &self,
        host: &H,
        point: &AttachmentPoint,
        binding: &Binding,
        model: ModelId,
        level: Level,
    ) -> Result<Mat4>
    where
        H: SceneHost + ?Sized,
    {
        let world = host
            .attachment_world_matrix(point.id())
            .ok_or(RigError::MissingAttachmentTransform(point.id()))?;
        let format = host
            .model_format(model)
            .ok_or(RigError::SourceUnavailable(model))?;

        let profile = if format.is_item_style() {
            binding.profile.as_deref().and_then(|profile_id| {
                resolve(host, model, profile_id)
                    .inspect_err(|err| {
                        log::log!(
                            level,
                            "'{}': {err}; composing without slot corrections",
                            point.name()
                        );
                    })
                    .ok()
            })
        } else {
            None
        };

        Ok(self
            .compositor
            .compose(binding, point, profile.as_ref(), world, format.is_item_style()))
    }
}
