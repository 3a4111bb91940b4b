//! Attachment Registry
//!
//! Table of the host model's attachment points and the binding configured on
//! each. One registry exists per open project and is owned by its
//! [`ProjectSession`](crate::session::ProjectSession).
//!
//! Mutation never touches the scene: after [`AttachmentRegistry::set`] or
//! [`AttachmentRegistry::clear`] the caller runs the proxy rebuild and the
//! animation sync itself.

use rustc_hash::FxHashMap;

use crate::errors::{Result, RigError};
use crate::host::{AttachmentId, ModelId};
use crate::locator::AttachmentPoint;

static DEFAULT_BINDING: Binding = Binding::DEFAULT;

/// What the user configured on one attachment point.
#[derive(Debug, Clone, PartialEq)]
pub struct Binding {
    /// Model rendered on the point, if any.
    pub source: Option<ModelId>,
    /// Display profile (slot id) of the source model, meaningful only for
    /// item-style sources.
    pub profile: Option<String>,
    /// User scale factor, strictly positive.
    pub scale: f32,
}

impl Binding {
    pub const DEFAULT: Binding = Binding {
        source: None,
        profile: None,
        scale: 1.0,
    };

    #[inline]
    #[must_use]
    pub fn is_bound(&self) -> bool {
        self.source.is_some()
    }
}

impl Default for Binding {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Partial binding update; unset fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BindingPatch {
    pub source: Option<Option<ModelId>>,
    pub profile: Option<Option<String>>,
    pub scale: Option<f32>,
}

impl BindingPatch {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn source(mut self, source: Option<ModelId>) -> Self {
        self.source = Some(source);
        self
    }

    #[must_use]
    pub fn profile(mut self, profile: Option<String>) -> Self {
        self.profile = Some(profile);
        self
    }

    #[must_use]
    pub fn scale(mut self, scale: f32) -> Self {
        self.scale = Some(scale);
        self
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.source.is_none() && self.profile.is_none() && self.scale.is_none()
    }
}

/// Difference produced by [`AttachmentRegistry::sync_points`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PointsDelta {
    pub added: Vec<AttachmentId>,
    pub removed: Vec<AttachmentId>,
}

impl PointsDelta {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

#[derive(Debug, Default)]
pub struct AttachmentRegistry {
    points: Vec<AttachmentPoint>,
    bindings: FxHashMap<AttachmentId, Binding>,
}

impl AttachmentRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_points(points: Vec<AttachmentPoint>) -> Self {
        let mut registry = Self::new();
        registry.sync_points(points);
        registry
    }

    // ========================================================================
    // Attachment points
    // ========================================================================

    /// Replaces the known attachment points with the host's current list.
    ///
    /// Bindings of points that disappeared are discarded; renamed points keep
    /// their binding and are reclassified.
    pub fn sync_points(&mut self, points: Vec<AttachmentPoint>) -> PointsDelta {
        let mut delta = PointsDelta::default();

        for old in &self.points {
            if !points.iter().any(|p| p.id() == old.id()) {
                delta.removed.push(old.id());
            }
        }
        for new in &points {
            if !self.points.iter().any(|p| p.id() == new.id()) {
                delta.added.push(new.id());
            }
        }

        for id in &delta.removed {
            if self.bindings.remove(id).is_some() {
                log::debug!("Discarded binding of removed attachment point {id:?}");
            }
        }

        self.points = points;
        delta
    }

    #[must_use]
    pub fn point(&self, id: AttachmentId) -> Option<&AttachmentPoint> {
        self.points.iter().find(|p| p.id() == id)
    }

    /// Every point with the exact name. Hosts usually keep names unique, but
    /// nothing enforces it.
    pub fn points_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a AttachmentPoint> {
        self.points.iter().filter(move |p| p.name() == name)
    }

    #[must_use]
    pub fn points(&self) -> &[AttachmentPoint] {
        &self.points
    }

    #[must_use]
    pub fn contains(&self, id: AttachmentId) -> bool {
        self.point(id).is_some()
    }

    // ========================================================================
    // Bindings
    // ========================================================================

    /// Binding of a point; unconfigured points report the default binding.
    pub fn get(&self, id: AttachmentId) -> Result<&Binding> {
        if !self.contains(id) {
            return Err(RigError::UnknownAttachment(id));
        }
        Ok(self.bindings.get(&id).unwrap_or(&DEFAULT_BINDING))
    }

    /// Applies a partial update. The patch is validated as a whole before
    /// anything changes.
    pub fn set(&mut self, id: AttachmentId, patch: BindingPatch) -> Result<()> {
        if !self.contains(id) {
            return Err(RigError::UnknownAttachment(id));
        }
        if let Some(scale) = patch.scale
            && !(scale.is_finite() && scale > 0.0)
        {
            return Err(RigError::InvalidScale(scale));
        }

        let binding = self.bindings.entry(id).or_default();
        if let Some(source) = patch.source {
            binding.source = source;
        }
        if let Some(profile) = patch.profile {
            binding.profile = profile;
        }
        if let Some(scale) = patch.scale {
            binding.scale = scale;
        }
        Ok(())
    }

    /// Resets a binding to its defaults. The point itself stays registered.
    pub fn clear(&mut self, id: AttachmentId) -> Result<()> {
        if !self.contains(id) {
            return Err(RigError::UnknownAttachment(id));
        }
        if let Some(binding) = self.bindings.get_mut(&id) {
            *binding = Binding::DEFAULT;
        }
        Ok(())
    }

    /// Every attachment point paired with its binding, in host order.
    pub fn all(&self) -> impl Iterator<Item = (&AttachmentPoint, &Binding)> {
        self.points
            .iter()
            .map(|p| (p, self.bindings.get(&p.id()).unwrap_or(&DEFAULT_BINDING)))
    }

    /// Pairs whose binding has a source model.
    pub fn bound(&self) -> impl Iterator<Item = (&AttachmentPoint, &Binding)> {
        self.all().filter(|(_, binding)| binding.is_bound())
    }

    /// Drops every point and binding (project close).
    pub fn reset(&mut self) {
        self.points.clear();
        self.bindings.clear();
    }
}
