//! Attachment points (locators) and their name-based classification.

use crate::host::AttachmentId;

/// Name convention an attachment point falls under.
///
/// Computed once when the [`AttachmentPoint`] is built and carried along, so
/// the compositor and resolver branch on a tag instead of re-matching names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttachmentClass {
    /// `seat_<n>`: riding seat, scale is inverse-compensated.
    Seat(u32),
    /// `item_hat`: head slot items sit lower on the head.
    ItemHat,
    /// `item_face`: head slot items are pushed forward onto the face.
    ItemFace,
    /// Anything else.
    Generic,
}

impl AttachmentClass {
    /// Classifies a locator name.
    ///
    /// Seat detection requires the exact form `seat_` followed by one or more
    /// ASCII digits. Seat numbers that overflow `u32` saturate.
    #[must_use]
    pub fn classify(name: &str) -> Self {
        match name {
            "item_hat" => return AttachmentClass::ItemHat,
            "item_face" => return AttachmentClass::ItemFace,
            _ => {}
        }

        if let Some(digits) = name.strip_prefix("seat_")
            && !digits.is_empty()
            && digits.bytes().all(|b| b.is_ascii_digit())
        {
            let index = digits.parse::<u32>().unwrap_or(u32::MAX);
            return AttachmentClass::Seat(index);
        }

        AttachmentClass::Generic
    }

    #[inline]
    #[must_use]
    pub fn is_seat(self) -> bool {
        matches!(self, AttachmentClass::Seat(_))
    }
}

/// A named anchor inside the host model.
///
/// The rig only reads the name and identity; the world transform is queried
/// from the host on demand.
#[derive(Debug, Clone, PartialEq)]
pub struct AttachmentPoint {
    id: AttachmentId,
    name: String,
    parent: Option<AttachmentId>,
    class: AttachmentClass,
}

impl AttachmentPoint {
    #[must_use]
    pub fn new(id: AttachmentId, name: impl Into<String>) -> Self {
        let name = name.into();
        let class = AttachmentClass::classify(&name);
        Self {
            id,
            name,
            parent: None,
            class,
        }
    }

    /// Sets the enclosing attachment point (folder-style grouping).
    #[must_use]
    pub fn with_parent(mut self, parent: Option<AttachmentId>) -> Self {
        self.parent = parent;
        self
    }

    #[inline]
    #[must_use]
    pub fn id(&self) -> AttachmentId {
        self.id
    }

    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    #[must_use]
    pub fn parent(&self) -> Option<AttachmentId> {
        self.parent
    }

    #[inline]
    #[must_use]
    pub fn class(&self) -> AttachmentClass {
        self.class
    }
}
