use glam::Affine3A;

use crate::scene::model::{Geometry, ModelKey};
use crate::scene::transform::Transform;
use crate::scene::NodeHandle;

/// Role of a node in the host model.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// Plain grouping node (bone / folder).
    Group,
    /// Named attachment point.
    Locator,
    /// Cloned geometry of a source model, placed at the scene root.
    Proxy { model: ModelKey, geometry: Geometry },
}

/// A scene node.
///
/// # Hierarchy
///
/// - `parent`: handle of the parent node (None for root nodes and for
///   detached proxies)
/// - `children`: child node handles
///
/// # World matrix validity
///
/// `laid_out` is false from creation or reparenting until the next
/// hierarchy update writes a world matrix. Locators that are not laid out
/// report no world transform to the rig.
#[derive(Debug, Clone)]
pub struct Node {
    pub name: String,
    pub kind: NodeKind,

    pub(crate) parent: Option<NodeHandle>,
    pub(crate) children: Vec<NodeHandle>,

    pub transform: Transform,
    pub visible: bool,

    pub(crate) laid_out: bool,
}

impl Node {
    #[must_use]
    pub fn new(name: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            name: name.into(),
            kind,
            parent: None,
            children: Vec::new(),
            transform: Transform::new(),
            visible: true,
            laid_out: false,
        }
    }

    #[must_use]
    pub fn group(name: impl Into<String>) -> Self {
        Self::new(name, NodeKind::Group)
    }

    #[must_use]
    pub fn locator(name: impl Into<String>) -> Self {
        Self::new(name, NodeKind::Locator)
    }

    #[inline]
    #[must_use]
    pub fn parent(&self) -> Option<NodeHandle> {
        self.parent
    }

    #[inline]
    #[must_use]
    pub fn children(&self) -> &[NodeHandle] {
        &self.children
    }

    #[inline]
    #[must_use]
    pub fn is_locator(&self) -> bool {
        matches!(self.kind, NodeKind::Locator)
    }

    #[inline]
    #[must_use]
    pub fn is_proxy(&self) -> bool {
        matches!(self.kind, NodeKind::Proxy { .. })
    }

    /// Whether the world matrix reflects the current hierarchy.
    #[inline]
    #[must_use]
    pub fn is_laid_out(&self) -> bool {
        self.laid_out
    }

    #[inline]
    #[must_use]
    pub fn world_matrix(&self) -> &Affine3A {
        &self.transform.world_matrix
    }
}
