use glam::{Affine3A, Mat4};
use slotmap::SlotMap;

use crate::animation::AnimationLibrary;
use crate::errors::{Result, RigError};
use crate::host::{
    AnimationHost, AnimationId, AttachmentId, ModelFormat, ModelId, ModelSource, ProxyHandle, SceneHost,
};
use crate::locator::AttachmentPoint;
use crate::profile::DisplayProfiles;
use crate::scene::model::{ModelKey, SourceModel};
use crate::scene::node::{Node, NodeKind};
use crate::scene::{
    NodeHandle, animation_id, animation_key, attachment_id, model_key, node_of_attachment,
    node_of_proxy, proxy_handle, transform_system,
};

/// The host model being edited, the other open models that can be bound to
/// its locators, and its animations.
#[derive(Debug)]
pub struct Scene {
    nodes: SlotMap<NodeHandle, Node>,
    root_nodes: Vec<NodeHandle>,
    models: SlotMap<ModelKey, SourceModel>,

    pub animations: AnimationLibrary,
    /// Whether the animation editor is open.
    pub animation_mode: bool,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: SlotMap::with_key(),
            root_nodes: Vec::new(),
            models: SlotMap::with_key(),
            animations: AnimationLibrary::new(),
            animation_mode: true,
        }
    }

    // ========================================================================
    // Hierarchy
    // ========================================================================

    /// Adds a node at the root.
    pub fn add_node(&mut self, node: Node) -> NodeHandle {
        let handle = self.nodes.insert(node);
        self.root_nodes.push(handle);
        handle
    }

    pub fn add_to_parent(&mut self, child: Node, parent: NodeHandle) -> NodeHandle {
        let handle = self.nodes.insert(child);
        if let Some(p) = self.nodes.get_mut(parent) {
            p.children.push(handle);
            self.nodes[handle].parent = Some(parent);
        } else {
            log::warn!("Parent node not found, adding at root");
            self.root_nodes.push(handle);
        }
        handle
    }

    pub fn add_locator(&mut self, name: &str, parent: Option<NodeHandle>) -> NodeHandle {
        match parent {
            Some(parent) => self.add_to_parent(Node::locator(name), parent),
            None => self.add_node(Node::locator(name)),
        }
    }

    /// Reparents `child` under `parent`.
    pub fn attach(&mut self, child: NodeHandle, parent: NodeHandle) {
        if child == parent {
            log::warn!("Cannot attach node to itself!");
            return;
        }
        if !self.nodes.contains_key(parent) || !self.nodes.contains_key(child) {
            log::error!("Node not found during attach!");
            return;
        }

        self.detach_from_parent(child);
        self.nodes[parent].children.push(child);
        let node = &mut self.nodes[child];
        node.parent = Some(parent);
        node.transform.mark_dirty();
        transform_system::invalidate_subtree(&mut self.nodes, child);
    }

    /// Removes a node and its whole subtree.
    pub fn remove_node(&mut self, handle: NodeHandle) {
        if !self.nodes.contains_key(handle) {
            return;
        }
        self.detach_from_parent(handle);

        let mut stack = vec![handle];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.nodes.remove(current) {
                stack.extend(node.children);
            }
        }
    }

    fn detach_from_parent(&mut self, handle: NodeHandle) {
        match self.nodes.get(handle).and_then(Node::parent) {
            Some(parent) => {
                if let Some(p) = self.nodes.get_mut(parent) {
                    p.children.retain(|&c| c != handle);
                }
            }
            None => self.root_nodes.retain(|&r| r != handle),
        }
    }

    #[must_use]
    pub fn get_node(&self, handle: NodeHandle) -> Option<&Node> {
        self.nodes.get(handle)
    }

    pub fn get_node_mut(&mut self, handle: NodeHandle) -> Option<&mut Node> {
        self.nodes.get_mut(handle)
    }

    pub fn set_name(&mut self, handle: NodeHandle, name: &str) {
        if let Some(node) = self.nodes.get_mut(handle) {
            name.clone_into(&mut node.name);
        }
    }

    #[must_use]
    pub fn root_nodes(&self) -> &[NodeHandle] {
        &self.root_nodes
    }

    #[must_use]
    pub fn find_by_name(&self, name: &str) -> Option<NodeHandle> {
        self.nodes
            .iter()
            .find(|(_, node)| node.name == name)
            .map(|(handle, _)| handle)
    }

    /// Recomputes world matrices. Hosts call this before each frame
    /// callback.
    pub fn update_matrix_world(&mut self) {
        transform_system::update_hierarchy(&mut self.nodes, &self.root_nodes);
    }

    /// Proxy nodes currently inserted at the root.
    pub fn proxies(&self) -> impl Iterator<Item = (NodeHandle, &Node)> {
        self.root_nodes
            .iter()
            .filter_map(|&handle| self.nodes.get(handle).map(|node| (handle, node)))
            .filter(|(_, node)| node.is_proxy())
    }

    #[must_use]
    pub fn proxy_count(&self) -> usize {
        self.proxies().count()
    }

    /// Every proxy node, inserted or detached.
    #[must_use]
    pub fn proxy_node_count(&self) -> usize {
        self.nodes.values().filter(|node| node.is_proxy()).count()
    }

    // ========================================================================
    // Models
    // ========================================================================

    pub fn add_model(&mut self, model: SourceModel) -> ModelKey {
        self.models.insert(model)
    }

    pub fn remove_model(&mut self, key: ModelKey) -> Option<SourceModel> {
        self.models.remove(key)
    }

    #[must_use]
    pub fn model(&self, key: ModelKey) -> Option<&SourceModel> {
        self.models.get(key)
    }

    pub fn model_mut(&mut self, key: ModelKey) -> Option<&mut SourceModel> {
        self.models.get_mut(key)
    }

    fn place_proxy(&mut self, proxy: ProxyHandle, transform: Mat4, insert: bool) -> bool {
        let handle = node_of_proxy(proxy);
        let Some(node) = self.nodes.get_mut(handle).filter(|node| node.is_proxy()) else {
            return false;
        };
        if !insert && !self.root_nodes.contains(&handle) {
            return false;
        }

        let matrix = Affine3A::from_mat4(transform);
        node.transform.set_local_matrix(matrix);
        node.transform.update_local_matrix();
        node.transform.set_world_matrix(matrix);
        node.laid_out = true;

        if insert && !self.root_nodes.contains(&handle) {
            self.root_nodes.push(handle);
        }
        true
    }
}

impl ModelSource for Scene {
    fn model_format(&self, model: ModelId) -> Option<ModelFormat> {
        self.models.get(model_key(model)).map(|m| m.format)
    }

    fn display_profiles(&self, model: ModelId) -> Option<&DisplayProfiles> {
        self.models.get(model_key(model)).and_then(SourceModel::display)
    }

    fn model_version(&self, model: ModelId) -> Option<u64> {
        self.models.get(model_key(model)).map(SourceModel::version)
    }
}

impl SceneHost for Scene {
    fn attachment_points(&self) -> Vec<AttachmentPoint> {
        self.nodes
            .iter()
            .filter(|(_, node)| node.is_locator())
            .map(|(handle, node)| {
                let parent = node
                    .parent
                    .filter(|p| self.nodes.get(*p).is_some_and(Node::is_locator))
                    .map(attachment_id);
                AttachmentPoint::new(attachment_id(handle), node.name.clone()).with_parent(parent)
            })
            .collect()
    }

    fn attachment_world_matrix(&self, id: AttachmentId) -> Option<Mat4> {
        self.nodes
            .get(node_of_attachment(id))
            .filter(|node| node.is_locator() && node.laid_out)
            .map(|node| node.transform.world_matrix_as_mat4())
    }

    fn clone_model(&mut self, model: ModelId) -> Result<ProxyHandle> {
        let key = model_key(model);
        let source = self.models.get(key).ok_or(RigError::SourceUnavailable(model))?;

        let node = Node::new(
            format!("{} (proxy)", source.name),
            NodeKind::Proxy {
                model: key,
                geometry: source.geometry().clone(),
            },
        );
        Ok(proxy_handle(self.nodes.insert(node)))
    }

    fn insert_proxy(&mut self, proxy: ProxyHandle, transform: Mat4) {
        if !self.place_proxy(proxy, transform, true) {
            log::error!("Inserted proxy {proxy:?} does not exist");
        }
    }

    fn set_proxy_transform(&mut self, proxy: ProxyHandle, transform: Mat4) -> bool {
        self.place_proxy(proxy, transform, false)
    }

    fn remove_proxy(&mut self, proxy: ProxyHandle) {
        let handle = node_of_proxy(proxy);
        if self.nodes.get(handle).is_some_and(Node::is_proxy) {
            self.remove_node(handle);
        }
    }
}

impl AnimationHost for Scene {
    fn animation_mode_active(&self) -> bool {
        self.animation_mode
    }

    fn find_animation(&self, suffix: &str) -> Option<AnimationId> {
        self.animations.find_by_suffix(suffix).map(animation_id)
    }

    fn is_animation_locked(&self, id: AnimationId) -> bool {
        self.animations
            .get(animation_key(id))
            .is_some_and(|animation| animation.is_locked())
    }

    fn set_animation_locked(&mut self, id: AnimationId, locked: bool) {
        if let Some(animation) = self.animations.get_mut(animation_key(id)) {
            if locked {
                animation.lock();
            } else {
                animation.unlock();
            }
        }
    }
}
