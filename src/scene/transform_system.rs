//! Transform System
//!
//! Propagates world matrices down the node hierarchy. Decoupled from
//! [`Scene`](crate::scene::Scene) so it only borrows the node arena and the
//! root list.

use glam::Affine3A;
use slotmap::SlotMap;

use crate::scene::NodeHandle;
use crate::scene::node::Node;

/// Updates world matrices of every tree under `roots`.
///
/// Uses an explicit stack instead of recursion. A node's world matrix is only
/// recomputed when its local matrix or an ancestor's world matrix changed,
/// or when it has not been laid out yet.
pub fn update_hierarchy(nodes: &mut SlotMap<NodeHandle, Node>, roots: &[NodeHandle]) {
    let mut stack: Vec<(NodeHandle, Affine3A, bool)> = Vec::with_capacity(64);
    for &root in roots.iter().rev() {
        stack.push((root, Affine3A::IDENTITY, false));
    }

    while let Some((handle, parent_world, parent_changed)) = stack.pop() {
        let Some(node) = nodes.get_mut(handle) else {
            continue;
        };

        let local_changed = node.transform.update_local_matrix();
        let world_changed = local_changed || parent_changed || !node.laid_out;
        if world_changed {
            let world = parent_world * *node.transform.local_matrix();
            node.transform.set_world_matrix(world);
        }
        node.laid_out = true;

        let world = node.transform.world_matrix;
        for &child in node.children.iter().rev() {
            stack.push((child, world, world_changed));
        }
    }
}

/// Marks a node and its descendants as not laid out.
pub fn invalidate_subtree(nodes: &mut SlotMap<NodeHandle, Node>, root: NodeHandle) {
    let mut stack = vec![root];
    while let Some(handle) = stack.pop() {
        if let Some(node) = nodes.get_mut(handle) {
            node.laid_out = false;
            stack.extend_from_slice(&node.children);
        }
    }
}
