use std::fmt;

use slotmap::SlotMap;
use smallvec::SmallVec;

use crate::foundation::core::Vector2;
use crate::foundation::error::{StrataError, StrataResult};
use crate::render::backend::Backend;
use crate::scene::node::{Drawable, HandlerId, Node, NodeData, NodeId, NodeMut, NodeRef, Parent};
use crate::surface::binding::{EventKind, SurfaceBinding, SurfaceId};

/// Callback run when a pointer event hits a node.
///
/// Receives the scene (free to mutate), the node that was hit, the event point and the raw event.
pub type PointerHandler<B> = Box<dyn FnMut(&mut Scene<B>, NodeId, Vector2, &<B as Backend>::Event)>;

pub(crate) struct HandlerEntry<B: Backend> {
    pub(crate) node: NodeId,
    pub(crate) kind: EventKind,
    // `None` only while the handler runs.
    pub(crate) callback: Option<PointerHandler<B>>,
}

/// Arena owning every node, pointer handler and surface binding.
///
/// Nodes reference their parent and children by [`NodeId`]; the arena is the only owner, so
/// the tree shape is checked here (no cycles, one parent per node) rather than assumed.
pub struct Scene<B: Backend> {
    pub(crate) nodes: SlotMap<NodeId, NodeData<B>>,
    pub(crate) handlers: SlotMap<HandlerId, HandlerEntry<B>>,
    pub(crate) surfaces: SlotMap<SurfaceId, SurfaceBinding>,
}

impl<B: Backend> fmt::Debug for Scene<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scene")
            .field("nodes", &self.nodes.len())
            .field("handlers", &self.handlers.len())
            .field("surfaces", &self.surfaces.len())
            .finish()
    }
}

impl<B: Backend> Default for Scene<B> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: Backend> Scene<B> {
    /// Create an empty scene.
    pub fn new() -> Self {
        Self {
            nodes: SlotMap::with_key(),
            handlers: SlotMap::with_key(),
            surfaces: SlotMap::with_key(),
        }
    }

    /// Insert an orphan node.
    pub fn insert(&mut self, node: Node<B>) -> NodeId {
        self.nodes.insert(node.into_data())
    }

    /// Shorthand for inserting `behavior` at `position` with default rotation and stack offset.
    pub fn spawn(&mut self, behavior: impl Drawable<B>, position: impl Into<Vector2>) -> NodeId {
        self.insert(Node::new(behavior).at(position))
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the scene has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Whether `id` refers to a live node.
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Read access to a node.
    pub fn get(&self, id: NodeId) -> Option<NodeRef<'_, B>> {
        let data = self.nodes.get(id)?;
        Some(NodeRef::new(self, id, data))
    }

    /// Write access to a node's transform.
    pub fn get_mut(&mut self, id: NodeId) -> Option<NodeMut<'_, B>> {
        if !self.nodes.contains_key(id) {
            return None;
        }
        Some(NodeMut::new(self, id))
    }

    /// Like [`Scene::get`], failing with [`StrataError::NotFound`].
    pub fn node(&self, id: NodeId) -> StrataResult<NodeRef<'_, B>> {
        self.get(id)
            .ok_or_else(|| StrataError::not_found(format!("node {id:?}")))
    }

    /// Like [`Scene::get_mut`], failing with [`StrataError::NotFound`].
    pub fn node_mut(&mut self, id: NodeId) -> StrataResult<NodeMut<'_, B>> {
        self.ensure_live(id)?;
        Ok(NodeMut::new(self, id))
    }

    /// The behavior of `id`, if it is a `T`.
    pub fn behavior<T: Drawable<B>>(&self, id: NodeId) -> Option<&T> {
        self.get(id)?.behavior::<T>()
    }

    /// Mutable access to the behavior of `id`, if it is a `T`.
    pub fn behavior_mut<T: Drawable<B>>(&mut self, id: NodeId) -> Option<&mut T> {
        let behavior: &mut dyn std::any::Any = self.nodes.get_mut(id)?.behavior.as_deref_mut()?;
        behavior.downcast_mut::<T>()
    }

    /// Make `child` the last child of `parent`.
    ///
    /// A child that already has a parent is moved: it leaves the old parent's children and the
    /// surfaces it inherited from it. The child's subtree then joins every surface `parent` is
    /// attached to. Fails when the move would create a cycle, or when `child` is attached to one
    /// of `parent`'s surfaces on its own (for example as a view root).
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) -> StrataResult<()> {
        self.ensure_live(parent)?;
        self.ensure_live(child)?;
        if parent == child {
            return Err(StrataError::structure("a node cannot be its own child"));
        }
        if self.is_ancestor(child, parent) {
            return Err(StrataError::structure(format!(
                "adding {child:?} under {parent:?} would create a cycle"
            )));
        }

        let old_parent = self.nodes[child].parent;
        if old_parent == Parent::Node(parent) {
            return Ok(());
        }

        let gained: SmallVec<[SurfaceId; 2]> = self.nodes[parent].surfaces.clone();
        let inherited: SmallVec<[SurfaceId; 2]> = match old_parent {
            Parent::Node(old) => self.nodes[old].surfaces.clone(),
            Parent::Identity => SmallVec::new(),
        };
        for &surface in &gained {
            if self.nodes[child].surfaces.contains(&surface) && !inherited.contains(&surface) {
                return Err(StrataError::structure(format!(
                    "{child:?} is already attached to {surface:?}"
                )));
            }
            self.check_attach_subtree(child, surface, true)?;
        }

        if let Parent::Node(old) = old_parent {
            self.unlink(old, child);
            tracing::debug!(?child, from = ?old, to = ?parent, "reparent node");
        }

        self.nodes[child].parent = Parent::Node(parent);
        self.nodes[parent].children.push(child);
        for surface in gained {
            self.attach_checked_subtree(child, surface, true)?;
        }
        Ok(())
    }

    /// [`Scene::add_child`] for several children, in order.
    pub fn add_children(&mut self, parent: NodeId, children: &[NodeId]) -> StrataResult<()> {
        for &child in children {
            self.add_child(parent, child)?;
        }
        Ok(())
    }

    /// Turn `child` back into an orphan.
    ///
    /// The child's subtree leaves the surfaces it inherited from `parent`.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> StrataResult<()> {
        self.ensure_live(parent)?;
        self.ensure_live(child)?;
        if self.nodes[child].parent != Parent::Node(parent) {
            return Err(StrataError::structure(format!(
                "{child:?} is not a child of {parent:?}"
            )));
        }
        self.unlink(parent, child);
        Ok(())
    }

    fn unlink(&mut self, parent: NodeId, child: NodeId) {
        self.nodes[parent].children.retain(|c| *c != child);
        self.nodes[child].parent = Parent::Identity;
        let inherited: SmallVec<[SurfaceId; 2]> = self.nodes[parent].surfaces.clone();
        for surface in inherited {
            self.detach_subtree_unchecked(child, surface);
        }
    }

    /// Remove `id` and all its descendants from the scene.
    ///
    /// The subtree is detached from its parent and from every surface, and its handlers are
    /// dropped. Stale ids held elsewhere (view roots, targets) are skipped from then on.
    pub fn despawn(&mut self, id: NodeId) -> StrataResult<()> {
        self.ensure_live(id)?;
        if let Parent::Node(parent) = self.nodes[id].parent {
            self.nodes[parent].children.retain(|c| *c != id);
        }
        let ids = self.subtree(id);
        for nid in ids {
            let Some(data) = self.nodes.remove(nid) else {
                continue;
            };
            for surface in &data.surfaces {
                if let Some(binding) = self.surfaces.get_mut(*surface) {
                    binding.forget_node(nid);
                }
            }
            for (_, handler) in data.all_handlers() {
                self.handlers.remove(handler);
            }
        }
        tracing::debug!(?id, "despawned subtree");
        Ok(())
    }

    /// `root` followed by all its descendants, depth first, children in insertion order.
    ///
    /// Empty when `root` is not live.
    pub fn subtree(&self, root: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        if !self.nodes.contains_key(root) {
            return out;
        }
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            out.push(id);
            if let Some(data) = self.nodes.get(id) {
                stack.extend(data.children.iter().rev().copied());
            }
        }
        out
    }

    /// Whether `ancestor` appears on the parent chain of `node` (or is `node` itself).
    pub fn is_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut cursor = Some(node);
        while let Some(id) = cursor {
            if id == ancestor {
                return true;
            }
            cursor = match self.nodes.get(id).map(|d| d.parent) {
                Some(Parent::Node(parent)) => Some(parent),
                _ => None,
            };
        }
        false
    }

    /// Freeze `root` and its descendants top-down, so every snapshot reads an already frozen
    /// parent. Returns the frozen ids in traversal order.
    pub(crate) fn freeze_subtree(&mut self, root: NodeId) -> Vec<NodeId> {
        let ids = self.subtree(root);
        for &id in &ids {
            let snapshot = self.get(id).map(|n| n.compute_absolute());
            if let Some(data) = self.nodes.get_mut(id) {
                data.frozen = snapshot;
            }
        }
        ids
    }

    pub(crate) fn unfreeze_all(&mut self, ids: &[NodeId]) {
        for &id in ids {
            if let Some(data) = self.nodes.get_mut(id) {
                data.frozen = None;
            }
        }
    }

    /// Run the behavior's `update`. Returns `false` for stale ids.
    pub(crate) fn update_node(&mut self, id: NodeId) -> bool {
        let Some(mut behavior) = self.nodes.get_mut(id).and_then(|n| n.behavior.take()) else {
            return false;
        };
        behavior.update(NodeMut::new(self, id));
        if let Some(data) = self.nodes.get_mut(id) {
            data.behavior = Some(behavior);
        }
        true
    }

    /// Run a pointer handler. Returns `false` for stale or currently running handlers.
    pub(crate) fn invoke_handler(
        &mut self,
        handler: HandlerId,
        node: NodeId,
        point: Vector2,
        event: &B::Event,
    ) -> bool {
        let Some(mut callback) = self.handlers.get_mut(handler).and_then(|h| h.callback.take())
        else {
            return false;
        };
        callback(self, node, point, event);
        if let Some(entry) = self.handlers.get_mut(handler) {
            entry.callback = Some(callback);
        }
        true
    }

    pub(crate) fn ensure_live(&self, id: NodeId) -> StrataResult<()> {
        if self.nodes.contains_key(id) {
            Ok(())
        } else {
            Err(StrataError::not_found(format!("node {id:?}")))
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/graph.rs"]
mod tests;
