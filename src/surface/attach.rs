use crate::foundation::core::Vector2;
use crate::foundation::error::{StrataError, StrataResult};
use crate::render::backend::Backend;
use crate::scene::graph::{HandlerEntry, Scene};
use crate::scene::node::{HandlerId, NodeId};
use crate::surface::binding::{EventKind, SurfaceBinding, SurfaceId, Target};

impl<B: Backend> Scene<B> {
    /// Register a new surface binding.
    pub fn create_surface(&mut self, click_handling: bool) -> SurfaceId {
        let id = self.surfaces.insert(SurfaceBinding::new(click_handling));
        tracing::debug!(surface = ?id, click_handling, "created surface");
        id
    }

    /// Drop a surface binding and strip it from every node attached to it.
    pub fn release_surface(&mut self, surface: SurfaceId) -> StrataResult<()> {
        if self.surfaces.remove(surface).is_none() {
            return Err(StrataError::not_found(format!("surface {surface:?}")));
        }
        for (_, data) in self.nodes.iter_mut() {
            data.surfaces.retain(|s| *s != surface);
        }
        tracing::debug!(?surface, "released surface");
        Ok(())
    }

    /// The binding of a live surface.
    pub fn surface(&self, surface: SurfaceId) -> Option<&SurfaceBinding> {
        self.surfaces.get(surface)
    }

    fn binding(&self, surface: SurfaceId) -> StrataResult<&SurfaceBinding> {
        self.surfaces
            .get(surface)
            .ok_or_else(|| StrataError::not_found(format!("surface {surface:?}")))
    }

    /// Whether `node` is attached to `surface`.
    pub fn is_attached(&self, node: NodeId, surface: SurfaceId) -> bool {
        self.nodes
            .get(node)
            .is_some_and(|d| d.surfaces.contains(&surface))
    }

    /// Attach a single node to `surface`, registering its handlers with the surface.
    ///
    /// Attaching twice is an error; so is attaching a node with handlers to a surface built
    /// without click handling.
    pub fn attach(&mut self, node: NodeId, surface: SurfaceId) -> StrataResult<()> {
        self.ensure_live(node)?;
        self.binding(surface)?;
        if self.is_attached(node, surface) {
            return Err(StrataError::structure(format!(
                "{node:?} is already attached to {surface:?}"
            )));
        }
        self.attach_one(node, surface)
    }

    /// Detach a single node from `surface`. Detaching a node that is not attached does nothing.
    pub fn detach(&mut self, node: NodeId, surface: SurfaceId) -> StrataResult<()> {
        self.ensure_live(node)?;
        self.binding(surface)?;
        self.detach_unchecked(node, surface);
        Ok(())
    }

    /// Attach `root` and all its descendants to `surface`.
    ///
    /// Nothing is attached unless every node can be.
    pub fn attach_subtree(&mut self, root: NodeId, surface: SurfaceId) -> StrataResult<()> {
        self.ensure_live(root)?;
        self.check_attach_subtree(root, surface, false)?;
        self.attach_checked_subtree(root, surface, false)
    }

    /// Detach `root` and all its descendants from `surface`.
    pub fn detach_subtree(&mut self, root: NodeId, surface: SurfaceId) -> StrataResult<()> {
        self.ensure_live(root)?;
        self.binding(surface)?;
        self.detach_subtree_unchecked(root, surface);
        Ok(())
    }

    /// Validate an attach of the subtree of `root`. With `skip_attached`, nodes already on the
    /// surface are left alone instead of failing.
    pub(crate) fn check_attach_subtree(
        &self,
        root: NodeId,
        surface: SurfaceId,
        skip_attached: bool,
    ) -> StrataResult<()> {
        let binding = self.binding(surface)?;
        for id in self.subtree(root) {
            let data = &self.nodes[id];
            if data.surfaces.contains(&surface) {
                if skip_attached {
                    continue;
                }
                return Err(StrataError::structure(format!(
                    "{id:?} is already attached to {surface:?}"
                )));
            }
            if data.has_handlers() {
                binding.ensure_click_handling()?;
            }
        }
        Ok(())
    }

    /// Attach a subtree that passed [`Scene::check_attach_subtree`].
    pub(crate) fn attach_checked_subtree(
        &mut self,
        root: NodeId,
        surface: SurfaceId,
        skip_attached: bool,
    ) -> StrataResult<()> {
        for id in self.subtree(root) {
            if skip_attached && self.is_attached(id, surface) {
                continue;
            }
            self.attach_one(id, surface)?;
        }
        Ok(())
    }

    pub(crate) fn detach_subtree_unchecked(&mut self, root: NodeId, surface: SurfaceId) {
        for id in self.subtree(root) {
            self.detach_unchecked(id, surface);
        }
    }

    fn attach_one(&mut self, node: NodeId, surface: SurfaceId) -> StrataResult<()> {
        let binding = self
            .surfaces
            .get_mut(surface)
            .ok_or_else(|| StrataError::not_found(format!("surface {surface:?}")))?;
        let data = &mut self.nodes[node];
        if data.has_handlers() {
            binding.ensure_click_handling()?;
        }
        for (kind, handler) in data.all_handlers() {
            binding.list_mut(kind).push(Target { node, handler });
        }
        data.surfaces.push(surface);
        tracing::debug!(?node, ?surface, "attached");
        Ok(())
    }

    fn detach_unchecked(&mut self, node: NodeId, surface: SurfaceId) {
        let Some(data) = self.nodes.get_mut(node) else {
            return;
        };
        let before = data.surfaces.len();
        data.surfaces.retain(|s| *s != surface);
        if data.surfaces.len() == before {
            return;
        }
        if let Some(binding) = self.surfaces.get_mut(surface) {
            binding.forget_node(node);
        }
        tracing::debug!(?node, ?surface, "detached");
    }

    /// Register a pointer handler of `kind` on `node`.
    ///
    /// The handler is also registered with every surface the node is attached to, which fails
    /// if any of them was built without click handling.
    pub fn on<F>(&mut self, kind: EventKind, node: NodeId, handler: F) -> StrataResult<HandlerId>
    where
        F: FnMut(&mut Scene<B>, NodeId, Vector2, &B::Event) + 'static,
    {
        self.ensure_live(node)?;
        for surface in self.nodes[node].surfaces.iter() {
            self.binding(*surface)?.ensure_click_handling()?;
        }

        let id = self.handlers.insert(HandlerEntry {
            node,
            kind,
            callback: Some(Box::new(handler)),
        });
        let data = &mut self.nodes[node];
        data.handlers_mut(kind).push(id);
        for surface in data.surfaces.iter() {
            if let Some(binding) = self.surfaces.get_mut(*surface) {
                binding.on(kind, Target { node, handler: id })?;
            }
        }
        Ok(id)
    }

    /// [`Scene::on`] with [`EventKind::Click`].
    pub fn on_click<F>(&mut self, node: NodeId, handler: F) -> StrataResult<HandlerId>
    where
        F: FnMut(&mut Scene<B>, NodeId, Vector2, &B::Event) + 'static,
    {
        self.on(EventKind::Click, node, handler)
    }

    /// [`Scene::on`] with [`EventKind::ClickOver`].
    pub fn on_click_over<F>(&mut self, node: NodeId, handler: F) -> StrataResult<HandlerId>
    where
        F: FnMut(&mut Scene<B>, NodeId, Vector2, &B::Event) + 'static,
    {
        self.on(EventKind::ClickOver, node, handler)
    }

    /// [`Scene::on`] with the event kind given by name (`"click"` or `"clickOver"`).
    pub fn on_named<F>(&mut self, event: &str, node: NodeId, handler: F) -> StrataResult<HandlerId>
    where
        F: FnMut(&mut Scene<B>, NodeId, Vector2, &B::Event) + 'static,
    {
        let kind: EventKind = event.parse()?;
        self.on(kind, node, handler)
    }

    /// Unregister a handler from its node and from every surface.
    pub fn off(&mut self, handler: HandlerId) -> StrataResult<()> {
        let entry = self
            .handlers
            .remove(handler)
            .ok_or_else(|| StrataError::not_found(format!("handler {handler:?}")))?;
        let Some(data) = self.nodes.get_mut(entry.node) else {
            return Ok(());
        };
        data.handlers_mut(entry.kind).retain(|h| *h != handler);
        for surface in data.surfaces.iter() {
            if let Some(binding) = self.surfaces.get_mut(*surface) {
                binding.off(entry.kind, handler)?;
            }
        }
        Ok(())
    }

    /// Number of registered handlers.
    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/surface/attach.rs"]
mod tests;
