use std::collections::HashSet;

use crate::foundation::core::{Fps, FrameIndex};
use crate::foundation::error::StrataResult;
use crate::render::backend::Backend;
use crate::scene::graph::Scene;
use crate::scene::node::NodeId;
use crate::surface::binding::SurfaceId;
use crate::view::order::{FrozenOrder, freeze_and_order};

/// Hook run once per frame right before the first draw call, typically to clear the context.
pub type BeforeDraw<C> = Box<dyn FnMut(&mut C)>;

/// Options for building a [`View`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ViewOpts {
    /// Rate the view is meant to be driven at.
    pub fps: Fps,
    /// Whether the view's surface accepts pointer handlers.
    pub click_handling: bool,
}

impl Default for ViewOpts {
    fn default() -> Self {
        Self {
            fps: Fps::default(),
            click_handling: false,
        }
    }
}

/// Counters of one [`View::run_frame`] call.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct FrameStats {
    /// Index of the frame that ran.
    pub frame: FrameIndex,
    /// Nodes drawn.
    pub drawn: usize,
    /// Nodes updated.
    pub updated: usize,
}

/// Consuming builder for [`View`].
pub struct ViewBuilder<B: Backend> {
    context: B::Context,
    opts: ViewOpts,
    before_draw: Option<BeforeDraw<B::Context>>,
}

impl<B: Backend> ViewBuilder<B> {
    /// Replace all options at once.
    pub fn opts(mut self, opts: ViewOpts) -> Self {
        self.opts = opts;
        self
    }

    /// Enable or disable pointer handling.
    pub fn click_handling(mut self, enabled: bool) -> Self {
        self.opts.click_handling = enabled;
        self
    }

    /// Set the frame rate.
    pub fn fps(mut self, fps: Fps) -> Self {
        self.opts.fps = fps;
        self
    }

    /// Set the pre-draw hook.
    pub fn before_draw(mut self, hook: impl FnMut(&mut B::Context) + 'static) -> Self {
        self.before_draw = Some(Box::new(hook));
        self
    }

    /// Register the view's surface with `scene` and run the first frame.
    pub fn build(self, scene: &mut Scene<B>) -> View<B> {
        let surface = scene.create_surface(self.opts.click_handling);
        let mut view = View {
            surface,
            roots: Vec::new(),
            context: self.context,
            before_draw: self.before_draw,
            opts: self.opts,
            frame: FrameIndex::default(),
        };
        view.run_frame(scene);
        view
    }
}

/// One drawing surface and the root nodes drawn on it.
///
/// The view does not own its roots; they live in the [`Scene`] and may be shared with other
/// views.
pub struct View<B: Backend> {
    surface: SurfaceId,
    roots: Vec<NodeId>,
    context: B::Context,
    before_draw: Option<BeforeDraw<B::Context>>,
    opts: ViewOpts,
    frame: FrameIndex,
}

impl<B: Backend> View<B> {
    /// Start building a view drawing into `context`.
    pub fn builder(context: B::Context) -> ViewBuilder<B> {
        ViewBuilder {
            context,
            opts: ViewOpts::default(),
            before_draw: None,
        }
    }

    /// The surface id shared by this view's nodes.
    pub fn surface(&self) -> SurfaceId {
        self.surface
    }

    /// Root nodes in the order they were added.
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// Options the view was built with.
    pub fn opts(&self) -> ViewOpts {
        self.opts
    }

    /// The drawing context.
    pub fn context(&self) -> &B::Context {
        &self.context
    }

    /// Mutable access to the drawing context.
    pub fn context_mut(&mut self) -> &mut B::Context {
        &mut self.context
    }

    /// Frames run so far, including the one run by [`ViewBuilder::build`].
    pub fn frames_run(&self) -> u64 {
        self.frame.0
    }

    /// Add root nodes and attach their subtrees to this view's surface.
    ///
    /// Roots are attached one by one; on error, the roots before the failing one stay attached.
    pub fn attach_root(&mut self, scene: &mut Scene<B>, nodes: &[NodeId]) -> StrataResult<()> {
        for &node in nodes {
            scene.attach_subtree(node, self.surface)?;
            self.roots.push(node);
        }
        Ok(())
    }

    /// Remove root nodes and detach their subtrees. Nodes that are not roots are ignored.
    pub fn detach_root(&mut self, scene: &mut Scene<B>, nodes: &[NodeId]) -> StrataResult<()> {
        for &node in nodes {
            let Some(idx) = self.roots.iter().position(|r| *r == node) else {
                continue;
            };
            self.roots.remove(idx);
            if scene.contains(node) {
                scene.detach_subtree(node, self.surface)?;
            }
        }
        Ok(())
    }

    /// Run one frame: build the draw order, run the pre-draw hook, draw, then update.
    ///
    /// Absolute transforms stay frozen through the draw pass. Updates run afterwards on the live
    /// tree, parents before children, so a node's update sees the moves its ancestors made this
    /// frame.
    #[tracing::instrument(skip(self, scene), fields(frame = self.frame.0))]
    pub fn run_frame(&mut self, scene: &mut Scene<B>) -> FrameStats {
        if let Some(binding) = scene.surfaces.get_mut(self.surface) {
            binding.invalidate_order();
        }
        self.roots.retain(|r| scene.contains(*r));

        let FrozenOrder { order, frozen } = freeze_and_order(scene, &self.roots);
        if let Some(hook) = self.before_draw.as_mut() {
            hook(&mut self.context);
        }
        let mut drawn = 0;
        for &id in &order {
            if let Some(node) = scene.get(id) {
                node.draw(&mut self.context);
                drawn += 1;
            }
        }
        scene.unfreeze_all(&frozen);

        let mut updated = 0;
        let mut visited = HashSet::new();
        let mut stack: Vec<NodeId> = self.roots.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            if !visited.insert(id) || !scene.update_node(id) {
                continue;
            }
            updated += 1;
            if let Some(node) = scene.get(id) {
                stack.extend(node.children().iter().rev().copied());
            }
        }

        let stats = FrameStats {
            frame: self.frame,
            drawn,
            updated,
        };
        self.frame = self.frame.next();
        tracing::trace!(drawn, updated, "frame done");
        stats
    }

    /// Detach every root, release the surface binding and hand back the drawing context.
    pub fn dispose(self, scene: &mut Scene<B>) -> B::Context {
        for &root in &self.roots {
            if scene.contains(root) {
                scene.detach_subtree_unchecked(root, self.surface);
            }
        }
        if let Err(err) = scene.release_surface(self.surface) {
            tracing::warn!(%err, "surface already released");
        }
        tracing::debug!(frames = self.frame.0, "view disposed");
        self.context
    }
}

#[cfg(test)]
#[path = "../../tests/unit/view/frame.rs"]
mod tests;
