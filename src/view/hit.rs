use crate::foundation::core::Vector2;
use crate::foundation::error::{StrataError, StrataResult};
use crate::render::backend::Backend;
use crate::scene::graph::Scene;
use crate::scene::node::NodeId;
use crate::scene::transform::TransformProvider;
use crate::surface::binding::{EventKind, SurfaceId, Target};
use crate::view::frame::View;
use crate::view::order::order_by_stack;

/// Nodes whose handlers ran for one pointer event.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DispatchOutcome {
    /// Node hit by the `clickOver` pass.
    pub click_over: Option<NodeId>,
    /// Node hit by the `click` pass.
    pub click: Option<NodeId>,
}

impl DispatchOutcome {
    /// Whether any handler ran.
    pub fn any(&self) -> bool {
        self.click_over.is_some() || self.click.is_some()
    }
}

impl<B: Backend> View<B> {
    /// Deliver a pointer event: `clickOver` targets first, then `click` targets.
    ///
    /// Each pass fires at most one handler. Fails with [`StrataError::Unsupported`] when the
    /// view was built without click handling.
    pub fn dispatch_pointer(
        &self,
        scene: &mut Scene<B>,
        point: impl Into<Vector2>,
        event: &B::Event,
    ) -> StrataResult<DispatchOutcome> {
        let point = point.into();
        let click_over = self.handle_targets(scene, EventKind::ClickOver, point, event)?;
        let click = self.handle_targets(scene, EventKind::Click, point, event)?;
        Ok(DispatchOutcome { click_over, click })
    }

    /// Run the handler of the first `kind` target in draw order whose node intersects `point`.
    ///
    /// Targets whose handler cannot run (unregistered, or already running further up the call
    /// stack) are skipped. Returns the node whose handler ran, if any.
    pub fn handle_targets(
        &self,
        scene: &mut Scene<B>,
        kind: EventKind,
        point: Vector2,
        event: &B::Event,
    ) -> StrataResult<Option<NodeId>> {
        let targets = ordered_targets(scene, self.surface(), kind)?;
        for target in targets {
            let hit = scene
                .get(target.node)
                .is_some_and(|node| node.intersects(point));
            if !hit {
                continue;
            }
            if scene.invoke_handler(target.handler, target.node, point, event) {
                tracing::trace!(node = ?target.node, %kind, x = point.x, y = point.y, "pointer hit");
                return Ok(Some(target.node));
            }
            tracing::trace!(handler = ?target.handler, "handler unavailable, skipping");
        }
        Ok(None)
    }
}

/// Snapshot of the `kind` targets of `surface` in hit-test order, re-sorting them first if the
/// cached order went stale.
pub(crate) fn ordered_targets<B: Backend>(
    scene: &mut Scene<B>,
    surface: SurfaceId,
    kind: EventKind,
) -> StrataResult<Vec<Target>> {
    let binding = scene
        .surfaces
        .get(surface)
        .ok_or_else(|| StrataError::not_found(format!("surface {surface:?}")))?;
    binding.ensure_click_handling()?;

    if !binding.is_in_order(kind) {
        let keyed = binding
            .targets(kind)
            .iter()
            .map(|t| {
                let stack = scene.get(t.node).map_or(f64::NAN, |n| n.absolute_stack());
                (stack, *t)
            })
            .collect();
        let ordered = order_by_stack(keyed);
        if let Some(binding) = scene.surfaces.get_mut(surface) {
            let list = binding.list_mut(kind);
            list.entries = ordered;
            list.in_order = true;
        }
    }

    Ok(scene
        .surfaces
        .get(surface)
        .map(|b| b.targets(kind).to_vec())
        .unwrap_or_default())
}

#[cfg(test)]
#[path = "../../tests/unit/view/hit.rs"]
mod tests;
