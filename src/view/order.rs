use std::collections::HashSet;

use crate::render::backend::Backend;
use crate::scene::graph::Scene;
use crate::scene::node::NodeId;
use crate::scene::transform::TransformProvider;

/// Stable ascending sort on stack values.
///
/// Equal values keep their input order; `-0.0` equals `0.0`; NaN sorts last.
pub(crate) fn order_by_stack<T>(mut keyed: Vec<(f64, T)>) -> Vec<T> {
    keyed.sort_by(|a, b| stack_key(a.0).total_cmp(&stack_key(b.0)));
    keyed.into_iter().map(|(_, item)| item).collect()
}

fn stack_key(stack: f64) -> f64 {
    if stack.is_nan() {
        f64::NAN.abs()
    } else {
        stack + 0.0
    }
}

/// Frozen draw order of the subtrees under `roots`.
///
/// `order` is the draw order; `frozen` lists every node frozen on the way, for the caller to
/// unfreeze.
pub(crate) struct FrozenOrder {
    pub(crate) order: Vec<NodeId>,
    pub(crate) frozen: Vec<NodeId>,
}

/// Freeze every subtree under `roots` and sort the nodes by absolute stack value.
///
/// Nodes are collected root by root in depth-first pre-order, which is the tie-break for equal
/// stack values. Stale roots are skipped and a node reachable from two roots is listed once.
pub(crate) fn freeze_and_order<B: Backend>(scene: &mut Scene<B>, roots: &[NodeId]) -> FrozenOrder {
    let mut seen = HashSet::new();
    let mut frozen = Vec::new();
    for &root in roots {
        if seen.contains(&root) {
            continue;
        }
        for id in scene.freeze_subtree(root) {
            if seen.insert(id) {
                frozen.push(id);
            }
        }
    }

    let keyed = frozen
        .iter()
        .filter_map(|&id| scene.get(id).map(|n| (n.absolute_stack(), id)))
        .collect();
    FrozenOrder {
        order: order_by_stack(keyed),
        frozen,
    }
}

/// Draw order of the subtrees under `roots`: ascending absolute stack value, ties in
/// depth-first insertion order.
///
/// Transforms are frozen while the order is built and unfrozen before returning.
#[tracing::instrument(skip(scene, roots), fields(roots = roots.len()))]
pub fn build_ordered_draw_list<B: Backend>(scene: &mut Scene<B>, roots: &[NodeId]) -> Vec<NodeId> {
    let FrozenOrder { order, frozen } = freeze_and_order(scene, roots);
    scene.unfreeze_all(&frozen);
    order
}

#[cfg(test)]
#[path = "../../tests/unit/view/order.rs"]
mod tests;
