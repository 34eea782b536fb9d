use std::any::Any;

use slotmap::new_key_type;
use smallvec::SmallVec;

use crate::foundation::core::Vector2;
use crate::render::backend::Backend;
use crate::scene::graph::Scene;
use crate::scene::transform::{
    AbsoluteTransform, Identity, RelativeTransform, TransformProvider,
    absolute_position_with_parent, relative_position_from_parent,
};
use crate::surface::binding::{EventKind, SurfaceId};

new_key_type! {
    /// Handle to a node stored in a [`Scene`].
    pub struct NodeId;

    /// Handle to a registered pointer handler.
    pub struct HandlerId;
}

/// Draw, update and hit-test behavior of a node.
///
/// Every method has a no-op default, so a plain grouping node is just `impl Drawable<B> for T {}`.
pub trait Drawable<B: Backend>: Any {
    /// Draw the node into `ctx`. Absolute transforms are frozen while this runs.
    fn draw(&self, _ctx: &mut B::Context, _node: NodeRef<'_, B>) {}

    /// Advance the node's own state. Runs after the frame has been drawn.
    fn update(&mut self, _node: NodeMut<'_, B>) {}

    /// Whether `point` (surface coordinates) hits this node.
    fn intersects(&self, _node: NodeRef<'_, B>, _point: Vector2) -> bool {
        false
    }
}

/// Behavior-less node used to group and move children together.
#[derive(Clone, Copy, Debug, Default)]
pub struct Group;

impl<B: Backend> Drawable<B> for Group {}

/// What a node's transform is relative to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Parent {
    /// Orphan: positioned against [`Identity`].
    #[default]
    Identity,
    /// Child of another node.
    Node(NodeId),
}

/// A node ready to be inserted into a [`Scene`].
pub struct Node<B: Backend> {
    relative: RelativeTransform,
    behavior: Box<dyn Drawable<B>>,
}

impl<B: Backend> Node<B> {
    /// New node at the origin, unrotated, one stack level in front of its parent.
    pub fn new(behavior: impl Drawable<B>) -> Self {
        Self::boxed(Box::new(behavior))
    }

    /// Like [`Node::new`] for an already boxed behavior.
    pub fn boxed(behavior: Box<dyn Drawable<B>>) -> Self {
        Self {
            relative: RelativeTransform::default(),
            behavior,
        }
    }

    /// Set the position relative to the parent.
    pub fn at(mut self, position: impl Into<Vector2>) -> Self {
        self.relative.position = position.into();
        self
    }

    /// Set the rotation relative to the parent, in degrees.
    pub fn rotated(mut self, degrees: f64) -> Self {
        self.relative.rotation = degrees;
        self
    }

    /// Set the stack offset relative to the parent.
    pub fn stacked(mut self, stack: f64) -> Self {
        self.relative.stack = stack;
        self
    }

    pub(crate) fn into_data(self) -> NodeData<B> {
        NodeData {
            relative: self.relative,
            parent: Parent::Identity,
            children: Vec::new(),
            frozen: None,
            surfaces: SmallVec::new(),
            click_handlers: SmallVec::new(),
            click_over_handlers: SmallVec::new(),
            behavior: Some(self.behavior),
        }
    }
}

pub(crate) struct NodeData<B: Backend> {
    pub(crate) relative: RelativeTransform,
    pub(crate) parent: Parent,
    pub(crate) children: Vec<NodeId>,
    pub(crate) frozen: Option<AbsoluteTransform>,
    pub(crate) surfaces: SmallVec<[SurfaceId; 2]>,
    pub(crate) click_handlers: SmallVec<[HandlerId; 2]>,
    pub(crate) click_over_handlers: SmallVec<[HandlerId; 2]>,
    // `None` only while the behavior is lent out to its own `update`.
    pub(crate) behavior: Option<Box<dyn Drawable<B>>>,
}

impl<B: Backend> NodeData<B> {
    pub(crate) fn handlers(&self, kind: EventKind) -> &SmallVec<[HandlerId; 2]> {
        match kind {
            EventKind::Click => &self.click_handlers,
            EventKind::ClickOver => &self.click_over_handlers,
        }
    }

    pub(crate) fn handlers_mut(&mut self, kind: EventKind) -> &mut SmallVec<[HandlerId; 2]> {
        match kind {
            EventKind::Click => &mut self.click_handlers,
            EventKind::ClickOver => &mut self.click_over_handlers,
        }
    }

    pub(crate) fn has_handlers(&self) -> bool {
        !self.click_handlers.is_empty() || !self.click_over_handlers.is_empty()
    }

    pub(crate) fn all_handlers(&self) -> impl Iterator<Item = (EventKind, HandlerId)> + '_ {
        let clicks = self.click_handlers.iter().map(|&h| (EventKind::Click, h));
        let overs = self
            .click_over_handlers
            .iter()
            .map(|&h| (EventKind::ClickOver, h));
        overs.chain(clicks)
    }
}

/// Read-only view of one live node.
pub struct NodeRef<'a, B: Backend> {
    scene: &'a Scene<B>,
    id: NodeId,
    data: &'a NodeData<B>,
}

impl<B: Backend> Clone for NodeRef<'_, B> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<B: Backend> Copy for NodeRef<'_, B> {}

impl<'a, B: Backend> NodeRef<'a, B> {
    pub(crate) fn new(scene: &'a Scene<B>, id: NodeId, data: &'a NodeData<B>) -> Self {
        Self { scene, id, data }
    }

    /// This node's id.
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// The scene the node lives in.
    pub fn scene(&self) -> &'a Scene<B> {
        self.scene
    }

    /// Position relative to the parent.
    pub fn relative_position(&self) -> Vector2 {
        self.data.relative.position
    }

    /// Rotation relative to the parent, in degrees.
    pub fn relative_rotation(&self) -> f64 {
        self.data.relative.rotation
    }

    /// Stack offset relative to the parent.
    pub fn relative_stack(&self) -> f64 {
        self.data.relative.stack
    }

    /// The relative transform as one value.
    pub fn relative_transform(&self) -> RelativeTransform {
        self.data.relative
    }

    /// The parent reference.
    pub fn parent(&self) -> Parent {
        self.data.parent
    }

    /// Children in insertion order.
    pub fn children(&self) -> &'a [NodeId] {
        &self.data.children
    }

    /// Whether the absolute transform is currently frozen.
    pub fn is_frozen(&self) -> bool {
        self.data.frozen.is_some()
    }

    /// Surfaces this node is attached to.
    pub fn surfaces(&self) -> &'a [SurfaceId] {
        &self.data.surfaces
    }

    /// Handlers registered for `kind`, in registration order.
    pub fn handlers(&self, kind: EventKind) -> &'a [HandlerId] {
        self.data.handlers(kind)
    }

    /// The node's behavior, if it is a `T`.
    pub fn behavior<T: Drawable<B>>(&self) -> Option<&'a T> {
        let behavior: &dyn Any = self.data.behavior.as_deref()?;
        behavior.downcast_ref::<T>()
    }

    /// Hit-test `point` against this node's behavior.
    pub fn intersects(&self, point: Vector2) -> bool {
        self.data
            .behavior
            .as_deref()
            .is_some_and(|b| b.intersects(*self, point))
    }

    pub(crate) fn draw(&self, ctx: &mut B::Context) {
        if let Some(behavior) = self.data.behavior.as_deref() {
            behavior.draw(ctx, *self);
        }
    }

    fn parent_provider(&self) -> ParentProvider<'a, B> {
        match self.data.parent {
            Parent::Node(id) => self
                .scene
                .get(id)
                .map_or(ParentProvider::Identity(Identity), ParentProvider::Node),
            Parent::Identity => ParentProvider::Identity(Identity),
        }
    }

    pub(crate) fn compute_absolute(&self) -> AbsoluteTransform {
        let parent = self.parent_provider().absolute_transform();
        AbsoluteTransform {
            position: absolute_position_with_parent(self.data.relative.position, &parent),
            rotation: self.data.relative.rotation + parent.rotation,
            stack: self.data.relative.stack + parent.stack,
        }
    }
}

impl<B: Backend> TransformProvider for NodeRef<'_, B> {
    fn absolute_position(&self) -> Vector2 {
        match self.data.frozen {
            Some(frozen) => frozen.position,
            None => absolute_position_with_parent(
                self.data.relative.position,
                &self.parent_provider(),
            ),
        }
    }

    fn absolute_rotation(&self) -> f64 {
        match self.data.frozen {
            Some(frozen) => frozen.rotation,
            None => self.data.relative.rotation + self.parent_provider().absolute_rotation(),
        }
    }

    fn absolute_stack(&self) -> f64 {
        match self.data.frozen {
            Some(frozen) => frozen.stack,
            None => self.data.relative.stack + self.parent_provider().absolute_stack(),
        }
    }

    fn absolute_transform(&self) -> AbsoluteTransform {
        match self.data.frozen {
            Some(frozen) => frozen,
            None => self.compute_absolute(),
        }
    }
}

enum ParentProvider<'a, B: Backend> {
    Identity(Identity),
    Node(NodeRef<'a, B>),
}

impl<B: Backend> TransformProvider for ParentProvider<'_, B> {
    fn absolute_position(&self) -> Vector2 {
        match self {
            Self::Identity(p) => p.absolute_position(),
            Self::Node(p) => p.absolute_position(),
        }
    }

    fn absolute_rotation(&self) -> f64 {
        match self {
            Self::Identity(p) => p.absolute_rotation(),
            Self::Node(p) => p.absolute_rotation(),
        }
    }

    fn absolute_stack(&self) -> f64 {
        match self {
            Self::Identity(p) => p.absolute_stack(),
            Self::Node(p) => p.absolute_stack(),
        }
    }

    fn absolute_transform(&self) -> AbsoluteTransform {
        match self {
            Self::Identity(p) => p.absolute_transform(),
            Self::Node(p) => p.absolute_transform(),
        }
    }
}

/// Mutable access to one live node's transform.
///
/// Handed to [`Drawable::update`]; the node's behavior is lent out for the duration, so
/// [`NodeRef::behavior`] on the same node returns `None` until `update` returns.
pub struct NodeMut<'a, B: Backend> {
    scene: &'a mut Scene<B>,
    id: NodeId,
}

impl<'a, B: Backend> NodeMut<'a, B> {
    // Callers check that `id` is live; the exclusive borrow keeps it live.
    pub(crate) fn new(scene: &'a mut Scene<B>, id: NodeId) -> Self {
        Self { scene, id }
    }

    fn data(&self) -> &NodeData<B> {
        &self.scene.nodes[self.id]
    }

    fn data_mut(&mut self) -> &mut NodeData<B> {
        &mut self.scene.nodes[self.id]
    }

    /// This node's id.
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Read-only view of this node.
    pub fn as_node_ref(&self) -> NodeRef<'_, B> {
        NodeRef::new(self.scene, self.id, self.data())
    }

    /// Read-only access to the rest of the scene.
    pub fn scene(&self) -> &Scene<B> {
        self.scene
    }

    /// See [`TransformProvider::absolute_position`].
    pub fn absolute_position(&self) -> Vector2 {
        self.as_node_ref().absolute_position()
    }

    /// See [`TransformProvider::absolute_rotation`].
    pub fn absolute_rotation(&self) -> f64 {
        self.as_node_ref().absolute_rotation()
    }

    /// See [`TransformProvider::absolute_stack`].
    pub fn absolute_stack(&self) -> f64 {
        self.as_node_ref().absolute_stack()
    }

    /// Position relative to the parent.
    pub fn relative_position(&self) -> Vector2 {
        self.data().relative.position
    }

    /// Rotation relative to the parent, in degrees.
    pub fn relative_rotation(&self) -> f64 {
        self.data().relative.rotation
    }

    /// Stack offset relative to the parent.
    pub fn relative_stack(&self) -> f64 {
        self.data().relative.stack
    }

    /// Set the position relative to the parent.
    pub fn set_relative_position(&mut self, position: impl Into<Vector2>) -> &mut Self {
        self.data_mut().relative.position = position.into();
        self
    }

    /// Set the rotation relative to the parent.
    pub fn set_relative_rotation(&mut self, degrees: f64) -> &mut Self {
        self.data_mut().relative.rotation = degrees;
        self
    }

    /// Set the stack offset relative to the parent.
    pub fn set_relative_stack(&mut self, stack: f64) -> &mut Self {
        self.data_mut().relative.stack = stack;
        self
    }

    /// Place the node at an absolute position by solving for its relative position.
    pub fn set_absolute_position(&mut self, position: impl Into<Vector2>) -> &mut Self {
        let parent = self.as_node_ref().parent_provider().absolute_transform();
        let relative = relative_position_from_parent(position.into(), &parent);
        self.data_mut().relative.position = relative;
        self
    }

    /// Give the node an absolute rotation.
    pub fn set_absolute_rotation(&mut self, degrees: f64) -> &mut Self {
        let parent = self.as_node_ref().parent_provider().absolute_rotation();
        self.data_mut().relative.rotation = degrees - parent;
        self
    }

    /// Give the node an absolute stacking value.
    pub fn set_absolute_stack(&mut self, stack: f64) -> &mut Self {
        let parent = self.as_node_ref().parent_provider().absolute_stack();
        self.data_mut().relative.stack = stack - parent;
        self
    }

    /// Rotate around the node's own position.
    pub fn rotate(&mut self, degrees: f64) -> &mut Self {
        self.data_mut().relative.rotation += degrees;
        self
    }

    /// Rotate around `pivot`, given in the parent's frame.
    pub fn rotate_around_point(&mut self, pivot: impl Into<Vector2>, degrees: f64) -> &mut Self {
        // Position first: `rotate` must see the already moved position.
        let position = self.data().relative.position.rotate_around(pivot.into(), degrees);
        self.data_mut().relative.position = position;
        self.rotate(degrees)
    }

    /// Snapshot the absolute transform; reads stay constant until [`NodeMut::unfreeze`].
    pub fn freeze(&mut self) -> &mut Self {
        let snapshot = self.as_node_ref().compute_absolute();
        self.data_mut().frozen = Some(snapshot);
        self
    }

    /// Drop the snapshot taken by [`NodeMut::freeze`].
    pub fn unfreeze(&mut self) -> &mut Self {
        self.data_mut().frozen = None;
        self
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/node.rs"]
mod tests;
