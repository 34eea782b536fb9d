//! Strata is a minimal 2D scene-graph engine.
//!
//! Nodes live in a [`Scene`] arena and carry a transform relative to their parent (position,
//! rotation in degrees, stack offset). A [`View`] draws the subtrees attached to its surface once
//! per frame in stacking order and then lets every node update itself. Pointer events resolve
//! against the same order:
//!
//! - Insert nodes with [`Scene::insert`] and link them with [`Scene::add_child`]
//! - Build a [`View`] over a [`Backend`] drawing context and attach roots
//! - Drive it with [`View::run_frame`] or a [`FrameDriver`], and feed pointer input to
//!   [`View::dispatch_pointer`]
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

/// Rendering backend contract and the headless recorder.
pub mod render;
/// Node arena, node handles and transforms.
pub mod scene;
/// Surface bindings and pointer handler registration.
pub mod surface;
/// Views, draw order, hit-testing and frame driving.
pub mod view;

pub use crate::foundation::core::{Fps, FrameIndex, Point, Vec2, Vector2};
pub use crate::foundation::error::{StrataError, StrataResult};

pub use crate::render::backend::Backend;
pub use crate::render::recorder::{DrawCommand, PointerEvent, Recorder, RecordingBackend, Rgba8};
pub use crate::scene::graph::{PointerHandler, Scene};
pub use crate::scene::node::{Drawable, Group, HandlerId, Node, NodeId, NodeMut, NodeRef, Parent};
pub use crate::scene::transform::{
    AbsoluteTransform, Identity, RelativeTransform, TransformProvider,
    absolute_position_with_parent, relative_position_from_parent,
};
pub use crate::surface::binding::{EventKind, SurfaceBinding, SurfaceId, Target};
pub use crate::view::driver::{DriverOpts, FrameDriver, ShutdownHandle, TickPolicy};
pub use crate::view::frame::{BeforeDraw, FrameStats, View, ViewBuilder, ViewOpts};
pub use crate::view::hit::DispatchOutcome;
pub use crate::view::order::build_ordered_draw_list;
