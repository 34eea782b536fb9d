/// Binds the scene graph to a concrete rendering and input stack.
///
/// The engine never inspects either type: `Context` is forwarded unmodified into every
/// [`Drawable::draw`](crate::Drawable::draw) call, and `Event` is forwarded into pointer handlers.
pub trait Backend: 'static {
    /// Drawing surface handle (a canvas context, a command recorder, ...).
    type Context;
    /// Raw pointer event delivered alongside the resolved point.
    type Event;
}
