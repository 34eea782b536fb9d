/// Backend contract: drawing context and raw pointer event types.
pub mod backend;
/// Headless drawing context that records draw commands.
pub mod recorder;
