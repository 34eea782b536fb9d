/// Attach/detach protocol and pointer handler registration.
pub mod attach;
/// Per-surface pointer dispatch tables.
pub mod binding;
