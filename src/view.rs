/// Fixed-rate frame scheduling.
pub mod driver;
/// The view and its frame loop.
pub mod frame;
/// Pointer hit-testing.
pub mod hit;
/// Draw order construction.
pub mod order;
