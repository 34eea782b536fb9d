/// Node arena and structural operations.
pub mod graph;
/// Node handles and the [`Drawable`](crate::Drawable) contract.
pub mod node;
/// Parent-relative transform algebra.
pub mod transform;
