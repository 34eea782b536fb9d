use crate::foundation::core::Vector2;

/// Anything a node can be positioned against.
///
/// Implemented by [`Identity`] (the parent of every orphan), by frozen snapshots, and by
/// [`NodeRef`](crate::NodeRef).
pub trait TransformProvider {
    /// Position in surface coordinates.
    fn absolute_position(&self) -> Vector2;
    /// Rotation in degrees, clockwise-positive.
    fn absolute_rotation(&self) -> f64;
    /// Stacking value; higher draws later.
    fn absolute_stack(&self) -> f64;

    /// All three absolute values at once.
    fn absolute_transform(&self) -> AbsoluteTransform {
        AbsoluteTransform {
            position: self.absolute_position(),
            rotation: self.absolute_rotation(),
            stack: self.absolute_stack(),
        }
    }
}

/// The synthetic parent at the origin, unrotated, at stack 0.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Identity;

impl TransformProvider for Identity {
    fn absolute_position(&self) -> Vector2 {
        Vector2::ZERO
    }

    fn absolute_rotation(&self) -> f64 {
        0.0
    }

    fn absolute_stack(&self) -> f64 {
        0.0
    }
}

/// Resolved absolute transform; also the frozen snapshot kept during a frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize)]
pub struct AbsoluteTransform {
    /// Absolute position.
    pub position: Vector2,
    /// Absolute rotation in degrees.
    pub rotation: f64,
    /// Absolute stacking value.
    pub stack: f64,
}

impl TransformProvider for AbsoluteTransform {
    fn absolute_position(&self) -> Vector2 {
        self.position
    }

    fn absolute_rotation(&self) -> f64 {
        self.rotation
    }

    fn absolute_stack(&self) -> f64 {
        self.stack
    }

    fn absolute_transform(&self) -> AbsoluteTransform {
        *self
    }
}

/// Transform of a node relative to its parent.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct RelativeTransform {
    /// Offset in the parent's unrotated frame.
    pub position: Vector2,
    /// Rotation added to the parent's, in degrees.
    pub rotation: f64,
    /// Stack offset added to the parent's.
    pub stack: f64,
}

impl Default for RelativeTransform {
    fn default() -> Self {
        Self {
            position: Vector2::ZERO,
            rotation: 0.0,
            // in front of the parent
            stack: 1.0,
        }
    }
}

/// Absolute position of a point given relative to `parent`.
///
/// The offset is added first and rotated second, so it is read in the parent's unrotated frame.
pub fn absolute_position_with_parent<P>(relative: Vector2, parent: &P) -> Vector2
where
    P: TransformProvider + ?Sized,
{
    let origin = parent.absolute_position();
    relative
        .add(origin)
        .rotate_around(origin, parent.absolute_rotation())
}

/// Inverse of [`absolute_position_with_parent`].
pub fn relative_position_from_parent<P>(point: Vector2, parent: &P) -> Vector2
where
    P: TransformProvider + ?Sized,
{
    let origin = parent.absolute_position();
    point
        .rotate_around(origin, -parent.absolute_rotation())
        .sub(origin)
}

#[cfg(test)]
#[path = "../../tests/unit/scene/transform.rs"]
mod tests;
