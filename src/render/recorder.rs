use crate::foundation::core::Vector2;
use crate::foundation::error::{StrataError, StrataResult};
use crate::render::backend::Backend;

/// Straight (non-premultiplied) RGBA8 color.
pub type Rgba8 = [u8; 4];

/// One recorded drawing operation, in absolute surface coordinates.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawCommand {
    /// Axis-aligned rectangle rotated around its center.
    FillRect {
        /// Rectangle center.
        center: Vector2,
        /// Width in pixels.
        width: f64,
        /// Height in pixels.
        height: f64,
        /// Rotation in degrees, clockwise-positive.
        rotation_deg: f64,
        /// Fill color.
        color: Rgba8,
    },
    /// Straight stroked segment.
    StrokeLine {
        /// Segment start.
        from: Vector2,
        /// Segment end.
        to: Vector2,
        /// Stroke width in pixels.
        width: f64,
        /// Stroke color.
        color: Rgba8,
    },
    /// Stroked circle outline.
    StrokeCircle {
        /// Circle center.
        center: Vector2,
        /// Circle radius.
        radius: f64,
        /// Stroke color.
        color: Rgba8,
    },
    /// Stroked cubic Bezier curve.
    Bezier {
        /// Curve start.
        start: Vector2,
        /// First control point.
        c1: Vector2,
        /// Second control point.
        c2: Vector2,
        /// Curve end.
        end: Vector2,
        /// Stroke width in pixels.
        width: f64,
        /// Stroke color.
        color: Rgba8,
    },
}

/// In-memory drawing context for tests and debugging.
///
/// Holds the commands issued since the last [`Recorder::clear`], which views typically run as
/// their pre-draw hook so the recorder always contains exactly one frame.
#[derive(Debug, Default)]
pub struct Recorder {
    commands: Vec<DrawCommand>,
    clears: u64,
}

impl Recorder {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop all recorded commands.
    pub fn clear(&mut self) {
        self.commands.clear();
        self.clears += 1;
    }

    /// Record one command.
    pub fn push(&mut self, cmd: DrawCommand) {
        self.commands.push(cmd);
    }

    /// Commands recorded since the last clear, in issue order.
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// How many times [`Recorder::clear`] ran.
    pub fn clears(&self) -> u64 {
        self.clears
    }

    /// Serialize the recorded commands as pretty JSON.
    pub fn to_json(&self) -> StrataResult<String> {
        serde_json::to_string_pretty(&self.commands).map_err(|e| StrataError::serde(e.to_string()))
    }
}

/// Raw pointer event of the recording backend.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct PointerEvent {
    /// Pressed button (0 = primary).
    pub button: u8,
}

/// Headless backend pairing a [`Recorder`] with [`PointerEvent`]s.
#[derive(Clone, Copy, Debug, Default)]
pub struct RecordingBackend;

impl Backend for RecordingBackend {
    type Context = Recorder;
    type Event = PointerEvent;
}

#[cfg(test)]
#[path = "../../tests/unit/render/recorder.rs"]
mod tests;
