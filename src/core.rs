use crate::error::{ChibiError, ChibiResult};

pub use kurbo::{Affine, BezPath, Point, Rect, Vec2};

/// Screen-space bounding box of the mounted rendering surface.
///
/// Re-measured by the host on every pointer notification so the avatar
/// tolerates layout and resize changes without a dedicated resize protocol.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SurfaceBounds {
    pub origin: Point,
    pub width: f64,
    pub height: f64,
}

impl SurfaceBounds {
    pub fn new(origin: Point, width: f64, height: f64) -> ChibiResult<Self> {
        if !(width.is_finite() && height.is_finite()) || width <= 0.0 || height <= 0.0 {
            return Err(ChibiError::validation(
                "SurfaceBounds width/height must be finite and > 0",
            ));
        }
        Ok(Self {
            origin,
            width,
            height,
        })
    }

    pub fn center(self) -> Point {
        Point::new(
            self.origin.x + self.width / 2.0,
            self.origin.y + self.height / 2.0,
        )
    }
}

/// One pointer-move notification in absolute screen coordinates.
///
/// `movement` is the raw per-event delta since the previous sample (the
/// host's native movement values), not a derived velocity.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PointerSample {
    pub position: Point,
    pub movement: Vec2,
}

impl PointerSample {
    pub fn at(position: Point) -> Self {
        Self {
            position,
            movement: Vec2::ZERO,
        }
    }

    pub fn movement_magnitude(self) -> f64 {
        self.movement.hypot()
    }
}

/// What the host resolved a pointer-enter/leave target (or an ancestor of
/// it) to. Links, buttons and explicitly marked magnetic anchors count as
/// interactive; everything else does not.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HoverTarget {
    Link,
    Button,
    MagneticAnchor,
    Plain,
}

impl HoverTarget {
    pub fn is_interactive(self) -> bool {
        !matches!(self, Self::Plain)
    }
}

/// Host-signalled motion preference. `Reduced` skips the entrance and all
/// pointer-driven choreography and presents the resting avatar immediately.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MotionPreference {
    Full,
    Reduced,
}

/// Raster target dimensions in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    pub width: u32,
    pub height: u32,
}

/// Straight (non-premultiplied) RGBA8 fill color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }
}
