use crate::{
    anim::Tween,
    anim_ease::Ease,
    core::{Point, PointerSample, SurfaceBounds, Vec2},
};

/// Distance at which pointer intensity saturates to magnitude 1.
pub const MAX_POINTER_RANGE: f64 = 400.0;

/// Per-event movement magnitude above which the dizzy interruption fires.
pub const ABRUPT_MOVEMENT_THRESHOLD: f64 = 500.0;

/// Every retarget tweens from the current value over this long, uniformly
/// for all layers so relative depth ordering is preserved.
pub const RETARGET_DURATION: f64 = 0.3;

const RETARGET_EASE: Ease = Ease::OutQuad;

/// Normalized directional intensity of `pointer` relative to `center`.
///
/// The magnitude is always in `[0, 1]`: the distance is floored at 1 to
/// avoid division by zero, and falloff saturates at `max_range`. The result
/// is exactly zero when the pointer coincides with the center.
pub fn directional_intensity(pointer: Point, center: Point, max_range: f64) -> Vec2 {
    let delta = pointer - center;
    let distance = delta.hypot().max(1.0);
    let falloff = (distance / max_range).min(1.0);
    let direction = delta / distance;
    direction * falloff
}

/// Raised by [`ParallaxEngine::on_pointer_sample`] when a sample warrants a
/// reaction beyond ordinary tracking.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ParallaxSignal {
    AbruptMovement { magnitude: f64 },
}

/// Maps pointer samples to a single eased [`Vec2`] intensity shared by all
/// layers; each layer renders at `intensity * depth`.
#[derive(Clone, Debug)]
pub struct ParallaxEngine {
    max_range: f64,
    tween: Tween<Vec2>,
    clock: f64,
    frozen: bool,
}

impl ParallaxEngine {
    pub fn new() -> Self {
        Self::with_max_range(MAX_POINTER_RANGE)
    }

    pub fn with_max_range(max_range: f64) -> Self {
        Self {
            max_range: max_range.max(1.0),
            tween: Tween::idle(Vec2::ZERO),
            clock: 0.0,
            frozen: false,
        }
    }

    pub fn tick(&mut self, dt: f64) {
        self.clock += dt.max(0.0);
    }

    /// Feeds one pointer-move notification. The surface center is
    /// re-measured from `bounds` on every call so layout changes are
    /// tolerated. While frozen, samples are ignored entirely and the
    /// pre-trigger intensity holds.
    ///
    /// An abrupt sample (movement magnitude above the threshold) is
    /// reported without being applied, so tracking freezes at the value it
    /// had before the jump.
    pub fn on_pointer_sample(
        &mut self,
        sample: &PointerSample,
        bounds: SurfaceBounds,
    ) -> Option<ParallaxSignal> {
        if self.frozen {
            return None;
        }

        let magnitude = sample.movement_magnitude();
        if magnitude > ABRUPT_MOVEMENT_THRESHOLD {
            tracing::debug!(magnitude, "abrupt pointer movement");
            return Some(ParallaxSignal::AbruptMovement { magnitude });
        }

        let target = directional_intensity(sample.position, bounds.center(), self.max_range);
        self.tween
            .retarget(self.clock, target, RETARGET_DURATION, RETARGET_EASE);
        None
    }

    /// Current (eased) intensity. Zero until the first sample arrives.
    pub fn intensity(&self) -> Vec2 {
        self.tween.sample(self.clock)
    }

    /// The value tracking is converging toward.
    pub fn target(&self) -> Vec2 {
        *self.tween.target()
    }

    pub fn layer_offset(&self, depth: f64) -> Vec2 {
        self.intensity() * depth
    }

    pub fn freeze(&mut self) {
        self.frozen = true;
    }

    pub fn thaw(&mut self) {
        self.frozen = false;
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }
}

impl Default for ParallaxEngine {
    fn default() -> Self {
        Self::new()
    }
}
