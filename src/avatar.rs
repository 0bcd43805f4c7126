use crate::{
    core::{HoverTarget, MotionPreference, Point, PointerSample, SurfaceBounds, Vec2},
    entrance::Entrance,
    error::ChibiResult,
    expression::{ExpressionFrame, ExpressionMachine, EyePose, MouthPose},
    parallax::{ParallaxEngine, ParallaxSignal},
    rig::{AvatarRig, LayerKind},
};

#[derive(Clone, Copy, Debug, serde::Serialize, serde::Deserialize)]
pub struct AvatarConfig {
    /// Session latch: true when the entrance already played this session
    /// (client-side re-navigation shows the avatar immediately).
    pub already_introduced: bool,
    pub motion: MotionPreference,
}

impl Default for AvatarConfig {
    fn default() -> Self {
        Self {
            already_introduced: false,
            motion: MotionPreference::Full,
        }
    }
}

/// Where one rig layer renders this instant. Placements are emitted in the
/// rig's back-to-front order, one per rig layer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayerPlacement {
    pub kind: LayerKind,
    pub z: i32,
    pub offset: Vec2,
    pub rotation_deg: f64,
    pub scale: f64,
    pub pivot: Point,
    pub visible: bool,
}

#[derive(Clone, Debug)]
pub struct AvatarFrame {
    pub layers: Vec<LayerPlacement>,
    pub expression: ExpressionFrame,
}

/// The composed avatar component: rig + parallax engine + expression
/// machine + entrance timeline, all driven by injected events and ticks on
/// one thread. Dropping it releases everything; with no internal timers or
/// threads, nothing can fire after teardown.
#[derive(Clone, Debug)]
pub struct Avatar {
    rig: AvatarRig,
    parallax: ParallaxEngine,
    expression: ExpressionMachine,
    entrance: Entrance,
    motion: MotionPreference,
    bounds: Option<SurfaceBounds>,
}

impl Avatar {
    pub fn new(config: AvatarConfig) -> ChibiResult<Self> {
        Self::with_rig(AvatarRig::standard()?, config)
    }

    pub fn with_rig(rig: AvatarRig, config: AvatarConfig) -> ChibiResult<Self> {
        rig.validate()?;
        Ok(Self {
            rig,
            parallax: ParallaxEngine::new(),
            expression: ExpressionMachine::new()?,
            entrance: Entrance::new(config.already_introduced, config.motion)?,
            motion: config.motion,
            bounds: None,
        })
    }

    pub fn rig(&self) -> &AvatarRig {
        &self.rig
    }

    /// Attaches the measurable rendering surface. Until this happens every
    /// pointer notification is a no-op, not an error.
    pub fn mount(&mut self, bounds: SurfaceBounds) {
        self.bounds = Some(bounds);
    }

    /// Layout/resize changes just re-measure; no other state is touched.
    pub fn resize(&mut self, bounds: SurfaceBounds) {
        self.bounds = Some(bounds);
    }

    pub fn is_mounted(&self) -> bool {
        self.bounds.is_some()
    }

    fn accepts_pointer_input(&self) -> bool {
        self.motion == MotionPreference::Full && self.entrance.is_complete()
    }

    pub fn on_pointer_move(&mut self, sample: PointerSample) {
        if !self.accepts_pointer_input() {
            return;
        }
        let Some(bounds) = self.bounds else {
            return; // surface not yet measurable
        };
        if let Some(ParallaxSignal::AbruptMovement { magnitude }) =
            self.parallax.on_pointer_sample(&sample, bounds)
            && self.expression.trigger_dizzy()
        {
            tracing::debug!(magnitude, "freezing pointer tracking for dizzy cycle");
            self.parallax.freeze();
        }
    }

    pub fn on_pointer_over(&mut self, target: HoverTarget) {
        if !self.accepts_pointer_input() {
            return;
        }
        self.expression.pointer_entered(target);
    }

    pub fn on_pointer_out(&mut self, target: HoverTarget) {
        if !self.accepts_pointer_input() {
            return;
        }
        self.expression.pointer_left(target);
    }

    /// Advances every timer by `dt` seconds.
    pub fn tick(&mut self, dt: f64) {
        self.entrance.tick(dt);
        if self.motion == MotionPreference::Reduced {
            return;
        }
        self.parallax.tick(dt);

        let was_dizzy = self.expression.is_dizzy();
        self.expression.tick(dt);
        if was_dizzy && !self.expression.is_dizzy() {
            self.parallax.thaw();
        }
    }

    /// Pure snapshot of the current composition, one placement per rig
    /// layer in back-to-front order.
    pub fn frame(&self) -> AvatarFrame {
        let expression = self.expression.frame();

        let layers = self
            .rig
            .layers()
            .iter()
            .map(|layer| {
                let entrance = self.entrance.pose_for(layer.kind);
                let offset = entrance.offset + self.parallax.layer_offset(layer.depth);
                let mut rotation_deg = entrance.rotation_deg;
                let mut scale = 1.0;

                if let Some(dizzy) = &expression.dizzy {
                    rotation_deg += dizzy.body_tilt_deg;
                    scale = dizzy.body_scale;
                    if layer.wobbles_with_head {
                        rotation_deg += dizzy.head_tilt_deg;
                    }
                    match layer.kind {
                        LayerKind::SpiralLeft => rotation_deg += dizzy.spiral_left_deg,
                        LayerKind::SpiralRight => rotation_deg += dizzy.spiral_right_deg,
                        _ => {}
                    }
                }

                let visible = layer_visible(layer.kind, &expression, entrance.eyes_revealed);

                LayerPlacement {
                    kind: layer.kind,
                    z: layer.z,
                    offset,
                    rotation_deg,
                    scale,
                    pivot: layer.pivot,
                    visible,
                }
            })
            .collect();

        AvatarFrame { layers, expression }
    }
}

fn layer_visible(kind: LayerKind, expression: &ExpressionFrame, eyes_revealed: bool) -> bool {
    let spirals_visible = expression
        .dizzy
        .as_ref()
        .is_some_and(|d| d.spirals_visible);
    match kind {
        LayerKind::EyesOpen => eyes_revealed && expression.eyes == EyePose::Open,
        LayerKind::EyesBlinking => {
            // Lids double as the pre-reveal eye shape during the entrance.
            !eyes_revealed || expression.eyes == EyePose::Blinking
        }
        LayerKind::SpiralLeft | LayerKind::SpiralRight => {
            expression.eyes == EyePose::Dizzy && spirals_visible
        }
        LayerKind::MouthClosed => expression.mouth == MouthPose::Closed,
        LayerKind::MouthSmile => expression.mouth == MouthPose::Smile,
        LayerKind::MouthDazed => expression.mouth == MouthPose::Dazed,
        _ => true,
    }
}
