use crate::{
    anim::{Key, Sequence},
    anim_ease::Ease,
    core::{MotionPreference, Vec2},
    error::ChibiResult,
    rig::LayerKind,
};

/// Seconds before the entrance timeline begins.
pub const ENTRANCE_DELAY: f64 = 1.0;

/// Timeline length after the delay; everything has settled by then.
pub const ENTRANCE_DURATION: f64 = 2.0;

/// Timeline offset at which the eyes switch from lids to open.
pub const EYES_REVEAL_AT: f64 = 0.85;

const BODY_RISE: f64 = 120.0;
const HEAD_SETTLE: f64 = 16.0;
const EAR_SPIN_DEG: f64 = 40.0;
const GLASSES_BOB: f64 = -8.0;
const BROW_RISE: f64 = 20.0;

const fn elastic(amplitude: f64, period: f64) -> Ease {
    Ease::OutElastic { amplitude, period }
}

/// Per-layer contribution of the entrance choreography at one instant.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EntrancePose {
    pub offset: Vec2,
    pub rotation_deg: f64,
    /// Eyes stay on their lid shape until the reveal moment passes.
    pub eyes_revealed: bool,
}

impl EntrancePose {
    pub const REST: Self = Self {
        offset: Vec2::ZERO,
        rotation_deg: 0.0,
        eyes_revealed: true,
    };
}

/// The one-shot intro timeline. `already_introduced` is the session latch
/// injected by the host (explicit state rather than an ambient global, so
/// instances stay reentrant). When set, or under reduced motion, the
/// timeline is pre-completed and the avatar starts at rest.
#[derive(Clone, Debug)]
pub struct Entrance {
    clock: f64,
    skip: bool,
    body_rise: Sequence<f64>,
    head_settle: Sequence<f64>,
    ear_spin: Sequence<f64>,
    glasses_bob: Sequence<f64>,
    brow_rise: Sequence<f64>,
}

impl Entrance {
    pub fn new(already_introduced: bool, motion: MotionPreference) -> ChibiResult<Self> {
        let skip = already_introduced || motion == MotionPreference::Reduced;
        Ok(Self {
            clock: 0.0,
            skip,
            body_rise: track(0.5, 1.5, BODY_RISE, elastic(0.5, 0.4))?,
            head_settle: track(0.6, 1.5, HEAD_SETTLE, elastic(0.58, 0.25))?,
            ear_spin: track(0.7, 1.7, EAR_SPIN_DEG, elastic(0.5, 0.2))?,
            glasses_bob: glasses_track()?,
            brow_rise: track(0.7, 1.7, BROW_RISE, elastic(0.5, 0.2))?,
        })
    }

    pub fn tick(&mut self, dt: f64) {
        self.clock += dt.max(0.0);
    }

    pub fn is_complete(&self) -> bool {
        self.skip || self.clock >= ENTRANCE_DELAY + ENTRANCE_DURATION
    }

    pub fn pose_for(&self, kind: LayerKind) -> EntrancePose {
        if self.is_complete() {
            return EntrancePose::REST;
        }

        let t = (self.clock - ENTRANCE_DELAY).max(0.0);
        let rise = self.body_rise.sample(t);
        let mut pose = EntrancePose {
            offset: Vec2::new(0.0, rise),
            rotation_deg: 0.0,
            eyes_revealed: t >= EYES_REVEAL_AT,
        };

        match kind {
            LayerKind::Body => {}
            LayerKind::EarLeft => {
                pose.rotation_deg = -self.ear_spin.sample(t);
                pose.offset.y += self.head_settle.sample(t);
            }
            LayerKind::EarRight => {
                pose.rotation_deg = self.ear_spin.sample(t);
                pose.offset.y += self.head_settle.sample(t);
            }
            LayerKind::Glasses => {
                pose.offset.y += self.head_settle.sample(t) + self.glasses_bob.sample(t);
            }
            LayerKind::Eyebrows => {
                pose.offset.y += self.head_settle.sample(t) + self.brow_rise.sample(t);
            }
            _ => {
                // Head and everything attached to it settles together.
                pose.offset.y += self.head_settle.sample(t);
            }
        }
        pose
    }
}

fn track(start: f64, end: f64, from: f64, ease: Ease) -> ChibiResult<Sequence<f64>> {
    Sequence::new(vec![
        Key {
            at: start,
            value: from,
            ease,
        },
        Key {
            at: end,
            value: 0.0,
            ease: Ease::Linear,
        },
    ])
}

fn glasses_track() -> ChibiResult<Sequence<f64>> {
    let ease = elastic(0.5, 0.2);
    Sequence::new(vec![
        Key {
            at: 0.75,
            value: 0.0,
            ease,
        },
        Key {
            at: 1.15,
            value: GLASSES_BOB,
            ease,
        },
        Key {
            at: 1.75,
            value: 0.0,
            ease: Ease::Linear,
        },
    ])
}
