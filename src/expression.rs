use crate::{
    anim::Sequence,
    anim_ease::Ease,
    core::HoverTarget,
    error::ChibiResult,
};

/// Seconds between the end of one blink and the start of the next.
pub const BLINK_INTERVAL: f64 = 5.0;

/// How long the eyes stay closed per blink.
pub const BLINK_DURATION: f64 = 0.15;

/// Total length of the dizzy interruption.
pub const DIZZY_DURATION: f64 = 6.0;

/// Point within the dizzy timeline at which eyes and mouth are restored
/// while the wobble finishes settling.
pub const DIZZY_RECOVERY: f64 = 4.0;

/// Full revolutions each eye spiral makes over the dizzy duration.
pub const SPIRAL_TURNS: f64 = 6.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum EyePose {
    Open,
    Blinking,
    Dizzy,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum MouthPose {
    Closed,
    Smile,
    Dazed,
}

/// The transient geometry of the dizzy interruption at one instant.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DizzyPose {
    pub spirals_visible: bool,
    pub spiral_left_deg: f64,
    pub spiral_right_deg: f64,
    pub head_tilt_deg: f64,
    pub body_tilt_deg: f64,
    pub body_scale: f64,
}

/// Snapshot of the machine: exactly one eye pose and one mouth pose are
/// active by construction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ExpressionFrame {
    pub eyes: EyePose,
    pub mouth: MouthPose,
    pub dizzy: Option<DizzyPose>,
}

/// Timer- and event-driven facial state. All time is injected through
/// [`ExpressionMachine::tick`]; nothing here reads a wall clock.
#[derive(Clone, Debug)]
pub struct ExpressionMachine {
    clock: f64,
    next_blink_at: f64,
    hovering: bool,
    dizzy_started_at: Option<f64>,
    head_wobble: Sequence<f64>,
    body_wobble: Sequence<f64>,
    scale_pulse: Sequence<f64>,
}

impl ExpressionMachine {
    pub fn new() -> ChibiResult<Self> {
        let wobble_ease = Ease::InOutSine;
        Ok(Self {
            clock: 0.0,
            next_blink_at: BLINK_INTERVAL,
            hovering: false,
            dizzy_started_at: None,
            head_wobble: Sequence::even(
                0.0,
                &[2.0, -2.0, 1.5, -1.5, 1.0, -1.0, 0.5, 0.0],
                DIZZY_DURATION,
                wobble_ease,
            )?,
            body_wobble: Sequence::even(
                0.0,
                &[-2.0, 2.0, -1.5, 1.5, -1.0, 1.0, -0.5, 0.0],
                DIZZY_DURATION,
                wobble_ease,
            )?,
            scale_pulse: Sequence::even(
                1.0,
                &[0.99, 1.0, 0.995, 1.0],
                DIZZY_RECOVERY,
                wobble_ease,
            )?,
        })
    }

    /// Advances the internal clock and applies every transition that came
    /// due, in order. Large `dt` steps are handled by replaying whole blink
    /// cycles, so coarse ticking stays deterministic.
    pub fn tick(&mut self, dt: f64) {
        self.clock += dt.max(0.0);

        if let Some(start) = self.dizzy_started_at {
            if self.clock < start + DIZZY_DURATION {
                return; // blink scheduling is suspended for the full cycle
            }
            self.dizzy_started_at = None;
            self.hovering = false;
            self.next_blink_at = self.clock + BLINK_INTERVAL;
            tracing::debug!("dizzy cycle complete, back to neutral");
        }

        while self.clock >= self.next_blink_at + BLINK_DURATION {
            self.next_blink_at += BLINK_INTERVAL + BLINK_DURATION;
        }
    }

    /// Pointer entered `target` (or one of its ancestors, as resolved by
    /// the host). Only interactive targets open the mouth; ignored while
    /// dizzy.
    pub fn pointer_entered(&mut self, target: HoverTarget) {
        if self.is_dizzy() || !target.is_interactive() {
            return;
        }
        self.hovering = true;
    }

    pub fn pointer_left(&mut self, target: HoverTarget) {
        if self.is_dizzy() || !target.is_interactive() {
            return;
        }
        self.hovering = false;
    }

    /// Starts the dizzy interruption. Returns `false` (and does nothing)
    /// when a cycle is already running: the transition is non-re-entrant.
    pub fn trigger_dizzy(&mut self) -> bool {
        if self.is_dizzy() {
            return false;
        }
        self.dizzy_started_at = Some(self.clock);
        tracing::debug!("dizzy triggered");
        true
    }

    pub fn is_dizzy(&self) -> bool {
        self.dizzy_started_at
            .is_some_and(|start| self.clock < start + DIZZY_DURATION)
    }

    pub fn is_hovering(&self) -> bool {
        self.hovering
    }

    fn is_blinking(&self) -> bool {
        self.clock >= self.next_blink_at && self.clock < self.next_blink_at + BLINK_DURATION
    }

    pub fn frame(&self) -> ExpressionFrame {
        if let Some(start) = self.dizzy_started_at {
            let elapsed = (self.clock - start).min(DIZZY_DURATION);
            if elapsed < DIZZY_DURATION {
                let recovering = elapsed >= DIZZY_RECOVERY;
                let spin = SPIRAL_TURNS * 360.0 * (elapsed / DIZZY_DURATION);
                return ExpressionFrame {
                    eyes: if recovering { EyePose::Open } else { EyePose::Dizzy },
                    mouth: if recovering {
                        MouthPose::Closed
                    } else {
                        MouthPose::Dazed
                    },
                    dizzy: Some(DizzyPose {
                        spirals_visible: !recovering,
                        spiral_left_deg: -spin,
                        spiral_right_deg: spin,
                        head_tilt_deg: self.head_wobble.sample(elapsed),
                        body_tilt_deg: self.body_wobble.sample(elapsed),
                        body_scale: self.scale_pulse.sample(elapsed),
                    }),
                };
            }
        }

        ExpressionFrame {
            eyes: if self.is_blinking() {
                EyePose::Blinking
            } else {
                EyePose::Open
            },
            mouth: if self.hovering {
                MouthPose::Smile
            } else {
                MouthPose::Closed
            },
            dizzy: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn machine() -> ExpressionMachine {
        ExpressionMachine::new().unwrap()
    }

    #[test]
    fn starts_neutral() {
        let m = machine();
        let f = m.frame();
        assert_eq!(f.eyes, EyePose::Open);
        assert_eq!(f.mouth, MouthPose::Closed);
        assert!(f.dizzy.is_none());
    }

    #[test]
    fn blink_fires_at_interval_for_exact_duration() {
        let mut m = machine();

        m.tick(BLINK_INTERVAL - 0.01);
        assert_eq!(m.frame().eyes, EyePose::Open);

        m.tick(0.02);
        assert_eq!(m.frame().eyes, EyePose::Blinking);

        m.tick(BLINK_DURATION);
        assert_eq!(m.frame().eyes, EyePose::Open);

        // Next cycle starts a full interval after the previous blink ended.
        m.tick(BLINK_INTERVAL);
        assert_eq!(m.frame().eyes, EyePose::Blinking);
    }

    #[test]
    fn blink_does_not_touch_the_mouth() {
        let mut m = machine();
        m.pointer_entered(HoverTarget::Link);
        m.tick(BLINK_INTERVAL + BLINK_DURATION / 2.0);
        let f = m.frame();
        assert_eq!(f.eyes, EyePose::Blinking);
        assert_eq!(f.mouth, MouthPose::Smile);
    }

    #[test]
    fn hover_opens_and_closes_mouth_within_one_update() {
        let mut m = machine();

        m.pointer_entered(HoverTarget::Plain);
        assert_eq!(m.frame().mouth, MouthPose::Closed);

        m.pointer_entered(HoverTarget::Link);
        assert_eq!(m.frame().mouth, MouthPose::Smile);

        m.pointer_left(HoverTarget::Link);
        assert_eq!(m.frame().mouth, MouthPose::Closed);

        m.pointer_entered(HoverTarget::MagneticAnchor);
        assert_eq!(m.frame().mouth, MouthPose::Smile);
    }

    #[test]
    fn dizzy_forces_both_poses_and_is_non_reentrant() {
        let mut m = machine();
        assert!(m.trigger_dizzy());
        assert!(!m.trigger_dizzy());

        m.tick(1.0);
        let f = m.frame();
        assert_eq!(f.eyes, EyePose::Dizzy);
        assert_eq!(f.mouth, MouthPose::Dazed);
        let pose = f.dizzy.unwrap();
        assert!(pose.spirals_visible);
        assert!(pose.spiral_left_deg < 0.0);
        assert!(pose.spiral_right_deg > 0.0);
        assert_eq!(pose.spiral_left_deg, -pose.spiral_right_deg);
    }

    #[test]
    fn dizzy_suppresses_hover_and_blink() {
        let mut m = machine();
        assert!(m.trigger_dizzy());

        m.pointer_entered(HoverTarget::Link);
        assert_eq!(m.frame().mouth, MouthPose::Dazed);

        // The regular blink time passes inside the dizzy window without a
        // blink appearing afterwards.
        m.tick(BLINK_INTERVAL + 0.05);
        assert_eq!(m.frame().eyes, EyePose::Open); // recovery phase
        m.tick(DIZZY_DURATION - BLINK_INTERVAL); // past expiry
        assert_eq!(m.frame().eyes, EyePose::Open);
        assert!(!m.is_hovering());
    }

    #[test]
    fn eyes_and_mouth_restore_at_recovery_while_wobble_finishes() {
        let mut m = machine();
        assert!(m.trigger_dizzy());

        m.tick(DIZZY_RECOVERY + 0.5);
        let f = m.frame();
        assert_eq!(f.eyes, EyePose::Open);
        assert_eq!(f.mouth, MouthPose::Closed);
        let pose = f.dizzy.unwrap();
        assert!(!pose.spirals_visible);
        assert!(m.is_dizzy());
    }

    #[test]
    fn dizzy_restores_neutral_deterministically_at_expiry() {
        let mut m = machine();
        m.pointer_entered(HoverTarget::Link);
        assert!(m.trigger_dizzy());

        m.tick(DIZZY_DURATION);
        assert!(!m.is_dizzy());
        let f = m.frame();
        assert_eq!(f.eyes, EyePose::Open);
        assert_eq!(f.mouth, MouthPose::Closed);
        assert!(f.dizzy.is_none());

        // A fresh trigger works again after the cycle completes.
        assert!(m.trigger_dizzy());
    }

    #[test]
    fn wobble_starts_and_ends_at_rest() {
        let mut m = machine();
        assert!(m.trigger_dizzy());
        let at_start = m.frame().dizzy.unwrap();
        assert_eq!(at_start.head_tilt_deg, 0.0);
        assert_eq!(at_start.body_tilt_deg, 0.0);

        m.tick(DIZZY_DURATION - 1e-9);
        let at_end = m.frame().dizzy.unwrap();
        assert!(at_end.head_tilt_deg.abs() < 0.01);
        assert!(at_end.body_tilt_deg.abs() < 0.01);
        assert!((at_end.body_scale - 1.0).abs() < 1e-9);
    }
}
