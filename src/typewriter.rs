use crate::error::{ChibiError, ChibiResult};

/// Seconds per typed character.
pub const TYPE_INTERVAL: f64 = 0.065;

/// Seconds per deleted character.
pub const DELETE_INTERVAL: f64 = 0.035;

/// Pause with the full phrase on screen before deleting starts.
pub const HOLD_DURATION: f64 = 1.8;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
    Typing,
    Holding,
    Deleting,
}

/// The hero type-and-delete rotation: types each phrase out, holds, deletes
/// it, then moves to the next phrase cyclically. Deterministic under any
/// tick granularity.
#[derive(Clone, Debug)]
pub struct Typewriter {
    phrases: Vec<String>,
    phrase: usize,
    chars: usize,
    phase: Phase,
    acc: f64,
}

impl Typewriter {
    pub fn new(phrases: Vec<String>) -> ChibiResult<Self> {
        if phrases.is_empty() {
            return Err(ChibiError::validation(
                "Typewriter needs at least one phrase",
            ));
        }
        if phrases.iter().any(|p| p.is_empty()) {
            return Err(ChibiError::validation("Typewriter phrases must be non-empty"));
        }
        Ok(Self {
            phrases,
            phrase: 0,
            chars: 0,
            phase: Phase::Typing,
            acc: 0.0,
        })
    }

    pub fn tick(&mut self, dt: f64) {
        self.acc += dt.max(0.0);
        loop {
            let needed = match self.phase {
                Phase::Typing => TYPE_INTERVAL,
                Phase::Holding => HOLD_DURATION,
                Phase::Deleting => DELETE_INTERVAL,
            };
            if self.acc < needed {
                return;
            }
            self.acc -= needed;
            self.step();
        }
    }

    fn step(&mut self) {
        let len = self.phrases[self.phrase].chars().count();
        match self.phase {
            Phase::Typing => {
                self.chars += 1;
                if self.chars >= len {
                    self.chars = len;
                    self.phase = Phase::Holding;
                }
            }
            Phase::Holding => self.phase = Phase::Deleting,
            Phase::Deleting => {
                self.chars = self.chars.saturating_sub(1);
                if self.chars == 0 {
                    self.phase = Phase::Typing;
                    self.phrase = (self.phrase + 1) % self.phrases.len();
                }
            }
        }
    }

    /// The currently visible prefix of the current phrase.
    pub fn text(&self) -> &str {
        let phrase = &self.phrases[self.phrase];
        match phrase.char_indices().nth(self.chars) {
            Some((byte, _)) => &phrase[..byte],
            None => phrase,
        }
    }

    pub fn phrase_index(&self) -> usize {
        self.phrase
    }

    pub fn is_deleting(&self) -> bool {
        self.phase == Phase::Deleting
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn machine() -> Typewriter {
        Typewriter::new(vec!["abc".to_string(), "de".to_string()]).unwrap()
    }

    #[test]
    fn rejects_empty_input() {
        assert!(Typewriter::new(vec![]).is_err());
        assert!(Typewriter::new(vec![String::new()]).is_err());
    }

    #[test]
    fn types_one_character_per_interval() {
        let mut tw = machine();
        assert_eq!(tw.text(), "");
        tw.tick(TYPE_INTERVAL);
        assert_eq!(tw.text(), "a");
        tw.tick(TYPE_INTERVAL * 2.0);
        assert_eq!(tw.text(), "abc");
    }

    #[test]
    fn holds_then_deletes_then_rotates() {
        let mut tw = machine();
        tw.tick(TYPE_INTERVAL * 3.0);
        assert_eq!(tw.text(), "abc");
        assert!(!tw.is_deleting());

        // Still holding just before the pause elapses.
        tw.tick(HOLD_DURATION * 0.9);
        assert_eq!(tw.text(), "abc");

        tw.tick(HOLD_DURATION * 0.1);
        assert!(tw.is_deleting());

        tw.tick(DELETE_INTERVAL * 3.0);
        assert_eq!(tw.phrase_index(), 1);
        assert_eq!(tw.text(), "");

        tw.tick(TYPE_INTERVAL * 2.0);
        assert_eq!(tw.text(), "de");
    }

    #[test]
    fn coarse_and_fine_ticks_agree() {
        let mut fine = machine();
        let mut coarse = machine();
        let total = 6.0;
        let steps = 600;
        for _ in 0..steps {
            fine.tick(total / steps as f64);
        }
        coarse.tick(total);
        assert_eq!(fine.text(), coarse.text());
        assert_eq!(fine.phrase_index(), coarse.phrase_index());
    }

    #[test]
    fn multibyte_phrases_slice_on_char_boundaries() {
        let mut tw = Typewriter::new(vec!["héllo".to_string()]).unwrap();
        tw.tick(TYPE_INTERVAL * 2.0);
        assert_eq!(tw.text(), "hé");
    }
}
