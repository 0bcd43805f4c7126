use crate::{
    anim_ease::Ease,
    core::Vec2,
    error::{ChibiError, ChibiResult},
};

pub trait Lerp: Sized {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self;
}

impl Lerp for f64 {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        a + (b - a) * t
    }
}

impl Lerp for Vec2 {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        Vec2::new(a.x + (b.x - a.x) * t, a.y + (b.y - a.y) * t)
    }
}

/// A retargetable tween over wall-relative seconds.
///
/// Retargeting mid-flight restarts the tween from the currently sampled
/// value, so there is never a visible jump when a new target arrives before
/// the previous one settles.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct Tween<T> {
    from: T,
    to: T,
    start: f64,
    duration: f64,
    ease: Ease,
}

impl<T> Tween<T>
where
    T: Lerp + Clone,
{
    pub fn idle(value: T) -> Self {
        Self {
            from: value.clone(),
            to: value,
            start: 0.0,
            duration: 0.0,
            ease: Ease::Linear,
        }
    }

    pub fn retarget(&mut self, now: f64, to: T, duration: f64, ease: Ease) {
        self.from = self.sample(now);
        self.to = to;
        self.start = now;
        self.duration = duration.max(0.0);
        self.ease = ease;
    }

    pub fn sample(&self, now: f64) -> T {
        if self.duration <= 0.0 || now >= self.start + self.duration {
            return self.to.clone();
        }
        if now <= self.start {
            return self.from.clone();
        }
        let t = (now - self.start) / self.duration;
        T::lerp(&self.from, &self.to, self.ease.apply(t))
    }

    pub fn settled(&self, now: f64) -> bool {
        self.duration <= 0.0 || now >= self.start + self.duration
    }

    pub fn target(&self) -> &T {
        &self.to
    }
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct Key<T> {
    pub at: f64, // seconds from sequence start
    pub value: T,
    pub ease: Ease, // ease applied toward next key
}

/// A fixed timed keyframe track. Holds the first value before the first key
/// and the last value after the last key.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct Sequence<T> {
    keys: Vec<Key<T>>, // sorted by `at`
}

impl<T> Sequence<T>
where
    T: Lerp + Clone,
{
    pub fn new(keys: Vec<Key<T>>) -> ChibiResult<Self> {
        if keys.is_empty() {
            return Err(ChibiError::validation(
                "Sequence must have at least one key",
            ));
        }
        if !keys.windows(2).all(|w| w[0].at <= w[1].at) {
            return Err(ChibiError::validation("Sequence keys must be sorted by time"));
        }
        if keys.iter().any(|k| !k.at.is_finite()) {
            return Err(ChibiError::validation("Sequence key times must be finite"));
        }
        Ok(Self { keys })
    }

    /// Evenly spaced keys from `start_value` through `values`, spanning
    /// `duration` seconds with one ease for every segment.
    pub fn even(start_value: T, values: &[T], duration: f64, ease: Ease) -> ChibiResult<Self> {
        if values.is_empty() {
            return Err(ChibiError::validation(
                "Sequence::even needs at least one target value",
            ));
        }
        if !(duration.is_finite() && duration > 0.0) {
            return Err(ChibiError::validation(
                "Sequence::even duration must be finite and > 0",
            ));
        }
        let step = duration / values.len() as f64;
        let mut keys = vec![Key {
            at: 0.0,
            value: start_value,
            ease,
        }];
        for (i, v) in values.iter().enumerate() {
            keys.push(Key {
                at: step * (i + 1) as f64,
                value: v.clone(),
                ease,
            });
        }
        Self::new(keys)
    }

    pub fn duration(&self) -> f64 {
        self.keys.last().map(|k| k.at).unwrap_or(0.0)
    }

    pub fn sample(&self, t: f64) -> T {
        let idx = self.keys.partition_point(|k| k.at <= t);
        if idx == 0 {
            return self.keys[0].value.clone();
        }
        if idx >= self.keys.len() {
            return self.keys[self.keys.len() - 1].value.clone();
        }

        let a = &self.keys[idx - 1];
        let b = &self.keys[idx];
        let denom = b.at - a.at;
        if denom <= 0.0 {
            return a.value.clone();
        }
        let local = ((t - a.at) / denom).clamp(0.0, 1.0);
        T::lerp(&a.value, &b.value, a.ease.apply(local))
    }
}
