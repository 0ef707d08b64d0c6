use std::collections::BTreeSet;

use crate::{
    foundation::core::{Color, Point, Time, Vec2},
    foundation::error::{StrataError, StrataResult},
};

pub trait Lerp: Sized {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self;
}

impl Lerp for f64 {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        a + (b - a) * t
    }
}

impl Lerp for f32 {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        (*a as f64 + ((*b as f64 - *a as f64) * t)) as f32
    }
}

impl Lerp for Vec2 {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        Vec2::new(a.x + (b.x - a.x) * t, a.y + (b.y - a.y) * t)
    }
}

impl Lerp for Point {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        a.lerp(*b, t)
    }
}

impl Lerp for Color {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        Color::new(
            f32::lerp(&a.r, &b.r, t),
            f32::lerp(&a.g, &b.g, t),
            f32::lerp(&a.b, &b.b, t),
            f32::lerp(&a.a, &b.a, t),
        )
    }
}

/// A layer parameter that may change over time.
///
/// Serialized untagged: a bare value is a constant, an object with `keys` is a
/// keyframe track.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum Animated<T> {
    Constant(T),
    Keyframes(Keyframes<T>),
}

impl<T> Animated<T>
where
    T: Lerp + Clone + Default,
{
    pub fn constant(value: T) -> Self {
        Self::Constant(value)
    }

    pub fn sample(&self, time: Time) -> T {
        match self {
            Self::Constant(v) => v.clone(),
            Self::Keyframes(kf) => kf.sample(time),
        }
    }

    pub fn validate(&self) -> StrataResult<()> {
        match self {
            Self::Constant(_) => Ok(()),
            Self::Keyframes(kf) => kf.validate(),
        }
    }

    /// Keyframe times (empty for constants).
    pub fn times(&self) -> BTreeSet<Time> {
        match self {
            Self::Constant(_) => BTreeSet::new(),
            Self::Keyframes(kf) => kf.keys.iter().map(|k| k.time).collect(),
        }
    }

    pub fn is_animated(&self) -> bool {
        matches!(self, Self::Keyframes(_))
    }
}

impl<T: Default> Default for Animated<T> {
    fn default() -> Self {
        Self::Constant(T::default())
    }
}

impl<T> From<T> for Animated<T> {
    fn from(value: T) -> Self {
        Self::Constant(value)
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Keyframes<T> {
    pub keys: Vec<Keyframe<T>>, // sorted by time
    #[serde(default)]
    pub mode: InterpMode,
}

impl<T> Keyframes<T>
where
    T: Lerp + Clone + Default,
{
    pub fn validate(&self) -> StrataResult<()> {
        if self.keys.is_empty() {
            return Err(StrataError::animation("Keyframes must have at least one key"));
        }
        if !self.keys.windows(2).all(|w| w[0].time <= w[1].time) {
            return Err(StrataError::animation("Keyframes keys must be sorted by time"));
        }
        Ok(())
    }

    /// Sample the track; an empty track yields `T::default()`.
    pub fn sample(&self, time: Time) -> T {
        let Some(first) = self.keys.first() else {
            return T::default();
        };

        let idx = self.keys.partition_point(|k| k.time <= time);
        if idx == 0 {
            return first.value.clone();
        }
        if idx >= self.keys.len() {
            return self.keys[self.keys.len() - 1].value.clone();
        }

        let a = &self.keys[idx - 1];
        let b = &self.keys[idx];
        let denom = b.time.0 - a.time.0;
        if denom <= 0.0 {
            return a.value.clone();
        }

        let t = (time.0 - a.time.0) / denom;
        match a.out.unwrap_or(self.mode).progress(t) {
            Some(p) => T::lerp(&a.value, &b.value, p),
            None => a.value.clone(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Keyframe<T> {
    pub time: Time,
    pub value: T,
    /// Interpolation toward the next key; `None` follows the track's mode.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub out: Option<InterpMode>,
}

/// How a track moves from one key to the next.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum InterpMode {
    /// Keep the earlier value until the next key.
    Hold,
    #[default]
    Linear,
    EaseIn,
    EaseOut,
    /// Leave and arrive with zero velocity.
    Ease,
}

impl InterpMode {
    /// Progress through a segment at normalized time `t`; `None` holds.
    pub fn progress(self, t: f64) -> Option<f64> {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Hold => None,
            Self::Linear => Some(t),
            Self::EaseIn => Some(t * t),
            Self::EaseOut => Some(t * (2.0 - t)),
            Self::Ease => Some(t * t * (3.0 - 2.0 * t)),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/anim.rs"]
mod tests;
