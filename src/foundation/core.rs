use std::cmp::Ordering;
use std::ops::{Add, Neg, Sub};

use crate::foundation::error::{StrataError, StrataResult};

pub use kurbo::{Point, Rect, Vec2};

/// A point on a canvas timeline, in seconds.
///
/// Ordering and equality use [`f64::total_cmp`], so times can key ordered sets.
/// Use [`Time::is_equal`] for the tolerant comparison the renderer relies on.
#[derive(Clone, Copy, Debug, Default, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct Time(pub f64);

impl Time {
    /// Time zero.
    pub const ZERO: Self = Self(0.0);
    /// Two times closer than this are considered the same instant.
    pub const EPSILON: f64 = 0.0005;

    pub fn seconds(secs: f64) -> Self {
        Self(secs)
    }

    pub fn as_secs(self) -> f64 {
        self.0
    }

    pub fn is_equal(self, other: Self) -> bool {
        (self.0 - other.0).abs() <= Self::EPSILON
    }

    /// Time of frame `frame` at `fps` frames per second.
    pub fn from_frame(frame: i64, fps: f64) -> Self {
        if fps <= 0.0 {
            return Self::ZERO;
        }
        Self(frame as f64 / fps)
    }

    /// Nearest frame index at `fps`.
    pub fn round_to_frame(self, fps: f64) -> i64 {
        (self.0 * fps).round() as i64
    }
}

impl PartialEq for Time {
    fn eq(&self, other: &Self) -> bool {
        self.0.total_cmp(&other.0) == Ordering::Equal
    }
}

impl Eq for Time {}

impl PartialOrd for Time {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Time {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl Add for Time {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl Sub for Time {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self(self.0 - rhs.0)
    }
}

impl Neg for Time {
    type Output = Self;

    fn neg(self) -> Self {
        Self(-self.0)
    }
}

/// Straight (non-premultiplied) floating point RGBA.
///
/// Channels are nominally in `[0, 1]` but are not clamped: additive blending can
/// push them past 1 and [`Color::to_rgba8`] clamps on the way out.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const TRANSPARENT: Self = Self::new(0.0, 0.0, 0.0, 0.0);
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0, 1.0);
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0, 1.0);
    pub const RED: Self = Self::new(1.0, 0.0, 0.0, 1.0);
    pub const GREEN: Self = Self::new(0.0, 1.0, 0.0, 1.0);
    pub const BLUE: Self = Self::new(0.0, 0.0, 1.0, 1.0);

    /// Below this alpha a color is treated as fully transparent when dividing.
    pub const ALPHA_EPSILON: f32 = 1e-6;

    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self::new(r, g, b, 1.0)
    }

    pub fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    pub fn is_transparent(self) -> bool {
        self.a.abs() <= Self::ALPHA_EPSILON
    }

    pub fn from_rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        const K: f32 = 1.0 / 255.0;
        Self::new(
            f32::from(r) * K,
            f32::from(g) * K,
            f32::from(b) * K,
            f32::from(a) * K,
        )
    }

    /// Straight-alpha RGBA8, clamped and rounded.
    pub fn to_rgba8(self) -> [u8; 4] {
        fn q(v: f32) -> u8 {
            (v.clamp(0.0, 1.0) * 255.0).round() as u8
        }
        [q(self.r), q(self.g), q(self.b), q(self.a)]
    }

    pub fn premultiplied(self) -> Self {
        Self::new(self.r * self.a, self.g * self.a, self.b * self.a, self.a)
    }

    /// Inverse of [`Color::premultiplied`]; a transparent input yields [`Color::TRANSPARENT`].
    pub fn demultiplied(self) -> Self {
        if self.is_transparent() {
            return Self::TRANSPARENT;
        }
        Self::new(self.r / self.a, self.g / self.a, self.b / self.a, self.a)
    }

    /// Parse `#rrggbb` or `#rrggbbaa`.
    pub fn parse_hex(s: &str) -> StrataResult<Self> {
        let hex = s.trim().trim_start_matches('#');
        if !(hex.len() == 6 || hex.len() == 8) || !hex.is_ascii() {
            return Err(StrataError::validation(format!(
                "color '{s}' must be #rrggbb or #rrggbbaa"
            )));
        }
        let byte = |i: usize| {
            u8::from_str_radix(&hex[i..i + 2], 16)
                .map_err(|_| StrataError::validation(format!("color '{s}' is not valid hex")))
        };
        let a = if hex.len() == 8 { byte(6)? } else { 255 };
        Ok(Self::from_rgba8(byte(0)?, byte(2)?, byte(4)?, a))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
