//! Rectangle and coordinate-space helpers.
//!
//! Bounding rects use [`Rect::ZERO`] (or any zero-area rect) to mean "nothing".
//! kurbo's own `union`/`intersect` treat degenerate rects as real geometry, so the
//! helpers here special-case emptiness.

use crate::foundation::core::{Point, Rect};

/// A rect covering the whole plane.
pub const INFINITE: Rect = Rect {
    x0: f64::NEG_INFINITY,
    y0: f64::NEG_INFINITY,
    x1: f64::INFINITY,
    y1: f64::INFINITY,
};

/// True for zero-area, inverted or NaN rects.
pub fn is_empty(r: Rect) -> bool {
    !(r.x1 > r.x0 && r.y1 > r.y0)
}

pub fn union(a: Rect, b: Rect) -> Rect {
    match (is_empty(a), is_empty(b)) {
        (true, _) => b,
        (_, true) => a,
        _ => a.union(b),
    }
}

/// Overlap of `a` and `b`, or [`Rect::ZERO`] when they do not overlap.
pub fn intersect(a: Rect, b: Rect) -> Rect {
    let r = Rect::new(a.x0.max(b.x0), a.y0.max(b.y0), a.x1.min(b.x1), a.y1.min(b.y1));
    if is_empty(r) { Rect::ZERO } else { r }
}

pub fn intersects(a: Rect, b: Rect) -> bool {
    !is_empty(intersect(a, b))
}

/// The zoom/origin remap between a canvas and a canvas embedded in it.
///
/// Outer and inner spaces share a focus point; the inner space is scaled by
/// `e^zoom` around it and then shifted by `origin`:
///
/// `outer = (inner - focus) * e^zoom + origin + focus`
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FocusTransform {
    pub focus: Point,
    pub origin: Point,
    pub zoom: f64,
}

impl FocusTransform {
    pub fn new(focus: Point, origin: Point, zoom: f64) -> Self {
        Self {
            focus,
            origin,
            zoom,
        }
    }

    /// Linear scale factor, `e^zoom`.
    pub fn scale(&self) -> f64 {
        self.zoom.exp()
    }

    /// Map an outer-space point into the embedded canvas.
    pub fn to_inner(&self, p: Point) -> Point {
        let v = (p - self.focus) - self.origin.to_vec2();
        self.focus + v * self.scale().recip()
    }

    /// Map an embedded-canvas point out to the parent.
    pub fn to_outer(&self, p: Point) -> Point {
        self.focus + self.origin.to_vec2() + (p - self.focus) * self.scale()
    }

    /// Map an embedded bounding rect out to the parent; empty stays empty.
    pub fn rect_to_outer(&self, r: Rect) -> Rect {
        if is_empty(r) {
            return Rect::ZERO;
        }
        Rect::from_points(self.to_outer(r.origin()), self.to_outer(Point::new(r.x1, r.y1)))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/geom.rs"]
mod tests;
