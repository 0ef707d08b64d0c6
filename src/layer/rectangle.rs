use std::collections::BTreeSet;

use crate::{
    animation::anim::Animated,
    composite::surface::Surface,
    foundation::core::{Color, Point, Rect, Time},
    foundation::error::StrataResult,
    layer::{
        layer::Composite,
        params::{ParamDesc, ParamEntry, ParamValue},
    },
    render::desc::RendDesc,
};

/// Qualities at or above this render hard edges sampled at pixel centers.
const HARD_EDGE_QUALITY: u8 = 8;

/// An axis-aligned filled rectangle between two corner points.
#[derive(Clone, Debug, PartialEq)]
pub struct Rectangle {
    point1: Animated<Point>,
    point2: Animated<Point>,
    color: Animated<Color>,
}

impl Default for Rectangle {
    fn default() -> Self {
        Self::new(Point::ZERO, Point::new(1.0, 1.0), Color::BLACK)
    }
}

pub(crate) static RECTANGLE_PARAMS: [ParamEntry<Rectangle>; 3] = [
    ParamEntry {
        desc: ParamDesc {
            name: "color",
            local_name: "Color",
            description: "Fill color",
        },
        get: |r, t| ParamValue::Color(r.color.sample(t)),
        set: Some(|r, v| {
            r.color = Animated::Constant(v.into_color("color")?);
            Ok(())
        }),
    },
    ParamEntry {
        desc: ParamDesc {
            name: "point1",
            local_name: "Point 1",
            description: "First corner of the rectangle",
        },
        get: |r, t| ParamValue::Point(r.point1.sample(t)),
        set: Some(|r, v| {
            r.point1 = Animated::Constant(v.into_point("point1")?);
            Ok(())
        }),
    },
    ParamEntry {
        desc: ParamDesc {
            name: "point2",
            local_name: "Point 2",
            description: "Second corner of the rectangle",
        },
        get: |r, t| ParamValue::Point(r.point2.sample(t)),
        set: Some(|r, v| {
            r.point2 = Animated::Constant(v.into_point("point2")?);
            Ok(())
        }),
    },
];

impl Rectangle {
    pub fn new(
        point1: impl Into<Animated<Point>>,
        point2: impl Into<Animated<Point>>,
        color: impl Into<Animated<Color>>,
    ) -> Self {
        Self {
            point1: point1.into(),
            point2: point2.into(),
            color: color.into(),
        }
    }

    pub fn color(&self) -> &Animated<Color> {
        &self.color
    }

    pub fn set_color(&mut self, color: impl Into<Animated<Color>>) {
        self.color = color.into();
    }

    pub fn set_corners(&mut self, point1: impl Into<Animated<Point>>, point2: impl Into<Animated<Point>>) {
        self.point1 = point1.into();
        self.point2 = point2.into();
    }

    pub(crate) fn rect_at(&self, time: Time) -> Rect {
        Rect::from_points(self.point1.sample(time), self.point2.sample(time))
    }

    /// The layer's own color at `p`, `None` outside the rectangle.
    pub(crate) fn color_at(&self, time: Time, p: Point) -> Option<Color> {
        self.rect_at(time)
            .contains(p)
            .then(|| self.color.sample(time))
    }

    pub(crate) fn paint(&self, surface: &mut Surface, desc: &RendDesc, quality: u8, comp: &Composite) {
        let rect = self.rect_at(comp.time);
        let color = self.color.sample(comp.time);
        let (pw, ph) = (desc.pw(), desc.ph());
        let hard = quality >= HARD_EDGE_QUALITY;

        let coverage = |start: f64, size: f64, lo: f64, hi: f64, center: f64| -> f64 {
            if hard {
                return if center >= lo && center < hi { 1.0 } else { 0.0 };
            }
            let (a, b) = if size < 0.0 { (start + size, start) } else { (start, start + size) };
            let overlap = (b.min(hi) - a.max(lo)).max(0.0);
            let cov = overlap / size.abs();
            // Snap float noise so fully covered pixels blend at exactly `amount`.
            if cov > 1.0 - 1e-9 { 1.0 } else { cov }
        };

        for y in 0..surface.height() {
            let y0 = desc.tl.y + f64::from(y) * ph;
            let cov_y = coverage(y0, ph, rect.y0, rect.y1, y0 + 0.5 * ph);
            for x in 0..surface.width() {
                let x0 = desc.tl.x + f64::from(x) * pw;
                let cov = cov_y * coverage(x0, pw, rect.x0, rect.x1, x0 + 0.5 * pw);
                let Some(px) = surface.get(x, y) else {
                    continue;
                };
                let out = if cov > 0.0 {
                    Color::blend(color, px, comp.amount * cov as f32, comp.blend)
                } else if comp.blend.is_straight() {
                    Color::blend(Color::TRANSPARENT, px, comp.amount, comp.blend)
                } else {
                    continue;
                };
                surface.set(x, y, out);
            }
        }
    }

    pub(crate) fn times(&self) -> BTreeSet<Time> {
        let mut times = self.point1.times();
        times.extend(self.point2.times());
        times.extend(self.color.times());
        times
    }

    pub(crate) fn validate(&self) -> StrataResult<()> {
        self.point1.validate()?;
        self.point2.validate()?;
        self.color.validate()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layer/rectangle.rs"]
mod tests;
