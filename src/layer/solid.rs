use std::collections::BTreeSet;

use crate::{
    animation::anim::Animated,
    composite::surface::Surface,
    foundation::core::{Color, Time},
    foundation::error::StrataResult,
    layer::{
        layer::Composite,
        params::{ParamDesc, ParamEntry, ParamValue},
    },
};

/// Fills the whole plane with one color.
#[derive(Clone, Debug, PartialEq)]
pub struct SolidColor {
    color: Animated<Color>,
}

impl Default for SolidColor {
    fn default() -> Self {
        Self::new(Color::BLACK)
    }
}

pub(crate) static SOLID_PARAMS: [ParamEntry<SolidColor>; 1] = [ParamEntry {
    desc: ParamDesc {
        name: "color",
        local_name: "Color",
        description: "Fill color",
    },
    get: |s, t| ParamValue::Color(s.color.sample(t)),
    set: Some(|s, v| {
        s.color = Animated::Constant(v.into_color("color")?);
        Ok(())
    }),
}];

impl SolidColor {
    pub fn new(color: impl Into<Animated<Color>>) -> Self {
        Self {
            color: color.into(),
        }
    }

    pub fn color(&self) -> &Animated<Color> {
        &self.color
    }

    pub fn set_color(&mut self, color: impl Into<Animated<Color>>) {
        self.color = color.into();
    }

    pub(crate) fn color_at(&self, time: Time) -> Color {
        self.color.sample(time)
    }

    pub(crate) fn paint(&self, surface: &mut Surface, comp: &Composite) {
        let color = self.color_at(comp.time);
        if comp.is_solid_color() {
            surface.fill(color);
            return;
        }
        for y in 0..surface.height() {
            for px in surface.row_mut(y) {
                *px = Color::blend(color, *px, comp.amount, comp.blend);
            }
        }
    }

    pub(crate) fn times(&self) -> BTreeSet<Time> {
        self.color.times()
    }

    pub(crate) fn validate(&self) -> StrataResult<()> {
        self.color.validate()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layer/solid.rs"]
mod tests;
