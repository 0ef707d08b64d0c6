use crate::foundation::core::Color;

/// Alpha-compositing operator used to combine a layer with what lies behind it.
///
/// Every method takes the layer color `a` (source), the background `b`
/// (destination) and an `amount` (layer opacity) and works on straight colors.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum BlendMethod {
    /// Source over destination.
    #[default]
    Composite,
    /// Replace the destination, cross-fading by `amount`.
    Straight,
    /// Composite, but only where the destination already has alpha.
    Onto,
    /// Straight, but only where the destination already has alpha.
    StraightOnto,
    /// Destination over source.
    Behind,
    Screen,
    Multiply,
    Divide,
    Add,
    Subtract,
    Difference,
    Brighten,
    Darken,
    /// Cut the source's alpha out of the destination.
    AlphaOver,
}

impl BlendMethod {
    pub const ALL: [Self; 14] = [
        Self::Composite,
        Self::Straight,
        Self::Onto,
        Self::StraightOnto,
        Self::Behind,
        Self::Screen,
        Self::Multiply,
        Self::Divide,
        Self::Add,
        Self::Subtract,
        Self::Difference,
        Self::Brighten,
        Self::Darken,
        Self::AlphaOver,
    ];

    /// Methods that never add alpha where the destination is transparent.
    pub fn is_onto(self) -> bool {
        matches!(
            self,
            Self::Onto
                | Self::StraightOnto
                | Self::Screen
                | Self::Multiply
                | Self::Divide
                | Self::Add
                | Self::Subtract
                | Self::Difference
                | Self::Brighten
                | Self::Darken
        )
    }

    /// Methods that overwrite the destination even where the source is transparent.
    pub fn is_straight(self) -> bool {
        matches!(self, Self::Straight | Self::StraightOnto)
    }

    pub fn blend(self, a: Color, b: Color, amount: f32) -> Color {
        match self {
            Self::Composite => composite(a, b, amount),
            Self::Straight => straight(a, b, amount),
            Self::Onto => composite(a.with_alpha(a.a * b.a), b, amount),
            Self::StraightOnto => straight(a.with_alpha(a.a * b.a), b, amount),
            Self::Behind => composite(b, a.with_alpha(a.a * amount), 1.0),
            Self::Screen => {
                let s = Color::new(
                    1.0 - (1.0 - a.r) * (1.0 - b.r),
                    1.0 - (1.0 - a.g) * (1.0 - b.g),
                    1.0 - (1.0 - a.b) * (1.0 - b.b),
                    a.a,
                );
                composite(s.with_alpha(s.a * b.a), b, amount)
            }
            Self::Multiply => {
                let k = amount * a.a;
                map_rgb(b, |bc, ac| (bc * ac - bc) * k + bc, a)
            }
            Self::Divide => {
                let k = amount * a.a;
                map_rgb(
                    b,
                    |bc, ac| {
                        let q = if ac.abs() <= Color::ALPHA_EPSILON {
                            bc / Color::ALPHA_EPSILON
                        } else {
                            bc / ac
                        };
                        (q - bc) * k + bc
                    },
                    a,
                )
            }
            Self::Add => {
                let k = amount * a.a;
                map_rgb(b, |bc, ac| bc + ac * k, a)
            }
            Self::Subtract => {
                let k = amount * a.a;
                map_rgb(b, |bc, ac| bc - ac * k, a)
            }
            Self::Difference => {
                let k = amount * a.a;
                map_rgb(b, |bc, ac| (bc - ac * k).abs(), a)
            }
            Self::Brighten => {
                let k = amount * a.a;
                map_rgb(b, |bc, ac| bc.max(ac * k), a)
            }
            Self::Darken => {
                let k = amount * a.a;
                map_rgb(b, |bc, ac| bc.min((ac - 1.0) * k + 1.0), a)
            }
            Self::AlphaOver => straight(b.with_alpha((1.0 - a.a) * b.a), b, amount),
        }
    }
}

impl Color {
    /// Blend `a` over `b` with `method` at opacity `amount`.
    pub fn blend(a: Color, b: Color, amount: f32, method: BlendMethod) -> Color {
        method.blend(a, b, amount)
    }
}

fn composite(a: Color, b: Color, amount: f32) -> Color {
    let a_src = a.a * amount;
    if a_src.abs() <= Color::ALPHA_EPSILON {
        return b;
    }
    let a_dst = b.a * (1.0 - a_src);
    let out_a = a_src + a_dst;
    if out_a.abs() <= Color::ALPHA_EPSILON {
        return Color::TRANSPARENT;
    }
    Color::new(
        (a.r * a_src + b.r * a_dst) / out_a,
        (a.g * a_src + b.g * a_dst) / out_a,
        (a.b * a_src + b.b * a_dst) / out_a,
        out_a,
    )
}

fn straight(a: Color, b: Color, amount: f32) -> Color {
    if amount == 1.0 {
        return a;
    }
    let a_src = a.a * amount;
    let a_dst = b.a * (1.0 - amount);
    let out_a = a_src + a_dst;
    if out_a.abs() <= Color::ALPHA_EPSILON {
        return Color::TRANSPARENT;
    }
    Color::new(
        (a.r * a_src + b.r * a_dst) / out_a,
        (a.g * a_src + b.g * a_dst) / out_a,
        (a.b * a_src + b.b * a_dst) / out_a,
        out_a,
    )
}

fn map_rgb(b: Color, f: impl Fn(f32, f32) -> f32, a: Color) -> Color {
    Color::new(f(b.r, a.r), f(b.g, a.g), f(b.b, a.b), b.a)
}

#[cfg(test)]
#[path = "../../tests/unit/composite/blend.rs"]
mod tests;
