use crate::{
    composite::blend::BlendMethod,
    foundation::core::Color,
    foundation::error::{StrataError, StrataResult},
};

/// Largest surface we are willing to allocate, in pixels.
pub const MAX_SURFACE_PIXELS: u64 = 1 << 28;

/// A 2D grid of straight [`Color`] values, row-major, origin top-left.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Surface {
    width: u32,
    height: u32,
    data: Vec<Color>,
}

impl Surface {
    /// A transparent surface of the given size.
    pub fn new(width: u32, height: u32) -> StrataResult<Self> {
        let mut s = Self::default();
        s.set_wh(width, height)?;
        Ok(s)
    }

    /// Resize to `width` x `height`. Contents become transparent.
    pub fn set_wh(&mut self, width: u32, height: u32) -> StrataResult<()> {
        let len = u64::from(width) * u64::from(height);
        if len > MAX_SURFACE_PIXELS {
            return Err(StrataError::render(format!(
                "surface {width}x{height} exceeds {MAX_SURFACE_PIXELS} pixels"
            )));
        }
        self.width = width;
        self.height = height;
        self.data.clear();
        self.data.resize(len as usize, Color::TRANSPARENT);
        Ok(())
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn clear(&mut self) {
        self.fill(Color::TRANSPARENT);
    }

    pub fn fill(&mut self, color: Color) {
        self.data.fill(color);
    }

    pub fn pixels(&self) -> &[Color] {
        &self.data
    }

    pub fn get(&self, x: u32, y: u32) -> Option<Color> {
        self.index(x, y).map(|i| self.data[i])
    }

    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        if let Some(i) = self.index(x, y) {
            self.data[i] = color;
        }
    }

    pub fn row(&self, y: u32) -> &[Color] {
        let w = self.width as usize;
        let start = (y as usize) * w;
        self.data.get(start..start + w).unwrap_or(&[])
    }

    pub fn row_mut(&mut self, y: u32) -> &mut [Color] {
        let w = self.width as usize;
        let start = (y as usize) * w;
        self.data.get_mut(start..start + w).unwrap_or(&mut [])
    }

    /// A pen positioned at `(x, y)`; may lie outside the surface.
    pub fn get_pen(&mut self, x: i64, y: i64) -> AlphaPen<'_> {
        AlphaPen {
            target: self,
            x,
            y,
            alpha: 1.0,
            blend: BlendMethod::Composite,
        }
    }

    /// Composite this surface onto the pen's target at the pen position, using the
    /// pen's alpha and blend method. Pixels falling outside the target are dropped.
    pub fn blit_to(&self, pen: &mut AlphaPen<'_>) {
        for sy in 0..self.height {
            let ty = pen.y + i64::from(sy);
            if ty < 0 || ty >= i64::from(pen.target.height) {
                continue;
            }
            for (sx, &src) in self.row(sy).iter().enumerate() {
                pen.put_at(sx as i64, i64::from(sy), src);
            }
        }
    }

    /// Composite every pixel over an opaque-or-not background color.
    pub fn flatten_onto(&mut self, background: Color) {
        for px in &mut self.data {
            *px = Color::blend(*px, background, 1.0, BlendMethod::Composite);
        }
    }

    /// Straight-alpha RGBA8 bytes, row-major.
    pub fn to_rgba8(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.data.len() * 4);
        for px in &self.data {
            out.extend_from_slice(&px.to_rgba8());
        }
        out
    }

    fn index(&self, x: u32, y: u32) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some((y as usize) * (self.width as usize) + (x as usize))
    }
}

/// A positioned writer into a [`Surface`] that blends instead of overwriting.
#[derive(Debug)]
pub struct AlphaPen<'a> {
    target: &'a mut Surface,
    x: i64,
    y: i64,
    alpha: f32,
    blend: BlendMethod,
}

impl AlphaPen<'_> {
    pub fn set_alpha(&mut self, alpha: f32) {
        self.alpha = alpha;
    }

    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    pub fn set_blend_method(&mut self, blend: BlendMethod) {
        self.blend = blend;
    }

    pub fn blend_method(&self) -> BlendMethod {
        self.blend
    }

    pub fn position(&self) -> (i64, i64) {
        (self.x, self.y)
    }

    /// Blend `color` into the target at pen-relative `(dx, dy)`.
    pub fn put_at(&mut self, dx: i64, dy: i64, color: Color) {
        let (tx, ty) = (self.x + dx, self.y + dy);
        let (Ok(tx), Ok(ty)) = (u32::try_from(tx), u32::try_from(ty)) else {
            return;
        };
        if let Some(dst) = self.target.get(tx, ty) {
            self.target
                .set(tx, ty, Color::blend(color, dst, self.alpha, self.blend));
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/composite/surface.rs"]
mod tests;
