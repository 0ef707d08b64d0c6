use crate::foundation::{
    core::{Point, Rect, Time},
    error::{StrataError, StrataResult},
};

fn default_frame_rate() -> f64 {
    24.0
}

fn default_resolution() -> f64 {
    // 72 dpi expressed in dots per meter.
    2834.645_669_291_338
}

/// Describes what to render: the pixel grid, the canvas-space window it covers,
/// and the canvas's time range.
///
/// `tl`/`br` may be inverted on either axis (for example y-up canvases); pixel
/// sizes are then negative and pixel `(0, 0)` still sits at `tl`.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RendDesc {
    pub width: u32,
    pub height: u32,
    pub tl: Point,
    pub br: Point,
    /// Canvas-space point held fixed when this canvas is zoomed inside a parent.
    #[serde(default)]
    pub focus: Point,
    #[serde(default = "default_frame_rate")]
    pub frame_rate: f64,
    #[serde(default)]
    pub time_start: Time,
    #[serde(default)]
    pub time_end: Time,
    /// Physical resolution, dots per unit, informational.
    #[serde(default = "default_resolution")]
    pub x_res: f64,
    #[serde(default = "default_resolution")]
    pub y_res: f64,
    #[serde(default)]
    pub pixel_aspect_locked: bool,
}

impl RendDesc {
    /// A `width` x `height` grid mapped one unit per pixel, `(0, 0)` top-left.
    pub fn from_size(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            tl: Point::ZERO,
            br: Point::new(f64::from(width), f64::from(height)),
            focus: Point::ZERO,
            frame_rate: default_frame_rate(),
            time_start: Time::ZERO,
            time_end: Time::ZERO,
            x_res: default_resolution(),
            y_res: default_resolution(),
            pixel_aspect_locked: false,
        }
    }

    pub fn with_window(mut self, tl: Point, br: Point) -> Self {
        self.tl = tl;
        self.br = br;
        self
    }

    pub fn with_focus(mut self, focus: Point) -> Self {
        self.focus = focus;
        self
    }

    pub fn with_time_range(mut self, start: Time, end: Time, frame_rate: f64) -> Self {
        self.time_start = start;
        self.time_end = end;
        self.frame_rate = frame_rate;
        self
    }

    pub fn validate(&self) -> StrataResult<()> {
        if !(self.tl.is_finite() && self.br.is_finite()) {
            return Err(StrataError::validation("render window corners must be finite"));
        }
        if self.tl.x == self.br.x || self.tl.y == self.br.y {
            return Err(StrataError::validation("render window must have nonzero area"));
        }
        if !(self.frame_rate.is_finite() && self.frame_rate > 0.0) {
            return Err(StrataError::validation("frame rate must be > 0"));
        }
        Ok(())
    }

    /// Canvas units per pixel along x (negative when the x axis is inverted).
    pub fn pw(&self) -> f64 {
        if self.width == 0 {
            return 0.0;
        }
        (self.br.x - self.tl.x) / f64::from(self.width)
    }

    pub fn ph(&self) -> f64 {
        if self.height == 0 {
            return 0.0;
        }
        (self.br.y - self.tl.y) / f64::from(self.height)
    }

    /// The normalized canvas-space window.
    pub fn rect(&self) -> Rect {
        Rect::from_points(self.tl, self.br)
    }

    /// Move the top-left corner, keeping the pixel grid size.
    pub fn set_tl(&mut self, tl: Point) {
        self.tl = tl;
    }

    /// Move the bottom-right corner, keeping the pixel grid size.
    pub fn set_br(&mut self, br: Point) {
        self.br = br;
    }

    pub fn clear_flags(&mut self) {
        self.pixel_aspect_locked = false;
    }

    pub fn set_pixel_aspect_locked(&mut self, locked: bool) {
        self.pixel_aspect_locked = locked;
    }

    /// Restrict the descriptor to the pixel rectangle `(x, y, w, h)` of its
    /// current grid. Pixel sizes are preserved.
    pub fn set_subwindow(&mut self, x: u32, y: u32, w: u32, h: u32) {
        let (pw, ph) = (self.pw(), self.ph());
        let tl = self.tl;
        self.tl = Point::new(tl.x + f64::from(x) * pw, tl.y + f64::from(y) * ph);
        self.br = Point::new(tl.x + f64::from(x + w) * pw, tl.y + f64::from(y + h) * ph);
        self.width = w;
        self.height = h;
    }

    /// Canvas-space center of pixel `(x, y)`.
    pub fn pixel_center(&self, x: u32, y: u32) -> Point {
        Point::new(
            self.tl.x + (f64::from(x) + 0.5) * self.pw(),
            self.tl.y + (f64::from(y) + 0.5) * self.ph(),
        )
    }

    pub fn frame_start(&self) -> i64 {
        self.time_start.round_to_frame(self.frame_rate)
    }

    /// Last frame, inclusive.
    pub fn frame_end(&self) -> i64 {
        self.time_end.round_to_frame(self.frame_rate)
    }

    /// Frames in `frame_start..=frame_end`; a collapsed range still has one frame.
    pub fn frame_count(&self) -> u32 {
        let n = self.frame_end() - self.frame_start() + 1;
        u32::try_from(n.max(1)).unwrap_or(u32::MAX)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/desc.rs"]
mod tests;
