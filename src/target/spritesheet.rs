use crate::{
    composite::surface::Surface,
    foundation::core::Color,
    foundation::error::{StrataError, StrataResult},
    render::{desc::RendDesc, progress::ProgressCallback},
    target::Target,
};

/// Largest sheet we will allocate.
pub const MAX_SHEET_PIXELS: u64 = 5000 * 2000;

/// Order in which frames fill the sheet.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SheetDirection {
    /// Left to right, then the next row.
    #[default]
    Horizontal,
    /// Top to bottom, then the next column.
    Vertical,
}

/// Layout of a spritesheet. Zero `columns` or `rows` means one row holding
/// every frame.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SheetParams {
    #[serde(default)]
    pub columns: u32,
    #[serde(default)]
    pub rows: u32,
    /// Pixel offset of the first frame inside the sheet.
    #[serde(default)]
    pub offset_x: u32,
    #[serde(default)]
    pub offset_y: u32,
    #[serde(default)]
    pub direction: SheetDirection,
}

/// Lays frames out on a grid inside one image.
#[derive(Debug)]
pub struct SpritesheetTarget {
    params: SheetParams,
    sheet: Surface,
    frame_w: u32,
    frame_h: u32,
    col: u32,
    row: u32,
}

impl SpritesheetTarget {
    pub fn new(params: SheetParams) -> Self {
        Self {
            params,
            sheet: Surface::default(),
            frame_w: 0,
            frame_h: 0,
            col: 0,
            row: 0,
        }
    }

    /// Layout actually in use, after defaults were applied.
    pub fn params(&self) -> &SheetParams {
        &self.params
    }

    pub fn sheet(&self) -> &Surface {
        &self.sheet
    }

    pub fn into_sheet(self) -> Surface {
        self.sheet
    }
}

impl Target for SpritesheetTarget {
    fn set_rend_desc(&mut self, desc: &RendDesc) -> StrataResult<()> {
        let frames = desc.frame_count();
        let p = &mut self.params;
        if p.columns == 0 || p.rows == 0 {
            p.columns = frames;
            p.rows = 1;
            p.direction = SheetDirection::Horizontal;
        }
        if u64::from(p.columns) * u64::from(p.rows) < u64::from(frames) {
            return Err(StrataError::target(format!(
                "{}x{} sheet cannot hold {frames} frames",
                p.columns, p.rows
            )));
        }

        let sheet_w = u64::from(p.columns) * u64::from(desc.width) + u64::from(p.offset_x);
        let sheet_h = u64::from(p.rows) * u64::from(desc.height) + u64::from(p.offset_y);
        if sheet_w.checked_mul(sheet_h).is_none_or(|px| px > MAX_SHEET_PIXELS) {
            return Err(StrataError::target(format!(
                "{sheet_w}x{sheet_h} sheet exceeds {MAX_SHEET_PIXELS} pixels"
            )));
        }
        tracing::debug!(sheet_w, sheet_h, frames, "allocating spritesheet");
        self.sheet.set_wh(sheet_w as u32, sheet_h as u32)?;
        self.frame_w = desc.width;
        self.frame_h = desc.height;
        self.col = 0;
        self.row = 0;
        Ok(())
    }

    fn start_frame(&mut self, _cb: &mut dyn ProgressCallback) -> StrataResult<bool> {
        if self.col >= self.params.columns || self.row >= self.params.rows {
            return Err(StrataError::target("spritesheet is full"));
        }
        Ok(true)
    }

    fn start_scanline(&mut self, y: u32) -> StrataResult<&mut [Color]> {
        if y >= self.frame_h {
            return Err(StrataError::target(format!(
                "scanline {y} out of range for frame height {}",
                self.frame_h
            )));
        }
        let x0 = (self.params.offset_x + self.col * self.frame_w) as usize;
        let sy = self.params.offset_y + self.row * self.frame_h + y;
        let w = self.frame_w as usize;
        Ok(&mut self.sheet.row_mut(sy)[x0..x0 + w])
    }

    fn end_scanline(&mut self) -> StrataResult<()> {
        Ok(())
    }

    fn end_frame(&mut self) -> StrataResult<()> {
        match self.params.direction {
            SheetDirection::Horizontal => {
                self.col += 1;
                if self.col >= self.params.columns {
                    self.col = 0;
                    self.row += 1;
                }
            }
            SheetDirection::Vertical => {
                self.row += 1;
                if self.row >= self.params.rows {
                    self.row = 0;
                    self.col += 1;
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/target/spritesheet.rs"]
mod tests;
