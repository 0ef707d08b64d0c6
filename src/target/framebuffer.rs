use crate::{
    composite::surface::Surface,
    foundation::core::Color,
    foundation::error::{StrataError, StrataResult},
    render::{desc::RendDesc, progress::ProgressCallback},
    target::Target,
};

/// Keeps every frame in memory.
#[derive(Debug, Default)]
pub struct FrameBufferTarget {
    width: u32,
    height: u32,
    frames: Vec<Surface>,
    finished: bool,
}

impl FrameBufferTarget {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frames(&self) -> &[Surface] {
        &self.frames
    }

    pub fn into_frames(self) -> Vec<Surface> {
        self.frames
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

impl Target for FrameBufferTarget {
    fn set_rend_desc(&mut self, desc: &RendDesc) -> StrataResult<()> {
        self.width = desc.width;
        self.height = desc.height;
        self.frames.clear();
        self.finished = false;
        Ok(())
    }

    fn start_frame(&mut self, _cb: &mut dyn ProgressCallback) -> StrataResult<bool> {
        self.frames.push(Surface::new(self.width, self.height)?);
        Ok(true)
    }

    fn start_scanline(&mut self, y: u32) -> StrataResult<&mut [Color]> {
        let frame = self
            .frames
            .last_mut()
            .ok_or_else(|| StrataError::target("scanline requested outside a frame"))?;
        if y >= frame.height() {
            return Err(StrataError::target(format!(
                "scanline {y} out of range for height {}",
                frame.height()
            )));
        }
        Ok(frame.row_mut(y))
    }

    fn end_scanline(&mut self) -> StrataResult<()> {
        Ok(())
    }

    fn end_frame(&mut self) -> StrataResult<()> {
        Ok(())
    }

    fn finish(&mut self) -> StrataResult<()> {
        self.finished = true;
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/target/framebuffer.rs"]
mod tests;
