//! Scanline consumers for finished frames.
//!
//! A render drives a target as: `set_rend_desc`, then per frame `start_frame`,
//! `start_scanline`/`end_scanline` for each row top to bottom, `end_frame`,
//! and finally `finish`.

pub(crate) mod framebuffer;
pub(crate) mod spritesheet;

use crate::{
    foundation::core::Color, foundation::error::StrataResult, render::desc::RendDesc,
    render::progress::ProgressCallback,
};

pub use framebuffer::FrameBufferTarget;
pub use spritesheet::{SheetDirection, SheetParams, SpritesheetTarget};

pub trait Target {
    /// Called once before the first frame with the descriptor every frame uses.
    fn set_rend_desc(&mut self, desc: &RendDesc) -> StrataResult<()>;

    /// Returns false to stop the render before this frame.
    fn start_frame(&mut self, cb: &mut dyn ProgressCallback) -> StrataResult<bool>;

    /// Buffer for row `y` of the current frame, exactly one frame width long.
    fn start_scanline(&mut self, y: u32) -> StrataResult<&mut [Color]>;

    fn end_scanline(&mut self) -> StrataResult<()>;

    fn end_frame(&mut self) -> StrataResult<()>;

    fn finish(&mut self) -> StrataResult<()> {
        Ok(())
    }
}
