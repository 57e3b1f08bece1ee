mod halfblock;

pub use halfblock::HalfBlockRenderer;

use std::io::Write;

use crate::raster::RasterBuffer;

/// One terminal frame: the raster to paint plus a caption line below it.
pub struct Frame<'a> {
    pub term_cols: u16,
    pub visual_rows: u16,
    pub buffer: &'a RasterBuffer,
    pub caption: &'a str,
    pub sync_updates: bool,
}

pub trait Renderer {
    fn name(&self) -> &'static str;
    fn render(&mut self, frame: &Frame<'_>, out: &mut dyn Write) -> anyhow::Result<()>;
}
