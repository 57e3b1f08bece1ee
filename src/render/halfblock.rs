use crate::render::{Frame, Renderer};
use std::io::Write;

/// Paints two raster rows per terminal row with the upper-half-block glyph:
/// foreground color carries the top pixel, background the bottom.
pub struct HalfBlockRenderer {
    last_fg: Option<(u8, u8, u8)>,
    last_bg: Option<(u8, u8, u8)>,
}

impl HalfBlockRenderer {
    pub fn new() -> Self {
        Self {
            last_fg: None,
            last_bg: None,
        }
    }
}

impl Default for HalfBlockRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer for HalfBlockRenderer {
    fn name(&self) -> &'static str {
        "halfblock"
    }

    fn render(&mut self, frame: &Frame<'_>, out: &mut dyn Write) -> anyhow::Result<()> {
        let cols = frame.term_cols as usize;
        let visual_rows = frame.visual_rows as usize;
        let w = frame.buffer.width();
        let h = frame.buffer.height();

        if cols == 0 || visual_rows == 0 {
            return Ok(());
        }
        if w != cols || h != visual_rows.saturating_mul(2) {
            // Internal mismatch; avoid panics.
            return Ok(());
        }

        if frame.sync_updates {
            out.write_all(b"\x1b[?2026h")?;
        }

        // Home, reset, autowrap off while painting full-width rows.
        out.write_all(b"\x1b[H\x1b[0m\x1b[?7l")?;
        self.last_fg = None;
        self.last_bg = None;

        const HALF_BLOCK: char = '\u{2580}';

        for row in 0..visual_rows {
            let top_y = row * 2;
            let bot_y = top_y + 1;
            for x in 0..cols {
                let top = frame.buffer.pixel(x, top_y);
                let bot = frame.buffer.pixel(x, bot_y);
                let fg = (top[0], top[1], top[2]);
                let bg = (bot[0], bot[1], bot[2]);

                if self.last_fg != Some(fg) {
                    write!(out, "\x1b[38;2;{};{};{}m", fg.0, fg.1, fg.2)?;
                    self.last_fg = Some(fg);
                }
                if self.last_bg != Some(bg) {
                    write!(out, "\x1b[48;2;{};{};{}m", bg.0, bg.1, bg.2)?;
                    self.last_bg = Some(bg);
                }
                write!(out, "{HALF_BLOCK}")?;
            }
            out.write_all(b"\r\n")?;
        }

        // Caption line below the visual area.
        write!(out, "\x1b[{};1H\x1b[0m\x1b[2K", visual_rows + 1)?;
        let mut caption = frame.caption;
        if caption.len() > cols {
            caption = &caption[..cols];
        }
        write!(out, "{caption}")?;

        out.write_all(b"\x1b[?7h")?;
        if frame.sync_updates {
            out.write_all(b"\x1b[?2026l")?;
        }
        out.flush()?;
        Ok(())
    }
}
