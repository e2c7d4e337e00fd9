//! TerminalRenderer: presents framebuffers on a real terminal.
//!
//! Frames are encoded into a byte buffer as crossterm commands and written in
//! one go. After the first frame only changed runs of cells are re-sent.

use std::io::{self, Write};

use anyhow::Result;

use crossterm::{
    cursor,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal, QueueableCommand,
};

use crate::fb::{CellStyle, FrameBuffer, Rgb};

pub struct TerminalRenderer<W: Write = io::Stdout> {
    out: W,
    /// Last frame presented; `None` forces a full redraw.
    shown: Option<FrameBuffer>,
    buf: Vec<u8>,
    active: bool,
}

impl TerminalRenderer<io::Stdout> {
    pub fn new() -> Self {
        Self::with_writer(io::stdout())
    }
}

impl Default for TerminalRenderer<io::Stdout> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write> TerminalRenderer<W> {
    pub fn with_writer(out: W) -> Self {
        Self {
            out,
            shown: None,
            buf: Vec::with_capacity(64 * 1024),
            active: false,
        }
    }

    /// Switch to raw mode on the alternate screen.
    pub fn enter(&mut self) -> Result<()> {
        terminal::enable_raw_mode()?;
        self.active = true;
        self.buf.clear();
        self.buf.queue(terminal::EnterAlternateScreen)?;
        self.buf.queue(cursor::Hide)?;
        self.buf.queue(terminal::DisableLineWrap)?;
        self.flush_buf()
    }

    /// Restore the terminal. Safe to call more than once.
    pub fn exit(&mut self) -> Result<()> {
        if !self.active {
            return Ok(());
        }
        self.active = false;
        self.buf.clear();
        self.buf.queue(ResetColor)?;
        self.buf.extend_from_slice(SGR_RESET);
        self.buf.queue(terminal::EnableLineWrap)?;
        self.buf.queue(cursor::Show)?;
        self.buf.queue(terminal::LeaveAlternateScreen)?;
        self.flush_buf()?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    /// Force the next draw to be a full redraw, e.g. after a resize.
    pub fn invalidate(&mut self) {
        self.shown = None;
    }

    /// Present `fb`, sending only what changed since the previous frame.
    pub fn draw(&mut self, fb: &FrameBuffer) -> Result<()> {
        self.buf.clear();
        encode_frame_into(self.shown.as_ref(), fb, &mut self.buf)?;
        self.flush_buf()?;

        match self.shown.as_mut() {
            Some(shown) => shown.clone_from(fb),
            None => self.shown = Some(fb.clone()),
        }
        Ok(())
    }

    fn flush_buf(&mut self) -> Result<()> {
        if self.buf.is_empty() {
            return Ok(());
        }
        self.out.write_all(&self.buf)?;
        self.out.flush()?;
        Ok(())
    }
}

/// Encode the commands that turn `prev` into `next` on screen.
///
/// With no previous frame, or one of another size, the screen is cleared and
/// redrawn in full. Otherwise only changed runs are emitted; identical frames
/// encode to nothing.
pub fn encode_frame_into(
    prev: Option<&FrameBuffer>,
    next: &FrameBuffer,
    out: &mut Vec<u8>,
) -> Result<()> {
    let mut pen = Pen::default();

    match prev {
        Some(prev) if prev.width() == next.width() && prev.height() == next.height() => {
            for y in 0..next.height() {
                for (x, len) in changed_runs(prev, next, y) {
                    pen.print_run(out, next, x, y, len)?;
                }
            }
        }
        _ => {
            out.queue(terminal::Clear(terminal::ClearType::All))?;
            for y in 0..next.height() {
                pen.print_run(out, next, 0, y, next.width())?;
            }
        }
    }

    if pen.touched {
        out.queue(ResetColor)?;
        out.extend_from_slice(SGR_RESET);
    }
    Ok(())
}

/// Tracks the style last sent so unchanged styles are not re-emitted.
#[derive(Default)]
struct Pen {
    style: Option<CellStyle>,
    touched: bool,
}

impl Pen {
    fn print_run(
        &mut self,
        out: &mut Vec<u8>,
        fb: &FrameBuffer,
        x: u16,
        y: u16,
        len: u16,
    ) -> Result<()> {
        if len == 0 {
            return Ok(());
        }
        self.touched = true;
        out.queue(cursor::MoveTo(x, y))?;
        for cx in x..x + len {
            let cell = fb.get(cx, y).unwrap_or_default();
            if self.style != Some(cell.style) {
                apply_style_into(out, cell.style)?;
                self.style = Some(cell.style);
            }
            out.queue(Print(cell.ch))?;
        }
        Ok(())
    }
}

/// Maximal runs `(x, len)` of cells on row `y` that differ between frames.
fn changed_runs<'a>(
    prev: &'a FrameBuffer,
    next: &'a FrameBuffer,
    y: u16,
) -> impl Iterator<Item = (u16, u16)> + 'a {
    let w = next.width();
    let differs = move |x: u16| prev.get(x, y) != next.get(x, y);
    let mut x = 0;
    std::iter::from_fn(move || {
        while x < w && !differs(x) {
            x += 1;
        }
        if x >= w {
            return None;
        }
        let start = x;
        while x < w && differs(x) {
            x += 1;
        }
        Some((start, x - start))
    })
}

// Attribute escapes are written as raw SGR sequences; crossterm's
// `SetAttribute` formats through a temporary `String`.
const SGR_RESET: &[u8] = b"\x1b[0m";
const SGR_BOLD: &[u8] = b"\x1b[1m";
const SGR_DIM: &[u8] = b"\x1b[2m";

fn apply_style_into(out: &mut Vec<u8>, style: CellStyle) -> Result<()> {
    out.extend_from_slice(SGR_RESET);
    out.queue(SetForegroundColor(rgb_to_color(style.fg)))?;
    out.queue(SetBackgroundColor(rgb_to_color(style.bg)))?;
    if style.bold {
        out.extend_from_slice(SGR_BOLD);
    }
    if style.dim {
        out.extend_from_slice(SGR_DIM);
    }
    Ok(())
}

fn rgb_to_color(rgb: Rgb) -> Color {
    Color::Rgb {
        r: rgb.r,
        g: rgb.g,
        b: rgb.b,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn changed_runs_coalesce_adjacent_cells() {
        let style = CellStyle::default();
        let a = FrameBuffer::new(6, 1);
        let mut b = FrameBuffer::new(6, 1);

        for x in 1..=3 {
            b.put_char(x, 0, 'X', style);
        }
        b.put_char(5, 0, 'Y', style);

        let runs: Vec<_> = changed_runs(&a, &b, 0).collect();
        assert_eq!(runs, vec![(1, 3), (5, 1)]);
    }

    #[test]
    fn identical_frames_encode_to_nothing() {
        let mut fb = FrameBuffer::new(4, 2);
        fb.put_str(0, 0, "ab", CellStyle::default());
        let mut out = Vec::new();
        encode_frame_into(Some(&fb.clone()), &fb, &mut out).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn first_frame_is_full_redraw() {
        let mut fb = FrameBuffer::new(3, 1);
        fb.put_str(0, 0, "abc", CellStyle::default());
        let mut out = Vec::new();
        encode_frame_into(None, &fb, &mut out).unwrap();
        let text = String::from_utf8_lossy(&out);
        assert!(text.contains("abc"));
    }

    #[test]
    fn diff_sends_only_changed_glyphs() {
        let style = CellStyle::default();
        let mut prev = FrameBuffer::new(8, 1);
        prev.put_str(0, 0, "abcdefgh", style);
        let mut next = prev.clone();
        next.put_char(6, 0, 'Z', style);

        let mut out = Vec::new();
        encode_frame_into(Some(&prev), &next, &mut out).unwrap();
        let text = String::from_utf8_lossy(&out);
        assert!(text.contains('Z'));
        assert!(!text.contains("abc"));
    }

    #[test]
    fn style_attributes_are_plain_sgr() {
        let style = CellStyle::default().bold().dim();
        let mut fb = FrameBuffer::new(1, 1);
        fb.put_char(0, 0, 'x', style);

        let mut out = Vec::new();
        encode_frame_into(None, &fb, &mut out).unwrap();
        let text = String::from_utf8_lossy(&out);
        assert!(text.contains("\x1b[0m"));
        assert!(text.contains("\x1b[1m"));
        assert!(text.contains("\x1b[2m"));
        assert!(text.ends_with("\x1b[0m"));
    }

    #[test]
    fn draw_reuses_last_frame_storage() {
        let mut renderer = TerminalRenderer::with_writer(Vec::new());
        let mut fb = FrameBuffer::new(4, 2);
        renderer.draw(&fb).unwrap();
        let storage = renderer.shown.as_ref().map(|f| f.cells().as_ptr());

        fb.put_str(0, 1, "ok", CellStyle::default());
        renderer.draw(&fb).unwrap();
        assert_eq!(renderer.shown.as_ref().map(|f| f.cells().as_ptr()), storage);
        assert_eq!(renderer.shown.as_ref(), Some(&fb));
    }

    #[test]
    fn draw_to_writer_tracks_previous_frame() {
        let mut renderer = TerminalRenderer::with_writer(Vec::new());
        let mut fb = FrameBuffer::new(2, 1);
        fb.put_str(0, 0, "hi", CellStyle::default());

        renderer.draw(&fb).unwrap();
        let first = renderer.out.len();
        assert!(first > 0);

        renderer.draw(&fb).unwrap();
        assert_eq!(renderer.out.len(), first);

        renderer.invalidate();
        renderer.draw(&fb).unwrap();
        assert!(renderer.out.len() > first);
    }
}
