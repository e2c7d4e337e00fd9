//! Framebuffer and style types for terminal rendering.

/// 24-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Minimal per-cell styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellStyle {
    pub fg: Rgb,
    pub bg: Rgb,
    pub bold: bool,
    pub dim: bool,
}

impl CellStyle {
    pub const fn new(fg: Rgb, bg: Rgb) -> Self {
        Self {
            fg,
            bg,
            bold: false,
            dim: false,
        }
    }

    pub const fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub const fn dim(mut self) -> Self {
        self.dim = true;
        self
    }

    pub const fn cell(self, ch: char) -> Cell {
        Cell { ch, style: self }
    }
}

impl Default for CellStyle {
    fn default() -> Self {
        Self::new(Rgb::new(200, 200, 200), Rgb::new(0, 0, 0))
    }
}

/// A single terminal cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub ch: char,
    pub style: CellStyle,
}

impl Default for Cell {
    fn default() -> Self {
        CellStyle::default().cell(' ')
    }
}

/// Box-drawing glyphs for [`FrameBuffer::draw_frame`].
const FRAME_GLYPHS: [char; 6] = ['┌', '┐', '└', '┘', '─', '│'];

/// 2D framebuffer of styled character cells. Writes outside the buffer are clipped.
#[derive(Debug, PartialEq, Eq)]
pub struct FrameBuffer {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
}

impl Clone for FrameBuffer {
    fn clone(&self) -> Self {
        Self {
            width: self.width,
            height: self.height,
            cells: self.cells.clone(),
        }
    }

    /// Copies into the existing cell storage; no allocation when sizes match.
    fn clone_from(&mut self, source: &Self) {
        self.width = source.width;
        self.height = source.height;
        self.cells.clone_from(&source.cells);
    }
}

impl FrameBuffer {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::default(); usize::from(width) * usize::from(height)],
        }
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    /// Change dimensions, keeping the allocation when it is large enough.
    pub fn resize(&mut self, width: u16, height: u16) {
        if (self.width, self.height) == (width, height) {
            return;
        }
        self.width = width;
        self.height = height;
        self.cells
            .resize(usize::from(width) * usize::from(height), Cell::default());
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    #[inline(always)]
    fn idx(&self, x: u16, y: u16) -> Option<usize> {
        (x < self.width && y < self.height)
            .then(|| usize::from(y) * usize::from(self.width) + usize::from(x))
    }

    pub fn get(&self, x: u16, y: u16) -> Option<Cell> {
        self.idx(x, y).map(|i| self.cells[i])
    }

    pub fn set(&mut self, x: u16, y: u16, cell: Cell) {
        if let Some(i) = self.idx(x, y) {
            self.cells[i] = cell;
        }
    }

    pub fn clear(&mut self, cell: Cell) {
        self.cells.fill(cell);
    }

    pub fn put_char(&mut self, x: u16, y: u16, ch: char, style: CellStyle) {
        self.set(x, y, style.cell(ch));
    }

    /// Write `s` left to right from `(x, y)`; returns the column after the last glyph.
    pub fn put_str(&mut self, x: u16, y: u16, s: &str, style: CellStyle) -> u16 {
        let mut cx = x;
        for ch in s.chars() {
            if cx >= self.width {
                break;
            }
            self.put_char(cx, y, ch, style);
            cx += 1;
        }
        cx
    }

    /// Write a decimal number without allocating.
    pub fn put_u32(&mut self, x: u16, y: u16, value: u32, style: CellStyle) -> u16 {
        let mut digits = [0u8; 10];
        let mut len = 0;
        let mut v = value;
        loop {
            digits[len] = b'0' + (v % 10) as u8;
            len += 1;
            v /= 10;
            if v == 0 {
                break;
            }
        }
        let mut cx = x;
        for &d in digits[..len].iter().rev() {
            self.put_char(cx, y, char::from(d), style);
            cx = cx.saturating_add(1);
        }
        cx
    }

    /// Write `s` centered on column `center_x`.
    pub fn put_str_centered(&mut self, center_x: u16, y: u16, s: &str, style: CellStyle) {
        let half = (s.chars().count() / 2) as u16;
        self.put_str(center_x.saturating_sub(half), y, s, style);
    }

    pub fn fill_rect(&mut self, x: u16, y: u16, w: u16, h: u16, ch: char, style: CellStyle) {
        for dy in 0..h {
            for dx in 0..w {
                self.put_char(x.saturating_add(dx), y.saturating_add(dy), ch, style);
            }
        }
    }

    /// Outline a `w` x `h` rectangle with box-drawing glyphs. Too-small rectangles are skipped.
    pub fn draw_frame(&mut self, x: u16, y: u16, w: u16, h: u16, style: CellStyle) {
        if w < 2 || h < 2 {
            return;
        }
        let [tl, tr, bl, br, horiz, vert] = FRAME_GLYPHS;
        let (right, bottom) = (x + w - 1, y + h - 1);

        for cx in x + 1..right {
            self.put_char(cx, y, horiz, style);
            self.put_char(cx, bottom, horiz, style);
        }
        for cy in y + 1..bottom {
            self.put_char(x, cy, vert, style);
            self.put_char(right, cy, vert, style);
        }
        self.put_char(x, y, tl, style);
        self.put_char(right, y, tr, style);
        self.put_char(x, bottom, bl, style);
        self.put_char(right, bottom, br, style);
    }

    /// Glyphs of one row, for tests and debugging.
    pub fn row_text(&self, y: u16) -> String {
        (0..self.width)
            .filter_map(|x| self.get(x, y))
            .map(|c| c.ch)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clone_from_reuses_cell_storage() {
        let mut src = FrameBuffer::new(10, 4);
        src.put_str(0, 0, "next", CellStyle::default());
        let mut dst = FrameBuffer::new(10, 4);
        let storage = dst.cells().as_ptr();

        dst.clone_from(&src);
        assert_eq!(dst, src);
        assert_eq!(dst.cells().as_ptr(), storage);
    }

    #[test]
    fn writes_outside_are_clipped() {
        let mut fb = FrameBuffer::new(4, 2);
        fb.put_str(2, 0, "abcdef", CellStyle::default());
        fb.put_char(9, 9, 'x', CellStyle::default());
        assert_eq!(fb.row_text(0), "  ab");
        assert_eq!(fb.row_text(1), "    ");
    }

    #[test]
    fn put_u32_writes_decimal() {
        let mut fb = FrameBuffer::new(12, 1);
        let end = fb.put_u32(1, 0, 4_294_967_295, CellStyle::default());
        assert_eq!(end, 11);
        assert_eq!(fb.row_text(0), " 4294967295 ");

        let mut fb = FrameBuffer::new(3, 1);
        fb.put_u32(0, 0, 0, CellStyle::default());
        assert_eq!(fb.row_text(0), "0  ");
    }

    #[test]
    fn draw_frame_outlines_rectangle() {
        let mut fb = FrameBuffer::new(4, 3);
        fb.draw_frame(0, 0, 4, 3, CellStyle::default());
        assert_eq!(fb.row_text(0), "┌──┐");
        assert_eq!(fb.row_text(1), "│  │");
        assert_eq!(fb.row_text(2), "└──┘");
    }

    #[test]
    fn centered_text() {
        let mut fb = FrameBuffer::new(9, 1);
        fb.put_str_centered(4, 0, "abc", CellStyle::default());
        assert_eq!(fb.row_text(0), "   abc   ");
    }

    #[test]
    fn resize_resets_dimensions() {
        let mut fb = FrameBuffer::new(2, 2);
        fb.resize(3, 1);
        assert_eq!((fb.width(), fb.height()), (3, 1));
        assert_eq!(fb.cells().len(), 3);
    }
}
