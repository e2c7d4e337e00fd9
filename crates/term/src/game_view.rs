//! GameView: maps a [`GameSnapshot`] into a terminal framebuffer.
//!
//! This module is pure (no I/O). It can be unit-tested.

use crate::core::{GameSnapshot, Pos};
use crate::fb::{CellStyle, FrameBuffer, Rgb};
use crate::types::{Lifecycle, PieceKind, BOARD_HEIGHT, BOARD_WIDTH};

/// Terminal viewport dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

/// Cells per side of the next-piece preview box.
const PREVIEW_CELLS: u16 = 4;
/// Columns between the board frame and the side panel.
const PANEL_GAP: u16 = 2;
/// Widest side-panel line.
const PANEL_W: u16 = 18;

const PLAYFIELD_BG: Rgb = Rgb::new(20, 20, 20);
const TEXT: CellStyle = CellStyle::new(Rgb::new(200, 200, 200), Rgb::new(0, 0, 0));
const SEPARATOR: CellStyle = CellStyle::new(Rgb::new(80, 80, 80), Rgb::new(0, 0, 0));
const EMPTY: CellStyle = CellStyle::new(Rgb::new(60, 60, 60), PLAYFIELD_BG).dim();
const GHOST: CellStyle = CellStyle::new(Rgb::new(110, 110, 110), PLAYFIELD_BG);
const OVERLAY: CellStyle = CellStyle::new(Rgb::new(255, 255, 255), Rgb::new(40, 40, 40)).bold();

/// Piece palette.
pub fn kind_color(kind: PieceKind) -> Rgb {
    match kind {
        PieceKind::L => Rgb::new(0x6d, 0xb8, 0x75),
        PieceKind::J => Rgb::new(0xdd, 0x79, 0x83),
        PieceKind::S => Rgb::new(0x0f, 0x59, 0x59),
        PieceKind::Z => Rgb::new(0x17, 0xa6, 0x97),
        PieceKind::T => Rgb::new(0x63, 0x8c, 0xa6),
        PieceKind::O => Rgb::new(0xb5, 0x69, 0xb3),
        PieceKind::I => Rgb::new(0xd9, 0x32, 0x40),
    }
}

/// Title and subtitle drawn over the board outside of play.
pub fn overlay_text(lifecycle: Lifecycle) -> Option<(&'static str, &'static str)> {
    match lifecycle {
        Lifecycle::Ready => Some(("PRESS ANY KEY", "TO START")),
        Lifecycle::Paused => Some(("PAUSED", "ANY KEY TO CONTINUE")),
        Lifecycle::Lost => Some(("GAME OVER", "PRESS R TO RESTART")),
        Lifecycle::Running => None,
    }
}

/// Where the board sits inside the viewport.
#[derive(Debug, Clone, Copy)]
struct Layout {
    /// Top-left corner of the board frame.
    x: u16,
    y: u16,
    frame_w: u16,
    frame_h: u16,
}

/// A lightweight terminal renderer for the game.
pub struct GameView {
    /// Board cell width in terminal columns.
    cell_w: u16,
    /// Board cell height in terminal rows.
    cell_h: u16,
    show_help: bool,
}

impl Default for GameView {
    fn default() -> Self {
        // 2x1 helps compensate for typical terminal glyph aspect ratio.
        Self {
            cell_w: 2,
            cell_h: 1,
            show_help: true,
        }
    }
}

impl GameView {
    pub fn new(cell_w: u16, cell_h: u16) -> Self {
        Self {
            cell_w: cell_w.max(1),
            cell_h: cell_h.max(1),
            ..Self::default()
        }
    }

    pub fn with_help(mut self, show_help: bool) -> Self {
        self.show_help = show_help;
        self
    }

    /// Render the game into an existing framebuffer.
    ///
    /// Callers can reuse a framebuffer across frames; it is only resized when
    /// the viewport changes.
    pub fn render_into(&self, snap: &GameSnapshot, viewport: Viewport, fb: &mut FrameBuffer) {
        fb.resize(viewport.width, viewport.height);
        fb.clear(TEXT.cell(' '));

        let layout = self.layout(viewport);
        fb.draw_frame(layout.x, layout.y, layout.frame_w, layout.frame_h, SEPARATOR);

        for (y, row) in snap.board.iter().enumerate() {
            for (x, &code) in row.iter().enumerate() {
                let pos = (x as i32, y as i32);
                match PieceKind::from_code(code) {
                    Some(kind) => self.draw_block(fb, layout, pos, kind),
                    None => self.fill_board_cell(fb, layout, pos, '·', EMPTY),
                }
            }
        }

        if let Some(ghost) = snap.ghost {
            for &pos in ghost.iter() {
                self.fill_board_cell(fb, layout, pos, '░', GHOST);
            }
        }

        for &pos in snap.current.cells.iter() {
            self.draw_block(fb, layout, pos, snap.current.kind);
        }

        self.draw_side_panel(fb, snap, layout);

        if let Some((title, subtitle)) = overlay_text(snap.lifecycle) {
            self.draw_overlay(fb, layout, title, subtitle);
        }
    }

    /// Convenience helper that allocates a new framebuffer.
    pub fn render(&self, snap: &GameSnapshot, viewport: Viewport) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(snap, viewport, &mut fb);
        fb
    }

    /// Terminal size needed to show the board and side panel without clipping.
    pub fn preferred_size(&self) -> Viewport {
        let frame_w = u16::from(BOARD_WIDTH) * self.cell_w + 2;
        let frame_h = u16::from(BOARD_HEIGHT) * self.cell_h + 2;
        Viewport::new(
            frame_w + PANEL_GAP + self.preview_frame_w().max(PANEL_W),
            frame_h,
        )
    }

    fn preview_frame_w(&self) -> u16 {
        PREVIEW_CELLS * self.cell_w + 2
    }

    fn layout(&self, viewport: Viewport) -> Layout {
        let frame_w = u16::from(BOARD_WIDTH) * self.cell_w + 2;
        let frame_h = u16::from(BOARD_HEIGHT) * self.cell_h + 2;
        let total_w = self.preferred_size().width;
        Layout {
            x: viewport.width.saturating_sub(total_w) / 2,
            y: viewport.height.saturating_sub(frame_h) / 2,
            frame_w,
            frame_h,
        }
    }

    /// Top-left terminal position of board cell `pos`, if it is on the board.
    fn board_cell_origin(&self, layout: Layout, (x, y): Pos) -> Option<(u16, u16)> {
        if x < 0 || y < 0 || x >= i32::from(BOARD_WIDTH) || y >= i32::from(BOARD_HEIGHT) {
            return None;
        }
        Some((
            layout.x + 1 + x as u16 * self.cell_w,
            layout.y + 1 + y as u16 * self.cell_h,
        ))
    }

    fn fill_board_cell(
        &self,
        fb: &mut FrameBuffer,
        layout: Layout,
        pos: Pos,
        ch: char,
        style: CellStyle,
    ) {
        if let Some((px, py)) = self.board_cell_origin(layout, pos) {
            fb.fill_rect(px, py, self.cell_w, self.cell_h, ch, style);
        }
    }

    fn draw_block(&self, fb: &mut FrameBuffer, layout: Layout, pos: Pos, kind: PieceKind) {
        let style = CellStyle::new(kind_color(kind), PLAYFIELD_BG).bold();
        self.fill_board_cell(fb, layout, pos, '█', style);
    }

    fn draw_side_panel(&self, fb: &mut FrameBuffer, snap: &GameSnapshot, layout: Layout) {
        let panel_x = layout.x + layout.frame_w + PANEL_GAP;
        if panel_x >= fb.width() {
            return;
        }

        // Next piece, centered in its box.
        let box_w = self.preview_frame_w();
        let box_h = PREVIEW_CELLS * self.cell_h + 2;
        let mut y = layout.y;
        fb.put_str(panel_x, y, "NEXT", TEXT.bold());
        y += 1;
        fb.draw_frame(panel_x, y, box_w, box_h, SEPARATOR);

        let next = &snap.next;
        let off_x = PREVIEW_CELLS.saturating_sub(u16::from(next.width)) / 2;
        let off_y = PREVIEW_CELLS.saturating_sub(u16::from(next.height)) / 2;
        let style = CellStyle::new(kind_color(next.kind), TEXT.bg).bold();
        for &(cx, cy) in next.cells.iter() {
            let px = panel_x + 1 + (off_x + cx.max(0) as u16) * self.cell_w;
            let py = y + 1 + (off_y + cy.max(0) as u16) * self.cell_h;
            fb.fill_rect(px, py, self.cell_w, self.cell_h, '█', style);
        }
        y += box_h + 1;

        for (label, value) in [
            ("LEVEL", snap.level),
            ("LINES", snap.lines),
            ("SCORE", snap.score),
        ] {
            fb.put_str(panel_x, y, label, TEXT.bold());
            fb.put_u32(panel_x, y + 1, value, TEXT);
            y += 3;
        }

        if !self.show_help {
            return;
        }
        let hint = TEXT.dim();
        for line in [
            "←→ move  ↑ rotate",
            "↓ drop  SPACE slam",
            "P pause  F ghost",
            "G garbage  Q quit",
        ] {
            if y >= layout.y + layout.frame_h {
                break;
            }
            fb.put_str(panel_x, y, line, hint);
            y += 1;
        }
        if !snap.show_ghost && y < layout.y + layout.frame_h {
            fb.put_str(panel_x, y, "ghost off", hint);
        }
    }

    fn draw_overlay(&self, fb: &mut FrameBuffer, layout: Layout, title: &str, subtitle: &str) {
        let center_x = layout.x + layout.frame_w / 2;
        let mid_y = layout.y + layout.frame_h / 2;
        let band_w = layout.frame_w.saturating_sub(2);
        fb.fill_rect(layout.x + 1, mid_y - 2, band_w, 5, ' ', OVERLAY);
        fb.put_str_centered(center_x, mid_y - 1, title, OVERLAY);
        fb.put_str_centered(center_x, mid_y + 1, subtitle, CellStyle { bold: false, ..OVERLAY });
    }
}
