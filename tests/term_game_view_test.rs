use tetrys::core::{GameState, Piece, PieceSnapshot};
use tetrys::term::{encode_frame_into, kind_color, GameView, Viewport};
use tetrys::types::{Command, Lifecycle, PieceKind};

fn screen_text(fb: &tetrys::term::FrameBuffer) -> String {
    let mut all = String::new();
    for y in 0..fb.height() {
        all.push_str(&fb.row_text(y));
        all.push('\n');
    }
    all
}

#[test]
fn term_view_renders_border_corners() {
    let state = GameState::new(1);
    let snap = state.snapshot();
    let view = GameView::default();

    // With cell_w=2 and cell_h=1:
    // board pixels = 14*2 by 20*1 => 28x20
    // plus border => 30x22
    let vp = Viewport::new(30, 22);
    let fb = view.render(&snap, vp);

    assert_eq!(fb.get(0, 0).unwrap().ch, '┌');
    assert_eq!(fb.get(29, 0).unwrap().ch, '┐');
    assert_eq!(fb.get(0, 21).unwrap().ch, '└');
    assert_eq!(fb.get(29, 21).unwrap().ch, '┘');
}

#[test]
fn term_view_renders_locked_cell_as_two_chars_wide() {
    let mut snap = GameState::new(1).snapshot();
    // Put a locked I block at bottom-left.
    snap.board[19][0] = PieceKind::I.code();
    snap.ghost = None;

    let view = GameView::default();
    let fb = view.render(&snap, Viewport::new(30, 22));

    // Inside border: (1,1) origin. Each cell is 2 chars wide.
    let x0 = 1;
    let y0 = 1 + 19;
    for x in [x0, x0 + 1] {
        let cell = fb.get(x, y0).unwrap();
        assert_eq!(cell.ch, '█');
        assert_eq!(cell.style.fg, kind_color(PieceKind::I));
    }
    // Empty neighbour keeps the playfield dot.
    assert_eq!(fb.get(x0 + 2, y0).unwrap().ch, '·');
}

#[test]
fn term_view_draws_side_panel_when_wide_enough() {
    let mut gs = GameState::new(1);
    gs.apply(Command::StartOrResume);
    let mut snap = gs.snapshot();
    snap.score = 1234;
    snap.level = 2;
    snap.lines = 10;

    let view = GameView::default();
    let fb = view.render(&snap, Viewport::new(60, 22));

    let all = screen_text(&fb);
    assert!(all.contains("SCORE"));
    assert!(all.contains("1234"));
    assert!(all.contains("LINES"));
}

#[test]
fn term_view_previews_next_piece() {
    let mut snap = GameState::new(1).snapshot();
    snap.lifecycle = Lifecycle::Running;
    snap.next = PieceSnapshot::from(Piece::new(PieceKind::I));

    let fb = GameView::default().render(&snap, Viewport::new(60, 22));

    // Board frame is 30 wide starting at column 5; the panel starts 2 columns later.
    let panel_x = 5 + 30 + 2;
    let preview_blocks = (0..fb.height())
        .flat_map(|y| (panel_x..fb.width()).map(move |x| (x, y)))
        .filter_map(|(x, y)| fb.get(x, y))
        .filter(|c| c.ch == '█' && c.style.fg == kind_color(PieceKind::I))
        .count();
    assert_eq!(preview_blocks, 8);
}

#[test]
fn term_view_centers_board_by_default_on_tall_viewports() {
    let state = GameState::new(1);
    let snap = state.snapshot();
    let view = GameView::default();

    // Board frame is 22 rows tall (20 + border); the full layout is 50 wide.
    let vp = Viewport::new(50, 30);
    let fb = view.render(&snap, vp);

    // start_y = (30 - 22) / 2 = 4 => top-left corner at (0,4).
    assert_eq!(fb.get(0, 4).unwrap().ch, '┌');
}

#[test]
fn term_view_game_over_overlay() {
    let mut snap = GameState::new(1).snapshot();
    snap.lifecycle = Lifecycle::Lost;

    let view = GameView::default();
    let all = screen_text(&view.render(&snap, view.preferred_size()));
    assert!(all.contains("GAME OVER"));
    assert!(all.contains("PRESS R TO RESTART"));
}

#[test]
fn term_view_unchanged_frame_encodes_nothing() {
    let mut game = GameState::new(1);
    game.apply(Command::StartOrResume);
    let view = GameView::default();
    let size = view.preferred_size();

    let first = view.render(&game.snapshot(), size);
    let second = view.render(&game.snapshot(), size);

    let mut out = Vec::new();
    encode_frame_into(Some(&first), &second, &mut out).unwrap();
    assert!(out.is_empty());

    // A shift changes a handful of cells, far fewer bytes than a full redraw.
    game.apply(Command::MoveLeft);
    game.tick(20);
    let third = view.render(&game.snapshot(), size);

    let mut diff = Vec::new();
    encode_frame_into(Some(&second), &third, &mut diff).unwrap();
    let mut full = Vec::new();
    encode_frame_into(None, &third, &mut full).unwrap();
    assert!(!diff.is_empty());
    assert!(diff.len() < full.len());
}
