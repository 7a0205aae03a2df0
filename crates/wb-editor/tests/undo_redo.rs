//! Integration tests: snapshot undo/redo through the whiteboard session.
//!
//! Drives the board the way a host does (pointer, keys, deletes) and checks
//! history depth and restored scenes.

use pretty_assertions::assert_eq;
use wb_core::{DrawableKind, Point, Rect, Snapshot};
use wb_editor::{HistoryGuard, Modifiers, ShortcutAction, ToolKind, Whiteboard};

fn board() -> Whiteboard {
    let _ = env_logger::builder().is_test(true).try_init();
    Whiteboard::with_window(1280, 800)
}

fn drag(board: &mut Whiteboard, from: (f64, f64), to: (f64, f64)) {
    let (a, b) = (Point::new(from.0, from.1), Point::new(to.0, to.1));
    board.pointer_down(a);
    board.pointer_move(a.midpoint(b));
    board.pointer_move(b);
    board.pointer_up(b);
}

fn draw_rects(board: &mut Whiteboard, n: usize) {
    board.set_tool(ToolKind::Rectangle);
    for i in 0..n {
        let x = i as f64 * 50.0;
        drag(board, (x, 0.0), (x + 40.0, 40.0));
    }
}

// ─── Depth bookkeeping ──────────────────────────────────────────────────

#[test]
fn each_gesture_is_one_entry() {
    let mut board = board();
    draw_rects(&mut board, 4);
    assert_eq!(board.history().undo_depth(), 5);
    assert_eq!(board.history().redo_depth(), 0);
}

#[test]
fn undo_floor_is_a_noop() {
    let mut board = board();
    let before = board.canvas().snapshot();
    assert!(!board.undo().unwrap());
    assert!(!board.undo().unwrap());
    assert_eq!(board.history().undo_depth(), 1);
    assert_eq!(board.canvas().snapshot(), before);
}

#[test]
fn redo_with_nothing_undone_is_a_noop() {
    let mut board = board();
    draw_rects(&mut board, 1);
    assert!(!board.redo().unwrap());
    assert_eq!(board.history().undo_depth(), 2);
}

// ─── Round trips ────────────────────────────────────────────────────────

#[test]
fn undo_then_redo_restores_the_same_snapshot() {
    let mut board = board();
    draw_rects(&mut board, 2);
    let after_two: Snapshot = board.canvas().snapshot();

    assert!(board.undo().unwrap());
    assert_eq!(board.canvas().len(), 1);
    assert!(board.redo().unwrap());
    assert_eq!(board.canvas().snapshot(), after_two);
    assert_eq!(board.history().undo_depth(), 3);
    assert_eq!(board.history().redo_depth(), 0);
}

#[test]
fn undo_back_to_empty_and_forward_again() {
    let mut board = board();
    let empty = board.canvas().snapshot();
    draw_rects(&mut board, 3);
    let full = board.canvas().snapshot();

    for _ in 0..3 {
        assert!(board.undo().unwrap());
    }
    assert_eq!(board.canvas().snapshot(), empty);
    for _ in 0..3 {
        assert!(board.redo().unwrap());
    }
    assert_eq!(board.canvas().snapshot(), full);
}

#[test]
fn restores_are_not_recorded() {
    let mut board = board();
    draw_rects(&mut board, 2);
    board.undo().unwrap();
    assert_eq!(board.history().guard(), HistoryGuard::Armed);
    assert_eq!(board.history().undo_depth(), 2);
    assert_eq!(board.history().redo_depth(), 1);
}

#[test]
fn new_commit_after_undo_clears_redo() {
    let mut board = board();
    draw_rects(&mut board, 2);
    board.undo().unwrap();
    assert_eq!(board.history().redo_depth(), 1);

    drag(&mut board, (300.0, 300.0), (320.0, 330.0));
    assert_eq!(board.history().redo_depth(), 0);
    assert!(!board.redo().unwrap());
    assert_eq!(board.history().undo_depth(), 3);
}

// ─── Deletion ───────────────────────────────────────────────────────────

#[test]
fn delete_then_two_undos_leaves_one_rectangle() {
    let mut board = board();
    draw_rects(&mut board, 2);
    assert_eq!(board.canvas().len(), 2);

    // The second rectangle is still active after drawing it.
    let active = board.canvas().active_object().unwrap();
    assert_eq!(board.delete_selected(), Some(active));
    assert_eq!(board.canvas().len(), 1);
    assert_eq!(board.history().undo_depth(), 4);

    board.undo().unwrap();
    assert_eq!(board.canvas().len(), 2);
    board.undo().unwrap();
    assert_eq!(board.canvas().len(), 1);
    assert_eq!(
        board.canvas().objects()[0].kind,
        DrawableKind::Rect(Rect::new(0.0, 0.0, 40.0, 40.0))
    );
}

#[test]
fn delete_without_selection_does_nothing() {
    let mut board = board();
    draw_rects(&mut board, 1);
    board.set_tool(ToolKind::Select);
    board.pointer_down(Point::new(700.0, 700.0));
    board.pointer_up(Point::new(700.0, 700.0));
    assert_eq!(board.delete_selected(), None);
    assert_eq!(board.history().undo_depth(), 2);
}

// ─── Keyboard ───────────────────────────────────────────────────────────

#[test]
fn shortcuts_drive_history() {
    let mut board = board();
    draw_rects(&mut board, 2);

    board.key_down("z", Modifiers::CTRL).unwrap();
    assert_eq!(board.canvas().len(), 1);
    board.key_down("y", Modifiers::CTRL).unwrap();
    assert_eq!(board.canvas().len(), 2);

    let cmd_shift = Modifiers {
        meta: true,
        shift: true,
        ..Modifiers::NONE
    };
    assert_eq!(board.key_down("y", cmd_shift).unwrap(), None);
    assert_eq!(board.canvas().len(), 2);
}

#[test]
fn backspace_deletes_the_active_object() {
    let mut board = board();
    draw_rects(&mut board, 1);
    board.key_down("Backspace", Modifiers::NONE).unwrap();
    assert!(board.canvas().is_empty());
    board.key_down("z", Modifiers::CTRL).unwrap();
    assert_eq!(board.canvas().len(), 1);
}

#[test]
fn cmd_backspace_and_ctrl_delete_also_delete() {
    let mut board = board();
    draw_rects(&mut board, 2);

    let cmd = Modifiers {
        meta: true,
        ..Modifiers::NONE
    };
    assert_eq!(
        board.key_down("Backspace", cmd).unwrap(),
        Some(ShortcutAction::Delete)
    );
    assert_eq!(board.canvas().len(), 1);

    board.set_tool(ToolKind::Select);
    board.pointer_down(Point::new(10.0, 10.0));
    board.pointer_up(Point::new(10.0, 10.0));
    board.key_down("Delete", Modifiers::CTRL).unwrap();
    assert!(board.canvas().is_empty());
    assert_eq!(board.history().undo_depth(), 5);
}

// ─── Selection and moves ────────────────────────────────────────────────

#[test]
fn clicks_that_only_select_are_not_recorded() {
    let mut board = board();
    draw_rects(&mut board, 2);
    board.set_tool(ToolKind::Select);
    board.pointer_down(Point::new(10.0, 10.0));
    board.pointer_up(Point::new(10.0, 10.0));
    assert_eq!(board.history().undo_depth(), 3);
}

#[test]
fn a_drag_move_is_one_entry() {
    let mut board = board();
    draw_rects(&mut board, 1);
    board.set_tool(ToolKind::Select);
    drag(&mut board, (10.0, 10.0), (110.0, 60.0));
    assert_eq!(board.history().undo_depth(), 3);
    assert_eq!(
        board.canvas().objects()[0].kind,
        DrawableKind::Rect(Rect::new(100.0, 50.0, 140.0, 90.0))
    );

    board.undo().unwrap();
    assert_eq!(
        board.canvas().objects()[0].kind,
        DrawableKind::Rect(Rect::new(0.0, 0.0, 40.0, 40.0))
    );
}

#[test]
fn text_edits_are_recorded() {
    let mut board = board();
    board.set_tool(ToolKind::Text);
    board.pointer_down(Point::new(20.0, 20.0));
    board.pointer_up(Point::new(20.0, 20.0));
    assert_eq!(board.history().undo_depth(), 2);

    assert!(board.edit_text("Hello"));
    assert_eq!(board.history().undo_depth(), 3);
    board.undo().unwrap();
    let DrawableKind::Text { content, .. } = &board.canvas().objects()[0].kind else {
        panic!("expected text");
    };
    assert_eq!(content, "Text");
    assert!(board.canvas().editing().is_none());
}

#[test]
fn clear_canvas_resets_history() {
    let mut board = board();
    draw_rects(&mut board, 3);
    board.clear_canvas().unwrap();
    assert!(board.canvas().is_empty());
    assert_eq!(board.history().undo_depth(), 1);
    assert!(!board.history().can_undo());
    draw_rects(&mut board, 1);
    assert_eq!(board.history().undo_depth(), 2);
}
