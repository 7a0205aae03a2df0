//! Integration tests: tool behavior through the whiteboard session.

use pretty_assertions::assert_eq;
use std::io::Cursor;
use wb_core::{Color, DrawableKind, NodeKind, Point, Rect};
use wb_editor::{ArrowMode, HostRequest, InputEvent, Modifiers, ToolKind, Whiteboard};

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

fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(width, height, image::Rgba([0, 128, 255, 255]));
    let mut out = Cursor::new(Vec::new());
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut out, image::ImageFormat::Png)
        .unwrap();
    out.into_inner()
}

// ─── Shapes ─────────────────────────────────────────────────────────────

#[test]
fn rectangle_drag_up_and_left() {
    let mut board = board();
    board.set_tool(ToolKind::Rectangle);
    drag(&mut board, (100.0, 100.0), (40.0, 30.0));

    let rect = &board.canvas().objects()[0];
    let DrawableKind::Rect(r) = rect.kind else {
        panic!("expected a rectangle");
    };
    assert_eq!(r.origin(), Point::new(40.0, 30.0));
    assert_eq!((r.width(), r.height()), (60.0, 70.0));
}

#[test]
fn skipped_moves_do_not_matter() {
    let mut board = board();
    board.set_tool(ToolKind::Ellipse);
    board.pointer_down(Point::new(10.0, 10.0));
    board.pointer_up(Point::new(10.0, 10.0));
    board.pointer_down(Point::new(10.0, 10.0));
    board.pointer_move(Point::new(90.0, 50.0));
    board.pointer_up(Point::new(90.0, 50.0));
    assert_eq!(
        board.canvas().objects()[1].kind,
        DrawableKind::Ellipse(Rect::new(10.0, 10.0, 90.0, 50.0))
    );
}

#[test]
fn shapes_use_settings_at_construction_time() {
    let mut board = board();
    board.set_tool(ToolKind::Triangle);
    board.settings_mut().get_mut(ToolKind::Triangle).color = Color::from_hex("#F00").unwrap();
    drag(&mut board, (0.0, 0.0), (30.0, 30.0));
    board.settings_mut().get_mut(ToolKind::Triangle).color = Color::BLACK;
    drag(&mut board, (100.0, 0.0), (130.0, 30.0));

    let objects = board.canvas().objects();
    assert_eq!(objects[0].style.stroke, Color::from_hex("#FF0000").unwrap());
    assert_eq!(objects[1].style.stroke, Color::BLACK);
}

#[test]
fn reselecting_a_tool_does_not_double_handlers() {
    let mut board = board();
    assert!(board.set_tool(ToolKind::Rectangle));
    assert!(!board.set_tool(ToolKind::Rectangle));
    assert!(!board.set_tool(ToolKind::Rectangle));
    drag(&mut board, (0.0, 0.0), (10.0, 10.0));
    assert_eq!(board.canvas().len(), 1);
    assert_eq!(board.history().undo_depth(), 2);
}

// ─── Freehand ───────────────────────────────────────────────────────────

#[test]
fn a_stroke_is_one_path_and_one_entry() {
    let mut board = board();
    board.key_down("p", Modifiers::NONE).unwrap();
    assert_eq!(board.tool(), ToolKind::Draw);
    board.pointer_down(Point::new(0.0, 0.0));
    for i in 1..20 {
        board.pointer_move(Point::new(i as f64 * 5.0, (i % 3) as f64));
    }
    board.pointer_up(Point::new(100.0, 0.0));

    assert_eq!(board.canvas().len(), 1);
    assert_eq!(board.history().undo_depth(), 2);
    assert!(matches!(
        board.canvas().objects()[0].kind,
        DrawableKind::Path { .. }
    ));
}

// ─── Eraser ─────────────────────────────────────────────────────────────

#[test]
fn eraser_removes_within_ten_units() {
    let mut board = board();
    board.set_tool(ToolKind::Rectangle);
    drag(&mut board, (0.0, 0.0), (30.0, 30.0));
    drag(&mut board, (200.0, 200.0), (230.0, 230.0));

    board.set_tool(ToolKind::Eraser);
    board.pointer_down(Point::new(40.0, 35.0));
    board.pointer_move(Point::new(40.0, 35.0));
    board.pointer_up(Point::new(40.0, 35.0));

    assert_eq!(board.canvas().len(), 1);
    assert_eq!(board.history().undo_depth(), 4);
    board.undo().unwrap();
    assert_eq!(board.canvas().len(), 2);
}

#[test]
fn eraser_just_outside_reach_keeps_the_shape() {
    let mut board = board();
    board.set_tool(ToolKind::Rectangle);
    drag(&mut board, (0.0, 0.0), (30.0, 30.0));

    board.set_tool(ToolKind::Eraser);
    board.pointer_down(Point::new(40.5, 15.0));
    board.pointer_move(Point::new(40.5, 15.0));
    board.pointer_up(Point::new(40.5, 15.0));
    assert_eq!(board.canvas().len(), 1);
    assert_eq!(board.history().undo_depth(), 2);
}

// ─── Connector ──────────────────────────────────────────────────────────

#[test]
fn end_arrow_on_a_horizontal_connector() {
    let mut board = board();
    board.set_tool(ToolKind::Connector);
    board.settings_mut().get_mut(ToolKind::Connector).arrow = ArrowMode::End;
    drag(&mut board, (0.0, 0.0), (10.0, 0.0));

    assert_eq!(board.canvas().len(), 1);
    let DrawableKind::Group { children } = &board.canvas().objects()[0].kind else {
        panic!("expected a group");
    };
    assert_eq!(children.len(), 2);
    let head = &children[1];
    // Triangles point up; a quarter turn points them along +x.
    assert_eq!(head.angle, 90.0);
    assert_eq!(head.local_bounds().center(), Point::new(10.0, 0.0));
    assert_eq!(board.history().undo_depth(), 2);
}

#[test]
fn plain_connector_stays_a_line() {
    let mut board = board();
    board.set_tool(ToolKind::Connector);
    drag(&mut board, (0.0, 0.0), (50.0, 80.0));
    assert_eq!(
        board.canvas().objects()[0].kind,
        DrawableKind::Line {
            start: Point::new(0.0, 0.0),
            end: Point::new(50.0, 80.0),
        }
    );
}

// ─── Text ───────────────────────────────────────────────────────────────

#[test]
fn text_uses_settings_font() {
    let mut board = board();
    {
        let cfg = board.settings_mut().get_mut(ToolKind::Text);
        cfg.font_family = "Courier".into();
        cfg.font_size = 32.0;
    }
    board.set_tool(ToolKind::Text);
    board.pointer_down(Point::new(5.0, 5.0));
    board.pointer_up(Point::new(5.0, 5.0));
    let DrawableKind::Text { font, content, .. } = &board.canvas().objects()[0].kind else {
        panic!("expected text");
    };
    assert_eq!(content, "Text");
    assert_eq!((font.family.as_str(), font.size), ("Courier", 32.0));
}

// ─── Image ──────────────────────────────────────────────────────────────

#[test]
fn image_tool_requests_a_picker_once() {
    let mut board = board();
    board.set_tool(ToolKind::Image);
    assert_eq!(board.take_requests(), vec![HostRequest::OpenFilePicker]);
    board.set_tool(ToolKind::Image);
    assert!(board.take_requests().is_empty());
}

#[test]
fn imported_image_is_centered_halved_and_selected() {
    let mut board = board();
    board.set_tool(ToolKind::Image);
    let id = board.import_image(&png_bytes(200, 100)).unwrap();

    let img = board.canvas().get(id).unwrap();
    assert_eq!(img.scale, 0.5);
    let viewport = board.canvas().viewport();
    assert_eq!(img.bounds().center(), viewport.center());
    assert_eq!(img.bounds().width(), 100.0);
    assert_eq!(board.canvas().active_object(), Some(id));
    assert_eq!(board.history().undo_depth(), 2);
}

#[test]
fn unreadable_image_leaves_the_scene_alone() {
    let mut board = board();
    let before = board.canvas().snapshot();
    assert!(board.import_image(b"GIF89a but not really").is_err());
    assert_eq!(board.canvas().snapshot(), before);
    assert_eq!(board.history().undo_depth(), 1);
}

#[test]
fn image_survives_undo_redo() {
    let mut board = board();
    board.import_image(&png_bytes(8, 8)).unwrap();
    let with_image = board.canvas().snapshot();
    board.undo().unwrap();
    assert!(board.canvas().is_empty());
    board.redo().unwrap();
    assert_eq!(board.canvas().snapshot(), with_image);
}

// ─── Flowchart ──────────────────────────────────────────────────────────

#[test]
fn flowchart_places_configured_nodes_outside_history() {
    let mut board = board();
    board.settings_mut().get_mut(ToolKind::Flowchart).node_kind = NodeKind::TextOutput;
    board.key_down("f", Modifiers::NONE).unwrap();
    board.handle(&InputEvent::pointer_down(400.0, 300.0)).unwrap();
    board.handle(&InputEvent::pointer_up(400.0, 300.0)).unwrap();

    let node = board.graph().node("node_2").unwrap();
    assert_eq!(node.kind(), NodeKind::TextOutput);
    assert_eq!(node.position, Point::new(400.0, 300.0));
    assert_eq!(board.history().undo_depth(), 1);

    let edge = board.connect_nodes("node_1", "node_2").unwrap();
    assert_eq!(board.connect_nodes("node_1", "node_2").unwrap(), edge);
    assert!(board.connect_nodes("node_2", "node_1").is_err());
    assert_eq!(board.graph().edge_count(), 1);
}

#[test]
fn graph_clicks_follow_pan_and_zoom() {
    let mut board = board();
    board.set_tool(ToolKind::Flowchart);
    board.graph_mut().viewport.pan = wb_core::Vec2::new(100.0, 0.0);
    board.graph_mut().viewport.zoom = 2.0;
    let id = board.graph_click(Point::new(300.0, 200.0));
    assert_eq!(
        board.graph().node(&id).unwrap().position,
        Point::new(100.0, 100.0)
    );
}

// ─── Window ─────────────────────────────────────────────────────────────

#[test]
fn resize_event_sizes_both_surfaces() {
    let mut board = board();
    board
        .handle(&InputEvent::Resize {
            width: 1000,
            height: 700,
        })
        .unwrap();
    assert_eq!(board.canvas().viewport().width, 936.0);
    assert_eq!(board.canvas().viewport().height, 620.0);
    assert_eq!(board.graph().viewport.width, 936.0);
}
