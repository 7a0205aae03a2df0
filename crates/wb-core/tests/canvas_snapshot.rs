//! Integration tests: canvas mutations against canonical snapshots.

use pretty_assertions::assert_eq;
use wb_core::model::smooth_path;
use wb_core::*;

fn canvas() -> Canvas {
    Canvas::new(
        Viewport {
            width: 1216.0,
            height: 720.0,
        },
        Color::WHITE,
    )
}

fn every_kind() -> Vec<Drawable> {
    let style = Style::default();
    let line = Drawable::create(
        DrawableKind::Line {
            start: Point::new(0.0, 0.0),
            end: Point::new(10.0, 0.0),
        },
        style.clone(),
    );
    vec![
        Drawable::create(
            DrawableKind::Path {
                commands: smooth_path(&[
                    Point::new(1.0, 1.0),
                    Point::new(2.5, 4.0),
                    Point::new(8.0, 3.0),
                ]),
            },
            style.clone(),
        ),
        Drawable::create(DrawableKind::Rect(Rect::new(0.0, 0.0, 5.0, 5.0)), style.clone()),
        Drawable::create(DrawableKind::Ellipse(Rect::new(1.0, 1.0, 9.0, 4.0)), style.clone()),
        Drawable::create(
            DrawableKind::Curve {
                start: Point::new(0.0, 100.0),
                control: Point::new(50.0, 50.0),
                end: Point::new(100.0, 100.0),
            },
            style.clone(),
        ),
        Drawable::create(
            DrawableKind::Text {
                origin: Point::new(3.0, 4.0),
                content: "Text".into(),
                font: FontSpec::default(),
            },
            style.clone(),
        ),
        Drawable::create(
            DrawableKind::Image {
                origin: Point::new(0.0, 0.0),
                width: 4.0,
                height: 4.0,
                src: "data:image/png;base64,AAAA".into(),
            },
            style.clone(),
        ),
        Drawable::create(
            DrawableKind::Group {
                children: vec![
                    line,
                    Drawable::create(
                        DrawableKind::Triangle(Rect::from_center_size((10.0, 0.0), (10.0, 10.0))),
                        style.clone(),
                    ),
                ],
            },
            style,
        ),
    ]
}

#[test]
fn every_kind_survives_a_reload() {
    let mut c = canvas();
    for d in every_kind() {
        c.add(d);
    }
    let snap = c.snapshot();

    let mut other = canvas();
    other.load_snapshot(&snap).unwrap();
    assert_eq!(other.snapshot(), snap);
    assert_eq!(other.objects(), c.objects());
}

#[test]
fn load_reports_every_object_then_completion() {
    let mut c = canvas();
    let ids: Vec<ObjectId> = every_kind().into_iter().map(|d| c.add(d)).collect();
    let snap = c.snapshot();
    c.take_events();

    c.load_snapshot(&snap).unwrap();
    let events = c.take_events();
    let added: Vec<ObjectId> = events
        .iter()
        .filter_map(|e| match e {
            CanvasEvent::Added(id) => Some(*id),
            _ => None,
        })
        .collect();
    assert_eq!(added, ids);
    assert_eq!(events.last(), Some(&CanvasEvent::Loaded));
}

#[test]
fn selection_is_not_part_of_the_snapshot() {
    let mut c = canvas();
    let id = c.add(every_kind().remove(1));
    let before = c.snapshot();
    c.select(id);
    assert_eq!(c.snapshot(), before);
    c.set_dimensions(100.0, 100.0);
    assert_eq!(c.snapshot(), before);
}

#[test]
fn background_is_part_of_the_snapshot() {
    let mut c = canvas();
    let before = c.snapshot();
    c.set_background(Color::from_hex("#222").unwrap());
    assert_ne!(c.snapshot(), before);
}

#[test]
fn hit_testing_uses_rotated_bounds() {
    let mut c = canvas();
    let mut d = Drawable::create(
        DrawableKind::Rect(Rect::new(0.0, 40.0, 100.0, 60.0)),
        Style::default(),
    );
    d.angle = 90.0;
    let id = c.add(d);
    // Rotated a quarter turn about (50, 50): now 20 wide, 100 tall.
    assert_eq!(c.hit_test(Point::new(50.0, 5.0)), Some(id));
    assert_eq!(c.hit_test(Point::new(5.0, 50.0)), None);
}

#[test]
fn graph_model_serializes_nodes() {
    let mut g = GraphModel::with_start_node();
    let id = g.add_node(NodeKind::Image, Point::new(10.0, 20.0));
    let json = serde_json::to_value(g.node(&id).unwrap()).unwrap();
    assert_eq!(json["payload"]["type"], "image");
    assert_eq!(json["payload"]["label"], "Node 2");
}
