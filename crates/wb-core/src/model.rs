//! Drawable objects of the freeform surface.
//!
//! A scene is an ordered list of `Drawable`s; the order is the z-order
//! (last = topmost). Every attribute that affects what ends up on screen
//! lives here so the canonical snapshot captures it.

use crate::color::Color;
use crate::geometry::{self, bounds_of, quad_bounds, rotated_bounds, scale_from_origin};
use crate::id::ObjectId;
use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

// ─── Path data ───────────────────────────────────────────────────────────

/// A single path command (SVG-like but simplified).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PathCmd {
    MoveTo(Point),
    LineTo(Point),
    /// Control, end.
    QuadTo(Point, Point),
}

impl PathCmd {
    fn points(&self) -> SmallVec<[Point; 2]> {
        match *self {
            PathCmd::MoveTo(p) | PathCmd::LineTo(p) => smallvec::smallvec![p],
            PathCmd::QuadTo(c, p) => smallvec::smallvec![c, p],
        }
    }

    fn translate(&mut self, d: Vec2) {
        match self {
            PathCmd::MoveTo(p) | PathCmd::LineTo(p) => *p += d,
            PathCmd::QuadTo(c, p) => {
                *c += d;
                *p += d;
            }
        }
    }
}

/// Turn sampled pointer positions into a smooth path: each sample becomes
/// the control point of a quadratic whose end is the midpoint to the next
/// sample, and the final segment is a straight line to the last sample.
pub fn smooth_path(points: &[Point]) -> Vec<PathCmd> {
    let Some((&first, rest)) = points.split_first() else {
        return Vec::new();
    };
    let mut cmds = Vec::with_capacity(points.len() + 1);
    cmds.push(PathCmd::MoveTo(first));
    if rest.is_empty() {
        // A click without movement still leaves a dot.
        cmds.push(PathCmd::LineTo(first));
        return cmds;
    }
    for pair in points.windows(2).skip(1) {
        cmds.push(PathCmd::QuadTo(pair[0], pair[0].midpoint(pair[1])));
    }
    if let Some(&last) = points.last() {
        cmds.push(PathCmd::LineTo(last));
    }
    cmds
}

// ─── Styling ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FontSpec {
    pub family: String,
    pub size: f64,
}

impl Default for FontSpec {
    fn default() -> Self {
        Self {
            family: "Arial".into(),
            size: 20.0,
        }
    }
}

/// Stroke and fill attributes shared by every drawable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Style {
    pub stroke: Color,
    pub stroke_width: f64,
    /// Dash pattern (on, off, ...). Empty = solid.
    pub dash: SmallVec<[f64; 2]>,
    pub fill: Color,
    pub opacity: f64,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            stroke: Color::BLACK,
            stroke_width: 2.0,
            dash: SmallVec::new(),
            fill: Color::TRANSPARENT,
            opacity: 1.0,
        }
    }
}

// ─── Drawables ───────────────────────────────────────────────────────────

/// The geometric variants a drawable can take.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DrawableKind {
    /// Freehand stroke.
    Path { commands: Vec<PathCmd> },
    Rect(Rect),
    /// Ellipse inscribed in the box.
    Ellipse(Rect),
    /// Isosceles triangle inscribed in the box, apex at the top edge.
    Triangle(Rect),
    Line { start: Point, end: Point },
    /// Quadratic Bezier connector.
    Curve {
        start: Point,
        control: Point,
        end: Point,
    },
    Text {
        origin: Point,
        content: String,
        font: FontSpec,
    },
    Image {
        origin: Point,
        width: f64,
        height: f64,
        /// `data:` URI of the encoded image.
        src: String,
    },
    /// Composite owning its children; they have no identity outside it.
    Group { children: Vec<Drawable> },
}

/// One object on the freeform canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Drawable {
    pub id: ObjectId,
    pub kind: DrawableKind,
    pub style: Style,
    /// Rotation in degrees, clockwise, about the center of the unscaled box.
    pub angle: f64,
    /// Uniform scale applied from the top-left of the geometry.
    pub scale: f64,
    pub selectable: bool,
}

impl Drawable {
    pub fn new(id: ObjectId, kind: DrawableKind, style: Style) -> Self {
        Self {
            id,
            kind,
            style,
            angle: 0.0,
            scale: 1.0,
            selectable: true,
        }
    }

    /// Build a drawable with a fresh id prefixed by its kind name.
    pub fn create(kind: DrawableKind, style: Style) -> Self {
        let id = ObjectId::with_prefix(kind.type_name());
        Self::new(id, kind, style)
    }

    /// Geometry box before scale and rotation.
    pub fn local_bounds(&self) -> Rect {
        match &self.kind {
            DrawableKind::Path { commands } => {
                bounds_of(commands.iter().flat_map(|c| c.points())).unwrap_or_default()
            }
            DrawableKind::Rect(r) | DrawableKind::Ellipse(r) | DrawableKind::Triangle(r) => *r,
            DrawableKind::Line { start, end } => Rect::from_points(*start, *end),
            DrawableKind::Curve {
                start,
                control,
                end,
            } => quad_bounds(*start, *control, *end),
            DrawableKind::Text {
                origin,
                content,
                font,
            } => {
                let (w, h) = geometry::text_extent(content, font.size);
                Rect::from_origin_size(*origin, (w, h))
            }
            DrawableKind::Image {
                origin,
                width,
                height,
                ..
            } => Rect::from_origin_size(*origin, (*width, *height)),
            DrawableKind::Group { children } => children
                .iter()
                .map(Drawable::bounds)
                .reduce(|a, b| a.union(b))
                .unwrap_or_default(),
        }
    }

    /// Axis-aligned bounding box on the canvas (scale and rotation applied).
    pub fn bounds(&self) -> Rect {
        let scaled = scale_from_origin(self.local_bounds(), self.scale);
        rotated_bounds(scaled, self.angle)
    }

    pub fn translate(&mut self, dx: f64, dy: f64) {
        let d = Vec2::new(dx, dy);
        match &mut self.kind {
            DrawableKind::Path { commands } => commands.iter_mut().for_each(|c| c.translate(d)),
            DrawableKind::Rect(r) | DrawableKind::Ellipse(r) | DrawableKind::Triangle(r) => {
                *r = *r + d;
            }
            DrawableKind::Line { start, end } => {
                *start += d;
                *end += d;
            }
            DrawableKind::Curve {
                start,
                control,
                end,
            } => {
                *start += d;
                *control += d;
                *end += d;
            }
            DrawableKind::Text { origin, .. } | DrawableKind::Image { origin, .. } => *origin += d,
            DrawableKind::Group { children } => {
                children.iter_mut().for_each(|c| c.translate(dx, dy));
            }
        }
    }

    pub fn is_group(&self) -> bool {
        matches!(self.kind, DrawableKind::Group { .. })
    }
}

impl DrawableKind {
    /// Short lowercase name, used as id prefix and in logs.
    pub fn type_name(&self) -> &'static str {
        match self {
            DrawableKind::Path { .. } => "path",
            DrawableKind::Rect(_) => "rect",
            DrawableKind::Ellipse(_) => "ellipse",
            DrawableKind::Triangle(_) => "triangle",
            DrawableKind::Line { .. } => "line",
            DrawableKind::Curve { .. } => "curve",
            DrawableKind::Text { .. } => "text",
            DrawableKind::Image { .. } => "image",
            DrawableKind::Group { .. } => "group",
        }
    }
}
