//! Elementary geometry shared by drawables and tools.
//!
//! All coordinates are canvas units, y grows downward. Rectangles are
//! `kurbo::Rect` and always kept normalized (`x0 <= x1`, `y0 <= y1`).

use kurbo::{Point, Rect, Vec2};

/// Normalized box spanned by a drag from `anchor` to `current`.
///
/// When the pointer is left of (or above) the anchor the origin moves to the
/// pointer, so the result is the same for every drag direction.
pub fn drag_rect(anchor: Point, current: Point) -> Rect {
    Rect::from_points(anchor, current)
}

/// Closed containment test; points on the edge count as inside.
pub fn contains_inclusive(rect: Rect, p: Point) -> bool {
    p.x >= rect.x0 && p.x <= rect.x1 && p.y >= rect.y0 && p.y <= rect.y1
}

/// Closed overlap test between two normalized rectangles.
pub fn overlaps(a: Rect, b: Rect) -> bool {
    a.x0 <= b.x1 && b.x0 <= a.x1 && a.y0 <= b.y1 && b.y0 <= a.y1
}

/// Bounding box of a set of points. `None` when empty.
pub fn bounds_of(points: impl IntoIterator<Item = Point>) -> Option<Rect> {
    points.into_iter().fold(None, |acc, p| {
        Some(match acc {
            None => Rect::from_points(p, p),
            Some(r) => r.union_pt(p),
        })
    })
}

/// Rotate `p` around `center` by `degrees` (clockwise on a y-down canvas).
pub fn rotate_about(p: Point, center: Point, degrees: f64) -> Point {
    let (sin, cos) = degrees.to_radians().sin_cos();
    let d = p - center;
    center + Vec2::new(d.x * cos - d.y * sin, d.x * sin + d.y * cos)
}

/// Axis-aligned box of `rect` after rotating it about its own center.
pub fn rotated_bounds(rect: Rect, degrees: f64) -> Rect {
    if degrees == 0.0 {
        return rect;
    }
    let c = rect.center();
    let corners = [
        Point::new(rect.x0, rect.y0),
        Point::new(rect.x1, rect.y0),
        Point::new(rect.x1, rect.y1),
        Point::new(rect.x0, rect.y1),
    ];
    bounds_of(corners.into_iter().map(|p| rotate_about(p, c, degrees))).unwrap_or(rect)
}

/// Scale `rect` about its top-left corner.
pub fn scale_from_origin(rect: Rect, scale: f64) -> Rect {
    Rect::from_origin_size(rect.origin(), (rect.width() * scale, rect.height() * scale))
}

/// Direction of travel from `from` to `to`, in radians (`atan2(Δy, Δx)`).
pub fn heading(from: Point, to: Point) -> f64 {
    (to - from).atan2()
}

/// Control point of a connector curve: `offset` units from the segment
/// midpoint along the normal that points up the screen.
pub fn curve_control(start: Point, end: Point, offset: f64) -> Point {
    let mid = start.midpoint(end);
    let d = end - start;
    let len = d.hypot();
    if len == 0.0 {
        return mid - Vec2::new(0.0, offset);
    }
    let mut normal = Vec2::new(d.y, -d.x) / len;
    if normal.y > 0.0 {
        normal = -normal;
    }
    mid + normal * offset
}

/// Exact bounding box of the quadratic Bezier `p0, p1, p2`.
pub fn quad_bounds(p0: Point, p1: Point, p2: Point) -> Rect {
    let mut pts = vec![p0, p2];
    for t in [quad_extremum(p0.x, p1.x, p2.x), quad_extremum(p0.y, p1.y, p2.y)]
        .into_iter()
        .flatten()
    {
        pts.push(quad_eval(p0, p1, p2, t));
    }
    bounds_of(pts).unwrap_or_default()
}

fn quad_extremum(a: f64, b: f64, c: f64) -> Option<f64> {
    let denom = a - 2.0 * b + c;
    if denom == 0.0 {
        return None;
    }
    let t = (a - b) / denom;
    (t > 0.0 && t < 1.0).then_some(t)
}

fn quad_eval(p0: Point, p1: Point, p2: Point, t: f64) -> Point {
    let mt = 1.0 - t;
    let v = p0.to_vec2() * (mt * mt) + p1.to_vec2() * (2.0 * mt * t) + p2.to_vec2() * (t * t);
    v.to_point()
}

/// Approximate text box: monospace-ish advance of 0.6 em, 1.16 line height.
pub fn text_extent(content: &str, font_size: f64) -> (f64, f64) {
    let lines: Vec<&str> = content.split('\n').collect();
    let longest = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);
    (
        longest as f64 * font_size * 0.6,
        lines.len() as f64 * font_size * 1.16,
    )
}
