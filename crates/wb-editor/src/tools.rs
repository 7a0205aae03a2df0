//! Tool system for canvas interactions.
//!
//! Exactly one tool is active. Each tool is described by a row of the
//! dispatch table (`binding_for`): optional pointer handlers plus setup and
//! teardown hooks. Switching tools tears the old row down, clears every
//! pointer slot, runs the new setup and installs the new handlers. Slots
//! are overwritten, never appended, so re-selecting a tool can not stack
//! handlers.
//!
//! | Tool | down | move | up |
//! |------|------|------|----|
//! | Select | hit-test, start drag or marquee | live drag | commit drag / apply marquee |
//! | Draw | start stroke | sample | smooth into a path |
//! | Rectangle, Ellipse, Triangle | zero-size shape | resize from anchor | — |
//! | Connector | line or curve | move far end | add arrowheads |
//! | Text | new text in edit mode | — | — |
//! | Eraser | — | erase under pointer | — |
//! | Image | — | — | — |
//! | Flowchart | (graph surface) | — | — |

use crate::config::WhiteboardConfig;
use crate::settings::{SettingsStore, ToolConfig};
use serde::{Deserialize, Serialize};
use std::fmt;
use wb_core::geometry::{contains_inclusive, curve_control, drag_rect, heading};
use wb_core::model::smooth_path;
use wb_core::{Canvas, Color, Drawable, DrawableKind, ObjectId, Point, Rect, Style};

/// The active tool determines how pointer events are interpreted.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum ToolKind {
    #[default]
    Select,
    Draw,
    Rectangle,
    Ellipse,
    Triangle,
    Connector,
    Text,
    Image,
    Eraser,
    Flowchart,
}

impl ToolKind {
    pub const ALL: [ToolKind; 10] = [
        ToolKind::Select,
        ToolKind::Draw,
        ToolKind::Rectangle,
        ToolKind::Ellipse,
        ToolKind::Triangle,
        ToolKind::Connector,
        ToolKind::Text,
        ToolKind::Image,
        ToolKind::Eraser,
        ToolKind::Flowchart,
    ];
}

/// Something only the host can do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HostRequest {
    /// Show an image file picker and call `Whiteboard::import_image`.
    OpenFilePicker,
}

/// Transient pointer-gesture state shared by the handlers.
#[derive(Debug, Clone, Default)]
pub struct GestureState {
    /// Pointer is down.
    pub pressed: bool,
    pub anchor: Point,
    /// Drawable being constructed.
    pub active: Option<ObjectId>,
    /// Freehand samples.
    pub points: Vec<Point>,
    /// Selected drawables as they were when a drag started.
    pub drag: Vec<Drawable>,
    /// Rubber-band rectangle, while marquee selecting.
    pub marquee: Option<Rect>,
}

/// What handlers get to work with.
pub struct ToolContext<'a> {
    pub canvas: &'a mut Canvas,
    /// Settings of the active tool.
    pub settings: &'a ToolConfig,
    pub config: &'a WhiteboardConfig,
    pub gesture: &'a mut GestureState,
    pub requests: &'a mut Vec<HostRequest>,
}

pub type PointerHandler = fn(&mut ToolContext<'_>, Point);
pub type LifecycleHook = fn(&mut ToolContext<'_>);

/// One row of the dispatch table.
#[derive(Clone, Copy)]
pub struct ToolBinding {
    pub on_down: Option<PointerHandler>,
    pub on_move: Option<PointerHandler>,
    pub on_up: Option<PointerHandler>,
    pub setup: Option<LifecycleHook>,
    pub teardown: Option<LifecycleHook>,
    /// A down→up sequence is one history entry.
    pub gesture: bool,
    /// Record the current state once before the gesture starts.
    pub record_on_down: bool,
    /// Pointer input goes to the graph surface instead.
    pub graph: bool,
}

impl ToolBinding {
    const EMPTY: Self = Self {
        on_down: None,
        on_move: None,
        on_up: None,
        setup: None,
        teardown: None,
        gesture: false,
        record_on_down: false,
        graph: false,
    };
}

impl fmt::Debug for ToolBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolBinding")
            .field("on_down", &self.on_down.is_some())
            .field("on_move", &self.on_move.is_some())
            .field("on_up", &self.on_up.is_some())
            .field("gesture", &self.gesture)
            .field("graph", &self.graph)
            .finish()
    }
}

/// The dispatch table.
pub fn binding_for(tool: ToolKind) -> ToolBinding {
    match tool {
        ToolKind::Select => ToolBinding {
            on_down: Some(select_down),
            on_move: Some(select_move),
            on_up: Some(select_up),
            setup: Some(setup_selectable),
            gesture: true,
            ..ToolBinding::EMPTY
        },
        ToolKind::Draw => ToolBinding {
            on_down: Some(draw_down),
            on_move: Some(draw_move),
            on_up: Some(draw_up),
            setup: Some(setup_draw),
            gesture: true,
            ..ToolBinding::EMPTY
        },
        ToolKind::Rectangle => shape_binding(rect_down),
        ToolKind::Ellipse => shape_binding(ellipse_down),
        ToolKind::Triangle => shape_binding(triangle_down),
        ToolKind::Connector => ToolBinding {
            on_down: Some(connector_down),
            on_move: Some(connector_move),
            on_up: Some(connector_up),
            setup: Some(setup_selectable),
            gesture: true,
            ..ToolBinding::EMPTY
        },
        ToolKind::Text => ToolBinding {
            on_down: Some(text_down),
            teardown: Some(teardown_text),
            ..ToolBinding::EMPTY
        },
        ToolKind::Image => ToolBinding {
            setup: Some(setup_image),
            ..ToolBinding::EMPTY
        },
        ToolKind::Eraser => ToolBinding {
            on_move: Some(eraser_move),
            setup: Some(setup_eraser),
            gesture: true,
            record_on_down: true,
            ..ToolBinding::EMPTY
        },
        ToolKind::Flowchart => ToolBinding {
            graph: true,
            ..ToolBinding::EMPTY
        },
    }
}

fn shape_binding(on_down: PointerHandler) -> ToolBinding {
    ToolBinding {
        on_down: Some(on_down),
        on_move: Some(shape_move),
        on_up: Some(shape_move),
        setup: Some(setup_selectable),
        gesture: true,
        ..ToolBinding::EMPTY
    }
}

// ─── Dispatcher ──────────────────────────────────────────────────────────

/// Installed pointer handlers. One slot per pointer phase.
#[derive(Clone, Copy, Default)]
pub struct PointerBindings {
    pub on_down: Option<PointerHandler>,
    pub on_move: Option<PointerHandler>,
    pub on_up: Option<PointerHandler>,
}

impl PointerBindings {
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    fn install(&mut self, binding: &ToolBinding) {
        self.on_down = binding.on_down;
        self.on_move = binding.on_move;
        self.on_up = binding.on_up;
    }

    /// Number of occupied slots.
    pub fn bound(&self) -> usize {
        [
            self.on_down.is_some(),
            self.on_move.is_some(),
            self.on_up.is_some(),
        ]
        .into_iter()
        .filter(|b| *b)
        .count()
    }
}

impl fmt::Debug for PointerBindings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PointerBindings({} bound)", self.bound())
    }
}

/// Runs the active tool's handlers against the canvas.
#[derive(Debug, Default)]
pub struct ToolDispatcher {
    tool: ToolKind,
    installed: bool,
    slots: PointerBindings,
    gesture: GestureState,
    requests: Vec<HostRequest>,
}

impl ToolDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tool(&self) -> ToolKind {
        self.tool
    }

    pub fn binding(&self) -> ToolBinding {
        binding_for(self.tool)
    }

    pub fn slots(&self) -> &PointerBindings {
        &self.slots
    }

    pub fn gesture(&self) -> &GestureState {
        &self.gesture
    }

    /// Drain requests for the host.
    pub fn take_requests(&mut self) -> Vec<HostRequest> {
        std::mem::take(&mut self.requests)
    }

    /// Make `tool` active. Returns `false` if it already was.
    pub fn switch(
        &mut self,
        tool: ToolKind,
        canvas: &mut Canvas,
        settings: &SettingsStore,
        config: &WhiteboardConfig,
    ) -> bool {
        if self.installed && tool == self.tool {
            return false;
        }
        let teardown = binding_for(self.tool).teardown.filter(|_| self.installed);
        if let Some(teardown) = teardown {
            let cfg = settings.get(self.tool);
            teardown(&mut ToolContext {
                canvas: &mut *canvas,
                settings: &cfg,
                config,
                gesture: &mut self.gesture,
                requests: &mut self.requests,
            });
        }

        self.slots.clear();
        self.gesture = GestureState::default();
        canvas.drawing_mode = false;

        let previous = std::mem::replace(&mut self.tool, tool);
        let binding = binding_for(tool);
        if let Some(setup) = binding.setup {
            let cfg = settings.get(tool);
            setup(&mut ToolContext {
                canvas: &mut *canvas,
                settings: &cfg,
                config,
                gesture: &mut self.gesture,
                requests: &mut self.requests,
            });
        }
        self.slots.install(&binding);
        self.installed = true;
        log::debug!("tools: {previous:?} -> {tool:?}");
        true
    }

    /// Returns whether a handler ran.
    pub fn pointer_down(
        &mut self,
        p: Point,
        canvas: &mut Canvas,
        settings: &SettingsStore,
        config: &WhiteboardConfig,
    ) -> bool {
        self.gesture = GestureState {
            pressed: true,
            anchor: p,
            ..GestureState::default()
        };
        let slot = self.slots.on_down;
        self.run(slot, p, canvas, settings, config)
    }

    /// Moves only reach the tool while the pointer is down.
    pub fn pointer_move(
        &mut self,
        p: Point,
        canvas: &mut Canvas,
        settings: &SettingsStore,
        config: &WhiteboardConfig,
    ) -> bool {
        if !self.gesture.pressed {
            return false;
        }
        let slot = self.slots.on_move;
        self.run(slot, p, canvas, settings, config)
    }

    pub fn pointer_up(
        &mut self,
        p: Point,
        canvas: &mut Canvas,
        settings: &SettingsStore,
        config: &WhiteboardConfig,
    ) -> bool {
        if !self.gesture.pressed {
            return false;
        }
        let slot = self.slots.on_up;
        let ran = self.run(slot, p, canvas, settings, config);
        self.gesture = GestureState::default();
        ran
    }

    fn run(
        &mut self,
        slot: Option<PointerHandler>,
        p: Point,
        canvas: &mut Canvas,
        settings: &SettingsStore,
        config: &WhiteboardConfig,
    ) -> bool {
        let Some(handler) = slot else {
            return false;
        };
        let cfg = settings.get(self.tool);
        handler(
            &mut ToolContext {
                canvas,
                settings: &cfg,
                config,
                gesture: &mut self.gesture,
                requests: &mut self.requests,
            },
            p,
        );
        true
    }
}

// ─── Setup / teardown ────────────────────────────────────────────────────

fn setup_selectable(ctx: &mut ToolContext<'_>) {
    ctx.canvas.marquee = true;
    ctx.canvas.set_all_selectable(true);
}

fn setup_draw(ctx: &mut ToolContext<'_>) {
    ctx.canvas.drawing_mode = true;
}

fn setup_eraser(ctx: &mut ToolContext<'_>) {
    ctx.canvas.marquee = false;
}

fn setup_image(ctx: &mut ToolContext<'_>) {
    ctx.requests.push(HostRequest::OpenFilePicker);
}

fn teardown_text(ctx: &mut ToolContext<'_>) {
    ctx.canvas.end_editing();
}

// ─── Select ──────────────────────────────────────────────────────────────

fn select_down(ctx: &mut ToolContext<'_>, p: Point) {
    match ctx.canvas.hit_test(p) {
        Some(hit) => {
            if !ctx.canvas.selection().contains(&hit) {
                ctx.canvas.select(hit);
            }
            ctx.gesture.drag = ctx
                .canvas
                .selection()
                .iter()
                .filter_map(|id| ctx.canvas.get(*id).cloned())
                .collect();
        }
        None => {
            ctx.canvas.clear_selection();
            if ctx.canvas.marquee {
                ctx.gesture.marquee = Some(drag_rect(p, p));
            }
        }
    }
}

fn select_move(ctx: &mut ToolContext<'_>, p: Point) {
    if ctx.gesture.marquee.is_some() {
        ctx.gesture.marquee = Some(drag_rect(ctx.gesture.anchor, p));
        return;
    }
    let d = p - ctx.gesture.anchor;
    for original in &ctx.gesture.drag {
        ctx.canvas.update(original.id, |o| {
            *o = original.clone();
            o.translate(d.x, d.y);
        });
    }
}

fn select_up(ctx: &mut ToolContext<'_>, p: Point) {
    if ctx.gesture.marquee.take().is_some() {
        let hits = ctx.canvas.hit_test_rect(drag_rect(ctx.gesture.anchor, p));
        ctx.canvas.set_selection(hits);
        return;
    }
    let d = p - ctx.gesture.anchor;
    if d.x == 0.0 && d.y == 0.0 {
        return;
    }
    for original in std::mem::take(&mut ctx.gesture.drag) {
        ctx.canvas.modify(original.id, |o| {
            *o = original;
            o.translate(d.x, d.y);
        });
    }
}

// ─── Draw ────────────────────────────────────────────────────────────────

fn draw_down(ctx: &mut ToolContext<'_>, p: Point) {
    ctx.gesture.points.push(p);
}

fn draw_move(ctx: &mut ToolContext<'_>, p: Point) {
    ctx.gesture.points.push(p);
    log::trace!("draw: {} samples", ctx.gesture.points.len());
}

fn draw_up(ctx: &mut ToolContext<'_>, p: Point) {
    let points = &mut ctx.gesture.points;
    if points.last() != Some(&p) {
        points.push(p);
    }
    let commands = smooth_path(points);
    let style = Style {
        fill: Color::TRANSPARENT,
        ..ctx.settings.style()
    };
    ctx.canvas
        .add_path(Drawable::create(DrawableKind::Path { commands }, style));
}

// ─── Shapes ──────────────────────────────────────────────────────────────

fn rect_down(ctx: &mut ToolContext<'_>, p: Point) {
    shape_down(ctx, DrawableKind::Rect(drag_rect(p, p)));
}

fn ellipse_down(ctx: &mut ToolContext<'_>, p: Point) {
    shape_down(ctx, DrawableKind::Ellipse(drag_rect(p, p)));
}

fn triangle_down(ctx: &mut ToolContext<'_>, p: Point) {
    shape_down(ctx, DrawableKind::Triangle(drag_rect(p, p)));
}

fn shape_down(ctx: &mut ToolContext<'_>, kind: DrawableKind) {
    let id = ctx.canvas.add(Drawable::create(kind, ctx.settings.style()));
    ctx.canvas.select(id);
    ctx.gesture.active = Some(id);
}

fn shape_move(ctx: &mut ToolContext<'_>, p: Point) {
    let Some(id) = ctx.gesture.active else {
        return;
    };
    let rect = drag_rect(ctx.gesture.anchor, p);
    log::trace!("shape {id}: {rect:?}");
    ctx.canvas.update(id, |d| match &mut d.kind {
        DrawableKind::Rect(r) | DrawableKind::Ellipse(r) | DrawableKind::Triangle(r) => *r = rect,
        _ => {}
    });
}

// ─── Connector ───────────────────────────────────────────────────────────

fn connector_down(ctx: &mut ToolContext<'_>, p: Point) {
    let kind = if ctx.settings.curve {
        DrawableKind::Curve {
            start: p,
            control: curve_control(p, p, ctx.config.curve_offset),
            end: p,
        }
    } else {
        DrawableKind::Line { start: p, end: p }
    };
    shape_down(ctx, kind);
}

fn connector_move(ctx: &mut ToolContext<'_>, p: Point) {
    let Some(id) = ctx.gesture.active else {
        return;
    };
    let offset = ctx.config.curve_offset;
    ctx.canvas.update(id, |d| match &mut d.kind {
        DrawableKind::Line { end, .. } => *end = p,
        DrawableKind::Curve {
            start,
            control,
            end,
        } => {
            *end = p;
            *control = curve_control(*start, p, offset);
        }
        _ => {}
    });
}

fn connector_up(ctx: &mut ToolContext<'_>, p: Point) {
    // The release point wins over the last move the host sent.
    connector_move(ctx, p);
    let Some(id) = ctx.gesture.active.take() else {
        return;
    };
    let mode = ctx.settings.arrow;
    if !mode.at_start() && !mode.at_end() {
        return;
    }
    let Some(line) = ctx.canvas.get(id).cloned() else {
        return;
    };
    let Some((start, end)) = arrow_headings(&line.kind) else {
        return;
    };

    let width = line.style.stroke_width;
    let color = line.style.stroke;
    let mut children = vec![line];
    if mode.at_start() {
        children.push(arrowhead(start.0, start.1, width, color));
    }
    if mode.at_end() {
        children.push(arrowhead(end.0, end.1, width, color));
    }
    let group = Drawable::create(DrawableKind::Group { children }, Style::default());
    match ctx.canvas.replace(id, group) {
        Ok(gid) => ctx.canvas.select(gid),
        Err(e) => log::warn!("connector: {e}"),
    }
}

/// Tip and heading (radians) of the start and end arrowheads of a
/// connector. Start arrows point backwards along the connector. Curves use
/// the control point for the tangent.
pub fn arrow_headings(kind: &DrawableKind) -> Option<((Point, f64), (Point, f64))> {
    match *kind {
        DrawableKind::Line { start, end } => Some((
            (start, heading(end, start)),
            (end, heading(start, end)),
        )),
        DrawableKind::Curve {
            start,
            control,
            end,
        } => Some((
            (start, heading(control, start)),
            (end, heading(control, end)),
        )),
        _ => None,
    }
}

/// Filled triangle centered on `tip`, pointing along `heading`.
///
/// The triangle's apex is at the top of its box, so it is rotated a
/// quarter turn further than the heading.
pub fn arrowhead(tip: Point, heading: f64, stroke_width: f64, color: Color) -> Drawable {
    let size = (3.0 * stroke_width).max(10.0);
    let mut head = Drawable::create(
        DrawableKind::Triangle(Rect::from_center_size(tip, (size, size))),
        Style {
            stroke: color,
            stroke_width: 1.0,
            fill: color,
            ..Style::default()
        },
    );
    head.angle = heading.to_degrees() + 90.0;
    head
}

// ─── Text ────────────────────────────────────────────────────────────────

fn text_down(ctx: &mut ToolContext<'_>, p: Point) {
    let style = Style {
        stroke: Color::TRANSPARENT,
        stroke_width: 0.0,
        fill: ctx.settings.color,
        ..Style::default()
    };
    let id = ctx.canvas.add(Drawable::create(
        DrawableKind::Text {
            origin: p,
            content: "Text".into(),
            font: ctx.settings.font(),
        },
        style,
    ));
    ctx.canvas.select(id);
    ctx.canvas.begin_editing(id);
}

// ─── Eraser ──────────────────────────────────────────────────────────────

fn eraser_move(ctx: &mut ToolContext<'_>, p: Point) {
    let reach = ctx.config.eraser_radius;
    let doomed: Vec<ObjectId> = ctx
        .canvas
        .objects()
        .iter()
        .rev()
        .filter(|o| contains_inclusive(o.bounds().inflate(reach, reach), p))
        .map(|o| o.id)
        .collect();
    for id in doomed {
        log::trace!("eraser: removing {id}");
        ctx.canvas.remove(id);
    }
}
