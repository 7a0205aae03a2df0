//! The freeform drawing surface.
//!
//! `Canvas` owns the live `Scene` plus interaction state that is *not* part
//! of a snapshot (viewport size, selection, text editing, marquee/drawing
//! modes). Structural changes push `CanvasEvent`s into a queue that the
//! owner drains after each host callback, which is how history observes
//! mutations without the canvas knowing about history.
//!
//! Two flavours of mutation exist:
//!
//! - `update` changes geometry silently (live feedback while a gesture is
//!   in progress, no event).
//! - `add` / `remove` / `replace` / `modify` emit events.

use crate::color::Color;
use crate::error::{Error, Result};
use crate::geometry::{contains_inclusive, overlaps};
use crate::id::ObjectId;
use crate::model::{Drawable, DrawableKind};
use crate::scene::{Scene, Snapshot};
use kurbo::{Point, Rect};
use std::ops::Range;

/// Pixel size of a surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn center(&self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }
}

/// Mutation notifications, in the order they happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CanvasEvent {
    Added(ObjectId),
    Modified(ObjectId),
    Removed(ObjectId),
    /// A freehand stroke was finalized.
    PathCreated(ObjectId),
    SelectionChanged,
    /// A snapshot load finished; all its `Added` events precede this one.
    Loaded,
}

/// Active text editing session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextEdit {
    pub id: ObjectId,
    /// Selected character range.
    pub selection: Range<usize>,
}

pub struct Canvas {
    scene: Scene,
    viewport: Viewport,
    selection: Vec<ObjectId>,
    editing: Option<TextEdit>,
    /// Marquee selection enabled.
    pub marquee: bool,
    /// Freehand drawing mode.
    pub drawing_mode: bool,
    events: Vec<CanvasEvent>,
}

impl Canvas {
    pub fn new(viewport: Viewport, background: Color) -> Self {
        Self {
            scene: Scene::new(background),
            viewport,
            selection: Vec::new(),
            editing: None,
            marquee: true,
            drawing_mode: false,
            events: Vec::new(),
        }
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn objects(&self) -> &[Drawable] {
        &self.scene.objects
    }

    pub fn get(&self, id: ObjectId) -> Option<&Drawable> {
        self.scene.get(id)
    }

    pub fn len(&self) -> usize {
        self.scene.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scene.is_empty()
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn set_dimensions(&mut self, width: f64, height: f64) {
        self.viewport = Viewport { width, height };
    }

    pub fn background(&self) -> Color {
        self.scene.background
    }

    pub fn set_background(&mut self, color: Color) {
        self.scene.background = color;
    }

    pub fn snapshot(&self) -> Snapshot {
        self.scene.snapshot()
    }

    // ─── Structural mutations (emit events) ──────────────────────────────

    /// Append on top of the z-order.
    pub fn add(&mut self, drawable: Drawable) -> ObjectId {
        let id = drawable.id;
        self.scene.objects.push(drawable);
        self.events.push(CanvasEvent::Added(id));
        id
    }

    /// Append a finalized freehand stroke.
    pub fn add_path(&mut self, drawable: Drawable) -> ObjectId {
        let id = self.add(drawable);
        self.events.push(CanvasEvent::PathCreated(id));
        id
    }

    pub fn remove(&mut self, id: ObjectId) -> Option<Drawable> {
        let idx = self.scene.index_of(id)?;
        let removed = self.scene.objects.remove(idx);
        self.forget(id);
        self.events.push(CanvasEvent::Removed(id));
        Some(removed)
    }

    /// Swap `id` for `drawable` at the same z-index.
    ///
    /// # Errors
    /// `Error::UnknownObject` if `id` is not on the canvas.
    pub fn replace(&mut self, id: ObjectId, drawable: Drawable) -> Result<ObjectId> {
        let idx = self
            .scene
            .index_of(id)
            .ok_or_else(|| Error::UnknownObject(id.to_string()))?;
        let new_id = drawable.id;
        self.scene.objects[idx] = drawable;
        self.forget(id);
        self.events.push(CanvasEvent::Removed(id));
        self.events.push(CanvasEvent::Added(new_id));
        Ok(new_id)
    }

    /// Mutate a drawable and report it as a committed modification.
    pub fn modify(&mut self, id: ObjectId, f: impl FnOnce(&mut Drawable)) -> bool {
        let Some(d) = self.scene.get_mut(id) else {
            return false;
        };
        f(d);
        self.events.push(CanvasEvent::Modified(id));
        true
    }

    /// Mutate a drawable without notification (live gesture feedback).
    pub fn update(&mut self, id: ObjectId, f: impl FnOnce(&mut Drawable)) -> bool {
        match self.scene.get_mut(id) {
            Some(d) => {
                f(d);
                true
            }
            None => false,
        }
    }

    pub fn set_all_selectable(&mut self, selectable: bool) {
        for o in &mut self.scene.objects {
            o.selectable = selectable;
        }
    }

    /// Replace the whole scene with a snapshot.
    ///
    /// Emits `Removed` for the old objects, `Added` for each loaded one and a
    /// final `Loaded`. Nothing changes if the snapshot does not decode.
    ///
    /// # Errors
    /// `Error::Snapshot` for undecodable text.
    pub fn load_snapshot(&mut self, snapshot: &Snapshot) -> Result<()> {
        let scene = Scene::from_snapshot(snapshot)?;
        let old = std::mem::replace(&mut self.scene, scene);
        self.selection.clear();
        self.editing = None;
        self.events
            .extend(old.objects.iter().map(|o| CanvasEvent::Removed(o.id)));
        self.events
            .extend(self.scene.objects.iter().map(|o| CanvasEvent::Added(o.id)));
        self.events.push(CanvasEvent::Loaded);
        Ok(())
    }

    /// Drain queued events.
    pub fn take_events(&mut self) -> Vec<CanvasEvent> {
        std::mem::take(&mut self.events)
    }

    fn forget(&mut self, id: ObjectId) {
        if self.selection.contains(&id) {
            self.selection.retain(|s| *s != id);
            self.events.push(CanvasEvent::SelectionChanged);
        }
        if self.editing.as_ref().is_some_and(|e| e.id == id) {
            self.editing = None;
        }
    }

    // ─── Hit testing ─────────────────────────────────────────────────────

    /// Topmost selectable drawable whose bounds contain `p`.
    pub fn hit_test(&self, p: Point) -> Option<ObjectId> {
        self.scene
            .objects
            .iter()
            .rev()
            .find(|o| o.selectable && contains_inclusive(o.bounds(), p))
            .map(|o| o.id)
    }

    /// Selectable drawables whose bounds intersect `rect`, bottom to top.
    pub fn hit_test_rect(&self, rect: Rect) -> Vec<ObjectId> {
        self.scene
            .objects
            .iter()
            .filter(|o| o.selectable && overlaps(o.bounds(), rect))
            .map(|o| o.id)
            .collect()
    }

    // ─── Selection ───────────────────────────────────────────────────────

    pub fn selection(&self) -> &[ObjectId] {
        &self.selection
    }

    /// The single active object, if exactly one is selected.
    pub fn active_object(&self) -> Option<ObjectId> {
        match self.selection.as_slice() {
            [one] => Some(*one),
            _ => None,
        }
    }

    pub fn set_selection(&mut self, ids: Vec<ObjectId>) {
        if self.selection != ids {
            self.selection = ids;
            self.events.push(CanvasEvent::SelectionChanged);
        }
    }

    pub fn select(&mut self, id: ObjectId) {
        self.set_selection(vec![id]);
    }

    pub fn clear_selection(&mut self) {
        self.set_selection(Vec::new());
    }

    // ─── Text editing ────────────────────────────────────────────────────

    pub fn editing(&self) -> Option<&TextEdit> {
        self.editing.as_ref()
    }

    /// Enter edit mode on a text drawable with its whole content selected.
    pub fn begin_editing(&mut self, id: ObjectId) -> bool {
        let Some(Drawable {
            kind: DrawableKind::Text { content, .. },
            ..
        }) = self.scene.get(id)
        else {
            return false;
        };
        let len = content.chars().count();
        self.editing = Some(TextEdit {
            id,
            selection: 0..len,
        });
        true
    }

    /// Replace the edited text's content; the caret ends after it.
    pub fn edit_text(&mut self, content: &str) -> bool {
        let Some(edit) = self.editing.clone() else {
            return false;
        };
        let changed = self.modify(edit.id, |d| {
            if let DrawableKind::Text { content: c, .. } = &mut d.kind {
                *c = content.to_string();
            }
        });
        if changed {
            let end = content.chars().count();
            self.editing = Some(TextEdit {
                id: edit.id,
                selection: end..end,
            });
        }
        changed
    }

    pub fn end_editing(&mut self) -> Option<ObjectId> {
        self.editing.take().map(|e| e.id)
    }
}
