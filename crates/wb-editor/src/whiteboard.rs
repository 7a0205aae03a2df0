//! The two-surface whiteboard session.
//!
//! `Whiteboard` is what a host talks to. It owns the freeform canvas, the
//! flowchart graph, the history, the tool dispatcher and the settings, and
//! drains canvas events into history after every host callback so history
//! always sees mutations in the order they happened.

use crate::config::WhiteboardConfig;
use crate::error::Result;
use crate::history::History;
use crate::import;
use crate::input::{InputEvent, Modifiers};
use crate::settings::SettingsStore;
use crate::shortcuts::{ShortcutAction, ShortcutMap};
use crate::tools::{HostRequest, ToolDispatcher, ToolKind};
use wb_core::{Canvas, GraphModel, ObjectId, Point, Scene, Viewport};

pub struct Whiteboard {
    canvas: Canvas,
    graph: GraphModel,
    history: History,
    tools: ToolDispatcher,
    settings: SettingsStore,
    config: WhiteboardConfig,
}

impl Whiteboard {
    /// A fresh board sized for a window of `window_width × window_height`,
    /// with an empty canvas, the "Start" flowchart node and the select tool.
    pub fn new(
        config: WhiteboardConfig,
        settings: SettingsStore,
        window_width: u32,
        window_height: u32,
    ) -> Self {
        let (w, h) = config.surface_size(window_width, window_height);
        let canvas = Canvas::new(
            Viewport {
                width: f64::from(w),
                height: f64::from(h),
            },
            config.background,
        );
        let mut graph = GraphModel::with_start_node();
        graph.viewport.width = f64::from(w);
        graph.viewport.height = f64::from(h);

        let mut board = Self {
            history: History::new(canvas.snapshot()),
            canvas,
            graph,
            tools: ToolDispatcher::new(),
            settings,
            config,
        };
        board.set_tool(ToolKind::Select);
        board
    }

    /// Default config and settings.
    pub fn with_window(window_width: u32, window_height: u32) -> Self {
        Self::new(
            WhiteboardConfig::default(),
            SettingsStore::new(),
            window_width,
            window_height,
        )
    }

    // ─── Accessors ───────────────────────────────────────────────────────

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn graph(&self) -> &GraphModel {
        &self.graph
    }

    pub fn graph_mut(&mut self) -> &mut GraphModel {
        &mut self.graph
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn settings(&self) -> &SettingsStore {
        &self.settings
    }

    /// Later constructions pick changes up; existing drawables keep their style.
    pub fn settings_mut(&mut self) -> &mut SettingsStore {
        &mut self.settings
    }

    pub fn config(&self) -> &WhiteboardConfig {
        &self.config
    }

    pub fn tool(&self) -> ToolKind {
        self.tools.tool()
    }

    pub fn tools(&self) -> &ToolDispatcher {
        &self.tools
    }

    /// Drain what the host has to act on (e.g. open a file picker).
    pub fn take_requests(&mut self) -> Vec<HostRequest> {
        self.tools.take_requests()
    }

    // ─── Tools ───────────────────────────────────────────────────────────

    /// Returns `false` when `tool` was already active.
    pub fn set_tool(&mut self, tool: ToolKind) -> bool {
        let switched = self
            .tools
            .switch(tool, &mut self.canvas, &self.settings, &self.config);
        self.pump();
        switched
    }

    pub fn pointer_down(&mut self, p: Point) {
        let binding = self.tools.binding();
        if binding.graph {
            self.graph_click(p);
            return;
        }
        if binding.record_on_down && self.history.is_recording() {
            self.history.record(self.canvas.snapshot());
        }
        if binding.gesture {
            self.history.begin_gesture();
        }
        self.tools
            .pointer_down(p, &mut self.canvas, &self.settings, &self.config);
        self.pump();
    }

    pub fn pointer_move(&mut self, p: Point) {
        self.tools
            .pointer_move(p, &mut self.canvas, &self.settings, &self.config);
        self.pump();
    }

    pub fn pointer_up(&mut self, p: Point) {
        self.tools
            .pointer_up(p, &mut self.canvas, &self.settings, &self.config);
        self.pump();
        self.history.end_gesture(&self.canvas);
    }

    // ─── Graph surface ───────────────────────────────────────────────────

    /// Place a node of the configured kind at a screen position.
    pub fn graph_click(&mut self, screen: Point) -> String {
        let position = self.graph.viewport.screen_to_graph(screen);
        let kind = self.settings.get(ToolKind::Flowchart).node_kind;
        self.graph.add_node(kind, position)
    }

    /// # Errors
    /// Unknown endpoints or a forbidden connection.
    pub fn connect_nodes(&mut self, source: &str, target: &str) -> Result<String> {
        self.graph.connect(source, target).map_err(|e| {
            log::warn!("graph: rejected connection: {e}");
            e.into()
        })
    }

    // ─── History ─────────────────────────────────────────────────────────

    /// # Errors
    /// Only if a stored snapshot fails to load.
    pub fn undo(&mut self) -> Result<bool> {
        let done = self.history.undo(&mut self.canvas)?;
        self.pump();
        Ok(done)
    }

    /// # Errors
    /// Only if a stored snapshot fails to load.
    pub fn redo(&mut self) -> Result<bool> {
        let done = self.history.redo(&mut self.canvas)?;
        self.pump();
        Ok(done)
    }

    /// Remove the active drawable. Returns its id, if there was one.
    pub fn delete_selected(&mut self) -> Option<ObjectId> {
        let id = self.canvas.active_object()?;
        let removed = self.history.on_delete(&mut self.canvas, id).map(|d| d.id);
        self.pump();
        removed
    }

    /// Empty the canvas and start a new history from the empty state.
    ///
    /// # Errors
    /// Only if the empty scene fails to load, which it does not.
    pub fn clear_canvas(&mut self) -> Result<()> {
        let empty = Scene::new(self.canvas.background()).snapshot();
        self.canvas.load_snapshot(&empty)?;
        self.pump();
        self.history.clear(empty);
        Ok(())
    }

    // ─── Text ────────────────────────────────────────────────────────────

    /// Replace the content of the text being edited. Returns `false` when
    /// nothing is being edited.
    pub fn edit_text(&mut self, content: &str) -> bool {
        let changed = self.canvas.edit_text(content);
        self.pump();
        changed
    }

    pub fn exit_editing(&mut self) -> Option<ObjectId> {
        self.canvas.end_editing()
    }

    // ─── Image import ────────────────────────────────────────────────────

    /// Add the image in `bytes`, half size, centered and selected.
    ///
    /// # Errors
    /// `Error::Image` if the bytes are not a supported image; the canvas
    /// is left untouched.
    pub fn import_image(&mut self, bytes: &[u8]) -> Result<ObjectId> {
        let decoded = import::decode(bytes).inspect_err(|e| {
            log::warn!("import: rejected image: {e}");
        })?;
        let drawable = import::image_drawable(
            decoded,
            self.canvas.viewport().center(),
            self.config.image_scale,
        );
        let id = self.canvas.add(drawable);
        self.canvas.select(id);
        self.pump();
        Ok(id)
    }

    // ─── Keyboard and window ─────────────────────────────────────────────

    /// Route a key press. While text is being edited only `Escape` is
    /// handled, everything else belongs to the text.
    ///
    /// # Errors
    /// Propagates undo/redo failures.
    pub fn key_down(&mut self, key: &str, modifiers: Modifiers) -> Result<Option<ShortcutAction>> {
        if self.canvas.editing().is_some() {
            if key == "Escape" {
                self.exit_editing();
                return Ok(Some(ShortcutAction::Escape));
            }
            return Ok(None);
        }
        let Some(action) = ShortcutMap::resolve(
            key,
            modifiers.ctrl,
            modifiers.shift,
            modifiers.alt,
            modifiers.meta,
        ) else {
            return Ok(None);
        };
        match action {
            ShortcutAction::Undo => {
                self.undo()?;
            }
            ShortcutAction::Redo => {
                self.redo()?;
            }
            ShortcutAction::Delete => {
                self.delete_selected();
            }
            ShortcutAction::Escape => {
                self.canvas.clear_selection();
                self.pump();
            }
            ShortcutAction::Tool(tool) => {
                self.set_tool(tool);
            }
        }
        Ok(Some(action))
    }

    /// Size both surfaces to the window minus the chrome.
    pub fn resize(&mut self, window_width: u32, window_height: u32) {
        let (w, h) = self.config.surface_size(window_width, window_height);
        let (w, h) = (f64::from(w), f64::from(h));
        self.canvas.set_dimensions(w, h);
        self.graph.viewport.width = w;
        self.graph.viewport.height = h;
        log::debug!("resize: surfaces {w}x{h}");
    }

    /// Dispatch one host event.
    ///
    /// # Errors
    /// Propagates undo/redo failures.
    pub fn handle(&mut self, event: &InputEvent) -> Result<()> {
        match event {
            InputEvent::PointerDown { x, y, .. } => self.pointer_down(Point::new(*x, *y)),
            InputEvent::PointerMove { x, y, .. } => self.pointer_move(Point::new(*x, *y)),
            InputEvent::PointerUp { x, y, .. } => self.pointer_up(Point::new(*x, *y)),
            InputEvent::Key { key, modifiers } => {
                self.key_down(key, *modifiers)?;
            }
            InputEvent::Resize { width, height } => self.resize(*width, *height),
        }
        Ok(())
    }

    /// Feed queued canvas events to history, in order.
    fn pump(&mut self) {
        for event in self.canvas.take_events() {
            self.history.observe(event, &self.canvas);
        }
    }
}
