//! Snapshot-based undo/redo for the freeform canvas.
//!
//! Every committed state is a full `Snapshot` of the scene. The undo stack
//! always holds at least the initial snapshot; its top is the state the
//! canvas currently shows. Redo holds states that were undone.
//!
//! ## Recording discipline
//!
//! The history observes `CanvasEvent`s and records only when both hold:
//!
//! - the guard is `Armed`. Undo/redo put it in `Suppressed` while a restore
//!   is pending; it re-arms when the canvas reports `Loaded`, not when the
//!   call returns, so the restore's own `Added` events are never recorded.
//! - no gesture is in progress. A pointer gesture (down → move* → up)
//!   commits exactly one snapshot, in `end_gesture`.
//!
//! Recording is deduplicated against the last recorded snapshot, so
//! selection-only changes never produce an entry.

use crate::error::Result;
use wb_core::{Canvas, CanvasEvent, Drawable, ObjectId, Snapshot};

/// Whether mutation notifications may be recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HistoryGuard {
    #[default]
    Armed,
    /// A snapshot restore is in flight.
    Suppressed,
}

/// Undo/redo stacks of scene snapshots.
#[derive(Debug, Clone)]
pub struct History {
    undo_stack: Vec<Snapshot>,
    redo_stack: Vec<Snapshot>,
    last_recorded: Snapshot,
    /// Restores whose `Loaded` event has not been observed yet.
    pending_restores: usize,
    gesture: bool,
}

impl History {
    /// Start a history whose floor is `initial`.
    pub fn new(initial: Snapshot) -> Self {
        Self {
            undo_stack: vec![initial.clone()],
            redo_stack: Vec::new(),
            last_recorded: initial,
            pending_restores: 0,
            gesture: false,
        }
    }

    /// Drop all entries and start over from `initial`.
    pub fn clear(&mut self, initial: Snapshot) {
        *self = Self::new(initial);
    }

    pub fn guard(&self) -> HistoryGuard {
        if self.pending_restores > 0 {
            HistoryGuard::Suppressed
        } else {
            HistoryGuard::Armed
        }
    }

    pub fn gesture_in_progress(&self) -> bool {
        self.gesture
    }

    /// True when a mutation notification would be recorded right now.
    pub fn is_recording(&self) -> bool {
        self.guard() == HistoryGuard::Armed && !self.gesture
    }

    /// Push `snapshot` unless it equals the last recorded state.
    /// Returns whether an entry was pushed.
    pub fn record(&mut self, snapshot: Snapshot) -> bool {
        if snapshot == self.last_recorded {
            return false;
        }
        self.commit(snapshot);
        true
    }

    /// Push `snapshot` unconditionally and clear redo.
    pub fn commit(&mut self, snapshot: Snapshot) {
        self.undo_stack.push(snapshot.clone());
        self.redo_stack.clear();
        self.last_recorded = snapshot;
        log::debug!(
            "history: commit (undo={}, redo=0)",
            self.undo_stack.len()
        );
    }

    /// Feed one canvas notification through the recording rules.
    pub fn observe(&mut self, event: CanvasEvent, canvas: &Canvas) {
        match event {
            CanvasEvent::Added(_) | CanvasEvent::Modified(_) | CanvasEvent::PathCreated(_) => {
                if self.is_recording() {
                    self.record(canvas.snapshot());
                }
            }
            CanvasEvent::Loaded => {
                self.pending_restores = self.pending_restores.saturating_sub(1);
            }
            CanvasEvent::Removed(_) | CanvasEvent::SelectionChanged => {}
        }
    }

    /// Mark the start of a pointer gesture.
    pub fn begin_gesture(&mut self) {
        self.gesture = true;
    }

    /// Close the current gesture and record the canvas once.
    /// Returns whether an entry was pushed.
    pub fn end_gesture(&mut self, canvas: &Canvas) -> bool {
        if !std::mem::take(&mut self.gesture) {
            return false;
        }
        if self.guard() == HistoryGuard::Suppressed {
            return false;
        }
        self.record(canvas.snapshot())
    }

    /// Step back one state. No-op (returns `false`) at the initial state.
    ///
    /// # Errors
    /// Fails only if the stored snapshot cannot be loaded; stacks are left
    /// unchanged in that case.
    pub fn undo(&mut self, canvas: &mut Canvas) -> Result<bool> {
        let len = self.undo_stack.len();
        if len <= 1 {
            return Ok(false);
        }
        let target = self.undo_stack[len - 2].clone();
        self.restore(canvas, &target)?;

        if let Some(top) = self.undo_stack.pop() {
            self.redo_stack.push(top);
        }
        self.last_recorded = target;
        log::debug!(
            "history: undo (undo={}, redo={})",
            self.undo_stack.len(),
            self.redo_stack.len()
        );
        Ok(true)
    }

    /// Re-apply the most recently undone state. No-op when redo is empty.
    ///
    /// # Errors
    /// Fails only if the stored snapshot cannot be loaded.
    pub fn redo(&mut self, canvas: &mut Canvas) -> Result<bool> {
        let Some(next) = self.redo_stack.last().cloned() else {
            return Ok(false);
        };
        self.restore(canvas, &next)?;

        self.redo_stack.pop();
        self.undo_stack.push(next.clone());
        self.last_recorded = next;
        log::debug!(
            "history: redo (undo={}, redo={})",
            self.undo_stack.len(),
            self.redo_stack.len()
        );
        Ok(true)
    }

    /// Remove `id` from the canvas and commit the result. Deletion always
    /// counts as a change.
    pub fn on_delete(&mut self, canvas: &mut Canvas, id: ObjectId) -> Option<Drawable> {
        let removed = canvas.remove(id)?;
        self.commit(canvas.snapshot());
        Some(removed)
    }

    fn restore(&mut self, canvas: &mut Canvas, snapshot: &Snapshot) -> Result<()> {
        self.pending_restores += 1;
        if let Err(e) = canvas.load_snapshot(snapshot) {
            self.pending_restores -= 1;
            return Err(e.into());
        }
        Ok(())
    }

    pub fn can_undo(&self) -> bool {
        self.undo_stack.len() > 1
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_depth(&self) -> usize {
        self.redo_stack.len()
    }

    /// The state the canvas is expected to show.
    pub fn current(&self) -> &Snapshot {
        &self.last_recorded
    }
}
