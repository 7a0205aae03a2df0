//! Scene state and its canonical snapshot form.
//!
//! A `Snapshot` is the compact JSON serialization of a `Scene`. Field order
//! is fixed by the type definitions, so equal scenes always produce
//! byte-identical snapshots and history can compare them as plain strings.

use crate::color::Color;
use crate::error::Result;
use crate::id::ObjectId;
use crate::model::Drawable;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The freeform surface's content: ordered drawables plus background.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    pub background: Color,
    pub objects: Vec<Drawable>,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new(Color::WHITE)
    }
}

impl Scene {
    pub fn new(background: Color) -> Self {
        Self {
            background,
            objects: Vec::new(),
        }
    }

    /// Serialize to the canonical snapshot text.
    pub fn snapshot(&self) -> Snapshot {
        match serde_json::to_string(self) {
            Ok(text) => Snapshot(text),
            Err(e) => {
                // Only reachable with a non-string map key, which the model has none of.
                log::error!("scene serialization failed: {e}");
                Snapshot(String::new())
            }
        }
    }

    /// Rebuild a scene from snapshot text.
    ///
    /// # Errors
    /// Returns `Error::Snapshot` if the text is not a valid scene.
    pub fn from_snapshot(snapshot: &Snapshot) -> Result<Self> {
        Ok(serde_json::from_str(&snapshot.0)?)
    }

    pub fn index_of(&self, id: ObjectId) -> Option<usize> {
        self.objects.iter().position(|o| o.id == id)
    }

    pub fn get(&self, id: ObjectId) -> Option<&Drawable> {
        self.objects.iter().find(|o| o.id == id)
    }

    pub fn get_mut(&mut self, id: ObjectId) -> Option<&mut Drawable> {
        self.objects.iter_mut().find(|o| o.id == id)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

/// Canonical text form of a scene; a history stack entry.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Snapshot(String);

impl Snapshot {
    /// Wrap text produced elsewhere (e.g. persisted by a host).
    /// Validity is only checked when the snapshot is loaded.
    pub fn from_text(text: impl Into<String>) -> Self {
        Snapshot(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Debug for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const PREVIEW: usize = 64;
        match self.0.char_indices().nth(PREVIEW) {
            Some((cut, _)) => write!(f, "Snapshot({}… {} bytes)", &self.0[..cut], self.0.len()),
            None => write!(f, "Snapshot({})", self.0),
        }
    }
}
