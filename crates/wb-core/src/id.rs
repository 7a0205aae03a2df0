//! Drawable identifiers.
//!
//! Ids are interned so a `Drawable` stays cheap to clone and compare. The
//! string form (`rect_4`, `path_12`) is what snapshots carry.

use lasso::{Spur, ThreadedRodeo};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;
use std::sync::atomic::{AtomicU64, Ordering};

static NAMES: LazyLock<ThreadedRodeo> = LazyLock::new(ThreadedRodeo::default);

/// Next suffix handed out by `ObjectId::with_prefix`. Shared by all canvases,
/// so ids restored from a snapshot never collide with fresh ones.
static NEXT_SUFFIX: AtomicU64 = AtomicU64::new(1);

#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct ObjectId(Spur);

impl ObjectId {
    pub fn intern(name: &str) -> Self {
        Self(NAMES.get_or_intern(name))
    }

    /// `<kind>_<n>` with a process-wide increasing `n`.
    pub fn with_prefix(kind: &str) -> Self {
        let n = NEXT_SUFFIX.fetch_add(1, Ordering::Relaxed);
        Self::intern(&format!("{kind}_{n}"))
    }

    pub fn as_str(&self) -> &str {
        NAMES.resolve(&self.0)
    }
}

impl From<String> for ObjectId {
    fn from(name: String) -> Self {
        Self::intern(&name)
    }
}

impl From<ObjectId> for String {
    fn from(id: ObjectId) -> Self {
        id.as_str().to_owned()
    }
}

impl fmt::Debug for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ObjectId").field(&self.as_str()).finish()
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn same_name_same_id() {
        assert_eq!(ObjectId::intern("ellipse_9"), ObjectId::intern("ellipse_9"));
        assert_ne!(ObjectId::intern("ellipse_9"), ObjectId::intern("ellipse_10"));
    }

    #[test]
    fn fresh_ids_never_repeat() {
        let first = ObjectId::with_prefix("curve");
        let second = ObjectId::with_prefix("curve");
        assert_ne!(first, second);
        assert!(second.as_str().starts_with("curve_"));
    }

    #[test]
    fn snapshot_form_is_the_bare_name() {
        let id = ObjectId::intern("image_2");
        assert_eq!(serde_json::to_value(id).unwrap(), serde_json::json!("image_2"));
        let back: ObjectId = serde_json::from_value(serde_json::json!("image_2")).unwrap();
        assert_eq!(back, id);
        assert_eq!(format!("{id}"), "image_2");
        assert_eq!(format!("{id:?}"), "ObjectId(\"image_2\")");
    }
}
