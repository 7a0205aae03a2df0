pub mod config;
pub mod error;
pub mod history;
pub mod import;
pub mod input;
pub mod settings;
pub mod shortcuts;
pub mod tools;
pub mod whiteboard;

pub use config::WhiteboardConfig;
pub use error::{Error, Result};
pub use history::{History, HistoryGuard};
pub use input::{InputEvent, Modifiers};
pub use settings::{ArrowMode, DashStyle, SettingsStore, ToolConfig};
pub use shortcuts::{ShortcutAction, ShortcutMap};
pub use tools::{HostRequest, ToolKind};
pub use whiteboard::Whiteboard;
