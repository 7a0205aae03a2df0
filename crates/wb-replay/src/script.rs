//! Replay scripts: a window size plus an ordered list of steps.
//!
//! ```json
//! {
//!   "window": { "width": 1280, "height": 800 },
//!   "steps": [
//!     { "event": "key", "key": "r" },
//!     { "event": "pointer_down", "x": 100, "y": 100 },
//!     { "event": "pointer_up", "x": 40, "y": 30 },
//!     { "action": "import_image", "path": "logo.png" },
//!     { "action": "connect", "source": "node_1", "target": "node_2" }
//!   ]
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use wb_editor::{InputEvent, ToolKind, Whiteboard};

#[derive(Error, Debug)]
pub enum ReplayError {
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid script: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid settings: {0}")]
    Settings(wb_editor::Error),

    #[error("step {step}: {source}")]
    Step {
        step: usize,
        source: wb_editor::Error,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Window {
    pub width: u32,
    pub height: u32,
}

impl Default for Window {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 800,
        }
    }
}

/// Host operations that are not plain input events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    SetTool { tool: ToolKind },
    /// Answer to a file picker request. Relative paths resolve against
    /// the script's directory.
    ImportImage { path: PathBuf },
    EditText { content: String },
    Undo,
    Redo,
    Connect { source: String, target: String },
    ClearCanvas,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Step {
    Input(InputEvent),
    Action(Action),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Script {
    #[serde(default)]
    pub window: Window,
    pub steps: Vec<Step>,
}

impl Script {
    pub fn parse(text: &str) -> Result<Self, ReplayError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Run every step against `board`. Stops at the first failing step.
    pub fn run(&self, board: &mut Whiteboard, base_dir: &Path) -> Result<(), ReplayError> {
        for (i, step) in self.steps.iter().enumerate() {
            log::debug!("step {i}: {step:?}");
            run_step(board, step, base_dir).map_err(|e| match e {
                StepError::Editor(source) => ReplayError::Step { step: i, source },
                StepError::Io(path, source) => ReplayError::Io { path, source },
            })?;
        }
        Ok(())
    }
}

enum StepError {
    Editor(wb_editor::Error),
    Io(PathBuf, std::io::Error),
}

impl From<wb_editor::Error> for StepError {
    fn from(e: wb_editor::Error) -> Self {
        StepError::Editor(e)
    }
}

fn run_step(board: &mut Whiteboard, step: &Step, base_dir: &Path) -> Result<(), StepError> {
    match step {
        Step::Input(event) => board.handle(event)?,
        Step::Action(action) => match action {
            Action::SetTool { tool } => {
                board.set_tool(*tool);
            }
            Action::ImportImage { path } => {
                let path = base_dir.join(path);
                let bytes = std::fs::read(&path).map_err(|e| StepError::Io(path.clone(), e))?;
                board.import_image(&bytes)?;
            }
            Action::EditText { content } => {
                board.edit_text(content);
            }
            Action::Undo => {
                board.undo()?;
            }
            Action::Redo => {
                board.redo()?;
            }
            Action::Connect { source, target } => {
                board.connect_nodes(source, target)?;
            }
            Action::ClearCanvas => board.clear_canvas()?,
        },
    }
    Ok(())
}
