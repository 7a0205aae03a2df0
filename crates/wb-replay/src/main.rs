//! Replays a whiteboard script and prints the resulting board as JSON.
//!
//! Set `RUST_LOG=debug` to watch history and tool switches.

mod script;

use clap::Parser;
use script::{ReplayError, Script};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use wb_core::Scene;
use wb_editor::{SettingsStore, Whiteboard, WhiteboardConfig};

#[derive(Parser, Debug)]
#[command(name = "wb-replay")]
#[command(version, about = "Replay a whiteboard event script and print the resulting board")]
struct Args {
    /// JSON script of host events and board actions
    #[arg(value_name = "SCRIPT")]
    script: PathBuf,

    /// Per-tool settings to start from (JSON); defaults apply when omitted
    #[arg(value_name = "SETTINGS")]
    settings: Option<PathBuf>,
}

fn read(path: &Path) -> Result<String, ReplayError> {
    std::fs::read_to_string(path).map_err(|source| ReplayError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn run(script_path: &Path, settings_path: Option<&Path>) -> Result<serde_json::Value, ReplayError> {
    let script = Script::parse(&read(script_path)?)?;
    let settings = match settings_path {
        Some(p) => SettingsStore::from_json(&read(p)?)
            .map_err(ReplayError::Settings)?,
        None => SettingsStore::new(),
    };

    let mut board = Whiteboard::new(
        WhiteboardConfig::default(),
        settings,
        script.window.width,
        script.window.height,
    );
    let base_dir = script_path.parent().unwrap_or(Path::new("."));
    script.run(&mut board, base_dir)?;

    let scene: Scene = serde_json::from_str(board.canvas().snapshot().as_str())?;
    Ok(serde_json::json!({
        "tool": board.tool(),
        "scene": scene,
        "undo_depth": board.history().undo_depth(),
        "redo_depth": board.history().redo_depth(),
        "nodes": board.graph().nodes().collect::<Vec<_>>(),
        "edges": board.graph().edges().collect::<Vec<_>>(),
        "requests": board.take_requests(),
    }))
}

fn main() -> ExitCode {
    env_logger::init();

    let args = Args::parse();

    match run(&args.script, args.settings.as_deref()) {
        Ok(report) => {
            println!("{report:#}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("{e}");
            eprintln!("wb-replay: {e}");
            ExitCode::FAILURE
        }
    }
}
