use thiserror::Error;

/// Errors raised by the scene model and the graph surface.
#[derive(Error, Debug)]
pub enum Error {
    /// A snapshot could not be decoded back into a scene.
    #[error("snapshot decode error: {0}")]
    Snapshot(#[from] serde_json::Error),

    /// No drawable with this id exists on the canvas.
    #[error("unknown drawable `{0}`")]
    UnknownObject(String),

    /// No flowchart node with this id exists.
    #[error("unknown node `{0}`")]
    UnknownNode(String),

    /// The edge would violate a node's handle rules (e.g. into a text input).
    #[error("cannot connect `{from}` -> `{to}`: {reason}")]
    InvalidConnection {
        from: String,
        to: String,
        reason: &'static str,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
