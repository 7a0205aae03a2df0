use thiserror::Error;

/// Errors surfaced to the host by the editor layer.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Core(#[from] wb_core::Error),

    /// The imported file is not a decodable image.
    #[error("image decode error: {0}")]
    Image(#[from] image::ImageError),

    /// Settings or config JSON could not be read or written.
    #[error("settings error: {0}")]
    Settings(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
