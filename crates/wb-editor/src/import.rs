//! Image file import.
//!
//! Decodes the picked file with the `image` crate to validate it and read
//! its pixel size, then embeds the original bytes as a `data:` URI so the
//! drawable survives a snapshot round trip without external references.

use crate::error::Result;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use image::GenericImageView;
use wb_core::{Drawable, DrawableKind, Point, Style};

/// A decoded image ready to become a drawable.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedImage {
    pub width: u32,
    pub height: u32,
    pub data_uri: String,
}

/// Decode `bytes` and build its data URI.
///
/// # Errors
/// `Error::Image` if the format is unknown or the data is corrupt.
pub fn decode(bytes: &[u8]) -> Result<DecodedImage> {
    let format = image::guess_format(bytes)?;
    let img = image::load_from_memory_with_format(bytes, format)?;
    let (width, height) = img.dimensions();
    log::debug!("import: decoded {format:?} {width}x{height}");

    let data_uri = format!("data:{};base64,{}", format.to_mime_type(), STANDARD.encode(bytes));
    Ok(DecodedImage {
        width,
        height,
        data_uri,
    })
}

/// Image drawable scaled by `scale` and centered on `center`.
pub fn image_drawable(decoded: DecodedImage, center: Point, scale: f64) -> Drawable {
    let width = f64::from(decoded.width);
    let height = f64::from(decoded.height);
    let origin = Point::new(
        center.x - width * scale / 2.0,
        center.y - height * scale / 2.0,
    );
    let mut drawable = Drawable::create(
        DrawableKind::Image {
            origin,
            width,
            height,
            src: decoded.data_uri,
        },
        Style::default(),
    );
    drawable.scale = scale;
    drawable
}
