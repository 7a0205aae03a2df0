use serde::{Deserialize, Serialize};
use wb_core::Color;

/// Engine-wide constants a host may override.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WhiteboardConfig {
    /// Horizontal space taken by the host's toolbar.
    pub chrome_width: u32,
    /// Vertical space taken by the host's header.
    pub chrome_height: u32,
    /// Eraser reach around the pointer, in canvas units.
    pub eraser_radius: f64,
    /// Distance of a connector curve's control point from the midpoint.
    pub curve_offset: f64,
    /// Scale applied to imported images.
    pub image_scale: f64,
    pub background: Color,
}

impl Default for WhiteboardConfig {
    fn default() -> Self {
        Self {
            chrome_width: 64,
            chrome_height: 80,
            eraser_radius: 10.0,
            curve_offset: 50.0,
            image_scale: 0.5,
            background: Color::WHITE,
        }
    }
}

impl WhiteboardConfig {
    /// Surface size for a window, chrome subtracted, floored at zero.
    pub fn surface_size(&self, window_width: u32, window_height: u32) -> (u32, u32) {
        (
            window_width.saturating_sub(self.chrome_width),
            window_height.saturating_sub(self.chrome_height),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn surface_size_saturates() {
        let cfg = WhiteboardConfig::default();
        assert_eq!(cfg.surface_size(1280, 800), (1216, 720));
        assert_eq!(cfg.surface_size(10, 10), (0, 0));
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg: WhiteboardConfig = serde_json::from_str(r#"{"eraser_radius":4}"#).unwrap();
        assert_eq!(cfg.eraser_radius, 4.0);
        assert_eq!(cfg.chrome_width, 64);
    }
}
