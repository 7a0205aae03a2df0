//! Per-tool configuration.
//!
//! The host's settings panel writes here; tools read a `ToolConfig` only
//! when they construct a drawable. Changing a setting never restyles
//! existing drawables.

use crate::error::Result;
use crate::tools::ToolKind;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::collections::BTreeMap;
use wb_core::model::{FontSpec, Style};
use wb_core::{Color, NodeKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DashStyle {
    #[default]
    Solid,
    Dashed,
    Dotted,
}

impl DashStyle {
    /// On/off pattern for a stroke of the given width.
    pub fn pattern(self, width: f64) -> SmallVec<[f64; 2]> {
        let w = width.max(1.0);
        match self {
            DashStyle::Solid => SmallVec::new(),
            DashStyle::Dashed => smallvec::smallvec![w * 4.0, w * 2.0],
            DashStyle::Dotted => smallvec::smallvec![w, w * 2.0],
        }
    }
}

/// Which ends of a connector get an arrowhead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArrowMode {
    #[default]
    None,
    Start,
    End,
    Both,
}

impl ArrowMode {
    pub fn at_start(self) -> bool {
        matches!(self, ArrowMode::Start | ArrowMode::Both)
    }

    pub fn at_end(self) -> bool {
        matches!(self, ArrowMode::End | ArrowMode::Both)
    }
}

/// Settings for one tool. Fields a tool does not use are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolConfig {
    pub color: Color,
    /// Stroke width (or eraser radius hint for hosts).
    pub size: f64,
    pub opacity: f64,
    pub dash: DashStyle,
    pub fill: Color,
    pub font_family: String,
    pub font_size: f64,
    pub arrow: ArrowMode,
    /// Connector draws a quadratic curve instead of a straight line.
    pub curve: bool,
    pub node_kind: NodeKind,
}

impl Default for ToolConfig {
    fn default() -> Self {
        let font = FontSpec::default();
        Self {
            color: Color::BLACK,
            size: 2.0,
            opacity: 1.0,
            dash: DashStyle::Solid,
            fill: Color::TRANSPARENT,
            font_family: font.family,
            font_size: font.size,
            arrow: ArrowMode::None,
            curve: false,
            node_kind: NodeKind::Standard,
        }
    }
}

impl ToolConfig {
    /// Style for a freshly constructed drawable.
    pub fn style(&self) -> Style {
        Style {
            stroke: self.color,
            stroke_width: self.size,
            dash: self.dash.pattern(self.size),
            fill: self.fill,
            opacity: self.opacity,
        }
    }

    pub fn font(&self) -> FontSpec {
        FontSpec {
            family: self.font_family.clone(),
            size: self.font_size,
        }
    }
}

/// `ToolConfig` per tool, falling back to defaults for unset tools.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SettingsStore {
    tools: BTreeMap<ToolKind, ToolConfig>,
}

impl SettingsStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Config for `tool`; the default record if none was set.
    pub fn get(&self, tool: ToolKind) -> ToolConfig {
        self.tools.get(&tool).cloned().unwrap_or_default()
    }

    /// Mutable access, inserting the default record first if needed.
    pub fn get_mut(&mut self, tool: ToolKind) -> &mut ToolConfig {
        self.tools.entry(tool).or_default()
    }

    pub fn set(&mut self, tool: ToolKind, config: ToolConfig) {
        log::debug!("settings: {tool:?} updated");
        self.tools.insert(tool, config);
    }

    /// # Errors
    /// `Error::Settings` if the text is not a settings object.
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// # Errors
    /// `Error::Settings` if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults_match_a_fresh_board() {
        let cfg = SettingsStore::new().get(ToolKind::Rectangle);
        assert_eq!(cfg.color, Color::BLACK);
        assert_eq!(cfg.size, 2.0);
        assert!(cfg.fill.is_transparent());
        assert_eq!(cfg.font(), FontSpec::default());
        assert_eq!(cfg.arrow, ArrowMode::None);
    }

    #[test]
    fn set_is_per_tool() {
        let mut store = SettingsStore::new();
        store.get_mut(ToolKind::Draw).size = 8.0;
        assert_eq!(store.get(ToolKind::Draw).size, 8.0);
        assert_eq!(store.get(ToolKind::Rectangle).size, 2.0);
    }

    #[test]
    fn json_roundtrip_by_tool_name() {
        let json = r##"{
            "connector": { "arrow": "both", "curve": true, "color": "#FF0000" },
            "flowchart": { "node_kind": "text_input" }
        }"##;
        let store = SettingsStore::from_json(json).unwrap();
        let conn = store.get(ToolKind::Connector);
        assert_eq!(conn.arrow, ArrowMode::Both);
        assert!(conn.curve);
        assert_eq!(conn.color, Color::from_hex("#FF0000").unwrap());
        assert_eq!(conn.size, 2.0);
        assert_eq!(store.get(ToolKind::Flowchart).node_kind, NodeKind::TextInput);

        let back = SettingsStore::from_json(&store.to_json().unwrap()).unwrap();
        assert_eq!(back, store);
    }

    #[test]
    fn dash_pattern_scales_with_width() {
        assert!(DashStyle::Solid.pattern(3.0).is_empty());
        assert_eq!(DashStyle::Dashed.pattern(3.0).as_slice(), &[12.0, 6.0]);
    }

    #[test]
    fn bad_json_is_an_error() {
        assert!(SettingsStore::from_json("[1, 2]").is_err());
    }
}
