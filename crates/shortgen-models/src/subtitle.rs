//! Subtitle cue styling.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Vertical anchor class for a subtitle cue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "snake_case")]
pub enum SubtitlePosition {
    /// Anchored near the top edge
    Top,
    /// Vertically centered
    Center,
    /// Anchored near the bottom edge
    #[default]
    Bottom,
}

impl SubtitlePosition {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubtitlePosition::Top => "top",
            SubtitlePosition::Center => "center",
            SubtitlePosition::Bottom => "bottom",
        }
    }
}

impl fmt::Display for SubtitlePosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error parsing a subtitle position string.
#[derive(Debug, Clone, Error)]
#[error("unknown subtitle position: {0}")]
pub struct ParsePositionError(pub String);

impl FromStr for SubtitlePosition {
    type Err = ParsePositionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "top" => Ok(SubtitlePosition::Top),
            "center" => Ok(SubtitlePosition::Center),
            "bottom" => Ok(SubtitlePosition::Bottom),
            other => Err(ParsePositionError(other.to_string())),
        }
    }
}

/// One timed subtitle entry with its own style and visibility window.
///
/// Cues are supplied per render call; they are not persisted
/// independently of the clip that used them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SubtitleCue {
    /// Display text
    pub text: String,

    /// Visible from this time, in clip-local seconds
    pub start_time: f64,

    /// Visible until this time, in clip-local seconds
    pub end_time: f64,

    /// Requested font family (normalized during rendering)
    #[serde(default)]
    pub font_family: String,

    /// Font size in reference-canvas pixels; non-positive falls back to a default
    #[serde(default)]
    pub font_size: i32,

    /// CSS-style weight (400 regular, 700 bold); 0 treated as 400
    #[serde(default)]
    pub font_weight: i32,

    /// Base text color (hex, rgb()/rgba(), or a named color)
    #[serde(default)]
    pub color: String,

    /// Background box color
    #[serde(default)]
    pub bg_color: String,

    /// Background opacity in [0, 1]
    #[serde(default)]
    pub bg_opacity: f64,

    /// Vertical anchor
    #[serde(default)]
    pub position: SubtitlePosition,

    /// Force at least semi-bold weight
    #[serde(default)]
    pub bold: bool,

    /// Italic emphasis
    #[serde(default)]
    pub italic: bool,

    /// Background corner rounding, in reference pixels
    #[serde(default)]
    pub border_radius: i32,

    /// Drop-shadow strength behind the background box
    #[serde(default)]
    pub shadow_blur: i32,

    /// Highlight color for the karaoke-style overlay; empty disables it
    #[serde(default)]
    pub active_text_color: String,
}

impl SubtitleCue {
    /// Create a minimally-styled cue; everything else takes defaults.
    pub fn new(text: impl Into<String>, start_time: f64, end_time: f64) -> Self {
        Self {
            text: text.into(),
            start_time,
            end_time,
            font_family: String::new(),
            font_size: 0,
            font_weight: 0,
            color: String::new(),
            bg_color: String::new(),
            bg_opacity: 0.0,
            position: SubtitlePosition::Bottom,
            bold: false,
            italic: false,
            border_radius: 0,
            shadow_blur: 0,
            active_text_color: String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_parsing() {
        assert_eq!(
            "center".parse::<SubtitlePosition>().unwrap(),
            SubtitlePosition::Center
        );
        assert_eq!(
            "BOTTOM".parse::<SubtitlePosition>().unwrap(),
            SubtitlePosition::Bottom
        );
        assert!("middle".parse::<SubtitlePosition>().is_err());
    }

    #[test]
    fn test_cue_deserializes_with_defaults() {
        let json = r#"{"text": "Hi", "start_time": 0.0, "end_time": 2.0}"#;
        let cue: SubtitleCue = serde_json::from_str(json).unwrap();
        assert_eq!(cue.position, SubtitlePosition::Bottom);
        assert_eq!(cue.bg_opacity, 0.0);
        assert!(cue.active_text_color.is_empty());
    }
}
