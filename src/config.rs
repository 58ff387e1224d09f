// src/config.rs

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use crate::error::{MediaError, Result};
use crate::waveform::parse_hex_color;

/// What the extractor does when the audio container cannot be decoded.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecodeFallback {
    /// Substitute N pseudo-random values so the card still shows something.
    #[default]
    Synthetic,
    /// Report `AudioDecodeFailure` to the caller.
    Strict,
}

/// Pixel geometry of the waveform surface.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasGeometry {
    pub width: f32,
    pub height: f32,
    pub min_bar_height: f32,
    /// Fraction of the surface height a full-scale bar may take.
    pub height_scale: f32,
}

impl Default for CanvasGeometry {
    fn default() -> Self {
        Self {
            width: 200.0,
            height: 30.0,
            min_bar_height: 2.0,
            height_scale: 0.8,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub envelope_len: usize,
    pub canvas: CanvasGeometry,
    pub played_color: String,
    pub unplayed_color: String,
    pub decode_fallback: DecodeFallback,
    /// Fixed seed for synthetic envelopes; `None` draws from the thread RNG.
    pub synthetic_seed: Option<u64>,
    pub default_track_title: String,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            envelope_len: 60,
            canvas: CanvasGeometry::default(),
            played_color: "#10b981".to_string(),
            unplayed_color: "#d1d5db".to_string(),
            decode_fallback: DecodeFallback::Synthetic,
            synthetic_seed: None,
            default_track_title: "Audio Track".to_string(),
        }
    }
}

impl EditorConfig {
    pub fn validate(&self) -> Result<()> {
        if self.envelope_len == 0 {
            return Err(MediaError::InvalidEnvelopeLength);
        }
        if !(self.canvas.width > 0.0 && self.canvas.height > 0.0) {
            return Err(MediaError::config(format!(
                "canvas must have a positive size, got {}x{}",
                self.canvas.width, self.canvas.height
            )));
        }
        for color in [&self.played_color, &self.unplayed_color] {
            if parse_hex_color(color).is_none() {
                return Err(MediaError::config(format!("`{color}` is not a #rrggbb colour")));
            }
        }
        Ok(())
    }

    pub fn load_from_disk(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        let reader = BufReader::new(file);
        let config: Self = serde_json::from_reader(reader).map_err(|e| {
            MediaError::config(format!("{}: {e}", path.as_ref().display()))
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn save_to_disk(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = File::create(path)?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)
            .map_err(|e| MediaError::config(e.to_string()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg: EditorConfig =
            serde_json::from_str(r#"{ "envelope_len": 32, "canvas": { "width": 320.0 } }"#).unwrap();
        assert_eq!(cfg.envelope_len, 32);
        assert_eq!(cfg.canvas.width, 320.0);
        assert_eq!(cfg.canvas.height, 30.0);
        assert_eq!(cfg.decode_fallback, DecodeFallback::Synthetic);
        assert_eq!(cfg.played_color, "#10b981");
    }

    #[test]
    fn zero_envelope_is_rejected() {
        let cfg = EditorConfig {
            envelope_len: 0,
            ..Default::default()
        };
        assert!(matches!(cfg.validate(), Err(MediaError::InvalidEnvelopeLength)));
    }

    #[test]
    fn bar_colours_must_be_hex() {
        let cfg = EditorConfig {
            played_color: "green".to_string(),
            ..Default::default()
        };
        assert!(matches!(cfg.validate(), Err(MediaError::Config(_))));
        assert!(EditorConfig::default().validate().is_ok());
    }

    #[test]
    fn save_then_load_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("editor.json");
        let cfg = EditorConfig {
            decode_fallback: DecodeFallback::Strict,
            synthetic_seed: Some(7),
            ..Default::default()
        };
        cfg.save_to_disk(&path).unwrap();
        assert_eq!(EditorConfig::load_from_disk(&path).unwrap(), cfg);
    }

    #[test]
    fn malformed_file_is_a_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{ envelope_len: ").unwrap();
        assert!(matches!(
            EditorConfig::load_from_disk(&path),
            Err(MediaError::Config(_))
        ));
    }
}
