// src/decoder/animation.rs

use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

use crate::error::{MediaError, Result};

/// Top-level Lottie fields, read best-effort for logs and the preview.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct LottieHeader {
    pub name: Option<String>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub frame_rate: Option<f64>,
    pub in_point: Option<f64>,
    pub out_point: Option<f64>,
}

impl LottieHeader {
    fn from_value(value: &Value) -> Self {
        let num = |key: &str| value.get(key).and_then(Value::as_f64);
        Self {
            name: value.get("nm").and_then(Value::as_str).map(str::to_string),
            width: num("w"),
            height: num("h"),
            frame_rate: num("fr"),
            in_point: num("ip"),
            out_point: num("op"),
        }
    }

    /// `(op - ip) / fr`, when all three are present and sane.
    pub fn duration(&self) -> Option<Duration> {
        let (fr, ip, op) = (self.frame_rate?, self.in_point?, self.out_point?);
        if fr <= 0.0 || op < ip {
            return None;
        }
        Duration::try_from_secs_f64((op - ip) / fr).ok()
    }
}

/// Parsed animation document. The content is handed to the renderer as is.
#[derive(Clone, Debug)]
pub struct AnimationDocument {
    value: Arc<Value>,
    header: LottieHeader,
}

impl AnimationDocument {
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        let text = std::str::from_utf8(bytes)
            .map_err(|e| MediaError::invalid_animation(format!("not UTF-8 text: {e}")))?;
        let value: Value =
            serde_json::from_str(text).map_err(|e| MediaError::invalid_animation(e.to_string()))?;
        let header = LottieHeader::from_value(&value);
        tracing::debug!(?header, "animation parsed");
        Ok(Self {
            value: Arc::new(value),
            header,
        })
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn header(&self) -> &LottieHeader {
        &self.header
    }
}
