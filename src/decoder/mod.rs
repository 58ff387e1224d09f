// src/decoder/mod.rs

pub mod animation;
pub mod audio;
pub mod image;
pub mod rig;

use anyhow::anyhow;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use crate::classify::{classify, Classification, SlotMode};
use crate::config::EditorConfig;
use crate::error::{MediaError, Result};
use crate::waveform::{AmplitudeEnvelope, WaveformExtractor};

pub use animation::{AnimationDocument, LottieHeader};

/// A file handed over by the upload picker: declared metadata plus its bytes.
#[derive(Clone, Debug)]
pub struct UploadFile {
    pub name: String,
    pub mime: String,
    pub bytes: Arc<[u8]>,
}

impl UploadFile {
    pub fn new(name: impl Into<String>, mime: impl Into<String>, bytes: impl Into<Arc<[u8]>>) -> Self {
        Self {
            name: name.into(),
            mime: mime.into(),
            bytes: bytes.into(),
        }
    }

    /// Reads a file from disk without blocking the runtime.
    pub async fn from_path(path: impl AsRef<Path>, mime: impl Into<String>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        Ok(Self::new(name, mime, bytes))
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Filename with its last extension removed (`track.mp3` -> `track`).
    pub fn title(&self) -> &str {
        match self.name.rfind('.') {
            Some(idx) if idx > 0 => &self.name[..idx],
            _ => &self.name,
        }
    }

    pub fn extension(&self) -> Option<&str> {
        match self.name.rfind('.') {
            Some(idx) if idx + 1 < self.name.len() => Some(&self.name[idx + 1..]),
            _ => None,
        }
    }
}

/// Typed payload produced by one of the four decode paths.
#[derive(Clone, Debug)]
pub enum DecodedUpload {
    Image { url: String },
    Animation(AnimationDocument),
    Rig { bytes: Arc<[u8]> },
    Audio {
        file: UploadFile,
        envelope: AmplitudeEnvelope,
        /// Length reported by the container, when it could be read.
        duration: Option<Duration>,
    },
}

impl DecodedUpload {
    pub fn classification(&self) -> Classification {
        match self {
            Self::Image { .. } => Classification::Image,
            Self::Animation(_) => Classification::Animation,
            Self::Rig { .. } => Classification::Rig,
            Self::Audio { .. } => Classification::Audio,
        }
    }
}

/// Classifies the upload for the current slot mode and runs its decoder.
///
/// Audio decoding runs on the blocking pool; everything else is cheap enough
/// to finish on the calling task.
pub async fn classify_and_decode(
    file: UploadFile,
    mode: SlotMode,
    config: &EditorConfig,
) -> Result<DecodedUpload> {
    let kind = classify(&file.mime, &file.name, mode);
    tracing::debug!(name = %file.name, mime = %file.mime, ?mode, ?kind, "classified upload");

    match kind {
        Classification::Image => Ok(DecodedUpload::Image {
            url: image::to_data_url(&file.mime, &file.bytes),
        }),
        Classification::Animation => {
            let doc = AnimationDocument::parse(&file.bytes)?;
            Ok(DecodedUpload::Animation(doc))
        }
        Classification::Rig => {
            let bytes = rig::read_rig(&file.name, file.bytes.clone())?;
            Ok(DecodedUpload::Rig { bytes })
        }
        Classification::Audio => {
            let extractor = WaveformExtractor::from_config(config)?;
            let job = file.clone();
            let (envelope, duration) = tokio::task::spawn_blocking(move || extractor.extract(&job))
                .await
                .map_err(|e| anyhow!("waveform task failed: {e}"))??;
            Ok(DecodedUpload::Audio {
                file,
                envelope,
                duration,
            })
        }
        Classification::Unrecognized => Err(MediaError::unrecognized(&file.name, &file.mime)),
    }
}
