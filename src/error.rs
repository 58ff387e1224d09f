// src/error.rs

/// Result alias carrying [`MediaError`].
pub type Result<T> = std::result::Result<T, MediaError>;

/// Every failure the media core can report. None of them end the editing session.
#[derive(Debug, thiserror::Error)]
pub enum MediaError {
    /// Upload matched none of the classification rules.
    #[error("unrecognized upload `{name}` ({mime})")]
    Unrecognized { name: String, mime: String },

    /// Structured animation content could not be parsed.
    #[error("invalid animation format: {0}")]
    InvalidAnimationFormat(String),

    /// Audio container/codec could not be decoded into samples.
    #[error("audio decode failure: {0}")]
    AudioDecodeFailure(String),

    /// The playback element reported a runtime fault.
    #[error("audio playback error: {0}")]
    AudioPlaybackError(String),

    /// A decode result arrived after a newer upload was requested.
    #[error("stale upload result discarded (ticket {ticket}, latest {latest})")]
    StaleResultDiscarded { ticket: u64, latest: u64 },

    #[error("envelope length must be at least 1")]
    InvalidEnvelopeLength,

    #[error("rig file `{0}` is empty")]
    EmptyRig(String),

    #[error("config error: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl MediaError {
    pub fn unrecognized(name: impl Into<String>, mime: impl Into<String>) -> Self {
        Self::Unrecognized {
            name: name.into(),
            mime: mime.into(),
        }
    }

    pub fn invalid_animation(msg: impl Into<String>) -> Self {
        Self::InvalidAnimationFormat(msg.into())
    }

    pub fn playback(msg: impl Into<String>) -> Self {
        Self::AudioPlaybackError(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Stale results are internal bookkeeping; everything else needs a notice.
    pub fn is_user_visible(&self) -> bool {
        !matches!(self, Self::StaleResultDiscarded { .. })
    }

    /// Short text for the panel's notice area.
    pub fn notice(&self) -> String {
        match self {
            Self::Unrecognized { name, .. } => {
                format!("Unsupported file `{name}`. Use an image, GIF, Lottie JSON, .riv or audio file")
            }
            Self::InvalidAnimationFormat(_) => "Please select a valid Lottie JSON file".to_string(),
            Self::AudioDecodeFailure(_) => "Could not read the audio waveform".to_string(),
            Self::AudioPlaybackError(_) => "Audio playback failed".to_string(),
            Self::EmptyRig(name) => format!("Rig file `{name}` is empty"),
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stale_results_are_silent() {
        let stale = MediaError::StaleResultDiscarded { ticket: 1, latest: 2 };
        assert!(!stale.is_user_visible());
        assert!(MediaError::unrecognized("a.txt", "text/plain").is_user_visible());
        assert!(MediaError::playback("boom").is_user_visible());
    }

    #[test]
    fn animation_notice_matches_panel_text() {
        let err = MediaError::invalid_animation("expected value at line 1");
        assert_eq!(err.notice(), "Please select a valid Lottie JSON file");
        assert!(err.to_string().contains("invalid animation format"));
    }

    #[test]
    fn other_preserves_source() {
        let err = MediaError::Other(anyhow::anyhow!("probe failed"));
        assert!(err.to_string().contains("probe failed"));
    }
}
