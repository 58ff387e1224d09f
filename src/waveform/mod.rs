// src/waveform/mod.rs
pub mod render;
pub mod terminal;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

use crate::config::{DecodeFallback, EditorConfig};
use crate::decoder::audio::decode_first_channel;
use crate::decoder::UploadFile;
use crate::error::{MediaError, Result};

pub use render::{parse_hex_color, pointer_fraction, progress_ratio, render_bars, Bar};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum EnvelopeSource {
    /// Block means of the decoded signal.
    Decoded,
    /// Placeholder values; the signal was unavailable.
    Synthetic,
}

/// Fixed-length sequence of per-block mean absolute amplitudes.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AmplitudeEnvelope {
    values: Arc<[f32]>,
    source: EnvelopeSource,
}

impl AmplitudeEnvelope {
    /// Splits `samples` into `len` equal blocks (remainder dropped) and
    /// averages `|s|` in each.
    ///
    /// Fails with `AudioDecodeFailure` when there are fewer samples than
    /// blocks, since the block size would be zero.
    pub fn from_samples(samples: &[f32], len: usize) -> Result<Self> {
        if len == 0 {
            return Err(MediaError::InvalidEnvelopeLength);
        }
        let block = samples.len() / len;
        if block == 0 {
            return Err(MediaError::AudioDecodeFailure(format!(
                "{} samples cannot fill {} blocks",
                samples.len(),
                len
            )));
        }

        let values: Vec<f32> = samples
            .chunks_exact(block)
            .take(len)
            .map(|chunk| {
                let sum: f64 = chunk.iter().map(|s| s.abs() as f64).sum();
                (sum / block as f64) as f32
            })
            .collect();

        Ok(Self {
            values: values.into(),
            source: EnvelopeSource::Decoded,
        })
    }

    /// `len` independent draws from `[0, 1)`.
    pub fn synthetic(len: usize, seed: Option<u64>) -> Result<Self> {
        if len == 0 {
            return Err(MediaError::InvalidEnvelopeLength);
        }
        let values: Vec<f32> = match seed {
            Some(seed) => {
                let mut rng = StdRng::seed_from_u64(seed);
                (0..len).map(|_| rng.random::<f32>()).collect()
            }
            None => {
                let mut rng = rand::rng();
                (0..len).map(|_| rng.random::<f32>()).collect()
            }
        };
        Ok(Self {
            values: values.into(),
            source: EnvelopeSource::Synthetic,
        })
    }

    pub fn values(&self) -> &[f32] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn source(&self) -> EnvelopeSource {
        self.source
    }

    pub fn is_synthetic(&self) -> bool {
        self.source == EnvelopeSource::Synthetic
    }
}

/// Turns an audio upload into an envelope, applying the decode fallback policy.
#[derive(Clone, Debug)]
pub struct WaveformExtractor {
    len: usize,
    fallback: DecodeFallback,
    seed: Option<u64>,
}

impl WaveformExtractor {
    pub fn new(len: usize, fallback: DecodeFallback, seed: Option<u64>) -> Result<Self> {
        if len == 0 {
            return Err(MediaError::InvalidEnvelopeLength);
        }
        Ok(Self { len, fallback, seed })
    }

    pub fn from_config(config: &EditorConfig) -> Result<Self> {
        Self::new(config.envelope_len, config.decode_fallback, config.synthetic_seed)
    }

    /// Blocking: decodes the whole file. Returns the envelope and, when the
    /// container could be read, its duration.
    pub fn extract(&self, file: &UploadFile) -> Result<(AmplitudeEnvelope, Option<Duration>)> {
        let decoded = decode_first_channel(file.bytes.clone(), file.extension(), Some(&file.mime))
            .map_err(|e| MediaError::AudioDecodeFailure(format!("{e:#}")));

        let (attempt, duration) = match decoded {
            Ok(pcm) => {
                let duration = pcm.duration();
                tracing::info!(
                    "🎧 [Waveform] {}: {} samples @ {} Hz, {} ch, {:.2?}",
                    file.name,
                    pcm.samples.len(),
                    pcm.sample_rate,
                    pcm.channels,
                    duration
                );
                (AmplitudeEnvelope::from_samples(&pcm.samples, self.len), Some(duration))
            }
            Err(e) => (Err(e), None),
        };

        match attempt {
            Ok(envelope) => Ok((envelope, duration)),
            Err(MediaError::AudioDecodeFailure(reason)) if self.fallback == DecodeFallback::Synthetic => {
                tracing::warn!("⚠️ [Waveform] {}: {reason}; using synthetic envelope", file.name);
                Ok((AmplitudeEnvelope::synthetic(self.len, self.seed)?, duration))
            }
            Err(e) => Err(e),
        }
    }
}
