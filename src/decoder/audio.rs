// src/decoder/audio.rs

use anyhow::{anyhow, Context, Result};
use std::io::Cursor;
use std::sync::Arc;
use std::time::Duration;
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::DecoderOptions;
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use symphonia::default::{get_codecs, get_probe};

/// First channel of a decoded file plus the stream facts needed for timing.
pub struct DecodedPcm {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
    pub channels: usize,
}

impl DecodedPcm {
    pub fn duration(&self) -> Duration {
        if self.sample_rate == 0 {
            return Duration::ZERO;
        }
        Duration::from_secs_f64(self.samples.len() as f64 / self.sample_rate as f64)
    }
}

/// Decodes an in-memory container and keeps channel 0 only.
pub fn decode_first_channel(
    bytes: Arc<[u8]>,
    extension: Option<&str>,
    mime: Option<&str>,
) -> Result<DecodedPcm> {
    let mss = MediaSourceStream::new(Box::new(Cursor::new(bytes)), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = extension {
        hint.with_extension(ext);
    }
    if let Some(mime) = mime.filter(|m| !m.is_empty()) {
        hint.mime_type(mime);
    }

    let probed = get_probe()
        .format(&hint, mss, &FormatOptions::default(), &MetadataOptions::default())
        .context("probing audio container")?;
    let mut format = probed.format;
    let track = format
        .default_track()
        .ok_or_else(|| anyhow!("no default audio track"))?;
    let track_id = track.id;
    let codec_params = track.codec_params.clone();

    let mut decoder = get_codecs()
        .make(&codec_params, &DecoderOptions::default())
        .context("creating audio decoder")?;
    let mut sample_buf: Option<SampleBuffer<f32>> = None;
    let mut out = Vec::<f32>::new();

    let mut sample_rate = codec_params.sample_rate.unwrap_or(44_100);
    let mut channels = codec_params.channels.map(|c| c.count()).unwrap_or(1);
    let mut format_locked = false;

    loop {
        let packet = match format.next_packet() {
            Ok(p) => p,
            Err(SymphoniaError::IoError(_)) => break, // end of stream
            Err(SymphoniaError::ResetRequired) => break,
            Err(e) => return Err(e).context("reading audio packet"),
        };
        if packet.track_id() != track_id {
            continue;
        }

        let decoded = match decoder.decode(&packet) {
            Ok(d) => d,
            Err(SymphoniaError::DecodeError(e)) => {
                tracing::debug!(error = e, "skipping undecodable packet");
                continue;
            }
            Err(e) => return Err(e).context("decoding audio packet"),
        };

        let spec = *decoded.spec();
        let capacity = decoded.capacity();

        if !format_locked {
            if decoded.frames() == 0 {
                continue;
            }
            sample_rate = spec.rate;
            channels = spec.channels.count();
            format_locked = true;
            tracing::debug!(sample_rate, channels, "locked audio format");
        }

        let needs_alloc = sample_buf
            .as_ref()
            .is_none_or(|b| b.capacity() < capacity);
        if needs_alloc {
            sample_buf = Some(SampleBuffer::<f32>::new(capacity as u64, spec));
        }
        let Some(buf) = sample_buf.as_mut() else {
            continue;
        };
        buf.copy_interleaved_ref(decoded);

        // Packets may disagree with the locked layout; stride by their own count.
        let stride = spec.channels.count().max(1);
        out.extend(buf.samples().iter().step_by(stride).copied());
    }

    tracing::debug!(samples = out.len(), "decoded first channel");
    Ok(DecodedPcm {
        samples: out,
        sample_rate,
        channels,
    })
}
