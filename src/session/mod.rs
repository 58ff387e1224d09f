// src/session/mod.rs

pub mod sequencer;

use std::time::Duration;

use crate::avatar::encode_avatar;
use crate::classify::{Classification, SlotMode};
use crate::clock::SimulatedElement;
use crate::config::EditorConfig;
use crate::decoder::{classify_and_decode, DecodedUpload, UploadFile};
use crate::error::Result;
use crate::object_url::ObjectUrlRegistry;
use crate::player::{PlaybackController, PlaybackElement, PlaybackEvent, PlaybackState};
use crate::slot::MediaSlot;
use crate::waveform::{pointer_fraction, render_bars, AmplitudeEnvelope, Bar};
use sequencer::{UploadSequencer, UploadTicket};

/// What a new playback element is built from.
#[derive(Clone, Copy, Debug)]
pub struct ElementSource<'a> {
    pub url: &'a str,
    /// Container length seen while decoding; the element still reports its own.
    pub duration_hint: Option<Duration>,
}

/// Decode work for one upload, tagged with its ticket.
#[derive(Debug)]
pub struct PendingUpload {
    ticket: UploadTicket,
    file: UploadFile,
    mode: SlotMode,
    config: EditorConfig,
}

impl PendingUpload {
    pub fn ticket(&self) -> UploadTicket {
        self.ticket
    }

    pub async fn decode(self) -> (UploadTicket, Result<DecodedUpload>) {
        let result = classify_and_decode(self.file, self.mode, &self.config).await;
        (self.ticket, result)
    }
}

type ElementFactory<E> = Box<dyn FnMut(ElementSource<'_>) -> E>;

/// Envelope and transport that live exactly as long as the audio asset.
pub struct AudioCard<E: PlaybackElement> {
    pub envelope: AmplitudeEnvelope,
    pub controller: PlaybackController<E>,
}

/// One editing session: the slot, its uploads and the audio card.
pub struct EditorSession<E: PlaybackElement = SimulatedElement> {
    config: EditorConfig,
    slot: MediaSlot,
    sequencer: UploadSequencer,
    urls: ObjectUrlRegistry,
    audio: Option<AudioCard<E>>,
    placeholder: AmplitudeEnvelope,
    avatar: Option<String>,
    element_factory: ElementFactory<E>,
}

impl EditorSession<SimulatedElement> {
    pub fn new(config: EditorConfig) -> Result<Self> {
        Self::with_element_factory(config, |src| {
            SimulatedElement::new(src.url, src.duration_hint.unwrap_or_default())
        })
    }

    /// Advances the simulated clock and feeds its events to the controller.
    pub fn tick(&mut self, elapsed: Duration) -> Result<()> {
        let events = match self.audio.as_mut() {
            Some(card) => card.controller.element_mut().advance(elapsed),
            None => return Ok(()),
        };
        let mut first_err = None;
        for event in events {
            if let Err(e) = self.handle_playback_event(event) {
                first_err.get_or_insert(e);
            }
        }
        first_err.map_or(Ok(()), Err)
    }
}

impl<E: PlaybackElement> EditorSession<E> {
    pub fn with_element_factory(
        config: EditorConfig,
        factory: impl FnMut(ElementSource<'_>) -> E + 'static,
    ) -> Result<Self> {
        config.validate()?;
        let placeholder = AmplitudeEnvelope::synthetic(config.envelope_len, config.synthetic_seed)?;
        Ok(Self {
            config,
            slot: MediaSlot::default(),
            sequencer: UploadSequencer::new(),
            urls: ObjectUrlRegistry::new(),
            audio: None,
            placeholder,
            avatar: None,
            element_factory: Box::new(factory),
        })
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn mode(&self) -> SlotMode {
        self.slot.mode()
    }

    pub fn slot(&self) -> &MediaSlot {
        &self.slot
    }

    pub fn object_urls(&self) -> &ObjectUrlRegistry {
        &self.urls
    }

    /// Switches the media family. The slot is emptied and pending uploads go stale.
    pub fn set_mode(&mut self, mode: SlotMode) {
        self.audio = None;
        self.slot.set_mode(mode);
        self.sequencer.invalidate();
    }

    pub fn clear(&mut self) {
        self.audio = None;
        self.slot.clear();
        self.sequencer.invalidate();
    }

    /// Issues a ticket for `file`. The returned work owns everything it needs,
    /// so it may be decoded on another task.
    pub fn begin_upload(&mut self, file: UploadFile) -> PendingUpload {
        let ticket = self.sequencer.issue();
        tracing::debug!(ticket = ticket.id(), name = %file.name, "upload started");
        PendingUpload {
            ticket,
            file,
            mode: self.slot.mode(),
            config: self.config.clone(),
        }
    }

    /// Applies a finished decode if its ticket is still current.
    ///
    /// Stale results come back as `StaleResultDiscarded` and change nothing;
    /// a current failure is returned as is and also changes nothing, but it
    /// still makes every older pending upload stale.
    pub fn apply_upload(
        &mut self,
        ticket: UploadTicket,
        result: Result<DecodedUpload>,
    ) -> Result<Classification> {
        if let Err(stale) = self.sequencer.settle(ticket) {
            tracing::debug!("{stale}");
            return Err(stale);
        }
        let decoded = match result {
            Ok(decoded) => decoded,
            Err(e) => {
                tracing::warn!("⚠️ [Upload] {e}");
                return Err(e);
            }
        };

        let kind = decoded.classification();
        // The old card goes before the slot releases its URL.
        self.audio = None;
        match decoded {
            DecodedUpload::Image { url } => self.slot.set_image(url),
            DecodedUpload::Animation(doc) => self.slot.set_animation(doc),
            DecodedUpload::Rig { bytes } => self.slot.set_rig(bytes),
            DecodedUpload::Audio {
                file,
                envelope,
                duration,
            } => {
                let url = self.urls.create(file.bytes.clone());
                let element = (self.element_factory)(ElementSource {
                    url: url.as_str(),
                    duration_hint: duration,
                });
                self.slot.set_audio(file, url);
                self.audio = Some(AudioCard {
                    envelope,
                    controller: PlaybackController::new(element),
                });
            }
        }
        Ok(kind)
    }

    /// Classify, decode and apply in one go.
    pub async fn upload(&mut self, file: UploadFile) -> Result<Classification> {
        let (ticket, result) = self.begin_upload(file).decode().await;
        self.apply_upload(ticket, result)
    }

    /// Replaces the avatar shown on the audio card. The media slot is untouched.
    pub fn set_avatar(&mut self, file: &UploadFile) -> Result<()> {
        let url = encode_avatar(file)?;
        tracing::info!("🙂 [Avatar] {} ({} bytes)", file.name, file.len());
        self.avatar = Some(url);
        Ok(())
    }

    pub fn clear_avatar(&mut self) {
        self.avatar = None;
    }

    pub fn avatar(&self) -> Option<&str> {
        self.avatar.as_deref()
    }

    pub fn audio_card(&self) -> Option<&AudioCard<E>> {
        self.audio.as_ref()
    }

    pub fn playback(&self) -> Option<&PlaybackController<E>> {
        self.audio.as_ref().map(|card| &card.controller)
    }

    pub fn playback_mut(&mut self) -> Option<&mut PlaybackController<E>> {
        self.audio.as_mut().map(|card| &mut card.controller)
    }

    pub fn playback_state(&self) -> Option<PlaybackState> {
        self.playback().map(PlaybackController::state)
    }

    pub fn envelope(&self) -> Option<&AmplitudeEnvelope> {
        self.audio.as_ref().map(|card| &card.envelope)
    }

    /// Play control is enabled only while an audio source exists.
    pub fn can_play(&self) -> bool {
        self.audio.is_some()
    }

    pub fn track_title(&self) -> &str {
        match self.slot.audio() {
            Some((file, _)) => file.title(),
            None => &self.config.default_track_title,
        }
    }

    /// Events for an element that has since been replaced are ignored.
    pub fn handle_playback_event(&mut self, event: PlaybackEvent) -> Result<()> {
        match self.playback_mut() {
            Some(controller) => controller.handle_event(event),
            None => {
                tracing::debug!(?event, "playback event without audio");
                Ok(())
            }
        }
    }

    pub fn toggle_playback(&mut self) -> Result<bool> {
        match self.playback_mut() {
            Some(controller) => controller.toggle(),
            None => Ok(false),
        }
    }

    pub fn seek_fraction(&mut self, fraction: f32) -> Option<Duration> {
        self.playback_mut()?.seek_fraction(fraction)
    }

    /// Pointer click at `offset_px` on a surface `surface_width_px` wide.
    pub fn seek_pointer(&mut self, offset_px: f32, surface_width_px: f32) -> Option<Duration> {
        self.seek_fraction(pointer_fraction(offset_px, surface_width_px))
    }

    /// Bars for the audio card; the placeholder envelope when no audio is set.
    pub fn waveform_bars(&self) -> Vec<Bar> {
        match &self.audio {
            Some(card) => {
                let state = card.controller.state();
                render_bars(
                    card.envelope.values(),
                    state.current_time,
                    state.total_duration,
                    &self.config.canvas,
                )
            }
            None => render_bars(
                self.placeholder.values(),
                Duration::ZERO,
                Duration::ZERO,
                &self.config.canvas,
            ),
        }
    }

    /// Paint colour for `bar` from the configured palette.
    pub fn bar_fill(&self, bar: &Bar) -> &str {
        bar.fill(&self.config.played_color, &self.config.unplayed_color)
    }

    pub fn placeholder_envelope(&self) -> &AmplitudeEnvelope {
        &self.placeholder
    }
}
