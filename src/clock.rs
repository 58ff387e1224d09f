// src/clock.rs

use std::time::Duration;

use crate::error::{MediaError, Result};
use crate::player::{PlaybackElement, PlaybackEvent};

/// Playback element driven by a virtual clock instead of an audio device.
///
/// The host calls [`SimulatedElement::advance`] with elapsed wall time and
/// forwards the returned events to the controller.
#[derive(Debug)]
pub struct SimulatedElement {
    source_url: String,
    duration: Duration,
    position: Duration,
    playing: bool,
    metadata_sent: bool,
    pending_fault: Option<String>,
    reject_play: Option<String>,
}

impl SimulatedElement {
    pub fn new(source_url: impl Into<String>, duration: Duration) -> Self {
        Self {
            source_url: source_url.into(),
            duration,
            position: Duration::ZERO,
            playing: false,
            metadata_sent: false,
            pending_fault: None,
            reject_play: None,
        }
    }

    pub fn position(&self) -> Duration {
        self.position
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Next `advance` reports this fault instead of moving time.
    pub fn inject_fault(&mut self, detail: impl Into<String>) {
        self.pending_fault = Some(detail.into());
    }

    /// Next `play` call is refused with this detail.
    pub fn reject_next_play(&mut self, detail: impl Into<String>) {
        self.reject_play = Some(detail.into());
    }

    /// Moves the clock forward by `elapsed` and returns what the element saw.
    /// The first call always starts with `MetadataLoaded`.
    pub fn advance(&mut self, elapsed: Duration) -> Vec<PlaybackEvent> {
        let mut events = Vec::new();
        if !self.metadata_sent {
            self.metadata_sent = true;
            events.push(PlaybackEvent::MetadataLoaded(self.duration));
        }
        if let Some(detail) = self.pending_fault.take() {
            self.playing = false;
            events.push(PlaybackEvent::Error(detail));
            return events;
        }
        if !self.playing {
            return events;
        }

        self.position = (self.position + elapsed).min(self.duration);
        events.push(PlaybackEvent::TimeUpdate(self.position));
        if self.position >= self.duration {
            self.playing = false;
            events.push(PlaybackEvent::Ended);
        }
        events
    }
}

impl PlaybackElement for SimulatedElement {
    fn source_url(&self) -> &str {
        &self.source_url
    }

    fn play(&mut self) -> Result<()> {
        if let Some(detail) = self.reject_play.take() {
            return Err(MediaError::playback(detail));
        }
        if self.position >= self.duration {
            self.position = Duration::ZERO;
        }
        self.playing = true;
        Ok(())
    }

    fn pause(&mut self) {
        self.playing = false;
    }

    fn seek(&mut self, position: Duration) {
        self.position = position.min(self.duration);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_advance_reports_metadata() {
        let mut el = SimulatedElement::new("blob:mockup/1", Duration::from_secs(2));
        assert_eq!(
            el.advance(Duration::from_millis(100)),
            vec![PlaybackEvent::MetadataLoaded(Duration::from_secs(2))]
        );
        assert!(el.advance(Duration::from_millis(100)).is_empty());
    }

    #[test]
    fn clock_runs_only_while_playing_and_ends() {
        let mut el = SimulatedElement::new("blob:mockup/1", Duration::from_secs(2));
        el.advance(Duration::ZERO);
        el.play().unwrap();
        assert_eq!(
            el.advance(Duration::from_millis(1500)),
            vec![PlaybackEvent::TimeUpdate(Duration::from_millis(1500))]
        );
        assert_eq!(
            el.advance(Duration::from_secs(1)),
            vec![PlaybackEvent::TimeUpdate(Duration::from_secs(2)), PlaybackEvent::Ended]
        );
        assert!(!el.is_playing());
    }

    #[test]
    fn faults_and_rejections() {
        let mut el = SimulatedElement::new("blob:mockup/1", Duration::from_secs(2));
        el.reject_next_play("NotAllowedError");
        assert!(el.play().is_err());
        el.play().unwrap();
        el.inject_fault("MEDIA_ERR_NETWORK");
        let events = el.advance(Duration::from_millis(10));
        assert_eq!(events.last(), Some(&PlaybackEvent::Error("MEDIA_ERR_NETWORK".into())));
        assert!(!el.is_playing());
    }
}
