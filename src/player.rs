// src/player.rs

use serde::Serialize;
use std::time::Duration;

use crate::error::{MediaError, Result};

/// Notifications coming from the playback element.
#[derive(Clone, Debug, PartialEq)]
pub enum PlaybackEvent {
    TimeUpdate(Duration),
    MetadataLoaded(Duration),
    Ended,
    Error(String),
}

/// The element that actually produces sound for one source URL.
pub trait PlaybackElement {
    fn source_url(&self) -> &str;
    fn play(&mut self) -> Result<()>;
    fn pause(&mut self);
    fn seek(&mut self, position: Duration);
}

impl<T: PlaybackElement + ?Sized> PlaybackElement for Box<T> {
    fn source_url(&self) -> &str {
        (**self).source_url()
    }
    fn play(&mut self) -> Result<()> {
        (**self).play()
    }
    fn pause(&mut self) {
        (**self).pause()
    }
    fn seek(&mut self, position: Duration) {
        (**self).seek(position)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum PlaybackPhase {
    /// Waiting for the duration to become known.
    Unloaded,
    Stopped,
    Paused,
    Playing,
}

/// Snapshot handed to the view.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct PlaybackState {
    pub is_playing: bool,
    pub current_time: Duration,
    pub total_duration: Duration,
}

/// Play/pause/seek state machine for one audio asset.
///
/// Time only moves when the element reports it; the controller never polls.
pub struct PlaybackController<E: PlaybackElement> {
    element: E,
    phase: PlaybackPhase,
    current_time: Duration,
    total_duration: Duration,
}

impl<E: PlaybackElement> PlaybackController<E> {
    pub fn new(element: E) -> Self {
        Self {
            element,
            phase: PlaybackPhase::Unloaded,
            current_time: Duration::ZERO,
            total_duration: Duration::ZERO,
        }
    }

    pub fn phase(&self) -> PlaybackPhase {
        self.phase
    }

    pub fn state(&self) -> PlaybackState {
        PlaybackState {
            is_playing: self.phase == PlaybackPhase::Playing,
            current_time: self.current_time,
            total_duration: self.total_duration,
        }
    }

    pub fn current_time(&self) -> Duration {
        self.current_time
    }

    pub fn total_duration(&self) -> Duration {
        self.total_duration
    }

    pub fn is_playing(&self) -> bool {
        self.phase == PlaybackPhase::Playing
    }

    pub fn is_loaded(&self) -> bool {
        self.phase != PlaybackPhase::Unloaded
    }

    pub fn element(&self) -> &E {
        &self.element
    }

    pub fn element_mut(&mut self) -> &mut E {
        &mut self.element
    }

    /// Returns whether playback is running afterwards. A no-op before metadata.
    pub fn play(&mut self) -> Result<bool> {
        match self.phase {
            PlaybackPhase::Unloaded => Ok(false),
            PlaybackPhase::Playing => Ok(true),
            PlaybackPhase::Stopped | PlaybackPhase::Paused => {
                if let Err(e) = self.element.play() {
                    self.phase = PlaybackPhase::Paused;
                    tracing::warn!("❌ [Player] play rejected: {e}");
                    return Err(match e {
                        MediaError::AudioPlaybackError(_) => e,
                        other => MediaError::playback(other.to_string()),
                    });
                }
                self.transition(PlaybackPhase::Playing);
                Ok(true)
            }
        }
    }

    pub fn pause(&mut self) {
        if self.phase == PlaybackPhase::Playing {
            self.element.pause();
            self.transition(PlaybackPhase::Paused);
        }
    }

    pub fn toggle(&mut self) -> Result<bool> {
        if self.is_playing() {
            self.pause();
            Ok(false)
        } else {
            self.play()
        }
    }

    /// Seeks to `fraction` of the track (clamped to `[0, 1]`) and pauses there.
    /// Returns the target, or `None` while the duration is unknown.
    pub fn seek_fraction(&mut self, fraction: f32) -> Option<Duration> {
        if self.total_duration.is_zero() {
            return None;
        }
        let fraction = if fraction.is_nan() { 0.0 } else { fraction.clamp(0.0, 1.0) };
        let target = self.total_duration.mul_f64(fraction as f64);
        self.seek_to(target)
    }

    /// Absolute seek, clamped to the track length. Pauses at the target.
    pub fn seek_to(&mut self, target: Duration) -> Option<Duration> {
        if self.total_duration.is_zero() {
            return None;
        }
        let target = target.min(self.total_duration);
        if self.phase == PlaybackPhase::Playing {
            self.element.pause();
        }
        self.element.seek(target);
        self.current_time = target;
        self.transition(PlaybackPhase::Paused);
        Some(target)
    }

    /// Applies one element notification. Errors leave the controller paused
    /// and are returned so the caller can show a notice.
    pub fn handle_event(&mut self, event: PlaybackEvent) -> Result<()> {
        match event {
            PlaybackEvent::MetadataLoaded(duration) => {
                self.total_duration = duration;
                self.current_time = self.current_time.min(duration);
                if self.phase == PlaybackPhase::Unloaded {
                    self.current_time = Duration::ZERO;
                    self.transition(PlaybackPhase::Stopped);
                }
                tracing::debug!(?duration, "metadata loaded");
            }
            PlaybackEvent::TimeUpdate(t) => match self.phase {
                PlaybackPhase::Unloaded | PlaybackPhase::Stopped => {}
                PlaybackPhase::Playing if t >= self.total_duration => self.stop_at_end(),
                PlaybackPhase::Playing | PlaybackPhase::Paused => {
                    self.current_time = t.min(self.total_duration);
                }
            },
            PlaybackEvent::Ended => {
                if self.phase != PlaybackPhase::Unloaded {
                    self.stop_at_end();
                }
            }
            PlaybackEvent::Error(detail) => {
                if self.phase == PlaybackPhase::Playing {
                    self.element.pause();
                }
                if self.phase != PlaybackPhase::Unloaded {
                    self.transition(PlaybackPhase::Paused);
                }
                tracing::warn!("❌ [Player] {}: {detail}", self.element.source_url());
                return Err(MediaError::playback(detail));
            }
        }
        Ok(())
    }

    fn stop_at_end(&mut self) {
        if self.phase == PlaybackPhase::Playing {
            self.element.pause();
        }
        self.element.seek(Duration::ZERO);
        self.current_time = Duration::ZERO;
        self.transition(PlaybackPhase::Stopped);
    }

    fn transition(&mut self, next: PlaybackPhase) {
        if self.phase != next {
            tracing::debug!(from = ?self.phase, to = ?next, at = ?self.current_time, "playback transition");
            self.phase = next;
        }
    }
}
