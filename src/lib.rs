// src/lib.rs

pub mod avatar;
pub mod classify;
pub mod clock;
pub mod config;
pub mod decoder;
pub mod error;
pub mod object_url;
pub mod player;
pub mod session;
pub mod slot;
pub mod waveform;

pub use classify::{accept_filter, classify, Classification, SlotMode};
pub use clock::SimulatedElement;
pub use config::{CanvasGeometry, DecodeFallback, EditorConfig};
pub use decoder::{classify_and_decode, DecodedUpload, UploadFile};
pub use error::{MediaError, Result};
pub use player::{PlaybackController, PlaybackElement, PlaybackEvent, PlaybackPhase, PlaybackState};
pub use session::EditorSession;
pub use slot::{MediaAsset, MediaSlot};
pub use waveform::{AmplitudeEnvelope, Bar, EnvelopeSource, WaveformExtractor};
