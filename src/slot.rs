// src/slot.rs

use std::sync::Arc;

use crate::classify::{Classification, SlotMode};
use crate::decoder::{AnimationDocument, UploadFile};
use crate::object_url::ObjectUrl;

/// The one asset the phone-screen slot can show.
#[derive(Debug)]
pub enum MediaAsset {
    Image { url: String },
    Animation(AnimationDocument),
    Rig { bytes: Arc<[u8]> },
    /// `url` is revoked when this value is dropped.
    Audio { file: UploadFile, url: ObjectUrl },
}

impl MediaAsset {
    pub fn kind(&self) -> Classification {
        match self {
            Self::Image { .. } => Classification::Image,
            Self::Animation(_) => Classification::Animation,
            Self::Rig { .. } => Classification::Rig,
            Self::Audio { .. } => Classification::Audio,
        }
    }
}

/// Single-writer holder for the active asset and the slot's mode.
#[derive(Debug, Default)]
pub struct MediaSlot {
    mode: SlotMode,
    asset: Option<MediaAsset>,
}

impl MediaSlot {
    pub fn new(mode: SlotMode) -> Self {
        Self { mode, asset: None }
    }

    pub fn mode(&self) -> SlotMode {
        self.mode
    }

    /// Always empties the slot, even when `mode` is unchanged.
    pub fn set_mode(&mut self, mode: SlotMode) {
        tracing::debug!(from = ?self.mode, to = ?mode, "slot mode switched");
        self.mode = mode;
        self.clear();
    }

    pub fn set_image(&mut self, url: String) {
        self.replace(Some(MediaAsset::Image { url }));
    }

    pub fn set_animation(&mut self, doc: AnimationDocument) {
        self.replace(Some(MediaAsset::Animation(doc)));
    }

    pub fn set_rig(&mut self, bytes: Arc<[u8]>) {
        self.replace(Some(MediaAsset::Rig { bytes }));
    }

    pub fn set_audio(&mut self, file: UploadFile, url: ObjectUrl) {
        self.replace(Some(MediaAsset::Audio { file, url }));
    }

    pub fn clear(&mut self) {
        self.replace(None);
    }

    pub fn asset(&self) -> Option<&MediaAsset> {
        self.asset.as_ref()
    }

    pub fn kind(&self) -> Option<Classification> {
        self.asset.as_ref().map(MediaAsset::kind)
    }

    pub fn image_url(&self) -> Option<&str> {
        match &self.asset {
            Some(MediaAsset::Image { url }) => Some(url),
            _ => None,
        }
    }

    pub fn animation(&self) -> Option<&AnimationDocument> {
        match &self.asset {
            Some(MediaAsset::Animation(doc)) => Some(doc),
            _ => None,
        }
    }

    pub fn rig(&self) -> Option<&Arc<[u8]>> {
        match &self.asset {
            Some(MediaAsset::Rig { bytes }) => Some(bytes),
            _ => None,
        }
    }

    pub fn audio(&self) -> Option<(&UploadFile, &str)> {
        match &self.asset {
            Some(MediaAsset::Audio { file, url }) => Some((file, url.as_str())),
            _ => None,
        }
    }

    fn replace(&mut self, next: Option<MediaAsset>) {
        let previous = std::mem::replace(&mut self.asset, next);
        tracing::info!(
            "🖼️ [Slot] {:?} -> {:?}",
            previous.as_ref().map(MediaAsset::kind),
            self.kind()
        );
        // Dropping the previous asset releases its object URL, if any.
        drop(previous);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object_url::ObjectUrlRegistry;

    fn doc() -> AnimationDocument {
        AnimationDocument::parse(br#"{"w":1,"h":1}"#).unwrap()
    }

    fn audio(reg: &ObjectUrlRegistry) -> (UploadFile, ObjectUrl) {
        let file = UploadFile::new("a.mp3", "audio/mpeg", vec![1u8, 2, 3]);
        let url = reg.create(file.bytes.clone());
        (file, url)
    }

    fn populated(slot: &MediaSlot) -> usize {
        [
            slot.image_url().is_some(),
            slot.animation().is_some(),
            slot.rig().is_some(),
            slot.audio().is_some(),
        ]
        .into_iter()
        .filter(|set| *set)
        .count()
    }

    #[test]
    fn every_setter_leaves_exactly_one_variant() {
        let reg = ObjectUrlRegistry::new();
        let mut slot = MediaSlot::default();
        slot.set_image("data:image/png;base64,".into());
        assert_eq!(populated(&slot), 1);
        slot.set_animation(doc());
        assert_eq!(populated(&slot), 1);
        let (file, url) = audio(&reg);
        slot.set_audio(file, url);
        assert_eq!(populated(&slot), 1);
        slot.set_rig(Arc::from(vec![0u8; 42]));
        assert_eq!(populated(&slot), 1);
        assert_eq!(slot.rig().map(|b| b.len()), Some(42));
        slot.clear();
        assert_eq!(populated(&slot), 0);
    }

    #[test]
    fn replacing_audio_revokes_its_url() {
        let reg = ObjectUrlRegistry::new();
        let mut slot = MediaSlot::new(SlotMode::Audio);
        let (file, url) = audio(&reg);
        slot.set_audio(file, url);
        let (file, url) = audio(&reg);
        slot.set_audio(file, url);
        assert_eq!(reg.live_count(), 1);
        assert_eq!(reg.revoked_count(), 1);
        slot.set_image("data:image/gif;base64,".into());
        assert_eq!(reg.live_count(), 0);
        assert_eq!(reg.revoked_count(), 2);
    }

    #[test]
    fn mode_switch_always_clears() {
        let mut slot = MediaSlot::new(SlotMode::Visual);
        slot.set_animation(doc());
        slot.set_mode(SlotMode::Visual);
        assert!(slot.asset().is_none());
        slot.set_image("data:,".into());
        slot.set_mode(SlotMode::Audio);
        assert!(slot.asset().is_none());
        assert_eq!(slot.mode(), SlotMode::Audio);
    }
}
