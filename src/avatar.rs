// src/avatar.rs

use crate::classify::{classify, Classification, SlotMode};
use crate::decoder::image::to_data_url;
use crate::decoder::{rig, AnimationDocument, UploadFile};
use crate::error::{MediaError, Result};

/// Encodes an avatar upload as a single `data:` URL.
///
/// Animations are validated as JSON before encoding; rigs must be non-empty.
pub fn encode_avatar(file: &UploadFile) -> Result<String> {
    match classify(&file.mime, &file.name, SlotMode::Visual) {
        Classification::Image => Ok(to_data_url(&file.mime, &file.bytes)),
        Classification::Animation => {
            AnimationDocument::parse(&file.bytes)?;
            Ok(to_data_url("application/json", &file.bytes))
        }
        Classification::Rig => {
            let bytes = rig::read_rig(&file.name, file.bytes.clone())?;
            Ok(to_data_url("application/octet-stream", &bytes))
        }
        Classification::Audio | Classification::Unrecognized => {
            Err(MediaError::unrecognized(&file.name, &file.mime))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_keeps_its_mime() {
        let file = UploadFile::new("face.png", "image/png", b"abc".to_vec());
        assert_eq!(encode_avatar(&file).unwrap(), "data:image/png;base64,YWJj");
    }

    #[test]
    fn animation_is_validated_then_encoded() {
        let file = UploadFile::new("face.json", "", b"{}".to_vec());
        assert_eq!(encode_avatar(&file).unwrap(), "data:application/json;base64,e30=");

        let bad = UploadFile::new("face.json", "", b"{".to_vec());
        assert!(matches!(encode_avatar(&bad), Err(MediaError::InvalidAnimationFormat(_))));
    }

    #[test]
    fn rig_uses_octet_stream() {
        let file = UploadFile::new("face.riv", "", vec![0u8, 1, 2]);
        assert_eq!(
            encode_avatar(&file).unwrap(),
            "data:application/octet-stream;base64,AAEC"
        );
    }

    #[test]
    fn audio_is_not_an_avatar() {
        let file = UploadFile::new("song.mp3", "audio/mpeg", vec![1u8]);
        assert!(matches!(encode_avatar(&file), Err(MediaError::Unrecognized { .. })));
    }
}
