// src/classify.rs

use serde::{Deserialize, Serialize};

/// Which family of media the slot currently accepts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotMode {
    /// "Image / Animation": images, GIFs, Lottie JSON, rigs.
    #[default]
    Visual,
    Audio,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum Classification {
    Image,
    Animation,
    Rig,
    Audio,
    Unrecognized,
}

/// Routes an upload by declared MIME type first, extension second.
///
/// Extension checks ignore ASCII case; the MIME type is compared as given
/// after trimming.
pub fn classify(mime: &str, filename: &str, mode: SlotMode) -> Classification {
    let mime = mime.trim();

    if mode == SlotMode::Audio && mime.starts_with("audio/") {
        Classification::Audio
    } else if mime.starts_with("image/") {
        Classification::Image
    } else if mime == "application/json" || has_extension(filename, "json") {
        Classification::Animation
    } else if has_extension(filename, "riv") {
        Classification::Rig
    } else {
        Classification::Unrecognized
    }
}

/// The `accept` attribute the upload picker should use for the mode.
pub fn accept_filter(mode: SlotMode) -> &'static str {
    match mode {
        SlotMode::Audio => "audio/*",
        SlotMode::Visual => "image/*,.gif,.json,.riv",
    }
}

fn has_extension(filename: &str, ext: &str) -> bool {
    match filename.rsplit_once('.') {
        Some((_, found)) => found.eq_ignore_ascii_case(ext),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn audio_only_in_audio_mode() {
        assert_eq!(classify("audio/mpeg", "track.mp3", SlotMode::Audio), Classification::Audio);
        assert_eq!(
            classify("audio/mpeg", "track.mp3", SlotMode::Visual),
            Classification::Unrecognized
        );
    }

    #[test]
    fn mime_rules_win_over_extensions() {
        assert_eq!(classify("audio/mpeg", "clip.json", SlotMode::Audio), Classification::Audio);
        assert_eq!(classify("image/png", "frame.riv", SlotMode::Visual), Classification::Image);
        assert_eq!(classify("image/gif", "loop.json", SlotMode::Audio), Classification::Image);
    }

    #[test]
    fn json_by_mime_or_extension() {
        assert_eq!(classify("application/json", "anim", SlotMode::Visual), Classification::Animation);
        assert_eq!(classify("", "anim.JSON", SlotMode::Visual), Classification::Animation);
        assert_eq!(classify("text/plain", "anim.json", SlotMode::Audio), Classification::Animation);
    }

    #[test]
    fn rig_by_extension_only() {
        assert_eq!(classify("", "rig.riv", SlotMode::Visual), Classification::Rig);
        assert_eq!(classify("application/octet-stream", "rig.riv", SlotMode::Audio), Classification::Rig);
        assert_eq!(classify("", "riv", SlotMode::Visual), Classification::Unrecognized);
    }

    #[test]
    fn everything_else_is_unrecognized() {
        assert_eq!(classify("text/plain", "notes.txt", SlotMode::Visual), Classification::Unrecognized);
        assert_eq!(classify("video/mp4", "clip.mp4", SlotMode::Audio), Classification::Unrecognized);
    }

    #[test]
    fn classification_is_deterministic() {
        let inputs = [
            ("audio/wav", "a.wav"),
            ("image/svg+xml", "b.svg"),
            ("application/json", "c.riv"),
            ("", "d.riv"),
            ("", "e"),
        ];
        for mode in [SlotMode::Visual, SlotMode::Audio] {
            for (mime, name) in inputs {
                assert_eq!(classify(mime, name, mode), classify(mime, name, mode));
            }
        }
    }

    #[test]
    fn accept_filter_per_mode() {
        assert_eq!(accept_filter(SlotMode::Audio), "audio/*");
        assert_eq!(accept_filter(SlotMode::Visual), "image/*,.gif,.json,.riv");
    }
}
