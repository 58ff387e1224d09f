// src/waveform/render.rs

use serde::Serialize;
use std::time::Duration;

use crate::config::CanvasGeometry;

/// One painted rectangle of the waveform surface.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Bar {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub played: bool,
}

impl Bar {
    pub fn fill<'a>(&self, played: &'a str, unplayed: &'a str) -> &'a str {
        if self.played { played } else { unplayed }
    }
}

/// Parses `#rrggbb` (or `#rgb`) into its channels.
pub fn parse_hex_color(hex: &str) -> Option<(u8, u8, u8)> {
    let digits = hex.strip_prefix('#')?;
    if !digits.is_ascii() {
        return None;
    }
    let channel = |s: &str| u8::from_str_radix(s, 16).ok();
    match digits.len() {
        6 => Some((channel(&digits[0..2])?, channel(&digits[2..4])?, channel(&digits[4..6])?)),
        3 => {
            let short = |i: usize| channel(&digits[i..i + 1]).map(|v| v * 17);
            Some((short(0)?, short(1)?, short(2)?))
        }
        _ => None,
    }
}

/// `current / total`, or 0 while the duration is unknown.
pub fn progress_ratio(current: Duration, total: Duration) -> f64 {
    if total.is_zero() {
        return 0.0;
    }
    (current.as_secs_f64() / total.as_secs_f64()).clamp(0.0, 1.0)
}

/// Full redraw of the surface from scratch.
///
/// Bar `i` counts as played when `i / n` lies strictly before the progress
/// ratio, so a ratio of one half marks exactly the first half of an even
/// number of bars and nothing is marked before playback starts. This departs
/// from an inclusive `<=` test, which would also mark bar `n / 2` at half
/// progress and bar 0 at the very start.
pub fn render_bars(
    envelope: &[f32],
    current: Duration,
    total: Duration,
    geometry: &CanvasGeometry,
) -> Vec<Bar> {
    let n = envelope.len();
    if n == 0 {
        return Vec::new();
    }

    let progress = progress_ratio(current, total);
    let bar_width = geometry.width / n as f32;
    let drawn_width = (bar_width - 1.0).max(1.0);

    envelope
        .iter()
        .enumerate()
        .map(|(i, &value)| {
            let height = (value.max(0.0) * geometry.height * geometry.height_scale)
                .max(geometry.min_bar_height);
            Bar {
                x: i as f32 * bar_width,
                y: (geometry.height - height) / 2.0,
                width: drawn_width,
                height,
                played: (i as f64 / n as f64) < progress,
            }
        })
        .collect()
}

/// Converts a pointer offset on the surface into an unclamped width fraction.
pub fn pointer_fraction(offset_px: f32, surface_width_px: f32) -> f32 {
    if surface_width_px <= 0.0 {
        return 0.0;
    }
    offset_px / surface_width_px
}

#[cfg(test)]
mod tests {
    use super::*;

    fn geometry() -> CanvasGeometry {
        CanvasGeometry::default()
    }

    #[test]
    fn half_progress_marks_first_half() {
        let env = vec![0.5f32; 60];
        let bars = render_bars(&env, Duration::from_secs(5), Duration::from_secs(10), &geometry());
        assert_eq!(bars.len(), 60);
        assert_eq!(bars.iter().filter(|b| b.played).count(), 30);
        assert!(bars[..30].iter().all(|b| b.played));
        assert!(bars[30..].iter().all(|b| !b.played));
    }

    #[test]
    fn nothing_played_without_duration_or_at_start() {
        let env = vec![0.5f32; 8];
        let unknown = render_bars(&env, Duration::from_secs(3), Duration::ZERO, &geometry());
        assert!(unknown.iter().all(|b| !b.played));
        let start = render_bars(&env, Duration::ZERO, Duration::from_secs(10), &geometry());
        assert!(start.iter().all(|b| !b.played));
        let end = render_bars(&env, Duration::from_secs(10), Duration::from_secs(10), &geometry());
        assert!(end.iter().all(|b| b.played));
    }

    #[test]
    fn bar_geometry_follows_canvas() {
        let env = [0.0f32, 1.0, 0.5, 0.05];
        let bars = render_bars(&env, Duration::ZERO, Duration::ZERO, &geometry());
        // 200 px / 4 bars = 50 px slots, 49 px drawn.
        assert_eq!(bars[1].x, 50.0);
        assert_eq!(bars[1].width, 49.0);
        // Silence still shows the minimum height, centred.
        assert_eq!(bars[0].height, 2.0);
        assert_eq!(bars[0].y, 14.0);
        assert_eq!(bars[1].height, 24.0);
        assert_eq!(bars[1].y, 3.0);
        assert_eq!(bars[2].height, 12.0);
        assert_eq!(bars[3].height, 2.0);
    }

    #[test]
    fn narrow_slots_keep_one_pixel() {
        let env = vec![0.3f32; 400];
        let bars = render_bars(&env, Duration::ZERO, Duration::ZERO, &geometry());
        assert!(bars.iter().all(|b| b.width == 1.0));
    }

    #[test]
    fn fill_picks_colour_by_state() {
        let env = [0.5f32, 0.5];
        let bars = render_bars(&env, Duration::from_secs(1), Duration::from_secs(1), &geometry());
        assert_eq!(bars[0].fill("#10b981", "#d1d5db"), "#10b981");
        let bars = render_bars(&env, Duration::ZERO, Duration::from_secs(1), &geometry());
        assert_eq!(bars[0].fill("#10b981", "#d1d5db"), "#d1d5db");
    }

    #[test]
    fn hex_colors() {
        assert_eq!(parse_hex_color("#10b981"), Some((0x10, 0xb9, 0x81)));
        assert_eq!(parse_hex_color("#D1D5DB"), Some((0xd1, 0xd5, 0xdb)));
        assert_eq!(parse_hex_color("#fff"), Some((255, 255, 255)));
        assert_eq!(parse_hex_color("10b981"), None);
        assert_eq!(parse_hex_color("#10b98"), None);
        assert_eq!(parse_hex_color("#zzzzzz"), None);
        assert_eq!(parse_hex_color("#ééé"), None);
    }

    #[test]
    fn pointer_fraction_is_relative_to_width() {
        assert_eq!(pointer_fraction(50.0, 200.0), 0.25);
        assert_eq!(pointer_fraction(-40.0, 200.0), -0.2);
        assert_eq!(pointer_fraction(10.0, 0.0), 0.0);
    }

    #[test]
    fn empty_envelope_draws_nothing() {
        assert!(render_bars(&[], Duration::ZERO, Duration::ZERO, &geometry()).is_empty());
    }
}
