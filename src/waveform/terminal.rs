// src/waveform/terminal.rs

use super::render::Bar;

const PLAYED: char = '█';
const UNPLAYED: char = '░';

/// Rasterises bars into `rows` text lines, one column per bar.
pub fn render_ascii(bars: &[Bar], surface_height: f32, rows: usize) -> Vec<String> {
    let h = rows.max(4);
    let mut lines = vec![vec![' '; bars.len()]; h];
    if surface_height <= 0.0 {
        return lines.into_iter().map(|row| row.into_iter().collect()).collect();
    }

    let to_row = |px: f32| -> usize {
        let y = (px / surface_height).clamp(0.0, 1.0) * (h as f32 - 1.0);
        y.round() as usize
    };
    for (x, bar) in bars.iter().enumerate() {
        let top = to_row(bar.y);
        let bottom = to_row(bar.y + bar.height);
        let glyph = if bar.played { PLAYED } else { UNPLAYED };
        for row in lines.iter_mut().take(bottom + 1).skip(top) {
            row[x] = glyph;
        }
    }
    lines.into_iter().map(|row| row.into_iter().collect()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar(y: f32, height: f32, played: bool) -> Bar {
        Bar { x: 0.0, y, width: 1.0, height, played }
    }

    #[test]
    fn columns_follow_bar_extent_and_state() {
        let bars = [bar(0.0, 30.0, true), bar(14.0, 2.0, false)];
        let lines = render_ascii(&bars, 30.0, 5);
        assert_eq!(lines.len(), 5);
        assert!(lines.iter().all(|l| l.starts_with(PLAYED)));
        let middle: Vec<char> = lines[2].chars().collect();
        assert_eq!(middle[1], UNPLAYED);
        assert_eq!(lines[0].chars().nth(1), Some(' '));
    }

    #[test]
    fn minimum_height_is_four_rows() {
        assert_eq!(render_ascii(&[], 30.0, 1).len(), 4);
    }
}
