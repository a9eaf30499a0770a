//! Theme constants and colors for the chess UI.

use gpui::{Hsla, Rgba, rgb};

use crate::domain::overlay::OverlayColor;

// Layout constants
pub const BOARD_PADDING: f32 = 20.0;
pub const PIECE_SCALE: f32 = 0.8; // glyph size relative to square
pub const GHOST_OPACITY: f32 = 0.4;

// Initial panel sizes
pub const INITIAL_LEFT_PANEL: f32 = 600.0;
pub const INITIAL_RIGHT_PANEL: f32 = 300.0;

// Board colors
pub const LIGHT_SQUARE: u32 = 0xEFD9B5;
pub const DARK_SQUARE: u32 = 0xB48764;
pub const PIECE_TEXT: u32 = 0x111111;
pub const LEGAL_MARKER: u32 = 0x1b5e20;

// Panel colors
pub const PANEL_BG: u32 = 0x2a2a2a;
pub const SETTINGS_BG: u32 = 0x1e1e1e;
pub const BORDER_COLOR: u32 = 0x4a4a4a;
pub const TEXT_PRIMARY: u32 = 0xffffff;
pub const TEXT_SECONDARY: u32 = 0x888888;

/// Get the color for a board square based on its position
pub fn square_color(row: usize, col: usize) -> Rgba {
    if (row + col) % 2 == 0 {
        rgb(LIGHT_SQUARE)
    } else {
        rgb(DARK_SQUARE)
    }
}

pub fn overlay_rgba(color: OverlayColor) -> Rgba {
    let channel = |shift: u32| ((color.rgb >> shift) & 0xff) as f32 / 255.0;
    Rgba {
        r: channel(16),
        g: channel(8),
        b: channel(0),
        a: color.alpha,
    }
}

pub fn overlay_hsla(color: OverlayColor) -> Hsla {
    overlay_rgba(color).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlay_rgba_channels() {
        let c = overlay_rgba(OverlayColor::new(0xff8000, 0.5));
        assert_eq!(c.r, 1.0);
        assert!((c.g - 128.0 / 255.0).abs() < 1e-6);
        assert_eq!(c.b, 0.0);
        assert_eq!(c.a, 0.5);
    }
}
