//! Board layout calculations - handles sizing and coordinate transformations.

use crate::domain::chess::to_square;
use crate::ui::theme::{BOARD_PADDING, PIECE_SCALE};
use gpui::{Pixels, Size};
use shakmaty::Square;

/// Handles all layout calculations for the chess board
#[derive(Clone, Copy, Debug)]
pub struct BoardLayout {
    pub panel_size: Size<Pixels>,
}

impl BoardLayout {
    pub fn new(panel_size: Size<Pixels>) -> Self {
        Self { panel_size }
    }

    /// Calculate square size from measured panel dimensions
    pub fn square_size(&self) -> f32 {
        let panel_width: f32 = self.panel_size.width.into();
        let panel_height: f32 = self.panel_size.height.into();
        let available_width = panel_width - BOARD_PADDING * 2.0;
        let available_height = panel_height - BOARD_PADDING * 2.0;
        (available_width.min(available_height) / 8.0).max(30.0)
    }

    /// Calculate piece size based on square size
    pub fn piece_size(&self) -> f32 {
        self.square_size() * PIECE_SCALE
    }

    /// Convert position relative to board panel to a square (if within board)
    pub fn pos_to_square(&self, x: f32, y: f32) -> Option<Square> {
        let board_x = x - BOARD_PADDING;
        let board_y = y - BOARD_PADDING;

        if board_x < 0.0 || board_y < 0.0 {
            return None;
        }

        let square_size = self.square_size();
        let col = (board_x / square_size) as usize;
        let row = (board_y / square_size) as usize;

        if row < 8 && col < 8 {
            Some(to_square(row, col))
        } else {
            None
        }
    }

    /// Get the total size of the board (8 squares)
    pub fn board_total_size(&self) -> f32 {
        self.square_size() * 8.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gpui::px;

    #[test]
    fn test_square_size_uses_smaller_side() {
        let layout = BoardLayout::new(Size {
            width: px(840.0),
            height: px(440.0),
        });
        assert_eq!(layout.square_size(), 50.0);
        assert_eq!(layout.board_total_size(), 400.0);
    }

    #[test]
    fn test_pos_to_square() {
        let layout = BoardLayout::new(Size {
            width: px(440.0),
            height: px(440.0),
        });
        assert_eq!(layout.pos_to_square(21.0, 21.0), Some(Square::A8));
        assert_eq!(layout.pos_to_square(419.0, 419.0), Some(Square::H1));
        assert_eq!(layout.pos_to_square(20.0 + 4.5 * 50.0, 20.0 + 6.5 * 50.0), Some(Square::E2));
        assert_eq!(layout.pos_to_square(10.0, 100.0), None);
        assert_eq!(layout.pos_to_square(421.0, 100.0), None);
    }
}
