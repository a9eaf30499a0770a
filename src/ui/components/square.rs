//! Square rendering components: the checkered background and the piece cell.

use crate::domain::Piece;
use crate::ui::components::render_piece;
use crate::ui::theme::{GHOST_OPACITY, LEGAL_MARKER, square_color};
use gpui::{div, prelude::*, px, rgb};

/// Render the background of a single board square
pub fn render_square(row: usize, col: usize, square_size: f32) -> impl IntoElement {
    div()
        .flex_shrink_0() // never shrink - maintain aspect ratio
        .size(px(square_size))
        .bg(square_color(row, col))
}

/// Render the contents of a square: its piece and the legal-move marker
pub fn render_piece_cell(
    piece: Option<Piece>,
    is_being_dragged: bool,
    is_legal_target: bool,
    square_size: f32,
    piece_size: f32,
) -> impl IntoElement {
    let marker = is_legal_target.then(|| {
        let marker = div().absolute().rounded_full();
        if piece.is_some() {
            // capture: ring around the target piece
            marker
                .top(px(square_size * 0.06))
                .left(px(square_size * 0.06))
                .size(px(square_size * 0.88))
                .border_4()
                .border_color(rgb(LEGAL_MARKER))
                .opacity(0.6)
        } else {
            let dot = square_size * 0.28;
            marker
                .top(px((square_size - dot) / 2.0))
                .left(px((square_size - dot) / 2.0))
                .size(px(dot))
                .bg(rgb(LEGAL_MARKER))
                .opacity(0.6)
        }
    });

    div()
        .relative()
        .flex_shrink_0()
        .size(px(square_size))
        .when_some(piece, |el, p| {
            if is_being_dragged {
                // ghost piece on original square
                el.child(div().size_full().opacity(GHOST_OPACITY).child(render_piece(p, piece_size)))
            } else {
                el.child(render_piece(p, piece_size))
            }
        })
        .children(marker)
}
