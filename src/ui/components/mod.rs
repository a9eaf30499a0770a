mod overlay;
mod piece;
mod square;

pub use overlay::{render_badges, render_overlay_layer};
pub use piece::render_piece;
pub use square::{render_piece_cell, render_square};
