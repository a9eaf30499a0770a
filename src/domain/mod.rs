//! Pure domain layer: board types, attack geometry, overlay scene and UCI protocol.

pub mod attack_index;
pub mod chess;
pub mod geometry;
pub mod overlay;
pub mod settings;
pub mod uci;

pub use attack_index::AttackerIndex;
pub use chess::{BoardSnapshot, Piece, PieceColor, PieceKind};
pub use overlay::{OverlayRenderer, Shape};
pub use settings::{OverlaySettings, OverlayStyle, SideFilter};
