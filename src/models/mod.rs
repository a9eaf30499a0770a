//! Application state: the game session, the engine proxy and the GPUI model.

pub mod config;
pub mod engine;
pub mod game;
pub mod session;

pub use config::AppConfig;
pub use game::{DragState, GameModel};
