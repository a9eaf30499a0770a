mod board_view;
mod settings_panel;

pub use board_view::ChessBoardView;
pub use settings_panel::render_settings_panel;
