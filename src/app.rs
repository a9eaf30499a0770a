//! Application setup and window creation.

use gpui::{App, Bounds, WindowBounds, WindowOptions, prelude::*, px, size};
use gpui_component::Root;
use tracing::error;

use crate::models::{AppConfig, GameModel};
use crate::ui::views::ChessBoardView;

/// Initialize and run the attack overlay application
pub fn run(cx: &mut App, config: AppConfig) {
    gpui_component::init(cx);

    // Create the game model; this also starts the engine
    let model = cx.new(|cx| GameModel::new(config, cx));

    let bounds = Bounds::centered(None, size(px(960.0), px(680.0)), cx);
    let window = cx.open_window(
        WindowOptions {
            window_bounds: Some(WindowBounds::Windowed(bounds)),
            ..Default::default()
        },
        |window, cx| {
            let view = cx.new(|cx| ChessBoardView::new(model, cx));
            cx.new(|cx| Root::new(view, window, cx))
        },
    );
    if let Err(e) = window {
        error!("failed to open window: {e:#}");
        cx.quit();
    }
}
