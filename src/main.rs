mod app;
mod domain;
mod models;
mod ui;

use gpui::{App, Application};
use tracing_subscriber::EnvFilter;

use crate::models::AppConfig;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::load();
    Application::new().run(move |cx: &mut App| app::run(cx, config));
}
