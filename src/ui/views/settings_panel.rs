//! Settings panel - overlay side/style selection, color legend and game status.

use gpui::{App, Entity, FontWeight, SharedString, div, prelude::*, px, rgb};
use gpui_component::button::{Button, ButtonVariants};

use crate::domain::overlay::{BLACK_CONTROL, OPPOSITE_SIDE, OverlayColor, WHITE_CONTROL, kind_color};
use crate::domain::{OverlayStyle, PieceKind, SideFilter};
use crate::models::GameModel;
use crate::ui::theme::{
    BOARD_PADDING, BORDER_COLOR, PANEL_BG, SETTINGS_BG, TEXT_PRIMARY, TEXT_SECONDARY, overlay_rgba,
};

pub fn render_settings_panel(model: &Entity<GameModel>, cx: &App) -> impl IntoElement {
    let game = model.read(cx);
    let settings = game.settings();

    let side_buttons = SideFilter::ALL.map(|side| {
        let model = model.clone();
        let button = Button::new(SharedString::from(format!("side-{}", side.label())))
            .label(side.label())
            .compact();
        let button = if settings.side == side {
            button.primary()
        } else {
            button.ghost()
        };
        button.on_click(move |_, _, cx| {
            model.update(cx, |game, cx| {
                game.set_side(side);
                cx.notify();
            });
        })
    });

    let style_buttons = OverlayStyle::ALL.map(|style| {
        let model = model.clone();
        let button = Button::new(SharedString::from(format!("style-{}", style.label())))
            .label(style.label())
            .compact();
        let button = if settings.style == style {
            button.primary()
        } else {
            button.ghost()
        };
        button.on_click(move |_, _, cx| {
            model.update(cx, |game, cx| {
                game.set_style(style);
                cx.notify();
            });
        })
    });

    let new_game_model = model.clone();
    let new_game_button = Button::new("new-game")
        .label("New game")
        .primary()
        .compact()
        .on_click(move |_, _, cx| {
            new_game_model.update(cx, |game, cx| {
                game.new_game();
                cx.notify();
            });
        });

    let engine_text = if !game.is_engine_ready() {
        "Engine not ready"
    } else if game.is_input_enabled() {
        "Engine ready, your move"
    } else {
        "Engine ready"
    };
    let last_move = match game.last_move() {
        Some(mv) => format!("Last move: {mv}"),
        None => "No moves yet".to_string(),
    };

    let keyed = settings.side.keyed_side();
    let legend = div()
        .flex()
        .flex_col()
        .gap_1()
        .child(section_title(format!("{} attackers", keyed.name())))
        .children(
            PieceKind::ALL
                .map(|kind| legend_row(kind_color(kind), kind.name().to_string())),
        )
        .when(settings.side == SideFilter::Both, |el| {
            el.child(legend_row(
                OPPOSITE_SIDE,
                format!("{} attackers", keyed.opposite().name()),
            ))
        })
        .child(section_title("Control".to_string()))
        .child(legend_row(WHITE_CONTROL, "White only".to_string()))
        .child(legend_row(BLACK_CONTROL, "Black only".to_string()))
        .child(contested_row());

    div()
        .size_full()
        .flex()
        .flex_col()
        .bg(rgb(PANEL_BG))
        .p(px(BOARD_PADDING))
        .child(
            div()
                .flex_1()
                .min_h_0()
                .flex()
                .flex_col()
                .gap_3()
                .p_4()
                .bg(rgb(SETTINGS_BG))
                .border_1()
                .border_color(rgb(BORDER_COLOR))
                .rounded_md()
                .child(
                    div()
                        .flex()
                        .items_center()
                        .justify_between()
                        .child(
                            div()
                                .text_color(rgb(TEXT_PRIMARY))
                                .font_weight(FontWeight::SEMIBOLD)
                                .child("Attack overlay"),
                        )
                        .child(new_game_button),
                )
                .child(
                    div()
                        .text_sm()
                        .text_color(rgb(TEXT_PRIMARY))
                        .child(SharedString::from(game.status().to_string())),
                )
                .child(div().text_xs().text_color(rgb(TEXT_SECONDARY)).child(engine_text))
                .child(
                    div()
                        .text_xs()
                        .text_color(rgb(TEXT_SECONDARY))
                        .child(SharedString::from(last_move)),
                )
                .child(section_title("Side".to_string()))
                .child(div().flex().gap_1().children(side_buttons))
                .child(section_title("Style".to_string()))
                .child(div().flex().gap_1().children(style_buttons))
                .child(legend),
        )
}

fn section_title(text: String) -> impl IntoElement {
    div()
        .pt_2()
        .text_xs()
        .text_color(rgb(TEXT_SECONDARY))
        .child(SharedString::from(text))
}

fn swatch(color: OverlayColor) -> gpui::Div {
    div().size(px(12.0)).rounded_sm().bg(overlay_rgba(color))
}

fn contested_row() -> impl IntoElement {
    div()
        .flex()
        .items_center()
        .gap_2()
        .child(
            div()
                .flex()
                .child(swatch(WHITE_CONTROL))
                .child(swatch(BLACK_CONTROL)),
        )
        .child(
            div()
                .text_sm()
                .text_color(rgb(TEXT_PRIMARY))
                .child("Contested (striped)"),
        )
}

fn legend_row(color: OverlayColor, label: String) -> impl IntoElement {
    div()
        .flex()
        .items_center()
        .gap_2()
        .child(swatch(color))
        .child(
            div()
                .text_sm()
                .text_color(rgb(TEXT_PRIMARY))
                .child(SharedString::from(label)),
        )
}
