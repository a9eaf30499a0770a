//! Chess board view - the board with attack overlay and drag-and-drop play.
//!
//! Layers, bottom to top: squares, overlay fill, pieces and legal markers,
//! overlay outline, count badges, then the dragged piece.

use gpui::{
    Context, Entity, MouseButton, MouseDownEvent, MouseMoveEvent, MouseUpEvent, Pixels,
    Subscription, Window, canvas, div, prelude::*, px, rgb,
};
use gpui_component::resizable::{h_resizable, resizable_panel};

use crate::domain::chess::{to_row_col, to_square};
use crate::models::{DragState, GameModel};
use crate::ui::components::{
    render_badges, render_overlay_layer, render_piece, render_piece_cell, render_square,
};
use crate::ui::theme::{BOARD_PADDING, INITIAL_LEFT_PANEL, INITIAL_RIGHT_PANEL, PANEL_BG};
use crate::ui::views::render_settings_panel;

/// The main chess board view that observes a GameModel
pub struct ChessBoardView {
    model: Entity<GameModel>,
    _subscription: Subscription,
}

impl ChessBoardView {
    pub fn new(model: Entity<GameModel>, cx: &mut Context<Self>) -> Self {
        let _subscription = cx.observe(&model, |_, _, cx| cx.notify());
        Self {
            model,
            _subscription,
        }
    }
}

impl Render for ChessBoardView {
    fn render(&mut self, _window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let model = self.model.clone();
        let model_down = model.clone();
        let model_move = model.clone();
        let model_up = model.clone();
        let model_measure = model.clone();

        let game = self.model.read(cx);
        let drag_state = game.drag_state;
        let dragging_from = drag_state.map(|d| d.from);

        // Sizing based on measured panel dimensions
        let layout = game.layout();
        let square_size = layout.square_size();
        let piece_size = layout.piece_size();
        let board_total_size = layout.board_total_size();

        // Floating piece follows cursor during drag
        let floating_piece = drag_state.map(|d| {
            div()
                .absolute()
                .left(px(d.mouse_x - square_size / 2.0))
                .top(px(d.mouse_y - square_size / 2.0))
                .size(px(square_size))
                .child(render_piece(d.piece, piece_size))
        });

        // Collect cells for rendering (can't borrow game in closure)
        let cells: Vec<_> = (0..8)
            .flat_map(|row| {
                (0..8).map(move |col| {
                    let sq = to_square(row, col);
                    let piece = game.piece_at(row, col);
                    let is_being_dragged = dragging_from == Some(sq);
                    let is_target = game.legal_targets().contains(&sq);
                    (piece, is_being_dragged, is_target)
                })
            })
            .collect();

        let fill_shapes = game.overlay().fill_layer().to_vec();
        let outline_shapes = game.overlay().outline_layer().to_vec();
        let badges = render_badges(&outline_shapes, square_size);

        let squares = div()
            .flex()
            .flex_col()
            .children((0..8).map(|row| {
                div()
                    .flex()
                    .flex_shrink_0()
                    .children((0..8).map(|col| render_square(row, col, square_size)))
            }));

        let pieces = div()
            .absolute()
            .top_0()
            .left_0()
            .flex()
            .flex_col()
            .children((0..8).map(|row| {
                div().flex().flex_shrink_0().children((0..8).map(|col| {
                    let (piece, is_being_dragged, is_target) = cells[row * 8 + col];
                    render_piece_cell(piece, is_being_dragged, is_target, square_size, piece_size)
                }))
            }));

        // Board element with fixed size - always maintains 1:1 aspect ratio
        let board = div()
            .relative()
            .flex_shrink_0()
            .w(px(board_total_size))
            .h(px(board_total_size))
            .overflow_hidden()
            .rounded_md()
            .child(squares)
            .child(render_overlay_layer(fill_shapes, square_size))
            .child(pieces)
            .child(render_overlay_layer(outline_shapes, square_size))
            .children(badges);

        let board_panel_content = div()
            .id("board-panel")
            .relative()
            .size_full()
            .overflow_hidden()
            .bg(rgb(PANEL_BG))
            .p(px(BOARD_PADDING))
            .child(board)
            .when_some(floating_piece, |el, fp| el.child(fp))
            // Mouse down: start drag if the piece has somewhere to go
            .on_mouse_down(
                MouseButton::Left,
                move |ev: &MouseDownEvent, _window, cx| {
                    model_down.update(cx, |game, cx| {
                        let pos = ev.position;
                        let Some(from) = game.layout().pos_to_square(pos.x.into(), pos.y.into())
                        else {
                            return;
                        };
                        let (row, col) = to_row_col(from);
                        let Some(piece) = game.piece_at(row, col) else {
                            return;
                        };
                        if game.on_human_move_start(from) {
                            game.drag_state = Some(DragState {
                                piece,
                                from,
                                mouse_x: pos.x.into(),
                                mouse_y: pos.y.into(),
                            });
                            cx.notify();
                        }
                    });
                },
            )
            // Mouse move: update drag position
            .on_mouse_move(move |ev: &MouseMoveEvent, _, cx| {
                model_move.update(cx, |game, cx| {
                    if let Some(ref mut drag) = game.drag_state {
                        drag.mouse_x = ev.position.x.into();
                        drag.mouse_y = ev.position.y.into();
                        cx.notify();
                    }
                });
            })
            // Mouse up: complete or cancel the move
            .on_mouse_up(MouseButton::Left, move |ev: &MouseUpEvent, _window, cx| {
                model_up.update(cx, |game, cx| {
                    if let Some(drag) = game.drag_state.take() {
                        let pos = ev.position;
                        match game.layout().pos_to_square(pos.x.into(), pos.y.into()) {
                            Some(to) if to != drag.from => {
                                game.on_human_move_attempt(drag.from, to, cx);
                            }
                            _ => game.on_human_move_canceled(),
                        }
                        cx.notify();
                    }
                });
            });

        // Canvas to measure actual panel size
        let measure_canvas = canvas(
            move |bounds, _window, cx| {
                model_measure.update(cx, |game, cx| {
                    if game.panel_size != bounds.size {
                        game.panel_size = bounds.size;
                        cx.notify();
                    }
                });
            },
            |_, _, _, _| {},
        )
        .absolute()
        .top_0()
        .left_0()
        .size_full();

        // Wrap board panel content with measuring canvas
        let board_panel_with_measure = div()
            .relative()
            .size_full()
            .child(measure_canvas)
            .child(board_panel_content);

        let settings_panel_content = render_settings_panel(&model, cx);

        // Main resizable layout
        div().size_full().child(
            h_resizable("attack-overlay-layout")
                .child(
                    resizable_panel()
                        .size(px(INITIAL_LEFT_PANEL))
                        .size_range(px(320.)..px(1200.))
                        .child(board_panel_with_measure),
                )
                .child(
                    resizable_panel()
                        .size(px(INITIAL_RIGHT_PANEL))
                        .size_range(px(220.)..Pixels::MAX)
                        .child(settings_panel_content),
                ),
        )
    }
}
