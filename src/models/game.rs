//! Game model - the GPUI entity tying the session, engine and overlay together.

use std::sync::mpsc::Receiver;
use std::time::Duration;

use gpui::{AsyncApp, Context, Pixels, Size, Task, WeakEntity, px};
use shakmaty::{Position, Square};
use tracing::{debug, error, warn};

use crate::domain::chess::{shakmaty_to_piece, to_square};
use crate::domain::{AttackerIndex, OverlayRenderer, OverlaySettings, OverlayStyle, Piece, SideFilter};
use crate::models::config::{AppConfig, PacingConfig};
use crate::models::engine::{EngineEvent, EngineNotice, EngineProxy};
use crate::models::session::{GameSession, SessionState};
use crate::ui::BoardLayout;
use crate::ui::theme::INITIAL_LEFT_PANEL;

/// State for a piece being dragged
#[derive(Clone, Copy, Debug)]
pub struct DragState {
    pub piece: Piece,
    pub from: Square,
    /// Mouse position relative to window
    pub mouse_x: f32,
    pub mouse_y: f32,
}

pub struct GameModel {
    session: GameSession,
    engine: EngineProxy,
    settings: OverlaySettings,
    overlay: OverlayRenderer,
    pacing: PacingConfig,
    /// Legal destinations of the piece being dragged
    legal_targets: Vec<Square>,
    status: String,
    /// Drag state for piece movement
    pub drag_state: Option<DragState>,
    /// Measured panel size from canvas
    pub panel_size: Size<Pixels>,
    /// Background task polling engine output
    _poll_task: Option<Task<()>>,
}

impl GameModel {
    pub fn new(config: AppConfig, cx: &mut Context<Self>) -> Self {
        let (engine, events) = match EngineProxy::spawn(config.engine.clone()) {
            Ok((engine, events)) => (engine, Some(events)),
            Err(e) => {
                error!("engine unavailable, playing without an opponent: {e:#}");
                (EngineProxy::detached(config.engine.clone()), None)
            }
        };

        let _poll_task = events.map(|receiver| {
            cx.spawn(async move |this: WeakEntity<GameModel>, cx: &mut AsyncApp| {
                Self::run_event_loop(this, receiver, cx).await;
            })
        });

        let session = GameSession::new();
        let mut model = Self {
            status: session.status_text(),
            session,
            engine,
            settings: config.overlay,
            overlay: OverlayRenderer::new(),
            pacing: config.pacing,
            legal_targets: Vec::new(),
            drag_state: None,
            panel_size: Size {
                width: px(INITIAL_LEFT_PANEL),
                height: px(600.0),
            },
            _poll_task,
        };
        model.update_overlay(None);
        model
    }

    /// Poll engine output every frame until the model or the engine goes away
    async fn run_event_loop(
        this: WeakEntity<GameModel>,
        receiver: Receiver<EngineEvent>,
        cx: &mut AsyncApp,
    ) {
        loop {
            cx.background_executor()
                .timer(Duration::from_millis(16))
                .await;

            let events: Vec<EngineEvent> = receiver.try_iter().collect();
            let exited = events.iter().any(|e| matches!(e, EngineEvent::Exited));
            if !events.is_empty() {
                let alive = this.update(cx, |game, cx| {
                    for event in events {
                        game.handle_engine_event(event, cx);
                    }
                    cx.notify();
                });
                if alive.is_err() {
                    break;
                }
            }
            if exited {
                break;
            }
        }
    }

    fn handle_engine_event(&mut self, event: EngineEvent, cx: &mut Context<Self>) {
        match self.engine.handle_event(event) {
            // a request held during the handshake went out with "readyok"
            Some(EngineNotice::Ready) => debug!("engine ready"),
            Some(EngineNotice::BestMove(mv)) => self.on_engine_move_ready(&mv, cx),
            None => {}
        }
    }

    pub fn layout(&self) -> BoardLayout {
        BoardLayout::new(self.panel_size)
    }

    pub fn overlay(&self) -> &OverlayRenderer {
        &self.overlay
    }

    pub fn settings(&self) -> OverlaySettings {
        self.settings
    }

    pub fn legal_targets(&self) -> &[Square] {
        &self.legal_targets
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn is_input_enabled(&self) -> bool {
        self.session.is_input_enabled()
    }

    pub fn last_move(&self) -> Option<&str> {
        self.session.moves().last().map(String::as_str)
    }

    pub fn is_engine_ready(&self) -> bool {
        self.engine.is_ready()
    }

    pub fn piece_at(&self, row: usize, col: usize) -> Option<Piece> {
        self.session
            .position()
            .board()
            .piece_at(to_square(row, col))
            .map(shakmaty_to_piece)
    }

    /// A drag starts on `from`. Returns false when nothing there may move.
    pub fn on_human_move_start(&mut self, from: Square) -> bool {
        let targets = self.session.legal_destinations(from);
        if targets.is_empty() {
            return false;
        }
        self.legal_targets = targets;
        self.update_overlay(Some(from));
        true
    }

    /// A drag was released off the board or on its own square
    pub fn on_human_move_canceled(&mut self) {
        self.legal_targets.clear();
        self.update_overlay(None);
    }

    /// A drag was released on `to`. Returns true if the move was played.
    pub fn on_human_move_attempt(&mut self, from: Square, to: Square, cx: &mut Context<Self>) -> bool {
        self.legal_targets.clear();
        let result = self.session.apply_human_move(from, to);
        self.refresh_status();
        self.update_overlay(None);

        match result {
            Ok(()) => {
                if self.session.state() == SessionState::AwaitingEngineMove {
                    let delay = self.pacing.engine_request_delay();
                    self.schedule(delay, cx, |game, _| game.request_engine_move());
                }
                true
            }
            Err(e) => {
                debug!(%from, %to, "move rejected: {e}");
                false
            }
        }
    }

    fn request_engine_move(&mut self) {
        if self.session.state() != SessionState::AwaitingEngineMove {
            return;
        }
        let fen = self.session.fen();
        if !self.engine.request_move(&fen) {
            debug!("engine not ready, move request deferred");
        }
    }

    pub fn on_engine_move_ready(&mut self, coordinate_move: &str, cx: &mut Context<Self>) {
        match self.session.apply_engine_move(coordinate_move) {
            Ok(()) => {
                self.refresh_status();
                self.update_overlay(None);
                if !self.session.is_game_over() {
                    let delay = self.pacing.input_enable_delay();
                    self.schedule(delay, cx, |game, _| game.enable_human_input());
                }
            }
            Err(e) => warn!(mv = coordinate_move, "engine move rejected: {e}"),
        }
    }

    pub fn enable_human_input(&mut self) {
        self.session.enable_human_input();
        self.refresh_status();
    }

    pub fn refresh_status(&mut self) {
        self.status = self.session.status_text();
    }

    /// Rebuild both overlay layers from the current position
    pub fn update_overlay(&mut self, exclude: Option<Square>) {
        let board = self.session.snapshot();
        let index = AttackerIndex::build(&board, exclude);
        self.overlay.render(&index, &self.settings, &board, exclude);
    }

    pub fn set_side(&mut self, side: SideFilter) {
        self.settings.side = side;
        self.update_overlay(self.dragged_square());
    }

    pub fn set_style(&mut self, style: OverlayStyle) {
        self.settings.style = style;
        self.update_overlay(self.dragged_square());
    }

    pub fn new_game(&mut self) {
        self.session = GameSession::new();
        self.drag_state = None;
        self.legal_targets.clear();
        self.engine.new_game();
        self.refresh_status();
        self.update_overlay(None);
    }

    fn dragged_square(&self) -> Option<Square> {
        self.drag_state.map(|d| d.from)
    }

    /// Run `f` on the model after `delay`
    fn schedule(
        &self,
        delay: Duration,
        cx: &mut Context<Self>,
        f: impl FnOnce(&mut Self, &mut Context<Self>) + 'static,
    ) {
        cx.spawn(async move |this: WeakEntity<GameModel>, cx: &mut AsyncApp| {
            cx.background_executor().timer(delay).await;
            let _ = this.update(cx, |game, cx| {
                f(game, cx);
                cx.notify();
            });
        })
        .detach();
    }
}
