//! Game session controller: the authoritative position and turn state machine.
//!
//! The human always plays white against the engine. All mutation goes through
//! `apply_human_move` / `apply_engine_move`; both reject the move without
//! touching the position when it does not fit the current state.

use std::collections::HashMap;

use shakmaty::fen::Fen;
use shakmaty::uci::UciMove;
use shakmaty::{CastlingMode, Chess, EnPassantMode, Position, Rank, Role, Square};
use thiserror::Error;
use tracing::{debug, info};

use crate::domain::chess::{BoardSnapshot, PieceColor, shakmaty_to_piece};
use crate::domain::uci::is_coordinate_move;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum GameOverReason {
    Checkmate { winner: PieceColor },
    Stalemate,
    InsufficientMaterial,
    FiftyMoveRule,
    ThreefoldRepetition,
}

impl GameOverReason {
    #[cfg(test)]
    pub fn winner(&self) -> Option<PieceColor> {
        match self {
            GameOverReason::Checkmate { winner } => Some(*winner),
            _ => None,
        }
    }

    pub fn describe(&self) -> String {
        match self {
            GameOverReason::Checkmate { winner } => format!(
                "Game over: {} is checkmated. {} wins.",
                winner.opposite().name(),
                winner.name()
            ),
            GameOverReason::Stalemate => "Game over: draw by stalemate.".to_string(),
            GameOverReason::InsufficientMaterial => {
                "Game over: draw by insufficient material.".to_string()
            }
            GameOverReason::FiftyMoveRule => "Game over: draw by the fifty-move rule.".to_string(),
            GameOverReason::ThreefoldRepetition => {
                "Game over: draw by threefold repetition.".to_string()
            }
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SessionState {
    /// Human's turn; input stays disabled during the pacing delay after an engine move
    AwaitingHumanMove { input_enabled: bool },
    AwaitingEngineMove,
    GameOver(GameOverReason),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoveError {
    #[error("move input is disabled")]
    InputDisabled,
    #[error("the game is over")]
    GameOver,
    #[error("no human piece on {0}")]
    NotHumanPiece(Square),
    #[error("illegal move {0}")]
    Illegal(String),
    #[error("malformed coordinate move {0:?}")]
    Malformed(String),
    #[error("no engine move is pending")]
    NotAwaitingEngine,
}

pub struct GameSession {
    position: Chess,
    state: SessionState,
    human: PieceColor,
    /// Occurrences of each position key, for threefold repetition
    repetitions: HashMap<String, u32>,
    moves: Vec<String>,
}

impl GameSession {
    pub fn new() -> Self {
        Self::from_position(Chess::default())
    }

    /// Start from an arbitrary position; the human still plays white
    pub fn from_position(position: Chess) -> Self {
        let mut session = Self {
            position,
            state: SessionState::AwaitingHumanMove { input_enabled: true },
            human: PieceColor::White,
            repetitions: HashMap::new(),
            moves: Vec::new(),
        };
        session.record_repetition();
        if PieceColor::from(session.position.turn()) != session.human {
            session.state = SessionState::AwaitingEngineMove;
        }
        if let Some(reason) = session.game_over_reason() {
            session.state = SessionState::GameOver(reason);
        }
        session
    }

    pub fn position(&self) -> &Chess {
        &self.position
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_game_over(&self) -> bool {
        matches!(self.state, SessionState::GameOver(_))
    }

    pub fn is_input_enabled(&self) -> bool {
        matches!(self.state, SessionState::AwaitingHumanMove { input_enabled: true })
    }

    /// Coordinate moves played so far
    pub fn moves(&self) -> &[String] {
        &self.moves
    }

    pub fn snapshot(&self) -> BoardSnapshot {
        BoardSnapshot::from_position(&self.position)
    }

    pub fn fen(&self) -> String {
        Fen::from_position(&self.position, EnPassantMode::Legal).to_string()
    }

    /// Legal destination squares of the human piece on `from`.
    ///
    /// Empty when input is disabled, the square holds no human piece or the
    /// piece has no legal move. Castling is reported as the king's destination.
    pub fn legal_destinations(&self, from: Square) -> Vec<Square> {
        if !self.is_input_enabled() {
            return Vec::new();
        }
        let own_piece = self
            .position
            .board()
            .piece_at(from)
            .map(shakmaty_to_piece)
            .is_some_and(|p| p.color == self.human);
        if !own_piece {
            return Vec::new();
        }

        let mut destinations = Vec::new();
        for m in &self.position.legal_moves() {
            if let UciMove::Normal { from: f, to, .. } = m.to_uci(CastlingMode::Standard) {
                if f == from && !destinations.contains(&to) {
                    destinations.push(to);
                }
            }
        }
        destinations
    }

    /// Play a human move; a pawn reaching the last rank promotes to a queen.
    pub fn apply_human_move(&mut self, from: Square, to: Square) -> Result<(), MoveError> {
        match self.state {
            SessionState::GameOver(_) => return Err(MoveError::GameOver),
            SessionState::AwaitingHumanMove { input_enabled: true } => {}
            _ => return Err(MoveError::InputDisabled),
        }
        let piece = self
            .position
            .board()
            .piece_at(from)
            .filter(|p| PieceColor::from(p.color) == self.human)
            .ok_or(MoveError::NotHumanPiece(from))?;

        let promotion = (piece.role == Role::Pawn
            && (to.rank() == Rank::Eighth || to.rank() == Rank::First))
            .then_some(Role::Queen);
        self.play(UciMove::Normal { from, to, promotion })?;

        self.state = match self.game_over_reason() {
            Some(reason) => SessionState::GameOver(reason),
            None => SessionState::AwaitingEngineMove,
        };
        self.log_if_over();
        Ok(())
    }

    /// Play the engine's coordinate move ("e7e5", "a2a1q").
    pub fn apply_engine_move(&mut self, coordinate_move: &str) -> Result<(), MoveError> {
        match self.state {
            SessionState::GameOver(_) => return Err(MoveError::GameOver),
            SessionState::AwaitingEngineMove => {}
            SessionState::AwaitingHumanMove { .. } => return Err(MoveError::NotAwaitingEngine),
        }
        if !is_coordinate_move(coordinate_move) {
            return Err(MoveError::Malformed(coordinate_move.to_string()));
        }
        let uci: UciMove = coordinate_move
            .parse()
            .map_err(|_| MoveError::Malformed(coordinate_move.to_string()))?;
        self.play(uci)?;

        self.state = match self.game_over_reason() {
            Some(reason) => SessionState::GameOver(reason),
            None => SessionState::AwaitingHumanMove { input_enabled: false },
        };
        self.log_if_over();
        Ok(())
    }

    /// End of the post-engine-move pacing delay
    pub fn enable_human_input(&mut self) {
        if let SessionState::AwaitingHumanMove { input_enabled } = &mut self.state {
            *input_enabled = true;
        }
    }

    pub fn status_text(&self) -> String {
        if let SessionState::GameOver(reason) = self.state {
            return reason.describe();
        }
        let turn = PieceColor::from(self.position.turn());
        if self.position.is_check() {
            format!("{} to move, {} is in check", turn.name(), turn.name())
        } else {
            format!("{} to move", turn.name())
        }
    }

    fn play(&mut self, uci: UciMove) -> Result<(), MoveError> {
        let notation = uci.to_string();
        let mv = uci
            .to_move(&self.position)
            .map_err(|_| MoveError::Illegal(notation.clone()))?;
        self.position = self
            .position
            .clone()
            .play(mv)
            .map_err(|_| MoveError::Illegal(notation.clone()))?;
        debug!(uci = %notation, "move applied");
        self.moves.push(notation);
        self.record_repetition();
        Ok(())
    }

    fn record_repetition(&mut self) {
        *self.repetitions.entry(self.repetition_key()).or_insert(0) += 1;
    }

    /// Placement, side to move, castling rights and en passant square
    fn repetition_key(&self) -> String {
        self.fen().split(' ').take(4).collect::<Vec<_>>().join(" ")
    }

    fn game_over_reason(&self) -> Option<GameOverReason> {
        if self.position.is_checkmate() {
            let loser = PieceColor::from(self.position.turn());
            Some(GameOverReason::Checkmate {
                winner: loser.opposite(),
            })
        } else if self.position.is_stalemate() {
            Some(GameOverReason::Stalemate)
        } else if self.position.is_insufficient_material() {
            Some(GameOverReason::InsufficientMaterial)
        } else if self.repetitions.get(&self.repetition_key()).copied().unwrap_or(0) >= 3 {
            Some(GameOverReason::ThreefoldRepetition)
        } else if self.position.halfmoves() >= 100 {
            Some(GameOverReason::FiftyMoveRule)
        } else {
            None
        }
    }

    fn log_if_over(&self) {
        if let SessionState::GameOver(reason) = self.state {
            info!(?reason, moves = self.moves.len(), "game over");
        }
    }
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new()
    }
}
