//! UCI (Universal Chess Interface) protocol types and utilities.
//!
//! This module handles low-level UCI protocol communication with chess engines.
//! It provides types for UCI commands and responses, but does not handle
//! the actual process spawning (that's done in the models layer).

use thiserror::Error;

/// UCI commands that can be sent to an engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UciCommand {
    /// Initialize UCI mode
    Uci,
    /// Check if engine is ready
    IsReady,
    /// Set a new game
    UciNewGame,
    /// Set an engine option
    SetOption { name: String, value: String },
    /// Set position (startpos or FEN, with optional moves)
    Position { fen: Option<String>, moves: Vec<String> },
    /// Search for a fixed number of milliseconds
    GoMovetime(u64),
    /// Stop the current search
    Stop,
    /// Quit the engine
    Quit,
}

impl UciCommand {
    /// Convert command to UCI protocol string
    pub fn to_uci_string(&self) -> String {
        match self {
            UciCommand::Uci => "uci".to_string(),
            UciCommand::IsReady => "isready".to_string(),
            UciCommand::UciNewGame => "ucinewgame".to_string(),
            UciCommand::SetOption { name, value } => {
                format!("setoption name {} value {}", name, value)
            }
            UciCommand::Position { fen, moves } => {
                let mut cmd = String::from("position ");
                match fen {
                    Some(f) => {
                        cmd.push_str("fen ");
                        cmd.push_str(f);
                    }
                    None => cmd.push_str("startpos"),
                }
                if !moves.is_empty() {
                    cmd.push_str(" moves ");
                    cmd.push_str(&moves.join(" "));
                }
                cmd
            }
            UciCommand::GoMovetime(ms) => format!("go movetime {}", ms),
            UciCommand::Stop => "stop".to_string(),
            UciCommand::Quit => "quit".to_string(),
        }
    }
}

/// Raw UCI output line types
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UciOutputKind {
    /// "uciok" - engine speaks UCI
    UciOk,
    /// "readyok" - engine finished processing earlier commands
    ReadyOk,
    /// "info ..." - search progress
    Info(String),
    /// "bestmove ..." - search result, everything after the keyword
    BestMove(String),
    /// Engine identification
    Id(String),
    /// Option definition
    Option(String),
    /// Unknown/other output
    Other(String),
}

impl UciOutputKind {
    /// Parse a raw UCI output line into a categorized type
    pub fn parse(line: &str) -> Self {
        let line = line.trim();

        if line == "uciok" {
            UciOutputKind::UciOk
        } else if line == "readyok" {
            UciOutputKind::ReadyOk
        } else if let Some(rest) = line.strip_prefix("info ") {
            UciOutputKind::Info(rest.to_string())
        } else if line == "bestmove" {
            UciOutputKind::BestMove(String::new())
        } else if let Some(rest) = line.strip_prefix("bestmove ") {
            UciOutputKind::BestMove(rest.to_string())
        } else if let Some(rest) = line.strip_prefix("id ") {
            UciOutputKind::Id(rest.to_string())
        } else if let Some(rest) = line.strip_prefix("option ") {
            UciOutputKind::Option(rest.to_string())
        } else {
            UciOutputKind::Other(line.to_string())
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineReplyError {
    #[error("bestmove reply without a move")]
    MissingMove,
    #[error("bestmove reply has malformed move {0:?}")]
    MalformedMove(String),
}

/// Result of a "bestmove" line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BestMove {
    /// A coordinate move such as "e2e4" or "e7e8q"
    Move(String),
    /// "(none)" or "0000": the engine has nothing to play
    NoMove,
}

/// Parse the text after "bestmove " (the ponder suffix is ignored).
pub fn parse_bestmove(rest: &str) -> Result<BestMove, EngineReplyError> {
    let token = rest
        .split_whitespace()
        .next()
        .ok_or(EngineReplyError::MissingMove)?;

    if token == "(none)" || token == "0000" {
        return Ok(BestMove::NoMove);
    }
    if is_coordinate_move(token) {
        Ok(BestMove::Move(token.to_string()))
    } else {
        Err(EngineReplyError::MalformedMove(token.to_string()))
    }
}

/// Four characters of from/to squares plus an optional promotion letter
pub fn is_coordinate_move(token: &str) -> bool {
    let bytes = token.as_bytes();
    let square = |f: u8, r: u8| (b'a'..=b'h').contains(&f) && (b'1'..=b'8').contains(&r);
    match bytes.len() {
        4 => square(bytes[0], bytes[1]) && square(bytes[2], bytes[3]),
        5 => {
            square(bytes[0], bytes[1])
                && square(bytes[2], bytes[3])
                && matches!(bytes[4], b'q' | b'r' | b'b' | b'n')
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_startpos() {
        let cmd = UciCommand::Position { fen: None, moves: vec![] };
        assert_eq!(cmd.to_uci_string(), "position startpos");
    }

    #[test]
    fn test_position_with_moves() {
        let cmd = UciCommand::Position {
            fen: None,
            moves: vec!["e2e4".to_string(), "e7e5".to_string()],
        };
        assert_eq!(cmd.to_uci_string(), "position startpos moves e2e4 e7e5");
    }

    #[test]
    fn test_position_fen() {
        let cmd = UciCommand::Position {
            fen: Some("rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq - 0 1".to_string()),
            moves: vec![],
        };
        assert_eq!(
            cmd.to_uci_string(),
            "position fen rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq - 0 1"
        );
    }

    #[test]
    fn test_setoption_and_go() {
        let cmd = UciCommand::SetOption {
            name: "Skill Level".to_string(),
            value: "5".to_string(),
        };
        assert_eq!(cmd.to_uci_string(), "setoption name Skill Level value 5");
        assert_eq!(UciCommand::GoMovetime(500).to_uci_string(), "go movetime 500");
        assert_eq!(UciCommand::Stop.to_uci_string(), "stop");
    }

    #[test]
    fn test_parse_output_kinds() {
        assert_eq!(UciOutputKind::parse("readyok\n"), UciOutputKind::ReadyOk);
        assert_eq!(UciOutputKind::parse("uciok"), UciOutputKind::UciOk);
        assert!(matches!(
            UciOutputKind::parse("info depth 20 score cp 35 pv e2e4 e7e5"),
            UciOutputKind::Info(_)
        ));
        assert_eq!(
            UciOutputKind::parse("bestmove e2e4 ponder e7e5"),
            UciOutputKind::BestMove("e2e4 ponder e7e5".to_string())
        );
        assert!(matches!(UciOutputKind::parse("id name Stockfish"), UciOutputKind::Id(_)));
    }

    #[test]
    fn test_parse_bestmove() {
        assert_eq!(parse_bestmove("e2e4 ponder e7e5"), Ok(BestMove::Move("e2e4".to_string())));
        assert_eq!(parse_bestmove("a7a8q"), Ok(BestMove::Move("a7a8q".to_string())));
        assert_eq!(parse_bestmove("(none)"), Ok(BestMove::NoMove));
        assert_eq!(parse_bestmove("0000"), Ok(BestMove::NoMove));
    }

    #[test]
    fn test_parse_bestmove_errors() {
        assert_eq!(parse_bestmove(""), Err(EngineReplyError::MissingMove));
        assert_eq!(
            parse_bestmove("e2e9"),
            Err(EngineReplyError::MalformedMove("e2e9".to_string()))
        );
        assert_eq!(
            parse_bestmove("e7e8k"),
            Err(EngineReplyError::MalformedMove("e7e8k".to_string()))
        );
        let bare = UciOutputKind::parse("bestmove");
        assert_eq!(bare, UciOutputKind::BestMove(String::new()));
    }
}
