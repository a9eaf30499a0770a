//! Engine proxy - drives the opponent engine process over UCI.
//!
//! Architecture:
//! - Engine I/O runs on OS threads (reader/writer)
//! - Output lines arrive on an mpsc channel that the game model drains from
//!   a GPUI background task
//! - The proxy itself is a mailbox: a ready flag plus the command sender.
//!   At most one move request is outstanding because input is disabled
//!   while the engine thinks, so replies need no correlation ids.
//! - While a handshake is pending, best-move lines belong to an earlier
//!   game and are dropped; a request made in that window is held and sent
//!   once on "readyok".

use std::io::{BufRead, BufReader, Write};
use std::process::{Child, Command, Stdio};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;

use anyhow::Context as _;
use tracing::{debug, error, info, trace, warn};

use crate::domain::uci::{BestMove, UciCommand, UciOutputKind, parse_bestmove};
use crate::models::config::EngineConfig;

/// Messages sent from the engine reader thread to the model
#[derive(Debug)]
pub enum EngineEvent {
    /// A line of output from the engine
    Output(String),
    /// Engine process exited
    Exited,
    /// Error occurred
    Error(String),
}

/// What an engine event means for the session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineNotice {
    /// Handshake finished; move requests are accepted from now on
    Ready,
    /// The engine chose a coordinate move
    BestMove(String),
}

pub struct EngineProxy {
    config: EngineConfig,
    ready: bool,
    /// Position requested before the handshake finished
    deferred: Option<String>,
    /// Channel sender for commands to engine writer thread
    command_sender: Option<Sender<String>>,
    /// Handle to the engine process
    process: Option<Child>,
}

impl EngineProxy {
    /// Proxy writing commands to `command_sender`; no process attached
    pub fn new(config: EngineConfig, command_sender: Sender<String>) -> Self {
        Self {
            config,
            ready: false,
            deferred: None,
            command_sender: Some(command_sender),
            process: None,
        }
    }

    /// Proxy without an engine; every move request is dropped
    pub fn detached(config: EngineConfig) -> Self {
        Self {
            config,
            ready: false,
            deferred: None,
            command_sender: None,
            process: None,
        }
    }

    /// Start the engine process and send the initialization sequence.
    ///
    /// Returns the proxy and the receiver the caller must poll for output.
    pub fn spawn(config: EngineConfig) -> anyhow::Result<(Self, Receiver<EngineEvent>)> {
        let mut child = Command::new(&config.path)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .with_context(|| format!("failed to start engine {}", config.path.display()))?;

        // Take ownership of stdin/stdout
        let stdin = child.stdin.take().context("failed to open engine stdin")?;
        let stdout = child.stdout.take().context("failed to open engine stdout")?;

        let (event_tx, event_rx) = mpsc::channel::<EngineEvent>();
        let (cmd_tx, cmd_rx) = mpsc::channel::<String>();

        // Reader thread (OS thread for blocking I/O)
        thread::spawn(move || {
            let reader = BufReader::new(stdout);
            for line in reader.lines() {
                match line {
                    Ok(text) => {
                        if event_tx.send(EngineEvent::Output(text)).is_err() {
                            break;
                        }
                    }
                    Err(e) => {
                        let _ = event_tx.send(EngineEvent::Error(e.to_string()));
                        break;
                    }
                }
            }
            let _ = event_tx.send(EngineEvent::Exited);
        });

        // Writer thread (OS thread for blocking I/O)
        thread::spawn(move || {
            let mut writer = stdin;
            while let Ok(cmd) = cmd_rx.recv() {
                if writeln!(writer, "{}", cmd).is_err() {
                    break;
                }
                if writer.flush().is_err() {
                    break;
                }
            }
        });

        info!(path = %config.path.display(), "engine started");
        let mut proxy = Self::new(config, cmd_tx);
        proxy.process = Some(child);
        proxy.initialize();
        Ok((proxy, event_rx))
    }

    /// Handshake, difficulty and new-game signal; not ready until "readyok"
    pub fn initialize(&mut self) {
        self.ready = false;
        self.send_command(UciCommand::Uci);
        self.send_command(UciCommand::SetOption {
            name: "Skill Level".to_string(),
            value: self.config.skill_level.to_string(),
        });
        self.send_command(UciCommand::UciNewGame);
        self.send_command(UciCommand::IsReady);
    }

    /// Reset the engine's game state for a fresh session
    pub fn new_game(&mut self) {
        self.deferred = None;
        if self.command_sender.is_none() {
            return;
        }
        self.ready = false;
        self.send_command(UciCommand::Stop);
        self.send_command(UciCommand::UciNewGame);
        self.send_command(UciCommand::IsReady);
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// Ask for a move in the given FEN position. Returns false while the
    /// handshake is still pending; the request is then sent on "readyok".
    pub fn request_move(&mut self, fen: &str) -> bool {
        if !self.ready {
            self.deferred = Some(fen.to_string());
            return false;
        }
        self.send_go(fen);
        true
    }

    fn send_go(&self, fen: &str) {
        self.send_command(UciCommand::Position {
            fen: Some(fen.to_string()),
            moves: vec![],
        });
        self.send_command(UciCommand::GoMovetime(self.config.think_time_ms));
    }

    /// Interpret one event from the reader thread
    pub fn handle_event(&mut self, event: EngineEvent) -> Option<EngineNotice> {
        match event {
            EngineEvent::Output(line) => self.handle_line(&line),
            EngineEvent::Exited => {
                warn!("engine exited");
                self.ready = false;
                self.deferred = None;
                self.command_sender = None;
                None
            }
            EngineEvent::Error(e) => {
                error!(error = %e, "engine output error");
                None
            }
        }
    }

    fn handle_line(&mut self, line: &str) -> Option<EngineNotice> {
        match UciOutputKind::parse(line) {
            UciOutputKind::ReadyOk => {
                let was_ready = std::mem::replace(&mut self.ready, true);
                if let Some(fen) = self.deferred.take() {
                    self.send_go(&fen);
                }
                (!was_ready).then_some(EngineNotice::Ready)
            }
            UciOutputKind::BestMove(rest) if !self.ready => {
                debug!(reply = %rest, "dropping best move from before the handshake");
                None
            }
            UciOutputKind::BestMove(rest) => match parse_bestmove(&rest) {
                Ok(BestMove::Move(mv)) => Some(EngineNotice::BestMove(mv)),
                Ok(BestMove::NoMove) => {
                    debug!("engine has no move");
                    None
                }
                Err(e) => {
                    warn!(error = %e, line, "ignoring engine reply");
                    None
                }
            },
            UciOutputKind::Id(id) => {
                debug!(%id, "engine id");
                None
            }
            UciOutputKind::UciOk => None,
            UciOutputKind::Info(info) | UciOutputKind::Option(info) | UciOutputKind::Other(info) => {
                trace!(%info, "engine output");
                None
            }
        }
    }

    /// Send a UCI command to the engine
    fn send_command(&self, cmd: UciCommand) {
        let cmd_str = cmd.to_uci_string();
        if let Some(tx) = &self.command_sender {
            trace!(command = %cmd_str, "to engine");
            let _ = tx.send(cmd_str);
        }
    }

    /// Quit the engine and reap the process
    pub fn shutdown(&mut self) {
        self.send_command(UciCommand::Quit);
        self.command_sender = None;
        self.ready = false;
        self.deferred = None;
        if let Some(mut child) = self.process.take() {
            let _ = child.kill();
            let _ = child.wait();
        }
    }
}

impl Drop for EngineProxy {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn proxy() -> (EngineProxy, Receiver<String>) {
        let (tx, rx) = mpsc::channel();
        let config = EngineConfig {
            skill_level: 3,
            think_time_ms: 200,
            ..EngineConfig::default()
        };
        (EngineProxy::new(config, tx), rx)
    }

    fn drain(rx: &Receiver<String>) -> Vec<String> {
        rx.try_iter().collect()
    }

    #[test]
    fn test_initialize_sequence() {
        let (mut proxy, rx) = proxy();
        proxy.initialize();
        assert_eq!(
            drain(&rx),
            vec![
                "uci",
                "setoption name Skill Level value 3",
                "ucinewgame",
                "isready"
            ]
        );
        assert!(!proxy.is_ready());
    }

    #[test]
    fn test_request_is_noop_until_ready() {
        let (mut proxy, rx) = proxy();
        proxy.initialize();
        drain(&rx);
        assert!(!proxy.request_move("8/8/8/8/8/8/8/8 w - - 0 1"));
        assert!(drain(&rx).is_empty());

        let notice = proxy.handle_event(EngineEvent::Output("readyok".to_string()));
        assert_eq!(notice, Some(EngineNotice::Ready));
        assert!(proxy.is_ready());
        // a second readyok is not a new transition
        assert_eq!(proxy.handle_event(EngineEvent::Output("readyok".to_string())), None);

        let fen = "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq - 0 1";
        assert!(proxy.request_move(fen));
        assert_eq!(
            drain(&rx),
            vec![format!("position fen {fen}"), "go movetime 200".to_string()]
        );
    }

    #[test]
    fn test_bestmove_replies() {
        let (mut proxy, _rx) = proxy();
        let mut feed = |line: &str| proxy.handle_event(EngineEvent::Output(line.to_string()));
        assert_eq!(feed("readyok"), Some(EngineNotice::Ready));
        assert_eq!(feed("info depth 12 score cp 20 pv e7e5"), None);
        assert_eq!(
            feed("bestmove e7e5 ponder g1f3"),
            Some(EngineNotice::BestMove("e7e5".to_string()))
        );
        assert_eq!(feed("bestmove (none)"), None);
        assert_eq!(feed("bestmove"), None);
        assert_eq!(feed("bestmove xyz"), None);
    }

    #[test]
    fn test_exit_marks_not_ready() {
        let (mut proxy, rx) = proxy();
        proxy.handle_event(EngineEvent::Output("readyok".to_string()));
        assert!(proxy.is_ready());
        proxy.handle_event(EngineEvent::Exited);
        assert!(!proxy.is_ready());
        assert!(!proxy.request_move("4k3/8/8/8/8/8/8/4K3 w - - 0 1"));
        assert!(drain(&rx).is_empty());
    }

    #[test]
    fn test_new_game_rearms_handshake() {
        let (mut proxy, rx) = proxy();
        proxy.handle_event(EngineEvent::Output("readyok".to_string()));
        proxy.new_game();
        assert!(!proxy.is_ready());
        assert_eq!(drain(&rx), vec!["stop", "ucinewgame", "isready"]);
    }

    #[test]
    fn test_bestmove_from_previous_game_is_dropped() {
        let (mut proxy, rx) = proxy();
        proxy.handle_event(EngineEvent::Output("readyok".to_string()));
        assert!(proxy.request_move("rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq - 0 1"));
        proxy.new_game();
        drain(&rx);

        // the reply to the abandoned search arrives before the new handshake
        let stale = proxy.handle_event(EngineEvent::Output("bestmove e7e5".to_string()));
        assert_eq!(stale, None);
        assert_eq!(
            proxy.handle_event(EngineEvent::Output("readyok".to_string())),
            Some(EngineNotice::Ready)
        );
        assert_eq!(
            proxy.handle_event(EngineEvent::Output("bestmove d7d5".to_string())),
            Some(EngineNotice::BestMove("d7d5".to_string()))
        );
    }

    #[test]
    fn test_deferred_request_sent_once_on_ready() {
        let (mut proxy, rx) = proxy();
        proxy.initialize();
        drain(&rx);
        let fen = "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq - 0 1";
        assert!(!proxy.request_move(fen));
        assert!(drain(&rx).is_empty());

        proxy.handle_event(EngineEvent::Output("readyok".to_string()));
        assert_eq!(
            drain(&rx),
            vec![format!("position fen {fen}"), "go movetime 200".to_string()]
        );
        // an extra readyok must not repeat the request
        proxy.handle_event(EngineEvent::Output("readyok".to_string()));
        assert!(drain(&rx).is_empty());
    }

    #[test]
    fn test_ready_without_pending_request_sends_nothing() {
        let (mut proxy, rx) = proxy();
        proxy.initialize();
        drain(&rx);
        proxy.handle_event(EngineEvent::Output("readyok".to_string()));
        assert!(drain(&rx).is_empty());

        let fen = "4k3/8/8/8/8/8/8/4K3 w - - 0 1";
        assert!(proxy.request_move(fen));
        assert_eq!(
            drain(&rx),
            vec![format!("position fen {fen}"), "go movetime 200".to_string()]
        );
    }

    #[test]
    fn test_new_game_discards_deferred_request() {
        let (mut proxy, rx) = proxy();
        assert!(!proxy.request_move("4k3/8/8/8/8/8/8/4K3 w - - 0 1"));
        proxy.new_game();
        drain(&rx);
        proxy.handle_event(EngineEvent::Output("readyok".to_string()));
        assert!(drain(&rx).is_empty());
    }

    #[test]
    fn test_detached_proxy_never_sends() {
        let mut proxy = EngineProxy::detached(EngineConfig::default());
        proxy.new_game();
        assert!(!proxy.request_move("4k3/8/8/8/8/8/8/4K3 w - - 0 1"));
        proxy.shutdown();
    }
}
