use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chain_reaction_core::{
    BoardSnapshot, GameConfig, GameSession, MoveOutcome, PlayerId, SessionState,
};
use chain_reaction_protocol::{ClientMessage, ServerMessage, SessionId};
use hashbrown::HashMap;

use crate::*;

type SessionHandle = Arc<Mutex<GameSession>>;

/// Answer to a move request. Rejected moves still carry the current board.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MoveReply {
    pub board: BoardSnapshot,
    pub winner: Option<PlayerId>,
    pub outcome: chain_reaction_core::Result<MoveOutcome>,
}

/// Read-only summary of one session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionStatus {
    pub board: BoardSnapshot,
    pub state: SessionState,
    pub winner: Option<PlayerId>,
    pub current_player: PlayerId,
    pub turn_count: u32,
}

/// Registry of open sessions.
///
/// Each session has its own lock: requests for one session are applied one at a time while
/// different sessions proceed in parallel. The registry lock only guards lookups, inserts and
/// removals.
#[derive(Debug)]
pub struct SessionHost {
    config: HostConfig,
    next_id: AtomicU64,
    sessions: Mutex<HashMap<SessionId, SessionHandle>>,
}

impl SessionHost {
    pub fn new(config: HostConfig) -> Self {
        Self {
            config,
            next_id: AtomicU64::new(1),
            sessions: Mutex::new(HashMap::new()),
        }
    }

    pub fn config(&self) -> HostConfig {
        self.config
    }

    pub fn len(&self) -> usize {
        self.registry().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Opens a new session on an empty board; `players` are listed in turn order.
    pub fn create(
        &self,
        config: GameConfig,
        players: Vec<PlayerId>,
    ) -> Result<(SessionId, BoardSnapshot)> {
        let session = GameSession::new(config, players)?;
        let board = session.board();

        let mut sessions = self.registry();
        if sessions.len() >= self.config.max_sessions {
            log::warn!("Refused new session, {} already open", sessions.len());
            return Err(HostError::SessionLimit(self.config.max_sessions));
        }
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        sessions.insert(id, Arc::new(Mutex::new(session)));
        log::debug!(
            "Opened session {} ({}x{}), {} open",
            id,
            config.rows,
            config.cols,
            sessions.len()
        );

        Ok((id, board))
    }

    /// Plays a move in session `id`. Only an unknown session is an error here; a rejected
    /// move is reported through [`MoveReply::outcome`].
    pub fn apply_move(
        &self,
        id: SessionId,
        player: PlayerId,
        row: i32,
        col: i32,
    ) -> Result<MoveReply> {
        let handle = self.session(id)?;
        let mut session = lock(&handle);

        let outcome = session.apply_move(player, row, col);
        if let Err(error) = &outcome {
            log::warn!("Session {}: rejected {} at ({}, {}): {}", id, player, row, col, error);
        }

        Ok(MoveReply {
            board: session.board(),
            winner: session.winner(),
            outcome,
        })
    }

    pub fn board(&self, id: SessionId) -> Result<BoardSnapshot> {
        self.with_session(id, GameSession::board)
    }

    pub fn status(&self, id: SessionId) -> Result<SessionStatus> {
        self.with_session(id, |session| SessionStatus {
            board: session.board(),
            state: session.state(),
            winner: session.winner(),
            current_player: session.current_player(),
            turn_count: session.turn_count(),
        })
    }

    /// Runs `f` against session `id` while holding its lock.
    pub fn with_session<R>(&self, id: SessionId, f: impl FnOnce(&GameSession) -> R) -> Result<R> {
        let handle = self.session(id)?;
        let session = lock(&handle);
        Ok(f(&session))
    }

    pub fn reset(&self, id: SessionId) -> Result<()> {
        let handle = self.session(id)?;
        lock(&handle).reset();
        Ok(())
    }

    /// Drops session `id`. Requests already holding the session finish first.
    pub fn close(&self, id: SessionId) -> Result<()> {
        let mut sessions = self.registry();
        match sessions.remove(&id) {
            Some(_) => {
                log::debug!("Closed session {}, {} open", id, sessions.len());
                Ok(())
            }
            None => Err(HostError::UnknownSession(id)),
        }
    }

    pub fn handle(&self, message: ClientMessage) -> ServerMessage {
        match self.dispatch(message) {
            Ok(reply) => reply,
            Err(error) => {
                log::warn!("Request failed: {}", error);
                ServerMessage::error(error.kind(), error.to_string())
            }
        }
    }

    /// Answers one JSON request with one JSON reply. Malformed requests are answered with a
    /// `bad_request` error message; only encoding the reply can fail.
    pub fn handle_json(&self, request: &str) -> Result<String> {
        let reply = match chain_reaction_protocol::from_json(request) {
            Ok(message) => self.handle(message),
            Err(error) => {
                let error = HostError::from(error);
                log::warn!("{}", error);
                ServerMessage::error(error.kind(), error.to_string())
            }
        };
        Ok(chain_reaction_protocol::to_json(&reply)?)
    }

    fn dispatch(&self, message: ClientMessage) -> Result<ServerMessage> {
        Ok(match message {
            ClientMessage::NewGame {
                rows,
                cols,
                players,
            } => {
                let players = players.into_iter().map(PlayerId).collect();
                let (session, board) = self.create(GameConfig::new(rows, cols)?, players)?;
                ServerMessage::Created {
                    session,
                    board: board_view(&board),
                }
            }
            ClientMessage::ApplyMove {
                session,
                player,
                row,
                col,
            } => {
                let reply = self.apply_move(session, PlayerId(player), row, col)?;
                let (error, waves) = match &reply.outcome {
                    Ok(outcome) => (None, wave_view(&outcome.report)),
                    Err(error) => (Some(game_error_kind(*error)), Vec::new()),
                };
                ServerMessage::MoveResult {
                    board: board_view(&reply.board),
                    winner: reply.winner.map(|winner| winner.0),
                    error,
                    waves,
                }
            }
            ClientMessage::GetBoard { session } => {
                let status = self.status(session)?;
                ServerMessage::Board {
                    board: board_view(&status.board),
                    winner: status.winner.map(|winner| winner.0),
                    current_player: status.current_player.0,
                }
            }
            ClientMessage::Reset { session } => {
                self.reset(session)?;
                ServerMessage::ResetDone { session }
            }
            ClientMessage::Close { session } => {
                self.close(session)?;
                ServerMessage::Closed { session }
            }
        })
    }

    fn session(&self, id: SessionId) -> Result<SessionHandle> {
        self.registry()
            .get(&id)
            .cloned()
            .ok_or(HostError::UnknownSession(id))
    }

    fn registry(&self) -> MutexGuard<'_, HashMap<SessionId, SessionHandle>> {
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for SessionHost {
    fn default() -> Self {
        Self::new(HostConfig::default())
    }
}

/// Sessions are only mutated through `GameSession` methods that leave them whole on
/// rejection, so a poisoned lock still guards a usable session.
fn lock(handle: &SessionHandle) -> MutexGuard<'_, GameSession> {
    handle.lock().unwrap_or_else(PoisonError::into_inner)
}
