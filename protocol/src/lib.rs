//! JSON messages exchanged between a chain reaction host and its clients.
//!
//! Deliberately free of engine types so clients only need `serde`.

use serde::{Deserialize, Serialize};

pub type SessionId = u64;

pub type PlayerId = u8;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    NewGame {
        rows: u8,
        cols: u8,
        players: Vec<PlayerId>,
    },
    ApplyMove {
        session: SessionId,
        player: PlayerId,
        row: i32,
        col: i32,
    },
    GetBoard {
        session: SessionId,
    },
    Reset {
        session: SessionId,
    },
    Close {
        session: SessionId,
    },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    Created {
        session: SessionId,
        board: BoardView,
    },
    /// Reply to `apply_move`, sent for rejected moves too so the client can redraw.
    MoveResult {
        board: BoardView,
        winner: Option<PlayerId>,
        error: Option<ErrorKind>,
        /// Cells that exploded, as `[row, col]` pairs grouped by cascade depth.
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        waves: Vec<Vec<[u8; 2]>>,
    },
    Board {
        board: BoardView,
        winner: Option<PlayerId>,
        current_player: PlayerId,
    },
    ResetDone {
        session: SessionId,
    },
    Closed {
        session: SessionId,
    },
    Error {
        kind: ErrorKind,
        message: String,
    },
}

impl ServerMessage {
    pub fn error(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self::Error {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    InvalidConfiguration,
    InvalidCoordinate,
    NotPlayersTurn,
    CellOwnedByOpponent,
    GameAlreadyFinished,
    UnknownSession,
    SessionLimit,
    BadRequest,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardView {
    pub rows: u8,
    pub cols: u8,
    /// Row-major.
    pub cells: Vec<CellView>,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellView {
    pub count: u32,
    pub owner: Option<PlayerId>,
}

pub fn to_json(message: &ServerMessage) -> serde_json::Result<String> {
    serde_json::to_string(message)
}

pub fn from_json(text: &str) -> serde_json::Result<ClientMessage> {
    serde_json::from_str(text)
}
