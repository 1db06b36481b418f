use chain_reaction_core::GameError;
use chain_reaction_protocol::{ErrorKind, SessionId};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum HostError {
    #[error(transparent)]
    Game(#[from] GameError),
    #[error("No open session with id {0}")]
    UnknownSession(SessionId),
    #[error("Session limit of {0} reached")]
    SessionLimit(usize),
    #[error("Malformed request: {0}")]
    BadRequest(#[from] serde_json::Error),
}

impl HostError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Game(error) => game_error_kind(*error),
            Self::UnknownSession(_) => ErrorKind::UnknownSession,
            Self::SessionLimit(_) => ErrorKind::SessionLimit,
            Self::BadRequest(_) => ErrorKind::BadRequest,
        }
    }
}

pub fn game_error_kind(error: GameError) -> ErrorKind {
    match error {
        GameError::InvalidConfiguration => ErrorKind::InvalidConfiguration,
        GameError::InvalidCoordinate => ErrorKind::InvalidCoordinate,
        GameError::NotPlayersTurn => ErrorKind::NotPlayersTurn,
        GameError::CellOwnedByOpponent => ErrorKind::CellOwnedByOpponent,
        GameError::GameAlreadyFinished => ErrorKind::GameAlreadyFinished,
    }
}

pub type Result<T> = std::result::Result<T, HostError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_follow_the_underlying_error() {
        assert_eq!(
            HostError::from(GameError::CellOwnedByOpponent).kind(),
            ErrorKind::CellOwnedByOpponent
        );
        assert_eq!(HostError::UnknownSession(7).kind(), ErrorKind::UnknownSession);
        assert_eq!(HostError::SessionLimit(1).kind(), ErrorKind::SessionLimit);

        let parse = serde_json::from_str::<u8>("nope").unwrap_err();
        assert_eq!(HostError::from(parse).kind(), ErrorKind::BadRequest);
    }

    #[test]
    fn game_errors_keep_their_message() {
        let error = HostError::from(GameError::NotPlayersTurn);
        assert_eq!(error.to_string(), GameError::NotPlayersTurn.to_string());
        assert_eq!(
            HostError::UnknownSession(42).to_string(),
            "No open session with id 42"
        );
    }
}
