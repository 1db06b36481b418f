use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid configuration, boards need at least 2x2 cells and 2 distinct players")]
    InvalidConfiguration,
    #[error("Invalid coordinates")]
    InvalidCoordinate,
    #[error("Not this player's turn")]
    NotPlayersTurn,
    #[error("Cell is owned by another player")]
    CellOwnedByOpponent,
    #[error("Game already finished, no new moves are accepted")]
    GameAlreadyFinished,
}

pub type Result<T> = core::result::Result<T, GameError>;
