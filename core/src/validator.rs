use crate::*;

/// Checks a proposed move against the session without touching it.
///
/// Checks run in a fixed order: finished game, coordinates, turn, cell ownership. Returns the
/// move's grid coordinates once every check passes.
pub fn validate_move(session: &GameSession, player: PlayerId, row: i32, col: i32) -> Result<Coord2> {
    if session.is_finished() {
        return Err(GameError::GameAlreadyFinished);
    }

    let coords = validate_coords(session.config().size(), row, col)?;

    if player != session.current_player() {
        return Err(GameError::NotPlayersTurn);
    }

    match session.cell_at(coords).owner {
        Some(owner) if owner != player => Err(GameError::CellOwnedByOpponent),
        _ => Ok(coords),
    }
}

/// Converts signed caller coordinates into grid coordinates within `(rows, cols)`.
pub fn validate_coords((rows, cols): Coord2, row: i32, col: i32) -> Result<Coord2> {
    let row = Coord::try_from(row).map_err(|_| GameError::InvalidCoordinate)?;
    let col = Coord::try_from(col).map_err(|_| GameError::InvalidCoordinate)?;
    if row < rows && col < cols {
        Ok((row, col))
    } else {
        Err(GameError::InvalidCoordinate)
    }
}
