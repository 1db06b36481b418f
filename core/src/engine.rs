use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

use crate::*;

/// Valid transitions:
/// - NotStarted -> InProgress
/// - InProgress -> Finished
/// - any -> NotStarted on reset
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    #[default]
    NotStarted,
    InProgress,
    Finished,
}

impl SessionState {
    pub const fn is_started(self) -> bool {
        matches!(self, Self::InProgress | Self::Finished)
    }

    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Finished)
    }
}

/// Result of an accepted move.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MoveOutcome {
    pub winner: Option<PlayerId>,
    pub report: ExplosionReport,
}

impl MoveOutcome {
    pub const fn is_win(&self) -> bool {
        self.winner.is_some()
    }
}

/// One game from the first move to a winner.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameSession {
    config: GameConfig,
    players: Vec<PlayerId>,
    board: Board,
    current: usize,
    state: SessionState,
    winner: Option<PlayerId>,
    turn_count: u32,
}

impl GameSession {
    /// Starts a session on an empty board. Needs a valid config and at least two distinct
    /// players, listed in turn order.
    pub fn new(config: GameConfig, players: Vec<PlayerId>) -> Result<Self> {
        config.validate()?;
        if players.len() < 2 {
            return Err(GameError::InvalidConfiguration);
        }
        if players
            .iter()
            .enumerate()
            .any(|(index, player)| players[..index].contains(player))
        {
            return Err(GameError::InvalidConfiguration);
        }

        Ok(Self {
            config,
            board: Board::new(config),
            players,
            current: 0,
            state: Default::default(),
            winner: None,
            turn_count: 0,
        })
    }

    pub fn config(&self) -> GameConfig {
        self.config
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_finished(&self) -> bool {
        self.state.is_finished()
    }

    pub fn winner(&self) -> Option<PlayerId> {
        self.winner
    }

    pub fn players(&self) -> &[PlayerId] {
        &self.players
    }

    pub fn current_player(&self) -> PlayerId {
        self.players[self.current]
    }

    /// Moves accepted so far, the winning move excluded.
    pub fn turn_count(&self) -> u32 {
        self.turn_count
    }

    pub fn cell_at(&self, coords: Coord2) -> Cell {
        self.board.cell_at(coords)
    }

    /// Read-only view of the live board.
    pub fn grid(&self) -> &Board {
        &self.board
    }

    pub fn board(&self) -> BoardSnapshot {
        self.board.snapshot()
    }

    /// Validates and plays a move. A rejected move leaves the session untouched.
    ///
    /// The turn normally passes to the next player in list order. With three or more players
    /// a player with nowhere to play is passed over, so the order can differ from a strict
    /// rotation. The winning move keeps the turn with the winner.
    pub fn apply_move(&mut self, player: PlayerId, row: i32, col: i32) -> Result<MoveOutcome> {
        let coords = validate_move(self, player, row, col)?;

        let report = cascade_in_place(&mut self.board, player, coords);
        let winner = detect_winner(&self.board, self.state.is_started());
        log::debug!(
            "{} played {:?}, explosions: {}, chips: {}",
            player,
            coords,
            report.explosions(),
            self.board.total_chips()
        );

        debug_assert!(
            report.halted || self.board.is_stable(),
            "unstable board after move"
        );
        debug_assert!(!report.halted || winner.is_some(), "halted cascade without a winner");
        debug_assert!(self.board.is_consistent(), "owner/count mismatch after move");

        self.mark_started();
        match winner {
            Some(winner) => self.end_game(winner),
            None => {
                self.advance_turn();
                self.turn_count += 1;
            }
        }

        Ok(MoveOutcome { winner, report })
    }

    /// Plays a move on a copy of the board, leaving the session as it was.
    pub fn preview_move(
        &self,
        player: PlayerId,
        row: i32,
        col: i32,
    ) -> Result<(BoardSnapshot, ExplosionReport)> {
        let coords = validate_move(self, player, row, col)?;
        let (board, report) = run_cascade(self.board.clone(), player, coords);
        Ok((board.snapshot(), report))
    }

    /// Clears the board and returns to the first player, keeping size and players.
    pub fn reset(&mut self) {
        log::debug!("reset {}x{} session", self.config.rows, self.config.cols);
        self.board = Board::new(self.config);
        self.current = 0;
        self.state = SessionState::NotStarted;
        self.winner = None;
        self.turn_count = 0;
    }

    /// Passes the turn on in player order. A player is skipped only while they have nowhere to
    /// play: no empty cell left and none of their own. Two-player games never skip, since that
    /// position means the opponent already owns the board.
    fn advance_turn(&mut self) {
        let tally = OwnerTally::from_board(&self.board);
        let has_empty_cell = tally.occupied() < self.board.total_cells();
        for _ in 0..self.players.len() {
            self.current = (self.current + 1) % self.players.len();
            let player = self.current_player();
            if has_empty_cell || tally.count(player) > 0 {
                break;
            }
            log::debug!("{} has no legal move, skipped", player);
        }
    }

    fn mark_started(&mut self) {
        if matches!(self.state, SessionState::NotStarted) {
            log::debug!("started with {} players", self.players.len());
            self.state = SessionState::InProgress;
        }
    }

    fn end_game(&mut self, winner: PlayerId) {
        if self.state.is_finished() {
            return;
        }
        log::debug!("{} won after {} turns", winner, self.turn_count + 1);
        self.state = SessionState::Finished;
        self.winner = Some(winner);
    }
}
