//! Game state machine.
//!
//! Owns the board, the phase and whose turn it is. Seat bookkeeping lives in
//! the server; this module only knows about marks.
//!
//! # State Machine
//!
//! ```text
//! ┌─────────┐  start   ┌────────┐  win / draw / abort  ┌──────────┐
//! │ Waiting │─────────>│ Active │─────────────────────>│ Finished │
//! └─────────┘          └────────┘                      └──────────┘
//!                          ^            start                │
//!                          └─────────────────────────────────┘
//! ```
//!
//! Every `start` bumps the generation. A deferred restart carries the
//! generation it was scheduled for, so a restart meant for an older game can
//! be recognised and dropped.

use noughts_proto::Mark;

use crate::{board::Board, error::MoveError};

/// Lifecycle phase of the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Fewer than two seats have ever been filled for this game
    Waiting,
    /// Turns are being played
    Active,
    /// Ended by win, draw or a seat leaving
    Finished,
}

/// Result of an accepted move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// Mover completed a line; the game is finished
    Win(Mark),
    /// Board filled with no line; the game is finished
    Draw,
    /// Play continues with the other mark
    Continue {
        /// Mark to move next
        next: Mark,
    },
}

impl MoveOutcome {
    /// Whether this outcome ended the game.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Continue { .. })
    }
}

/// Authoritative game state.
#[derive(Debug, Clone)]
pub struct Game {
    board: Board,
    phase: Phase,
    active: Mark,
    generation: u64,
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

impl Game {
    /// New game waiting for players.
    pub fn new() -> Self {
        Self { board: Board::new(), phase: Phase::Waiting, active: Mark::X, generation: 0 }
    }

    /// Begin a fresh game: empty board, `X` to move.
    ///
    /// Returns the generation of the new game.
    pub fn start(&mut self) -> u64 {
        self.board.reset();
        self.active = Mark::X;
        self.phase = Phase::Active;
        self.generation += 1;
        self.generation
    }

    /// Apply a move by `mark`.
    ///
    /// Checks run in order: phase, turn, cell. The first failing check wins
    /// and leaves the state untouched.
    ///
    /// # Errors
    ///
    /// - `MoveError::NotActive` outside the Active phase
    /// - `MoveError::NotYourTurn` if `mark` is not the active mark
    /// - `MoveError::InvalidCell` if the board rejects the cell
    pub fn apply_move(&mut self, mark: Mark, row: i32, col: i32) -> Result<MoveOutcome, MoveError> {
        if self.phase != Phase::Active {
            return Err(MoveError::NotActive);
        }

        if mark != self.active {
            return Err(MoveError::NotYourTurn { expected: self.active });
        }

        self.board.place(row, col, mark)?;

        let outcome = if self.board.check_win(mark) {
            MoveOutcome::Win(mark)
        } else if self.board.is_full() {
            MoveOutcome::Draw
        } else {
            MoveOutcome::Continue { next: mark.opponent() }
        };

        if outcome.is_terminal() {
            self.phase = Phase::Finished;
        } else {
            self.active = mark.opponent();
        }

        Ok(outcome)
    }

    /// Interrupt the current game.
    ///
    /// Returns true if a game was actually in progress.
    pub fn abort(&mut self) -> bool {
        let was_active = self.phase == Phase::Active;
        if was_active {
            self.phase = Phase::Finished;
        }
        was_active
    }

    /// Whether a restart scheduled for `generation` may start a new game.
    pub fn can_restart(&self, generation: u64) -> bool {
        self.phase == Phase::Finished && generation == self.generation
    }

    /// Current phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Mark whose turn it is. Meaningful only while Active.
    pub fn active_mark(&self) -> Mark {
        self.active
    }

    /// Generation of the most recently started game (0 before the first).
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Current board.
    pub fn board(&self) -> &Board {
        &self.board
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PlaceError;

    #[test]
    fn moves_rejected_before_start() {
        let mut game = Game::new();
        assert_eq!(game.apply_move(Mark::X, 0, 0), Err(MoveError::NotActive));
        assert_eq!(game.phase(), Phase::Waiting);
    }

    #[test]
    fn turns_alternate() {
        let mut game = Game::new();
        game.start();

        assert_eq!(game.apply_move(Mark::X, 0, 0), Ok(MoveOutcome::Continue { next: Mark::O }));
        assert_eq!(
            game.apply_move(Mark::X, 0, 1),
            Err(MoveError::NotYourTurn { expected: Mark::O })
        );
        assert_eq!(game.apply_move(Mark::O, 0, 1), Ok(MoveOutcome::Continue { next: Mark::X }));
    }

    #[test]
    fn rejected_cell_keeps_turn() {
        let mut game = Game::new();
        game.start();
        game.apply_move(Mark::X, 1, 1).unwrap();

        assert_eq!(
            game.apply_move(Mark::O, 1, 1),
            Err(MoveError::InvalidCell(PlaceError::Occupied { row: 1, col: 1 }))
        );
        assert_eq!(game.active_mark(), Mark::O);
    }

    #[test]
    fn win_finishes_game() {
        let mut game = Game::new();
        game.start();

        for (mark, row, col) in [(Mark::X, 0, 0), (Mark::O, 1, 0), (Mark::X, 0, 1), (Mark::O, 1, 1)]
        {
            game.apply_move(mark, row, col).unwrap();
        }

        assert_eq!(game.apply_move(Mark::X, 0, 2), Ok(MoveOutcome::Win(Mark::X)));
        assert_eq!(game.phase(), Phase::Finished);
        assert_eq!(game.apply_move(Mark::O, 2, 2), Err(MoveError::NotActive));
    }

    #[test]
    fn draw_finishes_game() {
        let mut game = Game::new();
        game.start();

        // X O X / O X X / O X O
        let moves = [
            (Mark::X, 0, 0),
            (Mark::O, 0, 1),
            (Mark::X, 0, 2),
            (Mark::O, 1, 0),
            (Mark::X, 1, 1),
            (Mark::O, 2, 0),
            (Mark::X, 1, 2),
            (Mark::O, 2, 2),
        ];
        for (mark, row, col) in moves {
            assert!(!game.apply_move(mark, row, col).unwrap().is_terminal());
        }

        assert_eq!(game.apply_move(Mark::X, 2, 1), Ok(MoveOutcome::Draw));
        assert_eq!(game.phase(), Phase::Finished);
    }

    #[test]
    fn restart_is_keyed_by_generation() {
        let mut game = Game::new();
        let first = game.start();
        assert!(!game.can_restart(first), "active game cannot restart");

        assert!(game.abort());
        assert!(game.can_restart(first));

        let second = game.start();
        assert_eq!(second, first + 1);
        game.abort();
        assert!(!game.can_restart(first), "stale generation");
        assert!(game.can_restart(second));
    }

    #[test]
    fn start_resets_board_and_turn() {
        let mut game = Game::new();
        game.start();
        game.apply_move(Mark::X, 2, 2).unwrap();
        game.abort();

        game.start();
        assert_eq!(game.board(), &Board::new());
        assert_eq!(game.active_mark(), Mark::X);
        assert_eq!(game.phase(), Phase::Active);
    }
}
