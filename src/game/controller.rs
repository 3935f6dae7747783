//! Session lifecycle orchestration
//!
//! The controller owns everything a round touches: the board, the session
//! clock, the score shown in the HUD, the conflict set from the last failed
//! verification, and the persisted high-score store. There is no other
//! mutable game state anywhere in the crate.

use std::collections::HashSet;

use crate::consts::{DEFAULT_BOARD_SIZE, FAILED_SCORE, MAX_BOARD_SIZE, MIN_BOARD_SIZE};
use crate::highscores::{HighScoreRecord, HighScoreStore};
use crate::platform::KeyValueStore;

use super::board::Board;
use super::clock::{SessionClock, score_for};
use super::rules::{find_conflicts, is_valid_solution};

/// Where the session is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Board visible, timer idle; waiting for start
    Ready,
    /// Timer running, markers placeable
    Playing,
    /// Last verification succeeded
    Solved,
    /// Last verification failed; conflicts highlighted
    Failed,
}

/// Result of a verification request
#[derive(Debug, Clone, PartialEq)]
pub enum VerifyOutcome {
    /// No active session; nothing was checked or changed
    NotStarted,
    /// Correct solution
    Solved {
        score: f64,
        elapsed_secs: u64,
        new_high_score: bool,
    },
    /// Incorrect; carries the colliding markers to highlight
    Failed { conflicts: HashSet<(usize, usize)> },
}

/// The game controller
#[derive(Debug)]
pub struct Game<S: KeyValueStore> {
    board: Board,
    clock: SessionClock,
    phase: GamePhase,
    score: f64,
    conflicts: HashSet<(usize, usize)>,
    highscores: HighScoreStore<S>,
}

impl<S: KeyValueStore> Game<S> {
    /// Default-sized game over the given storage backend
    pub fn new(storage: S) -> Self {
        Self::with_board_size(DEFAULT_BOARD_SIZE, storage)
    }

    pub fn with_board_size(size: usize, storage: S) -> Self {
        Self {
            board: Board::new(size),
            clock: SessionClock::new(),
            phase: GamePhase::Ready,
            score: 0.0,
            conflicts: HashSet::new(),
            highscores: HighScoreStore::load(storage),
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    /// Score for display: 0 before a verify, the earned score after a
    /// solve, `FAILED_SCORE` after a failed verify
    pub fn score(&self) -> f64 {
        self.score
    }

    /// Conflicts from the last failed verification
    pub fn conflicts(&self) -> &HashSet<(usize, usize)> {
        &self.conflicts
    }

    pub fn high_score(&self) -> HighScoreRecord {
        self.highscores.current()
    }

    /// Whole seconds the current session has been running
    pub fn elapsed_secs(&self, now_ms: f64) -> u64 {
        self.clock.elapsed_secs(now_ms)
    }

    /// Rebuild the board at a new dimension, discarding any in-progress
    /// session. Rejects dimensions outside the selectable range and leaves
    /// all state untouched.
    pub fn change_board_size(&mut self, size: usize) -> bool {
        if !(MIN_BOARD_SIZE..=MAX_BOARD_SIZE).contains(&size) {
            log::warn!("Rejected board size {size}");
            return false;
        }
        self.board.resize(size);
        self.abandon_session();
        log::info!("Board resized to {size}x{size}");
        true
    }

    /// Begin a session: timer restarts from zero and markers become
    /// placeable. Idempotent while Playing, so a double start can never
    /// reset a running timer. The board is left as-is; a fresh round over
    /// the previous placement is allowed.
    pub fn start(&mut self, now_ms: f64) -> bool {
        if self.phase == GamePhase::Playing {
            return false;
        }
        self.conflicts.clear();
        self.score = 0.0;
        self.clock.reset();
        self.clock.start(now_ms);
        self.phase = GamePhase::Playing;
        log::info!("Session started on {0}x{0}", self.board.size());
        true
    }

    /// Flip a cell; returns the new marker state, or None when there is no
    /// active session (silent no-op by design)
    pub fn toggle_marker(&mut self, row: usize, col: usize) -> Option<bool> {
        if self.phase != GamePhase::Playing {
            return None;
        }
        Some(self.board.toggle(row, col))
    }

    /// Stop the clock and judge the placement. Without an active session
    /// this checks nothing and changes nothing. Either verdict ends the
    /// session: a fresh `start()` is required before placing more markers.
    pub fn verify(&mut self, now_ms: f64) -> VerifyOutcome {
        if self.phase != GamePhase::Playing {
            log::warn!("Verify requested with no active session");
            return VerifyOutcome::NotStarted;
        }

        let elapsed_secs = self.clock.stop(now_ms);
        if is_valid_solution(&self.board) {
            self.score = score_for(elapsed_secs);
            let record = HighScoreRecord {
                score: self.score,
                board_size: self.board.size() as u32,
            };
            let new_high_score = self.highscores.maybe_update(record);
            self.phase = GamePhase::Solved;
            log::info!(
                "Solved {0}x{0} in {elapsed_secs}s, score {1:.2}",
                self.board.size(),
                self.score
            );
            VerifyOutcome::Solved {
                score: self.score,
                elapsed_secs,
                new_high_score,
            }
        } else {
            self.score = FAILED_SCORE;
            self.conflicts = find_conflicts(&self.board);
            self.phase = GamePhase::Failed;
            log::info!(
                "Incorrect placement, {} conflicting markers",
                self.conflicts.len()
            );
            VerifyOutcome::Failed {
                conflicts: self.conflicts.clone(),
            }
        }
    }

    /// Clear the board and all session state; back to Ready
    pub fn reset(&mut self) {
        self.board.clear();
        self.abandon_session();
    }

    /// Clear the persisted high-score record
    pub fn reset_high_score(&mut self) {
        self.highscores.reset();
    }

    fn abandon_session(&mut self) {
        self.clock.reset();
        self.conflicts.clear();
        self.score = 0.0;
        self.phase = GamePhase::Ready;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::MemoryStore;

    fn new_game(size: usize) -> Game<MemoryStore> {
        Game::with_board_size(size, MemoryStore::new())
    }

    fn place(game: &mut Game<MemoryStore>, markers: &[(usize, usize)]) {
        for &(row, col) in markers {
            assert!(game.toggle_marker(row, col).is_some());
        }
    }

    #[test]
    fn test_markers_ignored_before_start() {
        let mut game = new_game(4);
        assert_eq!(game.toggle_marker(0, 0), None);
        assert_eq!(game.board().marker_count(), 0);
        assert_eq!(game.phase(), GamePhase::Ready);
    }

    #[test]
    fn test_start_is_idempotent_while_playing() {
        let mut game = new_game(4);
        assert!(game.start(0.0));
        assert!(!game.start(9_000.0));
        // A double start must not reset the running timer
        assert_eq!(game.elapsed_secs(10_000.0), 10);
    }

    #[test]
    fn test_solve_flow() {
        let mut game = new_game(4);
        game.start(0.0);
        place(&mut game, &[(0, 1), (1, 3), (2, 0), (3, 2)]);

        let outcome = game.verify(5_000.0);
        assert_eq!(
            outcome,
            VerifyOutcome::Solved {
                score: 20.0,
                elapsed_secs: 5,
                new_high_score: true,
            }
        );
        assert_eq!(game.phase(), GamePhase::Solved);
        assert_eq!(game.score(), 20.0);
        assert_eq!(
            game.high_score(),
            HighScoreRecord {
                score: 20.0,
                board_size: 4
            }
        );
    }

    #[test]
    fn test_sub_second_solve_scores_full_basis() {
        let mut game = new_game(4);
        game.start(0.0);
        place(&mut game, &[(0, 1), (1, 3), (2, 0), (3, 2)]);
        let outcome = game.verify(400.0);
        assert!(matches!(outcome, VerifyOutcome::Solved { score, .. } if score == 100.0));
    }

    #[test]
    fn test_failed_flow() {
        let mut game = new_game(4);
        game.start(0.0);
        place(&mut game, &[(0, 0), (1, 1)]);

        let outcome = game.verify(3_000.0);
        assert_eq!(
            outcome,
            VerifyOutcome::Failed {
                conflicts: HashSet::from([(1, 1)]),
            }
        );
        assert_eq!(game.phase(), GamePhase::Failed);
        assert_eq!(game.score(), FAILED_SCORE);
        assert_eq!(game.conflicts(), &HashSet::from([(1, 1)]));
        // Losing never records a high score
        assert!(!game.high_score().is_set());
    }

    #[test]
    fn test_verify_without_session_changes_nothing() {
        let mut game = new_game(4);
        assert_eq!(game.verify(1_000.0), VerifyOutcome::NotStarted);
        assert_eq!(game.phase(), GamePhase::Ready);

        // Terminal phases are not-started too
        game.start(0.0);
        game.verify(1_000.0);
        assert_eq!(game.verify(2_000.0), VerifyOutcome::NotStarted);
    }

    #[test]
    fn test_terminal_phase_requires_fresh_start() {
        let mut game = new_game(4);
        game.start(0.0);
        place(&mut game, &[(0, 0), (1, 1)]);
        game.verify(2_000.0);

        // Placement is frozen until a new session begins
        assert_eq!(game.toggle_marker(2, 2), None);
        assert!(game.start(10_000.0));
        assert_eq!(game.phase(), GamePhase::Playing);
        // The new session starts with a clean slate for score and conflicts
        assert!(game.conflicts().is_empty());
        assert_eq!(game.score(), 0.0);
        // ...but keeps the board, so the player can fix their placement
        assert_eq!(game.board().marker_count(), 2);
        assert_eq!(game.elapsed_secs(12_000.0), 2);
    }

    #[test]
    fn test_resize_mid_game_discards_session() {
        let mut game = new_game(4);
        game.start(0.0);
        place(&mut game, &[(0, 1), (1, 3)]);

        assert!(game.change_board_size(6));
        assert_eq!(game.board().size(), 6);
        assert_eq!(game.board().marker_count(), 0);
        assert_eq!(game.phase(), GamePhase::Ready);
        assert_eq!(game.elapsed_secs(60_000.0), 0);
        // A fresh start is required before placing again
        assert_eq!(game.toggle_marker(0, 0), None);
    }

    #[test]
    fn test_resize_rejects_out_of_range() {
        let mut game = new_game(8);
        game.start(0.0);
        place(&mut game, &[(0, 0)]);
        assert!(!game.change_board_size(3));
        assert!(!game.change_board_size(13));
        // Rejected resize leaves the session running
        assert_eq!(game.board().size(), 8);
        assert_eq!(game.board().marker_count(), 1);
        assert_eq!(game.phase(), GamePhase::Playing);
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut game = new_game(4);
        game.start(0.0);
        place(&mut game, &[(0, 0), (1, 1)]);
        game.verify(2_000.0);

        game.reset();
        assert_eq!(game.phase(), GamePhase::Ready);
        assert_eq!(game.board().marker_count(), 0);
        assert!(game.conflicts().is_empty());
        assert_eq!(game.score(), 0.0);
        assert_eq!(game.elapsed_secs(99_000.0), 0);
    }

    #[test]
    fn test_high_score_survives_reset() {
        let mut game = new_game(4);
        game.start(0.0);
        place(&mut game, &[(0, 1), (1, 3), (2, 0), (3, 2)]);
        game.verify(5_000.0);

        game.reset();
        assert!(game.high_score().is_set());

        game.reset_high_score();
        assert_eq!(game.high_score(), HighScoreRecord::ZERO);
    }

    #[test]
    fn test_slower_second_solve_keeps_record() {
        let mut game = new_game(4);
        game.start(0.0);
        place(&mut game, &[(0, 1), (1, 3), (2, 0), (3, 2)]);
        game.verify(5_000.0);

        // Same placement, slower solve: record must not regress
        let outcome = {
            game.start(10_000.0);
            game.verify(30_000.0)
        };
        assert!(
            matches!(outcome, VerifyOutcome::Solved { new_high_score, .. } if !new_high_score)
        );
        assert_eq!(game.high_score().score, 20.0);
    }
}
