//! Queens Rush - a timed N-Queens puzzle for the browser
//!
//! Core modules:
//! - `game`: Pure game logic (board, placement rules, session clock, controller)
//! - `highscores`: Persisted best-score record
//! - `platform`: Browser/native platform abstraction (storage, wall clock)

pub mod game;
pub mod highscores;
pub mod platform;

pub use game::{Board, Game, GamePhase, VerifyOutcome};
pub use highscores::HighScoreRecord;

/// Game configuration constants
pub mod consts {
    /// Default board dimension
    pub const DEFAULT_BOARD_SIZE: usize = 8;
    /// Smallest selectable board (2x2 and 3x3 have no solutions)
    pub const MIN_BOARD_SIZE: usize = 4;
    /// Largest selectable board
    pub const MAX_BOARD_SIZE: usize = 12;

    /// Score basis: a one-second solve earns this many points
    pub const SCORE_BASIS: f64 = 100.0;
    /// Sentinel score shown after a failed verification
    pub const FAILED_SCORE: f64 = -1.0;

    /// Display refresh period for the running timer (milliseconds)
    pub const TIMER_TICK_MS: i32 = 1_000;
    /// Rendered cell edge length (pixels)
    pub const CELL_SIZE_PX: u32 = 47;
}
