//! Pure game logic module
//!
//! Everything here is deterministic and platform-free:
//! - No DOM, storage, or clock access
//! - Wall-clock timestamps are passed in, never read
//! - Stable row-major scan order

pub mod board;
pub mod clock;
pub mod controller;
pub mod rules;

pub use board::Board;
pub use clock::{SessionClock, score_for};
pub use controller::{Game, GamePhase, VerifyOutcome};
pub use rules::{find_conflicts, is_valid_solution};
