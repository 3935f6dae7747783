//! Persisted best-score record
//!
//! One JSON record under a fixed storage key. The wire format keeps the
//! `boardSize` field name from earlier releases so existing saves survive.

use serde::{Deserialize, Serialize};

use crate::platform::KeyValueStore;

/// Best (score, board size) pair achieved on this browser profile
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct HighScoreRecord {
    /// Score earned on the winning solve
    pub score: f64,
    /// Board dimension the score was earned on
    #[serde(rename = "boardSize")]
    pub board_size: u32,
}

impl HighScoreRecord {
    /// The record meaning "no high score yet"
    pub const ZERO: Self = Self {
        score: 0.0,
        board_size: 0,
    };

    pub fn is_set(&self) -> bool {
        self.score > 0.0
    }

    /// HUD rendering: `8x8 board : 12.50`, or `None` when unset
    pub fn display(&self) -> String {
        if self.is_set() {
            format!(
                "{}x{} board : {:.2}",
                self.board_size, self.board_size, self.score
            )
        } else {
            "None".to_string()
        }
    }

    /// Strictly-better ordering: higher score wins; equal scores go to the
    /// larger board
    pub fn beats(&self, other: &Self) -> bool {
        self.score > other.score
            || (self.score == other.score && self.board_size > other.board_size)
    }
}

/// Storage-backed store for the single high-score record
#[derive(Debug)]
pub struct HighScoreStore<S: KeyValueStore> {
    storage: S,
    current: HighScoreRecord,
}

impl<S: KeyValueStore> HighScoreStore<S> {
    /// Fixed storage key
    pub const STORAGE_KEY: &'static str = "queens_rush_highscore";

    /// Load the persisted record, falling back to the zero record on a
    /// missing key or malformed JSON
    pub fn load(storage: S) -> Self {
        let current = storage
            .get(Self::STORAGE_KEY)
            .and_then(|json| serde_json::from_str(&json).ok())
            .unwrap_or(HighScoreRecord::ZERO);
        if current.is_set() {
            log::info!("Loaded high score: {}", current.display());
        }
        Self { storage, current }
    }

    /// The record as last read or written
    pub fn current(&self) -> HighScoreRecord {
        self.current
    }

    /// Persist unconditionally, overwriting
    pub fn save(&mut self, record: HighScoreRecord) {
        self.current = record;
        if let Ok(json) = serde_json::to_string(&record) {
            self.storage.set(Self::STORAGE_KEY, &json);
            log::info!("High score saved: {}", record.display());
        }
    }

    /// Persist the candidate only if it beats the current record; returns
    /// whether it did
    pub fn maybe_update(&mut self, candidate: HighScoreRecord) -> bool {
        if candidate.beats(&self.current) {
            self.save(candidate);
            true
        } else {
            false
        }
    }

    /// Back to the zero record; the persisted key is removed
    pub fn reset(&mut self) {
        self.current = HighScoreRecord::ZERO;
        self.storage.remove(Self::STORAGE_KEY);
        log::info!("High score cleared");
    }
}
