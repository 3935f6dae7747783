//! Non-attack placement rules
//!
//! A placement is a solution when the marker count equals N and no two
//! markers share a row, column, or diagonal. Diagonals are keyed by
//! `row - col` (falling) and `row + col` (rising).

use std::collections::HashSet;

use super::board::Board;

/// Lines already claimed by earlier markers in the scan
#[derive(Debug, Default)]
struct LineTracker {
    rows: HashSet<usize>,
    cols: HashSet<usize>,
    falling: HashSet<isize>,
    rising: HashSet<usize>,
}

impl LineTracker {
    /// Claim the four lines through (row, col); true if any was already taken
    fn observe(&mut self, row: usize, col: usize) -> bool {
        let collides = self.rows.contains(&row)
            || self.cols.contains(&col)
            || self.falling.contains(&(row as isize - col as isize))
            || self.rising.contains(&(row + col));
        self.rows.insert(row);
        self.cols.insert(col);
        self.falling.insert(row as isize - col as isize);
        self.rising.insert(row + col);
        collides
    }
}

/// Whether the board is a complete, conflict-free solution
pub fn is_valid_solution(board: &Board) -> bool {
    let mut seen = LineTracker::default();
    let mut markers = 0;
    for (row, col) in board.markers() {
        markers += 1;
        if seen.observe(row, col) {
            return false;
        }
    }
    markers == board.size()
}

/// Every marker that collides with an earlier marker's row, column, or
/// diagonal.
///
/// The first marker establishing a line is never flagged, only the later
/// colliders: this is what the player sees highlighted, and the asymmetry
/// is intentional.
pub fn find_conflicts(board: &Board) -> HashSet<(usize, usize)> {
    let mut seen = LineTracker::default();
    let mut conflicts = HashSet::new();
    for (row, col) in board.markers() {
        if seen.observe(row, col) {
            conflicts.insert((row, col));
        }
    }
    conflicts
}
