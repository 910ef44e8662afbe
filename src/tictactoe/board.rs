//! Tic-tac-toe rules: legal moves, win/draw detection, mark eviction
//!
//! One `Board` covers both variants. In the infinite variant each side keeps
//! at most `MARK_CAP` live marks; placing another evicts that side's oldest.

use serde::{Deserialize, Serialize};

use crate::consts::tictactoe::{CELLS, MARK_CAP};
use crate::error::MoveError;
use crate::settings::Variant;

/// A player's symbol
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mark {
    X,
    O,
}

impl Mark {
    pub fn opponent(&self) -> Mark {
        match self {
            Mark::X => Mark::O,
            Mark::O => Mark::X,
        }
    }

    fn slot(&self) -> usize {
        match self {
            Mark::X => 0,
            Mark::O => 1,
        }
    }
}

/// Board contents, index 0..8 in row-major order
pub type Cells = [Option<Mark>; CELLS];

/// Every three-in-a-row, rows first, then columns, then diagonals
pub const WIN_LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];

pub const CENTER: usize = 4;
pub const CORNERS: [usize; 4] = [0, 2, 6, 8];

/// First complete line held by `mark`
pub fn winning_line(cells: &Cells, mark: Mark) -> Option<[usize; 3]> {
    WIN_LINES
        .iter()
        .copied()
        .find(|line| line.iter().all(|&i| cells[i] == Some(mark)))
}

pub fn empty_cells(cells: &Cells) -> Vec<usize> {
    (0..CELLS).filter(|&i| cells[i].is_none()).collect()
}

pub fn is_full(cells: &Cells) -> bool {
    cells.iter().all(|c| c.is_some())
}

/// Per-side placement order, oldest first (infinite variant only)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveHistory {
    sides: [Vec<usize>; 2],
}

impl MoveHistory {
    pub fn get(&self, mark: Mark) -> &[usize] {
        &self.sides[mark.slot()]
    }

    /// Record a placement, returning the evicted index if `mark` was at the cap
    pub fn push(&mut self, mark: Mark, index: usize) -> Option<usize> {
        let history = &mut self.sides[mark.slot()];
        let evicted = if history.len() >= MARK_CAP {
            Some(history.remove(0))
        } else {
            None
        };
        history.push(index);
        evicted
    }

    /// Cell that `mark`'s next placement would evict
    pub fn next_to_vanish(&self, mark: Mark) -> Option<usize> {
        let history = self.get(mark);
        if history.len() >= MARK_CAP {
            history.first().copied()
        } else {
            None
        }
    }
}

/// A completed line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WinInfo {
    pub winner: Mark,
    pub line: [usize; 3],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    InProgress,
    Won(WinInfo),
    /// Classic variant only: full board, no line
    Draw,
    /// Ended by a disconnect, nobody is credited
    Abandoned,
}

/// BoardEngine: cells, turn, per-side history and outcome
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    cells: Cells,
    variant: Variant,
    history: MoveHistory,
    turn: Mark,
    outcome: Outcome,
}

impl Board {
    /// Empty board, X to move
    pub fn new(variant: Variant) -> Self {
        Self {
            cells: [None; CELLS],
            variant,
            history: MoveHistory::default(),
            turn: Mark::X,
            outcome: Outcome::InProgress,
        }
    }

    pub fn cells(&self) -> &Cells {
        &self.cells
    }

    pub fn get(&self, index: usize) -> Option<Mark> {
        self.cells.get(index).copied().flatten()
    }

    pub fn variant(&self) -> Variant {
        self.variant
    }

    pub fn history(&self) -> &MoveHistory {
        &self.history
    }

    /// Side to move
    pub fn turn(&self) -> Mark {
        self.turn
    }

    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    pub fn is_over(&self) -> bool {
        self.outcome != Outcome::InProgress
    }

    pub fn is_empty_cell(&self, index: usize) -> bool {
        index < CELLS && self.cells[index].is_none()
    }

    /// The mark `side` would lose on its next placement (infinite variant)
    pub fn next_to_vanish(&self, side: Mark) -> Option<usize> {
        match self.variant {
            Variant::Infinite => self.history.next_to_vanish(side),
            Variant::Classic => None,
        }
    }

    /// Place `side`'s mark at `index`.
    ///
    /// Rejected moves leave the board untouched. On success returns the
    /// completed line if the move won.
    pub fn apply_move(&mut self, index: usize, side: Mark) -> Result<Option<WinInfo>, MoveError> {
        if self.is_over() {
            return Err(MoveError::GameOver);
        }
        if index >= CELLS {
            return Err(MoveError::OutOfRange(index));
        }
        if self.cells[index].is_some() {
            return Err(MoveError::Occupied(index));
        }
        if side != self.turn {
            return Err(MoveError::NotYourTurn);
        }

        if self.variant == Variant::Infinite {
            // Oldest mark leaves before the new one lands
            if let Some(evicted) = self.history.push(side, index) {
                self.cells[evicted] = None;
            }
        }
        self.cells[index] = Some(side);

        if let Some(line) = winning_line(&self.cells, side) {
            let win = WinInfo { winner: side, line };
            self.outcome = Outcome::Won(win);
            return Ok(Some(win));
        }

        if self.variant == Variant::Classic && is_full(&self.cells) {
            self.outcome = Outcome::Draw;
            return Ok(None);
        }

        self.turn = side.opponent();
        Ok(None)
    }

    /// End the current match without a winner
    pub fn abandon(&mut self) {
        if !self.is_over() {
            self.outcome = Outcome::Abandoned;
        }
    }

    /// Clear for a new match, keeping the variant
    pub fn reset(&mut self) {
        *self = Self::new(self.variant);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn play(board: &mut Board, moves: &[usize]) {
        for &i in moves {
            let side = board.turn();
            board.apply_move(i, side).unwrap();
        }
    }

    #[test]
    fn test_classic_row_win() {
        let mut board = Board::new(Variant::Classic);
        play(&mut board, &[0, 3, 1, 4]);
        let win = board.apply_move(2, Mark::X).unwrap();
        assert_eq!(
            win,
            Some(WinInfo {
                winner: Mark::X,
                line: [0, 1, 2]
            })
        );
        assert!(board.is_over());
    }

    #[test]
    fn test_rejected_moves_leave_board_untouched() {
        let mut board = Board::new(Variant::Classic);
        play(&mut board, &[4]);
        let before = board.clone();

        assert_eq!(board.apply_move(4, Mark::O), Err(MoveError::Occupied(4)));
        assert_eq!(board.apply_move(9, Mark::O), Err(MoveError::OutOfRange(9)));
        assert_eq!(board.apply_move(0, Mark::X), Err(MoveError::NotYourTurn));
        assert_eq!(board, before);
    }

    #[test]
    fn test_no_moves_after_game_over() {
        let mut board = Board::new(Variant::Classic);
        play(&mut board, &[0, 3, 1, 4, 2]);
        assert_eq!(board.apply_move(5, Mark::O), Err(MoveError::GameOver));
    }

    #[test]
    fn test_classic_draw() {
        let mut board = Board::new(Variant::Classic);
        // X O X / X O O / O X X
        play(&mut board, &[0, 1, 2, 4, 3, 5, 7, 6, 8]);
        assert_eq!(board.outcome(), Outcome::Draw);
    }

    #[test]
    fn test_infinite_evicts_oldest_before_placing() {
        let mut board = Board::new(Variant::Infinite);
        play(&mut board, &[0, 3, 1, 4, 8, 7]);
        assert_eq!(board.next_to_vanish(Mark::X), Some(0));

        // X's fourth mark removes the mark at 0
        board.apply_move(2, Mark::X).unwrap();
        assert_eq!(board.get(0), None);
        assert_eq!(board.history().get(Mark::X), &[1, 8, 2]);
        assert_eq!(board.next_to_vanish(Mark::X), Some(1));
        assert!(!board.is_over());
    }

    #[test]
    fn test_infinite_win_with_evicted_line() {
        let mut board = Board::new(Variant::Infinite);
        // X: 0, 1, 8 ; O: 3, 4, 6
        play(&mut board, &[0, 3, 1, 4, 8, 6]);
        // X plays 2, evicting 0: row 0-1-2 is broken, no win
        assert_eq!(board.apply_move(2, Mark::X).unwrap(), None);
        // O plays 5, evicting 3: row 3-4-5 broken, no win either
        assert_eq!(board.apply_move(5, Mark::O).unwrap(), None);
        // Cell 0 is free again; X takes it back and loses 1
        assert_eq!(board.apply_move(0, Mark::X).unwrap(), None);
        assert_eq!(board.get(1), None);
    }

    #[test]
    fn test_abandon_records_no_winner() {
        let mut board = Board::new(Variant::Classic);
        play(&mut board, &[0, 4]);
        board.abandon();
        assert_eq!(board.outcome(), Outcome::Abandoned);
        assert_eq!(board.apply_move(1, Mark::X), Err(MoveError::GameOver));

        board.reset();
        assert_eq!(board.outcome(), Outcome::InProgress);
        assert_eq!(board.turn(), Mark::X);
        assert!(board.cells().iter().all(Option::is_none));
    }

    /// Once both sides are capped only six cells can be occupied
    #[test]
    fn test_infinite_cap_leaves_room() {
        assert!(2 * MARK_CAP < CELLS);
    }

    proptest! {
        #[test]
        fn prop_infinite_never_fills(choices in prop::collection::vec(0usize..9, 1..60)) {
            let mut board = Board::new(Variant::Infinite);
            for choice in choices {
                if board.is_over() {
                    break;
                }
                let empty = empty_cells(board.cells());
                prop_assert!(!empty.is_empty());
                let index = empty[choice % empty.len()];
                let side = board.turn();
                board.apply_move(index, side).unwrap();

                prop_assert_ne!(board.outcome(), Outcome::Draw);
                prop_assert!(board.history().get(Mark::X).len() <= MARK_CAP);
                prop_assert!(board.history().get(Mark::O).len() <= MARK_CAP);
                let occupied = board.cells().iter().filter(|c| c.is_some()).count();
                prop_assert!(occupied <= 2 * MARK_CAP);
                prop_assert!(!is_full(board.cells()));
            }
        }

        #[test]
        fn prop_history_matches_board(choices in prop::collection::vec(0usize..9, 1..40)) {
            let mut board = Board::new(Variant::Infinite);
            for choice in choices {
                if board.is_over() {
                    break;
                }
                let empty = empty_cells(board.cells());
                let index = empty[choice % empty.len()];
                let side = board.turn();
                board.apply_move(index, side).unwrap();

                for mark in [Mark::X, Mark::O] {
                    for &i in board.history().get(mark) {
                        prop_assert_eq!(board.get(i), Some(mark));
                    }
                    let live = board.cells().iter().filter(|c| **c == Some(mark)).count();
                    prop_assert_eq!(live, board.history().get(mark).len());
                }
            }
        }
    }
}
