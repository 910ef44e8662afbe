//! Scored-move search for the infinite variant
//!
//! Marks expire, so a full game tree is unbounded. Each empty cell is scored
//! once against the board as it would look after the AI's move (including
//! its own eviction) and the best score wins.

use super::board::{CENTER, CORNERS, Cells, Mark, MoveHistory, WIN_LINES, empty_cells, winning_line};
use crate::consts::tictactoe::MARK_CAP;

const WIN: i32 = 1000;
const BLOCK: i32 = 50;
const OWN_PAIR: i32 = 30;
const OWN_SINGLE: i32 = 5;
const CENTER_BONUS: i32 = 15;
const CORNER_BONUS: i32 = 8;
const SACRIFICE_PENALTY: i32 = 20;

/// Pick a move for `ai`, or `None` if no cell is empty.
///
/// Ties go to the lowest index.
pub fn best_move(cells: &Cells, history: &MoveHistory, ai: Mark) -> Option<usize> {
    let mut best: Option<(usize, i32)> = None;

    for index in empty_cells(cells) {
        let score = score_move(cells, history, ai, index);
        if best.is_none_or(|(_, best_score)| score > best_score) {
            best = Some((index, score));
        }
    }

    if let Some((index, score)) = best {
        log::debug!("heuristic picked {} (score {})", index, score);
    }
    best.map(|(index, _)| index)
}

/// Score placing `ai` at the empty cell `index`
pub fn score_move(cells: &Cells, history: &MoveHistory, ai: Mark, index: usize) -> i32 {
    let opponent = ai.opponent();
    let evicted = if history.get(ai).len() >= MARK_CAP {
        history.get(ai).first().copied()
    } else {
        None
    };

    let mut before = *cells;
    if let Some(oldest) = evicted {
        before[oldest] = None;
    }
    let mut sim = before;
    sim[index] = Some(ai);

    if winning_line(&sim, ai).is_some() {
        return WIN;
    }

    let mut score = 0;
    for line in WIN_LINES {
        // Our mark fills the last gap of an opponent pair
        if line.contains(&index)
            && count(&before, &line, Some(opponent)) == 2
            && count(&before, &line, None) == 1
        {
            score += BLOCK;
        }

        let own = count(&sim, &line, Some(ai));
        let empty = count(&sim, &line, None);
        if own == 2 && empty >= 1 {
            score += OWN_PAIR;
        }
        if own == 1 && empty >= 2 {
            score += OWN_SINGLE;
        }
    }

    if index == CENTER {
        score += CENTER_BONUS;
    }
    if CORNERS.contains(&index) {
        score += CORNER_BONUS;
    }

    // Losing the oldest mark can break a line we were building
    if let Some(oldest) = evicted {
        for line in WIN_LINES.iter().filter(|line| line.contains(&oldest)) {
            if count(cells, line, Some(ai)) >= 2 {
                score -= SACRIFICE_PENALTY;
            }
        }
    }

    score
}

fn count(cells: &Cells, line: &[usize; 3], value: Option<Mark>) -> usize {
    line.iter().filter(|&&i| cells[i] == value).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Variant;
    use crate::tictactoe::board::Board;
    use proptest::prelude::*;

    fn board_after(moves: &[usize]) -> Board {
        let mut board = Board::new(Variant::Infinite);
        for &i in moves {
            let side = board.turn();
            board.apply_move(i, side).unwrap();
        }
        board
    }

    #[test]
    fn test_opens_in_the_center() {
        let board = Board::new(Variant::Infinite);
        let history = board.history();
        // O moving on an empty board: center beats corners
        assert_eq!(best_move(board.cells(), history, Mark::O), Some(4));
    }

    #[test]
    fn test_takes_immediate_win() {
        // X: 0, 1 ; O: 3, 4 ; X: 8 -> O can finish 3-4-5
        let board = board_after(&[0, 3, 1, 4, 8]);
        assert_eq!(board.turn(), Mark::O);
        let choice = best_move(board.cells(), board.history(), Mark::O);
        assert_eq!(choice, Some(5));
        assert_eq!(score_move(board.cells(), board.history(), Mark::O, 5), WIN);
    }

    #[test]
    fn test_blocks_open_pair() {
        // X: 0, 1 threaten 2 ; O: 4
        let board = board_after(&[0, 4, 1]);
        let choice = best_move(board.cells(), board.history(), Mark::O);
        assert_eq!(choice, Some(2));
    }

    #[test]
    fn test_win_accounts_for_own_eviction() {
        // O holds 3, 4, 6 (oldest 3). Playing 5 evicts 3, so it is not a win.
        let board = board_after(&[0, 3, 1, 4, 8, 6, 2]);
        assert!(!board.is_over());
        assert_eq!(board.turn(), Mark::O);
        assert_ne!(score_move(board.cells(), board.history(), Mark::O, 5), WIN);
    }

    #[test]
    fn test_penalizes_sacrificing_a_pair() {
        let mut history = MoveHistory::default();
        let mut cells: Cells = [None; 9];
        for (mark, index) in [
            (Mark::O, 0),
            (Mark::X, 3),
            (Mark::O, 1),
            (Mark::X, 5),
            (Mark::O, 8),
            (Mark::X, 7),
        ] {
            history.push(mark, index);
            cells[index] = Some(mark);
        }

        // Evicting 0 breaks 0-1-2 and 0-4-8, both holding two O marks.
        // Remaining: 0-1-2, 0-4-8 and 2-4-6 keep one O with two gaps (+15),
        // 6 is a corner (+8), two sacrificed pairs (-40).
        assert_eq!(score_move(&cells, &history, Mark::O, 6), -17);
    }

    #[test]
    fn test_block_bonus_only_for_the_gap() {
        // X pair on 3-4 with 5 open; O has a single mark at 0
        let mut history = MoveHistory::default();
        let mut cells: Cells = [None; 9];
        for (mark, index) in [(Mark::X, 3), (Mark::O, 0), (Mark::X, 4)] {
            history.push(mark, index);
            cells[index] = Some(mark);
        }
        let block = score_move(&cells, &history, Mark::O, 5);
        let elsewhere = score_move(&cells, &history, Mark::O, 7);
        assert!(block >= BLOCK);
        assert!(block > elsewhere);
        assert_eq!(best_move(&cells, &history, Mark::O), Some(5));
    }

    proptest! {
        #[test]
        fn prop_always_picks_an_empty_cell(choices in prop::collection::vec(0usize..9, 0..30)) {
            let mut board = Board::new(Variant::Infinite);
            for choice in choices {
                if board.is_over() {
                    break;
                }
                let empty = empty_cells(board.cells());
                let index = empty[choice % empty.len()];
                let side = board.turn();
                board.apply_move(index, side).unwrap();
            }
            if !board.is_over() {
                let ai = board.turn();
                let pick = best_move(board.cells(), board.history(), ai);
                let pick = pick.expect("infinite board always has an empty cell");
                prop_assert!(board.is_empty_cell(pick));
                prop_assert!(board.clone().apply_move(pick, ai).is_ok());
            }
        }
    }
}
