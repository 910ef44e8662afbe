//! Exhaustive optimal play for the classic variant
//!
//! Scores are from the AI's point of view: `10 - depth` for an AI win,
//! `depth - 10` for a loss and 0 for a draw, where depth counts plies below
//! the candidate move. Only sound while cells never come back, so it must not
//! be used for the infinite variant.

use super::board::{Cells, Mark, empty_cells, is_full, winning_line};

/// Pick an optimal move for `ai`, or `None` if the board is full.
///
/// Ties go to the lowest index.
pub fn best_move(cells: &Cells, ai: Mark) -> Option<usize> {
    let mut board = *cells;
    let mut best: Option<(usize, i32)> = None;

    for index in empty_cells(&board) {
        board[index] = Some(ai);
        let score = minimax(&mut board, ai, 0, false);
        board[index] = None;

        if best.is_none_or(|(_, best_score)| score > best_score) {
            best = Some((index, score));
        }
    }

    if let Some((index, score)) = best {
        log::debug!("minimax picked {} (score {})", index, score);
    }
    best.map(|(index, _)| index)
}

fn minimax(board: &mut Cells, ai: Mark, depth: i32, maximizing: bool) -> i32 {
    if winning_line(board, ai).is_some() {
        return 10 - depth;
    }
    if winning_line(board, ai.opponent()).is_some() {
        return depth - 10;
    }
    if is_full(board) {
        return 0;
    }

    let mover = if maximizing { ai } else { ai.opponent() };
    let mut best = if maximizing { i32::MIN } else { i32::MAX };

    for index in empty_cells(board) {
        board[index] = Some(mover);
        let score = minimax(board, ai, depth + 1, !maximizing);
        board[index] = None;

        best = if maximizing {
            best.max(score)
        } else {
            best.min(score)
        };
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Variant;
    use crate::tictactoe::board::{Board, Outcome};
    use std::collections::HashMap;

    const X: Option<Mark> = Some(Mark::X);
    const O: Option<Mark> = Some(Mark::O);
    const E: Option<Mark> = None;

    #[test]
    fn test_takes_the_win_over_the_block() {
        let cells = [X, X, E, O, O, E, E, E, E];
        assert_eq!(best_move(&cells, Mark::O), Some(5));
    }

    #[test]
    fn test_blocks_when_it_cannot_win() {
        let cells = [X, X, E, E, O, E, E, E, E];
        assert_eq!(best_move(&cells, Mark::O), Some(2));
    }

    #[test]
    fn test_full_board_has_no_move() {
        let cells = [X, O, X, X, O, O, O, X, X];
        assert_eq!(best_move(&cells, Mark::O), None);
    }

    #[test]
    fn test_answers_corner_opening_with_center() {
        let cells = [X, E, E, E, E, E, E, E, E];
        assert_eq!(best_move(&cells, Mark::O), Some(4));
    }

    /// Walk every opponent strategy against the solver and check it never loses
    fn explore(board: &Board, ai: Mark, cache: &mut HashMap<Cells, usize>) {
        match board.outcome() {
            Outcome::Won(win) => {
                assert_eq!(win.winner, ai, "solver lost: {:?}", board.cells());
                return;
            }
            Outcome::Draw => return,
            _ => {}
        }

        if board.turn() == ai {
            let index = *cache
                .entry(*board.cells())
                .or_insert_with(|| best_move(board.cells(), ai).expect("a move exists"));
            let mut next = board.clone();
            next.apply_move(index, ai).unwrap();
            explore(&next, ai, cache);
        } else {
            for index in empty_cells(board.cells()) {
                let mut next = board.clone();
                next.apply_move(index, ai.opponent()).unwrap();
                explore(&next, ai, cache);
            }
        }
    }

    #[test]
    fn test_never_loses_as_second_player() {
        let mut cache = HashMap::new();
        explore(&Board::new(Variant::Classic), Mark::O, &mut cache);
    }

    #[test]
    fn test_never_loses_as_first_player() {
        let mut cache = HashMap::new();
        explore(&Board::new(Variant::Classic), Mark::X, &mut cache);
    }
}
