use super::error::InvalidMove;
use super::types::{BOARD_SIZE, Board, CellIndex, Mark, Player};
use super::win_detector::evaluate;

/// Rows, then columns, then both diagonals.
pub const WIN_PATTERNS: [[CellIndex; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];

pub fn empty_board() -> Board {
    [Mark::Empty; BOARD_SIZE]
}

pub fn get_available_moves(board: &Board) -> Vec<CellIndex> {
    board
        .iter()
        .enumerate()
        .filter(|(_, cell)| **cell == Mark::Empty)
        .map(|(index, _)| index)
        .collect()
}

pub fn is_valid_move(board: &Board, index: CellIndex) -> bool {
    index < BOARD_SIZE && board[index] == Mark::Empty
}

pub fn is_full(board: &Board) -> bool {
    board.iter().all(|&cell| cell != Mark::Empty)
}

/// Returns a copy of `board` with `index` taken by `player`; `board` itself is untouched.
pub fn apply_move(board: &Board, index: CellIndex, player: Player) -> Result<Board, InvalidMove> {
    if evaluate(board).is_terminal() {
        return Err(InvalidMove::GameOver);
    }

    if !is_valid_move(board, index) {
        return Err(if index >= BOARD_SIZE {
            InvalidMove::OutOfRange(index)
        } else {
            InvalidMove::Occupied(index)
        });
    }

    let mut next = *board;
    next[index] = player.mark();
    Ok(next)
}

#[cfg(test)]
pub(crate) fn board_from_str(layout: &str) -> Board {
    let mut board = empty_board();
    let cells: Vec<char> = layout.chars().filter(|c| !c.is_whitespace()).collect();
    assert_eq!(cells.len(), BOARD_SIZE, "layout must describe 9 cells");
    for (index, c) in cells.into_iter().enumerate() {
        board[index] = match c {
            'X' => Mark::X,
            'O' => Mark::O,
            _ => Mark::Empty,
        };
    }
    board
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tictactoe::types::GameStatus;

    #[test]
    fn test_empty_board_has_all_moves() {
        assert_eq!(get_available_moves(&empty_board()), (0..9).collect::<Vec<_>>());
    }

    #[test]
    fn test_available_moves_ascending() {
        let board = board_from_str("X.O ... O.X");
        assert_eq!(get_available_moves(&board), vec![1, 3, 4, 5, 7]);
    }

    #[test]
    fn test_apply_move_sets_exactly_one_cell() {
        let board = empty_board();
        let next = apply_move(&board, 4, Player::X).unwrap();
        assert_eq!(next[4], Mark::X);
        let changed = board.iter().zip(next.iter()).filter(|(a, b)| a != b).count();
        assert_eq!(changed, 1);
        assert_eq!(board, empty_board());
    }

    #[test]
    fn test_apply_same_move_twice_fails() {
        let board = apply_move(&empty_board(), 0, Player::X).unwrap();
        assert_eq!(apply_move(&board, 0, Player::X), Err(InvalidMove::Occupied(0)));
    }

    #[test]
    fn test_apply_move_out_of_range() {
        assert_eq!(apply_move(&empty_board(), 9, Player::O), Err(InvalidMove::OutOfRange(9)));
    }

    #[test]
    fn test_apply_move_after_win_fails() {
        let board = board_from_str("XXX OO. ...");
        assert_eq!(evaluate(&board), GameStatus::Won(Player::X));
        assert_eq!(apply_move(&board, 5, Player::O), Err(InvalidMove::GameOver));
    }

    #[test]
    fn test_is_valid_move() {
        let board = board_from_str("X.. ... ...");
        assert!(!is_valid_move(&board, 0));
        assert!(is_valid_move(&board, 1));
        assert!(!is_valid_move(&board, 12));
    }

    #[test]
    fn test_apply_move_accepts_exactly_valid_moves() {
        let board = board_from_str("X.O .X. O..");
        for index in 0..=BOARD_SIZE {
            assert_eq!(apply_move(&board, index, Player::O).is_ok(), is_valid_move(&board, index));
        }
    }

    #[test]
    fn test_is_full() {
        assert!(!is_full(&empty_board()));
        assert!(is_full(&board_from_str("XOX XOO OXX")));
    }
}
