use super::board::{WIN_PATTERNS, is_full};
use super::types::{Board, GameStatus, Mark, Player, WinningLine};

/// Pure function of the board; never consults turn order.
pub fn evaluate(board: &Board) -> GameStatus {
    if let Some(winner) = check_win(board) {
        return GameStatus::Won(winner);
    }

    if is_full(board) {
        GameStatus::Draw
    } else {
        GameStatus::InProgress
    }
}

pub fn check_win(board: &Board) -> Option<Player> {
    check_win_with_line(board).map(|line| line.player)
}

/// First completed pattern in declaration order.
pub fn check_win_with_line(board: &Board) -> Option<WinningLine> {
    WIN_PATTERNS.iter().find_map(|&[a, b, c]| {
        let mark = board[a];
        if mark != Mark::Empty && mark == board[b] && mark == board[c] {
            mark.player().map(|player| WinningLine::new(player, [a, b, c]))
        } else {
            None
        }
    })
}
