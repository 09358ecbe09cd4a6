use tictactoe_engine::tictactoe::{
    BOARD_SIZE, COMPUTER_PLAYER, Difficulty, GameMode, GameStatus, Mark, MoveOutcome, MoveScore, Mover,
};

pub const HELP: &str = "Enter a cell 0-8, 'h' for move evaluations, 'r' to restart, 'q' to quit.";

pub fn render_intro(mode: GameMode, difficulty: Difficulty) -> String {
    match mode {
        GameMode::Human => format!("Two players, X moves first. {}", HELP),
        GameMode::Computer => format!(
            "You are X against the {} computer. {}",
            difficulty, HELP
        ),
    }
}

/// Empty cells show their index; the winning line is bracketed.
pub fn render_board(outcome: &MoveOutcome) -> String {
    let winning_cells = outcome.winning_line.map(|line| line.cells);
    let mut rows = Vec::with_capacity(3);

    for row in 0..3 {
        let cells: Vec<String> = (0..3)
            .map(|col| {
                let index = row * 3 + col;
                let symbol = match outcome.board[index] {
                    Mark::Empty => char::from(b'0' + index as u8),
                    mark => mark.symbol(),
                };
                if winning_cells.is_some_and(|cells| cells.contains(&index)) {
                    format!("[{}]", symbol)
                } else {
                    format!(" {} ", symbol)
                }
            })
            .collect();
        rows.push(cells.join("|"));
    }

    rows.join("\n---+---+---\n")
}

pub fn render_status(outcome: &MoveOutcome, mode: GameMode) -> String {
    match outcome.status {
        GameStatus::Won(player) if mode == GameMode::Computer && player == COMPUTER_PLAYER => {
            "Computer wins!".to_string()
        }
        GameStatus::Won(player) => format!("{} wins!", player),
        GameStatus::Draw => "It's a draw!".to_string(),
        GameStatus::InProgress => match outcome.next_mover {
            Some(Mover::Computer) => "Computer is thinking...".to_string(),
            _ => format!("{} to move", outcome.current_player),
        },
    }
}

pub fn render_outcome(outcome: &MoveOutcome, mode: GameMode) -> String {
    format!("\n{}\n{}", render_board(outcome), render_status(outcome, mode))
}

pub fn render_evaluations(scores: &[MoveScore]) -> String {
    if scores.is_empty() {
        return "No moves left.".to_string();
    }

    let mut lines = Vec::with_capacity(BOARD_SIZE);
    for score in scores {
        let verdict = match score.score {
            s if s > 0 => "wins",
            0 => "draws",
            _ => "loses",
        };
        lines.push(format!("cell {}: {:+} ({})", score.index, score.score, verdict));
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tictactoe_engine::tictactoe::{GameHandle, Player};

    #[test]
    fn test_empty_board_shows_indices() {
        let outcome = GameHandle::new(GameMode::Human, None).outcome();
        assert_eq!(
            render_board(&outcome),
            " 0 | 1 | 2 \n---+---+---\n 3 | 4 | 5 \n---+---+---\n 6 | 7 | 8 "
        );
    }

    #[test]
    fn test_winning_line_is_bracketed() {
        let mut handle = GameHandle::new(GameMode::Human, None);
        for index in [0, 3, 1, 4, 2] {
            handle.submit_move(index).unwrap();
        }
        let outcome = handle.outcome();
        assert!(render_board(&outcome).starts_with("[X]|[X]|[X]"));
        assert_eq!(render_status(&outcome, GameMode::Human), "X wins!");
    }

    #[test]
    fn test_status_while_computer_thinks() {
        let mut handle = GameHandle::new(GameMode::Computer, Some(Difficulty::Easy));
        let outcome = handle.submit_move(4).unwrap();
        assert_eq!(render_status(&outcome, GameMode::Computer), "Computer is thinking...");
    }

    #[test]
    fn test_status_to_move() {
        let outcome = GameHandle::new(GameMode::Human, None).outcome();
        assert_eq!(outcome.current_player, Player::X);
        assert_eq!(render_status(&outcome, GameMode::Human), "X to move");
    }

    #[test]
    fn test_evaluations_verdicts() {
        let scores = [
            MoveScore { index: 2, score: 9 },
            MoveScore { index: 4, score: 0 },
            MoveScore { index: 5, score: -8 },
        ];
        assert_eq!(
            render_evaluations(&scores),
            "cell 2: +9 (wins)\ncell 4: +0 (draws)\ncell 5: -8 (loses)"
        );
        assert_eq!(render_evaluations(&[]), "No moves left.");
    }
}
