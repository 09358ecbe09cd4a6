use crate::{SessionRng, log_debug};
use super::board::get_available_moves;
use super::error::EngineError;
use super::types::{Board, CellIndex, Difficulty, GameStatus, Mark, Player};
use super::win_detector::{check_win, evaluate};

const WIN_SCORE: i32 = 10;

pub struct BotInput {
    pub board: Board,
    pub player: Player,
    pub difficulty: Difficulty,
}

/// Minimax value of playing `index` for the player to move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveScore {
    pub index: CellIndex,
    pub score: i32,
}

pub fn calculate_move(input: BotInput, rng: &mut SessionRng) -> Result<CellIndex, EngineError> {
    decide_move(&input.board, input.player, input.difficulty, rng)
}

/// Picks a cell for `player`. The caller's board is never modified.
pub fn decide_move(
    board: &Board,
    player: Player,
    difficulty: Difficulty,
    rng: &mut SessionRng,
) -> Result<CellIndex, EngineError> {
    let available_moves = playable_moves(board)?;

    let index = match difficulty {
        Difficulty::Easy => calculate_random_move(&available_moves, rng)?,
        Difficulty::Medium => calculate_medium_move(board, player, &available_moves, rng)?,
        Difficulty::Hard => calculate_minimax_move(board, player)?,
    };

    log_debug!("{} bot picked cell {} for {}", difficulty, index, player);
    Ok(index)
}

fn playable_moves(board: &Board) -> Result<Vec<CellIndex>, EngineError> {
    if evaluate(board) != GameStatus::InProgress {
        return Err(EngineError::NoLegalMove);
    }
    let moves = get_available_moves(board);
    if moves.is_empty() {
        return Err(EngineError::NoLegalMove);
    }
    Ok(moves)
}

fn calculate_random_move(moves: &[CellIndex], rng: &mut SessionRng) -> Result<CellIndex, EngineError> {
    rng.choose(moves).ok_or(EngineError::NoLegalMove)
}

fn calculate_medium_move(
    board: &Board,
    player: Player,
    moves: &[CellIndex],
    rng: &mut SessionRng,
) -> Result<CellIndex, EngineError> {
    let mut scratch = *board;

    if let Some(index) = find_winning_move(&mut scratch, player, moves) {
        return Ok(index);
    }

    if let Some(index) = find_winning_move(&mut scratch, player.opponent(), moves) {
        return Ok(index);
    }

    calculate_random_move(moves, rng)
}

/// First cell, in ascending order, that would complete a line for `player`.
fn find_winning_move(scratch: &mut Board, player: Player, moves: &[CellIndex]) -> Option<CellIndex> {
    for &index in moves {
        scratch[index] = player.mark();
        let winner = check_win(scratch);
        scratch[index] = Mark::Empty;

        if winner == Some(player) {
            return Some(index);
        }
    }
    None
}

pub fn calculate_minimax_move(board: &Board, player: Player) -> Result<CellIndex, EngineError> {
    playable_moves(board)?;

    let mut best: Option<MoveScore> = None;
    for candidate in score_moves(board, player) {
        if best.is_none_or(|b| candidate.score > b.score) {
            best = Some(candidate);
        }
    }

    best.map(|b| b.index).ok_or(EngineError::NoLegalMove)
}

/// Full-depth minimax score of every empty cell, ascending by index.
/// Empty when the board is already terminal.
pub fn score_moves(board: &Board, player: Player) -> Vec<MoveScore> {
    if evaluate(board) != GameStatus::InProgress {
        return Vec::new();
    }

    let mut scratch = *board;
    let mut scores = Vec::new();

    for index in get_available_moves(board) {
        scratch[index] = player.mark();
        let score = minimax(&mut scratch, 1, false, player);
        scratch[index] = Mark::Empty;

        scores.push(MoveScore { index, score });
    }

    scores
}

/// `depth` counts plies placed since the search root.
fn minimax(scratch: &mut Board, depth: i32, is_maximizing: bool, bot: Player) -> i32 {
    match evaluate(scratch) {
        GameStatus::Won(winner) if winner == bot => return WIN_SCORE - depth,
        GameStatus::Won(_) => return depth - WIN_SCORE,
        GameStatus::Draw => return 0,
        GameStatus::InProgress => {}
    }

    let mover = if is_maximizing { bot } else { bot.opponent() };
    let mut best = if is_maximizing { i32::MIN } else { i32::MAX };

    for index in 0..scratch.len() {
        if scratch[index] != Mark::Empty {
            continue;
        }

        scratch[index] = mover.mark();
        let eval = minimax(scratch, depth + 1, !is_maximizing, bot);
        scratch[index] = Mark::Empty;

        best = if is_maximizing { best.max(eval) } else { best.min(eval) };
    }

    best
}
