use crate::{SessionRng, log_debug, log_warn};
use super::board::{apply_move, empty_board};
use super::bot_controller::{BotInput, MoveScore, calculate_move, score_moves};
use super::error::{EngineError, InvalidMove};
use super::types::{Board, CellIndex, Difficulty, GameMode, GameStatus, Mover, Player, WinningLine};
use super::win_detector::{check_win_with_line, evaluate};

/// In computer mode the human plays X and moves first.
pub const COMPUTER_PLAYER: Player = Player::O;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TurnState {
    pub current_player: Player,
    pub is_over: bool,
}

impl TurnState {
    fn new() -> Self {
        Self {
            current_player: Player::X,
            is_over: false,
        }
    }
}

pub fn reset() -> (Board, TurnState) {
    (empty_board(), TurnState::new())
}

/// What the presentation layer needs after every state change.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MoveOutcome {
    pub board: Board,
    pub status: GameStatus,
    pub current_player: Player,
    /// `None` once the game is over.
    pub next_mover: Option<Mover>,
    pub last_move: Option<CellIndex>,
    pub winning_line: Option<WinningLine>,
    pub generation: u64,
}

/// One game instance. Every reset starts a new generation.
#[derive(Debug, Clone)]
pub struct GameHandle {
    mode: GameMode,
    difficulty: Option<Difficulty>,
    board: Board,
    turn: TurnState,
    last_move: Option<CellIndex>,
    generation: u64,
}

impl GameHandle {
    pub fn new(mode: GameMode, difficulty: Option<Difficulty>) -> Self {
        let difficulty = match mode {
            GameMode::Human => None,
            GameMode::Computer => Some(difficulty.unwrap_or(Difficulty::Easy)),
        };
        let (board, turn) = reset();

        Self {
            mode,
            difficulty,
            board,
            turn,
            last_move: None,
            generation: 0,
        }
    }

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    pub fn difficulty(&self) -> Option<Difficulty> {
        self.difficulty
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn turn(&self) -> TurnState {
        self.turn
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn status(&self) -> GameStatus {
        evaluate(&self.board)
    }

    pub fn next_mover(&self) -> Option<Mover> {
        if self.turn.is_over {
            return None;
        }
        Some(self.mover_for(self.turn.current_player))
    }

    fn mover_for(&self, player: Player) -> Mover {
        match self.mode {
            GameMode::Computer if player == COMPUTER_PLAYER => Mover::Computer,
            _ => Mover::Human,
        }
    }

    pub fn outcome(&self) -> MoveOutcome {
        MoveOutcome {
            board: self.board,
            status: self.status(),
            current_player: self.turn.current_player,
            next_mover: self.next_mover(),
            last_move: self.last_move,
            winning_line: check_win_with_line(&self.board),
            generation: self.generation,
        }
    }

    /// A human's move. Rejections leave the game untouched.
    pub fn submit_move(&mut self, index: CellIndex) -> Result<MoveOutcome, InvalidMove> {
        if self.turn.is_over {
            return Err(InvalidMove::GameOver);
        }

        if self.next_mover() == Some(Mover::Computer) {
            return Err(InvalidMove::NotYourTurn);
        }

        self.place_mark(index)
    }

    pub fn request_computer_move(&mut self, rng: &mut SessionRng) -> Result<MoveOutcome, EngineError> {
        self.request_computer_move_for(self.generation, rng)
    }

    /// Same as [`Self::request_computer_move`], but refuses to act on a game that was reset
    /// after `generation` was observed.
    pub fn request_computer_move_for(
        &mut self,
        generation: u64,
        rng: &mut SessionRng,
    ) -> Result<MoveOutcome, EngineError> {
        let input = self.bot_input_for(generation)?;
        let index = calculate_move(input, rng)?;
        self.apply_computer_move_for(generation, index)
    }

    pub fn bot_input_for(&self, generation: u64) -> Result<BotInput, EngineError> {
        let difficulty = self.check_computer_turn(generation)?;
        Ok(BotInput {
            board: self.board,
            player: self.turn.current_player,
            difficulty,
        })
    }

    pub fn apply_computer_move_for(
        &mut self,
        generation: u64,
        index: CellIndex,
    ) -> Result<MoveOutcome, EngineError> {
        self.check_computer_turn(generation)?;
        Ok(self.place_mark(index)?)
    }

    fn check_computer_turn(&self, generation: u64) -> Result<Difficulty, EngineError> {
        if generation != self.generation {
            return Err(EngineError::StaleGeneration {
                scheduled: generation,
                current: self.generation,
            });
        }

        let Some(difficulty) = self.difficulty else {
            log_warn!("Computer move requested in a human-vs-human game");
            return Err(EngineError::NotComputerTurn);
        };

        if self.turn.is_over {
            log_warn!("Computer move requested after the game ended");
            return Err(EngineError::NoLegalMove);
        }

        if self.next_mover() != Some(Mover::Computer) {
            log_warn!("Computer move requested on {}'s turn", self.turn.current_player);
            return Err(EngineError::NotComputerTurn);
        }

        Ok(difficulty)
    }

    fn place_mark(&mut self, index: CellIndex) -> Result<MoveOutcome, InvalidMove> {
        let player = self.turn.current_player;
        self.board = apply_move(&self.board, index, player)?;
        self.last_move = Some(index);

        if evaluate(&self.board).is_terminal() {
            self.turn.is_over = true;
        } else {
            self.turn.current_player = player.opponent();
        }

        log_debug!("[game:{}] {} took cell {}", self.generation, player, index);
        Ok(self.outcome())
    }

    pub fn reset(&mut self) -> MoveOutcome {
        let (board, turn) = reset();
        self.board = board;
        self.turn = turn;
        self.last_move = None;
        self.generation = self.generation.wrapping_add(1);
        self.outcome()
    }

    /// Minimax scores for the player to move; empty once the game is over.
    pub fn move_evaluations(&self) -> Vec<MoveScore> {
        if self.turn.is_over {
            return Vec::new();
        }
        score_moves(&self.board, self.turn.current_player)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tictactoe::types::Mark;

    fn play(handle: &mut GameHandle, moves: &[CellIndex]) {
        for &index in moves {
            handle.submit_move(index).unwrap();
        }
    }

    #[test]
    fn test_new_game_starts_with_x() {
        let handle = GameHandle::new(GameMode::Human, None);
        let outcome = handle.outcome();
        assert_eq!(outcome.board, empty_board());
        assert_eq!(outcome.status, GameStatus::InProgress);
        assert_eq!(outcome.current_player, Player::X);
        assert_eq!(outcome.next_mover, Some(Mover::Human));
        assert_eq!(handle.difficulty(), None);
    }

    #[test]
    fn test_computer_mode_defaults_to_easy() {
        let handle = GameHandle::new(GameMode::Computer, None);
        assert_eq!(handle.difficulty(), Some(Difficulty::Easy));
    }

    #[test]
    fn test_human_mode_alternates_players() {
        let mut handle = GameHandle::new(GameMode::Human, None);
        let first = handle.submit_move(4).unwrap();
        assert_eq!(first.board[4], Mark::X);
        assert_eq!(first.current_player, Player::O);
        let second = handle.submit_move(0).unwrap();
        assert_eq!(second.board[0], Mark::O);
        assert_eq!(second.current_player, Player::X);
        assert_eq!(second.last_move, Some(0));
    }

    #[test]
    fn test_occupied_cell_leaves_state_unchanged() {
        let mut handle = GameHandle::new(GameMode::Human, None);
        handle.submit_move(4).unwrap();
        let before = handle.outcome();
        assert_eq!(handle.submit_move(4), Err(InvalidMove::Occupied(4)));
        assert_eq!(handle.outcome(), before);
    }

    #[test]
    fn test_out_of_range_rejected() {
        let mut handle = GameHandle::new(GameMode::Human, None);
        assert_eq!(handle.submit_move(9), Err(InvalidMove::OutOfRange(9)));
    }

    #[test]
    fn test_win_ends_game() {
        let mut handle = GameHandle::new(GameMode::Human, None);
        play(&mut handle, &[0, 3, 1, 4]);
        let outcome = handle.submit_move(2).unwrap();
        assert_eq!(outcome.status, GameStatus::Won(Player::X));
        assert_eq!(outcome.next_mover, None);
        assert_eq!(outcome.winning_line, Some(WinningLine::new(Player::X, [0, 1, 2])));
        assert!(handle.turn().is_over);
        assert_eq!(handle.submit_move(8), Err(InvalidMove::GameOver));
        assert!(handle.move_evaluations().is_empty());
    }

    #[test]
    fn test_draw_ends_game() {
        let mut handle = GameHandle::new(GameMode::Human, None);
        play(&mut handle, &[0, 1, 2, 4, 3, 5, 7, 6]);
        let outcome = handle.submit_move(8).unwrap();
        assert_eq!(outcome.status, GameStatus::Draw);
        assert_eq!(outcome.next_mover, None);
        assert_eq!(outcome.winning_line, None);
    }

    #[test]
    fn test_reset_clears_board_and_bumps_generation() {
        let mut handle = GameHandle::new(GameMode::Computer, Some(Difficulty::Hard));
        handle.submit_move(0).unwrap();
        let outcome = handle.reset();
        assert_eq!(outcome.board, empty_board());
        assert_eq!(outcome.current_player, Player::X);
        assert_eq!(outcome.status, GameStatus::InProgress);
        assert_eq!(outcome.last_move, None);
        assert_eq!(outcome.generation, 1);
        assert!(!handle.turn().is_over);
    }

    #[test]
    fn test_computer_answers_after_human() {
        let mut handle = GameHandle::new(GameMode::Computer, Some(Difficulty::Hard));
        let after_human = handle.submit_move(0).unwrap();
        assert_eq!(after_human.next_mover, Some(Mover::Computer));

        let mut rng = SessionRng::new(0);
        let after_computer = handle.request_computer_move(&mut rng).unwrap();
        assert_eq!(after_computer.board[4], Mark::O);
        assert_eq!(after_computer.last_move, Some(4));
        assert_eq!(after_computer.next_mover, Some(Mover::Human));
    }

    #[test]
    fn test_human_cannot_move_on_computer_turn() {
        let mut handle = GameHandle::new(GameMode::Computer, Some(Difficulty::Medium));
        handle.submit_move(0).unwrap();
        assert_eq!(handle.submit_move(1), Err(InvalidMove::NotYourTurn));
    }

    #[test]
    fn test_computer_move_refused_on_human_turn() {
        let mut handle = GameHandle::new(GameMode::Computer, Some(Difficulty::Easy));
        let mut rng = SessionRng::new(0);
        assert_eq!(handle.request_computer_move(&mut rng), Err(EngineError::NotComputerTurn));
    }

    #[test]
    fn test_computer_move_refused_in_human_mode() {
        let mut handle = GameHandle::new(GameMode::Human, Some(Difficulty::Hard));
        handle.submit_move(0).unwrap();
        let mut rng = SessionRng::new(0);
        assert_eq!(handle.request_computer_move(&mut rng), Err(EngineError::NotComputerTurn));
    }

    #[test]
    fn test_stale_generation_is_refused() {
        let mut handle = GameHandle::new(GameMode::Computer, Some(Difficulty::Hard));
        handle.submit_move(0).unwrap();
        let scheduled = handle.generation();
        handle.reset();
        handle.submit_move(8).unwrap();

        let mut rng = SessionRng::new(0);
        let result = handle.request_computer_move_for(scheduled, &mut rng);
        assert_eq!(
            result,
            Err(EngineError::StaleGeneration { scheduled: 0, current: 1 })
        );
        assert_eq!(handle.board().iter().filter(|&&m| m != Mark::Empty).count(), 1);
    }

    #[test]
    fn test_move_computed_before_reset_is_not_applied() {
        let mut handle = GameHandle::new(GameMode::Computer, Some(Difficulty::Hard));
        handle.submit_move(4).unwrap();
        let scheduled = handle.generation();
        let input = handle.bot_input_for(scheduled).unwrap();

        let mut rng = SessionRng::new(0);
        let index = calculate_move(input, &mut rng).unwrap();
        handle.reset();

        assert_eq!(
            handle.apply_computer_move_for(scheduled, index),
            Err(EngineError::StaleGeneration { scheduled: 0, current: 1 })
        );
        assert_eq!(*handle.board(), empty_board());
        assert_eq!(handle.outcome().current_player, Player::X);
    }

    #[test]
    fn test_hard_game_never_lost_by_computer() {
        let mut rng = SessionRng::new(11);
        for seed in 0..20u64 {
            let mut human_rng = SessionRng::new(seed);
            let mut handle = GameHandle::new(GameMode::Computer, Some(Difficulty::Hard));
            loop {
                let moves = crate::tictactoe::board::get_available_moves(handle.board());
                let index = human_rng.choose(&moves).unwrap();
                let outcome = handle.submit_move(index).unwrap();
                if outcome.next_mover.is_none() {
                    break;
                }
                let outcome = handle.request_computer_move(&mut rng).unwrap();
                if outcome.next_mover.is_none() {
                    break;
                }
            }
            assert_ne!(handle.status(), GameStatus::Won(Player::X));
        }
    }

    #[test]
    fn test_move_evaluations_for_player_to_move() {
        let mut handle = GameHandle::new(GameMode::Human, None);
        play(&mut handle, &[0]);
        let evaluations = handle.move_evaluations();
        assert_eq!(evaluations.len(), 8);
        let best = evaluations.iter().max_by_key(|s| s.score).unwrap();
        assert_eq!(best.score, 0);
        assert!(evaluations.iter().any(|s| s.index == 4 && s.score == 0));
    }
}
