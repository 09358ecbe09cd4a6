mod board;
mod bot_controller;
mod error;
mod game_state;
mod session;
mod types;
mod win_detector;

pub use board::{WIN_PATTERNS, apply_move, empty_board, get_available_moves, is_full, is_valid_move};
pub use bot_controller::{BotInput, MoveScore, calculate_minimax_move, calculate_move, decide_move, score_moves};
pub use error::{EngineError, InvalidMove};
pub use game_state::{COMPUTER_PLAYER, GameHandle, MoveOutcome, TurnState, reset};
pub use session::{SubmittedMove, TicTacToeSession};
pub use types::{BOARD_SIZE, Board, CellIndex, Difficulty, GameMode, GameStatus, Mark, Mover, Player, WinningLine};
pub use win_detector::{check_win, check_win_with_line, evaluate};
