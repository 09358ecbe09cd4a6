use super::types::CellIndex;

/// Rejected move; the game state is left unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidMove {
    OutOfRange(CellIndex),
    Occupied(CellIndex),
    GameOver,
    NotYourTurn,
}

impl std::fmt::Display for InvalidMove {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InvalidMove::OutOfRange(index) => write!(f, "Cell {} is out of range 0-8", index),
            InvalidMove::Occupied(index) => write!(f, "Cell {} is already marked", index),
            InvalidMove::GameOver => write!(f, "Game is already over"),
            InvalidMove::NotYourTurn => write!(f, "Not your turn"),
        }
    }
}

impl std::error::Error for InvalidMove {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    InvalidMove(InvalidMove),
    NoLegalMove,
    InvalidDifficulty(String),
    InvalidMode(String),
    NotComputerTurn,
    StaleGeneration { scheduled: u64, current: u64 },
}

impl std::fmt::Display for EngineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EngineError::InvalidMove(e) => write!(f, "Invalid move: {}", e),
            EngineError::NoLegalMove => write!(f, "No legal move: board is full or already won"),
            EngineError::InvalidDifficulty(tag) => write!(f, "Invalid difficulty: {:?}", tag),
            EngineError::InvalidMode(tag) => write!(f, "Invalid game mode: {:?}", tag),
            EngineError::NotComputerTurn => write!(f, "It is not the computer's turn"),
            EngineError::StaleGeneration { scheduled, current } => write!(
                f,
                "Computer move scheduled for game {} but game {} is active",
                scheduled, current
            ),
        }
    }
}

impl std::error::Error for EngineError {}

impl From<InvalidMove> for EngineError {
    fn from(e: InvalidMove) -> Self {
        EngineError::InvalidMove(e)
    }
}
