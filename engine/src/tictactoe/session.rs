use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, mpsc};
use tokio::task::JoinHandle;

use crate::{SessionRng, log_debug, log_warn};
use super::bot_controller::{MoveScore, calculate_move};
use super::error::{EngineError, InvalidMove};
use super::game_state::{GameHandle, MoveOutcome};
use super::types::{CellIndex, Mover};

/// Result of a human move. `computer_reply` is set when the computer was scheduled to answer.
pub struct SubmittedMove {
    pub outcome: MoveOutcome,
    pub computer_reply: Option<JoinHandle<Option<MoveOutcome>>>,
}

/// Drives one [`GameHandle`] for a presentation layer: human moves are applied at once,
/// the computer's answer lands after `computer_move_delay`. Every state change is sent
/// on the outcome channel.
#[derive(Clone)]
pub struct TicTacToeSession {
    game: Arc<Mutex<GameHandle>>,
    rng: Arc<Mutex<SessionRng>>,
    computer_move_delay: Duration,
    outcome_tx: mpsc::UnboundedSender<MoveOutcome>,
}

impl TicTacToeSession {
    pub fn new(
        game: GameHandle,
        rng: SessionRng,
        computer_move_delay: Duration,
        outcome_tx: mpsc::UnboundedSender<MoveOutcome>,
    ) -> Self {
        Self {
            game: Arc::new(Mutex::new(game)),
            rng: Arc::new(Mutex::new(rng)),
            computer_move_delay,
            outcome_tx,
        }
    }

    pub async fn snapshot(&self) -> MoveOutcome {
        self.game.lock().await.outcome()
    }

    pub async fn submit_move(&self, index: CellIndex) -> Result<SubmittedMove, InvalidMove> {
        let outcome = {
            let mut game = self.game.lock().await;
            let outcome = game.submit_move(index)?;
            self.publish(outcome.clone());
            outcome
        };

        let computer_reply = if outcome.next_mover == Some(Mover::Computer) {
            Some(self.schedule_computer_move(outcome.generation))
        } else {
            None
        };

        Ok(SubmittedMove {
            outcome,
            computer_reply,
        })
    }

    /// One-shot deferred computer move bound to `generation`. If the game was reset
    /// before it fires, it does nothing.
    pub fn schedule_computer_move(&self, generation: u64) -> JoinHandle<Option<MoveOutcome>> {
        let session = self.clone();
        tokio::spawn(async move {
            tokio::time::sleep(session.computer_move_delay).await;
            session.play_computer_turn(generation).await
        })
    }

    async fn play_computer_turn(&self, generation: u64) -> Option<MoveOutcome> {
        let bot_input = match self.game.lock().await.bot_input_for(generation) {
            Ok(input) => input,
            Err(e) => {
                self.discard(generation, &e);
                return None;
            }
        };

        let rng = self.rng.clone();
        let calculated_move = tokio::task::spawn_blocking(move || {
            let mut rng = rng.blocking_lock();
            calculate_move(bot_input, &mut rng)
        })
        .await;

        let index = match calculated_move {
            Ok(Ok(index)) => index,
            Ok(Err(e)) => {
                self.discard(generation, &e);
                return None;
            }
            Err(e) => {
                log_warn!("[game:{}] Computer move task failed: {}", generation, e);
                return None;
            }
        };

        // the game may have been reset while the move was being calculated
        let mut game = self.game.lock().await;
        match game.apply_computer_move_for(generation, index) {
            Ok(outcome) => {
                self.publish(outcome.clone());
                Some(outcome)
            }
            Err(e) => {
                self.discard(generation, &e);
                None
            }
        }
    }

    fn discard(&self, generation: u64, error: &EngineError) {
        match error {
            EngineError::StaleGeneration { .. } => {
                log_debug!("[game:{}] Discarding computer move: {}", generation, error);
            }
            _ => {
                log_warn!("[game:{}] Computer move failed: {}", generation, error);
            }
        }
    }

    pub async fn reset(&self) -> MoveOutcome {
        let mut game = self.game.lock().await;
        let outcome = game.reset();
        log_debug!("[game:{}] New game", outcome.generation);
        self.publish(outcome.clone());
        outcome
    }

    pub async fn move_evaluations(&self) -> Vec<MoveScore> {
        let game = self.game.lock().await.clone();
        match tokio::task::spawn_blocking(move || game.move_evaluations()).await {
            Ok(scores) => scores,
            Err(e) => {
                log_warn!("Move evaluation task failed: {}", e);
                Vec::new()
            }
        }
    }

    /// Callers hold the game lock, so outcomes reach the channel in the order they were applied.
    fn publish(&self, outcome: MoveOutcome) {
        if self.outcome_tx.send(outcome).is_err() {
            log_debug!("Outcome receiver dropped");
        }
    }
}
