//! Turn sequencing between the human and the AI.
//!
//! The controller owns the live [`Board`] and is only ever driven from one
//! (foreground) thread. AI turns are copied out to a [`SearchWorker`]; the
//! chosen column comes back over a channel and is applied by [`TurnController::poll`]
//! or [`TurnController::wait_for_ai`]. Every dispatched search carries the
//! generation it belongs to, and results from an older generation (a search
//! that was running when the game was reset) are dropped.

use std::io;
use std::sync::mpsc::{RecvTimeoutError, Sender, TryRecvError};
use std::time::{Duration, Instant};

use tracing::{debug, error, info, warn};

use crate::ai::{MoveSelector, SearchEngine, SearchJob, SearchResult, SearchWorker};
use crate::config::{validate_depth, AppConfig, SearchConfig};
use crate::error::TurnError;
use crate::game::{Board, GameOutcome, Player};

const HUMAN: Player = Player::One;
const AI: Player = Player::Two;

pub const START_MESSAGE: &str = "Game started! Your turn (Player 1).";
pub const THINKING_MESSAGE: &str = "AI is thinking...";
pub const YOUR_TURN_MESSAGE: &str = "Your turn (Player 1).";
pub const SEARCH_FAILED_MESSAGE: &str = "AI encountered an error. Resetting...";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnState {
    HumanToMove,
    AiSearching,
    GameOver(GameOutcome),
}

/// Receives every change the controller makes, in the order it makes them.
pub trait GameObserver {
    /// The live board changed; `board` is a read-only view of it.
    fn on_board_changed(&mut self, board: &Board);

    /// A human-readable status line.
    fn on_message(&mut self, text: &str);
}

/// Observer notifications as values, for frontends that drain a channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControllerEvent {
    BoardChanged(Board),
    Message(String),
}

impl GameObserver for Sender<ControllerEvent> {
    fn on_board_changed(&mut self, board: &Board) {
        // A dropped receiver means nobody is listening any more
        let _ = self.send(ControllerEvent::BoardChanged(*board));
    }

    fn on_message(&mut self, text: &str) {
        let _ = self.send(ControllerEvent::Message(text.to_string()));
    }
}

pub struct TurnController {
    board: Board,
    state: TurnState,
    search: SearchConfig,
    generation: u64,
    worker: SearchWorker,
    observer: Box<dyn GameObserver>,
    shut_down: bool,
}

impl TurnController {
    /// Controller playing the minimax [`SearchEngine`]. Starts a new game.
    pub fn new(observer: Box<dyn GameObserver>, config: &AppConfig) -> io::Result<Self> {
        Self::with_selector(observer, Box::new(SearchEngine::new()), config)
    }

    /// Controller whose AI moves come from `selector`. Starts a new game.
    pub fn with_selector(
        observer: Box<dyn GameObserver>,
        selector: Box<dyn MoveSelector>,
        config: &AppConfig,
    ) -> io::Result<Self> {
        let min_reply = Duration::from_millis(config.game.ai_move_delay_ms);
        let worker = SearchWorker::spawn(selector, min_reply)?;
        let mut controller = TurnController {
            board: Board::new(),
            state: TurnState::HumanToMove,
            search: config.search,
            generation: 0,
            worker,
            observer,
            shut_down: false,
        };
        controller.start_new_game();
        Ok(controller)
    }

    pub fn state(&self) -> TurnState {
        self.state
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Whose move it is, or `None` once the game is over.
    pub fn current_player(&self) -> Option<Player> {
        match self.state {
            TurnState::HumanToMove => Some(HUMAN),
            TurnState::AiSearching => Some(AI),
            TurnState::GameOver(_) => None,
        }
    }

    pub fn human(&self) -> Player {
        HUMAN
    }

    pub fn ai(&self) -> Player {
        AI
    }

    /// Configuration the next search will be dispatched with.
    pub fn search_config(&self) -> SearchConfig {
        self.search
    }

    pub fn is_shut_down(&self) -> bool {
        self.shut_down
    }

    /// Start over with an empty board. Any running search is abandoned.
    pub fn reset_game(&mut self) -> Result<(), TurnError> {
        if self.shut_down {
            return self.reject(TurnError::ShutDown);
        }
        self.start_new_game();
        Ok(())
    }

    /// Play the human's piece in `column`, then hand the turn to the AI.
    pub fn submit_human_move(&mut self, column: usize) -> Result<(), TurnError> {
        if self.shut_down {
            return self.reject(TurnError::ShutDown);
        }
        if self.state != TurnState::HumanToMove {
            return self.reject(TurnError::InvalidTurn);
        }
        if let Err(e) = self.board.apply_move(column, HUMAN) {
            return self.reject(e.into());
        }

        debug!(column, "human move");
        self.observer.on_board_changed(&self.board);
        if let Some(outcome) = GameOutcome::after_move(&self.board, HUMAN) {
            self.game_over(outcome);
        } else {
            self.state = TurnState::AiSearching;
            self.observer.on_message(THINKING_MESSAGE);
            self.dispatch_ai_turn();
        }
        Ok(())
    }

    /// Set the depth used by searches dispatched from now on.
    pub fn set_search_depth(&mut self, depth: u32) -> Result<(), TurnError> {
        if self.shut_down {
            return self.reject(TurnError::ShutDown);
        }
        if self.state == TurnState::AiSearching {
            return self.reject(TurnError::InvalidTurn);
        }
        if validate_depth(depth).is_err() {
            return self.reject(TurnError::InvalidDepth(depth));
        }

        self.search.depth = depth;
        info!(depth, "search depth changed");
        self.observer
            .on_message(&format!("AI difficulty set to depth {depth}."));
        Ok(())
    }

    /// Abandon any running search and stop accepting commands.
    pub fn shutdown(&mut self) {
        if self.shut_down {
            return;
        }
        self.shut_down = true;
        self.generation += 1;
        self.worker.shutdown();
        info!("controller shut down");
    }

    /// Apply any finished search without blocking. Returns `true` if an AI
    /// result was applied (or failed and reset the game).
    pub fn poll(&mut self) -> bool {
        let mut handled = false;
        while !self.shut_down {
            match self.worker.try_recv() {
                Ok(result) => handled |= self.handle_result(result),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    self.worker_lost();
                    handled = true;
                    break;
                }
            }
        }
        handled
    }

    /// Block for up to `timeout` until the AI's turn is over. Returns `false`
    /// if the search is still running when the time is up.
    pub fn wait_for_ai(&mut self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        while self.state == TurnState::AiSearching && !self.shut_down {
            let Some(remaining) = deadline.checked_duration_since(Instant::now()) else {
                return false;
            };
            match self.worker.recv_timeout(remaining) {
                Ok(result) => {
                    self.handle_result(result);
                }
                Err(RecvTimeoutError::Timeout) => return false,
                Err(RecvTimeoutError::Disconnected) => self.worker_lost(),
            }
        }
        self.state != TurnState::AiSearching
    }

    fn start_new_game(&mut self) {
        self.generation += 1;
        self.worker.set_generation(self.generation);
        self.board = Board::new();
        self.state = TurnState::HumanToMove;
        info!(generation = self.generation, "new game");
        self.observer.on_board_changed(&self.board);
        self.observer.on_message(START_MESSAGE);
    }

    fn dispatch_ai_turn(&mut self) {
        let job = SearchJob {
            generation: self.generation,
            board: self.board,
            ai: AI,
            config: self.search,
        };
        debug!(generation = job.generation, depth = job.config.depth, "dispatching search");
        if !self.worker.is_running() || !self.worker.submit(job) {
            self.worker_lost();
        }
    }

    fn handle_result(&mut self, result: SearchResult) -> bool {
        if result.generation != self.generation || self.state != TurnState::AiSearching {
            warn!(
                generation = result.generation,
                current = self.generation,
                "discarding stale search result"
            );
            return false;
        }
        debug!(elapsed_ms = result.elapsed.as_millis() as u64, "search result received");

        match result.outcome {
            Err(msg) => self.fail_safe(&msg),
            Ok(None) => match GameOutcome::after_move(&self.board, HUMAN) {
                Some(outcome) => self.game_over(outcome),
                None => self.fail_safe("no move returned while moves remain"),
            },
            Ok(Some(column)) => {
                if let Err(e) = self.board.apply_move(column, AI) {
                    self.fail_safe(&format!("AI chose an illegal move: {e}"));
                    return true;
                }
                debug!(column, "AI move");
                self.observer.on_board_changed(&self.board);
                if let Some(outcome) = GameOutcome::after_move(&self.board, AI) {
                    self.game_over(outcome);
                } else {
                    self.state = TurnState::HumanToMove;
                    self.observer.on_message(YOUR_TURN_MESSAGE);
                }
            }
        }
        true
    }

    fn game_over(&mut self, outcome: GameOutcome) {
        self.state = TurnState::GameOver(outcome);
        info!(?outcome, "game over");
        self.observer.on_message(&outcome_message(outcome));
    }

    /// Report a search defect and return to a fresh game.
    fn fail_safe(&mut self, reason: &str) {
        error!(reason, "AI turn failed");
        self.observer.on_message(SEARCH_FAILED_MESSAGE);
        self.start_new_game();
    }

    fn worker_lost(&mut self) {
        self.fail_safe("search worker is not running");
    }

    fn reject(&mut self, err: TurnError) -> Result<(), TurnError> {
        warn!(state = ?self.state, "rejected command: {err}");
        self.observer.on_message(&err.to_string());
        Err(err)
    }
}

impl Drop for TurnController {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn outcome_message(outcome: GameOutcome) -> String {
    match outcome {
        GameOutcome::Winner(player) if player == HUMAN => {
            format!("Game Over! Human ({}) wins!", player.name())
        }
        GameOutcome::Winner(player) => format!("Game Over! AI ({}) wins!", player.name()),
        GameOutcome::Draw => "Game Over! It's a draw!".to_string(),
    }
}
