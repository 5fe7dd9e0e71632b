use crate::config::AppConfig;
use crate::controller::{ControllerEvent, TurnController};
use crate::game::{Board, CENTER_COL, COLS};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, Stdout};
use std::sync::mpsc::{self, Receiver};
use std::time::Duration;

use super::game_view::{self, GameView};

pub struct App {
    controller: TurnController,
    events: Receiver<ControllerEvent>,
    board: Board,
    selected_column: usize,
    should_quit: bool,
    message: Option<String>,
}

impl App {
    pub fn new(config: &AppConfig) -> io::Result<Self> {
        let (tx, events) = mpsc::channel();
        let controller = TurnController::new(Box::new(tx), config)?;
        let mut app = App {
            controller,
            events,
            board: Board::new(),
            selected_column: CENTER_COL,
            should_quit: false,
            message: None,
        };
        app.drain_events();
        Ok(app)
    }

    /// Main application loop
    pub fn run(&mut self, terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> io::Result<()> {
        loop {
            self.controller.poll();
            self.drain_events();

            terminal.draw(|f| self.render(f))?;

            if self.should_quit {
                break;
            }

            self.handle_events()?;
        }
        Ok(())
    }

    /// Copy controller notifications into the snapshot the view renders.
    fn drain_events(&mut self) {
        for event in self.events.try_iter() {
            match event {
                ControllerEvent::BoardChanged(board) => self.board = board,
                ControllerEvent::Message(text) => self.message = Some(text),
            }
        }
    }

    /// Handle keyboard events
    fn handle_events(&mut self) -> io::Result<()> {
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    self.handle_key(key);
                }
            }
        }
        Ok(())
    }

    /// Handle key press. Rejected commands are reported through the
    /// controller's message stream, so their errors are not needed here.
    fn handle_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.controller.shutdown();
                self.should_quit = true;
            }
            KeyCode::Left => {
                self.selected_column = self.selected_column.saturating_sub(1);
            }
            KeyCode::Right => {
                if self.selected_column + 1 < COLS {
                    self.selected_column += 1;
                }
            }
            KeyCode::Enter | KeyCode::Char(' ') => {
                let _ = self.controller.submit_human_move(self.selected_column);
            }
            KeyCode::Char('r') => {
                if self.controller.reset_game().is_ok() {
                    self.selected_column = CENTER_COL;
                }
            }
            KeyCode::Char(c) => {
                if let Some(depth) = c.to_digit(10).filter(|d| *d > 0) {
                    let _ = self.controller.set_search_depth(depth);
                }
            }
            _ => {}
        }
        self.drain_events();
    }

    /// Render the UI
    fn render(&self, frame: &mut ratatui::Frame) {
        game_view::render(
            frame,
            &GameView {
                board: &self.board,
                state: self.controller.state(),
                depth: self.controller.search_config().depth,
                selected_column: self.selected_column,
                message: self.message.as_deref(),
            },
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::{TurnState, START_MESSAGE, THINKING_MESSAGE};
    use crate::game::Cell;

    fn app() -> App {
        let mut config = AppConfig::default();
        config.search.depth = 1;
        config.game.ai_move_delay_ms = 0;
        App::new(&config).unwrap()
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key(KeyEvent::from(code));
    }

    #[test]
    fn starts_centered_with_start_message() {
        let app = app();
        assert_eq!(app.selected_column, CENTER_COL);
        assert_eq!(app.message.as_deref(), Some(START_MESSAGE));
        assert_eq!(app.board, Board::new());
    }

    #[test]
    fn arrows_stay_on_board() {
        let mut app = app();
        for _ in 0..10 {
            press(&mut app, KeyCode::Left);
        }
        assert_eq!(app.selected_column, 0);
        for _ in 0..10 {
            press(&mut app, KeyCode::Right);
        }
        assert_eq!(app.selected_column, COLS - 1);
    }

    #[test]
    fn enter_drops_piece_in_selected_column() {
        let mut app = app();
        press(&mut app, KeyCode::Left);
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.board.get(5, CENTER_COL - 1), Cell::PlayerOne);
        assert_eq!(app.message.as_deref(), Some(THINKING_MESSAGE));
        assert_eq!(app.controller.state(), TurnState::AiSearching);

        assert!(app.controller.wait_for_ai(Duration::from_secs(10)));
        app.drain_events();
        assert_eq!(app.board.piece_count(), 2);
    }

    #[test]
    fn digit_sets_depth_and_zero_is_ignored() {
        let mut app = app();
        press(&mut app, KeyCode::Char('7'));
        assert_eq!(app.controller.search_config().depth, 7);
        assert_eq!(app.message.as_deref(), Some("AI difficulty set to depth 7."));

        press(&mut app, KeyCode::Char('0'));
        assert_eq!(app.controller.search_config().depth, 7);
    }

    #[test]
    fn restart_recenters_selection() {
        let mut app = app();
        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Char('r'));
        assert_eq!(app.selected_column, CENTER_COL);
        assert_eq!(app.message.as_deref(), Some(START_MESSAGE));
    }

    #[test]
    fn quit_shuts_controller_down() {
        let mut app = app();
        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit);
        assert!(app.controller.is_shut_down());
    }
}
