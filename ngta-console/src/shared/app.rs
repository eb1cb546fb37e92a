//! Keyboard-driven console state

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ngta_breakout::{Board, BoardView, DirectionFilter, Snapshot, Timeframe};

/// What the event loop should do after a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    None,
    Redraw,
    Refresh,
    Quit,
}

/// UI state owned by the event loop: the six breakout tables and their focus.
#[derive(Debug, Default)]
pub struct ConsoleApp {
    board: Board,
}

impl ConsoleApp {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn focused(&self) -> Timeframe {
        self.board.focused()
    }

    pub fn view(&self, snapshot: &Snapshot) -> BoardView {
        self.board.view(snapshot)
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Action {
        if key.kind != KeyEventKind::Press {
            return Action::None;
        }

        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Action::Quit,
            KeyCode::Char('q') | KeyCode::Esc => Action::Quit,
            KeyCode::Char('r') => Action::Refresh,
            KeyCode::Tab | KeyCode::Right => {
                self.board.focus_next();
                Action::Redraw
            }
            KeyCode::BackTab | KeyCode::Left => {
                self.board.focus_prev();
                Action::Redraw
            }
            KeyCode::Char('f') => {
                self.board.focused_table_mut().state.cycle_filter();
                Action::Redraw
            }
            KeyCode::Char('s') => {
                self.board.focused_table_mut().state.toggle_sort();
                Action::Redraw
            }
            KeyCode::Char(digit @ '1'..='3') => {
                let filter = match digit {
                    '1' => DirectionFilter::All,
                    '2' => DirectionFilter::Bullish,
                    _ => DirectionFilter::Bearish,
                };
                self.board.focused_table_mut().state.set_filter(filter);
                Action::Redraw
            }
            _ => Action::None,
        }
    }
}
