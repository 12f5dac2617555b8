//! Interactive calculator form
//!
//! The form is a thin layer over [`Session`]: key presses become
//! [`InputEvent`]s or session actions, and every frame is drawn from the
//! session's current state, so corrected prices show up on the next draw.

mod screens;

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::io;
use tracing::{debug, info};
use tui_input::backend::crossterm::EventHandler;
use tui_input::Input;

use crate::common::errors::{InputField, Result};
use crate::session::{InputEvent, Session};
use crate::sizing::tick::{format_fixed, format_price};

pub use screens::ui;

/// Focusable elements of the form, top to bottom
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Contract,
    Field(InputField),
    Calculate,
    Reset,
}

impl Focus {
    const ORDER: [Focus; 7] = [
        Focus::Contract,
        Focus::Field(InputField::EntryPrice),
        Focus::Field(InputField::StopPrice),
        Focus::Field(InputField::AccountSize),
        Focus::Field(InputField::RiskPercent),
        Focus::Calculate,
        Focus::Reset,
    ];

    fn index(self) -> usize {
        Self::ORDER
            .iter()
            .position(|focus| *focus == self)
            .unwrap_or(0)
    }

    pub fn next(self) -> Self {
        Self::ORDER[(self.index() + 1) % Self::ORDER.len()]
    }

    pub fn previous(self) -> Self {
        Self::ORDER[(self.index() + Self::ORDER.len() - 1) % Self::ORDER.len()]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    /// Typing into a numeric field
    Editing(InputField),
    /// Contract list is open
    ChoosingContract,
}

/// Form state on top of the calculator session
pub struct App {
    pub session: Session,
    pub focus: Focus,
    pub input_mode: InputMode,
    pub input: Input,
    /// Highlighted row while the contract list is open
    pub contract_cursor: usize,
    /// Last input problem, shown in the help bar
    pub status: Option<String>,
    pub should_quit: bool,
}

impl App {
    pub fn new(session: Session) -> Self {
        Self {
            session,
            focus: Focus::Contract,
            input_mode: InputMode::Normal,
            input: Input::default(),
            contract_cursor: 0,
            status: None,
            should_quit: false,
        }
    }

    /// Current value of a field as the form displays it
    pub fn display_value(&self, field: InputField) -> String {
        let state = self.session.state();
        let value = state.value(field);
        match field {
            InputField::EntryPrice | InputField::StopPrice => format_price(value, state.tick_size()),
            InputField::AccountSize | InputField::RiskPercent => format_fixed(value, 2),
        }
    }

    /// Stored value of a field, unrounded, to seed the edit buffer
    pub fn edit_value(&self, field: InputField) -> String {
        self.session.state().value(field).normalize().to_string()
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        match self.input_mode {
            InputMode::Normal => self.handle_normal_key(key),
            InputMode::Editing(field) => self.handle_editing_key(field, key),
            InputMode::ChoosingContract => self.handle_contract_key(key),
        }
    }

    fn handle_normal_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Tab | KeyCode::Down => self.focus = self.focus.next(),
            KeyCode::BackTab | KeyCode::Up => self.focus = self.focus.previous(),
            KeyCode::Char('c') => self.calculate(),
            KeyCode::Char('r') => self.reset(),
            KeyCode::Left if self.focus == Focus::Contract => self.shift_contract(-1),
            KeyCode::Right if self.focus == Focus::Contract => self.shift_contract(1),
            KeyCode::Char('+') | KeyCode::Right => self.step_focused(1),
            KeyCode::Char('-') | KeyCode::Left => self.step_focused(-1),
            KeyCode::Enter => match self.focus {
                Focus::Contract => {
                    self.contract_cursor = self.session.selected_index();
                    self.input_mode = InputMode::ChoosingContract;
                }
                Focus::Field(field) => {
                    self.input = Input::new(self.edit_value(field));
                    self.input_mode = InputMode::Editing(field);
                }
                Focus::Calculate => self.calculate(),
                Focus::Reset => self.reset(),
            },
            _ => {}
        }
    }

    fn handle_editing_key(&mut self, field: InputField, key: KeyEvent) {
        match key.code {
            KeyCode::Enter => {
                let text = self.input.value().to_string();
                self.status = match self.session.set_text(field, &text) {
                    Ok(()) => None,
                    Err(err) => {
                        debug!(error = %err, "Rejected field input");
                        Some(err.to_string())
                    }
                };
                self.input.reset();
                self.input_mode = InputMode::Normal;
            }
            KeyCode::Esc => {
                self.input.reset();
                self.input_mode = InputMode::Normal;
            }
            _ => {
                self.input.handle_event(&Event::Key(key));
            }
        }
    }

    fn handle_contract_key(&mut self, key: KeyEvent) {
        let last = self.session.table().len().saturating_sub(1);
        match key.code {
            KeyCode::Up => self.contract_cursor = self.contract_cursor.saturating_sub(1),
            KeyCode::Down => self.contract_cursor = (self.contract_cursor + 1).min(last),
            KeyCode::Home => self.contract_cursor = 0,
            KeyCode::End => self.contract_cursor = last,
            KeyCode::Enter => {
                self.session.select_index(self.contract_cursor);
                self.input_mode = InputMode::Normal;
            }
            KeyCode::Esc => self.input_mode = InputMode::Normal,
            _ => {}
        }
    }

    fn shift_contract(&mut self, delta: isize) {
        let len = self.session.table().len();
        if len == 0 {
            return;
        }
        let current = self.session.selected_index() as isize;
        let next = (current + delta).rem_euclid(len as isize) as usize;
        self.session.select_index(next);
    }

    fn step_focused(&mut self, steps: i64) {
        if let Focus::Field(field) = self.focus {
            self.session.apply(InputEvent::Step(field, steps));
        }
    }

    fn calculate(&mut self) {
        self.status = None;
        self.session.calculate();
    }

    fn reset(&mut self) {
        self.session.reset();
        self.focus = Focus::Contract;
        self.status = None;
    }
}

/// Take over the terminal and run the form until the user quits
pub fn run(session: Session) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    info!("Calculator form opened");
    let mut app = App::new(session);
    let res = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    info!("Calculator form closed");
    res
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            app.handle_key(key);
        }

        if app.should_quit {
            return Ok(());
        }
    }
}
