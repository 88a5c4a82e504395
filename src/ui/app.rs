//! Main TUI application state and logic

use crate::interpreter::engine::Interpreter;
use crate::script::LessonId;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout},
    Frame, Terminal,
};
use std::io;
use std::time::{Duration, Instant};

/// Which pane is currently focused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusedPane {
    Lessons,
    Output,
    Stack,
    Heap,
}

impl FocusedPane {
    /// Move focus to the next pane (clockwise: lessons -> output -> stack -> heap)
    pub fn next(self) -> Self {
        match self {
            FocusedPane::Lessons => FocusedPane::Output,
            FocusedPane::Output => FocusedPane::Stack,
            FocusedPane::Stack => FocusedPane::Heap,
            FocusedPane::Heap => FocusedPane::Lessons,
        }
    }

    /// Move focus to the previous pane (counter-clockwise)
    pub fn prev(self) -> Self {
        match self {
            FocusedPane::Lessons => FocusedPane::Heap,
            FocusedPane::Output => FocusedPane::Lessons,
            FocusedPane::Stack => FocusedPane::Output,
            FocusedPane::Heap => FocusedPane::Stack,
        }
    }
}

/// The main application state
pub struct App {
    /// The interpreter, already run; the UI only moves through its history
    pub interpreter: Interpreter,

    /// Currently focused pane
    pub focused_pane: FocusedPane,

    /// Per-pane scroll offsets
    pub lessons_scroll: usize,
    pub stack_scroll: usize,
    pub heap_scroll: usize,
    pub terminal_scroll: usize,

    /// Whether the app should quit
    pub should_quit: bool,

    /// Status message to display
    pub status_message: String,

    /// Whether auto-play mode is active
    pub is_playing: bool,

    /// Last time a step was taken in play mode
    pub last_play_time: Instant,

    /// Last time space was pressed (for debouncing)
    pub last_space_press: Instant,
}

impl App {
    pub fn new(interpreter: Interpreter) -> Self {
        App {
            interpreter,
            focused_pane: FocusedPane::Lessons,
            lessons_scroll: 0,
            stack_scroll: 0,
            heap_scroll: 0,
            terminal_scroll: 0,
            should_quit: false,
            status_message: String::from("Ready!"),
            is_playing: false,
            last_play_time: Instant::now(),
            last_space_press: Instant::now()
                .checked_sub(Duration::from_secs(1))
                .unwrap_or(Instant::now()),
        }
    }

    /// Run the TUI application
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            terminal.draw(|f| self.render(f))?;

            if self.should_quit {
                break;
            }

            if self.is_playing && self.last_play_time.elapsed() >= Duration::from_millis(600) {
                if self.interpreter.step_forward().is_ok() {
                    self.status_message = "Playing...".to_string();
                    self.terminal_scroll = usize::MAX;
                } else {
                    self.is_playing = false;
                    self.status_message = "Playback complete".to_string();
                }
                self.last_play_time = Instant::now();
            }

            // Poll with a timeout so auto-play keeps ticking
            if event::poll(Duration::from_millis(50))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key_event(key);
                    }
                }
            }
        }

        Ok(())
    }

    /// Render the UI
    pub fn render(&mut self, frame: &mut Frame) {
        let size = frame.area();

        // 4 panes in 2 columns, plus status bar at bottom
        let main_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(size);

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(main_chunks[0]);

        // Left column: Lessons (top) | Output (bottom)
        let left_rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(columns[0]);

        // Right column: Stack (top) | Heap (bottom)
        let right_rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
            .split(columns[1]);

        super::panes::render_lessons_pane(
            frame,
            left_rows[0],
            self.interpreter.script(),
            self.interpreter.current_lesson(),
            self.focused_pane == FocusedPane::Lessons,
            &mut self.lessons_scroll,
        );

        super::panes::render_terminal_pane(
            frame,
            left_rows[1],
            self.interpreter.terminal(),
            self.focused_pane == FocusedPane::Output,
            &mut self.terminal_scroll,
        );

        super::panes::render_stack_pane(
            frame,
            right_rows[0],
            self.interpreter.stack(),
            self.focused_pane == FocusedPane::Stack,
            &mut self.stack_scroll,
        );

        super::panes::render_heap_pane(
            frame,
            right_rows[1],
            self.interpreter.heap(),
            self.focused_pane == FocusedPane::Heap,
            &mut self.heap_scroll,
        );

        super::panes::render_status_bar(
            frame,
            main_chunks[1],
            &self.status_message,
            self.interpreter.history_position(),
            self.interpreter.total_snapshots(),
            self.interpreter.current_lesson(),
            self.is_playing,
        );
    }

    /// Handle keyboard events
    pub fn handle_key_event(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                self.should_quit = true;
            }
            // Number keys step forward N times directly
            KeyCode::Char(c @ '1'..='9') => {
                self.is_playing = false;
                let n = c.to_digit(10).unwrap_or(1) as usize;
                let stepped = (0..n)
                    .take_while(|_| self.interpreter.step_forward().is_ok())
                    .count();
                self.status_message = format!("Stepped forward {} step(s)", stepped);
                self.terminal_scroll = usize::MAX;
            }
            KeyCode::Tab => {
                self.focused_pane = self.focused_pane.next();
            }
            KeyCode::BackTab => {
                self.focused_pane = self.focused_pane.prev();
            }
            KeyCode::Left => {
                self.is_playing = false;
                self.step_backward();
            }
            KeyCode::Right => {
                self.is_playing = false;
                self.step_forward();
            }
            KeyCode::Char('n') => {
                self.is_playing = false;
                self.next_lesson();
            }
            KeyCode::Char('p') => {
                self.is_playing = false;
                self.previous_lesson();
            }
            KeyCode::Up => {
                let scroll = self.focused_scroll();
                *scroll = scroll.saturating_sub(1);
            }
            KeyCode::Down => {
                let scroll = self.focused_scroll();
                *scroll = scroll.saturating_add(1);
            }
            KeyCode::Char(' ') => {
                // Toggle auto-play mode (with 200ms debounce to prevent key repeat spam)
                if self.last_space_press.elapsed() >= Duration::from_millis(200) {
                    self.last_space_press = Instant::now();
                    self.is_playing = !self.is_playing;
                    if self.is_playing {
                        self.last_play_time = Instant::now()
                            .checked_sub(Duration::from_secs(1))
                            .unwrap_or(Instant::now());
                        self.status_message = "Playing...".to_string();
                    } else {
                        self.status_message = "Paused".to_string();
                    }
                }
            }
            KeyCode::Enter => {
                self.is_playing = false;
                match self.interpreter.jump_to_end() {
                    Ok(()) => self.status_message = "Jumped to end".to_string(),
                    Err(e) => self.status_message = format!("Error: {}", e),
                }
                self.terminal_scroll = usize::MAX;
            }
            KeyCode::Backspace => {
                self.is_playing = false;
                match self.interpreter.rewind_to_start() {
                    Ok(()) => self.status_message = "Jumped to start".to_string(),
                    Err(e) => self.status_message = format!("Error: {}", e),
                }
                self.terminal_scroll = usize::MAX;
            }
            _ => {}
        }
    }

    fn focused_scroll(&mut self) -> &mut usize {
        match self.focused_pane {
            FocusedPane::Lessons => &mut self.lessons_scroll,
            FocusedPane::Output => &mut self.terminal_scroll,
            FocusedPane::Stack => &mut self.stack_scroll,
            FocusedPane::Heap => &mut self.heap_scroll,
        }
    }

    /// Step forward in execution
    fn step_forward(&mut self) {
        match self.interpreter.step_forward() {
            Ok(()) => {
                self.status_message = "Stepped forward".to_string();
                self.terminal_scroll = usize::MAX;
            }
            Err(e) => {
                self.status_message = format!("Cannot step forward: {}", e);
            }
        }
    }

    /// Step backward in execution
    fn step_backward(&mut self) {
        match self.interpreter.step_backward() {
            Ok(()) => {
                self.status_message = "Stepped backward".to_string();
                self.terminal_scroll = usize::MAX;
            }
            Err(e) => {
                self.status_message = format!("Cannot step backward: {}", e);
            }
        }
    }

    /// Jump to the end of the lesson after the current one
    fn next_lesson(&mut self) {
        let target = match self.interpreter.current_lesson() {
            // Before the first lesson
            None if self.interpreter.history_position() + 1 < self.interpreter.total_snapshots() => {
                LessonId::ALL.first().copied()
            }
            None => None,
            Some(id) => LessonId::ALL.get(id.number()).copied(),
        };
        match target {
            Some(id) => self.seek(id),
            None => self.status_message = "No next lesson".to_string(),
        }
    }

    /// Jump to the end of the lesson before the current one
    fn previous_lesson(&mut self) {
        let target = match self.interpreter.current_lesson() {
            // Past the last lesson: go back to it
            None if self.interpreter.history_position() + 1 == self.interpreter.total_snapshots() => {
                LessonId::ALL.last().copied()
            }
            None => None,
            Some(id) => id.number().checked_sub(2).map(|i| LessonId::ALL[i]),
        };
        match target {
            Some(id) => self.seek(id),
            None => match self.interpreter.rewind_to_start() {
                Ok(()) => self.status_message = "Jumped to start".to_string(),
                Err(e) => self.status_message = format!("Error: {}", e),
            },
        }
        self.terminal_scroll = usize::MAX;
    }

    fn seek(&mut self, id: LessonId) {
        match self.interpreter.seek_lesson_end(id) {
            Ok(()) => self.status_message = format!("End of {}", id),
            Err(e) => self.status_message = format!("Error: {}", e),
        }
        self.lessons_scroll = 0;
        self.terminal_scroll = usize::MAX;
    }
}
