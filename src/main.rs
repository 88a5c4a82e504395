// Pointer Cheat Sheet: values, addresses, pointers, references and the heap

use std::io;

use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use pointer_cheatsheet::cli::{self, Command, Mode};
use pointer_cheatsheet::interpreter::constants::DEFAULT_SNAPSHOT_LIMIT;
use pointer_cheatsheet::interpreter::engine::Interpreter;
use pointer_cheatsheet::script::Script;
use pointer_cheatsheet::ui::App;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = std::env::args();
    let program_name = args
        .next()
        .unwrap_or_else(|| "pointer-cheatsheet".to_string());

    let options = match cli::parse_args(args) {
        Command::Run(options) => options,
        Command::Help => {
            println!("{}", cli::usage(&program_name));
            return Ok(());
        }
    };

    let mut interpreter = Interpreter::new(
        Script::canonical(),
        options.narration,
        DEFAULT_SNAPSHOT_LIMIT,
    );

    match options.mode {
        Mode::Print => print_transcript(&mut interpreter),
        Mode::Tui => run_tui(interpreter),
    }
}

fn print_transcript(interpreter: &mut Interpreter) -> Result<(), Box<dyn std::error::Error>> {
    let result = interpreter.run();

    // Whatever ran before a failure is still worth showing
    for line in interpreter.lines() {
        println!("{}", line);
    }

    if let Err(e) = result {
        eprintln!("Runtime error: {}", e);
        std::process::exit(1);
    }
    Ok(())
}

fn run_tui(mut interpreter: Interpreter) -> Result<(), Box<dyn std::error::Error>> {
    eprintln!("Running {} lessons...", interpreter.script().lessons.len());
    match interpreter.run() {
        Ok(()) => {
            eprintln!("Execution completed successfully.");
            eprintln!("Total snapshots: {}", interpreter.total_snapshots());
        }
        Err(e) => {
            eprintln!("Runtime error: {}", e);
            eprintln!("Entering TUI with partial execution history...");
        }
    }

    // Rewind to the beginning for TUI
    if let Err(e) = interpreter.rewind_to_start() {
        eprintln!("Warning: Failed to rewind to start: {}", e);
    }

    // Set up terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(interpreter);
    let res = app.run(&mut terminal);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("Error: {:?}", err);
    }

    Ok(())
}
