// Terminal UI tests against ratatui's TestBackend

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use pointer_cheatsheet::interpreter::engine::Interpreter;
use pointer_cheatsheet::script::{LessonId, Narration, Script};
use pointer_cheatsheet::ui::app::FocusedPane;
use pointer_cheatsheet::ui::App;
use ratatui::{backend::TestBackend, Terminal};

fn rewound_app() -> App {
    let mut interpreter = Interpreter::new(Script::canonical(), Narration::Brief, 64 * 1024 * 1024);
    interpreter.run().unwrap();
    interpreter.rewind_to_start().unwrap();
    App::new(interpreter)
}

fn press(app: &mut App, code: KeyCode) {
    app.handle_key_event(KeyEvent::new(code, KeyModifiers::NONE));
}

fn render_to_string(app: &mut App) -> String {
    let mut terminal = Terminal::new(TestBackend::new(120, 50)).unwrap();
    terminal.draw(|f| app.render(f)).unwrap();
    terminal
        .backend()
        .buffer()
        .content
        .iter()
        .map(|cell| cell.symbol())
        .collect()
}

#[test]
fn test_render_shows_every_pane() {
    let mut app = rewound_app();
    let screen = render_to_string(&mut app);
    for title in ["Lessons", "Output", "Call Stack", "Heap"] {
        assert!(screen.contains(title), "missing pane {}", title);
    }
    assert!(screen.contains("Declare and print"));
}

#[test]
fn test_render_after_a_lesson_shows_its_output() {
    let mut app = rewound_app();
    press(&mut app, KeyCode::Char('n'));
    assert_eq!(
        app.interpreter.current_lesson(),
        Some(LessonId::DeclareAndPrint)
    );
    let screen = render_to_string(&mut app);
    assert!(screen.contains("number is initialized with a value of 3"));
    assert!(screen.contains("main()"));
}

#[test]
fn test_passing_lessons_show_the_helper_signature() {
    let mut app = rewound_app();
    for _ in 0..LessonId::PassByReference.number() {
        press(&mut app, KeyCode::Char('n'));
    }
    assert_eq!(
        app.interpreter.current_lesson(),
        Some(LessonId::PassByReference)
    );
    let screen = render_to_string(&mut app);
    assert!(screen.contains("void set_value_to_five_with_reference(int &x)"));
}

#[test]
fn test_previous_lesson_from_the_first_rewinds() {
    let mut app = rewound_app();
    press(&mut app, KeyCode::Char('n'));
    press(&mut app, KeyCode::Char('p'));
    assert_eq!(app.interpreter.history_position(), 0);
    assert_eq!(app.status_message, "Jumped to start");
}

#[test]
fn test_arrow_keys_move_through_history() {
    let mut app = rewound_app();
    press(&mut app, KeyCode::Right);
    press(&mut app, KeyCode::Right);
    assert_eq!(app.interpreter.history_position(), 2);
    press(&mut app, KeyCode::Left);
    assert_eq!(app.interpreter.history_position(), 1);

    press(&mut app, KeyCode::Left);
    press(&mut app, KeyCode::Left);
    assert_eq!(app.interpreter.history_position(), 0);
    assert!(app.status_message.starts_with("Cannot step backward"));
}

#[test]
fn test_lesson_keys_seek_lesson_ends() {
    let mut app = rewound_app();
    press(&mut app, KeyCode::Char('n'));
    press(&mut app, KeyCode::Char('n'));
    assert_eq!(app.interpreter.current_lesson(), Some(LessonId::MutateInPlace));
    assert_eq!(app.interpreter.int_value("number"), Some(8));

    press(&mut app, KeyCode::Char('p'));
    assert_eq!(
        app.interpreter.current_lesson(),
        Some(LessonId::DeclareAndPrint)
    );

    press(&mut app, KeyCode::Char('p'));
    assert_eq!(app.interpreter.history_position(), 0);
}

#[test]
fn test_enter_and_backspace_jump_to_the_ends() {
    let mut app = rewound_app();
    press(&mut app, KeyCode::Enter);
    assert_eq!(
        app.interpreter.history_position(),
        app.interpreter.total_snapshots() - 1
    );
    press(&mut app, KeyCode::Backspace);
    assert_eq!(app.interpreter.history_position(), 0);
}

#[test]
fn test_tab_cycles_focus() {
    let mut app = rewound_app();
    assert_eq!(app.focused_pane, FocusedPane::Lessons);
    press(&mut app, KeyCode::Tab);
    assert_eq!(app.focused_pane, FocusedPane::Output);
    press(&mut app, KeyCode::BackTab);
    press(&mut app, KeyCode::BackTab);
    assert_eq!(app.focused_pane, FocusedPane::Heap);
}

#[test]
fn test_quit_keys() {
    let mut app = rewound_app();
    assert!(!app.should_quit);
    press(&mut app, KeyCode::Char('q'));
    assert!(app.should_quit);

    let mut app = rewound_app();
    press(&mut app, KeyCode::Esc);
    assert!(app.should_quit);
}
