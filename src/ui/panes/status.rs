//! Status bar rendering with keybindings and state indicators

use crate::script::LessonId;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// Render the status bar at the bottom
pub fn render_status_bar(
    frame: &mut Frame,
    area: Rect,
    message: &str,
    current_step: usize,
    total_steps: usize,
    lesson: Option<LessonId>,
    is_playing: bool,
) {
    let layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(area);

    let bar_style = Style::default().bg(DEFAULT_THEME.current_line_bg);
    let lesson_text = match lesson {
        Some(id) => format!(" {}/{} ", id.number(), LessonId::ALL.len()),
        None => " -/- ".to_string(),
    };

    let left_spans = vec![
        Span::styled(
            format!(" Step {}/{} ", current_step + 1, total_steps),
            Style::default()
                .bg(DEFAULT_THEME.primary)
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            lesson_text,
            Style::default().bg(DEFAULT_THEME.secondary).fg(Color::Black),
        ),
        Span::styled(" | ", bar_style.fg(DEFAULT_THEME.comment)),
        Span::styled(format!(" {} ", message), bar_style.fg(DEFAULT_THEME.fg)),
    ];

    frame.render_widget(
        Paragraph::new(Line::from(left_spans))
            .style(bar_style)
            .alignment(Alignment::Left),
        layout[0],
    );

    let key_style = Style::default().bg(DEFAULT_THEME.comment).fg(Color::Black);
    let desc_style = bar_style.fg(DEFAULT_THEME.fg);
    let sep_style = bar_style.fg(DEFAULT_THEME.comment);

    let mut right_spans = Vec::new();
    for (i, (key, desc)) in [
        (" ←/→ ", " step "),
        (" n/p ", " lesson "),
        (" ⎵ ", " play "),
        (" ↵ / ⌫ ", " end/start "),
        (" q ", " quit "),
    ]
    .into_iter()
    .enumerate()
    {
        if i > 0 {
            right_spans.push(Span::styled("│", sep_style));
            right_spans.push(Span::styled(" ", desc_style));
        }
        right_spans.push(Span::styled(key, key_style));
        right_spans.push(Span::styled(desc, desc_style));
    }

    let indicator = if is_playing {
        Some((" ▶ PLAYING ", DEFAULT_THEME.secondary))
    } else if current_step + 1 >= total_steps {
        Some((" END ", DEFAULT_THEME.error))
    } else if current_step == 0 {
        Some((" START ", DEFAULT_THEME.success))
    } else {
        None
    };

    if let Some((text, color)) = indicator {
        right_spans.push(Span::styled("│", sep_style));
        right_spans.push(Span::styled(
            text,
            Style::default()
                .bg(color)
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
        ));
    }

    frame.render_widget(
        Paragraph::new(Line::from(right_spans))
            .style(bar_style)
            .alignment(Alignment::Right),
        layout[1],
    );
}
