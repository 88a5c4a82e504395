//! Lesson pane rendering
//!
//! The upper part lists every lesson, marking the one the current snapshot
//! belongs to. The lower part shows that lesson's commentary, wrapped to the
//! pane width, and the signature of any helper function it calls.

use super::utils::pane_block;
use crate::script::{LessonId, Script};
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
    Frame,
};

/// Render the lesson list and the current lesson's commentary
pub fn render_lessons_pane(
    frame: &mut Frame,
    area: Rect,
    script: &Script,
    current: Option<LessonId>,
    is_focused: bool,
    scroll_offset: &mut usize,
) {
    let block = pane_block(" Lessons ", is_focused);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let list_height = script.lessons.len() as u16 + 1;
    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(list_height), Constraint::Min(0)])
        .split(inner);

    let mut lines: Vec<Line> = script
        .lessons
        .iter()
        .map(|lesson| {
            let is_current = Some(lesson.id) == current;
            let marker = if is_current { "▶ " } else { "  " };
            let style = if is_current {
                Style::default()
                    .fg(DEFAULT_THEME.function)
                    .bg(DEFAULT_THEME.current_line_bg)
                    .add_modifier(Modifier::BOLD)
            } else if current.is_some_and(|c| lesson.id < c) {
                Style::default().fg(DEFAULT_THEME.comment)
            } else {
                Style::default().fg(DEFAULT_THEME.fg)
            };
            Line::from(vec![
                Span::styled(marker, Style::default().fg(DEFAULT_THEME.secondary)),
                Span::styled(
                    format!("{:>2}. {}", lesson.id.number(), lesson.title),
                    style,
                ),
            ])
        })
        .collect();
    lines.push(Line::from(""));
    frame.render_widget(Paragraph::new(lines), sections[0]);

    let commentary: Vec<Line> = match current.and_then(|id| script.lesson(id)) {
        Some(lesson) => {
            let mut lines: Vec<Line> = lesson
                .commentary
                .iter()
                .map(|text| Line::from(Span::styled(*text, Style::default().fg(DEFAULT_THEME.fg))))
                .collect();
            // Signatures of the helpers this lesson calls
            for func in lesson
                .called_functions()
                .into_iter()
                .filter_map(|name| script.function(name))
            {
                lines.push(Line::from(""));
                lines.push(Line::from(Span::styled(
                    func.signature(),
                    Style::default().fg(DEFAULT_THEME.type_name),
                )));
            }
            lines
        }
        None => vec![Line::from(Span::styled(
            "Press → to start stepping through the lessons.",
            Style::default().fg(DEFAULT_THEME.comment),
        ))],
    };

    let max_scroll = commentary.len().saturating_sub(1);
    *scroll_offset = (*scroll_offset).min(max_scroll);

    let paragraph = Paragraph::new(commentary)
        .wrap(Wrap { trim: true })
        .scroll((*scroll_offset as u16, 0));
    frame.render_widget(paragraph, sections[1]);
}
