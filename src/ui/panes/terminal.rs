//! Output pane rendering

use super::utils::{clamp_scroll, pane_block};
use crate::snapshot::{LineKind, MockTerminal};
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    widgets::{List, ListItem, Padding, Paragraph},
    Frame,
};

/// Render the output pane
pub fn render_terminal_pane(
    frame: &mut Frame,
    area: Rect,
    terminal: &MockTerminal,
    is_focused: bool,
    scroll_offset: &mut usize,
) {
    let block = pane_block(" Output ", is_focused);

    if terminal.lines.is_empty() {
        let paragraph = Paragraph::new("(no output)")
            .block(block)
            .style(Style::default().fg(DEFAULT_THEME.comment));
        frame.render_widget(paragraph, area);
        return;
    }

    let block = block.padding(Padding::new(1, 0, 0, 0));
    let all_items: Vec<ListItem> = terminal
        .lines
        .iter()
        .map(|line| {
            let style = match line.kind {
                LineKind::Output => Style::default().fg(DEFAULT_THEME.fg),
                LineKind::Commentary => Style::default()
                    .fg(DEFAULT_THEME.comment)
                    .add_modifier(Modifier::ITALIC),
            };
            ListItem::new(line.text.as_str()).style(style)
        })
        .collect();

    let total_items = all_items.len();
    let visible_height = clamp_scroll(scroll_offset, total_items, area.height);

    let visible_items: Vec<ListItem> = all_items
        .into_iter()
        .skip(*scroll_offset)
        .take(visible_height)
        .collect();

    frame.render_widget(List::new(visible_items).block(block), area);
}
