use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    style::{Modifier, Style},
    widgets::{Block, Borders},
};

/// Bordered block with the focus color applied
pub(crate) fn pane_block(title: &str, is_focused: bool) -> Block<'_> {
    let border_style = if is_focused {
        Style::default()
            .fg(DEFAULT_THEME.border_focused)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(DEFAULT_THEME.border_normal)
    };

    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(border_style)
}

/// Clamp `offset` so the last page stays full; returns the visible row count
pub(crate) fn clamp_scroll(offset: &mut usize, total_items: usize, area_height: u16) -> usize {
    let visible_height = area_height.saturating_sub(2).max(1) as usize; // Account for borders, min 1

    if total_items > visible_height {
        let max_scroll = total_items - visible_height;
        *offset = (*offset).min(max_scroll);
    } else {
        *offset = 0;
    }
    visible_height
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scroll_is_clamped_to_last_page() {
        let mut offset = usize::MAX;
        let visible = clamp_scroll(&mut offset, 10, 6);
        assert_eq!(visible, 4);
        assert_eq!(offset, 6);
    }

    #[test]
    fn short_content_never_scrolls() {
        let mut offset = 3;
        clamp_scroll(&mut offset, 2, 10);
        assert_eq!(offset, 0);
    }
}
