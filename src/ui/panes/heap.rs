//! Heap pane rendering
//!
//! Lists every cell ever allocated, released ones included, so stepping
//! across the end of the heap lesson shows the cell turning into a tombstone.

use super::stack::value_span;
use super::utils::{clamp_scroll, pane_block};
use crate::memory::heap::{CellState, Heap};
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem},
    Frame,
};

/// Render the heap pane
pub fn render_heap_pane(
    frame: &mut Frame,
    area: Rect,
    heap: &Heap,
    is_focused: bool,
    scroll_offset: &mut usize,
) {
    let title = format!(" Heap ({}/{} live) ", heap.live_count(), heap.max_cells());
    let block = pane_block(&title, is_focused);

    let cells = heap.cells_sorted();
    let mut all_items = Vec::new();

    if cells.is_empty() {
        all_items.push(
            ListItem::new("(no allocations)").style(Style::default().fg(DEFAULT_THEME.comment)),
        );
    }

    for (addr, cell) in cells {
        let (state_text, state_style) = match cell.state {
            CellState::Allocated => ("allocated", Style::default().fg(DEFAULT_THEME.success)),
            CellState::Tombstone => (
                "released",
                Style::default()
                    .fg(DEFAULT_THEME.error)
                    .add_modifier(Modifier::CROSSED_OUT),
            ),
        };

        let mut spans = vec![
            Span::styled(addr.to_string(), Style::default().fg(DEFAULT_THEME.address)),
            Span::raw(" │ "),
            Span::styled("int ", Style::default().fg(DEFAULT_THEME.type_name)),
        ];
        if cell.state == CellState::Allocated {
            spans.push(Span::raw("= "));
            spans.push(value_span(cell.value));
            spans.push(Span::raw(" "));
        }
        spans.push(Span::raw("│ "));
        spans.push(Span::styled(state_text, state_style));

        all_items.push(ListItem::new(Line::from(spans)));
    }

    let visible_height = clamp_scroll(scroll_offset, all_items.len(), area.height);
    let visible_items: Vec<ListItem> = all_items
        .into_iter()
        .skip(*scroll_offset)
        .take(visible_height)
        .collect();

    frame.render_widget(List::new(visible_items).block(block), area);
}
