//! Stack pane rendering with frames and their bindings
//!
//! Each frame is shown as a header followed by its visible bindings in
//! declaration order:
//!
//! ```text
//! ▸ Frame 0 │ main()
//!   int   number        = 4           @ 0x00000004
//!   int*  numberPointer = 0x00000004  @ 0x00000008
//! ▸ Frame 1 │ set_value_to_five_with_reference()
//!   int&  x             → 0x0000000c  (= 3)
//! ```

use super::utils::{clamp_scroll, pane_block};
use crate::memory::stack::{LocalVar, Stack, Storage};
use crate::memory::value::Value;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem},
    Frame,
};

/// Render the stack pane
pub fn render_stack_pane(
    frame: &mut Frame,
    area: Rect,
    stack: &Stack,
    is_focused: bool,
    scroll_offset: &mut usize,
) {
    let block = pane_block(" Call Stack ", is_focused);

    let mut all_items = Vec::new();

    if stack.is_empty() {
        all_items.push(ListItem::new("(empty)").style(Style::default().fg(DEFAULT_THEME.comment)));
    }

    for (depth, stack_frame) in stack.frames().iter().enumerate() {
        all_items.push(ListItem::new(Line::from(vec![
            Span::styled("▸ ", Style::default().fg(DEFAULT_THEME.secondary)),
            Span::styled(
                format!("Frame {} ", depth),
                Style::default().fg(DEFAULT_THEME.comment),
            ),
            Span::styled("│ ", Style::default().fg(DEFAULT_THEME.comment)),
            Span::styled(
                format!("{}()", stack_frame.function_name),
                Style::default()
                    .fg(DEFAULT_THEME.function)
                    .add_modifier(Modifier::BOLD),
            ),
        ])));

        let name_width = stack_frame
            .ordered_locals()
            .map(|(name, _)| name.len())
            .max()
            .unwrap_or(0);

        let mut any = false;
        for (name, var) in stack_frame.ordered_locals() {
            any = true;
            all_items.push(ListItem::new(binding_line(name, var, name_width, stack)));
        }
        if !any {
            all_items.push(
                ListItem::new("  (no locals)").style(Style::default().fg(DEFAULT_THEME.comment)),
            );
        }
    }

    let visible_height = clamp_scroll(scroll_offset, all_items.len(), area.height);
    let visible_items: Vec<ListItem> = all_items
        .into_iter()
        .skip(*scroll_offset)
        .take(visible_height)
        .collect();

    frame.render_widget(List::new(visible_items).block(block), area);
}

fn binding_line<'a>(name: &'a str, var: &LocalVar, name_width: usize, stack: &Stack) -> Line<'a> {
    let mut spans = vec![
        Span::raw("  "),
        Span::styled(
            format!("{:<5}", var.kind.c_type()),
            Style::default().fg(DEFAULT_THEME.type_name),
        ),
        Span::styled(
            format!("{:<width$}", name, width = name_width),
            Style::default().fg(DEFAULT_THEME.fg),
        ),
    ];

    match var.storage {
        Storage::Slot(value) => {
            spans.push(Span::raw(" = "));
            spans.push(value_span(value));
            spans.push(Span::styled(
                format!("  @ {}", var.address),
                Style::default().fg(DEFAULT_THEME.comment),
            ));
        }
        Storage::Alias => {
            spans.push(Span::raw(" → "));
            spans.push(Span::styled(
                var.address.to_string(),
                Style::default().fg(DEFAULT_THEME.address),
            ));
            if let Some(target) = stack.read_slot(var.address) {
                spans.push(Span::styled("  (= ", Style::default().fg(DEFAULT_THEME.comment)));
                spans.push(value_span(target));
                spans.push(Span::styled(")", Style::default().fg(DEFAULT_THEME.comment)));
            }
        }
    }

    Line::from(spans)
}

/// Format a value with the pane's colors
pub(crate) fn value_span(value: Value) -> Span<'static> {
    let style = match value {
        Value::Int(_) => Style::default().fg(DEFAULT_THEME.number),
        Value::Pointer(_) => Style::default().fg(DEFAULT_THEME.address),
        Value::Null => Style::default().fg(DEFAULT_THEME.number),
        Value::Uninitialized => Style::default()
            .fg(DEFAULT_THEME.error)
            .add_modifier(Modifier::DIM),
    };
    Span::styled(value.to_string(), style)
}
