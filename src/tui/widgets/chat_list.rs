// src/tui/widgets/chat_list.rs — Live chats routed to the specialist.
//
// Rows appear in the order supplied, and at most the row matching `selected`
// is drawn active. A stale selection highlights nothing. The keyboard cursor
// lives in the caller's `TableState`, which also owns the scroll offset.

use chrono::Local;
use ratatui::{
    layout::{Constraint, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use crate::presence::LiveChatSession;
use crate::tui::theme::Theme;

pub const EMPTY_MESSAGE: &str = "No active chats";

/// Display model for one chat row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatRow<'a> {
    pub id: &'a str,
    pub customer: &'a str,
    pub time: String,
    pub preview: &'static str,
    pub active: bool,
}

pub struct ActiveChatList<'a> {
    chats: &'a [LiveChatSession],
    selected: Option<&'a str>,
}

impl<'a> ActiveChatList<'a> {
    pub fn new(chats: &'a [LiveChatSession], selected: Option<&'a str>) -> Self {
        Self { chats, selected }
    }

    pub fn count(&self) -> usize {
        self.chats.len()
    }

    pub fn rows(&self) -> Vec<ChatRow<'a>> {
        self.chats
            .iter()
            .map(|chat| ChatRow {
                id: chat.id.as_str(),
                customer: chat.customer_name(),
                time: format_time(chat),
                preview: chat.preview(),
                active: self.selected == Some(chat.id.as_str()),
            })
            .collect()
    }

    /// Invoke `on_select` with the id of the chat at `index`, if there is one.
    pub fn select(&self, index: usize, on_select: impl FnOnce(&str)) {
        if let Some(chat) = self.chats.get(index) {
            on_select(&chat.id);
        }
    }

    /// Map a terminal cell inside `area` to a row index, honouring the
    /// scroll offset `state` had at the last render.
    pub fn row_at(&self, area: Rect, state: &TableState, column: u16, row: u16) -> Option<usize> {
        let inner = block(0).inner(area);
        let inside = column >= inner.x
            && column < inner.x + inner.width
            && row >= inner.y
            && row < inner.y + inner.height;
        if !inside {
            return None;
        }
        let index = state.offset() + usize::from(row - inner.y);
        (index < self.chats.len()).then_some(index)
    }
}

pub fn render(f: &mut Frame, area: Rect, list: &ActiveChatList<'_>, state: &mut TableState) {
    let block = block(list.count());

    if list.chats.is_empty() {
        let p = Paragraph::new(Line::from(Span::styled(
            format!("  {EMPTY_MESSAGE}"),
            Theme::text_dim(),
        )))
        .block(block);
        f.render_widget(p, area);
        return;
    }

    let rows: Vec<Row> = list
        .rows()
        .into_iter()
        .map(|r| {
            let row = Row::new(vec![
                Cell::from(r.customer.to_string()).style(Theme::text()),
                Cell::from(r.time).style(Theme::text_dim()),
                Cell::from(r.preview).style(Theme::text_dim()),
            ]);
            if r.active {
                row.style(Theme::chat_active())
            } else {
                row
            }
        })
        .collect();

    let widths = [
        Constraint::Min(12),
        Constraint::Length(5),
        Constraint::Length(16),
    ];

    let table = Table::new(rows, widths)
        .block(block)
        .column_spacing(1)
        .highlight_symbol("> ");

    f.render_stateful_widget(table, area, state);
}

fn block(count: usize) -> Block<'static> {
    Block::default()
        .title(format!(" Active Chats ({count}) "))
        .borders(Borders::ALL)
        .border_style(Theme::border())
}

fn format_time(chat: &LiveChatSession) -> String {
    chat.created_at.with_timezone(&Local).format("%H:%M").to_string()
}
