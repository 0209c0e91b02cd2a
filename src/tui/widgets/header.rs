// src/tui/widgets/header.rs — Specialist identity, presence and capacity.

use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::presence::SpecialistProfile;
use crate::tui::theme::Theme;

const REFRESH_KEY: &str = "[r]";
const REFRESH_LABEL: &str = " Refresh";

pub struct DashboardHeader<'a> {
    specialist: &'a SpecialistProfile,
    active_chat_count: usize,
}

impl<'a> DashboardHeader<'a> {
    pub fn new(specialist: &'a SpecialistProfile, active_chat_count: usize) -> Self {
        Self {
            specialist,
            active_chat_count,
        }
    }

    /// First character of the name, uppercased.
    pub fn initial(&self) -> String {
        self.specialist
            .name
            .chars()
            .next()
            .map(|c| c.to_uppercase().collect())
            .unwrap_or_else(|| "?".to_string())
    }

    /// `active/capacity`, e.g. `2/5`.
    pub fn ratio(&self) -> String {
        format!(
            "{}/{}",
            self.active_chat_count, self.specialist.max_concurrent_chats
        )
    }

    /// Call `on_refresh` when a click at (`column`, `row`) lands on the
    /// refresh hint of a header drawn into `area`.
    pub fn click(&self, area: Rect, column: u16, row: u16, on_refresh: impl FnOnce()) {
        let inner = block().inner(area);
        if row != inner.y || inner.width == 0 {
            return;
        }
        let spans = self.spans();
        let start: usize = spans
            .iter()
            .take_while(|s| s.content != REFRESH_KEY)
            .map(Span::width)
            .sum();
        let end = start + REFRESH_KEY.len() + REFRESH_LABEL.len();
        let x = usize::from(column.saturating_sub(inner.x));
        if column >= inner.x && x >= start && x < end && x < usize::from(inner.width) {
            on_refresh();
        }
    }

    fn spans(&self) -> Vec<Span<'a>> {
        let status = self.specialist.status;
        vec![
            Span::styled(format!(" {} ", self.initial()), Theme::avatar()),
            Span::raw(" "),
            Span::styled(self.specialist.name.as_str(), Theme::text()),
            Span::raw("  "),
            Span::styled(format!("\u{25cf} {status}"), Theme::status(status)),
            Span::styled("    Chats ", Theme::text_dim()),
            Span::styled(self.ratio(), Theme::text()),
            Span::raw("    "),
            Span::styled(REFRESH_KEY, Theme::key_hint()),
            Span::styled(REFRESH_LABEL, Theme::key_desc()),
        ]
    }
}

pub fn render(f: &mut Frame, area: Rect, header: &DashboardHeader<'_>) {
    let p = Paragraph::new(Line::from(header.spans())).block(block());
    f.render_widget(p, area);
}

fn block() -> Block<'static> {
    Block::default()
        .title(Span::styled(" Specialist Desk ", Theme::header()))
        .borders(Borders::ALL)
        .border_style(Theme::border())
}
