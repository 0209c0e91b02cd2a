// src/tui/theme.rs — Color scheme and style definitions for the TUI dashboard.

use ratatui::style::{Color, Modifier, Style};

use crate::presence::SpecialistStatus;

/// Desk palette.
pub struct Theme;

impl Theme {
    // ── Brand colors ─────────────────────────────────────────────
    pub const DESK_TEAL: Color = Color::Rgb(40, 180, 170);
    pub const DESK_WHITE: Color = Color::Rgb(240, 240, 240);
    pub const DESK_GREEN: Color = Color::Rgb(80, 200, 120);
    pub const DESK_RED: Color = Color::Rgb(230, 80, 80);
    pub const DESK_YELLOW: Color = Color::Rgb(230, 200, 60);
    pub const DESK_GRAY: Color = Color::Rgb(120, 120, 140);
    pub const DESK_DIM: Color = Color::Rgb(80, 80, 100);
    pub const ACTIVE_BG: Color = Color::Rgb(30, 70, 75);

    // ── Semantic styles ──────────────────────────────────────────

    /// Main title / header bar.
    pub fn header() -> Style {
        Style::default()
            .fg(Theme::DESK_TEAL)
            .add_modifier(Modifier::BOLD)
    }

    /// Block border (normal).
    pub fn border() -> Style {
        Style::default().fg(Theme::DESK_DIM)
    }

    /// Normal body text.
    pub fn text() -> Style {
        Style::default().fg(Theme::DESK_WHITE)
    }

    /// Dimmed / secondary text.
    pub fn text_dim() -> Style {
        Style::default().fg(Theme::DESK_GRAY)
    }

    /// Error indicator.
    pub fn error() -> Style {
        Style::default().fg(Theme::DESK_RED)
    }

    /// Avatar initial.
    pub fn avatar() -> Style {
        Style::default()
            .fg(Theme::DESK_WHITE)
            .bg(Theme::DESK_TEAL)
            .add_modifier(Modifier::BOLD)
    }

    /// The chat row the specialist has opened.
    pub fn chat_active() -> Style {
        Style::default()
            .bg(Theme::ACTIVE_BG)
            .fg(Theme::DESK_WHITE)
            .add_modifier(Modifier::BOLD)
    }

    /// Key hint in the footer.
    pub fn key_hint() -> Style {
        Style::default().fg(Theme::DESK_TEAL)
    }

    /// Description next to key hint.
    pub fn key_desc() -> Style {
        Style::default().fg(Theme::DESK_GRAY)
    }

    /// Presence indicator. Unrecognised statuses get no styling at all.
    pub fn status(status: SpecialistStatus) -> Style {
        match status {
            SpecialistStatus::Online => Style::default().fg(Theme::DESK_GREEN),
            SpecialistStatus::Busy => Style::default().fg(Theme::DESK_YELLOW),
            SpecialistStatus::Offline => Style::default().fg(Theme::DESK_GRAY),
            SpecialistStatus::Unknown => Style::default(),
        }
    }
}
