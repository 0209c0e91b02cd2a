// src/tui/mod.rs — TUI dashboard module.
//
// Terminal dashboard for a support specialist, built with ratatui.
// Launch via `specialist-desk dashboard --specialist <ID>`.

pub mod app;
pub mod theme;
pub mod toggle;
pub mod widgets;

pub use app::run_dashboard;
