// src/tui/app.rs — TUI application state, event loop, and rendering.

use std::future::Future;
use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyModifiers, MouseButton,
        MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, TableState},
    Frame, Terminal,
};
use tokio::sync::watch;

use crate::infra::config::Config;
use crate::presence::{ActiveChatsSource, LiveChatSession, PresenceClient};
use crate::session::{SessionController, SessionState};

use super::theme::Theme;
use super::toggle::Toggle;
use super::widgets::{chat_list, header, ActiveChatList, DashboardHeader};

/// How long quitting waits for the offline write before giving up.
const OFFLINE_GRACE: Duration = Duration::from_secs(3);

// ── App state ────────────────────────────────────────────────────

struct App {
    specialist_id: String,
    chats: Vec<LiveChatSession>,
    selected_chat_id: Option<String>,
    table_state: TableState,
    help: Toggle,
    refresh_error: Option<String>,
    last_refresh: Instant,
    /// Where the header and chat list were last drawn, for mouse hit-testing.
    header_area: Rect,
    chat_area: Rect,
}

impl App {
    fn new(specialist_id: String) -> Self {
        Self {
            specialist_id,
            chats: Vec::new(),
            selected_chat_id: None,
            table_state: TableState::default(),
            help: Toggle::default(),
            refresh_error: None,
            last_refresh: Instant::now(),
            header_area: Rect::default(),
            chat_area: Rect::default(),
        }
    }

    fn chat_list(&self) -> ActiveChatList<'_> {
        ActiveChatList::new(&self.chats, self.selected_chat_id.as_deref())
    }

    fn scroll_down(&mut self) {
        let len = self.chats.len();
        if len == 0 {
            return;
        }
        let i = match self.table_state.selected() {
            Some(i) => (i + 1).min(len - 1),
            None => 0,
        };
        self.table_state.select(Some(i));
    }

    fn scroll_up(&mut self) {
        if self.chats.is_empty() {
            return;
        }
        let i = match self.table_state.selected() {
            Some(i) => i.saturating_sub(1),
            None => 0,
        };
        self.table_state.select(Some(i));
    }

    fn select(&mut self, index: usize) {
        let mut picked = None;
        self.chat_list()
            .select(index, |id| picked = Some(id.to_string()));
        if let Some(id) = picked {
            tracing::debug!("Selected chat {}", id);
            self.table_state.select(Some(index));
            self.selected_chat_id = Some(id);
        }
    }

    async fn refresh(&mut self, source: &dyn ActiveChatsSource) {
        match source.active_chats(&self.specialist_id).await {
            Ok(chats) => {
                self.chats = chats;
                self.refresh_error = None;
                let cursor = match (self.chats.len(), self.table_state.selected()) {
                    (0, _) => None,
                    (len, Some(i)) => Some(i.min(len - 1)),
                    (_, None) => Some(0),
                };
                self.table_state.select(cursor);
            }
            Err(e) => {
                tracing::warn!("Failed to refresh active chats: {}", e);
                self.refresh_error = Some("Could not refresh chats".into());
            }
        }
        self.last_refresh = Instant::now();
    }
}

// ── Public entry point ───────────────────────────────────────────

/// Launch the TUI dashboard for one specialist. Returns when the user quits
/// (q / Esc / Ctrl-C), after the specialist has been marked offline.
pub async fn run_dashboard(
    presence: Arc<dyn PresenceClient>,
    chats: Arc<dyn ActiveChatsSource>,
    specialist_id: String,
    config: &Config,
) -> anyhow::Result<()> {
    let id = specialist_id.clone();
    with_presence(presence, &id, move |rx| async move {
        let mut app = App::new(specialist_id);
        app.refresh(chats.as_ref()).await;

        // Terminal setup
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let result = run_event_loop(&mut terminal, &mut app, rx, chats.as_ref(), config).await;
        let restored = restore_terminal(&mut terminal);
        result.and(restored)
    })
    .await
}

/// Bring `specialist_id` online, run `body` against the session state, then
/// take them offline again. The offline write is awaited (up to
/// `OFFLINE_GRACE`) whether `body` succeeds or fails.
async fn with_presence<F, Fut, T>(
    presence: Arc<dyn PresenceClient>,
    specialist_id: &str,
    body: F,
) -> anyhow::Result<T>
where
    F: FnOnce(watch::Receiver<SessionState>) -> Fut,
    Fut: Future<Output = anyhow::Result<T>>,
{
    let mut controller = SessionController::new(presence);
    // Nothing was active yet, so there is no previous offline write.
    drop(controller.set_specialist(specialist_id)?);

    let result = body(controller.subscribe()).await;

    if tokio::time::timeout(OFFLINE_GRACE, controller.deactivate().wait())
        .await
        .is_err()
    {
        tracing::warn!("Offline write still pending after {:?}", OFFLINE_GRACE);
    }

    result
}

fn restore_terminal(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
) -> anyhow::Result<()> {
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;
    Ok(())
}

async fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    rx: watch::Receiver<SessionState>,
    source: &dyn ActiveChatsSource,
    config: &Config,
) -> anyhow::Result<()> {
    let refresh_interval = Duration::from_secs(config.dashboard.refresh_interval_secs.max(1));

    loop {
        let state = rx.borrow().clone();
        terminal.draw(|f| render(f, app, &state))?;

        if app.last_refresh.elapsed() >= refresh_interval {
            app.refresh(source).await;
        }

        // Poll for events (250ms timeout for responsive refresh)
        let ready = tokio::task::block_in_place(|| event::poll(Duration::from_millis(250)))?;
        if !ready {
            continue;
        }

        match tokio::task::block_in_place(event::read)? {
            Event::Key(key) => {
                if key.code == KeyCode::Char('q')
                    || (key.code == KeyCode::Char('c')
                        && key.modifiers.contains(KeyModifiers::CONTROL))
                {
                    return Ok(());
                }

                match key.code {
                    KeyCode::Esc if app.help.is_open() => app.help.close(),
                    KeyCode::Esc => return Ok(()),
                    KeyCode::Down | KeyCode::Char('j') => app.scroll_down(),
                    KeyCode::Up | KeyCode::Char('k') => app.scroll_up(),
                    KeyCode::Enter => {
                        if let Some(index) = app.table_state.selected() {
                            app.select(index);
                        }
                    }
                    KeyCode::Char('?') => {
                        app.help.toggle();
                    }
                    KeyCode::Char('r') => app.refresh(source).await,
                    _ => {}
                }
            }
            Event::Mouse(mouse) if mouse.kind == MouseEventKind::Down(MouseButton::Left) => {
                let mut refresh = false;
                if let Some(specialist) = &state.specialist {
                    DashboardHeader::new(specialist, app.chats.len()).click(
                        app.header_area,
                        mouse.column,
                        mouse.row,
                        || refresh = true,
                    );
                }
                if refresh {
                    app.refresh(source).await;
                } else if let Some(index) =
                    app.chat_list()
                        .row_at(app.chat_area, &app.table_state, mouse.column, mouse.row)
                {
                    app.select(index);
                }
            }
            _ => {}
        }
    }
}

// ── Rendering ────────────────────────────────────────────────────

fn render(f: &mut Frame, app: &mut App, state: &SessionState) {
    let size = f.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Specialist header
            Constraint::Min(5),    // Chat list
            Constraint::Length(1), // Footer / key hints
        ])
        .split(size);

    app.header_area = chunks[0];
    render_header(f, chunks[0], app, state);
    if state.specialist.is_some() {
        app.chat_area = chunks[1];
        let list = ActiveChatList::new(&app.chats, app.selected_chat_id.as_deref());
        chat_list::render(f, chunks[1], &list, &mut app.table_state);
    } else {
        app.chat_area = Rect::default();
    }
    render_footer(f, chunks[2], app);

    if app.help.is_open() {
        render_help(f, size);
    }
}

fn render_header(f: &mut Frame, area: Rect, app: &App, state: &SessionState) {
    if let Some(specialist) = &state.specialist {
        header::render(f, area, &DashboardHeader::new(specialist, app.chats.len()));
        return;
    }

    let line = if let Some(error) = &state.error {
        Line::from(Span::styled(format!(" {error}"), Theme::error()))
    } else {
        Line::from(Span::styled(" Loading dashboard...", Theme::text_dim()))
    };
    let p = Paragraph::new(line).block(
        Block::default()
            .title(Span::styled(" Specialist Desk ", Theme::header()))
            .borders(Borders::ALL)
            .border_style(Theme::border()),
    );
    f.render_widget(p, area);
}

fn render_footer(f: &mut Frame, area: Rect, app: &App) {
    let mut spans = vec![
        Span::styled(" q", Theme::key_hint()),
        Span::styled(" quit  ", Theme::key_desc()),
        Span::styled("j/k/\u{2191}\u{2193}", Theme::key_hint()),
        Span::styled(" move  ", Theme::key_desc()),
        Span::styled("Enter", Theme::key_hint()),
        Span::styled(" open  ", Theme::key_desc()),
        Span::styled("r", Theme::key_hint()),
        Span::styled(" refresh  ", Theme::key_desc()),
        Span::styled("?", Theme::key_hint()),
        Span::styled(" help", Theme::key_desc()),
    ];
    if let Some(err) = &app.refresh_error {
        spans.push(Span::styled(format!("   {err}"), Theme::error()));
    }

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_help(f: &mut Frame, area: Rect) {
    let popup = centered(area, 44, 9);
    let lines = vec![
        Line::from(Span::styled(" j / k / arrows  move cursor", Theme::text())),
        Line::from(Span::styled(" Enter / click   open chat", Theme::text())),
        Line::from(Span::styled(" r               refresh chats", Theme::text())),
        Line::from(Span::styled(" ? / Esc         close this help", Theme::text())),
        Line::from(Span::styled(
            " q / Esc         go offline and quit",
            Theme::text(),
        )),
    ];
    f.render_widget(Clear, popup);
    f.render_widget(
        Paragraph::new(lines).block(
            Block::default()
                .title(Span::styled(" Keys ", Theme::header()))
                .borders(Borders::ALL)
                .border_style(Theme::border()),
        ),
        popup,
    );
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presence::memory::MemoryPresence;
    use crate::presence::SpecialistStatus;

    #[tokio::test]
    async fn test_refresh_loads_chats_in_order() {
        let backend = MemoryPresence::demo("s1");
        let mut app = App::new("s1".into());
        app.refresh(&backend).await;
        assert_eq!(app.chats.len(), 2);
        assert_eq!(app.chats[0].id, "chat-1001");
        assert_eq!(app.table_state.selected(), Some(0));
        assert!(app.refresh_error.is_none());
    }

    #[tokio::test]
    async fn test_select_sets_selected_and_cursor() {
        let backend = MemoryPresence::demo("s1");
        let mut app = App::new("s1".into());
        app.refresh(&backend).await;
        app.select(1);
        assert_eq!(app.selected_chat_id.as_deref(), Some("chat-1002"));
        assert_eq!(app.table_state.selected(), Some(1));

        // Out of range leaves the selection alone.
        app.select(9);
        assert_eq!(app.selected_chat_id.as_deref(), Some("chat-1002"));
        assert_eq!(app.table_state.selected(), Some(1));
    }

    #[tokio::test]
    async fn test_stale_selection_survives_refresh() {
        let backend = MemoryPresence::demo("s1");
        let mut app = App::new("s1".into());
        app.refresh(&backend).await;
        app.select(1);

        backend.set_chats("s1", Vec::new());
        app.refresh(&backend).await;
        assert_eq!(app.selected_chat_id.as_deref(), Some("chat-1002"));
        assert_eq!(app.table_state.selected(), None);
        assert!(app.chat_list().rows().is_empty());
    }

    #[test]
    fn test_scroll_on_empty_list_keeps_no_cursor() {
        let mut app = App::new("s1".into());
        app.scroll_up();
        assert_eq!(app.table_state.selected(), None);
        app.scroll_down();
        assert_eq!(app.table_state.selected(), None);
    }

    #[tokio::test]
    async fn test_scroll_clamps_to_list() {
        let backend = MemoryPresence::demo("s1");
        let mut app = App::new("s1".into());
        app.refresh(&backend).await;
        app.scroll_down();
        app.scroll_down();
        assert_eq!(app.table_state.selected(), Some(1));
        app.scroll_up();
        app.scroll_up();
        assert_eq!(app.table_state.selected(), Some(0));
    }

    #[tokio::test]
    async fn test_offline_written_when_dashboard_fails() {
        let backend = Arc::new(MemoryPresence::demo("s1"));
        let result: anyhow::Result<()> = with_presence(backend.clone(), "s1", |_| async {
            Err(anyhow::anyhow!("terminal unavailable"))
        })
        .await;

        assert_eq!(result.unwrap_err().to_string(), "terminal unavailable");
        let log = backend.status_log();
        assert_eq!(
            log.last(),
            Some(&("s1".to_string(), SpecialistStatus::Offline))
        );
        assert_eq!(backend.status_of("s1"), Some(SpecialistStatus::Offline));
    }

    #[tokio::test]
    async fn test_offline_written_after_clean_exit() {
        let backend = Arc::new(MemoryPresence::demo("s1"));
        let name = with_presence(backend.clone(), "s1", |mut rx| async move {
            let state = rx.wait_for(|s| !s.loading).await?.clone();
            Ok(state.specialist.map(|s| (s.name, s.status)))
        })
        .await
        .unwrap();

        assert_eq!(
            name,
            Some(("demo specialist".to_string(), SpecialistStatus::Online))
        );
        assert_eq!(
            backend.status_log(),
            vec![
                ("s1".to_string(), SpecialistStatus::Online),
                ("s1".to_string(), SpecialistStatus::Offline),
            ]
        );
    }

    #[tokio::test]
    async fn test_invalid_id_never_runs_dashboard() {
        let backend = Arc::new(MemoryPresence::demo("s1"));
        let mut ran = false;
        let result = with_presence(backend.clone(), "  ", |_| {
            ran = true;
            async { Ok(()) }
        })
        .await;

        assert!(result.is_err());
        assert!(!ran);
        assert!(backend.status_log().is_empty());
    }

    #[test]
    fn test_centered_clamps_to_area() {
        let r = centered(Rect::new(0, 0, 20, 5), 44, 9);
        assert_eq!(r, Rect::new(0, 0, 20, 5));
        let r = centered(Rect::new(0, 0, 100, 40), 44, 9);
        assert_eq!(r, Rect::new(28, 15, 44, 9));
    }
}
