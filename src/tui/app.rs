use std::io;
use std::time::Duration;

use crossterm::event::{
    Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEventKind,
};
use futures::StreamExt;
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame, Terminal,
};
use tokio::sync::mpsc;

use super::events::{Action, AppEvent, AreaFocus, Focus, Notification, NotificationLevel};
use super::layout::AppLayout;
use super::services::Services;
use super::sidebar::SidebarState;
use super::theme;
use super::views::categories::CategoriesState;
use super::views::chart::ChartState;
use super::views::shelf::ShelfState;

/// Central application state (Elm architecture).
pub struct AppState {
    pub running: bool,
    /// Currently focused top-level view.
    pub focus: Focus,
    /// Whether sidebar or main content has input focus.
    pub area_focus: AreaFocus,
    pub sidebar: SidebarState,
    pub shelf: ShelfState,
    pub chart: ChartState,
    pub categories: CategoriesState,
    /// Active notifications (max 3 visible).
    pub notifications: Vec<Notification>,
    notification_counter: u64,
    pub show_help: bool,
    /// Receiver for events pushed by views and services.
    event_rx: mpsc::UnboundedReceiver<AppEvent>,
    services: Services,
}

impl AppState {
    pub fn new(event_rx: mpsc::UnboundedReceiver<AppEvent>, services: Services) -> Self {
        Self {
            running: true,
            focus: Focus::Shelf,
            area_focus: AreaFocus::Main,
            sidebar: SidebarState::new(),
            shelf: ShelfState::new(services.shelf_order),
            chart: ChartState::new(),
            categories: CategoriesState::new(),
            notifications: Vec::new(),
            notification_counter: 0,
            show_help: false,
            event_rx,
            services,
        }
    }

    // ── Elm event loop ──────────────────────────────────────────────────

    /// Main event loop: render → select → update → loop.
    pub async fn run(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
        tick_rate: Duration,
    ) -> io::Result<()> {
        let mut tick_interval = tokio::time::interval(tick_rate);
        let mut event_stream = EventStream::new();

        while self.running {
            terminal.draw(|frame| self.render(frame))?;

            tokio::select! {
                _ = tick_interval.tick() => {
                    self.on_tick();
                }
                Some(event) = self.event_rx.recv() => {
                    self.handle_event(event);
                }
                Some(Ok(crossterm_event)) = event_stream.next() => {
                    self.handle_event(AppEvent::Input(crossterm_event));
                }
            }
        }

        Ok(())
    }

    // ── Event handling ──────────────────────────────────────────────────

    fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::Input(crossterm_event) => {
                let crossterm_event = translate_mouse(crossterm_event);

                // Priority 1: Help modal
                if self.show_help {
                    if let Some(action) = self.map_help_input(&crossterm_event) {
                        self.handle_action(action);
                    }
                    return;
                }

                // Priority 2: Sidebar input (when focused)
                if self.area_focus == AreaFocus::Sidebar
                    && self.handle_sidebar_input(&crossterm_event)
                {
                    return;
                }

                // Priority 3: Focused view
                if self.dispatch_view_input(&crossterm_event) {
                    return;
                }

                // Priority 4: Global keybindings
                if let Some(action) = self.map_input_to_action(crossterm_event) {
                    self.handle_action(action);
                }
            }
            AppEvent::Action(action) => self.handle_action(action),
            AppEvent::Tick => self.on_tick(),
            AppEvent::Notification(notification) => {
                self.push_notification(notification.message, notification.level);
            }
            AppEvent::Quit => {
                self.running = false;
            }
        }
    }

    /// Dispatch input to the currently focused view. Returns true if consumed.
    fn dispatch_view_input(&mut self, event: &Event) -> bool {
        match self.focus {
            Focus::Shelf => self.shelf.handle_input(event, &mut self.services),
            Focus::Chart => self.chart.handle_input(event),
            Focus::Categories => self.categories.handle_input(event, &mut self.services),
        }
    }

    fn handle_sidebar_input(&mut self, event: &Event) -> bool {
        let Event::Key(KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            ..
        }) = event
        else {
            return false;
        };

        match code {
            KeyCode::Char('j') | KeyCode::Down => {
                self.sidebar.select_next();
                true
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.sidebar.select_prev();
                true
            }
            KeyCode::Enter | KeyCode::Char('l') => {
                let focus = self.sidebar.selected_focus();
                self.handle_action(focus.to_action());
                true
            }
            KeyCode::Char('h') => {
                self.sidebar.user_collapsed = true;
                self.area_focus = AreaFocus::Main;
                true
            }
            KeyCode::Esc => {
                self.area_focus = AreaFocus::Main;
                true
            }
            _ => false,
        }
    }

    // ── Input mapping ───────────────────────────────────────────────────

    fn map_help_input(&self, event: &Event) -> Option<Action> {
        let Event::Key(KeyEvent {
            code,
            kind: KeyEventKind::Press,
            ..
        }) = event
        else {
            return None;
        };
        match code {
            KeyCode::Esc | KeyCode::Char('?') => Some(Action::CloseHelp),
            _ => None,
        }
    }

    fn map_input_to_action(&self, event: Event) -> Option<Action> {
        let Event::Key(KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            ..
        }) = event
        else {
            return None;
        };

        match (modifiers, code) {
            (KeyModifiers::CONTROL, KeyCode::Char('b')) => Some(Action::ToggleSidebar),
            (KeyModifiers::CONTROL, KeyCode::Char('c')) => Some(Action::Quit),
            (KeyModifiers::NONE | KeyModifiers::SHIFT, _) => match code {
                KeyCode::Char('q') => Some(Action::Quit),
                KeyCode::Char('?') => Some(Action::ShowHelp),
                KeyCode::Char('n') => Some(Action::OpenAddBook),
                KeyCode::Tab => Some(Action::TabNext),
                KeyCode::BackTab => Some(Action::TabPrev),
                KeyCode::Char('1') => Some(Action::FocusShelf),
                KeyCode::Char('2') => Some(Action::FocusChart),
                KeyCode::Char('3') => Some(Action::FocusCategories),
                _ => None,
            },
            _ => None,
        }
    }

    fn handle_action(&mut self, action: Action) {
        match action {
            Action::Quit => self.running = false,
            Action::FocusShelf => self.set_focus(Focus::Shelf),
            Action::FocusChart => self.set_focus(Focus::Chart),
            Action::FocusCategories => self.set_focus(Focus::Categories),
            Action::TabNext => self.set_focus(self.focus.next()),
            Action::TabPrev => self.set_focus(self.focus.prev()),
            Action::ToggleSidebar => {
                self.sidebar.toggle_collapse();
                if !self.sidebar.user_collapsed {
                    self.area_focus = AreaFocus::Sidebar;
                    self.sidebar.sync_to_focus(self.focus);
                } else {
                    self.area_focus = AreaFocus::Main;
                }
            }
            Action::ShowHelp => self.show_help = true,
            Action::CloseHelp => self.show_help = false,
            Action::OpenAddBook => {
                self.set_focus(Focus::Shelf);
                self.shelf.open_add_book(&self.services);
            }
        }
    }

    fn set_focus(&mut self, focus: Focus) {
        self.focus = focus;
        self.sidebar.sync_to_focus(focus);
        self.area_focus = AreaFocus::Main;
    }

    // ── Notifications ───────────────────────────────────────────────────

    /// Push a notification (dedup by message, max 3).
    pub fn push_notification(&mut self, message: String, level: NotificationLevel) {
        if self.notifications.iter().any(|n| n.message == message) {
            return;
        }

        self.notification_counter += 1;
        let mut notification = Notification::new(message, level);
        notification.id = self.notification_counter;
        self.notifications.push(notification);

        while self.notifications.len() > 3 {
            self.notifications.remove(0);
        }
    }

    /// Tick: expire notifications and drive the autofill controller.
    fn on_tick(&mut self) {
        for n in &mut self.notifications {
            n.ttl_ticks = n.ttl_ticks.saturating_sub(1);
        }
        self.notifications.retain(|n| n.ttl_ticks > 0);

        self.shelf.poll();
    }

    // ── Rendering ───────────────────────────────────────────────────────

    fn render(&self, frame: &mut Frame) {
        let area = frame.area();
        let (layout, visibility) = AppLayout::compute(area, self.sidebar.user_collapsed);

        self.render_title(frame, layout.title);
        if let Some(sidebar_area) = layout.sidebar {
            self.sidebar
                .render(frame, sidebar_area, visibility, self.focus, self.area_focus);
        }

        let library = &self.services.library;
        match self.focus {
            Focus::Shelf => self.shelf.render(frame, layout.main, library),
            Focus::Chart => self.chart.render(frame, layout.main, library),
            Focus::Categories => self.categories.render(frame, layout.main, library),
        }

        self.render_status_bar(frame, layout.status);
        self.render_notifications(frame, area);

        if self.show_help {
            self.render_help_modal(frame, area);
        }
    }

    fn render_title(&self, frame: &mut Frame, area: Rect) {
        let library = &self.services.library;
        let reading = library.books().iter().filter(|b| !b.is_completed()).count();
        let finished = library.completed().len();
        let line = Line::from(vec![
            Span::styled(" pagetrail ", theme::brand_badge()),
            Span::styled(
                format!("  {reading} reading \u{b7} {finished} finished"),
                theme::muted(),
            ),
        ]);
        frame.render_widget(Paragraph::new(line), area);
    }

    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        let status = Line::from(vec![
            Span::raw(" "),
            Span::styled(
                self.focus.label(),
                Style::default()
                    .fg(theme::PRIMARY_LIGHT)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(" \u{2502} "),
            Span::styled("a", theme::key_hint()),
            Span::raw(":add "),
            Span::styled("l", theme::key_hint()),
            Span::raw(":log "),
            Span::styled("Tab", theme::key_hint()),
            Span::raw(":view "),
            Span::styled("Ctrl+B", theme::key_hint()),
            Span::raw(":sidebar "),
            Span::styled("?", theme::key_hint()),
            Span::raw(":help "),
            Span::styled("q", theme::key_hint()),
            Span::raw(":quit"),
        ]);

        frame.render_widget(Paragraph::new(status).style(theme::muted()), area);
    }

    fn render_notifications(&self, frame: &mut Frame, area: Rect) {
        if self.notifications.is_empty() {
            return;
        }

        let max_width = 50.min(area.width.saturating_sub(2));
        let height = self.notifications.len() as u16;
        let x = area.width.saturating_sub(max_width + 1);
        let notification_area = Rect::new(x, 1, max_width, height.min(area.height));

        let lines: Vec<Line> = self
            .notifications
            .iter()
            .map(|n| {
                let (prefix, color) = match n.level {
                    NotificationLevel::Info => ("\u{2139}", theme::INFO),
                    NotificationLevel::Success => ("\u{2713}", theme::SUCCESS),
                    NotificationLevel::Warning => ("\u{26a0}", theme::WARNING),
                    NotificationLevel::Error => ("\u{2717}", theme::ERROR),
                };
                Line::from(vec![
                    Span::styled(
                        format!(" {prefix} "),
                        Style::default().fg(color).add_modifier(Modifier::BOLD),
                    ),
                    Span::raw(n.message.as_str()),
                ])
            })
            .collect();

        frame.render_widget(Clear, notification_area);
        frame.render_widget(Paragraph::new(lines), notification_area);
    }

    fn render_help_modal(&self, frame: &mut Frame, area: Rect) {
        let modal = centered_rect(60, 80, area);

        let keybindings = [
            ("Global:", ""),
            ("q / Ctrl+C", "Quit"),
            ("?", "Toggle this help"),
            ("Tab / Shift+Tab", "Next / previous view"),
            ("1-3", "Jump to view"),
            ("n", "Add a book"),
            ("Ctrl+B", "Toggle sidebar"),
            ("", ""),
            ("Shelf:", ""),
            ("j/k", "Move selection"),
            ("a", "Add a book"),
            ("l", "Log pages read today"),
            ("u", "Undo today's entry"),
            ("D", "Remove book"),
            ("/", "Filter: text author:x min:n max:n"),
            ("s", "All / reading / completed"),
            ("g", "Cycle category filter"),
            ("o", "Cycle sort order"),
            ("x", "Clear filters"),
            ("+/-", "Rate selected book"),
            ("", ""),
            ("Add book:", ""),
            ("Tab", "Search \u{2192} results \u{2192} form"),
            ("Enter", "Pick highlighted result"),
            ("c", "Change selection"),
            ("\u{2190}/\u{2192}", "Pick existing category"),
            ("Ctrl+S", "Save book"),
            ("Esc", "Close"),
            ("", ""),
            ("Daily pages:", ""),
            ("h/l", "Previous / next month"),
            ("t", "This month"),
            ("", ""),
            ("Categories:", ""),
            ("a / r", "Add / rename"),
            ("D", "Delete an empty category"),
        ];

        let mut lines = vec![
            Line::raw(""),
            Line::from(Span::styled(" Keybindings", theme::title())),
            Line::raw(""),
        ];

        for (key, desc) in keybindings {
            if key.is_empty() {
                lines.push(Line::raw(""));
            } else if desc.is_empty() {
                lines.push(Line::from(Span::styled(format!("  {key}"), theme::title())));
            } else {
                lines.push(Line::from(vec![
                    Span::raw("  "),
                    Span::styled(format!("{key:<18}"), theme::key_hint()),
                    Span::raw(desc),
                ]));
            }
        }

        let block = Block::default()
            .title(" Help ")
            .title_alignment(Alignment::Center)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::ACCENT));

        frame.render_widget(Clear, modal);
        frame.render_widget(Paragraph::new(lines).block(block), modal);
    }
}

/// Mouse wheel scrolls like the arrow keys.
fn translate_mouse(event: Event) -> Event {
    match event {
        Event::Mouse(mouse) => match mouse.kind {
            MouseEventKind::ScrollDown => Event::Key(KeyEvent::new(KeyCode::Down, KeyModifiers::NONE)),
            MouseEventKind::ScrollUp => Event::Key(KeyEvent::new(KeyCode::Up, KeyModifiers::NONE)),
            _ => Event::Mouse(mouse),
        },
        other => other,
    }
}

/// Calculate a centered rect using percentage of parent area.
pub(super) fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::vertical([
        Constraint::Percentage((100 - percent_y) / 2),
        Constraint::Percentage(percent_y),
        Constraint::Percentage((100 - percent_y) / 2),
    ])
    .split(area);

    Layout::horizontal([
        Constraint::Percentage((100 - percent_x) / 2),
        Constraint::Percentage(percent_x),
        Constraint::Percentage((100 - percent_x) / 2),
    ])
    .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::mocks::ScriptedLookup;
    use std::sync::Arc;

    fn app() -> AppState {
        let (services, event_rx) = Services::for_test(Arc::new(ScriptedLookup::new()));
        AppState::new(event_rx, services)
    }

    fn key(code: KeyCode, modifiers: KeyModifiers) -> AppEvent {
        AppEvent::Input(Event::Key(KeyEvent::new(code, modifiers)))
    }

    #[tokio::test]
    async fn test_ctrl_b_toggles_sidebar_focus() {
        let mut app = app();
        app.handle_event(key(KeyCode::Char('b'), KeyModifiers::CONTROL));
        assert!(app.sidebar.user_collapsed);
        assert_eq!(app.area_focus, AreaFocus::Main);

        app.handle_event(key(KeyCode::Char('b'), KeyModifiers::CONTROL));
        assert!(!app.sidebar.user_collapsed);
        assert_eq!(app.area_focus, AreaFocus::Sidebar);
    }

    #[tokio::test]
    async fn test_tab_cycles_views() {
        let mut app = app();
        app.handle_event(key(KeyCode::Tab, KeyModifiers::NONE));
        assert_eq!(app.focus, Focus::Chart);
        assert_eq!(app.sidebar.selected_focus(), Focus::Chart);
        app.handle_event(key(KeyCode::Tab, KeyModifiers::NONE));
        assert_eq!(app.focus, Focus::Categories);
        app.handle_event(key(KeyCode::Tab, KeyModifiers::NONE));
        assert_eq!(app.focus, Focus::Shelf);
        app.handle_event(key(KeyCode::BackTab, KeyModifiers::SHIFT));
        assert_eq!(app.focus, Focus::Categories);
    }

    #[tokio::test]
    async fn test_category_prompt_swallows_global_keys() {
        let mut app = app();
        app.handle_event(key(KeyCode::Char('3'), KeyModifiers::NONE));
        assert_eq!(app.focus, Focus::Categories);
        app.handle_event(key(KeyCode::Char('a'), KeyModifiers::NONE));
        assert!(app.categories.has_prompt());

        // '1' and 'q' are part of the name being typed.
        for c in "q1".chars() {
            app.handle_event(key(KeyCode::Char(c), KeyModifiers::NONE));
        }
        assert!(app.running);
        assert_eq!(app.focus, Focus::Categories);
        app.handle_event(key(KeyCode::Enter, KeyModifiers::NONE));
        assert_eq!(app.services.category_names(), vec!["q1"]);
    }

    #[tokio::test]
    async fn test_add_book_modal_swallows_global_keys() {
        let mut app = app();
        app.handle_event(key(KeyCode::Char('a'), KeyModifiers::NONE));
        assert!(app.shelf.has_modal());

        // 'q' is typed into the search box, not treated as quit.
        app.handle_event(key(KeyCode::Char('q'), KeyModifiers::NONE));
        assert!(app.running);

        app.handle_event(key(KeyCode::Esc, KeyModifiers::NONE));
        assert!(!app.shelf.has_modal());
        assert_eq!(app.focus, Focus::Shelf);
    }

    #[tokio::test]
    async fn test_notifications_dedup_and_cap() {
        let mut app = app();
        app.push_notification("one".into(), NotificationLevel::Info);
        app.push_notification("one".into(), NotificationLevel::Info);
        assert_eq!(app.notifications.len(), 1);
        for msg in ["two", "three", "four"] {
            app.push_notification(msg.into(), NotificationLevel::Info);
        }
        assert_eq!(app.notifications.len(), 3);
        assert_eq!(app.notifications[0].message, "two");
    }

    #[tokio::test]
    async fn test_help_modal_captures_input() {
        let mut app = app();
        app.handle_event(key(KeyCode::Char('?'), KeyModifiers::NONE));
        assert!(app.show_help);
        app.handle_event(key(KeyCode::Char('q'), KeyModifiers::NONE));
        assert!(app.running);
        app.handle_event(key(KeyCode::Esc, KeyModifiers::NONE));
        assert!(!app.show_help);
    }

    #[test]
    fn test_centered_rect() {
        let area = Rect::new(0, 0, 100, 50);
        let centered = centered_rect(50, 50, area);
        assert!(centered.x > 0);
        assert!(centered.y > 0);
        assert!(centered.x + centered.width <= area.width);
        assert!(centered.y + centered.height <= area.height);
    }
}
