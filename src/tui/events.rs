/// Events flowing through the Elm-architecture event loop.
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// Periodic tick for debounce deadlines, notification TTLs, etc.
    Tick,
    /// Raw terminal input (keyboard/mouse).
    Input(crossterm::event::Event),
    /// A resolved action to execute.
    Action(Action),
    /// Notification to display to the user.
    Notification(Notification),
    /// Request to quit the application.
    Quit,
}

/// High-level actions dispatched by the input mapper.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    // Navigation
    FocusShelf,
    FocusChart,
    FocusCategories,
    TabNext,
    TabPrev,
    ToggleSidebar,

    // Modals
    ShowHelp,
    CloseHelp,
    OpenAddBook,

    // Application
    Quit,
}

/// Which top-level view has focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Focus {
    Shelf,
    Chart,
    Categories,
}

impl Focus {
    pub const ALL: [Focus; 3] = [Focus::Shelf, Focus::Chart, Focus::Categories];

    pub fn label(self) -> &'static str {
        match self {
            Focus::Shelf => "Shelf",
            Focus::Chart => "Daily pages",
            Focus::Categories => "Categories",
        }
    }

    /// Single-char icon for the collapsed sidebar.
    pub fn icon(self) -> &'static str {
        match self {
            Focus::Shelf => "\u{1f4da}",
            Focus::Chart => "\u{1f4ca}",
            Focus::Categories => "\u{1f3f7}",
        }
    }

    pub fn to_action(self) -> Action {
        match self {
            Focus::Shelf => Action::FocusShelf,
            Focus::Chart => Action::FocusChart,
            Focus::Categories => Action::FocusCategories,
        }
    }

    pub fn next(self) -> Focus {
        let idx = Focus::ALL.iter().position(|&f| f == self).unwrap_or(0);
        Focus::ALL[(idx + 1) % Focus::ALL.len()]
    }

    pub fn prev(self) -> Focus {
        let idx = Focus::ALL.iter().position(|&f| f == self).unwrap_or(0);
        Focus::ALL[(idx + Focus::ALL.len() - 1) % Focus::ALL.len()]
    }
}

/// Whether the sidebar or the main content receives keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AreaFocus {
    Main,
    Sidebar,
}

/// Notification level for the overlay system.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// A timed notification shown in the overlay.
#[derive(Debug, Clone)]
pub struct Notification {
    pub id: u64,
    pub message: String,
    pub level: NotificationLevel,
    /// Ticks remaining before auto-dismiss.
    pub ttl_ticks: u32,
}

impl Notification {
    /// A notification to be numbered by the app state on arrival.
    pub fn new(message: impl Into<String>, level: NotificationLevel) -> Self {
        Self {
            id: 0,
            message: message.into(),
            level,
            ttl_ticks: 100,
        }
    }
}
