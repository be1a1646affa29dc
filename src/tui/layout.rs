//! Frame layout: title row, sidebar + main content, status row.

use ratatui::layout::{Constraint, Layout, Rect};

/// Width of the expanded sidebar (header + labeled items).
pub const SIDEBAR_EXPANDED_WIDTH: u16 = 18;
/// Width of the collapsed sidebar (icons only).
pub const SIDEBAR_COLLAPSED_WIDTH: u16 = 4;
/// Auto-collapse sidebar below this terminal width.
pub const AUTO_COLLAPSE_THRESHOLD: u16 = 60;
/// Hide sidebar entirely below this terminal width.
pub const HIDE_SIDEBAR_THRESHOLD: u16 = 24;

/// Sidebar visibility state derived from terminal width and user preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SidebarVisibility {
    Expanded,
    Collapsed,
    Hidden,
}

impl SidebarVisibility {
    /// `user_collapsed` is the Ctrl+B preference; narrow terminals override it.
    pub fn resolve(width: u16, user_collapsed: bool) -> Self {
        if width < HIDE_SIDEBAR_THRESHOLD {
            SidebarVisibility::Hidden
        } else if user_collapsed || width < AUTO_COLLAPSE_THRESHOLD {
            SidebarVisibility::Collapsed
        } else {
            SidebarVisibility::Expanded
        }
    }

    fn width(self) -> u16 {
        match self {
            SidebarVisibility::Expanded => SIDEBAR_EXPANDED_WIDTH,
            SidebarVisibility::Collapsed => SIDEBAR_COLLAPSED_WIDTH,
            SidebarVisibility::Hidden => 0,
        }
    }
}

/// Computed layout regions for a single frame.
pub struct AppLayout {
    pub title: Rect,
    /// None if hidden.
    pub sidebar: Option<Rect>,
    pub main: Rect,
    pub status: Rect,
}

impl AppLayout {
    pub fn compute(area: Rect, user_collapsed: bool) -> (Self, SidebarVisibility) {
        let visibility = SidebarVisibility::resolve(area.width, user_collapsed);

        let [title, content, status] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .areas(area);

        let (sidebar, main) = match visibility {
            SidebarVisibility::Hidden => (None, content),
            shown => {
                let [side, main] = Layout::horizontal([
                    Constraint::Length(shown.width()),
                    Constraint::Min(1),
                ])
                .areas(content);
                (Some(side), main)
            }
        };

        (
            AppLayout {
                title,
                sidebar,
                main,
                status,
            },
            visibility,
        )
    }
}
