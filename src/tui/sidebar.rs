//! Collapsible left sidebar listing the top-level views.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use super::events::{AreaFocus, Focus};
use super::layout::SidebarVisibility;
use super::theme;

pub struct SidebarState {
    /// Whether the user has toggled collapse (Ctrl+B).
    pub user_collapsed: bool,
    /// Highlighted index into `Focus::ALL`.
    pub selected: usize,
}

impl SidebarState {
    pub fn new() -> Self {
        Self {
            user_collapsed: false,
            selected: 0,
        }
    }

    pub fn toggle_collapse(&mut self) {
        self.user_collapsed = !self.user_collapsed;
    }

    pub fn select_next(&mut self) {
        self.selected = (self.selected + 1) % Focus::ALL.len();
    }

    pub fn select_prev(&mut self) {
        self.selected = (self.selected + Focus::ALL.len() - 1) % Focus::ALL.len();
    }

    pub fn selected_focus(&self) -> Focus {
        Focus::ALL[self.selected % Focus::ALL.len()]
    }

    /// Follow the active view after Tab navigation.
    pub fn sync_to_focus(&mut self, focus: Focus) {
        if let Some(idx) = Focus::ALL.iter().position(|&f| f == focus) {
            self.selected = idx;
        }
    }

    pub fn render(
        &self,
        frame: &mut Frame,
        area: Rect,
        visibility: SidebarVisibility,
        current_focus: Focus,
        area_focus: AreaFocus,
    ) {
        let expanded = match visibility {
            SidebarVisibility::Hidden => return,
            SidebarVisibility::Collapsed => false,
            SidebarVisibility::Expanded => true,
        };
        let sidebar_focused = area_focus == AreaFocus::Sidebar;

        let mut lines: Vec<Line> = Vec::new();
        if expanded {
            lines.push(Line::from(Span::styled(" Reading", theme::heading())));
        }

        for (idx, view) in Focus::ALL.into_iter().enumerate() {
            let is_current = view == current_focus;
            let is_selected = sidebar_focused && idx == self.selected;

            let style = match (is_selected, is_current) {
                (_, true) => Style::default()
                    .fg(theme::ACCENT)
                    .add_modifier(Modifier::BOLD),
                (true, false) => Style::default()
                    .fg(theme::TEXT)
                    .add_modifier(Modifier::BOLD),
                (false, false) => theme::muted(),
            };
            let prefix = if is_selected { "\u{25b8}" } else { " " };

            let text = if expanded {
                let label = format!("{prefix} {} {}", view.icon(), view.label());
                format!("{:<width$}", label, width = area.width as usize)
            } else {
                format!("{prefix}{}", view.icon())
            };
            lines.push(Line::from(Span::styled(text, style)));
        }

        lines.truncate(area.height as usize);
        frame.render_widget(
            Paragraph::new(lines).style(Style::default().bg(theme::BG_SURFACE)),
            area,
        );
    }
}
