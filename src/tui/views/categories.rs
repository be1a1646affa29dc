//! Categories view: list shelf categories with their book counts, and
//! add, rename or delete them.

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};
use uuid::Uuid;

use crate::core::library::{Category, Library};
use crate::tui::events::NotificationLevel;
use crate::tui::services::Services;
use crate::tui::theme;
use crate::tui::widgets::input_buffer::InputBuffer;

use super::centered_fixed;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PromptKind {
    Add,
    Rename(Uuid),
}

struct NamePrompt {
    kind: PromptKind,
    input: InputBuffer,
}

pub struct CategoriesState {
    selected: usize,
    prompt: Option<NamePrompt>,
}

impl CategoriesState {
    pub fn new() -> Self {
        Self {
            selected: 0,
            prompt: None,
        }
    }

    pub fn has_prompt(&self) -> bool {
        self.prompt.is_some()
    }

    fn selected_category<'a>(&self, library: &'a Library) -> Option<&'a Category> {
        library.categories().get(self.selected)
    }

    pub fn handle_input(&mut self, event: &Event, services: &mut Services) -> bool {
        let Event::Key(KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            ..
        }) = event
        else {
            return false;
        };

        if self.prompt.is_some() {
            self.handle_prompt_input(*code, services);
            return true;
        }

        let count = services.library.categories().len();
        match (*modifiers, *code) {
            (KeyModifiers::NONE, KeyCode::Char('j') | KeyCode::Down) => {
                if self.selected + 1 < count {
                    self.selected += 1;
                }
                true
            }
            (KeyModifiers::NONE, KeyCode::Char('k') | KeyCode::Up) => {
                self.selected = self.selected.saturating_sub(1);
                true
            }
            (KeyModifiers::NONE, KeyCode::Char('a')) => {
                self.prompt = Some(NamePrompt {
                    kind: PromptKind::Add,
                    input: InputBuffer::new(),
                });
                true
            }
            (KeyModifiers::NONE, KeyCode::Char('r')) => {
                if let Some(category) = self.selected_category(&services.library) {
                    let mut input = InputBuffer::new();
                    input.set_text(category.name.clone());
                    self.prompt = Some(NamePrompt {
                        kind: PromptKind::Rename(category.id),
                        input,
                    });
                }
                true
            }
            (KeyModifiers::SHIFT, KeyCode::Char('D')) => {
                self.remove_selected(services);
                true
            }
            _ => false,
        }
    }

    fn handle_prompt_input(&mut self, code: KeyCode, services: &mut Services) {
        let Some(prompt) = &mut self.prompt else {
            return;
        };
        match code {
            KeyCode::Esc => self.prompt = None,
            KeyCode::Enter => {
                let name = prompt.input.text().to_string();
                let result = match prompt.kind {
                    PromptKind::Add => services.library.add_category(&name),
                    PromptKind::Rename(id) => services.library.rename_category(id, &name).map(|c| c.id),
                };
                match result {
                    Ok(id) => {
                        self.prompt = None;
                        if let Some(idx) = services.library.categories().iter().position(|c| c.id == id) {
                            self.selected = idx;
                        }
                        if services.save_library() {
                            services.notify(format!("Saved category \"{}\"", name.trim()), NotificationLevel::Success);
                        }
                    }
                    // Prompt stays open so the name can be corrected.
                    Err(e) => services.notify(e.to_string(), NotificationLevel::Warning),
                }
            }
            other => {
                prompt.input.edit(other);
            }
        }
    }

    fn remove_selected(&mut self, services: &mut Services) {
        let Some(id) = self.selected_category(&services.library).map(|c| c.id) else {
            return;
        };
        match services.library.remove_category(id) {
            Ok(category) => {
                if services.save_library() {
                    services.notify(format!("Removed category \"{}\"", category.name), NotificationLevel::Info);
                }
                let count = services.library.categories().len();
                self.selected = self.selected.min(count.saturating_sub(1));
            }
            Err(e) => services.notify(e.to_string(), NotificationLevel::Warning),
        }
    }

    // ── Rendering ────────────────────────────────────────────────────────

    pub fn render(&self, frame: &mut Frame, area: Rect, library: &Library) {
        let title = format!("Categories \u{b7} {}", library.categories().len());
        let block = theme::block_default(&title);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let [list, hints] =
            Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(inner);

        let lines: Vec<Line> = if library.categories().is_empty() {
            vec![
                Line::raw(""),
                Line::from(vec![
                    Span::raw("  No categories yet. Press "),
                    Span::styled("a", theme::key_hint()),
                    Span::raw(" to add one."),
                ]),
            ]
        } else {
            library
                .categories()
                .iter()
                .enumerate()
                .map(|(i, category)| {
                    let selected = i == self.selected;
                    let (marker, style) = if selected {
                        ("\u{25b8} ", theme::highlight())
                    } else {
                        ("  ", Style::default().fg(theme::TEXT))
                    };
                    let books = library.books_in_category(category.id);
                    Line::from(vec![
                        Span::styled(marker, Style::default().fg(theme::ACCENT)),
                        Span::styled(category.name.clone(), style),
                        Span::styled(format!("  {books} book(s)"), theme::muted()),
                    ])
                })
                .collect()
        };

        let scroll = self.selected.saturating_sub((list.height as usize).saturating_sub(1));
        frame.render_widget(Paragraph::new(lines).scroll((scroll as u16, 0)), list);

        frame.render_widget(
            Paragraph::new(Line::from(vec![
                Span::styled(" a", theme::key_hint()),
                Span::styled(":add  ", theme::muted()),
                Span::styled("r", theme::key_hint()),
                Span::styled(":rename  ", theme::muted()),
                Span::styled("D", theme::key_hint()),
                Span::styled(":delete (empty only)", theme::muted()),
            ])),
            hints,
        );

        if let Some(prompt) = &self.prompt {
            render_prompt(frame, area, prompt);
        }
    }
}

fn render_prompt(frame: &mut Frame, area: Rect, prompt: &NamePrompt) {
    let modal_area = centered_fixed(44, 4, area);
    let title = match prompt.kind {
        PromptKind::Add => " New category ",
        PromptKind::Rename(_) => " Rename category ",
    };
    let block = Block::default()
        .title(title)
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::ACCENT));

    let lines = vec![
        Line::from(vec![
            Span::styled(" \u{25b8} ", Style::default().fg(theme::ACCENT)),
            Span::styled(format!("{}_", prompt.input.text()), Style::default().fg(theme::TEXT)),
        ]),
        Line::from(vec![
            Span::styled(" Enter", theme::key_hint()),
            Span::styled(":save  ", theme::muted()),
            Span::styled("Esc", theme::key_hint()),
            Span::styled(":cancel", theme::muted()),
        ]),
    ];

    frame.render_widget(Clear, modal_area);
    frame.render_widget(Paragraph::new(lines).block(block), modal_area);
}
