//! Add-book modal: search box, results surface and the dependent form,
//! driven by the autofill controller.

use std::sync::Arc;

use crossterm::event::{KeyCode, KeyModifiers};
use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::core::autofill::{AutofillController, AutofillPolicy, BookForm, FormField, ResultsView};
use crate::core::books::{BookLookup, Candidate};
use crate::core::library::NewBook;
use crate::tui::theme;
use crate::tui::widgets::input_buffer::InputBuffer;

use super::centered_fixed;

/// Form fields reachable with the cursor. The rest are carried metadata.
fn editable_fields() -> Vec<FormField> {
    FormField::ALL
        .into_iter()
        .filter(|f| !f.is_metadata())
        .collect()
}

/// Which part of the modal has keyboard focus.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Zone {
    Search,
    Results,
    Form,
}

impl Zone {
    fn next(self) -> Self {
        match self {
            Zone::Search => Zone::Results,
            Zone::Results => Zone::Form,
            Zone::Form => Zone::Search,
        }
    }

    fn prev(self) -> Self {
        match self {
            Zone::Search => Zone::Form,
            Zone::Results => Zone::Search,
            Zone::Form => Zone::Results,
        }
    }
}

/// What the shelf should do after a key reached the modal.
#[derive(Debug, PartialEq, Eq)]
pub enum ModalOutcome {
    Consumed,
    Close,
    Submit(NewBook),
}

pub struct AddBookModal {
    controller: AutofillController,
    search: InputBuffer,
    zone: Zone,
    /// Highlighted row in the candidate list.
    cursor: usize,
    field: FormField,
    field_input: InputBuffer,
    /// Existing category names offered on the category field.
    categories: Vec<String>,
    error: Option<String>,
}

impl AddBookModal {
    pub fn new(lookup: Arc<dyn BookLookup>, policy: AutofillPolicy, categories: Vec<String>) -> Self {
        Self {
            controller: AutofillController::new(lookup, BookForm::full(), policy),
            search: InputBuffer::new(),
            zone: Zone::Search,
            cursor: 0,
            field: FormField::Title,
            field_input: InputBuffer::new(),
            categories,
            error: None,
        }
    }

    pub fn controller(&self) -> &AutofillController {
        &self.controller
    }

    #[cfg(test)]
    pub(crate) fn controller_mut(&mut self) -> &mut AutofillController {
        &mut self.controller
    }

    pub fn zone(&self) -> Zone {
        self.zone
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Fire due lookups and apply finished ones. Called every tick.
    pub fn poll(&mut self) {
        self.controller.poll();
        let count = self.controller.candidates().len();
        if self.cursor >= count {
            self.cursor = count.saturating_sub(1);
        }
    }

    // ── Input ────────────────────────────────────────────────────────────

    pub fn handle_key(&mut self, code: KeyCode, modifiers: KeyModifiers) -> ModalOutcome {
        match (modifiers, code) {
            (KeyModifiers::CONTROL, KeyCode::Char('s')) => return self.submit(),
            (_, KeyCode::Esc) => return ModalOutcome::Close,
            (KeyModifiers::NONE, KeyCode::Tab) => {
                self.set_zone(self.zone.next());
                return ModalOutcome::Consumed;
            }
            (_, KeyCode::BackTab) => {
                self.set_zone(self.zone.prev());
                return ModalOutcome::Consumed;
            }
            _ => {}
        }

        match self.zone {
            Zone::Search => self.handle_search_key(code),
            Zone::Results => self.handle_results_key(code),
            Zone::Form => self.handle_form_key(code),
        }
        ModalOutcome::Consumed
    }

    fn handle_search_key(&mut self, code: KeyCode) {
        let locked = self.controller.search_box().locked;
        match code {
            KeyCode::Down | KeyCode::Enter => {
                if self.controller.results_view().shows_candidates() || locked {
                    self.set_zone(Zone::Results);
                }
            }
            KeyCode::Char('c') if locked => self.change_selection(),
            _ if locked => {}
            _ => {
                if self.search.edit(code) {
                    self.controller.on_input(self.search.text());
                }
            }
        }
    }

    fn handle_results_key(&mut self, code: KeyCode) {
        let count = self.controller.candidates().len();
        match code {
            KeyCode::Char('j') | KeyCode::Down => {
                if self.cursor + 1 < count {
                    self.cursor += 1;
                }
            }
            KeyCode::Char('k') | KeyCode::Up => {
                if self.cursor == 0 {
                    self.set_zone(Zone::Search);
                } else {
                    self.cursor -= 1;
                }
            }
            KeyCode::Enter if self.controller.results_view().shows_candidates() => {
                if self.controller.on_select(self.cursor) {
                    self.search.set_text(self.controller.search_box().text.clone());
                    self.error = None;
                    self.set_zone(Zone::Form);
                }
            }
            KeyCode::Char('c') if self.controller.selected().is_some() => self.change_selection(),
            _ => {}
        }
    }

    fn handle_form_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Up => self.move_field(-1),
            KeyCode::Down | KeyCode::Enter => self.move_field(1),
            KeyCode::Left if self.offers_categories() => self.cycle_category(-1),
            KeyCode::Right if self.offers_categories() => self.cycle_category(1),
            _ => {
                if self.controller.form().is_locked(self.field) {
                    if matches!(code, KeyCode::Char(_) | KeyCode::Backspace | KeyCode::Delete) {
                        self.error = Some(format!(
                            "{} comes from the selected book (c in results to change)",
                            self.field.label()
                        ));
                    }
                    return;
                }
                if self.field_input.edit(code) {
                    let text = self.field_input.text().to_string();
                    self.controller.form_mut().set_value(self.field, text);
                    self.error = None;
                }
            }
        }
    }

    fn offers_categories(&self) -> bool {
        self.field == FormField::Category && !self.categories.is_empty()
    }

    /// Step through existing category names from the one typed, if any.
    fn cycle_category(&mut self, delta: isize) {
        let current = self.field_input.text().trim();
        let len = self.categories.len() as isize;
        let next = match self
            .categories
            .iter()
            .position(|c| c.eq_ignore_ascii_case(current))
        {
            Some(idx) => (idx as isize + delta).rem_euclid(len),
            None if delta < 0 => len - 1,
            None => 0,
        };
        let name = self.categories[next as usize].clone();
        self.field_input.set_text(name.clone());
        self.controller.form_mut().set_value(FormField::Category, name);
        self.error = None;
    }

    fn change_selection(&mut self) {
        self.controller.on_change_selection();
        self.cursor = 0;
        self.set_zone(Zone::Search);
    }

    fn set_zone(&mut self, zone: Zone) {
        if zone == Zone::Form && self.zone != Zone::Form {
            // Focus left both the search box and the results surface.
            self.controller.on_click_outside();
            self.load_field();
        }
        self.zone = zone;
    }

    fn move_field(&mut self, delta: isize) {
        let editable = editable_fields();
        let idx = editable.iter().position(|f| *f == self.field).unwrap_or(0) as isize;
        let len = editable.len() as isize;
        self.field = editable[((idx + delta).rem_euclid(len)) as usize];
        self.load_field();
    }

    fn load_field(&mut self) {
        let value = self.controller.form().value(self.field).unwrap_or_default();
        self.field_input.set_text(value);
    }

    fn submit(&mut self) -> ModalOutcome {
        match self.controller.form().submit() {
            Ok(book) => ModalOutcome::Submit(book),
            Err(e) => {
                self.error = Some(e.to_string());
                ModalOutcome::Consumed
            }
        }
    }

    // ── Rendering ────────────────────────────────────────────────────────

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let modal_area = centered_fixed(76, 26, area);
        let block = Block::default()
            .title(" Add Book ")
            .title_alignment(Alignment::Center)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::ACCENT));
        let inner = block.inner(modal_area);

        frame.render_widget(Clear, modal_area);
        frame.render_widget(block, modal_area);

        let [search, results, form, footer] = Layout::vertical([
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(9),
            Constraint::Length(2),
        ])
        .areas(inner);

        self.render_search(frame, search);
        self.render_results(frame, results);
        self.render_form(frame, form);
        self.render_footer(frame, footer);
    }

    fn render_search(&self, frame: &mut Frame, area: Rect) {
        let focused = self.zone == Zone::Search;
        let locked = self.controller.search_box().locked;

        let text = self.search.text();
        let (display, style) = if locked {
            (format!("\u{1f512} {text}"), theme::locked())
        } else if text.is_empty() && !focused {
            ("Title, author or ISBN".to_string(), theme::dim())
        } else if focused {
            (format!("{text}_"), Style::default().fg(theme::TEXT))
        } else {
            (text.to_string(), Style::default().fg(theme::TEXT))
        };

        let mut spans = vec![Span::styled(display, style)];
        if self.controller.pending_query().is_some() {
            spans.push(Span::styled("  typing\u{2026}", theme::dim()));
        }

        frame.render_widget(
            Paragraph::new(Line::from(spans)).block(theme::block("Search", focused)),
            area,
        );
    }

    fn render_results(&self, frame: &mut Frame, area: Rect) {
        let focused = self.zone == Zone::Results;
        let view = self.controller.results_view();

        let lines = match view {
            ResultsView::Candidates { .. } => self
                .controller
                .candidates()
                .iter()
                .enumerate()
                .map(|(i, c)| candidate_line(c, focused && i == self.cursor))
                .collect(),
            ResultsView::Selected(candidate) => vec![
                Line::from(vec![
                    Span::styled("\u{2713} ", Style::default().fg(theme::SUCCESS).add_modifier(Modifier::BOLD)),
                    Span::styled(view.message(), Style::default().fg(theme::SUCCESS)),
                ]),
                Line::from(Span::styled(format!("  {}", candidate.label()), theme::title())),
                Line::from(vec![
                    Span::raw("  "),
                    Span::styled("c", theme::key_hint()),
                    Span::styled(":change selection", theme::muted()),
                ]),
            ],
            ResultsView::Error { .. } => {
                vec![Line::from(Span::styled(view.message(), theme::error()))]
            }
            _ => vec![Line::from(Span::styled(view.message(), theme::muted()))],
        };

        let scroll = if focused {
            self.cursor.saturating_sub(area.height.saturating_sub(3) as usize) as u16
        } else {
            0
        };

        frame.render_widget(
            Paragraph::new(lines)
                .block(theme::block("Results", focused))
                .scroll((scroll, 0)),
            area,
        );
    }

    fn render_form(&self, frame: &mut Frame, area: Rect) {
        let focused = self.zone == Zone::Form;
        let form = self.controller.form();

        let mut lines = Vec::new();
        for field in form.present() {
            let Some(state) = form.get(field) else {
                continue;
            };
            let is_current = focused && field == self.field;
            let marker = if is_current { "\u{25b8} " } else { "  " };

            let label_style = if is_current {
                Style::default()
                    .fg(theme::PRIMARY_LIGHT)
                    .add_modifier(Modifier::BOLD)
            } else {
                theme::muted()
            };

            let (value, value_style) = if is_current && !state.locked {
                (format!("{}_", self.field_input.text()), Style::default().fg(theme::TEXT))
            } else if state.locked {
                (state.value.clone(), theme::locked())
            } else if state.value.is_empty() {
                ("\u{2014}".to_string(), theme::dim())
            } else {
                (state.value.clone(), Style::default().fg(theme::TEXT))
            };

            let mut spans = vec![
                Span::styled(marker, Style::default().fg(theme::ACCENT)),
                Span::styled(format!("{:<13}", field_label(field)), label_style),
                Span::styled(value, value_style),
            ];
            if state.locked {
                spans.push(Span::styled(" \u{1f512}", theme::dim()));
            }
            if is_current && self.offers_categories() {
                spans.push(Span::styled("  \u{2190}/\u{2192} existing", theme::dim()));
            }
            lines.push(Line::from(spans));
        }

        frame.render_widget(
            Paragraph::new(lines)
                .block(theme::block("Book", focused))
                .wrap(Wrap { trim: false }),
            area,
        );
    }

    fn render_footer(&self, frame: &mut Frame, area: Rect) {
        let status = match &self.error {
            Some(err) => Line::from(Span::styled(format!(" {err}"), theme::error())),
            None => Line::raw(""),
        };
        let hints = Line::from(vec![
            Span::raw(" "),
            Span::styled("Tab", theme::key_hint()),
            Span::styled(":next  ", theme::muted()),
            Span::styled("Enter", theme::key_hint()),
            Span::styled(":select  ", theme::muted()),
            Span::styled("Ctrl+S", theme::key_hint()),
            Span::styled(":save  ", theme::muted()),
            Span::styled("Esc", theme::key_hint()),
            Span::styled(":cancel", theme::muted()),
        ]);
        frame.render_widget(Paragraph::new(vec![status, hints]), area);
    }
}

/// Field label, starred when the field must be filled before saving.
fn field_label(field: FormField) -> String {
    if field.required() {
        format!("{}*", field.label())
    } else {
        field.label().to_string()
    }
}

fn candidate_line(candidate: &Candidate, highlighted: bool) -> Line<'static> {
    let (marker, title_style) = if highlighted {
        ("\u{25b8} ", theme::highlight())
    } else {
        ("  ", Style::default().fg(theme::TEXT))
    };

    let title = if candidate.title.is_empty() {
        crate::core::books::candidate::UNTITLED.to_string()
    } else {
        candidate.title.clone()
    };

    let mut details = Vec::new();
    if !candidate.authors.is_empty() {
        details.push(candidate.authors_joined());
    }
    let pages = candidate.pages_text();
    if !pages.is_empty() {
        details.push(format!("{pages} pp"));
    }
    if let Some(isbn) = &candidate.isbn {
        details.push(isbn.clone());
    }

    Line::from(vec![
        Span::styled(marker, Style::default().fg(theme::ACCENT)),
        Span::styled(title, title_style),
        Span::styled(format!("  {}", details.join(" \u{b7} ")), theme::muted()),
    ])
}
