//! Shelf view: books with reading progress, the add-book modal, a
//! pages-read prompt for today and a live filter over the list.

use chrono::{Local, NaiveDate};
use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Gauge, Paragraph},
    Frame,
};

use crate::core::library::{Book, BookFilter, BookOrder, Library, StatusFilter};
use crate::tui::events::NotificationLevel;
use crate::tui::services::Services;
use crate::tui::theme;
use crate::tui::widgets::input_buffer::InputBuffer;

use super::add_book::{AddBookModal, ModalOutcome};
use super::centered_fixed;

const PROGRESS_CELLS: usize = 12;

/// Query line being edited. Applied on every keystroke; Esc restores
/// the query that was active when the prompt opened.
struct FilterPrompt {
    input: InputBuffer,
    previous: String,
}

pub struct ShelfState {
    /// Index into the filtered, ordered list.
    selected: usize,
    filter: BookFilter,
    order: BookOrder,
    modal: Option<AddBookModal>,
    /// Pages-read prompt for the selected book (Some when open).
    log_prompt: Option<InputBuffer>,
    filter_prompt: Option<FilterPrompt>,
}

impl ShelfState {
    pub fn new(order: BookOrder) -> Self {
        Self {
            selected: 0,
            filter: BookFilter::default(),
            order,
            modal: None,
            log_prompt: None,
            filter_prompt: None,
        }
    }

    pub fn has_modal(&self) -> bool {
        self.modal.is_some() || self.log_prompt.is_some() || self.filter_prompt.is_some()
    }

    pub fn open_add_book(&mut self, services: &Services) {
        self.log_prompt = None;
        self.filter_prompt = None;
        self.modal = Some(AddBookModal::new(
            services.lookup.clone(),
            services.policy,
            services.category_names(),
        ));
    }

    pub fn poll(&mut self) {
        if let Some(modal) = &mut self.modal {
            modal.poll();
        }
    }

    /// Books on display, in display order.
    fn visible<'a>(&self, library: &'a Library) -> Vec<&'a Book> {
        library.filter(&self.filter, self.order)
    }

    fn selected_book<'a>(&self, library: &'a Library) -> Option<&'a Book> {
        self.visible(library).get(self.selected).copied()
    }

    fn clamp_selection(&mut self, library: &Library) {
        let count = self.visible(library).len();
        self.selected = self.selected.min(count.saturating_sub(1));
    }

    /// Active criteria for the list title, or None when unfiltered.
    fn filter_summary(&self, library: &Library) -> Option<String> {
        if !self.filter.is_active() {
            return None;
        }
        let mut parts = Vec::new();
        let query = self.filter.query();
        if !query.is_empty() {
            parts.push(query);
        }
        if let Some(category) = self.filter.category.and_then(|id| library.category(id)) {
            parts.push(format!("in {}", category.name));
        }
        if self.filter.status != StatusFilter::All {
            parts.push(self.filter.status.label().to_string());
        }
        Some(parts.join(" \u{b7} "))
    }

    // ── Input ────────────────────────────────────────────────────────────

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

        if let Some(modal) = &mut self.modal {
            match modal.handle_key(*code, *modifiers) {
                ModalOutcome::Consumed => {}
                ModalOutcome::Close => self.modal = None,
                ModalOutcome::Submit(book) => {
                    let title = book.title.clone();
                    let (id, created) = services.library.add_book(book);
                    if created {
                        if services.save_library() {
                            services.notify(format!("Added \"{title}\""), NotificationLevel::Success);
                        }
                    } else {
                        services.notify(
                            format!("\"{title}\" is already on the shelf"),
                            NotificationLevel::Info,
                        );
                    }
                    if let Some(idx) = self.visible(&services.library).iter().position(|b| b.id == id) {
                        self.selected = idx;
                    }
                    self.modal = None;
                }
            }
            return true;
        }

        if self.log_prompt.is_some() {
            self.handle_prompt_input(*code, services);
            return true;
        }

        if self.filter_prompt.is_some() {
            self.handle_filter_input(*code, &services.library);
            return true;
        }

        self.handle_list_input(*code, *modifiers, services)
    }

    fn handle_list_input(
        &mut self,
        code: KeyCode,
        modifiers: KeyModifiers,
        services: &mut Services,
    ) -> bool {
        let count = self.visible(&services.library).len();
        match (modifiers, code) {
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
                self.open_add_book(services);
                true
            }
            (KeyModifiers::NONE, KeyCode::Char('l')) if count > 0 => {
                self.log_prompt = Some(InputBuffer::new());
                true
            }
            (KeyModifiers::NONE, KeyCode::Char('u')) => {
                self.undo_today(services);
                true
            }
            (KeyModifiers::SHIFT, KeyCode::Char('D')) => {
                self.remove_selected(services);
                true
            }
            (KeyModifiers::NONE, KeyCode::Char('/')) => {
                let previous = self.filter.query();
                let mut input = InputBuffer::new();
                input.set_text(previous.clone());
                self.filter_prompt = Some(FilterPrompt { input, previous });
                true
            }
            (KeyModifiers::NONE, KeyCode::Char('s')) => {
                self.filter.status = self.filter.status.next();
                self.clamp_selection(&services.library);
                true
            }
            (KeyModifiers::NONE, KeyCode::Char('g')) => {
                self.filter.category = next_category(&services.library, self.filter.category);
                self.clamp_selection(&services.library);
                true
            }
            (KeyModifiers::NONE, KeyCode::Char('o')) => {
                self.order = self.order.next();
                true
            }
            (KeyModifiers::NONE, KeyCode::Char('x')) => {
                self.filter = BookFilter::default();
                self.clamp_selection(&services.library);
                true
            }
            (KeyModifiers::NONE | KeyModifiers::SHIFT, KeyCode::Char('+' | '=')) => {
                self.step_rating(services, true);
                true
            }
            (KeyModifiers::NONE, KeyCode::Char('-')) => {
                self.step_rating(services, false);
                true
            }
            _ => false,
        }
    }

    fn handle_filter_input(&mut self, code: KeyCode, library: &Library) {
        let Some(prompt) = &mut self.filter_prompt else {
            return;
        };
        match code {
            KeyCode::Enter => self.filter_prompt = None,
            KeyCode::Esc => {
                let previous = prompt.previous.clone();
                self.filter.apply_query(&previous);
                self.filter_prompt = None;
            }
            other => {
                if prompt.input.edit(other) {
                    let text = prompt.input.text().to_string();
                    self.filter.apply_query(&text);
                    self.selected = 0;
                }
            }
        }
        self.clamp_selection(library);
    }

    fn step_rating(&mut self, services: &mut Services, up: bool) {
        let Some(book) = self.selected_book(&services.library) else {
            return;
        };
        let (id, rating) = (book.id, book.rating);
        let rating = if up { rating.raised() } else { rating.lowered() };
        if let Err(e) = services.library.set_rating(id, rating) {
            services.notify(e.to_string(), NotificationLevel::Warning);
            return;
        }
        services.save_library();
        // The rated book may have moved under a recency order.
        if let Some(idx) = self.visible(&services.library).iter().position(|b| b.id == id) {
            self.selected = idx;
        }
    }

    fn handle_prompt_input(&mut self, code: KeyCode, services: &mut Services) {
        let Some(prompt) = &mut self.log_prompt else {
            return;
        };
        match code {
            KeyCode::Esc => self.log_prompt = None,
            KeyCode::Enter => {
                let text = prompt.text().trim().to_string();
                match text.parse::<u32>() {
                    Ok(pages) => {
                        self.log_today(services, pages);
                        self.log_prompt = None;
                    }
                    Err(_) => services.notify(
                        "Enter a whole number of pages",
                        NotificationLevel::Warning,
                    ),
                }
            }
            KeyCode::Char(c) if !c.is_ascii_digit() => {}
            other => {
                prompt.edit(other);
            }
        }
    }

    fn log_today(&mut self, services: &mut Services, pages: u32) {
        let Some(id) = self.selected_book(&services.library).map(|b| b.id) else {
            return;
        };
        let today = today();
        let (title, finished) = match services.library.log_reading(id, today, pages) {
            Ok(book) => (book.title.clone(), book.is_completed()),
            Err(e) => {
                services.notify(e.to_string(), NotificationLevel::Warning);
                return;
            }
        };
        if !services.save_library() {
            return;
        }
        if finished {
            services.notify(format!("Finished \"{title}\"!"), NotificationLevel::Success);
        } else {
            services.notify(
                format!("Logged {pages} pages of \"{title}\" today"),
                NotificationLevel::Info,
            );
        }
    }

    fn undo_today(&mut self, services: &mut Services) {
        let Some(id) = self.selected_book(&services.library).map(|b| b.id) else {
            return;
        };
        match services.library.remove_reading(id, today()) {
            Ok(true) => {
                if services.save_library() {
                    services.notify("Removed today's entry", NotificationLevel::Info);
                }
            }
            Ok(false) => services.notify("Nothing logged today", NotificationLevel::Info),
            Err(e) => services.notify(e.to_string(), NotificationLevel::Warning),
        }
    }

    fn remove_selected(&mut self, services: &mut Services) {
        let Some(id) = self.selected_book(&services.library).map(|b| b.id) else {
            return;
        };
        match services.library.remove_book(id) {
            Ok(book) => {
                if services.save_library() {
                    services.notify(format!("Removed \"{}\"", book.title), NotificationLevel::Info);
                }
                self.clamp_selection(&services.library);
            }
            Err(e) => services.notify(e.to_string(), NotificationLevel::Warning),
        }
    }

    // ── Rendering ────────────────────────────────────────────────────────

    pub fn render(&self, frame: &mut Frame, area: Rect, library: &Library) {
        let mut title = format!(" Shelf \u{b7} {} ", self.order.label());
        if let Some(summary) = self.filter_summary(library) {
            title.push_str(&format!("\u{b7} {summary} "));
        }
        let block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(theme::muted());
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let [list, detail] =
            Layout::horizontal([Constraint::Percentage(60), Constraint::Percentage(40)])
                .areas(inner);

        self.render_list(frame, list, library);
        self.render_detail(frame, detail, library);

        if let Some(prompt) = &self.log_prompt {
            self.render_prompt(frame, area, prompt, library);
        }
        if let Some(prompt) = &self.filter_prompt {
            render_filter_prompt(frame, area, &prompt.input);
        }
        if let Some(modal) = &self.modal {
            modal.render(frame, area);
        }
    }

    fn render_list(&self, frame: &mut Frame, area: Rect, library: &Library) {
        let books = self.visible(library);
        if books.is_empty() && self.filter.is_active() {
            let empty = Paragraph::new(vec![
                Line::raw(""),
                Line::from(vec![
                    Span::raw("  No books match. Press "),
                    Span::styled("x", theme::key_hint()),
                    Span::raw(" to clear the filter."),
                ]),
            ])
            .style(theme::muted());
            frame.render_widget(empty, area);
            return;
        }
        if books.is_empty() {
            let empty = Paragraph::new(vec![
                Line::raw(""),
                Line::from(vec![
                    Span::raw("  No books yet. Press "),
                    Span::styled("a", theme::key_hint()),
                    Span::raw(" to add one."),
                ]),
            ])
            .style(theme::muted());
            frame.render_widget(empty, area);
            return;
        }

        let lines: Vec<Line> = books
            .iter()
            .enumerate()
            .map(|(i, book)| {
                book_line(book, i == self.selected, self.filter.status == StatusFilter::Completed)
            })
            .collect();

        let visible = area.height as usize;
        let scroll = self.selected.saturating_sub(visible.saturating_sub(1));
        frame.render_widget(Paragraph::new(lines).scroll((scroll as u16, 0)), area);
    }

    fn render_detail(&self, frame: &mut Frame, area: Rect, library: &Library) {
        let Some(book) = self.selected_book(library) else {
            return;
        };
        let block = theme::block_default(&book.title);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let [gauge_area, info] =
            Layout::vertical([Constraint::Length(1), Constraint::Min(1)]).areas(inner);

        frame.render_widget(
            Gauge::default()
                .gauge_style(Style::default().fg(theme::PRIMARY).bg(theme::BG_SURFACE))
                .ratio(book.progress_pct() / 100.0)
                .label(format!("{}/{} pages", book.pages_read, book.total_pages)),
            gauge_area,
        );

        let mut lines = vec![
            Line::raw(""),
            detail_row("Author", &book.author),
            detail_row(
                "Category",
                book.category
                    .and_then(|id| library.category(id))
                    .map(|c| c.name.as_str())
                    .unwrap_or("\u{2014}"),
            ),
            detail_row("Rating", &format!("{} {}", book.rating.stars(), book.rating.label())),
            detail_row("ISBN", book.isbn.as_deref().unwrap_or("\u{2014}")),
            detail_row("Added", &book.added_at.with_timezone(&Local).format("%Y-%m-%d").to_string()),
        ];
        if let Some(done) = book.completed_at {
            lines.push(detail_row(
                "Finished",
                &done.with_timezone(&Local).format("%Y-%m-%d").to_string(),
            ));
        }
        lines.push(Line::raw(""));
        lines.push(Line::from(Span::styled("Recent reading", theme::heading())));
        let entries = library.entries_for(book.id);
        if entries.is_empty() {
            lines.push(Line::from(Span::styled("  nothing logged", theme::dim())));
        }
        for entry in entries.into_iter().take(inner.height.saturating_sub(10) as usize) {
            lines.push(Line::from(vec![
                Span::styled(format!("  {}  ", entry.day.format("%b %d")), theme::muted()),
                Span::raw(format!("{} pages", entry.pages)),
            ]));
        }

        frame.render_widget(Paragraph::new(lines), info);
    }

    fn render_prompt(&self, frame: &mut Frame, area: Rect, prompt: &InputBuffer, library: &Library) {
        let modal_area = centered_fixed(44, 5, area);
        let title = self
            .selected_book(library)
            .map(|b| b.title.as_str())
            .unwrap_or_default();
        let block = Block::default()
            .title(" Pages read today ")
            .title_alignment(Alignment::Center)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::ACCENT));

        let lines = vec![
            Line::from(Span::styled(format!(" {title}"), theme::muted())),
            Line::from(vec![
                Span::styled(" \u{25b8} ", Style::default().fg(theme::ACCENT)),
                Span::styled(format!("{}_", prompt.text()), Style::default().fg(theme::TEXT)),
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
}

fn render_filter_prompt(frame: &mut Frame, area: Rect, input: &InputBuffer) {
    let modal_area = centered_fixed(60, 5, area);
    let block = Block::default()
        .title(" Filter ")
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::ACCENT));

    let lines = vec![
        Line::from(vec![
            Span::styled(" / ", Style::default().fg(theme::ACCENT)),
            Span::styled(format!("{}_", input.text()), Style::default().fg(theme::TEXT)),
        ]),
        Line::from(Span::styled(
            " text  author:name  min:100  max:500",
            theme::dim(),
        )),
        Line::from(vec![
            Span::styled(" Enter", theme::key_hint()),
            Span::styled(":keep  ", theme::muted()),
            Span::styled("Esc", theme::key_hint()),
            Span::styled(":revert", theme::muted()),
        ]),
    ];

    frame.render_widget(Clear, modal_area);
    frame.render_widget(Paragraph::new(lines).block(block), modal_area);
}

/// The category after `current` in name order, wrapping through "any".
fn next_category(library: &Library, current: Option<uuid::Uuid>) -> Option<uuid::Uuid> {
    let categories = library.categories();
    match current.and_then(|id| categories.iter().position(|c| c.id == id)) {
        None => categories.first().map(|c| c.id),
        Some(idx) => categories.get(idx + 1).map(|c| c.id),
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Text progress bar, e.g. `████████░░░░`.
fn progress_bar(pct: f64) -> String {
    let filled = ((pct / 100.0) * PROGRESS_CELLS as f64).round() as usize;
    let filled = filled.min(PROGRESS_CELLS);
    format!(
        "{}{}",
        "\u{2588}".repeat(filled),
        "\u{2591}".repeat(PROGRESS_CELLS - filled)
    )
}

/// One shelf row. `finished_view` swaps the progress bar for the finish date.
fn book_line(book: &Book, selected: bool, finished_view: bool) -> Line<'static> {
    let marker = if selected { "\u{25b8} " } else { "  " };
    let title_style = if selected {
        theme::highlight()
    } else {
        Style::default().fg(theme::TEXT)
    };
    let (check, check_style) = if book.is_completed() {
        ("\u{2713} ", Style::default().fg(theme::SUCCESS).add_modifier(Modifier::BOLD))
    } else {
        ("  ", Style::default())
    };
    let pct = book.progress_pct();

    let mut spans = vec![
        Span::styled(marker, Style::default().fg(theme::ACCENT)),
        Span::styled(check, check_style),
        Span::styled(book.title.clone(), title_style),
        Span::styled(format!("  {}  ", book.author), theme::muted()),
    ];
    match book.completed_at {
        Some(done) if finished_view => spans.push(Span::styled(
            format!("finished {}", done.with_timezone(&Local).format("%Y-%m-%d")),
            Style::default().fg(theme::SUCCESS),
        )),
        _ => {
            spans.push(Span::styled(progress_bar(pct), Style::default().fg(theme::PRIMARY)));
            spans.push(Span::raw(format!(" {pct:>3.0}%")));
        }
    }
    spans.push(Span::styled(format!("  {}", book.rating.stars()), theme::dim()));
    Line::from(spans)
}

fn detail_row(label: &str, value: &str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{label:<10}"), theme::muted()),
        Span::raw(value.to_string()),
    ])
}
