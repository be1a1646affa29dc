//! Daily pages chart: one bar per day of the chosen month.

use chrono::{Datelike, Local, Months, NaiveDate};
use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Paragraph},
    Frame,
};

use crate::core::library::Library;
use crate::tui::theme;

pub struct ChartState {
    /// First day of the displayed month.
    month: NaiveDate,
}

impl ChartState {
    pub fn new() -> Self {
        Self {
            month: first_of_month(Local::now().date_naive()),
        }
    }

    pub fn month(&self) -> NaiveDate {
        self.month
    }

    pub fn handle_input(&mut self, event: &Event) -> bool {
        let Event::Key(KeyEvent {
            code,
            kind: KeyEventKind::Press,
            ..
        }) = event
        else {
            return false;
        };

        match code {
            KeyCode::Char('h') | KeyCode::Left => {
                if let Some(prev) = self.month.checked_sub_months(Months::new(1)) {
                    self.month = prev;
                }
                true
            }
            KeyCode::Char('l') | KeyCode::Right => {
                let current = first_of_month(Local::now().date_naive());
                if let Some(next) = self.month.checked_add_months(Months::new(1)) {
                    if next <= current {
                        self.month = next;
                    }
                }
                true
            }
            KeyCode::Char('t') => {
                self.month = first_of_month(Local::now().date_naive());
                true
            }
            _ => false,
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, library: &Library) {
        let totals = library.daily_totals(self.month, last_of_month(self.month));
        let sum: u32 = totals.iter().map(|(_, pages)| pages).sum();
        let reading_days = totals.iter().filter(|(_, pages)| *pages > 0).count();

        let title = format!(
            "Daily pages \u{b7} {} \u{b7} {sum} pages over {reading_days} days",
            self.month.format("%B %Y")
        );
        let block = theme::block_default(&title);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let [chart_area, hints] =
            Layout::vertical([Constraint::Min(3), Constraint::Length(1)]).areas(inner);

        let bars: Vec<Bar> = totals
            .iter()
            .map(|(day, pages)| {
                Bar::default()
                    .value(u64::from(*pages))
                    .label(Line::from(day.day().to_string()))
                    .style(Style::default().fg(bar_color(*pages)))
            })
            .collect();

        // Fit every day of the month across the available width.
        let days = totals.len().max(1) as u16;
        let bar_width = (chart_area.width.saturating_sub(days) / days).clamp(1, 4);

        let chart = BarChart::default()
            .data(BarGroup::default().bars(&bars))
            .bar_width(bar_width)
            .bar_gap(1)
            .value_style(Style::default().fg(theme::BG_BASE).bg(theme::PRIMARY))
            .label_style(theme::muted());
        frame.render_widget(chart, chart_area);

        frame.render_widget(
            Paragraph::new(Line::from(vec![
                Span::styled(" h/l", theme::key_hint()),
                Span::styled(":month  ", theme::muted()),
                Span::styled("t", theme::key_hint()),
                Span::styled(":this month", theme::muted()),
            ])),
            hints,
        );
    }
}

fn bar_color(pages: u32) -> ratatui::style::Color {
    if pages == 0 {
        theme::TEXT_DIM
    } else {
        theme::PRIMARY
    }
}

fn first_of_month(day: NaiveDate) -> NaiveDate {
    day.with_day(1).unwrap_or(day)
}

fn last_of_month(first: NaiveDate) -> NaiveDate {
    first
        .checked_add_months(Months::new(1))
        .and_then(|next| next.pred_opt())
        .unwrap_or(first)
}
