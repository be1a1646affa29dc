//! Color theme for the reading tracker TUI: ink blue on warm paper accents.
//!
//! All colors are RGB truecolor. Views import from here instead of using
//! inline `Color::*` literals.

use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders};

// ── Primary palette ─────────────────────────────────────────────────────────

/// Ink blue: focused borders, headings.
pub const PRIMARY: Color = Color::Rgb(0x3D, 0x6F, 0xB6);
/// Light ink: hints, key names.
pub const PRIMARY_LIGHT: Color = Color::Rgb(0x7F, 0xA7, 0xE0);

/// Amber: active items, selection, calls to action.
pub const ACCENT: Color = Color::Rgb(0xE8, 0xA8, 0x38);

// ── Backgrounds ─────────────────────────────────────────────────────────────

pub const BG_BASE: Color = Color::Rgb(0x16, 0x18, 0x1D);
/// Elevated panels, sidebar.
pub const BG_SURFACE: Color = Color::Rgb(0x20, 0x23, 0x2A);

// ── Text ────────────────────────────────────────────────────────────────────

pub const TEXT: Color = Color::Rgb(0xE6, 0xE1, 0xD6);
pub const TEXT_MUTED: Color = Color::Rgb(0x8C, 0x88, 0x80);
pub const TEXT_DIM: Color = Color::Rgb(0x55, 0x53, 0x4F);

// ── Semantic ────────────────────────────────────────────────────────────────

pub const ERROR: Color = Color::Rgb(0xE0, 0x5A, 0x4F);
pub const SUCCESS: Color = Color::Rgb(0x6B, 0xB5, 0x6E);
pub const WARNING: Color = Color::Rgb(0xF0, 0xB4, 0x29);
pub const INFO: Color = Color::Rgb(0x5A, 0xA9, 0xE6);

/// Auto-filled (read-only) form values.
pub const LOCKED: Color = Color::Rgb(0xA8, 0x9F, 0xC8);

// ── Style helpers ───────────────────────────────────────────────────────────

pub fn title() -> Style {
    Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
}

pub fn heading() -> Style {
    Style::default().fg(PRIMARY).add_modifier(Modifier::BOLD)
}

pub fn border_focused() -> Style {
    Style::default().fg(PRIMARY)
}

pub fn border_default() -> Style {
    Style::default().fg(TEXT_DIM)
}

/// Highlighted/selected item.
pub fn highlight() -> Style {
    Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
}

pub fn muted() -> Style {
    Style::default().fg(TEXT_MUTED)
}

pub fn dim() -> Style {
    Style::default().fg(TEXT_DIM)
}

/// Key name in a hint line (e.g. "q" in "q:quit").
pub fn key_hint() -> Style {
    Style::default().fg(PRIMARY_LIGHT).add_modifier(Modifier::BOLD)
}

pub fn locked() -> Style {
    Style::default().fg(LOCKED).add_modifier(Modifier::ITALIC)
}

pub fn error() -> Style {
    Style::default().fg(ERROR).add_modifier(Modifier::BOLD)
}

/// Status bar brand badge.
pub fn brand_badge() -> Style {
    Style::default()
        .fg(BG_BASE)
        .bg(ACCENT)
        .add_modifier(Modifier::BOLD)
}

// ── Block builders ──────────────────────────────────────────────────────────

pub fn block_focused(title: &str) -> Block<'_> {
    Block::default()
        .title(format!(" {title} "))
        .borders(Borders::ALL)
        .border_style(border_focused())
}

pub fn block_default(title: &str) -> Block<'_> {
    Block::default()
        .title(format!(" {title} "))
        .borders(Borders::ALL)
        .border_style(border_default())
}

/// Focused or default block depending on `focused`.
pub fn block(title: &str, focused: bool) -> Block<'_> {
    if focused {
        block_focused(title)
    } else {
        block_default(title)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_style_helpers_return_non_default() {
        assert_ne!(title(), Style::default());
        assert_ne!(heading(), Style::default());
        assert_ne!(highlight(), Style::default());
        assert_ne!(locked(), Style::default());
    }

    #[test]
    fn test_locked_distinct_from_text() {
        assert_ne!(LOCKED, TEXT);
        assert_ne!(locked(), muted());
    }
}
