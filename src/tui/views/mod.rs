pub mod add_book;
pub mod categories;
pub mod chart;
pub mod shelf;

use ratatui::layout::Rect;

/// A `width` x `height` rect centered in `area`, clamped to fit.
pub(crate) fn centered_fixed(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(area.width), height.min(area.height))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centered_fixed() {
        let r = centered_fixed(40, 10, Rect::new(0, 0, 100, 50));
        assert_eq!(r, Rect::new(30, 20, 40, 10));
    }

    #[test]
    fn test_centered_fixed_small_area() {
        let r = centered_fixed(80, 30, Rect::new(5, 5, 40, 12));
        assert_eq!(r.width, 40);
        assert_eq!(r.height, 12);
        assert_eq!((r.x, r.y), (5, 5));
    }
}
