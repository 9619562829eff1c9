// Screen layout: panel arrangement and sizing.
//
// +--------------------------------------------------+
// | Status Bar (1 row)                                |
// +--------------------------------------------------+
// | Main Panel (menu, list, detail, form, dialog)     |
// +--------------------------------------------------+
// | Help Bar (1 row)                                  |
// +--------------------------------------------------+

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Resolved screen areas for each console zone.
#[derive(Debug, Clone)]
pub struct AppLayout {
    /// Top row: backend, current screen, activity and the last notice.
    pub status_bar: Rect,
    /// Everything between the bars.
    pub main_panel: Rect,
    /// Bottom row: keyboard shortcut hints.
    pub help_bar: Rect,
}

pub fn build_layout(area: Rect) -> AppLayout {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // status bar
            Constraint::Min(3),    // main panel
            Constraint::Length(1), // help bar
        ])
        .split(area);

    AppLayout {
        status_bar: vertical[0],
        main_panel: vertical[1],
        help_bar: vertical[2],
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bars_are_one_row_and_main_panel_fills_the_rest() {
        let layout = build_layout(Rect::new(0, 0, 120, 40));
        assert_eq!(layout.status_bar.height, 1);
        assert_eq!(layout.help_bar.height, 1);
        assert_eq!(layout.main_panel.height, 38);
        assert_eq!(layout.main_panel.width, 120);
        assert_eq!(layout.status_bar.y, 0);
        assert_eq!(layout.main_panel.y, 1);
        assert_eq!(layout.help_bar.y, 39);
    }

    #[test]
    fn zones_do_not_overlap() {
        let layout = build_layout(Rect::new(0, 0, 80, 24));
        assert!(!layout.status_bar.intersects(layout.main_panel));
        assert!(!layout.main_panel.intersects(layout.help_bar));
    }

    #[test]
    fn small_terminal_keeps_main_panel_minimum() {
        let layout = build_layout(Rect::new(0, 0, 40, 5));
        assert!(layout.main_panel.height >= 3);
    }
}
